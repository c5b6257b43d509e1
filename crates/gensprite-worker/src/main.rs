//! GenSprite CLI - asset worker and offline image stages
//!
//! `run` processes a queued job against the configured collaborators; the
//! other commands expose the deterministic image stages on local files.

use clap::Parser;
use std::process::ExitCode;

use gensprite_worker::{commands, logger};

mod cli_args;

use cli_args::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let result = match cli.command {
        Commands::Normalize {
            input,
            output,
            size,
        } => commands::normalize::run(&input, &output, size),
        Commands::Seamless { input, output } => commands::seamless::run(&input, &output),
        Commands::Pbr {
            input,
            output,
            name,
            strength,
        } => commands::pbr::run(&input, &output, &name, strength),
        Commands::Directions {
            frames_dir,
            view_count,
            output,
        } => commands::directions::run(&frames_dir, view_count, &output),
        Commands::Sign { secret, input } => commands::sign::run(&secret, input.as_deref()),
        Commands::Run { job, config } => commands::run::run(&job, config.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_pbr_defaults() {
        let cli = Cli::try_parse_from(["gensprite", "pbr", "-i", "base.png", "-o", "maps"]).unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Commands::Pbr {
                input,
                output,
                name,
                strength,
            } => {
                assert_eq!(input, "base.png");
                assert_eq!(output, "maps");
                assert_eq!(name, "material");
                assert_eq!(strength, 2.0);
            }
            _ => panic!("expected pbr command"),
        }
    }

    #[test]
    fn test_cli_parses_normalize_size() {
        let cli = Cli::try_parse_from([
            "gensprite", "normalize", "-i", "a.png", "-o", "b.png", "--size", "256",
        ])
        .unwrap();
        match cli.command {
            Commands::Normalize { size, .. } => assert_eq!(size, 256),
            _ => panic!("expected normalize command"),
        }
    }

    #[test]
    fn test_cli_parses_directions_with_global_verbose() {
        let cli = Cli::try_parse_from([
            "gensprite",
            "directions",
            "--frames-dir",
            "orbit",
            "-o",
            "out",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Directions {
                frames_dir,
                view_count,
                output,
            } => {
                assert_eq!(frames_dir, "orbit");
                assert_eq!(view_count, 21);
                assert_eq!(output, "out");
            }
            _ => panic!("expected directions command"),
        }
    }

    #[test]
    fn test_cli_requires_secret_for_sign() {
        let err = Cli::try_parse_from(["gensprite", "sign"]).err().unwrap();
        assert!(err.to_string().contains("--secret"));
    }

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from(["gensprite", "run", "--job", "job.json"]).unwrap();
        match cli.command {
            Commands::Run { job, config } => {
                assert_eq!(job, "job.json");
                assert!(config.is_none());
            }
            _ => panic!("expected run command"),
        }
    }
}
