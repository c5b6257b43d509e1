//! CLI command implementations

pub mod directions;
pub mod normalize;
pub mod pbr;
pub mod run;
pub mod seamless;
pub mod sign;

mod io;
