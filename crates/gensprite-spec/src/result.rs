//! Typed job results.
//!
//! Each variant serializes to the flat object the front end stores, e.g.
//! `{"raw_url": ..., "processed_url": ..., "seed": 12345}` for sprites.

use serde::{Deserialize, Serialize};

use crate::direction::{CompassDirection, DirectionSet};
use crate::job::JobType;

/// Result of a sprite job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteResult {
    /// The generator's output as-is.
    pub raw_url: String,
    /// The cut-out sprite with transparent background.
    pub processed_url: String,
    pub seed: u32,
}

/// Result of a texture job: one URL per PBR map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureResult {
    pub basecolor_url: String,
    pub normal_url: String,
    pub height_url: String,
    pub roughness_url: String,
    pub metallic_url: String,
    pub seed: u32,
}

/// Result of a rotation job: one cut-out frame per compass direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationResult {
    pub rotation_s: String,
    pub rotation_sw: String,
    pub rotation_w: String,
    pub rotation_nw: String,
    pub rotation_n: String,
    pub rotation_ne: String,
    pub rotation_e: String,
    pub rotation_se: String,
}

impl RotationResult {
    /// Builds the result from one uploaded URL per direction.
    pub fn from_directions(urls: DirectionSet<String>) -> Self {
        let take = |d: CompassDirection| urls[d].clone();
        Self {
            rotation_s: take(CompassDirection::S),
            rotation_sw: take(CompassDirection::SW),
            rotation_w: take(CompassDirection::W),
            rotation_nw: take(CompassDirection::NW),
            rotation_n: take(CompassDirection::N),
            rotation_ne: take(CompassDirection::NE),
            rotation_e: take(CompassDirection::E),
            rotation_se: take(CompassDirection::SE),
        }
    }

    /// URL for a direction.
    pub fn url(&self, direction: CompassDirection) -> &str {
        match direction {
            CompassDirection::S => &self.rotation_s,
            CompassDirection::SW => &self.rotation_sw,
            CompassDirection::W => &self.rotation_w,
            CompassDirection::NW => &self.rotation_nw,
            CompassDirection::N => &self.rotation_n,
            CompassDirection::NE => &self.rotation_ne,
            CompassDirection::E => &self.rotation_e,
            CompassDirection::SE => &self.rotation_se,
        }
    }
}

/// The result of one job, tagged by job type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobResult {
    Sprite(SpriteResult),
    Texture(TextureResult),
    Rotation(RotationResult),
}

impl JobResult {
    /// Returns the job type that produced this result.
    pub fn job_type(&self) -> JobType {
        match self {
            JobResult::Sprite(_) => JobType::Sprite,
            JobResult::Texture(_) => JobType::Texture,
            JobResult::Rotation(_) => JobType::Rotation,
        }
    }
}
