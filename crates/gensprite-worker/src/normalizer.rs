//! Multi-view input preparation with background removal.

use std::sync::Arc;

use gensprite_raster::{needs_background_removal, normalize, Raster, DEFAULT_TARGET_SIZE};

use crate::collaborators::Cutout;
use crate::error::JobError;

/// Canonicalizes arbitrary images into the generator's square input.
///
/// Opaque images are cut out first (default matting) so the subject can be
/// located by its alpha.
#[derive(Clone)]
pub struct ImageNormalizer {
    cutout: Arc<dyn Cutout>,
    target_size: u32,
}

impl ImageNormalizer {
    pub fn new(cutout: Arc<dyn Cutout>) -> Self {
        Self {
            cutout,
            target_size: DEFAULT_TARGET_SIZE,
        }
    }

    pub fn with_target_size(mut self, target_size: u32) -> Self {
        self.target_size = target_size;
        self
    }

    pub fn target_size(&self) -> u32 {
        self.target_size
    }

    pub async fn normalize(&self, image: &Raster) -> Result<Raster, JobError> {
        let normalized = if needs_background_removal(image) {
            log::debug!(
                "normalize: {}x{} input is opaque, removing background",
                image.width(),
                image.height()
            );
            let subject = self.cutout.cutout(&image.to_rgba(), None).await?;
            normalize(&subject, self.target_size)?
        } else {
            normalize(image, self.target_size)?
        };
        Ok(normalized)
    }
}
