//! Eight-direction sampling of a multi-view orbit.

use std::sync::Arc;

use gensprite_raster::{select_frames, Raster};
use gensprite_spec::{CompassDirection, DirectionSet, DirectionTable};

use crate::collaborators::{Cutout, MattingThresholds};
use crate::error::JobError;

/// Picks one frame per compass direction and cuts it out.
#[derive(Clone)]
pub struct DirectionSampler {
    cutout: Arc<dyn Cutout>,
    table: &'static DirectionTable,
}

impl DirectionSampler {
    /// Sampler for orbits of `view_count` frames.
    ///
    /// Only view counts with a built-in table are supported; anything else is
    /// a mismatch between the worker and its generator.
    pub fn for_view_count(cutout: Arc<dyn Cutout>, view_count: usize) -> Result<Self, JobError> {
        let table = DirectionTable::for_view_count(view_count).ok_or_else(|| {
            let supported: Vec<String> = DirectionTable::supported_view_counts()
                .map(|n| n.to_string())
                .collect();
            JobError::Fault(format!(
                "no direction table for {} views (supported: {})",
                view_count,
                supported.join(", ")
            ))
        })?;
        Ok(Self { cutout, table })
    }

    pub fn table(&self) -> &DirectionTable {
        self.table
    }

    /// Frames standing in for each direction, without cutout.
    pub fn select<'a>(&self, frames: &'a [Raster]) -> Result<DirectionSet<&'a Raster>, JobError> {
        Ok(select_frames(frames, self.table)?)
    }

    /// Cuts out one selected frame; the result is always RGBA.
    pub async fn sample_direction(&self, frame: &Raster) -> Result<Raster, JobError> {
        let cut = self
            .cutout
            .cutout(frame, Some(MattingThresholds::ROTATION))
            .await?;
        Ok(cut.to_rgba())
    }

    /// Selects and cuts out all eight directions, in orbit order.
    pub async fn sample(&self, frames: &[Raster]) -> Result<DirectionSet<Raster>, JobError> {
        let selected = self.select(frames)?;
        let mut sampled = Vec::with_capacity(CompassDirection::ALL.len());
        for (direction, frame) in selected.iter() {
            log::debug!("sampling {} from frame {}", direction, self.table.frame_index(direction));
            sampled.push(self.sample_direction(frame).await?);
        }

        let mut sampled = sampled.into_iter();
        DirectionSet::try_from_fn(|direction| {
            sampled
                .next()
                .ok_or_else(|| JobError::Fault(format!("no sample for {}", direction)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::PassthroughCutout;

    fn orbit(n: usize) -> Vec<Raster> {
        (0..n)
            .map(|i| Raster::filled(4, 4, &[i as u8, 0, 0]).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_sv3d_orbit_back_view() {
        let sampler = DirectionSampler::for_view_count(Arc::new(PassthroughCutout), 21).unwrap();
        let frames = orbit(21);
        let sampled = sampler.sample(&frames).await.unwrap();

        assert_eq!(sampled[CompassDirection::N], frames[10].to_rgba());
        assert_eq!(sampled[CompassDirection::SE].pixel(0, 0), &[18, 0, 0, 255]);
    }

    #[test]
    fn test_unsupported_view_count_is_a_fault() {
        let err = DirectionSampler::for_view_count(Arc::new(PassthroughCutout), 12)
            .err()
            .unwrap();
        assert!(err.is_fault());
        assert!(err.to_string().contains("16, 21, 25"), "{}", err);
    }

    #[tokio::test]
    async fn test_short_orbit_is_a_fault() {
        let sampler = DirectionSampler::for_view_count(Arc::new(PassthroughCutout), 25).unwrap();
        let err = sampler.sample(&orbit(20)).await.unwrap_err();
        assert!(err.is_fault());
    }
}
