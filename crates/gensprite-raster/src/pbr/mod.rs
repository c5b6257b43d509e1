//! Algorithmic PBR map synthesis from a single base color.
//!
//! Every map is derived from the ITU-R 601-2 luma of the base color; no map
//! depends on another. A [`PbrMapSet`] is built in one step from one base
//! color and cannot be modified afterwards.

use std::fmt;

use crate::raster::Raster;

mod normal;
mod scalar;


use normal::luma_to_normal;
use scalar::{luma_to_height, luma_to_metallic, luma_to_roughness};

/// One of the five maps of a PBR set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PbrMap {
    Basecolor,
    Normal,
    Height,
    Roughness,
    Metallic,
}

impl PbrMap {
    /// All maps in upload order.
    pub const ALL: [PbrMap; 5] = [
        PbrMap::Basecolor,
        PbrMap::Normal,
        PbrMap::Height,
        PbrMap::Roughness,
        PbrMap::Metallic,
    ];

    /// File stem and result key prefix ("basecolor", "normal", ...).
    pub fn name(&self) -> &'static str {
        match self {
            PbrMap::Basecolor => "basecolor",
            PbrMap::Normal => "normal",
            PbrMap::Height => "height",
            PbrMap::Roughness => "roughness",
            PbrMap::Metallic => "metallic",
        }
    }
}

impl fmt::Display for PbrMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tuning for the derived maps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PbrSettings {
    /// Gradient scale for the normal map.
    pub normal_strength: f32,
    /// Roughness at mid-gray luma.
    pub base_roughness: f32,
    /// Metallic value at white; the map never exceeds `threshold * 255`.
    pub metallic_threshold: f32,
}

impl Default for PbrSettings {
    fn default() -> Self {
        Self {
            normal_strength: 2.0,
            base_roughness: 0.5,
            metallic_threshold: 0.1,
        }
    }
}

/// Normal map (RGB) of `basecolor`.
pub fn normal_map(basecolor: &Raster, strength: f32) -> Raster {
    luma_to_normal(&basecolor.luma(), basecolor.width(), basecolor.height(), strength)
}

/// Height map (gray) of `basecolor`.
pub fn height_map(basecolor: &Raster) -> Raster {
    luma_to_height(&basecolor.luma(), basecolor.width(), basecolor.height())
}

/// Roughness map (gray) of `basecolor`.
pub fn roughness_map(basecolor: &Raster, base_roughness: f32) -> Raster {
    luma_to_roughness(
        &basecolor.luma(),
        basecolor.width(),
        basecolor.height(),
        base_roughness,
    )
}

/// Metallic map (gray) of `basecolor`.
pub fn metallic_map(basecolor: &Raster, threshold: f32) -> Raster {
    luma_to_metallic(
        &basecolor.luma(),
        basecolor.width(),
        basecolor.height(),
        threshold,
    )
}

/// The five maps of a texture, all the size of the base color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbrMapSet {
    basecolor: Raster,
    normal: Raster,
    height: Raster,
    roughness: Raster,
    metallic: Raster,
}

impl PbrMapSet {
    /// Derives all maps from `basecolor`. The base color is kept as RGB.
    pub fn synthesize(basecolor: &Raster, settings: &PbrSettings) -> Self {
        let basecolor = basecolor.to_rgb();
        let (w, h) = (basecolor.width(), basecolor.height());
        let luma = basecolor.luma();

        Self {
            normal: luma_to_normal(&luma, w, h, settings.normal_strength),
            height: luma_to_height(&luma, w, h),
            roughness: luma_to_roughness(&luma, w, h, settings.base_roughness),
            metallic: luma_to_metallic(&luma, w, h, settings.metallic_threshold),
            basecolor,
        }
    }

    pub fn basecolor(&self) -> &Raster {
        &self.basecolor
    }

    pub fn normal(&self) -> &Raster {
        &self.normal
    }

    pub fn height(&self) -> &Raster {
        &self.height
    }

    pub fn roughness(&self) -> &Raster {
        &self.roughness
    }

    pub fn metallic(&self) -> &Raster {
        &self.metallic
    }

    /// Map by name.
    pub fn get(&self, map: PbrMap) -> &Raster {
        match map {
            PbrMap::Basecolor => &self.basecolor,
            PbrMap::Normal => &self.normal,
            PbrMap::Height => &self.height,
            PbrMap::Roughness => &self.roughness,
            PbrMap::Metallic => &self.metallic,
        }
    }

    /// `(map, raster)` pairs in upload order.
    pub fn iter(&self) -> impl Iterator<Item = (PbrMap, &Raster)> {
        PbrMap::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}
