//! Sprite and sound catalog
//!
//! The game knows a fixed set of named assets. `AssetCatalog::builtin()` gives
//! every sprite a default footprint and tint so the game runs with no files at
//! all (sprites render as tinted quads). `AssetCatalog::load()` checks the
//! game's asset tree on disk and takes unscaled sprite footprints from the
//! PNG headers. A missing or unreadable asset is a startup error.

use std::path::{Path, PathBuf};

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::{Cue, Track};
use crate::consts::{CAR_VARIANTS, SCREEN_HEIGHT};
use crate::sim::Footprints;

/// Sprite identifiers known to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    /// Car variant (0..CAR_VARIANTS)
    Car(u8),
    Oil,
    Fuel,
    Arrow,
    Grass,
    Tribune,
}

/// Asset loading failures (all fatal at startup)
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("missing asset `{name}` (expected at {})", .path.display())]
    Missing { name: String, path: PathBuf },

    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to read asset `{name}` at {}: {source}", .path.display())]
    Decode {
        name: String,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A sprite entry
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub name: String,
    /// Path relative to the asset root
    pub path: PathBuf,
    /// On-screen footprint in pixels
    pub size: IVec2,
    /// Quad color used when drawing without textures
    pub tint: [f32; 4],
    /// Footprint is fixed by the game (scaled on load) rather than read from the file
    pub scaled: bool,
}

impl ImageAsset {
    fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        size: IVec2,
        tint: [f32; 4],
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size,
            tint,
            scaled: false,
        }
    }

    fn scaled(mut self) -> Self {
        self.scaled = true;
        self
    }
}

/// A sound entry
#[derive(Debug, Clone)]
pub struct SoundAsset {
    pub name: String,
    pub path: PathBuf,
}

impl SoundAsset {
    fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Default car footprint when no image file is read
pub const DEFAULT_CAR_SIZE: IVec2 = IVec2::new(70, 120);
/// Lane arrows are always scaled to this size
pub const ARROW_SIZE: IVec2 = IVec2::new(100, 50);
/// Grass and tribune strips are scaled to this size
pub const SCENERY_SIZE: IVec2 = IVec2::new(144, SCREEN_HEIGHT);

/// Car paint colors, one per variant
const CAR_TINTS: [[f32; 4]; CAR_VARIANTS] = [
    [0.85, 0.15, 0.15, 1.0],
    [0.15, 0.35, 0.85, 1.0],
    [0.95, 0.80, 0.10, 1.0],
    [0.10, 0.70, 0.30, 1.0],
    [0.95, 0.50, 0.10, 1.0],
    [0.60, 0.20, 0.75, 1.0],
    [0.90, 0.90, 0.90, 1.0],
    [0.15, 0.15, 0.15, 1.0],
];

/// The full named catalog
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    /// Directory the catalog was verified against (None for builtin)
    pub root: Option<PathBuf>,
    pub cars: Vec<ImageAsset>,
    pub oil: ImageAsset,
    pub fuel: ImageAsset,
    pub arrow: ImageAsset,
    pub grass: ImageAsset,
    pub tribune: ImageAsset,
    pub explosion: SoundAsset,
    pub skid: SoundAsset,
    pub music: SoundAsset,
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AssetCatalog {
    /// Catalog with default footprints; needs no files
    pub fn builtin() -> Self {
        let cars = CAR_TINTS
            .iter()
            .enumerate()
            .map(|(i, tint)| {
                ImageAsset::new(
                    format!("car_{i}"),
                    Path::new("Assets").join("Car").join(format!("car_{i}.png")),
                    DEFAULT_CAR_SIZE,
                    *tint,
                )
            })
            .collect();

        let object_dir = Path::new("Assets").join("Object");
        Self {
            root: None,
            cars,
            oil: ImageAsset::new(
                "oil",
                object_dir.join("oil.png"),
                IVec2::new(60, 50),
                [0.08, 0.08, 0.10, 1.0],
            ),
            fuel: ImageAsset::new(
                "fuel",
                object_dir.join("last.png"),
                IVec2::new(40, 50),
                [0.90, 0.20, 0.20, 1.0],
            ),
            arrow: ImageAsset::new(
                "arrow",
                object_dir.join("arrow_white.png"),
                ARROW_SIZE,
                [1.0, 1.0, 1.0, 0.9],
            )
            .scaled(),
            grass: ImageAsset::new(
                "grass",
                Path::new("Bahan")
                    .join("PNG")
                    .join("Tiles")
                    .join("Grass")
                    .join("land_grass01.png"),
                SCENERY_SIZE,
                [0.25, 0.60, 0.20, 1.0],
            )
            .scaled(),
            tribune: ImageAsset::new(
                "tribune",
                object_dir.join("tribune.png"),
                SCENERY_SIZE,
                [0.55, 0.45, 0.35, 1.0],
            )
            .scaled(),
            explosion: SoundAsset::new("explosion", Path::new("sound").join("Duar.mp3")),
            skid: SoundAsset::new("skid", Path::new("sound").join("ngepot.mp3")),
            music: SoundAsset::new("music", Path::new("sound").join("backsound.mp3")),
        }
    }

    /// Verify every asset under `root` and read unscaled footprints from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(root: impl AsRef<Path>) -> Result<Self, AssetError> {
        let root = root.as_ref();
        let mut catalog = Self::builtin();

        for image in catalog.images_mut() {
            let full = root.join(&image.path);
            if !full.is_file() {
                return Err(AssetError::Missing {
                    name: image.name.clone(),
                    path: full,
                });
            }
            let (w, h) = image::image_dimensions(&full).map_err(|source| AssetError::Decode {
                name: image.name.clone(),
                path: full.clone(),
                source,
            })?;
            if !image.scaled {
                image.size = IVec2::new(w as i32, h as i32);
            }
            log::debug!("Loaded {} ({}x{})", image.name, image.size.x, image.size.y);
        }

        for sound in [&catalog.explosion, &catalog.skid, &catalog.music] {
            let full = root.join(&sound.path);
            if !full.is_file() {
                return Err(AssetError::Missing {
                    name: sound.name.clone(),
                    path: full,
                });
            }
        }

        log::info!("Asset catalog verified under {}", root.display());
        catalog.root = Some(root.to_path_buf());
        Ok(catalog)
    }

    fn images_mut(&mut self) -> impl Iterator<Item = &mut ImageAsset> {
        self.cars.iter_mut().chain([
            &mut self.oil,
            &mut self.fuel,
            &mut self.arrow,
            &mut self.grass,
            &mut self.tribune,
        ])
    }

    /// Look up a sprite entry. Out-of-range car variants wrap.
    pub fn sprite(&self, sprite: Sprite) -> &ImageAsset {
        match sprite {
            Sprite::Car(i) => &self.cars[i as usize % self.cars.len()],
            Sprite::Oil => &self.oil,
            Sprite::Fuel => &self.fuel,
            Sprite::Arrow => &self.arrow,
            Sprite::Grass => &self.grass,
            Sprite::Tribune => &self.tribune,
        }
    }

    pub fn cue(&self, cue: Cue) -> &SoundAsset {
        match cue {
            Cue::Explosion => &self.explosion,
            Cue::Skid => &self.skid,
        }
    }

    pub fn track(&self, track: Track) -> &SoundAsset {
        match track {
            Track::Background => &self.music,
        }
    }

    /// Sprite footprints the spawner needs
    pub fn footprints(&self) -> Footprints {
        Footprints {
            cars: self.cars.iter().map(|c| c.size).collect(),
            oil: self.oil.size,
            fuel: self.fuel.size,
            arrow: self.arrow.size,
        }
    }
}
