//! Sheet loading and the per-tileset atlas

use std::path::Path;

use image::RgbaImage;
use log::debug;
use thiserror::Error;

use gridforge_core::{Family, TilesetDescriptor, TilesetError};

/// Errors raised while assembling an atlas.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load {family:?} sheet from {path}")]
    SheetLoad {
        family: Family,
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Tileset(#[from] TilesetError),
}

/// A [`TilesetDescriptor`] paired with its decoded sprite sheets.
///
/// Sheets are immutable once loaded; the compositor shares the atlas
/// read-only. Families without a sheet simply draw nothing.
#[derive(Debug, Clone)]
pub struct TilesetAtlas {
    descriptor: TilesetDescriptor,
    sheets: [Option<RgbaImage>; 9],
}

impl TilesetAtlas {
    /// An atlas with no sheets yet; pair with [`insert_sheet`].
    ///
    /// [`insert_sheet`]: TilesetAtlas::insert_sheet
    pub fn new(descriptor: TilesetDescriptor) -> Result<Self, RenderError> {
        descriptor.validate()?;
        Ok(Self {
            descriptor,
            sheets: Default::default(),
        })
    }

    /// Load every sheet the descriptor names, resolving paths against
    /// `base_dir`.
    pub fn load(descriptor: TilesetDescriptor, base_dir: &Path) -> Result<Self, RenderError> {
        let mut atlas = Self::new(descriptor)?;
        for family in Family::ALL {
            let Some(path) = atlas.descriptor.sheet_path(family) else {
                continue;
            };
            let full = base_dir.join(path);
            let sheet = image::open(&full)
                .map_err(|source| RenderError::SheetLoad {
                    family,
                    path: path.to_string(),
                    source,
                })?
                .to_rgba8();
            debug!(
                "loaded {:?} sheet {} ({}x{})",
                family,
                path,
                sheet.width(),
                sheet.height()
            );
            atlas.sheets[family.index()] = Some(sheet);
        }
        Ok(atlas)
    }

    /// Provide a pre-decoded sheet for one family.
    pub fn insert_sheet(&mut self, family: Family, sheet: RgbaImage) {
        self.sheets[family.index()] = Some(sheet);
    }

    pub fn sheet(&self, family: Family) -> Option<&RgbaImage> {
        self.sheets[family.index()].as_ref()
    }

    pub fn descriptor(&self) -> &TilesetDescriptor {
        &self.descriptor
    }

    pub fn tile_size(&self) -> u32 {
        self.descriptor.tile_size
    }
}
