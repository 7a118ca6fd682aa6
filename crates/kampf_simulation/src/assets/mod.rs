//! Asset boundary: sprite sheets как непрозрачные frame handles + метрики видимости.
//!
//! Декодирование картинок живёт во внешней оболочке. Ядру нужны только:
//! - упорядоченные кадры для каждой стороны (left/right)
//! - метрики непрозрачной области (для размеров бокса и collision half-width)
//!
//! Missing asset никогда не фатален: подставляется placeholder-кадр.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::animation::Facing;

pub mod catalog;

pub use catalog::{AttackEffectFile, FighterCatalog, FighterDefinition};

/// Handle to one display frame owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId(pub u32);

impl FrameId {
    /// Distinct fill + marker frame drawn when a sheet is missing.
    pub const PLACEHOLDER: FrameId = FrameId(u32::MAX);
}

/// Ordered frames for both horizontal orientations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectionalFrames {
    pub right: Vec<FrameId>,
    pub left: Vec<FrameId>,
}

impl DirectionalFrames {
    pub fn placeholder() -> Self {
        Self {
            right: vec![FrameId::PLACEHOLDER],
            left: vec![FrameId::PLACEHOLDER],
        }
    }

    /// Longest side, at least one.
    pub fn frame_count(&self) -> usize {
        self.right.len().max(self.left.len()).max(1)
    }

    pub fn for_facing(&self, facing: Facing) -> &[FrameId] {
        match facing {
            Facing::Right => &self.right,
            Facing::Left => &self.left,
        }
    }

    /// Frames for `facing`, or the other side when that one is empty.
    pub fn for_facing_or_any(&self, facing: Facing) -> &[FrameId] {
        let preferred = self.for_facing(facing);
        if !preferred.is_empty() {
            return preferred;
        }
        if !self.right.is_empty() {
            &self.right
        } else {
            &self.left
        }
    }
}

/// Opaque-pixel metrics of a sheet, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibilityMetrics {
    pub max_visible_height: f32,
    pub frame_height_for_max: f32,
    pub max_visible_width: f32,
    pub frame_width_for_max: f32,
    pub min_bottom_margin: f32,
    pub frame_height_for_bottom: f32,
}

impl VisibilityMetrics {
    /// Metrics of a fully opaque square frame.
    pub fn solid(frame_size: u32) -> Self {
        let size = frame_size as f32;
        Self {
            max_visible_height: size,
            frame_height_for_max: size,
            max_visible_width: size,
            frame_width_for_max: size,
            min_bottom_margin: 0.0,
            frame_height_for_bottom: size,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    pub frames: DirectionalFrames,
    pub metrics: VisibilityMetrics,
}

impl SpriteSheet {
    pub fn placeholder(frame_size: u32) -> Self {
        Self {
            frames: DirectionalFrames::placeholder(),
            metrics: VisibilityMetrics::solid(frame_size),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    NotFound { path: PathBuf },
    Decode { path: PathBuf, reason: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "asset not found: {}", path.display()),
            Self::Decode { path, reason } => {
                write!(f, "cannot decode {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for AssetError {}

/// Slices sprite sheets into frames.
///
/// `frame_size = None` asks the provider to infer square frames from the
/// sheet height (used for attack effect strips).
pub trait AssetProvider {
    fn load_sheet(&self, path: &Path, frame_size: Option<u32>) -> Result<SpriteSheet, AssetError>;
}

/// Loads a sheet, substituting a single placeholder frame on failure.
pub fn load_sheet_or_placeholder(
    provider: &dyn AssetProvider,
    path: &Path,
    frame_size: u32,
) -> SpriteSheet {
    match provider.load_sheet(path, Some(frame_size)) {
        Ok(sheet) if !sheet.frames.right.is_empty() || !sheet.frames.left.is_empty() => sheet,
        Ok(_) => {
            crate::logger::log_warning(&format!(
                "🖼️ Empty sprite sheet replaced: {}",
                path.display()
            ));
            SpriteSheet::placeholder(frame_size)
        }
        Err(err) => {
            crate::logger::log_warning(&format!("🖼️ Missing sprite replaced: {}", err));
            SpriteSheet::placeholder(frame_size)
        }
    }
}

/// Provider that never finds anything: every fighter renders as placeholders.
pub struct NoAssets;

impl AssetProvider for NoAssets {
    fn load_sheet(&self, path: &Path, _frame_size: Option<u32>) -> Result<SpriteSheet, AssetError> {
        Err(AssetError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Procedural sheets for headless runs and tests.
///
/// Every sheet has `frame_count` frames with the same opaque box; individual
/// files can override the frame count or be marked missing. Frame ids are
/// derived from the path so identical paths always yield identical ids.
#[derive(Debug, Clone)]
pub struct GeneratedSheets {
    pub frame_count: usize,
    pub frame_size: u32,
    pub visible_width: f32,
    pub visible_height: f32,
    pub bottom_margin: f32,
    frame_overrides: HashMap<String, usize>,
    missing: Vec<String>,
}

impl Default for GeneratedSheets {
    fn default() -> Self {
        Self {
            frame_count: 6,
            frame_size: 162,
            visible_width: 60.0,
            visible_height: 100.0,
            bottom_margin: 0.0,
            frame_overrides: HashMap::new(),
            missing: Vec::new(),
        }
    }
}

impl GeneratedSheets {
    /// Overrides the frame count for sheets whose file name is `file_name`.
    pub fn with_frames(mut self, file_name: &str, frame_count: usize) -> Self {
        self.frame_overrides.insert(file_name.to_string(), frame_count);
        self
    }

    /// Sheets with this file name fail to load.
    pub fn with_missing(mut self, file_name: &str) -> Self {
        self.missing.push(file_name.to_string());
        self
    }

    fn frame_base(path: &Path) -> u32 {
        // FNV-1a: стабильно между запусками, в отличие от RandomState
        let mut hash: u32 = 0x811c_9dc5;
        for byte in path.to_string_lossy().bytes() {
            hash ^= byte as u32;
            hash = hash.wrapping_mul(0x0100_0193);
        }
        // Оставляем место под 2 * 256 кадров и не задеваем PLACEHOLDER
        (hash % 0x00ff_ffff) << 8
    }
}

impl AssetProvider for GeneratedSheets {
    fn load_sheet(&self, path: &Path, frame_size: Option<u32>) -> Result<SpriteSheet, AssetError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.missing.contains(&file_name) {
            return Err(AssetError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let count = self
            .frame_overrides
            .get(&file_name)
            .copied()
            .unwrap_or(self.frame_count)
            .clamp(1, 128);
        let size = frame_size.unwrap_or(self.frame_size) as f32;
        let base = Self::frame_base(path);

        let right: Vec<FrameId> = (0..count as u32).map(|i| FrameId(base + i)).collect();
        let left: Vec<FrameId> = (0..count as u32).map(|i| FrameId(base + 128 + i)).collect();

        Ok(SpriteSheet {
            frames: DirectionalFrames { right, left },
            metrics: VisibilityMetrics {
                max_visible_height: self.visible_height.min(size),
                frame_height_for_max: size,
                max_visible_width: self.visible_width.min(size),
                frame_width_for_max: size,
                min_bottom_margin: self.bottom_margin.clamp(0.0, size),
                frame_height_for_bottom: size,
            },
        })
    }
}
