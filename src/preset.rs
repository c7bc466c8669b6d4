//! Saved slot presets
//!
//! A preset is a complete 7-slot set stored as pretty-printed JSON. Loading
//! rejects files whose slots are not a complete set with unique indices.

use crate::core::types::{AffixSlot, AffixSlots, SlotSetError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("Preset file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Preset JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Preset does not hold a complete slot set: {0}")]
    Slots(#[from] SlotSetError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PresetFile {
    slots: Vec<AffixSlot>,
}

/// Writes `slots` to `path`, creating parent directories
pub fn save_preset(path: &Path, slots: &AffixSlots) -> Result<(), PresetError> {
    let io_err = |source| PresetError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = PresetFile {
        slots: slots.to_vec(),
    };
    let json = serde_json::to_string_pretty(&file)?;
    fs::write(path, json).map_err(io_err)?;
    info!("Saved affix preset to {}", path.display());
    Ok(())
}

/// Reads a preset back as a complete slot set
pub fn load_preset(path: &Path) -> Result<AffixSlots, PresetError> {
    let text = fs::read_to_string(path).map_err(|source| PresetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: PresetFile = serde_json::from_str(&text)?;
    let slots = AffixSlots::try_from_slots(&file.slots)?;
    info!("Loaded affix preset from {}", path.display());
    Ok(slots)
}
