//! Core module containing fundamental types for Affix-Engine
//!
//! This module provides the foundational building blocks used throughout
//! the engine, including the base address key, affix slot records,
//! equipment attributes, lifecycle state and error types.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Address, AffixSlot, AffixSlots, CaptureState, EngineError, EngineResult,
    EquipmentAttributes, FieldMask, TargetProcess,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
