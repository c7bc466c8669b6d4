//! Core type definitions for Affix-Engine
//!
//! Addresses, slot and attribute records, lifecycle state and the error
//! taxonomy shared by the engine, tables and input layers.

mod address;
mod equipment;
mod error;
mod process_info;
mod slot;

// Re-export all public types
pub use address::Address;
pub use equipment::{EquipmentAttributes, EquipmentKind};
pub use error::{EngineError, EngineResult, InputField, ValidationError};
pub use process_info::{CaptureState, TargetProcess};
pub use slot::{AffixSlot, AffixSlots, FieldMask, SlotSetError, EMPTY_AFFIX_ID, SLOT_COUNT};

// Common type aliases
pub type ProcessId = u32;
