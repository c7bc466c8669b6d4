//! Affix-Engine library: attach/capture lifecycle, masked slot writes,
//! id/name resolution tables and input validation for editing equipment
//! affix slots in a running game process.

pub mod bridge;
pub mod config;
pub mod core;
pub mod engine;
pub mod input;
pub mod preset;
pub mod session;
pub mod tables;

// Re-export main types from core module
pub use core::types::{
    Address, AffixSlot, AffixSlots, CaptureState, EngineError, EngineResult,
    EquipmentAttributes, EquipmentKind, FieldMask, InputField, ProcessId, TargetProcess,
    ValidationError, EMPTY_AFFIX_ID, SLOT_COUNT,
};

pub use bridge::{BridgeError, BridgeResult, CaptureBridge, UnavailableBridge};
pub use engine::{AffixEngine, WritePlan};
pub use session::{run_polling, Session, Timeouts};
pub use tables::{AffixTable, SkillTable, Tables};
