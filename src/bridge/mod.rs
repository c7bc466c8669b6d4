//! Capability surface of the native capture module
//!
//! The engine never touches target-process memory itself. Address discovery,
//! hooks and raw reads/writes live in an external module that is reached
//! through [`CaptureBridge`]. Two implementations exist: [`NativeBridge`]
//! (Windows only) which loads the module at runtime, and [`UnavailableBridge`]
//! used when no module is wired up.

#[cfg(target_os = "windows")]
pub mod native;
pub mod unavailable;

#[cfg(target_os = "windows")]
pub use native::NativeBridge;
pub use unavailable::UnavailableBridge;

use crate::core::types::{
    Address, AffixSlot, EquipmentAttributes, EquipmentKind, FieldMask, ProcessId,
};
use thiserror::Error;

/// Failure reported by the capture module
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The call ran and returned failure; carries the module's last error text
    #[error("{0}")]
    Failed(String),

    /// The capability is not wired up
    #[error("capture engine not implemented")]
    Unimplemented,
}

/// Result type alias for bridge calls
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Operations the engine consumes from the capture module.
///
/// Slot positions passed to and returned from the bridge use the 1-based
/// `AffixSlot::index`; implementations translate to whatever the module uses.
pub trait CaptureBridge: Send + Sync {
    /// Short implementation name for logs
    fn name(&self) -> &str;

    fn attach_process(&self, pid: ProcessId) -> BridgeResult<()>;
    fn detach_process(&self) -> BridgeResult<()>;
    fn is_attached(&self) -> bool;

    fn enable_capture(&self) -> BridgeResult<()>;
    fn disable_capture(&self) -> BridgeResult<()>;
    fn is_capture_enabled(&self) -> bool;

    /// Address of the currently selected item, `None` until one is observed
    fn equipment_base_address(&self) -> Option<Address>;

    fn read_affix_slot(&self, index: u8) -> BridgeResult<AffixSlot>;

    /// Writes only the fields selected by `mask`
    fn write_affix_slot_masked(&self, slot: &AffixSlot, mask: FieldMask) -> BridgeResult<()>;

    fn read_equipment_attributes(&self) -> BridgeResult<EquipmentAttributes>;
    fn write_equipment_attributes(&self, data: &EquipmentAttributes) -> BridgeResult<()>;

    /// Kind of the selected item, when the module tracks it
    fn equipment_kind(&self) -> EquipmentKind {
        EquipmentKind::Unknown
    }

    fn set_skill_bypass(&self, _enabled: bool) -> BridgeResult<()> {
        Err(BridgeError::Unimplemented)
    }

    fn is_skill_bypass_enabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_error_display() {
        assert_eq!(
            BridgeError::Failed("hook missing".to_string()).to_string(),
            "hook missing"
        );
        assert_eq!(
            BridgeError::Unimplemented.to_string(),
            "capture engine not implemented"
        );
    }

    #[test]
    fn test_optional_capabilities_default() {
        let bridge = UnavailableBridge;
        assert_eq!(bridge.equipment_kind(), EquipmentKind::Unknown);
        assert!(!bridge.is_skill_bypass_enabled());
        assert_eq!(bridge.set_skill_bypass(true), Err(BridgeError::Unimplemented));
    }
}
