//! Stand-in bridge used before a capture module is wired up

use super::{BridgeError, BridgeResult, CaptureBridge};
use crate::core::types::{Address, AffixSlot, EquipmentAttributes, FieldMask, ProcessId};

/// Bridge whose capabilities are all missing.
///
/// Attach and every I/O call report [`BridgeError::Unimplemented`]; teardown
/// calls succeed so shutdown paths never block on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBridge;

impl CaptureBridge for UnavailableBridge {
    fn name(&self) -> &str {
        "NotImplemented"
    }

    fn attach_process(&self, _pid: ProcessId) -> BridgeResult<()> {
        Err(BridgeError::Unimplemented)
    }

    fn detach_process(&self) -> BridgeResult<()> {
        Ok(())
    }

    fn is_attached(&self) -> bool {
        false
    }

    fn enable_capture(&self) -> BridgeResult<()> {
        Err(BridgeError::Unimplemented)
    }

    fn disable_capture(&self) -> BridgeResult<()> {
        Ok(())
    }

    fn is_capture_enabled(&self) -> bool {
        false
    }

    fn equipment_base_address(&self) -> Option<Address> {
        None
    }

    fn read_affix_slot(&self, _index: u8) -> BridgeResult<AffixSlot> {
        Err(BridgeError::Unimplemented)
    }

    fn write_affix_slot_masked(&self, _slot: &AffixSlot, _mask: FieldMask) -> BridgeResult<()> {
        Err(BridgeError::Unimplemented)
    }

    fn read_equipment_attributes(&self) -> BridgeResult<EquipmentAttributes> {
        Err(BridgeError::Unimplemented)
    }

    fn write_equipment_attributes(&self, _data: &EquipmentAttributes) -> BridgeResult<()> {
        Err(BridgeError::Unimplemented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_unimplemented() {
        let bridge = UnavailableBridge;
        assert_eq!(bridge.name(), "NotImplemented");
        assert_eq!(bridge.attach_process(1), Err(BridgeError::Unimplemented));
        assert_eq!(bridge.enable_capture(), Err(BridgeError::Unimplemented));
        assert_eq!(bridge.read_affix_slot(1), Err(BridgeError::Unimplemented));
        assert!(bridge.read_equipment_attributes().is_err());
        assert!(bridge
            .write_affix_slot_masked(&AffixSlot::empty(1), FieldMask::ALL)
            .is_err());
        assert!(bridge
            .write_equipment_attributes(&EquipmentAttributes::default())
            .is_err());
        assert!(!bridge.is_attached());
        assert!(!bridge.is_capture_enabled());
        assert!(bridge.equipment_base_address().is_none());
    }

    #[test]
    fn test_teardown_succeeds() {
        let bridge = UnavailableBridge;
        assert!(bridge.detach_process().is_ok());
        assert!(bridge.disable_capture().is_ok());
    }
}
