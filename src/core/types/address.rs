//! Equipment base address wrapper

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque address reported by the capture module for the currently selected item.
///
/// The engine never dereferences it; it is only compared to decide whether the
/// selection changed and whether a cached snapshot still applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub u64);

impl Address {
    /// Creates a new address from a raw value
    pub const fn new(value: u64) -> Self {
        Address(value)
    }

    /// Converts the bridge's raw value, where 0 means "not observed yet"
    pub const fn from_raw(value: u64) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Address(value))
        }
    }

    /// Returns the raw value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Text shown for an optional address; `-` when absent
    pub fn display_or_dash(address: Option<Address>) -> String {
        match address {
            Some(addr) => addr.to_string(),
            None => "-".to_string(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Address::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_treats_zero_as_absent() {
        assert_eq!(Address::from_raw(0), None);
        assert_eq!(Address::from_raw(0x1000), Some(Address::new(0x1000)));
    }

    #[test]
    fn test_address_display() {
        let addr = Address::new(0x7FF6DEADBEEF);
        assert_eq!(format!("{}", addr), "0x7FF6DEADBEEF");
        assert_eq!(format!("{:x}", addr), "0x7ff6deadbeef");
    }

    #[test]
    fn test_display_or_dash() {
        assert_eq!(Address::display_or_dash(None), "-");
        assert_eq!(Address::display_or_dash(Some(Address::new(0x20))), "0x20");
    }
}
