//! Error taxonomy for engine operations

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Field category named by a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    SlotIndex,
    AffixId,
    Level,
    Prefix,
    ItemId,
    TransmogId,
    ItemLevel,
    PlusValue,
    Quality,
    UnderworldSkill,
    Familiarity,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InputField::SlotIndex => "slot index",
            InputField::AffixId => "affix ID",
            InputField::Level => "level",
            InputField::Prefix => "prefix (0..255)",
            InputField::ItemId => "item ID",
            InputField::TransmogId => "transmog ID",
            InputField::ItemLevel => "item level",
            InputField::PlusValue => "plus value",
            InputField::Quality => "quality",
            InputField::UnderworldSkill => "underworld skill",
            InputField::Familiarity => "familiarity",
        };
        f.write_str(text)
    }
}

/// User input that does not satisfy a field constraint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    /// 1-based slot index, absent for item attributes
    pub slot: Option<u8>,
    pub field: InputField,
}

impl ValidationError {
    pub fn slot(slot: u8, field: InputField) -> Self {
        ValidationError {
            slot: Some(slot),
            field,
        }
    }

    pub fn attribute(field: InputField) -> Self {
        ValidationError { slot: None, field }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot {
            Some(slot) => write!(f, "Slot {}: invalid {}", slot, self.field),
            None => write!(f, "Invalid {}", self.field),
        }
    }
}

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Not attached to any process")]
    NotAttached,

    #[error("Already attached to process {0}; detach first")]
    AlreadyAttached(u32),

    #[error("Capture not enabled")]
    CaptureNotEnabled,

    #[error("Equipment base address not observed yet; move the equipment cursor in game once")]
    AddressNotObserved,

    #[error("Failed to {op}: {message}")]
    Bridge { op: String, message: String },

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{op} timed out after {}ms", .timeout.as_millis())]
    Cancelled { op: String, timeout: Duration },

    #[error("Feature unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Creates a bridge failure error
    pub fn bridge(op: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Bridge {
            op: op.into(),
            message: message.into(),
        }
    }

    /// Creates a cancellation error
    pub fn cancelled(op: impl Into<String>, timeout: Duration) -> Self {
        EngineError::Cancelled {
            op: op.into(),
            timeout,
        }
    }

    /// Not attached, capture disabled or address not observed
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            EngineError::NotAttached
                | EngineError::AlreadyAttached(_)
                | EngineError::CaptureNotEnabled
                | EngineError::AddressNotObserved
        )
    }

    pub fn is_address_not_observed(&self) -> bool {
        matches!(self, EngineError::AddressNotObserved)
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, EngineError::Unavailable(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, EngineError::Cancelled { .. })
    }
}
