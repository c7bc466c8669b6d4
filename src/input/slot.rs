//! Affix slot text → validated slot records

use crate::core::types::{
    AffixSlot, AffixSlots, InputField, SlotSetError, ValidationError, EMPTY_AFFIX_ID, SLOT_COUNT,
};
use crate::tables::{AffixTable, EMPTY_MARKER};
use serde::{Deserialize, Serialize};

/// Operator-facing text for one slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInput {
    pub index: u8,
    pub affix_id: String,
    pub level: String,
    pub prefixes: [String; 4],
}

impl SlotInput {
    /// Blank text for a slot
    pub fn new(index: u8) -> Self {
        SlotInput {
            index,
            ..Default::default()
        }
    }

    /// Text fields as displayed for a read slot
    pub fn from_slot(slot: &AffixSlot, table: &AffixTable) -> Self {
        SlotInput {
            index: slot.index,
            affix_id: table.format(slot.id),
            level: slot.level.to_string(),
            prefixes: slot.prefixes.map(|p| p.to_string()),
        }
    }

    /// Replaces blank fields with their defaults: the empty marker for the id, `0` otherwise
    pub fn normalize_empty(&mut self) {
        fill_blank(&mut self.affix_id, EMPTY_MARKER);
        fill_blank(&mut self.level, "0");
        for prefix in &mut self.prefixes {
            fill_blank(prefix, "0");
        }
    }

    /// Validates every field; blank fields take their defaults
    pub fn to_slot(&self, table: &AffixTable) -> Result<AffixSlot, ValidationError> {
        let index = self.index;
        let invalid = |field| ValidationError::slot(index, field);

        if !(1..=SLOT_COUNT as u8).contains(&index) {
            return Err(invalid(InputField::SlotIndex));
        }

        let id = table
            .resolve(&self.affix_id)
            .filter(|id| *id >= EMPTY_AFFIX_ID)
            .ok_or_else(|| invalid(InputField::AffixId))?;

        let level = parse_or_zero::<i32>(&self.level)
            .filter(|level| *level >= 0)
            .ok_or_else(|| invalid(InputField::Level))?;

        let mut prefixes = [0u8; 4];
        for (value, text) in prefixes.iter_mut().zip(&self.prefixes) {
            *value = parse_or_zero::<u8>(text).ok_or_else(|| invalid(InputField::Prefix))?;
        }

        Ok(AffixSlot::new(index, id, level, prefixes))
    }
}

/// Validates a whole batch; the first failure aborts with its slot and field.
pub fn normalize_slots(
    inputs: &[SlotInput],
    table: &AffixTable,
) -> Result<AffixSlots, ValidationError> {
    let slots = inputs
        .iter()
        .map(|input| input.to_slot(table))
        .collect::<Result<Vec<_>, _>>()?;

    AffixSlots::try_from_slots(&slots).map_err(|e| match e {
        SlotSetError::IndexOutOfRange(index) | SlotSetError::DuplicateIndex(index) => {
            ValidationError::slot(index, InputField::SlotIndex)
        }
        SlotSetError::WrongCount { .. } => ValidationError::attribute(InputField::SlotIndex),
    })
}

fn fill_blank(text: &mut String, default: &str) {
    if text.trim().is_empty() {
        *text = default.to_string();
    }
}

pub(crate) fn parse_or_zero<T>(text: &str) -> Option<T>
where
    T: std::str::FromStr + Default,
{
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(T::default());
    }
    trimmed.parse().ok()
}
