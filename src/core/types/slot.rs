//! Affix slot records, complete slot sets and write field masks

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use thiserror::Error;

/// Number of affix slots on an item
pub const SLOT_COUNT: usize = 7;

/// Affix id stored in an empty slot
pub const EMPTY_AFFIX_ID: i32 = -1;

/// One affix slot as read from or written to the target process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AffixSlot {
    /// 1-based slot index (1..=7)
    pub index: u8,
    pub id: i32,
    pub level: i32,
    pub prefixes: [u8; 4],
}

impl AffixSlot {
    pub const fn new(index: u8, id: i32, level: i32, prefixes: [u8; 4]) -> Self {
        AffixSlot {
            index,
            id,
            level,
            prefixes,
        }
    }

    /// A slot holding the empty sentinel and zeroed fields
    pub const fn empty(index: u8) -> Self {
        AffixSlot::new(index, EMPTY_AFFIX_ID, 0, [0; 4])
    }

    pub const fn is_empty(&self) -> bool {
        self.id == EMPTY_AFFIX_ID
    }

    /// Whether the index lies in 1..=7
    pub const fn has_valid_index(&self) -> bool {
        self.index >= 1 && self.index as usize <= SLOT_COUNT
    }

    /// 0-based position used by the capture module
    pub const fn position(&self) -> usize {
        self.index as usize - 1
    }
}

/// Bitset selecting which fields of a slot a masked write touches.
///
/// Bit layout matches the native module: bit0 id, bit1 level, bit2..bit5 prefix1..prefix4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FieldMask(u32);

impl FieldMask {
    pub const EMPTY: FieldMask = FieldMask(0);
    pub const ID: FieldMask = FieldMask(1 << 0);
    pub const LEVEL: FieldMask = FieldMask(1 << 1);
    pub const PREFIX1: FieldMask = FieldMask(1 << 2);
    pub const PREFIX2: FieldMask = FieldMask(1 << 3);
    pub const PREFIX3: FieldMask = FieldMask(1 << 4);
    pub const PREFIX4: FieldMask = FieldMask(1 << 5);
    pub const ALL: FieldMask = FieldMask(0b11_1111);

    /// Mask bit for prefix `n` (0-based, 0..4)
    pub const fn prefix(n: usize) -> FieldMask {
        FieldMask(1 << (2 + n))
    }

    pub const fn from_bits(bits: u32) -> FieldMask {
        FieldMask(bits & Self::ALL.0)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_all(&self) -> bool {
        self.0 == Self::ALL.0
    }

    pub const fn contains(&self, other: FieldMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: FieldMask) {
        self.0 |= other.0;
    }

    /// Number of fields selected
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

impl BitOr for FieldMask {
    type Output = FieldMask;

    fn bitor(self, rhs: FieldMask) -> FieldMask {
        FieldMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for FieldMask {
    fn bitor_assign(&mut self, rhs: FieldMask) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for FieldMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#08b}", self.0)
    }
}

/// Why a list of slots is not a complete set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotSetError {
    #[error("expected {expected} slots, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("slot index {0} is outside 1..=7")]
    IndexOutOfRange(u8),

    #[error("slot index {0} appears more than once")]
    DuplicateIndex(u8),
}

/// A complete set of 7 slots with unique indices, stored in index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AffixSlots([AffixSlot; SLOT_COUNT]);

impl AffixSlots {
    /// Builds a complete set from slots in any order
    pub fn try_from_slots(slots: &[AffixSlot]) -> Result<Self, SlotSetError> {
        if slots.len() != SLOT_COUNT {
            return Err(SlotSetError::WrongCount {
                expected: SLOT_COUNT,
                actual: slots.len(),
            });
        }

        let mut ordered: [Option<AffixSlot>; SLOT_COUNT] = [None; SLOT_COUNT];
        for slot in slots {
            if !slot.has_valid_index() {
                return Err(SlotSetError::IndexOutOfRange(slot.index));
            }
            let entry = &mut ordered[slot.position()];
            if entry.is_some() {
                return Err(SlotSetError::DuplicateIndex(slot.index));
            }
            *entry = Some(*slot);
        }

        // 7 unique in-range indices over 7 entries leave no gaps.
        let mut out = [AffixSlot::empty(1); SLOT_COUNT];
        for (i, entry) in ordered.into_iter().enumerate() {
            out[i] = entry.unwrap_or(AffixSlot::empty(i as u8 + 1));
        }
        Ok(AffixSlots(out))
    }

    /// A set where every slot is empty
    pub fn empty() -> Self {
        let mut out = [AffixSlot::empty(1); SLOT_COUNT];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = AffixSlot::empty(i as u8 + 1);
        }
        AffixSlots(out)
    }

    /// Slot by 1-based index
    pub fn get(&self, index: u8) -> Option<&AffixSlot> {
        if index == 0 {
            return None;
        }
        self.0.get(index as usize - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AffixSlot> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[AffixSlot] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<AffixSlot> {
        self.0.to_vec()
    }
}

impl TryFrom<Vec<AffixSlot>> for AffixSlots {
    type Error = SlotSetError;

    fn try_from(slots: Vec<AffixSlot>) -> Result<Self, Self::Error> {
        AffixSlots::try_from_slots(&slots)
    }
}
