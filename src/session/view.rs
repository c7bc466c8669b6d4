//! Text state shown to an operator for the selected item

use crate::core::types::{Address, AffixSlots, EquipmentAttributes, SLOT_COUNT};
use crate::input::{AttributeInput, SlotInput};
use crate::tables::{AffixTable, SkillTable};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    /// `0x…` of the selected item, `-` when none
    pub base_text: String,
    pub slots: Vec<SlotInput>,
    pub attributes: AttributeInput,
}

impl Default for ItemView {
    fn default() -> Self {
        ItemView {
            base_text: Address::display_or_dash(None),
            slots: (1..=SLOT_COUNT as u8).map(SlotInput::new).collect(),
            attributes: AttributeInput::default(),
        }
    }
}

impl ItemView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_base(&mut self, base: Option<Address>) {
        self.base_text = Address::display_or_dash(base);
    }

    pub fn set_slots(&mut self, slots: &AffixSlots, table: &AffixTable) {
        self.slots = slots
            .iter()
            .map(|slot| SlotInput::from_slot(slot, table))
            .collect();
    }

    pub fn set_attributes(&mut self, attrs: &EquipmentAttributes, skills: &SkillTable) {
        self.attributes = AttributeInput::from_attributes(attrs, skills);
    }
}

impl fmt::Display for ItemView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Item @ {}", self.base_text)?;
        for slot in &self.slots {
            writeln!(
                f,
                "  [{}] {} Lv{} prefix {}/{}/{}/{}",
                slot.index,
                slot.affix_id,
                slot.level,
                slot.prefixes[0],
                slot.prefixes[1],
                slot.prefixes[2],
                slot.prefixes[3]
            )?;
        }
        let a = &self.attributes;
        write!(
            f,
            "  item {} transmog {} level {} +{} quality {} skill {} familiarity {}{}",
            a.item_id,
            a.transmog_id,
            a.level,
            a.plus_value,
            a.quality,
            a.underworld_skill,
            a.familiarity,
            if a.is_underworld { " (underworld)" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AffixSlot;

    #[test]
    fn test_default_view() {
        let view = ItemView::new();
        assert_eq!(view.base_text, "-");
        assert_eq!(view.slots.len(), 7);
        assert_eq!(view.slots[6].index, 7);
    }

    #[test]
    fn test_set_slots_formats_ids() {
        let table = AffixTable::parse("12,Fire Damage\n");
        let mut slots = AffixSlots::empty().to_vec();
        slots[0] = AffixSlot::new(1, 12, 0, [0; 4]);
        let set = AffixSlots::try_from_slots(&slots).unwrap();

        let mut view = ItemView::new();
        view.set_slots(&set, &table);
        view.set_base(Some(Address::new(0xABC)));
        assert_eq!(view.slots[0].affix_id, "Fire Damage (12)");
        assert_eq!(view.slots[1].affix_id, "FFFFFFFF");
        assert_eq!(view.base_text, "0xABC");
        assert!(view.to_string().contains("[1] Fire Damage (12) Lv0"));
    }
}
