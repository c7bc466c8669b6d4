//! Equipment attribute text → validated attributes

use super::slot::parse_or_zero;
use crate::core::types::{EquipmentAttributes, InputField, ValidationError};
use crate::tables::SkillTable;
use serde::{Deserialize, Serialize};

/// Operator-facing text for the selected item's attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInput {
    pub item_id: String,
    pub transmog_id: String,
    pub level: String,
    pub plus_value: String,
    pub quality: String,
    pub underworld_skill: String,
    pub familiarity: String,
    pub is_underworld: bool,
}

impl AttributeInput {
    pub fn from_attributes(attrs: &EquipmentAttributes, skills: &SkillTable) -> Self {
        AttributeInput {
            item_id: attrs.item_id.to_string(),
            transmog_id: attrs.transmog_id.to_string(),
            level: attrs.level.to_string(),
            plus_value: attrs.plus_value.to_string(),
            quality: attrs.quality.to_string(),
            underworld_skill: skills.format(attrs.underworld_skill_id),
            familiarity: attrs.familiarity.to_string(),
            is_underworld: attrs.is_underworld,
        }
    }

    /// Validates every field; blank numeric fields become 0
    pub fn to_attributes(&self, skills: &SkillTable) -> Result<EquipmentAttributes, ValidationError> {
        let invalid = ValidationError::attribute;

        let item_id = parse_or_zero::<i16>(&self.item_id).ok_or(invalid(InputField::ItemId))?;
        let transmog_id =
            parse_or_zero::<i16>(&self.transmog_id).ok_or(invalid(InputField::TransmogId))?;
        let level = parse_or_zero::<i16>(&self.level)
            .filter(|v| *v >= 0)
            .ok_or(invalid(InputField::ItemLevel))?;
        let plus_value =
            parse_or_zero::<u8>(&self.plus_value).ok_or(invalid(InputField::PlusValue))?;
        let quality = parse_or_zero::<i32>(&self.quality)
            .filter(|v| *v >= 0)
            .ok_or(invalid(InputField::Quality))?;
        let underworld_skill_id = skills
            .resolve(&self.underworld_skill)
            .ok_or(invalid(InputField::UnderworldSkill))?;
        let familiarity = parse_or_zero::<i32>(&self.familiarity)
            .filter(|v| *v >= 0)
            .ok_or(invalid(InputField::Familiarity))?;

        Ok(EquipmentAttributes {
            item_id,
            transmog_id,
            level,
            plus_value,
            quality,
            underworld_skill_id,
            familiarity,
            is_underworld: self.is_underworld,
        })
    }
}
