//! Basic equipment attributes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Item-level attributes of the selected equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EquipmentAttributes {
    pub item_id: i16,
    pub transmog_id: i16,
    pub level: i16,
    /// "+N" upgrade value
    pub plus_value: u8,
    pub quality: i32,
    pub underworld_skill_id: i32,
    pub familiarity: i32,
    pub is_underworld: bool,
}

/// Which kind of item the capture module last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentKind {
    #[default]
    Unknown,
    Weapon,
    Armor,
}

impl From<i32> for EquipmentKind {
    fn from(raw: i32) -> Self {
        match raw {
            1 => EquipmentKind::Weapon,
            2 => EquipmentKind::Armor,
            _ => EquipmentKind::Unknown,
        }
    }
}

impl fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EquipmentKind::Unknown => "unknown",
            EquipmentKind::Weapon => "weapon",
            EquipmentKind::Armor => "armor",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_raw() {
        assert_eq!(EquipmentKind::from(0), EquipmentKind::Unknown);
        assert_eq!(EquipmentKind::from(1), EquipmentKind::Weapon);
        assert_eq!(EquipmentKind::from(2), EquipmentKind::Armor);
        assert_eq!(EquipmentKind::from(-3), EquipmentKind::Unknown);
    }

    #[test]
    fn test_attributes_serialize() {
        let attrs = EquipmentAttributes {
            item_id: 12,
            transmog_id: -1,
            level: 160,
            plus_value: 3,
            quality: 4,
            underworld_skill_id: 77,
            familiarity: 900,
            is_underworld: true,
        };
        let json = serde_json::to_string(&attrs).unwrap();
        let back: EquipmentAttributes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, attrs);
    }
}
