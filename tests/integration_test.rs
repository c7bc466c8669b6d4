//! Integration tests for core types, input normalization and configuration

use affix_engine::config::{load_config, validate_config, ConfigLoader};
use affix_engine::core::types::*;
use affix_engine::input::{
    is_affix_id_text_allowed, is_digits_only, normalize_slots, AttributeInput, SlotInput,
};
use affix_engine::tables::{AffixTable, SkillTable};
use affix_engine::Timeouts;
use pretty_assertions::assert_eq;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_empty_inputs_normalize_to_defaults() {
    let table = AffixTable::bundled();
    let inputs: Vec<SlotInput> = (1..=7).map(SlotInput::new).collect();
    let slots = normalize_slots(&inputs, &table).unwrap();
    assert_eq!(slots, AffixSlots::empty());
}

#[test]
fn test_first_failure_names_slot_and_field() {
    let table = AffixTable::bundled();
    let mut inputs: Vec<SlotInput> = (1..=7).map(SlotInput::new).collect();
    inputs[2].level = "ten".to_string();
    inputs[4].affix_id = "12x".to_string();

    let err = normalize_slots(&inputs, &table).unwrap_err();
    assert_eq!(err.to_string(), "Slot 3: invalid level");

    let engine_err: EngineError = err.into();
    assert!(matches!(engine_err, EngineError::Validation(_)));
    assert!(!engine_err.is_precondition());
}

#[test]
fn test_keystroke_checks_accept_what_normalization_accepts() {
    let table = AffixTable::bundled();
    for text in ["", "FFFFFFFF", "-", "123", "-1"] {
        assert!(is_affix_id_text_allowed(text));
        let mut input = SlotInput::new(1);
        input.affix_id = text.to_string();
        assert!(input.to_slot(&table).is_ok(), "{text:?}");
    }
    assert!(is_digits_only("255"));
    assert!(!is_digits_only("2a"));
}

#[test]
fn test_unchanged_attributes_keep_colliding_skill() {
    let skills = SkillTable::parse("id,name\n1,A\n2,A\n3,A (1)\n");
    for skill in 1..=3 {
        let attrs = EquipmentAttributes {
            underworld_skill_id: skill,
            ..Default::default()
        };
        let input = AttributeInput::from_attributes(&attrs, &skills);
        assert_eq!(input.to_attributes(&skills).unwrap(), attrs);
    }
}

#[test]
fn test_mask_layout_matches_module() {
    assert_eq!(FieldMask::ID.bits(), 0x01);
    assert_eq!(FieldMask::LEVEL.bits(), 0x02);
    assert_eq!(FieldMask::PREFIX1.bits(), 0x04);
    assert_eq!(FieldMask::PREFIX4.bits(), 0x20);
    assert_eq!(FieldMask::ALL.bits(), 0x3F);
}

#[test]
fn test_config_file_drives_timeouts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
            [engine]
            io_timeout_ms = 1500
            teardown_timeout_ms = 750

            [logging]
            level = "debug"
        "#,
    )
    .unwrap();

    let config = load_config(Some(path.as_path())).unwrap();
    validate_config(&config).unwrap();
    let timeouts = Timeouts::from(&config.engine);
    assert_eq!(timeouts.io, Duration::from_millis(1500));
    assert_eq!(timeouts.teardown, Duration::from_millis(750));
    assert_eq!(timeouts.attach, Duration::from_secs(5));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_invalid_config_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[engine]\npoll_interval_ms = 5\n").unwrap();

    let config = ConfigLoader::new(&path).load().unwrap();
    assert!(validate_config(&config).is_err());
}
