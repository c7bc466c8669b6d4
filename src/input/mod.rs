//! Operator text normalization and validation
//!
//! Every field is parsed strictly; blank fields are replaced by their
//! defaults before validation. A batch either validates completely or
//! fails naming the first offending slot and field.

pub mod attributes;
pub mod charset;
pub mod slot;

pub use attributes::AttributeInput;
pub use charset::{is_affix_id_text_allowed, is_digits_only};
pub use slot::{normalize_slots, SlotInput};
