//! Read-snapshot cache and masked diff planning
//!
//! The snapshot is a size-1 cache keyed by the base address it was read
//! under. A write diffs each slot against it only while that key matches the
//! live address; otherwise every field is written.

use crate::core::types::{Address, AffixSlot, AffixSlots, FieldMask};

/// Last complete slot set together with the address it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    base: Address,
    slots: AffixSlots,
}

impl Snapshot {
    pub fn new(base: Address, slots: AffixSlots) -> Self {
        Snapshot { base, slots }
    }

    /// Builds a snapshot from an arbitrary slot list, `None` unless it is a complete unique set
    pub fn from_slots(base: Address, slots: &[AffixSlot]) -> Option<Self> {
        AffixSlots::try_from_slots(slots)
            .ok()
            .map(|slots| Snapshot::new(base, slots))
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn slots(&self) -> &AffixSlots {
        &self.slots
    }

    /// Whether the snapshot may serve as a diff baseline at `base`
    pub fn is_valid_for(&self, base: Address) -> bool {
        self.base == base
    }
}

/// Fields of `new` that differ from `old`
pub fn diff_mask(new: &AffixSlot, old: &AffixSlot) -> FieldMask {
    let mut mask = FieldMask::EMPTY;
    if new.id != old.id {
        mask |= FieldMask::ID;
    }
    if new.level != old.level {
        mask |= FieldMask::LEVEL;
    }
    for (n, (a, b)) in new.prefixes.iter().zip(old.prefixes.iter()).enumerate() {
        if a != b {
            mask |= FieldMask::prefix(n);
        }
    }
    mask
}

/// One pending masked write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWrite {
    pub slot: AffixSlot,
    pub mask: FieldMask,
}

/// Writes to issue for a slot list, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WritePlan {
    pub writes: Vec<SlotWrite>,
    /// Slots left out because nothing changed
    pub skipped: usize,
    /// Whether a baseline was used
    pub diffed: bool,
}

impl WritePlan {
    /// Total number of individual fields the plan touches
    pub fn field_count(&self) -> u32 {
        self.writes.iter().map(|w| w.mask.count()).sum()
    }

    pub fn is_noop(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Plans masked writes for `slots`.
///
/// With a baseline, each slot gets the mask of fields that differ from the
/// baseline slot at the same index and unchanged slots are dropped. Without
/// one, every slot is written with [`FieldMask::ALL`].
pub fn plan_writes(slots: &[AffixSlot], baseline: Option<&AffixSlots>) -> WritePlan {
    let mut plan = WritePlan {
        diffed: baseline.is_some(),
        ..WritePlan::default()
    };

    for slot in slots {
        let mask = match baseline.and_then(|b| b.get(slot.index)) {
            Some(old) => diff_mask(slot, old),
            None => FieldMask::ALL,
        };

        if mask.is_empty() {
            plan.skipped += 1;
            continue;
        }
        plan.writes.push(SlotWrite { slot: *slot, mask });
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set() -> AffixSlots {
        let slots: Vec<AffixSlot> = (1..=7)
            .map(|i| AffixSlot::new(i, 1000 + i as i32, 10, [1, 2, 3, 4]))
            .collect();
        AffixSlots::try_from_slots(&slots).unwrap()
    }

    #[test]
    fn test_diff_mask_per_field() {
        let old = AffixSlot::new(1, 5, 10, [1, 2, 3, 4]);
        assert_eq!(diff_mask(&old, &old), FieldMask::EMPTY);

        let mut new = old;
        new.id = 6;
        assert_eq!(diff_mask(&new, &old), FieldMask::ID);

        let mut new = old;
        new.level = 11;
        new.prefixes[2] = 99;
        assert_eq!(diff_mask(&new, &old), FieldMask::LEVEL | FieldMask::PREFIX3);
    }

    #[test]
    fn test_plan_without_baseline_writes_everything() {
        let baseline = set();
        let plan = plan_writes(baseline.as_slice(), None);
        assert!(!plan.diffed);
        assert_eq!(plan.writes.len(), 7);
        assert!(plan.writes.iter().all(|w| w.mask == FieldMask::ALL));
        assert_eq!(plan.field_count(), 42);
    }

    #[test]
    fn test_plan_unchanged_is_noop() {
        let baseline = set();
        let plan = plan_writes(baseline.as_slice(), Some(&baseline));
        assert!(plan.is_noop());
        assert_eq!(plan.skipped, 7);
    }

    #[test]
    fn test_plan_single_field_change() {
        let baseline = set();
        let mut slots = baseline.to_vec();
        slots[4].prefixes[0] = 200;

        let plan = plan_writes(&slots, Some(&baseline));
        assert_eq!(
            plan.writes,
            vec![SlotWrite {
                slot: slots[4],
                mask: FieldMask::PREFIX1
            }]
        );
        assert_eq!(plan.skipped, 6);
    }

    #[test]
    fn test_snapshot_validity() {
        let snapshot = Snapshot::new(Address::new(0x1000), set());
        assert!(snapshot.is_valid_for(Address::new(0x1000)));
        assert!(!snapshot.is_valid_for(Address::new(0x2000)));

        let partial = set().to_vec()[..5].to_vec();
        assert!(Snapshot::from_slots(Address::new(0x1000), &partial).is_none());
        assert!(Snapshot::from_slots(Address::new(0x1000), set().as_slice()).is_some());
    }
}
