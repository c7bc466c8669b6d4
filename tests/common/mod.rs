//! Scripted capture bridge shared by the integration tests

#![allow(dead_code)]

use affix_engine::bridge::{BridgeError, BridgeResult, CaptureBridge};
use affix_engine::{
    Address, AffixEngine, AffixSlot, AffixSlots, EquipmentAttributes, EquipmentKind, FieldMask,
    ProcessId, TargetProcess, SLOT_COUNT,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

pub const T: Duration = Duration::from_millis(500);

pub const BASE_A: Address = Address::new(0x7FF6_1000_0000);
pub const BASE_B: Address = Address::new(0x7FF6_2000_0000);

/// One recorded masked write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedWrite {
    pub index: u8,
    pub mask: FieldMask,
}

#[derive(Debug, Default)]
struct FakeState {
    attached: bool,
    capturing: bool,
    base: Option<Address>,
    memory: Vec<AffixSlot>,
    attributes: EquipmentAttributes,
    kind: EquipmentKind,
    bypass: bool,
    writes: Vec<RecordedWrite>,
    attribute_writes: Vec<EquipmentAttributes>,
    calls: Vec<&'static str>,
    failing: HashSet<&'static str>,
    failing_slot: Option<u8>,
    slow: HashMap<&'static str, Duration>,
}

/// In-memory bridge that records every call and masked write.
///
/// Operation names used by `fail` and `slow`: `attach`, `detach`, `enable`,
/// `disable`, `read_slot`, `write_slot`, `read_attributes`,
/// `write_attributes`, `bypass`.
#[derive(Debug, Default)]
pub struct FakeBridge {
    state: Mutex<FakeState>,
    serial: AtomicBool,
    call_lock: Mutex<()>,
}

impl FakeBridge {
    pub fn new() -> Arc<Self> {
        let bridge = FakeBridge::default();
        bridge.lock().memory = AffixSlots::empty().to_vec();
        Arc::new(bridge)
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Makes every bridge call, the base address query included, wait for
    /// the previous one to finish, the way the native module behaves.
    pub fn serialize_calls(&self) {
        self.serial.store(true, Ordering::SeqCst);
    }

    fn serial_guard(&self) -> Option<MutexGuard<'_, ()>> {
        self.serial
            .load(Ordering::SeqCst)
            .then(|| self.call_lock.lock().unwrap())
    }

    pub fn set_base(&self, base: Option<Address>) {
        self.lock().base = base;
    }

    pub fn set_slot(&self, slot: AffixSlot) {
        self.lock().memory[slot.index as usize - 1] = slot;
    }

    pub fn slot(&self, index: u8) -> AffixSlot {
        self.lock().memory[index as usize - 1]
    }

    pub fn set_attributes(&self, attrs: EquipmentAttributes) {
        self.lock().attributes = attrs;
    }

    pub fn set_kind(&self, kind: EquipmentKind) {
        self.lock().kind = kind;
    }

    pub fn fail(&self, op: &'static str) {
        self.lock().failing.insert(op);
    }

    pub fn heal(&self, op: &'static str) {
        self.lock().failing.remove(op);
    }

    /// Fails reads and writes of one slot only
    pub fn fail_slot(&self, index: u8) {
        self.lock().failing_slot = Some(index);
    }

    pub fn slow(&self, op: &'static str, delay: Duration) {
        self.lock().slow.insert(op, delay);
    }

    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.lock().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.lock().writes.clear();
    }

    pub fn attribute_writes(&self) -> Vec<EquipmentAttributes> {
        self.lock().attribute_writes.clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub fn count(&self, op: &'static str) -> usize {
        self.lock().calls.iter().filter(|c| **c == op).count()
    }

    pub fn is_capturing(&self) -> bool {
        self.lock().capturing
    }

    /// Records the call, sleeps if scripted slow, then fails if scripted to
    fn enter(&self, op: &'static str) -> BridgeResult<()> {
        let _serial = self.serial_guard();
        let delay = {
            let mut state = self.lock();
            state.calls.push(op);
            state.slow.get(op).copied()
        };
        if let Some(delay) = delay {
            thread::sleep(delay);
        }
        if self.lock().failing.contains(op) {
            return Err(BridgeError::Failed(format!("{} rejected by fake", op)));
        }
        Ok(())
    }

    fn enter_slot(&self, op: &'static str, index: u8) -> BridgeResult<()> {
        self.enter(op)?;
        if self.lock().failing_slot == Some(index) {
            return Err(BridgeError::Failed(format!("slot {} unreadable", index)));
        }
        Ok(())
    }
}

impl CaptureBridge for FakeBridge {
    fn name(&self) -> &str {
        "Fake"
    }

    fn attach_process(&self, _pid: ProcessId) -> BridgeResult<()> {
        self.enter("attach")?;
        self.lock().attached = true;
        Ok(())
    }

    fn detach_process(&self) -> BridgeResult<()> {
        self.enter("detach")?;
        self.lock().attached = false;
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.lock().attached
    }

    fn enable_capture(&self) -> BridgeResult<()> {
        self.enter("enable")?;
        self.lock().capturing = true;
        Ok(())
    }

    fn disable_capture(&self) -> BridgeResult<()> {
        self.enter("disable")?;
        self.lock().capturing = false;
        Ok(())
    }

    fn is_capture_enabled(&self) -> bool {
        self.lock().capturing
    }

    fn equipment_base_address(&self) -> Option<Address> {
        let _serial = self.serial_guard();
        self.lock().base
    }

    fn read_affix_slot(&self, index: u8) -> BridgeResult<AffixSlot> {
        self.enter_slot("read_slot", index)?;
        Ok(self.lock().memory[index as usize - 1])
    }

    fn write_affix_slot_masked(&self, slot: &AffixSlot, mask: FieldMask) -> BridgeResult<()> {
        self.enter_slot("write_slot", slot.index)?;
        let mut state = self.lock();
        state.writes.push(RecordedWrite {
            index: slot.index,
            mask,
        });

        let target = &mut state.memory[slot.index as usize - 1];
        if mask.contains(FieldMask::ID) {
            target.id = slot.id;
        }
        if mask.contains(FieldMask::LEVEL) {
            target.level = slot.level;
        }
        for n in 0..4 {
            if mask.contains(FieldMask::prefix(n)) {
                target.prefixes[n] = slot.prefixes[n];
            }
        }
        Ok(())
    }

    fn read_equipment_attributes(&self) -> BridgeResult<EquipmentAttributes> {
        self.enter("read_attributes")?;
        Ok(self.lock().attributes)
    }

    fn write_equipment_attributes(&self, data: &EquipmentAttributes) -> BridgeResult<()> {
        self.enter("write_attributes")?;
        let mut state = self.lock();
        state.attributes = *data;
        state.attribute_writes.push(*data);
        Ok(())
    }

    fn equipment_kind(&self) -> EquipmentKind {
        self.lock().kind
    }

    fn set_skill_bypass(&self, enabled: bool) -> BridgeResult<()> {
        self.enter("bypass")?;
        self.lock().bypass = enabled;
        Ok(())
    }

    fn is_skill_bypass_enabled(&self) -> bool {
        self.lock().bypass
    }
}

/// A complete set with distinct values per slot
pub fn sample_slots() -> AffixSlots {
    let slots: Vec<AffixSlot> = (1..=SLOT_COUNT as u8)
        .map(|i| AffixSlot::new(i, 2000 + i as i32, i as i32 * 10, [i, i + 1, i + 2, i + 3]))
        .collect();
    AffixSlots::try_from_slots(&slots).unwrap()
}

/// Fills the fake's memory with `slots`
pub fn load_memory(bridge: &FakeBridge, slots: &AffixSlots) {
    for slot in slots.iter() {
        bridge.set_slot(*slot);
    }
}

pub fn target() -> TargetProcess {
    TargetProcess::new(4242, "Nioh3.exe")
}

/// Engine attached to a fresh fake with capture enabled and `BASE_A` selected
pub async fn capturing_engine() -> (Arc<FakeBridge>, AffixEngine) {
    let bridge = FakeBridge::new();
    bridge.set_base(Some(BASE_A));
    load_memory(&bridge, &sample_slots());
    let mut engine = AffixEngine::new(bridge.clone());
    engine.attach(target(), T).await.unwrap();
    engine.enable_capture(T).await.unwrap();
    (bridge, engine)
}
