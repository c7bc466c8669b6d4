//! Attach/capture lifecycle and the slot diff-write protocol
//!
//! `AffixEngine` owns the single attached target, tracks the capture state
//! and keeps the read snapshot used to turn slot writes into minimal masked
//! writes. Every bridge call, including the base address query, runs on the
//! blocking pool under a caller-supplied timeout. A timed-out call is
//! abandoned and leaves engine state as it was before the call (writes
//! additionally drop the snapshot). Multi-slot calls stop between slots once
//! abandoned.

pub mod snapshot;

pub use snapshot::{diff_mask, plan_writes, SlotWrite, Snapshot, WritePlan};

use crate::bridge::{BridgeError, CaptureBridge};
use crate::core::types::{
    Address, AffixSlot, AffixSlots, CaptureState, EngineError, EngineResult,
    EquipmentAttributes, EquipmentKind, InputField, TargetProcess, ValidationError,
    SLOT_COUNT,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::{task, time};
use tracing::{debug, info, warn};

/// Converts a bridge failure into the engine taxonomy
fn bridge_error(op: &str, err: BridgeError) -> EngineError {
    match err {
        BridgeError::Failed(message) => EngineError::bridge(op, message),
        BridgeError::Unimplemented => {
            EngineError::Unavailable(format!("{}: capture engine not implemented", op))
        }
    }
}

/// Engine driving one capture bridge
pub struct AffixEngine {
    bridge: Arc<dyn CaptureBridge>,
    state: CaptureState,
    target: Option<TargetProcess>,
    snapshot: Option<Snapshot>,
}

impl AffixEngine {
    /// Creates a detached engine over `bridge`
    pub fn new(bridge: Arc<dyn CaptureBridge>) -> Self {
        AffixEngine {
            bridge,
            state: CaptureState::Detached,
            target: None,
            snapshot: None,
        }
    }

    /// Name of the underlying bridge implementation
    pub fn name(&self) -> &str {
        self.bridge.name()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_attached(&self) -> bool {
        self.state.is_attached()
    }

    pub fn is_capturing(&self) -> bool {
        self.state.is_capturing()
    }

    pub fn target(&self) -> Option<&TargetProcess> {
        self.target.as_ref()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Current base address as reported by the bridge, `None` unless capturing
    pub async fn base_address(&self, timeout: Duration) -> EngineResult<Option<Address>> {
        if !self.is_capturing() {
            return Ok(None);
        }
        self.call("query base address", timeout, |bridge| {
            Ok(bridge.equipment_base_address())
        })
        .await
    }

    /// Kind of the selected item, `Unknown` unless attached
    pub fn equipment_kind(&self) -> EquipmentKind {
        if !self.is_attached() {
            return EquipmentKind::Unknown;
        }
        self.bridge.equipment_kind()
    }

    /// Runs a bridge call on the blocking pool, abandoning it after `timeout`
    async fn call<T, F>(&self, op: &str, timeout: Duration, f: F) -> EngineResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn CaptureBridge) -> EngineResult<T> + Send + 'static,
    {
        self.call_steps(op, timeout, move |bridge, _| f(bridge)).await
    }

    /// Like [`AffixEngine::call`] for calls made of several bridge steps.
    ///
    /// The closure receives a flag that is raised when the caller stops
    /// waiting; it must check it between steps.
    async fn call_steps<T, F>(&self, op: &str, timeout: Duration, f: F) -> EngineResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn CaptureBridge, &AtomicBool) -> EngineResult<T> + Send + 'static,
    {
        let bridge = Arc::clone(&self.bridge);
        let abandoned = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&abandoned);
        let handle = task::spawn_blocking(move || f(bridge.as_ref(), &flag));

        match time::timeout(timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(EngineError::bridge(op, join_error.to_string())),
            Err(_) => {
                abandoned.store(true, Ordering::Release);
                warn!(op, timeout_ms = timeout.as_millis() as u64, "bridge call timed out");
                Err(EngineError::cancelled(op, timeout))
            }
        }
    }

    fn require_attached(&self) -> EngineResult<()> {
        if self.is_attached() {
            Ok(())
        } else {
            Err(EngineError::NotAttached)
        }
    }

    /// Checks the I/O preconditions and returns the live base address.
    ///
    /// The address query shares the caller's `timeout`. A snapshot taken
    /// under a different address is dropped here.
    async fn require_io_ready(&mut self, timeout: Duration) -> EngineResult<Address> {
        self.require_attached()?;
        if !self.is_capturing() {
            return Err(EngineError::CaptureNotEnabled);
        }

        let base = self
            .base_address(timeout)
            .await?
            .ok_or(EngineError::AddressNotObserved)?;

        if let Some(snapshot) = &self.snapshot {
            if !snapshot.is_valid_for(base) {
                debug!(old = %snapshot.base(), new = %base, "base address changed, dropping snapshot");
                self.snapshot = None;
            }
        }

        Ok(base)
    }

    /// Attaches to `target`
    pub async fn attach(&mut self, target: TargetProcess, timeout: Duration) -> EngineResult<()> {
        if let Some(current) = &self.target {
            return Err(EngineError::AlreadyAttached(current.pid));
        }

        let pid = target.pid;
        self.call("attach to process", timeout, move |bridge| {
            bridge
                .attach_process(pid)
                .map_err(|e| bridge_error("attach to process", e))
        })
        .await?;

        info!("Attached to {} via {}", target, self.bridge.name());
        self.state = CaptureState::Attached;
        self.target = Some(target);
        self.snapshot = None;
        Ok(())
    }

    /// Detaches from the current target.
    ///
    /// Capture is disabled first when enabled. Bridge failures and timeouts
    /// are logged and swallowed; the engine always ends up detached.
    pub async fn detach(&mut self, timeout: Duration) {
        if self.is_capturing() {
            let result = self
                .call("disable capture", timeout, |bridge| {
                    bridge
                        .disable_capture()
                        .map_err(|e| bridge_error("disable capture", e))
                })
                .await;
            if let Err(e) = result {
                warn!("Ignoring capture teardown failure: {}", e);
            }
        }

        if self.is_attached() {
            let result = self
                .call("detach from process", timeout, |bridge| {
                    bridge
                        .detach_process()
                        .map_err(|e| bridge_error("detach from process", e))
                })
                .await;
            if let Err(e) = result {
                warn!("Ignoring detach failure: {}", e);
            }
        }

        if let Some(target) = self.target.take() {
            info!("Detached from {}", target);
        }
        self.state = CaptureState::Detached;
        self.snapshot = None;
    }

    /// Enables capture; requires an attached target
    pub async fn enable_capture(&mut self, timeout: Duration) -> EngineResult<()> {
        self.require_attached()?;
        if self.is_capturing() {
            return Ok(());
        }

        self.call("enable capture", timeout, |bridge| {
            bridge
                .enable_capture()
                .map_err(|e| bridge_error("enable capture", e))
        })
        .await?;

        info!("Capture enabled");
        self.state = CaptureState::Capturing;
        Ok(())
    }

    /// Disables capture while staying attached
    pub async fn disable_capture(&mut self, timeout: Duration) -> EngineResult<()> {
        self.require_attached()?;
        if !self.is_capturing() {
            return Ok(());
        }

        self.call("disable capture", timeout, |bridge| {
            bridge
                .disable_capture()
                .map_err(|e| bridge_error("disable capture", e))
        })
        .await?;

        info!("Capture disabled");
        self.state = CaptureState::Attached;
        self.snapshot = None;
        Ok(())
    }

    /// Reads all 7 slots and stores them as the new snapshot.
    ///
    /// Any single slot failure aborts the whole read.
    pub async fn read_affix_slots(&mut self, timeout: Duration) -> EngineResult<AffixSlots> {
        let base = self.require_io_ready(timeout).await?;

        let slots = self
            .call_steps("read affix slots", timeout, |bridge, abandoned| {
                let mut slots = Vec::with_capacity(SLOT_COUNT);
                for index in 1..=SLOT_COUNT as u8 {
                    if abandoned.load(Ordering::Acquire) {
                        return Err(EngineError::bridge("read affix slots", "abandoned"));
                    }
                    let mut slot = bridge
                        .read_affix_slot(index)
                        .map_err(|e| bridge_error(&format!("read affix slot {}", index), e))?;
                    slot.index = index;
                    slots.push(slot);
                }
                AffixSlots::try_from_slots(&slots)
                    .map_err(|e| EngineError::bridge("read affix slots", e.to_string()))
            })
            .await?;

        debug!(base = %base, "affix slots read");
        self.snapshot = Some(Snapshot::new(base, slots));
        Ok(slots)
    }

    /// Writes `slots`, touching only fields that differ from the snapshot.
    ///
    /// Without a snapshot for the live address every field is written. Slots
    /// with nothing to change issue no bridge call. After a fully successful
    /// write of a complete set, that set becomes the snapshot.
    pub async fn write_affix_slots(
        &mut self,
        slots: &[AffixSlot],
        timeout: Duration,
    ) -> EngineResult<WritePlan> {
        let base = self.require_io_ready(timeout).await?;

        if let Some(bad) = slots.iter().find(|s| !s.has_valid_index()) {
            return Err(ValidationError::slot(bad.index, InputField::SlotIndex).into());
        }

        let plan = plan_writes(slots, self.snapshot.as_ref().map(Snapshot::slots));
        debug!(
            diffed = plan.diffed,
            writes = plan.writes.len(),
            skipped = plan.skipped,
            fields = plan.field_count(),
            "planned affix writes"
        );

        if !plan.is_noop() {
            let writes = plan.writes.clone();
            let result = self
                .call_steps("write affix slots", timeout, move |bridge, abandoned| {
                    for write in &writes {
                        if abandoned.load(Ordering::Acquire) {
                            debug!(slot = write.slot.index, "abandoned write stopped");
                            return Err(EngineError::bridge("write affix slots", "abandoned"));
                        }
                        bridge
                            .write_affix_slot_masked(&write.slot, write.mask)
                            .map_err(|e| {
                                bridge_error(&format!("write affix slot {}", write.slot.index), e)
                            })?;
                    }
                    Ok(())
                })
                .await;

            if let Err(e) = result {
                // Some slots may already be written; the snapshot no longer matches memory.
                self.snapshot = None;
                return Err(e);
            }
        }

        // An incomplete or duplicate set cannot serve as a baseline.
        self.snapshot = Snapshot::from_slots(base, slots);
        Ok(plan)
    }

    /// Reads the item attributes (no caching)
    pub async fn read_equipment_attributes(
        &mut self,
        timeout: Duration,
    ) -> EngineResult<EquipmentAttributes> {
        self.require_io_ready(timeout).await?;
        self.call("read equipment attributes", timeout, |bridge| {
            bridge
                .read_equipment_attributes()
                .map_err(|e| bridge_error("read equipment attributes", e))
        })
        .await
    }

    /// Writes every item attribute field
    pub async fn write_equipment_attributes(
        &mut self,
        data: &EquipmentAttributes,
        timeout: Duration,
    ) -> EngineResult<()> {
        self.require_io_ready(timeout).await?;
        let data = *data;
        self.call("write equipment attributes", timeout, move |bridge| {
            bridge
                .write_equipment_attributes(&data)
                .map_err(|e| bridge_error("write equipment attributes", e))
        })
        .await
    }

    /// Toggles the skill learning bypass; requires an attached target
    pub async fn set_skill_bypass(&mut self, enabled: bool, timeout: Duration) -> EngineResult<()> {
        self.require_attached()?;
        self.call("toggle skill bypass", timeout, move |bridge| {
            bridge
                .set_skill_bypass(enabled)
                .map_err(|e| bridge_error("toggle skill bypass", e))
        })
        .await?;
        info!(enabled, "Skill bypass toggled");
        Ok(())
    }

    pub fn is_skill_bypass_enabled(&self) -> bool {
        self.is_attached() && self.bridge.is_skill_bypass_enabled()
    }
}
