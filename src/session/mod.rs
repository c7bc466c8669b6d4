//! Session orchestration over one engine
//!
//! A `Session` is the control surface an operator front end drives: it
//! starts and stops capture, refreshes the selected item into an
//! [`ItemView`], validates and applies edits, and runs the address poll.

pub mod poller;
pub mod view;

pub use poller::{Poller, RefreshGate, RefreshGuard, TickDecision};
pub use view::ItemView;

use crate::config::EngineConfig;
use crate::core::types::{
    AffixSlots, EngineError, EngineResult, EquipmentAttributes, TargetProcess,
};
use crate::engine::{AffixEngine, WritePlan};
use crate::input::{normalize_slots, AttributeInput, SlotInput};
use crate::tables::Tables;
use std::future::Future;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

/// Time budgets for each kind of bridge call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub attach: Duration,
    pub capture: Duration,
    pub io: Duration,
    pub teardown: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts {
            attach: Duration::from_secs(5),
            capture: Duration::from_secs(5),
            io: Duration::from_secs(5),
            teardown: Duration::from_secs(2),
        }
    }
}

impl From<&EngineConfig> for Timeouts {
    fn from(config: &EngineConfig) -> Self {
        Timeouts {
            attach: Duration::from_millis(config.attach_timeout_ms),
            capture: Duration::from_millis(config.capture_timeout_ms),
            io: Duration::from_millis(config.io_timeout_ms),
            teardown: Duration::from_millis(config.teardown_timeout_ms),
        }
    }
}

/// Result of one poll tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Skipped,
    Unchanged,
    Refreshed,
    RefreshFailed,
}

pub struct Session {
    engine: AffixEngine,
    tables: Tables,
    timeouts: Timeouts,
    poller: Poller,
    gate: RefreshGate,
    view: ItemView,
}

impl Session {
    pub fn new(engine: AffixEngine, tables: Tables, timeouts: Timeouts) -> Self {
        Session {
            engine,
            tables,
            timeouts,
            poller: Poller::new(),
            gate: RefreshGate::new(),
            view: ItemView::new(),
        }
    }

    pub fn engine(&self) -> &AffixEngine {
        &self.engine
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    pub fn view(&self) -> &ItemView {
        &self.view
    }

    /// Handle on the refresh-in-flight flag
    pub fn refresh_gate(&self) -> RefreshGate {
        self.gate.clone()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_capturing()
    }

    /// Attaches, enables capture and loads the selected item.
    ///
    /// A failure after attaching rolls the engine back to detached. A failed
    /// initial refresh is logged; the session still counts as started.
    pub async fn start(&mut self, target: TargetProcess) -> EngineResult<()> {
        self.engine.attach(target, self.timeouts.attach).await?;

        if let Err(e) = self.engine.enable_capture(self.timeouts.capture).await {
            self.stop().await;
            return Err(e);
        }

        self.poller.reset();
        info!("Session started");

        if let Err(e) = self.refresh_all().await {
            if e.is_address_not_observed() {
                info!("No item selected yet; open the equipment screen in game");
            } else {
                warn!("Initial refresh failed: {}", e);
            }
        }
        Ok(())
    }

    /// Best-effort teardown; always leaves the session stopped
    pub async fn stop(&mut self) {
        self.engine.detach(self.timeouts.teardown).await;
        self.poller.reset();
        self.view.set_base(None);
        info!("Session stopped");
    }

    pub async fn refresh_slots(&mut self) -> EngineResult<AffixSlots> {
        let slots = self.engine.read_affix_slots(self.timeouts.io).await?;
        self.view.set_slots(&slots, &self.tables.affixes);
        Ok(slots)
    }

    pub async fn refresh_attributes(&mut self) -> EngineResult<EquipmentAttributes> {
        let attrs = self.engine.read_equipment_attributes(self.timeouts.io).await?;
        self.view.set_attributes(&attrs, &self.tables.skills);
        Ok(attrs)
    }

    /// Reads slots, then attributes. Returns `false` without reading when
    /// another refresh holds the gate.
    pub async fn refresh_all(&mut self) -> EngineResult<bool> {
        let Some(_guard) = self.gate.try_begin() else {
            debug!("refresh already in flight");
            return Ok(false);
        };

        let slots = self.refresh_slots().await;
        let attrs = self.refresh_attributes().await;
        slots?;
        attrs?;
        Ok(true)
    }

    /// Validates all seven slot inputs, writes the changes and reads the slots back.
    ///
    /// Nothing is written when any input is invalid.
    pub async fn apply_slots(&mut self, inputs: &[SlotInput]) -> EngineResult<WritePlan> {
        if !self.engine.is_attached() {
            return Err(EngineError::NotAttached);
        }

        let slots = normalize_slots(inputs, &self.tables.affixes)?;
        let plan = self
            .engine
            .write_affix_slots(slots.as_slice(), self.timeouts.io)
            .await?;
        info!(
            writes = plan.writes.len(),
            skipped = plan.skipped,
            "Affix slots applied"
        );

        self.refresh_slots().await?;
        Ok(plan)
    }

    /// Validates and writes the attributes, then reads them back
    pub async fn apply_attributes(&mut self, input: &AttributeInput) -> EngineResult<()> {
        if !self.engine.is_attached() {
            return Err(EngineError::NotAttached);
        }

        let attrs = input.to_attributes(&self.tables.skills)?;
        self.engine
            .write_equipment_attributes(&attrs, self.timeouts.io)
            .await?;
        info!("Equipment attributes applied");

        self.refresh_attributes().await?;
        Ok(())
    }

    /// Last complete slot set read or written for the selected item
    pub fn current_slots(&self) -> Option<AffixSlots> {
        self.engine.snapshot().map(|snapshot| *snapshot.slots())
    }

    /// Text inputs for `slots`, as [`Session::apply_slots`] expects them
    pub fn inputs_for(&self, slots: &AffixSlots) -> Vec<SlotInput> {
        slots
            .iter()
            .map(|slot| SlotInput::from_slot(slot, &self.tables.affixes))
            .collect()
    }

    pub async fn set_skill_bypass(&mut self, enabled: bool) -> EngineResult<()> {
        self.engine
            .set_skill_bypass(enabled, self.timeouts.capture)
            .await
    }

    /// One poll tick: refreshes when the selected item changed
    pub async fn poll_tick(&mut self) -> TickOutcome {
        let capturing = self.engine.is_capturing();
        let base = match self.engine.base_address(self.timeouts.io).await {
            Ok(base) => base,
            Err(e) => {
                warn!("Base address query failed: {}", e);
                return TickOutcome::Skipped;
            }
        };
        let decision = self.poller.observe(capturing, self.gate.is_busy(), base);
        trace!(?decision, "poll tick");

        match decision {
            TickDecision::Idle => TickOutcome::Idle,
            TickDecision::Busy => TickOutcome::Skipped,
            TickDecision::Unchanged => {
                self.view.set_base(base);
                TickOutcome::Unchanged
            }
            TickDecision::Changed(addr) => {
                self.view.set_base(Some(addr));
                info!("Selected item changed to {}", addr);
                match self.refresh_all().await {
                    Ok(true) => {
                        info!("Refreshed item view\n{}", self.view);
                        TickOutcome::Refreshed
                    }
                    Ok(false) => TickOutcome::Skipped,
                    Err(e) => {
                        warn!("Refresh after item change failed: {}", e);
                        TickOutcome::RefreshFailed
                    }
                }
            }
        }
    }
}

/// Polls every `interval` until `shutdown` resolves.
///
/// Ticks missed while a refresh runs are dropped, not queued. Returns the
/// number of refreshes performed.
pub async fn run_polling<F>(session: &mut Session, interval: Duration, shutdown: F) -> usize
where
    F: Future<Output = ()>,
{
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut refreshes = 0;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                if session.poll_tick().await == TickOutcome::Refreshed {
                    refreshes += 1;
                }
            }
        }
    }
    debug!(refreshes, "polling stopped");
    refreshes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::UnavailableBridge;
    use std::sync::Arc;

    fn session() -> Session {
        Session::new(
            AffixEngine::new(Arc::new(UnavailableBridge)),
            Tables::bundled(),
            Timeouts::default(),
        )
    }

    #[test]
    fn test_timeouts_from_config() {
        let config = EngineConfig::default();
        let timeouts = Timeouts::from(&config);
        assert_eq!(timeouts, Timeouts::default());
    }

    #[tokio::test]
    async fn test_start_unavailable() {
        let mut session = session();
        let err = session
            .start(TargetProcess::new(42, "game.exe"))
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
        assert!(!session.is_running());
    }

    #[tokio::test]
    async fn test_apply_requires_attach() {
        let mut session = session();
        let inputs: Vec<SlotInput> = (1..=7).map(SlotInput::new).collect();
        assert!(matches!(
            session.apply_slots(&inputs).await,
            Err(EngineError::NotAttached)
        ));
        assert!(matches!(
            session.apply_attributes(&AttributeInput::default()).await,
            Err(EngineError::NotAttached)
        ));
    }

    #[tokio::test]
    async fn test_idle_tick() {
        let mut session = session();
        assert_eq!(session.poll_tick().await, TickOutcome::Idle);
    }

    #[tokio::test]
    async fn test_polling_stops_on_shutdown() {
        let mut session = session();
        let refreshes = run_polling(
            &mut session,
            Duration::from_millis(10),
            time::sleep(Duration::from_millis(50)),
        )
        .await;
        assert_eq!(refreshes, 0);
    }
}
