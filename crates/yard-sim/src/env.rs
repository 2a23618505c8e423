//! The `YardEnv` struct and its step function.

use log::{debug, info, warn};

use yard_core::{Cell, Item, ItemId, ItemStatus, Road, SimRng};
use yard_feed::ArrivalRecord;

use crate::motion::{apply_move, binary_forward};
use crate::rewards::{
    crossed_boundary, shaping, ARRIVAL_REWARD, COMPLETION_REWARD, DELIVERY_REWARD,
    INVALID_ACTION_PENALTY,
};
use crate::{
    Action, Admission, Carrier, EpisodeSummary, RecoveryError, SimResult, StepEvent,
    StepRecord, StrategySource, TaskQueue, Yard, YardObserver, NoopObserver,
};

// ── Step types ────────────────────────────────────────────────────────────────

/// What the caller observes after a step.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct EnvState {
    pub agent_position:  Cell,
    /// `(0, 0)` while idle.
    pub target_position: Cell,
    pub carrying:        bool,
}

/// Coarse environment phase at the end of a step.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Phase {
    /// No target.
    Idle,
    /// Heading for a pickup or an interference origin.
    Seeking,
    /// Loaded, heading for a road.
    Delivering,
    /// At least one conflict was resolved this step.
    Resolving,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StepInfo {
    pub phase:     Phase,
    /// Conflicts resolved this step.
    pub conflicts: u32,
    pub events:    Vec<StepEvent>,
}

/// Result of [`YardEnv::step`].
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub state:  EnvState,
    pub reward: f64,
    pub done:   bool,
    pub info:   StepInfo,
}

// ── YardEnv ───────────────────────────────────────────────────────────────────

/// The simulation environment.
///
/// Owns the yard, the carrier, and the task stacks.  Each call to
/// [`step`][Self::step] applies one movement action:
///
/// 1. **Admit** cached items whose start date has been reached.
/// 2. **Stride**: per-axis step length from the distance to the target.
/// 3. **Target**: when idle, pop a pending task, else pick the resident that
///    should leave next (jumping the clock forward if none is due yet).
/// 4. **Conflicts**: resolve overlaps between the loaded carrier and
///    residents.
/// 5. **Move** the carrier.
/// 6. **Shaping** reward toward the target.
/// 7. **Arrival**: deliver, reinsert a parked item, or pick up.
/// 8. **Sweep** one resident that has left the yard bounds.
/// 9. **Completion**: no items and no work left ends the episode.
///
/// Create via [`YardEnvBuilder`][crate::YardEnvBuilder].
pub struct YardEnv<S: StrategySource = SimRng> {
    pub yard:    Yard,
    pub carrier: Carrier,
    pub tasks:   TaskQueue,
    /// Current carrier target.  Reported as [`Cell::IDLE`] in [`EnvState`]
    /// when there is none; `(0, 0)` itself is a valid road exit.
    pub target:  Option<Cell>,

    /// Picks the strategy for each conflict.
    pub strategy: S,

    pub conflict_count: u32,
    pub total_reward:   f64,
    /// Effective steps taken.  Calls after completion are not counted.
    pub steps:          u64,

    finished: bool,
    next_id:  u32,
}

impl<S: StrategySource> YardEnv<S> {
    pub(crate) fn from_parts(yard: Yard, strategy: S) -> Self {
        Self {
            yard,
            carrier: Carrier::new(Cell::IDLE),
            tasks: TaskQueue::new(),
            target: None,
            strategy,
            conflict_count: 0,
            total_reward: 0.0,
            steps: 0,
            finished: false,
            next_id: 0,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Admit an item from the arrival feed under a fresh [`ItemId`].
    pub fn arrive(&mut self, record: ArrivalRecord) -> SimResult<Admission> {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.yard.check_arrival(record.into_item(id))
    }

    pub fn state(&self) -> EnvState {
        EnvState {
            agent_position:  self.carrier.position(),
            target_position: self.target.unwrap_or(Cell::IDLE),
            carrying:        self.carrier.is_loaded(),
        }
    }

    /// Has the episode completed?
    pub fn is_done(&self) -> bool {
        self.finished
    }

    /// No items anywhere but the exit list, and nothing left to do.
    pub fn is_complete(&self) -> bool {
        self.target.is_none()
            && self.tasks.is_idle()
            && !self.carrier.is_loaded()
            && self.yard.grid.is_empty()
            && self.yard.cache.is_empty()
    }

    /// Where item `id` currently lives.  `None` for unknown ids.
    pub fn status_of(&self, id: ItemId) -> Option<ItemStatus> {
        if self.yard.cache.iter().any(|item| item.id == id) {
            return Some(ItemStatus::Cached);
        }
        if self.yard.grid.find(id).is_some() {
            return Some(ItemStatus::Resident);
        }
        let carried = self.carrier.payload().is_some_and(|item| item.id == id)
            || self
                .tasks
                .interfering()
                .iter()
                .any(|i| i.parked.as_ref().is_some_and(|item| item.id == id));
        if carried {
            return Some(ItemStatus::Carried);
        }
        if self.yard.out_list.iter().any(|record| record.item_id == id) {
            return Some(ItemStatus::Exited);
        }
        None
    }

    pub fn summary(&self) -> EpisodeSummary {
        EpisodeSummary {
            steps:          self.steps,
            total_reward:   self.total_reward,
            conflict_count: self.conflict_count,
            exits:          self.yard.out_list.len(),
            completed:      self.finished,
        }
    }

    /// Apply one action.  See [`step_with`][Self::step_with].
    pub fn step(&mut self, action: u8) -> SimResult<Step> {
        self.step_with(action, &mut NoopObserver)
    }

    /// Apply one action, reporting records to `observer`.
    ///
    /// After completion every call returns `done = true` with zero reward
    /// and changes nothing.
    pub fn step_with<O: YardObserver>(&mut self, action: u8, observer: &mut O) -> SimResult<Step> {
        if self.finished {
            return Ok(Step {
                state:  self.state(),
                reward: 0.0,
                done:   true,
                info:   StepInfo { phase: Phase::Idle, conflicts: 0, events: Vec::new() },
            });
        }
        self.steps += 1;
        let width = self.yard.width();
        let height = self.yard.height();
        let mut reward = 0.0;
        let mut events = Vec::new();

        // ── ① Admit due arrivals ──────────────────────────────────────────
        self.yard.flush_cache(&mut events);

        // ── ② Stride ──────────────────────────────────────────────────────
        let stride = binary_forward(
            self.carrier.position(),
            self.target.unwrap_or(Cell::IDLE),
            width,
            height,
        );

        // ── ③ Target selection ────────────────────────────────────────────
        if self.target.is_none() {
            if self.is_complete() {
                return Ok(self.finish_step(action, reward, 0, events, observer));
            }
            self.select_target(&mut events);
        }

        // ── ④ Conflicts ───────────────────────────────────────────────────
        let report = self.resolve_conflicts();
        reward -= report.penalty;
        events.extend(report.events);

        // ── ⑤ Move ────────────────────────────────────────────────────────
        match Action::try_from(action) {
            Ok(action) => {
                let to = apply_move(self.carrier.rect(), action, stride, width, height);
                self.carrier.move_to(to);
            }
            Err(id) => {
                warn!("step {}: invalid action {id}", self.steps);
                events.push(StepEvent::InvalidAction(id));
                reward -= INVALID_ACTION_PENALTY;
            }
        }

        // ── ⑥ Shaping ─────────────────────────────────────────────────────
        reward += shaping(self.carrier.position(), self.target, width);

        // ── ⑦ Arrival ─────────────────────────────────────────────────────
        if self.target == Some(self.carrier.position()) {
            reward += ARRIVAL_REWARD;
            reward += self.on_arrival(&mut events, observer);
        }

        // ── ⑧ Boundary sweep ──────────────────────────────────────────────
        if let Some(item) = self.yard.grid.sweep_exits(width, height) {
            self.exit_item(item, true, &mut events, observer);
        }

        // ── ⑨ Idle clock jump ─────────────────────────────────────────────
        if self.target.is_none() && self.tasks.is_idle() && !self.carrier.is_loaded() {
            if let Some(to) = self.yard.advance_clock() {
                events.push(StepEvent::ClockAdvanced { to });
            }
        }

        Ok(self.finish_step(action, reward, report.conflicts, events, observer))
    }

    // ── Step phases ───────────────────────────────────────────────────────

    /// Pick the next target while idle.
    fn select_target(&mut self, events: &mut Vec<StepEvent>) {
        if self.carrier.is_loaded() {
            self.route_to_road(self.carrier.position());
            return;
        }
        if let Some(next) = self.tasks.pop() {
            self.target = Some(next);
            return;
        }
        if self.tasks.has_interference() {
            let pending = self.tasks.interfering().len();
            self.recover(RecoveryError::StrandedInterference { pending }, events);
        }
        if self.take_due_exit(events) {
            return;
        }
        if let Some(to) = self.yard.advance_clock() {
            events.push(StepEvent::ClockAdvanced { to });
            self.yard.flush_cache(events);
            self.take_due_exit(events);
        }
    }

    /// Target the earliest-exit resident if its exit date has come.
    fn take_due_exit(&mut self, events: &mut Vec<StepEvent>) -> bool {
        let now = self.yard.now();
        let Some(item) = self.yard.earliest_exit_candidate() else {
            return false;
        };
        if !item.may_exit(now) {
            return false;
        }
        let (cell, label) = (item.cell(), item.label.clone());
        self.tasks.push(cell);
        self.target = self.tasks.next_target();
        debug!("target {label} at {cell}");
        events.push(StepEvent::TargetSelected { label, cell });
        true
    }

    /// Handle the carrier reaching its target.  Returns extra reward.
    fn on_arrival<O: YardObserver>(&mut self, events: &mut Vec<StepEvent>, observer: &mut O) -> f64 {
        let here = self.carrier.position();

        if self.carrier.is_loaded() {
            if crossed_boundary(self.carrier.rect(), self.yard.width(), self.yard.height()) {
                self.deliver(events, observer);
                return DELIVERY_REWARD;
            }
            let cause = RecoveryError::LoadedAtInterior { cell: here, label: self.carrier.label() };
            warn!("{cause}; rerouting to a road");
            events.push(StepEvent::Recovery(cause));
            self.route_to_road(here);
            return 0.0;
        }

        if self.tasks.top_interference().is_some_and(|record| record.origin == here) {
            if let Some(record) = self.tasks.pop_interference() {
                match record.parked {
                    Some(item) => self.reinsert(item, record.label, events),
                    None => {
                        let cause = RecoveryError::NothingParked { cell: here, label: record.label };
                        warn!("{cause}");
                        events.push(StepEvent::Recovery(cause));
                    }
                }
            }
            self.target = self.tasks.next_target();
            return 0.0;
        }

        match self.yard.grid.remove(here) {
            Some(item) => self.pick_up(item, events),
            None => {
                events.push(StepEvent::EmptyRemoval { cell: here });
                self.recover(RecoveryError::MissingItem { cell: here }, events);
            }
        }
        0.0
    }

    fn pick_up(&mut self, item: Item, events: &mut Vec<StepEvent>) {
        let label = item.label.clone();
        let cell = item.cell();
        self.carrier.load(item);
        let road = self.route_to_road(cell);
        info!("picked up {label} at {cell}, heading {}", road.map_or("nowhere", |r| r.as_str()));
        events.push(StepEvent::PickedUp { label, cell, road });
    }

    /// Unload past a boundary: park a displaced item, otherwise exit it.
    fn deliver<O: YardObserver>(&mut self, events: &mut Vec<StepEvent>, observer: &mut O) {
        let Some(item) = self.carrier.unload() else { return };
        if self.tasks.is_displaced(item.id) {
            let label = item.label.clone();
            match self.tasks.park(item) {
                Ok(()) => {
                    debug!("parked {label}");
                    events.push(StepEvent::Parked { label });
                }
                Err(item) => self.exit_item(item, false, events, observer),
            }
        } else {
            self.exit_item(item, false, events, observer);
        }
        self.target = self.tasks.next_target();
    }

    fn exit_item<O: YardObserver>(
        &mut self,
        item:     Item,
        swept:    bool,
        events:   &mut Vec<StepEvent>,
        observer: &mut O,
    ) {
        let label = item.label.clone();
        let record = self.yard.record_exit(item, self.steps, swept);
        info!("{label} left the yard on {}", record.exited_on.format("%Y/%m/%d"));
        observer.on_exit(&record);
        events.push(if swept {
            StepEvent::Swept { label }
        } else {
            StepEvent::Exited { label }
        });
    }

    /// Push the road nearest `from` and make it the target.
    pub(crate) fn route_to_road(&mut self, from: Cell) -> Option<Road> {
        let road = self.tasks.choose_road(&self.yard.config, from, &self.carrier);
        self.target = self.tasks.next_target();
        road
    }

    fn reinsert(&mut self, item: Item, label: String, events: &mut Vec<StepEvent>) {
        match self.yard.reinsert(item) {
            Ok(cell) => {
                info!("reinserted {label} at {cell}");
                events.push(StepEvent::Reinserted { label, cell });
            }
            Err(error) => events.push(StepEvent::PlacementDeferred { label, error }),
        }
    }

    /// Drop pending positions, put parked items back, and go idle.
    fn recover(&mut self, cause: RecoveryError, events: &mut Vec<StepEvent>) {
        warn!("recovering from: {cause}");
        let dropped = self.tasks.clear_positions();
        for record in self.tasks.drain_interference() {
            if let Some(item) = record.parked {
                self.reinsert(item, record.label, events);
            }
        }
        debug!("dropped {dropped} pending task(s)");
        self.target = None;
        events.push(StepEvent::Recovery(cause));
    }

    /// Completion check, bookkeeping, and observer callbacks.
    fn finish_step<O: YardObserver>(
        &mut self,
        action:     u8,
        mut reward: f64,
        conflicts:  u32,
        mut events: Vec<StepEvent>,
        observer:   &mut O,
    ) -> Step {
        let done = self.is_complete();
        if done {
            reward += COMPLETION_REWARD;
            self.finished = true;
            events.push(StepEvent::Completed);
            info!("episode complete after {} steps", self.steps);
        }
        self.total_reward += reward;

        let record = StepRecord {
            step:            self.steps,
            action,
            agent_position:  self.carrier.position(),
            target_position: self.target.unwrap_or(Cell::IDLE),
            agent_label:     self.carrier.label(),
            reward,
            total_reward:    self.total_reward,
            sim_date:        self.yard.now(),
            conflict_count:  self.conflict_count,
            residents:       self.yard.grid.len(),
            done,
        };
        debug!(
            "step {}: agent {} target {} reward {reward}",
            record.step, record.agent_position, record.target_position
        );
        observer.on_step(&record);
        if done {
            observer.on_episode_end(&self.summary());
        }

        let phase = if conflicts > 0 {
            Phase::Resolving
        } else if self.target.is_none() {
            Phase::Idle
        } else if self.carrier.is_loaded() {
            Phase::Delivering
        } else {
            Phase::Seeking
        };
        Step {
            state: self.state(),
            reward,
            done,
            info: StepInfo { phase, conflicts, events },
        }
    }
}
