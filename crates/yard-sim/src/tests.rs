//! Unit and scenario tests for yard-sim.

use chrono::NaiveDate;

use yard_core::{Cell, Item, ItemId, ItemStatus, Rect, SimRng, YardConfig};
use yard_feed::ArrivalRecord;

use crate::{
    FixedStrategy, NoopObserver, Strategy, StrategySource, YardEnv, YardEnvBuilder,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, month, day).unwrap()
}

fn sept(day: u32) -> NaiveDate {
    date(9, day)
}

/// An arrival record anchored at `(x, 0)`; the yard assigns the row.
fn record(label: &str, x: i32, length: i32, width: i32, start: NaiveDate, exit: NaiveDate) -> ArrivalRecord {
    ArrivalRecord {
        label:           label.to_owned(),
        rect:            Rect::new(x, 0, length, width),
        start_time:      start,
        exit_time:       exit,
        time_remain:     0,
        processing_time: 0,
    }
}

fn fixed_env(strategy: Strategy, records: Vec<ArrivalRecord>) -> YardEnv<FixedStrategy> {
    YardEnvBuilder::new(YardConfig::default())
        .strategy(FixedStrategy(strategy))
        .arrivals(records)
        .build()
        .unwrap()
}

/// The B001/B003/B007 feed: three 11×8 items, two of them due a day late.
fn three_item_feed() -> Vec<ArrivalRecord> {
    vec![
        record("B001", 0, 11, 8, sept(1), sept(22)),
        record("B003", 0, 11, 8, sept(2), sept(22)),
        record("B007", 0, 11, 8, sept(2), sept(29)),
    ]
}

/// Number of containers currently holding item `id`.
fn custody_count<S: StrategySource>(env: &YardEnv<S>, id: ItemId) -> usize {
    let cached = env.yard.cache.iter().filter(|i| i.id == id).count();
    let resident = env.yard.grid.residents().filter(|i| i.id == id).count();
    let loaded = env.carrier.payload().filter(|i| i.id == id).map_or(0, |_| 1);
    let parked = env
        .tasks
        .interfering()
        .iter()
        .filter(|r| r.parked.as_ref().is_some_and(|i| i.id == id))
        .count();
    let exited = env.yard.out_list.iter().filter(|r| r.item_id == id).count();
    cached + resident + loaded + parked + exited
}

// ── Motion ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod motion_tests {
    use super::*;
    use crate::motion::apply_move;
    use crate::{binary_forward, Action, Stride};

    fn x_stride(distance: i32, width: i32) -> i32 {
        binary_forward(Cell::new(0, 0), Cell::new(distance, 0), width, 173).x
    }

    #[test]
    fn action_ids() {
        assert_eq!(Action::try_from(0u8), Ok(Action::Up));
        assert_eq!(Action::try_from(3u8), Ok(Action::Right));
        assert_eq!(Action::try_from(4u8), Err(4));
        assert_eq!(Action::Down.id(), 1);
    }

    #[test]
    fn stride_bands_on_reference_width() {
        assert_eq!(x_stride(40, 75), 10); // > 37.5
        assert_eq!(x_stride(20, 75), 10); // (18.75, 37.5)
        assert_eq!(x_stride(12, 75), 6);  // (9.375, 18.75) → d/2
        assert_eq!(x_stride(6, 75), 3);   // (4.6875, 9.375) → d/2
        assert_eq!(x_stride(4, 75), 1);
        assert_eq!(x_stride(0, 75), 1);
    }

    #[test]
    fn exact_half_falls_through_to_unit_stride() {
        assert_eq!(x_stride(40, 80), 1);
    }

    #[test]
    fn stride_never_passes_target() {
        // 6 is in (5, 10) on a 20-wide yard, which would otherwise give 10.
        assert_eq!(x_stride(6, 20), 6);
    }

    #[test]
    fn y_axis_uses_its_own_extent() {
        let s = binary_forward(Cell::new(0, 0), Cell::new(0, 150), 75, 173);
        assert_eq!(s, Stride { x: 1, y: 10 });
    }

    #[test]
    fn moves_clamp_to_yard() {
        let rect = Rect::new(2, 165, 11, 8);
        let s = Stride { x: 10, y: 10 };
        assert_eq!(apply_move(&rect, Action::Down, s, 75, 173), Cell::new(2, 162));
        assert_eq!(apply_move(&rect, Action::Left, s, 75, 173), Cell::new(0, 165));
        assert_eq!(apply_move(&rect.at(Cell::new(70, 5)), Action::Right, s, 75, 173), Cell::new(75, 5));
        assert_eq!(apply_move(&rect.at(Cell::new(70, 5)), Action::Up, s, 75, 173), Cell::new(70, 0));
    }
}

// ── Task stack and roads ──────────────────────────────────────────────────────

#[cfg(test)]
mod tasks_tests {
    use super::*;
    use yard_core::{Road, Roads};
    use crate::tasks::nearest_road;
    use crate::{Carrier, TaskQueue};

    #[test]
    fn positions_are_lifo() {
        let mut q = TaskQueue::new();
        q.push(Cell::new(1, 1));
        q.push(Cell::new(2, 2));
        assert_eq!(q.next_target(), Some(Cell::new(2, 2)));
        assert_eq!(q.next_target(), Some(Cell::new(1, 1)));
        assert_eq!(q.next_target(), None);
    }

    #[test]
    fn bottom_road_point_uses_carrier_length() {
        let config = YardConfig::default();
        let mut q = TaskQueue::new();
        let carrier = Carrier::new(Cell::new(30, 160));
        assert_eq!(q.choose_road(&config, Cell::new(30, 160), &carrier), Some(Road::Bottom));
        assert_eq!(q.positions(), &[Cell::new(30, 173 - 5)]);
    }

    #[test]
    fn top_road_when_closer() {
        let config = YardConfig::default();
        let mut q = TaskQueue::new();
        let carrier = Carrier::new(Cell::new(30, 30));
        assert_eq!(q.choose_road(&config, Cell::new(30, 30), &carrier), Some(Road::Top));
        assert_eq!(q.positions(), &[Cell::new(30, 0)]);
    }

    #[test]
    fn distance_measured_from_origin_not_carrier() {
        let config = YardConfig::default();
        let mut q = TaskQueue::new();
        let carrier = Carrier::new(Cell::new(30, 160));
        assert_eq!(q.choose_road(&config, Cell::new(30, 10), &carrier), Some(Road::Top));
        assert_eq!(q.positions(), &[Cell::new(30, 0)]);
    }

    #[test]
    fn ties_prefer_left_over_right() {
        let config = YardConfig {
            width: 80,
            roads: Roads::none().with(Road::Left).with(Road::Right),
            ..YardConfig::default()
        };
        assert_eq!(nearest_road(&config, Cell::new(40, 90)), Some(Road::Left));
        assert_eq!(nearest_road(&config, Cell::new(41, 90)), Some(Road::Right));
    }

    #[test]
    fn no_road_pushes_nothing() {
        let config = YardConfig { roads: Roads::none(), ..YardConfig::default() };
        let mut q = TaskQueue::new();
        let carrier = Carrier::new(Cell::new(30, 30));
        assert_eq!(q.choose_road(&config, Cell::new(30, 30), &carrier), None);
        assert!(q.is_empty());
    }

    #[test]
    fn interference_recorded_once_and_parked() {
        let mut q = TaskQueue::new();
        q.push_interference(ItemId(3), "B003", Cell::new(9, 150));
        q.push_interference(ItemId(3), "B003", Cell::new(9, 150));
        assert_eq!(q.interfering().len(), 1);

        let item = Item::new(ItemId(3), "B003", Rect::new(0, 0, 11, 8), sept(1), sept(22));
        assert!(q.park(item).is_ok());
        assert!(q.top_interference().unwrap().parked.is_some());

        let stranger = Item::new(ItemId(4), "B004", Rect::new(0, 0, 11, 8), sept(1), sept(22));
        let back = q.park(stranger).unwrap_err();
        assert_eq!(back.label, "B004");
    }
}

// ── Item lifecycle ────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use super::*;
    use crate::{Admission, SimError, StepEvent, Yard};
    use yard_layout::LayoutError;

    fn item(id: u32, start: NaiveDate, exit: NaiveDate) -> Item {
        Item::new(ItemId(id), format!("B{id:03}"), Rect::new(0, 0, 11, 8), start, exit)
    }

    #[test]
    fn due_item_is_placed_in_its_row() {
        let mut yard = Yard::new(YardConfig::default());
        let admission = yard.check_arrival(item(1, sept(1), sept(22))).unwrap();
        assert_eq!(admission, Admission::Placed { cell: Cell::new(0, 150), row_error: None });
        assert_eq!(yard.partition.rows(), &[20, 11]);
    }

    #[test]
    fn future_item_is_cached_once() {
        let mut yard = Yard::new(YardConfig::default());
        assert_eq!(yard.check_arrival(item(1, sept(5), sept(22))).unwrap(), Admission::Cached);
        assert_eq!(yard.check_arrival(item(2, sept(5), sept(22)).tap_label("B001")).unwrap(), Admission::Duplicate);
        assert_eq!(yard.cache.len(), 1);
        assert!(yard.grid.is_empty());
    }

    #[test]
    fn scenario_three_items_share_a_row() {
        let mut yard = Yard::new(YardConfig::default());
        yard.check_arrival(item(1, sept(1), sept(22))).unwrap();
        yard.check_arrival(item(3, sept(2), sept(22))).unwrap();
        yard.check_arrival(item(7, sept(2), sept(29))).unwrap();
        assert_eq!(yard.grid.len(), 1);

        let mut events = Vec::new();
        yard.flush_cache(&mut events);
        assert!(events.is_empty(), "nothing due yet");

        yard.clock.advance_to(sept(2));
        yard.flush_cache(&mut events);
        assert_eq!(events.len(), 2);

        let b1 = yard.grid.find(ItemId(1)).unwrap().rect;
        let b3 = yard.grid.find(ItemId(3)).unwrap().rect;
        let b7 = yard.grid.find(ItemId(7)).unwrap().rect;
        assert_eq!(b3.x, b1.x + 9);
        assert_eq!(b7.x, b3.x + 9);
        assert_eq!((b1.y, b3.y, b7.y), (150, 150, 150));
    }

    #[test]
    fn capacity_is_enforced_on_admission() {
        let config = YardConfig { capacity: 1, ..YardConfig::default() };
        let mut yard = Yard::new(config);
        yard.check_arrival(item(1, sept(1), sept(22))).unwrap();
        let err = yard.check_arrival(item(2, sept(1), sept(22))).unwrap_err();
        assert!(matches!(err, SimError::CapacityExceeded { capacity: 1, .. }));
        assert_eq!(yard.grid.len(), 1);
    }

    #[test]
    fn full_yard_defers_cached_items() {
        let config = YardConfig { capacity: 1, ..YardConfig::default() };
        let mut yard = Yard::new(config);
        yard.check_arrival(item(1, sept(1), sept(22))).unwrap();
        yard.check_arrival(item(2, sept(2), sept(22))).unwrap();
        yard.clock.advance_to(sept(2));

        let mut events = Vec::new();
        yard.flush_cache(&mut events);
        assert_eq!(events, vec![StepEvent::CapacityDeferred { label: "B002".into() }]);
        assert_eq!(yard.cache.len(), 1);
    }

    #[test]
    fn earliest_exit_orders_by_date_then_slack_then_x() {
        let mut yard = Yard::new(YardConfig::default());
        yard.check_arrival(item(1, sept(1), sept(25))).unwrap();
        yard.check_arrival(item(2, sept(1), sept(22)).with_time_remain(5)).unwrap();
        yard.check_arrival(item(3, sept(1), sept(22)).with_time_remain(2)).unwrap();
        yard.check_arrival(item(4, sept(1), sept(22)).with_time_remain(2)).unwrap();
        // B003 and B004 tie on date and slack; B003 is further left.
        assert_eq!(yard.earliest_exit_candidate().unwrap().label, "B003");
    }

    #[test]
    fn clock_jumps_forward_only() {
        let mut yard = Yard::new(YardConfig::default());
        yard.check_arrival(item(1, sept(1), sept(22))).unwrap();
        assert_eq!(yard.advance_clock(), Some(sept(22)));
        assert_eq!(yard.advance_clock(), None);
        assert_eq!(yard.now(), sept(22));
    }

    #[test]
    fn empty_grid_jumps_to_next_start() {
        let mut yard = Yard::new(YardConfig::default());
        yard.check_arrival(item(1, sept(10), sept(22))).unwrap();
        assert_eq!(yard.advance_clock(), Some(sept(10)));
    }

    #[test]
    fn reinsert_restarts_at_left_edge() {
        let mut yard = Yard::new(YardConfig::default());
        let cell = yard.reinsert(item(1, sept(1), sept(22)).tap_x(40)).unwrap();
        assert_eq!(cell, Cell::new(1, 150));
    }

    #[test]
    fn row_past_yard_bottom_falls_back_to_a_taller_row() {
        let mut yard = Yard::new(YardConfig::default());
        let l12 = item(1, sept(1), sept(30)).tap_length(12);
        let l11 = item(2, sept(1), sept(30));
        yard.check_arrival(l12).unwrap();
        let admission = yard.check_arrival(l11).unwrap();
        assert_eq!(
            admission,
            Admission::Placed {
                cell:      Cell::new(9, 150),
                row_error: Some(LayoutError::RowOutOfYard { height: 11, bottom: 173 }),
            }
        );
        assert_eq!(yard.partition.rows(), &[20, 12]);
        assert!(yard.grid.residents().all(|i| i.rect.bottom() < yard.height()));
    }

    #[test]
    fn oversized_item_is_rejected() {
        let mut yard = Yard::new(YardConfig::default());
        let err = yard.check_arrival(item(1, sept(1), sept(22)).tap_length(25)).unwrap_err();
        assert!(matches!(
            err,
            SimError::Layout(LayoutError::Oversized { length: 25, max: 20, .. })
        ));
        assert!(yard.grid.is_empty());
        assert!(yard.cache.is_empty());
    }

    #[test]
    fn item_wider_than_yard_is_rejected() {
        let mut yard = Yard::new(YardConfig::default());
        let mut wide = item(1, sept(1), sept(22));
        wide.rect.width = 80;
        let err = yard.check_arrival(wide).unwrap_err();
        assert!(matches!(err, SimError::Layout(LayoutError::OutOfYard { .. })));

        let off_edge = item(2, sept(1), sept(22)).tap_x(70);
        assert!(yard.check_arrival(off_edge).is_err());
        assert!(yard.grid.is_empty());
    }

    #[test]
    fn full_row_defers_instead_of_overflowing() {
        let mut yard = Yard::new(YardConfig::default());
        // Eight 11x8 items fill x = 0..71; a ninth would end past 75.
        for id in 1..=8 {
            let admission = yard.check_arrival(item(id, sept(1), sept(22))).unwrap();
            assert!(matches!(admission, Admission::Placed { .. }));
        }
        let admission = yard.check_arrival(item(9, sept(1), sept(22))).unwrap();
        assert_eq!(
            admission,
            Admission::Deferred { error: LayoutError::RowFull { y: 150, label: "B009".into() } }
        );
        assert_eq!(yard.cache.len(), 1);

        let mut events = Vec::new();
        yard.flush_cache(&mut events);
        assert!(matches!(&events[..], [StepEvent::PlacementDeferred { label, .. }] if label == "B009"));
        assert_eq!(yard.cache.len(), 1);

        yard.grid.pop_last().unwrap();
        events.clear();
        yard.flush_cache(&mut events);
        assert!(yard.cache.is_empty());
        assert_eq!(yard.grid.find(ItemId(9)).unwrap().rect.cell(), Cell::new(63, 150));
    }

    #[test]
    fn random_admissions_never_overlap() {
        use yard_layout::collides;

        let mut rng = SimRng::new(23);
        for round in 0..20 {
            let mut yard = Yard::new(YardConfig::default());
            for id in 0..40 {
                let mut next = item(id, sept(1), sept(22)).tap_x(rng.gen_range(0..60));
                next.rect.length = rng.gen_range(1..=25);
                next.rect.width = rng.gen_range(3..10);
                let _ = yard.check_arrival(next);
            }
            let all: Vec<_> = yard.grid.residents().cloned().collect();
            for (i, a) in all.iter().enumerate() {
                assert!(a.rect.right() <= yard.width(), "round {round}: {} off the right edge", a.label);
                assert!(a.rect.bottom() < yard.height(), "round {round}: {} below the yard", a.label);
                for b in &all[i + 1..] {
                    assert!(!collides(&a.rect, &b.rect), "round {round}: {} overlaps {}", a.label, b.label);
                }
            }
        }
    }

    trait Tap {
        fn tap_label(self, label: &str) -> Self;
        fn tap_x(self, x: i32) -> Self;
        fn tap_length(self, length: i32) -> Self;
    }

    impl Tap for Item {
        fn tap_label(mut self, label: &str) -> Self {
            self.label = label.to_owned();
            self
        }

        fn tap_x(mut self, x: i32) -> Self {
            self.rect.x = x;
            self
        }

        fn tap_length(mut self, length: i32) -> Self {
            self.rect.length = length;
            self
        }
    }
}

// ── Conflict resolution ───────────────────────────────────────────────────────

#[cfg(test)]
mod conflict_tests {
    use super::*;
    use crate::rewards::CONFLICT_PENALTY;
    use crate::{target_row, ConflictOutcome, StepEvent};

    /// Rows `[20, 10, 9]` at `[20, 150, 160]`.  R10 sits at (40, 150), B at
    /// (0, 160), and A, taken from (9, 160), is carried at (4, 163) where
    /// it overlaps B.
    fn collision_env(strategy: Strategy) -> YardEnv<FixedStrategy> {
        let mut env = fixed_env(
            strategy,
            vec![
                record("R10", 40, 10, 8, sept(1), sept(25)),
                record("B", 0, 9, 8, sept(1), sept(22)),
                record("A", 0, 9, 8, sept(1), sept(22)),
            ],
        );
        assert_eq!(env.yard.partition.rows(), &[20, 10, 9]);
        assert_eq!(env.yard.grid.get(Cell::new(0, 160)).unwrap().label, "B");

        let a = env.yard.grid.remove(Cell::new(9, 160)).unwrap();
        env.carrier.load(a);
        env.carrier.move_to(Cell::new(4, 163));
        env
    }

    fn carried(env: &YardEnv<FixedStrategy>) -> &str {
        &env.carrier.payload().unwrap().label
    }

    #[test]
    fn finds_snug_row_above() {
        let env = collision_env(Strategy::Swap);
        let to = target_row(&env.yard, &env.carrier, Cell::new(0, 160));
        assert_eq!(to, Some(Cell::new(0, 150)));
    }

    #[test]
    fn relocate_keeps_payload() {
        let mut env = collision_env(Strategy::Relocate);
        let report = env.resolve_conflicts();

        assert_eq!(report.conflicts, 1);
        assert_eq!(report.penalty, CONFLICT_PENALTY);
        assert_eq!(env.conflict_count, 1);
        assert_eq!(carried(&env), "A");
        assert_eq!(env.yard.grid.get(Cell::new(0, 150)).unwrap().label, "B");
        // Road chosen from A's origin (9, 160): bottom is 13 away.
        assert_eq!(env.target, Some(Cell::new(4, 173 - 9)));
    }

    #[test]
    fn swap_carries_resident_and_queues_return() {
        let mut env = collision_env(Strategy::Swap);
        let report = env.resolve_conflicts();

        assert_eq!(report.conflicts, 1);
        assert_eq!(carried(&env), "B");
        assert_eq!(env.carrier.position(), Cell::new(0, 160));
        assert_eq!(env.yard.grid.get(Cell::new(4, 163)).unwrap().label, "A");
        assert_eq!(env.tasks.positions(), &[Cell::new(0, 160), Cell::new(4, 163)]);
        assert_eq!(env.tasks.top_interference().unwrap().origin, Cell::new(0, 160));
        assert_eq!(env.target, Some(Cell::new(0, 173 - 9)));
        assert!(report.events.iter().any(|e| matches!(
            e,
            StepEvent::Conflict { outcome: ConflictOutcome::Swapped, .. }
        )));
    }

    #[test]
    fn direct_evict_carries_resident_out() {
        let mut env = collision_env(Strategy::DirectEvict);
        let report = env.resolve_conflicts();

        assert_eq!(report.conflicts, 1);
        assert_eq!(carried(&env), "B");
        assert_eq!(env.carrier.position(), Cell::new(0, 150));
        assert_eq!(env.yard.grid.get(Cell::new(4, 163)).unwrap().label, "A");
        assert!(!env.tasks.has_interference());
        assert_eq!(env.target, Some(Cell::new(0, 173 - 9)));
    }

    #[test]
    fn blocked_relocation_falls_back_to_swap() {
        let mut env = collision_env(Strategy::Relocate);
        let blocker = Item::new(ItemId(99), "C10", Rect::new(0, 150, 10, 8), sept(1), sept(25));
        env.yard.grid.insert_at(blocker).unwrap();

        let report = env.resolve_conflicts();
        assert_eq!(report.conflicts, 1);
        assert!(report.events.contains(&StepEvent::NoValidRow { label: "B".into() }));
        assert_eq!(carried(&env), "B");
    }

    #[test]
    fn no_pass_without_a_move() {
        let mut env = collision_env(Strategy::Swap);
        env.carrier.settle();
        assert_eq!(env.resolve_conflicts().conflicts, 0);
        assert_eq!(carried(&env), "A");
    }

    #[test]
    fn deposited_item_is_exempt_while_overlapping() {
        let mut env = collision_env(Strategy::Swap);
        env.resolve_conflicts();
        // Carrying B, still overlapping the freshly deposited A.
        env.carrier.move_to(Cell::new(0, 161));
        assert_eq!(env.resolve_conflicts().conflicts, 0);
        assert_eq!(env.conflict_count, 1);
    }

    #[test]
    fn conflicts_conserve_items() {
        for strategy in Strategy::ALL {
            let mut env = collision_env(strategy);
            env.resolve_conflicts();
            for id in 0..3 {
                assert_eq!(custody_count(&env, ItemId(id)), 1, "{strategy}: item {id}");
            }
        }
    }
}

// ── Environment steps ─────────────────────────────────────────────────────────

#[cfg(test)]
mod env_tests {
    use super::*;
    use crate::rewards::COMPLETION_REWARD;
    use crate::{
        run_episode, GreedyPolicy, Phase, RecoveryError, SimError, StepEvent, Yard,
    };
    use yard_core::Roads;

    #[test]
    fn empty_yard_completes_on_first_step() {
        let mut env = fixed_env(Strategy::Swap, Vec::new());
        let step = env.step(1).unwrap();
        assert!(step.done);
        assert_eq!(step.reward, COMPLETION_REWARD);
        assert!(step.info.events.contains(&StepEvent::Completed));
        assert_eq!(step.info.phase, Phase::Idle);
    }

    #[test]
    fn steps_after_completion_change_nothing() {
        let mut env = fixed_env(Strategy::Swap, Vec::new());
        env.step(1).unwrap();
        let before = (env.state(), env.total_reward, env.steps);

        for action in [0, 1, 2, 3, 9] {
            let step = env.step(action).unwrap();
            assert!(step.done);
            assert_eq!(step.reward, 0.0);
            assert!(step.info.events.is_empty());
        }
        assert_eq!((env.state(), env.total_reward, env.steps), before);
    }

    #[test]
    fn invalid_action_is_penalised_without_moving() {
        let mut env = fixed_env(Strategy::Swap, vec![record("B001", 0, 11, 8, sept(1), sept(1))]);
        let step = env.step(7).unwrap();
        assert!(!step.done);
        assert_eq!(step.state.agent_position, Cell::IDLE);
        assert_eq!(step.state.target_position, Cell::new(0, 150));
        assert!(step.info.events.contains(&StepEvent::InvalidAction(7)));
        // Shaping 300 - 150 for the new target, minus the penalty.
        assert_eq!(step.reward, 150.0 - 1000.0);
    }

    #[test]
    fn arrival_is_gated_on_start_date() {
        let mut env = fixed_env(Strategy::Swap, vec![record("B001", 0, 11, 8, sept(5), sept(9))]);
        assert_eq!(env.status_of(ItemId(0)), Some(ItemStatus::Cached));

        // Idle with an empty grid: the clock jumps to the start date.
        let step = env.step(0).unwrap();
        assert_eq!(env.yard.now(), sept(9));
        assert_eq!(env.status_of(ItemId(0)), Some(ItemStatus::Resident));
        assert!(step.info.events.contains(&StepEvent::ClockAdvanced { to: sept(5) }));
    }

    #[test]
    fn missing_pickup_recovers_and_reinserts_parked_items() {
        let mut env = fixed_env(Strategy::Swap, vec![record("B001", 0, 11, 8, sept(1), sept(1))]);
        env.step(7).unwrap();
        assert_eq!(env.target, Some(Cell::new(0, 150)));

        let parked = Item::new(ItemId(50), "P050", Rect::new(60, 0, 11, 8), sept(1), sept(30));
        env.tasks.push_interference(ItemId(50), "P050", Cell::new(60, 150));
        env.tasks.park(parked).unwrap();
        let gone = env.yard.grid.remove(Cell::new(0, 150)).unwrap();
        assert_eq!(gone.label, "B001");

        env.carrier.move_to(Cell::new(0, 149));
        let step = env.step(1).unwrap();

        assert!(step.info.events.contains(&StepEvent::Recovery(RecoveryError::MissingItem {
            cell: Cell::new(0, 150),
        })));
        assert_eq!(env.status_of(ItemId(50)), Some(ItemStatus::Resident));
        assert_eq!(env.yard.grid.find(ItemId(50)).unwrap().rect.x, 1);
        assert!(env.tasks.is_idle());
        assert_eq!(env.target, None);
        assert!(!step.done);
    }

    #[test]
    fn greedy_episode_delivers_scenario_in_exit_order() {
        let mut env = fixed_env(Strategy::Swap, three_item_feed());
        let summary = run_episode(&mut env, &mut GreedyPolicy, 2_000, &mut NoopObserver).unwrap();

        assert!(summary.completed);
        assert_eq!(summary.conflict_count, 0);
        let labels: Vec<&str> = env.yard.out_list.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["B001", "B003", "B007"]);
        assert!(env.yard.out_list.iter().all(|r| !r.swept));
        assert_eq!(env.yard.now(), sept(29));
        assert!(env.step(1).unwrap().done);
    }

    #[test]
    fn item_at_left_edge_leaves_through_top_corner() {
        for (length, width) in [(17, 8), (18, 12)] {
            let mut env = fixed_env(Strategy::Swap, vec![record("H1", 0, length, width, sept(1), sept(1))]);
            let mut policy = GreedyPolicy;
            let mut exit_at_origin = false;
            let mut done = false;
            for _ in 0..500 {
                let state = env.state();
                let step = env.step(crate::Policy::act(&mut policy, &state)).unwrap();
                if env.carrier.payload().is_some() && env.target == Some(Cell::new(0, 0)) {
                    exit_at_origin = true;
                }
                if step.done {
                    done = true;
                    break;
                }
            }
            assert!(exit_at_origin, "length {length}: road exit at the corner never targeted");
            assert!(done, "length {length}: episode did not finish");
            let labels: Vec<&str> = env.yard.out_list.iter().map(|r| r.label.as_str()).collect();
            assert_eq!(labels, ["H1"]);
            assert!(!env.yard.out_list[0].swept);
        }
    }

    #[test]
    fn row_past_yard_bottom_is_not_swept() {
        let mut env = fixed_env(
            Strategy::Swap,
            vec![
                record("L12", 0, 12, 8, sept(1), sept(30)),
                record("L11", 0, 11, 8, sept(1), sept(30)),
            ],
        );
        env.step(1).unwrap();
        assert!(env.yard.out_list.is_empty());
        assert_eq!(env.yard.partition.rows(), &[20, 12]);
        let l11 = env.yard.grid.residents().find(|i| i.label == "L11").map(|i| i.rect);
        let l11 = l11.or_else(|| env.carrier.payload().map(|i| i.rect)).unwrap();
        assert!(l11.bottom() < env.yard.height());
    }

    #[test]
    fn every_item_has_exactly_one_custodian() {
        let feed = vec![
            record("H1", 0, 17, 8, sept(1), sept(2)),
            record("H2", 0, 17, 8, sept(1), sept(20)),
            record("M1", 0, 14, 8, sept(1), sept(10)),
            record("M2", 0, 14, 8, sept(1), sept(25)),
            record("L1", 0, 11, 8, sept(1), sept(15)),
            record("L2", 0, 11, 8, sept(1), sept(28)),
            record("L3", 0, 11, 8, date(10, 3), date(10, 9)),
        ];
        let mut env = YardEnvBuilder::new(YardConfig::default())
            .strategy(SimRng::new(7))
            .arrivals(feed)
            .build()
            .unwrap();
        let mut policy = GreedyPolicy;

        for _ in 0..3_000 {
            let state = env.state();
            let step = env.step(crate::Policy::act(&mut policy, &state)).unwrap();
            for id in 0..7 {
                assert_eq!(custody_count(&env, ItemId(id)), 1, "item {id} at step {}", env.steps);
            }
            if step.done {
                break;
            }
        }
    }

    #[test]
    fn same_seed_same_episode() {
        let run = || {
            let feed = vec![
                record("H1", 0, 17, 8, sept(1), sept(3)),
                record("M1", 0, 14, 8, sept(1), sept(10)),
                record("L1", 0, 11, 8, sept(1), sept(15)),
            ];
            let mut env = YardEnvBuilder::new(YardConfig::default()).arrivals(feed).build().unwrap();
            run_episode(&mut env, &mut GreedyPolicy, 1_500, &mut NoopObserver).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn builder_requires_a_road() {
        let config = YardConfig { roads: Roads::none(), ..YardConfig::default() };
        let err = YardEnvBuilder::new(config).build().err().unwrap();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let config = YardConfig { capacity: 0, ..YardConfig::default() };
        assert!(matches!(YardEnvBuilder::new(config).build(), Err(SimError::Config(_))));
    }

    #[test]
    fn builder_reports_capacity_overflow() {
        let config = YardConfig { capacity: 1, ..YardConfig::default() };
        let result = YardEnvBuilder::new(config)
            .arrivals(vec![
                record("B001", 0, 11, 8, sept(1), sept(22)),
                record("B002", 0, 11, 8, sept(1), sept(22)),
            ])
            .build();
        assert!(matches!(result, Err(SimError::CapacityExceeded { .. })));
    }

    #[test]
    fn yard_height_includes_bottom_road() {
        let yard = Yard::new(YardConfig::default());
        assert_eq!(yard.height(), 173);
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;
    use crate::{run_episode, EpisodeSummary, ExitRecord, GreedyPolicy, StepRecord, YardObserver};

    #[derive(Default)]
    struct Recorder {
        steps: Vec<StepRecord>,
        exits: Vec<ExitRecord>,
        ends:  Vec<EpisodeSummary>,
    }

    impl YardObserver for Recorder {
        fn on_step(&mut self, record: &StepRecord) {
            self.steps.push(record.clone());
        }
        fn on_exit(&mut self, record: &ExitRecord) {
            self.exits.push(record.clone());
        }
        fn on_episode_end(&mut self, summary: &EpisodeSummary) {
            self.ends.push(summary.clone());
        }
    }

    #[test]
    fn records_every_step_and_exit() {
        let mut env = fixed_env(Strategy::Swap, three_item_feed());
        let mut rec = Recorder::default();
        let summary = run_episode(&mut env, &mut GreedyPolicy, 2_000, &mut rec).unwrap();

        assert_eq!(rec.steps.len() as u64, summary.steps);
        assert_eq!(rec.exits.len(), 3);
        assert_eq!(rec.ends, vec![summary.clone()]);
        let last = rec.steps.last().unwrap();
        assert!(last.done);
        assert_eq!(last.total_reward, summary.total_reward);
        assert_eq!(rec.exits[2].exited_on, sept(29));
    }

    #[test]
    fn step_limit_still_ends_episode_once() {
        let mut env = fixed_env(Strategy::Swap, three_item_feed());
        let mut rec = Recorder::default();
        let summary = run_episode(&mut env, &mut GreedyPolicy, 5, &mut rec).unwrap();

        assert!(!summary.completed);
        assert_eq!(summary.steps, 5);
        assert_eq!(rec.ends.len(), 1);
    }
}

// ── Policy ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod policy_tests {
    use super::*;
    use crate::{Action, EnvState, GreedyPolicy, Policy};

    fn act(agent: (i32, i32), target: (i32, i32)) -> u8 {
        GreedyPolicy.act(&EnvState {
            agent_position:  agent.into(),
            target_position: target.into(),
            carrying:        false,
        })
    }

    #[test]
    fn closes_larger_gap_first() {
        assert_eq!(act((0, 0), (30, 10)), Action::Right.id());
        assert_eq!(act((30, 0), (0, 10)), Action::Left.id());
        assert_eq!(act((0, 0), (10, 30)), Action::Down.id());
        assert_eq!(act((0, 30), (10, 0)), Action::Up.id());
    }

    #[test]
    fn ties_go_vertical() {
        assert_eq!(act((0, 0), (10, 10)), Action::Down.id());
        assert_eq!(act((5, 5), (5, 5)), Action::Up.id());
    }
}
