//! Action policies and the episode runner.

use log::info;

use crate::{Action, EnvState, EpisodeSummary, SimResult, StrategySource, YardEnv, YardObserver};

/// Chooses the next action id from the observed state.
///
/// Ids outside `0..=3` are legal to return; the environment reports them as
/// invalid and applies a penalty.
///
/// # Example
///
/// ```rust,ignore
/// struct AlwaysDown;
///
/// impl Policy for AlwaysDown {
///     fn act(&mut self, _state: &EnvState) -> u8 {
///         Action::Down.id()
///     }
/// }
/// ```
pub trait Policy {
    fn act(&mut self, state: &EnvState) -> u8;
}

/// Closes the larger of the two axis gaps to the target first.
///
/// Ties go to the vertical axis.  While idle the target is `(0, 0)`, so the
/// carrier drifts back toward the origin.
#[derive(Copy, Clone, Debug, Default)]
pub struct GreedyPolicy;

impl Policy for GreedyPolicy {
    fn act(&mut self, state: &EnvState) -> u8 {
        let dx = state.target_position.x - state.agent_position.x;
        let dy = state.target_position.y - state.agent_position.y;
        let action = if dx.abs() > dy.abs() {
            if dx > 0 { Action::Right } else { Action::Left }
        } else if dy > 0 {
            Action::Down
        } else {
            Action::Up
        };
        action.id()
    }
}

/// Drive `env` with `policy` until the episode completes or `max_steps`
/// effective steps have been taken.
///
/// `observer.on_episode_end` fires exactly once: from the environment on
/// completion, or from here when the step limit cuts the episode off.
pub fn run_episode<S, P, O>(
    env:       &mut YardEnv<S>,
    policy:    &mut P,
    max_steps: u64,
    observer:  &mut O,
) -> SimResult<EpisodeSummary>
where
    S: StrategySource,
    P: Policy,
    O: YardObserver,
{
    let mut state = env.state();
    while !env.is_done() && env.steps < max_steps {
        let action = policy.act(&state);
        state = env.step_with(action, observer)?.state;
    }
    let summary = env.summary();
    if !summary.completed {
        observer.on_episode_end(&summary);
    }
    info!(
        "episode {}: {} steps, reward {}, {} conflicts, {} exits",
        if summary.completed { "completed" } else { "cut off" },
        summary.steps,
        summary.total_reward,
        summary.conflict_count,
        summary.exits
    );
    Ok(summary)
}
