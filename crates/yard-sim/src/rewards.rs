//! Reward constants and per-step shaping.

use yard_core::{Cell, Rect};

pub use crate::conflict::CONFLICT_PENALTY;

/// Granted once, the step the episode completes.
pub const COMPLETION_REWARD: f64 = 10_000.0;
/// Reaching the current target.
pub const ARRIVAL_REWARD: f64 = 500.0;
/// Delivering a payload past a boundary.
pub const DELIVERY_REWARD: f64 = 800.0;
/// Unrecognised action id.
pub const INVALID_ACTION_PENALTY: f64 = 1_000.0;

const PROXIMITY_BASE: f64 = 300.0;
const OVERSHOOT_PENALTY: f64 = 100.0;

/// Distance shaping toward `target`; zero while idle.
///
/// A target inside the yard earns `300 - |dx| - |dy|`.  Each axis on which
/// the carrier is past the target (greater coordinate) costs 100.
pub fn shaping(position: Cell, target: Option<Cell>, width: i32) -> f64 {
    let Some(target) = target else {
        return 0.0;
    };
    let mut reward = 0.0;
    if target.x < width {
        let dx = (target.x - position.x).abs();
        let dy = (target.y - position.y).abs();
        reward += PROXIMITY_BASE - f64::from(dx) - f64::from(dy);
    }
    if position.x > target.x {
        reward -= OVERSHOOT_PENALTY;
    }
    if position.y > target.y {
        reward -= OVERSHOOT_PENALTY;
    }
    reward
}

/// Has the carrier footprint reached or passed a yard boundary?
pub fn crossed_boundary(rect: &Rect, width: i32, height: i32) -> bool {
    rect.x >= width || rect.x <= 0 || rect.y <= 0 || rect.bottom() >= height
}
