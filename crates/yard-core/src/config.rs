//! Yard configuration.
//!
//! `YardConfig::default()` is the reference yard: 75 × 153 units, 50 item
//! slots, start date 2017/9/1, top and bottom roads, zones 20/16/12 with
//! length budgets 74/58/68.  Applications typically load overrides from a
//! JSON file (feature `serde`) and pass the result to the environment
//! builder, which calls [`YardConfig::validate`].

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::{CoreError, CoreResult};

/// Width of every boundary road.  When both the top and bottom roads are
/// enabled the usable yard height grows by this amount.
pub const ROAD_WIDTH: i32 = 20;

/// Largest yard extent on either axis.  Keeps every coordinate sum an item
/// or the carrier can form well inside `i32`.
pub const MAX_EXTENT: i32 = 1 << 20;

// ── Roads ─────────────────────────────────────────────────────────────────────

/// One of the four boundary roads.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Road {
    Left,
    Right,
    Top,
    Bottom,
}

impl Road {
    /// Tie-break order used when two roads are equally close.
    pub const ALL: [Road; 4] = [Road::Left, Road::Right, Road::Top, Road::Bottom];

    pub fn as_str(self) -> &'static str {
        match self {
            Road::Left   => "left",
            Road::Right  => "right",
            Road::Top    => "top",
            Road::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Road {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Road {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "left"   => Ok(Road::Left),
            "right"  => Ok(Road::Right),
            "top"    => Ok(Road::Top),
            "bottom" => Ok(Road::Bottom),
            other => Err(CoreError::Config(format!(
                "unknown road {other:?}: expected left, right, top, or bottom"
            ))),
        }
    }
}

/// The set of enabled boundary roads.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Roads {
    pub left:   bool,
    pub right:  bool,
    pub top:    bool,
    pub bottom: bool,
}

impl Roads {
    pub fn none() -> Self {
        Self::default()
    }

    /// Enable roads by name, e.g. `Roads::from_names(["top", "bottom"])`.
    pub fn from_names<I, S>(names: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roads = Self::none();
        for name in names {
            roads.enable(name.as_ref().parse()?);
        }
        Ok(roads)
    }

    pub fn with(mut self, road: Road) -> Self {
        self.enable(road);
        self
    }

    pub fn enable(&mut self, road: Road) {
        *self.flag_mut(road) = true;
    }

    pub fn is_enabled(&self, road: Road) -> bool {
        match road {
            Road::Left   => self.left,
            Road::Right  => self.right,
            Road::Top    => self.top,
            Road::Bottom => self.bottom,
        }
    }

    /// Enabled roads in [`Road::ALL`] order.
    pub fn enabled(&self) -> impl Iterator<Item = Road> + '_ {
        Road::ALL.into_iter().filter(|&r| self.is_enabled(r))
    }

    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }

    fn flag_mut(&mut self, road: Road) -> &mut bool {
        match road {
            Road::Left   => &mut self.left,
            Road::Right  => &mut self.right,
            Road::Top    => &mut self.top,
            Road::Bottom => &mut self.bottom,
        }
    }
}

// ── ZoneConfig ────────────────────────────────────────────────────────────────

/// Height-zone thresholds, budgets, and row bases.
///
/// A row height `h` belongs to
///
/// ```text
/// high  if seg_mid <= h <  seg_high
/// mid   if seg_low <  h <  seg_mid
/// low   if 0       <  h <= seg_low
/// ```
///
/// provided the zone's remaining budget is at least `h`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ZoneConfig {
    pub seg_high:            i32,
    pub seg_mid:             i32,
    pub seg_low:             i32,
    /// Total length budget of the high zone, including the base row.
    pub high_budget:         i32,
    pub mid_budget:          i32,
    pub low_budget:          i32,
    /// Height of the row every layout starts with.  Also the fallback row
    /// for items whose length matches nothing, and the top boundary row that
    /// relocation never moves an item into.
    pub base_row:            i32,
    /// Row height that relocation never moves an item down into.
    pub bottom_boundary_row: i32,
    /// y-offset of the first mid row when top and bottom roads are enabled.
    pub mid_base:            i32,
    /// y-offset of the first low row when top and bottom roads are enabled.
    pub low_base:            i32,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            seg_high:            20,
            seg_mid:             16,
            seg_low:             12,
            high_budget:         74,
            mid_budget:          58,
            low_budget:          68,
            base_row:            20,
            bottom_boundary_row: 8,
            mid_base:            92,
            low_base:            150,
        }
    }
}

// ── YardConfig ────────────────────────────────────────────────────────────────

/// Top-level yard configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct YardConfig {
    /// Horizontal extent of the yard.
    pub width:      i32,
    /// Vertical extent of the yard, excluding a bottom road.
    pub height:     i32,
    /// Maximum number of resident items.
    pub capacity:   usize,
    /// Simulated date at step 0.
    pub start_date: NaiveDate,
    pub roads:      Roads,
    pub zones:      ZoneConfig,
    /// Seed for the conflict-strategy RNG.
    pub seed:       u64,
}

impl Default for YardConfig {
    fn default() -> Self {
        Self {
            width:      75,
            height:     153,
            capacity:   50,
            start_date: NaiveDate::from_ymd_opt(2017, 9, 1).unwrap_or_default(),
            roads:      Roads::none().with(Road::Top).with(Road::Bottom),
            zones:      ZoneConfig::default(),
            seed:       42,
        }
    }
}

impl YardConfig {
    /// Height the carrier and the boundary sweep work against.
    ///
    /// With both top and bottom roads the bottom road sits inside the
    /// coordinate space, so the yard grows by [`ROAD_WIDTH`].
    pub fn yard_height(&self) -> i32 {
        if self.zone_bases_enabled() {
            self.height + ROAD_WIDTH
        } else {
            self.height
        }
    }

    /// y-offset of the first row.
    pub fn first_row_offset(&self) -> i32 {
        if self.roads.top { ROAD_WIDTH } else { 1 }
    }

    /// Do mid and low rows restart at their zone bases?
    pub fn zone_bases_enabled(&self) -> bool {
        self.roads.top && self.roads.bottom
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(CoreError::Config(format!(
                "yard must have positive extent, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_EXTENT || self.height > MAX_EXTENT {
            return Err(CoreError::Config(format!(
                "yard extent {}x{} exceeds the {MAX_EXTENT} limit",
                self.width, self.height
            )));
        }
        if self.capacity == 0 {
            return Err(CoreError::Config("capacity must be at least 1".into()));
        }
        let z = &self.zones;
        if !(0 < z.seg_low && z.seg_low < z.seg_mid && z.seg_mid < z.seg_high) {
            return Err(CoreError::Config(format!(
                "zone thresholds must satisfy 0 < low < mid < high, got {}/{}/{}",
                z.seg_low, z.seg_mid, z.seg_high
            )));
        }
        if z.base_row <= 0 || z.high_budget < z.base_row {
            return Err(CoreError::Config(format!(
                "high budget {} cannot hold the base row {}",
                z.high_budget, z.base_row
            )));
        }
        if z.mid_budget < 0 || z.low_budget < 0 {
            return Err(CoreError::Config("zone budgets must be non-negative".into()));
        }
        Ok(())
    }
}
