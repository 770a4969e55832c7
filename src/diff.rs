//! # Partial-Refresh Scheduler
//!
//! E-paper panels only redraw cleanly in bounded rectangles, and every
//! partial refresh leaves a little residual image behind. This module tracks
//! which of the 8 fixed display regions actually changed between successive
//! [`JourneyDisplay`] snapshots, and periodically forces a full redraw to
//! bound the artifact accumulation.
//!
//! ## How Change Detection Works
//!
//! Each region has a content fingerprint: a SHA-256 digest over exactly the
//! canonical field values that affect that region's rendering, never over
//! object identity, so two displays built independently with the same content
//! produce identical fingerprints. A region is redrawn when its fingerprint
//! differs from the one stored on the previous cycle.
//!
//! ## Ownership
//!
//! One [`JourneyDisplayDiff`] per physical display, explicitly constructed
//! and owned by the caller. The tracker does read-then-write updates with no
//! internal locking; serialize calls against a single instance. Trackers for
//! different displays are fully independent.

use crate::model::JourneyDisplay;
use chrono::{DateTime, Local, Timelike};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Panel dimensions (7.5" e-paper, 800x480).
pub const SCREEN_W: i32 = 800;
pub const SCREEN_H: i32 = 480;

/// Number of addressable regions on the partial-refresh surface.
pub const REGION_COUNT: usize = 8;

/// Partial refreshes before a full refresh is forced.
pub const DEFAULT_FULL_REFRESH_THRESHOLD: u32 = 30;

/// Two rectangles whose vertical gap is at most this merge into one.
const MERGE_GAP_PX: i32 = 10;

/// How many hex chars of a fingerprint the stats snapshot shows.
const STATS_FINGERPRINT_LEN: usize = 8;

/// A rectangle on the display surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DisplayRegion {
    /// Whether the point lies inside this rectangle.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// Smallest rectangle covering both.
    fn union(self, other: DisplayRegion) -> DisplayRegion {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        DisplayRegion {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

/// The whole panel, returned for a forced full refresh.
pub const FULL_SURFACE: DisplayRegion = DisplayRegion {
    x: 0,
    y: 0,
    width: SCREEN_W,
    height: SCREEN_H,
};

/// The fixed catalogue of addressable regions (V10 dashboard layout).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionId {
    Header,
    StatusBar,
    Step1,
    Step2,
    Step3,
    Step4,
    Step5,
    Footer,
}

impl RegionId {
    pub const ALL: [RegionId; REGION_COUNT] = [
        RegionId::Header,
        RegionId::StatusBar,
        RegionId::Step1,
        RegionId::Step2,
        RegionId::Step3,
        RegionId::Step4,
        RegionId::Step5,
        RegionId::Footer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RegionId::Header => "header",
            RegionId::StatusBar => "status_bar",
            RegionId::Step1 => "step_1",
            RegionId::Step2 => "step_2",
            RegionId::Step3 => "step_3",
            RegionId::Step4 => "step_4",
            RegionId::Step5 => "step_5",
            RegionId::Footer => "footer",
        }
    }

    /// Region geometry on the 800x480 surface. Step slots sit inside the
    /// legs band (y 132..440) on a 62px pitch.
    pub fn bounds(self) -> DisplayRegion {
        let rect = |x, y, width, height| DisplayRegion {
            x,
            y,
            width,
            height,
        };
        match self {
            RegionId::Header => rect(0, 0, SCREEN_W, 94),
            RegionId::StatusBar => rect(0, 96, SCREEN_W, 28),
            RegionId::Step1 => rect(0, 132, SCREEN_W, 58),
            RegionId::Step2 => rect(0, 194, SCREEN_W, 58),
            RegionId::Step3 => rect(0, 256, SCREEN_W, 58),
            RegionId::Step4 => rect(0, 318, SCREEN_W, 58),
            RegionId::Step5 => rect(0, 380, SCREEN_W, 58),
            RegionId::Footer => rect(0, 448, SCREEN_W, 32),
        }
    }

    /// Which journey step (0-based) this region displays, for step slots.
    fn step_index(self) -> Option<usize> {
        match self {
            RegionId::Step1 => Some(0),
            RegionId::Step2 => Some(1),
            RegionId::Step3 => Some(2),
            RegionId::Step4 => Some(3),
            RegionId::Step5 => Some(4),
            _ => None,
        }
    }
}

/// What one `calculate_changes` call asks the renderer to do.
#[derive(Clone, Debug, Serialize)]
pub struct RefreshPlan {
    /// Names of regions whose content changed
    pub changed: Vec<RegionId>,
    /// Their rectangles, in catalogue order
    pub regions: Vec<DisplayRegion>,
    /// True when the counter forced a full redraw of the surface
    pub needs_full_refresh: bool,
}

/// Last-seen content per region.
#[derive(Clone, Debug, Default)]
struct RegionState {
    fingerprint: Option<String>,
    last_update: Option<DateTime<Local>>,
}

/// Diagnostic snapshot; never affects correctness.
#[derive(Clone, Debug, Serialize)]
pub struct DiffStats {
    pub render_count: u32,
    pub full_refresh_threshold: u32,
    pub last_full_refresh: Option<String>,
    pub regions: Vec<RegionStats>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegionStats {
    pub name: &'static str,
    /// Truncated fingerprint (first 8 hex chars)
    pub fingerprint: Option<String>,
    pub last_update: Option<String>,
}

/// Stateful change tracker for one physical display.
#[derive(Clone, Debug)]
pub struct JourneyDisplayDiff {
    states: [RegionState; REGION_COUNT],
    render_count: u32,
    full_refresh_threshold: u32,
    last_full_refresh: Option<DateTime<Local>>,
}

impl Default for JourneyDisplayDiff {
    fn default() -> Self {
        Self::new()
    }
}

impl JourneyDisplayDiff {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_FULL_REFRESH_THRESHOLD)
    }

    /// Tracker forcing a full refresh every `threshold` render cycles.
    pub fn with_threshold(threshold: u32) -> Self {
        JourneyDisplayDiff {
            states: Default::default(),
            render_count: 0,
            full_refresh_threshold: threshold.max(1),
            last_full_refresh: None,
        }
    }

    /// Diff `journey` against the previous snapshot and say what to redraw.
    ///
    /// Every `full_refresh_threshold`-th call returns the whole surface with
    /// `needs_full_refresh` set, even if nothing changed; that is the
    /// mechanism bounding residual-image accumulation. Stored fingerprints
    /// are updated unconditionally on every call.
    pub fn calculate_changes(&mut self, journey: &JourneyDisplay) -> RefreshPlan {
        self.render_count += 1;
        let now = Local::now();

        let mut changed: Vec<RegionId> = Vec::new();
        for (i, id) in RegionId::ALL.iter().enumerate() {
            let fingerprint = region_fingerprint(*id, journey);
            let state = &mut self.states[i];
            if state.fingerprint.as_deref() != Some(fingerprint.as_str()) {
                changed.push(*id);
            }
            state.fingerprint = Some(fingerprint);
            state.last_update = Some(now);
        }

        if self.render_count >= self.full_refresh_threshold {
            self.render_count = 0;
            self.last_full_refresh = Some(now);
            return RefreshPlan {
                changed: RegionId::ALL.to_vec(),
                regions: vec![FULL_SURFACE],
                needs_full_refresh: true,
            };
        }

        let regions = changed.iter().map(|id| id.bounds()).collect();
        RefreshPlan {
            changed,
            regions,
            needs_full_refresh: false,
        }
    }

    /// Merge vertically adjacent rectangles into bounding rectangles.
    ///
    /// Input is sorted by vertical position, then merged in one pass: two
    /// rectangles whose vertical gap is at most 10px collapse into their
    /// bounding box. Only neighbours in the sorted order are considered.
    pub fn merged_regions(regions: &[DisplayRegion]) -> Vec<DisplayRegion> {
        if regions.len() <= 1 {
            return regions.to_vec();
        }

        let mut sorted = regions.to_vec();
        sorted.sort_by_key(|r| r.y);

        let mut merged = Vec::with_capacity(sorted.len());
        let mut current = sorted[0];
        for region in &sorted[1..] {
            let gap = region.y - (current.y + current.height);
            if gap <= MERGE_GAP_PX {
                current = current.union(*region);
            } else {
                merged.push(current);
                current = *region;
            }
        }
        merged.push(current);
        merged
    }

    /// Forget everything: fingerprints, timestamps and the render counter.
    ///
    /// Use after the physical surface was cleared externally. The next call
    /// recomputes from scratch (all regions report changed) rather than
    /// skipping a redraw the panel actually needs.
    pub fn reset(&mut self) {
        self.states = Default::default();
        self.render_count = 0;
        self.last_full_refresh = None;
    }

    /// Diagnostic snapshot with truncated fingerprints and ISO timestamps.
    pub fn get_stats(&self) -> DiffStats {
        DiffStats {
            render_count: self.render_count,
            full_refresh_threshold: self.full_refresh_threshold,
            last_full_refresh: self.last_full_refresh.map(|t| t.to_rfc3339()),
            regions: RegionId::ALL
                .iter()
                .zip(self.states.iter())
                .map(|(id, state)| RegionStats {
                    name: id.name(),
                    fingerprint: state
                        .fingerprint
                        .as_ref()
                        .map(|fp| fp.chars().take(STATS_FINGERPRINT_LEN).collect()),
                    last_update: state.last_update.map(|t| t.to_rfc3339()),
                })
                .collect(),
        }
    }
}

/// Stable content fingerprint over exactly the fields that affect one
/// region's rendering. Depends only on canonical values, never identity.
fn region_fingerprint(id: RegionId, journey: &JourneyDisplay) -> String {
    let canonical = match id {
        RegionId::Header => match &journey.weather {
            Some(w) => format!(
                "header|{}|{:.1}|{}|{}",
                journey.now.minute(),
                w.temperature,
                w.condition,
                w.umbrella
            ),
            None => format!("header|{}|none", journey.now.minute()),
        },
        RegionId::StatusBar => format!(
            "status|{}|{}|{}",
            journey.status.name(),
            journey.delay_minutes,
            journey.total_duration
        ),
        RegionId::Footer => format!(
            "footer|{}|{}",
            journey.target_arrival.timestamp(),
            journey.homebound
        ),
        slot => match slot.step_index().and_then(|i| journey.steps.get(i)) {
            Some(step) => format!(
                "step|{}|{}|{}|{}",
                step.status.name(),
                step.delay_minutes,
                step.actual_duration,
                step.coffee_decision.map_or("none", |d| d.name())
            ),
            None => "step|empty".to_string(),
        },
    };

    hex::encode(Sha256::digest(canonical.as_bytes()))
}
