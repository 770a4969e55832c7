//! # Commute Tracker Core Library
//!
//! This library computes a multi-leg commute itinerary from static
//! configuration plus live transit/weather inputs, and tracks which regions
//! of a partitioned e-paper display need redrawing as the itinerary changes.
//! It targets the same class of hardware as the original deployment: a small
//! always-on board driving a 800x480 e-ink panel.
//!
//! ## Design Philosophy
//!
//! ### No I/O in the core
//! The engine is a pure transform: (config, live data, one wall-clock read)
//! → a fully resolved [`JourneyDisplay`]. Fetching departures, disruptions
//! and weather, persisting preferences, and pushing pixels all belong to the
//! containing service. That keeps every piece here unit-testable with no
//! network, no filesystem and no mock hardware.
//!
//! ### Silent degradation
//! Missing live data never raises an error; it yields valid, less precise
//! output. An empty [`live::LiveData`] produces a perfectly usable
//! fallback-tagged journey built from scheduled durations alone.
//!
//! ### Bounded partial refresh
//! E-paper partial refreshes accumulate residual images. The
//! [`JourneyDisplayDiff`] tracker returns the minimal changed-region set each
//! cycle and forces a full redraw every 30th render so artifacts can never
//! build up unbounded.
//!
//! ## Data Flow
//!
//! 1. The containing service owns a [`config::JourneyConfig`] and gathers a
//!    [`live::LiveData`] bundle each refresh cycle
//! 2. [`engine::build_journey_display`] resolves the itinerary: step layout,
//!    departure matching, disruptions, the coffee decision, overall status
//! 3. One [`JourneyDisplayDiff`] per physical display diffs successive
//!    snapshots and hands the renderer the rectangles to redraw
//!
//! ## Example
//!
//! ```
//! use journey_clock_lib::config::JourneyConfig;
//! use journey_clock_lib::live::LiveData;
//! use journey_clock_lib::{engine, JourneyDisplayDiff};
//!
//! let config = JourneyConfig::default();
//! let journey = engine::build_journey_display(&config, &LiveData::default());
//!
//! let mut tracker = JourneyDisplayDiff::new();
//! let plan = tracker.calculate_changes(&journey);
//! // First cycle: everything needs drawing
//! assert_eq!(plan.changed.len(), 8);
//! ```

// Module declarations
pub mod config;
pub mod diff;
pub mod engine;
pub mod geo;
pub mod live;
pub mod model;
pub mod renderer;

// The types nearly every caller touches
pub use diff::{DisplayRegion, JourneyDisplayDiff, RefreshPlan, RegionId};
pub use model::{
    JourneyDisplay, JourneyStatus, JourneyStep, StepStatus, TransportMode,
};
