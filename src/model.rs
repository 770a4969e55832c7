//! # Journey Domain Model
//!
//! Core data structures for a computed commute itinerary: transport modes,
//! per-leg status, the overall journey status, individual steps and the
//! aggregate [`JourneyDisplay`] handed to a renderer.
//!
//! ## Invariants
//!
//! A [`JourneyDisplay`] keeps two derived totals in sync via
//! [`JourneyDisplay::recalculate_totals`]:
//! - `total_duration` = Σ effective duration over steps whose status is not
//!   SKIPPED or CANCELLED
//! - `delay_minutes` = Σ `delay_minutes` over all steps
//!
//! Every helper that mutates a step recalculates both before returning, so a
//! display is always internally consistent when it leaves this module.
//!
//! ## Renderer Contract
//!
//! [`JourneyDisplay::to_record`] flattens the display into a plain
//! serializable record ([`DisplayRecord`]) that carries every primitive field
//! plus every derived per-step display value (duration label, duration
//! display string, has-delay flag). A renderer never re-derives display
//! logic.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// How a single journey leg is travelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Train,
    Tram,
    Bus,
    Vline,
    Ferry,
    Walk,
    Coffee,
}

impl TransportMode {
    /// Human label used in step titles and the preview renderer.
    pub fn label(self) -> &'static str {
        match self {
            TransportMode::Train => "Train",
            TransportMode::Tram => "Tram",
            TransportMode::Bus => "Bus",
            TransportMode::Vline => "V/Line",
            TransportMode::Ferry => "Ferry",
            TransportMode::Walk => "Walk",
            TransportMode::Coffee => "Coffee",
        }
    }
}

/// Per-leg status. NORMAL is the build-time default; the rest are set by
/// live-data application, the coffee decision, or the mutator helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Normal,
    Active,
    Delayed,
    Skipped,
    Cancelled,
    Diverted,
    Extended,
    Completed,
}

impl StepStatus {
    /// Steps in these states contribute nothing to the journey total.
    pub fn excluded_from_total(self) -> bool {
        matches!(self, StepStatus::Skipped | StepStatus::Cancelled)
    }

    /// Stable lowercase name, used for fingerprints and the ASCII preview.
    pub fn name(self) -> &'static str {
        match self {
            StepStatus::Normal => "normal",
            StepStatus::Active => "active",
            StepStatus::Delayed => "delayed",
            StepStatus::Skipped => "skipped",
            StepStatus::Cancelled => "cancelled",
            StepStatus::Diverted => "diverted",
            StepStatus::Extended => "extended",
            StepStatus::Completed => "completed",
        }
    }
}

/// Overall journey status, derived with fixed precedence: any CANCELLED step
/// means DISRUPTION, else any DIVERTED step means DIVERSION, else positive
/// aggregate delay means DELAY, else LEAVE_NOW.
///
/// ON_TIME exists in the closed set but the engine never derives it: absent
/// an active delay or disruption the display always says "leave now".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyStatus {
    OnTime,
    Delay,
    Disruption,
    Diversion,
    LeaveNow,
}

impl JourneyStatus {
    /// Stable name, used for fingerprints and the ASCII preview.
    pub fn name(self) -> &'static str {
        match self {
            JourneyStatus::OnTime => "on_time",
            JourneyStatus::Delay => "delay",
            JourneyStatus::Disruption => "disruption",
            JourneyStatus::Diversion => "diversion",
            JourneyStatus::LeaveNow => "leave_now",
        }
    }
}

/// Outcome tag of the coffee-stop decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoffeeDecision {
    Skip,
    Extend,
}

impl CoffeeDecision {
    pub fn name(self) -> &'static str {
        match self {
            CoffeeDecision::Skip => "skip",
            CoffeeDecision::Extend => "extend",
        }
    }
}

/// Where the journey data came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// At least one live input (departures/disruptions/weather) was present
    Live,
    /// Built entirely from static configuration
    Fallback,
}

/// Weather snapshot carried on the display header.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayWeather {
    /// Temperature in °C
    pub temperature: f64,
    /// Free-text condition as reported by the provider
    pub condition: String,
    /// True when the condition contains a rain-indicating keyword
    pub umbrella: bool,
}

/// One itinerary leg: a walk, a transit ride, or the coffee stop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JourneyStep {
    /// 1-based, contiguous position in the itinerary
    pub number: u32,
    pub mode: TransportMode,
    pub title: String,
    pub subtitle: String,
    /// Scheduled duration in minutes
    pub duration: i64,
    /// Delay-adjusted duration in minutes (equals `duration` until a delay,
    /// extension or skip touches it)
    pub actual_duration: i64,
    /// Accumulated delay in minutes
    pub delay_minutes: i64,
    pub status: StepStatus,
    /// Route identifier for transit legs (e.g. "19", "Craigieburn")
    pub route_number: Option<String>,
    pub direction: Option<String>,
    pub platform: Option<String>,
    /// Minute offsets from "now" to the next matching departures
    pub departures: Option<Vec<i64>>,
    /// Set on the coffee step once the keep/skip/extend decision has run
    pub coffee_decision: Option<CoffeeDecision>,
    /// Human reason accompanying the coffee decision
    pub coffee_reason: Option<String>,
    /// Free-text disruption or diversion message from the operator
    pub disruption_message: Option<String>,
    /// Optional legs (the coffee stop) may be elided from the total entirely
    pub is_optional: bool,
}

impl JourneyStep {
    /// New leg with defaults: NORMAL status, no delay, actual = scheduled.
    pub fn new(number: u32, mode: TransportMode, title: impl Into<String>, duration: i64) -> Self {
        JourneyStep {
            number,
            mode,
            title: title.into(),
            subtitle: String::new(),
            duration,
            actual_duration: duration,
            delay_minutes: 0,
            status: StepStatus::Normal,
            route_number: None,
            direction: None,
            platform: None,
            departures: None,
            coffee_decision: None,
            coffee_reason: None,
            disruption_message: None,
            is_optional: false,
        }
    }

    /// Duration that actually counts: the delay-adjusted figure.
    pub fn effective_duration(&self) -> i64 {
        self.actual_duration
    }

    pub fn has_delay(&self) -> bool {
        self.delay_minutes > 0
    }

    /// Short duration text, e.g. "12 min".
    pub fn duration_label(&self) -> String {
        format!("{} min", self.effective_duration())
    }

    /// Renderer-facing duration string: shows the scheduled→actual shift when
    /// the leg runs long, or "skipped" when the leg is elided.
    pub fn duration_display(&self) -> String {
        if self.status.excluded_from_total() {
            return "skipped".to_string();
        }
        if self.actual_duration != self.duration {
            format!("{}→{} min", self.duration, self.actual_duration)
        } else {
            self.duration_label()
        }
    }
}

/// Fully resolved journey ready for rendering. Rebuilt fresh every refresh
/// cycle by the engine; never mutated across cycles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JourneyDisplay {
    /// Origin label (home address or name)
    pub origin: String,
    /// Destination label (work address or name)
    pub destination: String,
    /// The single wall-clock read this display was built from
    pub now: DateTime<Local>,
    pub weather: Option<DisplayWeather>,
    pub status: JourneyStatus,
    /// Aggregate delay over all steps, in minutes
    pub delay_minutes: i64,
    /// Free-text status line shown on the status bar
    pub status_message: String,
    /// Target arrival instant ("today at HH:MM", rolled to tomorrow if past)
    pub target_arrival: DateTime<Local>,
    /// Ordered itinerary, numbered contiguously from 1
    pub steps: Vec<JourneyStep>,
    /// Derived: Σ effective duration over non-skipped/non-cancelled steps
    pub total_duration: i64,
    pub source: DataSource,
    /// Evening work→home direction; set by the containing service
    pub homebound: bool,
}

impl JourneyDisplay {
    /// Recompute both derived totals from the current step list.
    pub fn recalculate_totals(&mut self) {
        self.total_duration = self
            .steps
            .iter()
            .filter(|s| !s.status.excluded_from_total())
            .map(|s| s.effective_duration())
            .sum();
        self.delay_minutes = self.steps.iter().map(|s| s.delay_minutes).sum();
    }

    /// Find a step by its 1-based number.
    pub fn step(&self, number: u32) -> Option<&JourneyStep> {
        self.steps.iter().find(|s| s.number == number)
    }

    fn step_mut(&mut self, number: u32) -> Option<&mut JourneyStep> {
        self.steps.iter_mut().find(|s| s.number == number)
    }

    /// Mark a step delayed by `delay` minutes. Silent no-op for an unknown
    /// step number, like the other mutator helpers.
    pub fn apply_delay_to_step(&mut self, number: u32, delay: i64) {
        if let Some(step) = self.step_mut(number) {
            step.status = StepStatus::Delayed;
            step.delay_minutes = delay;
            step.actual_duration = step.duration + delay;
        }
        self.recalculate_totals();
    }

    /// Elide a step from the itinerary total.
    pub fn skip_step(&mut self, number: u32) {
        if let Some(step) = self.step_mut(number) {
            step.status = StepStatus::Skipped;
            step.actual_duration = 0;
            step.delay_minutes = 0;
        }
        self.recalculate_totals();
    }

    /// Cancel a step (service not running). The leg stays visible but no
    /// longer contributes to the total.
    pub fn cancel_step(&mut self, number: u32) {
        if let Some(step) = self.step_mut(number) {
            step.status = StepStatus::Cancelled;
        }
        self.recalculate_totals();
    }

    /// Stretch a step by `extra` minutes without counting it as a delay.
    pub fn extend_step(&mut self, number: u32, extra: i64) {
        if let Some(step) = self.step_mut(number) {
            step.status = StepStatus::Extended;
            step.actual_duration = step.duration + extra;
        }
        self.recalculate_totals();
    }

    /// Flatten into the plain renderer-facing record.
    pub fn to_record(&self) -> DisplayRecord {
        DisplayRecord {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            now: self.now.to_rfc3339(),
            weather: self.weather.clone(),
            status: self.status,
            delay_minutes: self.delay_minutes,
            status_message: self.status_message.clone(),
            target_arrival: self.target_arrival.to_rfc3339(),
            steps: self.steps.iter().map(StepRecord::from).collect(),
            total_duration: self.total_duration,
            source: self.source,
            homebound: self.homebound,
        }
    }
}

/// Per-step record in the renderer contract: every primitive field plus
/// every derived display value, so a renderer never re-derives display logic.
#[derive(Clone, Debug, Serialize)]
pub struct StepRecord {
    pub number: u32,
    pub mode: TransportMode,
    pub title: String,
    pub subtitle: String,
    pub duration: i64,
    pub actual_duration: i64,
    pub delay_minutes: i64,
    pub status: StepStatus,
    pub route_number: Option<String>,
    pub direction: Option<String>,
    pub platform: Option<String>,
    pub departures: Option<Vec<i64>>,
    pub coffee_decision: Option<CoffeeDecision>,
    pub coffee_reason: Option<String>,
    pub disruption_message: Option<String>,
    pub is_optional: bool,
    pub duration_label: String,
    pub duration_display: String,
    pub has_delay: bool,
}

impl From<&JourneyStep> for StepRecord {
    fn from(step: &JourneyStep) -> Self {
        StepRecord {
            number: step.number,
            mode: step.mode,
            title: step.title.clone(),
            subtitle: step.subtitle.clone(),
            duration: step.duration,
            actual_duration: step.actual_duration,
            delay_minutes: step.delay_minutes,
            status: step.status,
            route_number: step.route_number.clone(),
            direction: step.direction.clone(),
            platform: step.platform.clone(),
            departures: step.departures.clone(),
            coffee_decision: step.coffee_decision,
            coffee_reason: step.coffee_reason.clone(),
            disruption_message: step.disruption_message.clone(),
            is_optional: step.is_optional,
            duration_label: step.duration_label(),
            duration_display: step.duration_display(),
            has_delay: step.has_delay(),
        }
    }
}

/// Whole-display record in the renderer contract.
#[derive(Clone, Debug, Serialize)]
pub struct DisplayRecord {
    pub origin: String,
    pub destination: String,
    /// ISO-8601 instant of the build's wall-clock read
    pub now: String,
    pub weather: Option<DisplayWeather>,
    pub status: JourneyStatus,
    pub delay_minutes: i64,
    pub status_message: String,
    /// ISO-8601 target arrival instant
    pub target_arrival: String,
    pub steps: Vec<StepRecord>,
    pub total_duration: i64,
    pub source: DataSource,
    pub homebound: bool,
}
