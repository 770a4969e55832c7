//! # Journey Display Engine
//!
//! Pure transform from (static config, live inputs, current time) to a fully
//! resolved [`JourneyDisplay`]. The engine performs no I/O: it reads the wall
//! clock once per build (or takes an explicit instant in tests) and degrades
//! silently when live data is missing, so a build never fails.
//!
//! ## Pipeline
//!
//! 1. Compute the target arrival ("today at HH:MM", rolled to tomorrow if
//!    already past)
//! 2. Lay out the step sequence: optional coffee legs, walk to the first
//!    stop, each transit leg with interchange walks, walk to the destination
//! 3. Match transit legs against live departures (exact route number, first
//!    match wins)
//! 4. Apply disruptions, run the coffee decision, derive the overall status
//!
//! ## Business Constants
//!
//! The coffee thresholds are inherited business rules. They are named here
//! rather than re-derived; do not tune them without product sign-off.

use crate::config::{CafePosition, JourneyConfig, StopConfig, TransitLegConfig};
use crate::geo::{self, Coordinates};
use crate::live::{Disruption, LiveData, LiveDeparture};
use crate::model::{
    CoffeeDecision, DataSource, DisplayWeather, JourneyDisplay, JourneyStatus, JourneyStep,
    StepStatus, TransportMode,
};
use chrono::{DateTime, Duration, Local};

/// Minimum slack (beyond the cafe duration) required to keep the coffee stop.
pub const MIN_COFFEE_SLACK: i64 = 3;

/// Extra slack (beyond the cafe duration) required before a disruption turns
/// the stop into a long coffee.
pub const EXTENDED_COFFEE_BUFFER: i64 = 10;

/// How much longer an extended coffee runs past the configured duration.
pub const EXTENDED_COFFEE_BONUS: i64 = 5;

/// Delay assumed for a diversion when the operator doesn't quantify it.
pub const DEFAULT_DIVERSION_DELAY: i64 = 5;

/// Walking minutes assumed when neither an override nor coordinates exist.
const DEFAULT_WALK_MINUTES: i64 = 5;

/// Default for the walk between two consecutive transit legs.
const DEFAULT_INTERCHANGE_MINUTES: i64 = 5;

/// How many upcoming departure offsets a transit step carries.
const MAX_UPCOMING_DEPARTURES: usize = 3;

/// Condition substrings that flip the "bring umbrella" flag.
const RAIN_KEYWORDS: [&str; 5] = ["rain", "shower", "drizzle", "storm", "thunder"];

/// Build a journey display from the current wall clock.
///
/// This is the one place the engine reads the clock; everything downstream of
/// the read is time-consistent within the build.
pub fn build_journey_display(config: &JourneyConfig, live: &LiveData) -> JourneyDisplay {
    build_journey_display_at(config, live, Local::now())
}

/// Build a journey display for an explicit instant.
///
/// Same transform as [`build_journey_display`] with the clock read replaced
/// by `now`; used by tests and by callers replaying historical cycles.
pub fn build_journey_display_at(
    config: &JourneyConfig,
    live: &LiveData,
    now: DateTime<Local>,
) -> JourneyDisplay {
    let target_arrival = target_arrival_instant(&config.journey.target_arrival, now);
    let coffee_before =
        config.coffee.enabled && config.coffee.position == CafePosition::BeforeTransit;

    let mut steps: Vec<JourneyStep> = Vec::new();

    if coffee_before {
        let mut walk = JourneyStep::new(
            0,
            TransportMode::Walk,
            format!("Walk to {}", config.coffee.cafe_name),
            walk_minutes(
                config,
                "home_to_cafe",
                config.journey.home_coords,
                config.coffee.cafe_coords,
            ),
        );
        walk.subtitle = config.coffee.cafe_address.clone();
        steps.push(walk);

        let mut coffee = JourneyStep::new(
            0,
            TransportMode::Coffee,
            config.coffee.cafe_name.clone(),
            config.coffee.duration_minutes,
        );
        coffee.subtitle = "☕ Time for coffee".to_string();
        coffee.is_optional = true;
        steps.push(coffee);
    }

    // Where the walking chain currently stands
    let (depart_coords, first_walk_key) = if coffee_before {
        (config.coffee.cafe_coords, "cafe_to_stop")
    } else {
        (config.journey.home_coords, "home_to_stop")
    };

    let mut last_coords = depart_coords;
    if let Some(first_leg) = config.transit.first() {
        steps.push(walk_to_stop(
            config,
            first_walk_key,
            depart_coords,
            &first_leg.origin_stop,
        ));

        for (i, leg) in config.transit.iter().enumerate() {
            steps.push(transit_step(leg, &live.departures, now));
            if let Some(next_leg) = config.transit.get(i + 1) {
                steps.push(walk_to_stop(
                    config,
                    "interchange",
                    leg.destination_stop.coords,
                    &next_leg.origin_stop,
                ));
            }
        }

        last_coords = config
            .transit
            .last()
            .and_then(|leg| leg.destination_stop.coords);
    }

    let mut final_walk = JourneyStep::new(
        0,
        TransportMode::Walk,
        "Walk to work".to_string(),
        walk_minutes(config, "stop_to_work", last_coords, config.journey.work_coords),
    );
    final_walk.subtitle = config.journey.work_address.clone();
    steps.push(final_walk);

    // Steps are numbered contiguously 1..N
    for (i, step) in steps.iter_mut().enumerate() {
        step.number = i as u32 + 1;
    }

    let weather = live.weather.as_ref().map(|obs| DisplayWeather {
        temperature: obs.temperature,
        condition: obs.condition.clone(),
        umbrella: needs_umbrella(&obs.condition),
    });

    let mut journey = JourneyDisplay {
        origin: config.journey.home_address.clone(),
        destination: config.journey.work_address.clone(),
        now,
        weather,
        status: JourneyStatus::LeaveNow,
        delay_minutes: 0,
        status_message: String::new(),
        target_arrival,
        steps,
        total_duration: 0,
        source: if live.is_empty() {
            DataSource::Fallback
        } else {
            DataSource::Live
        },
        homebound: false,
    };

    apply_disruptions(&mut journey, &live.disruptions);
    make_coffee_decision(&mut journey, config);
    calculate_journey_status(&mut journey);
    journey
}

/// Apply operator disruptions to the matching steps.
///
/// Each disruption with `affects_journey` lands on the first step whose route
/// number matches its line name (see [`route_matches_line`]). Unknown type
/// tags are ignored.
pub fn apply_disruptions(journey: &mut JourneyDisplay, disruptions: &[Disruption]) {
    for disruption in disruptions.iter().filter(|d| d.affects_journey) {
        let matched = journey.steps.iter_mut().find(|step| {
            step.route_number
                .as_deref()
                .is_some_and(|route| route_matches_line(route, &disruption.line_name))
        });
        let Some(step) = matched else { continue };

        match disruption.disruption_type.as_str() {
            "suspension" => {
                step.status = StepStatus::Cancelled;
                step.disruption_message = Some(disruption.description.clone());
            }
            "diversion" => {
                step.status = StepStatus::Diverted;
                step.disruption_message = Some(disruption.description.clone());
                let delay = disruption.delay_minutes.unwrap_or(DEFAULT_DIVERSION_DELAY);
                step.delay_minutes = delay;
                step.actual_duration = step.duration + delay;
            }
            "delay" => {
                if let Some(delay) = disruption.delay_minutes {
                    step.status = StepStatus::Delayed;
                    step.delay_minutes = delay;
                    step.actual_duration = step.duration + delay;
                }
            }
            _ => {}
        }
    }
    journey.recalculate_totals();
}

/// Decide whether the coffee stop is kept, skipped, or extended.
///
/// Evaluated in strict priority order:
/// 1. Not enough slack: SKIP, and the preceding "Walk to X" leg is relabeled
///    "Walk past X" (the leg itself is unchanged)
/// 2. Another step is cancelled/delayed and there is ample slack: EXTENDED
///    (might as well enjoy the wait)
/// 3. Otherwise the stop keeps its build-time NORMAL state
pub fn make_coffee_decision(journey: &mut JourneyDisplay, config: &JourneyConfig) {
    if !config.coffee.enabled {
        return;
    }
    let Some(coffee_idx) = journey
        .steps
        .iter()
        .position(|s| s.mode == TransportMode::Coffee)
    else {
        return;
    };

    let without_coffee: i64 = journey
        .steps
        .iter()
        .filter(|s| s.mode != TransportMode::Coffee && s.status != StepStatus::Cancelled)
        .map(|s| s.effective_duration())
        .sum();
    let available = (journey.target_arrival - journey.now).num_minutes();
    let slack = available - without_coffee;
    let cafe_duration = config.coffee.duration_minutes;

    let other_step_disrupted = journey.steps.iter().enumerate().any(|(i, s)| {
        i != coffee_idx && matches!(s.status, StepStatus::Cancelled | StepStatus::Delayed)
    });

    if slack <= cafe_duration + MIN_COFFEE_SLACK {
        let step = &mut journey.steps[coffee_idx];
        step.status = StepStatus::Skipped;
        step.coffee_decision = Some(CoffeeDecision::Skip);
        step.coffee_reason = Some("Running late".to_string());
        step.actual_duration = 0;
        step.subtitle = "✗ SKIP — Running late".to_string();

        // The walk still happens, only its label changes
        if coffee_idx > 0 {
            let walk = &mut journey.steps[coffee_idx - 1];
            if let Some(rest) = walk.title.strip_prefix("Walk to ") {
                walk.title = format!("Walk past {rest}");
            }
        }
    } else if other_step_disrupted && slack > cafe_duration + EXTENDED_COFFEE_BUFFER {
        let step = &mut journey.steps[coffee_idx];
        step.status = StepStatus::Extended;
        step.coffee_decision = Some(CoffeeDecision::Extend);
        step.coffee_reason = Some("Disruption".to_string());
        step.subtitle = "✓ EXTRA TIME — Disruption".to_string();
        step.actual_duration = cafe_duration + EXTENDED_COFFEE_BONUS;
    }

    journey.recalculate_totals();
}

/// Derive the overall journey status with fixed precedence: cancellation
/// beats diversion beats delay; with none of those the display says
/// "leave now" (there is deliberately no buffered "leave in N minutes").
pub fn calculate_journey_status(journey: &mut JourneyDisplay) {
    journey.recalculate_totals();

    let any_cancelled = journey
        .steps
        .iter()
        .any(|s| s.status == StepStatus::Cancelled);
    let any_diverted = journey
        .steps
        .iter()
        .any(|s| s.status == StepStatus::Diverted);

    if any_cancelled {
        journey.status = JourneyStatus::Disruption;
        journey.status_message = "Service disruption on route".to_string();
    } else if any_diverted {
        journey.status = JourneyStatus::Diversion;
        journey.status_message = "Route diverted".to_string();
    } else if journey.delay_minutes > 0 {
        journey.status = JourneyStatus::Delay;
        journey.status_message = format!("Delayed {} min", journey.delay_minutes);
    } else {
        journey.status = JourneyStatus::LeaveNow;
        journey.status_message = "Leave now".to_string();
    }
}

/// The one place a disruption's free-text line name meets a step's route
/// number. Case-sensitive containment, matching what the transit feed emits;
/// harden here if the feed format changes.
pub fn route_matches_line(route_number: &str, line_name: &str) -> bool {
    line_name.contains(route_number)
}

/// True when the condition text mentions rain in any form.
pub fn needs_umbrella(condition: &str) -> bool {
    let lowered = condition.to_lowercase();
    RAIN_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// "Today at HH:MM", rolled to tomorrow when that instant has already passed.
///
/// Parsing is deliberately lenient: malformed components read as zero and
/// out-of-range values wrap, producing a defined-but-wrong instant rather
/// than an error (validation is an upstream responsibility).
fn target_arrival_instant(target: &str, now: DateTime<Local>) -> DateTime<Local> {
    let mut parts = target.splitn(2, ':');
    let hour: u32 = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(0)
        % 24;
    let minute: u32 = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(0)
        % 60;

    let naive = now
        .date_naive()
        .and_hms_opt(hour, minute, 0)
        .unwrap_or_else(|| now.naive_local());
    let arrival = naive.and_local_timezone(Local).earliest().unwrap_or(now);

    if arrival <= now {
        arrival + Duration::days(1)
    } else {
        arrival
    }
}

/// Walking minutes for a named leg: manual override, then a coordinate
/// estimate, then the mode default.
fn walk_minutes(
    config: &JourneyConfig,
    key: &str,
    from: Option<Coordinates>,
    to: Option<Coordinates>,
) -> i64 {
    if let Some(minutes) = config.walking_override(key) {
        return minutes;
    }
    if let (Some(from), Some(to)) = (from, to) {
        return geo::walking_minutes(from, to);
    }
    if key == "interchange" {
        DEFAULT_INTERCHANGE_MINUTES
    } else {
        DEFAULT_WALK_MINUTES
    }
}

fn walk_to_stop(
    config: &JourneyConfig,
    key: &str,
    from: Option<Coordinates>,
    stop: &StopConfig,
) -> JourneyStep {
    let mut step = JourneyStep::new(
        0,
        TransportMode::Walk,
        format!("Walk to {}", stop.name),
        walk_minutes(config, key, from, stop.coords),
    );
    step.subtitle = stop.name.clone();
    step
}

/// Build a transit step, folding in the first matching live departure.
///
/// Matching is exact route-number equality, first match wins; an unmatched
/// leg keeps its scheduled duration with zero delay.
fn transit_step(
    leg: &TransitLegConfig,
    departures: &[LiveDeparture],
    now: DateTime<Local>,
) -> JourneyStep {
    let mut step = JourneyStep::new(
        0,
        leg.mode,
        format!("{} {}", leg.mode.label(), leg.route_number),
        leg.duration_minutes,
    );
    step.subtitle = format!("{} → {}", leg.origin_stop.name, leg.destination_stop.name);
    step.route_number = Some(leg.route_number.clone());
    step.direction = leg.direction.clone();
    step.platform = leg.platform.clone();

    if let Some(dep) = departures
        .iter()
        .find(|d| d.route_number == leg.route_number)
    {
        if let Some(platform) = &dep.platform {
            step.platform = Some(platform.clone());
        }
        if dep.cancelled {
            step.status = StepStatus::Cancelled;
        } else if dep.delay_minutes > 0 {
            step.status = StepStatus::Delayed;
            step.delay_minutes = dep.delay_minutes;
            step.actual_duration = step.duration + dep.delay_minutes;
        }
    }

    let offsets: Vec<i64> = departures
        .iter()
        .filter(|d| d.route_number == leg.route_number)
        .filter_map(|d| d.departure_time())
        .map(|t| (t - now).num_minutes())
        .filter(|m| *m >= 0)
        .take(MAX_UPCOMING_DEPARTURES)
        .collect();
    if !offsets.is_empty() {
        step.departures = Some(offsets);
    }

    step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoffeeConfig, JourneySection, StopConfig};
    use crate::live::WeatherObservation;
    use chrono::TimeZone;

    fn test_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 16, 8, 0, 0).unwrap()
    }

    fn leg(mode: TransportMode, route: &str, minutes: i64) -> TransitLegConfig {
        TransitLegConfig {
            mode,
            route_number: route.to_string(),
            direction: None,
            origin_stop: StopConfig {
                name: format!("{route} origin"),
                coords: None,
            },
            destination_stop: StopConfig {
                name: format!("{route} destination"),
                coords: None,
            },
            duration_minutes: minutes,
            platform: None,
        }
    }

    /// Coffee enabled, fixed walking overrides so durations are exact:
    /// walks 3 + 3 + 4 = 10 minutes around the transit legs.
    fn test_config(legs: Vec<TransitLegConfig>) -> JourneyConfig {
        let mut config = JourneyConfig {
            journey: JourneySection {
                home_address: "Home".to_string(),
                work_address: "Work".to_string(),
                home_coords: None,
                work_coords: None,
                target_arrival: "09:00".to_string(),
                region: "VIC".to_string(),
            },
            coffee: CoffeeConfig {
                enabled: true,
                cafe_name: "Padre".to_string(),
                cafe_address: "Sydney Rd".to_string(),
                cafe_coords: None,
                duration_minutes: 5,
                position: CafePosition::BeforeTransit,
            },
            transit: legs,
            walking_overrides: std::collections::HashMap::new(),
        };
        config.walking_overrides.insert("home_to_cafe".to_string(), 3);
        config.walking_overrides.insert("cafe_to_stop".to_string(), 3);
        config.walking_overrides.insert("home_to_stop".to_string(), 3);
        config.walking_overrides.insert("interchange".to_string(), 2);
        config.walking_overrides.insert("stop_to_work".to_string(), 4);
        config
    }

    #[test]
    fn test_leg_structure_with_coffee_and_two_transit_legs() {
        let config = test_config(vec![
            leg(TransportMode::Tram, "19", 10),
            leg(TransportMode::Train, "Craigieburn", 15),
        ]);
        let journey = build_journey_display_at(&config, &LiveData::default(), test_now());

        let modes: Vec<TransportMode> = journey.steps.iter().map(|s| s.mode).collect();
        assert_eq!(
            modes,
            vec![
                TransportMode::Walk,
                TransportMode::Coffee,
                TransportMode::Walk,
                TransportMode::Tram,
                TransportMode::Walk,
                TransportMode::Train,
                TransportMode::Walk,
            ]
        );

        let numbers: Vec<u32> = journey.steps.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);

        let coffee = &journey.steps[1];
        assert!(coffee.is_optional);
        assert_eq!(coffee.status, StepStatus::Normal);
        assert_eq!(coffee.subtitle, "☕ Time for coffee");
    }

    #[test]
    fn test_scenario_a_relaxed_morning() {
        // 08:00 now, 09:00 arrival, one 10-minute leg, cafe 5 min:
        // withoutCoffee = 3+3+10+4 = 20, slack = 60-20 = 40 >= 8
        let config = test_config(vec![leg(TransportMode::Tram, "19", 10)]);
        let journey = build_journey_display_at(&config, &LiveData::default(), test_now());

        let coffee = journey
            .steps
            .iter()
            .find(|s| s.mode == TransportMode::Coffee)
            .unwrap();
        assert_eq!(coffee.status, StepStatus::Normal);
        assert!(coffee.coffee_decision.is_none());

        assert_eq!(journey.status, JourneyStatus::LeaveNow);
        assert_eq!(journey.total_duration, 25);
        assert_eq!(journey.delay_minutes, 0);
        assert_eq!(journey.source, DataSource::Fallback);
    }

    #[test]
    fn test_scenario_b_suspension_extends_coffee() {
        let config = test_config(vec![leg(TransportMode::Tram, "19", 10)]);
        let live = LiveData {
            disruptions: vec![Disruption {
                disruption_type: "suspension".to_string(),
                line_name: "Route 19 Tram".to_string(),
                description: "Buses replace trams".to_string(),
                affects_journey: true,
                delay_minutes: None,
            }],
            ..LiveData::default()
        };
        let journey = build_journey_display_at(&config, &live, test_now());

        let tram = journey
            .steps
            .iter()
            .find(|s| s.mode == TransportMode::Tram)
            .unwrap();
        assert_eq!(tram.status, StepStatus::Cancelled);
        assert_eq!(tram.disruption_message.as_deref(), Some("Buses replace trams"));

        // withoutCoffee drops to 10 (walks only), slack 50 > 5+10
        let coffee = journey
            .steps
            .iter()
            .find(|s| s.mode == TransportMode::Coffee)
            .unwrap();
        assert_eq!(coffee.status, StepStatus::Extended);
        assert_eq!(coffee.coffee_decision, Some(CoffeeDecision::Extend));
        assert_eq!(coffee.actual_duration, 5 + EXTENDED_COFFEE_BONUS);
        assert_eq!(coffee.subtitle, "✓ EXTRA TIME — Disruption");

        assert_eq!(journey.status, JourneyStatus::Disruption);
        // Cancelled tram excluded: 3 + 10 + 3 + 4 walks/coffee
        assert_eq!(journey.total_duration, 20);
    }

    #[test]
    fn test_coffee_skip_boundary() {
        // available = 40 min (arrival 08:40), cafe 5: skip iff slack <= 8
        let mut config = test_config(vec![leg(TransportMode::Tram, "19", 15)]);
        config.journey.target_arrival = "08:40".to_string();

        // withoutCoffee = 3+3+15+11 = 32, slack = 8: skip
        config.walking_overrides.insert("stop_to_work".to_string(), 11);
        let journey = build_journey_display_at(&config, &LiveData::default(), test_now());
        let coffee = journey.steps.iter().find(|s| s.mode == TransportMode::Coffee);
        assert_eq!(coffee.unwrap().status, StepStatus::Skipped);

        // One minute less slack (7): still skipped
        config.walking_overrides.insert("stop_to_work".to_string(), 12);
        let journey = build_journey_display_at(&config, &LiveData::default(), test_now());
        let coffee = journey.steps.iter().find(|s| s.mode == TransportMode::Coffee);
        assert_eq!(coffee.unwrap().status, StepStatus::Skipped);

        // One minute more slack (9): kept
        config.walking_overrides.insert("stop_to_work".to_string(), 10);
        let journey = build_journey_display_at(&config, &LiveData::default(), test_now());
        let coffee = journey.steps.iter().find(|s| s.mode == TransportMode::Coffee);
        assert_eq!(coffee.unwrap().status, StepStatus::Normal);
    }

    #[test]
    fn test_skipped_coffee_relabels_walk_and_zeroes_duration() {
        let mut config = test_config(vec![leg(TransportMode::Tram, "19", 40)]);
        config.journey.target_arrival = "08:45".to_string();
        let journey = build_journey_display_at(&config, &LiveData::default(), test_now());

        let coffee = journey
            .steps
            .iter()
            .find(|s| s.mode == TransportMode::Coffee)
            .unwrap();
        assert_eq!(coffee.status, StepStatus::Skipped);
        assert_eq!(coffee.actual_duration, 0);
        assert_eq!(coffee.coffee_reason.as_deref(), Some("Running late"));
        assert_eq!(coffee.subtitle, "✗ SKIP — Running late");

        // The preceding walk keeps its length but changes label
        let walk = &journey.steps[0];
        assert_eq!(walk.title, "Walk past Padre");
        assert_eq!(walk.actual_duration, 3);

        // Skipped coffee is elided from the total: 3+3+40+4
        assert_eq!(journey.total_duration, 50);
    }

    #[test]
    fn test_departure_matching_applies_delay_and_platform() {
        let config = test_config(vec![leg(TransportMode::Train, "Craigieburn", 20)]);
        let now = test_now();
        let live = LiveData {
            departures: vec![
                // Wrong route: must not match even though it comes first
                LiveDeparture {
                    route_number: "Upfield".to_string(),
                    scheduled: Some(now + Duration::minutes(2)),
                    estimated: None,
                    platform: Some("3".to_string()),
                    delay_minutes: 9,
                    cancelled: false,
                },
                LiveDeparture {
                    route_number: "Craigieburn".to_string(),
                    scheduled: Some(now + Duration::minutes(6)),
                    estimated: Some(now + Duration::minutes(10)),
                    platform: Some("1".to_string()),
                    delay_minutes: 4,
                    cancelled: false,
                },
                LiveDeparture {
                    route_number: "Craigieburn".to_string(),
                    scheduled: Some(now + Duration::minutes(26)),
                    estimated: None,
                    platform: None,
                    delay_minutes: 0,
                    cancelled: false,
                },
            ],
            ..LiveData::default()
        };
        let journey = build_journey_display_at(&config, &live, now);

        let train = journey
            .steps
            .iter()
            .find(|s| s.mode == TransportMode::Train)
            .unwrap();
        assert_eq!(train.status, StepStatus::Delayed);
        assert_eq!(train.delay_minutes, 4);
        assert_eq!(train.actual_duration, 24);
        assert_eq!(train.platform.as_deref(), Some("1"));
        assert_eq!(train.departures, Some(vec![10, 26]));
        assert_eq!(journey.status, JourneyStatus::Delay);
        assert_eq!(journey.status_message, "Delayed 4 min");
        assert_eq!(journey.source, DataSource::Live);
    }

    #[test]
    fn test_unmatched_leg_keeps_schedule() {
        let config = test_config(vec![leg(TransportMode::Tram, "19", 10)]);
        let now = test_now();
        let live = LiveData {
            departures: vec![LiveDeparture {
                route_number: "58".to_string(),
                scheduled: Some(now + Duration::minutes(5)),
                estimated: None,
                platform: None,
                delay_minutes: 12,
                cancelled: false,
            }],
            ..LiveData::default()
        };
        let journey = build_journey_display_at(&config, &live, now);

        let tram = journey
            .steps
            .iter()
            .find(|s| s.mode == TransportMode::Tram)
            .unwrap();
        assert_eq!(tram.status, StepStatus::Normal);
        assert_eq!(tram.delay_minutes, 0);
        assert_eq!(tram.actual_duration, 10);
        assert!(tram.departures.is_none());
    }

    #[test]
    fn test_cancelled_departure_cancels_step() {
        let config = test_config(vec![leg(TransportMode::Train, "Upfield", 18)]);
        let live = LiveData {
            departures: vec![LiveDeparture {
                route_number: "Upfield".to_string(),
                scheduled: None,
                estimated: None,
                platform: None,
                delay_minutes: 0,
                cancelled: true,
            }],
            ..LiveData::default()
        };
        let journey = build_journey_display_at(&config, &live, test_now());

        let train = journey
            .steps
            .iter()
            .find(|s| s.mode == TransportMode::Train)
            .unwrap();
        assert_eq!(train.status, StepStatus::Cancelled);
        assert_eq!(journey.status, JourneyStatus::Disruption);
    }

    #[test]
    fn test_cancellation_outranks_diversion_and_delay() {
        let config = test_config(vec![
            leg(TransportMode::Tram, "19", 10),
            leg(TransportMode::Tram, "58", 12),
        ]);
        let live = LiveData {
            disruptions: vec![
                Disruption {
                    disruption_type: "diversion".to_string(),
                    line_name: "Route 58 Tram".to_string(),
                    description: "Diverted via Queensberry St".to_string(),
                    affects_journey: true,
                    delay_minutes: Some(3),
                },
                Disruption {
                    disruption_type: "suspension".to_string(),
                    line_name: "Route 19 Tram".to_string(),
                    description: "Suspended".to_string(),
                    affects_journey: true,
                    delay_minutes: None,
                },
            ],
            ..LiveData::default()
        };
        let journey = build_journey_display_at(&config, &live, test_now());
        assert_eq!(journey.status, JourneyStatus::Disruption);
    }

    #[test]
    fn test_diversion_without_cancellation_and_default_delay() {
        let config = test_config(vec![leg(TransportMode::Tram, "58", 12)]);
        let live = LiveData {
            disruptions: vec![Disruption {
                disruption_type: "diversion".to_string(),
                line_name: "Route 58 Tram".to_string(),
                description: "Diverted".to_string(),
                affects_journey: true,
                delay_minutes: None,
            }],
            ..LiveData::default()
        };
        let journey = build_journey_display_at(&config, &live, test_now());

        let tram = journey
            .steps
            .iter()
            .find(|s| s.mode == TransportMode::Tram)
            .unwrap();
        assert_eq!(tram.status, StepStatus::Diverted);
        assert_eq!(tram.delay_minutes, DEFAULT_DIVERSION_DELAY);
        assert_eq!(tram.actual_duration, 12 + DEFAULT_DIVERSION_DELAY);
        assert_eq!(journey.status, JourneyStatus::Diversion);
    }

    #[test]
    fn test_disruptions_ignored_when_not_affecting_journey() {
        let config = test_config(vec![leg(TransportMode::Tram, "19", 10)]);
        let live = LiveData {
            disruptions: vec![Disruption {
                disruption_type: "suspension".to_string(),
                line_name: "Route 19 Tram".to_string(),
                description: "Suspended".to_string(),
                affects_journey: false,
                delay_minutes: None,
            }],
            ..LiveData::default()
        };
        let journey = build_journey_display_at(&config, &live, test_now());
        assert_eq!(journey.status, JourneyStatus::LeaveNow);
    }

    #[test]
    fn test_coffee_disabled_is_a_no_op() {
        let mut config = test_config(vec![leg(TransportMode::Tram, "19", 10)]);
        config.coffee.enabled = false;
        let journey = build_journey_display_at(&config, &LiveData::default(), test_now());

        assert!(journey
            .steps
            .iter()
            .all(|s| s.mode != TransportMode::Coffee));
        // Walk to stop, tram, walk to work
        assert_eq!(journey.steps.len(), 3);
        assert_eq!(journey.total_duration, 3 + 10 + 4);
    }

    #[test]
    fn test_zero_transit_legs_degrades_to_walking() {
        let mut config = test_config(vec![]);
        config.coffee.enabled = false;
        let journey = build_journey_display_at(&config, &LiveData::default(), test_now());

        assert_eq!(journey.steps.len(), 1);
        assert_eq!(journey.steps[0].mode, TransportMode::Walk);
        assert_eq!(journey.steps[0].title, "Walk to work");
    }

    #[test]
    fn test_target_arrival_rolls_to_next_day() {
        let now = test_now(); // 08:00
        let today = target_arrival_instant("09:00", now);
        assert_eq!(today - now, Duration::hours(1));

        let tomorrow = target_arrival_instant("07:30", now);
        assert_eq!(tomorrow - now, Duration::hours(23) + Duration::minutes(30));
    }

    #[test]
    fn test_target_arrival_lenient_parsing() {
        let now = test_now();
        // Garbage parses to 00:00 tomorrow rather than erroring
        let garbage = target_arrival_instant("not-a-time", now);
        assert!(garbage > now);
        // Out-of-range values wrap instead of failing
        let wrapped = target_arrival_instant("25:90", now);
        assert!(wrapped > now);
    }

    #[test]
    fn test_umbrella_keywords() {
        assert!(needs_umbrella("Light rain"));
        assert!(needs_umbrella("Scattered SHOWERS"));
        assert!(needs_umbrella("Thunderstorm warning"));
        assert!(needs_umbrella("drizzle"));
        assert!(!needs_umbrella("Partly cloudy"));
        assert!(!needs_umbrella("Sunny"));
    }

    #[test]
    fn test_weather_lands_on_header() {
        let config = test_config(vec![leg(TransportMode::Tram, "19", 10)]);
        let live = LiveData {
            weather: Some(WeatherObservation {
                temperature: 12.5,
                condition: "Rain developing".to_string(),
            }),
            ..LiveData::default()
        };
        let journey = build_journey_display_at(&config, &live, test_now());

        let weather = journey.weather.unwrap();
        assert_eq!(weather.temperature, 12.5);
        assert!(weather.umbrella);
        assert_eq!(journey.source, DataSource::Live);
    }

    #[test]
    fn test_route_matching_is_substring_and_case_sensitive() {
        assert!(route_matches_line("19", "Route 19 Tram"));
        assert!(!route_matches_line("19", "Route 58 Tram"));
        assert!(route_matches_line("Craigieburn", "Craigieburn line works"));
        assert!(!route_matches_line("craigieburn", "Craigieburn line works"));
    }
}
