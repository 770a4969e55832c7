//! # Journey Preview Rendering
//!
//! Development-mode ASCII rendering of a computed journey. The production
//! pixel renderer lives in the containing service next to the panel driver;
//! this one exists so the itinerary can be eyeballed on any terminal with
//! `commute-tracker` and no hardware attached.
//!
//! Everything a line shows comes from the display's derived values
//! (`duration_display`, status, subtitles); no display logic is re-derived
//! here.

use crate::model::{
    DataSource, JourneyDisplay, JourneyStatus, JourneyStep, StepStatus, TransportMode,
};

/// Short uppercase tag for the mode column.
fn mode_tag(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Train => "TRAIN",
        TransportMode::Tram => "TRAM",
        TransportMode::Bus => "BUS",
        TransportMode::Vline => "VLINE",
        TransportMode::Ferry => "FERRY",
        TransportMode::Walk => "WALK",
        TransportMode::Coffee => "CAFE",
    }
}

/// One-character status marker in front of a step line.
fn status_marker(status: StepStatus) -> char {
    match status {
        StepStatus::Normal => ' ',
        StepStatus::Active => '>',
        StepStatus::Delayed => '!',
        StepStatus::Skipped => '-',
        StepStatus::Cancelled => 'x',
        StepStatus::Diverted => '~',
        StepStatus::Extended => '+',
        StepStatus::Completed => '*',
    }
}

/// Banner text for the status bar.
pub fn status_banner(status: JourneyStatus) -> &'static str {
    match status {
        JourneyStatus::OnTime => "ON TIME",
        JourneyStatus::Delay => "DELAYED",
        JourneyStatus::Disruption => "DISRUPTION",
        JourneyStatus::Diversion => "DIVERSION",
        JourneyStatus::LeaveNow => "LEAVE NOW",
    }
}

/// Format a single itinerary line, e.g.
/// ` 4 ! TRAM   Tram 19                          10→14 min  Brunswick Rd → Flinders St`
fn format_step_line(step: &JourneyStep) -> String {
    let mut line = format!(
        "{:>2} {} {:<6} {:<34} {:>10}",
        step.number,
        status_marker(step.status),
        mode_tag(step.mode),
        step.title,
        step.duration_display(),
    );
    if !step.subtitle.is_empty() {
        line.push_str("  ");
        line.push_str(&step.subtitle);
    }
    line
}

fn format_header(journey: &JourneyDisplay) -> String {
    let mut header = format!(
        "{}  {} -> {}",
        journey.now.format("%H:%M"),
        journey.origin,
        journey.destination
    );
    if let Some(weather) = &journey.weather {
        header.push_str(&format!(
            "  |  {:.0}°C {}",
            weather.temperature, weather.condition
        ));
        if weather.umbrella {
            header.push_str("  ☂ bring umbrella");
        }
    }
    header
}

fn format_status_line(journey: &JourneyDisplay) -> String {
    format!(
        "{}: {}  |  total {} min  |  arrive {}",
        status_banner(journey.status),
        journey.status_message,
        journey.total_duration,
        journey.target_arrival.format("%H:%M"),
    )
}

/// Render the journey to stdout.
pub fn draw_ascii(journey: &JourneyDisplay) {
    println!("{}", format_header(journey));
    println!("{}", format_status_line(journey));
    println!();
    for step in &journey.steps {
        println!("{}", format_step_line(step));
    }
    if journey.source == DataSource::Fallback {
        println!();
        println!("⚠ OFFLINE (scheduled data only)");
    }
}
