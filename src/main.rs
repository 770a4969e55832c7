//! # Commute Tracker Application Entry Point
//!
//! Development-mode binary: builds today's journey from the static
//! configuration and prints it as ASCII (default) or as the renderer-facing
//! JSON record (`--json`). Live transit and weather acquisition belongs to
//! the containing service, so the standalone binary always previews the
//! scheduled journey.

// Test modules
#[cfg(test)]
mod tests;

use journey_clock_lib::config::JourneyConfig;
use journey_clock_lib::live::LiveData;
use journey_clock_lib::renderer::draw_ascii;
use journey_clock_lib::engine;
use std::env;

fn main() -> anyhow::Result<()> {
    // --json: emit the serializable record instead of the ASCII preview
    let json_mode = env::args().any(|arg| arg == "--json");

    let config = JourneyConfig::load();

    // No providers are wired up here; an empty bundle yields the
    // fallback-tagged scheduled journey
    let journey = engine::build_journey_display(&config, &LiveData::default());

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&journey.to_record())?);
        return Ok(());
    }

    draw_ascii(&journey);
    Ok(())
}
