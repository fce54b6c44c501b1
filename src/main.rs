//! Simulated compass session
//!
//! Drives the compass with scripted sensor readings on a manual clock and
//! prints what the render sink received. Pass a JSON config path as the first
//! argument to override the built-in landmarks and timing.

use landmark_compass::api::StatusChannel;
use landmark_compass::hardware::{
    MockLocationProvider, MockOrientationProvider, RecordingRenderSink, RecordingStatusSink,
};
use landmark_compass::{
    format_distance, CompassConfig, ConfigurationManager, LandmarkCompass, LocationFix, ManualClock,
    OrientationReading,
};
use log::{info, warn};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match ConfigurationManager::from_file(&path) {
            Ok(manager) => manager.config().clone(),
            Err(e) => {
                warn!("Using built-in configuration: {}", e);
                CompassConfig::default()
            }
        },
        None => CompassConfig::default(),
    };
    info!("Tracking {} landmarks", config.landmarks.len());

    let clock = ManualClock::new();
    let render = RecordingRenderSink::new()
        .with_compass_diameter(320.0)
        .with_icon_size("tower", 40.0, 64.0)
        .with_icon_size("tree", 32.0, 72.0)
        .with_icon_size("fuji", 56.0, 40.0);
    let status = RecordingStatusSink::new();
    let mut location = MockLocationProvider::new();
    let mut orientation = MockOrientationProvider::new();

    let mut compass = LandmarkCompass::new(
        config.clone(),
        Box::new(render.clone()),
        Box::new(status.clone()),
        Box::new(clock.clone()),
    );

    println!("=== Landmark Compass - Simulated Session ===\n");

    compass.start_compass(&mut orientation);
    compass.start(&mut location);

    // First fix near Tokyo Station
    clock.advance_ms(800);
    compass.handle_location_fix(Ok(LocationFix::new(35.6812, 139.7671)));
    print_directions(&compass, &config);

    // Device turning at ~100 Hz; the throttle lets ~30 Hz through
    let mut applied = 0;
    for step in 0..100 {
        clock.advance_ms(10);
        let alpha = 360.0 - (step as f64 * 0.9);
        if compass.handle_orientation(OrientationReading::from_alpha(alpha)) {
            applied += 1;
        }
        compass.poll();
    }
    println!(
        "\nOrientation: 100 readings, {} applied, heading now {:.1} deg",
        applied,
        compass.state().current_heading_degrees()
    );

    // GPS jitter followed by a real walk
    compass.handle_location_update(Ok(LocationFix::new(35.68121, 139.76712)));
    for step in 1..=5 {
        clock.advance_ms(5_000);
        compass.handle_location_update(Ok(LocationFix::new(35.6812 + 0.0005 * step as f64, 139.7671)));
        compass.poll();
    }
    println!(
        "Location: {} updates accepted, {} ignored, recomputes so far {}",
        compass.movement_filter().accepted(),
        compass.movement_filter().rejected(),
        compass.recompute_count()
    );

    while let Some(deadline) = compass.next_deadline() {
        clock.set(deadline);
        compass.poll();
    }
    println!("After quiet period: recomputes {}", compass.recompute_count());
    print_directions(&compass, &config);

    println!("\nRender sink state:");
    for (element, transform) in render.current_transforms() {
        println!("   {:<22} {}", element, transform);
    }

    println!("\nStatus messages:");
    for channel in [StatusChannel::Location, StatusChannel::Compass] {
        if let Some(message) = status.latest(channel) {
            println!("   {:<9} {}", channel, message);
        }
    }

    compass.teardown(&mut location, &mut orientation);
    let stats = compass.scheduler_stats();
    println!(
        "\nScheduler: {} throttled runs, {} drops, {} debounce restarts, {} deferred runs",
        stats.throttled_runs, stats.throttled_drops, stats.debounce_restarts, stats.deferred_runs
    );
    println!("\nSnapshot: {}", serde_json::to_string_pretty(&compass.snapshot())?);

    Ok(())
}

fn print_directions(compass: &LandmarkCompass, config: &CompassConfig) {
    println!("\nDirections from {:?}:", compass.state().current_location());
    for result in compass.latest_results() {
        println!(
            "   {:<8} bearing {:>6.1} deg   {}",
            result.landmark_id,
            result.bearing_degrees,
            format_distance(result.distance_km, config.distance_unit)
        );
    }
}
