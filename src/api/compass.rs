//! Event-driven compass controller
//!
//! The host event loop feeds sensor callbacks into [`LandmarkCompass`] and
//! calls [`LandmarkCompass::poll`] each turn. Every state mutation happens
//! inside one of these calls, so no locking is needed.
//!
//! ```text
//! location watch ──► MovementFilter ──► debounce("location") ─┐
//!                                                             ├─► PositionState ──► DirectionEngine ──► CompassRenderer ──► RenderSink
//! orientation ─────► heading adapter ─► throttle("orientation")┘
//! ```

use crate::algorithms::direction::DirectionEngine;
use crate::api::render::{CompassRenderer, RenderSink};
use crate::api::state::{PositionState, StateSnapshot};
use crate::api::status::{EnglishCatalog, MessageKey, StatusChannel, StatusSink, TextCatalog};
use crate::core::{Coordinate, DirectionResult, DistanceUnit, LOCATION_CHANNEL, ORIENTATION_CHANNEL};
use crate::hardware::{LocationFix, LocationProvider, OrientationProvider, OrientationReading, SensorError, SensorResult};
use crate::processing::scheduler::{delay_from_ms, Clock, SchedulerStats, UpdateScheduler};
use crate::processing::MovementFilter;
use crate::utils::CompassConfig;
use log::{debug, info, warn};
use std::time::Duration;

/// State touched by scheduled actions
pub struct CompassPipeline {
    state: PositionState,
    engine: DirectionEngine,
    renderer: CompassRenderer,
    render_sink: Box<dyn RenderSink>,
    /// Accepted location waiting out the debounce window
    pending_location: Option<Coordinate>,
    /// Clock reading at the start of the current event-loop turn
    turn_time: Duration,
}

impl CompassPipeline {
    fn commit_location(&mut self, location: Coordinate) {
        self.state.set_location_at(location, self.turn_time);
        // A one-shot fix leaves a debounced watch update in flight
        if self.pending_location == Some(location) {
            self.pending_location = None;
        }
        debug!("Location committed: {}", location);
        self.recompute_and_render();
    }

    fn recompute_and_render(&mut self) {
        let heading = self.state.current_heading_degrees();
        let results = self.engine.recompute_all(&self.state);
        if results.is_empty() {
            return;
        }
        self.renderer.render_landmarks(self.render_sink.as_mut(), results, heading);
    }

    /// Heading passes reuse the cached results; geodesics are not recomputed
    fn apply_heading(&mut self, heading: f64) {
        self.state.set_heading_at(heading, self.turn_time);
        let heading = self.state.current_heading_degrees();

        self.renderer.render_dial(self.render_sink.as_mut(), heading);
        if self.state.has_location() {
            self.renderer
                .render_landmarks(self.render_sink.as_mut(), self.engine.latest(), heading);
        }
    }
}

/// Compass runtime: owns the position state and drives rendering
pub struct LandmarkCompass {
    config: CompassConfig,
    scheduler: UpdateScheduler<CompassPipeline>,
    pipeline: CompassPipeline,
    status_sink: Box<dyn StatusSink>,
    catalog: Box<dyn TextCatalog>,
    filter: MovementFilter,
    orientation_delay: Duration,
    location_delay: Duration,
}

impl LandmarkCompass {
    pub fn new(
        config: CompassConfig,
        render_sink: Box<dyn RenderSink>,
        status_sink: Box<dyn StatusSink>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let renderer = CompassRenderer::new(
            config.layout.landmark_margin_px,
            config.layout.fallback_compass_diameter_px,
            config.distance_unit,
        );
        let scheduler = UpdateScheduler::new(clock);
        let turn_time = scheduler.now();

        Self {
            scheduler,
            pipeline: CompassPipeline {
                state: PositionState::new(),
                engine: DirectionEngine::new(config.landmarks.clone()),
                renderer,
                render_sink,
                pending_location: None,
                turn_time,
            },
            status_sink,
            catalog: Box::new(EnglishCatalog),
            filter: MovementFilter::new(config.timing.insignificant_move_deg),
            orientation_delay: delay_from_ms(config.timing.orientation_delay_ms),
            location_delay: delay_from_ms(config.timing.location_delay_ms),
            config,
        }
    }

    /// Use a host-provided text catalog for status messages
    pub fn with_catalog(mut self, catalog: Box<dyn TextCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Show placeholders, request a first fix and start watching.
    pub fn start(&mut self, location: &mut dyn LocationProvider) {
        self.pipeline
            .renderer
            .render_placeholders(self.pipeline.render_sink.as_mut(), &self.config.landmarks);
        self.report(StatusChannel::Location, MessageKey::LocationGetting);

        if !location.is_supported() {
            warn!("Geolocation not supported");
            self.report(StatusChannel::Location, MessageKey::LocationNotSupported);
            return;
        }

        location.request_current_position(&self.config.location);
        self.start_watching(location);
    }

    /// Subscribe to continuous location updates; no-op when already watching
    pub fn start_watching(&mut self, location: &mut dyn LocationProvider) {
        if self.pipeline.state.is_watching() || !location.is_supported() {
            return;
        }
        let watch_id = location.watch_position(&self.config.location);
        debug!("Watching location ({:?})", watch_id);
        self.pipeline.state.set_watch_id(Some(watch_id));
    }

    /// Re-request a single fix; the answer arrives through `handle_location_fix`
    pub fn refresh_location(&mut self, location: &mut dyn LocationProvider) {
        self.report(StatusChannel::Location, MessageKey::LocationUpdating);
        if location.is_supported() {
            location.request_current_position(&self.config.location);
        } else {
            self.report(StatusChannel::Location, MessageKey::LocationNotSupported);
        }
    }

    /// Answer to a one-shot position request. A fix is applied immediately.
    pub fn handle_location_fix(&mut self, result: SensorResult<LocationFix>) {
        match result {
            Ok(fix) => {
                info!("Location fix at {}", fix.coordinate);
                self.report(StatusChannel::Location, MessageKey::LocationSuccess);
                self.begin_turn();
                self.pipeline.commit_location(fix.coordinate);
            }
            Err(error) => {
                warn!("Location request failed: {}", error);
                self.report_location_error(error);
            }
        }
    }

    /// Watch callback. Jitter is dropped; other fixes restart the location
    /// debounce. Returns whether the update was accepted.
    pub fn handle_location_update(&mut self, result: SensorResult<LocationFix>) -> bool {
        let fix = match result {
            Ok(fix) => fix,
            Err(error) => {
                warn!("Location monitoring error: {}", error);
                return false;
            }
        };

        let candidate = fix.coordinate;
        let reference = self.pipeline.pending_location.or(self.pipeline.state.current_location());
        if !self.filter.accept(reference.as_ref(), &candidate) {
            debug!("Ignoring insignificant move to {}", candidate);
            return false;
        }

        self.pipeline.pending_location = Some(candidate);
        self.scheduler.debounce(
            LOCATION_CHANNEL,
            move |pipeline: &mut CompassPipeline| pipeline.commit_location(candidate),
            self.location_delay,
        );
        true
    }

    /// Check support and permission, then subscribe to orientation events.
    /// Starting an already active compass does nothing.
    pub fn start_compass(&mut self, orientation: &mut dyn OrientationProvider) {
        if self.pipeline.state.compass_active() {
            return;
        }

        if !orientation.is_supported() {
            info!("Orientation sensor not supported; heading stays at 0");
            self.pipeline.state.set_compass_supported(false);
            self.report(StatusChannel::Compass, MessageKey::CompassNotSupported);
            return;
        }
        self.pipeline.state.set_compass_supported(true);

        if orientation.requires_permission() {
            self.report(StatusChannel::Compass, MessageKey::CompassInitializing);
            if let Err(error) = orientation.request_permission() {
                warn!("Orientation permission failed: {}", error);
                self.report(StatusChannel::Compass, MessageKey::for_compass_error(&error));
                return;
            }
        }

        let absolute = orientation.supports_absolute();
        orientation.subscribe(absolute);
        self.pipeline.state.set_compass_active(true);
        info!("Compass started ({} orientation)", if absolute { "absolute" } else { "relative" });
        self.report(StatusChannel::Compass, MessageKey::CompassSuccess);
    }

    /// Orientation event. Applied at most once per throttle cool-down;
    /// returns whether this reading was applied.
    pub fn handle_orientation(&mut self, reading: OrientationReading) -> bool {
        let Some(heading) = reading.heading() else {
            return false;
        };

        self.begin_turn();
        let pipeline = &mut self.pipeline;
        self.scheduler
            .throttle(ORIENTATION_CHANNEL, || pipeline.apply_heading(heading), self.orientation_delay)
            .is_some()
    }

    /// Run due scheduled actions. Call once per event-loop turn.
    pub fn poll(&mut self) -> usize {
        self.begin_turn();
        self.scheduler.run_due(&mut self.pipeline)
    }

    /// When the event loop should next call `poll`
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    /// Switch label units and relabel from the cached results
    pub fn set_distance_unit(&mut self, unit: DistanceUnit) {
        self.config.distance_unit = unit;
        let pipeline = &mut self.pipeline;
        pipeline.renderer.set_unit(unit);
        pipeline
            .renderer
            .render_distances(pipeline.render_sink.as_mut(), pipeline.engine.latest());
    }

    /// Stop sensor subscriptions and cancel every pending timer
    pub fn teardown(&mut self, location: &mut dyn LocationProvider, orientation: &mut dyn OrientationProvider) {
        if let Some(watch_id) = self.pipeline.state.watch_id() {
            location.clear_watch(watch_id);
            self.pipeline.state.set_watch_id(None);
        }
        if self.pipeline.state.compass_active() {
            orientation.unsubscribe();
            self.pipeline.state.set_compass_active(false);
        }

        self.scheduler.cancel_all();
        self.pipeline.pending_location = None;
        debug!("Compass torn down");
    }

    /// Teardown plus a return to the initial state
    pub fn reset(&mut self, location: &mut dyn LocationProvider, orientation: &mut dyn OrientationProvider) {
        self.teardown(location, orientation);
        self.pipeline.state.reset();
        self.pipeline.engine.clear();
        self.pipeline
            .renderer
            .render_placeholders(self.pipeline.render_sink.as_mut(), &self.config.landmarks);
        info!("Compass state has been reset");
    }

    pub fn state(&self) -> &PositionState {
        &self.pipeline.state
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.pipeline.state.snapshot()
    }

    pub fn latest_results(&self) -> &[DirectionResult] {
        self.pipeline.engine.latest()
    }

    pub fn pending_location(&self) -> Option<Coordinate> {
        self.pipeline.pending_location
    }

    pub fn recompute_count(&self) -> u64 {
        self.pipeline.engine.recompute_count()
    }

    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    pub fn movement_filter(&self) -> &MovementFilter {
        &self.filter
    }

    pub fn config(&self) -> &CompassConfig {
        &self.config
    }

    fn begin_turn(&mut self) {
        self.pipeline.turn_time = self.scheduler.now();
    }

    fn report(&mut self, channel: StatusChannel, key: MessageKey) {
        let message = self.catalog.text(key);
        self.status_sink.update_status(channel, &message);
    }

    fn report_location_error(&mut self, error: SensorError) {
        let reason = self.catalog.text(MessageKey::for_location_error(&error));
        let message = self.catalog.text(MessageKey::LocationError) + &reason;
        self.status_sink.update_status(StatusChannel::Location, &message);
    }
}
