//! Sensor abstraction layer
//!
//! Location and orientation providers are external collaborators. This
//! module defines their interfaces, the sensor error taxonomy, and mock
//! implementations for tests and the demo binary.

pub mod location;
pub mod orientation;
pub mod mock;
pub mod error;

pub use location::{LocationFix, LocationOptions, LocationProvider, WatchId};
pub use orientation::{OrientationProvider, OrientationReading};
pub use mock::{MockLocationProvider, MockOrientationProvider, RecordingRenderSink, RecordingStatusSink};
pub use error::{SensorError, SensorResult};
