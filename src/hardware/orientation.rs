//! Orientation provider interface and heading normalization

use crate::hardware::error::SensorResult;

/// Raw orientation event
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationReading {
    /// Rotation about the z axis, counter-clockwise from the device's reference
    pub alpha: Option<f64>,
    /// Platform-supplied compass heading, clockwise from magnetic north
    pub compass_heading: Option<f64>,
}

impl OrientationReading {
    pub fn from_alpha(alpha: f64) -> Self {
        Self {
            alpha: Some(alpha),
            compass_heading: None,
        }
    }

    pub fn from_compass_heading(heading: f64) -> Self {
        Self {
            alpha: None,
            compass_heading: Some(heading),
        }
    }

    /// Clockwise-from-north heading in degrees, if the event carries one.
    ///
    /// A platform compass heading is used as-is; otherwise alpha is mirrored
    /// (`360 - alpha`) to turn its counter-clockwise sense into a compass
    /// heading. The result is not wrapped; the position state does that.
    pub fn heading(&self) -> Option<f64> {
        match (self.compass_heading, self.alpha) {
            (Some(heading), _) if heading.is_finite() => Some(heading),
            (_, Some(alpha)) if alpha.is_finite() => Some(360.0 - alpha),
            _ => None,
        }
    }
}

/// Device orientation event source
pub trait OrientationProvider {
    fn is_supported(&self) -> bool;

    /// Whether events only flow after an explicit grant
    fn requires_permission(&self) -> bool;

    fn request_permission(&mut self) -> SensorResult<()>;

    /// Whether earth-referenced (absolute) events are available
    fn supports_absolute(&self) -> bool;

    /// Begin delivering events, absolute ones when `absolute` is set
    fn subscribe(&mut self, absolute: bool);

    fn unsubscribe(&mut self);
}
