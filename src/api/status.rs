//! Status reporting and message text lookup

use crate::hardware::SensorError;
use serde::Serialize;
use std::fmt;

/// Status line a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusChannel {
    Location,
    Compass,
}

impl fmt::Display for StatusChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusChannel::Location => write!(f, "location"),
            StatusChannel::Compass => write!(f, "compass"),
        }
    }
}

/// Identifier of a user-facing status text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MessageKey {
    LocationGetting,
    LocationSuccess,
    /// Prefix for a failed location request, followed by the reason
    LocationError,
    LocationDenied,
    LocationUnavailable,
    LocationTimeout,
    LocationUnknownError,
    LocationNotSupported,
    LocationUpdating,
    CompassInitializing,
    CompassSuccess,
    CompassDenied,
    CompassPermissionError,
    CompassNotSupported,
}

impl MessageKey {
    /// Reason shown after the `LocationError` prefix
    pub fn for_location_error(error: &SensorError) -> Self {
        match error {
            SensorError::PermissionDenied => MessageKey::LocationDenied,
            SensorError::SourceUnavailable => MessageKey::LocationUnavailable,
            SensorError::Timeout => MessageKey::LocationTimeout,
            SensorError::UnsupportedCapability => MessageKey::LocationNotSupported,
            SensorError::Unknown => MessageKey::LocationUnknownError,
        }
    }

    /// Status for a failed compass permission request
    pub fn for_compass_error(error: &SensorError) -> Self {
        match error {
            SensorError::PermissionDenied => MessageKey::CompassDenied,
            SensorError::UnsupportedCapability => MessageKey::CompassNotSupported,
            _ => MessageKey::CompassPermissionError,
        }
    }
}

/// Localized text source owned by the host
pub trait TextCatalog {
    fn text(&self, key: MessageKey) -> String;
}

/// Built-in English texts
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl TextCatalog for EnglishCatalog {
    fn text(&self, key: MessageKey) -> String {
        let text = match key {
            MessageKey::LocationGetting => "Getting location...",
            MessageKey::LocationSuccess => "Location acquired",
            MessageKey::LocationError => "Failed to get location: ",
            MessageKey::LocationDenied => "Location access denied",
            MessageKey::LocationUnavailable => "Location unavailable",
            MessageKey::LocationTimeout => "Request timed out",
            MessageKey::LocationUnknownError => "Unknown error",
            MessageKey::LocationNotSupported => "Geolocation is not supported",
            MessageKey::LocationUpdating => "Updating location...",
            MessageKey::CompassInitializing => "Initializing compass sensor...",
            MessageKey::CompassSuccess => "Compass sensor available",
            MessageKey::CompassDenied => "Compass sensor access denied",
            MessageKey::CompassPermissionError => "Failed to get compass permission",
            MessageKey::CompassNotSupported => "Compass sensor not supported",
        };
        text.to_string()
    }
}

/// Receiver of status messages
pub trait StatusSink {
    fn update_status(&mut self, channel: StatusChannel, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_error_prefix_composes() {
        let catalog = EnglishCatalog;
        let message = catalog.text(MessageKey::LocationError) + &catalog.text(MessageKey::LocationTimeout);
        assert_eq!(message, "Failed to get location: Request timed out");
    }

    #[test]
    fn test_location_error_keys() {
        assert_eq!(MessageKey::for_location_error(&SensorError::PermissionDenied), MessageKey::LocationDenied);
        assert_eq!(MessageKey::for_location_error(&SensorError::Timeout), MessageKey::LocationTimeout);
        assert_eq!(MessageKey::for_location_error(&SensorError::Unknown), MessageKey::LocationUnknownError);
    }

    #[test]
    fn test_compass_error_keys() {
        assert_eq!(MessageKey::for_compass_error(&SensorError::PermissionDenied), MessageKey::CompassDenied);
        assert_eq!(
            MessageKey::for_compass_error(&SensorError::UnsupportedCapability),
            MessageKey::CompassNotSupported
        );
        assert_eq!(MessageKey::for_compass_error(&SensorError::Timeout), MessageKey::CompassPermissionError);
    }

    #[test]
    fn test_channel_display() {
        assert_eq!(StatusChannel::Location.to_string(), "location");
        assert_eq!(StatusChannel::Compass.to_string(), "compass");
    }
}
