//! Sensor error taxonomy

use thiserror::Error;

/// Failure reported by a location or orientation provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SensorError {
    /// User or platform refused access
    #[error("permission denied")]
    PermissionDenied,
    /// Provider has no reading to give (no fix, sensor off)
    #[error("source unavailable")]
    SourceUnavailable,
    /// Provider did not answer in time
    #[error("request timed out")]
    Timeout,
    /// Capability missing on this platform
    #[error("capability not supported")]
    UnsupportedCapability,
    #[error("unknown sensor error")]
    Unknown,
}

/// Result type for sensor operations
pub type SensorResult<T> = Result<T, SensorError>;

impl SensorError {
    /// Whether asking the provider again may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SensorError::SourceUnavailable | SensorError::Timeout | SensorError::Unknown
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability() {
        assert!(SensorError::Timeout.is_recoverable());
        assert!(!SensorError::PermissionDenied.is_recoverable());
        assert!(!SensorError::UnsupportedCapability.is_recoverable());
    }

    #[test]
    fn test_display() {
        assert_eq!(SensorError::Timeout.to_string(), "request timed out");
    }
}
