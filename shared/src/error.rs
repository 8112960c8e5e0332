//! Error types shared between the game logic and the browser front end.

use thiserror::Error;

/// Why the camera could not be opened.
///
/// Every variant is recoverable: the capture panel shows the message inline
/// next to a retry button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("Camera permission denied. Please allow camera access in your browser settings and click 'Try Again'.")]
    PermissionDenied,
    #[error("No camera found. Please connect a camera and try again.")]
    NotFound,
    #[error("Camera is being used by another application. Please close other apps using the camera.")]
    DeviceBusy,
    #[error("Unable to access camera. Please check your permissions and try again.")]
    Unknown,
}

impl DeviceError {
    /// Classify a `DOMException` name reported by `getUserMedia`.
    pub fn from_dom_name(name: &str) -> Self {
        match name {
            "NotAllowedError" | "PermissionDeniedError" | "SecurityError" => {
                DeviceError::PermissionDenied
            }
            "NotFoundError" | "DevicesNotFoundError" | "OverconstrainedError" => {
                DeviceError::NotFound
            }
            "NotReadableError" | "TrackStartError" | "AbortError" => DeviceError::DeviceBusy,
            _ => DeviceError::Unknown,
        }
    }

    /// Short machine-friendly category, used in log fields.
    pub fn category(&self) -> &'static str {
        match self {
            DeviceError::PermissionDenied => "permission-denied",
            DeviceError::NotFound => "not-found",
            DeviceError::DeviceBusy => "device-busy",
            DeviceError::Unknown => "unknown",
        }
    }
}

/// Audio playback was refused, usually by the browser's autoplay policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("playback of '{source_url}' was rejected: {reason}")]
pub struct PlaybackRejected {
    pub source_url: String,
    pub reason: String,
}

/// A session command was issued in a state that does not accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no mission scene is active")]
    NoActiveScene,
    #[error("the current board is full ({0} missions)")]
    BoardFull(usize),
    #[error("the board still needs {remaining} more missions")]
    BoardNotFull { remaining: usize },
    #[error("agent identity was already confirmed for this board")]
    IdentityAlreadyConfirmed,
    #[error("the completion screen is not showing")]
    CompletionNotShown,
}

/// Embedded or user supplied configuration could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parsing TOML config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serializing config to TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_exception_names_map_to_categories() {
        assert_eq!(
            DeviceError::from_dom_name("NotAllowedError"),
            DeviceError::PermissionDenied
        );
        assert_eq!(DeviceError::from_dom_name("NotFoundError"), DeviceError::NotFound);
        assert_eq!(
            DeviceError::from_dom_name("NotReadableError"),
            DeviceError::DeviceBusy
        );
        assert_eq!(DeviceError::from_dom_name("TypeError"), DeviceError::Unknown);
        assert_eq!(DeviceError::NotFound.category(), "not-found");
    }
}
