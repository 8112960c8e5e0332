//! Game logic for Spyboard, the spy-mission photo scavenger hunt.
//!
//! Everything here is platform-free: the browser front end supplies camera
//! streams and audio elements through the [`capture::VideoStream`] and
//! [`playlist::AudioOutput`] traits and a frame clock in seconds.

pub mod capture;
pub mod config;
pub mod confetti;
pub mod detector;
pub mod error;
pub mod image;
pub mod mission_log;
pub mod notice;
pub mod pinboard;
pub mod playlist;
pub mod scenes;
pub mod session;
pub mod unlock;

pub use capture::{CameraFacing, CaptureFlow, CapturePhase, MissionCapture, VideoStream};
pub use config::GameConfig;
pub use detector::{Detection, Detector, MockDetector};
pub use error::{ConfigError, DeviceError, PlaybackRejected, SessionError};
pub use image::CapturedImage;
pub use mission_log::{EntryId, MissionLogEntry};
pub use scenes::{pick_scene, Scene, SCENE_CATALOG};
pub use session::{BoardPhase, Overlay, Session, SessionEffect};
