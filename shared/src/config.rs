//! Game configuration.
//!
//! Every tunable constant of the game lives here: board size, unlock tiers,
//! capture resolutions, the simulated delays and the audio assets. The
//! front end ships an embedded `spyboard.toml`; anything missing from it
//! falls back to [`Default`].

use serde::{Deserialize, Serialize};

use crate::capture::CameraFacing;
use crate::error::ConfigError;
use crate::scenes::SCENE_CATALOG;
use crate::unlock::UnlockPolicy;

const EMBEDDED_CONFIG: &str = include_str!("../assets/spyboard.toml");

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub unlock: UnlockPolicy,
    pub capture: CaptureConfig,
    pub timing: TimingConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Missions needed before the agent photo is requested.
    pub missions_per_board: usize,
    /// Leaving with fewer missions than this (but at least one) asks for
    /// confirmation first.
    pub quit_warning_below: usize,
}

impl BoardConfig {
    /// A warning threshold above the board size means "always warn".
    pub fn clamp_quit_warning(&mut self) {
        if self.quit_warning_below > self.missions_per_board {
            tracing::debug!(
                from = self.quit_warning_below,
                to = self.missions_per_board,
                "quit warning threshold clamped to the board size"
            );
            self.quit_warning_below = self.missions_per_board;
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            missions_per_board: 5,
            quit_warning_below: 5,
        }
    }
}

/// Ideal stream resolution and facing mode for one capture flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapturePreset {
    pub width: u32,
    pub height: u32,
    pub facing: CameraFacing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Lossy encoder quality passed to `toDataURL`.
    pub jpeg_quality: f64,
    /// Live preview frames are downscaled to fit this box.
    pub preview_width: u32,
    pub preview_height: u32,
    /// Pinboard thumbnails are downscaled to this edge length.
    pub thumbnail_edge: u32,
    pub mission: CapturePreset,
    pub agent: CapturePreset,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 0.8,
            preview_width: 640,
            preview_height: 480,
            thumbnail_edge: 128,
            mission: CapturePreset {
                width: 1280,
                height: 720,
                facing: CameraFacing::User,
            },
            agent: CapturePreset {
                width: 720,
                height: 720,
                facing: CameraFacing::User,
            },
        }
    }
}

/// Durations in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub scene_reveal_secs: f64,
    pub analysis_secs: f64,
    pub unlock_notice_secs: f64,
    pub track_banner_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            scene_reveal_secs: 0.5,
            analysis_secs: 1.5,
            unlock_notice_secs: 3.0,
            track_banner_secs: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub src: String,
}

impl Track {
    pub fn new(name: &str, src: &str) -> Self {
        Self {
            name: name.to_string(),
            src: src.to_string(),
        }
    }
}

const ASSET_HOST: &str = "https://hebbkx1anhila5yf.public.blob.vercel-storage.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub volume: f64,
    pub autoplay: bool,
    /// Played when the agent photo is confirmed. No cue by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_cue: Option<String>,
    pub warning_stinger: String,
    pub playlist: Vec<Track>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        let remote = |file: &str| format!("{}/{}", ASSET_HOST, file);
        Self {
            volume: 0.3,
            autoplay: true,
            completion_cue: None,
            warning_stinger: remote("emotional-damage-meme-cbhmoPvqkQRkF7l82TdCvsChf7Lcid.mp3"),
            playlist: vec![
                Track::new(
                    "FaShIoN",
                    &remote("CORTIS%20-%20FaSHioN-VzgnWZ60pVhL7SsaAjwQwhDJByA5HF.mp3"),
                ),
                Track::new(
                    "Sweet Venom",
                    &remote("Sweet%20Venom-rWwrhbLgFw5ZPAfKkAUdvvZydK8Uex.mp3"),
                ),
                Track::new(
                    "Brought The Heat Back",
                    &remote("Brought%20The%20Heat%20Back-WmM5Nsjgkrpvh9YzB0AaJwZQtILfnS.mp3"),
                ),
                Track::new(
                    "PSYCHO",
                    &remote("PSYCHO%20%281%29-r8Pmv1DF8FULOt2rRm02CgTECn1ihe.mp3"),
                ),
            ],
        }
    }
}

impl GameConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let mut cfg: GameConfig = toml::from_str(s)?;
        cfg.board.clamp_quit_warning();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The configuration bundled into the binary. A broken bundle is logged
    /// and replaced by the defaults so the game still starts.
    pub fn embedded() -> Self {
        match Self::from_toml_str(EMBEDDED_CONFIG) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!(error = %e, "embedded config rejected, using defaults");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.missions_per_board == 0 {
            return Err(invalid("board.missions_per_board", "must be at least 1"));
        }
        if self.board.quit_warning_below > self.board.missions_per_board {
            return Err(invalid(
                "board.quit_warning_below",
                "must not exceed board.missions_per_board",
            ));
        }
        self.unlock.validate(SCENE_CATALOG.len())?;
        if !(self.capture.jpeg_quality > 0.0 && self.capture.jpeg_quality <= 1.0) {
            return Err(invalid("capture.jpeg_quality", "must be in (0, 1]"));
        }
        for (field, preset) in [
            ("capture.mission", &self.capture.mission),
            ("capture.agent", &self.capture.agent),
        ] {
            if preset.width == 0 || preset.height == 0 {
                return Err(invalid(field, "resolution must be non-zero"));
            }
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(invalid("audio.volume", "must be in [0, 1]"));
        }
        if self.audio.playlist.is_empty() {
            return Err(invalid("audio.playlist", "needs at least one track"));
        }
        let t = &self.timing;
        if [
            t.scene_reveal_secs,
            t.analysis_secs,
            t.unlock_notice_secs,
            t.track_banner_secs,
        ]
        .iter()
        .any(|s| !s.is_finite() || *s < 0.0)
        {
            return Err(invalid("timing", "durations must be finite and non-negative"));
        }
        Ok(())
    }
}

pub(crate) fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_matches_defaults() {
        let cfg = GameConfig::from_toml_str(EMBEDDED_CONFIG).unwrap();
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn partial_documents_fill_in_defaults() {
        let cfg = GameConfig::from_toml_str("[board]\nmissions_per_board = 8\nquit_warning_below = 8\n")
            .unwrap();
        assert_eq!(cfg.board.missions_per_board, 8);
        assert_eq!(cfg.unlock, UnlockPolicy::default());
        assert_eq!(cfg.audio.playlist.len(), 4);
    }

    #[test]
    fn shrinking_the_board_clamps_the_quit_warning() {
        let cfg = GameConfig::from_toml_str("[board]\nmissions_per_board = 3\n").unwrap();
        assert_eq!(cfg.board.missions_per_board, 3);
        assert_eq!(cfg.board.quit_warning_below, 3);
    }

    #[test]
    fn default_audio_is_served_remotely() {
        let audio = AudioConfig::default();
        assert!(audio.completion_cue.is_none());
        for src in audio
            .playlist
            .iter()
            .map(|t| t.src.as_str())
            .chain([audio.warning_stinger.as_str()])
        {
            assert!(src.starts_with("https://"), "{} is not remote", src);
            assert!(src.ends_with(".mp3"));
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = GameConfig::from_toml_str("[capture]\njpeg_quality = 1.5\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "capture.jpeg_quality",
                ..
            }
        ));

        let err = GameConfig::from_toml_str("[board]\nmissions_per_board = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        assert!(matches!(
            GameConfig::from_toml_str("board = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn serializes_back_to_toml() {
        let text = GameConfig::default().to_toml_string().unwrap();
        let back = GameConfig::from_toml_str(&text).unwrap();
        assert_eq!(back, GameConfig::default());
    }
}
