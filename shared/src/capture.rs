//! Camera capture flows.
//!
//! `getUserMedia` is asynchronous, so a flow never acquires a stream itself:
//! [`CaptureFlow::request`] hands out a ticket and the platform layer answers
//! with [`CaptureFlow::stream_ready`]. From then on the stream lives inside a
//! [`StreamGuard`], which stops it when dropped. Every exit path (capture,
//! confirm, cancel, retake, dropping the flow, or a response for a ticket
//! that is no longer wanted) therefore stops each stream exactly once.

use serde::{Deserialize, Serialize};

use crate::config::CapturePreset;
use crate::detector::{Detection, Detector};
use crate::error::DeviceError;
use crate::image::CapturedImage;
use crate::scenes::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    #[default]
    User,
    Environment,
}

impl CameraFacing {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraFacing::User => "user",
            CameraFacing::Environment => "environment",
        }
    }
}

impl std::fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A live video stream owned by a capture flow.
pub trait VideoStream {
    /// Stop every track of the stream. Called once, by [`StreamGuard`].
    fn stop(&mut self);

    /// Whether frames can be grabbed yet (metadata loaded, playing).
    fn is_ready(&self) -> bool;

    /// Grab the current frame, scaled to fit `max_size`, encoded at `quality`.
    fn snapshot(&mut self, max_size: [u32; 2], quality: f64) -> Option<CapturedImage>;
}

/// Owns a stream and stops it on drop.
pub struct StreamGuard<S: VideoStream> {
    stream: Option<S>,
}

impl<S: VideoStream> StreamGuard<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    pub fn get(&self) -> Option<&S> {
        self.stream.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut S> {
        self.stream.as_mut()
    }

    /// Stop the stream now. Later calls and the eventual drop are no-ops.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
    }
}

impl<S: VideoStream> Drop for StreamGuard<S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Identifies one outstanding stream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// What the platform layer should ask the device for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamRequest {
    pub ticket: RequestTicket,
    pub preset: CapturePreset,
}

/// Observable state of a capture flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    Idle,
    Requesting,
    Previewing,
    Frozen,
    Error(DeviceError),
    Closed,
}

enum State<S: VideoStream> {
    Idle,
    Requesting(RequestTicket),
    Previewing(StreamGuard<S>),
    Frozen(CapturedImage),
    Error(DeviceError),
    Closed,
}

/// Request → preview → freeze → confirm, with retake and retry.
pub struct CaptureFlow<S: VideoStream> {
    preset: CapturePreset,
    jpeg_quality: f64,
    state: State<S>,
    next_ticket: u64,
}

impl<S: VideoStream> CaptureFlow<S> {
    pub fn new(preset: CapturePreset, jpeg_quality: f64) -> Self {
        Self {
            preset,
            jpeg_quality,
            state: State::Idle,
            next_ticket: 0,
        }
    }

    pub fn phase(&self) -> CapturePhase {
        match &self.state {
            State::Idle => CapturePhase::Idle,
            State::Requesting(_) => CapturePhase::Requesting,
            State::Previewing(_) => CapturePhase::Previewing,
            State::Frozen(_) => CapturePhase::Frozen,
            State::Error(e) => CapturePhase::Error(*e),
            State::Closed => CapturePhase::Closed,
        }
    }

    pub fn preset(&self) -> CapturePreset {
        self.preset
    }

    /// Ask for a stream. Valid when idle or after an error (retry); any other
    /// state returns `None`.
    pub fn request(&mut self) -> Option<StreamRequest> {
        match self.state {
            State::Idle | State::Error(_) => Some(self.issue_request()),
            _ => None,
        }
    }

    fn issue_request(&mut self) -> StreamRequest {
        self.next_ticket += 1;
        let ticket = RequestTicket(self.next_ticket);
        self.state = State::Requesting(ticket);
        tracing::debug!(ticket = self.next_ticket, "requesting camera stream");
        StreamRequest {
            ticket,
            preset: self.preset,
        }
    }

    /// Deliver the outcome of a stream request. A stream for a ticket the
    /// flow no longer waits on is stopped immediately.
    pub fn stream_ready(&mut self, ticket: RequestTicket, result: Result<S, DeviceError>) {
        let wanted = matches!(self.state, State::Requesting(t) if t == ticket);
        match result {
            Ok(stream) if wanted => {
                tracing::info!("camera stream acquired");
                self.state = State::Previewing(StreamGuard::new(stream));
            }
            Err(e) if wanted => {
                tracing::warn!(category = e.category(), "camera unavailable");
                self.state = State::Error(e);
            }
            Ok(stream) => {
                tracing::debug!("releasing stream for a stale request");
                drop(StreamGuard::new(stream));
            }
            Err(_) => {}
        }
    }

    pub fn stream(&self) -> Option<&S> {
        match &self.state {
            State::Previewing(guard) => guard.get(),
            _ => None,
        }
    }

    pub fn stream_mut(&mut self) -> Option<&mut S> {
        match &mut self.state {
            State::Previewing(guard) => guard.get_mut(),
            _ => None,
        }
    }

    pub fn can_capture(&self) -> bool {
        self.stream().is_some_and(|s| s.is_ready())
    }

    /// Freeze the current frame and stop the stream. Returns whether a frame
    /// was captured.
    pub fn capture(&mut self) -> bool {
        if !self.can_capture() {
            return false;
        }
        let max_size = [self.preset.width, self.preset.height];
        let quality = self.jpeg_quality;
        let Some(image) = self.stream_mut().and_then(|s| s.snapshot(max_size, quality)) else {
            tracing::warn!("frame snapshot failed");
            return false;
        };
        tracing::info!(size = ?image.size(), bytes = image.encoded_len(), "frame captured");
        // replacing the state drops the guard, which stops the stream
        self.state = State::Frozen(image);
        true
    }

    pub fn frozen_image(&self) -> Option<&CapturedImage> {
        match &self.state {
            State::Frozen(image) => Some(image),
            _ => None,
        }
    }

    /// Throw the frozen frame away and ask for a new stream.
    pub fn retake(&mut self) -> Option<StreamRequest> {
        match self.state {
            State::Frozen(_) => Some(self.issue_request()),
            _ => None,
        }
    }

    /// Hand the frozen frame to the caller and close the flow.
    pub fn confirm(&mut self) -> Option<CapturedImage> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Frozen(image) => Some(image),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Close the flow from any state, stopping a live stream.
    pub fn cancel(&mut self) {
        self.state = State::Closed;
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }
}

/// Progress of the simulated analysis of a mission photo.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    NotStarted,
    /// `done_at` is a frame-clock timestamp in seconds.
    Running { done_at: f64 },
    Done(Detection),
}

/// Capture flow for a mission photo: freeze, analyze, then add to the log.
pub struct MissionCapture<S: VideoStream> {
    flow: CaptureFlow<S>,
    scene: Scene,
    analysis: Analysis,
    analysis_secs: f64,
}

impl<S: VideoStream> MissionCapture<S> {
    pub fn new(scene: Scene, preset: CapturePreset, jpeg_quality: f64, analysis_secs: f64) -> Self {
        Self {
            flow: CaptureFlow::new(preset, jpeg_quality),
            scene,
            analysis: Analysis::NotStarted,
            analysis_secs,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn flow(&self) -> &CaptureFlow<S> {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut CaptureFlow<S> {
        &mut self.flow
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.analysis, Analysis::Running { .. })
    }

    pub fn detection(&self) -> Option<&Detection> {
        match &self.analysis {
            Analysis::Done(d) => Some(d),
            _ => None,
        }
    }

    /// Start the simulated analysis of the frozen frame.
    pub fn analyze(&mut self, now: f64) -> bool {
        if self.flow.frozen_image().is_none() || !matches!(self.analysis, Analysis::NotStarted) {
            return false;
        }
        self.analysis = Analysis::Running {
            done_at: now + self.analysis_secs,
        };
        true
    }

    /// Finish the analysis once its delay has elapsed. Returns true on the
    /// frame the detection becomes available.
    pub fn poll<D: Detector + ?Sized>(&mut self, now: f64, detector: &mut D) -> bool {
        let Analysis::Running { done_at } = self.analysis else {
            return false;
        };
        if now < done_at {
            return false;
        }
        let Some(image) = self.flow.frozen_image() else {
            self.analysis = Analysis::NotStarted;
            return false;
        };
        let labels = detector.detect(image, &self.scene);
        let detection = Detection::score(labels, &self.scene);
        tracing::info!(scene = %self.scene, labels = ?detection.labels, points = detection.points, "analysis finished");
        self.analysis = Analysis::Done(detection);
        true
    }

    pub fn retake(&mut self) -> Option<StreamRequest> {
        let request = self.flow.retake()?;
        self.analysis = Analysis::NotStarted;
        Some(request)
    }

    /// Only an analyzed frame can be confirmed.
    pub fn confirm(&mut self) -> Option<(CapturedImage, Detection)> {
        let Analysis::Done(detection) = &self.analysis else {
            return None;
        };
        let detection = detection.clone();
        let image = self.flow.confirm()?;
        Some((image, detection))
    }

    pub fn cancel(&mut self) {
        self.flow.cancel();
    }
}
