use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use rand::rngs::ThreadRng;
use spyboard_shared::capture::{CaptureFlow, RequestTicket, StreamGuard, StreamRequest};
use spyboard_shared::confetti::{sparkles, ConfettiShower, CONFETTI_PIECES};
use spyboard_shared::playlist::{MusicPlayer, SoundCue};
use spyboard_shared::session::QuitOutcome;
use spyboard_shared::{
    DeviceError, GameConfig, MissionCapture, MockDetector, Session, SessionEffect,
};

use crate::audio::WebAudio;
use crate::camera::WebCamera;
use crate::effects::{delayed_effect, request_camera_effect};
use crate::thumbnail::Textures;
use crate::unload::UnloadGuard;

/// Sparkle dots on the completion header.
const SPARKLE_COUNT: usize = 20;

/// Which capture panel a camera stream belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraTarget {
    Mission,
    Agent,
}

/// Results of async work, applied at the start of the next frame.
pub enum PendingEvent {
    StreamReady {
        target: CameraTarget,
        ticket: RequestTicket,
        result: Result<WebCamera, DeviceError>,
    },
    SceneRevealed {
        generation: u64,
    },
}

/// Queue shared with spawned futures and browser callbacks.
#[derive(Clone, Default)]
pub struct Inbox(Rc<RefCell<VecDeque<PendingEvent>>>);

impl Inbox {
    pub fn push(&self, event: PendingEvent) {
        self.0.borrow_mut().push_back(event);
    }

    pub fn drain(&self) -> Vec<PendingEvent> {
        self.0.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// Everything the board screen reads and the browser side effects it owns.
pub struct AppState {
    pub config: GameConfig,
    pub session: Session,
    pub mission: Option<MissionCapture<WebCamera>>,
    pub agent: Option<CaptureFlow<WebCamera>>,
    pub music: MusicPlayer<WebAudio>,
    pub confetti: Option<ConfettiShower>,
    pub sparkles: Vec<(egui::Vec2, egui::Color32)>,
    pub textures: Textures,
    completion_cue: Option<SoundCue<WebAudio>>,
    warning_stinger: SoundCue<WebAudio>,
    detector: MockDetector<ThreadRng>,
    inbox: Inbox,
    unload: UnloadGuard,
    ctx: egui::Context,
}

impl AppState {
    pub fn new(ctx: &egui::Context, config: GameConfig) -> Self {
        let audio = &config.audio;
        let mut music = MusicPlayer::new(WebAudio::new(), audio, config.timing.track_banner_secs);
        if audio.autoplay {
            music.play();
        }
        let completion_cue = audio
            .completion_cue
            .as_deref()
            .map(|src| SoundCue::new(WebAudio::new(), src, audio.volume));
        let warning_stinger = SoundCue::new(WebAudio::new(), &audio.warning_stinger, audio.volume);

        Self {
            session: Session::new(&config),
            mission: None,
            agent: None,
            music,
            confetti: None,
            sparkles: Vec::new(),
            textures: Textures::new(config.capture.thumbnail_edge),
            completion_cue,
            warning_stinger,
            detector: MockDetector::new(rand::rng()),
            inbox: Inbox::default(),
            unload: UnloadGuard::install(),
            ctx: ctx.clone(),
            config,
        }
    }

    pub fn is_generating(&self) -> bool {
        self.session.is_generating()
    }

    // --- per frame ---

    /// Apply async results and advance timers. Runs before the UI is drawn.
    pub fn update(&mut self, now: f64) {
        self.process_pending_events();
        if let Some(mission) = self.mission.as_mut() {
            mission.poll(now, &mut self.detector);
        }
        self.music.update(now);
        if let Some(cue) = self.completion_cue.as_mut() {
            cue.update();
        }
        self.warning_stinger.update();
        self.session.tick(now);
        if self.confetti.as_ref().is_some_and(|c| c.finished(now)) {
            self.confetti = None;
        }
    }

    /// Bring capture flows and platform effects in line with the session.
    /// Runs after the frame's events were applied.
    pub fn settle(&mut self, now: f64) {
        self.sync_capture_flows();
        self.apply_session_effects(now);
        self.textures
            .thumbnails
            .retain(self.session.board().entries());
        self.unload
            .set_armed(self.session.should_warn_before_leaving());
    }

    pub fn process_pending_events(&mut self) {
        for event in self.inbox.drain() {
            match event {
                PendingEvent::StreamReady {
                    target,
                    ticket,
                    result,
                } => self.deliver_stream(target, ticket, result),
                PendingEvent::SceneRevealed { generation } => self.reveal_scene(generation),
            }
        }
    }

    fn deliver_stream(
        &mut self,
        target: CameraTarget,
        ticket: RequestTicket,
        result: Result<WebCamera, DeviceError>,
    ) {
        let flow = match target {
            CameraTarget::Mission => self.mission.as_mut().map(|m| m.flow_mut()),
            CameraTarget::Agent => self.agent.as_mut(),
        };
        match (flow, result) {
            (Some(flow), result) => flow.stream_ready(ticket, result),
            (None, Ok(stream)) => {
                tracing::debug!(?target, "capture panel gone, releasing stream");
                drop(StreamGuard::new(stream));
            }
            (None, Err(_)) => {}
        }
    }

    fn sync_capture_flows(&mut self) {
        let wanted_scene = if self.session.mission_camera_active() {
            self.session.current_scene().cloned()
        } else {
            None
        };
        let keep_mission = matches!(
            (&self.mission, &wanted_scene),
            (Some(mission), Some(scene)) if mission.scene() == scene && !mission.flow().is_closed()
        );
        if !keep_mission {
            // replacing or clearing a flow drops it, which stops its stream
            self.mission = None;
            if let Some(scene) = wanted_scene {
                let capture = &self.config.capture;
                let mut mission = MissionCapture::new(
                    scene,
                    capture.mission,
                    capture.jpeg_quality,
                    self.config.timing.analysis_secs,
                );
                let request = mission.flow_mut().request();
                self.mission = Some(mission);
                self.textures.mission_frame.clear();
                if let Some(request) = request {
                    self.request_stream(CameraTarget::Mission, request);
                }
            }
        }

        let wants_agent = self.session.agent_camera_active();
        let keep_agent = match &self.agent {
            Some(flow) => wants_agent && !flow.is_closed(),
            None => !wants_agent,
        };
        if !keep_agent {
            self.agent = None;
            if wants_agent {
                let capture = &self.config.capture;
                let mut flow = CaptureFlow::new(capture.agent, capture.jpeg_quality);
                let request = flow.request();
                self.agent = Some(flow);
                self.textures.agent_frame.clear();
                if let Some(request) = request {
                    self.request_stream(CameraTarget::Agent, request);
                }
            }
        }
    }

    fn apply_session_effects(&mut self, now: f64) {
        for effect in self.session.take_effects() {
            match effect {
                SessionEffect::StopMusic | SessionEffect::ResumeMusic => self.music.apply(effect),
                SessionEffect::PlayCompletionCue => {
                    if let Some(cue) = self.completion_cue.as_mut() {
                        cue.trigger();
                    }
                }
                SessionEffect::PlayWarningStinger => self.warning_stinger.trigger(),
                SessionEffect::LaunchConfetti => {
                    let mut rng = rand::rng();
                    self.confetti = Some(ConfettiShower::new(&mut rng, CONFETTI_PIECES, now));
                    self.sparkles = sparkles(&mut rng, SPARKLE_COUNT);
                }
                SessionEffect::ScenesUnlocked { added } => {
                    tracing::debug!(added, "unlock notice showing");
                }
            }
        }
    }

    fn request_stream(&self, target: CameraTarget, request: StreamRequest) {
        let inbox = self.inbox.clone();
        let ctx = self.ctx.clone();
        let capture = &self.config.capture;
        let preview_size = [capture.preview_width, capture.preview_height];
        request_camera_effect(request, preview_size, move |ticket, result| {
            inbox.push(PendingEvent::StreamReady {
                target,
                ticket,
                result,
            });
            ctx.request_repaint();
        });
    }

    // --- commands ---

    /// Show "GENERATING..." and roll a scene once the reveal delay is over.
    pub fn begin_scene(&mut self) {
        let generation = match self.session.begin_reveal() {
            Ok(Some(generation)) => generation,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "cannot start a new mission");
                return;
            }
        };

        let inbox = self.inbox.clone();
        let ctx = self.ctx.clone();
        let delay_ms = (self.config.timing.scene_reveal_secs * 1000.0).round() as u32;
        delayed_effect(delay_ms, move || {
            inbox.push(PendingEvent::SceneRevealed { generation });
            ctx.request_repaint();
        });
    }

    fn reveal_scene(&mut self, generation: u64) {
        if let Err(e) = self.session.finish_reveal(generation, &mut rand::rng()) {
            tracing::warn!(error = %e, "cannot start a new mission");
        }
    }

    pub fn open_mission_camera(&mut self) {
        if let Err(e) = self.session.open_mission_camera() {
            tracing::warn!(error = %e, "cannot open the mission camera");
        }
    }

    pub fn open_identity_camera(&mut self) {
        if let Err(e) = self.session.open_identity_camera() {
            tracing::warn!(error = %e, "cannot open the agent camera");
        }
    }

    pub fn close_camera(&mut self, target: CameraTarget) {
        match target {
            CameraTarget::Mission => self.session.cancel_capture(),
            CameraTarget::Agent => self.session.close_identity_camera(),
        }
    }

    pub fn capture(&mut self, target: CameraTarget) {
        let captured = match target {
            CameraTarget::Mission => self
                .mission
                .as_mut()
                .is_some_and(|m| m.flow_mut().capture()),
            CameraTarget::Agent => self.agent.as_mut().is_some_and(|f| f.capture()),
        };
        if !captured {
            tracing::debug!(?target, "capture ignored, camera not ready");
        }
    }

    pub fn retake(&mut self, target: CameraTarget) {
        let request = match target {
            CameraTarget::Mission => self.mission.as_mut().and_then(|m| m.retake()),
            CameraTarget::Agent => self.agent.as_mut().and_then(|f| f.retake()),
        };
        if let Some(request) = request {
            self.request_stream(target, request);
        }
    }

    /// "Try Again" after a device error.
    pub fn retry_camera(&mut self, target: CameraTarget) {
        let request = match target {
            CameraTarget::Mission => self.mission.as_mut().and_then(|m| m.flow_mut().request()),
            CameraTarget::Agent => self.agent.as_mut().and_then(|f| f.request()),
        };
        if let Some(request) = request {
            self.request_stream(target, request);
        }
    }

    pub fn analyze(&mut self, now: f64) {
        if let Some(mission) = self.mission.as_mut() {
            mission.analyze(now);
        }
    }

    /// Move the analyzed mission photo into the spy log.
    pub fn add_to_log(&mut self, now: f64) {
        let Some((image, detection)) = self.mission.as_mut().and_then(|m| m.confirm()) else {
            return;
        };
        match self.session.submit_capture(image, detection, now) {
            Ok(outcome) => {
                if let Some(added) = outcome.newly_unlocked {
                    tracing::debug!(added, "mission unlocked new scenes");
                }
            }
            Err(e) => tracing::warn!(error = %e, "mission not logged"),
        }
        self.mission = None;
    }

    pub fn confirm_identity(&mut self) {
        let Some(image) = self.agent.as_mut().and_then(|f| f.confirm()) else {
            return;
        };
        if let Err(e) = self.session.confirm_identity(image) {
            tracing::warn!(error = %e, "agent photo rejected");
        }
        self.agent = None;
    }

    pub fn dismiss_completion(&mut self) {
        match self.session.dismiss_completion() {
            Ok(()) => {
                self.confetti = None;
                self.textures.agent_photo.clear();
            }
            Err(e) => tracing::warn!(error = %e, "nothing to dismiss"),
        }
    }

    pub fn request_quit(&mut self) {
        if self.session.request_quit() == QuitOutcome::Reset {
            self.after_reset();
        }
    }

    pub fn continue_after_warning(&mut self) {
        self.session.continue_after_warning();
    }

    pub fn quit(&mut self) {
        self.session.quit();
        self.after_reset();
    }

    fn after_reset(&mut self) {
        self.confetti = None;
        self.sparkles.clear();
        self.textures.clear();
    }
}
