//! The root game state machine.
//!
//! `Session` owns everything that outlives a single capture: score, the
//! board's evidence, unlock tiers, the board counter and the agent photo.
//! The UI calls the command methods and reads the accessors; side effects
//! that belong to the platform (music, sound cues, confetti) are queued as
//! [`SessionEffect`]s and drained once per frame.

use rand::Rng;

use crate::config::{BoardConfig, GameConfig};
use crate::detector::Detection;
use crate::error::SessionError;
use crate::image::CapturedImage;
use crate::mission_log::{EntryId, MissionLog, MissionLogEntry};
use crate::notice::TimedNotice;
use crate::scenes::{pick_scene, Scene};
use crate::unlock::UnlockPolicy;

/// Which modal (if any) is in front. At most one capture flow is live, and
/// it is the one named here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    MissionCamera,
    AgentCamera,
    Completion,
    QuitWarning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    /// Missions can still be added.
    Collecting,
    /// The board is full; waiting for the agent photo.
    AwaitingIdentity,
    /// Agent photo confirmed; completion screen is up.
    Completed,
}

/// Progress of the delayed scene roll behind "GENERATING...".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneReveal {
    #[default]
    Idle,
    /// Only the reveal carrying this generation rolls a scene.
    Generating { generation: u64 },
}

/// Platform side effects requested by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    StopMusic,
    ResumeMusic,
    PlayCompletionCue,
    PlayWarningStinger,
    LaunchConfetti,
    ScenesUnlocked { added: usize },
}

/// Result of a successful [`Session::submit_capture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub entry_id: EntryId,
    pub points: u32,
    /// Scenes added by this mission, if it crossed an unlock tier.
    pub newly_unlocked: Option<usize>,
    pub board_full: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOutcome {
    /// Missions are in progress; the warning is showing.
    Warned,
    /// Nothing to lose; the session was reset.
    Reset,
}

pub struct Session {
    board_config: BoardConfig,
    unlock: UnlockPolicy,
    board: MissionLog,
    phase: BoardPhase,
    total_score: u64,
    missions_completed: usize,
    unlocked: usize,
    board_number: u32,
    agent_photo: Option<CapturedImage>,
    current_scene: Option<Scene>,
    reveal: SceneReveal,
    reveal_generation: u64,
    overlay: Overlay,
    resume_overlay: Overlay,
    unlock_notice: TimedNotice<usize>,
    effects: Vec<SessionEffect>,
    next_entry_id: u64,
}

impl Session {
    pub fn new(config: &GameConfig) -> Self {
        let board_config = config.board.clone();
        Self {
            board: MissionLog::with_capacity(board_config.missions_per_board),
            board_config,
            unlock: config.unlock,
            phase: BoardPhase::Collecting,
            total_score: 0,
            missions_completed: 0,
            unlocked: config.unlock.unlocked_for(0),
            board_number: 1,
            agent_photo: None,
            current_scene: None,
            reveal: SceneReveal::Idle,
            reveal_generation: 0,
            overlay: Overlay::None,
            resume_overlay: Overlay::None,
            unlock_notice: TimedNotice::new(config.timing.unlock_notice_secs),
            effects: Vec::new(),
            next_entry_id: 1,
        }
    }

    // --- accessors ---

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    pub fn missions_completed(&self) -> usize {
        self.missions_completed
    }

    pub fn unlocked_scenes(&self) -> usize {
        self.unlocked
    }

    pub fn bonus_scenes(&self) -> usize {
        self.unlock.bonus(self.unlocked)
    }

    pub fn board_number(&self) -> u32 {
        self.board_number
    }

    pub fn board(&self) -> &MissionLog {
        &self.board
    }

    pub fn missions_per_board(&self) -> usize {
        self.board_config.missions_per_board
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.current_scene.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.reveal, SceneReveal::Generating { .. })
    }

    pub fn agent_photo(&self) -> Option<&CapturedImage> {
        self.agent_photo.as_ref()
    }

    /// Number of newly unlocked scenes while the unlock notice is visible.
    pub fn unlock_notice(&self, now: f64) -> Option<usize> {
        self.unlock_notice.visible(now).copied()
    }

    pub fn unlock_notice_remaining(&self, now: f64) -> Option<f64> {
        self.unlock_notice.remaining(now)
    }

    /// Whether the mission camera should hold a live capture flow, including
    /// while the quit warning covers it.
    pub fn mission_camera_active(&self) -> bool {
        self.overlay == Overlay::MissionCamera
            || (self.overlay == Overlay::QuitWarning
                && self.resume_overlay == Overlay::MissionCamera)
    }

    pub fn agent_camera_active(&self) -> bool {
        self.overlay == Overlay::AgentCamera
            || (self.overlay == Overlay::QuitWarning && self.resume_overlay == Overlay::AgentCamera)
    }

    /// Leaving now would abandon missions on a partly filled board.
    pub fn should_warn_before_leaving(&self) -> bool {
        let done = self.board.len();
        done > 0 && done < self.board_config.quit_warning_below
    }

    pub fn take_effects(&mut self) -> Vec<SessionEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn tick(&mut self, now: f64) {
        self.unlock_notice.tick(now);
    }

    // --- commands ---

    /// Roll a new mission scene from the unlocked pool and open the camera.
    pub fn generate_scene<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Scene, SessionError> {
        self.ensure_collecting()?;
        let scene = pick_scene(rng, self.unlocked);
        tracing::info!(scene = %scene, unlocked = self.unlocked, "new mission");
        self.overlay = Overlay::MissionCamera;
        Ok(&*self.current_scene.insert(scene))
    }

    /// Start the delayed roll of a new scene. Returns the generation that
    /// [`Session::finish_reveal`] must be called with, or `None` while a roll
    /// is already pending.
    pub fn begin_reveal(&mut self) -> Result<Option<u64>, SessionError> {
        if self.is_generating() {
            return Ok(None);
        }
        self.ensure_collecting()?;
        self.reveal_generation += 1;
        let generation = self.reveal_generation;
        self.reveal = SceneReveal::Generating { generation };
        Ok(Some(generation))
    }

    /// Roll the scene once the reveal delay is over. A reveal that no longer
    /// matches the pending roll (the session was reset meanwhile) does
    /// nothing and returns `Ok(None)`.
    pub fn finish_reveal<R: Rng + ?Sized>(
        &mut self,
        generation: u64,
        rng: &mut R,
    ) -> Result<Option<&Scene>, SessionError> {
        if self.reveal != (SceneReveal::Generating { generation }) {
            tracing::debug!(generation, "stale scene reveal ignored");
            return Ok(None);
        }
        self.reveal = SceneReveal::Idle;
        self.generate_scene(rng).map(Some)
    }

    /// Reopen the mission camera for the current scene.
    pub fn open_mission_camera(&mut self) -> Result<(), SessionError> {
        self.ensure_collecting()?;
        if self.current_scene.is_none() {
            return Err(SessionError::NoActiveScene);
        }
        self.overlay = Overlay::MissionCamera;
        Ok(())
    }

    pub fn cancel_capture(&mut self) {
        if self.overlay == Overlay::MissionCamera {
            self.overlay = Overlay::None;
        }
    }

    /// Log a confirmed, scored mission photo for the current scene.
    pub fn submit_capture(
        &mut self,
        image: CapturedImage,
        detection: Detection,
        now: f64,
    ) -> Result<SubmitOutcome, SessionError> {
        self.ensure_collecting()?;
        let scene = self
            .current_scene
            .clone()
            .ok_or(SessionError::NoActiveScene)?;

        let entry_id = EntryId(self.next_entry_id);
        let entry = MissionLogEntry {
            id: entry_id,
            scene,
            score: detection.points,
            created_at: now,
            image,
            labels: detection.labels,
        };
        if self.board.push(entry).is_err() {
            return Err(SessionError::BoardFull(self.board.capacity()));
        }
        self.next_entry_id += 1;
        self.total_score += u64::from(detection.points);
        self.missions_completed += 1;
        if self.overlay == Overlay::MissionCamera {
            self.overlay = Overlay::None;
        }

        let newly_unlocked = self.refresh_unlocks(now);
        tracing::info!(
            entry = %entry_id,
            points = detection.points,
            total = self.total_score,
            on_board = self.board.len(),
            "mission logged"
        );

        let board_full = self.board.is_full();
        if board_full {
            tracing::info!(board = self.board_number, "board full, requesting agent photo");
            self.phase = BoardPhase::AwaitingIdentity;
            self.overlay = Overlay::AgentCamera;
        }

        Ok(SubmitOutcome {
            entry_id,
            points: detection.points,
            newly_unlocked,
            board_full,
        })
    }

    fn refresh_unlocks(&mut self, now: f64) -> Option<usize> {
        let unlocked = self.unlock.unlocked_for(self.missions_completed);
        if unlocked <= self.unlocked {
            return None;
        }
        let added = unlocked - self.unlocked;
        self.unlocked = unlocked;
        self.unlock_notice.show(added, now);
        self.effects.push(SessionEffect::ScenesUnlocked { added });
        tracing::info!(added, unlocked, "scenes unlocked");
        Some(added)
    }

    pub fn open_identity_camera(&mut self) -> Result<(), SessionError> {
        match self.phase {
            BoardPhase::AwaitingIdentity => {
                self.overlay = Overlay::AgentCamera;
                Ok(())
            }
            BoardPhase::Collecting => Err(SessionError::BoardNotFull {
                remaining: self.board.remaining(),
            }),
            BoardPhase::Completed => Err(SessionError::IdentityAlreadyConfirmed),
        }
    }

    pub fn close_identity_camera(&mut self) {
        if self.overlay == Overlay::AgentCamera {
            self.overlay = Overlay::None;
        }
    }

    /// Store the agent photo and celebrate.
    pub fn confirm_identity(&mut self, image: CapturedImage) -> Result<(), SessionError> {
        match self.phase {
            BoardPhase::AwaitingIdentity => {}
            BoardPhase::Collecting => {
                return Err(SessionError::BoardNotFull {
                    remaining: self.board.remaining(),
                })
            }
            BoardPhase::Completed => return Err(SessionError::IdentityAlreadyConfirmed),
        }
        tracing::info!(board = self.board_number, "agent identity confirmed");
        self.agent_photo = Some(image);
        self.phase = BoardPhase::Completed;
        self.overlay = Overlay::Completion;
        self.effects.extend([
            SessionEffect::StopMusic,
            SessionEffect::PlayCompletionCue,
            SessionEffect::LaunchConfetti,
        ]);
        Ok(())
    }

    /// Close the completion screen and start the next board.
    pub fn dismiss_completion(&mut self) -> Result<(), SessionError> {
        if self.overlay != Overlay::Completion {
            return Err(SessionError::CompletionNotShown);
        }
        self.board.clear();
        self.agent_photo = None;
        self.current_scene = None;
        self.board_number += 1;
        self.phase = BoardPhase::Collecting;
        self.overlay = Overlay::None;
        self.effects.push(SessionEffect::ResumeMusic);
        tracing::info!(board = self.board_number, "next board");
        Ok(())
    }

    /// The player asked to leave. Warns first when missions are in progress.
    pub fn request_quit(&mut self) -> QuitOutcome {
        if self.overlay == Overlay::QuitWarning {
            return QuitOutcome::Warned;
        }
        if self.should_warn_before_leaving() {
            self.resume_overlay = self.overlay;
            self.overlay = Overlay::QuitWarning;
            self.effects.push(SessionEffect::PlayWarningStinger);
            QuitOutcome::Warned
        } else {
            self.reset();
            QuitOutcome::Reset
        }
    }

    /// Dismiss the quit warning and go back to whatever was open.
    pub fn continue_after_warning(&mut self) {
        if self.overlay == Overlay::QuitWarning {
            self.overlay = self.resume_overlay;
            self.resume_overlay = Overlay::None;
        }
    }

    /// Abandon everything and start over from board one.
    pub fn quit(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        tracing::info!(
            score = self.total_score,
            missions = self.missions_completed,
            "session abandoned"
        );
        let capacity = self.board.capacity();
        self.board = MissionLog::with_capacity(capacity);
        self.phase = BoardPhase::Collecting;
        self.total_score = 0;
        self.missions_completed = 0;
        self.unlocked = self.unlock.unlocked_for(0);
        self.board_number = 1;
        self.agent_photo = None;
        self.current_scene = None;
        self.reveal = SceneReveal::Idle;
        self.overlay = Overlay::None;
        self.resume_overlay = Overlay::None;
        self.unlock_notice.clear();
    }

    fn ensure_collecting(&self) -> Result<(), SessionError> {
        if self.phase != BoardPhase::Collecting || self.board.is_full() {
            return Err(SessionError::BoardFull(self.board.capacity()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn image() -> CapturedImage {
        CapturedImage::new("data:image/jpeg;base64,", [1, 1], vec![0; 4]).unwrap()
    }

    fn detection(points: u32) -> Detection {
        Detection {
            labels: vec!["person".into()],
            points,
        }
    }

    #[test]
    fn submit_needs_a_scene() {
        let mut s = Session::new(&GameConfig::default());
        assert_eq!(
            s.submit_capture(image(), detection(10), 0.0).unwrap_err(),
            SessionError::NoActiveScene
        );
        assert_eq!(s.open_mission_camera(), Err(SessionError::NoActiveScene));
    }

    #[test]
    fn generating_a_scene_opens_the_camera() {
        let mut s = Session::new(&GameConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        s.generate_scene(&mut rng).unwrap();
        assert_eq!(s.overlay(), Overlay::MissionCamera);
        assert!(s.mission_camera_active());
        s.cancel_capture();
        assert_eq!(s.overlay(), Overlay::None);
        s.open_mission_camera().unwrap();
        assert_eq!(s.overlay(), Overlay::MissionCamera);
    }

    #[test]
    fn third_mission_unlocks_five_scenes() {
        let mut s = Session::new(&GameConfig::default());
        let mut rng = StdRng::seed_from_u64(2);
        for i in 0..3 {
            s.generate_scene(&mut rng).unwrap();
            let out = s.submit_capture(image(), detection(10), i as f64).unwrap();
            assert_eq!(out.newly_unlocked.is_some(), i == 2);
        }
        assert_eq!(s.unlocked_scenes(), 15);
        assert_eq!(s.bonus_scenes(), 5);
        assert_eq!(s.unlock_notice(2.5), Some(5));
        assert_eq!(s.unlock_notice(5.0), None);
        assert_eq!(
            s.take_effects(),
            vec![SessionEffect::ScenesUnlocked { added: 5 }]
        );
    }

    #[test]
    fn identity_cannot_be_confirmed_early() {
        let mut s = Session::new(&GameConfig::default());
        assert_eq!(
            s.confirm_identity(image()),
            Err(SessionError::BoardNotFull { remaining: 5 })
        );
        assert_eq!(
            s.open_identity_camera(),
            Err(SessionError::BoardNotFull { remaining: 5 })
        );
    }

    #[test]
    fn quit_warning_only_with_missions_in_progress() {
        let mut s = Session::new(&GameConfig::default());
        assert_eq!(s.request_quit(), QuitOutcome::Reset);

        let mut rng = StdRng::seed_from_u64(3);
        s.generate_scene(&mut rng).unwrap();
        s.submit_capture(image(), detection(30), 0.0).unwrap();
        s.generate_scene(&mut rng).unwrap();
        assert!(s.should_warn_before_leaving());
        assert_eq!(s.request_quit(), QuitOutcome::Warned);
        assert_eq!(s.overlay(), Overlay::QuitWarning);
        assert!(s.mission_camera_active());
        assert_eq!(s.take_effects(), vec![SessionEffect::PlayWarningStinger]);

        s.continue_after_warning();
        assert_eq!(s.overlay(), Overlay::MissionCamera);

        s.request_quit();
        s.quit();
        assert_eq!(s.total_score(), 0);
        assert!(s.board().is_empty());
        assert_eq!(s.overlay(), Overlay::None);
        assert!(s.current_scene().is_none());
    }

    #[test]
    fn reveal_after_quit_is_ignored() {
        let mut s = Session::new(&GameConfig::default());
        let mut rng = StdRng::seed_from_u64(4);
        let generation = s.begin_reveal().unwrap().unwrap();
        assert!(s.is_generating());
        assert_eq!(s.begin_reveal(), Ok(None));

        assert_eq!(s.request_quit(), QuitOutcome::Reset);
        assert!(!s.is_generating());
        assert_eq!(s.finish_reveal(generation, &mut rng), Ok(None));
        assert!(s.current_scene().is_none());
        assert_eq!(s.overlay(), Overlay::None);
    }

    #[test]
    fn only_the_latest_reveal_rolls_a_scene() {
        let mut s = Session::new(&GameConfig::default());
        let mut rng = StdRng::seed_from_u64(5);
        let stale = s.begin_reveal().unwrap().unwrap();
        s.quit();
        let fresh = s.begin_reveal().unwrap().unwrap();
        assert_ne!(stale, fresh);

        assert_eq!(s.finish_reveal(stale, &mut rng), Ok(None));
        assert!(s.is_generating());
        assert!(s.finish_reveal(fresh, &mut rng).unwrap().is_some());
        assert!(!s.is_generating());
        assert_eq!(s.overlay(), Overlay::MissionCamera);
    }

    #[test]
    fn logged_entries_keep_the_frame_time() {
        let mut s = Session::new(&GameConfig::default());
        let mut rng = StdRng::seed_from_u64(6);
        s.generate_scene(&mut rng).unwrap();
        s.submit_capture(image(), detection(10), 12.5).unwrap();
        assert_eq!(s.board().entries()[0].created_at, 12.5);
    }
}
