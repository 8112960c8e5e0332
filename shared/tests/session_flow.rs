//! Full board cycles through the session state machine.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spyboard_shared::detector::{MockDetector, Detector};
use spyboard_shared::session::QuitOutcome;
use spyboard_shared::{
    BoardPhase, CapturedImage, Detection, GameConfig, Overlay, Session, SessionEffect,
    SessionError,
};

fn image() -> CapturedImage {
    CapturedImage::new("data:image/jpeg;base64,/9j/", [2, 1], vec![255; 8]).unwrap()
}

/// Generate a scene, run the mock detector on it and log the result.
fn play_mission(session: &mut Session, rng: &mut StdRng, now: f64) -> u32 {
    let scene = session.generate_scene(rng).unwrap().clone();
    let mut detector = MockDetector::new(StdRng::seed_from_u64(rng.random()));
    let labels = detector.detect(&image(), &scene);
    let detection = Detection::score(labels, &scene);
    let points = detection.points;
    session.submit_capture(image(), detection, now).unwrap();
    points
}

#[test]
fn board_fills_then_requires_identity() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut s = Session::new(&GameConfig::default());

    let mut gate_openings = 0;
    for i in 0..5 {
        assert_eq!(s.phase(), BoardPhase::Collecting);
        play_mission(&mut s, &mut rng, i as f64);
        assert!(s.board().len() <= 5);
        if s.overlay() == Overlay::AgentCamera {
            gate_openings += 1;
        }
    }
    assert_eq!(gate_openings, 1);
    assert_eq!(s.phase(), BoardPhase::AwaitingIdentity);

    // no sixth mission on a full board
    assert_eq!(
        s.generate_scene(&mut rng).unwrap_err(),
        SessionError::BoardFull(5)
    );
    assert_eq!(s.board().len(), 5);

    // closing the agent camera keeps the gate; it can be reopened by hand
    s.close_identity_camera();
    assert_eq!(s.overlay(), Overlay::None);
    s.open_identity_camera().unwrap();
    assert_eq!(s.overlay(), Overlay::AgentCamera);
}

#[test]
fn completing_a_board_starts_the_next_one() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut s = Session::new(&GameConfig::default());
    for i in 0..5 {
        play_mission(&mut s, &mut rng, i as f64);
    }
    s.take_effects();

    s.confirm_identity(image()).unwrap();
    assert_eq!(s.overlay(), Overlay::Completion);
    assert!(s.agent_photo().is_some());
    assert_eq!(
        s.take_effects(),
        vec![
            SessionEffect::StopMusic,
            SessionEffect::PlayCompletionCue,
            SessionEffect::LaunchConfetti
        ]
    );
    assert_eq!(
        s.confirm_identity(image()),
        Err(SessionError::IdentityAlreadyConfirmed)
    );

    let score = s.total_score();
    s.dismiss_completion().unwrap();
    assert!(s.board().is_empty());
    assert_eq!(s.board_number(), 2);
    assert!(s.agent_photo().is_none());
    assert_eq!(s.total_score(), score);
    assert_eq!(s.missions_completed(), 5);
    assert_eq!(s.take_effects(), vec![SessionEffect::ResumeMusic]);
    assert_eq!(s.dismiss_completion(), Err(SessionError::CompletionNotShown));

    // the next board plays normally
    play_mission(&mut s, &mut rng, 10.0);
    assert_eq!(s.board().len(), 1);
    assert_eq!(s.board_number(), 2);
}

#[test]
fn board_number_increments_by_one_per_completion() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut s = Session::new(&GameConfig::default());
    for board in 1..=4u32 {
        assert_eq!(s.board_number(), board);
        for i in 0..5 {
            play_mission(&mut s, &mut rng, i as f64);
        }
        s.confirm_identity(image()).unwrap();
        s.dismiss_completion().unwrap();
        assert!(s.board().is_empty());
        assert_eq!(s.board_number(), board + 1);
    }
}

#[test]
fn total_score_is_the_sum_of_logged_points() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut s = Session::new(&GameConfig::default());
    let mut expected: u64 = 0;
    let mut now = 0.0;
    for _ in 0..3 {
        for _ in 0..5 {
            now += 1.0;
            expected += u64::from(play_mission(&mut s, &mut rng, now));
            // unlock notices come and go between captures
            s.tick(now + 0.5);
            let _ = s.unlock_notice(now);
        }
        s.confirm_identity(image()).unwrap();
        s.dismiss_completion().unwrap();
    }
    assert_eq!(s.total_score(), expected);
    assert_eq!(s.missions_completed(), 15);
}

#[test]
fn unlocked_count_tracks_cumulative_missions() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut s = Session::new(&GameConfig::default());
    let mut last = s.unlocked_scenes();
    assert_eq!(last, 10);
    for _ in 0..40 {
        for i in 0..5 {
            play_mission(&mut s, &mut rng, i as f64);
            let m = s.missions_completed();
            assert_eq!(s.unlocked_scenes(), (10 + (m / 3) * 5).min(82));
            assert!(s.unlocked_scenes() >= last);
            last = s.unlocked_scenes();
        }
        s.confirm_identity(image()).unwrap();
        s.dismiss_completion().unwrap();
    }
    assert_eq!(s.unlocked_scenes(), 82);
}

#[test]
fn eight_mission_boards_are_configurable() {
    let cfg = GameConfig::from_toml_str(
        "[board]\nmissions_per_board = 8\nquit_warning_below = 8\n",
    )
    .unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let mut s = Session::new(&cfg);
    for i in 0..7 {
        play_mission(&mut s, &mut rng, i as f64);
        assert_eq!(s.phase(), BoardPhase::Collecting);
    }
    assert!(s.should_warn_before_leaving());
    play_mission(&mut s, &mut rng, 8.0);
    assert_eq!(s.phase(), BoardPhase::AwaitingIdentity);
    assert!(!s.should_warn_before_leaving());
}

#[test]
fn quitting_with_nothing_done_resets_silently() {
    let mut s = Session::new(&GameConfig::default());
    assert_eq!(s.request_quit(), QuitOutcome::Reset);
    assert!(s.take_effects().is_empty());
}
