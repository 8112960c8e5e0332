//! Background music and one-shot sound cues.
//!
//! Browsers may refuse to start audio (autoplay policy). Refusals are
//! logged and leave the player paused; they are never shown to the user.

use crate::config::{AudioConfig, Track};
use crate::error::PlaybackRejected;
use crate::notice::TimedNotice;
use crate::session::SessionEffect;

/// A single audio element.
pub trait AudioOutput {
    fn load(&mut self, src: &str);
    /// Start playback. Synchronous refusals are returned here; refusals that
    /// arrive later are reported through [`AudioOutput::take_rejection`].
    fn play(&mut self) -> Result<(), PlaybackRejected>;
    fn pause(&mut self);
    fn set_volume(&mut self, volume: f64);
    fn take_rejection(&mut self) -> Option<PlaybackRejected>;
    /// True once after the loaded source played to the end.
    fn take_ended(&mut self) -> bool;
}

/// Cycles through a fixed playlist with play/pause/skip.
pub struct MusicPlayer<A: AudioOutput> {
    output: A,
    tracks: Vec<Track>,
    current: usize,
    playing: bool,
    banner: TimedNotice<usize>,
}

impl<A: AudioOutput> MusicPlayer<A> {
    pub fn new(mut output: A, config: &AudioConfig, banner_secs: f64) -> Self {
        output.set_volume(config.volume);
        if let Some(first) = config.playlist.first() {
            output.load(&first.src);
        }
        Self {
            output,
            tracks: config.playlist.clone(),
            current: 0,
            playing: false,
            banner: TimedNotice::new(banner_secs),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Track whose name banner is showing after a skip.
    pub fn banner(&self, now: f64) -> Option<&Track> {
        self.banner.visible(now).and_then(|i| self.tracks.get(*i))
    }

    pub fn play(&mut self) {
        match self.output.play() {
            Ok(()) => self.playing = true,
            Err(e) => {
                tracing::warn!(error = %e, "music playback rejected");
                self.playing = false;
            }
        }
    }

    pub fn pause(&mut self) {
        self.output.pause();
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Skip to the next track, wrapping around, and flash its name.
    pub fn next(&mut self, now: f64) {
        if self.tracks.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.tracks.len();
        self.output.load(&self.tracks[self.current].src);
        self.banner.show(self.current, now);
        tracing::debug!(track = %self.tracks[self.current].name, "next track");
        if self.playing {
            self.play();
        }
    }

    /// React to the session's music effects. Resuming plays even when the
    /// music was off before it stopped.
    pub fn apply(&mut self, effect: SessionEffect) {
        match effect {
            SessionEffect::StopMusic => self.pause(),
            SessionEffect::ResumeMusic => self.play(),
            _ => {}
        }
    }

    /// Per-frame housekeeping: late rejections and auto-advance.
    pub fn update(&mut self, now: f64) {
        if let Some(e) = self.output.take_rejection() {
            tracing::warn!(error = %e, "music playback rejected");
            self.playing = false;
        }
        if self.output.take_ended() {
            self.next(now);
        }
        self.banner.tick(now);
    }
}

/// A short sound that is played from the start on demand.
pub struct SoundCue<A: AudioOutput> {
    output: A,
    src: String,
}

impl<A: AudioOutput> SoundCue<A> {
    pub fn new(mut output: A, src: &str, volume: f64) -> Self {
        output.set_volume(volume);
        output.load(src);
        Self {
            output,
            src: src.to_string(),
        }
    }

    pub fn trigger(&mut self) {
        // reloading rewinds to the start
        self.output.load(&self.src);
        if let Err(e) = self.output.play() {
            tracing::warn!(error = %e, "sound cue rejected");
        }
    }

    pub fn update(&mut self) {
        if let Some(e) = self.output.take_rejection() {
            tracing::warn!(error = %e, "sound cue rejected");
        }
        self.output.take_ended();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        loaded: Vec<String>,
        plays: usize,
        reject_next: bool,
        late_rejection: bool,
        ended: bool,
    }

    #[derive(Clone, Default)]
    struct FakeOutput(Rc<RefCell<Log>>);

    impl AudioOutput for FakeOutput {
        fn load(&mut self, src: &str) {
            self.0.borrow_mut().loaded.push(src.to_string());
        }
        fn play(&mut self) -> Result<(), PlaybackRejected> {
            let mut log = self.0.borrow_mut();
            if std::mem::take(&mut log.reject_next) {
                return Err(PlaybackRejected {
                    source_url: "x".into(),
                    reason: "NotAllowedError".into(),
                });
            }
            log.plays += 1;
            Ok(())
        }
        fn pause(&mut self) {}
        fn set_volume(&mut self, _volume: f64) {}
        fn take_rejection(&mut self) -> Option<PlaybackRejected> {
            std::mem::take(&mut self.0.borrow_mut().late_rejection).then(|| PlaybackRejected {
                source_url: "x".into(),
                reason: "autoplay".into(),
            })
        }
        fn take_ended(&mut self) -> bool {
            std::mem::take(&mut self.0.borrow_mut().ended)
        }
    }

    fn player() -> (MusicPlayer<FakeOutput>, FakeOutput) {
        let out = FakeOutput::default();
        let p = MusicPlayer::new(out.clone(), &AudioConfig::default(), 2.0);
        (p, out)
    }

    #[test]
    fn skipping_wraps_and_shows_banner() {
        let (mut p, out) = player();
        for _ in 0..4 {
            p.next(1.0);
        }
        assert_eq!(p.current_index(), 0);
        assert_eq!(out.0.borrow().loaded.len(), 5);
        assert_eq!(p.banner(2.0).unwrap().name, "FaShIoN");
        assert!(p.banner(3.5).is_none());
    }

    #[test]
    fn rejected_autoplay_leaves_music_paused() {
        let (mut p, out) = player();
        out.0.borrow_mut().reject_next = true;
        p.play();
        assert!(!p.is_playing());

        p.play();
        assert!(p.is_playing());
        out.0.borrow_mut().late_rejection = true;
        p.update(0.0);
        assert!(!p.is_playing());
    }

    #[test]
    fn finished_tracks_advance() {
        let (mut p, out) = player();
        p.play();
        out.0.borrow_mut().ended = true;
        p.update(0.0);
        assert_eq!(p.current_index(), 1);
        assert_eq!(out.0.borrow().plays, 2);
    }

    #[test]
    fn dismissal_starts_music_after_refused_autoplay() {
        let (mut p, out) = player();
        out.0.borrow_mut().reject_next = true;
        p.play();
        assert!(!p.is_playing());

        p.apply(SessionEffect::StopMusic);
        p.apply(SessionEffect::PlayCompletionCue);
        assert!(!p.is_playing());
        p.apply(SessionEffect::ResumeMusic);
        assert!(p.is_playing());
        assert_eq!(out.0.borrow().plays, 1);
    }

    #[test]
    fn toggle_flips_state() {
        let (mut p, _out) = player();
        p.toggle();
        assert!(p.is_playing());
        p.toggle();
        assert!(!p.is_playing());
    }
}
