//! Confetti for the completion screen.

use egui::Color32;
use rand::Rng;

pub const CONFETTI_PALETTE: [Color32; 8] = [
    Color32::from_rgb(0xFF, 0xD7, 0x00),
    Color32::from_rgb(0xFF, 0x6B, 0x6B),
    Color32::from_rgb(0x4E, 0xCD, 0xC4),
    Color32::from_rgb(0x45, 0xB7, 0xD1),
    Color32::from_rgb(0x96, 0xCE, 0xB4),
    Color32::from_rgb(0xFF, 0xEA, 0xA7),
    Color32::from_rgb(0xDD, 0xA0, 0xDD),
    Color32::from_rgb(0x98, 0xD8, 0xC8),
];

pub const CONFETTI_PIECES: usize = 150;

/// Pixels above the top edge where pieces start.
const START_ABOVE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfettiPiece {
    /// Horizontal position in percent of the screen width.
    pub x: f32,
    pub delay: f32,
    pub duration: f32,
    pub color: Color32,
    pub size: f32,
    pub rotation: f32,
}

impl ConfettiPiece {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x: rng.random_range(0.0..100.0),
            delay: rng.random_range(0.0..3.0),
            duration: rng.random_range(3.0..5.0),
            color: CONFETTI_PALETTE[rng.random_range(0..CONFETTI_PALETTE.len())],
            size: rng.random_range(8.0..16.0),
            rotation: rng.random_range(0.0..360.0),
        }
    }

    /// Fall progress in `[0, 1]`, or `None` before the delay or after landing.
    pub fn progress(&self, elapsed: f32) -> Option<f32> {
        let t = (elapsed - self.delay) / self.duration;
        (0.0..=1.0).contains(&t).then_some(t)
    }

    /// Top-left position and spin (degrees) at `elapsed` seconds into the
    /// shower, for a screen of `width` × `height`.
    pub fn position(&self, elapsed: f32, width: f32, height: f32) -> Option<(egui::Pos2, f32)> {
        let t = self.progress(elapsed)?;
        let x = self.x / 100.0 * width;
        let y = -START_ABOVE + t * (height + 2.0 * START_ABOVE);
        let spin = self.rotation + t * 720.0;
        Some((egui::pos2(x, y), spin))
    }

    /// Width and height; pieces are rectangular.
    pub fn extent(&self) -> egui::Vec2 {
        egui::vec2(self.size, self.size * 0.6)
    }
}

/// A burst of confetti started at a frame-clock timestamp.
#[derive(Debug, Clone)]
pub struct ConfettiShower {
    pieces: Vec<ConfettiPiece>,
    started_at: f64,
}

impl ConfettiShower {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, count: usize, now: f64) -> Self {
        Self {
            pieces: (0..count).map(|_| ConfettiPiece::random(rng)).collect(),
            started_at: now,
        }
    }

    pub fn pieces(&self) -> &[ConfettiPiece] {
        &self.pieces
    }

    pub fn elapsed(&self, now: f64) -> f32 {
        (now - self.started_at).max(0.0) as f32
    }

    /// Every piece has landed.
    pub fn finished(&self, now: f64) -> bool {
        let elapsed = self.elapsed(now);
        self.pieces.iter().all(|p| elapsed > p.delay + p.duration)
    }
}

/// Positions (percent) and colors for the sparkle dots on the completion
/// header, four alternating colors.
pub fn sparkles<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<(egui::Vec2, Color32)> {
    (0..count)
        .map(|i| {
            let pos = egui::vec2(rng.random_range(0.0..100.0), rng.random_range(0.0..100.0));
            (pos, CONFETTI_PALETTE[i % 4])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pieces_stay_in_their_ranges() {
        let mut rng = StdRng::seed_from_u64(8);
        let shower = ConfettiShower::new(&mut rng, CONFETTI_PIECES, 0.0);
        assert_eq!(shower.pieces().len(), 150);
        for p in shower.pieces() {
            assert!((0.0..100.0).contains(&p.x));
            assert!((0.0..3.0).contains(&p.delay));
            assert!((3.0..5.0).contains(&p.duration));
            assert!((8.0..16.0).contains(&p.size));
            assert!(CONFETTI_PALETTE.contains(&p.color));
        }
    }

    #[test]
    fn pieces_fall_top_to_bottom() {
        let piece = ConfettiPiece {
            x: 50.0,
            delay: 1.0,
            duration: 4.0,
            color: CONFETTI_PALETTE[0],
            size: 10.0,
            rotation: 0.0,
        };
        assert!(piece.position(0.5, 800.0, 600.0).is_none());
        let (start, _) = piece.position(1.0, 800.0, 600.0).unwrap();
        let (end, _) = piece.position(5.0, 800.0, 600.0).unwrap();
        assert_eq!(start.x, 400.0);
        assert!(start.y < 0.0);
        assert!(end.y > 600.0);
        assert!(piece.position(5.1, 800.0, 600.0).is_none());
    }

    #[test]
    fn shower_finishes_after_last_piece() {
        let mut rng = StdRng::seed_from_u64(1);
        let shower = ConfettiShower::new(&mut rng, 20, 100.0);
        assert!(!shower.finished(100.0));
        assert!(shower.finished(108.1));
    }

    #[test]
    fn sparkles_cycle_four_colors() {
        let mut rng = StdRng::seed_from_u64(2);
        let dots = sparkles(&mut rng, 20);
        assert_eq!(dots.len(), 20);
        assert_eq!(dots[4].1, CONFETTI_PALETTE[0]);
        assert_eq!(dots[7].1, CONFETTI_PALETTE[3]);
    }
}
