//! Mission scene catalog and random selection.
//!
//! The catalog is ordered: unlock tiers expose a growing prefix of it, so
//! the tamer prompts come first.

use rand::Rng;
use std::fmt;

/// A mission prompt shown to the player for one capture round.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scene(String);

impl Scene {
    pub fn new(text: impl Into<String>) -> Self {
        Scene(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring test used by the detector.
    pub fn mentions(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const SCENE_CATALOG: [&str; 82] = [
    // starting pool
    "stealing cake",
    "sneaking a cookie",
    "hiding under a table",
    "reading someone else's book",
    "napping on the job",
    "whispering a secret",
    "peeking behind a door",
    "drinking from the wrong cup",
    "sitting in the boss's chair",
    "pretending to work on a laptop",
    // tier 1
    "taking a suspicious phone call",
    "counting stolen money",
    "emptying a wallet",
    "hiding food in a bag",
    "wearing sunglasses indoors",
    // tier 2
    "eavesdropping at the window",
    "raiding the fridge",
    "tiptoeing past a guard",
    "swapping name tags",
    "stashing snacks in a drawer",
    // tier 3
    "hiding behind a plant",
    "taking a selfie with the evidence",
    "licking the frosting off a cake",
    "sneaking a peek at a phone",
    "disguising as a coat rack",
    // tier 4
    "leaving a fake note",
    "borrowing a pen forever",
    "hoarding all the cookies",
    "pretending to read a book upside down",
    "passing a secret note under the table",
    // tier 5
    "stealing the last slice of pizza",
    "drawing a mustache on a photo",
    "hiding the remote control",
    "switching the sugar and salt",
    "taking the last cup of coffee",
    // tier 6
    "hiding a phone in a bag",
    "paying with monopoly money",
    "guarding the food table",
    "camouflaging with a blanket",
    "sneaking out through the back door",
    // tier 7
    "stacking chairs into a fort",
    "using a laptop as a tray",
    "wearing a lampshade hat",
    "smuggling a cookie in a cup",
    "spying through a rolled-up book",
    // tier 8
    "tailing a suspect to the kitchen",
    "decoding a message on a napkin",
    "planting a rubber duck",
    "hiding a wallet in a shoe",
    "faking a phone battery death",
    // tier 9
    "sharing food with the pet",
    "building a paper airplane at a desk",
    "sleeping with eyes painted open",
    "testing the office chair speed",
    "leaving crumbs of cake as a trail",
    // tier 10
    "posing as a statue",
    "stealing a bite of someone's food",
    "tying shoelaces together",
    "hiding inside a laundry basket",
    "sending a mystery text from a phone",
    // tier 11
    "counting coins from a piggy bank for money",
    "balancing a cup on someone's head",
    "sketching a wanted poster",
    "sliding across the floor in socks",
    "sitting on a bag of chips",
    // tier 12
    "reading a diary with a flashlight",
    "hiding cookie crumbs under the rug",
    "wearing someone else's jacket",
    "photobombing a group picture",
    "stealing the TV remote",
    // tier 13
    "taping a fake spider to a laptop",
    "hiding a cake under a table",
    "trading lunches without asking",
    "scribbling in a library book",
    "counting money under the desk",
    // tier 14
    "hacking a phone with a banana",
    "hiding behind a newspaper with eye holes",
    "stealing the comfiest chair",
    "sneaking food into the movie",
    "zipping someone's wallet into a bag",
    // final unlock
    "escaping with the entire cake",
    "staging the perfect heist",
];

/// Pick a scene uniformly from the first `unlocked` catalog entries.
///
/// `unlocked` is clamped to `1..=SCENE_CATALOG.len()`.
pub fn pick_scene<R: Rng + ?Sized>(rng: &mut R, unlocked: usize) -> Scene {
    let pool = unlocked.clamp(1, SCENE_CATALOG.len());
    let idx = rng.random_range(0..pool);
    Scene::new(SCENE_CATALOG[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn catalog_entries_are_unique() {
        let set: HashSet<_> = SCENE_CATALOG.iter().collect();
        assert_eq!(set.len(), SCENE_CATALOG.len());
    }

    #[test]
    fn picks_only_from_unlocked_prefix() {
        let mut rng = StdRng::seed_from_u64(7);
        for unlocked in 1..=SCENE_CATALOG.len() {
            let allowed = &SCENE_CATALOG[..unlocked];
            for _ in 0..50 {
                let scene = pick_scene(&mut rng, unlocked);
                assert!(allowed.contains(&scene.text()), "{} not in first {}", scene, unlocked);
            }
        }
    }

    #[test]
    fn out_of_range_counts_are_clamped() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_scene(&mut rng, 0).text(), SCENE_CATALOG[0]);
        for _ in 0..100 {
            let s = pick_scene(&mut rng, 10_000);
            assert!(SCENE_CATALOG.contains(&s.text()));
        }
    }

    #[test]
    fn eventually_covers_the_whole_pool() {
        let mut rng = StdRng::seed_from_u64(99);
        let seen: HashSet<String> = (0..2000)
            .map(|_| pick_scene(&mut rng, 10).text().to_string())
            .collect();
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn mentions_is_case_insensitive() {
        let s = Scene::new("Stealing CAKE");
        assert!(s.mentions("cake"));
        assert!(!s.mentions("cookie"));
    }
}
