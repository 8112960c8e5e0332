//! Scoring and scene-pool properties over the whole catalog.

use rand::rngs::StdRng;
use rand::SeedableRng;
use spyboard_shared::detector::{is_relevant, score_labels, LABEL_VOCABULARY};
use spyboard_shared::unlock::UnlockPolicy;
use spyboard_shared::{pick_scene, Detection, MockDetector, Scene, SCENE_CATALOG};

#[test]
fn mock_scores_follow_the_formula_for_every_scene() {
    for (seed, text) in SCENE_CATALOG.iter().enumerate() {
        let scene = Scene::new(*text);
        let mut detector = MockDetector::new(StdRng::seed_from_u64(seed as u64));
        for _ in 0..20 {
            let labels = detector.labels_for(&scene);
            let relevant = labels.iter().filter(|l| is_relevant(l, &scene)).count() as u32;
            let detection = Detection::score(labels.clone(), &scene);
            assert_eq!(detection.points, 10 * labels.len() as u32 + 25 * relevant);
            assert_eq!(detection.bonus_points(&scene), 25 * relevant);
            assert!(detection.points >= 10);
            assert!(labels.len() <= LABEL_VOCABULARY.len() + 2);
        }
    }
}

#[test]
fn food_scenes_always_earn_a_bonus() {
    let mut detector = MockDetector::new(StdRng::seed_from_u64(11));
    for text in SCENE_CATALOG.iter().filter(|t| t.contains("cake") || t.contains("cookie")) {
        let scene = Scene::new(*text);
        let labels = detector.labels_for(&scene);
        assert!(labels.iter().any(|l| l == "food"), "{text}: {labels:?}");
        assert!(score_labels(&labels, &scene) >= 10 * labels.len() as u32 + 25);
    }
}

#[test]
fn scenes_come_from_the_unlocked_prefix() {
    let mut rng = StdRng::seed_from_u64(99);
    for unlocked in 1..=SCENE_CATALOG.len() {
        let pool = &SCENE_CATALOG[..unlocked];
        for _ in 0..25 {
            let scene = pick_scene(&mut rng, unlocked);
            assert!(pool.contains(&scene.text()));
        }
    }
}

#[test]
fn unlock_formula_matches_for_all_mission_counts() {
    let policy = UnlockPolicy::default();
    let mut previous = 0;
    for m in 0..400 {
        let expected = (10 + (m / 3) * 5).min(82);
        let unlocked = policy.unlocked_for(m);
        assert_eq!(unlocked, expected);
        assert!(unlocked >= previous);
        previous = unlocked;
    }
}
