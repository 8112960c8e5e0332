//! Object "detection" and scoring.
//!
//! There is no vision model. [`MockDetector`] invents a handful of labels and
//! adds category labels when the prompt hints at them; scoring only depends on
//! the labels and the scene, so a real [`Detector`] could be dropped in later.

use rand::Rng;

use crate::image::CapturedImage;
use crate::scenes::Scene;

pub const LABEL_VOCABULARY: [&str; 8] = [
    "person", "table", "chair", "cup", "book", "phone", "laptop", "bag",
];

/// Category label and the scene substrings that trigger it.
pub const CATEGORY_TRIGGERS: [(&str, &[&str]); 3] = [
    ("food", &["cake", "cookie", "food"]),
    ("money", &["money", "wallet"]),
    ("phone", &["phone"]),
];

pub const POINTS_PER_LABEL: u32 = 10;
pub const POINTS_PER_RELEVANT_LABEL: u32 = 25;

/// Labels produced for one capture and the points they are worth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub labels: Vec<String>,
    pub points: u32,
}

impl Detection {
    pub fn score(labels: Vec<String>, scene: &Scene) -> Self {
        let points = score_labels(&labels, scene);
        Self { labels, points }
    }

    pub fn relevant_labels<'a>(&'a self, scene: &'a Scene) -> impl Iterator<Item = &'a str> + 'a {
        self.labels
            .iter()
            .map(String::as_str)
            .filter(move |l| is_relevant(l, scene))
    }

    /// Points contributed by the relevance bonus alone.
    pub fn bonus_points(&self, scene: &Scene) -> u32 {
        self.relevant_labels(scene).count() as u32 * POINTS_PER_RELEVANT_LABEL
    }
}

/// Anything that can turn a captured frame into labels.
pub trait Detector {
    fn detect(&mut self, image: &CapturedImage, scene: &Scene) -> Vec<String>;
}

/// Random stand-in for a real detector.
pub struct MockDetector<R> {
    rng: R,
}

impl<R: Rng> MockDetector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Fabricate labels for `scene` without looking at any image.
    pub fn labels_for(&mut self, scene: &Scene) -> Vec<String> {
        let draws = self.rng.random_range(2..=5);
        let mut labels: Vec<String> = Vec::with_capacity(draws + CATEGORY_TRIGGERS.len());
        for _ in 0..draws {
            let pick = LABEL_VOCABULARY[self.rng.random_range(0..LABEL_VOCABULARY.len())];
            push_unique(&mut labels, pick);
        }
        for (category, triggers) in CATEGORY_TRIGGERS {
            if triggers.iter().any(|t| scene.mentions(t)) {
                push_unique(&mut labels, category);
            }
        }
        labels
    }
}

impl<R: Rng> Detector for MockDetector<R> {
    fn detect(&mut self, _image: &CapturedImage, scene: &Scene) -> Vec<String> {
        self.labels_for(scene)
    }
}

fn push_unique(labels: &mut Vec<String>, label: &str) {
    if !labels.iter().any(|l| l == label) {
        labels.push(label.to_string());
    }
}

/// A label counts for the bonus when the scene mentions it directly, or when
/// it is a category label whose trigger the scene mentions.
pub fn is_relevant(label: &str, scene: &Scene) -> bool {
    if scene.mentions(label) {
        return true;
    }
    CATEGORY_TRIGGERS
        .iter()
        .filter(|(category, _)| category.eq_ignore_ascii_case(label))
        .any(|(_, triggers)| triggers.iter().any(|t| scene.mentions(t)))
}

/// `10 * |labels| + 25 * |relevant labels|`
pub fn score_labels(labels: &[String], scene: &Scene) -> u32 {
    let relevant = labels.iter().filter(|l| is_relevant(l, scene)).count() as u32;
    labels.len() as u32 * POINTS_PER_LABEL + relevant * POINTS_PER_RELEVANT_LABEL
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn stealing_cake_scores_45() {
        let scene = Scene::new("stealing cake");
        assert_eq!(score_labels(&labels(&["person", "food"]), &scene), 45);
    }

    #[test]
    fn direct_substring_matches_count() {
        let scene = Scene::new("Taking a suspicious PHONE call");
        let d = Detection::score(labels(&["phone", "cup", "table"]), &scene);
        assert_eq!(d.points, 30 + 25);
        assert_eq!(d.relevant_labels(&scene).collect::<Vec<_>>(), vec!["phone"]);
        assert_eq!(d.bonus_points(&scene), 25);
    }

    #[test]
    fn substring_is_not_token_match() {
        // "cup" is inside "cupboard"
        let scene = Scene::new("raiding the cupboard");
        assert_eq!(score_labels(&labels(&["cup"]), &scene), 35);
    }

    #[test]
    fn mock_labels_are_unique_and_bounded() {
        let mut det = MockDetector::new(StdRng::seed_from_u64(3));
        let scene = Scene::new("sneaking a cookie");
        for _ in 0..500 {
            let got = det.labels_for(&scene);
            let mut dedup = got.clone();
            dedup.sort();
            dedup.dedup();
            assert_eq!(dedup.len(), got.len());
            assert!(got.contains(&"food".to_string()));
            // 1..=5 vocabulary labels plus the food category
            assert!(got.len() >= 2 && got.len() <= 6, "{:?}", got);
        }
    }

    #[test]
    fn triggers_add_category_labels() {
        let mut det = MockDetector::new(StdRng::seed_from_u64(11));
        let got = det.labels_for(&Scene::new("hiding a wallet in a phone case"));
        assert!(got.contains(&"money".to_string()));
        assert!(got.contains(&"phone".to_string()));
        assert_eq!(got.iter().filter(|l| *l == "phone").count(), 1);
    }

    #[test]
    fn plain_scenes_only_get_vocabulary_labels() {
        let mut det = MockDetector::new(StdRng::seed_from_u64(5));
        for _ in 0..200 {
            let got = det.labels_for(&Scene::new("napping on the job"));
            assert!(got.iter().all(|l| LABEL_VOCABULARY.contains(&l.as_str())));
        }
    }
}
