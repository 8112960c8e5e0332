//! Evidence collected on the current board.

use crate::image::CapturedImage;
use crate::scenes::Scene;

/// Stable identifier of a logged mission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One confirmed mission. Never mutated after it is logged.
#[derive(Clone, Debug)]
pub struct MissionLogEntry {
    pub id: EntryId,
    pub scene: Scene,
    pub score: u32,
    /// Frame-clock seconds (since the app started) at which the mission was
    /// confirmed.
    pub created_at: f64,
    pub image: CapturedImage,
    pub labels: Vec<String>,
}

/// Insertion-ordered, bounded list of the board's entries.
#[derive(Clone, Debug)]
pub struct MissionLog {
    entries: Vec<MissionLogEntry>,
    capacity: usize,
}

impl MissionLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry. Hands it back if the board is already full.
    pub fn push(&mut self, entry: MissionLogEntry) -> Result<(), MissionLogEntry> {
        if self.is_full() {
            return Err(entry);
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[MissionLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.entries.len())
    }

    pub fn total_score(&self) -> u32 {
        self.entries.iter().map(|e| e.score).sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, score: u32) -> MissionLogEntry {
        MissionLogEntry {
            id: EntryId(id),
            scene: Scene::new("stealing cake"),
            score,
            created_at: id as f64,
            image: CapturedImage::new("data:", [1, 1], vec![0; 4]).unwrap(),
            labels: vec!["food".into()],
        }
    }

    #[test]
    fn keeps_insertion_order_and_bound() {
        let mut log = MissionLog::with_capacity(2);
        assert!(log.push(entry(1, 10)).is_ok());
        assert!(log.push(entry(2, 20)).is_ok());
        let rejected = log.push(entry(3, 30)).unwrap_err();
        assert_eq!(rejected.id, EntryId(3));
        let ids: Vec<_> = log.entries().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(log.total_score(), 30);
        assert!(log.is_full());
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.remaining(), 2);
    }
}
