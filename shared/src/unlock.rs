//! Unlock tiers: how much of the scene catalog is available.

use serde::{Deserialize, Serialize};

use crate::config::invalid;
use crate::error::ConfigError;

/// Step function from missions completed to the number of unlocked scenes:
/// `min(cap, base + floor(missions / step) * increment)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnlockPolicy {
    pub base: usize,
    pub step: usize,
    pub increment: usize,
    pub cap: usize,
}

impl Default for UnlockPolicy {
    fn default() -> Self {
        Self {
            base: 10,
            step: 3,
            increment: 5,
            cap: 82,
        }
    }
}

impl UnlockPolicy {
    pub fn unlocked_for(&self, missions_completed: usize) -> usize {
        let tiers = missions_completed / self.step.max(1);
        self.base
            .saturating_add(tiers.saturating_mul(self.increment))
            .min(self.cap)
    }

    /// Extra scenes beyond the starting pool, shown as the `+N` badge.
    pub fn bonus(&self, unlocked: usize) -> usize {
        unlocked.saturating_sub(self.base)
    }

    pub fn validate(&self, catalog_len: usize) -> Result<(), ConfigError> {
        if self.step == 0 {
            return Err(invalid("unlock.step", "must be at least 1"));
        }
        if self.base == 0 {
            return Err(invalid("unlock.base", "must be at least 1"));
        }
        if self.cap < self.base {
            return Err(invalid("unlock.cap", "must not be below unlock.base"));
        }
        if self.cap > catalog_len {
            return Err(invalid("unlock.cap", "exceeds the scene catalog size"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_the_tier_formula() {
        let p = UnlockPolicy::default();
        for m in 0..200 {
            assert_eq!(p.unlocked_for(m), (10 + (m / 3) * 5).min(82));
        }
        assert_eq!(p.unlocked_for(0), 10);
        assert_eq!(p.unlocked_for(2), 10);
        assert_eq!(p.unlocked_for(3), 15);
        assert_eq!(p.unlocked_for(1000), 82);
    }

    #[test]
    fn never_decreases() {
        let p = UnlockPolicy::default();
        let mut last = 0;
        for m in 0..500 {
            let now = p.unlocked_for(m);
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn bonus_counts_scenes_past_base() {
        let p = UnlockPolicy::default();
        assert_eq!(p.bonus(10), 0);
        assert_eq!(p.bonus(25), 15);
    }

    #[test]
    fn validate_checks_cap_against_catalog() {
        let p = UnlockPolicy {
            cap: 100,
            ..UnlockPolicy::default()
        };
        assert!(p.validate(82).is_err());
        assert!(UnlockPolicy::default().validate(82).is_ok());
    }
}
