//! Shared hit-point pool and damage contract

use serde::{Deserialize, Serialize};

/// Hit points clamped to `[0, max]`; zero means dead
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// current / max (0 when max is 0)
    pub fn ratio(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Subtract `amount`, clamping into `[0, max]` whatever the sign or size
    pub fn take_damage(&mut self, amount: f32) {
        let amount = if amount.is_nan() { 0.0 } else { amount };
        self.current = (self.current - amount).clamp(0.0, self.max);
    }

    pub fn heal(&mut self, amount: f32) {
        if amount.is_nan() {
            return;
        }
        self.current = (self.current + amount).clamp(0.0, self.max);
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }

    /// Raise the cap (current is untouched)
    pub fn raise_max(&mut self, by: f32) {
        self.max = (self.max + by).max(0.0);
        self.current = self.current.min(self.max);
    }
}

/// Anything that can be hurt: player, enemies, boss
pub trait Damageable {
    fn health(&self) -> &Health;

    fn take_damage(&mut self, amount: f32);

    fn is_alive(&self) -> bool {
        self.health().is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut hp = Health::new(30.0);
        hp.take_damage(20.0);
        assert_eq!(hp.current(), 10.0);
        assert!(hp.is_alive());
        hp.take_damage(20.0);
        assert_eq!(hp.current(), 0.0);
        assert!(!hp.is_alive());
    }

    #[test]
    fn test_negative_damage_never_overheals() {
        let mut hp = Health::new(100.0);
        hp.take_damage(-500.0);
        assert_eq!(hp.current(), 100.0);
    }

    #[test]
    fn test_raise_max_keeps_current() {
        let mut hp = Health::new(100.0);
        hp.take_damage(40.0);
        hp.raise_max(10.0);
        assert_eq!(hp.max(), 110.0);
        assert_eq!(hp.current(), 60.0);
        hp.refill();
        assert_eq!(hp.current(), 110.0);
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_range(
            max in 1.0f32..10_000.0,
            hits in proptest::collection::vec(prop_oneof![
                any::<f32>(),
                -1e6f32..1e6,
            ], 0..32),
        ) {
            let mut hp = Health::new(max);
            for hit in hits {
                hp.take_damage(hit);
                prop_assert!(hp.current() >= 0.0);
                prop_assert!(hp.current() <= hp.max());
                prop_assert_eq!(hp.is_alive(), hp.current() > 0.0);
            }
        }
    }
}
