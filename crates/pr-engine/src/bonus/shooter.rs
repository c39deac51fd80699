//! Shooter bonus — three target draws

use rand::Rng;

/// Three-target shooter round
#[derive(Debug, Clone)]
pub struct ShooterBonus {
    targets: u32,
    hit_chance: f64,
}

impl ShooterBonus {
    pub fn new() -> Self {
        Self {
            targets: 3,
            hit_chance: 0.7,
        }
    }

    /// Play one round; each hit target pays 5–14× bet
    pub fn play<R: Rng + ?Sized>(&self, bet: f64, rng: &mut R) -> f64 {
        let mut total_win = 0.0;
        for _ in 0..self.targets {
            if rng.random_bool(self.hit_chance) {
                let win_multiplier = rng.random_range(5..15) as f64;
                total_win += bet * win_multiplier;
            }
        }
        total_win
    }

    pub fn targets(&self) -> u32 {
        self.targets
    }

    pub fn hit_chance(&self) -> f64 {
        self.hit_chance
    }
}

impl Default for ShooterBonus {
    fn default() -> Self {
        Self::new()
    }
}
