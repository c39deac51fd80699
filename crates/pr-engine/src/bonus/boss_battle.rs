//! Boss battle bonus — damage dealt converts to cash

use rand::Rng;

/// Boss fight with a fixed health pool; each attack's damage pays out
#[derive(Debug, Clone)]
pub struct BossBattleBonus {
    max_attacks: u32,
    max_health: i64,
}

impl BossBattleBonus {
    pub fn new() -> Self {
        Self {
            max_attacks: 10,
            max_health: 1000,
        }
    }

    /// Play one battle; defeating the boss pays a 1.5× damage bonus
    pub fn play<R: Rng + ?Sized>(&self, bet: f64, rng: &mut R) -> f64 {
        let mut health = self.max_health;
        let mut total_damage = 0i64;

        for _ in 0..self.max_attacks {
            if health <= 0 {
                break;
            }
            let damage = rng.random_range(50..200);
            total_damage += damage;
            health -= damage;
        }

        let mut damage_points = total_damage as f64;
        if health <= 0 {
            damage_points *= 1.5;
        }

        // Damage points convert to bet multiples at 10:1
        (damage_points / 10.0) * bet
    }

    pub fn max_attacks(&self) -> u32 {
        self.max_attacks
    }

    pub fn max_health(&self) -> i64 {
        self.max_health
    }
}

impl Default for BossBattleBonus {
    fn default() -> Self {
        Self::new()
    }
}
