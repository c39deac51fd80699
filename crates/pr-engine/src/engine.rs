//! Game engine — the spin orchestrator
//!
//! Owns one session's grid, balance, multipliers, and RNG; no process-wide
//! state. A spin is a bounded fixed-point loop over the phases
//!
//! ```text
//! Idle → Evaluating → (Paying → Evolving → Cascading → Evaluating)* → Settled
//! ```
//!
//! exposed two ways: [`GameEngine::spin`] runs the loop to completion, while
//! [`GameEngine::begin_spin`] / [`GameEngine::step`] let the caller drive one
//! phase at a time and insert whatever pacing it wants between them. The core
//! itself never waits.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::bonus::{BossBattleBonus, FreeSpinsBonus, ShooterBonus};
use crate::cascade::cascade;
use crate::cluster::{Cluster, count_scatters, find_clusters};
use crate::config::{ConfigError, EngineConfig};
use crate::grid::{Grid, GridMultiplier};
use crate::overdose::{process_clusters, remove_winning};
use crate::spin::{BonusTrigger, SpinResult};
use crate::symbols::SymbolSampler;
use crate::win::{WinResult, calculate_win};

/// A spin rejected before any state changed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpinError {
    #[error("insufficient balance {balance:.2} for bet {bet:.2}")]
    InsufficientFunds { balance: f64, bet: f64 },

    #[error("a spin is already in flight")]
    SpinInProgress,
}

/// Phase of the spin state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinPhase {
    Idle,
    Evaluating,
    Paying,
    Evolving,
    Cascading,
    Settled,
}

/// Session statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_bet: f64,
    pub total_win: f64,
    pub wins: u64,
    pub losses: u64,
    pub bonuses_triggered: u64,
    pub cascade_chains: u64,
    /// Spins ended by the cascade safety ceiling; audit this if non-zero
    pub ceiling_hits: u64,
    pub max_win_ratio: f64,
}

impl SessionStats {
    /// Calculate RTP
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0.0 {
            (self.total_win / self.total_bet) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Working state of the spin currently in flight
#[derive(Debug, Clone)]
struct InFlightSpin {
    spin_id: String,
    bet: f64,
    is_free_spin: bool,
    iterations: u32,
    clusters: Vec<Cluster>,
    cascade_results: Vec<WinResult>,
    new_multipliers: Vec<GridMultiplier>,
    total_win: f64,
    ceiling_hit: bool,
}

/// One player session of the cluster-cascade game
pub struct GameEngine {
    config: EngineConfig,
    base_sampler: SymbolSampler,
    free_spins_sampler: SymbolSampler,
    rng: StdRng,
    balance: f64,
    bet: f64,
    grid: Grid,
    /// Permanent multipliers from ordinary play; live for the whole session
    multipliers: Vec<GridMultiplier>,
    free_spins: FreeSpinsBonus,
    shooter: ShooterBonus,
    boss_battle: BossBattleBonus,
    stats: SessionStats,
    spin_count: u64,
    phase: SpinPhase,
    in_flight: Option<InFlightSpin>,
    last_result: Option<SpinResult>,
}

impl GameEngine {
    /// Create a session with the default bankroll
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_bankroll(config, 10_000.0)
    }

    /// Create a session with an explicit starting balance
    pub fn with_bankroll(config: EngineConfig, balance: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        let base_sampler = SymbolSampler::new(&config.base_weights)?;
        let free_spins_sampler = SymbolSampler::new(&config.free_spins_weights)?;
        let mut rng = StdRng::from_os_rng();
        let grid = Grid::random(config.grid, &base_sampler, &mut rng);
        let bet = config.default_bet;

        Ok(Self {
            config,
            base_sampler,
            free_spins_sampler,
            rng,
            balance,
            bet,
            grid,
            multipliers: Vec::new(),
            free_spins: FreeSpinsBonus::new(),
            shooter: ShooterBonus::new(),
            boss_battle: BossBattleBonus::new(),
            stats: SessionStats::default(),
            spin_count: 0,
            phase: SpinPhase::Idle,
            in_flight: None,
            last_result: None,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // CONFIGURATION & SNAPSHOTS
    // ═══════════════════════════════════════════════════════════════════════

    /// Seed the RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Set the bet for subsequent spins
    pub fn set_bet(&mut self, bet: f64) {
        self.bet = bet.max(0.01);
    }

    pub fn bet(&self) -> f64 {
        self.bet
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    /// Current grid snapshot
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Permanent multipliers from ordinary play
    pub fn permanent_multipliers(&self) -> &[GridMultiplier] {
        &self.multipliers
    }

    /// Active multipliers: permanent plus, during free spins, sticky ones.
    /// At most one entry per position.
    pub fn multipliers(&self) -> Vec<GridMultiplier> {
        let mut active = self.multipliers.clone();
        if self.free_spins.is_active() {
            for mult in self.free_spins.sticky_multipliers() {
                if !active.iter().any(|m| m.position == mult.position) {
                    active.push(*mult);
                }
            }
        }
        active
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }

    pub fn in_free_spins(&self) -> bool {
        self.free_spins.is_active()
    }

    pub fn free_spins_remaining(&self) -> u32 {
        self.free_spins.spins_remaining()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════

    /// Run one full spin to settlement
    pub fn spin(&mut self) -> Result<SpinResult, SpinError> {
        self.begin_spin()?;
        while self.step() != SpinPhase::Settled {}
        match self.take_result() {
            Some(result) => Ok(result),
            None => unreachable!("a settled spin always leaves a result"),
        }
    }

    /// Accept a spin: funds check, bet deduction, grid setup
    ///
    /// Inside free spins the bet is not deducted and the grid carries over;
    /// an ordinary spin draws a fresh grid. On rejection nothing changes.
    pub fn begin_spin(&mut self) -> Result<(), SpinError> {
        if !matches!(self.phase, SpinPhase::Idle | SpinPhase::Settled) {
            return Err(SpinError::SpinInProgress);
        }
        let is_free_spin = self.free_spins.is_active();
        if !is_free_spin {
            if self.balance < self.bet {
                return Err(SpinError::InsufficientFunds {
                    balance: self.balance,
                    bet: self.bet,
                });
            }
            self.balance -= self.bet;
            self.grid = Grid::random(self.config.grid, &self.base_sampler, &mut self.rng);
        }
        self.spin_count += 1;
        self.in_flight = Some(InFlightSpin {
            spin_id: format!("spin-{:06}", self.spin_count),
            bet: self.bet,
            is_free_spin,
            iterations: 0,
            clusters: Vec::new(),
            cascade_results: Vec::new(),
            new_multipliers: Vec::new(),
            total_win: 0.0,
            ceiling_hit: false,
        });
        self.last_result = None;
        self.phase = SpinPhase::Evaluating;
        Ok(())
    }

    /// Advance the in-flight spin by one phase and return the new phase
    pub fn step(&mut self) -> SpinPhase {
        match self.phase {
            SpinPhase::Idle | SpinPhase::Settled => {}
            SpinPhase::Evaluating => self.step_evaluating(),
            SpinPhase::Paying => self.step_paying(),
            SpinPhase::Evolving => self.step_evolving(),
            SpinPhase::Cascading => self.step_cascading(),
        }
        self.phase
    }

    /// Take the settled result; returns the engine to Idle
    pub fn take_result(&mut self) -> Option<SpinResult> {
        if self.phase == SpinPhase::Settled {
            self.phase = SpinPhase::Idle;
        }
        self.last_result.take()
    }

    /// Cancel the in-flight spin at an iteration boundary
    ///
    /// Only honored while the machine sits at Evaluating (between cascades);
    /// the spin settles with whatever has accumulated. Returns false at any
    /// other phase, leaving the spin untouched.
    pub fn settle_early(&mut self) -> bool {
        if self.phase == SpinPhase::Evaluating {
            self.settle();
            true
        } else {
            false
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // PHASE TRANSITIONS
    // ═══════════════════════════════════════════════════════════════════════

    fn step_evaluating(&mut self) {
        let ceiling_hit = {
            let Some(fl) = self.in_flight.as_mut() else {
                return;
            };
            if fl.iterations >= self.config.max_cascades {
                log::warn!(
                    "{} hit the cascade ceiling at {} iterations",
                    fl.spin_id,
                    fl.iterations
                );
                fl.ceiling_hit = true;
                true
            } else {
                false
            }
        };
        if ceiling_hit {
            self.stats.ceiling_hits += 1;
            self.settle();
            return;
        }

        let clusters = find_clusters(&self.grid, self.config.min_cluster_size);
        if clusters.is_empty() {
            self.settle();
            return;
        }
        if let Some(fl) = self.in_flight.as_mut() {
            fl.clusters = clusters;
        }
        self.phase = SpinPhase::Paying;
    }

    fn step_paying(&mut self) {
        let active = self.multipliers();
        let Some(fl) = self.in_flight.as_mut() else {
            return;
        };
        let result = calculate_win(
            &fl.clusters,
            fl.bet,
            &active,
            &self.config.payouts,
            self.config.max_win_multiplier,
        );
        log::debug!(
            "{} iteration {}: {} clusters pay {:.2} (×{})",
            fl.spin_id,
            fl.iterations,
            result.clusters.len(),
            result.total_win,
            result.multiplier
        );
        fl.total_win += result.total_win;
        fl.cascade_results.push(result);
        self.phase = SpinPhase::Evolving;
    }

    fn step_evolving(&mut self) {
        let active = self.multipliers();
        let in_free_spins = self.free_spins.is_active();
        let Some(fl) = self.in_flight.as_mut() else {
            return;
        };
        let emitted = process_clusters(
            &mut self.grid,
            &fl.clusters,
            &active,
            self.config.explosion_multiplier,
        );
        if !emitted.is_empty() {
            if in_free_spins {
                self.free_spins.add_sticky_multipliers(&emitted);
            } else {
                for mult in &emitted {
                    if !self.multipliers.iter().any(|m| m.position == mult.position) {
                        self.multipliers.push(*mult);
                    }
                }
            }
            fl.new_multipliers.extend(emitted);
        }
        self.phase = SpinPhase::Cascading;
    }

    fn step_cascading(&mut self) {
        let in_free_spins = self.free_spins.is_active();
        let Some(fl) = self.in_flight.as_mut() else {
            return;
        };
        remove_winning(&mut self.grid, &fl.clusters);
        fl.clusters.clear();
        let sampler = if in_free_spins {
            &self.free_spins_sampler
        } else {
            &self.base_sampler
        };
        cascade(&mut self.grid, sampler, &mut self.rng);
        if in_free_spins {
            self.free_spins.process_doctor(&self.grid);
        }
        fl.iterations += 1;
        self.phase = SpinPhase::Evaluating;
    }

    /// Finalize the spin: credit wins, resolve bonuses, update free spins
    fn settle(&mut self) {
        let Some(mut fl) = self.in_flight.take() else {
            return;
        };
        self.balance += fl.total_win;

        // Bonus entry is decided on the settled grid
        let settled_grid = self.grid.clone();
        let scatters = count_scatters(&settled_grid);
        let trigger = if scatters >= self.config.free_spins_scatters {
            BonusTrigger::FreeSpins
        } else if scatters >= self.config.boss_battle_scatters {
            BonusTrigger::BossBattle
        } else if scatters >= self.config.shooter_scatters {
            BonusTrigger::Shooter
        } else {
            BonusTrigger::None
        };

        let mut bonus_win = 0.0;
        match trigger {
            BonusTrigger::Shooter => {
                bonus_win = self.shooter.play(fl.bet, &mut self.rng);
            }
            BonusTrigger::BossBattle => {
                bonus_win = self.boss_battle.play(fl.bet, &mut self.rng);
            }
            BonusTrigger::FreeSpins => {
                self.grid = self.free_spins.initialize(
                    &self.config,
                    &self.free_spins_sampler,
                    &mut self.rng,
                );
            }
            BonusTrigger::None => {}
        }
        if trigger.is_triggered() {
            self.stats.bonuses_triggered += 1;
        }
        if bonus_win > 0.0 {
            fl.total_win += bonus_win;
            self.balance += bonus_win;
        }

        // A Doctor on the resulting grid wipes sticky multipliers before the
        // next free spin begins
        if self.free_spins.is_active() {
            self.free_spins.process_doctor(&self.grid);
        }

        if fl.is_free_spin {
            self.free_spins.decrement();
            if !self.free_spins.is_active() {
                log::debug!("free spins finished, dropping sticky multipliers");
                self.free_spins.reset();
            }
        }

        self.stats.total_spins += 1;
        if !fl.is_free_spin {
            self.stats.total_bet += fl.bet;
        }
        self.stats.total_win += fl.total_win;
        if fl.total_win > 0.0 {
            self.stats.wins += 1;
        } else {
            self.stats.losses += 1;
        }
        if fl.cascade_results.len() > 1 {
            self.stats.cascade_chains += 1;
        }
        let win_ratio = if fl.bet > 0.0 {
            fl.total_win / fl.bet
        } else {
            0.0
        };
        if win_ratio > self.stats.max_win_ratio {
            self.stats.max_win_ratio = win_ratio;
        }

        log::debug!(
            "{} settled: win {:.2} over {} cascades, {} scatters",
            fl.spin_id,
            fl.total_win,
            fl.cascade_results.len(),
            scatters
        );

        self.last_result = Some(SpinResult {
            spin_id: fl.spin_id,
            bet: fl.bet,
            final_grid: settled_grid,
            cascade_results: fl.cascade_results,
            total_win: fl.total_win,
            win_ratio,
            bonus_triggered: trigger,
            bonus_win,
            new_multipliers: fl.new_multipliers,
            is_free_spin: fl.is_free_spin,
            free_spins_remaining: self.free_spins.spins_remaining(),
            ceiling_hit: fl.ceiling_hit,
        });
        self.phase = SpinPhase::Settled;
    }
}
