//! Engine configuration and fail-fast validation

use serde::{Deserialize, Serialize};

use crate::symbols::{PayoutTable, SymbolKind, SymbolWeights};

/// Grid dimensions (columns × rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of columns
    pub cols: usize,
    /// Number of visible rows
    pub rows: usize,
}

impl GridSpec {
    /// Standard 6×5 cluster grid
    pub fn standard_6x5() -> Self {
        Self { cols: 6, rows: 5 }
    }

    /// Total grid positions
    pub fn total_positions(&self) -> usize {
        self.cols * self.rows
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_6x5()
    }
}

/// Configuration rejected at construction time
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("grid dimensions must be non-zero ({cols}×{rows})")]
    EmptyGrid { cols: usize, rows: usize },

    #[error("minimum cluster size must be at least 2")]
    ClusterSizeTooSmall,

    #[error("minimum cluster size {min} exceeds grid capacity {capacity}")]
    ClusterSizeTooLarge { min: usize, capacity: usize },

    #[error("invalid weight table: {0}")]
    WeightTable(String),

    #[error("symbol {kind:?} has zero weight")]
    ZeroWeight { kind: SymbolKind },

    #[error("paying symbol {kind:?} has no payout entry")]
    MissingPayout { kind: SymbolKind },

    #[error("payout for {kind:?} must be positive")]
    InvalidPayout { kind: SymbolKind },

    #[error("scatter thresholds must be ordered shooter ≤ boss battle ≤ free spins")]
    ScatterThresholdOrder,

    #[error("cascade iteration ceiling must be non-zero")]
    ZeroCascadeCeiling,

    #[error("explosion multiplier must be at least 2")]
    ExplosionMultiplierTooSmall,

    #[error("pre-infected chance must be within 0.0..=1.0")]
    InvalidPreInfectedChance,

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Complete engine configuration
///
/// Validated once via [`EngineConfig::validate`] before any spin runs; after
/// that the engine treats every lookup as total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Game name
    pub name: String,
    /// Grid dimensions
    pub grid: GridSpec,
    /// Minimum connected cells for a paying cluster
    pub min_cluster_size: usize,
    /// Multiplier value placed by an exploding cell
    pub explosion_multiplier: u32,
    /// Hard per-cascade win ceiling, as a bet multiple
    pub max_win_multiplier: f64,
    /// Cascade loop safety bound per spin
    pub max_cascades: u32,
    /// Scatters required for the Shooter bonus
    pub shooter_scatters: usize,
    /// Scatters required for the Boss Battle bonus
    pub boss_battle_scatters: usize,
    /// Scatters required for the Free Spins bonus
    pub free_spins_scatters: usize,
    /// Spins awarded when Free Spins triggers
    pub free_spins_count: u32,
    /// Fraction of cells seeded Infected when Free Spins starts
    pub pre_infected_chance: f64,
    /// Default bet amount
    pub default_bet: f64,
    /// Available bet levels
    pub bet_levels: Vec<f64>,
    /// Payout per symbol in a cluster
    pub payouts: PayoutTable,
    /// Base-game draw weights
    pub base_weights: SymbolWeights,
    /// Free-spins draw weights
    pub free_spins_weights: SymbolWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "Pocket Rehab: Toxic Shock".into(),
            grid: GridSpec::default(),
            min_cluster_size: 8,
            explosion_multiplier: 2,
            max_win_multiplier: 50_000.0,
            max_cascades: 20,
            shooter_scatters: 3,
            boss_battle_scatters: 4,
            free_spins_scatters: 5,
            free_spins_count: 10,
            pre_infected_chance: 0.3,
            default_bet: 10.0,
            bet_levels: vec![1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0],
            payouts: PayoutTable::reference(),
            base_weights: SymbolWeights::base(),
            free_spins_weights: SymbolWeights::free_spins(),
        }
    }
}

impl EngineConfig {
    /// Validate the whole configuration; called once at engine construction
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.cols == 0 || self.grid.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                cols: self.grid.cols,
                rows: self.grid.rows,
            });
        }
        if self.min_cluster_size < 2 {
            return Err(ConfigError::ClusterSizeTooSmall);
        }
        if self.min_cluster_size > self.grid.total_positions() {
            return Err(ConfigError::ClusterSizeTooLarge {
                min: self.min_cluster_size,
                capacity: self.grid.total_positions(),
            });
        }
        if self.max_cascades == 0 {
            return Err(ConfigError::ZeroCascadeCeiling);
        }
        if self.explosion_multiplier < 2 {
            return Err(ConfigError::ExplosionMultiplierTooSmall);
        }
        if !(0.0..=1.0).contains(&self.pre_infected_chance) {
            return Err(ConfigError::InvalidPreInfectedChance);
        }
        if !(self.shooter_scatters <= self.boss_battle_scatters
            && self.boss_battle_scatters <= self.free_spins_scatters)
        {
            return Err(ConfigError::ScatterThresholdOrder);
        }
        for table in [&self.base_weights, &self.free_spins_weights] {
            if table.is_empty() {
                return Err(ConfigError::WeightTable("empty weight table".into()));
            }
            for &(kind, weight) in &table.entries {
                if weight == 0 {
                    return Err(ConfigError::ZeroWeight { kind });
                }
                // Every drawable paying kind must price out
                if kind.is_paying() && self.payouts.get(kind) <= 0.0 {
                    return Err(ConfigError::MissingPayout { kind });
                }
            }
        }
        for (kind, payout) in self.payouts.iter() {
            if payout <= 0.0 {
                return Err(ConfigError::InvalidPayout { kind });
            }
        }
        Ok(())
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Import from JSON, validating before returning
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Import from a YAML document, validating before returning
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Export as YAML
    pub fn to_yaml(&self) -> String {
        serde_yml::to_string(self).unwrap_or_default()
    }
}
