//! # pr-engine — Cluster-Pays Cascade Engine
//!
//! Deterministic payout core for *Pocket Rehab: Toxic Shock*: cluster
//! detection, the Overdose Cycle, cascade/refill, and win calculation,
//! iterated per spin until the grid is stable.
//!
//! ## Features
//!
//! - **Cluster pays**: 4-connected flood fill with Wild substitution
//! - **Overdose Cycle**: per-cell Infected → Mutated → Exploded progression
//!   leaving permanent grid multipliers behind
//! - **Cascades**: stable gravity compaction and weighted refill
//! - **Bonuses**: Shooter, Boss Battle, and Free Spins with sticky
//!   multipliers and the Doctor reset
//! - **Phase stepping**: callers drive the spin one phase at a time, or run
//!   it to settlement in one call
//!
//! ## Architecture
//!
//! ```text
//! GameEngine (one per session)
//!     │
//!     ├── EngineConfig (grid spec, paytable, weight tables)
//!     ├── SymbolSampler (weighted draws)
//!     └── spin loop
//!           Evaluating ── find_clusters
//!           Paying ────── calculate_win (× grid multipliers)
//!           Evolving ──── process_clusters (Overdose Cycle)
//!           Cascading ─── remove / gravity / refill
//!           Settled ───── bonus triggers, free-spin bookkeeping
//!                │
//!                v
//!           SpinResult
//! ```
//!
//! The engine is single-threaded and synchronous; every draw flows through
//! one seedable RNG, so a fixed seed replays a spin exactly. Host several
//! players through [`session::SessionRegistry`], one engine each.

pub mod bonus;
pub mod cascade;
pub mod cluster;
pub mod config;
pub mod engine;
pub mod grid;
pub mod overdose;
pub mod session;
pub mod spin;
pub mod symbols;
pub mod win;

pub use bonus::*;
pub use cascade::*;
pub use cluster::*;
pub use config::*;
pub use engine::*;
pub use grid::*;
pub use overdose::*;
pub use session::*;
pub use spin::*;
pub use symbols::*;
pub use win::*;
