//! Multi-session hosting — one isolated engine per player

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::config::{ConfigError, EngineConfig};
use crate::engine::GameEngine;

/// Shared handle to one session's engine
pub type SessionHandle = Arc<Mutex<GameEngine>>;

/// Registry of live game sessions keyed by session id
///
/// Each session owns its grid, balance, and multiplier state outright; the
/// registry only hands out handles. A spin must lock its session's engine, so
/// two spins can never interleave on one grid.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session, creating the engine on first use
    pub fn open(
        &self,
        session_id: &str,
        config: EngineConfig,
    ) -> Result<SessionHandle, ConfigError> {
        if let Some(existing) = self.get(session_id) {
            return Ok(existing);
        }
        let engine = GameEngine::new(config)?;
        let handle: SessionHandle = Arc::new(Mutex::new(engine));
        self.sessions
            .write()
            .insert(session_id.to_string(), Arc::clone(&handle));
        Ok(handle)
    }

    /// Look up an existing session
    pub fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions.read().get(session_id).cloned()
    }

    /// Close a session; true if it existed
    pub fn close(&self, session_id: &str) -> bool {
        self.sessions.write().remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_is_idempotent() {
        let registry = SessionRegistry::new();
        let a = registry.open("player-1", EngineConfig::default()).unwrap();
        let b = registry.open("player-1", EngineConfig::default()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new();
        let a = registry.open("player-1", EngineConfig::default()).unwrap();
        let b = registry.open("player-2", EngineConfig::default()).unwrap();

        a.lock().set_bet(50.0);
        a.lock().seed(1);
        a.lock().spin().unwrap();

        assert_eq!(b.lock().bet(), 10.0);
        assert_eq!(b.lock().stats().total_spins, 0);
        assert_eq!(a.lock().stats().total_spins, 1);
    }

    #[test]
    fn test_close_removes_session() {
        let registry = SessionRegistry::new();
        registry.open("player-1", EngineConfig::default()).unwrap();
        assert!(registry.close("player-1"));
        assert!(!registry.close("player-1"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let registry = SessionRegistry::new();
        let mut config = EngineConfig::default();
        config.max_cascades = 0;
        assert!(registry.open("player-1", config).is_err());
        assert!(registry.is_empty());
    }
}
