//! Per-symbol mutual exclusion for concurrent workers in one process.

use crate::models::Symbol;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct SymbolLocks {
    locks: Mutex<HashMap<Symbol, Arc<AsyncMutex<()>>>>,
}

impl SymbolLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other evaluation of `symbol` is running, then hold the lease.
    pub async fn acquire(&self, symbol: &Symbol) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks
                .entry(symbol.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
