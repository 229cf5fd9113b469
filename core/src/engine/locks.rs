// cartflow/src/engine/locks.rs

//! Per-session serialization of engine operations.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

use crate::model::SessionId;

#[derive(Debug)]
struct SessionEntry {
  lock: Arc<AsyncMutex<()>>,
  /// Operations holding or waiting on `lock`.
  holders: usize,
}

type LockTable = Arc<Mutex<HashMap<SessionId, SessionEntry>>>;

/// One async mutex per session with an operation in flight.
///
/// Operations on the same session queue behind each other; different sessions
/// never contend. An entry lives only while some operation holds or waits on it,
/// including a waiter that is dropped before it gets the lock.
#[derive(Debug, Default, Clone)]
pub struct SessionLocks {
  table: LockTable,
}

/// A counted interest in one session's entry, released on drop.
struct SessionClaim {
  session_id: SessionId,
  table: LockTable,
}

/// Held for the duration of one engine operation.
pub struct SessionGuard {
  // Field order is drop order: the mutex is released before the claim.
  _guard: OwnedMutexGuard<()>,
  _claim: SessionClaim,
}

impl SessionLocks {
  pub fn new() -> Self {
    Self::default()
  }

  /// Waits until no other operation holds `session_id`, then holds it.
  ///
  /// Cancelling the returned future while it waits leaves no entry behind.
  pub async fn acquire(&self, session_id: &SessionId) -> SessionGuard {
    let (lock, claim) = self.claim(session_id);

    let guard = lock.lock_owned().await;
    trace!(%session_id, "Session lock acquired.");

    SessionGuard {
      _guard: guard,
      _claim: claim,
    }
  }

  fn claim(&self, session_id: &SessionId) -> (Arc<AsyncMutex<()>>, SessionClaim) {
    let mut table = self.table.lock();
    let entry = table.entry(session_id.clone()).or_insert_with(|| SessionEntry {
      lock: Arc::new(AsyncMutex::new(())),
      holders: 0,
    });
    entry.holders += 1;

    let claim = SessionClaim {
      session_id: session_id.clone(),
      table: Arc::clone(&self.table),
    };
    (Arc::clone(&entry.lock), claim)
  }

  /// Number of sessions with an operation holding or waiting on their lock.
  pub fn active_sessions(&self) -> usize {
    self.table.lock().len()
  }
}

impl Drop for SessionClaim {
  fn drop(&mut self) {
    let mut table = self.table.lock();
    let Some(entry) = table.get_mut(&self.session_id) else {
      return;
    };
    entry.holders = entry.holders.saturating_sub(1);
    if entry.holders == 0 {
      table.remove(&self.session_id);
      trace!(session_id = %self.session_id, "Session lock released and pruned.");
    }
  }
}
