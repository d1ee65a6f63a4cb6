//! Per-game mutual exclusion.

use std::collections::HashMap;
use std::sync::Arc;

use histime_protocol::GameId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per game id, created on first use and dropped by
/// [`release`](Self::release) once idle.
///
/// Operations on different games never wait on each other; operations on
/// the same game run one at a time in arrival order (tokio's mutex is
/// fair).
#[derive(Default)]
pub struct GameLocks {
    locks: Mutex<HashMap<GameId, Arc<Mutex<()>>>>,
}

/// Held while a game is being read-modified-written. Released on drop.
pub struct GameGuard {
    _guard: OwnedMutexGuard<()>,
}

impl GameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `id`.
    pub async fn acquire(&self, id: GameId) -> GameGuard {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(id).or_default())
        };
        GameGuard {
            _guard: lock.lock_owned().await,
        }
    }

    /// Drops the mutex for `id` if nobody holds or waits on it.
    /// Returns `true` if it was removed.
    pub async fn release(&self, id: GameId) -> bool {
        let mut locks = self.locks.lock().await;
        // The map's own reference is the only one left.
        let idle = locks.get(&id).is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            locks.remove(&id);
        }
        idle
    }

    /// Number of games with a live mutex.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_acquire_same_game_serializes() {
        let locks = Arc::new(GameLocks::new());
        let id = GameId::new();
        let guard = locks.acquire(id).await;

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(id).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_acquire_different_games_independent() {
        let locks = GameLocks::new();
        let _a = locks.acquire(GameId::new()).await;
        let _b = tokio::time::timeout(Duration::from_millis(100), locks.acquire(GameId::new()))
            .await
            .expect("second game should not block");
    }

    #[tokio::test]
    async fn test_release_skips_held_lock() {
        let locks = GameLocks::new();
        let id = GameId::new();
        let guard = locks.acquire(id).await;
        assert!(!locks.release(id).await);
        drop(guard);
        assert!(locks.release(id).await);
        assert!(locks.is_empty().await);
    }
}
