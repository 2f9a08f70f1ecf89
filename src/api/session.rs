use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::feed::{FeedCursor, GestureClassifier};

/// One client's pass through the feed: the cursor plus the drag in progress.
pub struct DiscoverSession {
    pub cursor: FeedCursor,
    pub gesture: GestureClassifier,
    last_used: Instant,
}

impl DiscoverSession {
    pub fn new(cursor: FeedCursor, gesture: GestureClassifier) -> Self {
        Self {
            cursor,
            gesture,
            last_used: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_used = Instant::now();
    }
}

pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<DiscoverSession>>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn insert(&self, session: DiscoverSession) -> (Uuid, Arc<Mutex<DiscoverSession>>) {
        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(session));
        let mut sessions = self.sessions.write().await;
        sessions.insert(id, handle.clone());
        debug!(session = %id, "discover session created");
        (id, handle)
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<Mutex<DiscoverSession>>> {
        let sessions = self.sessions.read().await;
        sessions.get(id).cloned()
    }

    /// Lock a session for one request and mark it used. Returns `None` if
    /// the reaper dropped it while we waited for the lock; once we hold the
    /// lock the reaper leaves it alone.
    pub async fn acquire(&self, id: &Uuid) -> Option<OwnedMutexGuard<DiscoverSession>> {
        let handle = self.get(id).await?;
        let mut session = handle.lock_owned().await;
        if !self.sessions.read().await.contains_key(id) {
            debug!(session = %id, "discover session dropped while waiting");
            return None;
        }
        session.touch();
        Some(session)
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id).is_some()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions idle for at least the TTL. A session that is locked is
    /// in use and is kept.
    pub async fn reap(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(s) => s.last_used.elapsed() < self.ttl,
            Err(_) => true,
        });
        before - sessions.len()
    }

    pub fn start_reaper(self: Arc<Self>) {
        let period = (self.ttl / 4).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let reaped = self.reap().await;
                if reaped > 0 {
                    info!(
                        "Dropped {} idle discover sessions, {} left",
                        reaped,
                        self.count().await
                    );
                }
            }
        });
    }
}
