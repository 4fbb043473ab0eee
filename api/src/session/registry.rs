//! Session lookup keyed by the `qna_session` cookie.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{HeaderMap, header};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::session::state::{SessionState, SessionView};

pub const SESSION_COOKIE: &str = "qna_session";

/// Sessions untouched for this long are dropped on the next insert.
const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

pub type SharedSession = Arc<Mutex<SessionState>>;

struct Entry {
    session: SharedSession,
    last_seen: Instant,
}

/// In-memory sessions; nothing is persisted across restarts.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl: DEFAULT_IDLE_TTL,
        }
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(mut self, idle_ttl: Duration) -> Self {
        self.idle_ttl = idle_ttl;
        self
    }

    /// Returns the caller's existing session, if any. Never creates one.
    pub async fn lookup(&self, headers: &HeaderMap) -> Option<(Uuid, SharedSession)> {
        let id = session_id(headers)?;
        let mut map = self.sessions.write().await;
        let entry = map.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some((id, entry.session.clone()))
    }

    /// Snapshot of the caller's session, or of a fresh idle one when the
    /// caller has none yet.
    pub async fn view(&self, headers: &HeaderMap) -> SessionView {
        match self.lookup(headers).await {
            Some((_, shared)) => shared.lock().await.view(),
            None => SessionState::default().view(),
        }
    }

    /// Returns the caller's session, creating one when the cookie is absent
    /// or malformed. A well-formed but unknown id (e.g. after a restart) gets
    /// a fresh session under the same id.
    pub async fn resolve(&self, headers: &HeaderMap) -> (Uuid, SharedSession) {
        let id = session_id(headers).unwrap_or_else(Uuid::new_v4);
        let now = Instant::now();

        let mut map = self.sessions.write().await;
        if let Some(entry) = map.get_mut(&id) {
            entry.last_seen = now;
            return (id, entry.session.clone());
        }

        let before = map.len();
        // Sessions held by an in-flight request are never swept.
        map.retain(|_, e| {
            now.duration_since(e.last_seen) < self.idle_ttl || Arc::strong_count(&e.session) > 1
        });
        if map.len() < before {
            debug!(swept = before - map.len(), "idle sessions dropped");
        }

        let session = SharedSession::default();
        map.insert(
            id,
            Entry {
                session: session.clone(),
                last_seen: now,
            },
        );
        (id, session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Reads the session id from the `Cookie` header(s).
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value binding the client to `id`.
pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::Phase;
    use axum::http::HeaderValue;

    #[test]
    fn finds_cookie_among_others() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={id}; x=1")).unwrap(),
        );
        assert_eq!(session_id(&headers), Some(id));
    }

    #[test]
    fn malformed_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("qna_session=not-a-uuid"),
        );
        assert_eq!(session_id(&headers), None);
    }

    #[tokio::test]
    async fn same_cookie_resolves_same_session() {
        let registry = SessionRegistry::new();
        let (id, first) = registry.resolve(&HeaderMap::new()).await;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{SESSION_COOKIE}={id}")).unwrap(),
        );
        let (again, second) = registry.resolve(&headers).await;

        assert_eq!(id, again);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn lookup_never_creates_sessions() {
        let registry = SessionRegistry::new();
        assert!(registry.lookup(&HeaderMap::new()).await.is_none());
        assert_eq!(registry.view(&HeaderMap::new()).await.phase, Phase::Idle);

        let mut unknown = HeaderMap::new();
        unknown.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{SESSION_COOKIE}={}", Uuid::new_v4())).unwrap(),
        );
        assert!(registry.lookup(&unknown).await.is_none());
        assert_eq!(registry.len().await, 0);

        let (id, first) = registry.resolve(&unknown).await;
        let (found, second) = registry.lookup(&unknown).await.unwrap();
        assert_eq!(id, found);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn idle_sessions_are_swept_on_insert() {
        let registry = SessionRegistry::new().with_idle_ttl(Duration::ZERO);

        let (_, held) = registry.resolve(&HeaderMap::new()).await;
        drop(registry.resolve(&HeaderMap::new()).await);
        assert_eq!(registry.len().await, 2);

        // The unheld idle session goes; the held one stays.
        let _ = registry.resolve(&HeaderMap::new()).await;
        assert_eq!(registry.len().await, 2);
        drop(held);
    }

    #[tokio::test]
    async fn active_sessions_survive_the_sweep() {
        let registry = SessionRegistry::new();
        for _ in 0..10 {
            let _ = registry.resolve(&HeaderMap::new()).await;
        }
        assert_eq!(registry.len().await, 10);
    }
}
