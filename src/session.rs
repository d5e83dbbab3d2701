//! Lookup sessions: the state of one search screen.
//!
//! A session holds the selected language and region, the current search
//! text and the outcome of the latest lookup. Every lookup gets a
//! generation ticket; a result is applied only if its ticket is still the
//! newest, so a slow earlier answer never overwrites a later one.
//!
//! Sessions live in memory only. The registry is bounded; sessions are
//! removed explicitly, and sessions idle past the inactivity timeout are
//! evicted when a new one would not fit.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::lookup::{DrugQuery, DrugReport, Language, LookupError, Region};
use crate::texts::ui_texts;

/// Upper bound on concurrently held sessions.
pub const MAX_SESSIONS: usize = 1024;

/// Default inactivity timeout: 15 minutes.
pub const DEFAULT_SESSION_IDLE_SECS: i64 = 900;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(Uuid),

    #[error("Session limit reached ({0})")]
    Full(usize),

    #[error("Session registry lock poisoned")]
    LockPoisoned,
}

/// Outcome of the latest lookup of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LookupState {
    Idle,
    Loading { generation: u64 },
    Success { report: DrugReport },
    /// `message` is the localized generic error text, never the cause.
    Failed { message: String },
}

/// Issued by [`LookupSession::begin`]; hand it back to
/// [`LookupSession::complete`] together with the lookup result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub session_id: Uuid,
    pub generation: u64,
    pub query: DrugQuery,
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupSession {
    pub id: Uuid,
    pub language: Language,
    pub region: Region,
    pub direction: &'static str,
    pub search_text: String,
    #[serde(flatten)]
    pub state: LookupState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    generation: u64,
}

impl Default for LookupSession {
    fn default() -> Self {
        Self::new(Language::Ar, Region::Us)
    }
}

impl LookupSession {
    pub fn new(language: Language, region: Region) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            language,
            region,
            direction: language.direction(),
            search_text: String::new(),
            state: LookupState::Idle,
            created_at: now,
            updated_at: now,
            generation: 0,
        }
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.direction = language.direction();
        self.touch();
    }

    pub fn set_region(&mut self, region: Region) {
        self.region = region;
        self.touch();
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = text.to_string();
        self.touch();
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LookupState::Loading { .. })
    }

    /// The query [`begin`](Self::begin) would run, without starting it.
    pub fn effective_query(&self, query: Option<&str>) -> Option<DrugQuery> {
        query
            .and_then(|q| DrugQuery::normalize(q, self.language, self.region))
            .or_else(|| DrugQuery::normalize(&self.search_text, self.language, self.region))
    }

    /// Start a lookup for `query`, or for the current search text when no
    /// query is given. An explicit query also becomes the search text.
    ///
    /// Returns `None` (state untouched) when the effective query is empty.
    /// A new lookup supersedes any lookup still in flight.
    pub fn begin(&mut self, query: Option<&str>) -> Option<LookupTicket> {
        let explicit = query.and_then(|q| {
            DrugQuery::normalize(q, self.language, self.region).map(|normalized| (q, normalized))
        });
        let query = match explicit {
            Some((raw, normalized)) => {
                self.search_text = raw.to_string();
                normalized
            }
            None => DrugQuery::normalize(&self.search_text, self.language, self.region)?,
        };

        self.generation += 1;
        self.state = LookupState::Loading {
            generation: self.generation,
        };
        self.touch();

        Some(LookupTicket {
            session_id: self.id,
            generation: self.generation,
            query,
        })
    }

    /// Apply the result of the lookup started with `ticket`. Returns `false`
    /// and leaves the state alone when a newer lookup has begun since.
    pub fn complete(
        &mut self,
        ticket: &LookupTicket,
        result: Result<DrugReport, LookupError>,
    ) -> bool {
        if ticket.session_id != self.id || ticket.generation != self.generation {
            tracing::debug!(
                session_id = %self.id,
                stale = ticket.generation,
                current = self.generation,
                "Discarding superseded lookup result"
            );
            return false;
        }

        self.state = match result {
            Ok(report) => LookupState::Success { report },
            Err(e) => {
                tracing::warn!(session_id = %self.id, error = %e, "Drug lookup failed");
                LookupState::Failed {
                    message: ui_texts(ticket.query.language).error.to_string(),
                }
            }
        };
        self.touch();
        true
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// In-memory, bounded set of sessions keyed by id.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, LookupSession>>,
    capacity: usize,
    idle_timeout: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::with_capacity(MAX_SESSIONS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            capacity,
            idle_timeout: Duration::seconds(DEFAULT_SESSION_IDLE_SECS),
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Create a session. When the registry is full, sessions not updated
    /// within the idle timeout are evicted first.
    pub fn create(&self, language: Language, region: Region) -> Result<LookupSession, SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::LockPoisoned)?;
        if sessions.len() >= self.capacity {
            let cutoff = Utc::now() - self.idle_timeout;
            let before = sessions.len();
            sessions.retain(|_, s| s.updated_at > cutoff);
            if sessions.len() < before {
                tracing::info!(
                    evicted = before - sessions.len(),
                    remaining = sessions.len(),
                    "Evicted idle sessions"
                );
            }
        }
        if sessions.len() >= self.capacity {
            tracing::warn!(capacity = self.capacity, "Session registry full");
            return Err(SessionError::Full(self.capacity));
        }
        let session = LookupSession::new(language, region);
        sessions.insert(session.id, session.clone());
        tracing::debug!(session_id = %session.id, total = sessions.len(), "Session created");
        Ok(session)
    }

    /// Snapshot of a session.
    pub fn get(&self, id: &Uuid) -> Result<LookupSession, SessionError> {
        self.update(id, |session| session.clone())
    }

    /// Run `f` on a session under the registry lock. `f` must not block.
    pub fn update<R>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut LookupSession) -> R,
    ) -> Result<R, SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::LockPoisoned)?;
        let session = sessions.get_mut(id).ok_or(SessionError::NotFound(*id))?;
        Ok(f(session))
    }

    pub fn remove(&self, id: &Uuid) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::LockPoisoned)?;
        sessions
            .remove(id)
            .map(|_| ())
            .ok_or(SessionError::NotFound(*id))
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
