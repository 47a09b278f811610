//! Bearer-token session registry.
//!
//! A session maps an opaque token to the user resolved from the backend
//! profile. Refreshing a session swaps the whole user value, so the next
//! request sees the new role and grants without any cached decision.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use actix_web::dev::ServiceRequest;
use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::http::security::audit::{AuditLogger, SecurityEvent};
use crate::http::security::config::Authenticator;
use crate::http::security::user::{ProfileError, User, UserProfile};

const TOKEN_LENGTH: usize = 32;
const BEARER_PREFIX: &str = "Bearer ";

/// In-memory token store. Clones share the same sessions.
///
/// # Example
/// ```
/// use lisadocs_core::http::security::session::SessionRegistry;
/// use lisadocs_core::http::security::{Role, User};
///
/// let registry = SessionRegistry::new();
/// let token = registry.open(User::new("1", Role::Presidente));
///
/// assert_eq!(registry.get(&token).map(|u| u.get_role()), Some(Role::Presidente));
/// registry.close(&token);
/// assert!(registry.get(&token).is_none());
/// ```
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, User>>>,
    audit: Option<AuditLogger>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Opens a session under a fresh random token.
    pub fn open(&self, user: User) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();
        self.open_with_token(token.clone(), user);
        token
    }

    /// Opens a session under a caller-chosen token, replacing any previous one.
    pub fn open_with_token(&self, token: impl Into<String>, user: User) {
        tracing::debug!(user = %user, "session opened");
        self.log(SecurityEvent::session_opened(user.get_id(), user.get_role()));
        self.write().insert(token.into(), user);
    }

    /// Resolves a backend profile and opens a session for it.
    ///
    /// Profiles with an unknown role never get a session.
    pub fn open_profile(&self, profile: UserProfile) -> Result<String, ProfileError> {
        match User::from_profile(profile) {
            Ok(user) => Ok(self.open(user)),
            Err(err) => {
                tracing::warn!(error = %err, "profile rejected, no session opened");
                Err(err)
            }
        }
    }

    /// Applies a re-fetched profile to an existing session.
    ///
    /// Only the grants may change: a profile naming another id or role closes
    /// the session, so the new identity needs a fresh login. Returns false
    /// when nothing was refreshed.
    pub fn refresh(&self, token: &str, user: User) -> bool {
        let mut sessions = self.write();
        let Some(current) = sessions.get_mut(token) else {
            return false;
        };

        if current.get_id() != user.get_id() || current.get_role() != user.get_role() {
            tracing::warn!(from = %current, to = %user, "refreshed profile changes identity, session closed");
            let closed = current.get_id().to_string();
            sessions.remove(token);
            self.log(SecurityEvent::session_closed(&closed));
            return false;
        }

        tracing::debug!(user = %current, "session refreshed");
        self.log(SecurityEvent::session_refreshed(user.get_id(), user.get_role()));
        *current = user;
        true
    }

    pub fn close(&self, token: &str) -> Option<User> {
        let removed = self.write().remove(token);
        if let Some(ref user) = removed {
            tracing::debug!(user = %user, "session closed");
            self.log(SecurityEvent::session_closed(user.get_id()));
        }
        removed
    }

    pub fn get(&self, token: &str) -> Option<User> {
        self.read().get(token).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn log(&self, event: SecurityEvent) {
        if let Some(ref logger) = self.audit {
            logger.log(event);
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, User>> {
        self.sessions.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, User>> {
        self.sessions.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl Authenticator for SessionRegistry {
    fn get_user(&self, req: &ServiceRequest) -> Option<User> {
        let token = bearer_token(req.headers())?;
        let user = self.get(token);
        if user.is_none() {
            tracing::debug!(path = req.path(), "bearer token has no session");
        }
        user
    }
}
