use chrono::{DateTime, Utc};
use tracing::info;

use super::session::Session;
use super::store::SessionStore;

/// Outcome of guarding a protected command.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Granted(Session),
    /// No session, or it expired. The user must log in again.
    Login,
    /// Logged in, but the role is not allowed here.
    Home,
}

pub struct RouteGuard<'a> {
    store: &'a SessionStore,
}

impl<'a> RouteGuard<'a> {
    pub fn new(store: &'a SessionStore) -> Self {
        Self { store }
    }

    /// Check the stored session against `allowed_roles` (empty = any role).
    pub fn check(&self, allowed_roles: &[&str]) -> anyhow::Result<Access> {
        self.check_at(allowed_roles, Utc::now())
    }

    pub fn check_at(&self, allowed_roles: &[&str], now: DateTime<Utc>) -> anyhow::Result<Access> {
        let Some(session) = self.store.load()? else {
            return Ok(Access::Login);
        };

        if session.is_expired_at(now) {
            info!("Session for {} expired, logging out", session.user().username);
            self.store.clear()?;
            return Ok(Access::Login);
        }

        if !allowed_roles.is_empty() && !allowed_roles.contains(&session.role()) {
            return Ok(Access::Home);
        }

        Ok(Access::Granted(session))
    }
}
