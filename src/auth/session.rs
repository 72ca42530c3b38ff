// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! Auth session handling.
//!
//! The editor itself only needs to know who is signed in, if anyone; the
//! actual identity provider is an external collaborator. [`SessionProvider`]
//! is that collaborator's contract: a nullable current session plus a
//! subscription delivering every change. [`LocalSessionProvider`] is the
//! in-process implementation used by the desktop build.

use std::sync::Mutex;

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
}

/// Callback invoked with the new session (or `None`) on every change.
pub type SessionHandler = Box<dyn Fn(Option<&Session>) + Send>;

pub trait SessionProvider: Send + Sync {
    /// The current session, or `None` when signed out.
    fn current_session(&self) -> Option<Session>;

    /// Register a handler for session changes.
    fn subscribe(&self, handler: SessionHandler);
}

#[derive(Default)]
struct ProviderState {
    session: Option<Session>,
    subscribers: Vec<SessionHandler>,
}

/// Session provider holding the session in process memory.
#[derive(Default)]
pub struct LocalSessionProvider {
    state: Mutex<ProviderState>,
}

impl LocalSessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider seeded from `MEMESTUDIO_USER` / `MEMESTUDIO_USER_EMAIL`,
    /// signed out when unset.
    pub fn from_env() -> Self {
        let provider = Self::new();
        if let Ok(user_id) = std::env::var("MEMESTUDIO_USER") {
            provider.set_session(Some(Session {
                user_id,
                email: std::env::var("MEMESTUDIO_USER_EMAIL").ok(),
            }));
        }
        provider
    }

    /// Replace the session and notify all subscribers.
    pub fn set_session(&self, session: Option<Session>) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        match &session {
            Some(session) => log::info!("Session changed: signed in as {}", session.user_id),
            None => log::info!("Session changed: signed out"),
        }
        state.session = session;
        let current = state.session.clone();
        for handler in &state.subscribers {
            handler(current.as_ref());
        }
    }
}

impl SessionProvider for LocalSessionProvider {
    fn current_session(&self) -> Option<Session> {
        match self.state.lock() {
            Ok(state) => state.session.clone(),
            Err(poisoned) => poisoned.into_inner().session.clone(),
        }
    }

    fn subscribe(&self, handler: SessionHandler) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.subscribers.push(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::{LocalSessionProvider, Session, SessionProvider};
    use std::sync::{Arc, Mutex};

    #[test]
    fn starts_signed_out() {
        let provider = LocalSessionProvider::new();
        assert_eq!(provider.current_session(), None);
    }

    #[test]
    fn set_session_updates_current_session() {
        let provider = LocalSessionProvider::new();
        provider.set_session(Some(Session {
            user_id: "u-1".to_string(),
            email: Some("u1@example.com".to_string()),
        }));

        let session = provider.current_session().expect("signed in");
        assert_eq!(session.user_id, "u-1");
    }

    #[test]
    fn subscribers_see_every_change() {
        let provider = LocalSessionProvider::new();
        let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        provider.subscribe(Box::new(move |session| {
            sink.lock()
                .unwrap()
                .push(session.map(|s| s.user_id.clone()));
        }));

        provider.set_session(Some(Session {
            user_id: "u-2".to_string(),
            email: None,
        }));
        provider.set_session(None);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some("u-2".to_string()), None]
        );
    }
}
