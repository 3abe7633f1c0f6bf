// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session state holders.
//!
//! Each signed-in uid has one long-lived [`SessionManager`]. Auth-state
//! changes (sign-in, sign-out, profile edits) are its only writer; the
//! navigation guard and the session endpoint read what it published.

use crate::models::{Identity, SessionState};
use crate::services::role_resolver::RoleResolver;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Owns the process-local [`SessionState`].
pub struct SessionManager {
    resolver: RoleResolver,
    state: watch::Sender<SessionState>,
}

impl SessionManager {
    pub fn new(resolver: RoleResolver) -> Self {
        let (state, _) = watch::channel(SessionState::initial());
        Self { resolver, state }
    }

    /// Receive every published session state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Handle an auth-state change reported by the identity provider.
    ///
    /// Re-enters loading and re-runs role resolution for a signed-in
    /// identity. Returns the state that was published last.
    pub async fn on_auth_state_changed(&self, identity: Option<Identity>) -> SessionState {
        let next = match identity {
            Some(identity) => {
                self.state.send_replace(SessionState::resolving(identity.clone()));
                let assignment = self.resolver.resolve(&identity).await;
                SessionState::resolved(identity, assignment)
            }
            None => SessionState::signed_out(),
        };

        tracing::debug!(
            authenticated = next.is_authenticated(),
            role = ?next.role,
            status = ?next.status,
            "Session state updated"
        );

        self.state.send_replace(next.clone());
        next
    }
}

/// Session managers keyed by uid.
pub struct SessionRegistry {
    resolver: RoleResolver,
    sessions: DashMap<String, Arc<SessionManager>>,
}

impl SessionRegistry {
    pub fn new(resolver: RoleResolver) -> Self {
        Self {
            resolver,
            sessions: DashMap::new(),
        }
    }

    fn manager(&self, uid: &str) -> Arc<SessionManager> {
        self.sessions
            .entry(uid.to_string())
            .or_insert_with(|| Arc::new(SessionManager::new(self.resolver.clone())))
            .clone()
    }

    /// Run resolution to completion even if the calling request goes away,
    /// so the published state never stays loading.
    async fn publish(manager: Arc<SessionManager>, identity: Identity) -> SessionState {
        let task = tokio::spawn({
            let manager = manager.clone();
            async move { manager.on_auth_state_changed(Some(identity)).await }
        });
        match task.await {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(error = %e, "Session resolution task failed");
                manager.current()
            }
        }
    }

    /// A fresh sign-in: re-resolve the role and publish it.
    pub async fn sign_in(&self, identity: Identity) -> SessionState {
        let manager = self.manager(&identity.uid);
        Self::publish(manager, identity).await
    }

    /// Latest published state, which may still be loading.
    ///
    /// Resolves first if this process has not seen the identity yet.
    pub async fn current_or_resolve(&self, identity: &Identity) -> SessionState {
        let manager = self.manager(&identity.uid);
        let current = manager.current();
        if current.is_authenticated() {
            return current;
        }
        Self::publish(manager, identity.clone()).await
    }

    /// Published state once any in-flight resolution has finished.
    pub async fn settled(&self, identity: &Identity) -> SessionState {
        let manager = self.manager(&identity.uid);
        if !manager.current().is_authenticated() {
            return Self::publish(manager, identity.clone()).await;
        }

        let mut updates = manager.subscribe();
        let settled = updates.wait_for(|state| !state.loading).await.map(|state| state.clone());
        settled.unwrap_or_else(|_| manager.current())
    }

    /// Re-resolve a signed-in uid after its profile changed.
    ///
    /// Returns `None` if the uid has no session in this process.
    pub async fn refresh(&self, uid: &str) -> Option<SessionState> {
        let manager = self.sessions.get(uid).map(|entry| entry.value().clone())?;
        let identity = manager.current().identity?;
        Some(Self::publish(manager, identity).await)
    }

    /// Publish the signed-out state and drop the uid's session.
    pub async fn sign_out(&self, uid: &str) -> bool {
        let Some((_, manager)) = self.sessions.remove(uid) else {
            return false;
        };
        manager.on_auth_state_changed(None).await;
        true
    }
}
