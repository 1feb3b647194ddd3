// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session state machine.
//!
//! A single actor task owns the [`AuthState`]. It reacts to sign-in state
//! changes from the [`AuthProvider`] and to explicit rechecks, and publishes
//! every transition on a `watch` channel.

use super::auth::{AuthProvider, AuthSession};
use crate::error::AppError;
use crate::models::AppUser;
use crate::repositories::UserRepository;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

const COMMAND_CHANNEL_CAPACITY: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Nothing evaluated yet.
    Loading,
    Unauthenticated,
    /// Signed in, but an administrator has not approved the account.
    NeedsApproval,
    Authenticated(AppUser),
}

enum SessionCommand {
    Recheck { reply: oneshot::Sender<AuthState> },
}

/// Handle to the session actor. Dropping it stops the actor.
pub struct SessionManager {
    commands: mpsc::Sender<SessionCommand>,
    state: watch::Receiver<AuthState>,
    task: JoinHandle<()>,
}

impl SessionManager {
    /// Start the actor. The first evaluation uses the provider's current
    /// session, so the state leaves `Loading` shortly after startup.
    pub fn spawn(
        provider: Arc<dyn AuthProvider>,
        users: UserRepository,
        force_token_refresh: bool,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(AuthState::Loading);
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);

        let actor = SessionActor {
            provider,
            users,
            force_token_refresh,
            state: state_tx,
        };
        let task = tokio::spawn(actor.run(commands_rx));

        Self {
            commands: commands_tx,
            state: state_rx,
            task,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.clone()
    }

    /// Re-evaluate approval for the signed-in user, e.g. after an admin
    /// approved the account. Returns the resulting state.
    pub async fn recheck(&self) -> AuthState {
        let (reply, response) = oneshot::channel();
        if self
            .commands
            .send(SessionCommand::Recheck { reply })
            .await
            .is_err()
        {
            return self.state();
        }
        response.await.unwrap_or_else(|_| self.state())
    }

    /// Wait until the state is something other than `Loading`.
    pub async fn settled(&self) -> AuthState {
        let mut rx = self.state.clone();
        let state = match rx.wait_for(|s| *s != AuthState::Loading).await {
            Ok(state) => (*state).clone(),
            Err(_) => self.state(),
        };
        state
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct SessionActor {
    provider: Arc<dyn AuthProvider>,
    users: UserRepository,
    force_token_refresh: bool,
    state: watch::Sender<AuthState>,
}

impl SessionActor {
    async fn run(self, mut commands: mpsc::Receiver<SessionCommand>) {
        let mut sessions = self.provider.subscribe();
        let initial = sessions.borrow_and_update().clone();
        self.on_session_change(initial).await;

        loop {
            tokio::select! {
                changed = sessions.changed() => {
                    if changed.is_err() {
                        tracing::debug!("Auth provider closed, stopping session actor");
                        break;
                    }
                    let session = sessions.borrow_and_update().clone();
                    self.on_session_change(session).await;
                }
                command = commands.recv() => match command {
                    Some(SessionCommand::Recheck { reply }) => {
                        let state = self.recheck().await;
                        let _ = reply.send(state);
                    }
                    None => break,
                }
            }
        }
    }

    fn publish(&self, next: AuthState) {
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            tracing::info!(from = state_name(current), to = state_name(&next), "Auth state changed");
            *current = next;
            true
        });
    }

    async fn on_session_change(&self, session: Option<AuthSession>) {
        let Some(session) = session else {
            self.publish(AuthState::Unauthenticated);
            return;
        };

        match self.reconcile(&session).await {
            Ok(next) => self.publish(next),
            Err(e) => {
                tracing::warn!(uid = %session.identity.uid, error = %e, "Failed to resolve user, signing out");
                self.provider.sign_out().await;
                self.publish(AuthState::Unauthenticated);
            }
        }
    }

    async fn recheck(&self) -> AuthState {
        let current = self.state.borrow().clone();
        if current == AuthState::Unauthenticated {
            return current;
        }
        let Some(session) = self.provider.current_session() else {
            return current;
        };

        match self.reconcile(&session).await {
            Ok(next) => {
                self.publish(next.clone());
                next
            }
            Err(e) => {
                tracing::warn!(uid = %session.identity.uid, error = %e, "Recheck failed, keeping state");
                current
            }
        }
    }

    async fn reconcile(&self, session: &AuthSession) -> Result<AuthState, AppError> {
        let identity = if self.force_token_refresh {
            self.provider.refresh_id_token(true).await?.identity
        } else {
            session.identity.clone()
        };

        let user = self.users.get_or_create(&identity).await?;
        Ok(if user.approved {
            AuthState::Authenticated(user)
        } else {
            AuthState::NeedsApproval
        })
    }
}

fn state_name(state: &AuthState) -> &'static str {
    match state {
        AuthState::Loading => "loading",
        AuthState::Unauthenticated => "unauthenticated",
        AuthState::NeedsApproval => "needs_approval",
        AuthState::Authenticated(_) => "authenticated",
    }
}
