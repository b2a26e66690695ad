//! Action handlers: one network call each, resolved into a Session Store
//! transition (and sometimes a navigation).
//!
//! Every handler returns the outcome as a `Result`, but by the time it
//! returns the store has already reached a terminal state. Callers may
//! ignore the error; the view reads it back from `last_error`.

use crate::client::EstateClient;
use crate::error::{ClientError, Result};
use crate::navigation::{Navigator, Route};
use crate::profile::DraftProfile;
use crate::session::{MutationTicket, SessionStore};
use estate_core::{AdminSignInRequest, GoogleSignInRequest, Identity, SignUpRequest, UserId};
use tracing::{debug, info, warn};

/// Identity-mutating handlers bound to one client, store and navigator.
#[derive(Debug)]
pub struct SessionActions<N> {
    client: EstateClient,
    session: SessionStore,
    navigator: N,
}

impl<N: Navigator> SessionActions<N> {
    pub fn new(client: EstateClient, session: SessionStore, navigator: N) -> Self {
        Self {
            client,
            session,
            navigator,
        }
    }

    pub fn client(&self) -> &EstateClient {
        &self.client
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Push the draft to the server and adopt the identity it returns.
    ///
    /// Rejected locally, with no request, when signed out or when `id` is not
    /// the session's own id. The server enforces the same rule.
    pub async fn update_identity(&self, id: &UserId, draft: &DraftProfile) -> Result<Identity> {
        let current = self
            .session
            .current_identity()
            .ok_or(ClientError::Unauthenticated)?;
        if &current.id != id {
            return Err(ClientError::Unauthorized(
                "You can only update your own account!".to_string(),
            ));
        }

        let ticket = self.session.begin_mutation();

        match self
            .client
            .users()
            .update_user(id, &draft.to_update_request())
            .await
        {
            Ok(identity) if self.session.complete_mutation(ticket, identity.clone()) => {
                Ok(identity)
            }
            Ok(_) => {
                debug!(user_id = %id, "Profile update answered after a newer session change");
                Err(ClientError::Superseded)
            }
            Err(err) => {
                warn!(user_id = %id, error = %err, "Profile update failed");
                let _ = self.session.fail_mutation(ticket, err.to_string());
                Err(err)
            }
        }
    }

    /// Delete the session's own account, then send the user to sign-in.
    ///
    /// A transport failure still navigates to sign-in: the account may
    /// already be gone server-side, and an unreachable server must not leave
    /// the user on a page that needs it. This is deliberately fail-open.
    /// A server-reported failure stays on the page with the error shown.
    pub async fn delete_identity(&self, id: &UserId) -> Result<()> {
        let current = self
            .session
            .current_identity()
            .ok_or(ClientError::Unauthenticated)?;
        if &current.id != id {
            return Err(ClientError::Unauthorized(
                "You can only delete your own account!".to_string(),
            ));
        }

        let ticket = self.session.begin_mutation();

        match self.client.users().delete_user(id).await {
            Ok(()) => {
                self.session.clear_session();
                self.navigator.navigate(Route::SignIn);
                Ok(())
            }
            Err(err) if err.is_transport() => {
                warn!(user_id = %id, error = %err, "Account deletion unconfirmed, leaving the page anyway");
                let _ = self.session.fail_mutation(ticket, err.to_string());
                self.navigator.navigate(Route::SignIn);
                Err(err)
            }
            Err(err) => {
                warn!(user_id = %id, error = %err, "Account deletion refused");
                let _ = self.session.fail_mutation(ticket, err.to_string());
                Err(err)
            }
        }
    }

    /// Sign out. Whatever the server says, the session ends up cleared and
    /// the user on the sign-in page; the returned result only reports
    /// whether the server acknowledged.
    pub async fn sign_out(&self) -> Result<()> {
        let outcome = self.client.auth().sign_out().await;
        if let Err(err) = &outcome {
            warn!(error = %err, "Sign-out request failed, clearing the local session anyway");
        }

        self.session.clear_session();
        self.navigator.navigate(Route::SignIn);
        outcome
    }

    /// Sign in with email and password, then go home.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let ticket = self.session.begin_mutation();

        if email.trim().is_empty() || password.is_empty() {
            let err = ClientError::InvalidInput("Email and password are required".to_string());
            let _ = self.session.fail_mutation(ticket, err.to_string());
            return Err(err);
        }

        let outcome = self.client.auth().sign_in(email, password).await;
        self.finish_sign_in(ticket, outcome, Route::Home)
    }

    /// Sign in to the admin area, then open the dashboard.
    ///
    /// All three fields are checked locally first; a missing one fails the
    /// attempt without a request.
    pub async fn admin_sign_in(&self, request: &AdminSignInRequest) -> Result<Identity> {
        let ticket = self.session.begin_mutation();

        if !request.is_complete() {
            let err =
                ClientError::InvalidInput("All fields are required for admin login".to_string());
            let _ = self.session.fail_mutation(ticket, err.to_string());
            return Err(err);
        }

        let outcome = self.client.auth().admin_sign_in(request).await;
        if let Err(err) = &outcome {
            warn!(email = %request.email, error = %err, "Admin sign-in failed");
        }
        self.finish_sign_in(ticket, outcome, Route::AdminDashboard)
    }

    /// Sign in with a Google profile obtained from the identity provider.
    pub async fn google_sign_in(&self, profile: &GoogleSignInRequest) -> Result<Identity> {
        let ticket = self.session.begin_mutation();

        let outcome = self.client.auth().google(profile).await;
        if let Err(err) = &outcome {
            warn!(error = %err, "Google sign-in failed");
        }
        self.finish_sign_in(ticket, outcome, Route::Home)
    }

    /// Create an account and send the user to sign in with it.
    ///
    /// Registration does not touch the session.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<()> {
        if request.username.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(ClientError::InvalidInput(
                "All fields are required".to_string(),
            ));
        }

        self.client.auth().sign_up(request).await?;
        info!(username = %request.username, "Registered, redirecting to sign-in");
        self.navigator.navigate(Route::SignIn);
        Ok(())
    }

    /// Resolve a sign-in attempt. Navigates only when the store took the
    /// identity.
    fn finish_sign_in(
        &self,
        ticket: MutationTicket,
        outcome: Result<Identity>,
        destination: Route,
    ) -> Result<Identity> {
        match outcome {
            Ok(identity) if self.session.complete_mutation(ticket, identity.clone()) => {
                self.navigator.navigate(destination);
                Ok(identity)
            }
            Ok(identity) => {
                debug!(user_id = %identity.id, "Sign-in answered after a newer session change");
                Err(ClientError::Superseded)
            }
            Err(err) => {
                let _ = self.session.fail_mutation(ticket, err.to_string());
                Err(err)
            }
        }
    }
}
