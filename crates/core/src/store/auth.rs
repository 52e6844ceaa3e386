//! Signed-in user state.

use crate::api::TerraceApi;
use crate::http::HttpClient;
use terrace_types::User;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    /// `/auth/me` has not been asked yet.
    #[default]
    NotFetched,
    Loading,
    SignedIn(User),
    SignedOut,
}

/// What a page that needs a user should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthGate<'a> {
    /// Still finding out; render nothing.
    Pending,
    /// Show the "not authenticated" panel.
    Denied,
    Allowed(&'a User),
}

#[derive(Debug, Default)]
pub struct AuthStore {
    state: AuthState,
}

impl AuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Asks the API who is signed in. Failures of any kind leave the store signed out.
    pub async fn refresh<C: HttpClient>(&mut self, api: &TerraceApi<C>) {
        self.state = AuthState::Loading;
        self.state = match api.fetch_me().await {
            Ok(Some(user)) => {
                tracing::debug!("signed in as {}", user.id);
                AuthState::SignedIn(user)
            }
            Ok(None) => AuthState::SignedOut,
            Err(e) => {
                tracing::warn!("could not fetch current user: {}", e);
                AuthState::SignedOut
            }
        };
    }

    pub fn set_user(&mut self, user: Option<User>) {
        self.state = match user {
            Some(user) => AuthState::SignedIn(user),
            None => AuthState::SignedOut,
        };
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            AuthState::SignedIn(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, AuthState::Loading)
    }

    pub fn gate(&self) -> AuthGate<'_> {
        match &self.state {
            AuthState::SignedIn(user) => AuthGate::Allowed(user),
            AuthState::SignedOut => AuthGate::Denied,
            AuthState::NotFetched | AuthState::Loading => AuthGate::Pending,
        }
    }
}
