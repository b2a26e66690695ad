/// Shared application state
use crate::config::AuthSettings;
use crate::services::AuthService;
use axum_extra::extract::cookie::{Cookie, SameSite};
use estate_storage::Database;
use std::sync::Arc;

/// How the session cookie is issued and cleared
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub name: String,
    pub secure: bool,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, secure: bool) -> Self {
        Self {
            name: name.into(),
            secure,
        }
    }

    /// HTTP-only cookie carrying `token`
    pub fn issue(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), token))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .build()
    }

    /// Cookie that, removed from the jar, clears the session in the browser
    pub fn removal(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), "")).path("/").build()
    }
}

impl From<&AuthSettings> for SessionCookie {
    fn from(settings: &AuthSettings) -> Self {
        Self::new(settings.cookie_name.clone(), settings.secure_cookie)
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth_service: Arc<AuthService>,
    pub session_cookie: Arc<SessionCookie>,
    /// `None` when admin sign-in is disabled
    pub admin_passcode: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        auth_service: Arc<AuthService>,
        session_cookie: SessionCookie,
    ) -> Self {
        Self {
            db,
            auth_service,
            session_cookie: Arc::new(session_cookie),
            admin_passcode: None,
        }
    }

    /// Enable admin sign-in with `passcode`. An empty passcode keeps it off.
    pub fn with_admin_passcode(mut self, passcode: impl Into<String>) -> Self {
        let passcode = passcode.into();
        self.admin_passcode = (!passcode.is_empty()).then(|| Arc::from(passcode));
        self
    }
}
