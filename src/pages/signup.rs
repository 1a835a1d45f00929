//! Account signup and login pages.

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::forms::{LoginForm, SignupForm};
use crate::models::AuthResponse;
use crate::session::{Session, SessionStore};

const SIGNUP_FAILED: &str = "Signup failed. Try again.";
const LOGIN_FAILED: &str = "Login failed. Check your email and password.";

pub struct SignupPage {
    api: ApiClient,
    pub form: SignupForm,
    error: Option<String>,
}

impl SignupPage {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            form: SignupForm::create(Default::default()),
            error: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit the form; on success the returned token becomes the session.
    ///
    /// Returns `None` when the form is invalid (see the form's errors) or
    /// the request failed (see [`SignupPage::error`]).
    pub async fn submit(&mut self, sessions: &SessionStore) -> Option<Session> {
        let request = self.form.submit(|request| request)?;
        let result = self.api.signup(&request).await;
        self.error = None;
        match start_session(sessions, result) {
            Ok(session) => {
                tracing::info!(user_id = session.user_id, "Signed up");
                Some(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Signup failed");
                self.error = Some(failure_message(&e, SIGNUP_FAILED));
                None
            }
        }
    }
}

/// Email/password login against `POST /auth/login`.
pub struct LoginPage {
    api: ApiClient,
    pub form: LoginForm,
    error: Option<String>,
}

impl LoginPage {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            form: LoginForm::create(Default::default()),
            error: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Same contract as [`SignupPage::submit`].
    pub async fn submit(&mut self, sessions: &SessionStore) -> Option<Session> {
        let request = self.form.submit(|request| request)?;
        let result = self.api.login(&request).await;
        self.error = None;
        match start_session(sessions, result) {
            Ok(session) => {
                tracing::info!(user_id = session.user_id, "Logged in");
                Some(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                self.error = Some(failure_message(&e, LOGIN_FAILED));
                None
            }
        }
    }
}

fn start_session(sessions: &SessionStore, response: Result<AuthResponse>) -> Result<Session> {
    sessions.login(&response?.token)
}

fn failure_message(error: &ClientError, fallback: &str) -> String {
    error
        .server_message()
        .map_or_else(|| fallback.to_string(), str::to_string)
}
