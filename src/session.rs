// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth session: a bearer token and the user id decoded from it.
//!
//! The token is never verified here; the backend does that. Decoding only
//! reads the payload segment to learn which user the token belongs to.

use std::sync::{Arc, RwLock};

use base64::{
    engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD},
    Engine as _,
};
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::storage::{keys, KeyValueStore};

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
}

impl Session {
    /// Build a session from a raw token, decoding its user id.
    pub fn from_token(token: &str) -> Result<Self> {
        let user_id = decode_user_id(token)?;
        Ok(Self {
            token: token.to_string(),
            user_id,
        })
    }
}

/// Extract `user_id` from the payload (middle) segment of a JWT-shaped token.
///
/// The payload may use the URL-safe or the standard base64 alphabet, with or
/// without padding. `user_id` may be a JSON number or a numeric string.
pub fn decode_user_id(token: &str) -> Result<i64> {
    let payload = token
        .trim()
        .split('.')
        .nth(1)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ClientError::InvalidToken("missing payload segment".to_string()))?;
    let payload = payload.trim_end_matches('=');

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|e| ClientError::InvalidToken(format!("payload is not base64: {}", e)))?;

    let claims: Value = serde_json::from_slice(&bytes)
        .map_err(|e| ClientError::InvalidToken(format!("payload is not JSON: {}", e)))?;

    match claims.get("user_id") {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| ClientError::InvalidToken(format!("user_id is not an integer: {}", n))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| ClientError::InvalidToken(format!("user_id is not numeric: {}", s))),
        Some(other) => Err(ClientError::InvalidToken(format!(
            "unexpected user_id: {}",
            other
        ))),
        None => Err(ClientError::InvalidToken("payload has no user_id".to_string())),
    }
}

/// Owns the persisted token and the current in-memory session.
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            current: RwLock::new(None),
        }
    }

    /// Restore the session from the persisted token.
    ///
    /// Missing or undecodable tokens yield no session; failures are logged,
    /// never returned.
    pub fn init(&self) -> Option<Session> {
        let token = match self.store.get_item(keys::TOKEN) {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.set_current(None);
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored token");
                self.set_current(None);
                return None;
            }
        };

        let session = match Session::from_token(&token) {
            Ok(session) => {
                tracing::debug!(user_id = session.user_id, "Restored session");
                Some(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Invalid token");
                None
            }
        };
        self.set_current(session.clone());
        session
    }

    /// Persist `token` and make it the current session.
    ///
    /// An undecodable token is rejected and nothing is persisted.
    pub fn login(&self, token: &str) -> Result<Session> {
        let session = Session::from_token(token)?;
        self.store.set_item(keys::TOKEN, &session.token)?;
        tracing::info!(user_id = session.user_id, "Logged in");
        self.set_current(Some(session.clone()));
        Ok(session)
    }

    /// Forget the persisted token and the in-memory session.
    pub fn logout(&self) -> Result<()> {
        self.store.remove_item(keys::TOKEN)?;
        self.set_current(None);
        tracing::info!("Logged out");
        Ok(())
    }

    pub fn current(&self) -> Option<Session> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_current(&self, session: Option<Session>) {
        match self.current.write() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn token_with_payload(payload: &str) -> String {
        format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn test_decode_numeric_and_string_ids() {
        assert_eq!(decode_user_id(&token_with_payload(r#"{"user_id": 7}"#)).unwrap(), 7);
        assert_eq!(
            decode_user_id(&token_with_payload(r#"{"user_id": "12"}"#)).unwrap(),
            12
        );
    }

    #[test]
    fn test_decode_accepts_padding_and_standard_alphabet() {
        // "~~~" encodes to "fn5+", which only the standard alphabet accepts
        let payload = r#"{"user_id": 3, "n": "~~~?"}"#;
        let standard = base64::engine::general_purpose::STANDARD.encode(payload);
        let token = format!("h.{}.s", standard);
        assert_eq!(decode_user_id(&token).unwrap(), 3);
    }

    #[test]
    fn test_decode_failures() {
        let tokens = vec![
            String::new(),
            "no-dots".to_string(),
            "a..c".to_string(),
            "a.!!!.c".to_string(),
            token_with_payload("not json"),
            token_with_payload(r#"{"sub": 1}"#),
            token_with_payload(r#"{"user_id": "abc"}"#),
            token_with_payload(r#"{"user_id": [1]}"#),
        ];
        for token in &tokens {
            let err = decode_user_id(token).unwrap_err();
            assert!(matches!(err, ClientError::InvalidToken(_)), "{token}");
        }
    }

    #[test]
    fn test_init_with_garbage_token_yields_no_session() {
        let store = Arc::new(MemoryStore::new());
        store.set_item(keys::TOKEN, "garbage").unwrap();
        let sessions = SessionStore::new(store);
        assert_eq!(sessions.init(), None);
        assert_eq!(sessions.current(), None);
    }

    #[test]
    fn test_login_logout() {
        let store = Arc::new(MemoryStore::new());
        let sessions = SessionStore::new(store.clone());
        let token = token_with_payload(r#"{"user_id": 5}"#);

        let session = sessions.login(&token).unwrap();
        assert_eq!(session.user_id, 5);
        assert_eq!(store.get_item(keys::TOKEN).unwrap(), Some(token.clone()));

        // A fresh store over the same storage restores the session
        let restored = SessionStore::new(store.clone()).init().unwrap();
        assert_eq!(restored, session);

        sessions.logout().unwrap();
        assert_eq!(sessions.current(), None);
        assert_eq!(store.get_item(keys::TOKEN).unwrap(), None);
    }

    #[test]
    fn test_login_rejects_undecodable_token() {
        let store = Arc::new(MemoryStore::new());
        let sessions = SessionStore::new(store.clone());
        assert!(sessions.login("x.y.z").is_err());
        assert_eq!(store.get_item(keys::TOKEN).unwrap(), None);
    }
}
