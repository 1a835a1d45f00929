// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types with a single user-facing message per failure.

/// Message shown when a request fails without a more specific explanation.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Prefix of messages synthesized for error responses without a body.
const STATUS_MESSAGE_PREFIX: &str = "HTTP error! status: ";

/// Client error type shared by the API layer, session handling and pages.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced an HTTP response (connection refused, DNS, TLS...).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    ///
    /// `message` is the body's `error` field when present, otherwise a
    /// message synthesized from the status code.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The bearer token could not be decoded into a session.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// A response body (or stored snapshot) did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The local key-value store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Build an API error from a status code and optional server-provided message.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("{}{}", STATUS_MESSAGE_PREFIX, status));
        ClientError::Api { status, message }
    }

    /// Returns true for transport-level failures (the only kind that may be
    /// rerouted to local storage).
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    /// The backend's own `error` text, if the response carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } if !message.starts_with(STATUS_MESSAGE_PREFIX) => {
                Some(message)
            }
            _ => None,
        }
    }

    /// Text suitable for a page's error slot.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            ClientError::Api { message, .. } => message.clone(),
            ClientError::InvalidToken(_) => "Your session is invalid. Please log in again.".to_string(),
            ClientError::Decode(_) | ClientError::Storage(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::from_status(status.as_u16(), None)
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_prefers_server_message() {
        let err = ClientError::from_status(400, Some("Email already exists".to_string()));
        assert_eq!(err.to_string(), "Email already exists");
        assert_eq!(err.user_message(), "Email already exists");
        assert_eq!(err.server_message(), Some("Email already exists"));
    }

    #[test]
    fn test_from_status_synthesizes_message() {
        let err = ClientError::from_status(503, None);
        assert_eq!(err.to_string(), "HTTP error! status: 503");

        let blank = ClientError::from_status(500, Some("  ".to_string()));
        assert_eq!(blank.to_string(), "HTTP error! status: 500");
        assert_eq!(blank.server_message(), None);
    }

    #[test]
    fn test_classification() {
        assert!(ClientError::Network("refused".into()).is_network());
        assert!(!ClientError::from_status(500, None).is_network());
    }
}
