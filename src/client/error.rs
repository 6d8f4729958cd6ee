use crate::dto::ErrorResponse;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// Connection refused, DNS failure, timeout.
    #[error("Cannot connect to server. Please make sure the backend is running.")]
    Network(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("Request failed: {0}")]
    Request(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ClientError::Network(err.to_string())
        } else {
            ClientError::Request(err.to_string())
        }
    }

    /// Maps a non-2xx response onto the taxonomy, preferring the server's
    /// error envelope message over the raw body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|envelope| envelope.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    format!("Request failed with status {status}")
                } else {
                    trimmed.to_string()
                }
            });

        match status {
            401 => ClientError::Unauthorized(message),
            404 => ClientError::NotFound(message),
            409 => ClientError::Conflict(message),
            400 | 413 | 422 => ClientError::Validation(message),
            _ => ClientError::Server { status, message },
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_message_is_surfaced() {
        let body = r#"{"error":{"message":"Email already registered","code":409}}"#;
        let err = ClientError::from_response(409, body);
        assert!(matches!(err, ClientError::Conflict(_)));
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[test]
    fn test_plain_text_body_falls_back_verbatim() {
        let err = ClientError::from_response(422, "Failed to deserialize the JSON body");
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(err.to_string(), "Failed to deserialize the JSON body");
    }

    #[test]
    fn test_empty_body_reports_status() {
        let err = ClientError::from_response(503, "");
        assert_eq!(err.to_string(), "Request failed with status 503");
        assert!(matches!(err, ClientError::Server { status: 503, .. }));
    }

    #[test]
    fn test_network_message_is_distinct() {
        let err = ClientError::Network("connection refused".into());
        assert!(err.is_network());
        assert!(err.to_string().starts_with("Cannot connect to server"));
    }
}
