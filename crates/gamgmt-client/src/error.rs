//! Error types for the management client

use gamgmt_core::MgmtError;
use thiserror::Error;

/// Message returned when the authenticated user has no accounts.
pub const NO_ACCOUNTS_MESSAGE: &str =
    "You do not have any Google Analytics accounts. Go to http://google.com/analytics to sign up.";

/// Errors that can occur while talking to the management API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Failed to build the HTTP client
    #[error("failed to initialize client: {0}")]
    Init(String),

    /// Invalid client configuration
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request URL could not be built
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with an error payload or a non-success status
    #[error("API error {code}: {message}")]
    Api { code: u16, message: String },

    /// The account summary list has no `items`
    #[error("{}", NO_ACCOUNTS_MESSAGE)]
    NoAccounts,

    /// The response is JSON but not the expected shape
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Core(#[from] MgmtError),
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_accounts_message_is_verbatim() {
        assert_eq!(ClientError::NoAccounts.to_string(), NO_ACCOUNTS_MESSAGE);
    }

    #[test]
    fn api_error_display() {
        let e = ClientError::Api {
            code: 403,
            message: "User does not have sufficient permissions".into(),
        };
        assert_eq!(e.to_string(), "API error 403: User does not have sufficient permissions");
    }
}
