//! Basic authentication credentials shared by every tracker the bridge talks to.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

/// Username and API token pair sent as HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    api_token: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_token: api_token.into(),
        }
    }

    /// Builds the `Authorization` header value.
    pub fn basic_header(&self) -> String {
        let raw = format!("{}:{}", self.username, self.api_token);
        format!("Basic {}", BASE64_STANDARD.encode(raw))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_token", &"<redacted>")
            .finish()
    }
}
