use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Value of the `Authorization` header sent with every call.
///
/// The value is opaque to the transport: it is attached verbatim on the first
/// request, without waiting for a challenge.
#[derive(Clone, PartialEq, Eq)]
pub struct Authentication(String);

impl Authentication {
    /// Use a precomputed header value as is.
    pub fn header(value: impl Into<String>) -> Authentication {
        Authentication(value.into())
    }

    /// HTTP Basic credentials.
    pub fn basic(user: &str, password: &str) -> Authentication {
        let credentials = STANDARD.encode(format!("{user}:{password}"));
        Authentication(format!("Basic {credentials}"))
    }

    /// Bearer token.
    pub fn bearer(token: &str) -> Authentication {
        Authentication(format!("Bearer {token}"))
    }

    /// The header value.
    pub fn value(&self) -> &str {
        &self.0
    }
}

// Credentials stay out of logs.
impl std::fmt::Debug for Authentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Authentication(..)")
    }
}
