use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;

use crate::errors::RequestError;

/// Cookie state shared by the calls of one logical session.
///
/// Clones share the same jar. Cookies are read before each request is sent and
/// `Set-Cookie` headers of every response are written back after it is received.
#[derive(Clone, Default)]
pub struct Session {
    jar: Arc<Jar>,
}

impl Session {
    /// A session with an empty cookie jar.
    pub fn new() -> Session {
        Session::default()
    }

    /// Store a `Set-Cookie` style cookie for `url`.
    pub fn add_cookie_str(&self, cookie: &str, url: &Url) {
        self.jar.add_cookie_str(cookie, url);
    }

    /// The `Cookie` header value that would be sent to `url`, if any.
    pub fn cookies(&self, url: &Url) -> Option<String> {
        self.jar
            .cookies(url)
            .and_then(|value| value.to_str().ok().map(str::to_owned))
    }

    pub(crate) fn blocking_client(&self, timeout: Option<Duration>) -> Result<reqwest::blocking::Client, RequestError> {
        Ok(reqwest::blocking::Client::builder()
            .cookie_provider(self.jar.clone())
            .timeout(timeout)
            .build()?)
    }

    #[cfg(feature = "aio")]
    pub(crate) fn async_client(&self) -> Result<reqwest::Client, RequestError> {
        Ok(reqwest::Client::builder().cookie_provider(self.jar.clone()).build()?)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
