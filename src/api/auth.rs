use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE, SET_COOKIE};
use chrono::{DateTime, Utc};
use std::fmt;

/// Authenticated session, carried as the `Cookie` header of later calls
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    cookie: HeaderValue,
}

impl Session {
    /// Wrap a raw `Cookie` header value; `None` if it is not a valid header
    pub fn from_cookie(cookie: &str) -> Option<Self> {
        HeaderValue::from_str(cookie)
            .ok()
            .map(|cookie| Self { cookie })
    }

    /// Build a session from the `Set-Cookie` headers of a login response
    ///
    /// Only the `name=value` part of each cookie is kept. A later cookie
    /// replaces an earlier one of the same name, and cookies that arrive
    /// already expired (`Max-Age<=0` or an `Expires` in the past) delete
    /// it. Returns `None` when no live cookie remains.
    pub fn from_set_cookie(headers: &HeaderMap) -> Option<Self> {
        let mut jar: Vec<(&str, &str)> = Vec::new();

        for raw in headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
        {
            let mut parts = raw.split(';').map(str::trim);
            let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }

            jar.retain(|(existing, _)| *existing != name);
            if !is_expired(parts) {
                jar.push((name, value.trim()));
            }
        }

        if jar.is_empty() {
            return None;
        }
        let pairs: Vec<String> = jar
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        Self::from_cookie(&pairs.join("; "))
    }

    /// Header pair to attach to an authenticated request
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        (COOKIE, self.cookie.clone())
    }

    pub fn cookie(&self) -> &str {
        self.cookie.to_str().unwrap_or_default()
    }
}

/// Whether the cookie attributes mark it as already expired
fn is_expired<'a>(attributes: impl Iterator<Item = &'a str>) -> bool {
    let mut expired = false;
    for attribute in attributes {
        let Some((key, value)) = attribute.split_once('=') else {
            continue;
        };
        let value = value.trim();
        if key.trim().eq_ignore_ascii_case("max-age") {
            // Max-Age takes precedence over Expires
            return value.parse::<i64>().map(|age| age <= 0).unwrap_or(false);
        }
        if key.trim().eq_ignore_ascii_case("expires") {
            expired = DateTime::parse_from_rfc2822(value)
                .map(|at| at.with_timezone(&Utc) <= Utc::now())
                .unwrap_or(false);
        }
    }
    expired
}

// Cookie values are credentials; keep them out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("cookie", &"<redacted>").finish()
    }
}
