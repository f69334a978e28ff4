use std::fmt;

use axum::http::{header, header::InvalidHeaderValue, HeaderMap, HeaderValue};
use uuid::Uuid;

pub(crate) mod extractors;

pub use extractors::{OptionalSession, RequiredSession};

/// Opaque identifier grouping the meals of one anonymous client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Empty values count as no session at all.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Looks up `name` across every `Cookie` header of the request.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .and_then(|(_, v)| SessionId::new(v.trim().trim_matches('"')))
}

/// `Set-Cookie` value handing a session back to the client, valid for the whole service.
pub fn session_cookie(
    name: &str,
    session: &SessionId,
    ttl_days: u32,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = u64::from(ttl_days) * 24 * 60 * 60;
    HeaderValue::from_str(&format!(
        "{name}={session}; Path=/; Max-Age={max_age}; HttpOnly; SameSite=Lax"
    ))
}
