//! Session cookie store.
//!
//! The server keeps both tokens in `HttpOnly` cookies, so the client never
//! touches them directly; it only has to replay what the server set. This
//! store plugs into reqwest as its cookie provider and, unlike
//! `reqwest::cookie::Jar`, can be cleared on logout or a failed refresh.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use cookie::Cookie;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use reqwest::Url;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredCookie {
    value: String,
    expires_at: Option<OffsetDateTime>,
}

impl StoredCookie {
    /// Max-Age wins over Expires; a session cookie has no expiry.
    fn from_parsed(cookie: &Cookie<'_>, now: OffsetDateTime) -> Self {
        let expires_at = match cookie.max_age() {
            Some(max_age) => now.checked_add(max_age),
            None => cookie.expires_datetime(),
        };
        Self {
            value: cookie.value_trimmed().to_string(),
            expires_at,
        }
    }

    fn is_live(&self, now: OffsetDateTime) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Clearable cookie store keyed by host, then cookie name.
#[derive(Debug, Default)]
pub struct SessionCookieStore {
    hosts: RwLock<BTreeMap<String, BTreeMap<String, StoredCookie>>>,
}

impl SessionCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn host_key(url: &Url) -> String {
        url.host_str().unwrap_or_default().to_ascii_lowercase()
    }

    /// Apply `Set-Cookie` headers received from `url`.
    pub fn store_from_headers<'a>(&self, headers: impl IntoIterator<Item = &'a str>, url: &Url) {
        let now = OffsetDateTime::now_utc();
        let host = Self::host_key(url);
        let mut hosts = self.hosts.write().unwrap_or_else(PoisonError::into_inner);
        let jar = hosts.entry(host).or_default();

        for raw in headers {
            let cookie = match Cookie::parse(raw) {
                Ok(cookie) => cookie,
                Err(e) => {
                    tracing::debug!("ignoring malformed set-cookie header: {e}");
                    continue;
                }
            };

            let stored = StoredCookie::from_parsed(&cookie, now);
            if stored.value.is_empty() || !stored.is_live(now) {
                jar.remove(cookie.name());
            } else {
                jar.insert(cookie.name().to_string(), stored);
            }
        }
    }

    /// Current value of a live cookie for `url`.
    pub fn get(&self, url: &Url, name: &str) -> Option<String> {
        let now = OffsetDateTime::now_utc();
        let hosts = self.hosts.read().unwrap_or_else(PoisonError::into_inner);
        hosts
            .get(&Self::host_key(url))?
            .get(name)
            .filter(|c| c.is_live(now))
            .map(|c| c.value.clone())
    }

    /// Drop every cookie for every host.
    pub fn clear(&self) {
        self.hosts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn is_empty(&self) -> bool {
        let now = OffsetDateTime::now_utc();
        self.hosts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .all(|jar| jar.values().all(|c| !c.is_live(now)))
    }

    fn header_for(&self, url: &Url) -> Option<String> {
        let now = OffsetDateTime::now_utc();
        let hosts = self.hosts.read().unwrap_or_else(PoisonError::into_inner);
        let pairs: Vec<String> = hosts
            .get(&Self::host_key(url))?
            .iter()
            .filter(|(_, c)| c.is_live(now))
            .map(|(name, c)| format!("{name}={}", c.value))
            .collect();

        (!pairs.is_empty()).then(|| pairs.join("; "))
    }
}

impl CookieStore for SessionCookieStore {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let headers: Vec<&str> = cookie_headers.filter_map(|h| h.to_str().ok()).collect();
        self.store_from_headers(headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.header_for(url)
            .and_then(|header| HeaderValue::from_str(&header).ok())
    }
}
