//! Single-display notifications for the form surface.
//!
//! Messages are kept server side under a random key carried in a cookie and
//! are removed the first time a page reads them.

use std::{collections::HashMap, time::Duration};

use axum::http::{header, HeaderMap, HeaderValue};
use tokio::{sync::Mutex, time::Instant};
use uuid::Uuid;

pub const FLASH_COOKIE: &str = "clientes_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// Tag used as the CSS class of the rendered message.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// How long queued messages wait for their browser to come back.
const FLASH_TTL: Duration = Duration::from_secs(10 * 60);
/// Upper bound on browsers with pending messages.
const MAX_PENDING: usize = 10_000;

struct Pending {
    queued_at: Instant,
    flashes: Vec<Flash>,
}

/// Pending messages per browser key.
///
/// Entries are dropped after `ttl` and the map never holds more than
/// `capacity` keys, so clients that never follow the redirect cannot grow
/// it without bound.
pub struct FlashStore {
    pending: Mutex<HashMap<Uuid, Pending>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for FlashStore {
    fn default() -> Self {
        Self::with_limits(FLASH_TTL, MAX_PENDING)
    }
}

impl FlashStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Queues messages for the browser holding `key`, allocating a key when
    /// it has none. Returns the key to send back in the cookie.
    pub async fn push(&self, key: Option<Uuid>, flashes: Vec<Flash>) -> Uuid {
        let key = key.unwrap_or_else(Uuid::new_v4);
        let now = Instant::now();
        let mut pending = self.pending.lock().await;

        let before = pending.len();
        pending.retain(|_, p| now.duration_since(p.queued_at) < self.ttl);
        if pending.len() < before {
            tracing::debug!(expired = before - pending.len(), "dropped stale flashes");
        }
        if !pending.contains_key(&key) && pending.len() >= self.capacity {
            let oldest = pending
                .iter()
                .min_by_key(|(_, p)| p.queued_at)
                .map(|(k, _)| *k);
            if let Some(oldest) = oldest {
                pending.remove(&oldest);
            }
        }

        let entry = pending.entry(key).or_insert_with(|| Pending {
            queued_at: now,
            flashes: Vec::new(),
        });
        entry.queued_at = now;
        entry.flashes.extend(flashes);
        key
    }

    /// Drains every message queued for `key`. Expired messages are dropped.
    pub async fn take(&self, key: Option<Uuid>) -> Vec<Flash> {
        let Some(key) = key else {
            return Vec::new();
        };
        match self.pending.lock().await.remove(&key) {
            Some(p) if p.queued_at.elapsed() < self.ttl => p.flashes,
            _ => Vec::new(),
        }
    }
}

/// Reads the flash key from the request's `Cookie` headers.
pub fn flash_key(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLASH_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value carrying `key`.
pub fn flash_cookie(key: Uuid) -> HeaderValue {
    let cookie = format!("{FLASH_COOKIE}={key}; Path=/; HttpOnly; SameSite=Lax");
    // A hyphenated uuid and fixed attributes are always valid header text.
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}
