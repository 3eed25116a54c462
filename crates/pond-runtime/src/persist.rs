//! Cookie store - small expiring key-value storage that survives sessions.
//!
//! Each entry carries an absolute expiry in Unix seconds. When the store is
//! backed by a file, every change is written through as TOML.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use pond_core::Result;

/// Lifetime given to cookies set without an explicit expiry
pub const DEFAULT_EXPIRE_DAYS: f64 = 365.0;

const SECONDS_PER_DAY: f64 = 24.0 * 60.0 * 60.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Cookie {
    value: String,
    expires: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CookieFile {
    #[serde(default)]
    cookies: BTreeMap<String, Cookie>,
}

pub struct CookieStore {
    cookies: BTreeMap<String, Cookie>,
    path: Option<PathBuf>,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl CookieStore {
    /// An in-memory store that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            cookies: BTreeMap::new(),
            path: None,
        }
    }

    /// Open a file-backed store. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cookies = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let file: CookieFile = toml::from_str(&content)?;
            file.cookies
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            cookies,
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set a cookie that expires after [`DEFAULT_EXPIRE_DAYS`]
    pub fn set_cookie(&mut self, name: &str, value: impl Into<String>) {
        self.set_cookie_for(name, value, DEFAULT_EXPIRE_DAYS);
    }

    pub fn set_cookie_for(&mut self, name: &str, value: impl Into<String>, expire_days: f64) {
        self.set_cookie_at(name, value, expire_days, now_secs());
    }

    fn set_cookie_at(&mut self, name: &str, value: impl Into<String>, expire_days: f64, now: u64) {
        let lifetime = (expire_days * SECONDS_PER_DAY).max(0.0) as u64;
        self.cookies.insert(
            name.to_string(),
            Cookie {
                value: value.into(),
                expires: now.saturating_add(lifetime),
            },
        );
        self.write_through();
    }

    /// Value of a live cookie, or an empty string when missing or expired
    pub fn get_cookie(&self, name: &str) -> String {
        self.get_cookie_at(name, now_secs())
    }

    fn get_cookie_at(&self, name: &str, now: u64) -> String {
        match self.cookies.get(name) {
            Some(cookie) if cookie.expires > now => cookie.value.clone(),
            _ => String::new(),
        }
    }

    pub fn delete_cookie(&mut self, name: &str) {
        if self.cookies.remove(name).is_some() {
            self.write_through();
        }
    }

    /// Write the store to its backing file, dropping expired cookies
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let now = now_secs();
        let file = CookieFile {
            cookies: self
                .cookies
                .iter()
                .filter(|(_, c)| c.expires > now)
                .map(|(k, c)| (k.clone(), c.clone()))
                .collect(),
        };
        std::fs::write(path, toml::to_string_pretty(&file)?)?;
        Ok(())
    }

    fn write_through(&self) {
        if let Err(e) = self.save() {
            log::warn!("[cookies] Failed to save cookie store: {e}");
        }
    }
}

impl Default for CookieStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
