//! Cache Key Module
//!
//! Builds `namespace:id:id...` keys. Components are rendered with `Display`,
//! joined with colons and left untouched (no trimming, no case folding).

use std::fmt;

use crate::cache::MAX_KEY_LENGTH;
use crate::error::{CacheError, Result};

/// Separator between key components.
pub const KEY_SEPARATOR: char = ':';

// == Cache Key ==
/// A validated cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    // == Compose ==
    /// Joins a namespace and identifiers into a key.
    ///
    /// Empty identifiers are kept and produce adjacent colons
    /// (`fitscore::MIT`). Use [`CacheKey::identified`] when an empty
    /// identifier would alias distinct callers onto one entry.
    pub fn compose<I, T>(namespace: &str, parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        if namespace.is_empty() {
            return Err(CacheError::InvalidKey(
                "namespace cannot be empty".to_string(),
            ));
        }

        let mut key = namespace.to_string();
        for part in parts {
            key.push(KEY_SEPARATOR);
            key.push_str(&part.to_string());
        }
        Self::parse(key)
    }

    // == Identified ==
    /// Like [`CacheKey::compose`], but every identifier must be non-empty
    /// and free of [`KEY_SEPARATOR`], so distinct identifier lists never
    /// join into the same key.
    pub fn identified<I, T>(namespace: &str, parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        let parts: Vec<String> = parts.into_iter().map(|p| p.to_string()).collect();
        for (index, part) in parts.iter().enumerate() {
            if part.is_empty() {
                return Err(CacheError::InvalidKey(format!(
                    "identifier {} of '{}' key is empty",
                    index + 1,
                    namespace
                )));
            }
            if part.contains(KEY_SEPARATOR) {
                return Err(CacheError::InvalidKey(format!(
                    "identifier {} of '{}' key contains '{}'",
                    index + 1,
                    namespace,
                    KEY_SEPARATOR
                )));
            }
        }
        Self::compose(namespace, parts)
    }

    // == Parse ==
    /// Validates an already-joined key.
    pub fn parse(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The leading component.
    pub fn namespace(&self) -> &str {
        self.0
            .split(KEY_SEPARATOR)
            .next()
            .unwrap_or_default()
    }
}

/// Rejects empty keys and keys longer than [`MAX_KEY_LENGTH`] bytes.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}
