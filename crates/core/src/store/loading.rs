//! Named loading flags folded into one "is anything loading" signal.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable handle over a set of named boolean flags.
///
/// Clones share the same flags, so a page session can hold one handle while the
/// top-level loading indicator reads another.
#[derive(Clone, Debug, Default)]
pub struct LoadingFlags {
    flags: Arc<Mutex<BTreeMap<String, bool>>>,
}

impl LoadingFlags {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, bool>> {
        // A panic while holding the lock cannot leave a map of booleans inconsistent.
        self.flags.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set(&self, key: &str, value: bool) {
        tracing::trace!("loading flag {} = {}", key, value);
        self.lock().insert(key.to_string(), value);
    }

    /// Removes the flag entirely.
    pub fn clear(&self, key: &str) {
        self.lock().remove(key);
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.lock().get(key).copied().unwrap_or(false)
    }

    /// True iff any flag is true.
    pub fn is_loading(&self) -> bool {
        self.lock().values().any(|v| *v)
    }

    /// Keys of the flags that are currently true, in sorted order.
    pub fn active(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(_, v)| **v)
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Raises `key` until the returned guard is dropped.
    #[must_use = "the flag is cleared as soon as the guard is dropped"]
    pub fn guard(&self, key: &str) -> LoadingGuard {
        self.set(key, true);
        LoadingGuard {
            flags: self.clone(),
            key: key.to_string(),
        }
    }
}

/// Clears its loading flag on drop.
#[derive(Debug)]
pub struct LoadingGuard {
    flags: LoadingFlags,
    key: String,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.flags.set(&self.key, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_loading_when_any_flag_true() {
        let flags = LoadingFlags::new();
        assert!(!flags.is_loading());

        flags.set("list", true);
        flags.set("place", false);
        assert!(flags.is_loading());
        assert_eq!(flags.active(), vec!["list"]);

        flags.set("list", false);
        assert!(!flags.is_loading());
    }

    #[test]
    fn test_clones_share_flags() {
        let flags = LoadingFlags::new();
        let other = flags.clone();
        other.set("search", true);
        assert!(flags.is_set("search"));
        flags.clear("search");
        assert!(!other.is_loading());
    }

    #[test]
    fn test_guard_clears_on_drop() {
        let flags = LoadingFlags::new();
        {
            let _guard = flags.guard("adding-list");
            let _other = flags.guard("list");
            assert_eq!(flags.active(), vec!["adding-list", "list"]);
        }
        assert!(!flags.is_loading());
    }
}
