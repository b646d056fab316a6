//! Thread-safe set of strings that rejects re-insertion
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StringSetError {
    #[error("'{value}' is already in the set")]
    AlreadyPresent { value: String },
}

/// Used to track declared token names. All operations take `&self` so a set
/// can be shared between threads behind an `Arc`.
#[derive(Debug, Default)]
pub struct StringSet {
    values: Mutex<HashSet<String>>,
}

impl StringSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // The set holds no invariant a panicking holder could break
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert `value`, failing if it is already present
    pub fn add(&self, value: &str) -> Result<(), StringSetError> {
        if self.lock().insert(value.to_string()) {
            Ok(())
        } else {
            Err(StringSetError::AlreadyPresent {
                value: value.to_string(),
            })
        }
    }

    pub fn has(&self, value: &str) -> bool {
        self.lock().contains(value)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of the members, sorted for deterministic output
    pub fn values(&self) -> Vec<String> {
        let mut values: Vec<String> = self.lock().iter().cloned().collect();
        values.sort();
        values
    }
}

impl<S: Into<String>> FromIterator<S> for StringSet {
    /// Seed a set; repeated values collapse into one member
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            values: Mutex::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::Arc;

    #[test]
    fn test_add_rejects_duplicates() {
        let set = StringSet::new();
        assert!(set.add("tokid").is_ok());
        assert_matches!(
            set.add("tokid"),
            Err(StringSetError::AlreadyPresent { ref value }) if value == "tokid"
        );
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_seeded_set_rejects_seed_values() {
        let set: StringSet = ["Error", "EOF", "EOF"].into_iter().collect();
        assert_eq!(set.values(), vec!["EOF", "Error"]);
        assert_matches!(set.add("Error"), Err(StringSetError::AlreadyPresent { .. }));
        assert!(set.add("nt").is_ok());
    }

    #[test]
    fn test_values_sorted_and_clear() {
        let set = StringSet::new();
        for name in ["string_lit", "char_lit", "tokid"] {
            set.add(name).unwrap();
        }

        assert_eq!(set.values(), vec!["char_lit", "string_lit", "tokid"]);
        assert!(set.has("char_lit"));

        set.clear();
        assert!(set.is_empty());
        assert!(!set.has("char_lit"));
    }

    #[test]
    fn test_concurrent_adds_admit_one_winner() {
        let set = Arc::new(StringSet::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let set = Arc::clone(&set);
                std::thread::spawn(move || set.add("shared").is_ok())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
