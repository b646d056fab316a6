//! Ordered set of code points used by `any` and `not` atoms
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuneSet(BTreeSet<char>);

impl RuneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, c: char) -> bool {
        self.0.insert(c)
    }

    pub fn contains(&self, c: char) -> bool {
        self.0.contains(&c)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Members in ascending order
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<char> for RuneSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<&str> for RuneSet {
    fn from(s: &str) -> Self {
        s.chars().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a: RuneSet = "abc".into();
        let b: RuneSet = "cba".into();
        let c: RuneSet = "ab".into();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_duplicates_collapse() {
        let set: RuneSet = "aab".into();
        assert_eq!(set.len(), 2);
        assert!(set.contains('a'));
        assert!(!set.contains('c'));
        assert_eq!(set.iter().collect::<String>(), "ab");
    }
}
