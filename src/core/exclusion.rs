//! Prefix-based exclusion of result paths.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Path prefixes whose matches are dropped from the results.
///
/// Matching is a literal string prefix test, not a path-segment test:
/// `/Users/me/Lib` also excludes `/Users/me/Library2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    prefixes: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the set from user-supplied negative scopes, adding the user
    /// library folders when `library_dirs` is given.
    pub fn build<I, S>(negative_scopes: I, library_dirs: Option<&[PathBuf]>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        let mut set: Self = negative_scopes
            .into_iter()
            .map(|p| p.as_ref().to_string_lossy().into_owned())
            .collect();
        if let Some(dirs) = library_dirs {
            set.extend(dirs.iter().map(|d| d.to_string_lossy().into_owned()));
        }
        set
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn excludes(&self, path: &str) -> bool {
        is_excluded(path, self)
    }
}

impl FromIterator<String> for ExclusionSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            prefixes: iter.into_iter().collect(),
        }
    }
}

impl Extend<String> for ExclusionSet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.prefixes.extend(iter);
    }
}

/// True iff some member of `exclusions` is a literal prefix of `path`.
pub fn is_excluded(path: &str, exclusions: &ExclusionSet) -> bool {
    exclusions
        .prefixes
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(prefixes: &[&str]) -> ExclusionSet {
        prefixes.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_empty_set_excludes_nothing() {
        let empty = ExclusionSet::new();
        assert!(!is_excluded("/Users/me/Desktop/a.txt", &empty));
        assert!(!is_excluded("", &empty));
    }

    #[test]
    fn test_prefix_match_is_not_segment_aware() {
        let exclusions = set(&["/Users/me/Lib"]);
        assert!(is_excluded("/Users/me/Library/x.txt", &exclusions));
        assert!(is_excluded("/Users/me/Library2", &exclusions));
        assert!(!is_excluded("/Users/me/Documents/Lib", &exclusions));
    }

    #[test]
    fn test_build_adds_library_only_when_requested() {
        let library = vec![PathBuf::from("/Users/me/Library")];

        let without = ExclusionSet::build(["/tmp/skip"], None);
        assert_eq!(without.len(), 1);
        assert!(!without.excludes("/Users/me/Library/Caches/x"));

        let with = ExclusionSet::build(["/tmp/skip"], Some(library.as_slice()));
        assert_eq!(with.len(), 2);
        assert!(with.excludes("/Users/me/Library/Caches/x"));
        assert!(with.excludes("/tmp/skip/file"));
    }

    proptest! {
        #[test]
        fn prop_excluded_iff_some_member_is_prefix(
            path in "[a-c/]{0,12}",
            prefixes in proptest::collection::vec("[a-c/]{0,6}", 0..5),
        ) {
            let exclusions: ExclusionSet = prefixes.iter().cloned().collect();
            let expected = prefixes.iter().any(|p| path.starts_with(p.as_str()));
            prop_assert_eq!(is_excluded(&path, &exclusions), expected);
        }

        #[test]
        fn prop_path_in_set_is_excluded(path in "/[a-z]{1,8}(/[a-z]{1,8}){0,3}") {
            let exclusions: ExclusionSet = std::iter::once(path.clone()).collect();
            prop_assert!(is_excluded(&path, &exclusions));
        }
    }
}
