pub mod paths;

use std::path::PathBuf;

use crate::core::{ExclusionSet, ItemOptions, SearchRequest, SortOrder};

/// Spotlight attribute used for ordering when none is given.
pub const DEFAULT_SORT_KEY: &str = "kMDItemFSName";

/// Options for a single run, resolved from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub predicate: String,
    pub positive_scopes: Vec<PathBuf>,
    pub negative_scopes: Vec<PathBuf>,
    pub exclude_library: bool,
    pub sort_key: String,
    pub sort_ascending: bool,
    pub display_images: bool,
    pub hide_subtitle: bool,
    pub match_path: bool,
    pub home: Option<PathBuf>,
}

impl SearchConfig {
    /// Scopes to search; the home directory when none were configured.
    pub fn effective_scopes(&self) -> Vec<PathBuf> {
        if self.positive_scopes.is_empty() {
            self.home.iter().cloned().collect()
        } else {
            self.positive_scopes.clone()
        }
    }

    pub fn search_request(&self) -> SearchRequest {
        SearchRequest {
            predicate: self.predicate.clone(),
            scopes: self.effective_scopes(),
            sort_key: self.sort_key.clone(),
            order: SortOrder::from_ascending(self.sort_ascending),
        }
    }

    pub fn item_options(&self) -> ItemOptions {
        ItemOptions {
            hide_subtitle: self.hide_subtitle,
            match_path: self.match_path,
            display_images: self.display_images,
        }
    }

    /// Negative scopes, plus the user library when `exclude_library` is set.
    pub fn exclusion_set(&self) -> ExclusionSet {
        let library = match (&self.home, self.exclude_library) {
            (Some(home), true) => Some(paths::library_dirs(home)),
            _ => None,
        };
        if self.exclude_library && library.is_none() {
            tracing::warn!("Home directory unknown; user library cannot be excluded");
        }
        ExclusionSet::build(&self.negative_scopes, library.as_deref())
    }

    /// Home directory as a string, for subtitle abbreviation.
    pub fn home_str(&self) -> Option<String> {
        self.home
            .as_ref()
            .map(|home| home.to_string_lossy().into_owned())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            predicate: String::new(),
            positive_scopes: Vec::new(),
            negative_scopes: Vec::new(),
            exclude_library: false,
            sort_key: DEFAULT_SORT_KEY.to_string(),
            sort_ascending: false,
            display_images: false,
            hide_subtitle: false,
            match_path: false,
            home: paths::home_dir(),
        }
    }
}
