pub mod error;
pub mod exclusion;
pub mod item;
pub mod output;
pub mod pipeline;
pub mod predicate;
pub mod search;

use std::path::PathBuf;

/// Direction in which the backend orders its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }
}

/// A single metadata search, assembled once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Query predicate as given on the command line.
    pub predicate: String,
    /// Directories the search is restricted to, in the order given.
    pub scopes: Vec<PathBuf>,
    pub sort_key: String,
    pub order: SortOrder,
}

/// Absolute paths returned by the backend, already in sort order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub paths: Vec<String>,
}

impl SearchResult {
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

pub use error::{BackendError, ClassifyError, CoreError, PredicateError};
pub use exclusion::{is_excluded, ExclusionSet};
pub use item::{DisplayItem, Icon, IconType, ItemBuilder, ItemOptions};
pub use output::Payload;
pub use pipeline::{ResultPipeline, Stage};
pub use predicate::to_mdfind_query;
pub use search::{MdfindRunner, QueryRunner, SearchBackend, SpotlightBackend};
