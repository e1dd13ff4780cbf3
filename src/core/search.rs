//! Search backend adapter over the Spotlight metadata index.
//!
//! The pipeline sees a plain blocking call. Internally the search runs as an
//! async gathering task on a private runtime and reports completion through a
//! one-shot channel, which is the only thing `search` waits on.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;
use tokio::process::Command;
use tokio::sync::oneshot;

use super::predicate::to_mdfind_query;
use super::{BackendError, SearchRequest, SearchResult, SortOrder};

/// Message printed by `mdfind` when it cannot parse a predicate.
const INVALID_QUERY_MARKER: &str = "Failed to create query";

/// Runs a metadata search to completion.
pub trait SearchBackend {
    fn search(&self, request: &SearchRequest) -> Result<SearchResult, BackendError>;
}

/// A matched path together with the value of the sort attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatheredItem {
    pub path: String,
    pub sort_value: Option<String>,
}

/// Performs the initial gathering pass for a single scope.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    async fn gather(
        &self,
        predicate: &str,
        scope: &Path,
        sort_key: &str,
    ) -> Result<Vec<GatheredItem>, BackendError>;
}

/// Gathers through the `mdfind` command line tool.
#[derive(Debug, Clone)]
pub struct MdfindRunner {
    program: String,
}

impl Default for MdfindRunner {
    fn default() -> Self {
        Self::with_program("mdfind")
    }
}

impl MdfindRunner {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl QueryRunner for MdfindRunner {
    async fn gather(
        &self,
        predicate: &str,
        scope: &Path,
        sort_key: &str,
    ) -> Result<Vec<GatheredItem>, BackendError> {
        let query = to_mdfind_query(predicate);
        if query != predicate {
            tracing::debug!("Rewrote predicate for mdfind: {}", query);
        }

        let output = Command::new(&self.program)
            .arg("-0")
            .arg("-onlyin")
            .arg(scope)
            .arg("-attr")
            .arg(sort_key)
            .arg(&query)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| BackendError::Unavailable {
                program: self.program.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.contains(INVALID_QUERY_MARKER) {
            return Err(BackendError::InvalidPredicate {
                predicate: predicate.to_string(),
                message: stderr,
            });
        }
        if !output.status.success() {
            return Err(BackendError::Failed {
                status: output.status.to_string(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_mdfind_output(&stdout, sort_key))
    }
}

/// Parses NUL-separated `mdfind -attr` records of the form
/// `<path>   <key> = <value>`.
pub fn parse_mdfind_output(stdout: &str, sort_key: &str) -> Vec<GatheredItem> {
    let marker = format!("   {} = ", sort_key);
    stdout
        .split('\0')
        .map(|record| record.trim_matches('\n'))
        .filter(|record| !record.is_empty())
        .map(|record| match record.rsplit_once(marker.as_str()) {
            Some((path, value)) => GatheredItem {
                path: path.to_string(),
                sort_value: parse_attribute_value(value),
            },
            None => GatheredItem {
                path: record.to_string(),
                sort_value: None,
            },
        })
        .collect()
}

fn parse_attribute_value(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value == "(null)" {
        return None;
    }
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    Some(value.to_string())
}

/// Sort rank of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SortValue<'a> {
    Missing,
    Number(f64),
    Text(&'a str),
}

impl<'a> SortValue<'a> {
    /// Finite numbers compare numerically; `NaN`, infinities and every
    /// other string compare as text.
    fn of(value: &'a Option<String>) -> Self {
        match value.as_deref() {
            None => SortValue::Missing,
            Some(text) => match text.parse::<f64>() {
                Ok(number) if number.is_finite() => SortValue::Number(number),
                _ => SortValue::Text(text),
            },
        }
    }
}

/// Total order over attribute values: missing < numbers < text.
fn compare_sort_values(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (SortValue::of(a), SortValue::of(b)) {
        (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
        (SortValue::Missing, _) => Ordering::Less,
        (_, SortValue::Missing) => Ordering::Greater,
        // "1" and "1.0" are the same number; fall back to the text for a total order.
        (SortValue::Number(x), SortValue::Number(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
        (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
        (SortValue::Text(x), SortValue::Text(y)) => x.cmp(y),
    }
}

/// Stable sort; items with equal values keep their gathering order.
fn sort_gathered(items: &mut [GatheredItem], order: SortOrder) {
    items.sort_by(|a, b| {
        let ordering = compare_sort_values(&a.sort_value, &b.sort_value);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

async fn ensure_directory(scope: &Path) -> Result<(), BackendError> {
    match tokio::fs::metadata(scope).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        _ => Err(BackendError::ScopeUnavailable(scope.to_path_buf())),
    }
}

async fn gather_all(
    runner: &dyn QueryRunner,
    request: &SearchRequest,
) -> Result<Vec<String>, BackendError> {
    if request.scopes.is_empty() {
        return Err(BackendError::NoScope);
    }

    let mut gathered = Vec::new();
    let mut seen = HashSet::new();
    for scope in &request.scopes {
        ensure_directory(scope).await?;
        let items = runner
            .gather(&request.predicate, scope, &request.sort_key)
            .await?;
        tracing::debug!("Gathered {} items in {}", items.len(), scope.display());
        // Overlapping scopes report the same file more than once.
        gathered.extend(items.into_iter().filter(|item| seen.insert(item.path.clone())));
    }
    sort_gathered(&mut gathered, request.order);
    Ok(gathered.into_iter().map(|item| item.path).collect())
}

/// Spotlight-backed `SearchBackend`.
pub struct SpotlightBackend {
    runtime: tokio::runtime::Runtime,
    runner: Arc<dyn QueryRunner>,
}

impl SpotlightBackend {
    pub fn new() -> Result<Self, BackendError> {
        Self::with_runner(Arc::new(MdfindRunner::default()))
    }

    pub fn with_runner(runner: Arc<dyn QueryRunner>) -> Result<Self, BackendError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(BackendError::Runtime)?;
        Ok(Self { runtime, runner })
    }
}

impl SearchBackend for SpotlightBackend {
    fn search(&self, request: &SearchRequest) -> Result<SearchResult, BackendError> {
        let started = Instant::now();
        let (finished_tx, finished_rx) = oneshot::channel();
        let runner = Arc::clone(&self.runner);
        let task_request = request.clone();

        let outcome = self.runtime.block_on(async move {
            tokio::spawn(async move {
                let outcome = gather_all(runner.as_ref(), &task_request).await;
                // The receiver only disappears if `search` itself was torn down.
                let _ = finished_tx.send(outcome);
            });
            match finished_rx.await {
                Ok(outcome) => outcome,
                Err(_) => Err(BackendError::GatheringAborted),
            }
        });

        match outcome {
            Ok(paths) => {
                tracing::debug!(
                    "Search finished gathering {} paths in {:?}",
                    paths.len(),
                    started.elapsed()
                );
                Ok(SearchResult::new(paths))
            }
            Err(e) => {
                tracing::error!("Search failed after {:?}: {}", started.elapsed(), e);
                Err(e)
            }
        }
    }
}
