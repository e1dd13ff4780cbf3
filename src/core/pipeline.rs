//! Orchestrates one run: search, exclude, build, serialize.

use std::cell::Cell;
use std::fmt;
use std::io::Write;

use super::exclusion::{is_excluded, ExclusionSet};
use super::item::ItemBuilder;
use super::output::Payload;
use super::search::SearchBackend;
use super::{CoreError, SearchRequest};

/// Stages a run passes through, in order. `Failed` is only reachable from
/// `Searching`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Searching,
    Filtering,
    Building,
    Serializing,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Searching => "searching",
            Stage::Filtering => "filtering",
            Stage::Building => "building",
            Stage::Serializing => "serializing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The single entry point executed once per process.
pub struct ResultPipeline<'a> {
    backend: &'a dyn SearchBackend,
    items: ItemBuilder<'a>,
    stage: Cell<Stage>,
}

impl<'a> ResultPipeline<'a> {
    pub fn new(backend: &'a dyn SearchBackend, items: ItemBuilder<'a>) -> Self {
        Self {
            backend,
            items,
            stage: Cell::new(Stage::Idle),
        }
    }

    /// The stage the most recent run reached.
    pub fn stage(&self) -> Stage {
        self.stage.get()
    }

    fn advance(&self, next: Stage) {
        tracing::debug!("Pipeline: {} -> {}", self.stage.get(), next);
        self.stage.set(next);
    }

    /// Runs the search and returns the document to print.
    ///
    /// Result order is the backend's order; nothing is re-sorted.
    pub fn run(
        &self,
        request: &SearchRequest,
        exclusions: &ExclusionSet,
    ) -> Result<Payload, CoreError> {
        self.stage.set(Stage::Idle);

        self.advance(Stage::Searching);
        let result = match self.backend.search(request) {
            Ok(result) => result,
            Err(e) => {
                self.advance(Stage::Failed);
                return Err(e.into());
            }
        };

        self.advance(Stage::Filtering);
        let total = result.len();
        let survivors: Vec<String> = result
            .paths
            .into_iter()
            .filter(|path| !is_excluded(path, exclusions))
            .collect();
        tracing::debug!(
            "Kept {} of {} results after {} exclusions",
            survivors.len(),
            total,
            exclusions.len()
        );

        self.advance(Stage::Building);
        let items = survivors.iter().map(|path| self.items.build(path)).collect();

        Ok(Payload::from_items(items, self.items.options().display_images))
    }

    /// Runs the search and writes the JSON document to `out`.
    ///
    /// Nothing is written when the search fails.
    pub fn run_to<W: Write>(
        &self,
        request: &SearchRequest,
        exclusions: &ExclusionSet,
        out: &mut W,
    ) -> Result<(), CoreError> {
        let payload = self.run(request, exclusions)?;

        self.advance(Stage::Serializing);
        payload.write_to(out)?;

        self.advance(Stage::Done);
        Ok(())
    }
}
