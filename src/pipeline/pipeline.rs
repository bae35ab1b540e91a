use crate::facts::Snapshot;
use crate::pipeline::{Aggregate, CountKind, FilterTarget, SortKey, Stage};
use anyhow::{Result, bail};
use std::time::Instant;
use strum::IntoEnumIterator;

const LOG_TARGET: &str = "pipeline";

/// An ordered list of stages run over a snapshot: filters first, then sorts, then counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Builds a pipeline, rejecting stage lists that leave the filter, sort, count order.
    pub fn new(stages: Vec<Stage>) -> Result<Self> {
        for pair in stages.windows(2) {
            if let [earlier, later] = pair
                && later.phase() < earlier.phase()
            {
                bail!("stage '{later}' cannot run after stage '{earlier}'");
            }
        }

        Ok(Self { stages })
    }

    /// All activity within `year`.
    pub fn full_report(year: i32) -> Result<Self> {
        Self::standard(year, &[])
    }

    /// Activity within `year` in repositories that were also created in `year`.
    pub fn new_repos_report(year: i32) -> Result<Self> {
        Self::standard(year, &[FilterTarget::Repos])
    }

    fn standard(year: i32, extra_filters: &[FilterTarget]) -> Result<Self> {
        let filters = [FilterTarget::Commits, FilterTarget::Issues, FilterTarget::PullRequests, FilterTarget::Stars]
            .iter()
            .chain(extra_filters)
            .map(|&target| Stage::Filter { target, year });

        let stages = filters
            .chain(SortKey::iter().map(Stage::Sort))
            .chain(CountKind::iter().map(Stage::Count))
            .collect();

        Self::new(stages)
    }

    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Runs every stage in order, each consuming the previous stage's result.
    #[must_use]
    pub fn run(&self, snapshot: Snapshot) -> Aggregate {
        let start_time = Instant::now();

        let aggregate = self.stages.iter().fold(Aggregate::from(snapshot), |aggregate, stage| {
            log::trace!(target: LOG_TARGET, "Running stage '{stage}'");
            stage.apply(aggregate)
        });

        log::debug!(
            target: LOG_TARGET,
            "Ran {} stages in {:.3}s",
            self.stages.len(),
            start_time.elapsed().as_secs_f64()
        );

        aggregate
    }
}
