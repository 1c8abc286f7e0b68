//! Executes selected cases and collects one report per case.
//!
//! With one worker the cases run inline on the calling thread. With more,
//! scoped worker threads pull the next case index from a shared counter;
//! reports are re-ordered to catalogue order before they are returned.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::cases::{CaseContext, CaseGroup, ContractCase};
use crate::fixture::FixtureTemplate;
use crate::gate::CapabilityGate;
use crate::outcome::CaseOutcome;

/// Result of one case invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    /// Stable case id.
    pub id: &'static str,
    /// Group of the case.
    pub group: CaseGroup,
    /// Case title.
    pub title: &'static str,
    /// Verdict.
    pub outcome: CaseOutcome,
    /// Wall time spent in the case body.
    pub elapsed: Duration,
}

/// Counts per outcome category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Cases that passed.
    pub passed: usize,
    /// Cases that could not be evaluated.
    pub skipped: usize,
    /// Cases whose contract was violated.
    pub failed: usize,
    /// Cases that hit a transport error.
    pub errored: usize,
}

impl Tally {
    /// Total number of cases counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.skipped + self.failed + self.errored
    }
}

/// Reports for a whole run, in catalogue order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    reports: Vec<CaseReport>,
}

impl RunSummary {
    /// Wraps reports that are already in catalogue order.
    #[must_use]
    pub const fn new(reports: Vec<CaseReport>) -> Self {
        Self { reports }
    }

    /// Borrows the reports.
    #[must_use]
    pub fn reports(&self) -> &[CaseReport] {
        &self.reports
    }

    /// Counts outcomes by category.
    #[must_use]
    pub fn tally(&self) -> Tally {
        self.reports
            .iter()
            .fold(Tally::default(), |mut tally, report| {
                match report.outcome {
                    CaseOutcome::Passed => tally.passed += 1,
                    CaseOutcome::Skipped(_) => tally.skipped += 1,
                    CaseOutcome::Failed(_) => tally.failed += 1,
                    CaseOutcome::Errored(_) => tally.errored += 1,
                }
                tally
            })
    }

    /// Whether any case failed or errored. Skips never fail a run.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.reports.iter().any(|report| report.outcome.is_failure())
    }
}

/// Runs cases against one gate and fixture.
#[derive(Debug, Clone, Copy)]
pub struct Runner<'a> {
    gate: &'a CapabilityGate,
    fixture: &'a FixtureTemplate,
    workers: usize,
}

impl<'a> Runner<'a> {
    /// Creates a runner with `workers` threads (at least one).
    #[must_use]
    pub fn new(gate: &'a CapabilityGate, fixture: &'a FixtureTemplate, workers: usize) -> Self {
        Self {
            gate,
            fixture,
            workers: workers.max(1),
        }
    }

    /// Runs `cases` and returns their reports in the order given.
    #[must_use]
    pub fn run(&self, cases: &[&'static ContractCase]) -> RunSummary {
        let workers = self.workers.min(cases.len()).max(1);
        tracing::info!(cases = cases.len(), workers, "starting run");

        let reports = if workers == 1 {
            cases.iter().map(|case| self.run_case(case)).collect()
        } else {
            self.run_parallel(cases, workers)
        };

        let summary = RunSummary::new(reports);
        let tally = summary.tally();
        tracing::info!(
            passed = tally.passed,
            skipped = tally.skipped,
            failed = tally.failed,
            errored = tally.errored,
            "run finished"
        );
        summary
    }

    fn run_parallel(&self, cases: &[&'static ContractCase], workers: usize) -> Vec<CaseReport> {
        let next = AtomicUsize::new(0);

        let mut indexed: Vec<(usize, CaseReport)> = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(|| {
                        let mut completed = Vec::new();
                        loop {
                            let index = next.fetch_add(1, Ordering::Relaxed);
                            let Some(case) = cases.get(index) else {
                                break;
                            };
                            completed.push((index, self.run_case(case)));
                        }
                        completed
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        });

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, report)| report).collect()
    }

    fn run_case(&self, case: &ContractCase) -> CaseReport {
        tracing::debug!(case = case.id(), "running case");
        let context = CaseContext::new(self.gate, self.fixture);

        let started = Instant::now();
        let outcome = case.run(&context);
        let elapsed = started.elapsed();

        match &outcome {
            CaseOutcome::Passed => tracing::info!(case = case.id(), "passed"),
            CaseOutcome::Skipped(reason) => {
                tracing::info!(case = case.id(), "skipped: {reason}");
            }
            CaseOutcome::Failed(violation) => {
                tracing::warn!(case = case.id(), "failed: {violation}");
            }
            CaseOutcome::Errored(error) => tracing::warn!(case = case.id(), "errored: {error}"),
        }

        CaseReport {
            id: case.id(),
            group: case.group(),
            title: case.title(),
            outcome,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rstest::rstest;

    use super::{CaseReport, RunSummary, Runner, Tally};
    use crate::cases::{CaseGroup, catalogue};
    use crate::config::{ConfigResolver, EnvironmentSnapshot, FixedEnvironment};
    use crate::fixture::FixtureTemplate;
    use crate::gate::{CapabilityGate, SkipReason};
    use crate::outcome::{CaseOutcome, ContractViolation};

    fn report(id: &'static str, outcome: CaseOutcome) -> CaseReport {
        CaseReport {
            id,
            group: CaseGroup::Auth,
            title: "title",
            outcome,
            elapsed: Duration::ZERO,
        }
    }

    #[rstest]
    fn tally_counts_each_category() {
        let summary = RunSummary::new(vec![
            report("a", CaseOutcome::Passed),
            report("b", CaseOutcome::Skipped(SkipReason::new("unset"))),
            report("c", CaseOutcome::Skipped(SkipReason::new("unset"))),
            report(
                "d",
                CaseOutcome::Failed(ContractViolation::new("status", "401", "200")),
            ),
        ]);

        assert_eq!(
            summary.tally(),
            Tally {
                passed: 1,
                skipped: 2,
                failed: 1,
                errored: 0,
            }
        );
        assert_eq!(summary.tally().total(), 4);
        assert!(summary.has_failures());
    }

    #[rstest]
    fn skips_alone_do_not_fail_the_run() {
        let summary = RunSummary::new(vec![
            report("a", CaseOutcome::Passed),
            report("b", CaseOutcome::Skipped(SkipReason::new("unset"))),
        ]);

        assert!(!summary.has_failures());
    }

    #[rstest]
    #[case::sequential(1)]
    #[case::parallel(4)]
    #[case::more_workers_than_cases(64)]
    fn reports_follow_catalogue_order(#[case] workers: usize) {
        let resolver = ConfigResolver::new(
            Arc::new(FixedEnvironment::default()),
            Arc::new(EnvironmentSnapshot::empty()),
        );
        let fixture =
            FixtureTemplate::build(&resolver, Duration::from_secs(1)).expect("client should build");
        let gate = CapabilityGate::new(resolver);
        let cases = catalogue();

        let summary = Runner::new(&gate, &fixture, workers).run(&cases);

        let ids: Vec<_> = summary.reports().iter().map(|report| report.id).collect();
        let expected: Vec<_> = cases.iter().map(|case| case.id()).collect();
        assert_eq!(ids, expected);
        assert_eq!(summary.tally().skipped, cases.len());
    }

    #[rstest]
    fn empty_selection_yields_empty_summary() {
        let resolver = ConfigResolver::new(
            Arc::new(FixedEnvironment::default()),
            Arc::new(EnvironmentSnapshot::empty()),
        );
        let fixture =
            FixtureTemplate::build(&resolver, Duration::from_secs(1)).expect("client should build");
        let gate = CapabilityGate::new(resolver);

        let summary = Runner::new(&gate, &fixture, 3).run(&[]);

        assert!(summary.reports().is_empty());
        assert!(!summary.has_failures());
    }
}
