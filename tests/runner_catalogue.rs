//! Whole-catalogue runs: skip-only runs, ordering under parallel workers, and
//! the rendered reports.

mod support;

use std::error::Error;

use restcontract::report::write_report;
use restcontract::{CaseOutcome, ReportFormat, Runner, cases};
use rstest::rstest;
use serde_json::Value;
use support::{Harness, TargetServer};
use wiremock::matchers::method;
use wiremock::{Mock, ResponseTemplate};

type TestResult<T> = Result<T, Box<dyn Error>>;

#[rstest]
fn unconfigured_run_skips_every_case() {
    let harness = Harness::with(&[]);
    let catalogue = cases::catalogue();

    let summary = Runner::new(&harness.gate, &harness.fixture, 4).run(&catalogue);

    let tally = summary.tally();
    assert_eq!(tally.skipped, catalogue.len());
    assert_eq!(tally.total(), catalogue.len());
    assert!(!summary.has_failures());
}

#[rstest]
#[case::sequential(1)]
#[case::parallel(8)]
fn reports_follow_catalogue_order(#[case] workers: usize) {
    let target = TargetServer::start();
    target.mount(Mock::given(method("GET")).respond_with(ResponseTemplate::new(404)));
    let harness = target.harness(&[("PROTECTED_ENDPOINT", "/users"), ("AUTH_TOKEN", "t")]);
    let catalogue = cases::catalogue();

    let summary = Runner::new(&harness.gate, &harness.fixture, workers).run(&catalogue);

    let reported: Vec<&str> = summary.reports().iter().map(|report| report.id).collect();
    let expected: Vec<&str> = catalogue.iter().map(|case| case.id()).collect();
    assert_eq!(reported, expected);
}

#[rstest]
fn failing_case_marks_the_run_as_failed() {
    let target = TargetServer::start();
    target.mount(Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)));
    let harness = target.harness(&[("PROTECTED_ENDPOINT", "/users")]);
    let selected = cases::select(None, Some("get-003-nonexistent-id"));

    let summary = Runner::new(&harness.gate, &harness.fixture, 1).run(&selected);

    assert!(summary.has_failures());
    let [report] = summary.reports() else {
        panic!("expected one report");
    };
    assert!(matches!(report.outcome, CaseOutcome::Failed(_)));
}

#[rstest]
fn jsonl_report_has_one_record_per_case() -> TestResult<()> {
    let harness = Harness::with(&[]);
    let selected = cases::select(Some(cases::CaseGroup::Headers), None);
    let summary = Runner::new(&harness.gate, &harness.fixture, 2).run(&selected);

    let mut buffer = Vec::new();
    write_report(&mut buffer, &summary, ReportFormat::Jsonl)?;
    let output = String::from_utf8(buffer)?;

    let records = output
        .lines()
        .map(serde_json::from_str::<Value>)
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(records.len(), selected.len());
    for record in &records {
        assert_eq!(record.get("group"), Some(&Value::from("headers")));
        assert_eq!(record.get("outcome"), Some(&Value::from("skipped")));
    }
    Ok(())
}

#[rstest]
fn text_report_ends_with_the_tally() -> TestResult<()> {
    let harness = Harness::with(&[]);
    let selected = cases::select(Some(cases::CaseGroup::Delete), None);
    let summary = Runner::new(&harness.gate, &harness.fixture, 1).run(&selected);

    let mut buffer = Vec::new();
    write_report(&mut buffer, &summary, ReportFormat::Text)?;
    let output = String::from_utf8(buffer)?;

    let expected = format!(
        "{0} cases: 0 passed, {0} skipped, 0 failed, 0 errored",
        selected.len()
    );
    assert_eq!(output.lines().last(), Some(expected.as_str()));
    Ok(())
}
