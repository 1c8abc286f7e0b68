//! Tests for values derived from raw harness settings.

use std::time::Duration;

use camino::Utf8PathBuf;
use rstest::rstest;

use crate::HarnessConfig;
use crate::cases::CaseGroup;
use crate::config::ReportFormat;
use crate::error::HarnessError;

#[rstest]
#[case::unset(None, ".env")]
#[case::blank(Some("   "), ".env")]
#[case::custom(Some("config/staging.env"), "config/staging.env")]
fn override_file_defaults_to_dotenv(#[case] env_file: Option<&str>, #[case] expected: &str) {
    let config = HarnessConfig {
        env_file: env_file.map(ToOwned::to_owned),
        ..Default::default()
    };

    assert_eq!(config.override_file(), Utf8PathBuf::from(expected));
}

#[rstest]
#[case::zero_selects_default(0, Duration::from_secs(10))]
#[case::explicit(3, Duration::from_secs(3))]
fn request_timeout_is_bounded(#[case] secs: u64, #[case] expected: Duration) {
    let config = HarnessConfig {
        request_timeout_secs: secs,
        ..Default::default()
    };

    assert_eq!(config.request_timeout(), expected);
}

#[rstest]
fn worker_count_never_drops_below_one() {
    let config = HarnessConfig {
        workers: 0,
        ..Default::default()
    };

    assert_eq!(config.worker_count(), 1);
}

#[rstest]
#[case::none(None, Ok(None))]
#[case::auth(Some("auth"), Ok(Some(CaseGroup::Auth)))]
#[case::mixed_case(Some("Post-Create"), Ok(Some(CaseGroup::PostCreate)))]
fn group_filter_parses_known_groups(
    #[case] group: Option<&str>,
    #[case] expected: Result<Option<CaseGroup>, HarnessError>,
) {
    let config = HarnessConfig {
        group: group.map(ToOwned::to_owned),
        ..Default::default()
    };

    assert_eq!(config.group_filter(), expected);
}

#[rstest]
fn unknown_group_is_a_configuration_error() {
    let config = HarnessConfig {
        group: Some("billing".to_owned()),
        ..Default::default()
    };

    assert!(matches!(
        config.group_filter(),
        Err(HarnessError::Configuration { .. })
    ));
}

#[rstest]
#[case::default(None, ReportFormat::Text)]
#[case::text(Some("text"), ReportFormat::Text)]
#[case::jsonl(Some("JSONL"), ReportFormat::Jsonl)]
fn report_format_parses(#[case] format: Option<&str>, #[case] expected: ReportFormat) {
    let config = HarnessConfig {
        format: format.map(ToOwned::to_owned),
        ..Default::default()
    };

    assert_eq!(config.report_format(), Ok(expected));
}

#[rstest]
fn unknown_report_format_is_rejected() {
    let config = HarnessConfig {
        format: Some("xml".to_owned()),
        ..Default::default()
    };

    assert!(config.report_format().is_err());
}
