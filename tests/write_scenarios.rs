//! Write cases against a mock target: creation, duplicates, full replacement,
//! partial updates and their preconditions.

mod support;

use restcontract::CaseOutcome;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use support::{Harness, TargetServer};
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, Request, ResponseTemplate};

const TOKEN: &str = "write-token";

#[fixture]
fn target() -> TargetServer {
    TargetServer::start()
}

fn write_harness(target: &TargetServer) -> Harness {
    target.harness(&[
        ("PROTECTED_ENDPOINT", "/users"),
        ("CREATE_ENDPOINT", "/users"),
        ("AUTH_TOKEN", TOKEN),
    ])
}

fn mount_creation(target: &TargetServer, status: u16, times: u64) {
    target.mount(
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({"id": 7})))
            .up_to_n_times(times),
    );
}

#[rstest]
#[case::conflict(409)]
#[case::bad_request(400)]
#[case::unprocessable(422)]
fn duplicate_creation_is_rejected(target: TargetServer, #[case] second_status: u16) {
    mount_creation(&target, 201, 1);
    target.mount(
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(second_status)),
    );

    let outcome = write_harness(&target).run("post-003-duplicate");

    assert_eq!(outcome, CaseOutcome::Passed);
    let requests = target.received_requests();
    assert_eq!(requests.len(), 2);
    let bodies: Vec<&[u8]> = requests.iter().map(|request| request.body.as_slice()).collect();
    assert_eq!(bodies.first(), bodies.get(1), "both POSTs carry the same body");
}

#[rstest]
fn accepted_duplicate_is_a_failure(target: TargetServer) {
    mount_creation(&target, 201, 2);

    let outcome = write_harness(&target).run("post-003-duplicate");

    let CaseOutcome::Failed(violation) = outcome else {
        panic!("a second 201 breaks the duplicate contract, got {outcome}");
    };
    assert_eq!(violation.expected, "400 or 409 or 422");
    assert_eq!(violation.actual, "201");
}

#[rstest]
fn failed_first_creation_skips_the_duplicate_check(target: TargetServer) {
    mount_creation(&target, 500, 1);

    let outcome = write_harness(&target).run("post-003-duplicate");

    assert!(
        matches!(outcome, CaseOutcome::Skipped(_)),
        "expected a precondition skip, got {outcome}"
    );
}

#[rstest]
#[case::accepted(200)]
#[case::rejected(400)]
fn empty_patch_is_tolerated(target: TargetServer, #[case] patch_status: u16) {
    mount_creation(&target, 201, 1);
    target.mount(
        Mock::given(method("PATCH"))
            .and(path("/users/7"))
            .respond_with(ResponseTemplate::new(patch_status).set_body_json(json!({}))),
    );

    let outcome = write_harness(&target).run("patch-004-empty-body");

    assert_eq!(outcome, CaseOutcome::Passed);
}

#[rstest]
fn empty_patch_server_error_is_a_failure(target: TargetServer) {
    mount_creation(&target, 201, 1);
    target.mount(
        Mock::given(method("PATCH"))
            .and(path("/users/7"))
            .respond_with(ResponseTemplate::new(500)),
    );

    let outcome = write_harness(&target).run("patch-004-empty-body");

    assert!(
        matches!(outcome, CaseOutcome::Failed(_)),
        "expected a contract failure, got {outcome}"
    );
}

#[rstest]
fn creation_without_an_id_skips_dependent_cases(target: TargetServer) {
    target.mount(
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "x"}))),
    );

    let outcome = write_harness(&target).run("patch-001-partial-body");

    let CaseOutcome::Skipped(reason) = outcome else {
        panic!("expected a precondition skip, got {outcome}");
    };
    assert!(reason.as_str().contains("has no id"), "{reason}");
}

#[rstest]
fn partial_patch_preserves_unsent_fields(target: TargetServer) {
    mount_creation(&target, 201, 1);
    target.mount(
        Mock::given(method("PATCH"))
            .and(path("/users/7"))
            .respond_with(ResponseTemplate::new(200)),
    );
    target.mount(
        Mock::given(method("GET"))
            .and(path("/users/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7,
                "name": "Someone Else",
                "email": "other@example.com",
                "status": "inactive",
            }))),
    );

    let outcome = write_harness(&target).run("patch-002-only-sent-fields");

    let CaseOutcome::Failed(violation) = outcome else {
        panic!("a changed name breaks the partial-update contract, got {outcome}");
    };
    assert_eq!(violation.expected, "Patch Partial");
    assert_eq!(violation.actual, "Someone Else");
}

/// Answers a creation by echoing the sent fields with an id.
fn echo_created(request: &Request) -> ResponseTemplate {
    let mut body: Value = serde_json::from_slice(&request.body).unwrap_or_else(|_| json!({}));
    if let Some(fields) = body.as_object_mut() {
        fields.insert("id".to_owned(), json!(7));
    }
    ResponseTemplate::new(201).set_body_json(body)
}

fn respond(target: &TargetServer, verb: &str, route: &str, response: ResponseTemplate) {
    target.mount(
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(response),
    );
}

fn passes(outcome: &CaseOutcome) -> bool {
    *outcome == CaseOutcome::Passed
}

#[rstest]
fn duplicate_check_needs_an_id_from_the_first_creation(target: TargetServer) {
    target.mount(
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "x"}))),
    );

    let outcome = write_harness(&target).run("post-003-duplicate");

    let CaseOutcome::Skipped(reason) = outcome else {
        panic!("expected a precondition skip, got {outcome}");
    };
    assert!(reason.as_str().contains("returned no id"), "{reason}");
    assert_eq!(target.received_requests().len(), 1, "no second POST is sent");
}

#[rstest]
fn creation_echoes_the_sent_fields(target: TargetServer) {
    target.mount(
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(header_exists("authorization"))
            .respond_with(echo_created),
    );

    assert_eq!(
        write_harness(&target).run("post-001-created-resource"),
        CaseOutcome::Passed
    );
}

#[rstest]
fn creation_that_renames_the_resource_fails(target: TargetServer) {
    respond(
        &target,
        "POST",
        "/users",
        ResponseTemplate::new(201).set_body_json(json!({
            "id": 7,
            "name": "Someone Else",
            "email": "other@example.com",
        })),
    );

    let outcome = write_harness(&target).run("post-001-created-resource");

    let CaseOutcome::Failed(violation) = outcome else {
        panic!("a renamed resource breaks the echo contract, got {outcome}");
    };
    assert_eq!(violation.expected, "Post Created Resource");
}

#[rstest]
#[case::absent(None, true)]
#[case::absolute(Some("http://api.example.com/users/7"), true)]
#[case::rooted(Some("/users/7"), true)]
#[case::relative(Some("users/7"), false)]
fn location_header_is_usable(
    target: TargetServer,
    #[case] location: Option<&str>,
    #[case] expected: bool,
) {
    let mut response = ResponseTemplate::new(201).set_body_json(json!({"id": 7}));
    if let Some(value) = location {
        response = response.insert_header("location", value);
    }
    respond(&target, "POST", "/users", response);

    let outcome = write_harness(&target).run("post-002-location-header");

    assert_eq!(passes(&outcome), expected, "{outcome}");
}

#[rstest]
#[case::empty_body("post-004-empty-body")]
#[case::invalid_email("post-005-invalid-email")]
#[case::missing_field("post-006-missing-field")]
#[case::wrong_content_type("post-007-wrong-content-type")]
fn invalid_creation_is_rejected(target: TargetServer, #[case] id: &str) {
    respond(&target, "POST", "/users", ResponseTemplate::new(422));

    assert_eq!(write_harness(&target).run(id), CaseOutcome::Passed);
}

#[rstest]
#[case::empty_body("post-004-empty-body")]
#[case::invalid_email("post-005-invalid-email")]
#[case::missing_field("post-006-missing-field")]
#[case::wrong_content_type("post-007-wrong-content-type")]
fn invalid_creation_accepted_is_a_failure(target: TargetServer, #[case] id: &str) {
    respond(
        &target,
        "POST",
        "/users",
        ResponseTemplate::new(201).set_body_json(json!({"id": 7})),
    );

    let outcome = write_harness(&target).run(id);

    assert!(matches!(outcome, CaseOutcome::Failed(_)), "{outcome}");
}

#[rstest]
fn wrong_content_type_is_sent_as_plain_text(target: TargetServer) {
    target.mount(
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(header("content-type", "text/plain"))
            .respond_with(ResponseTemplate::new(415)),
    );

    assert_eq!(
        write_harness(&target).run("post-007-wrong-content-type"),
        CaseOutcome::Passed
    );
}

#[rstest]
fn anonymous_creation_is_rejected(target: TargetServer) {
    respond(&target, "POST", "/users", ResponseTemplate::new(401));

    assert_eq!(
        write_harness(&target).run("post-008-without-auth"),
        CaseOutcome::Passed
    );
}

#[rstest]
fn open_collection_skips_the_anonymous_creation_check(target: TargetServer) {
    respond(
        &target,
        "POST",
        "/users",
        ResponseTemplate::new(201).set_body_json(json!({"id": 7})),
    );

    let outcome = write_harness(&target).run("post-008-without-auth");

    let CaseOutcome::Skipped(reason) = outcome else {
        panic!("expected a capability skip, got {outcome}");
    };
    assert!(reason.as_str().contains("expected 401, got 201"), "{reason}");
}

#[rstest]
#[case::full_body_ok("put-001-valid-body", 200, true)]
#[case::full_body_no_content("put-001-valid-body", 204, true)]
#[case::full_body_crash("put-001-valid-body", 500, false)]
#[case::changed_body_ok("put-002-with-auth", 200, true)]
#[case::changed_body_forbidden("put-002-with-auth", 403, false)]
#[case::invalid_values_rejected("put-003-invalid-values", 422, true)]
#[case::invalid_values_accepted("put-003-invalid-values", 200, false)]
#[case::missing_fields_rejected("put-004-missing-fields", 400, true)]
fn replacement_status(
    target: TargetServer,
    #[case] id: &str,
    #[case] status: u16,
    #[case] expected: bool,
) {
    mount_creation(&target, 201, 1);
    respond(&target, "PUT", "/users/7", ResponseTemplate::new(status));

    let outcome = write_harness(&target).run(id);

    assert_eq!(passes(&outcome), expected, "{outcome}");
    assert!(!matches!(outcome, CaseOutcome::Skipped(_)), "{outcome}");
}

#[rstest]
fn partial_replacement_accepted_skips(target: TargetServer) {
    mount_creation(&target, 201, 1);
    respond(&target, "PUT", "/users/7", ResponseTemplate::new(200));

    let outcome = write_harness(&target).run("put-004-missing-fields");

    let CaseOutcome::Skipped(reason) = outcome else {
        panic!("a target allowing partial PUT is out of scope, got {outcome}");
    };
    assert!(reason.as_str().contains("got 200"), "{reason}");
}

#[rstest]
#[case::not_found(404, true)]
#[case::bad_request(400, true)]
#[case::accepted(200, false)]
fn replacement_of_malformed_id(target: TargetServer, #[case] status: u16, #[case] expected: bool) {
    respond(&target, "PUT", "/users/invalid-id-format", ResponseTemplate::new(status));

    let outcome = write_harness(&target).run("put-005-invalid-id-format");

    assert_eq!(passes(&outcome), expected, "{outcome}");
}

#[rstest]
#[case::applied("inactive", true)]
#[case::ignored("active", false)]
fn partial_patch_is_applied(target: TargetServer, #[case] stored: &str, #[case] expected: bool) {
    mount_creation(&target, 201, 1);
    respond(&target, "PATCH", "/users/7", ResponseTemplate::new(200));
    respond(
        &target,
        "GET",
        "/users/7",
        ResponseTemplate::new(200).set_body_json(json!({"id": 7, "status": stored})),
    );

    let outcome = write_harness(&target).run("patch-001-partial-body");

    assert_eq!(passes(&outcome), expected, "{outcome}");
}

#[rstest]
#[case::authenticated_ok("patch-003-with-auth", 200, true)]
#[case::authenticated_forbidden("patch-003-with-auth", 403, false)]
#[case::invalid_value_rejected("patch-005-invalid-value", 422, true)]
#[case::invalid_value_accepted("patch-005-invalid-value", 200, false)]
fn patch_status(
    target: TargetServer,
    #[case] id: &str,
    #[case] status: u16,
    #[case] expected: bool,
) {
    mount_creation(&target, 201, 1);
    respond(&target, "PATCH", "/users/7", ResponseTemplate::new(status));

    let outcome = write_harness(&target).run(id);

    assert_eq!(passes(&outcome), expected, "{outcome}");
}

#[rstest]
#[case::not_found(404, true)]
#[case::accepted(200, false)]
fn patch_of_unknown_id(target: TargetServer, #[case] status: u16, #[case] expected: bool) {
    respond(&target, "PATCH", "/users/999999999", ResponseTemplate::new(status));

    let outcome = write_harness(&target).run("patch-006-nonexistent-id");

    assert_eq!(passes(&outcome), expected, "{outcome}");
}
