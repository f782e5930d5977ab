use std::time::Duration;

use relayform_contact::{
    NOT_NOTIFIED_NOTICE, PageContext, SinkConfig, SinkKind, SubmissionOutcome, Submitter,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, method, path},
};

mod helpers;

use helpers::{NOTIFICATION_PATH, UNREACHABLE_URL, WEBHOOK_PATH};

#[tokio::test]
async fn test_webhook_ok_notification_down_is_success_with_notice() {
    let server = MockServer::start().await;
    helpers::mount(&server, WEBHOOK_PATH, helpers::html_ok()).await;
    helpers::mount(
        &server,
        NOTIFICATION_PATH,
        helpers::json(500, json!({"error": "SMTP down"})),
    )
    .await;

    let submission = Submitter::new()
        .submit(&helpers::form(), &helpers::page(), &helpers::sinks(&server))
        .await;

    assert_eq!(
        submission.outcome,
        SubmissionOutcome::Success {
            notice: Some(NOT_NOTIFIED_NOTICE.to_owned())
        }
    );
    assert_eq!(submission.results.len(), 2);
    assert_eq!(submission.results[1].sink, SinkKind::Notification);
    assert_eq!(
        submission.results[1].error_detail().as_deref(),
        Some("SMTP down")
    );
}

#[tokio::test]
async fn test_both_sinks_accept() {
    let server = MockServer::start().await;
    helpers::mount(&server, WEBHOOK_PATH, helpers::json(200, json!({"success": true}))).await;
    helpers::mount(
        &server,
        NOTIFICATION_PATH,
        helpers::json(200, json!({"success": true})),
    )
    .await;

    let submission = Submitter::new()
        .submit(&helpers::form(), &helpers::page(), &helpers::sinks(&server))
        .await;

    assert_eq!(submission.outcome, SubmissionOutcome::Success { notice: None });
    assert!(submission.results.iter().all(|r| r.is_success()));
}

#[tokio::test]
async fn test_all_failed_reports_last_failure() {
    let server = MockServer::start().await;
    helpers::mount(
        &server,
        NOTIFICATION_PATH,
        helpers::json(200, json!({"success": false, "error": "Missing required fields"})),
    )
    .await;

    let config = SinkConfig::new()
        .with_webhook(UNREACHABLE_URL, None)
        .with_notification(format!("{}{NOTIFICATION_PATH}", server.uri()))
        .with_timeout(Duration::from_secs(5));

    let submission = Submitter::new()
        .submit(&helpers::form(), &helpers::page(), &config)
        .await;

    assert_eq!(
        submission.outcome,
        SubmissionOutcome::Failure {
            message: "Missing required fields".to_owned()
        }
    );

    let webhook = &submission.results[0];
    assert_eq!(webhook.sink, SinkKind::Webhook);
    assert!(
        webhook
            .failure_message()
            .is_some_and(|m| m.starts_with("Spreadsheet webhook: "))
    );
}

#[tokio::test]
async fn test_no_sinks_posts_once_to_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(NOTIFICATION_PATH))
        .respond_with(helpers::json(200, json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let config = SinkConfig::new().with_fallback(format!("{}{NOTIFICATION_PATH}", server.uri()));

    let submission = Submitter::new()
        .submit(&helpers::form(), &PageContext::default(), &config)
        .await;

    assert_eq!(submission.results.len(), 1);
    assert!(submission.outcome.is_success());
}

#[tokio::test]
async fn test_fallback_failure_is_labelled_as_notification_sink() {
    let server = MockServer::start().await;
    helpers::mount(
        &server,
        NOTIFICATION_PATH,
        helpers::json(502, json!({"error": "relay offline"})),
    )
    .await;

    let config = SinkConfig::new().with_fallback(format!("{}{NOTIFICATION_PATH}", server.uri()));

    let submission = Submitter::new()
        .submit(&helpers::form(), &PageContext::default(), &config)
        .await;

    assert_eq!(submission.results[0].sink, SinkKind::Notification);
    assert_eq!(
        submission.outcome,
        SubmissionOutcome::Failure {
            message: "Email API: relay offline".to_owned()
        }
    );
}

#[tokio::test]
async fn test_webhook_receives_secret_metadata_and_page_context() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .and(body_string_contains("secret=s3cret"))
        .and(body_string_contains("category=Quote"))
        .and(body_string_contains("sourcePath=%2Fcontact"))
        .respond_with(helpers::html_ok())
        .expect(1)
        .mount(&server)
        .await;
    helpers::mount(
        &server,
        NOTIFICATION_PATH,
        helpers::json(200, json!({"success": true})),
    )
    .await;

    let config = helpers::sinks(&server).with_metadata("category", "Quote");

    let submission = Submitter::new()
        .submit(&helpers::form(), &helpers::page(), &config)
        .await;

    assert_eq!(submission.outcome, SubmissionOutcome::Success { notice: None });
}

#[tokio::test]
async fn test_settle_order_does_not_change_outcome() {
    let mut outcomes = Vec::new();

    for (webhook_delay, notification_delay) in [(0, 200), (200, 0)] {
        let server = MockServer::start().await;
        helpers::mount(
            &server,
            WEBHOOK_PATH,
            helpers::html_ok().set_delay(Duration::from_millis(webhook_delay)),
        )
        .await;
        helpers::mount(
            &server,
            NOTIFICATION_PATH,
            helpers::json(200, json!({"success": false, "error": "quota"}))
                .set_delay(Duration::from_millis(notification_delay)),
        )
        .await;

        let submission = Submitter::new()
            .submit(&helpers::form(), &helpers::page(), &helpers::sinks(&server))
            .await;

        let kinds: Vec<_> = submission.results.iter().map(|r| r.sink).collect();
        assert_eq!(kinds, vec![SinkKind::Webhook, SinkKind::Notification]);

        outcomes.push(submission.outcome);
    }

    assert_eq!(outcomes[0], outcomes[1]);
}

#[tokio::test]
async fn test_slow_sink_times_out_as_failure() {
    let server = MockServer::start().await;
    helpers::mount(
        &server,
        NOTIFICATION_PATH,
        ResponseTemplate::new(200).set_delay(Duration::from_secs(2)),
    )
    .await;

    let config = SinkConfig::new()
        .with_notification(format!("{}{NOTIFICATION_PATH}", server.uri()))
        .with_timeout(Duration::from_millis(100));

    let submission = Submitter::new()
        .submit(&helpers::form(), &helpers::page(), &config)
        .await;

    assert_eq!(
        submission.outcome,
        SubmissionOutcome::Failure {
            message: "Email API: Request timed out after 100ms".to_owned()
        }
    );
}
