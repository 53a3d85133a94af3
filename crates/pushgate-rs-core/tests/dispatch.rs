//! Tests for dispatch client behavior against test channels.

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use pushgate_rs_channel::{ChannelError, GatewayEnvironment};
use pushgate_rs_config::{ConfigError, PathError, RawConfig};
use pushgate_rs_core::{DispatchClient, DispatchError, EnvelopeBuilder};
use pushgate_rs_protocol::{DeliveryReport, DeviceOutcome, NotificationOptions};
use pushgate_rs_test_utils::{
    FailAt, FailingChannel, RecordingChannel, TEST_KEY_CONTENTS, raw_config, write_config_file,
    write_key_file,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

/// Wait until the channel has seen `expected` closes, or give up.
async fn wait_for_closes(closed: impl Fn() -> usize, expected: usize) {
    for _ in 0..100 {
        if closed() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Options flow into the envelope; the topic comes from config.
#[tokio::test]
async fn send_builds_envelope_from_config_and_options() {
    let temp = tempdir().expect("tempdir");
    let key = write_key_file(temp.path(), "key.p8");
    let raw = RawConfig {
        key_id: Some("K".to_string()),
        team_id: Some("T".to_string()),
        bundle_id: Some("com.a.b".to_string()),
        device_token: Some("D".to_string()),
        key_path: Some(key.to_string_lossy().to_string()),
        production: None,
    };
    let channel = Arc::new(RecordingChannel::new());
    let client = DispatchClient::from_raw(raw, channel.clone()).expect("client");

    let result = client
        .send(json!({}), &NotificationOptions::new().badge(5))
        .await
        .expect("send");

    assert_eq!(result.success, true);
    assert_eq!(result.sent, vec![DeviceOutcome::sent("D")]);
    let sends = channel.sends();
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0].envelope.badge, 5);
    assert_eq!(sends[0].envelope.topic, "com.a.b");
    assert_eq!(sends[0].envelope.payload, json!({}));
    assert_eq!(sends[0].device_token, "D");
    assert_eq!(channel.opened(), 1);
    assert_eq!(channel.closed(), 1);
}

fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0)
        .single()
        .expect("timestamp")
}

/// A pinned clock on the client fixes the envelope expiry.
#[tokio::test]
async fn envelope_builder_clock_sets_expiry() {
    let temp = tempdir().expect("tempdir");
    let key = write_key_file(temp.path(), "key.p8");
    let channel = Arc::new(RecordingChannel::new());
    let client = DispatchClient::from_raw(raw_config(&key), channel.clone())
        .expect("client")
        .with_envelope_builder(EnvelopeBuilder::with_clock(fixed_now));

    client
        .send(json!({}), &NotificationOptions::default())
        .await
        .expect("send");
    client
        .send(json!({}), &NotificationOptions::new().expiry(120))
        .await
        .expect("send");

    let sends = channel.sends();
    assert_eq!(sends[0].envelope.expiry, 1_700_003_600);
    assert_eq!(sends[1].envelope.expiry, 1_700_000_120);
}

/// Channel credentials come from the config and the key file contents.
#[tokio::test]
async fn channel_auth_uses_key_bytes_and_environment() {
    let temp = tempdir().expect("tempdir");
    let key = write_key_file(temp.path(), "AuthKey_TEST.p8");
    let mut raw = raw_config(&key);
    raw.production = Some(true);
    let channel = Arc::new(RecordingChannel::new());
    let client = DispatchClient::from_raw(raw, channel.clone())
        .expect("client")
        .with_timeouts(Duration::from_secs(1), Duration::from_secs(2));

    client
        .send(json!({ "message": "hi" }), &NotificationOptions::default())
        .await
        .expect("send");

    let auths = channel.auths();
    assert_eq!(auths.len(), 1);
    assert_eq!(auths[0].key, TEST_KEY_CONTENTS.as_bytes().to_vec());
    assert_eq!(auths[0].key_id, "TEST_KEY_ID");
    assert_eq!(auths[0].team_id, "TEST_TEAM_ID");
    assert_eq!(auths[0].environment, GatewayEnvironment::Production);
    assert_eq!(auths[0].connection_timeout, Duration::from_secs(1));
    assert_eq!(auths[0].request_timeout, Duration::from_secs(2));
}

/// A report with only failures is returned as an unsuccessful result.
#[tokio::test]
async fn failed_devices_are_not_success() {
    let temp = tempdir().expect("tempdir");
    let key = write_key_file(temp.path(), "key.p8");
    let report = DeliveryReport {
        sent: Vec::new(),
        failed: vec![DeviceOutcome::failed(
            "test_device_token",
            400,
            "BadDeviceToken",
        )],
    };
    let channel = Arc::new(RecordingChannel::new().with_report(report.clone()));
    let client = DispatchClient::from_raw(raw_config(&key), channel).expect("client");

    let result = client
        .send_custom(json!({ "custom": true }), &NotificationOptions::default())
        .await
        .expect("send");
    assert_eq!(result.success, false);
    assert_eq!(result.failed, report.failed);
    assert_eq!(result.raw_result, report);
}

/// Send failures are wrapped, the handle is released, and the client stays usable.
#[tokio::test]
async fn send_failure_releases_handle_and_wraps_error() {
    let temp = tempdir().expect("tempdir");
    let key = write_key_file(temp.path(), "key.p8");
    let channel = Arc::new(FailingChannel::new(FailAt::Send));
    let client = DispatchClient::from_raw(raw_config(&key), channel.clone()).expect("client");

    for attempt in 1..=2 {
        let err = client
            .send(json!({}), &NotificationOptions::default())
            .await
            .expect_err("failure");
        match &err {
            DispatchError::Channel(ChannelError::Transport(message)) => {
                assert_eq!(message, "gateway unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("push notification failed"));
        assert_eq!(channel.opened(), attempt);
        assert_eq!(channel.closed(), attempt);
    }
}

/// A failed open has no handle to release.
#[tokio::test]
async fn open_failure_does_not_close() {
    let temp = tempdir().expect("tempdir");
    let key = write_key_file(temp.path(), "key.p8");
    let channel = Arc::new(FailingChannel::new(FailAt::Open));
    let client = DispatchClient::from_raw(raw_config(&key), channel.clone()).expect("client");

    let err = client
        .send(json!({}), &NotificationOptions::default())
        .await
        .expect_err("failure");
    assert!(matches!(
        err,
        DispatchError::Channel(ChannelError::Auth(_))
    ));
    assert_eq!(channel.closed(), 0);
}

/// Dropping the send future mid-flight still closes the handle.
#[tokio::test]
async fn cancelled_send_releases_handle() {
    let temp = tempdir().expect("tempdir");
    let key = write_key_file(temp.path(), "key.p8");
    let channel = Arc::new(RecordingChannel::stalling());
    let client = DispatchClient::from_raw(raw_config(&key), channel.clone()).expect("client");

    let options = NotificationOptions::default();
    let outcome =
        tokio::time::timeout(Duration::from_millis(50), client.send(json!({}), &options)).await;
    assert!(outcome.is_err());
    assert_eq!(channel.opened(), 1);

    wait_for_closes(|| channel.closed(), 1).await;
    assert_eq!(channel.closed(), 1);
}

/// A panicking channel still gets its handle closed.
#[tokio::test]
async fn panicking_send_releases_handle() {
    let temp = tempdir().expect("tempdir");
    let key = write_key_file(temp.path(), "key.p8");
    let channel = Arc::new(FailingChannel::new(FailAt::Panic));
    let client = Arc::new(
        DispatchClient::from_raw(raw_config(&key), channel.clone()).expect("client"),
    );

    let task = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client
                .send(json!({}), &NotificationOptions::default())
                .await
        })
    };
    assert!(task.await.is_err());

    wait_for_closes(|| channel.closed(), 1).await;
    assert_eq!(channel.closed(), 1);
}

/// A key file removed after validation surfaces as a dispatch error.
#[tokio::test]
async fn missing_key_at_send_time_is_dispatch_error() {
    let temp = tempdir().expect("tempdir");
    let key = write_key_file(temp.path(), "key.p8");
    let channel = Arc::new(RecordingChannel::new());
    let client = DispatchClient::from_raw(raw_config(&key), channel.clone()).expect("client");
    std::fs::remove_file(&key).expect("remove");

    let err = client
        .send(json!({}), &NotificationOptions::default())
        .await
        .expect_err("failure");
    match err {
        DispatchError::KeyRead { path, .. } => assert_eq!(path, key),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(channel.opened(), 0);
}

/// Concurrent sends on one client each use their own handle.
#[tokio::test]
async fn concurrent_sends_use_separate_handles() {
    let temp = tempdir().expect("tempdir");
    let key = write_key_file(temp.path(), "key.p8");
    let channel = Arc::new(RecordingChannel::new());
    let client = Arc::new(
        DispatchClient::from_raw(raw_config(&key), channel.clone()).expect("client"),
    );

    let mut tasks = Vec::new();
    for badge in 0..5 {
        let client = Arc::clone(&client);
        tasks.push(tokio::spawn(async move {
            client
                .send(json!({}), &NotificationOptions::new().badge(badge))
                .await
        }));
    }
    for task in tasks {
        task.await.expect("join").expect("send");
    }

    let mut handle_ids: Vec<_> = channel.sends().iter().map(|send| send.handle_id).collect();
    handle_ids.sort();
    handle_ids.dedup();
    assert_eq!(handle_ids.len(), 5);
    assert_eq!(channel.closed(), 5);
}

/// Clients can be built straight from a config file.
#[tokio::test]
async fn client_from_config_file() {
    let temp = tempdir().expect("tempdir");
    let key = write_key_file(temp.path(), "key.p8");
    let config_path = write_config_file(temp.path(), "config.json", &raw_config(&key));
    let channel = Arc::new(RecordingChannel::new());

    let client = DispatchClient::from_config_file(&config_path, channel).expect("client");
    assert_eq!(client.config().bundle_id(), "com.test.app");
    assert_eq!(client.config().key_path(), key.as_path());
}

/// Traversal in the key path fails construction before any existence check.
#[tokio::test]
async fn traversal_key_path_fails_construction() {
    let channel = Arc::new(RecordingChannel::new());
    let raw = RawConfig {
        key_id: Some("K".to_string()),
        team_id: Some("T".to_string()),
        bundle_id: Some("com.a.b".to_string()),
        device_token: Some("D".to_string()),
        key_path: Some("/tmp/../etc/passwd".to_string()),
        production: None,
    };

    let err = DispatchClient::from_raw(raw, channel.clone()).expect_err("error");
    assert!(matches!(
        err,
        ConfigError::InvalidKeyPath(PathError::Traversal { .. })
    ));
    assert_eq!(channel.opened(), 0);
}
