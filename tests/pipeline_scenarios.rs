//! 翻译流水线场景测试
//!
//! 覆盖状态机的完整往返、重试的中间状态与增量查询的游标语义

use std::time::Duration;

use chat_translate::chat::{ChatError, RetryRequest, TranslationStatus};
use chat_translate::storage::MessageStore;
use chat_translate::translation::ProviderError;

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{create_request, Behavior, TestApp};

fn retry_to(target: &str) -> RetryRequest {
    RetryRequest {
        target_language: Some(target.to_string()),
    }
}

#[tokio::test]
async fn test_created_messages_reach_a_terminal_state() {
    for behavior in [Behavior::Translate, Behavior::Fail, Behavior::Hang] {
        let app = TestApp::with_timeout(behavior, Duration::from_millis(100));
        let created = app
            .service
            .create_message(create_request("Привет", Some("en")))
            .unwrap();
        assert_eq!(created.translation_status, TranslationStatus::Pending);

        app.settle().await;

        let status = app.status(created.id);
        assert_ne!(status, TranslationStatus::Pending, "{:?}", behavior);
        let expected = if behavior == Behavior::Translate {
            TranslationStatus::Success
        } else {
            TranslationStatus::Failed
        };
        assert_eq!(status, expected);
    }
}

#[tokio::test]
async fn test_success_invariants() {
    let app = TestApp::new(Behavior::Translate);
    for text in ["¡Hola!", "Привет", "こんにちは", "Straße"] {
        app.service
            .create_message(create_request(text, Some("en")))
            .unwrap();
    }
    app.settle().await;

    for message in app.store.list_all().unwrap() {
        assert_eq!(message.translation_status, TranslationStatus::Success);
        assert!(!message.translated_text.unwrap_or_default().is_empty());
        assert!(message.detected_language.is_some());
    }
}

#[tokio::test]
async fn test_retry_is_pending_while_in_flight() {
    let app = TestApp::new(Behavior::Fail);
    let created = app
        .service
        .create_message(create_request("Привет", Some("en")))
        .unwrap();
    app.settle().await;
    assert_eq!(app.status(created.id), TranslationStatus::Failed);

    app.backend.set_behavior(Behavior::Translate);
    app.backend.set_delay(Duration::from_millis(100));

    let service = app.service.clone();
    let id = created.id;
    let retry = tokio::spawn(async move { service.retry_translation(id, retry_to("en")).await });

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(app.status(id), TranslationStatus::Pending);

    let finished = retry.await.unwrap().unwrap();
    assert_eq!(finished.translation_status, TranslationStatus::Success);
    assert_eq!(finished.translated_text.as_deref(), Some("Hi"));
    assert_eq!(app.status(id), TranslationStatus::Success);
}

#[tokio::test]
async fn test_retry_reports_timeout() {
    let app = TestApp::with_timeout(Behavior::Hang, Duration::from_millis(50));
    let created = app
        .service
        .create_message(create_request("Привет", None))
        .unwrap();

    let err = app
        .service
        .retry_translation(created.id, retry_to("en"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ChatError::Provider(ProviderError::Timeout(Duration::from_millis(50)))
    );
    let message = app.message(created.id);
    assert_eq!(message.translation_status, TranslationStatus::Failed);
    assert_eq!(message.translated_text.as_deref(), Some(""));
}

#[tokio::test]
async fn test_repeated_failures_have_no_cap() {
    let app = TestApp::new(Behavior::Fail);
    let created = app
        .service
        .create_message(create_request("Привет", None))
        .unwrap();

    for _ in 0..5 {
        assert!(app
            .service
            .retry_translation(created.id, retry_to("en"))
            .await
            .is_err());
        assert_eq!(app.status(created.id), TranslationStatus::Failed);
    }
    assert_eq!(app.backend.call_count(), 5);
}

#[tokio::test]
async fn test_submit_and_retry_on_one_message_do_not_overlap() {
    let app = TestApp::new(Behavior::Translate);
    app.backend.set_delay(Duration::from_millis(50));

    let created = app
        .service
        .create_message(create_request("Привет", Some("en")))
        .unwrap();
    // 让后台尝试先拿到锁
    tokio::task::yield_now().await;
    assert_eq!(app.backend.call_count(), 1);

    let retried = app
        .service
        .retry_translation(created.id, retry_to("fr"))
        .await
        .unwrap();
    app.settle().await;

    // 重试在后台尝试之后获得锁，因此它的结果是最终结果
    assert_eq!(app.backend.call_count(), 2);
    assert_eq!(retried.translated_text.as_deref(), Some("[fr] Привет"));
    assert_eq!(app.message(created.id), retried);
}

#[tokio::test]
async fn test_since_cursor_never_returns_older_messages() {
    let app = TestApp::new(Behavior::Translate);

    let mut cursor = None;
    for round in 0..5 {
        app.service
            .create_message(create_request(&format!("round {}", round), None))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;

        let batch = match cursor {
            None => app.service.list_messages().unwrap(),
            Some(since) => app.service.list_messages_since(since).unwrap(),
        };

        for message in &batch {
            if let Some(since) = cursor {
                assert!(message.timestamp >= since);
            }
        }
        let newest = batch.iter().map(|m| m.timestamp).max();
        assert!(newest >= cursor);
        cursor = newest;
    }

    let all = app.service.list_messages().unwrap();
    assert_eq!(all.len(), 5);
    let tail = app.service.list_messages_since(all[4].timestamp).unwrap();
    assert!(tail.iter().any(|m| m.id == all[4].id));
}

#[tokio::test]
async fn test_wait_idle_drains_background_work() {
    let app = TestApp::new(Behavior::Translate);
    app.backend.set_delay(Duration::from_millis(20));

    for i in 0..10 {
        app.service
            .create_message(create_request(&format!("Привет {}", i), Some("en")))
            .unwrap();
    }
    assert!(app.service.pipeline().in_flight() > 0);

    app.settle().await;
    assert_eq!(app.service.pipeline().in_flight(), 0);
    assert_eq!(app.backend.call_count(), 10);
}
