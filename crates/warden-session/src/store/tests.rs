use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use warden_core::error::WardenError;
use warden_core::events::{Event, EventKind, HookEvent};

use super::SessionEventStore;

fn create_test_store() -> (SessionEventStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionEventStore::new(temp_dir.path());
    (store, temp_dir)
}

async fn create_session(store: &SessionEventStore) -> String {
    store.create_session(HashMap::new()).await.unwrap()
}

#[tokio::test]
async fn test_create_session_writes_metadata() {
    let (store, temp) = create_test_store();
    let mut metadata = HashMap::new();
    metadata.insert("cwd".to_string(), "/work".to_string());

    let id = store.create_session(metadata).await.unwrap();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert!(temp.path().join("sessions").join(&id).join("meta.json").exists());

    let meta = store.load_metadata(&id).await.unwrap().unwrap();
    assert_eq!(meta.session_id, id);
    assert_eq!(meta.metadata.get("cwd").map(String::as_str), Some("/work"));
    assert!(meta.created_at > 0.0);
    assert!(store.session_exists(&id).await);
}

#[tokio::test]
async fn test_session_dir_rejects_bad_ids() {
    let (store, _temp) = create_test_store();
    for id in ["", "abc", "../0123456789abcdef0123456789abcd", "zz23456789abcdef0123456789abcdef"] {
        let err = store.session_dir(id).unwrap_err();
        assert!(matches!(err, WardenError::InvalidInput { .. }), "{id}");
    }
    assert!(!store.session_exists("abc").await);
}

#[tokio::test]
async fn test_appends_number_from_one() {
    let (store, _temp) = create_test_store();
    let id = create_session(&store).await;

    for i in 0..5 {
        let stamped = store
            .append_event(&id, Event::user_message(format!("message {i}")))
            .await
            .unwrap();
        assert_eq!(stamped.seq, Some(i + 1));
        assert!(stamped.ts.is_some());
    }

    let events = store.read_events(&id).await.unwrap();
    let seqs: Vec<u64> = events.iter().filter_map(|e| e.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3, 4, 5]);
    assert!(matches!(&events[2].kind, EventKind::UserMessage(m) if m.text == "message 2"));
}

#[tokio::test]
async fn test_delta_is_never_written() {
    let (store, temp) = create_test_store();
    let id = create_session(&store).await;

    let delta = Event::assistant_delta("partial");
    let returned = store.append_event(&id, delta.clone()).await.unwrap();
    assert_eq!(returned, delta);
    assert!(returned.seq.is_none());
    assert!(!temp.path().join("sessions").join(&id).join("events.jsonl").exists());
    assert!(store.read_events(&id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_append_creates_missing_session_dir() {
    let (store, _temp) = create_test_store();
    let id = "0123456789abcdef0123456789abcdef";
    let stamped = store
        .append_event(id, Event::runtime_error("boom", true))
        .await
        .unwrap();
    assert_eq!(stamped.seq, Some(1));
    assert_eq!(store.read_events(id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_restart_continues_sequence() {
    let (store, temp) = create_test_store();
    let id = create_session(&store).await;
    for _ in 0..3 {
        store
            .append_event(&id, Event::assistant_message("hi"))
            .await
            .unwrap();
    }
    drop(store);

    let reopened = SessionEventStore::new(temp.path());
    let stamped = reopened
        .append_event(&id, Event::tool_use("toolu_1", "Read", json!({"file_path": "a"})))
        .await
        .unwrap();
    assert_eq!(stamped.seq, Some(4));
}

#[tokio::test]
async fn test_recovery_skips_corrupt_tail() {
    let (store, temp) = create_test_store();
    let id = create_session(&store).await;
    store.append_event(&id, Event::user_message("a")).await.unwrap();
    store.append_event(&id, Event::user_message("b")).await.unwrap();

    let log = temp.path().join("sessions").join(&id).join("events.jsonl");
    let mut content = std::fs::read_to_string(&log).unwrap();
    content.push_str("{\"type\":\"user_message\",\"text\":\"no seq\"}\n{\"type\":\"trunc\n\n");
    std::fs::write(&log, content).unwrap();

    let reopened = SessionEventStore::new(temp.path());
    assert_eq!(reopened.infer_next_seq(&id).await.unwrap(), 3);
}

#[tokio::test]
async fn test_recovery_survives_torn_utf8_tail() {
    let (store, temp) = create_test_store();
    let id = create_session(&store).await;
    store.append_event(&id, Event::user_message("a")).await.unwrap();
    store.append_event(&id, Event::user_message("b")).await.unwrap();

    let log = temp.path().join("sessions").join(&id).join("events.jsonl");
    let mut bytes = std::fs::read(&log).unwrap();
    bytes.extend_from_slice(b"{\"type\":\"user_message\",\"text\":\"\xE4\xB8");
    std::fs::write(&log, bytes).unwrap();

    let reopened = SessionEventStore::new(temp.path());
    let stamped = reopened
        .append_event(&id, Event::user_message("c"))
        .await
        .unwrap();
    assert_eq!(stamped.seq, Some(3));
}

#[tokio::test]
async fn test_recovery_looks_past_a_long_unreadable_tail() {
    let (store, temp) = create_test_store();
    let id = create_session(&store).await;
    store.append_event(&id, Event::user_message("a")).await.unwrap();

    let log = temp.path().join("sessions").join(&id).join("events.jsonl");
    let mut bytes = std::fs::read(&log).unwrap();
    bytes.extend(std::iter::repeat_n(b'x', 100 * 1024));
    bytes.push(b'\n');
    std::fs::write(&log, bytes).unwrap();

    let reopened = SessionEventStore::new(temp.path());
    assert_eq!(reopened.infer_next_seq(&id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_infer_next_seq_on_empty_log() {
    let (store, _temp) = create_test_store();
    let id = create_session(&store).await;
    assert_eq!(store.infer_next_seq(&id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_read_events_edge_cases() {
    let (store, _temp) = create_test_store();
    assert!(store.read_events("not-a-session").await.unwrap().is_empty());
    let id = create_session(&store).await;
    assert!(store.read_events(&id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_read_events_reports_bad_line() {
    let (store, temp) = create_test_store();
    let id = create_session(&store).await;
    store.append_event(&id, Event::user_message("ok")).await.unwrap();

    let log = temp.path().join("sessions").join(&id).join("events.jsonl");
    let mut content = std::fs::read_to_string(&log).unwrap();
    content.push_str("\n{\"text\":\"missing type\"}\n");
    std::fs::write(&log, content).unwrap();

    let err = store.read_events(&id).await.unwrap_err();
    assert!(matches!(err, WardenError::Json { .. }));
    assert!(err.to_string().contains("line 3"));
}

#[tokio::test]
async fn test_passthrough_and_hook_events_persist() {
    let (store, _temp) = create_test_store();
    let id = create_session(&store).await;

    let custom = Event::from_json_line(r#"{"type":"plan_update","steps":["a","b"]}"#).unwrap();
    store.append_event(&id, custom).await.unwrap();
    let audit = HookEvent {
        hook_point: "PreToolUse".to_string(),
        matcher: "guard".to_string(),
        matched: true,
        duration_ms: 3,
        action: Some("checked".to_string()),
    };
    store.append_event(&id, audit.clone().into()).await.unwrap();

    let events = store.read_events(&id).await.unwrap();
    assert_eq!(events[0].event_type(), "plan_update");
    assert_eq!(events[0].seq, Some(1));
    assert!(matches!(&events[1].kind, EventKind::HookEvent(h) if *h == audit));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_get_unique_seqs() {
    let (store, _temp) = create_test_store();
    let store = Arc::new(store);
    let id = create_session(&store).await;

    let tasks = (0..20).map(|i| {
        let store = store.clone();
        let id = id.clone();
        tokio::spawn(async move {
            store
                .append_event(&id, Event::tool_result(format!("toolu_{i}"), json!("ok"), false))
                .await
                .unwrap()
                .seq
                .unwrap()
        })
    });
    let mut seqs: Vec<u64> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    seqs.sort_unstable();
    assert_eq!(seqs, (1..=20).collect::<Vec<u64>>());

    let on_disk: Vec<u64> = store
        .read_events(&id)
        .await
        .unwrap()
        .iter()
        .filter_map(|e| e.seq)
        .collect();
    assert_eq!(on_disk, (1..=20).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_list_sessions_newest_first() {
    let (store, temp) = create_test_store();
    let first = create_session(&store).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = create_session(&store).await;

    std::fs::create_dir_all(temp.path().join("sessions").join("ffffffffffffffffffffffffffffffff"))
        .unwrap();
    std::fs::create_dir_all(temp.path().join("sessions").join("scratch")).unwrap();

    let sessions = store.list_sessions().await.unwrap();
    let ids: Vec<&str> = sessions.iter().map(|s| s.session_id.as_str()).collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);
}

#[tokio::test]
async fn test_list_sessions_without_root() {
    let (store, _temp) = create_test_store();
    assert!(store.list_sessions().await.unwrap().is_empty());
}
