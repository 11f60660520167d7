//! Behavioral tests for the audit event lifecycle.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;

use audithub_core::error::ErrorKind;
use audithub_entity::audit::{AuditEventFilter, UpdateStatusRequest};
use audithub_service::AuditService;

use common::{audit_config, create_request, MemoryStore};

fn service(store: Arc<MemoryStore>) -> AuditService {
    AuditService::new(store, None, audit_config())
}

#[tokio::test]
async fn create_applies_defaults_and_normalization() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(Arc::clone(&store));

    let created = svc.create(create_request()).await.unwrap();

    assert_eq!(created.method, "POST");
    assert_eq!(created.status, "pending");
    assert!(created.meta.is_empty());
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(store.create_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn create_honors_explicit_status() {
    let svc = service(Arc::new(MemoryStore::new()));

    let mut req = create_request();
    req.status = Some("processing".to_string());
    let created = svc.create(req).await.unwrap();
    assert_eq!(created.status, "processing");
}

#[tokio::test]
async fn create_rejects_unknown_status_naming_the_vocabulary() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(Arc::clone(&store));

    let mut req = create_request();
    req.status = Some("exploded".to_string());
    let err = svc.create(req).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidInput);
    assert!(err.message.contains("exploded"));
    assert!(err.message.contains("pending"));
    assert!(err.message.contains("archived"));
    assert_eq!(store.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn create_with_bad_ip_never_reaches_the_store() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(Arc::clone(&store));

    let mut req = create_request();
    req.ip = "999.999.0.1".to_string();
    let err = svc.create(req).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(store.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn create_reports_all_violations_at_once() {
    let svc = service(Arc::new(MemoryStore::new()));

    let mut req = create_request();
    req.tenant_id = String::new();
    req.method = "TELEPORT".to_string();
    let err = svc.create(req).await.unwrap_err();

    assert!(err.message.contains("tenant_id"));
    assert!(err.message.contains("method"));
}

#[tokio::test]
async fn get_round_trips_a_created_event() {
    let svc = service(Arc::new(MemoryStore::new()));

    let created = svc.create(create_request()).await.unwrap();
    let fetched = svc.get(&created.id.to_string()).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_preserves_supplied_meta_on_fetch() {
    let svc = service(Arc::new(MemoryStore::new()));

    let mut req = create_request();
    req.meta = Some(std::collections::HashMap::from([
        ("attempt".to_string(), json!(1)),
        ("source".to_string(), json!("gateway")),
    ]));

    let created = svc.create(req).await.unwrap();
    let fetched = svc.get(&created.id.to_string()).await.unwrap();

    assert_eq!(fetched.meta.len(), 2);
    assert_eq!(fetched.meta["attempt"], json!(1));
    assert_eq!(fetched.meta["source"], json!("gateway"));
    assert_eq!(fetched.meta, created.meta);
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let svc = service(Arc::new(MemoryStore::new()));
    let err = svc
        .get("3fa85f64-5717-4562-b3fc-2c963f66afa6")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn get_malformed_id_is_invalid_input() {
    let svc = service(Arc::new(MemoryStore::new()));
    let err = svc.get("not-a-uuid").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
}

#[tokio::test]
async fn list_clamps_pagination_before_hitting_the_store() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(Arc::clone(&store));

    let filter = AuditEventFilter {
        limit: 5000,
        offset: -3,
        ..Default::default()
    };
    svc.list(&filter).await.unwrap();

    let seen = store.list_calls.lock().unwrap();
    assert_eq!(seen[0].limit, 1000);
    assert_eq!(seen[0].offset, 0);
}

#[tokio::test]
async fn list_rejects_inverted_date_range() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(Arc::clone(&store));

    let filter = AuditEventFilter {
        start_date: Some(Utc::now()),
        end_date: Some(Utc::now() - Duration::days(1)),
        ..Default::default()
    };
    let err = svc.list(&filter).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidInput);
    assert!(store.list_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn list_filters_and_paginates() {
    let svc = service(Arc::new(MemoryStore::new()));

    for i in 0..3 {
        let mut req = create_request();
        req.user_id = format!("user-{i}");
        svc.create(req).await.unwrap();
    }
    let mut other = create_request();
    other.tenant_id = "tenant-2".to_string();
    svc.create(other).await.unwrap();

    let filter = AuditEventFilter {
        tenant_id: Some("tenant-1".to_string()),
        limit: 2,
        ..Default::default()
    };
    let page = svc.list(&filter).await.unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.data.len(), 2);
    assert!(page.has_more);
    assert!(page.data.iter().all(|e| e.tenant_id == "tenant-1"));
}

#[tokio::test]
async fn delete_removes_and_second_delete_is_not_found() {
    let svc = service(Arc::new(MemoryStore::new()));

    let created = svc.create(create_request()).await.unwrap();
    let id = created.id.to_string();

    svc.delete(&id).await.unwrap();
    let err = svc.delete(&id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn update_status_replaces_only_supplied_parts() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(Arc::clone(&store));

    let mut req = create_request();
    req.data = Some(json!({"k": "v"}));
    let created = svc.create(req).await.unwrap();

    let update = UpdateStatusRequest {
        status: "completed".to_string(),
        data: None,
        meta: None,
    };
    svc.update_status(&created.id.to_string(), &update)
        .await
        .unwrap();

    let after = svc.get(&created.id.to_string()).await.unwrap();
    assert_eq!(after.status, "completed");
    assert_eq!(after.data, Some(json!({"k": "v"})));
    assert!(after.updated_at >= after.created_at);
}

#[tokio::test]
async fn update_status_can_replace_data_and_meta() {
    let svc = service(Arc::new(MemoryStore::new()));

    let created = svc.create(create_request()).await.unwrap();
    let update = UpdateStatusRequest {
        status: "failed".to_string(),
        data: Some(json!({"error": "timeout"})),
        meta: Some(std::collections::HashMap::from([(
            "retries".to_string(),
            json!(3),
        )])),
    };
    svc.update_status(&created.id.to_string(), &update)
        .await
        .unwrap();

    let after = svc.get(&created.id.to_string()).await.unwrap();
    assert_eq!(after.data, Some(json!({"error": "timeout"})));
    assert_eq!(after.meta["retries"], json!(3));
}

#[tokio::test]
async fn update_status_validates_vocabulary() {
    let svc = service(Arc::new(MemoryStore::new()));

    let created = svc.create(create_request()).await.unwrap();
    let update = UpdateStatusRequest {
        status: "bogus".to_string(),
        data: None,
        meta: None,
    };
    let err = svc
        .update_status(&created.id.to_string(), &update)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
}

#[tokio::test]
async fn update_status_requires_a_status() {
    let svc = service(Arc::new(MemoryStore::new()));
    let created = svc.create(create_request()).await.unwrap();

    let update = UpdateStatusRequest {
        status: String::new(),
        data: None,
        meta: None,
    };
    let err = svc
        .update_status(&created.id.to_string(), &update)
        .await
        .unwrap_err();
    assert!(err.message.contains("status is required"));
}

#[tokio::test]
async fn stats_counts_totals_and_errors_separately() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(Arc::clone(&store));

    for status in ["pending", "failed", "completed", "failed"] {
        let mut req = create_request();
        req.status = Some(status.to_string());
        svc.create(req).await.unwrap();
    }

    let start = Utc::now() - Duration::hours(1);
    let end = Utc::now() + Duration::hours(1);
    let stats = svc.stats("tenant-1", start, end).await.unwrap();

    assert_eq!(stats.total_logs, 4);
    assert_eq!(stats.error_count, 2);
    assert_eq!(stats.tenant_id, "tenant-1");
    assert_eq!(stats.period.start_date, start);

    let counts = store.count_calls.lock().unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[1].status.as_deref(), Some("failed"));
}

#[tokio::test]
async fn stats_requires_tenant_and_ordered_range() {
    let svc = service(Arc::new(MemoryStore::new()));
    let now = Utc::now();

    let err = svc.stats("", now, now).await.unwrap_err();
    assert!(err.message.contains("tenant_id"));

    let err = svc
        .stats("tenant-1", now, now - Duration::days(1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
}
