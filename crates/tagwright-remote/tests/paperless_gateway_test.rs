//! Integration tests for the Paperless gateway against a mock remote.

use std::time::Duration;

use serde_json::json;
use tagwright_core::{EntityKind, EntityUpdate, Error, MatchingAlgorithm, MetadataGateway};
use tagwright_remote::PaperlessClient;
use wiremock::matchers::{body_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> PaperlessClient {
    PaperlessClient::with_default_timeout(&server.uri(), "secret").expect("client")
}

fn tag_json(id: i64, name: &str, count: u64) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "slug": name.to_lowercase(),
        "color": "#ff0000",
        "matching_algorithm": 0,
        "match": "",
        "is_insensitive": true,
        "document_count": count
    })
}

#[tokio::test]
async fn test_list_all_follows_absolute_next_links() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": null,
            "results": [tag_json(3, "gamma", 0)]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .and(query_param("page_size", "100"))
        .and(header("Authorization", "Token secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": format!("{}/api/tags/?page=2&page_size=100", server.uri()),
            "results": [tag_json(1, "alpha", 4), tag_json(2, "beta", 1)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tags = client(&server)
        .gateway(EntityKind::Tag)
        .list_all()
        .await
        .expect("list_all should succeed");

    let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    assert_eq!(tags[0].document_count, 4);
    assert_eq!(tags[0].color.as_deref(), Some("#ff0000"));
}

#[tokio::test]
async fn test_list_all_follows_relative_next_links() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/correspondents/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next": null,
            "results": [{"id": 2, "name": "Bank"}]
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/correspondents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next": "/api/correspondents/?page=2&page_size=100",
            "results": [{"id": 1, "name": "ACME", "matching_algorithm": 6}]
        })))
        .mount(&server)
        .await;

    let correspondents = client(&server)
        .gateway(EntityKind::Correspondent)
        .list_all()
        .await
        .unwrap();

    assert_eq!(correspondents.len(), 2);
    assert!(correspondents[0].is_auto());
    assert!(correspondents[0].color.is_none());
}

#[tokio::test]
async fn test_get_by_name_uses_case_insensitive_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .and(query_param("name__iexact", "Invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [tag_json(9, "invoices", 2)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .and(query_param("name__iexact", "missing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = client(&server).gateway(EntityKind::Tag);
    let found = gateway.get_by_name("Invoices").await.unwrap();
    assert_eq!(found.map(|t| t.id), Some(9));
    assert!(gateway.get_by_name("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_posts_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/document_types/"))
        .and(body_json(json!({"name": "Contract"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 42, "name": "Contract", "slug": "contract"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server)
        .gateway(EntityKind::DocumentType)
        .create("Contract")
        .await
        .unwrap();
    assert_eq!(created.id, 42);
    assert_eq!(created.document_count, 0);
}

#[tokio::test]
async fn test_update_drops_color_for_correspondents() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/correspondents/3/"))
        .and(body_json(json!({"name": "New Name", "matching_algorithm": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "name": "New Name", "matching_algorithm": 3, "document_count": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let update = EntityUpdate {
        name: Some("New Name".to_string()),
        color: Some("#000000".to_string()),
        matching_algorithm: Some(MatchingAlgorithm::Literal),
        ..Default::default()
    };
    let updated = client(&server)
        .gateway(EntityKind::Correspondent)
        .update(3, &update)
        .await
        .unwrap();
    assert_eq!(updated.match_type_name(), "Literal");
}

#[tokio::test]
async fn test_documents_for_tag() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .and(query_param("tags__id__in", "7"))
        .and(query_param("page_size", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next": null,
            "results": [{"id": 10, "title": "a"}, {"id": 11, "title": "b"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let docs = client(&server)
        .gateway(EntityKind::Tag)
        .documents_for(7)
        .await
        .unwrap();
    let ids: Vec<_> = docs.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![10, 11]);
}

#[tokio::test]
async fn test_documents_for_correspondent_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .and(query_param("correspondent__id", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let docs = client(&server)
        .gateway(EntityKind::Correspondent)
        .documents_for(5)
        .await
        .unwrap();
    assert!(docs.is_empty());
}

#[tokio::test]
async fn test_assign_uses_kind_specific_bulk_edit_method() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/documents/bulk_edit/"))
        .and(body_json(json!({
            "documents": [10, 11],
            "method": "set_document_type",
            "parameters": {"document_type": 4}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "OK"})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .gateway(EntityKind::DocumentType)
        .assign_to_documents(&[10, 11], 4)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_assign_with_no_documents_makes_no_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    client(&server)
        .gateway(EntityKind::Tag)
        .assign_to_documents(&[], 4)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bulk_delete_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/bulk_edit_objects/"))
        .and(body_json(json!({
            "objects": [1, 2],
            "object_type": "tags",
            "operation": "delete"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "OK"})))
        .expect(1)
        .mount(&server)
        .await;

    let report = client(&server)
        .gateway(EntityKind::Tag)
        .bulk_delete(&[1, 2])
        .await
        .unwrap();
    assert_eq!(report.deleted, 2);
    assert!(report.is_complete());
    assert!(!report.used_fallback);
}

#[tokio::test]
async fn test_bulk_delete_empty_makes_no_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = client(&server)
        .gateway(EntityKind::Tag)
        .bulk_delete(&[])
        .await
        .unwrap();
    assert_eq!(report.requested, 0);
}

#[tokio::test]
async fn test_bulk_delete_falls_back_on_404_and_continues_past_failures() {
    let server = MockServer::start().await;
    let ids: Vec<i64> = (1..=23).collect();

    Mock::given(method("POST"))
        .and(path("/api/bulk_edit_objects/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/correspondents/5/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("locked"))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/api/correspondents/\d+/$"))
        .respond_with(ResponseTemplate::new(204))
        .expect(22)
        .mount(&server)
        .await;

    let report = client(&server)
        .gateway(EntityKind::Correspondent)
        .bulk_delete(&ids)
        .await
        .expect("fallback never fails as a whole");

    assert!(report.used_fallback);
    assert_eq!(report.requested, 23);
    assert_eq!(report.deleted, 22);
    assert_eq!(report.failed, vec![5]);
}

#[tokio::test]
async fn test_bulk_delete_other_status_is_surfaced_without_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/bulk_edit_objects/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .gateway(EntityKind::Tag)
        .bulk_delete(&[1, 2, 3])
        .await
        .unwrap_err();

    match err {
        Error::Remote { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bulk_delete_timeout_is_uncertain() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/bulk_edit_objects/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let client =
        PaperlessClient::new(&server.uri(), "secret", Duration::from_millis(200)).unwrap();
    let err = client
        .gateway(EntityKind::Tag)
        .bulk_delete(&[1, 2, 3])
        .await
        .unwrap_err();

    match err {
        Error::Timeout(msg) => {
            assert!(msg.contains("deleting 3 tags"));
            assert!(msg.contains("may still be deleted"));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_custom_fields_listed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/custom_fields/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next": null,
            "results": [
                {"id": 1, "name": "Amount", "data_type": "monetary"},
                {"id": 2, "name": "Due", "data_type": "date"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fields = client(&server).list_custom_fields().await.unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].type_name(), "Monetary");
}

#[tokio::test]
async fn test_connection_rejected_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .and(query_param("page_size", "1"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token."})),
        )
        .mount(&server)
        .await;

    let err = client(&server).test_connection().await.unwrap_err();
    assert!(matches!(err, Error::Remote { status: 401, .. }));
}
