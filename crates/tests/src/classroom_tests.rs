use crate::fixtures::test_app::TestApp;
use aula_services::provider::ProviderSessionStatus;
use serde_json::Value;

#[tokio::test]
async fn create_classroom() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/api/classroom",
            &serde_json::json!({
                "room_name": "algebra-101",
                "university_id": "uni-1",
                "account_id": "admin-1",
                "privilege": 99,
                "mark_attendance": true,
            }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["unique_name"], "algebra-101");
    assert_eq!(json["status"], "INACTIVE");
    assert_eq!(json["external_session_id"], Value::Null);
    assert_eq!(json["members"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_classroom_below_privilege_threshold_is_forbidden() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/api/classroom",
            &serde_json::json!({
                "room_name": "algebra-101",
                "university_id": "uni-1",
                "account_id": "admin-1",
                "privilege": 50,
            }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn create_classroom_requires_a_room_name() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/api/classroom",
            &serde_json::json!({
                "room_name": "",
                "university_id": "uni-1",
                "account_id": "admin-1",
                "privilege": 99,
            }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn provision_assigns_an_external_session_id() {
    let app = TestApp::spawn().await;
    let id = app.seed_classroom("algebra-101").await;

    let resp = app
        .post_json(&format!("/api/classroom/{id}/provision"), &serde_json::json!({}))
        .await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    // Room name derives from (unique_name, creator, university)
    assert_eq!(json["external_session_id"], "RMalgebra-101admin-1uni-1");
    assert_eq!(app.provider.create_calls(), 1);
}

#[tokio::test]
async fn provision_failure_surfaces_the_mapped_provider_message() {
    let app = TestApp::spawn().await;
    let id = app.seed_classroom("algebra-101").await;

    app.provider.fail_create_with_code(53113);
    let resp = app
        .post_json(&format!("/api/classroom/{id}/provision"), &serde_json::json!({}))
        .await;

    assert_eq!(resp.status().as_u16(), 502);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Room exists!");

    // Classroom stays local: no session id assigned
    let resp = app.get(&format!("/api/classroom/{id}")).await;
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["external_session_id"], Value::Null);
}

#[tokio::test]
async fn end_without_a_session_removes_the_classroom() {
    let app = TestApp::spawn().await;
    let id = app.seed_classroom("algebra-101").await;

    let resp = app
        .post_json(
            &format!("/api/classroom/{id}/end"),
            &serde_json::json!({ "privilege": 99 }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["ended"], true);

    // Terminal: the record is gone and every later operation is a 404
    assert_eq!(app.get(&format!("/api/classroom/{id}")).await.status().as_u16(), 404);
    let resp = app
        .post_json(
            &format!("/api/classroom/{id}/end"),
            &serde_json::json!({ "privilege": 99 }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 404);

    assert_eq!(app.provider.status_calls(), 0);
    assert_eq!(app.provider.complete_calls(), 0);
}

#[tokio::test]
async fn end_below_privilege_threshold_is_forbidden_and_changes_nothing() {
    let app = TestApp::spawn().await;
    let id = app.seed_classroom("algebra-101").await;

    let resp = app
        .post_json(
            &format!("/api/classroom/{id}/end"),
            &serde_json::json!({ "privilege": 50 }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 403);

    assert_eq!(app.get(&format!("/api/classroom/{id}")).await.status().as_u16(), 200);
}

#[tokio::test]
async fn end_skips_completion_when_the_provider_already_reports_completed() {
    let app = TestApp::spawn().await;
    let id = app.seed_classroom("algebra-101").await;
    app.post_json(&format!("/api/classroom/{id}/provision"), &serde_json::json!({}))
        .await;

    app.provider.set_status(ProviderSessionStatus::Completed);
    let resp = app
        .post_json(
            &format!("/api/classroom/{id}/end"),
            &serde_json::json!({ "privilege": 99 }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);

    assert_eq!(app.provider.status_calls(), 1);
    assert_eq!(app.provider.complete_calls(), 0);
    assert_eq!(app.get(&format!("/api/classroom/{id}")).await.status().as_u16(), 404);
}

#[tokio::test]
async fn end_completes_a_live_session_before_removing_the_classroom() {
    let app = TestApp::spawn().await;
    let id = app.seed_classroom("algebra-101").await;
    app.post_json(&format!("/api/classroom/{id}/provision"), &serde_json::json!({}))
        .await;

    let resp = app
        .post_json(
            &format!("/api/classroom/{id}/end"),
            &serde_json::json!({ "privilege": 99 }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);

    assert_eq!(app.provider.complete_calls(), 1);
    assert_eq!(app.get(&format!("/api/classroom/{id}")).await.status().as_u16(), 404);
}

#[tokio::test]
async fn end_failure_leaves_the_classroom_provisioned_for_retry() {
    let app = TestApp::spawn().await;
    let id = app.seed_classroom("algebra-101").await;
    app.post_json(&format!("/api/classroom/{id}/provision"), &serde_json::json!({}))
        .await;

    app.provider.set_fail_complete(true);
    let resp = app
        .post_json(
            &format!("/api/classroom/{id}/end"),
            &serde_json::json!({ "privilege": 99 }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 502);
    assert_eq!(app.get(&format!("/api/classroom/{id}")).await.status().as_u16(), 200);

    // The caller retries the whole end() once the provider recovers
    app.provider.set_fail_complete(false);
    let resp = app
        .post_json(
            &format!("/api/classroom/{id}/end"),
            &serde_json::json!({ "privilege": 99 }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(app.get(&format!("/api/classroom/{id}")).await.status().as_u16(), 404);
}

#[tokio::test]
async fn update_merges_only_supplied_fields() {
    let app = TestApp::spawn().await;
    let id = app.seed_classroom("algebra-101").await;

    let resp = app
        .put_json(
            &format!("/api/classroom/{id}"),
            &serde_json::json!({
                "privilege": 99,
                "status": "ACTIVE",
                "teacher_id": "teacher-7",
            }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ACTIVE");
    assert_eq!(json["teacher_id"], "teacher-7");
    assert_eq!(json["unique_name"], "algebra-101");
}

#[tokio::test]
async fn listing_classrooms_by_university_filters_on_the_id() {
    let app = TestApp::spawn().await;
    app.seed_classroom("algebra-101").await;
    app.seed_classroom("geometry-201").await;

    let resp = app.get("/api/classroom/university/uni-1").await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(json.len(), 2);

    let resp = app.get("/api/classroom/university/uni-2").await;
    let json: Vec<Value> = resp.json().await.unwrap();
    assert!(json.is_empty());
}

#[tokio::test]
async fn participants_require_a_provisioned_session() {
    let app = TestApp::spawn().await;
    let id = app.seed_classroom("algebra-101").await;

    let resp = app.get(&format!("/api/classroom/{id}/participant")).await;
    assert_eq!(resp.status().as_u16(), 400);

    app.post_json(&format!("/api/classroom/{id}/provision"), &serde_json::json!({}))
        .await;
    let resp = app.get(&format!("/api/classroom/{id}/participant")).await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["participants"].as_array().unwrap().len(), 1);
}
