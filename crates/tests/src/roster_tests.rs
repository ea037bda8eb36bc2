use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn adding_members_twice_keeps_a_single_entry_per_account() {
    let app = TestApp::spawn().await;
    let id = app.seed_classroom("algebra-101").await;

    let body = serde_json::json!({ "account_ids": ["s1", "s2"] });
    let resp = app.post_json(&format!("/api/classroom/{id}/member"), &body).await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["members"].as_array().unwrap().len(), 2);

    // Re-adding the same accounts neither errors nor duplicates
    let resp = app.post_json(&format!("/api/classroom/{id}/member"), &body).await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    let members = json["members"].as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0]["final_grade"], 0.0);
}

#[tokio::test]
async fn removing_an_absent_member_succeeds_without_change() {
    let app = TestApp::spawn().await;
    let id = app.seed_classroom("algebra-101").await;

    app.post_json(
        &format!("/api/classroom/{id}/member"),
        &serde_json::json!({ "account_ids": ["s1"] }),
    )
    .await;

    let resp = app
        .delete_json(
            &format!("/api/classroom/{id}/member"),
            &serde_json::json!({ "account_ids": ["ghost"] }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["members"].as_array().unwrap().len(), 1);

    let resp = app
        .delete_json(
            &format!("/api/classroom/{id}/member"),
            &serde_json::json!({ "account_ids": ["s1"] }),
        )
        .await;
    let json: Value = resp.json().await.unwrap();
    assert!(json["members"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn member_operations_against_an_ended_classroom_are_not_found() {
    let app = TestApp::spawn().await;
    let id = app.seed_classroom("algebra-101").await;

    app.post_json(
        &format!("/api/classroom/{id}/end"),
        &serde_json::json!({ "privilege": 99 }),
    )
    .await;

    let resp = app
        .post_json(
            &format!("/api/classroom/{id}/member"),
            &serde_json::json!({ "account_ids": ["s1"] }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn concurrent_adds_to_one_roster_lose_no_members() {
    let app = TestApp::spawn().await;
    let id = app.seed_classroom("algebra-101").await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let client = app.client.clone();
        let url = app.url(&format!("/api/classroom/{id}/member"));
        handles.push(tokio::spawn(async move {
            let resp = client
                .post(url)
                .json(&serde_json::json!({ "account_ids": [format!("s{i}")] }))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status().as_u16(), 200);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let resp = app.get(&format!("/api/classroom/{id}")).await;
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["members"].as_array().unwrap().len(), 8);
}
