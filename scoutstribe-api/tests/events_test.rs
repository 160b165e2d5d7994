/// Integration tests for events, attendance and statistics

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_event_creation_permissions() {
    let ctx = TestContext::new();
    let leader = ctx.leader_token().await;
    let counselor = ctx.counselor_token().await;

    let (status, _) = ctx
        .post(
            "/api/events",
            &counselor,
            json!({ "name": "Spring Camp", "date": "2026-04-10", "type": "global" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .post(
            "/api/events",
            &counselor,
            json!({ "name": "Ninth Hike", "date": "2026-04-10", "type": "grade", "grade": "9" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .post(
            "/api/events",
            &counselor,
            json!({ "name": "Eighth Hike", "date": "2026-04-11", "type": "grade" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["grade"], "8");
    assert_eq!(body["type"], "grade");
    assert_eq!(body["createdBy"], 3);

    let (status, body) = ctx
        .post(
            "/api/events",
            &leader,
            json!({ "name": "Spring Camp", "date": "2026-04-10", "type": "global" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["grade"], json!(null));
}

#[tokio::test]
async fn test_event_validation() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;

    let (status, _) = ctx
        .post(
            "/api/events",
            &admin,
            json!({ "name": "Camp", "date": "10/04/2026", "type": "global" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .post(
            "/api/events",
            &admin,
            json!({ "name": "Camp", "date": "2026-04-10", "type": "tribe" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .post(
            "/api/events",
            &admin,
            json!({ "name": "Camp", "date": "2026-04-10", "type": "grade" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .post("/api/events", &admin, json!({ "date": "2026-04-10", "type": "global" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_counselor_sees_global_and_own_grade_events() {
    let ctx = TestContext::new();
    let leader = ctx.leader_token().await;
    let counselor = ctx.counselor_token().await;

    for (name, event_type, grade) in [
        ("Camp", "global", None),
        ("Eighth Hike", "grade", Some("8")),
        ("Ninth Hike", "grade", Some("9")),
    ] {
        let (status, _) = ctx
            .post(
                "/api/events",
                &leader,
                json!({ "name": name, "date": "2026-05-01", "type": event_type, "grade": grade }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = ctx.get("/api/events", &leader).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = ctx.get("/api/events", &counselor).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|event| event["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Camp", "Eighth Hike"]);
}

#[tokio::test]
async fn test_grade_event_attendance_and_stats() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;

    let seventh = ctx.create_member(&admin, "Noa", "7", "2025").await;
    let eighth = ctx.create_member(&admin, "Tal", "8", "2025").await;
    let staff = ctx.create_member(&admin, "Omer", "operations", "2025").await;

    let (_, event) = ctx
        .post(
            "/api/events",
            &admin,
            json!({ "name": "Seventh Hike", "date": "2026-05-02", "type": "grade", "grade": "7" }),
        )
        .await;
    let uri = format!("/api/events/{}/attendance", event["id"]);

    // Eighth graders are not eligible for a seventh grade event
    let (status, _) = ctx.post(&uri, &admin, json!({ "attendees": [eighth] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx.post(&uri, &admin, json!({ "attendees": [99] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx
        .post(&uri, &admin, json!({ "attendees": [seventh, staff] }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["attendance"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row["attended"] == true));

    let (status, stats) = ctx.get("/api/events/stats", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats[0]["eventName"], "Seventh Hike");
    assert_eq!(stats[0]["totalAttendees"], 2);
    assert_eq!(stats[0]["gradeAttendance"]["7"], 1);
    assert_eq!(stats[0]["gradeAttendance"]["operations"], 1);

    // Recording again replaces the earlier rows
    let (status, body) = ctx.post(&uri, &admin, json!({ "attendees": [seventh] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attendance"].as_array().unwrap().len(), 2);

    let (_, stats) = ctx.get("/api/events/stats", &admin).await;
    assert_eq!(stats[0]["totalAttendees"], 1);
    assert!(stats[0]["gradeAttendance"].get("operations").is_none());
}

#[tokio::test]
async fn test_global_event_attendance_covers_every_member() {
    let ctx = TestContext::new();
    let leader = ctx.leader_token().await;
    let counselor = ctx.counselor_token().await;

    let first = ctx.create_member(&leader, "Noa", "7", "2025").await;
    ctx.create_member(&leader, "Tal", "8", "2025").await;
    ctx.create_member(&leader, "Dana", "shachbag", "2025").await;

    let (_, event) = ctx
        .post(
            "/api/events",
            &leader,
            json!({ "name": "Camp", "date": "2026-06-01", "type": "global" }),
        )
        .await;
    let uri = format!("/api/events/{}/attendance", event["id"]);

    let (status, _) = ctx.post(&uri, &counselor, json!({ "attendees": [] })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx.post(&uri, &leader, json!({ "attendees": [first] })).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["attendance"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows.iter().filter(|row| row["attended"] == true).count(), 1);

    let (status, _) = ctx.get("/api/events/stats", &counselor).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .post("/api/events/42/attendance", &leader, json!({ "attendees": [] }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_counselor_records_own_grade_attendance() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;
    let counselor = ctx.counselor_token().await;

    let member = ctx.create_member(&counselor, "Noa", "8", "2025").await;

    let (_, own) = ctx
        .post(
            "/api/events",
            &counselor,
            json!({ "name": "Eighth Hike", "date": "2026-05-02", "type": "grade" }),
        )
        .await;
    let (_, other) = ctx
        .post(
            "/api/events",
            &admin,
            json!({ "name": "Ninth Hike", "date": "2026-05-02", "type": "grade", "grade": "9" }),
        )
        .await;

    let (status, _) = ctx
        .post(
            &format!("/api/events/{}/attendance", own["id"]),
            &counselor,
            json!({ "attendees": [member] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .post(
            &format!("/api/events/{}/attendance", other["id"]),
            &counselor,
            json!({ "attendees": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_labelled_grade_event_admits_numeric_members() {
    let ctx = TestContext::new();
    let counselor = ctx.counselor_token().await;

    let member = ctx.create_member(&counselor, "Noa", "8", "2025").await;

    let (status, event) = ctx
        .post(
            "/api/events",
            &counselor,
            json!({ "name": "Eighth Hike", "date": "2026-05-02", "type": "grade", "grade": "Grade 8" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = ctx
        .post(
            &format!("/api/events/{}/attendance", event["id"]),
            &counselor,
            json!({ "attendees": [member] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "attendance rejected: {}", body);

    let rows = body["attendance"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["memberId"], member);
    assert_eq!(rows[0]["attended"], true);
}

#[tokio::test]
async fn test_blank_event_fields_are_rejected() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;

    let (status, body) = ctx
        .post(
            "/api/events",
            &admin,
            json!({ "name": "   ", "date": "2026-05-02", "type": "global" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "Name, date and type are required");
    assert_eq!(body["details"][0]["field"], "name");
}
