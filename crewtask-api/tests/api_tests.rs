/// Integration tests for the CrewTask API
///
/// These tests verify the full system works end-to-end:
/// - Signup, login, logout and session resolution
/// - Permission checks (admin edit vs assignee completion toggle)
/// - Project listing with progress and ordering
/// - Assignment idempotency
/// - Directory search, collaborators and presence
///
/// They require a running PostgreSQL database. The URL is taken from
/// DATABASE_URL, falling back to a local crewtask_test database.
mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{get, json_request, read_json, unique_email, TestContext};
use serde_json::json;

/// Signup creates an account, login yields a token, /me echoes the user
#[tokio::test]
async fn test_signup_login_me() {
    let mut ctx = TestContext::new().await.unwrap();

    let email = unique_email("signup");
    let (user_id, token) = ctx.signup_and_login(&email, "a long password").await.unwrap();

    let response = ctx.request(get("/v1/auth/me", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["id"], user_id.to_string());
    assert_eq!(body["email"], email);
    assert_eq!(body["firstName"], "Test");
    assert_eq!(body["lastName"], "User");
    assert!(body["avatarUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://www.gravatar.com/avatar/"));
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("password_hash").is_none());

    ctx.delete_user(user_id).await.unwrap();
}

/// Registering the same email twice yields 409
#[tokio::test]
async fn test_signup_duplicate_email() {
    let mut ctx = TestContext::new().await.unwrap();

    let email = unique_email("dup");
    let (user_id, _token) = ctx.signup_and_login(&email, "a long password").await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": email,
                "firstName": "Other",
                "lastName": "Person",
                "password": "another password",
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.request(request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = read_json(response).await;
    assert_eq!(body["error"], "conflict");

    ctx.delete_user(user_id).await.unwrap();
}

/// Malformed signup input yields 422 with per-field details
#[tokio::test]
async fn test_signup_validation_error_shape() {
    let mut ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": "not-an-email",
                "firstName": "",
                "lastName": "User",
                "password": "short",
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.request(request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = read_json(response).await;
    assert_eq!(body["error"], "validation_error");

    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"first_name"));
    assert!(fields.contains(&"password"));
}

/// Unknown email and wrong password yield identical failures
#[tokio::test]
async fn test_login_failures_indistinguishable() {
    let mut ctx = TestContext::new().await.unwrap();

    let email = unique_email("creds");
    let (user_id, _token) = ctx.signup_and_login(&email, "a long password").await.unwrap();

    let attempt = |email: String| {
        Request::builder()
            .method("POST")
            .uri("/v1/auth/login")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "email": email, "password": "wrong password" }).to_string(),
            ))
            .unwrap()
    };

    let wrong_password = ctx.request(attempt(email)).await;
    let unknown_email = ctx.request(attempt(unique_email("nobody"))).await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), wrong_password.status());

    // The bodies must not leak which half of the credentials was wrong
    let a = read_json(wrong_password).await;
    let b = read_json(unknown_email).await;
    assert_eq!(a, b);

    ctx.delete_user(user_id).await.unwrap();
}

/// Logout revokes the session and is idempotent
#[tokio::test]
async fn test_logout_idempotent() {
    let mut ctx = TestContext::new().await.unwrap();

    let email = unique_email("logout");
    let (user_id, token) = ctx.signup_and_login(&email, "a long password").await.unwrap();

    let logout = |token: String| {
        Request::builder()
            .method("DELETE")
            .uri("/v1/auth/logout")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    };

    let response = ctx.request(logout(token.clone())).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The token no longer resolves
    let response = ctx.request(get("/v1/auth/me", &token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Revoking again still succeeds
    let response = ctx.request(logout(token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    ctx.delete_user(user_id).await.unwrap();
}

/// Protected routes reject missing and garbage tokens
#[tokio::test]
async fn test_authentication_required() {
    let mut ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/projects")
        .body(Body::empty())
        .unwrap();

    let response = ctx.request(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = ctx.request(get("/v1/projects", "crew_notarealtoken000000000000000")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// The full defaults-and-permissions scenario
///
/// A owns a project and a task created with a minimal body; B is assigned.
/// B may toggle completion but not edit fields; A may edit fields.
#[tokio::test]
async fn test_task_defaults_and_permission_split() {
    let mut ctx = TestContext::new().await.unwrap();

    let (a_id, a_token) = ctx
        .signup_and_login(&unique_email("admin"), "a long password")
        .await
        .unwrap();
    let (b_id, b_token) = ctx
        .signup_and_login(&unique_email("assignee"), "a long password")
        .await
        .unwrap();

    // A creates a project and a minimal task
    let response = ctx
        .request(json_request(
            "POST",
            "/v1/projects",
            &a_token,
            json!({ "title": "Launch" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let project = read_json(response).await;
    let project_id = project["id"].as_str().unwrap().to_string();
    assert_eq!(project["adminUserId"], a_id.to_string());

    let response = ctx
        .request(json_request(
            "POST",
            &format!("/v1/projects/{}/tasks", project_id),
            &a_token,
            json!({ "title": "Ship the thing" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = read_json(response).await;
    let task_id = task["id"].as_str().unwrap().to_string();

    // Creation defaults
    assert_eq!(task["description"], "");
    assert_eq!(task["priority"], "normal");
    assert!(task["deadline"].is_null());
    assert_eq!(task["completed"], false);

    // A assigns B
    let response = ctx
        .request(json_request(
            "POST",
            &format!("/v1/tasks/{}/assignees", task_id),
            &a_token,
            json!({ "assigneeId": b_id }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // B toggles completion
    let response = ctx
        .request(json_request(
            "PATCH",
            &format!("/v1/tasks/{}/completed", task_id),
            &b_token,
            json!({ "completed": true }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["completed"], true);

    // B cannot edit fields
    let response = ctx
        .request(json_request(
            "PATCH",
            &format!("/v1/tasks/{}", task_id),
            &b_token,
            json!({ "title": "Hijacked" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A can edit fields
    let response = ctx
        .request(json_request(
            "PATCH",
            &format!("/v1/tasks/{}", task_id),
            &a_token,
            json!({ "title": "Ship it properly" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["title"], "Ship it properly");

    // A is not assigned, so even the admin cannot toggle completion
    let response = ctx
        .request(json_request(
            "PATCH",
            &format!("/v1/tasks/{}/completed", task_id),
            &a_token,
            json!({ "completed": false }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    ctx.delete_user(a_id).await.unwrap();
    ctx.delete_user(b_id).await.unwrap();
}

/// Assigning the same pair twice leaves exactly one assignment
#[tokio::test]
async fn test_assignment_idempotent() {
    let mut ctx = TestContext::new().await.unwrap();

    let (a_id, a_token) = ctx
        .signup_and_login(&unique_email("owner"), "a long password")
        .await
        .unwrap();
    let (b_id, _b_token) = ctx
        .signup_and_login(&unique_email("helper"), "a long password")
        .await
        .unwrap();

    let response = ctx
        .request(json_request(
            "POST",
            "/v1/projects",
            &a_token,
            json!({ "title": "Dedupe" }),
        ))
        .await;
    let project_id = read_json(response).await["id"].as_str().unwrap().to_string();

    let response = ctx
        .request(json_request(
            "POST",
            &format!("/v1/projects/{}/tasks", project_id),
            &a_token,
            json!({ "title": "Only once" }),
        ))
        .await;
    let task_id = read_json(response).await["id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let response = ctx
            .request(json_request(
                "POST",
                &format!("/v1/tasks/{}/assignees", task_id),
                &a_token,
                json!({ "assigneeId": b_id }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let assignees = read_json(response).await;
        assert_eq!(assignees.as_array().unwrap().len(), 1);
        assert_eq!(assignees[0]["id"], b_id.to_string());
    }

    // Unassigning twice is equally idempotent
    for _ in 0..2 {
        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/v1/tasks/{}/assignees/{}", task_id, b_id))
            .header("authorization", format!("Bearer {}", a_token))
            .body(Body::empty())
            .unwrap();

        let response = ctx.request(request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    ctx.delete_user(a_id).await.unwrap();
    ctx.delete_user(b_id).await.unwrap();
}

/// Assigning with no body defaults the assignee to the requester
#[tokio::test]
async fn test_assignment_defaults_to_requester() {
    let mut ctx = TestContext::new().await.unwrap();

    let (a_id, a_token) = ctx
        .signup_and_login(&unique_email("selfassign"), "a long password")
        .await
        .unwrap();

    let response = ctx
        .request(json_request(
            "POST",
            "/v1/projects",
            &a_token,
            json!({ "title": "Mine" }),
        ))
        .await;
    let project_id = read_json(response).await["id"].as_str().unwrap().to_string();

    let response = ctx
        .request(json_request(
            "POST",
            &format!("/v1/projects/{}/tasks", project_id),
            &a_token,
            json!({ "title": "Do it myself" }),
        ))
        .await;
    let task_id = read_json(response).await["id"].as_str().unwrap().to_string();

    let response = ctx
        .request(json_request(
            "POST",
            &format!("/v1/tasks/{}/assignees", task_id),
            &a_token,
            json!({}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let assignees = read_json(response).await;
    assert_eq!(assignees.as_array().unwrap().len(), 1);
    assert_eq!(assignees[0]["id"], a_id.to_string());

    ctx.delete_user(a_id).await.unwrap();
}

/// Progress is the completed share times 100, empty projects count as 0,
/// and the listing orders least-finished first
#[tokio::test]
async fn test_progress_and_ordering() {
    let mut ctx = TestContext::new().await.unwrap();

    let (a_id, a_token) = ctx
        .signup_and_login(&unique_email("progress"), "a long password")
        .await
        .unwrap();

    // Half done: two tasks, one completed
    let response = ctx
        .request(json_request(
            "POST",
            "/v1/projects",
            &a_token,
            json!({ "title": "Half done" }),
        ))
        .await;
    let half_id = read_json(response).await["id"].as_str().unwrap().to_string();

    for title in ["first", "second"] {
        let response = ctx
            .request(json_request(
                "POST",
                &format!("/v1/projects/{}/tasks", half_id),
                &a_token,
                json!({ "title": title }),
            ))
            .await;
        let task = read_json(response).await;

        if title == "first" {
            let task_id = task["id"].as_str().unwrap().to_string();

            // Assign self, then complete the task
            ctx.request(json_request(
                "POST",
                &format!("/v1/tasks/{}/assignees", task_id),
                &a_token,
                json!({}),
            ))
            .await;

            let response = ctx
                .request(json_request(
                    "PATCH",
                    &format!("/v1/tasks/{}/completed", task_id),
                    &a_token,
                    json!({ "completed": true }),
                ))
                .await;
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    // Empty: no tasks at all
    let response = ctx
        .request(json_request(
            "POST",
            "/v1/projects",
            &a_token,
            json!({ "title": "Empty" }),
        ))
        .await;
    let empty_id = read_json(response).await["id"].as_str().unwrap().to_string();

    let response = ctx.request(get("/v1/projects", &a_token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let projects = read_json(response).await;
    let projects = projects.as_array().unwrap();
    assert_eq!(projects.len(), 2);

    // 0% sorts before 50%
    assert_eq!(projects[0]["id"], empty_id);
    assert_eq!(projects[0]["progressPct"], 0.0);
    assert_eq!(projects[1]["id"], half_id);
    assert_eq!(projects[1]["progressPct"], 50.0);

    ctx.delete_user(a_id).await.unwrap();
}

/// Editing a foreign or unknown project both yield 403, not 404
#[tokio::test]
async fn test_project_edit_denied_collapses_not_found() {
    let mut ctx = TestContext::new().await.unwrap();

    let (a_id, a_token) = ctx
        .signup_and_login(&unique_email("owner2"), "a long password")
        .await
        .unwrap();
    let (b_id, b_token) = ctx
        .signup_and_login(&unique_email("intruder"), "a long password")
        .await
        .unwrap();

    let response = ctx
        .request(json_request(
            "POST",
            "/v1/projects",
            &a_token,
            json!({ "title": "Private" }),
        ))
        .await;
    let project_id = read_json(response).await["id"].as_str().unwrap().to_string();

    // Foreign project
    let response = ctx
        .request(json_request(
            "PATCH",
            &format!("/v1/projects/{}", project_id),
            &b_token,
            json!({ "title": "Taken over" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Unknown project looks exactly the same
    let response = ctx
        .request(json_request(
            "PATCH",
            &format!("/v1/projects/{}", uuid::Uuid::new_v4()),
            &b_token,
            json!({ "title": "Ghost" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    ctx.delete_user(a_id).await.unwrap();
    ctx.delete_user(b_id).await.unwrap();
}

/// Search matches prefixes and an empty term returns nothing
#[tokio::test]
async fn test_search_users() {
    let mut ctx = TestContext::new().await.unwrap();

    let email = unique_email("zmarisol");
    let (user_id, token) = ctx.signup_and_login(&email, "a long password").await.unwrap();

    // Unique prefix of the generated email
    let prefix = &email[..12];
    let response = ctx
        .request(get(&format!("/v1/users/search?q={}", prefix), &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let results = read_json(response).await;
    let results = results.as_array().unwrap().clone();
    assert!(results.iter().any(|u| u["id"] == user_id.to_string()));

    // Empty and whitespace terms return an empty list, never the directory
    for q in ["", "q=%20%20"] {
        let uri = if q.is_empty() {
            "/v1/users/search".to_string()
        } else {
            format!("/v1/users/search?{}", q)
        };

        let response = ctx.request(get(&uri, &token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await.as_array().unwrap().len(), 0);
    }

    ctx.delete_user(user_id).await.unwrap();
}

/// Collaborators are shared-project members, online before offline
#[tokio::test]
async fn test_collaborators_online_first() {
    let mut ctx = TestContext::new().await.unwrap();

    let (a_id, a_token) = ctx
        .signup_and_login(&unique_email("lead"), "a long password")
        .await
        .unwrap();
    let (b_id, _b_token) = ctx
        .signup_and_login(&unique_email("online"), "a long password")
        .await
        .unwrap();

    // C logs out right away, so C holds no session
    let c_email = unique_email("offline");
    let (c_id, c_token) = ctx.signup_and_login(&c_email, "a long password").await.unwrap();
    let logout = Request::builder()
        .method("DELETE")
        .uri("/v1/auth/logout")
        .header("authorization", format!("Bearer {}", c_token))
        .body(Body::empty())
        .unwrap();
    ctx.request(logout).await;

    // A's project with one task, B and C assigned
    let response = ctx
        .request(json_request(
            "POST",
            "/v1/projects",
            &a_token,
            json!({ "title": "Shared" }),
        ))
        .await;
    let project_id = read_json(response).await["id"].as_str().unwrap().to_string();

    let response = ctx
        .request(json_request(
            "POST",
            &format!("/v1/projects/{}/tasks", project_id),
            &a_token,
            json!({ "title": "Team task" }),
        ))
        .await;
    let task_id = read_json(response).await["id"].as_str().unwrap().to_string();

    for member in [b_id, c_id] {
        ctx.request(json_request(
            "POST",
            &format!("/v1/tasks/{}/assignees", task_id),
            &a_token,
            json!({ "assigneeId": member }),
        ))
        .await;
    }

    let response = ctx.request(get("/v1/users/collaborators", &a_token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let members = read_json(response).await;
    let members = members.as_array().unwrap().clone();
    assert_eq!(members.len(), 3);

    // A and B hold sessions, C does not; ONLINE entries come first
    let statuses: Vec<&str> = members
        .iter()
        .map(|m| m["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["ONLINE", "ONLINE", "OFFLINE"]);

    let offline = &members[2];
    assert_eq!(offline["id"], c_id.to_string());

    ctx.delete_user(a_id).await.unwrap();
    ctx.delete_user(b_id).await.unwrap();
    ctx.delete_user(c_id).await.unwrap();
}

/// Presence lookup and the reset sweep agree on session-derived status
#[tokio::test]
async fn test_presence_and_reset() {
    let mut ctx = TestContext::new().await.unwrap();

    let (online_id, token) = ctx
        .signup_and_login(&unique_email("here"), "a long password")
        .await
        .unwrap();

    let offline_email = unique_email("gone");
    let (offline_id, offline_token) = ctx
        .signup_and_login(&offline_email, "a long password")
        .await
        .unwrap();
    let logout = Request::builder()
        .method("DELETE")
        .uri("/v1/auth/logout")
        .header("authorization", format!("Bearer {}", offline_token))
        .body(Body::empty())
        .unwrap();
    ctx.request(logout).await;

    let response = ctx
        .request(get(&format!("/v1/users/{}/status", online_id), &token))
        .await;
    assert_eq!(read_json(response).await["status"], "ONLINE");

    let response = ctx
        .request(get(&format!("/v1/users/{}/status", offline_id), &token))
        .await;
    assert_eq!(read_json(response).await["status"], "OFFLINE");

    // Unknown user is a 404, not OFFLINE
    let response = ctx
        .request(get(&format!("/v1/users/{}/status", uuid::Uuid::new_v4()), &token))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The sweep marks everyone offline, then session holders online again
    let response = ctx
        .request(json_request("POST", "/v1/users/reset-status", &token, json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert!(body["markedOffline"].as_u64().unwrap() >= 2);
    assert!(body["markedOnline"].as_u64().unwrap() >= 1);

    // Derived presence is unchanged by the sweep
    let response = ctx
        .request(get(&format!("/v1/users/{}/status", online_id), &token))
        .await;
    assert_eq!(read_json(response).await["status"], "ONLINE");

    ctx.delete_user(online_id).await.unwrap();
    ctx.delete_user(offline_id).await.unwrap();
}

/// Health endpoint reports a connected database
#[tokio::test]
async fn test_health() {
    let mut ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = ctx.request(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}
