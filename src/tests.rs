//! Integration tests for the SkillSwap backend.

use std::sync::Arc;

use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::auth::TokenKeys;
use crate::db::{init_database, Repository};
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

/// A registered, logged-in user.
struct TestUser {
    id: i64,
    token: String,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path, 5).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        let state = AppState {
            repo,
            auth: Arc::new(TokenKeys::new("test-secret", 3600)),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request, optionally authenticated and with a JSON body.
    async fn call(
        &self,
        method: Method,
        path: &str,
        user: Option<&TestUser>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = self.client.request(method, self.url(path));
        if let Some(user) = user {
            request = request.bearer_auth(&user.token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        let resp = request.send().await.unwrap();
        let status = resp.status();
        let body = resp.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn signup(&self, email: &str, name: &str) -> TestUser {
        let (status, body) = self
            .call(
                Method::POST,
                "/signup",
                None,
                Some(json!({ "email": email, "password": "secret123", "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
        let id = body["user"]["user_id"].as_i64().unwrap();

        let (status, body) = self
            .call(
                Method::POST,
                "/login",
                None,
                Some(json!({ "email": email, "password": "secret123" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        TestUser {
            id,
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    async fn set_profile(&self, user: &TestUser, offered: &str, wanted: &str, public: bool) {
        let (status, body) = self
            .call(
                Method::PUT,
                "/myprofile",
                Some(user),
                Some(json!({
                    "location": "Pune",
                    "availability": "Weekends",
                    "public_profile": public,
                    "new_skills_offered": offered,
                    "new_skills_wanted": wanted,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "profile update failed: {}", body);
    }

    async fn skill_id(&self, name: &str) -> i64 {
        let (_, body) = self.call(Method::GET, "/skills", None, None).await;
        body.as_array()
            .unwrap()
            .iter()
            .find(|s| s["skill_name"] == name)
            .and_then(|s| s["skill_id"].as_i64())
            .unwrap()
    }

    async fn send(&self, from: &TestUser, to: &TestUser, offered: i64, requested: i64) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/swap/send",
            Some(from),
            Some(json!({
                "receiver_id": to.id,
                "offered_skill_id": offered,
                "requested_skill_id": requested,
                "message": "Want to trade?",
            })),
        )
        .await
    }

    async fn feedback(&self, from: &TestUser, swap_id: i64, to: i64, rating: i64) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/feedback",
            Some(from),
            Some(json!({ "swap_id": swap_id, "to_user_id": to, "rating": rating, "comment": "Thanks" })),
        )
        .await
    }
}

/// Alice offers Python and wants Design; Bob the reverse. Both public.
struct Pair {
    fixture: TestFixture,
    alice: TestUser,
    bob: TestUser,
    python: i64,
    design: i64,
}

impl Pair {
    async fn new() -> Self {
        let fixture = TestFixture::new().await;
        let alice = fixture.signup("alice@example.com", "Alice").await;
        let bob = fixture.signup("bob@example.com", "Bob").await;
        fixture.set_profile(&alice, "Python", "Design", true).await;
        fixture.set_profile(&bob, "Design", "Python", true).await;
        let python = fixture.skill_id("Python").await;
        let design = fixture.skill_id("Design").await;
        Pair {
            fixture,
            alice,
            bob,
            python,
            design,
        }
    }

    /// Alice asks Bob for Design in exchange for Python.
    async fn pending_swap(&self) -> i64 {
        let (status, body) = self
            .fixture
            .send(&self.alice, &self.bob, self.python, self.design)
            .await;
        assert_eq!(status, StatusCode::CREATED, "send failed: {}", body);
        body["swap_id"].as_i64().unwrap()
    }

    async fn status_of(&self, swap_id: i64) -> String {
        let (_, body) = self
            .fixture
            .call(Method::GET, "/myswaps/sent", Some(&self.alice), None)
            .await;
        body.as_array()
            .unwrap()
            .iter()
            .find(|s| s["id"] == swap_id)
            .map(|s| s["status"].as_str().unwrap().to_string())
            .unwrap()
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.call(Method::GET, "/myswaps", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHENTICATED");

    let bogus = TestUser {
        id: 1,
        token: "not-a-jwt".to_string(),
    };
    let (status, _) = fixture
        .call(Method::GET, "/myswaps", Some(&bogus), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = fixture
        .call(Method::POST, "/feedback", None, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_cookie_is_accepted() {
    let fixture = TestFixture::new().await;
    let alice = fixture.signup("alice@example.com", "Alice").await;

    let resp = fixture
        .client
        .get(fixture.url("/myprofile"))
        .header("cookie", format!("token={}", alice.token))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["profile"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_signup_and_login_errors() {
    let fixture = TestFixture::new().await;
    fixture.signup("alice@example.com", "Alice").await;

    let (status, body) = fixture
        .call(
            Method::POST,
            "/signup",
            None,
            Some(json!({ "email": "ALICE@example.com", "password": "secret123", "name": "Other" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email is already registered.");

    let (status, _) = fixture
        .call(
            Method::POST,
            "/signup",
            None,
            Some(json!({ "email": "carol@example.com", "password": "123", "name": "Carol" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = fixture
        .call(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password.");
}

#[tokio::test]
async fn test_malformed_body_is_invalid_input() {
    let pair = Pair::new().await;

    let resp = pair
        .fixture
        .client
        .post(pair.fixture.url("/swap/send"))
        .bearer_auth(&pair.alice.token)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_non_numeric_path_id_is_invalid_input() {
    let pair = Pair::new().await;
    let f = &pair.fixture;

    let cases = [
        (Method::PUT, "/myswaps/abc/accept"),
        (Method::PUT, "/myswaps/abc/reject"),
        (Method::DELETE, "/myswaps/cancel/abc"),
        (Method::GET, "/profile/abc"),
        (Method::GET, "/swap/data/abc"),
    ];
    for (method, path) in cases {
        let (status, body) = f.call(method, path, Some(&pair.bob), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", path);
        assert_eq!(body["success"], false, "{}", path);
        assert_eq!(body["code"], "INVALID_INPUT", "{}", path);
        assert!(body["error"].is_string(), "{}", path);
    }
}

#[tokio::test]
async fn test_profile_update_and_completeness() {
    let fixture = TestFixture::new().await;
    let alice = fixture.signup("alice@example.com", "Alice").await;

    // Incomplete profiles cannot be made public
    let (status, body) = fixture
        .call(
            Method::PUT,
            "/myprofile",
            Some(&alice),
            Some(json!({
                "location": "Pune",
                "availability": "",
                "public_profile": true,
                "new_skills_offered": "Python",
                "new_skills_wanted": "Design",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    // Nothing from the rejected update was written
    let (_, skills) = fixture.call(Method::GET, "/skills", None, None).await;
    assert_eq!(skills.as_array().unwrap().len(), 0);

    // Existing ids and new names are merged; names resolve case-insensitively
    fixture.set_profile(&alice, "Python, Rust", "Design", true).await;
    let python = fixture.skill_id("Python").await;
    let (status, body) = fixture
        .call(
            Method::PUT,
            "/myprofile",
            Some(&alice),
            Some(json!({
                "location": "Pune",
                "availability": "Evenings",
                "public_profile": true,
                "skills_offered": [python],
                "new_skills_offered": "python, Go",
                "new_skills_wanted": "design",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["profile_completed"], true);

    let (_, body) = fixture
        .call(Method::GET, "/myprofile", Some(&alice), None)
        .await;
    let profile = &body["profile"];
    assert_eq!(profile["availability"], "Evenings");
    assert_eq!(profile["public_profile"], true);
    let offered: Vec<&str> = profile["skills_offered"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["skill_name"].as_str().unwrap())
        .collect();
    assert_eq!(offered, vec!["Python", "Go"]);
    assert_eq!(profile["skills_wanted"][0]["skill_name"], "Design");

    // Unknown ids reject the whole update
    let (status, body) = fixture
        .call(
            Method::PUT,
            "/myprofile",
            Some(&alice),
            Some(json!({
                "location": "Pune",
                "availability": "Evenings",
                "public_profile": false,
                "skills_offered": [9999],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "One or more skill IDs are invalid.");

    // A private, incomplete profile is accepted
    let (status, body) = fixture
        .call(
            Method::PUT,
            "/myprofile",
            Some(&alice),
            Some(json!({ "location": "Pune", "public_profile": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile_completed"], false);
}

#[tokio::test]
async fn test_full_swap_and_feedback_scenario() {
    let pair = Pair::new().await;
    let f = &pair.fixture;

    let swap_id = pair.pending_swap().await;
    assert_eq!(pair.status_of(swap_id).await, "pending");

    let (status, body) = f
        .call(
            Method::PUT,
            &format!("/myswaps/{}/accept", swap_id),
            Some(&pair.bob),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Swap request accepted.");
    assert_eq!(pair.status_of(swap_id).await, "accepted");

    let (status, _) = f.feedback(&pair.alice, swap_id, pair.bob.id, 5).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = f.feedback(&pair.alice, swap_id, pair.bob.id, 4).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Feedback already submitted.");

    let (status, _) = f.feedback(&pair.bob, swap_id, pair.alice.id, 4).await;
    assert_eq!(status, StatusCode::CREATED);

    // Ratings are visible on the public profile and the home listing
    let (status, body) = f
        .call(
            Method::GET,
            &format!("/profile/{}", pair.bob.id),
            Some(&pair.alice),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["average_rating"], 5.0);
    assert_eq!(body["feedback"][0]["from_user"], "Alice");
    assert_eq!(body["feedback"][0]["rating"], 5);

    let (_, body) = f.call(Method::GET, "/home", None, None).await;
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["name"], "Bob");
    assert_eq!(users[0]["rating"], 5.0);
    assert_eq!(users[1]["rating"], 4.0);
}

#[tokio::test]
async fn test_send_to_ineligible_receiver() {
    let fixture = TestFixture::new().await;
    let alice = fixture.signup("alice@example.com", "Alice").await;
    let bob = fixture.signup("bob@example.com", "Bob").await;
    fixture.set_profile(&alice, "Python", "Design", true).await;
    fixture.set_profile(&bob, "Design", "Python", false).await;
    let python = fixture.skill_id("Python").await;
    let design = fixture.skill_id("Design").await;

    let (status, body) = fixture.send(&alice, &bob, python, design).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "NOT_ELIGIBLE");

    // Unknown receivers are not eligible either
    let ghost = TestUser {
        id: 9999,
        token: String::new(),
    };
    let (status, body) = fixture.send(&alice, &ghost, python, design).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "NOT_ELIGIBLE");

    // No row was inserted
    let (_, body) = fixture
        .call(Method::GET, "/myswaps", Some(&alice), None)
        .await;
    assert_eq!(body["sent_requests"].as_array().unwrap().len(), 0);
    let (_, body) = fixture
        .call(Method::GET, "/myswaps", Some(&bob), None)
        .await;
    assert_eq!(body["received_requests"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_send_validation() {
    let pair = Pair::new().await;
    let f = &pair.fixture;

    let (status, body) = f
        .call(
            Method::POST,
            "/swap/send",
            Some(&pair.alice),
            Some(json!({ "receiver_id": pair.bob.id, "offered_skill_id": pair.python })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields.");

    let (status, _) = f
        .send(&pair.alice, &pair.alice, pair.python, pair.design)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Alice does not offer Design
    let (status, _) = f
        .send(&pair.alice, &pair.bob, pair.design, pair.design)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_only_receiver_may_answer() {
    let pair = Pair::new().await;
    let swap_id = pair.pending_swap().await;

    for verb in ["accept", "reject"] {
        let (status, body) = pair
            .fixture
            .call(
                Method::PUT,
                &format!("/myswaps/{}/{}", swap_id, verb),
                Some(&pair.alice),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
    }

    let (status, _) = pair
        .fixture
        .call(Method::PUT, "/myswaps/424242/accept", Some(&pair.bob), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(pair.status_of(swap_id).await, "pending");
}

#[tokio::test]
async fn test_respond_endpoint() {
    let pair = Pair::new().await;
    let f = &pair.fixture;
    let swap_id = pair.pending_swap().await;

    let (status, body) = f
        .call(
            Method::PATCH,
            "/myswaps/respond",
            Some(&pair.bob),
            Some(json!({ "swap_id": swap_id, "action": "maybe" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid swap_id or action.");

    let (status, body) = f
        .call(
            Method::PATCH,
            "/myswaps/respond",
            Some(&pair.bob),
            Some(json!({ "swap_id": swap_id, "action": "reject" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Swap request rejected.");

    let (status, body) = f
        .call(
            Method::PATCH,
            "/myswaps/respond",
            Some(&pair.bob),
            Some(json!({ "swap_id": swap_id, "action": "accept" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Swap is already rejected.");
}

#[tokio::test]
async fn test_repeated_accept_is_not_idempotent() {
    let pair = Pair::new().await;
    let swap_id = pair.pending_swap().await;
    let path = format!("/myswaps/{}/accept", swap_id);

    let (status, _) = pair
        .fixture
        .call(Method::PUT, &path, Some(&pair.bob), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = pair
        .fixture
        .call(Method::PUT, &path, Some(&pair.bob), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_STATE");
    assert_eq!(body["error"], "Swap is already accepted.");
}

#[tokio::test]
async fn test_cancel_rules() {
    let pair = Pair::new().await;
    let f = &pair.fixture;
    let swap_id = pair.pending_swap().await;
    let path = format!("/myswaps/cancel/{}", swap_id);

    // Receiver cannot cancel
    let (status, body) = f.call(Method::DELETE, &path, Some(&pair.bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Swap not found or cannot be cancelled.");

    let (status, body) = f
        .call(Method::DELETE, &path, Some(&pair.alice), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Swap request cancelled successfully.");
    assert_eq!(pair.status_of(swap_id).await, "cancelled");

    // Already cancelled, and unknown swaps, look the same
    let (status, _) = f
        .call(Method::DELETE, &path, Some(&pair.alice), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = f
        .call(Method::DELETE, "/myswaps/cancel/424242", Some(&pair.alice), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_no_action_leaves_a_terminal_state() {
    let pair = Pair::new().await;
    let f = &pair.fixture;

    for terminal in ["accepted", "rejected", "cancelled"] {
        let swap_id = pair.pending_swap().await;
        let (status, _) = match terminal {
            "accepted" => {
                f.call(
                    Method::PUT,
                    &format!("/myswaps/{}/accept", swap_id),
                    Some(&pair.bob),
                    None,
                )
                .await
            }
            "rejected" => {
                f.call(
                    Method::PUT,
                    &format!("/myswaps/{}/reject", swap_id),
                    Some(&pair.bob),
                    None,
                )
                .await
            }
            _ => {
                f.call(
                    Method::DELETE,
                    &format!("/myswaps/cancel/{}", swap_id),
                    Some(&pair.alice),
                    None,
                )
                .await
            }
        };
        assert_eq!(status, StatusCode::OK);

        for verb in ["accept", "reject"] {
            let (status, body) = f
                .call(
                    Method::PUT,
                    &format!("/myswaps/{}/{}", swap_id, verb),
                    Some(&pair.bob),
                    None,
                )
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], format!("Swap is already {}.", terminal));
        }

        let (status, _) = f
            .call(
                Method::DELETE,
                &format!("/myswaps/cancel/{}", swap_id),
                Some(&pair.alice),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        assert_eq!(pair.status_of(swap_id).await, terminal);
    }
}

#[tokio::test]
async fn test_feedback_gate() {
    let pair = Pair::new().await;
    let f = &pair.fixture;
    let carol = f.signup("carol@example.com", "Carol").await;
    let swap_id = pair.pending_swap().await;

    // Pending swaps cannot be rated
    let (status, body) = f.feedback(&pair.alice, swap_id, pair.bob.id, 5).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_STATE");

    f.call(
        Method::PUT,
        &format!("/myswaps/{}/accept", swap_id),
        Some(&pair.bob),
        None,
    )
    .await;

    let (status, _) = f.feedback(&pair.alice, swap_id, pair.bob.id, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = f.feedback(&pair.alice, swap_id, pair.bob.id, 6).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = f.feedback(&pair.alice, 424242, pair.bob.id, 5).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = f.feedback(&carol, swap_id, pair.bob.id, 5).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = f.feedback(&pair.alice, swap_id, pair.alice.id, 5).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = f.feedback(&pair.alice, swap_id, carol.id, 5).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_swap_listings() {
    let pair = Pair::new().await;
    let f = &pair.fixture;
    let first = pair.pending_swap().await;
    let second = pair.pending_swap().await;

    let (status, body) = f
        .call(Method::GET, "/myswaps", Some(&pair.alice), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let sent = body["sent_requests"].as_array().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0]["swap_id"], second);
    assert_eq!(sent[1]["swap_id"], first);
    assert_eq!(sent[0]["name"], "Bob");
    assert_eq!(sent[0]["offered_skill"], "Python");
    assert_eq!(sent[0]["requested_skill"], "Design");
    assert_eq!(sent[0]["time_ago"], "Just now");
    assert!(body["received_requests"].as_array().unwrap().is_empty());

    let (_, body) = f
        .call(Method::GET, "/myswaps/received", Some(&pair.bob), None)
        .await;
    let received = body.as_array().unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0]["id"], second);
    assert_eq!(received[0]["sender"]["user_id"], pair.alice.id);
    assert_eq!(received[0]["sender"]["name"], "Alice");
    assert_eq!(received[0]["sender"]["profile_pic"], Value::Null);
    assert_eq!(received[0]["offered_skill"]["skill_id"], pair.python);
    assert_eq!(received[0]["requested_skill"]["skill_name"], "Design");
    assert_eq!(received[0]["message"], "Want to trade?");
    assert_eq!(received[0]["status"], "pending");
    assert_eq!(received[0]["created_at"], received[0]["updated_at"]);

    let (_, body) = f
        .call(Method::GET, "/myswaps/sent", Some(&pair.alice), None)
        .await;
    assert_eq!(body[0]["receiver"]["user_id"], pair.bob.id);
}

#[tokio::test]
async fn test_swap_data_and_public_profile() {
    let pair = Pair::new().await;
    let f = &pair.fixture;

    let (status, body) = f
        .call(
            Method::GET,
            &format!("/swap/data/{}", pair.bob.id),
            Some(&pair.alice),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sender_offered_skills"][0]["skill_name"], "Python");
    assert_eq!(body["receiver_offered_skills"][0]["skill_name"], "Design");
    assert_eq!(body["receiver_wanted_skills"][0]["skill_name"], "Python");

    let (status, _) = f
        .call(
            Method::GET,
            &format!("/profile/{}", pair.alice.id),
            Some(&pair.alice),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = f
        .call(
            Method::GET,
            &format!("/profile/{}", pair.bob.id),
            Some(&pair.alice),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Bob");
    assert_eq!(body["average_rating"], Value::Null);
    assert!(body["feedback"].as_array().unwrap().is_empty());

    // Going private hides the profile
    f.set_profile(&pair.bob, "Design", "Python", false).await;
    let (status, _) = f
        .call(
            Method::GET,
            &format!("/profile/{}", pair.bob.id),
            Some(&pair.alice),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_home_filters() {
    let pair = Pair::new().await;
    let f = &pair.fixture;

    let (_, body) = f.call(Method::GET, "/home?skill=design", None, None).await;
    assert_eq!(body["users"].as_array().unwrap().len(), 2);

    let (_, body) = f.call(Method::GET, "/home?search=ali", None, None).await;
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], "Alice");
    assert_eq!(users[0]["skills_offered"], json!(["Python"]));
    assert_eq!(users[0]["skills_wanted"], json!(["Design"]));

    let (_, body) = f.call(Method::GET, "/home?skill=Cooking", None, None).await;
    assert!(body["users"].as_array().unwrap().is_empty());
}
