use remixboard_backend::api::{self, AppState};
use remixboard_backend::bootstrap;
use remixboard_backend::config::{AppConfig, AppPaths};
use tempfile::{tempdir, TempDir};
use tokio::time::{sleep, Duration};

struct TestServer {
    _dir: TempDir,
    server: tokio::task::JoinHandle<()>,
    base_url: String,
}

impl TestServer {
    async fn shutdown(self) {
        self.server.abort();
        let _ = self.server.await;
    }
}

fn next_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind ephemeral port")
        .local_addr()
        .unwrap()
        .port()
}

async fn start_server() -> TestServer {
    let temp = tempdir().expect("tempdir");
    let port = next_port();
    let config = AppConfig::new(port, AppPaths::from_base_dir(temp.path()).expect("paths"));

    let bootstrap = bootstrap::initialize(&config).expect("bootstrap");
    let database = bootstrap.database.clone();

    let server = tokio::spawn(async move {
        let _ = api::serve_http(config, database).await;
    });

    let base_url = format!("http://127.0.0.1:{port}");
    wait_for_health(&base_url).await;

    TestServer {
        _dir: temp,
        server,
        base_url,
    }
}

async fn wait_for_health(base_url: &str) {
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if let Ok(resp) = client.get(format!("{base_url}/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        sleep(Duration::from_millis(100)).await;
    }
    panic!("server did not become healthy in time");
}

async fn register_and_login(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
) -> String {
    let credentials = serde_json::json!({ "username": username, "password": "hunter2" });
    let resp = client
        .post(format!("{base_url}/users"))
        .json(&credentials)
        .send()
        .await
        .expect("register response");
    assert!(resp.status().is_success(), "register failed: {}", resp.status());

    let session: serde_json::Value = client
        .post(format!("{base_url}/sessions"))
        .json(&credentials)
        .send()
        .await
        .expect("login response")
        .json()
        .await
        .expect("session json");
    session
        .get("token")
        .and_then(|t| t.as_str())
        .expect("session token")
        .to_string()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires local networking"]
async fn friendship_flow_over_rest() {
    let server = start_server().await;
    let client = reqwest::Client::new();
    let base_url = &server.base_url;

    let alice_token = register_and_login(&client, base_url, "alice").await;
    let bob_token = register_and_login(&client, base_url, "bob").await;

    let resp = client
        .post(format!("{base_url}/friends/requests"))
        .bearer_auth(&alice_token)
        .json(&serde_json::json!({ "username": "bob" }))
        .send()
        .await
        .expect("send request");
    assert!(resp.status().is_success());

    // A second identical request conflicts.
    let resp = client
        .post(format!("{base_url}/friends/requests"))
        .bearer_auth(&alice_token)
        .json(&serde_json::json!({ "username": "bob" }))
        .send()
        .await
        .expect("duplicate request");
    assert_eq!(resp.status(), reqwest::StatusCode::CONFLICT);

    let incoming: serde_json::Value = client
        .get(format!("{base_url}/friends/requests"))
        .bearer_auth(&bob_token)
        .send()
        .await
        .expect("incoming requests")
        .json()
        .await
        .expect("requests json");
    assert_eq!(incoming.as_array().map(|a| a.len()), Some(1));

    let resp = client
        .post(format!("{base_url}/friends/requests/alice/accept"))
        .bearer_auth(&bob_token)
        .send()
        .await
        .expect("accept request");
    assert!(resp.status().is_success());

    for token in [&alice_token, &bob_token] {
        let friends: serde_json::Value = client
            .get(format!("{base_url}/friends"))
            .bearer_auth(token)
            .send()
            .await
            .expect("friends response")
            .json()
            .await
            .expect("friends json");
        assert_eq!(
            friends
                .get("friends")
                .and_then(|f| f.as_array())
                .map(|f| f.len()),
            Some(1)
        );
    }

    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires local networking"]
async fn favorites_and_remixes_over_rest() {
    let server = start_server().await;
    let client = reqwest::Client::new();
    let base_url = &server.base_url;

    let alice_token = register_and_login(&client, base_url, "alice").await;
    let bob_token = register_and_login(&client, base_url, "bob").await;

    let post: serde_json::Value = client
        .post(format!("{base_url}/posts"))
        .bearer_auth(&alice_token)
        .json(&serde_json::json!({ "title": "Original", "body": "artwork" }))
        .send()
        .await
        .expect("create post")
        .json()
        .await
        .expect("post json");
    let post_id = post.get("id").and_then(|v| v.as_str()).expect("post id");

    // Toggle on, then off.
    for expected in [true, false] {
        let toggle: serde_json::Value = client
            .post(format!("{base_url}/posts/{post_id}/favorite"))
            .bearer_auth(&bob_token)
            .send()
            .await
            .expect("toggle")
            .json()
            .await
            .expect("toggle json");
        assert_eq!(toggle.get("favorited").and_then(|v| v.as_bool()), Some(expected));
    }

    let remix: serde_json::Value = client
        .post(format!("{base_url}/posts/{post_id}/remixes"))
        .bearer_auth(&bob_token)
        .json(&serde_json::json!({ "title": "Remix", "body": "reworked" }))
        .send()
        .await
        .expect("create remix")
        .json()
        .await
        .expect("remix json");
    let remix_id = remix.get("id").and_then(|v| v.as_str()).expect("remix id");
    // Artist credit propagates from the original.
    assert_eq!(
        remix.get("original_artist").and_then(|v| v.as_str()),
        Some("alice")
    );

    let original: serde_json::Value = client
        .get(format!("{base_url}/posts/{remix_id}/original"))
        .send()
        .await
        .expect("original")
        .json()
        .await
        .expect("original json");
    assert_eq!(
        original
            .get("original")
            .and_then(|o| o.get("id"))
            .and_then(|v| v.as_str()),
        Some(post_id)
    );

    let trending: serde_json::Value = client
        .get(format!("{base_url}/trending/remixes?days=7&limit=5"))
        .send()
        .await
        .expect("trending")
        .json()
        .await
        .expect("trending json");
    let top_ids: Vec<&str> = trending
        .as_array()
        .expect("trending array")
        .iter()
        .filter_map(|p| p.get("id").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(top_ids.first(), Some(&post_id));

    // Deleting the original retires the edge; the remix post survives.
    let resp = client
        .delete(format!("{base_url}/posts/{post_id}"))
        .bearer_auth(&alice_token)
        .send()
        .await
        .expect("delete post");
    assert!(resp.status().is_success());

    let original: serde_json::Value = client
        .get(format!("{base_url}/posts/{remix_id}/original"))
        .send()
        .await
        .expect("original after delete")
        .json()
        .await
        .expect("original json");
    assert!(original.get("original").map(|o| o.is_null()).unwrap_or(false));

    server.shutdown().await;
}

/// `AppState` stays buildable outside `serve_http`; guards against route
/// table or state wiring regressions without a socket.
#[tokio::test]
async fn router_builds_from_fresh_state() {
    let temp = tempdir().expect("tempdir");
    let config = AppConfig::new(0, AppPaths::from_base_dir(temp.path()).expect("paths"));
    let bootstrap = bootstrap::initialize(&config).expect("bootstrap");
    let state = AppState::new(config, bootstrap.database);
    let _router = api::build_router(state);
}
