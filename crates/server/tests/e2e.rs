use std::net::SocketAddr;
use std::path::PathBuf;

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
    root: PathBuf,
    config: AppConfig,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn cleanup(self) {
        let _ = tokio::fs::remove_dir_all(&self.root).await;
    }
}

fn test_config(root: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.data_file = root.join("data").join("waitlist.json");
    config.storage.static_dir = root.join("static");
    config
}

async fn serve(config: AppConfig, root: PathBuf) -> anyhow::Result<TestApp> {
    let (app, _store) = server::startup::build_app(&config).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, root, config })
}

async fn start_server() -> anyhow::Result<TestApp> {
    let root = std::env::temp_dir().join(format!("waitlist_e2e_{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(root.join("static")).await?;
    tokio::fs::write(root.join("static").join("index.html"), "<h1>Join the waitlist</h1>").await?;
    serve(test_config(&root), root).await
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn signup(app: &TestApp, body: Value) -> anyhow::Result<(HttpStatusCode, Value)> {
    let res = client().post(app.url("/waitlist")).json(&body).send().await?;
    let status = res.status();
    Ok((status, res.json::<Value>().await?))
}

#[tokio::test]
async fn e2e_health_and_landing_page() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = client().get(app.url("/health")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"status": "ok"}));

    let res = client().get(app.url("/")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.text().await?.contains("Join the waitlist"));

    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn e2e_signup_flow() -> anyhow::Result<()> {
    let app = start_server().await?;

    let (status, body) = signup(&app, json!({"email": "first@example.com"})).await?;
    assert_eq!(status, HttpStatusCode::CREATED);
    assert_eq!(body, json!({"success": true, "message": "Successfully joined the waitlist!"}));

    let (status, body) = signup(&app, json!({"email": "first@example.com"})).await?;
    assert_eq!(status, HttpStatusCode::CONFLICT);
    assert_eq!(body, json!({"success": false, "message": "Email already registered"}));

    let (status, body) = signup(&app, json!({"email": ""})).await?;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email is required");

    let (status, body) = signup(&app, json!({})).await?;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email is required");

    let (status, body) = signup(&app, json!({"email": "not-an-email"})).await?;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email format");

    let res = client().post(app.url("/waitlist")).body("null").send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "Email is required");

    let (status, _) = signup(&app, json!({"Email": "second@example.com"})).await?;
    assert_eq!(status, HttpStatusCode::CREATED);

    let res = client().post(app.url("/waitlist")).body("{oops").send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "Invalid JSON");

    let res = client().get(app.url("/waitlist")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::METHOD_NOT_ALLOWED);

    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn e2e_admin_lists_newest_first() -> anyhow::Result<()> {
    let app = start_server().await?;

    for email in ["a@example.com", "b@example.com", "c@example.com"] {
        let (status, _) = signup(&app, json!({ "email": email })).await?;
        assert_eq!(status, HttpStatusCode::CREATED);
    }

    let res = client().get(app.url("/admin")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let html = res.text().await?;
    assert!(html.contains("Total subscribers: 3"));
    let c = html.find("c@example.com").expect("c listed");
    let b = html.find("b@example.com").expect("b listed");
    let a = html.find("a@example.com").expect("a listed");
    assert!(c < b && b < a);

    let metrics = client().get(app.url("/metrics")).send().await?.text().await?;
    assert!(metrics.contains("waitlist_signups_accepted_total"));

    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn e2e_entries_survive_restart() -> anyhow::Result<()> {
    let root = std::env::temp_dir().join(format!("waitlist_e2e_{}", Uuid::new_v4()));
    let config = test_config(&root);
    {
        let (_app, store) = server::startup::build_app(&config).await?;
        store.add("kept@example.com").await;
        store.flush().await?;
    }

    let app = serve(config, root).await?;
    let (status, _) = signup(&app, json!({"email": "kept@example.com"})).await?;
    assert_eq!(status, HttpStatusCode::CONFLICT);

    let (status, _) = signup(&app, json!({"email": "new@example.com"})).await?;
    assert_eq!(status, HttpStatusCode::CREATED);

    let html = client().get(app.url("/admin")).send().await?.text().await?;
    assert!(html.contains("<td>2</td>"));
    assert!(app.config.storage.data_file.exists());

    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn e2e_corrupt_snapshot_blocks_startup() -> anyhow::Result<()> {
    let root = std::env::temp_dir().join(format!("waitlist_e2e_{}", Uuid::new_v4()));
    let config = test_config(&root);
    tokio::fs::create_dir_all(root.join("data")).await?;
    tokio::fs::write(&config.storage.data_file, "[{\"id\": 1").await?;

    assert!(server::startup::build_app(&config).await.is_err());

    let _ = tokio::fs::remove_dir_all(&root).await;
    Ok(())
}
