use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// End-to-end suites need a live Postgres; skip quietly when the
/// environment provides none.
pub fn database_configured() -> bool {
    let _ = dotenvy::dotenv();
    std::env::var("DATABASE_URL").is_ok()
}

pub struct TestServer {
    #[allow(dead_code)]
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/jobboard-api");
        cmd.env("JOBBOARD_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL and SECRET_KEY
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Register a throwaway user and return its token
#[allow(dead_code)]
pub async fn register_user(base_url: &str, username: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&serde_json::json!({
            "username": username,
            "password": "password1",
            "firstName": "Test",
            "lastName": "User",
            "email": format!("{}@example.com", username),
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "register failed: {}",
        res.status()
    );
    let payload = res.json::<serde_json::Value>().await?;
    payload["data"]["token"]
        .as_str()
        .map(|s| s.to_string())
        .context("missing token")
}

/// Mint an administrator token directly; route gates trust the signed
/// admin flag, so no matching user row is needed
#[allow(dead_code)]
pub fn admin_token() -> String {
    let claims = jobboard_api::auth::Claims::new("test-admin".to_string(), true);
    jobboard_api::auth::generate_jwt(&claims).expect("admin token")
}

/// Unique suffix so suites can re-run against the same database
pub fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .subsec_nanos();
    format!("{}{}{}", prefix, std::process::id(), nanos)
}
