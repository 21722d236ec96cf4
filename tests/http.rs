use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct WeekResponse {
    week: String,
    state: BTreeMap<String, BTreeMap<String, bool>>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("winter_arc_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/week")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_winter_arc"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn fetch_week(client: &Client, base_url: &str) -> WeekResponse {
    client
        .get(format!("{base_url}/api/week"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

fn is_week_key(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 8
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && &bytes[4..6] == b"-W"
        && bytes[6..].iter().all(u8::is_ascii_digit)
}

#[tokio::test]
async fn http_exercise_toggle_persists_for_current_week() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = fetch_week(&client, &server.base_url).await;
    assert!(is_week_key(&before.week), "bad week key {}", before.week);

    let response = client
        .post(format!("{}/api/exercise", server.base_url))
        .json(&serde_json::json!({ "day": "monday", "exercise": "push-ups", "checked": true }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let updated: WeekResponse = response.json().await.unwrap();
    assert_eq!(updated.week, before.week);
    assert_eq!(updated.state["monday"]["push-ups"], true);

    let after = fetch_week(&client, &server.base_url).await;
    assert_eq!(after.state["monday"]["push-ups"], true);

    client
        .post(format!("{}/api/exercise", server.base_url))
        .json(&serde_json::json!({ "day": "monday", "exercise": "push-ups", "checked": false }))
        .send()
        .await
        .unwrap();
    let unchecked = fetch_week(&client, &server.base_url).await;
    assert_eq!(unchecked.state["monday"]["push-ups"], false);
}

#[tokio::test]
async fn http_exercise_rejects_unknown_day_and_blank_exercise() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for body in [
        serde_json::json!({ "day": "sunday", "exercise": "plank", "checked": true }),
        serde_json::json!({ "day": "tuesday", "exercise": "  ", "checked": true }),
    ] {
        let response = client
            .post(format!("{}/api/exercise", server.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
    }
}

#[tokio::test]
async fn http_export_downloads_text_log() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    client
        .post(format!("{}/api/exercise", server.base_url))
        .json(&serde_json::json!({ "day": "wednesday", "exercise": "cold-shower", "checked": true }))
        .send()
        .await
        .unwrap();
    let week = fetch_week(&client, &server.base_url).await.week;

    let response = client
        .get(format!("{}/export", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let disposition = response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(
        disposition,
        format!("attachment; filename=\"winter-arc-log-{week}.txt\"")
    );

    let text = response.text().await.unwrap();
    assert!(text.starts_with("WINTER ARC - Workout Log\nExported: "));
    assert!(text.contains(&format!("WEEK: {week} (current)\n")));
    assert!(text.contains("  Wednesday:\n"));
    assert!(text.contains("    [x] cold shower\n"));
}

#[tokio::test]
async fn http_index_renders_week_label() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let week = fetch_week(&client, &server.base_url).await.week;
    let html = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(&format!("Week: {week}")));
    assert!(html.contains("exercise-checkbox"));

    let archive: Vec<serde_json::Value> = client
        .get(format!("{}/api/archive", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(archive.is_empty());
}
