//! End-to-end behaviour of the 401 → refresh → retry protocol against a
//! scripted transport.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use portfolio_client::{
    ApiClient, ApiError, ApiRequest, ClientEvents, ListQuery, NETWORK_ERROR_MESSAGE, RawResponse,
    REFRESH_PATH, Transport, TransportError,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use url::Url;

#[derive(Clone)]
enum Reply {
    Respond(u16, Value),
    Fail,
}

#[derive(Default)]
struct Script {
    replies: HashMap<String, Vec<Reply>>,
    hits: HashMap<String, usize>,
}

/// Transport answering from per-path reply sequences. The last reply of a
/// sequence repeats once the others are used up.
#[derive(Default)]
struct ScriptedTransport {
    script: Mutex<Script>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl ScriptedTransport {
    fn on(self, path: &str, replies: Vec<Reply>) -> Self {
        self.script
            .lock()
            .expect("script lock")
            .replies
            .insert(path.to_owned(), replies);
        self
    }

    fn delayed(self, path: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .expect("delay lock")
            .insert(path.to_owned(), delay);
        self
    }

    fn hits(&self, path: &str) -> usize {
        self.script
            .lock()
            .expect("script lock")
            .hits
            .get(path)
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, _url: Url, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let path = request.path().to_owned();
        let delay = self
            .delays
            .lock()
            .expect("delay lock")
            .get(&path)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = {
            let mut script = self.script.lock().expect("script lock");
            let hit = {
                let counter = script.hits.entry(path.clone()).or_default();
                *counter += 1;
                *counter
            };
            let replies = script.replies.get(&path).cloned().unwrap_or_default();
            replies
                .get(hit - 1)
                .or_else(|| replies.last())
                .cloned()
                .unwrap_or_else(|| rejected(404, "Route not found"))
        };

        match reply {
            Reply::Respond(status, body) => Ok(RawResponse::new(
                status,
                serde_json::to_vec(&body).expect("serialise body"),
            )),
            Reply::Fail => Err(TransportError::Connection {
                message: "connection refused".to_owned(),
            }),
        }
    }
}

#[derive(Default)]
struct RecordingEvents {
    expired: AtomicUsize,
    read: Mutex<Vec<String>>,
}

impl ClientEvents for RecordingEvents {
    fn session_expired(&self) {
        self.expired.fetch_add(1, Ordering::SeqCst);
    }

    fn message_read(&self, message_id: &str) {
        self.read.lock().expect("read lock").push(message_id.to_owned());
    }
}

fn ok(data: Value) -> Reply {
    Reply::Respond(200, json!({"success": true, "message": "OK", "data": data}))
}

fn rejected(status: u16, message: &str) -> Reply {
    Reply::Respond(status, json!({"success": false, "message": message}))
}

fn refreshed() -> Reply {
    Reply::Respond(200, json!({"success": true, "message": "Token refreshed", "data": null}))
}

#[fixture]
fn events() -> Arc<RecordingEvents> {
    Arc::new(RecordingEvents::default())
}

fn client_for(transport: &Arc<ScriptedTransport>, events: &Arc<RecordingEvents>) -> ApiClient {
    ApiClient::builder("http://localhost:5000/api")
        .with_transport(Arc::clone(transport) as Arc<dyn Transport>)
        .with_events(Arc::clone(events) as Arc<dyn ClientEvents>)
        .build()
        .expect("client builds")
}

#[rstest]
#[tokio::test]
async fn failed_envelope_surfaces_as_client_error(events: Arc<RecordingEvents>) {
    let transport = Arc::new(ScriptedTransport::default().on("/projects", vec![rejected(400, "x")]));
    let client = client_for(&transport, &events);

    let err = client
        .send::<Value>(ApiRequest::get("/projects"))
        .await
        .expect_err("400 must be an error");
    assert!(matches!(err, ApiError::Client { status: 400, .. }));
    assert_eq!(err.message(), "x");
}

#[rstest]
#[tokio::test]
async fn unsuccessful_2xx_is_never_returned(events: Arc<RecordingEvents>) {
    let transport = Arc::new(ScriptedTransport::default().on(
        "/stats/dashboard",
        vec![Reply::Respond(200, json!({"success": false, "message": "x", "data": {"a": 1}}))],
    ));
    let client = client_for(&transport, &events);

    let err = client
        .stats()
        .dashboard::<Value>()
        .await
        .expect_err("unsuccessful envelope must be an error");
    assert_eq!(err.message(), "x");
    assert_eq!(err.status_code(), 200);
}

#[rstest]
#[tokio::test]
async fn concurrent_401s_share_one_refresh(events: Arc<RecordingEvents>) {
    let transport = Arc::new(
        ScriptedTransport::default()
            .on(
                "/users",
                vec![
                    rejected(401, "Access token expired"),
                    rejected(401, "Access token expired"),
                    rejected(401, "Access token expired"),
                    rejected(401, "Access token expired"),
                    rejected(401, "Access token expired"),
                    ok(json!([{"id": "u1"}])),
                ],
            )
            .on(REFRESH_PATH, vec![refreshed()])
            .delayed(REFRESH_PATH, Duration::from_millis(30)),
    );
    let client = client_for(&transport, &events);

    let query = ListQuery::new();
    let users = client.users();
    let calls = (0..5).map(|_| users.list::<Value>(&query));
    let results = join_all(calls).await;

    assert_eq!(transport.hits(REFRESH_PATH), 1);
    assert_eq!(transport.hits("/users"), 10);
    for result in results {
        let page = result.expect("retried request succeeds");
        assert_eq!(page.items, vec![json!({"id": "u1"})]);
    }
    assert_eq!(events.expired.load(Ordering::SeqCst), 0);
    assert!(!client.is_refreshing());
}

#[rstest]
#[tokio::test]
async fn second_401_after_refresh_is_not_retried_again(events: Arc<RecordingEvents>) {
    let transport = Arc::new(
        ScriptedTransport::default()
            .on("/settings/home", vec![rejected(401, "Access token expired")])
            .on(REFRESH_PATH, vec![refreshed()]),
    );
    let client = client_for(&transport, &events);

    let err = client
        .settings()
        .home::<Value>()
        .await
        .expect_err("second 401 must fail");

    assert_eq!(
        err,
        ApiError::Client {
            status: 401,
            message: "Access token expired".to_owned(),
            errors: Vec::new(),
        }
    );
    assert_eq!(transport.hits("/settings/home"), 2);
    assert_eq!(transport.hits(REFRESH_PATH), 1);
}

#[rstest]
#[tokio::test]
async fn failed_refresh_fans_out_original_401(events: Arc<RecordingEvents>) {
    let transport = Arc::new(
        ScriptedTransport::default()
            .on("/contact", vec![rejected(401, "Access token expired")])
            .on(REFRESH_PATH, vec![rejected(500, "Internal server error")])
            .delayed(REFRESH_PATH, Duration::from_millis(30)),
    );
    let client = client_for(&transport, &events);

    let query = ListQuery::new();
    let contact = client.contact();
    let calls = (0..3).map(|_| contact.list::<Value>(&query));
    let results = join_all(calls).await;

    for result in results {
        let err = result.expect_err("refresh failed");
        assert_eq!(
            err,
            ApiError::SessionExpired {
                message: "Access token expired".to_owned()
            }
        );
        assert_eq!(err.status_code(), 401);
    }
    assert_eq!(transport.hits(REFRESH_PATH), 1);
    assert_eq!(transport.hits("/contact"), 3);
    assert_eq!(events.expired.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test]
async fn auth_endpoints_do_not_trigger_refresh(events: Arc<RecordingEvents>) {
    let transport = Arc::new(
        ScriptedTransport::default()
            .on("/auth/login", vec![rejected(401, "Invalid credentials")])
            .on(REFRESH_PATH, vec![refreshed()]),
    );
    let client = client_for(&transport, &events);

    let err = client
        .auth()
        .login::<Value>("admin@example.com", "wrong")
        .await
        .expect_err("bad credentials");

    assert_eq!(err.status_code(), 401);
    assert_eq!(err.message(), "Invalid credentials");
    assert_eq!(transport.hits(REFRESH_PATH), 0);
    assert_eq!(events.expired.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn unreachable_server_is_status_zero(events: Arc<RecordingEvents>) {
    let transport = Arc::new(ScriptedTransport::default().on("/projects", vec![Reply::Fail]));
    let client = client_for(&transport, &events);

    let err = client
        .projects()
        .list::<Value>(&ListQuery::new())
        .await
        .expect_err("network failure");

    assert_eq!(err, ApiError::network());
    assert_eq!(err.status_code(), 0);
    assert_eq!(err.message(), NETWORK_ERROR_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn aborted_request_leaves_refresh_usable(events: Arc<RecordingEvents>) {
    let transport = Arc::new(
        ScriptedTransport::default()
            .on(
                "/posts",
                vec![
                    rejected(401, "Access token expired"),
                    rejected(401, "Access token expired"),
                    ok(json!([])),
                ],
            )
            .on(REFRESH_PATH, vec![refreshed()])
            .delayed(REFRESH_PATH, Duration::from_millis(40)),
    );
    let client = client_for(&transport, &events);
    let query = ListQuery::new().search("ru");

    let superseded =
        tokio::time::timeout(Duration::from_millis(10), client.posts().list::<Value>(&query)).await;
    assert!(superseded.is_err(), "first search is abandoned mid-refresh");
    assert!(client.is_refreshing());

    let page = client
        .posts()
        .list::<Value>(&query)
        .await
        .expect("second search succeeds");

    assert!(page.items.is_empty());
    assert_eq!(transport.hits(REFRESH_PATH), 1);
    assert!(!client.is_refreshing());
    assert_eq!(events.expired.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn abandoned_sole_request_still_settles_the_refresh(events: Arc<RecordingEvents>) {
    let transport = Arc::new(
        ScriptedTransport::default()
            .on("/media", vec![rejected(401, "Access token expired")])
            .on(REFRESH_PATH, vec![rejected(401, "Session expired")])
            .delayed(REFRESH_PATH, Duration::from_millis(20)),
    );
    let client = client_for(&transport, &events);

    let superseded = tokio::time::timeout(
        Duration::from_millis(5),
        client.media().list::<Value>(&ListQuery::new()),
    )
    .await;
    assert!(superseded.is_err(), "request is abandoned mid-refresh");

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(!client.is_refreshing());
    assert_eq!(transport.hits(REFRESH_PATH), 1);
    assert_eq!(events.expired.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test]
async fn mark_read_raises_event_after_success(events: Arc<RecordingEvents>) {
    let transport = Arc::new(
        ScriptedTransport::default()
            .on("/contact/m1/read", vec![ok(json!({"id": "m1", "isRead": true}))])
            .on("/contact/unread-count", vec![ok(json!({"count": 4}))]),
    );
    let client = client_for(&transport, &events);

    let _: Value = client.contact().mark_read("m1").await.expect("marked");
    let unread = client.contact().unread_count().await.expect("count");

    assert_eq!(unread, 4);
    assert_eq!(*events.read.lock().expect("read lock"), vec!["m1".to_owned()]);
}
