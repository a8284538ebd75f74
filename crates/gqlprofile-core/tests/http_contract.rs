//! HTTP contract tests against a local mock backend.
//!
//! Each test starts a `tiny_http` server on an ephemeral port. The server
//! records every request and answers through a per-test responder.

use std::io::Read;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::{json, Value};
use tiny_http::{Header, Response, Server, StatusCode};

use gqlprofile_core::api::GraphqlRequest;
use gqlprofile_core::auth::{submit_login, LoginError, LoginForm, LoginView, MemoryStorage};
use gqlprofile_core::config::Endpoints;
use gqlprofile_core::{
    ApiClient, ApiError, DashboardLoader, LoadGeneration, LoadOutcome, TokenStore,
};

// ---------------------------------------------------------------------------
// Mock backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Recorded {
    url: String,
    authorization: Option<String>,
    body: String,
}

struct Reply {
    status: u16,
    content_type: &'static str,
    body: String,
}

impl Reply {
    fn json(body: Value) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.to_string(),
        }
    }
}

struct MockServer {
    base: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    fn start<F>(responder: F) -> Self
    where
        F: Fn(&Recorded) -> Reply + Send + 'static,
    {
        let server = Server::http("127.0.0.1:0").expect("bind mock server");
        let addr = server.server_addr().to_ip().expect("ip listener");
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let thread_hits = Arc::clone(&hits);
        let thread_requests = Arc::clone(&requests);
        thread::spawn(move || {
            for mut request in server.incoming_requests() {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let recorded = Recorded {
                    url: request.url().to_string(),
                    authorization: request
                        .headers()
                        .iter()
                        .find(|h| h.field.equiv("Authorization"))
                        .map(|h| h.value.as_str().to_string()),
                    body,
                };
                thread_hits.fetch_add(1, Ordering::SeqCst);
                thread_requests.lock().unwrap().push(recorded.clone());

                let reply = responder(&recorded);
                let header =
                    Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()).unwrap();
                let response = Response::from_string(reply.body)
                    .with_status_code(StatusCode(reply.status))
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base: format!("http://{}", addr),
            hits,
            requests,
        }
    }

    fn endpoints(&self) -> Endpoints {
        Endpoints {
            signin: format!("{}/api/auth/signin", self.base),
            graphql: format!("{}/api/graphql-engine/v1/graphql", self.base),
        }
    }

    fn client(&self) -> ApiClient {
        ApiClient::new(self.endpoints()).expect("client")
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_token(payload: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.signature", header, payload)
}

fn valid_token() -> String {
    make_token(json!({"sub": "4242", "exp": 4_102_444_800i64}))
}

#[derive(Default)]
struct RecordingView {
    errors: Vec<String>,
    submitting: Vec<bool>,
}

impl LoginView for RecordingView {
    fn render_form(&mut self) {}

    fn set_submitting(&mut self, submitting: bool) {
        self.submitting.push(submitting);
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

fn profile_payload() -> Value {
    json!({"data": {
        "user": [{"id": 4242, "login": "jdoe", "totalUp": 3000, "totalDown": 2000}],
        "transaction_aggregate": {"aggregate": {"sum": {"amount": 35}}},
        "transaction": [
            {"amount": 10, "path": "/oujda/module/a", "createdAt": "2024-01-01T00:00:00Z"},
            {"amount": 25, "path": "/oujda/module/b", "createdAt": "2024-02-01T00:00:00Z"}
        ],
        "progress": [],
        "audit_given": [],
        "audit_received": []
    }})
}

/// Answers each dashboard query by recognizing its document
fn dashboard_responder(request: &Recorded) -> Reply {
    if request.body.contains("_regex") {
        Reply::json(json!({"data": {"transaction": [{"type": "skill_go", "amount": 50}]}}))
    } else if request.body.contains("\\\"level\\\"") {
        Reply::json(json!({"data": {"transaction": [{"amount": 14}]}}))
    } else {
        Reply::json(profile_payload())
    }
}

// ---------------------------------------------------------------------------
// Sign-in
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_sign_in_sends_basic_auth_and_stores_clean_token() {
    let token = valid_token();
    let quoted = format!("\"{}\"\n", token);
    let server = MockServer::start(move |_| Reply::text(200, &quoted));

    let api = server.client();
    let mut view = RecordingView::default();
    let mut store = TokenStore::new(MemoryStorage::new());
    let form = LoginForm::new("  jdoe ", "s3cret");

    submit_login(&api, &mut view, &mut store, &form)
        .await
        .expect("login succeeds");

    assert_eq!(store.get_token(), Some(token));
    assert!(store.is_authenticated());
    assert!(view.errors.is_empty());
    assert_eq!(view.submitting, vec![true, false]);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "/api/auth/signin");
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Basic amRvZTpzM2NyZXQ=")
    );
}

#[tokio::test]
async fn test_sign_in_rejection_reports_invalid_credentials() {
    let server = MockServer::start(|_| Reply::text(401, "nope"));
    let api = server.client();
    let mut view = RecordingView::default();
    let mut store = TokenStore::new(MemoryStorage::new());

    let result = submit_login(&api, &mut view, &mut store, &LoginForm::new("jdoe", "bad")).await;

    assert!(matches!(
        result,
        Err(LoginError::Api(ApiError::InvalidCredentials))
    ));
    assert_eq!(view.errors, vec!["invalid credentials".to_string()]);
    assert_eq!(view.submitting, vec![true, false]);
    assert_eq!(store.get_token(), None);
}

#[tokio::test]
async fn test_sign_in_rejects_malformed_token() {
    let server = MockServer::start(|_| Reply::text(200, "not-a-jwt"));
    let api = server.client();
    let mut view = RecordingView::default();
    let mut store = TokenStore::new(MemoryStorage::new());

    let result = submit_login(&api, &mut view, &mut store, &LoginForm::new("jdoe", "pw")).await;

    assert!(matches!(result, Err(LoginError::Api(ApiError::InvalidToken))));
    assert_eq!(store.get_token(), None);
}

#[tokio::test]
async fn test_empty_password_never_reaches_the_network() {
    let server = MockServer::start(|_| Reply::text(200, "a.b.c"));
    let api = server.client();
    let mut view = RecordingView::default();
    let mut store = TokenStore::new(MemoryStorage::new());

    let result = submit_login(&api, &mut view, &mut store, &LoginForm::new("jdoe", "   ")).await;

    assert!(matches!(result, Err(LoginError::MissingFields)));
    assert_eq!(
        view.errors,
        vec!["please enter both username/email and password".to_string()]
    );
    assert!(view.submitting.is_empty());
    assert_eq!(server.hits(), 0);
}

// ---------------------------------------------------------------------------
// GraphQL
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_graphql_sends_bearer_token_and_query() {
    let server = MockServer::start(|_| Reply::json(json!({"data": {"user": [{"id": 1}]}})));
    let token = valid_token();
    let api = server.client().with_token(token.clone());

    let body = api
        .graphql("query { user { id } }", json!({}))
        .await
        .expect("query succeeds");

    assert_eq!(body["data"]["user"][0]["id"], 1);
    let requests = server.requests();
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some(format!("Bearer {}", token).as_str())
    );
    let sent: Value = serde_json::from_str(&requests[0].body).expect("json body");
    assert_eq!(sent["query"], "query { user { id } }");
    assert_eq!(sent["variables"], json!({}));
}

#[tokio::test]
async fn test_graphql_errors_with_ok_status_fail_with_first_message() {
    let server = MockServer::start(|_| {
        Reply::json(json!({"errors": [{"message": "boom"}, {"message": "second"}]}))
    });
    let api = server.client().with_token(valid_token());

    let err = api
        .graphql("query { user { id } }", json!({}))
        .await
        .expect_err("errors array fails the request");

    assert_eq!(err.to_string(), "boom");
    match err {
        ApiError::Graphql { errors, .. } => assert_eq!(errors.len(), 2),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_graphql_status_errors_map_to_messages() {
    let server = MockServer::start(|request| {
        if request.body.contains("forbidden") {
            Reply::text(403, "")
        } else {
            Reply::text(401, "")
        }
    });
    let api = server.client().with_token(valid_token());

    let unauthorized = api.graphql("query { me }", json!({})).await.expect_err("401");
    assert_eq!(unauthorized.to_string(), "unauthorized, please login again");

    let forbidden = api
        .graphql("query { forbidden }", json!({}))
        .await
        .expect_err("403");
    assert_eq!(forbidden.to_string(), "access forbidden");
}

#[tokio::test]
async fn test_graphql_rejects_non_json_content() {
    let server = MockServer::start(|_| Reply::text(200, "<html>maintenance</html>"));
    let api = server.client().with_token(valid_token());

    let err = api.graphql("query { me }", json!({})).await.expect_err("not json");
    assert!(matches!(err, ApiError::NotJson(_)));
}

#[tokio::test]
async fn test_graphql_without_token_sends_nothing() {
    let server = MockServer::start(|_| Reply::json(json!({"data": {}})));
    let api = server.client();

    let err = api.graphql("query { me }", json!({})).await.expect_err("no token");
    assert!(matches!(err, ApiError::MissingToken));
    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn test_batch_results_keep_input_order() {
    let server = MockServer::start(|request| {
        let sent: Value = serde_json::from_str(&request.body).unwrap_or_default();
        Reply::json(json!({"data": {"echo": sent["variables"]["n"]}}))
    });
    let api = server.client().with_token(valid_token());
    let requests: Vec<GraphqlRequest> = (0..3)
        .map(|n| GraphqlRequest::new("query($n: Int) { echo }").with_variables(json!({"n": n})))
        .collect();

    let results = api.graphql_batch(&requests).await.expect("batch succeeds");

    let echoed: Vec<i64> = results
        .iter()
        .map(|r| r["data"]["echo"].as_i64().unwrap_or(-1))
        .collect();
    assert_eq!(echoed, vec![0, 1, 2]);
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn test_batch_fails_when_any_member_fails() {
    let server = MockServer::start(|request| {
        if request.body.contains("bad") {
            Reply::json(json!({"errors": [{"message": "bad field"}]}))
        } else {
            Reply::json(json!({"data": {}}))
        }
    });
    let api = server.client().with_token(valid_token());
    let requests = vec![
        GraphqlRequest::new("query { good }"),
        GraphqlRequest::new("query { bad }"),
    ];

    let err = api.graphql_batch(&requests).await.expect_err("batch fails");
    assert_eq!(err.to_string(), "bad field");
}

// ---------------------------------------------------------------------------
// Dashboard loading
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_dashboard_load_aggregates_all_queries() {
    let server = MockServer::start(dashboard_responder);
    let loader = DashboardLoader::new(server.client());
    let store = TokenStore::new(MemoryStorage::with_value(valid_token()));

    let outcome = loader.load(&store).await.expect("load succeeds");

    let LoadOutcome::Ready(profile) = outcome else {
        panic!("load should be current");
    };
    assert_eq!(profile.login, "jdoe");
    assert_eq!(profile.total_xp, 35);
    assert_eq!(profile.level, 14);
    assert_eq!(profile.audit_ratio, 1.5);
    assert_eq!(profile.skills.len(), 1);
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn test_dashboard_load_superseded_mid_flight_is_stale() {
    let generation = Arc::new(LoadGeneration::new());
    let bumped = Arc::new(AtomicBool::new(false));

    let server_generation = Arc::clone(&generation);
    let server_bumped = Arc::clone(&bumped);
    let server = MockServer::start(move |request| {
        // A newer load starts while this one is in flight
        if !server_bumped.swap(true, Ordering::SeqCst) {
            server_generation.begin();
        }
        dashboard_responder(request)
    });

    let loader = DashboardLoader::with_generation(server.client(), Arc::clone(&generation));
    let store = TokenStore::new(MemoryStorage::with_value(valid_token()));

    let outcome = loader.load(&store).await.expect("stale loads are not errors");
    assert!(matches!(outcome, LoadOutcome::Stale));
    assert_eq!(generation.current(), 2);
}

#[tokio::test]
async fn test_dashboard_load_superseded_error_is_dropped() {
    let generation = Arc::new(LoadGeneration::new());
    let server_generation = Arc::clone(&generation);
    let bumped = Arc::new(AtomicBool::new(false));
    let server_bumped = Arc::clone(&bumped);
    let server = MockServer::start(move |_| {
        if !server_bumped.swap(true, Ordering::SeqCst) {
            server_generation.begin();
        }
        Reply::text(500, "internal")
    });

    let loader = DashboardLoader::with_generation(server.client(), Arc::clone(&generation));
    let store = TokenStore::new(MemoryStorage::with_value(valid_token()));

    assert!(matches!(loader.load(&store).await, Ok(LoadOutcome::Stale)));
}
