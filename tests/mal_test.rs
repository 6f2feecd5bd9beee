use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, TimeDelta};
use reqwest::Url;
use rss_download_rules::{
    Error, Result,
    clock::FixedClock,
    config::MalConfig,
    mal::{AnimeListClient, CodeProvider, OAuthClient},
    management::{TokenManager, TokenStore},
    types::{Season, SeasonName, TokenRecord},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

const CLIENT_ID: &str = "test-client";
const ACCESS_TOKEN: &str = "access-1";

type FormLog = Arc<Mutex<Vec<HashMap<String, String>>>>;

// Helper that binds a mock server on an ephemeral port and returns its base URL
async fn serve<F: FnOnce(String) -> Router>(build: F) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let app = build(base.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}

fn mal_config(base: &str) -> MalConfig {
    MalConfig {
        api_url: format!("{base}/v2"),
        oauth_url: format!("{base}/oauth2"),
        client_id: CLIENT_ID.to_string(),
        state: "RequestID2235".to_string(),
    }
}

fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("rss-download-rules-{name}-{}-{nanos}", std::process::id()))
}

fn spring_2025() -> Season {
    Season {
        name: SeasonName::Spring,
        year: 2025,
    }
}

fn anime(title: &str, season: &str, year: i32) -> Value {
    json!({ "node": { "id": 1, "title": title, "start_season": { "year": year, "season": season } } })
}

fn token_json(access: &str, refresh: &str) -> Value {
    json!({
        "token_type": "Bearer",
        "expires_in": 2678400,
        "access_token": access,
        "refresh_token": refresh
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ACCESS_TOKEN}"))
}

async fn paged_list(
    State(base): State<String>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "{\"error\":\"invalid_token\"}").into_response();
    }

    let next = |page: u32| format!("{base}/v2/users/@me/animelist?page={page}");
    let body = match query.get("page").map(String::as_str) {
        None => {
            assert_eq!(query.get("status").map(String::as_str), Some("plan_to_watch"));
            assert_eq!(query.get("fields").map(String::as_str), Some("start_season"));
            json!({
                "data": [anime("A", "spring", 2025), anime("B", "spring", 2025)],
                "paging": { "next": next(2) }
            })
        }
        Some("2") => json!({
            "data": [anime("C", "spring", 2025), anime("D", "spring", 2025)],
            "paging": { "previous": next(1), "next": next(3) }
        }),
        Some("3") => json!({
            "data": [anime("E", "spring", 2025)],
            "paging": { "previous": next(2) }
        }),
        Some(_) => return StatusCode::NOT_FOUND.into_response(),
    };

    Json(body).into_response()
}

// Token endpoint that records every form it receives
async fn token_endpoint(State(log): State<FormLog>, Form(form): Form<HashMap<String, String>>) -> Response {
    log.lock().unwrap().push(form.clone());

    if form.get("client_id").map(String::as_str) != Some(CLIENT_ID) {
        return (StatusCode::BAD_REQUEST, "invalid_client").into_response();
    }

    match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") if form.get("code").map(String::as_str) == Some("auth-code") => {
            Json(token_json(ACCESS_TOKEN, "refresh-1")).into_response()
        }
        Some("refresh_token") if form.get("refresh_token").map(String::as_str) == Some("refresh-1") => {
            Json(token_json("access-2", "refresh-2")).into_response()
        }
        _ => (StatusCode::BAD_REQUEST, "{\"error\":\"invalid_grant\"}").into_response(),
    }
}

async fn token_server() -> (String, FormLog) {
    let log: FormLog = Arc::new(Mutex::new(Vec::new()));
    let state = Arc::clone(&log);
    let base = serve(|_| {
        Router::new()
            .route("/oauth2/token", post(token_endpoint))
            .with_state(state)
    })
    .await;
    (base, log)
}

struct FixedCode {
    code: String,
    seen_url: Option<Url>,
}

impl FixedCode {
    fn new(code: &str) -> Self {
        FixedCode {
            code: code.to_string(),
            seen_url: None,
        }
    }
}

impl CodeProvider for FixedCode {
    fn authorization_code(&mut self, authorize_url: &Url) -> Result<String> {
        self.seen_url = Some(authorize_url.clone());
        Ok(self.code.clone())
    }
}

#[tokio::test]
async fn test_pagination_collects_all_pages_in_order() {
    let base = serve(|base| {
        Router::new()
            .route("/v2/users/@me/animelist", get(paged_list))
            .with_state(base)
    })
    .await;

    let titles = AnimeListClient::new(&mal_config(&base))
        .fetch_plan_to_watch(ACCESS_TOKEN, &spring_2025())
        .await
        .unwrap();

    assert_eq!(titles, vec!["A", "B", "C", "D", "E"]);
}

#[tokio::test]
async fn test_season_filter_keeps_exact_matches() {
    let base = serve(|_| {
        Router::new().route(
            "/v2/users/@me/animelist",
            get(|| async {
                Json(json!({
                    "data": [
                        anime("Keep 1", "spring", 2025),
                        anime("Last Year", "spring", 2024),
                        anime("Next Season", "summer", 2025),
                        { "node": { "id": 9, "title": "No Season" } },
                        anime("Keep 2", "spring", 2025)
                    ],
                    "paging": {}
                }))
            }),
        )
    })
    .await;

    let titles = AnimeListClient::new(&mal_config(&base))
        .fetch_plan_to_watch(ACCESS_TOKEN, &spring_2025())
        .await
        .unwrap();

    assert_eq!(titles, vec!["Keep 1", "Keep 2"]);
}

#[tokio::test]
async fn test_list_error_status_echoes_body() {
    let base = serve(|base| {
        Router::new()
            .route("/v2/users/@me/animelist", get(paged_list))
            .with_state(base)
    })
    .await;

    let err = AnimeListClient::new(&mal_config(&base))
        .fetch_plan_to_watch("wrong-token", &spring_2025())
        .await
        .unwrap_err();

    match &err {
        Error::Status { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("invalid_token"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), 69);
}

#[tokio::test]
async fn test_malformed_envelope_fails_whole_fetch() {
    let base = serve(|base| {
        Router::new()
            .route(
                "/v2/users/@me/animelist",
                get(
                    |State(base): State<String>, Query(q): Query<HashMap<String, String>>| async move {
                        if q.contains_key("page") {
                            Json(json!({ "data": "not a list", "paging": {} }))
                        } else {
                            Json(json!({
                                "data": [anime("A", "spring", 2025)],
                                "paging": { "next": format!("{base}/v2/users/@me/animelist?page=2") }
                            }))
                        }
                    },
                ),
            )
            .with_state(base)
    })
    .await;

    let err = AnimeListClient::new(&mal_config(&base))
        .fetch_plan_to_watch(ACCESS_TOKEN, &spring_2025())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn test_non_json_success_body_is_decode_error() {
    let base = serve(|_| {
        Router::new().route(
            "/v2/users/@me/animelist",
            get(|| async { (StatusCode::OK, "<html>maintenance</html>") }),
        )
    })
    .await;

    let err = AnimeListClient::new(&mal_config(&base))
        .fetch_plan_to_watch(ACCESS_TOKEN, &spring_2025())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
    assert_eq!(err.exit_code(), 65);
}

#[test]
fn test_authorize_url() {
    let client = OAuthClient::new(&mal_config("https://myanimelist.net"));
    let url = client.authorize_url("challenge~value").unwrap();

    assert_eq!(url.path(), "/oauth2/authorize");
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["client_id"], CLIENT_ID);
    assert_eq!(params["code_challenge"], "challenge~value");
    assert_eq!(params["state"], "RequestID2235");
}

#[tokio::test]
async fn test_authorize_exchanges_code_with_challenge() {
    let (base, log) = token_server().await;
    let client = OAuthClient::new(&mal_config(&base));
    let mut provider = FixedCode::new("auth-code");

    let token = client.authorize(&mut provider).await.unwrap();
    assert_eq!(token.access_token, ACCESS_TOKEN);
    assert_eq!(token.refresh_token, "refresh-1");

    let seen_url = provider.seen_url.expect("provider should see the url");
    let challenge = seen_url
        .query_pairs()
        .find(|(k, _)| k == "code_challenge")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert_eq!(challenge.len(), 128);

    let forms = log.lock().unwrap();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0]["grant_type"], "authorization_code");
    assert_eq!(forms[0]["code"], "auth-code");
    assert_eq!(forms[0]["code_verifier"], challenge);
}

#[tokio::test]
async fn test_authorize_rejected_code() {
    let (base, _log) = token_server().await;
    let client = OAuthClient::new(&mal_config(&base));

    let err = client.authorize(&mut FixedCode::new("bad-code")).await.unwrap_err();
    match err {
        Error::Status { status, body } => {
            assert_eq!(status.as_u16(), 400);
            assert!(body.contains("invalid_grant"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_refresh_token() {
    let (base, log) = token_server().await;
    let client = OAuthClient::new(&mal_config(&base));

    let token = client.refresh("refresh-1").await.unwrap();
    assert_eq!(token.access_token, "access-2");

    let forms = log.lock().unwrap();
    assert_eq!(forms[0]["grant_type"], "refresh_token");
    assert_eq!(forms[0]["refresh_token"], "refresh-1");
    assert!(!forms[0].contains_key("code"));
}

#[tokio::test]
async fn test_empty_access_token_is_rejected() {
    let base = serve(|_| {
        Router::new().route(
            "/oauth2/token",
            post(|| async { Json(token_json("", "refresh")) }),
        )
    })
    .await;

    let err = OAuthClient::new(&mal_config(&base))
        .refresh("refresh-1")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn test_first_run_authorizes_and_persists() {
    let (base, log) = token_server().await;
    let dir = temp_dir("first-run");
    let path = dir.join("rss_download_rules/token.json");
    let manager = TokenManager::new(
        TokenStore::new(&path),
        OAuthClient::new(&mal_config(&base)),
        Box::new(FixedClock(Local::now())),
    );

    let access = manager
        .get_valid_token(&mut FixedCode::new("auth-code"))
        .await
        .unwrap();
    assert_eq!(access, ACCESS_TOKEN);

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.ends_with('\n'));

    let loaded = TokenStore::new(&path).load().await.unwrap().unwrap();
    assert_eq!(loaded.record.access_token, ACCESS_TOKEN);
    assert!(!loaded.is_stale(Local::now()));

    // a second call reuses the stored token
    let again = manager
        .get_valid_token(&mut FixedCode::new("unused"))
        .await
        .unwrap();
    assert_eq!(again, ACCESS_TOKEN);
    assert_eq!(log.lock().unwrap().len(), 1);

    fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_stale_token_is_refreshed_and_saved() {
    let (base, log) = token_server().await;
    let dir = temp_dir("stale");
    let path = dir.join("token.json");
    let store = TokenStore::new(&path);
    store
        .save(&TokenRecord {
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            access_token: ACCESS_TOKEN.to_string(),
            refresh_token: "refresh-1".to_string(),
        })
        .await
        .unwrap();

    let manager = TokenManager::new(
        store,
        OAuthClient::new(&mal_config(&base)),
        Box::new(FixedClock(Local::now() + TimeDelta::hours(2))),
    );

    let access = manager
        .get_valid_token(&mut FixedCode::new("unused"))
        .await
        .unwrap();
    assert_eq!(access, "access-2");
    assert_eq!(log.lock().unwrap()[0]["grant_type"], "refresh_token");

    let saved = TokenStore::new(&path).load().await.unwrap().unwrap();
    assert_eq!(saved.record.refresh_token, "refresh-2");

    fs::remove_dir_all(dir).ok();
}
