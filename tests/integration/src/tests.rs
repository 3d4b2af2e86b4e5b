//! Integration tests for the Rooch raffle stack.
//!
//! A mock Rooch node (a small axum JSON-RPC server on a random local port)
//! serves decoded object states, claim tables and balances. The tests drive
//! it through `RoochClient` directly and through the HTTP API end to end.
//!
//! Run:
//! ```bash
//! cargo test -p rooch-raffle-integration-tests
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use cosmwasm_std::Uint256;
use raffle_api::msg::{BalanceResponse, EnvelopeResponse, RaffleResponse};
use raffle_api::query::now_ms;
use raffle_api::state::ensure_schema;
use raffle_api::storage::ImageStore;
use raffle_api::{router, AppState};
use rooch_client::{ClientError, ExecutionSummary, RoochClient};
use rooch_raffle_common::{ActivityStatus, ClaimedPage, EnvelopeKind};
use sea_orm::Database;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tower::ServiceExt;

// ─── Constants ───

const HOUR: u64 = 3_600_000;

const COIN_ENVELOPE: &str = "0xe1";
const NFT_ENVELOPE: &str = "0xe2";
const DRAINED_ENVELOPE: &str = "0xe4";
const RAFFLE_BOX: &str = "0xb1";
const MISSING: &str = "0xdead";

const CLAIM_TABLE: &str = "0x7ab1e";
const STUCK_TABLE: &str = "0x57c4";
const CLAIMERS: [&str; 5] = ["0xa1", "0xa2", "0xa3", "0xa4", "0xa5"];

const BAD_OWNER: &str = "0xbad";
const RGAS_PADDED: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000003::gas_coin::RGas";
const RGAS: &str = "0x3::gas_coin::RGas";

// ─── Fixtures ───

fn coin_envelope(id: &str, remaining: &str, start: u64, end: u64) -> Value {
    json!({
        "id": id,
        "object_type": "0x9::red_envelope::CoinEnvelope",
        "created_at": start.to_string(),
        "decoded_value": {
            "abilities": 12,
            "type": "0x9::red_envelope::CoinEnvelope",
            "value": {
                "sender": "0xa11ce",
                "name": "Lunar new year",
                "desc": "first come first served",
                "image_url": "/app/images/cover.png",
                "cover_color": "#d32f2f",
                "text_color": "#ffffff",
                "coin_store": {
                    "abilities": 12,
                    "type": format!("0x2::object::Object<0x3::coin_store::CoinStore<{}>>", RGAS_PADDED),
                    "value": { "id": "0xc0" }
                },
                "total_envelope": "5",
                "claimed_envelope": "5",
                "total_coin": "1000",
                "remaining_coin": remaining,
                "claimed_address": {
                    "abilities": 4,
                    "type": "0x2::table::Table<address, u256>",
                    "value": { "handle": { "value": { "id": CLAIM_TABLE } } }
                },
                "start_time": start.to_string(),
                "end_time": end.to_string()
            }
        }
    })
}

fn nft_envelope(now: u64) -> Value {
    json!({
        "id": NFT_ENVELOPE,
        "decoded_value": {
            "type": "0x9::red_envelope::NFTEnvelope<0x0042::badge::Badge>",
            "value": {
                "sender": "0xb0b",
                "name": "Badge drop",
                "claimed_address": ["0xc1", "0xc2", "0xc3"],
                "nfts": { "value": { "handle": { "value": { "id": "0xf00" } } } },
                "start_time": now - HOUR,
                "end_time": now + HOUR
            }
        }
    })
}

fn raffle_box(now: u64) -> Value {
    json!({
        "id": RAFFLE_BOX,
        "decoded_value": {
            "type": "0x9::raffle::RaffleBox",
            "value": {
                "creator": "0xc4ea7",
                "name": "Weekly box",
                "coin_store": {
                    "type": format!("0x2::object::Object<0x3::coin_store::CoinStore<{}>>", RGAS_PADDED),
                    "value": { "id": "0xc1" }
                },
                "total_coin": "500",
                "reward_coin": "100",
                "start_time": (now - 2 * HOUR).to_string(),
                "end_time": (now - HOUR).to_string(),
                "is_end": false,
                "claimed_address": ["0x1", "0x2"],
                "reward_address": ["0x2", "0x3"]
            }
        }
    })
}

fn claim_row(index: usize, address: &str) -> Value {
    json!({
        "field_key": format!("0xkey{}", index),
        "state": {
            "id": format!("0xrow{}", index),
            "created_at": (1_700_000_000_000u64 + index as u64).to_string(),
            "decoded_value": {
                "type": "0x2::object::DynamicField<address, u256>",
                "value": { "name": address, "value": ((index + 1) * 100).to_string() }
            }
        }
    })
}

// ─── Mock node ───

struct MockNode {
    objects: HashMap<String, Value>,
    tables: HashMap<String, Vec<Value>>,
    requests: Mutex<Vec<Value>>,
}

impl MockNode {
    fn new(now: u64) -> Self {
        let objects = [
            coin_envelope(COIN_ENVELOPE, "400", now - HOUR, now + HOUR),
            coin_envelope(DRAINED_ENVELOPE, "0", now - 2 * HOUR, now - HOUR),
            nft_envelope(now),
            raffle_box(now),
        ]
        .into_iter()
        .map(|state| (state["id"].as_str().unwrap().to_string(), state))
        .collect();

        let rows: Vec<Value> = CLAIMERS
            .iter()
            .enumerate()
            .map(|(i, address)| claim_row(i, address))
            .collect();
        let tables = HashMap::from([
            (CLAIM_TABLE.to_string(), rows.clone()),
            (STUCK_TABLE.to_string(), rows),
        ]);

        MockNode {
            objects,
            tables,
            requests: Mutex::new(vec![]),
        }
    }

    fn requests_for(&self, method: &str) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r["method"] == method)
            .cloned()
            .collect()
    }

    fn query_object_states(&self, params: &Value) -> Result<Value, Value> {
        string_limit(params)?;
        let ids = params[0]["object_id"].as_str().unwrap_or("");
        let data: Vec<Value> = ids
            .split(',')
            .filter_map(|id| self.objects.get(id).cloned())
            .collect();
        Ok(json!({ "data": data, "next_cursor": null, "has_next_page": false }))
    }

    /// Cursors are `row-<index of the last row returned>`.
    fn list_field_states(&self, params: &Value) -> Result<Value, Value> {
        let limit = string_limit(params)?.unwrap_or(20) as usize;
        let handle = params[0].as_str().unwrap_or("");
        let rows = self.tables.get(handle).cloned().unwrap_or_default();
        if handle == STUCK_TABLE {
            // a node that keeps handing back the same cursor
            return Ok(json!({ "data": [rows[0]], "next_cursor": "stuck", "has_next_page": true }));
        }

        let start = params[1]
            .as_str()
            .and_then(|c| c.strip_prefix("row-"))
            .and_then(|i| i.parse::<usize>().ok())
            .map(|i| i + 1)
            .unwrap_or(0)
            .min(rows.len());
        let end = (start + limit).min(rows.len());
        let next_cursor = (end > start).then(|| format!("row-{}", end - 1));
        Ok(json!({
            "data": rows[start..end].to_vec(),
            "next_cursor": next_cursor,
            "has_next_page": end < rows.len()
        }))
    }

    fn balance(&self, params: &Value) -> Result<Value, Value> {
        if params[0] == BAD_OWNER {
            return Err(json!({ "code": -32000, "message": "invalid owner address" }));
        }
        Ok(json!({
            "coin_type": params[1],
            "name": "Rooch Gas Coin",
            "symbol": "RGAS",
            "decimals": 8,
            "supply": "100000000000",
            "balance": "123450000"
        }))
    }
}

/// The node reads `limit` as a decimal string (`StrView<u64>`); a JSON
/// number is an invalid-params error.
fn string_limit(params: &Value) -> Result<Option<u64>, Value> {
    match &params[2] {
        Value::Null => Ok(None),
        Value::String(s) => s
            .parse()
            .map(Some)
            .map_err(|_| json!({ "code": -32602, "message": format!("invalid limit {:?}", s) })),
        other => Err(json!({
            "code": -32602,
            "message": format!("invalid type: {}, expected a string limit", other)
        })),
    }
}

async fn rpc(State(node): State<Arc<MockNode>>, Json(request): Json<Value>) -> Json<Value> {
    node.requests.lock().unwrap().push(request.clone());
    let params = &request["params"];
    let outcome = match request["method"].as_str().unwrap_or("") {
        "rooch_queryObjectStates" => node.query_object_states(params),
        "rooch_listFieldStates" => node.list_field_states(params),
        "rooch_getBalance" => node.balance(params),
        "rooch_executeRawTransaction" => Ok(json!({
            "sequence_info": { "tx_order": "77" },
            "execution_info": { "tx_hash": "0xfeed", "status": { "type": "executed" } }
        })),
        other => Err(json!({ "code": -32601, "message": format!("method {} not found", other) })),
    };
    let id = request["id"].clone();
    Json(match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(error) => json!({ "jsonrpc": "2.0", "id": id, "error": error }),
    })
}

async fn spawn_node(now: u64) -> (String, Arc<MockNode>) {
    let node = Arc::new(MockNode::new(now));
    let app = Router::new().route("/", post(rpc)).with_state(node.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), node)
}

// ─── API helpers ───

async fn setup_api(rpc_url: &str) -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("attrs.db").display());
    let db = Database::connect(url).await.unwrap();
    ensure_schema(&db).await.unwrap();
    let images = ImageStore::open(dir.path().join("images"), 64 * 1024)
        .await
        .unwrap();
    let state = AppState::new(db, RoochClient::new(rpc_url), images, "0x9");
    (router(state), dir)
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json<T: serde::de::DeserializeOwned>(app: &Router, uri: &str) -> T {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = call(app, request).await;
    assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));
    serde_json::from_slice(&body).unwrap()
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    call(app, request).await
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_client_reads_coin_envelope() {
    let now = now_ms();
    let (url, node) = spawn_node(now).await;
    let client = RoochClient::new(url);

    let envelope = client.get_envelope(COIN_ENVELOPE, now).await.unwrap().unwrap();
    assert_eq!(envelope.status, ActivityStatus::Ongoing);
    assert_eq!(envelope.total_envelope, Some(5));
    assert_eq!(envelope.claim_table(), Some(CLAIM_TABLE));
    let EnvelopeKind::Coin(coin) = &envelope.kind else {
        panic!("expected coin envelope");
    };
    assert_eq!(coin.coin_type.as_deref(), Some(RGAS));
    assert_eq!(coin.remaining_coin, Some(Uint256::from(400u64)));

    let sent = node.requests_for("rooch_queryObjectStates");
    assert_eq!(sent.len(), 1);
    let params = &sent[0]["params"];
    assert_eq!(params[0]["object_id"], COIN_ENVELOPE);
    assert_eq!(params[2], "1");
    assert_eq!(params[3]["decode"], true);
    assert_eq!(params[3]["descending"], true);
}

#[tokio::test]
async fn test_client_status_follows_the_clock() {
    let now = now_ms();
    let (url, _node) = spawn_node(now).await;
    let client = RoochClient::new(url);

    let early = client.get_envelope(COIN_ENVELOPE, now - 2 * HOUR).await.unwrap().unwrap();
    assert_eq!(early.status, ActivityStatus::NotStarted);

    // remaining coin left, so the window closing only ends it
    let late = client.get_envelope(COIN_ENVELOPE, now + 2 * HOUR).await.unwrap().unwrap();
    assert_eq!(late.status, ActivityStatus::Ended);

    let drained = client.get_envelope(DRAINED_ENVELOPE, now).await.unwrap().unwrap();
    assert_eq!(drained.status, ActivityStatus::AllClaimed);
}

#[tokio::test]
async fn test_client_missing_object_is_none() {
    let now = now_ms();
    let (url, _node) = spawn_node(now).await;
    let client = RoochClient::new(url);

    assert!(client.get_envelope(MISSING, now).await.unwrap().is_none());
    assert!(client.get_raffle(MISSING, now).await.unwrap().is_none());
}

#[tokio::test]
async fn test_claimed_pages_follow_node_cursor() {
    let now = now_ms();
    let (url, node) = spawn_node(now).await;
    let client = RoochClient::new(url);

    let first = client.claimed_page(CLAIM_TABLE, None, Some(2)).await.unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.items[0].address, "0xa1");
    assert_eq!(first.items[0].amount, Uint256::from(100u64));
    assert_eq!(first.items[0].claimed_at, Some(1_700_000_000_000));
    assert_eq!(first.next_cursor.as_deref(), Some("row-1"));
    assert!(first.has_next_page);

    let second = client
        .claimed_page(CLAIM_TABLE, first.next_cursor.as_deref(), Some(2))
        .await
        .unwrap();
    assert_eq!(second.items[0].address, "0xa3");

    let all = client.all_claimed(CLAIM_TABLE, Some(2)).await.unwrap();
    let addresses: Vec<&str> = all.iter().map(|item| item.address.as_str()).collect();
    assert_eq!(addresses, CLAIMERS);

    let limits: Vec<Value> = node
        .requests_for("rooch_listFieldStates")
        .iter()
        .map(|r| r["params"][2].clone())
        .collect();
    assert!(limits.iter().all(|l| *l == "2"));
}

#[tokio::test]
async fn test_all_claimed_stops_on_repeated_cursor() {
    let now = now_ms();
    let (url, node) = spawn_node(now).await;
    let client = RoochClient::new(url);

    let items = client.all_claimed(STUCK_TABLE, None).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(node.requests_for("rooch_listFieldStates").len(), 2);
}

#[tokio::test]
async fn test_balance_normalizes_coin_type() {
    let now = now_ms();
    let (url, node) = spawn_node(now).await;
    let client = RoochClient::new(url);

    let info = client.get_balance("0xa11ce", RGAS_PADDED).await.unwrap();
    assert_eq!(info.coin_type, RGAS);
    assert_eq!(info.decimals, 8);
    assert_eq!(info.balance, Uint256::from(123_450_000u64));

    let sent = node.requests_for("rooch_getBalance");
    assert_eq!(sent[0]["params"], json!(["0xa11ce", RGAS]));
}

#[tokio::test]
async fn test_node_errors_surface_as_rpc_errors() {
    let now = now_ms();
    let (url, _node) = spawn_node(now).await;
    let client = RoochClient::new(url);

    let err = client.get_balance(BAD_OWNER, RGAS).await.unwrap_err();
    assert!(matches!(err, ClientError::Rpc { code: -32000, .. }));

    let err = client.call::<Value>("rooch_nope", json!([])).await.unwrap_err();
    match err {
        ClientError::Rpc { code, message } => {
            assert_eq!(code, -32601);
            assert!(message.contains("rooch_nope"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_limits_travel_as_decimal_strings() {
    let now = now_ms();
    let (url, node) = spawn_node(now).await;
    let client = RoochClient::new(url);

    let err = client
        .call::<Value>(
            "rooch_listFieldStates",
            json!([CLAIM_TABLE, null, 2, { "decode": true }]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Rpc { code: -32602, .. }));

    let page = client.list_field_states(CLAIM_TABLE, None, Some(3)).await.unwrap();
    assert_eq!(page.data.len(), 3);
    let sent = node.requests_for("rooch_listFieldStates");
    assert_eq!(sent.last().unwrap()["params"][2], "3");
}

#[tokio::test]
async fn test_execute_raw_transaction() {
    let now = now_ms();
    let (url, node) = spawn_node(now).await;
    let client = RoochClient::new(url);

    let summary = client.execute_raw_transaction("0x00ff").await.unwrap();
    assert!(summary.is_executed());
    assert_eq!(summary.tx_hash.as_deref(), Some("0xfeed"));
    assert_eq!(
        node.requests_for("rooch_executeRawTransaction")[0]["params"],
        json!(["0x00ff"])
    );
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP API
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_api_envelope_merges_attributes() {
    let now = now_ms();
    let (url, _node) = spawn_node(now).await;
    let (app, _dir) = setup_api(&url).await;

    let bare: EnvelopeResponse = get_json(&app, "/api/envelopes/0xe1").await;
    assert!(bare.attributes.is_none());
    assert_eq!(bare.envelope.status, ActivityStatus::Ongoing);
    assert_eq!(bare.envelope.theme.text_color.as_deref(), Some("#ffffff"));

    let (status, _) = post_json(
        &app,
        "/api/envelope-attributes",
        json!({
            "envelope_id": COIN_ENVELOPE,
            "envelope_type": "coin",
            "cover_image": "/app/images/cover.png",
            "cover_color": "#aa0000",
            "text_color": null,
            "greeting": "Gong xi fa cai"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let merged: EnvelopeResponse = get_json(&app, "/api/envelopes/0xe1").await;
    let attributes = merged.attributes.unwrap();
    assert_eq!(attributes.envelope_type, "coin");
    assert_eq!(attributes.cover_color.as_deref(), Some("#aa0000"));
    assert_eq!(attributes.greeting.as_deref(), Some("Gong xi fa cai"));
    assert_eq!(merged.envelope.id, COIN_ENVELOPE);
}

#[tokio::test]
async fn test_api_merges_attributes_across_id_spellings() {
    let now = now_ms();
    let (url, _node) = spawn_node(now).await;
    let (app, _dir) = setup_api(&url).await;

    let (status, _) = post_json(
        &app,
        "/api/envelope-attributes",
        json!({
            "envelope_id": format!("0x{:0>64}", "b1"),
            "envelope_type": "raffle",
            "cover_image": null,
            "cover_color": "#123456",
            "text_color": null,
            "greeting": null
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    for uri in ["/api/raffles/0xb1", "/api/raffles/0x00B1"] {
        let response: RaffleResponse = get_json(&app, uri).await;
        assert_eq!(response.raffle.id, RAFFLE_BOX);
        let attributes = response.attributes.unwrap();
        assert_eq!(attributes.envelope_id, RAFFLE_BOX);
        assert_eq!(attributes.cover_color.as_deref(), Some("#123456"));
    }
}

#[tokio::test]
async fn test_api_drained_envelope_reports_all_claimed() {
    let now = now_ms();
    let (url, _node) = spawn_node(now).await;
    let (app, _dir) = setup_api(&url).await;

    let response: EnvelopeResponse = get_json(&app, "/api/envelopes/0xe4").await;
    assert_eq!(response.envelope.status, ActivityStatus::AllClaimed);
}

#[tokio::test]
async fn test_api_claimed_pagination() {
    let now = now_ms();
    let (url, _node) = spawn_node(now).await;
    let (app, _dir) = setup_api(&url).await;

    let first: ClaimedPage = get_json(&app, "/api/envelopes/0xe1/claimed?limit=2").await;
    assert_eq!(first.items.len(), 2);
    assert!(first.has_next_page);
    let cursor = first.next_cursor.unwrap();

    let uri = format!("/api/envelopes/0xe1/claimed?limit=10&cursor={}", cursor);
    let rest: ClaimedPage = get_json(&app, &uri).await;
    assert_eq!(rest.items.len(), 3);
    assert_eq!(rest.items[2].address, "0xa5");
    assert_eq!(rest.items[2].amount, Uint256::from(500u64));
    assert!(!rest.has_next_page);

    // nft envelopes page their claimer list, one nft each
    let nft: ClaimedPage = get_json(&app, "/api/envelopes/0xe2/claimed?limit=2").await;
    assert_eq!(nft.items.len(), 2);
    assert_eq!(nft.items[1].address, "0xc2");
    assert_eq!(nft.items[1].amount, Uint256::one());
    assert_eq!(nft.next_cursor.as_deref(), Some("2"));

    let tail: ClaimedPage = get_json(&app, "/api/envelopes/0xe2/claimed?cursor=2").await;
    assert_eq!(tail.items.len(), 1);
    assert!(!tail.has_next_page);
}

#[tokio::test]
async fn test_api_raffle_box() {
    let now = now_ms();
    let (url, _node) = spawn_node(now).await;
    let (app, _dir) = setup_api(&url).await;

    let response: RaffleResponse = get_json(&app, "/api/raffles/0xb1").await;
    let raffle = response.raffle;
    assert_eq!(raffle.status, ActivityStatus::Ended);
    assert!(raffle.opened);
    assert_eq!(raffle.coin_type.as_deref(), Some(RGAS));
    assert_eq!(raffle.claimed_address, vec!["0x1", "0x2", "0x3"]);
    assert!(raffle.is_winner("0x3"));
    assert!(!raffle.is_winner("0x1"));
}

#[tokio::test]
async fn test_api_missing_objects_are_not_found() {
    let now = now_ms();
    let (url, _node) = spawn_node(now).await;
    let (app, _dir) = setup_api(&url).await;

    for uri in [
        "/api/envelopes/0xdead",
        "/api/raffles/0xdead",
        "/api/envelopes/0xdead/claimed",
    ] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = call(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].as_str().unwrap().contains(MISSING));
    }
}

#[tokio::test]
async fn test_api_balance() {
    let now = now_ms();
    let (url, _node) = spawn_node(now).await;
    let (app, _dir) = setup_api(&url).await;

    let uri = format!("/api/balance?owner=0xa11ce&coin_type={}", RGAS_PADDED);
    let balance: BalanceResponse = get_json(&app, &uri).await;
    assert_eq!(balance.formatted, "1.2345");
    assert_eq!(balance.info.symbol.as_deref(), Some("RGAS"));

    let uri = format!("/api/balance?owner={}&coin_type={}", BAD_OWNER, RGAS);
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, _) = call(&app, request).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_api_submit_transaction() {
    let now = now_ms();
    let (url, _node) = spawn_node(now).await;
    let (app, _dir) = setup_api(&url).await;

    let (status, body) = post_json(&app, "/api/transactions", json!({ "tx_hex": "0x00ff" })).await;
    assert_eq!(status, StatusCode::OK);
    let summary: ExecutionSummary = serde_json::from_slice(&body).unwrap();
    assert_eq!(summary.status.as_deref(), Some("executed"));
}
