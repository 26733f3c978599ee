#![allow(clippy::unwrap_used)]
// Integration tests for `ZabbixClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zbx_api::models::{MaintenanceCreate, TimePeriod};
use zbx_api::{AlertQuery, Error, TriggerQuery, ZabbixClient};

// ── Helpers ─────────────────────────────────────────────────────────

const RPC_PATH: &str = "/api_jsonrpc.php";

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "result": result, "id": 1 }))
}

fn rpc_error(code: i64, message: &str, data: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "error": { "code": code, "message": message, "data": data },
        "id": 1
    }))
}

async fn mock_method(server: &MockServer, name: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(body_partial_json(json!({ "method": name })))
        .respond_with(response)
        .mount(server)
        .await;
}

/// A client logged in against a 5.0 server with session token `tok`.
async fn setup() -> (MockServer, ZabbixClient) {
    let server = MockServer::start().await;
    mock_method(&server, "apiinfo.version", ok(json!("5.0.30"))).await;
    mock_method(&server, "user.login", ok(json!("tok"))).await;

    let base = Url::parse(&server.uri()).unwrap();
    let client = ZabbixClient::with_client(reqwest::Client::new(), &base).unwrap();
    client
        .login("Admin", &SecretString::from("zabbix".to_string()))
        .await
        .unwrap();
    (server, client)
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_uses_legacy_user_key_before_5_4() {
    let server = MockServer::start().await;
    mock_method(&server, "apiinfo.version", ok(json!("5.0.30"))).await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(body_partial_json(json!({
            "method": "user.login",
            "params": { "user": "Admin" }
        })))
        .respond_with(ok(json!("0424bd59b807674191e7d77572075f33")))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        ZabbixClient::with_client(reqwest::Client::new(), &Url::parse(&server.uri()).unwrap())
            .unwrap();
    client
        .login("Admin", &SecretString::from("zabbix".to_string()))
        .await
        .unwrap();
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_login_failure_is_authentication_error() {
    let server = MockServer::start().await;
    mock_method(&server, "apiinfo.version", ok(json!("6.0.21"))).await;
    mock_method(
        &server,
        "user.login",
        rpc_error(-32602, "Invalid params.", "Incorrect user name or password or account is temporarily blocked."),
    )
    .await;

    let client =
        ZabbixClient::with_client(reqwest::Client::new(), &Url::parse(&server.uri()).unwrap())
            .unwrap();
    let result = client
        .login("Admin", &SecretString::from("wrong".to_string()))
        .await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_calls_without_session_are_rejected_locally() {
    let server = MockServer::start().await;
    let client =
        ZabbixClient::with_client(reqwest::Client::new(), &Url::parse(&server.uri()).unwrap())
            .unwrap();

    let result = client.hosts_by_name("web1.example.com").await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

#[tokio::test]
async fn test_token_sent_in_envelope_for_old_servers() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(body_partial_json(json!({ "method": "host.get", "auth": "tok" })))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client.hosts_by_name("web1.example.com").await.unwrap();
}

#[tokio::test]
async fn test_token_sent_as_bearer_from_6_4() {
    let server = MockServer::start().await;
    mock_method(&server, "apiinfo.version", ok(json!("6.4.8"))).await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(header("authorization", "Bearer api-token"))
        .and(body_partial_json(json!({ "method": "host.get" })))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        ZabbixClient::with_client(reqwest::Client::new(), &Url::parse(&server.uri()).unwrap())
            .unwrap();
    client
        .authenticate_with_token(SecretString::from("api-token".to_string()))
        .await
        .unwrap();
    client.hosts_by_name("web1.example.com").await.unwrap();
}

// ── Host tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_hosts_by_name_uses_exact_filter() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(body_partial_json(json!({
            "method": "host.get",
            "params": { "filter": { "host": ["web1.example.com"] } }
        })))
        .respond_with(ok(json!([{
            "hostid": "10084",
            "host": "web1.example.com",
            "name": "web1",
            "status": "0",
            "maintenance_status": "1"
        }])))
        .mount(&server)
        .await;

    let hosts = client.hosts_by_name("web1.example.com").await.unwrap();

    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].hostid, "10084");
    assert!(hosts[0].is_monitored());
    assert!(hosts[0].in_maintenance());
}

// ── Maintenance tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_create_maintenance_returns_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(body_partial_json(json!({
            "method": "maintenance.create",
            "params": {
                "name": "Scripted Maintenance: web1.example.com",
                "hostids": ["10084"],
                "groupids": ["5"],
                "timeperiods": [{ "timeperiod_type": 0, "start_date": 1000, "period": 3600 }]
            }
        })))
        .respond_with(ok(json!({ "maintenanceids": [17] })))
        .mount(&server)
        .await;

    let id = client
        .create_maintenance(&MaintenanceCreate {
            name: "Scripted Maintenance: web1.example.com".into(),
            description: "zbx scripted".into(),
            maintenance_type: 0,
            active_since: 1000,
            active_till: 5200,
            hostids: vec!["10084".into()],
            groupids: vec!["5".into()],
            timeperiods: vec![TimePeriod::one_time(1000, 3600)],
        })
        .await
        .unwrap();

    assert_eq!(id, "17");
}

#[tokio::test]
async fn test_delete_missing_maintenance_is_none() {
    let (server, client) = setup().await;
    mock_method(
        &server,
        "maintenance.delete",
        rpc_error(-32602, "Invalid params.", "No permissions to referred object or it does not exist!"),
    )
    .await;

    assert_eq!(client.delete_maintenance("42").await.unwrap(), None);
}

#[tokio::test]
async fn test_delete_maintenance_other_errors_propagate() {
    let (server, client) = setup().await;
    mock_method(
        &server,
        "maintenance.delete",
        rpc_error(-32500, "Application error.", "SQL statement execution has failed."),
    )
    .await;

    let result = client.delete_maintenance("42").await;
    assert!(
        matches!(result, Err(Error::Rpc { code: -32500, .. })),
        "expected Rpc error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_delete_maintenance_http_404_propagates() {
    let (server, client) = setup().await;
    mock_method(&server, "maintenance.delete", ResponseTemplate::new(404)).await;

    let result = client.delete_maintenance("7").await;
    assert!(
        matches!(result, Err(Error::Http { status: 404, .. })),
        "expected Http 404 error, got: {result:?}"
    );
}

// ── Problem tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_firing_triggers_request_shape() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(body_partial_json(json!({
            "method": "trigger.get",
            "params": {
                "limit": 50,
                "sortfield": "lastchange",
                "sortorder": "DESC",
                "skipDependent": true,
                "filter": { "priority": [2, 3, 4, 5], "value": 1 }
            }
        })))
        .respond_with(ok(json!([{
            "triggerid": "13491",
            "description": "Free disk space is less than 5% on volume /",
            "priority": "4",
            "lastchange": "1700000000",
            "value": "1",
            "hosts": [{ "hostid": "10084", "host": "web1.example.com", "name": "web1", "maintenance_status": "0" }],
            "lastEvent": { "eventid": "881", "clock": "1700000000", "value": "1" }
        }])))
        .mount(&server)
        .await;

    let triggers = client
        .firing_triggers(TriggerQuery { limit: 50, min_priority: 2 })
        .await
        .unwrap();

    assert_eq!(triggers.len(), 1);
    assert_eq!(triggers[0].hosts[0].name, "web1");
    assert_eq!(triggers[0].last_event.as_ref().unwrap().eventid, "881");
}

#[tokio::test]
async fn test_events_skips_request_for_empty_ids() {
    let (_server, client) = setup().await;
    assert!(client.events(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_alerts_sorted_request() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(body_partial_json(json!({
            "method": "alert.get",
            "params": { "userids": ["9"], "time_from": 1000, "sortfield": "alertid", "sortorder": "DESC" }
        })))
        .respond_with(ok(json!([
            { "alertid": "30", "eventid": "1", "clock": "1500", "subject": "web1:Disk full" }
        ])))
        .mount(&server)
        .await;

    let alerts = client
        .alerts(&AlertQuery { userids: vec!["9".into()], time_from: 1000 })
        .await
        .unwrap();

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].subject, "web1:Disk full");
}

#[tokio::test]
async fn test_http_error_status() {
    let (server, client) = setup().await;
    mock_method(&server, "host.get", ResponseTemplate::new(502)).await;

    let result = client.hosts_by_name("web1").await;
    assert!(matches!(result, Err(Error::Http { status: 502, .. })));
}
