//! REST adapter tests against local mock servers.
//!
//! Each test stands up a wiremock server, points the resolver's base URL at
//! it and checks the normalized result end to end.

use domain_avail_lib::{
    Availability, CheckConfig, DomainResolver, ProviderCredentials, ProviderKind,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PORKBUN_ROOT: &str = "/api/json/v3";

fn creds() -> ProviderCredentials {
    ProviderCredentials::new("pk1_test", "sk1_test")
}

fn porkbun_resolver(server: &MockServer) -> DomainResolver {
    let config = CheckConfig::default()
        .with_porkbun_base_url(format!("{}{}", server.uri(), PORKBUN_ROOT));
    DomainResolver::with_config(config).expect("resolver")
}

fn godaddy_resolver(server: &MockServer) -> DomainResolver {
    let config = CheckConfig::default().with_godaddy_base_url(server.uri());
    DomainResolver::with_config(config).expect("resolver")
}

fn porkbun_path(domain: &str) -> String {
    format!("{}/domain/checkDomain/{}", PORKBUN_ROOT, domain)
}

#[tokio::test]
async fn porkbun_available_with_price() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(porkbun_path("noteforget.dev")))
        .and(body_json(json!({"apikey": "pk1_test", "secretapikey": "sk1_test"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "SUCCESS",
            "response": {
                "avail": "yes",
                "price": "10.00",
                "additional": {"renewal": {"price": "12.50"}}
            },
            "limits": {"TTL": "10", "limit": "60", "used": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = porkbun_resolver(&server)
        .check_one("noteforget.dev", ProviderKind::Porkbun, Some(&creds()))
        .await;

    assert_eq!(result.domain(), "noteforget.dev");
    assert_eq!(result.provider(), ProviderKind::Porkbun);
    assert_eq!(result.availability(), Availability::Available);
    assert_eq!(result.status_label(), "Available");
    assert_eq!(result.price(), Some("10.00"));
    assert_eq!(result.renewal_price(), Some("12.50"));
    assert_eq!(result.registrar(), None);
    assert!(!result.is_rate_limited());
}

#[tokio::test]
async fn porkbun_registered_has_no_price() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(porkbun_path("google.com")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "SUCCESS",
            "response": {"avail": "no", "price": "10.00"}
        })))
        .mount(&server)
        .await;

    let result = porkbun_resolver(&server)
        .check_one("google.com", ProviderKind::Porkbun, Some(&creds()))
        .await;

    assert_eq!(result.availability(), Availability::Registered);
    assert_eq!(result.price(), None);
}

#[tokio::test]
async fn porkbun_exhausted_limits_are_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(porkbun_path("busy.com")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "SUCCESS",
            "response": {"avail": "yes", "price": "10.00"},
            "limits": {
                "TTL": "12",
                "limit": "1",
                "used": 1,
                "naturalLanguage": "1 out of 1 checks within 12 seconds used."
            }
        })))
        .mount(&server)
        .await;

    let result = porkbun_resolver(&server)
        .check_one("busy.com", ProviderKind::Porkbun, Some(&creds()))
        .await;

    assert!(result.is_rate_limited());
    assert_eq!(result.retry_after_seconds(), Some(12));
    assert_eq!(result.availability(), Availability::Unknown);
    assert_eq!(result.status_label(), "Rate Limited");
    assert_eq!(result.price(), None);
}

#[tokio::test]
async fn porkbun_limit_message_on_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(porkbun_path("busy.com")))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "status": "ERROR",
            "message": "1 out of 1 checks within 10 seconds used."
        })))
        .mount(&server)
        .await;

    let result = porkbun_resolver(&server)
        .check_one("busy.com", ProviderKind::Porkbun, Some(&creds()))
        .await;

    assert!(result.is_rate_limited());
    assert_eq!(result.retry_after_seconds(), Some(10));
}

#[tokio::test]
async fn porkbun_invalid_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(porkbun_path("free.com")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "ERROR",
            "message": "Invalid API key. (002)"
        })))
        .mount(&server)
        .await;

    let result = porkbun_resolver(&server)
        .check_one("free.com", ProviderKind::Porkbun, Some(&creds()))
        .await;

    assert_eq!(result.status_label(), "Invalid Credentials");
    assert_eq!(result.availability(), Availability::Unknown);
    assert!(!result.is_rate_limited());
}

#[tokio::test]
async fn porkbun_unauthorized_without_key_notice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(porkbun_path("free.com")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "ERROR",
            "message": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let result = porkbun_resolver(&server)
        .check_one("free.com", ProviderKind::Porkbun, Some(&creds()))
        .await;

    assert_eq!(result.status_label(), "Invalid Credentials");
    assert_eq!(result.availability(), Availability::Unknown);
    assert_eq!(result.error_detail(), Some("Porkbun rejected the credentials: Unauthorized"));
}

#[tokio::test]
async fn porkbun_unauthorized_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = porkbun_resolver(&server)
        .check_one("free.com", ProviderKind::Porkbun, Some(&creds()))
        .await;

    assert_eq!(result.status_label(), "Invalid Credentials");
}

#[tokio::test]
async fn porkbun_domain_stays_in_one_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(porkbun_path("odd%3Fname.com%23x")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "SUCCESS",
            "response": { "avail": "no" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = porkbun_resolver(&server)
        .check_one("odd?name.com#x", ProviderKind::Porkbun, Some(&creds()))
        .await;

    assert_eq!(result.domain(), "odd?name.com#x");
    assert_eq!(result.availability(), Availability::Registered);
}

#[tokio::test]
async fn porkbun_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(porkbun_path("free.com")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = porkbun_resolver(&server)
        .check_one("free.com", ProviderKind::Porkbun, Some(&creds()))
        .await;

    assert_eq!(result.status_label(), "Malformed Response");
    assert!(result.error_detail().is_some_and(|d| d.contains("Porkbun")));
}

#[tokio::test]
async fn porkbun_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let result = porkbun_resolver(&server)
        .check_one("free.com", ProviderKind::Porkbun, Some(&creds()))
        .await;

    assert_eq!(result.status_label(), "Request Failed");
    assert_eq!(result.error_detail(), Some("Porkbun returned HTTP 500"));
}

#[tokio::test]
async fn porkbun_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "SUCCESS", "response": {"avail": "yes"}}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = CheckConfig::default()
        .with_porkbun_base_url(format!("{}{}", server.uri(), PORKBUN_ROOT))
        .with_porkbun_timeout(Duration::from_millis(200));
    let resolver = DomainResolver::with_config(config).unwrap();

    let result = resolver
        .check_one("slow.com", ProviderKind::Porkbun, Some(&creds()))
        .await;

    assert_eq!(result.status_label(), "Timeout");
    assert_eq!(result.availability(), Availability::Unknown);
}

#[tokio::test]
async fn porkbun_connection_refused() {
    let config = CheckConfig::default().with_porkbun_base_url("http://127.0.0.1:1/api/json/v3");
    let resolver = DomainResolver::with_config(config).unwrap();

    let result = resolver
        .check_one("free.com", ProviderKind::Porkbun, Some(&creds()))
        .await;

    assert_eq!(result.status_label(), "Connection Failed");
    assert_eq!(result.availability(), Availability::Unknown);
}

#[tokio::test]
async fn godaddy_available_with_price_label() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/domains/available"))
        .and(query_param("domain", "noteforget.dev"))
        .and(query_param("checkType", "FAST"))
        .and(query_param("forTransfer", "false"))
        .and(header("Authorization", "sso-key pk1_test:sk1_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "available": true,
            "domain": "noteforget.dev",
            "definitive": false,
            "price": 11990000,
            "currency": "USD",
            "period": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = godaddy_resolver(&server)
        .check_one("noteforget.dev", ProviderKind::GoDaddy, Some(&creds()))
        .await;

    assert_eq!(result.provider(), ProviderKind::GoDaddy);
    assert_eq!(result.availability(), Availability::Available);
    assert_eq!(result.status_label(), "Available (11.99 USD/1y)");
    assert_eq!(result.price(), Some("11.99"));
}

#[tokio::test]
async fn godaddy_registered() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/domains/available"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "available": false,
            "domain": "google.com",
            "definitive": true
        })))
        .mount(&server)
        .await;

    let result = godaddy_resolver(&server)
        .check_one("google.com", ProviderKind::GoDaddy, Some(&creds()))
        .await;

    assert_eq!(result.availability(), Availability::Registered);
    assert_eq!(result.status_label(), "Registered");
}

#[tokio::test]
async fn godaddy_available_without_price_keeps_plain_label() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/domains/available"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "available": true })))
        .mount(&server)
        .await;

    let result = godaddy_resolver(&server)
        .check_one("free.com", ProviderKind::GoDaddy, Some(&creds()))
        .await;

    assert_eq!(result.availability(), Availability::Available);
    assert_eq!(result.status_label(), "Available");
    assert_eq!(result.price(), None);
    assert_eq!(result.error_detail(), None);
}

#[tokio::test]
async fn godaddy_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "UNABLE_TO_AUTHENTICATE",
            "message": "Unauthorized : Could not authenticate API key/secret"
        })))
        .mount(&server)
        .await;

    let result = godaddy_resolver(&server)
        .check_one("free.com", ProviderKind::GoDaddy, Some(&creds()))
        .await;

    assert_eq!(result.status_label(), "Invalid Credentials");
    assert!(!result.is_rate_limited());
    assert_eq!(result.retry_after_seconds(), None);
}

#[tokio::test]
async fn godaddy_too_many_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let result = godaddy_resolver(&server)
        .check_one("free.com", ProviderKind::GoDaddy, Some(&creds()))
        .await;

    assert!(result.is_rate_limited());
    assert_eq!(result.retry_after_seconds(), Some(60));
    assert_eq!(result.availability(), Availability::Unknown);
}

#[tokio::test]
async fn godaddy_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "INVALID_BODY",
            "message": "Request body doesn't fulfill schema"
        })))
        .mount(&server)
        .await;

    let result = godaddy_resolver(&server)
        .check_one("bad_name.com", ProviderKind::GoDaddy, Some(&creds()))
        .await;

    assert_eq!(result.status_label(), "Bad Request");
    assert!(result
        .error_detail()
        .is_some_and(|d| d.contains("INVALID_BODY")));
}

#[tokio::test]
async fn godaddy_missing_available_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"domain": "free.com"})))
        .mount(&server)
        .await;

    let result = godaddy_resolver(&server)
        .check_one("free.com", ProviderKind::GoDaddy, Some(&creds()))
        .await;

    assert_eq!(result.status_label(), "Malformed Response");
}

#[tokio::test]
async fn batch_against_mock_keeps_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(porkbun_path("taken.com")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "SUCCESS",
            "response": {"avail": "no"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(porkbun_path("free.com")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "SUCCESS",
            "response": {"avail": "yes", "price": "9.68"}
        })))
        .mount(&server)
        .await;

    let config = CheckConfig::default()
        .with_porkbun_base_url(format!("{}{}", server.uri(), PORKBUN_ROOT))
        .with_request_delay(Duration::from_millis(5));
    let resolver = DomainResolver::with_config(config).unwrap();

    let request = domain_avail_lib::BatchRequest::new(
        vec!["free.com".into(), "taken.com".into(), "free.com".into()],
        ProviderKind::Porkbun,
    )
    .with_credentials(creds());

    let results = resolver.check_batch(request).await;
    let statuses: Vec<_> = results
        .iter()
        .map(|r| (r.domain(), r.availability()))
        .collect();

    assert_eq!(
        statuses,
        vec![
            ("free.com", Availability::Available),
            ("taken.com", Availability::Registered),
            ("free.com", Availability::Available),
        ]
    );
}
