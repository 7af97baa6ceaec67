use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use reqwest::Client;
use tariff_calculator::domain::HsCode;
use tariff_calculator::infra::{
    hs_codes::{load_chain, BUILTIN_LABEL},
    CacheStatus, HsCodeSource, ReferenceClient, ReferenceConfig, ReferenceError,
};
use url::Url;

// Nothing listens on the discard port, so connections are refused immediately.
const UNREACHABLE: &str = "http://127.0.0.1:9/";

fn unreachable_json() -> HsCodeSource {
    HsCodeSource::RemoteJson(Url::parse(UNREACHABLE).unwrap())
}

fn unreachable_config() -> ReferenceConfig {
    ReferenceConfig::new()
        .unwrap()
        .with_countries_url(UNREACHABLE)
        .unwrap()
        .with_rates_url(UNREACHABLE)
        .unwrap()
        .with_hs_code_sources(vec![unreachable_json()])
}

/// Answer exactly one request with `body`, then stop listening.
fn serve_once(body: &'static str) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let read = stream.read(&mut chunk).unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..read]);
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
    });
    (base, handle)
}

const COUNTRIES: &str = r#"[{"name":{"common":"Germany"},"cca2":"DE","currencies":{"EUR":{}},"flags":{"svg":"https://flagcdn.com/de.svg"}}]"#;
const RATES: &str = r#"{"base_code":"USD","rates":{"USD":1,"EUR":0.9}}"#;

#[tokio::test]
async fn fresh_fetch_is_reused_within_ttl() {
    let (base, server) = serve_once(COUNTRIES);
    let config = unreachable_config()
        .with_countries_url(&format!("{base}countries"))
        .unwrap();
    let client = ReferenceClient::with_config(config).unwrap();

    let first = client.get_countries().await.unwrap();
    assert_eq!(first.status, CacheStatus::Fresh);
    assert_eq!(first.data.len(), 1);
    assert_eq!(first.data[0].code, "DE");
    server.join().unwrap();

    // The listener is gone, so only the cache can answer.
    let second = client.get_countries().await.unwrap();
    assert_eq!(second.status, CacheStatus::Cached);
    assert_eq!(second.data, first.data);
    assert_eq!(second.fetched_at, first.fetched_at);
}

#[tokio::test]
async fn failed_refresh_serves_stale_rates() {
    let (base, server) = serve_once(RATES);
    let config = unreachable_config()
        .with_rates_url(&format!("{base}latest"))
        .unwrap()
        .with_ttl(Duration::ZERO);
    let client = ReferenceClient::with_config(config).unwrap();

    let first = client.get_exchange_rates().await.unwrap();
    assert_eq!(first.status, CacheStatus::Fresh);
    assert_eq!(first.data.table.rate("EUR"), Some(0.9));
    server.join().unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = client.get_exchange_rates().await.unwrap();
    assert_eq!(second.status, CacheStatus::Stale);
    assert_eq!(second.data, first.data);

    client.clear_cache().await;
    assert!(client.get_exchange_rates().await.is_err());
}

#[tokio::test]
async fn chain_moves_on_to_the_next_source() {
    let secondary = HsCodeSource::Static {
        label: "office list".into(),
        codes: vec![HsCode::new("8517.12", "Mobile phones")],
    };
    let load = load_chain(&Client::new(), &[unreachable_json(), secondary]).await;

    assert_eq!(load.source, "office list");
    assert_eq!(load.codes, vec![HsCode::new("8517.12", "Mobile phones")]);
    assert_eq!(load.failures.len(), 1);
    assert!(load.is_fallback());
}

#[tokio::test]
async fn empty_sources_are_skipped_too() {
    let empty = HsCodeSource::Static {
        label: "empty".into(),
        codes: Vec::new(),
    };
    let load = load_chain(&Client::new(), &[empty]).await;

    assert_eq!(load.source, BUILTIN_LABEL);
    assert_eq!(load.codes.len(), 10);
    assert!(load.failures[0].starts_with("empty:"));
}

#[tokio::test]
async fn client_degrades_when_every_endpoint_is_down() {
    let client = ReferenceClient::with_config(unreachable_config()).unwrap();

    let countries = client.get_countries().await;
    assert!(matches!(countries, Err(ReferenceError::Http(_))));

    let rates = client.get_exchange_rates().await;
    assert!(rates.is_err());

    let hs = client.get_hs_codes().await;
    assert_eq!(hs.status, CacheStatus::Fresh);
    assert_eq!(hs.data.source, BUILTIN_LABEL);
    assert_eq!(hs.data.codes.len(), 10);

    client.clear_cache().await;
    let again = client.get_hs_codes().await;
    assert_eq!(again.data.failures.len(), 1);
}
