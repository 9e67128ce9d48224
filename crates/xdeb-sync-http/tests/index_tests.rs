use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use flate2::write::GzEncoder;
use flate2::Compression;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xdeb_sync::{FetchOutcome, JobFetcher, ProviderDefinition, RemoteFormat, SyncError, SyncJob};
use xdeb_sync_http::{ClientOptions, HttpFetcher, IndexResponse, build_client, fetch_index};

const INDEX_PATH: &str = "/dists/stable/main/binary-amd64/Packages";

const PACKAGES: &str = "\
Package: hello
Version: 2.10-3
Filename: pool/main/h/hello/hello_2.10-3_amd64.deb
SHA256: 1111

Package: jq
Version: 1.7.1-3
Filename: pool/main/j/jq/jq_1.7.1-3_amd64.deb
SHA256: 2222
";

fn gzip(data: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

fn xz(data: &str) -> Vec<u8> {
    let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    encoder.write_all(data.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

fn client() -> reqwest::Client {
    build_client(ClientOptions::default()).unwrap()
}

fn job_for(server: &MockServer) -> SyncJob {
    let provider = ProviderDefinition {
        name: "example".into(),
        custom: false,
        url: server.uri(),
        architecture: "amd64".into(),
        components: vec!["main".into()],
        distributions: vec!["stable".into()],
    };
    SyncJob::new(Arc::new(provider), "stable", "main")
}

async fn mount(server: &MockServer, at: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_owned())
        .collect()
}

#[tokio::test]
async fn plain_index_is_used_first() {
    let server = MockServer::start().await;
    mount(&server, INDEX_PATH, PACKAGES.as_bytes().to_vec()).await;

    let response = fetch_index(&client(), &format!("{}{INDEX_PATH}", server.uri()))
        .await
        .unwrap();

    match response {
        IndexResponse::Found { body, format, .. } => {
            assert_eq!(format, RemoteFormat::Plain);
            assert_eq!(body, PACKAGES.as_bytes());
        }
        IndexResponse::NotFound => panic!("expected the plain index"),
    }
    assert_eq!(requested_paths(&server).await, vec![INDEX_PATH.to_owned()]);
}

#[tokio::test]
async fn falls_back_to_xz_then_gz() {
    let server = MockServer::start().await;
    mount(&server, &format!("{INDEX_PATH}.gz"), gzip(PACKAGES)).await;

    let response = fetch_index(&client(), &format!("{}{INDEX_PATH}", server.uri()))
        .await
        .unwrap();

    assert!(matches!(
        response,
        IndexResponse::Found { format: RemoteFormat::Gzip, .. }
    ));
    assert_eq!(
        requested_paths(&server).await,
        vec![
            INDEX_PATH.to_owned(),
            format!("{INDEX_PATH}.xz"),
            format!("{INDEX_PATH}.gz"),
        ]
    );
}

#[tokio::test]
async fn xz_short_circuits_gz() {
    let server = MockServer::start().await;
    mount(&server, &format!("{INDEX_PATH}.xz"), xz(PACKAGES)).await;
    mount(&server, &format!("{INDEX_PATH}.gz"), gzip(PACKAGES)).await;

    let response = fetch_index(&client(), &format!("{}{INDEX_PATH}", server.uri()))
        .await
        .unwrap();

    assert!(matches!(
        response,
        IndexResponse::Found { format: RemoteFormat::Xz, .. }
    ));
    assert_eq!(requested_paths(&server).await.len(), 2);
}

#[tokio::test]
async fn format_follows_the_redirect_target() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{INDEX_PATH}.xz")))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/mirror/Packages.gz", server.uri())),
        )
        .mount(&server)
        .await;
    mount(&server, "/mirror/Packages.gz", gzip(PACKAGES)).await;

    let response = fetch_index(&client(), &format!("{}{INDEX_PATH}", server.uri()))
        .await
        .unwrap();

    match response {
        IndexResponse::Found { format, url, .. } => {
            assert_eq!(format, RemoteFormat::Gzip);
            assert!(url.ends_with("/mirror/Packages.gz"));
        }
        IndexResponse::NotFound => panic!("expected the redirected index"),
    }
}

#[tokio::test]
async fn all_variants_missing_is_not_found() {
    let server = MockServer::start().await;

    let response = fetch_index(&client(), &format!("{}{INDEX_PATH}", server.uri()))
        .await
        .unwrap();

    assert_eq!(response, IndexResponse::NotFound);
    assert_eq!(requested_paths(&server).await.len(), 3);
}

#[tokio::test]
async fn unsupported_redirect_target_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/mirror/Packages.bz2", server.uri())),
        )
        .mount(&server)
        .await;
    mount(&server, "/mirror/Packages.bz2", b"BZh9".to_vec()).await;

    let result = fetch_index(&client(), &format!("{}{INDEX_PATH}", server.uri())).await;
    assert!(matches!(result, Err(SyncError::Decode { .. })));
}

#[tokio::test]
async fn transport_error_is_fatal() {
    let result = fetch_index(&client(), &format!("http://127.0.0.1:1{INDEX_PATH}")).await;
    assert!(matches!(result, Err(SyncError::Network(_))));
}

#[tokio::test]
async fn stalled_server_hits_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PACKAGES)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = build_client(ClientOptions {
        timeout: Duration::from_secs(1),
        ..ClientOptions::default()
    })
    .unwrap();

    let started = Instant::now();
    let result = fetch_index(&client, &format!("{}{INDEX_PATH}", server.uri())).await;

    assert!(matches!(result, Err(SyncError::Network(_))));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn fetcher_parses_entries_with_absolute_urls() {
    let server = MockServer::start().await;
    mount(&server, &format!("{INDEX_PATH}.xz"), xz(PACKAGES)).await;

    let dir = tempfile::tempdir().unwrap();
    let fetcher = HttpFetcher::new(client());
    let outcome = fetcher.fetch(&job_for(&server), dir.path()).await.unwrap();

    let FetchOutcome::Index(entries) = outcome else {
        panic!("expected parsed entries, got {outcome:?}");
    };
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "hello");
    assert_eq!(
        entries[0].url,
        format!("{}/pool/main/h/hello/hello_2.10-3_amd64.deb", server.uri())
    );
    assert_eq!(entries[1].sha256, "2222");
}

#[tokio::test]
async fn fetcher_reports_missing_index_as_not_found() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let outcome = HttpFetcher::new(client())
        .fetch(&job_for(&server), dir.path())
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::NotFound);
}

#[tokio::test]
async fn fetcher_rejects_corrupt_payload() {
    let server = MockServer::start().await;
    mount(&server, &format!("{INDEX_PATH}.xz"), b"not xz".to_vec()).await;
    let dir = tempfile::tempdir().unwrap();

    let result = HttpFetcher::new(client())
        .fetch(&job_for(&server), dir.path())
        .await;

    assert!(matches!(result, Err(SyncError::Decode { ref url, .. }) if url.ends_with(".xz")));
}

#[tokio::test]
async fn fetcher_surfaces_malformed_index() {
    let server = MockServer::start().await;
    mount(&server, INDEX_PATH, b"Package: broken\nSHA256:cafe\n".to_vec()).await;
    let dir = tempfile::tempdir().unwrap();

    let result = HttpFetcher::new(client())
        .fetch(&job_for(&server), dir.path())
        .await;

    assert!(matches!(result, Err(SyncError::Index { .. })));
}
