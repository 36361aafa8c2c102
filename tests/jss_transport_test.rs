//! Integration tests for the JSS client against a mock HTTP server

use jamf_batch::adapters::jss::{JssClient, JssTransport};
use jamf_batch::cli::commands::common::{ConnectionArgs, RunArgs, EXIT_FATAL};
use jamf_batch::cli::commands::export::ExportArgs;
use jamf_batch::config::{secret_string, ServerConfig};
use jamf_batch::core::batch::{BatchOrchestrator, Job, RunOptions, Targets};
use jamf_batch::core::enumerate::ResourceEnumerator;
use jamf_batch::core::fetch::DetailFetcher;
use jamf_batch::core::mutate::{MutationAck, MutationExecutor, StatusFilter};
use jamf_batch::domain::{BatchError, ResourceId, ResourceKind, ResourceRef};
use jamf_batch::output::{read_id_file, ExportFile};
use std::sync::Arc;
use tokio::sync::watch;

// base64("api:secret")
const AUTH: &str = "Basic YXBpOnNlY3JldA==";

fn client(base_url: String) -> Arc<JssClient> {
    let config = ServerConfig {
        base_url,
        username: Some("api".to_string()),
        password: Some(secret_string("secret".to_string())),
        timeout_seconds: 5,
        ..Default::default()
    };
    Arc::new(JssClient::new(&config).unwrap())
}

fn device(id: u64) -> ResourceRef {
    ResourceRef::new(ResourceId::new(id).unwrap(), ResourceKind::Device)
}

#[tokio::test]
async fn test_requests_carry_basic_auth_and_json_headers() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/JSSResource/mobiledevices")
        .match_header("authorization", AUTH)
        .match_header("accept", "application/json")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_body(r#"{"mobile_devices": []}"#)
        .create_async()
        .await;

    let reply = client(server.url())
        .get("/JSSResource/mobiledevices")
        .await
        .unwrap();

    assert_eq!(reply.status, 200);
    m.assert_async().await;
}

#[tokio::test]
async fn test_client_rejects_relative_paths() {
    let server = mockito::Server::new_async().await;
    let result = client(server.url()).get("JSSResource/mobiledevices").await;
    assert!(matches!(result, Err(BatchError::Jss(_))));
}

#[tokio::test]
async fn test_enumerator_lists_collection() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/JSSResource/mobiledeviceapplications")
        .with_status(200)
        .with_body(
            r#"{"mobile_device_applications": [
                {"id": 101, "name": "Notes"},
                {"id": 102, "name": "Maps"}
            ]}"#,
        )
        .create_async()
        .await;

    let enumerator = ResourceEnumerator::new(client(server.url()));
    let refs = enumerator.list(ResourceKind::App).await.unwrap();

    let ids: Vec<u64> = refs.iter().map(|r| r.id.get()).collect();
    assert_eq!(ids, vec![101, 102]);
}

#[tokio::test]
async fn test_enumerator_unauthorized_is_enumeration_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/JSSResource/mobiledevices")
        .with_status(401)
        .with_body("Unauthorized")
        .create_async()
        .await;

    let enumerator = ResourceEnumerator::new(client(server.url()));
    let err = enumerator.list(ResourceKind::Device).await.unwrap_err();
    assert!(matches!(err, BatchError::Enumeration(_)));
}

#[tokio::test]
async fn test_fetcher_not_found_is_distinct_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/JSSResource/mobiledevices/id/42")
        .with_status(404)
        .with_body("Not Found")
        .create_async()
        .await;

    let fetcher = DetailFetcher::new(client(server.url()));
    let err = fetcher.fetch(device(42)).await.unwrap_err();

    assert!(matches!(err, BatchError::NotFound(resource) if resource == device(42)));
}

#[tokio::test]
async fn test_fetcher_server_error_is_detail_fetch_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/JSSResource/mobiledevices/id/42")
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let fetcher = DetailFetcher::new(client(server.url()));
    let err = fetcher.fetch(device(42)).await.unwrap_err();

    match err {
        BatchError::DetailFetch { resource, reason } => {
            assert_eq!(resource, device(42));
            assert!(reason.contains("503"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_executor_delete_treats_404_as_already_absent() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("DELETE", "/JSSResource/mobiledevices/id/42")
        .match_header("authorization", AUTH)
        .with_status(404)
        .create_async()
        .await;

    let executor = MutationExecutor::new(client(server.url()));
    let ack = executor.delete(device(42)).await.unwrap();

    assert_eq!(ack, MutationAck::AlreadyAbsent);
    m.assert_async().await;
}

#[tokio::test]
async fn test_executor_flush_uses_status_filter_path() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock(
            "DELETE",
            "/JSSResource/commandflush/mobiledevices/id/7/status/Pending+Failed",
        )
        .with_status(200)
        .create_async()
        .await;

    let executor = MutationExecutor::new(client(server.url()));
    let ack = executor
        .flush(device(7), StatusFilter::PendingAndFailed)
        .await
        .unwrap();

    assert_eq!(ack, MutationAck::Applied);
    m.assert_async().await;
}

#[tokio::test]
async fn test_export_over_http_writes_csv() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/JSSResource/configurationprofiles")
        .with_status(200)
        .with_body(r#"{"configuration_profiles": [{"id": 5, "name": "Wi-Fi"}, {"id": 6, "name": "VPN"}]}"#)
        .create_async()
        .await;
    let _five = server
        .mock("GET", "/JSSResource/configurationprofiles/id/5")
        .with_status(200)
        .with_body(
            r#"{"configuration_profile": {
                "general": {"id": 5, "name": "Wi-Fi"},
                "scope": {"all_mobile_devices": true, "all_jss_users": false, "mobile_device_groups": []}
            }}"#,
        )
        .create_async()
        .await;
    let _six = server
        .mock("GET", "/JSSResource/configurationprofiles/id/6")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    let deletes = server
        .mock("DELETE", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (_tx, rx) = watch::channel(false);
    let orchestrator =
        BatchOrchestrator::new(client(server.url()), None, RunOptions::default(), rx);
    let report = orchestrator
        .run(
            Job::Export {
                kind: ResourceKind::ConfigProfile,
            },
            Targets::Collection(ResourceKind::ConfigProfile),
        )
        .await
        .unwrap();

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.csv");
    ExportFile::create(&path)
        .await
        .unwrap()
        .write(ResourceKind::ConfigProfile, report.rows.clone())
        .await
        .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "id,name,scope,scope_all,scope_all_users\n5,Wi-Fi,[],true,false\n"
    );

    // the export doubles as an id file for later jobs
    let ids = read_id_file(&path, ResourceKind::ConfigProfile)
        .await
        .unwrap();
    assert_eq!(ids.refs.len(), 1);
    assert_eq!(ids.refs[0].id.get(), 5);

    deletes.assert_async().await;
}

#[tokio::test]
async fn test_export_to_unwritable_path_makes_no_requests() {
    let mut server = mockito::Server::new_async().await;
    let requests = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let args = ExportArgs {
        kind: ResourceKind::App,
        file: dir.path().join("missing").join("apps.csv"),
        connection: ConnectionArgs {
            url: Some(server.url()),
            user: Some("api".to_string()),
            pass: Some("secret".to_string()),
        },
        run: RunArgs::default(),
    };
    let (_tx, rx) = watch::channel(false);

    let code = args.execute(None, rx).await.unwrap();

    assert_eq!(code, EXIT_FATAL);
    requests.assert_async().await;
}
