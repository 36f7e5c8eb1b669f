//! Single version queries against stub endpoints.

use hyper::StatusCode;
use reload_verifier::{ConfigVersion, QueryError, VersionClient};

mod common;

#[tokio::test]
async fn test_ok_integer_body() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::socket_path(&dir);
    common::start_fixed_endpoint(&path, "42").await;

    let verifier = common::verifier(&path, 1_000);
    assert_eq!(verifier.query_current_version().await.unwrap(), ConfigVersion(42));
}

#[tokio::test]
async fn test_non_integer_body_is_query_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::socket_path(&dir);
    common::start_fixed_endpoint(&path, "abc").await;

    let client = VersionClient::new(&path);
    match client.get_config_version().await {
        Err(QueryError::MalformedBody { body, .. }) => assert_eq!(body, "abc"),
        other => panic!("expected malformed body, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_200_status_is_query_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::socket_path(&dir);
    common::start_programmable_endpoint(&path, || async { (503, "42".to_string()) }).await;

    let client = VersionClient::new(&path);
    assert!(matches!(
        client.get_config_version().await,
        Err(QueryError::Status(StatusCode::SERVICE_UNAVAILABLE))
    ));
}

#[tokio::test]
async fn test_missing_socket_is_query_error() {
    let dir = tempfile::tempdir().unwrap();
    let verifier = common::verifier(&common::socket_path(&dir), 1_000);
    assert!(matches!(
        verifier.query_current_version().await,
        Err(QueryError::Connect { .. })
    ));
}

#[tokio::test]
async fn test_hangup_is_query_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::socket_path(&dir);
    common::start_hangup_endpoint(&path).await;

    let client = VersionClient::new(&path);
    assert!(matches!(client.get_config_version().await, Err(QueryError::Http(_))));
}

#[tokio::test]
async fn test_unlisted_status_is_not_rewritten_to_ok() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::socket_path(&dir);
    common::start_programmable_endpoint(&path, || async { (410, "42".to_string()) }).await;

    let client = VersionClient::new(&path);
    assert!(matches!(
        client.get_config_version().await,
        Err(QueryError::Status(StatusCode::GONE))
    ));
}
