use super::error::HubError;
use super::logging;

#[test]
fn logging_init_accepts_levels() {
    logging::init("info");
    logging::init("debug");
    logging::init("warn");
}

#[test]
fn unknown_levels_fall_back_to_info() {
    assert_eq!(logging::normalized("WARNING"), "warn");
    assert_eq!(logging::normalized("Trace"), "trace");
    assert_eq!(logging::normalized("verbose"), "info");
}

#[test]
fn json_errors_convert_into_hub_error() {
    let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let hub_err: HubError = err.into();
    assert!(matches!(hub_err, HubError::Serialization(_)));
    assert!(hub_err.to_string().starts_with("serialization error"));
}

#[tokio::test]
async fn join_errors_become_task_errors() {
    let handle = tokio::spawn(std::future::pending::<()>());
    handle.abort();
    let join_err = handle.await.unwrap_err();
    assert!(join_err.is_cancelled());
    let hub_err: HubError = join_err.into();
    assert!(matches!(hub_err, HubError::Task(_)));
}
