use std::error::Error;
use storefront::errors::RelayError;

#[test]
fn test_relay_error_implements_error_trait() {
    // Verify RelayError implements the Error trait
    fn assert_error<T: Error>(_: &T) {}

    let error = RelayError::Validation("Message is required".to_string());
    assert_error(&error);
}

#[test]
fn test_relay_error_display() {
    let error = RelayError::Validation("Message is required".to_string());
    assert_eq!(format!("{error}"), "Message is required");

    let error = RelayError::Configuration("LLM_API_KEY is not set".to_string());
    assert_eq!(
        format!("{error}"),
        "Server configuration error: LLM_API_KEY is not set"
    );

    let error = RelayError::Upstream {
        status: 503,
        body: "rate limited".to_string(),
    };
    assert_eq!(
        format!("{error}"),
        "Upstream API error (status 503): rate limited"
    );

    let error = RelayError::Http("Connection error".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to send HTTP request: Connection error"
    );
}

#[test]
fn test_relay_error_status_codes() {
    assert_eq!(RelayError::Validation(String::new()).status_code(), 400);
    assert_eq!(RelayError::MethodNotAllowed("GET".into()).status_code(), 405);
    assert_eq!(RelayError::Configuration(String::new()).status_code(), 500);
    assert_eq!(
        RelayError::Upstream {
            status: 429,
            body: String::new()
        }
        .status_code(),
        500
    );
    assert_eq!(RelayError::InvalidResponse(String::new()).status_code(), 500);
    assert_eq!(RelayError::Http(String::new()).status_code(), 500);
    assert_eq!(RelayError::Unknown(String::new()).status_code(), 500);
}

#[test]
fn test_relay_error_from_conversions() {
    // Test conversion from anyhow::Error
    let err = anyhow::anyhow!("test error");
    let relay_err: RelayError = err.into();

    match relay_err {
        RelayError::Unknown(msg) => assert!(msg.contains("test error")),
        _ => panic!("Unexpected error type"),
    }

    let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    assert!(matches!(
        RelayError::from(json_err),
        RelayError::InvalidResponse(_)
    ));

    // We can't easily build a reqwest::Error directly, but we can verify
    // that the From<reqwest::Error> trait is implemented
    #[allow(unused)]
    #[allow(clippy::items_after_statements)]
    fn _check_reqwest_conversion(err: reqwest::Error) -> RelayError {
        RelayError::from(err)
    }
}
