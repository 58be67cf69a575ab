use std::time::Duration;

use base64::Engine as _;
use serde_json::json;

use super::imagen::*;
use super::request::{AspectRatio, GenerationRequest};
use super::service::{ImageService, ServiceError};
use crate::foundation::config::ImagenSettings;

#[test]
fn payload_carries_prompt_ratio_and_guidance() {
    let mut req = GenerationRequest::new("a lighthouse", AspectRatio::Portrait3x4);
    req.guidance_strength = Some(7.5);
    let payload = predict_payload(&req);
    assert_eq!(payload["instances"][0]["prompt"], "a lighthouse");
    assert_eq!(payload["parameters"]["sampleCount"], 1);
    assert_eq!(payload["parameters"]["aspectRatio"], "3:4");
    assert_eq!(payload["parameters"]["guidanceScale"], 7.5);

    let plain = predict_payload(&GenerationRequest::new("x", AspectRatio::Square));
    assert!(plain["parameters"].get("guidanceScale").is_none());
}

#[test]
fn extracts_first_prediction_bytes() {
    let encoded = base64::engine::general_purpose::STANDARD.encode(b"\x89PNG-ish");
    let payload = json!({ "predictions": [{ "bytesBase64Encoded": encoded, "mimeType": "image/png" }] });
    assert_eq!(extract_first_image(&payload).unwrap(), b"\x89PNG-ish".to_vec());
}

#[test]
fn missing_predictions_is_an_empty_result() {
    assert!(extract_first_image(&json!({})).unwrap().is_empty());
    assert!(
        extract_first_image(&json!({ "predictions": [] }))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn bad_base64_is_transient() {
    let payload = json!({ "predictions": [{ "bytesBase64Encoded": "***" }] });
    assert!(matches!(
        extract_first_image(&payload),
        Err(ServiceError::Transient(_))
    ));
}

#[test]
fn preflight_requires_a_key() {
    let svc = ImagenService::new(ImagenSettings::default(), Duration::from_secs(5)).unwrap();
    assert!(svc.preflight().unwrap_err().is_precondition());

    let keyed = ImagenService::new(
        ImagenSettings {
            api_key: Some("k".to_string()),
            api_base: "https://example.invalid/v1beta/".to_string(),
            model: "models/imagen-test".to_string(),
        },
        Duration::from_secs(5),
    )
    .unwrap();
    keyed.preflight().unwrap();
    assert_eq!(
        keyed.endpoint(),
        "https://example.invalid/v1beta/models/imagen-test:predict"
    );
}
