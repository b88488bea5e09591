//! End-to-end tests for voice cloning, the cloned-voice list, and
//! deletion against a mock HTTP server.

use lark::confirm::{AlwaysApprove, Confirmer};
use lark::{Controller, KeyStore, LarkError, SpeechClient};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Declines every confirmation.
struct Decline;

impl Confirmer for Decline {
    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}

/// Controller wired to the mock server, with a key store in a temp dir.
fn controller_for(
    server: &MockServer,
    confirmer: Box<dyn Confirmer + Send>,
) -> (tempfile::TempDir, Controller) {
    let dir = tempfile::tempdir().expect("tempdir");
    let keys = KeyStore::at(dir.path().join("api_key"));
    keys.save("sk-test-key").expect("save key");
    let client = SpeechClient::new(&server.uri()).expect("client");
    let controller =
        Controller::new(client, keys, "longxiaochun_v2", confirmer).expect("controller");
    (dir, controller)
}

fn cloned_body(id: &str, name: &str) -> serde_json::Value {
    json!({
        "voice_id": id,
        "name": name,
        "created_at": "2025-08-21T14:30:05"
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Cloning
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn clone_happy_path_refreshes_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/clone-voice"))
        .and(body_partial_json(json!({
            "audio_url": "https://example.org/sample.wav",
            "voice_name": "narrator",
            "api_key": "sk-test-key"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "voice_id": "cosyvoice-v2-narrator-1",
            "voice_name": "narrator",
            "request_id": "req-clone-1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cloned-voices"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!([cloned_body("cosyvoice-v2-narrator-1", "narrator")])))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, mut controller) = controller_for(&server, Box::new(AlwaysApprove));
    let outcome = controller
        .clone_voice("https://example.org/sample.wav", "narrator")
        .await
        .expect("clone voice");

    assert_eq!(outcome.voice_id, "cosyvoice-v2-narrator-1");
    assert_eq!(outcome.voice_name, "narrator");
    assert_eq!(controller.state().cloned.len(), 1);
    assert_eq!(controller.state().cloned[0].name, "narrator");
}

#[tokio::test]
async fn failed_clone_surfaces_the_server_text_and_skips_the_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/clone-voice"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "bad url"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cloned-voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let (_dir, mut controller) = controller_for(&server, Box::new(AlwaysApprove));
    let err = controller
        .clone_voice("not-a-url", "narrator")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "bad url");
}

#[tokio::test]
async fn clone_validation_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/clone-voice"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (_dir, mut controller) = controller_for(&server, Box::new(AlwaysApprove));
    assert!(matches!(
        controller.clone_voice("", "narrator").await.unwrap_err(),
        LarkError::MissingAudioUrl
    ));
    assert!(matches!(
        controller
            .clone_voice("https://example.org/a.wav", "  ")
            .await
            .unwrap_err(),
        LarkError::MissingVoiceName
    ));
}

#[tokio::test]
async fn clone_succeeds_even_when_the_list_refresh_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/clone-voice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "voice_id": "cosyvoice-v2-narrator-1",
            "voice_name": "narrator"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cloned-voices"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "listing backend down"
        })))
        .mount(&server)
        .await;

    let (_dir, mut controller) = controller_for(&server, Box::new(AlwaysApprove));
    let outcome = controller
        .clone_voice("https://example.org/sample.wav", "narrator")
        .await
        .expect("clone itself succeeded");
    assert_eq!(outcome.voice_id, "cosyvoice-v2-narrator-1");
    assert!(controller.state().cloned.is_empty());
}

// ────────────────────────────────────────────────────────────────────────────
// Listing and selection
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn cloned_voices_load_with_their_timestamps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cloned-voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            cloned_body("id-a", "narrator"),
            cloned_body("id-b", "announcer")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, mut controller) = controller_for(&server, Box::new(AlwaysApprove));
    controller.load_cloned().await.expect("load cloned");

    let cloned = &controller.state().cloned;
    assert_eq!(cloned.len(), 2);
    assert_eq!(cloned[0].voice_id, "id-a");
    assert_eq!(cloned[1].name, "announcer");
    assert_eq!(cloned[0].created_at.as_deref(), Some("2025-08-21T14:30:05"));
}

#[tokio::test]
async fn use_cloned_routes_synthesis_through_the_custom_slot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cloned-voices"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([cloned_body("id-a", "narrator")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/synthesize"))
        .and(body_partial_json(json!({
            "voice": "longxiaochun_v2",
            "custom_voice": "id-a"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "filename": "out.mp3",
            "voice_name": "narrator"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, mut controller) = controller_for(&server, Box::new(AlwaysApprove));
    controller.load_cloned().await.expect("load cloned");
    let voice = controller.use_cloned("1").expect("use cloned");
    assert_eq!(voice.voice_id, "id-a");

    let outcome = controller.synthesize("hello").await.expect("synthesize");
    assert_eq!(outcome.voice_name, "narrator");
}

// ────────────────────────────────────────────────────────────────────────────
// Deletion
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_confirmed_sends_the_request_and_refreshes() {
    let server = MockServer::start().await;
    // First listing has two voices; after the delete it has one.
    Mock::given(method("GET"))
        .and(path("/api/cloned-voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            cloned_body("id-a", "narrator"),
            cloned_body("id-b", "announcer")
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/delete-cloned-voice/id-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "voice deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cloned-voices"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([cloned_body("id-b", "announcer")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, mut controller) = controller_for(&server, Box::new(AlwaysApprove));
    controller.load_cloned().await.expect("load cloned");

    let deleted = controller
        .delete_cloned("1")
        .await
        .expect("delete")
        .expect("confirmed");
    assert_eq!(deleted.voice_id, "id-a");
    assert_eq!(controller.state().cloned.len(), 1);
    assert_eq!(controller.state().cloned[0].voice_id, "id-b");
}

#[tokio::test]
async fn delete_declined_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cloned-voices"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([cloned_body("id-a", "narrator")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/delete-cloned-voice/id-a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (_dir, mut controller) = controller_for(&server, Box::new(Decline));
    controller.load_cloned().await.expect("load cloned");

    let disposition = controller.delete_cloned("id-a").await.expect("delete");
    assert!(disposition.is_none());
    assert_eq!(controller.state().cloned.len(), 1);
}

#[tokio::test]
async fn delete_missing_voice_reports_the_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cloned-voices"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([cloned_body("id-a", "narrator")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/delete-cloned-voice/id-a"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "voice not found"
        })))
        .mount(&server)
        .await;

    let (_dir, mut controller) = controller_for(&server, Box::new(AlwaysApprove));
    controller.load_cloned().await.expect("load cloned");

    let err = controller.delete_cloned("id-a").await.unwrap_err();
    assert_eq!(err.to_string(), "voice not found");
    // The stale entry stays until a listing succeeds.
    assert_eq!(controller.state().cloned.len(), 1);
}

#[tokio::test]
async fn delete_unknown_selector_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/delete-cloned-voice/id-a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (_dir, mut controller) = controller_for(&server, Box::new(AlwaysApprove));
    let err = controller.delete_cloned("id-a").await.unwrap_err();
    assert!(matches!(err, LarkError::UnknownVoice(_)));
}
