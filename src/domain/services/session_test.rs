use anyhow::Result;
use tempfile::tempdir;
use tempfile::TempDir;
use tokio::sync::mpsc;

use super::SessionManager;
use super::SettingsStore;
use super::TranscriptStore;
use crate::domain::models::Event;
use crate::domain::models::Persona;
use crate::domain::models::Role;
use crate::domain::models::SettingsField;
use crate::infrastructure::backends::gemini::Gemini;

const COMPLETION_PATH: &str = "/v1beta/models/gemini-2.0-flash-exp:generateContent?key=abc";

async fn manager_fixture(
    url: String,
    api_key: &str,
) -> (SessionManager, mpsc::UnboundedReceiver<Event>, TempDir) {
    let dir = tempdir().unwrap();

    let mut settings = SettingsStore::load(dir.path().join("settings.json")).await;
    if !api_key.is_empty() {
        settings
            .replace_field(SettingsField::ApiKey(api_key.to_string()))
            .await
            .unwrap();
    }

    let transcript = TranscriptStore::load(dir.path().join("transcript.json")).await;
    let persona = Persona::load().unwrap();
    let (tx, rx) = mpsc::unbounded_channel::<Event>();

    let manager = SessionManager::new(settings, transcript, Box::new(Gemini::new(url)), persona, tx);

    return (manager, rx, dir);
}

fn drain(rx: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
    let mut events: Vec<Event> = vec![];
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    return events;
}

#[tokio::test]
async fn it_completes_a_turn_on_success() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", COMPLETION_PATH)
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Short answer. Good question."}]}}]}"#)
        .create();

    let (mut manager, mut rx, _dir) = manager_fixture(server.url(), "abc").await;
    manager.submit("How do I start a podcast?").await?;

    mock.assert();

    let messages = manager.transcript.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "How do I start a podcast?");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "Short answer. Good question.");
    assert!(!manager.awaiting_response);

    let events = drain(&mut rx);
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], Event::UserMessageAppended(_)));
    assert!(matches!(events[1], Event::PendingStarted()));
    assert!(matches!(events[2], Event::PendingEnded()));
    assert!(matches!(events[3], Event::AssistantMessageAppended(_)));

    return Ok(());
}

#[tokio::test]
async fn it_rejects_submits_without_a_credential() -> Result<()> {
    let (mut manager, mut rx, _dir) = manager_fixture("http://localhost:0".to_string(), "").await;
    manager.submit("hello?").await?;

    assert!(manager.transcript.messages().is_empty());
    assert!(!manager.awaiting_response);

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Event::Notice(_)));

    return Ok(());
}

#[tokio::test]
async fn it_ignores_empty_utterances() -> Result<()> {
    let (mut manager, mut rx, _dir) = manager_fixture("http://localhost:0".to_string(), "abc").await;
    manager.submit("   \n  ").await?;

    assert!(manager.transcript.messages().is_empty());
    assert!(drain(&mut rx).is_empty());

    return Ok(());
}

#[tokio::test]
async fn it_rejects_a_second_submit_while_awaiting() -> Result<()> {
    let (mut manager, mut rx, _dir) = manager_fixture("http://localhost:0".to_string(), "abc").await;
    manager.awaiting_response = true;

    manager.submit("am I interrupting?").await?;

    assert!(manager.transcript.messages().is_empty());
    assert!(drain(&mut rx).is_empty());
    assert!(manager.awaiting_response);

    return Ok(());
}

#[tokio::test]
async fn it_absorbs_provider_errors_into_the_transcript() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", COMPLETION_PATH)
        .with_status(429)
        .with_body(r#"{"error":{"message":"quota exceeded"}}"#)
        .create();

    let (mut manager, mut rx, _dir) = manager_fixture(server.url(), "abc").await;
    manager.submit("one more idea").await?;

    mock.assert();

    let messages = manager.transcript.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "Error: quota exceeded");
    assert!(!manager.awaiting_response);

    let events = drain(&mut rx);
    assert!(matches!(events[3], Event::AssistantMessageAppended(_)));

    return Ok(());
}

#[tokio::test]
async fn it_absorbs_empty_responses_into_the_transcript() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", COMPLETION_PATH)
        .with_status(200)
        .with_body(r#"{"usageMetadata":{"totalTokenCount":3}}"#)
        .create();

    let (mut manager, _rx, _dir) = manager_fixture(server.url(), "abc").await;
    manager.submit("anyone home?").await?;

    mock.assert();

    let messages = manager.transcript.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(
        messages[1].content,
        "Error: the model returned no response text"
    );

    return Ok(());
}

#[tokio::test]
async fn it_absorbs_transport_failures_and_keeps_the_user_turn() -> Result<()> {
    // Nothing listens here, the request fails before a response arrives.
    let (mut manager, _rx, _dir) = manager_fixture("http://127.0.0.1:1".to_string(), "abc").await;
    manager.submit("are you there?").await?;

    let messages = manager.transcript.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert!(messages[1].content.starts_with("Error: "));
    assert!(!manager.awaiting_response);

    return Ok(());
}

#[tokio::test]
async fn it_clears_history_and_the_persisted_record() -> Result<()> {
    let mut server = mockito::Server::new();
    server
        .mock("POST", COMPLETION_PATH)
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Noted."}]}}]}"#)
        .create();

    let (mut manager, mut rx, dir) = manager_fixture(server.url(), "abc").await;
    manager.submit("remember this").await?;
    assert_eq!(manager.transcript.messages().len(), 2);

    manager.clear_history().await?;

    assert!(manager.transcript.messages().is_empty());
    assert!(!dir.path().join("transcript.json").exists());

    let events = drain(&mut rx);
    assert!(matches!(events.last().unwrap(), Event::HistoryCleared()));

    return Ok(());
}

#[tokio::test]
async fn it_restores_persisted_state_to_the_view() -> Result<()> {
    let mut server = mockito::Server::new();
    server
        .mock("POST", COMPLETION_PATH)
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Twice, even."}]}}]}"#)
        .create();

    let (mut manager, _rx, _dir) = manager_fixture(server.url(), "abc").await;
    manager.submit("can you restore?").await?;

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    manager.tx = tx;
    manager.restore()?;

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], Event::SettingsUpdated(_)));
    match &events[1] {
        Event::HistoryRestored(messages) => {
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[0].content, "can you restore?");
        }
        _ => panic!("expected a restored history"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_notices_invalid_setting_updates() -> Result<()> {
    let (mut manager, mut rx, _dir) = manager_fixture("http://localhost:0".to_string(), "abc").await;
    drain(&mut rx);

    manager
        .update_setting(SettingsField::Model("gpt-4".to_string()))
        .await?;

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Event::Notice(_)));

    manager
        .update_setting(SettingsField::Temperature(1.4))
        .await?;

    let events = drain(&mut rx);
    match &events[0] {
        Event::SettingsUpdated(settings) => {
            assert_eq!(settings.temperature, 1.4);
        }
        _ => panic!("expected updated settings"),
    }

    return Ok(());
}
