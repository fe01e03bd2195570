use anyhow::Result;
use tempfile::tempdir;

use super::SettingsStore;
use crate::domain::models::Settings;
use crate::domain::models::SettingsField;

#[tokio::test]
async fn it_defaults_when_no_record_exists() {
    let dir = tempdir().unwrap();
    let store = SettingsStore::load(dir.path().join("settings.json")).await;

    assert_eq!(store.current(), &Settings::default());
}

#[tokio::test]
async fn it_defaults_when_the_record_is_malformed() -> Result<()> {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("settings.json");
    tokio::fs::write(&file_path, "{not json at all").await?;

    let store = SettingsStore::load(file_path).await;

    assert_eq!(store.current(), &Settings::default());

    return Ok(());
}

#[tokio::test]
async fn it_persists_field_changes() -> Result<()> {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("settings.json");

    let mut store = SettingsStore::load(file_path.clone()).await;
    let updated = store
        .replace_field(SettingsField::ApiKey("abc".to_string()))
        .await?;
    assert_eq!(updated.api_key, "abc");

    store
        .replace_field(SettingsField::Model("gemini-1.5-pro".to_string()))
        .await?;

    let reloaded = SettingsStore::load(file_path).await;
    assert_eq!(reloaded.current().api_key, "abc");
    assert_eq!(reloaded.current().model, "gemini-1.5-pro");
    assert_eq!(reloaded.current().temperature, 0.9);

    return Ok(());
}

#[tokio::test]
async fn it_rejects_unknown_models() {
    let dir = tempdir().unwrap();
    let mut store = SettingsStore::load(dir.path().join("settings.json")).await;

    let res = store
        .replace_field(SettingsField::Model("gpt-4".to_string()))
        .await;

    assert!(res.is_err());
    assert_eq!(store.current().model, "gemini-2.0-flash-exp");
}

#[tokio::test]
async fn it_clamps_out_of_range_values() -> Result<()> {
    let dir = tempdir().unwrap();
    let mut store = SettingsStore::load(dir.path().join("settings.json")).await;

    let updated = store.replace_field(SettingsField::Temperature(9.5)).await?;
    assert_eq!(updated.temperature, 2.0);

    let updated = store.replace_field(SettingsField::Temperature(-1.0)).await?;
    assert_eq!(updated.temperature, 0.0);

    let updated = store.replace_field(SettingsField::MaxTokens(0)).await?;
    assert_eq!(updated.max_tokens, 1);

    let updated = store.replace_field(SettingsField::MaxTokens(500_000)).await?;
    assert_eq!(updated.max_tokens, 8192);

    return Ok(());
}

#[tokio::test]
async fn it_rejects_nan_temperatures() {
    let dir = tempdir().unwrap();
    let mut store = SettingsStore::load(dir.path().join("settings.json")).await;

    let res = store
        .replace_field(SettingsField::Temperature(f64::NAN))
        .await;

    assert!(res.is_err());
    assert_eq!(store.current().temperature, 0.9);
}
