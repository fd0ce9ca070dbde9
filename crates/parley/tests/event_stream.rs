//! Drives a party through JSON-lines event streams with file-backed
//! profiles and learning-data storage.

use std::path::Path;

use parley::io::LEARNING_DATA_PLACEHOLDER;
use parley::models::{Action, ParleyConfig, StrategyConfig};
use parley_strategy::test_support::{graded_profile, two_by_two_domain};

fn write_profile(dir: &Path) -> String {
    let path = dir.join("droid.json");
    let json = serde_json::to_string_pretty(&graded_profile(two_by_two_domain())).unwrap();
    std::fs::write(&path, json).unwrap();
    path.to_str().unwrap().to_string()
}

fn settings_line(profile: &str, storage_dir: &Path) -> String {
    serde_json::json!({
        "type": "settings",
        "me": "droid_1",
        "profile": profile,
        "deadline": {"type": "time", "duration_ms": 60000},
        "parameters": {"storage_dir": storage_dir.to_str().unwrap()}
    })
    .to_string()
}

fn offer_line(actor: &str, a: &str, b: &str) -> String {
    serde_json::json!({
        "type": "action_done",
        "action": {"type": "offer", "actor": actor, "bid": {"A": a, "B": b}}
    })
    .to_string()
}

fn seeded_config() -> ParleyConfig {
    ParleyConfig {
        strategy: StrategyConfig {
            seed: Some(17),
            ..StrategyConfig::default()
        },
        ..ParleyConfig::default()
    }
}

#[tokio::test]
async fn full_session_over_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let profile = write_profile(dir.path());
    let storage = dir.path().join("storage");

    let input = [
        settings_line(&profile, &storage),
        offer_line("other_2", "a2", "b2"),
        r#"{"type":"your_turn"}"#.to_string(),
        offer_line("droid_1", "a1", "b1"),
        String::new(),
        offer_line("other_2", "a1", "b1"),
        r#"{"type":"your_turn"}"#.to_string(),
        r#"{"type":"finished"}"#.to_string(),
    ]
    .join("\n");

    let mut party = parley::build_party(&seeded_config(), None);
    let mut output = Vec::new();
    let written = parley::drive(&mut party, input.as_bytes(), &mut output)
        .await
        .unwrap();

    assert_eq!(written, 2);
    let actions: Vec<Action> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(matches!(actions[0], Action::Offer { .. }));
    // a1/b1 is worth 1.0 to the droid.
    assert!(matches!(actions[1], Action::Accept { .. }));
    assert!(actions.iter().all(|a| a.actor().as_str() == "droid_1"));

    assert!(party.is_finished());
    let saved = std::fs::read_to_string(storage.join("data.md")).unwrap();
    assert_eq!(saved, LEARNING_DATA_PLACEHOLDER);
}

#[tokio::test]
async fn input_after_finished_is_not_read() {
    let dir = tempfile::tempdir().unwrap();
    let profile = write_profile(dir.path());

    let input = [
        settings_line(&profile, &dir.path().join("storage")),
        r#"{"type":"finished"}"#.to_string(),
        "this is not json".to_string(),
    ]
    .join("\n");

    let mut party = parley::build_party(&seeded_config(), None);
    let mut output = Vec::new();
    let written = parley::drive(&mut party, input.as_bytes(), &mut output)
        .await
        .unwrap();
    assert_eq!(written, 0);
    assert!(output.is_empty());
}

#[tokio::test]
async fn malformed_event_reports_line() {
    let mut party = parley::build_party(&seeded_config(), None);
    let mut output = Vec::new();
    let err = parley::drive(&mut party, "\n{not json}\n".as_bytes(), &mut output)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

#[tokio::test]
async fn turn_before_settings_is_rejected() {
    let mut party = parley::build_party(&seeded_config(), None);
    let mut output = Vec::new();
    let input = r#"{"type":"your_turn"}"#;
    let result = parley::drive(&mut party, input.as_bytes(), &mut output).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn missing_profile_aborts_session() {
    let dir = tempfile::tempdir().unwrap();
    let input = settings_line("/no/such/profile.json", dir.path());

    let mut party = parley::build_party(&seeded_config(), None);
    let mut output = Vec::new();
    let err = parley::drive(&mut party, input.as_bytes(), &mut output)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("Profile error"));
}

#[tokio::test]
async fn learning_data_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let profile = write_profile(dir.path());
    let storage = dir.path().join("storage");

    let input = [
        settings_line(&profile, &storage),
        r#"{"type":"finished"}"#.to_string(),
    ]
    .join("\n");

    let mut config = seeded_config();
    config.storage.learning_data = false;
    let mut party = parley::build_party(&config, None);
    let mut output = Vec::new();
    parley::drive(&mut party, input.as_bytes(), &mut output)
        .await
        .unwrap();

    assert!(!storage.join("data.md").exists());
}

#[tokio::test]
async fn relative_profile_resolves_against_profile_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_profile(dir.path());

    let input = [
        settings_line("droid.json", &dir.path().join("storage")),
        r#"{"type":"your_turn"}"#.to_string(),
    ]
    .join("\n");

    let mut party = parley::build_party(&seeded_config(), Some(dir.path().to_path_buf()));
    let mut output = Vec::new();
    let written = parley::drive(&mut party, input.as_bytes(), &mut output)
        .await
        .unwrap();
    assert_eq!(written, 1);
}
