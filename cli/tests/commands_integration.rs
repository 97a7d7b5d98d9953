use claims::*;
use engine::ControllerPhase;
use engine::storage::{FileStore, PreferenceStore, REDUCE_MOTION_KEY, THEME_KEY};
use engine::surface::ThemeSurface;
use engine::theme::controller::CatalogOutcome;
use engine::theme::types::{STYLESHEET_LINK_ID, THEME_ATTRIBUTE};
use reqwest::Url;
use sitetheme::commands::{Command, MotionAction, execute, load_page};
use sitetheme::config::{AppConfig, ConfigLoadResult, load_config};
use sitetheme::error::AppError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const MANIFEST: &str = r#"{
    "version": 1,
    "generatedAt": "2024-06-01T08:00:00Z",
    "defaultTheme": "midnight",
    "themes": [
        { "id": "midnight", "label": "Midnight", "css": "themes/midnight.css" },
        { "id": "arc", "label": "Arc", "css": "themes/arc.css" },
        { "id": "broken", "label": "Broken", "css": "themes/../secret.css" }
    ]
}"#;

struct Site {
    dir: TempDir,
}

impl Site {
    fn new(manifest: Option<&str>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        if let Some(manifest) = manifest {
            fs::create_dir_all(dir.path().join("themes")).unwrap();
            fs::write(dir.path().join("themes/manifest.json"), manifest).unwrap();
        }
        Self { dir }
    }

    fn preferences(&self) -> PathBuf {
        self.dir.path().join("state/preferences.json")
    }

    fn write_config(&self, extra: &str) -> PathBuf {
        let base = Url::from_directory_path(self.dir.path()).unwrap();
        let path = self.dir.path().join("sitetheme.toml");
        let content = format!(
            "[site]\nscript_base_url = \"{base}\"\n{extra}\n\n[storage]\npreferences_file = \"{}\"\n",
            self.preferences().display()
        );
        fs::write(&path, content).unwrap();
        path
    }

    fn config(&self) -> AppConfig {
        load(&self.write_config(""))
    }
}

fn load(path: &Path) -> AppConfig {
    match load_config(Some(path)) {
        ConfigLoadResult::Success(config) => *config,
        ConfigLoadResult::LoadError(e) | ConfigLoadResult::DeserializeError(e) => {
            panic!("config should load: {e}")
        }
    }
}

#[test]
fn test_invalid_timeout_fails_validation() {
    let site = Site::new(None);
    let path = site.write_config("fetch_timeout_ms = 5");

    match load_config(Some(&path)) {
        ConfigLoadResult::DeserializeError(message) => {
            assert!(message.contains("Manifest fetch timeout out of range"));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn test_missing_explicit_config_file() {
    let site = Site::new(None);
    assert_matches!(
        load_config(Some(&site.dir.path().join("absent.toml"))),
        ConfigLoadResult::LoadError(_)
    );
}

#[tokio::test]
async fn test_page_load_from_file_site() {
    let site = Site::new(Some(MANIFEST));
    let config = site.config();

    let (page, outcome) = assert_ok!(load_page(&config).await);

    let rejected = match outcome {
        CatalogOutcome::Applied { themes, rejected } => {
            assert_eq!(themes, 2);
            rejected
        }
        other => panic!("expected manifest to apply, got {other:?}"),
    };
    assert_eq!(rejected.len(), 1);
    assert_eq!(page.phase(), ControllerPhase::CatalogApplied);
    assert_eq!(page.active_id(), "midnight");

    let expected = Url::from_directory_path(site.dir.path())
        .unwrap()
        .join("themes/midnight.css")
        .unwrap();
    assert_eq!(
        page.surface().stylesheet_href(STYLESHEET_LINK_ID).as_deref(),
        Some(expected.as_str())
    );

    let store = FileStore::new(site.preferences());
    assert_none!(assert_ok!(store.get(THEME_KEY)));
}

#[tokio::test]
async fn test_missing_manifest_keeps_built_in() {
    let site = Site::new(None);
    let config = site.config();

    let (page, outcome) = assert_ok!(load_page(&config).await);

    assert_matches!(outcome, CatalogOutcome::Retained(_));
    assert_eq!(page.active_id(), "default");
    assert_none!(page.surface().root_attribute(THEME_ATTRIBUTE));
    assert_eq!(page.registry().len(), 2);
}

#[tokio::test]
async fn test_applied_theme_survives_next_page_load() {
    let site = Site::new(Some(MANIFEST));
    let config = site.config();

    let (mut page, _) = assert_ok!(load_page(&config).await);
    assert_eq!(page.apply_theme("arc"), "arc");

    let (next, _) = assert_ok!(load_page(&config).await);
    assert_eq!(next.active_id(), "arc");
    assert_eq!(
        next.surface().root_attribute(THEME_ATTRIBUTE).as_deref(),
        Some("arc")
    );
}

#[tokio::test]
async fn test_check_manifest_rejects_unusable_file() {
    let site = Site::new(Some(r#"{ "themes": [ { "id": "x", "label": "X", "css": "/x.css" } ] }"#));
    let config = site.config();

    let result = execute(
        Command::CheckManifest {
            path: site.dir.path().join("themes/manifest.json"),
        },
        &config,
        false,
    )
    .await;
    assert_matches!(result, Err(AppError::Manifest(_)));

    let result = execute(
        Command::CheckManifest {
            path: site.dir.path().join("missing.json"),
        },
        &config,
        true,
    )
    .await;
    assert_matches!(result, Err(AppError::Io(_)));
}

#[tokio::test]
async fn test_motion_toggle_persists() {
    let site = Site::new(None);
    let config = site.config();

    assert_ok!(
        execute(
            Command::Motion {
                action: MotionAction::Toggle
            },
            &config,
            false
        )
        .await
    );

    let store = FileStore::new(site.preferences());
    assert_eq!(assert_ok!(store.get(REDUCE_MOTION_KEY)).as_deref(), Some("true"));

    let (page, _) = assert_ok!(load_page(&config).await);
    assert_eq!(
        page.surface().root_attribute("reduce-motion").as_deref(),
        Some("true")
    );
}
