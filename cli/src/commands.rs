use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::report::{BootstrapReport, CatalogReport, ManifestReport, MotionReport, PageReport};
use clap::{Parser, Subcommand, ValueEnum};
use engine::fetch::source_for;
use engine::motion::MotionPreference;
use engine::storage::FileStore;
use engine::surface::DocumentModel;
use engine::theme::controller::CatalogOutcome;
use engine::theme::manifest::parse_manifest;
use engine::{ThemeController, ThemeRegistry, bootstrap};
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "sitetheme",
    version,
    about = "Resolve, apply and inspect portfolio site themes"
)]
pub struct Cli {
    /// Configuration file (defaults to ./sitetheme.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run only the pre-paint step and print the resolved theme
    Resolve,
    /// Run a full page load and print the final document state
    Load,
    /// Run a page load, then switch to a theme as a user would
    Apply {
        /// Theme id to apply
        id: String,
    },
    /// Run a page load and list the resulting catalog
    List,
    /// Validate a manifest file and report kept and dropped entries
    CheckManifest {
        path: PathBuf,
    },
    /// Show or toggle the reduce-motion preference
    Motion {
        #[arg(value_enum, default_value = "show")]
        action: MotionAction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MotionAction {
    Show,
    Toggle,
}

/// A loaded page: the controller after its catalog fetch has settled
pub type Page = ThemeController<FileStore, DocumentModel>;

/// Bootstrap, hand over to the controller, and settle the single catalog
/// fetch, the same order a browser runs the two scripts in.
pub async fn load_page(config: &AppConfig) -> AppResult<(Page, CatalogOutcome)> {
    let settings = config.controller_settings()?;
    let store = config.preference_store()?;
    log::debug!("Preferences stored in {}", store.path().display());
    let source = source_for(&settings.script_base, config.site().fetch_timeout())?;

    let mut document = DocumentModel::new();
    let built_in = ThemeRegistry::built_in();
    let outcome = bootstrap(&store, &built_in, &mut document, &settings.script_base);
    let motion = MotionPreference::load(&store, &mut document);
    log::debug!("Reduce motion: {}", motion.is_reduced());

    let mut controller = ThemeController::new(settings, store, document, source, &outcome);
    let catalog = controller.run_page_load().await;
    Ok((controller, catalog))
}

pub async fn execute(command: Command, config: &AppConfig, json: bool) -> AppResult<()> {
    match command {
        Command::Resolve => {
            let settings = config.controller_settings()?;
            let store = config.preference_store()?;
            let mut document = DocumentModel::new();
            let outcome = bootstrap(
                &store,
                &ThemeRegistry::built_in(),
                &mut document,
                &settings.script_base,
            );
            emit(&BootstrapReport::from(&outcome), json)
        }
        Command::Load => {
            let (page, catalog) = load_page(config).await?;
            emit(&PageReport::capture(&page, &catalog), json)
        }
        Command::Apply { id } => {
            let (mut page, catalog) = load_page(config).await?;
            let active = page.apply_theme(&id).to_string();
            if active != id {
                log::info!("Requested theme '{id}' is not in the catalog, applied '{active}'");
            }
            emit(&PageReport::capture(&page, &catalog), json)
        }
        Command::List => {
            let (page, _) = load_page(config).await?;
            emit(&CatalogReport::capture(page.registry(), page.active_id()), json)
        }
        Command::CheckManifest { path } => {
            let body = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| AppError::Io(format!("{}: {e}", path.display())))?;
            let manifest = parse_manifest(&body)?;
            emit(&ManifestReport::from(&manifest), json)
        }
        Command::Motion { action } => {
            let mut store = config.preference_store()?;
            let mut document = DocumentModel::new();
            let mut motion = MotionPreference::load(&store, &mut document);
            let changed = action == MotionAction::Toggle;
            if changed {
                motion.toggle(&mut store, &mut document);
            }
            emit(
                &MotionReport {
                    reduced: motion.is_reduced(),
                    changed,
                },
                json,
            )
        }
    }
}

fn emit<T: Serialize + Display>(report: &T, json: bool) -> AppResult<()> {
    if json {
        let text = serde_json::to_string_pretty(report)
            .map_err(|e| AppError::Io(format!("Failed to serialize report: {e}")))?;
        println!("{text}");
    } else {
        println!("{report}");
    }
    Ok(())
}
