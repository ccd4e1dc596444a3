pub mod auth;
pub mod bridge;
pub mod commands;
pub mod export;
pub mod form;
pub mod listing;
pub mod models;
pub mod records;
pub mod settings;
pub mod signature;
pub mod storage;
pub mod utils;

use std::{
    io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use auth::SessionGate;
use export::HtmlReportExporter;
use form::InspectionForm;
use listing::ReportList;
use models::User;
use records::RecordBook;
use settings::SettingsStore;
use storage::{Database, KeyValueStore};

const ENABLE_LOGS: bool = true;

const DATA_DIR_ENV: &str = "FIRECHECK_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "firecheck-data";

/// Everything one running shell works against. Passed explicitly to every
/// command; there is no global state.
pub struct AppState {
    pub(crate) store: Box<dyn KeyValueStore>,
    pub(crate) settings: SettingsStore,
    pub(crate) gate: SessionGate,
    pub(crate) user: Option<User>,
    pub(crate) records: RecordBook,
    pub(crate) form: Option<InspectionForm>,
    pub(crate) reports: ReportList<HtmlReportExporter>,
}

impl AppState {
    /// Restores the saved session and loads the record collection.
    pub fn new(
        store: Box<dyn KeyValueStore>,
        settings: SettingsStore,
        export_dir: PathBuf,
    ) -> Self {
        let keys = settings.storage_keys();
        let gate = SessionGate::new(settings.credentials(), keys.user);
        let user = gate.restore(store.as_ref());
        let records = RecordBook::load(store.as_ref(), keys.records);

        if let Some(user) = &user {
            log_info!("Restored session for {}", user.username);
        }
        log_info!("Loaded {} inspection records", records.len());

        Self {
            store,
            settings,
            gate,
            user,
            records,
            form: None,
            reports: ReportList::new(HtmlReportExporter::new(export_dir)),
        }
    }

    /// Opens `settings.json` and the SQLite store inside `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let settings = SettingsStore::new(data_dir.join("settings.json"))?;
        let database = Database::open(&data_dir.join("firecheck.sqlite3"))?;
        let export_dir = settings.export_dir(data_dir);

        Ok(Self::new(Box::new(database), settings, export_dir))
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn records(&self) -> &RecordBook {
        &self.records
    }

    pub fn export_dir(&self) -> &Path {
        self.reports.exporter().output_dir()
    }
}

fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Serves shell invocations from stdin until it closes.
pub fn run() -> Result<()> {
    utils::logging::init_logging();

    log_info!("firecheck starting up...");

    let data_dir = data_dir();
    let mut state = AppState::open(&data_dir)?;
    log_info!(
        "Serving {} records; reports are written to {}",
        state.records().len(),
        state.export_dir().display()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    bridge::serve(&mut state, stdin.lock(), stdout.lock())?;

    log_info!("Input closed; shutting down");
    Ok(())
}
