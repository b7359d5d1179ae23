//! # Carelytics Core
//!
//! The patient table client, independent of any particular front end.
//!
//! This crate contains:
//! - The table controller (load, select, add, update, delete)
//! - Form fields and the validation that turns them into request bodies
//! - Escaping HTML and plain-text rendering of the table
//! - The persisted light/dark theme preference
//!
//! **No I/O policy**: reading the environment, printing and prompting belong in the binaries.
//! HTTP is reached only through [`carelytics_api::PatientApi`].

pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod form;
pub mod notify;
pub mod preferences;
pub mod render;
pub mod table;
pub mod theme;
pub mod validation;

pub use config::{ClientConfig, ConfigError};
pub use constants::{DEFAULT_API_URL, DEFAULT_PREFERENCES_PATH, THEME_KEY};
pub use controller::{PageHandles, PatientTableController};
pub use error::{
    ControllerError, ControllerResult, PreferenceError, PreferenceResult, ValidationError,
};
pub use form::{FieldId, FormFields, FormState};
pub use notify::{AlertLog, Notifier};
pub use preferences::{JsonFilePreferences, MemoryPreferences, PreferenceStore};
pub use table::{PatientRow, RenderedTable, TableView};
pub use theme::{Theme, ThemeToggle};

/// The controller wired to the real HTTP client and the in-memory view handles used by the
/// terminal front ends.
pub type TerminalController =
    PatientTableController<carelytics_api::HttpPatientApi, RenderedTable, FormState, AlertLog>;

/// Build a [`TerminalController`] for `config` with an empty table and form.
pub fn terminal_controller(config: &ClientConfig) -> Result<TerminalController, carelytics_api::ApiError> {
    let api = carelytics_api::HttpPatientApi::new(config.api_base_url().clone())?;
    Ok(PatientTableController::new(
        api,
        PageHandles::new(RenderedTable::new(), FormState::new(), AlertLog::new()),
    ))
}
