//! Constants used throughout the Carelytics core crate.

/// Patient server used when neither a flag nor `CARELYTICS_API_URL` names one.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Preference file used when neither a flag nor `CARELYTICS_PREFERENCES` names one.
pub const DEFAULT_PREFERENCES_PATH: &str = ".carelytics/preferences.json";

/// Preference key holding `"dark"` or `"light"`.
pub const THEME_KEY: &str = "theme";

/// Element id of the theme toggle control.
pub const THEME_TOGGLE_ID: &str = "themeToggle";

/// Element id of the table body the rows are rendered into.
pub const TABLE_BODY_ID: &str = "table";
