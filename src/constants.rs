//! Constants used throughout hreports

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "hreports.yml";

/// Directory next to the configuration file holding per-configuration templates
pub const CONFIG_TEMPLATES_DIR: &str = "templates";

/// System-wide template directory
pub const SYSTEM_TEMPLATES_DIR: &str = "/templates";

/// Ledger query executable
pub const QUERY_PROGRAM: &str = "hledger";

/// Document converter executable
pub const CONVERTER_PROGRAM: &str = "pandoc";

/// Format passed to the converter with `-t`
pub const CONVERTER_TARGET_FORMAT: &str = "html5";

/// Extension used for exported files when a report has no `filename`
pub const DEFAULT_OUTPUT_EXTENSION: &str = "pdf";

/// Extension probed next to a document template for a default stylesheet
pub const STYLESHEET_EXTENSION: &str = "css";

/// Default `datetime` filter format
pub const DEFAULT_DATETIME_FORMAT: &str = "%H:%M / %d-%m-%Y";

/// Format of the `now` builtin
pub const NOW_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Configuration section and report field names
pub mod sections {
    pub const GLOBAL: &str = "global";
    pub const REPORTS: &str = "reports";
    pub const VARIABLES: &str = "variables";
    pub const QUERY: &str = "query";
    pub const LEDGER: &str = "ledger";
    pub const TEMPLATE: &str = "template";
    pub const FILENAME: &str = "filename";
    pub const STYLING: &str = "styling";
}

/// Reserved names in the rendering context
pub mod context_keys {
    pub const NOW: &str = "now";
    pub const GLOBAL: &str = "global";
    pub const REPORT: &str = "report";
    pub const OUTPUT: &str = "output";
    pub const ENGINE: &str = "hreport";

    pub const RESERVED: &[&str] = &[NOW, GLOBAL, REPORT, OUTPUT, ENGINE];
}

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
