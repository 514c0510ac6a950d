use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tracker rejected the credentials (401). Check email and API token")]
    InvalidCredentials,

    #[error("Tracker denied access (403). The token lacks permission for this resource")]
    PermissionDenied,

    #[error("Tracker resource not found (404): {0}. Check the site URL, project key and board id")]
    NotFound(String),

    #[error("Tracker API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid export: {0}")]
    InvalidExport(String),

    #[error("No issues found in the import")]
    NoIssuesFound,

    #[error("Source '{0}' is already connected. Remove it first or pick another tag")]
    DuplicateSource(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Team member not found: {0}")]
    MemberNotFound(String),

    #[error("Capacity must be a positive number, got {0}")]
    InvalidCapacity(f64),

    #[error("Invalid revenue entry '{0}', expected KEY=AMOUNT")]
    InvalidRevenue(String),

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error(
        "No API token found. Set CAPLAN_API_TOKEN env var or add api_token to the config file"
    )]
    MissingApiToken,

    #[error("No tracker site configured. Run 'caplan init' or add site to the config file")]
    MissingSite,

    #[error("No tracker email configured. Run 'caplan init' or add email to the config file")]
    MissingEmail,

    #[error("Project not specified and no default_project in config")]
    NoProject,

    #[error("Board not specified and no board in config")]
    NoBoard,

    #[error("No analysis endpoint configured. Add analysis_endpoint to the config file")]
    MissingAnalysisEndpoint,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
