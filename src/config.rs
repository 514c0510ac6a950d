use std::collections::HashMap;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;
use url::Url;

use crate::error::{PlanError, Result};

#[derive(Deserialize, Default)]
pub struct Config {
    /// Tracker site, e.g. "https://acme.atlassian.net".
    pub site: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
    /// Agile board id used for sprint fetches.
    pub board: Option<u64>,
    pub default_project: Option<String>,
    /// Where `caplan analyze` sends the snapshot.
    pub analysis_endpoint: Option<String>,
    pub analysis_token: Option<String>,
    /// Externally supplied revenue per profitability group key.
    #[serde(default)]
    pub revenue: HashMap<String, f64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| PlanError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| PlanError::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "caplan")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(PlanError::NoConfigDir)
    }

    /// Tracker site as a validated URL.
    pub fn site_url(&self) -> Result<Url> {
        let site = self.site.as_deref().ok_or(PlanError::MissingSite)?;
        Url::parse(site).map_err(|_| PlanError::InvalidUrl(site.to_string()))
    }

    pub fn email(&self) -> Result<String> {
        self.email.clone().ok_or(PlanError::MissingEmail)
    }

    /// Get API token with env var taking precedence over config file
    pub fn api_token(&self) -> Result<String> {
        if let Ok(token) = std::env::var("CAPLAN_API_TOKEN") {
            return Ok(token);
        }

        self.api_token.clone().ok_or(PlanError::MissingApiToken)
    }

    /// Get project, preferring explicit argument over default
    pub fn resolve_project(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .map(String::from)
            .or_else(|| self.default_project.clone())
            .ok_or(PlanError::NoProject)
    }

    pub fn resolve_board(&self, explicit: Option<u64>) -> Result<u64> {
        explicit.or(self.board).ok_or(PlanError::NoBoard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_url_validated() {
        let config = Config {
            site: Some("https://acme.atlassian.net".to_string()),
            ..Config::default()
        };
        assert_eq!(config.site_url().unwrap().host_str(), Some("acme.atlassian.net"));

        let bad = Config {
            site: Some("not a url".to_string()),
            ..Config::default()
        };
        assert!(matches!(bad.site_url(), Err(PlanError::InvalidUrl(_))));

        assert!(matches!(Config::default().site_url(), Err(PlanError::MissingSite)));
    }

    #[test]
    fn revenue_table_parses() {
        let config: Config = toml::from_str(
            r#"
            site = "https://acme.atlassian.net"

            [revenue]
            PROJ = 50000.0
            OPS = 12000.0
            "#,
        )
        .unwrap();
        assert_eq!(config.revenue.get("PROJ"), Some(&50_000.0));
        assert_eq!(config.revenue.get("OPS"), Some(&12_000.0));
    }

    #[test]
    fn resolve_project_prefers_explicit() {
        let config = Config {
            default_project: Some("OPS".to_string()),
            ..Config::default()
        };
        assert_eq!(config.resolve_project(Some("PROJ")).unwrap(), "PROJ");
        assert_eq!(config.resolve_project(None).unwrap(), "OPS");
        assert!(matches!(
            Config::default().resolve_project(None),
            Err(PlanError::NoProject)
        ));
    }
}
