//! AI-analysis collaborator.
//!
//! Ships the snapshot to a configured endpoint and hands the structured
//! report back for display. The report is not validated or acted on here.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::config::Config;
use crate::error::{PlanError, Result};
use crate::snapshot::Snapshot;

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub summary: String,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub suggested_allocations: Option<Vec<SuggestedAllocation>>,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedAllocation {
    pub issue_key: String,
    pub suggested_assignee_id: String,
    pub reason: String,
}

pub struct AnalysisClient {
    http: Client,
    endpoint: Url,
    token: Option<String>,
}

impl AnalysisClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let endpoint = config
            .analysis_endpoint
            .as_deref()
            .ok_or(PlanError::MissingAnalysisEndpoint)?;
        let endpoint =
            Url::parse(endpoint).map_err(|_| PlanError::InvalidUrl(endpoint.to_string()))?;

        Ok(Self {
            http: Client::new(),
            endpoint,
            token: config.analysis_token.clone(),
        })
    }

    pub async fn analyze(&self, snapshot: &Snapshot) -> Result<AnalysisReport> {
        let mut request = self.http.post(self.endpoint.clone()).json(&json!({
            "team": snapshot.team,
            "issues": snapshot.issues,
            "sprints": snapshot.sprints,
        }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(PlanError::Api {
                status: response.status().as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        Ok(response.json().await?)
    }
}
