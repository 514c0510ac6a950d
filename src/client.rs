use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{PlanError, Result};
use crate::responses::{RawIssue, RawSearchResponse, RawSprint, RawSprintPage, RawUser};

/// Fields requested per issue; everything the normalizer knows how to use.
const ISSUE_FIELDS: &str =
    "summary,issuetype,priority,status,assignee,customfield_10016,timespent,timeoriginalestimate,parent,sprint";

const PAGE_SIZE: &str = "200";

pub struct TrackerClient {
    http: Client,
    base: Url,
    auth_header: String,
}

impl TrackerClient {
    pub fn new(base: Url, email: &str, api_token: &str) -> Self {
        let creds = format!("{email}:{api_token}");
        let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
        Self {
            http: Client::new(),
            base,
            auth_header: format!("Basic {encoded}"),
        }
    }

    /// Cheap credential probe; distinguishes bad token, missing
    /// permission and a wrong site URL before any import starts.
    pub async fn validate_credentials(&self) -> Result<()> {
        let _: serde_json::Value = self.get("/rest/api/3/myself", &[]).await?;
        Ok(())
    }

    pub async fn fetch_team(&self, project: &str) -> Result<Vec<RawUser>> {
        self.get(
            "/rest/api/3/user/assignable/search",
            &[("project", project), ("maxResults", PAGE_SIZE)],
        )
        .await
    }

    pub async fn fetch_sprints(&self, board: u64) -> Result<Vec<RawSprint>> {
        let page: RawSprintPage = self
            .get(
                &format!("/rest/agile/1.0/board/{board}/sprint"),
                &[("maxResults", PAGE_SIZE)],
            )
            .await?;
        Ok(page.values)
    }

    pub async fn fetch_issues(&self, jql: &str) -> Result<Vec<RawIssue>> {
        let response: RawSearchResponse = self
            .get(
                "/rest/api/3/search",
                &[("jql", jql), ("maxResults", PAGE_SIZE), ("fields", ISSUE_FIELDS)],
            )
            .await?;
        Ok(response.issues)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self
            .base
            .join(path)
            .map_err(|_| PlanError::InvalidUrl(format!("{}{path}", self.base)))?;

        let response = self
            .http
            .get(url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(PlanError::InvalidCredentials),
            StatusCode::FORBIDDEN => Err(PlanError::PermissionDenied),
            StatusCode::NOT_FOUND => Err(PlanError::NotFound(path.to_string())),
            status if !status.is_success() => Err(PlanError::Api {
                status: status.as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            }),
            _ => Ok(response.json().await?),
        }
    }
}
