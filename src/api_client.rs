use thiserror::Error;

use crate::models::{CommitContribution, ContributionRecord, JiraContribution};

/// Every failed call collapses into a single error kind; the store only
/// keeps the message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for the contribution backend. Query parameters go through
/// reqwest's serializer, which percent-encodes month values and developer
/// emails.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    pub async fn teams(&self) -> Result<Vec<String>, ApiError> {
        self.get("/teams", &[]).await
    }

    /// One `squads` entry per selected team, repeated on the query string.
    pub async fn monthly_contributions(
        &self,
        months: u32,
        teams: &[String],
    ) -> Result<Vec<ContributionRecord>, ApiError> {
        let mut query = vec![("months", months.to_string())];
        for team in teams {
            query.push(("squads", team.clone()));
        }
        self.get("/contribution/monthly", &query).await
    }

    pub async fn jira_contributions(
        &self,
        email: &str,
        month: &str,
    ) -> Result<Vec<JiraContribution>, ApiError> {
        let query = [("email", email.to_string()), ("month", month.to_string())];
        self.get("/contribution/jira", &query).await
    }

    pub async fn commit_contributions(
        &self,
        email: &str,
        month: &str,
    ) -> Result<Vec<CommitContribution>, ApiError> {
        let query = [("email", email.to_string()), ("month", month.to_string())];
        self.get("/contribution/commit", &query).await
    }
}
