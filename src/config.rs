use std::env;

/// Runtime configuration, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub bind_addr: String,
    pub jira_browse_url: Option<String>,
    pub git_commit_url: Option<String>,
}

fn normalize_base_url(value: String) -> String {
    if value.ends_with('/') {
        value
    } else {
        format!("{value}/")
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let api_base_url = env::var("CONTRIB_API_BASE_URL")
            .map_err(|_| "CONTRIB_API_BASE_URL must be set".to_string())?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            jira_browse_url: env::var("JIRA_BROWSE_URL").ok().map(normalize_base_url),
            git_commit_url: env::var("GIT_COMMIT_URL").ok().map(normalize_base_url),
        })
    }
}
