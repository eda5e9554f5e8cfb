use tracing::{info, warn};

use crate::api_client::ApiClient;
use crate::models::{ContributionDetail, ContributionRecord};
use crate::store::{Filters, Store};
use crate::transform::summarize_detail;

/// Query parameters of one contribution fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParams {
    pub months: u32,
    pub teams: Vec<String>,
}

/// Decides what a filter change means for the Contribution Store: `None`
/// when no team is selected (clear instead of an all-teams query), otherwise
/// the parameters to fetch with.
pub fn contribution_fetch_plan(filters: &Filters) -> Option<FetchParams> {
    if filters.selected_teams.is_empty() {
        return None;
    }
    Some(FetchParams {
        months: filters.months,
        teams: filters.selected_teams.clone(),
    })
}

/// First catalog team, picked only while nothing is selected yet. The first
/// element of the response is the deterministic choice, not the
/// alphabetically smallest.
pub fn team_to_auto_select(catalog: &[String], selected: &[String]) -> Option<String> {
    if selected.is_empty() {
        catalog.first().cloned()
    } else {
        None
    }
}

/// Owns the filters and the three stores and is the only writer to them.
/// All mutation happens through its methods, so there is no concurrent
/// writer; overlapping responses are serialized by the stores' request
/// tickets (last-requested-wins).
pub struct Orchestrator {
    client: ApiClient,
    filters: Filters,
    teams: Store<Vec<String>>,
    contributions: Store<Vec<ContributionRecord>>,
    detail: Store<Option<ContributionDetail>>,
}

impl Orchestrator {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            filters: Filters::default(),
            teams: Store::new(),
            contributions: Store::new(),
            detail: Store::new(),
        }
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn teams(&self) -> &Store<Vec<String>> {
        &self.teams
    }

    pub fn contributions(&self) -> &Store<Vec<ContributionRecord>> {
        &self.contributions
    }

    pub fn detail(&self) -> &Store<Option<ContributionDetail>> {
        &self.detail
    }

    /// Startup sequence: fetch the team catalog once and, when it arrives
    /// with nothing selected yet, select the first team and load its
    /// contributions.
    pub async fn bootstrap(&mut self) {
        let seq = self.teams.begin();
        match self.client.teams().await {
            Ok(items) => {
                info!(teams = items.len(), "team catalog loaded");
                if self.teams.resolve(seq, items) {
                    if let Some(team) =
                        team_to_auto_select(self.teams.data(), &self.filters.selected_teams)
                    {
                        self.set_selected_teams(vec![team]).await;
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "team catalog fetch failed");
                self.teams.reject(seq, e.to_string());
            }
        }
    }

    pub async fn set_months(&mut self, months: u32) {
        if self.filters.months == months {
            return;
        }
        self.filters.months = months;
        self.refresh_contributions().await;
    }

    pub async fn set_selected_teams(&mut self, teams: Vec<String>) {
        if self.filters.selected_teams == teams {
            return;
        }
        self.filters.selected_teams = teams;
        self.refresh_contributions().await;
    }

    /// Reacts to the current filters: clears the Contribution Store when no
    /// team is selected, fetches otherwise.
    pub async fn refresh_contributions(&mut self) {
        let Some(params) = contribution_fetch_plan(&self.filters) else {
            self.contributions.clear();
            return;
        };

        let seq = self.contributions.begin();
        match self
            .client
            .monthly_contributions(params.months, &params.teams)
            .await
        {
            Ok(items) => {
                info!(
                    records = items.len(),
                    months = params.months,
                    "contributions loaded"
                );
                self.contributions.resolve(seq, items);
            }
            Err(e) => {
                warn!(error = %e, "contribution fetch failed");
                self.contributions.reject(seq, e.to_string());
            }
        }
    }

    /// Loads the drill-down for one (month, developer) pair from the split
    /// jira/commit endpoints and computes the summary totals client-side.
    pub async fn open_detail(&mut self, month: &str, developer: &str) {
        let seq = self.detail.begin();
        let result = tokio::try_join!(
            self.client.jira_contributions(developer, month),
            self.client.commit_contributions(developer, month),
        );
        match result {
            Ok((jira, commits)) => {
                let summary = summarize_detail(&jira, &commits);
                let detail = ContributionDetail {
                    month: month.to_string(),
                    developer_email: developer.to_string(),
                    developer_name: None,
                    total_story_points: summary.total_story_points,
                    total_bugs: summary.total_bugs,
                    total_commits: summary.total_commits,
                    jira_contributions: jira,
                    commit_contributions: commits,
                };
                self.detail.resolve(seq, Some(detail));
            }
            Err(e) => {
                warn!(error = %e, month, developer, "detail fetch failed");
                self.detail.reject(seq, e.to_string());
            }
        }
    }

    /// Leaving the detail view discards its data.
    pub fn close_detail(&mut self) {
        self.detail.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FetchStatus;

    // Connections to this address are refused immediately, so fetches fail
    // fast without touching the network.
    fn unreachable_orchestrator() -> Orchestrator {
        Orchestrator::new(ApiClient::new("http://127.0.0.1:9"))
    }

    async fn json(body: &'static str) -> impl axum::response::IntoResponse {
        ([(axum::http::header::CONTENT_TYPE, "application/json")], body)
    }

    // Minimal stand-in for the contribution backend.
    async fn spawn_backend() -> String {
        let app = axum::Router::new()
            .route(
                "/teams",
                axum::routing::get(|| json(r#"["Alpha","Beta"]"#)),
            )
            .route(
                "/contribution/monthly",
                axum::routing::get(|| json("[]")),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn empty_team_selection_plans_a_clear() {
        let filters = Filters {
            months: 6,
            selected_teams: Vec::new(),
        };
        assert_eq!(contribution_fetch_plan(&filters), None);
    }

    #[test]
    fn non_empty_selection_plans_a_fetch() {
        let filters = Filters {
            months: 6,
            selected_teams: vec!["Alpha".to_string(), "Beta".to_string()],
        };
        assert_eq!(
            contribution_fetch_plan(&filters),
            Some(FetchParams {
                months: 6,
                teams: vec!["Alpha".to_string(), "Beta".to_string()],
            })
        );
    }

    #[test]
    fn auto_select_takes_first_catalog_entry() {
        let catalog = vec!["Beta".to_string(), "Alpha".to_string()];
        assert_eq!(team_to_auto_select(&catalog, &[]), Some("Beta".to_string()));
    }

    #[test]
    fn auto_select_never_overrides_an_existing_selection() {
        let catalog = vec!["Alpha".to_string()];
        let selected = vec!["Gamma".to_string()];
        assert_eq!(team_to_auto_select(&catalog, &selected), None);
    }

    #[test]
    fn auto_select_with_empty_catalog_selects_nothing() {
        assert_eq!(team_to_auto_select(&[], &[]), None);
    }

    #[tokio::test]
    async fn clearing_team_selection_clears_contributions_without_fetching() {
        let mut orchestrator = unreachable_orchestrator();
        orchestrator.filters.selected_teams = vec!["Alpha".to_string()];

        orchestrator.set_selected_teams(Vec::new()).await;
        assert_eq!(orchestrator.contributions().status(), FetchStatus::Idle);
        assert!(orchestrator.contributions().data().is_empty());
        assert!(orchestrator.contributions().error().is_none());
    }

    #[tokio::test]
    async fn selecting_teams_issues_a_contribution_fetch() {
        let mut orchestrator = unreachable_orchestrator();

        orchestrator
            .set_selected_teams(vec!["Alpha".to_string()])
            .await;
        // The backend is unreachable, so the issued fetch must have failed.
        assert_eq!(orchestrator.contributions().status(), FetchStatus::Failed);
        assert!(orchestrator.contributions().error().is_some());
    }

    #[tokio::test]
    async fn changing_months_refetches_for_the_current_selection() {
        let mut orchestrator = unreachable_orchestrator();
        orchestrator.filters.selected_teams = vec!["Alpha".to_string()];

        orchestrator.set_months(6).await;
        assert_eq!(orchestrator.filters().months, 6);
        assert_eq!(orchestrator.contributions().status(), FetchStatus::Failed);
    }

    #[tokio::test]
    async fn unchanged_filters_do_not_issue_a_fetch() {
        let mut orchestrator = unreachable_orchestrator();

        orchestrator.set_months(3).await;
        orchestrator.set_selected_teams(Vec::new()).await;
        assert_eq!(orchestrator.contributions().status(), FetchStatus::Idle);
    }

    #[tokio::test]
    async fn bootstrap_auto_selects_the_first_catalog_team() {
        let base = spawn_backend().await;
        let mut orchestrator = Orchestrator::new(ApiClient::new(base));

        orchestrator.bootstrap().await;
        assert_eq!(orchestrator.teams().status(), FetchStatus::Succeeded);
        assert_eq!(
            orchestrator.teams().data(),
            &vec!["Alpha".to_string(), "Beta".to_string()]
        );
        // First response element, and the selection triggered a fetch.
        assert_eq!(
            orchestrator.filters().selected_teams,
            vec!["Alpha".to_string()]
        );
        assert_eq!(orchestrator.contributions().status(), FetchStatus::Succeeded);
        assert!(orchestrator.contributions().data().is_empty());
    }

    #[tokio::test]
    async fn failed_bootstrap_selects_nothing() {
        let mut orchestrator = unreachable_orchestrator();

        orchestrator.bootstrap().await;
        assert_eq!(orchestrator.teams().status(), FetchStatus::Failed);
        assert!(orchestrator.filters().selected_teams.is_empty());
        assert_eq!(orchestrator.contributions().status(), FetchStatus::Idle);
    }

    #[tokio::test]
    async fn closing_the_detail_view_clears_the_detail_store() {
        let mut orchestrator = unreachable_orchestrator();

        orchestrator.open_detail("2024-01", "x@y.com").await;
        assert_eq!(orchestrator.detail().status(), FetchStatus::Failed);

        orchestrator.close_detail();
        assert_eq!(orchestrator.detail().status(), FetchStatus::Idle);
        assert!(orchestrator.detail().data().is_none());
        assert!(orchestrator.detail().error().is_none());
    }
}
