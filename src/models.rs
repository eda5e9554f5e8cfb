use serde::Deserialize;

/// One backend row per (month, team, developer). The backend may emit the
/// month either as an ISO datetime or as `YYYY-MM`; it is normalized only
/// when grouping by month. Duplicate (month, developer) rows are legal and
/// are summed by the aggregation functions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionRecord {
    pub month: String,
    #[serde(default)]
    pub team_name: String,
    pub email: String,
    #[serde(default)]
    pub planned_story_points: f64,
    #[serde(default)]
    pub story_count: u32,
    #[serde(default)]
    pub bug_count: u32,
    #[serde(default)]
    pub commits_count: u32,
    #[serde(default)]
    pub commits_with_jira_task: u32,
    #[serde(default)]
    pub src_changes: u32,
    #[serde(default)]
    pub src_changes_ratio: f64,
    #[serde(default)]
    pub test_changes: u32,
    #[serde(default)]
    pub test_changes_ratio: f64,
    #[serde(default)]
    pub other_changes: u32,
    #[serde(default)]
    pub other_changes_ratio: f64,
    #[serde(default)]
    pub git_contribution: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraContribution {
    pub jira_task_id: String,
    pub author: Option<String>,
    pub team_name: Option<String>,
    pub contribution: Option<f64>,
    pub first_commit_date: Option<String>,
    pub summary: Option<String>,
    pub story_points: Option<f64>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub issue_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitContribution {
    pub commit_id: String,
    pub commit_message: String,
    pub commit_date: String,
    pub repository_name: Option<String>,
    pub jira_task_id: Option<String>,
    pub author: Option<String>,
    pub team_name: Option<String>,
    #[serde(default)]
    pub src_added: u32,
    #[serde(default)]
    pub src_deleted: u32,
    #[serde(default)]
    pub test_added: u32,
    #[serde(default)]
    pub test_deleted: u32,
    #[serde(default)]
    pub others_added: u32,
    #[serde(default)]
    pub others_deleted: u32,
}

/// Drill-down for one (month, developer) pair. Assembled client-side from the
/// split jira/commit endpoints; the totals come from
/// `transform::summarize_detail`.
#[derive(Debug, Clone)]
pub struct ContributionDetail {
    pub month: String,
    pub developer_email: String,
    pub developer_name: Option<String>,
    pub total_story_points: f64,
    pub total_bugs: u32,
    pub total_commits: u32,
    pub jira_contributions: Vec<JiraContribution>,
    pub commit_contributions: Vec<CommitContribution>,
}
