use itertools::Itertools;

use crate::models::{CommitContribution, ContributionDetail, JiraContribution};
use crate::routes::{cell, format_display_date};
use crate::store::FetchStatus;
use crate::transform::normalize_month;
use crate::AppState;

pub async fn detail_page(
    axum::extract::State(state): axum::extract::State<AppState>,
    axum::extract::Path((month, developer)): axum::extract::Path<(String, String)>,
) -> axum::response::Html<String> {
    let mut orchestrator = state.orchestrator.lock().await;
    orchestrator.open_detail(&month, &developer).await;

    let store = orchestrator.detail();
    let body = match (store.status(), store.data()) {
        (FetchStatus::Failed, _) => format!(
            "<p class=\"error\">Failed to load contribution details: {}</p>",
            store.error().unwrap_or("unknown error")
        ),
        (FetchStatus::Succeeded, Some(detail)) => render_detail(detail, &state),
        _ => "<p>Loading contribution details...</p>".to_string(),
    };

    let display_month = normalize_month(&month);
    let page = format!(
        r#"
        <!DOCTYPE html>
        <html>
            <head><title>Contribution details</title></head>
            <body>
                <h1>Contribution details for {developer} in {display_month}</h1>
                <p><a href="/">Back to monthly report</a></p>
                {body}
            </body>
        </html>
        "#
    );

    // Leaving the page; the next mount starts from a clean store.
    orchestrator.close_detail();
    axum::response::Html(page)
}

fn render_detail(detail: &ContributionDetail, state: &AppState) -> String {
    let jira_rows = if detail.jira_contributions.is_empty() {
        "<tr><td colspan=\"5\">No Jira tasks recorded for this month.</td></tr>".to_string()
    } else {
        detail
            .jira_contributions
            .iter()
            .map(|item| render_jira_row(item, state.config.jira_browse_url.as_deref()))
            .join("")
    };

    let commit_rows = if detail.commit_contributions.is_empty() {
        "<tr><td colspan=\"8\">No commits recorded for this month.</td></tr>".to_string()
    } else {
        detail
            .commit_contributions
            .iter()
            .map(|item| {
                render_commit_row(
                    item,
                    state.config.jira_browse_url.as_deref(),
                    state.config.git_commit_url.as_deref(),
                )
            })
            .join("")
    };

    format!(
        r#"
        <section>
            <h2>Summary</h2>
            <ul>
                <li>Developer: {}</li>
                <li>Month: {}</li>
                <li>Story points: {:.1}</li>
                <li>Bugs fixed: {}</li>
                <li>Commits: {}</li>
            </ul>
        </section>
        <section>
            <h2>Jira contributions</h2>
            <table>
                <tr><th>Jira task</th><th>First commit</th><th>Summary</th><th>Story points</th><th>Type</th></tr>
                {jira_rows}
            </table>
        </section>
        <section>
            <h2>Commit contributions</h2>
            <table>
                <tr><th>Repository</th><th>Jira task</th><th>Commit</th><th>Message</th><th>Date</th><th>Source</th><th>Tests</th><th>Other</th></tr>
                {commit_rows}
            </table>
        </section>
        "#,
        detail
            .developer_name
            .as_deref()
            .unwrap_or(&detail.developer_email),
        normalize_month(&detail.month),
        detail.total_story_points,
        detail.total_bugs,
        detail.total_commits
    )
}

fn linked(value: &str, base_url: Option<&str>) -> String {
    match base_url {
        Some(base) => format!("<a href=\"{base}{value}\">{value}</a>"),
        None => value.to_string(),
    }
}

fn render_jira_row(item: &JiraContribution, jira_base: Option<&str>) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        linked(&item.jira_task_id, jira_base),
        format_display_date(item.first_commit_date.as_deref()),
        cell(item.summary.as_deref()),
        cell(item.story_points),
        cell(item.issue_type.as_deref()),
    )
}

fn render_commit_row(
    item: &CommitContribution,
    jira_base: Option<&str>,
    git_base: Option<&str>,
) -> String {
    let jira_cell = match &item.jira_task_id {
        Some(task) => linked(task, jira_base),
        None => "-".to_string(),
    };
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        cell(item.repository_name.as_deref()),
        jira_cell,
        linked(&item.commit_id, git_base),
        abbreviate_commit_message(&item.commit_message),
        format_display_date(Some(&item.commit_date)),
        format_change(item.src_added, item.src_deleted),
        format_change(item.test_added, item.test_deleted),
        format_change(item.others_added, item.others_deleted),
    )
}

fn format_change(added: u32, deleted: u32) -> String {
    format!("+{added} -{deleted}")
}

/// First line of the message, capped at 120 characters.
fn abbreviate_commit_message(message: &str) -> String {
    let first_line = message.lines().next().unwrap_or("");
    if first_line.chars().count() <= 120 {
        first_line.to_string()
    } else {
        let head: String = first_line.chars().take(117).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_cells_show_added_and_deleted() {
        assert_eq!(format_change(12, 3), "+12 -3");
        assert_eq!(format_change(0, 0), "+0 -0");
    }

    #[test]
    fn commit_messages_are_cut_to_the_first_line() {
        assert_eq!(
            abbreviate_commit_message("fix parser\n\nlong body here"),
            "fix parser"
        );
    }

    #[test]
    fn long_commit_messages_are_truncated() {
        let long = "x".repeat(200);
        let shown = abbreviate_commit_message(&long);
        assert_eq!(shown.chars().count(), 120);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn links_are_emitted_only_when_a_base_url_is_set() {
        assert_eq!(
            linked("PRJ-1", Some("https://jira.example.com/browse/")),
            "<a href=\"https://jira.example.com/browse/PRJ-1\">PRJ-1</a>"
        );
        assert_eq!(linked("PRJ-1", None), "PRJ-1");
    }
}
