use itertools::Itertools;
use serde::Deserialize;

use crate::models::ContributionRecord;
use crate::selectors::contributions_by_team;
use crate::store::FetchStatus;
use crate::transform::{
    aggregate_by_developer, aggregate_by_month, aggregate_by_month_and_developer,
    build_stacked_bug_series, build_stacked_series, has_developer_metric, has_series_values,
    DeveloperAggregate, DeveloperMetric, SeriesRow,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    months: Option<u32>,
    /// Comma-separated team names; an explicit empty value clears the
    /// selection.
    squads: Option<String>,
}

pub async fn report_page(
    axum::extract::State(state): axum::extract::State<AppState>,
    axum::extract::Query(query): axum::extract::Query<ReportQuery>,
) -> axum::response::Html<String> {
    let mut orchestrator = state.orchestrator.lock().await;

    if let Some(months) = query.months {
        orchestrator.set_months(months).await;
    }
    if let Some(squads) = query.squads {
        let teams: Vec<String> = squads
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        orchestrator.set_selected_teams(teams).await;
    }

    let filters = orchestrator.filters().clone();
    let teams = orchestrator.teams();
    let contributions = orchestrator.contributions();

    let mut body = String::new();
    body.push_str(&render_filters_panel(
        filters.months,
        teams.data(),
        &filters.selected_teams,
    ));

    if teams.status() == FetchStatus::Failed {
        body.push_str(&format!(
            "<p class=\"error\">Failed to load teams: {}</p>",
            teams.error().unwrap_or("unknown error")
        ));
    }

    match contributions.status() {
        FetchStatus::Loading => {
            body.push_str("<p>Loading contributions...</p>");
        }
        FetchStatus::Failed => {
            body.push_str(&format!(
                "<p class=\"error\">Failed to load contributions: {}</p>",
                contributions.error().unwrap_or("unknown error")
            ));
        }
        _ => {}
    }

    if filters.selected_teams.is_empty() && teams.status() == FetchStatus::Succeeded {
        body.push_str("<p>Select at least one team to display contribution data.</p>");
    }

    let by_team = contributions_by_team(contributions.data());
    if contributions.status() == FetchStatus::Succeeded && by_team.is_empty() {
        body.push_str("<p>No contribution data for the selected filters.</p>");
    }
    for (team_name, records) in &by_team {
        body.push_str(&render_team_report(team_name, records));
    }

    axum::response::Html(format!(
        r#"
        <!DOCTYPE html>
        <html>
            <head><title>Team contribution report</title></head>
            <body>
                <h1>Team contribution report</h1>
                {body}
            </body>
        </html>
        "#
    ))
}

fn render_filters_panel(months: u32, teams: &[String], selected: &[String]) -> String {
    let team_links = teams
        .iter()
        .map(|team| {
            let marker = if selected.contains(team) { "*" } else { "" };
            format!(
                "<a href=\"/?months={months}&squads={team}\">{marker}{team}{marker}</a>"
            )
        })
        .join(" | ");
    let month_links = [1u32, 3, 6, 12, 24]
        .iter()
        .map(|m| format!("<a href=\"/?months={m}\">{m}</a>"))
        .join(" ");

    format!(
        "<div><p>Months: {months} (choose: {month_links})</p><p>Teams: {team_links}</p></div>"
    )
}

fn render_team_report(team_name: &str, records: &[&ContributionRecord]) -> String {
    let owned: Vec<ContributionRecord> = records.iter().map(|r| (*r).clone()).collect();
    let developer_totals = aggregate_by_developer(&owned);
    let monthly_totals = aggregate_by_month(&owned);
    let grouped = aggregate_by_month_and_developer(&owned);

    // Newest month first; `grouped` already carries that order.
    let months_desc: Vec<String> = grouped.iter().map(|(m, _)| m.clone()).collect();
    let developer_keys: Vec<String> =
        developer_totals.iter().map(|d| d.email.clone()).collect();

    let story_series = build_stacked_series(&months_desc, &grouped);
    let bug_series = build_stacked_bug_series(&months_desc, &grouped);

    let story_chart =
        if has_series_values(&story_series, &developer_keys) {
            render_series_table("Story points per month", &story_series, &developer_keys)
        } else {
            placeholder("No story history")
        };
    let bug_chart = if has_series_values(&bug_series, &developer_keys) {
        render_series_table("Bugs fixed per month", &bug_series, &developer_keys)
    } else {
        placeholder("No bug history")
    };
    let story_share = if has_developer_metric(&developer_totals, DeveloperMetric::PlannedStoryPoints)
    {
        render_share_table("Story points share", &developer_totals, |d| {
            format!("{:.1}", d.planned_story_points)
        })
    } else {
        placeholder("No story points data")
    };
    let bug_share = if has_developer_metric(&developer_totals, DeveloperMetric::BugCount) {
        render_share_table("Bug share", &developer_totals, |d| d.bug_count.to_string())
    } else {
        placeholder("No bug data")
    };

    let month_rows = monthly_totals
        .iter()
        .map(|m| {
            format!(
                "<tr><td>{}</td><td>{:.1}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                m.month, m.planned_story_points, m.story_count, m.bug_count, m.commits_count
            )
        })
        .join("");

    // Drill-down links live here, one per (month, developer) cell.
    let breakdown = grouped
        .iter()
        .map(|(month, developers)| {
            let rows = developers
                .iter()
                .map(|d| {
                    format!(
                        "<tr><td><a href=\"/developer/{month}/{}\">{}</a></td><td>{:.1}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                        d.email, d.email, d.planned_story_points, d.story_count, d.bug_count,
                        d.commits_count
                    )
                })
                .join("");
            format!(
                "<h4>{month}</h4><table><tr><th>Developer</th><th>Story points</th><th>Stories</th><th>Bugs</th><th>Commits</th></tr>{rows}</table>"
            )
        })
        .join("");

    let record_count = records.len();
    format!(
        r#"
        <section>
            <h2>{team_name}</h2>
            <p>{record_count} contribution records found in the selected period.</p>
            <h3>Period totals</h3>
            <table>
                <tr><th>Month</th><th>Story points</th><th>Stories</th><th>Bugs</th><th>Commits</th></tr>
                {month_rows}
            </table>
            {story_share}
            {bug_share}
            {story_chart}
            {bug_chart}
            <h3>Monthly breakdown</h3>
            {breakdown}
        </section>
        "#
    )
}

fn render_share_table<F>(title: &str, developers: &[DeveloperAggregate], value: F) -> String
where
    F: Fn(&DeveloperAggregate) -> String,
{
    let rows = developers
        .iter()
        .map(|d| format!("<tr><td>{}</td><td>{}</td></tr>", legend_label(&d.email), value(d)))
        .join("");
    format!("<h3>{title}</h3><table><tr><th>Developer</th><th>Total</th></tr>{rows}</table>")
}

/// Chart legends use the local part of the email so columns stay narrow.
fn legend_label(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

fn render_series_table(title: &str, series: &[SeriesRow], keys: &[String]) -> String {
    let header = keys
        .iter()
        .map(|key| format!("<th>{}</th>", legend_label(key)))
        .join("");
    let rows = series
        .iter()
        .map(|row| {
            let cells = keys
                .iter()
                .map(|key| format!("<td>{:.1}</td>", row.values.get(key).copied().unwrap_or(0.0)))
                .join("");
            format!("<tr><td>{}</td>{cells}</tr>", row.month)
        })
        .join("");
    format!("<h3>{title}</h3><table><tr><th>Month</th>{header}</tr>{rows}</table>")
}

fn placeholder(message: &str) -> String {
    format!("<p class=\"placeholder\">{message}</p>")
}
