use std::collections::HashMap;

use chrono::Datelike;

use crate::models::{CommitContribution, ContributionRecord, JiraContribution};

/// Canonicalizes a raw month value to `YYYY-MM`. Accepts ISO datetimes,
/// `YYYY-MM-DD` and `YYYY-MM`; anything unparseable is returned verbatim so
/// that odd backend values keep a stable grouping identity. Idempotent.
pub fn normalize_month(raw: &str) -> String {
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(raw) {
        return format!("{}-{:02}", datetime.year(), datetime.month());
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return format!("{}-{:02}", date.year(), date.month());
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
        return format!("{}-{:02}", date.year(), date.month());
    }
    raw.to_string()
}

/// Summed metrics for one developer. Depending on the aggregation the scope
/// is either the whole fetched window or a single normalized month.
#[derive(Debug, Clone, PartialEq)]
pub struct DeveloperAggregate {
    pub email: String,
    pub planned_story_points: f64,
    pub story_count: u32,
    pub bug_count: u32,
    pub commits_count: u32,
}

impl DeveloperAggregate {
    fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
            planned_story_points: 0.0,
            story_count: 0,
            bug_count: 0,
            commits_count: 0,
        }
    }

    fn add(&mut self, record: &ContributionRecord) {
        self.planned_story_points += record.planned_story_points;
        self.story_count += record.story_count;
        self.bug_count += record.bug_count;
        self.commits_count += record.commits_count;
    }
}

/// Summed metrics for one normalized month across all developers.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthAggregate {
    pub month: String,
    pub planned_story_points: f64,
    pub story_count: u32,
    pub bug_count: u32,
    pub commits_count: u32,
}

/// Groups by exact developer email (no month normalization), sorted
/// descending by planned story points. The sort is stable, so developers
/// with equal points keep their first-seen order.
pub fn aggregate_by_developer(records: &[ContributionRecord]) -> Vec<DeveloperAggregate> {
    let mut order: Vec<DeveloperAggregate> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let at = *index.entry(record.email.clone()).or_insert_with(|| {
            order.push(DeveloperAggregate::new(&record.email));
            order.len() - 1
        });
        order[at].add(record);
    }

    order.sort_by(|a, b| b.planned_story_points.total_cmp(&a.planned_story_points));
    order
}

/// Groups by normalized month key, summed across developers, sorted
/// descending by key. Lexicographic comparison is correct for zero-padded
/// `YYYY-MM` keys; unparseable raw keys sort among themselves and may
/// interleave with canonical ones, which is accepted.
pub fn aggregate_by_month(records: &[ContributionRecord]) -> Vec<MonthAggregate> {
    let mut order: Vec<MonthAggregate> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let key = normalize_month(&record.month);
        let at = *index.entry(key.clone()).or_insert_with(|| {
            order.push(MonthAggregate {
                month: key,
                planned_story_points: 0.0,
                story_count: 0,
                bug_count: 0,
                commits_count: 0,
            });
            order.len() - 1
        });
        let entry = &mut order[at];
        entry.planned_story_points += record.planned_story_points;
        entry.story_count += record.story_count;
        entry.bug_count += record.bug_count;
        entry.commits_count += record.commits_count;
    }

    order.sort_by(|a, b| b.month.cmp(&a.month));
    order
}

/// Two-level grouping: normalized month key outer (descending), developer
/// aggregates inner (descending by planned story points).
pub fn aggregate_by_month_and_developer(
    records: &[ContributionRecord],
) -> Vec<(String, Vec<DeveloperAggregate>)> {
    let mut order: Vec<(String, Vec<DeveloperAggregate>)> = Vec::new();
    let mut month_index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let key = normalize_month(&record.month);
        let at = *month_index.entry(key.clone()).or_insert_with(|| {
            order.push((key, Vec::new()));
            order.len() - 1
        });
        let developers = &mut order[at].1;
        match developers.iter_mut().find(|d| d.email == record.email) {
            Some(entry) => entry.add(record),
            None => {
                let mut entry = DeveloperAggregate::new(&record.email);
                entry.add(record);
                developers.push(entry);
            }
        }
    }

    order.sort_by(|a, b| b.0.cmp(&a.0));
    for (_, developers) in &mut order {
        developers.sort_by(|a, b| b.planned_story_points.total_cmp(&a.planned_story_points));
    }
    order
}

/// One chart row: a month and one value per developer column. Developers
/// absent in the month are omitted; readers treat missing keys as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    pub month: String,
    pub values: HashMap<String, f64>,
}

fn build_series<F>(
    months: &[String],
    grouped: &[(String, Vec<DeveloperAggregate>)],
    metric: F,
) -> Vec<SeriesRow>
where
    F: Fn(&DeveloperAggregate) -> f64,
{
    months
        .iter()
        .map(|month| {
            let values = grouped
                .iter()
                .find(|(key, _)| key == month)
                .map(|(_, developers)| {
                    developers
                        .iter()
                        .map(|d| (d.email.clone(), metric(d)))
                        .collect()
                })
                .unwrap_or_default();
            SeriesRow {
                month: month.clone(),
                values,
            }
        })
        .collect()
}

/// Planned story points per developer per month, one row per entry of
/// `months` (the caller picks the display order).
pub fn build_stacked_series(
    months: &[String],
    grouped: &[(String, Vec<DeveloperAggregate>)],
) -> Vec<SeriesRow> {
    build_series(months, grouped, |d| d.planned_story_points)
}

/// Same shape as `build_stacked_series`, with bug counts as values.
pub fn build_stacked_bug_series(
    months: &[String],
    grouped: &[(String, Vec<DeveloperAggregate>)],
) -> Vec<SeriesRow> {
    build_series(months, grouped, |d| f64::from(d.bug_count))
}

/// Metric selector for the presence checks gating chart vs. placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeveloperMetric {
    PlannedStoryPoints,
    BugCount,
}

pub fn has_developer_metric(developers: &[DeveloperAggregate], metric: DeveloperMetric) -> bool {
    developers.iter().any(|d| match metric {
        DeveloperMetric::PlannedStoryPoints => d.planned_story_points > 0.0,
        DeveloperMetric::BugCount => d.bug_count > 0,
    })
}

pub fn has_series_values(series: &[SeriesRow], keys: &[String]) -> bool {
    series
        .iter()
        .any(|row| keys.iter().any(|key| row.values.get(key).copied().unwrap_or(0.0) > 0.0))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailSummary {
    pub total_story_points: f64,
    pub total_bugs: u32,
    pub total_commits: u32,
}

fn is_bug(issue_type: Option<&str>) -> bool {
    issue_type.is_some_and(|t| t.eq_ignore_ascii_case("bug"))
}

/// Computes the detail totals from the split jira/commit responses.
pub fn summarize_detail(
    jira: &[JiraContribution],
    commits: &[CommitContribution],
) -> DetailSummary {
    DetailSummary {
        total_story_points: jira.iter().map(|item| item.story_points.unwrap_or(0.0)).sum(),
        total_bugs: jira
            .iter()
            .filter(|item| is_bug(item.issue_type.as_deref()))
            .count() as u32,
        total_commits: commits.len() as u32,
    }
}
