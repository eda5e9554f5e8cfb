use crate::models::ContributionRecord;

/// Bucket for records whose team name is missing from the backend response.
pub const UNKNOWN_TEAM: &str = "Unknown";

/// Groups flat contribution records by team, preserving first-seen team
/// order and original record order within each team. This is the only view
/// the report page consumes directly.
pub fn contributions_by_team(
    records: &[ContributionRecord],
) -> Vec<(String, Vec<&ContributionRecord>)> {
    let mut grouped: Vec<(String, Vec<&ContributionRecord>)> = Vec::new();

    for record in records {
        let team = if record.team_name.is_empty() {
            UNKNOWN_TEAM
        } else {
            record.team_name.as_str()
        };
        match grouped.iter_mut().find(|(name, _)| name == team) {
            Some((_, items)) => items.push(record),
            None => grouped.push((team.to_string(), vec![record])),
        }
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(team: &str, email: &str) -> ContributionRecord {
        ContributionRecord {
            month: "2024-01".to_string(),
            team_name: team.to_string(),
            email: email.to_string(),
            planned_story_points: 0.0,
            story_count: 0,
            bug_count: 0,
            commits_count: 0,
            commits_with_jira_task: 0,
            src_changes: 0,
            src_changes_ratio: 0.0,
            test_changes: 0,
            test_changes_ratio: 0.0,
            other_changes: 0,
            other_changes_ratio: 0.0,
            git_contribution: 0.0,
        }
    }

    #[test]
    fn preserves_first_seen_team_order_and_record_order() {
        let records = vec![
            record("Beta", "a@y.com"),
            record("Alpha", "b@y.com"),
            record("Beta", "c@y.com"),
        ];
        let grouped = contributions_by_team(&records);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, "Beta");
        assert_eq!(grouped[1].0, "Alpha");
        let beta: Vec<&str> = grouped[0].1.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(beta, ["a@y.com", "c@y.com"]);
    }

    #[test]
    fn missing_team_falls_into_unknown_bucket() {
        let records = vec![record("", "a@y.com")];
        let grouped = contributions_by_team(&records);
        assert_eq!(grouped[0].0, UNKNOWN_TEAM);
    }

    #[test]
    fn empty_input_yields_no_teams() {
        assert!(contributions_by_team(&[]).is_empty());
    }
}
