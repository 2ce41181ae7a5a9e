//! Raw issue normalization
//!
//! Pure per-record transformation from the API shape to the stored record.
//! Each item returns a `Result` so the ingest driver can skip and count a
//! malformed record without aborting the page.

use crate::github::{RawIssue, RawLabel};
use chrono::NaiveDateTime;
use issuemine_common::{Error, IssueRecord, Priority, Result};

/// Placeholder stored when the source record carries no title.
pub const MISSING_TITLE: &str = "(no title)";

/// Parse a source timestamp.
///
/// Source timestamps are UTC ISO-8601 with a trailing `Z`; the zone marker
/// is stripped before parsing the naive datetime.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let naive = raw.strip_suffix('Z').unwrap_or(raw);
    naive
        .parse::<NaiveDateTime>()
        .map_err(|e| Error::Parse(format!("invalid timestamp {raw:?}: {e}")))
}

/// Derive a priority from the issue's label list.
///
/// Label names are matched case-insensitively by substring, and the last
/// matching label in iteration order wins. A name containing `high` never
/// also counts as `medium` or `low` (the arms are exclusive per label).
pub fn priority_from_labels(labels: &[RawLabel]) -> Option<Priority> {
    let mut priority = None;
    for label in labels {
        let name = label.name.to_lowercase();
        if name.contains("high") {
            priority = Some(Priority::High);
        } else if name.contains("medium") {
            priority = Some(Priority::Medium);
        } else if name.contains("low") {
            priority = Some(Priority::Low);
        }
    }
    priority
}

/// Normalize one raw issue into a storable record.
pub fn to_record(raw: RawIssue) -> Result<IssueRecord> {
    let issue_id = raw
        .id
        .ok_or_else(|| Error::Parse("issue without an id".to_string()))?;

    let created_at = raw.created_at.as_deref().map(parse_timestamp).transpose()?;
    let closed_at = raw.closed_at.as_deref().map(parse_timestamp).transpose()?;
    let updated_at = raw.updated_at.as_deref().map(parse_timestamp).transpose()?;

    // Ingestion-time metric: whole days, truncated. The hour-granularity
    // metric is a separate column filled by the standalone metrics pass.
    let resolution_time_days = match (created_at, closed_at) {
        (Some(created), Some(closed)) => Some((closed - created).num_days()),
        _ => None,
    };

    Ok(IssueRecord {
        issue_id,
        title: raw.title.unwrap_or_else(|| MISSING_TITLE.to_string()),
        body: raw.body.unwrap_or_default(),
        state: raw.state.unwrap_or_else(|| "unknown".to_string()),
        created_at,
        closed_at,
        updated_at,
        resolution_time_days,
        priority: priority_from_labels(&raw.labels),
        milestone: raw.milestone.and_then(|m| m.title),
        author: raw.user.and_then(|u| u.login),
        assignee: raw.assignee.and_then(|a| a.login),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<RawLabel> {
        names
            .iter()
            .map(|n| RawLabel {
                name: n.to_string(),
            })
            .collect()
    }

    fn raw(id: i64) -> RawIssue {
        RawIssue {
            id: Some(id),
            title: Some("Text overflows in AppBar".to_string()),
            body: Some("Repro attached".to_string()),
            state: Some("closed".to_string()),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            closed_at: Some("2024-01-02T12:00:00Z".to_string()),
            updated_at: Some("2024-01-02T12:00:00Z".to_string()),
            labels: vec![],
            milestone: None,
            user: None,
            assignee: None,
        }
    }

    #[test]
    fn strips_zone_marker_before_parsing() {
        let ts = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(ts.to_string(), "2024-01-01 00:00:00");
        // Also accepts an already-naive timestamp.
        assert!(parse_timestamp("2024-01-01T00:00:00").is_ok());
    }

    #[test]
    fn bad_timestamp_is_a_parse_error() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn resolution_days_truncates_to_whole_days() {
        // 36 hours elapsed -> 1 day.
        let record = to_record(raw(1)).unwrap();
        assert_eq!(record.resolution_time_days, Some(1));
    }

    #[test]
    fn resolution_days_absent_without_both_timestamps() {
        let mut item = raw(2);
        item.closed_at = None;
        let record = to_record(item).unwrap();
        assert_eq!(record.resolution_time_days, None);
    }

    #[test]
    fn last_matching_label_wins() {
        assert_eq!(
            priority_from_labels(&labels(&["priority: low", "priority: high"])),
            Some(Priority::High)
        );
        assert_eq!(
            priority_from_labels(&labels(&["priority: high", "priority: low"])),
            Some(Priority::Low)
        );
    }

    #[test]
    fn priority_match_is_case_insensitive_substring() {
        assert_eq!(
            priority_from_labels(&labels(&["P1-HIGH-urgency"])),
            Some(Priority::High)
        );
        assert_eq!(priority_from_labels(&labels(&["bug", "triage"])), None);
        assert_eq!(priority_from_labels(&[]), None);
    }

    #[test]
    fn high_label_never_counts_as_medium_or_low() {
        // "highlow" hits the high arm and stops there.
        assert_eq!(
            priority_from_labels(&labels(&["highlow"])),
            Some(Priority::High)
        );
    }

    #[test]
    fn missing_fields_get_defaults() {
        let record = to_record(RawIssue {
            id: Some(3),
            title: None,
            body: None,
            state: None,
            created_at: None,
            closed_at: None,
            updated_at: None,
            labels: vec![],
            milestone: None,
            user: None,
            assignee: None,
        })
        .unwrap();

        assert_eq!(record.title, MISSING_TITLE);
        assert_eq!(record.body, "");
        assert_eq!(record.state, "unknown");
        assert_eq!(record.milestone, None);
        assert_eq!(record.author, None);
        assert_eq!(record.assignee, None);
    }

    #[test]
    fn nested_attribution_objects_resolve_to_strings() {
        let mut item = raw(4);
        item.milestone = Some(crate::github::RawMilestone {
            title: Some("v3.19".to_string()),
        });
        item.user = Some(crate::github::RawAccount {
            login: Some("octocat".to_string()),
        });
        item.assignee = Some(crate::github::RawAccount { login: None });

        let record = to_record(item).unwrap();
        assert_eq!(record.milestone.as_deref(), Some("v3.19"));
        assert_eq!(record.author.as_deref(), Some("octocat"));
        assert_eq!(record.assignee, None);
    }

    #[test]
    fn record_without_id_is_rejected() {
        let mut item = raw(5);
        item.id = None;
        assert!(to_record(item).is_err());
    }
}
