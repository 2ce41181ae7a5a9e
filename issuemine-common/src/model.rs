//! Issue record model and the closed label enumerations
//!
//! One entity: an issue ingested from the tracker. The fetcher creates rows,
//! the metrics pass fills `resolution_time_hours`, the classifier fills
//! `topic`. Neither derived field is ever overwritten once set.

use chrono::NaiveDateTime;

/// Priority derived from issue label text at ingestion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// Topic classification produced by the classifier.
///
/// The set is closed: a stored `topic` value is always one of these exact
/// strings, never a raw model response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    SoftwareArchitecture,
    ArchitecturalPatternsAndStyles,
    DesignPatterns,
}

impl Topic {
    /// All canonical labels, in prompt/marker order (i), (ii), (iii).
    pub const ALL: [Topic; 3] = [
        Topic::SoftwareArchitecture,
        Topic::ArchitecturalPatternsAndStyles,
        Topic::DesignPatterns,
    ];

    /// Canonical label text as stored in the database and expected from
    /// the classifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::SoftwareArchitecture => "Arquitetura de Software",
            Topic::ArchitecturalPatternsAndStyles => "Padrões e Estilos Arquiteturais",
            Topic::DesignPatterns => "Padrões de Projeto",
        }
    }

    /// Numbered marker the classifier may prefix its answer with.
    pub fn marker(&self) -> &'static str {
        match self {
            Topic::SoftwareArchitecture => "(i)",
            Topic::ArchitecturalPatternsAndStyles => "(ii)",
            Topic::DesignPatterns => "(iii)",
        }
    }

    /// Match an exact canonical label; anything else is rejected.
    pub fn from_canonical(label: &str) -> Option<Topic> {
        Topic::ALL.into_iter().find(|t| t.as_str() == label)
    }
}

/// One issue as stored in the `issues` table.
///
/// `issue_id` is the tracker's external id and the natural key for upsert.
/// `resolution_time_days` is computed at ingestion (integer day truncation);
/// `resolution_time_hours` is computed by the standalone metrics pass. The
/// two are deliberately kept as distinct columns.
#[derive(Debug, Clone)]
pub struct IssueRecord {
    pub issue_id: i64,
    pub title: String,
    pub body: String,
    pub state: String,
    pub created_at: Option<NaiveDateTime>,
    pub closed_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub resolution_time_days: Option<i64>,
    pub priority: Option<Priority>,
    pub milestone: Option<String>,
    pub author: Option<String>,
    pub assignee: Option<String>,
}
