//! Ledger entries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// What a ledger entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Create,
    Update,
    Delete,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown history action '{0}'")]
pub struct UnknownHistoryAction(pub String);

impl TryFrom<String> for HistoryAction {
    type Error = UnknownHistoryAction;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(UnknownHistoryAction(value)),
        }
    }
}

/// One immutable row of the `history` ledger
///
/// Snapshot columns are null on `delete` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct HistoryEntry {
    pub id: i64,
    #[sqlx(try_from = "String")]
    pub action: HistoryAction,
    /// Entry this one supersedes; null only for `create`
    pub previous_event_id: Option<i64>,
    #[serde(rename = "hydrant")]
    #[sqlx(rename = "hydrant")]
    pub name: Option<String>,
    pub location: Option<String>,
    pub inspection_date: Option<NaiveDate>,
    pub defects: Option<String>,
    pub checked_by: Option<String>,
}
