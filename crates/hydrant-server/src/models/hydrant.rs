//! Current-state hydrant rows and their validated input

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::features::shared::validation::{
    optional_text, required_text, ValidationErrors, MAX_DEFECTS_LEN, MAX_SHORT_TEXT_LEN,
};

/// A live hydrant as stored in `hydrants`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct HydrantRecord {
    pub id: i64,
    /// Ledger entry that produced the current field values
    pub history_id: i64,
    #[serde(rename = "hydrant")]
    #[sqlx(rename = "hydrant")]
    pub name: String,
    pub location: String,
    pub inspection_date: Option<NaiveDate>,
    pub defects: Option<String>,
    pub checked_by: Option<String>,
}

/// A complete, validated set of hydrant fields.
///
/// Only obtainable through [`HydrantFields::new`], so a value of this type
/// always carries a non-blank name and location. Optional text is trimmed and
/// blank strings are folded into `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrantFields {
    name: String,
    location: String,
    inspection_date: Option<NaiveDate>,
    defects: Option<String>,
    checked_by: Option<String>,
}

impl HydrantFields {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "hydrant", Some(name.into()), MAX_SHORT_TEXT_LEN);
        let location =
            required_text(&mut errors, "location", Some(location.into()), MAX_SHORT_TEXT_LEN);

        match (name, location) {
            (Some(name), Some(location)) if errors.is_empty() => Ok(Self {
                name,
                location,
                inspection_date: None,
                defects: None,
                checked_by: None,
            }),
            _ => Err(errors),
        }
    }

    pub fn with_inspection_date(mut self, date: Option<NaiveDate>) -> Self {
        self.inspection_date = date;
        self
    }

    /// Sets the defects text. Over-long text is rejected.
    pub fn with_defects(mut self, defects: Option<String>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.defects = optional_text(&mut errors, "defects", defects, MAX_DEFECTS_LEN);
        errors.into_result().map(|()| self)
    }

    /// Sets the inspector. Over-long text is rejected.
    pub fn with_checked_by(mut self, checked_by: Option<String>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.checked_by = optional_text(&mut errors, "checked_by", checked_by, MAX_SHORT_TEXT_LEN);
        errors.into_result().map(|()| self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn inspection_date(&self) -> Option<NaiveDate> {
        self.inspection_date
    }

    pub fn defects(&self) -> Option<&str> {
        self.defects.as_deref()
    }

    pub fn checked_by(&self) -> Option<&str> {
        self.checked_by.as_deref()
    }
}

#[cfg(test)]
impl HydrantRecord {
    /// True when this row holds exactly the given field values.
    pub(crate) fn matches(&self, fields: &HydrantFields) -> bool {
        self.name == fields.name()
            && self.location == fields.location()
            && self.inspection_date == fields.inspection_date()
            && self.defects.as_deref() == fields.defects()
            && self.checked_by.as_deref() == fields.checked_by()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_trims_required_fields() {
        let fields = HydrantFields::new(" H-7 ", "Main St ").unwrap();
        assert_eq!(fields.name(), "H-7");
        assert_eq!(fields.location(), "Main St");
        assert_eq!(fields.defects(), None);
    }

    #[test]
    fn test_new_reports_every_blank_field() {
        let errors = HydrantFields::new("", "  ").unwrap_err();
        assert!(errors.contains("hydrant"));
        assert!(errors.contains("location"));
    }

    #[test]
    fn test_blank_optional_text_becomes_none() {
        let fields = HydrantFields::new("H-7", "Main St")
            .unwrap()
            .with_defects(Some("   ".to_string()))
            .unwrap()
            .with_checked_by(Some(" Dana ".to_string()))
            .unwrap();
        assert_eq!(fields.defects(), None);
        assert_eq!(fields.checked_by(), Some("Dana"));
    }

    #[test]
    fn test_record_serializes_with_column_names() {
        let record = HydrantRecord {
            id: 3,
            history_id: 9,
            name: "H1".to_string(),
            location: "Oak Ave".to_string(),
            inspection_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            defects: None,
            checked_by: Some("Sam".to_string()),
        };

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "id": 3,
                "history_id": 9,
                "hydrant": "H1",
                "location": "Oak Ave",
                "inspection_date": "2024-05-01",
                "defects": null,
                "checked_by": "Sam"
            })
        );
    }

    #[test]
    fn test_matches() {
        let fields = HydrantFields::new("H1", "Oak Ave").unwrap();
        let record = HydrantRecord {
            id: 1,
            history_id: 1,
            name: "H1".to_string(),
            location: "Oak Ave".to_string(),
            inspection_date: None,
            defects: None,
            checked_by: None,
        };
        assert!(record.matches(&fields));
        assert!(!record.matches(&fields.with_inspection_date(NaiveDate::from_ymd_opt(2024, 1, 1))));
    }
}
