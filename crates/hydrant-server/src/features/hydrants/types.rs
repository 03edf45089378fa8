//! Request body shared by create and update

use serde::Deserialize;

use crate::features::shared::validation::{
    optional_date, optional_text, required_text, ValidationErrors, MAX_DEFECTS_LEN,
    MAX_SHORT_TEXT_LEN,
};
use crate::models::HydrantFields;

/// Raw hydrant fields as sent by clients
///
/// Every field is optional at this layer so that missing and null values can
/// be reported as field errors rather than body parse failures. The dashboard
/// sends snake_case keys; `name`, `inspectionDate` and `checkedBy` are
/// accepted as well.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HydrantPayload {
    #[serde(default, alias = "name")]
    pub hydrant: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "inspectionDate")]
    pub inspection_date: Option<String>,
    #[serde(default)]
    pub defects: Option<String>,
    #[serde(default, alias = "checkedBy")]
    pub checked_by: Option<String>,
}

impl HydrantPayload {
    /// Checks every field and reports all failures at once.
    pub fn validate(self) -> Result<HydrantFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required_text(&mut errors, "hydrant", self.hydrant, MAX_SHORT_TEXT_LEN);
        let location = required_text(&mut errors, "location", self.location, MAX_SHORT_TEXT_LEN);
        let inspection_date = optional_date(&mut errors, "inspection_date", self.inspection_date);
        let defects = optional_text(&mut errors, "defects", self.defects, MAX_DEFECTS_LEN);
        let checked_by =
            optional_text(&mut errors, "checked_by", self.checked_by, MAX_SHORT_TEXT_LEN);

        // A missing required field has already been recorded in `errors`.
        let (Some(name), Some(location)) = (name, location) else {
            return Err(errors);
        };
        errors.into_result()?;

        HydrantFields::new(name, location)?
            .with_inspection_date(inspection_date)
            .with_defects(defects)?
            .with_checked_by(checked_by)
    }
}
