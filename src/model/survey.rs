use serde::{Deserialize, Serialize};

use crate::model::{generate_id, Id};

/// A persisted survey row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    #[sqlx(rename = "survey_ref")]
    pub reference: Id,
    pub short_name: String,
    pub long_name: String,
    pub legal_basis: String,
    pub survey_mode: String,
}

/// Body of `POST /survey`. The reference is optional and generated when missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSurvey {
    #[serde(default, alias = "surveyRef")]
    pub reference: Option<Id>,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub legal_basis: String,
    #[serde(default)]
    pub survey_mode: String,
}

impl NewSurvey {
    pub fn into_survey(self) -> Survey {
        let reference = match self.reference {
            Some(reference) if !reference.is_empty() => reference,
            _ => generate_id(),
        };

        Survey {
            reference,
            short_name: self.short_name,
            long_name: self.long_name,
            legal_basis: self.legal_basis,
            survey_mode: self.survey_mode,
        }
    }
}

/// Body of `PATCH /survey/{reference}`.
///
/// A field that is absent, `null` or empty leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPatch {
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub legal_basis: Option<String>,
    #[serde(default)]
    pub survey_mode: Option<String>,
}

impl SurveyPatch {
    pub fn is_empty(&self) -> bool {
        [
            &self.short_name,
            &self.long_name,
            &self.legal_basis,
            &self.survey_mode,
        ]
        .into_iter()
        .all(|field| provided(field).is_none())
    }

    /// Overlay the provided fields onto `existing`. The reference never changes.
    pub fn merge_into(&self, existing: Survey) -> Survey {
        Survey {
            reference: existing.reference,
            short_name: pick(&self.short_name, existing.short_name),
            long_name: pick(&self.long_name, existing.long_name),
            legal_basis: pick(&self.legal_basis, existing.legal_basis),
            survey_mode: pick(&self.survey_mode, existing.survey_mode),
        }
    }
}

fn provided(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

fn pick(incoming: &Option<String>, stored: String) -> String {
    provided(incoming).map(str::to_string).unwrap_or(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Survey {
        Survey {
            reference: "123".to_string(),
            short_name: "TS".to_string(),
            long_name: "Old".to_string(),
            legal_basis: "L".to_string(),
            survey_mode: "M".to_string(),
        }
    }

    #[test]
    fn test_merge_keeps_stored_values_for_missing_fields() {
        let patch = SurveyPatch {
            short_name: Some("NEW".to_string()),
            long_name: Some(String::new()),
            ..Default::default()
        };

        let merged = patch.merge_into(stored());
        assert_eq!(merged.reference, "123");
        assert_eq!(merged.short_name, "NEW");
        assert_eq!(merged.long_name, "Old");
        assert_eq!(merged.legal_basis, "L");
        assert_eq!(merged.survey_mode, "M");
    }

    #[test]
    fn test_patch_with_only_blank_fields_is_empty() {
        assert!(SurveyPatch::default().is_empty());

        let blank: SurveyPatch =
            serde_json::from_str(r#"{"shortName":"","longName":null}"#).unwrap();
        assert!(blank.is_empty());

        let partial: SurveyPatch = serde_json::from_str(r#"{"surveyMode":"Online"}"#).unwrap();
        assert!(!partial.is_empty());
    }

    #[test]
    fn test_new_survey_generates_reference_when_missing() {
        let survey: NewSurvey =
            serde_json::from_str(r#"{"shortName":"TS","longName":"Test"}"#).unwrap();
        let survey = survey.into_survey();

        assert!(uuid::Uuid::parse_str(&survey.reference).is_ok());
        assert_eq!(survey.short_name, "TS");
        assert_eq!(survey.legal_basis, "");
    }

    #[test]
    fn test_new_survey_keeps_supplied_reference() {
        let survey: NewSurvey = serde_json::from_str(r#"{"reference":"156"}"#).unwrap();
        assert_eq!(survey.into_survey().reference, "156");

        let legacy: NewSurvey = serde_json::from_str(r#"{"surveyRef":"157"}"#).unwrap();
        assert_eq!(legacy.into_survey().reference, "157");

        let blank: NewSurvey = serde_json::from_str(r#"{"reference":""}"#).unwrap();
        assert_ne!(blank.into_survey().reference, "");
    }

    #[test]
    fn test_survey_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(stored()).unwrap();
        assert_eq!(json["reference"], "123");
        assert_eq!(json["shortName"], "TS");
        assert_eq!(json["surveyMode"], "M");
    }
}
