use super::catalog::ImportantEventsBasicData;
use super::code_number::CodeNumber;
use super::form_state::FormState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Selections of one respondent, body of `POST /important-events/save`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportantEventsData {
    pub code_number: CodeNumber,
    pub form_data_by_entity_name: BTreeMap<String, Vec<i64>>,
}

impl ImportantEventsData {
    pub fn new(code_number: CodeNumber) -> Self {
        Self {
            code_number,
            form_data_by_entity_name: BTreeMap::new(),
        }
    }
}

/// Categories that have no checked unit, in catalog order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unfilled categories: {}", .0.join(", "))]
pub struct UnfilledEntities(pub Vec<String>);

/// Collect the checked ids of every category into a payload.
///
/// Ids follow catalog order. Fails with every category that ended up empty.
pub fn build_submission(
    code_number: &CodeNumber,
    catalog: &ImportantEventsBasicData,
    form: &FormState,
) -> Result<ImportantEventsData, UnfilledEntities> {
    let mut data = ImportantEventsData::new(code_number.clone());
    let mut unfilled = Vec::new();

    for category in &catalog.categories {
        let ids: Vec<i64> = category
            .units
            .iter()
            .filter(|unit| form.is_checked(&category.entity_name, &unit.id.to_string()))
            .map(|unit| unit.id)
            .collect();

        if ids.is_empty() {
            unfilled.push(category.entity_name.clone());
        }
        data.form_data_by_entity_name
            .insert(category.entity_name.clone(), ids);
    }

    if unfilled.is_empty() {
        Ok(data)
    } else {
        Err(UnfilledEntities(unfilled))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    #[error("code number is empty")]
    EmptyCodeNumber,
    #[error("unknown category '{0}'")]
    UnknownEntity(String),
    #[error("unit {id} does not belong to category '{entity_name}'")]
    UnknownUnit { entity_name: String, id: i64 },
}

/// Reject payloads that reference anything outside the catalog
pub fn check_integrity(
    catalog: &ImportantEventsBasicData,
    data: &ImportantEventsData,
) -> Result<(), IntegrityError> {
    if data.code_number.is_empty() {
        return Err(IntegrityError::EmptyCodeNumber);
    }
    for (entity_name, ids) in &data.form_data_by_entity_name {
        let category = catalog
            .category(entity_name)
            .ok_or_else(|| IntegrityError::UnknownEntity(entity_name.clone()))?;
        if let Some(id) = ids.iter().find(|id| !category.contains(**id)) {
            return Err(IntegrityError::UnknownUnit {
                entity_name: entity_name.clone(),
                id: *id,
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveImportantEventsResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unfilled_entity_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Invitation path for a code number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationLink {
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u508_important_events::test_support::catalog_ab;

    fn code() -> CodeNumber {
        CodeNumber::new("ABC123")
    }

    #[test]
    fn test_unfilled_category_is_reported() {
        let catalog = catalog_ab();
        let form = FormState::build(&catalog, None).toggled("A", "2");

        let err = build_submission(&code(), &catalog, &form).unwrap_err();
        assert_eq!(err, UnfilledEntities(vec!["B".into()]));
    }

    #[test]
    fn test_all_unfilled_in_catalog_order() {
        let catalog = catalog_ab();
        let form = FormState::build(&catalog, None);
        let err = build_submission(&code(), &catalog, &form).unwrap_err();
        assert_eq!(err.0, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(err.to_string(), "unfilled categories: A, B");
    }

    #[test]
    fn test_complete_form_builds_payload() {
        let catalog = catalog_ab();
        let form = FormState::build(&catalog, None)
            .toggled("A", "2")
            .toggled("A", "1")
            .toggled("B", "3");

        let data = build_submission(&code(), &catalog, &form).unwrap();
        assert_eq!(data.code_number, code());
        assert_eq!(data.form_data_by_entity_name["A"], vec![1, 2]);
        assert_eq!(data.form_data_by_entity_name["B"], vec![3]);
    }

    #[test]
    fn test_missing_form_entry_counts_as_unfilled() {
        let catalog = catalog_ab();
        let form = FormState::default().toggled("A", "1");
        let err = build_submission(&code(), &catalog, &form).unwrap_err();
        assert_eq!(err.0, vec!["B".to_string()]);
    }

    #[test]
    fn test_payload_json_shape() {
        let mut data = ImportantEventsData::new(code());
        data.form_data_by_entity_name.insert("A".into(), vec![1]);
        assert_eq!(
            serde_json::to_string(&data).unwrap(),
            r#"{"codeNumber":"ABC123","formDataByEntityName":{"A":[1]}}"#
        );
    }

    #[test]
    fn test_integrity_rejects_unknown_ids() {
        let catalog = catalog_ab();
        let mut data = ImportantEventsData::new(code());
        data.form_data_by_entity_name.insert("A".into(), vec![1, 3]);
        assert_eq!(
            check_integrity(&catalog, &data),
            Err(IntegrityError::UnknownUnit {
                entity_name: "A".into(),
                id: 3
            })
        );

        let mut data = ImportantEventsData::new(code());
        data.form_data_by_entity_name.insert("Q".into(), vec![1]);
        assert_eq!(
            check_integrity(&catalog, &data),
            Err(IntegrityError::UnknownEntity("Q".into()))
        );
    }

    #[test]
    fn test_integrity_rejects_blank_code() {
        let data = ImportantEventsData::new(CodeNumber::new("  "));
        assert_eq!(
            check_integrity(&catalog_ab(), &data),
            Err(IntegrityError::EmptyCodeNumber)
        );
    }

    #[test]
    fn test_response_omits_empty_fields() {
        let response = SaveImportantEventsResponse {
            success: true,
            message: "Saved".into(),
            unfilled_entity_names: Vec::new(),
            saved_at: None,
        };
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"success":true,"message":"Saved"}"#
        );
    }
}
