use super::repository::{self, UnitRow};
use chrono::{DateTime, Utc};
use contracts::usecases::u508_important_events::{
    build_submission, check_integrity, encode_code_number, BasicDataUnit, BasicDataWire,
    CodeNumber, EntityNameMap, FormState, ImportantEventsBasicData, ImportantEventsData,
    IntegrityError, InvitationLink, UnfilledEntities,
};

use crate::shared::data::db::get_connection;

/// Why a submission was not stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRejection {
    Invalid(IntegrityError),
    Incomplete(UnfilledEntities),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved {
        data: ImportantEventsData,
        saved_at: DateTime<Utc>,
    },
    Rejected(SaveRejection),
}

/// Group stored rows by category and resolve them through the name map
pub fn catalog_from_rows(rows: Vec<UnitRow>) -> anyhow::Result<ImportantEventsBasicData> {
    let mut wire = BasicDataWire::new();
    for row in rows {
        wire.entry(row.plural_name).or_default().push(BasicDataUnit {
            id: row.id,
            description: row.description,
        });
    }
    let plural_names: Vec<String> = wire.keys().cloned().collect();
    let catalog = EntityNameMap::standard().resolve(wire)?;
    for plural_name in plural_names {
        if !catalog.categories.iter().any(|c| c.plural_name == plural_name) {
            tracing::warn!(
                "Category {} has no described units and is hidden from the form",
                plural_name
            );
        }
    }
    Ok(catalog)
}

/// Check a posted payload against the catalog and normalize it.
///
/// The payload goes through the same form binding and completeness rule the
/// page uses, so ids come back deduplicated and in catalog order.
pub fn prepare_submission(
    catalog: &ImportantEventsBasicData,
    data: &ImportantEventsData,
) -> Result<ImportantEventsData, SaveRejection> {
    check_integrity(catalog, data).map_err(SaveRejection::Invalid)?;
    let form = FormState::build(catalog, Some(data));
    build_submission(&data.code_number, catalog, &form).map_err(SaveRejection::Incomplete)
}

pub fn invitation_link(code_number: &CodeNumber) -> InvitationLink {
    InvitationLink {
        path: format!("/{}", encode_code_number(code_number)),
    }
}

pub async fn load_catalog() -> anyhow::Result<ImportantEventsBasicData> {
    let rows = repository::list_units(get_connection()?).await?;
    catalog_from_rows(rows)
}

pub async fn get_saved(code_number: &CodeNumber) -> anyhow::Result<Option<ImportantEventsData>> {
    repository::load_answers(get_connection()?, code_number).await
}

pub async fn save(data: ImportantEventsData) -> anyhow::Result<SaveOutcome> {
    let catalog = load_catalog().await?;

    let normalized = match prepare_submission(&catalog, &data) {
        Ok(normalized) => normalized,
        Err(rejection) => {
            tracing::warn!(
                "Rejected important events submission for {}: {:?}",
                data.code_number,
                rejection
            );
            return Ok(SaveOutcome::Rejected(rejection));
        }
    };

    let saved_at = Utc::now();
    repository::replace_answers(get_connection()?, &normalized, saved_at).await?;
    tracing::info!("Saved important events for {}", normalized.code_number);

    Ok(SaveOutcome::Saved {
        data: normalized,
        saved_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::usecases::u508_important_events::decode_code_number;

    fn row(plural_name: &str, id: i64) -> UnitRow {
        UnitRow {
            plural_name: plural_name.into(),
            id,
            description: format!("unit {}", id),
        }
    }

    fn catalog() -> ImportantEventsBasicData {
        catalog_from_rows(vec![
            row("impactEntities", 1),
            row("eventEntities", 1),
            row("eventEntities", 2),
        ])
        .unwrap()
    }

    fn payload(pairs: &[(&str, Vec<i64>)]) -> ImportantEventsData {
        let mut data = ImportantEventsData::new(CodeNumber::new("ABC123"));
        for (entity, ids) in pairs {
            data.form_data_by_entity_name
                .insert(entity.to_string(), ids.clone());
        }
        data
    }

    #[test]
    fn test_catalog_from_rows_uses_map_order() {
        let names: Vec<_> = catalog()
            .categories
            .into_iter()
            .map(|c| c.entity_name)
            .collect();
        assert_eq!(names, vec!["event", "impact"]);
    }

    #[test]
    fn test_catalog_from_rows_rejects_unknown_category() {
        assert!(catalog_from_rows(vec![row("petEntities", 1)]).is_err());
    }

    #[test]
    fn test_blank_category_does_not_block_save() {
        let mut blank = row("areaEntities", 5);
        blank.description = "  ".into();
        let catalog = catalog_from_rows(vec![row("eventEntities", 1), blank]).unwrap();
        assert!(catalog.category("area").is_none());

        let data = payload(&[("event", vec![1])]);
        assert!(prepare_submission(&catalog, &data).is_ok());
    }

    #[test]
    fn test_prepare_normalizes_order_and_duplicates() {
        let data = payload(&[("event", vec![2, 1, 2]), ("impact", vec![1])]);
        let normalized = prepare_submission(&catalog(), &data).unwrap();
        assert_eq!(normalized.form_data_by_entity_name["event"], vec![1, 2]);
        assert_eq!(normalized.form_data_by_entity_name["impact"], vec![1]);
    }

    #[test]
    fn test_prepare_reports_missing_categories() {
        let data = payload(&[("event", vec![1])]);
        assert_eq!(
            prepare_submission(&catalog(), &data),
            Err(SaveRejection::Incomplete(UnfilledEntities(vec![
                "impact".into()
            ])))
        );
    }

    #[test]
    fn test_prepare_rejects_foreign_ids() {
        let data = payload(&[("event", vec![1]), ("impact", vec![9])]);
        assert!(matches!(
            prepare_submission(&catalog(), &data),
            Err(SaveRejection::Invalid(IntegrityError::UnknownUnit { id: 9, .. }))
        ));
    }

    #[test]
    fn test_invitation_link_decodes_back() {
        let link = invitation_link(&CodeNumber::new("ABC123"));
        assert!(link.path.starts_with('/'));
        assert_eq!(decode_code_number(&link.path).unwrap().as_str(), "ABC123");
    }
}
