use super::catalog::ImportantEventsBasicData;
use super::submission::ImportantEventsData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Checkbox grid state: entity name -> (unit id as text -> checked)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState(pub BTreeMap<String, BTreeMap<String, bool>>);

impl FormState {
    /// Bind the catalog to previously saved selections.
    ///
    /// Every catalog unit gets an entry; it is checked iff its id is listed
    /// under the same entity in `saved`. Saved entries the catalog does not
    /// know about are dropped.
    pub fn build(catalog: &ImportantEventsBasicData, saved: Option<&ImportantEventsData>) -> Self {
        let state = catalog
            .categories
            .iter()
            .map(|category| {
                let chosen = saved.and_then(|s| s.form_data_by_entity_name.get(&category.entity_name));
                let units = category
                    .units
                    .iter()
                    .map(|unit| {
                        let checked = chosen.map(|ids| ids.contains(&unit.id)).unwrap_or(false);
                        (unit.id.to_string(), checked)
                    })
                    .collect();
                (category.entity_name.clone(), units)
            })
            .collect();
        Self(state)
    }

    pub fn is_checked(&self, entity_name: &str, id: &str) -> bool {
        self.0
            .get(entity_name)
            .and_then(|units| units.get(id))
            .copied()
            .unwrap_or(false)
    }

    /// Copy of the state with one checkbox flipped
    pub fn toggled(&self, entity_name: &str, id: &str) -> Self {
        let mut next = self.clone();
        let units = next.0.entry(entity_name.to_string()).or_default();
        let value = units.entry(id.to_string()).or_insert(false);
        *value = !*value;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u508_important_events::test_support::catalog_ab;
    use crate::usecases::u508_important_events::CodeNumber;

    fn expected(json: &str) -> FormState {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_build_merges_saved_selection() {
        let mut saved = ImportantEventsData::new(CodeNumber::new("ABC123"));
        saved.form_data_by_entity_name.insert("A".into(), vec![2]);

        let state = FormState::build(&catalog_ab(), Some(&saved));
        assert_eq!(
            state,
            expected(r#"{"A":{"1":false,"2":true},"B":{"3":false}}"#)
        );
    }

    #[test]
    fn test_build_without_saved_data() {
        let state = FormState::build(&catalog_ab(), None);
        assert_eq!(
            state,
            expected(r#"{"A":{"1":false,"2":false},"B":{"3":false}}"#)
        );
    }

    #[test]
    fn test_build_ignores_unknown_saved_entries() {
        let mut saved = ImportantEventsData::new(CodeNumber::new("X"));
        saved.form_data_by_entity_name.insert("A".into(), vec![1, 99]);
        saved.form_data_by_entity_name.insert("Z".into(), vec![5]);

        let state = FormState::build(&catalog_ab(), Some(&saved));
        assert_eq!(
            state,
            expected(r#"{"A":{"1":true,"2":false},"B":{"3":false}}"#)
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let catalog = catalog_ab();
        assert_eq!(FormState::build(&catalog, None), FormState::build(&catalog, None));
    }

    #[test]
    fn test_double_toggle_restores_state() {
        let state = FormState::build(&catalog_ab(), None);
        let once = state.toggled("A", "1");
        assert!(once.is_checked("A", "1"));
        assert_ne!(once, state);
        assert_eq!(once.toggled("A", "1"), state);
    }

    #[test]
    fn test_toggle_leaves_original_untouched() {
        let state = FormState::build(&catalog_ab(), None);
        let _ = state.toggled("B", "3");
        assert!(!state.is_checked("B", "3"));
    }

    #[test]
    fn test_json_is_plain_map() {
        let state = FormState::build(&catalog_ab(), None).toggled("B", "3");
        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            r#"{"A":{"1":false,"2":false},"B":{"3":true}}"#
        );
    }
}
