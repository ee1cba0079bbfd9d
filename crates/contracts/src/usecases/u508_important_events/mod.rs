pub mod catalog;
pub mod code_number;
pub mod form_state;
pub mod submission;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{
    BasicDataUnit, BasicDataWire, CatalogError, EntityCategory, EntityNameMap, EntityNameMapping,
    FormSection, ImportantEventsBasicData,
};
pub use code_number::{decode_code_number, encode_code_number, CodeNumber, CodeParamError};
pub use form_state::FormState;
pub use submission::{
    build_submission, check_integrity, ImportantEventsData, IntegrityError, InvitationLink,
    SaveImportantEventsResponse, UnfilledEntities,
};

use crate::usecases::common::UseCaseMetadata;

pub struct ImportantEvents;

impl UseCaseMetadata for ImportantEvents {
    fn usecase_index() -> &'static str {
        "u508"
    }

    fn usecase_name() -> &'static str {
        "important_events"
    }

    fn display_name() -> &'static str {
        "Important events"
    }

    fn description() -> &'static str {
        "Questionnaire about important life events, one submission per code number"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        assert_eq!(ImportantEvents::full_name(), "u508_important_events");
    }
}
