/// UseCase identification shared by routes, logs and page titles
pub trait UseCaseMetadata {
    /// UseCase index (e.g. "u508")
    fn usecase_index() -> &'static str;

    /// Technical name (e.g. "important_events")
    fn usecase_name() -> &'static str;

    /// Display name for the UI
    fn display_name() -> &'static str;

    fn description() -> &'static str {
        ""
    }

    /// Full name like "u508_important_events"
    fn full_name() -> String {
        format!("{}_{}", Self::usecase_index(), Self::usecase_name())
    }
}
