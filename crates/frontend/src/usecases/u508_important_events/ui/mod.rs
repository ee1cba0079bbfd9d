//! Important events questionnaire UI
//!
//! MVVM split:
//! - model.rs: API functions (fetch catalog, fetch saved answers, save)
//! - view_model.rs: ViewModel with commands and state management
//! - page.rs: Leptos components (pure UI)

mod model;
mod page;
pub mod view_model;

pub use page::ImportantEventsPage;
pub use view_model::ImportantEventsVm;
