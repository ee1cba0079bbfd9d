//! ViewModel for the important events questionnaire
//!
//! Holds the decoded code number, the catalog, saved answers, the checkbox
//! state and UI flags as RwSignals. All checkbox changes go through
//! `toggle`, which replaces the whole `FormState`.

use super::model;
use crate::shared::api_utils::location_pathname;
use contracts::usecases::u508_important_events::{
    build_submission, decode_code_number, CodeNumber, EntityNameMap, FormSection, FormState,
    ImportantEventsBasicData, ImportantEventsData, SaveImportantEventsResponse,
};
use leptos::prelude::*;
use std::time::Duration;
use thaw::{Toast, ToastIntent, ToastOptions, ToastTitle, ToasterInjection};

pub const UNFILLED_MESSAGE: &str = "Please fill out all the forms.";
pub const SAVED_MESSAGE: &str = "Saved successfully.";
pub const SAVE_FAILED_MESSAGE: &str = "Saving failed. Please try again.";

const TOAST_TIMEOUT: Duration = Duration::from_secs(4);

/// Code number from a location path, `None` (and a log line) if it does not decode
pub fn code_from_pathname(pathname: &str) -> Option<CodeNumber> {
    match decode_code_number(pathname) {
        Ok(code) => Some(code),
        Err(e) => {
            log::warn!("Cannot read code number from path: {}", e);
            None
        }
    }
}

/// What pressing "Save" should do with the current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavePlan {
    /// Code number, catalog or form state is missing
    NotReady,
    /// These categories have nothing checked
    Incomplete(Vec<String>),
    Submit(ImportantEventsData),
}

pub fn plan_save(
    code_number: Option<&CodeNumber>,
    catalog: Option<&ImportantEventsBasicData>,
    form: Option<&FormState>,
) -> SavePlan {
    let (Some(code_number), Some(catalog), Some(form)) = (code_number, catalog, form) else {
        return SavePlan::NotReady;
    };
    match build_submission(code_number, catalog, form) {
        Ok(data) => SavePlan::Submit(data),
        Err(unfilled) => SavePlan::Incomplete(unfilled.0),
    }
}

/// Message to show once a save step is over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// What `SaveStatus::start` decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStart {
    /// Save already running or form not ready; nothing changes
    Skip,
    /// No request; show the notice
    Reject(Notice),
    Send(ImportantEventsData),
}

/// Save-related state of the page, without signals
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaveStatus {
    pub saving: bool,
    pub unfilled_entity_names: Vec<String>,
}

impl SaveStatus {
    /// Apply a plan. Only `Send` puts the status into `saving`.
    pub fn start(&mut self, plan: SavePlan) -> SaveStart {
        if self.saving {
            return SaveStart::Skip;
        }
        match plan {
            SavePlan::NotReady => {
                log::warn!("Save requested before code number and catalog were available");
                SaveStart::Skip
            }
            SavePlan::Incomplete(names) => {
                self.unfilled_entity_names = names;
                SaveStart::Reject(Notice::Error(UNFILLED_MESSAGE.to_string()))
            }
            SavePlan::Submit(data) => {
                self.saving = true;
                SaveStart::Send(data)
            }
        }
    }

    /// Apply the backend answer to a request sent by `start`
    pub fn finish(&mut self, result: Result<SaveImportantEventsResponse, String>) -> Notice {
        self.saving = false;
        match result {
            Ok(response) if response.success => {
                self.unfilled_entity_names.clear();
                Notice::Success(SAVED_MESSAGE.to_string())
            }
            Ok(response) => {
                log::warn!("Backend rejected submission: {}", response.message);
                if !response.unfilled_entity_names.is_empty() {
                    self.unfilled_entity_names = response.unfilled_entity_names;
                }
                Notice::Error(response.message)
            }
            Err(e) => {
                log::error!("saving error: {}", e);
                Notice::Error(SAVE_FAILED_MESSAGE.to_string())
            }
        }
    }
}

#[derive(Clone, Copy)]
pub struct ImportantEventsVm {
    pub code_number: RwSignal<Option<CodeNumber>>,

    // === Reference data ===
    pub catalog: RwSignal<Option<ImportantEventsBasicData>>,
    pub catalog_loading: RwSignal<bool>,
    pub saved: RwSignal<Option<ImportantEventsData>>,

    // === Form ===
    pub form: RwSignal<Option<FormState>>,
    pub unfilled_entity_names: RwSignal<Vec<String>>,

    // === UI State ===
    pub saving: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,

    toaster: StoredValue<Option<ToasterInjection>>,
}

impl ImportantEventsVm {
    pub fn new() -> Self {
        Self {
            code_number: RwSignal::new(None),
            catalog: RwSignal::new(None),
            catalog_loading: RwSignal::new(false),
            saved: RwSignal::new(None),
            form: RwSignal::new(None),
            unfilled_entity_names: RwSignal::new(Vec::new()),
            saving: RwSignal::new(false),
            error: RwSignal::new(None),
            toaster: StoredValue::new(use_context::<ToasterInjection>()),
        }
    }

    // === Data loading ===

    /// Decode the code number from the page path, then load everything
    pub fn init(&self) {
        let code = location_pathname().and_then(|path| code_from_pathname(&path));
        self.code_number.set(code.clone());

        self.load_catalog();
        if let Some(code) = code {
            self.load_saved(code);
        }
    }

    pub fn load_catalog(&self) {
        let this = *self;
        this.catalog_loading.set(true);
        this.error.set(None);

        leptos::task::spawn_local(async move {
            let result = model::fetch_basic_data().await.and_then(|wire| {
                EntityNameMap::standard()
                    .resolve(wire)
                    .map_err(|e| e.to_string())
            });
            match result {
                Ok(catalog) => this.catalog.set(Some(catalog)),
                Err(e) => {
                    log::error!("Loading important events catalog failed: {}", e);
                    this.error.set(Some(e));
                }
            }
            this.catalog_loading.set(false);
        });
    }

    pub fn load_saved(&self, code: CodeNumber) {
        let saved = self.saved;
        leptos::task::spawn_local(async move {
            match model::fetch_saved(&code).await {
                Ok(data) => saved.set(data),
                Err(e) => log::error!("Loading saved answers for {} failed: {}", code, e),
            }
        });
    }

    /// Rebuild the checkbox state from catalog and saved answers.
    ///
    /// Tracks catalog, loading flag, code number and saved answers, so it
    /// is meant to run inside an `Effect`.
    pub fn rebuild_form(&self) {
        let loading = self.catalog_loading.get();
        let _code = self.code_number.get();
        let saved = self.saved.get();
        let form = self.catalog.with(|catalog| match catalog {
            Some(catalog) if !loading => Some(FormState::build(catalog, saved.as_ref())),
            _ => None,
        });
        if form.is_some() {
            self.form.set(form);
        }
    }

    // === Derived state ===

    pub fn sections(&self) -> Vec<FormSection> {
        self.catalog
            .with(|c| c.as_ref().map(|c| c.sections()).unwrap_or_default())
    }

    pub fn is_checked(&self, entity_name: &str, id: &str) -> bool {
        self.form
            .with(|f| f.as_ref().map(|f| f.is_checked(entity_name, id)).unwrap_or(false))
    }

    pub fn is_unfilled(&self, entity_name: &str) -> bool {
        self.unfilled_entity_names
            .with(|names| names.iter().any(|n| n == entity_name))
    }

    // === Commands ===

    pub fn toggle(&self, entity_name: &str, id: &str) {
        let Some(current) = self.form.get_untracked() else {
            return;
        };
        self.form.set(Some(current.toggled(entity_name, id)));
    }

    fn status(&self) -> SaveStatus {
        SaveStatus {
            saving: self.saving.get_untracked(),
            unfilled_entity_names: self.unfilled_entity_names.get_untracked(),
        }
    }

    fn apply(&self, status: SaveStatus) {
        self.saving.set(status.saving);
        self.unfilled_entity_names.set(status.unfilled_entity_names);
    }

    fn notify(&self, notice: Notice) {
        let (intent, message) = match notice {
            Notice::Success(message) => (ToastIntent::Success, message),
            Notice::Error(message) => (ToastIntent::Error, message),
        };
        self.toaster.with_value(|toaster| match toaster {
            Some(toaster) => toaster.dispatch_toast(
                move || {
                    view! {
                        <Toast>
                            <ToastTitle>{message}</ToastTitle>
                        </Toast>
                    }
                },
                ToastOptions::default()
                    .with_intent(intent)
                    .with_timeout(TOAST_TIMEOUT),
            ),
            None => log::warn!("Toaster not provided, dropped notice: {}", message),
        });
    }

    /// Validate and submit; `true` only when the backend stored the answers
    pub async fn save(&self) -> bool {
        let plan = plan_save(
            self.code_number.get_untracked().as_ref(),
            self.catalog.get_untracked().as_ref(),
            self.form.get_untracked().as_ref(),
        );

        let mut status = self.status();
        let data = match status.start(plan) {
            SaveStart::Skip => return false,
            SaveStart::Reject(notice) => {
                self.apply(status);
                self.notify(notice);
                return false;
            }
            SaveStart::Send(data) => data,
        };
        self.apply(status);

        let result = model::save(&data).await;

        let mut status = self.status();
        let notice = status.finish(result);
        self.apply(status);

        let saved = matches!(notice, Notice::Success(_));
        self.notify(notice);
        saved
    }
}
