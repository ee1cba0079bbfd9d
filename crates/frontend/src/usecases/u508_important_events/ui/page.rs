use super::view_model::ImportantEventsVm;
use crate::shared::components::ui::Checkbox;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u508_important_events::{FormSection, ImportantEvents};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// One fieldset: legend, required marker and a checkbox per unit
#[component]
fn SectionFieldset(vm: ImportantEventsVm, section: FormSection) -> impl IntoView {
    let entity_name = section.entity_name.clone();
    let unfilled = {
        let entity_name = entity_name.clone();
        move || vm.is_unfilled(&entity_name)
    };
    let fieldset_class = {
        let unfilled = unfilled.clone();
        move || {
            if unfilled() {
                "important-events__section important-events__section--invalid"
            } else {
                "important-events__section"
            }
        }
    };

    let checkboxes = section
        .entities_data
        .into_iter()
        .map(|unit| {
            let id_text = unit.id.to_string();
            let dom_id = format!("{}-{}", entity_name, id_text);
            let checked = {
                let (entity_name, id_text) = (entity_name.clone(), id_text.clone());
                Signal::derive(move || vm.is_checked(&entity_name, &id_text))
            };
            let on_change = {
                let entity_name = entity_name.clone();
                Callback::new(move |_: bool| vm.toggle(&entity_name, &id_text))
            };
            view! {
                <Checkbox id=dom_id label=unit.description checked=checked on_change=on_change />
            }
        })
        .collect_view();

    view! {
        <fieldset class=fieldset_class>
            <legend class="important-events__legend">{section.label}</legend>
            <Show when=unfilled>
                <div class="important-events__required">"* Required."</div>
            </Show>
            <div class="important-events__units">{checkboxes}</div>
        </fieldset>
    }
}

#[component]
pub fn ImportantEventsPage() -> impl IntoView {
    let vm = ImportantEventsVm::new();
    vm.init();

    // Checkbox state follows catalog, code number and saved answers
    Effect::new(move || vm.rebuild_form());

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let code_label = move || {
        vm.code_number
            .get()
            .map(|code| code.to_string())
            .unwrap_or_default()
    };

    let save_and_close = move |_| {
        spawn_local(async move {
            if vm.save().await {
                log::info!("Important events submitted");
            }
        });
    };

    view! {
        <div id="u508_important_events--usecase" class="important-events">
            <header class="important-events__header">
                <span class="important-events__brand">{ImportantEvents::display_name()}</span>
                <span>{today.clone()}</span>
            </header>

            <h1 class="important-events__title">"Important events in your life"</h1>
            <h2 class="important-events__subtitle">
                "Please mark at least one answer in every section."
            </h2>

            <div class="important-events__meta">
                <span>"Code Number: " {code_label}</span>
                <span>"Date: " {today}</span>
            </div>

            {move || {
                vm.error.get().map(|msg| {
                    view! { <MessageBar intent=MessageBarIntent::Error>{msg}</MessageBar> }
                })
            }}

            <Show when=move || vm.catalog_loading.get()>
                <div class="important-events__loading">
                    <Spinner />
                </div>
            </Show>

            <Show when=move || vm.form.with(|form| form.is_some())>
                <div class="important-events__sections">
                    <For
                        each=move || vm.sections()
                        key=|section| section.entity_name.clone()
                        children=move |section| view! { <SectionFieldset vm=vm section=section /> }
                    />
                </div>
            </Show>

            <div class="important-events__actions">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=save_and_close
                    disabled=vm.saving
                >
                    "Save and close"
                </Button>
            </div>
        </div>
    }
}
