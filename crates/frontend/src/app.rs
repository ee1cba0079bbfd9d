use crate::usecases::u508_important_events::ui::ImportantEventsPage;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <ConfigProvider>
            <ToasterProvider>
                <ImportantEventsPage />
            </ToasterProvider>
        </ConfigProvider>
    }
}
