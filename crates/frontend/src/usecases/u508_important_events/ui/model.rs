use contracts::usecases::u508_important_events::{
    BasicDataWire, CodeNumber, ImportantEventsData, SaveImportantEventsResponse,
};
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;

/// Catalog keyed by plural category names
pub async fn fetch_basic_data() -> Result<BasicDataWire, String> {
    let response = Request::get(&api_url("/important-events/basic-data"))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Loading catalog failed: {}", response.status()));
    }

    response
        .json::<BasicDataWire>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Previously saved selections; `None` when the code never submitted
pub async fn fetch_saved(code_number: &CodeNumber) -> Result<Option<ImportantEventsData>, String> {
    let url = api_url(&format!(
        "/important-events/data/{}",
        urlencoding::encode(code_number.as_str())
    ));
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Loading saved answers failed: {}", response.status()));
    }

    response
        .json::<Option<ImportantEventsData>>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// POST /important-events/save
///
/// Ответы 422 и 400 тоже содержат `SaveImportantEventsResponse`
/// (со списком незаполненных категорий) и возвращаются как `Ok`.
pub async fn save(data: &ImportantEventsData) -> Result<SaveImportantEventsResponse, String> {
    let response = Request::post(&api_url("/important-events/save"))
        .json(data)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() && response.status() != 422 && response.status() != 400 {
        return Err(format!("Save failed: {}", response.status()));
    }

    response
        .json::<SaveImportantEventsResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
