use axum::{extract::Path, http::StatusCode, Json};
use contracts::usecases::u508_important_events::{
    BasicDataWire, CodeNumber, ImportantEventsData, InvitationLink, SaveImportantEventsResponse,
};

use crate::usecases::u508_important_events::service::{self, SaveOutcome, SaveRejection};

/// GET /important-events/basic-data
pub async fn get_basic_data() -> Result<Json<BasicDataWire>, StatusCode> {
    match service::load_catalog().await {
        Ok(catalog) => Ok(Json(catalog.to_wire())),
        Err(e) => {
            tracing::error!("Failed to load important events catalog: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /important-events/data/:code_number
pub async fn get_saved(
    Path(code_number): Path<String>,
) -> Result<Json<Option<ImportantEventsData>>, StatusCode> {
    let code_number = CodeNumber::new(code_number);
    if code_number.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    match service::get_saved(&code_number).await {
        Ok(data) => Ok(Json(data)),
        Err(e) => {
            tracing::error!("Failed to load saved answers for {}: {}", code_number, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /important-events/save
pub async fn save(
    Json(data): Json<ImportantEventsData>,
) -> Result<(StatusCode, Json<SaveImportantEventsResponse>), StatusCode> {
    let outcome = service::save(data).await.map_err(|e| {
        tracing::error!("Failed to save important events: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(save_response(outcome))
}

fn save_response(outcome: SaveOutcome) -> (StatusCode, Json<SaveImportantEventsResponse>) {
    match outcome {
        SaveOutcome::Saved { saved_at, .. } => (
            StatusCode::OK,
            Json(SaveImportantEventsResponse {
                success: true,
                message: "Saved successfully.".to_string(),
                unfilled_entity_names: Vec::new(),
                saved_at: Some(saved_at),
            }),
        ),
        SaveOutcome::Rejected(SaveRejection::Incomplete(unfilled)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(SaveImportantEventsResponse {
                success: false,
                message: "Please fill out all the forms.".to_string(),
                unfilled_entity_names: unfilled.0,
                saved_at: None,
            }),
        ),
        SaveOutcome::Rejected(SaveRejection::Invalid(e)) => (
            StatusCode::BAD_REQUEST,
            Json(SaveImportantEventsResponse {
                success: false,
                message: e.to_string(),
                unfilled_entity_names: Vec::new(),
                saved_at: None,
            }),
        ),
    }
}

/// GET /important-events/link/:code_number
pub async fn get_link(Path(code_number): Path<String>) -> Result<Json<InvitationLink>, StatusCode> {
    let code_number = CodeNumber::new(code_number);
    if code_number.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(service::invitation_link(&code_number)))
}
