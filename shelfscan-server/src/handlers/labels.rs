//! Printable label sheet

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{extract::State, response::Html, Json};
use serde::Deserialize;
use shelfscan_core::presentation::{
    generate_labels, render_label_sheet, LabelSelection, SheetConfig,
};
use shelfscan_core::BookId;

/// Label request; all books when `ids` is omitted
#[derive(Debug, Default, Deserialize)]
pub struct LabelsRequest {
    pub ids: Option<Vec<BookId>>,
}

/// Render labels for the selected books as an HTML page
pub async fn print_labels(
    State(state): State<AppState>,
    Json(request): Json<LabelsRequest>,
) -> ApiResult<Html<String>> {
    let selection = match request.ids {
        Some(ids) => LabelSelection::Only(ids),
        None => LabelSelection::All,
    };

    let catalog = state.catalog.read().await;
    let labels = generate_labels(catalog.books(), &selection);
    if labels.is_empty() {
        return Err(ApiError::BadRequest("No books selected for labels".to_string()));
    }

    tracing::debug!(count = labels.len(), "Rendering label sheet");
    Ok(Html(render_label_sheet(&labels, &SheetConfig::default())))
}
