use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use crate::{StockroomError, router::StockroomState};

#[derive(Debug, Serialize)]
pub struct ItemList {
    pub title: String,
    pub image_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub tag: String,
}

/// GET / -> every tagged image, each once.
pub async fn list_items(State(state): State<StockroomState>) -> Result<Json<ItemList>, StockroomError> {
    let image_ids = state.tags.list_all_image_ids().await?;
    Ok(Json(ItemList {
        title: "All Items".to_string(),
        image_ids,
    }))
}

/// GET /search?tag=.. -> images carrying exactly that tag.
/// An empty tag sends the customer back to the full listing.
pub async fn search_items(
    State(state): State<StockroomState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, StockroomError> {
    if query.tag.is_empty() {
        return Ok(Redirect::to("/").into_response());
    }

    let image_ids = state.tags.list_image_ids_by_tag(&query.tag).await?;
    Ok(Json(ItemList {
        title: capitalize(&query.tag),
        image_ids,
    })
    .into_response())
}

/// First character uppercased, the rest lowercased.
fn capitalize(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
