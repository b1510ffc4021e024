//! Metal spot-price route handler.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::error::{ApiError, Result};
use crate::services::metals::{MetalSymbol, SpotPrice};
use crate::state::AppState;

/// Quote a metal by symbol (`XAU`, `XAG`, `XPT`, `XPD`) or name.
///
/// Upstream failures are absorbed by the client's fallback table, so this
/// endpoint only errors on an unknown symbol.
pub async fn spot_price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<SpotPrice>> {
    let symbol: MetalSymbol = symbol
        .parse()
        .map_err(|e: crate::services::metals::UnknownSymbol| ApiError::BadRequest(e.to_string()))?;
    Ok(Json(state.metals().spot_price(symbol).await))
}
