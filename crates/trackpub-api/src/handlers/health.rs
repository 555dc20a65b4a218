use axum::Json;
use serde_json::{json, Value};

/// Liveness message, kept in the wire format the web client expects.
pub async fn home() -> Json<Value> {
    Json(json!({
        "mensaje": "Backend para subir CSV a Zenodo funcionando correctamente"
    }))
}
