use axum::response::Json;
use chrono::Utc;
use serde_json::{Value, json};

pub async fn time() -> Json<Value> {
    Json(json!({
        "time": Utc::now().timestamp_millis() as f64 / 1000.0
    }))
}
