//! Demonstrates the debug logging emitted while validating
//!
//! Run with: cargo run --example tracing_demo --features tracing

use rulebook::{Engine, EngineOptions};
use serde_json::json;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let input = json!({
        "email": { "value": "foo@gmail", "rules": { "isEmail": true, "notEmpty": true } },
        "age": { "value": "seventeen", "rules": { "isInt": true, "min": 18 } },
    });

    tracing::info!("Validating with all rules");
    match Engine::new().validate_all(&input) {
        Ok(result) => tracing::info!("Messages: {:?}", result.all_messages()),
        Err(e) => tracing::error!("Validation aborted: {}", e),
    }

    tracing::info!("Validating progressively");
    let progressive = Engine::with_options(EngineOptions::default().progressive(true));
    match progressive.validate_all(&input) {
        Ok(result) => tracing::info!("Messages: {:?}", result.all_messages()),
        Err(e) => tracing::error!("Validation aborted: {}", e),
    }
}
