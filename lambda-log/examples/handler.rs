//! A handler-shaped walk through the API. Run with `cargo run --example handler`.

use lambda_log::{LogResult, LoggerOptions, context, get_child_logger, registry};
use serde_json::json;

fn handle(request_id: &str, correlation_id: Option<&str>) -> LogResult<()> {
    context::clear_all();
    context::set("awsRequestId", request_id);
    context::set("x-correlation-id", correlation_id.unwrap_or(request_id));

    let log = get_child_logger("handler")?;
    log.info_with("handling request", json!({ "path": "/orders" }));
    log.debug("only shown at debug");
    log.warn("inventory low");
    Ok(())
}

fn main() -> LogResult<()> {
    registry::create_logger(LoggerOptions::new("orders").with_field("stage", "dev"))?;

    handle("req-1", None)?;
    handle("req-2", Some("upstream-7"))?;
    Ok(())
}
