use std::sync::Arc;

use lambda_log::{
    Fields, Level, Logger, LoggerOptions, RequestContext, context,
    sink::{self, MemorySink},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn capture() -> (Arc<MemorySink>, sink::ThreadSinkGuard) {
    let memory = Arc::new(MemorySink::new());
    let guard = sink::override_thread(memory.clone());
    (memory, guard)
}

fn without_time(mut record: Value) -> Value {
    if let Some(fields) = record.as_object_mut() {
        fields.remove("time");
    }
    record
}

#[test]
fn context_changes_between_calls_are_visible() {
    let (memory, _sink) = capture();
    let logger = Logger::new(LoggerOptions::new("svc")).unwrap();

    context::clear_all();
    context::set("x-correlation-id", "first");
    logger.info("one");

    context::clear_all();
    context::set("x-correlation-id", "second");
    logger.info("two");

    context::clear_all();
    logger.info("three");

    let ids: Vec<Value> = memory
        .records()
        .into_iter()
        .map(|r| r.get("x-correlation-id").cloned().unwrap_or(Value::Null))
        .collect();
    assert_eq!(ids, vec![json!("first"), json!("second"), Value::Null]);
}

#[test]
fn scoped_invocations_do_not_leak() {
    let (memory, _sink) = capture();
    let logger = Logger::new(LoggerOptions::new("svc").with_level("trace")).unwrap();
    context::clear_all();

    let mut invocation = RequestContext::new();
    invocation.set("awsRequestId", "req-1");
    invocation.set("x-rrid", "req-1");
    context::scope(invocation, || logger.debug("inside"));
    logger.debug("outside");

    let records: Vec<Value> = memory.records().into_iter().map(without_time).collect();
    assert_eq!(
        records,
        vec![
            json!({
                "awsRequestId": "req-1",
                "rrid": "req-1",
                "name": "svc",
                "version": 1,
                "pid": 0,
                "hostname": "aws-lambda",
                "level": 20,
                "msg": "inside",
            }),
            json!({
                "name": "svc",
                "version": 1,
                "pid": 0,
                "hostname": "aws-lambda",
                "level": 20,
                "msg": "outside",
            }),
        ]
    );
}

#[test]
fn children_write_their_own_fields() {
    let (memory, _sink) = capture();
    context::clear_all();
    let parent = Logger::new(LoggerOptions::new("svc").with_field("region", "eu-west-1")).unwrap();
    let mut extra = Fields::new();
    extra.insert("component".to_string(), json!("db"));
    let child = parent.child(extra).unwrap();

    parent.info("from parent");
    child.info("from child");

    let records = memory.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("component"), None);
    assert_eq!(records[1]["component"], json!("db"));
    assert_eq!(records[1]["region"], json!("eu-west-1"));
    assert_eq!(records[1]["name"], json!("svc"));
}

#[test]
fn never_writes_both_rrid_keys() {
    let (memory, _sink) = capture();
    context::clear_all();
    context::set("x-rrid", "route-9");
    let logger = Logger::new(LoggerOptions::new("svc")).unwrap();

    for level in Level::ALL {
        logger.log_with(level, "m", json!({"x-rrid": "call-site"}));
    }

    let records = memory.records();
    assert_eq!(records.len(), 4);
    for record in records {
        assert_eq!(record.get("x-rrid"), None);
        assert_eq!(record["rrid"], json!("route-9"));
    }
}
