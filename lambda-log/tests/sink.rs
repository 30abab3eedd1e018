//! The process-wide sink is shared by every thread, so it gets a test binary of its own.

use std::{sync::Arc, thread};

use lambda_log::{
    Logger, LoggerOptions,
    sink::{self, MemorySink},
};
use serde_json::json;

#[test]
fn installed_sink_receives_records_from_every_thread() {
    let memory = Arc::new(MemorySink::new());
    sink::set_sink(memory.clone());
    let logger = Logger::new(LoggerOptions::new("svc")).unwrap();

    logger.info("from main");
    let worker = logger.clone();
    thread::spawn(move || worker.info("from worker thread"))
        .join()
        .unwrap();

    let overridden = Arc::new(MemorySink::new());
    {
        let _sink = sink::override_thread(overridden.clone());
        logger.info("from override");
    }
    logger.info("after override");

    let msgs: Vec<_> = memory.records().into_iter().map(|r| r["msg"].clone()).collect();
    assert_eq!(
        msgs,
        vec![json!("from main"), json!("from worker thread"), json!("after override")]
    );
    assert_eq!(overridden.lines().len(), 1);
}
