use lager::{Fatal, InMemorySink, Level, Logger, TRACE_KEY, Value, data};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
#[error("config missing")]
struct ConfigMissing;

fn run_fatal(logger: &Logger, err: Option<lager::ErrorValue>) -> Fatal {
    let payload = catch_unwind(AssertUnwindSafe(|| {
        logger.fatal("crash", err, &[data! { "attempt" => 2 }]);
    }))
    .expect_err("fatal must not return");
    payload
        .downcast::<Fatal>()
        .map(|f| *f)
        .expect("payload is a Fatal")
}

#[test]
fn fatal_logs_then_terminates() {
    let sink = Arc::new(InMemorySink::new());
    let logger = Logger::new("api").session("boot", &[]);
    logger.register_sink(sink.clone());

    let fatal = run_fatal(&logger, Some(ConfigMissing.into()));
    assert_eq!(fatal.message, "api.boot.crash");
    assert!(fatal.error.unwrap().downcast_ref::<ConfigMissing>().is_some());

    let records = sink.logs_at(Level::Fatal);
    assert_eq!(records.len(), 1);
    let data = records[0].data().unwrap();
    assert_eq!(data["error"], Value::from("config missing"));
    assert_eq!(data["attempt"], Value::from(2));
    assert_eq!(data["session"], Value::from("1"));
    match &data[TRACE_KEY] {
        Value::String(trace) => {
            assert!(!trace.is_empty());
            assert!(trace.len() <= lager::STACK_TRACE_BUFFER_SIZE);
        }
        other => panic!("trace should be a string, got {other:?}"),
    }
    assert!(records[0].error().is_some());
}

#[test]
fn fatal_without_error_still_traces_and_terminates() {
    let sink = Arc::new(InMemorySink::new());
    let logger = Logger::new("api");
    logger.register_sink(sink.clone());

    let fatal = run_fatal(&logger, None);
    assert!(fatal.error.is_none());
    assert_eq!(fatal.to_string(), "fatal: api.crash");

    let record = &sink.records()[0];
    let data = record.data().unwrap();
    assert!(data.contains_key(TRACE_KEY));
    assert!(!data.contains_key("error"));
    assert!(record.error().is_none());
}

#[test]
fn fatal_without_sinks_terminates() {
    let logger = Logger::new("lonely");
    let fatal = run_fatal(&logger, None);
    assert_eq!(fatal.message, "lonely.crash");
}

#[test]
fn fatal_on_a_thread_surfaces_through_join() {
    let logger = Logger::new("worker");
    let joined = std::thread::spawn(move || {
        logger.fatal("die", None, &[]);
    })
    .join();
    let payload = joined.unwrap_err();
    assert_eq!(payload.downcast_ref::<Fatal>().unwrap().message, "worker.die");
}
