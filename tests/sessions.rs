use lager::{InMemorySink, Logger, SESSION_KEY, Value, data};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn logger_with_sink(component: &str) -> (Logger, Arc<InMemorySink>) {
    let sink = Arc::new(InMemorySink::new());
    let logger = Logger::new(component);
    logger.register_sink(sink.clone());
    (logger, sink)
}

#[test]
fn sibling_sessions_under_concurrency_are_unique() {
    let logger = Logger::new("api");
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let logger = logger.clone();
            thread::spawn(move || {
                (0..50)
                    .map(|_| logger.session("req", &[]).session_id().unwrap().to_string())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(!id.contains('.'), "root children have flat ids: {id}");
            assert!(ids.insert(id));
        }
    }
    assert_eq!(ids.len(), 800);
    let expected: HashSet<String> = (1..=800u32).map(|n| n.to_string()).collect();
    assert_eq!(ids, expected);
}

#[test]
fn nested_ids_compose_with_dots() {
    let logger = Logger::new("api");
    let _first = logger.session("a", &[]);
    let b = logger.session("b", &[]);
    assert_eq!(b.session_id(), Some("2"));
    let c = b.session("c", &[]);
    let d = c.session("d", &[]);
    assert_eq!(c.session_id(), Some("2.1"));
    assert_eq!(d.session_id(), Some("2.1.1"));
    assert_eq!(d.session_name(), "api.b.c.d");
}

#[test]
fn parent_and_child_log_independently_in_parallel() {
    let (parent, sink) = logger_with_sink("api");
    let parent = parent.with_data(data! { "role" => "parent" });
    let child = parent.session("child", &[data! { "role" => "child" }]);

    let p = {
        let parent = parent.clone();
        thread::spawn(move || {
            for _ in 0..100 {
                parent.info("tick", &[]);
            }
        })
    };
    let c = thread::spawn(move || {
        for _ in 0..100 {
            child.info("tick", &[]);
        }
    });
    p.join().unwrap();
    c.join().unwrap();

    let records = sink.records();
    assert_eq!(records.len(), 200);
    for record in &records {
        let data = record.data().unwrap();
        match record.message() {
            "api.tick" => {
                assert_eq!(data["role"], Value::from("parent"));
                assert!(!data.contains_key(SESSION_KEY));
            }
            "api.child.tick" => {
                assert_eq!(data["role"], Value::from("child"));
                assert_eq!(data[SESSION_KEY], Value::from("1"));
            }
            other => panic!("unexpected message {other}"),
        }
    }
    assert_eq!(parent.data(), &data! { "role" => "parent" });
    assert_eq!(parent.session_id(), None);
}

#[test]
fn session_data_reaches_every_record() {
    let (logger, sink) = logger_with_sink("worker");
    let job = logger.session("job", &[data! { "job_id" => 9u64 }]);
    job.debug("begin", &[]);
    job.session("step", &[]).info("done", &[data! { "ms" => 12 }]);

    let records = sink.drain_records();
    assert_eq!(records[0].data().unwrap()["job_id"], Value::U64(9));
    let step = records[1].data().unwrap();
    assert_eq!(step["job_id"], Value::U64(9));
    assert_eq!(step["ms"], Value::I64(12));
    assert_eq!(step[SESSION_KEY], Value::from("1.1"));
    assert_eq!(records[1].message(), "worker.job.step.done");
}
