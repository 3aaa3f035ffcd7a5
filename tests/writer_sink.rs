use lager::{Level, Logger, Sink, SinkLevel, Value, WriterSink, data};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::thread;

/// A destination tests can read back while the sink still holds it.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn lines(&self) -> Vec<serde_json::Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).expect("each line is one JSON object"))
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn setup(level: Level) -> (Logger, SharedBuffer) {
    let out = SharedBuffer::default();
    let logger = Logger::new("api");
    logger.register_sink(Arc::new(WriterSink::new(out.clone(), level)));
    (logger, out)
}

#[test]
fn wire_format() {
    let (logger, out) = setup(Level::Debug);
    logger.info("plain", &[]);
    logger
        .session("request", &[data! { "method" => "GET" }])
        .error("save", Some(std::io::Error::other("disk full").into()), &[]);

    let lines = out.lines();
    assert_eq!(lines.len(), 2);

    let plain = lines[0].as_object().unwrap();
    let mut keys: Vec<_> = plain.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["log_level", "message", "source", "timestamp"]);
    assert_eq!(plain["source"], "api");
    assert_eq!(plain["message"], "api.plain");
    assert_eq!(plain["log_level"], 1);
    let (_, nanos) = plain["timestamp"].as_str().unwrap().split_once('.').unwrap();
    assert_eq!(nanos.len(), 9);

    let save = &lines[1];
    assert_eq!(save["message"], "api.request.save");
    assert_eq!(save["log_level"], 2);
    assert_eq!(save["error"], "disk full");
    assert_eq!(
        save["data"],
        serde_json::json!({ "method": "GET", "session": "1", "error": "disk full" })
    );
}

#[test]
fn threshold_filters_per_sink() {
    let quiet = SharedBuffer::default();
    let loud = SharedBuffer::default();
    let logger = Logger::new("api");
    let quiet_sink = Arc::new(WriterSink::new(quiet.clone(), Level::Error));
    assert_eq!(quiet_sink.level(), Level::Error);
    logger.register_sink(quiet_sink);
    logger.register_sink(Arc::new(WriterSink::new(loud.clone(), Level::Debug)));

    logger.debug("a", &[]);
    logger.info("b", &[]);
    logger.error("c", None, &[]);

    assert_eq!(quiet.lines().len(), 1);
    assert_eq!(loud.lines().len(), 3);
    assert_eq!(quiet.lines()[0]["message"], "api.c");
}

#[test]
fn concurrent_writers_produce_whole_lines() {
    const THREADS: usize = 16;
    const PER_THREAD: usize = 200;

    let out = SharedBuffer::default();
    let sink = Arc::new(WriterSink::new(out.clone(), Level::Debug));
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let sink = sink.clone();
            thread::spawn(move || {
                let logger = Logger::new(format!("thread{t}"));
                logger.register_sink(sink);
                for i in 0..PER_THREAD {
                    logger.info(
                        "write",
                        &[data! { "i" => i, "padding" => "x".repeat(256) }],
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = out.lines();
    assert_eq!(lines.len(), THREADS * PER_THREAD);
    for t in 0..THREADS {
        let source = format!("thread{t}");
        let mine: Vec<_> = lines.iter().filter(|l| l["source"] == source.as_str()).collect();
        assert_eq!(mine.len(), PER_THREAD);
        //one thread's writes are sequential, so they stay in order
        for (i, line) in mine.iter().enumerate() {
            assert_eq!(line["data"]["i"], i);
        }
    }
}

#[derive(Debug)]
#[allow(dead_code)]
struct Connection {
    fd: i32,
}

#[test]
fn unencodable_data_is_recovered_through_the_logger() {
    let (logger, out) = setup(Level::Debug);
    logger.info(
        "connect",
        &[data! { "conn" => Value::opaque(Connection { fd: 3 }) }],
    );
    logger.info("after", &[]);

    let lines = out.lines();
    assert_eq!(lines.len(), 2);
    let data = &lines[0]["data"];
    assert!(data["data_dump"].as_str().unwrap().contains("Connection { fd: 3 }"));
    assert!(data["lager serialisation error"].is_string());
    assert_eq!(lines[0]["message"], "api.connect");
    assert_eq!(lines[1]["message"], "api.after");
}

#[test]
fn sink_is_usable_directly() {
    let out = SharedBuffer::default();
    let sink = WriterSink::new(out.clone(), Level::Info);
    sink.log(&lager::LogRecord::new("direct", "direct.go", Level::Fatal, None, None));
    assert_eq!(out.lines()[0]["log_level"], 3);
}
