mod api_contracts_support;

use std::io;
use std::sync::{Arc, Mutex};

use api_contracts_support::{send_raw, spawn_server};
use bijux_labeler_server::ServerConfig;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter(Arc::clone(&self.0))
    }
}

impl io::Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "lock poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn json_lines(sink: &SharedBuffer) -> Vec<serde_json::Value> {
    let bytes = sink.0.lock().expect("lock output").clone();
    let text = String::from_utf8(bytes).expect("utf8 log output");
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("json log line"))
        .collect()
}

#[tokio::test]
async fn completed_requests_log_status_and_latency_inside_the_request_span() {
    let sink = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .json()
        .with_max_level(Level::INFO)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let server = spawn_server(ServerConfig::default()).await;
    let (status, _, _) = send_raw(
        "GET",
        server.addr,
        "/healthz",
        &[("x-request-id", "trace-me")],
        &[],
    )
    .await;
    assert_eq!(status, 200);

    let lines = json_lines(&sink);
    let completed = lines
        .iter()
        .find(|l| l["fields"]["message"] == "request completed")
        .expect("completion event");
    assert_eq!(completed["fields"]["status"], 200);
    assert!(completed["fields"]["latency_ms"].is_u64());
    assert_eq!(completed["span"]["name"], "http.request");
    assert_eq!(completed["span"]["request_id"], "trace-me");
    assert_eq!(completed["span"]["route"], "/healthz");
}
