//! Remote sync tests
//!
//! Exercise the sync stage against a minimal local HTTP listener standing in
//! for the SOFAtoolbox repository: a `/index` route serving the GitHub-style
//! contents listing and `/raw/<name>` routes serving the CSV bodies.

#![cfg(feature = "remote")]

use sofa_conventions::convert::{ConventionConverter, ConverterConfig, SyncStatus};
use sofa_conventions::source::remote::RemoteSource;
use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;

const HEADER: &str = "Name\tDefault\tFlags\tDimensions\tType\tComment";

/// Convention files served upstream. `None` simulates a broken download
/// (listed in the index but the raw file returns 404).
type Files = HashMap<String, Option<Vec<u8>>>;

struct StubUpstream {
    addr: SocketAddr,
    files: Arc<Mutex<Files>>,
}

impl StubUpstream {
    fn serve(files: Files) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let files = Arc::new(Mutex::new(files));

        let routes = Arc::clone(&files);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                handle_request(stream, &routes);
            }
        });

        Self { addr, files }
    }

    fn index_url(&self) -> String {
        format!("http://{}/index", self.addr)
    }

    fn raw_url(&self) -> String {
        format!("http://{}/raw", self.addr)
    }

    fn set(&self, name: &str, body: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), Some(body.to_vec()));
    }
}

fn handle_request(mut stream: TcpStream, routes: &Arc<Mutex<Files>>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let request = String::from_utf8_lossy(&request);
    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
    let files = routes.lock().unwrap();

    let body: Option<Vec<u8>> = if path == "/index" {
        let entries: Vec<serde_json::Value> = files
            .keys()
            .map(|name| serde_json::json!({"name": name}))
            .collect();
        Some(serde_json::to_vec(&entries).unwrap())
    } else {
        path.strip_prefix("/raw/")
            .and_then(|name| files.get(name).cloned())
            .flatten()
    };

    let response = match body {
        Some(body) => {
            let mut response = format!(
                "HTTP/1.1 200 OK\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                body.len()
            )
            .into_bytes();
            response.extend_from_slice(&body);
            response
        }
        None => b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
            .to_vec(),
    };
    let _ = stream.write_all(&response);
}

fn converter(server: &StubUpstream, source_dir: &Path, output_dir: &Path) -> ConventionConverter {
    let remote = RemoteSource::with_urls(&server.index_url(), &server.raw_url()).unwrap();
    ConventionConverter::new(ConverterConfig::new(source_dir, output_dir).with_remote(remote))
}

fn csv_body(rows: &str) -> Vec<u8> {
    format!("{HEADER}\r\n{rows}").into_bytes()
}

#[test]
fn test_first_sync_adds_and_compiles() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("source");
    let output = root.path().join("json");
    let server = StubUpstream::serve(HashMap::from([
        (
            "GeneralFIR.csv".to_string(),
            Some(csv_body("Data.IR\t[0 0]\tm\tmRn\tdouble\t\r\n")),
        ),
        // toolbox template, must be skipped entirely
        (
            "General_.csv".to_string(),
            Some(csv_body("GLOBAL:Title\tt\trm\t\tattribute\t\r\n")),
        ),
    ]));

    let report = converter(&server, &source, &output)
        .update_conventions()
        .unwrap();

    assert!(!report.has_failures());
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].convention, "GeneralFIR");
    assert_eq!(report.outcomes[0].sync, SyncStatus::Added);

    assert!(output.join("GeneralFIR.json").is_file());
    assert!(!source.join("General_.csv").exists());
    // stored copy is line-ending normalized
    let stored = fs::read(source.join("GeneralFIR.csv")).unwrap();
    assert!(!stored.contains(&b'\r'));
}

#[test]
fn test_resync_is_unchanged_until_upstream_changes() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("source");
    let output = root.path().join("json");
    let server = StubUpstream::serve(HashMap::from([(
        "GeneralTF.csv".to_string(),
        Some(csv_body("Data.Real\t[0 0]\tm\tmRn\tdouble\t\r\n")),
    )]));

    let report = converter(&server, &source, &output)
        .update_conventions()
        .unwrap();
    assert_eq!(report.outcomes[0].sync, SyncStatus::Added);

    // byte-identical rerun
    let report = converter(&server, &source, &output)
        .update_conventions()
        .unwrap();
    assert_eq!(report.outcomes[0].sync, SyncStatus::Unchanged);
    assert_eq!(report.changed().count(), 0);

    // upstream edits the convention
    server.set(
        "GeneralTF.csv",
        &csv_body("Data.Real\t[0 0]\tm\tmRn\tdouble\treal part\r\n"),
    );
    let report = converter(&server, &source, &output)
        .update_conventions()
        .unwrap();
    assert_eq!(report.outcomes[0].sync, SyncStatus::Updated);

    let compiled = fs::read_to_string(output.join("GeneralTF.json")).unwrap();
    assert!(compiled.contains("real part"));
}

#[test]
fn test_download_failure_does_not_stop_the_batch() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("source");
    let output = root.path().join("json");
    let server = StubUpstream::serve(HashMap::from([
        (
            "Good.csv".to_string(),
            Some(csv_body("GLOBAL:Conventions\tSOFA\trm\t\tattribute\t\r\n")),
        ),
        ("Missing.csv".to_string(), None),
    ]));

    let report = converter(&server, &source, &output)
        .update_conventions()
        .unwrap();

    assert!(report.has_failures());
    assert_eq!(report.outcomes.len(), 2);

    let good = report
        .outcomes
        .iter()
        .find(|o| o.convention == "Good")
        .unwrap();
    assert!(good.succeeded());
    assert_eq!(good.sync, SyncStatus::Added);
    assert!(output.join("Good.json").is_file());

    let missing = report
        .outcomes
        .iter()
        .find(|o| o.convention == "Missing")
        .unwrap();
    assert!(!missing.succeeded());
    assert!(missing.error.as_deref().unwrap().contains("download failed"));
}

#[test]
fn test_failed_download_with_stale_copy_reports_one_outcome() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("source");
    let output = root.path().join("json");
    fs::create_dir_all(&source).unwrap();
    fs::write(
        source.join("Missing.csv"),
        format!("{HEADER}\nGLOBAL:Title\tt\trm\t\tattribute\t\n"),
    )
    .unwrap();
    let server = StubUpstream::serve(HashMap::from([(
        "Missing.csv".to_string(),
        None,
    )]));

    let report = converter(&server, &source, &output)
        .update_conventions()
        .unwrap();

    // one outcome for the convention, carrying the download error even
    // though the stale local copy still compiled
    assert_eq!(report.outcomes.len(), 1);
    let outcome = &report.outcomes[0];
    assert_eq!(outcome.convention, "Missing");
    assert!(!outcome.succeeded());
    assert!(outcome.error.as_deref().unwrap().contains("download failed"));
    assert!(output.join("Missing.json").is_file());
}
