//! CLI contract tests.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::process::Output;
use std::thread::JoinHandle;

use assert_cmd::Command;

fn cli() -> Command {
    match Command::cargo_bin("acs-messages") {
        Ok(cmd) => cmd,
        Err(err) => panic!("binary should be built: {err}"),
    }
}

/// Run the binary in `dir` with the given connection string, isolated from
/// any config file or `RUST_LOG` in the caller's environment.
fn run_in(dir: &Path, connection_string: &str, args: &[&str]) -> Output {
    let output = cli()
        .current_dir(dir)
        .env("ACS_CONNECTION_STRING", connection_string)
        .env_remove("ACS_CONFIG_PATH")
        .env_remove("RUST_LOG")
        .args(args)
        .output();
    match output {
        Ok(output) => output,
        Err(err) => panic!("binary should run: {err}"),
    }
}

fn temp_dir() -> tempfile::TempDir {
    match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(err) => panic!("tempdir should be created: {err}"),
    }
}

/// An address nothing listens on.
fn refused_endpoint() -> String {
    let listener = match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener,
        Err(err) => panic!("listener should bind: {err}"),
    };
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(err) => panic!("listener should expose local addr: {err}"),
    };
    drop(listener);
    format!("http://{addr}/")
}

fn drain_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 4096];
    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let content_length: usize = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);
            if buf.len() >= end.saturating_add(4).saturating_add(content_length) {
                return;
            }
        }
        match socket.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

/// Answer one request per canned `(status line, body)`, in order.
fn serve_sequence(responses: Vec<(&'static str, &'static str)>) -> (String, JoinHandle<usize>) {
    let listener = match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener,
        Err(err) => panic!("listener should bind: {err}"),
    };
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(err) => panic!("listener should expose local addr: {err}"),
    };
    let handle = std::thread::spawn(move || {
        let mut served = 0_usize;
        for (status_line, body) in responses {
            let Ok((mut socket, _)) = listener.accept() else {
                break;
            };
            drain_request(&mut socket);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            if socket.write_all(response.as_bytes()).is_ok() {
                served = served.saturating_add(1);
            }
        }
        served
    });
    (format!("http://{addr}/"), handle)
}

#[test]
fn help_lists_subcommands() {
    let output = match cli().arg("--help").output() {
        Ok(output) => output,
        Err(err) => panic!("binary should run: {err}"),
    };
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("demo"));
    assert!(stdout.contains("text"));
}

#[test]
fn malformed_connection_string_fails_without_sending() {
    let dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(err) => panic!("tempdir should be created: {err}"),
    };
    let output = cli()
        .current_dir(dir.path())
        .env("ACS_CONNECTION_STRING", "endpoint=https://x.example/")
        .env_remove("ACS_CONFIG_PATH")
        .args(["text", "Hello"])
        .output();
    let output = match output {
        Ok(output) => output,
        Err(err) => panic!("binary should run: {err}"),
    };

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Unexpected error"));
    assert!(stdout.contains("invalid connection string"));
    assert!(!stdout.contains("Sending text message"));
}

#[test]
fn demo_stops_after_first_transport_failure() {
    let dir = temp_dir();
    let endpoint = refused_endpoint();
    let output = run_in(
        dir.path(),
        &format!("endpoint={endpoint};accesskey=k"),
        &["demo"],
    );

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Sending simple text message..."));
    assert!(stdout.contains("HTTP error while sending messages"));
    assert!(!stdout.contains("Sending interactive button message"));
    assert!(!stdout.contains("Sending interactive list message"));
    assert!(!stdout.contains("Messages sent successfully!"));
}

#[test]
fn demo_sends_three_messages_in_order_and_passes_statuses_through() {
    let dir = temp_dir();
    let (endpoint, server) = serve_sequence(vec![
        ("202 Accepted", r#"{"receipts":["text"]}"#),
        ("400 Bad Request", r#"{"error":"bad button"}"#),
        ("202 Accepted", r#"{"receipts":["list"]}"#),
    ]);
    let output = run_in(
        dir.path(),
        &format!("endpoint={endpoint};accesskey=k"),
        &["demo"],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let expected = [
        "Message sent. Status code: 202",
        r#"Response: {"receipts":["text"]}"#,
        "Interactive button message sent. Status code: 400",
        r#"Response: {"error":"bad button"}"#,
        "Interactive list message sent. Status code: 202",
        r#"Response: {"receipts":["list"]}"#,
        "Messages sent successfully!",
    ];
    let mut rest: &str = &stdout;
    for line in expected {
        let Some(at) = rest.find(line) else {
            panic!("missing or out of order: {line}\nstdout:\n{stdout}");
        };
        rest = &rest[at..];
    }

    match server.join() {
        Ok(served) => assert_eq!(served, 3),
        Err(_) => panic!("server thread should not panic"),
    }
}

#[test]
fn missing_explicit_config_file_fails_before_sending() {
    let dir = temp_dir();
    let missing = dir.path().join("typo.toml");
    let output = run_in(
        dir.path(),
        "endpoint=https://x.example/;accesskey=k",
        &["--config", &missing.display().to_string(), "text", "hi"],
    );

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Unexpected error"));
    assert!(stdout.contains("typo.toml"));
    assert!(!stdout.contains("Sending text message"));
}

#[test]
fn rust_log_from_dotenv_applies_to_logging() {
    let dir = temp_dir();
    assert!(std::fs::write(dir.path().join(".env"), "RUST_LOG=debug\n").is_ok());
    let output = run_in(dir.path(), "endpoint=https://x.example/", &["text", "hi"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("configuration resolved"));
}
