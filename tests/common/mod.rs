use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("work");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&work).expect("create work dir");
        Self {
            _tmp: tmp,
            home,
            work,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("compa").expect("compa binary");
        cmd.env("HOME", &self.home).current_dir(&self.work);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_fail(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("json error envelope")
    }

    pub fn write_policy(&self, name: &str, bytes: usize) -> PathBuf {
        let p = self.work.join(name);
        fs::write(&p, vec![b'a'; bytes]).expect("write policy fixture");
        p
    }
}

pub fn privacy_policy_body() -> String {
    serde_json::json!({
        "policy_name": "Privacy Policy v2",
        "total_violations": 2,
        "violations": [
            {
                "event_type": "PII_LEAK",
                "val": 87.5,
                "reason": "Unmasked SSN",
                "subject_id": "U-1029",
                "source": "log-line-44"
            },
            {
                "event_type": "TRANSFER",
                "val": 85000.0,
                "reason": "Amount over policy limit",
                "subject_id": "USR_9324",
                "source": "IBM_AML"
            }
        ]
    })
    .to_string()
}

pub fn clean_policy_body() -> String {
    serde_json::json!({
        "policy_name": "Clean Policy",
        "total_violations": 0,
        "violations": []
    })
    .to_string()
}

/// Minimal single-purpose HTTP fixture: answers every request on the
/// listener with the given status and JSON body.
pub fn spawn_api(status: u16, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture api");
    let addr = listener.local_addr().expect("fixture api addr");
    let body = body.to_string();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            drain_request(&mut stream);
            let reason = match status {
                200 => "OK",
                500 => "Internal Server Error",
                _ => "Error",
            };
            let resp = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            let _ = stream.write_all(resp.as_bytes());
        }
    });
    format!("http://{}", addr)
}

/// A base URL nothing listens on: bind an ephemeral port, then drop it.
pub fn unreachable_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind throwaway port");
    let addr = listener.local_addr().expect("throwaway addr");
    drop(listener);
    format!("http://{}", addr)
}

fn header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Reads the full request (headers plus Content-Length body) before the
/// caller responds, so the client never sees a reset mid-upload.
fn drain_request(stream: &mut TcpStream) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];
    loop {
        match stream.read(&mut tmp) {
            Ok(0) => return,
            Ok(n) => buf.extend_from_slice(&tmp[..n]),
            Err(_) => return,
        }
        if let Some(pos) = header_end(&buf) {
            let headers = String::from_utf8_lossy(&buf[..pos]).to_ascii_lowercase();
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:").map(str::trim)?.parse::<usize>().ok())
                .unwrap_or(0);
            let mut remaining = content_length.saturating_sub(buf.len() - (pos + 4));
            while remaining > 0 {
                match stream.read(&mut tmp) {
                    Ok(0) => return,
                    Ok(n) => remaining = remaining.saturating_sub(n),
                    Err(_) => return,
                }
            }
            return;
        }
    }
}
