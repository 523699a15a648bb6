//! # Integration Tests for Vibe
//!
//! This module contains integration tests that exercise Vibe from a user
//! perspective: CLI commands, history persistence, and the full HTTP client
//! path against a loopback test server.

use std::process::Command;

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn test_cli_help_displays_correctly() {
        let output = Command::new("cargo")
            .args(["run", "--", "--help"])
            .output()
            .expect("Failed to run help command");

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("vibe"));
        assert!(stdout.contains("capture"));
        assert!(stdout.contains("analyze"));
        assert!(stdout.contains("text"));
        assert!(stdout.contains("history"));
        assert!(stdout.contains("docs"));
        assert!(stdout.contains("completion"));
    }

    #[test]
    fn test_cli_version_flag() {
        let output = Command::new("cargo")
            .args(["run", "--", "--version"])
            .output()
            .expect("Failed to run version command");

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("vibe"));
    }

    #[test]
    fn test_completion_generation() {
        let output = Command::new("cargo")
            .args(["run", "--", "completion", "bash"])
            .output()
            .expect("Failed to run completion command");

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("vibe"));
        assert!(stdout.contains("complete"));
    }

    #[test]
    fn test_docs_prints_url_without_network() {
        // Port 9 is discard; if the command tried to connect it would fail,
        // but docs must print the URL without any request.
        let output = Command::new("cargo")
            .args(["run", "--", "--api-url", "http://127.0.0.1:9", "docs"])
            .output()
            .expect("Failed to run docs command");

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("http://127.0.0.1:9/docs"));
    }

    #[test]
    fn test_empty_text_performs_no_request() {
        // The API address points at a closed port; the command still
        // succeeds because blank text never produces a request.
        let output = Command::new("cargo")
            .args(["run", "--", "--api-url", "http://127.0.0.1:9", "text", "   "])
            .output()
            .expect("Failed to run text command");

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Nothing to analyze"));
    }
}

#[cfg(test)]
mod history_integration_tests {
    use tempfile::TempDir;
    use vibe::history::{HistoryLedger, MAX_ENTRIES};
    use vibe::model::{AnalysisResult, Origin};

    fn result_with_mood(mood: &str) -> AnalysisResult {
        AnalysisResult {
            mood: mood.to_string(),
            emoji: "😄".to_string(),
            confidence: 0.8,
            probs: None,
            playlist: Vec::new(),
        }
    }

    #[test]
    fn test_history_survives_reload_and_stays_capped() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("history.json");

        let mut ledger = HistoryLedger::load(&path);
        for i in 0..(MAX_ENTRIES + 5) {
            ledger.record(&result_with_mood(&format!("mood{i}")), Origin::Text, None);
        }
        ledger.save().expect("Failed to save history");

        let reloaded = HistoryLedger::load(&path);
        assert_eq!(reloaded.entries().len(), MAX_ENTRIES);
        assert_eq!(
            reloaded.entries()[0].mood,
            format!("mood{}", MAX_ENTRIES + 4),
            "most recent entry must come back first"
        );
    }

    #[test]
    fn test_history_corrupt_file_resets_to_empty() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("history.json");
        std::fs::write(&path, "[{\"mood\": truncated garbage").unwrap();

        let ledger = HistoryLedger::load(&path);
        assert!(ledger.is_empty());
    }
}

#[cfg(test)]
mod service_tests {
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;
    use vibe::client::AnalysisClient;
    use vibe::config::ServiceConfig;

    /// One request as seen by the test server.
    struct RecordedRequest {
        request_line: String,
        body: Vec<u8>,
    }

    impl RecordedRequest {
        fn body_contains(&self, needle: &[u8]) -> bool {
            find(&self.body, needle).is_some()
        }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    /// Read a complete HTTP/1.1 request (headers plus content-length body).
    fn read_http_request(stream: &mut TcpStream) -> RecordedRequest {
        let mut buf: Vec<u8> = Vec::new();
        let mut chunk = [0u8; 8192];

        let header_end = loop {
            let n = stream.read(&mut chunk).expect("Failed to read from client");
            if n == 0 {
                break buf.len();
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).expect("Failed to read body from client");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        RecordedRequest {
            request_line: headers.lines().next().unwrap_or_default().to_string(),
            body: buf[header_end..].to_vec(),
        }
    }

    fn respond(stream: &mut TcpStream, status: &str, body: &str) {
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("Failed to write response");
        stream.flush().ok();
    }

    /// Serve the canned responses in order, one connection each, and hand
    /// back everything the client sent. The thread ends after the last
    /// response, so any extra request from the client fails the test.
    fn spawn_server(
        responses: Vec<(&'static str, &'static str)>,
    ) -> (String, thread::JoinHandle<Vec<RecordedRequest>>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().expect("Failed to accept connection");
                seen.push(read_http_request(&mut stream));
                respond(&mut stream, status, body);
            }
            seen
        });

        (format!("http://{addr}"), handle)
    }

    const HAPPY_RESPONSE: &str = r#"{
        "mood": "HAPPY",
        "confidence": 0.91,
        "playlist": [
            {"title": "Pop Party Hits", "source": "spotify", "url": "https://open.spotify.com/playlist/37i9dQZF1DX1H4LbvY4OJi"}
        ],
        "probs": {"happy": 0.91, "neutral": 0.06, "sad": 0.03}
    }"#;

    #[test]
    fn test_successful_batch_needs_no_fallback() {
        let (base_url, server) = spawn_server(vec![("200 OK", HAPPY_RESPONSE)]);
        let client = AnalysisClient::new(ServiceConfig::new(base_url));

        let frames = vec![b"FIRSTFRAMEDATA".to_vec(), b"SECONDFRAMEDATA".to_vec()];
        let result = client.predict_images(&frames).expect("batch request should succeed");

        assert_eq!(result.mood, "happy");
        assert!((result.confidence - 0.91).abs() < f64::EPSILON);
        assert_eq!(result.playlist.len(), 1);

        let seen = server.join().unwrap();
        assert_eq!(seen.len(), 1, "a successful batch must not retry");
        assert!(seen[0].request_line.starts_with("POST /api/predict/images "));
        assert!(seen[0].body_contains(b"name=\"files\""));
        assert!(seen[0].body_contains(b"FIRSTFRAMEDATA"));
        assert!(seen[0].body_contains(b"SECONDFRAMEDATA"));
    }

    #[test]
    fn test_batch_failure_falls_back_to_single_image_once() {
        let (base_url, server) = spawn_server(vec![
            ("500 Internal Server Error", "{}"),
            ("200 OK", HAPPY_RESPONSE),
        ]);
        let client = AnalysisClient::new(ServiceConfig::new(base_url));

        let frames = vec![b"FIRSTFRAMEDATA".to_vec(), b"SECONDFRAMEDATA".to_vec()];
        let result = client.predict_images(&frames).expect("fallback should succeed");
        assert_eq!(result.mood, "happy");

        let seen = server.join().unwrap();
        assert_eq!(seen.len(), 2, "exactly one retry is allowed");
        assert!(seen[0].request_line.starts_with("POST /api/predict/images "));
        assert!(seen[1].request_line.starts_with("POST /api/predict/image "));
        assert!(seen[1].body_contains(b"name=\"file\""));
        assert!(
            seen[1].body_contains(b"FIRSTFRAMEDATA"),
            "fallback must carry the first captured frame"
        );
        assert!(
            !seen[1].body_contains(b"SECONDFRAMEDATA"),
            "fallback must carry only the first frame"
        );
    }

    #[test]
    fn test_batch_transport_failure_falls_back() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            // First connection: read the request, then slam the door.
            let (mut stream, _) = listener.accept().expect("Failed to accept connection");
            let _ = read_http_request(&mut stream);
            drop(stream);

            // Second connection: answer properly.
            let (mut stream, _) = listener.accept().expect("Failed to accept connection");
            let seen = read_http_request(&mut stream);
            respond(&mut stream, "200 OK", HAPPY_RESPONSE);
            seen
        });

        let client = AnalysisClient::new(ServiceConfig::new(format!("http://{addr}")));
        let frames = vec![b"FIRSTFRAMEDATA".to_vec()];
        let result = client.predict_images(&frames).expect("fallback should succeed");
        assert_eq!(result.mood, "happy");

        let fallback = handle.join().unwrap();
        assert!(fallback.request_line.starts_with("POST /api/predict/image "));
        assert!(fallback.body_contains(b"name=\"file\""));
    }

    #[test]
    fn test_text_prediction_normalizes_odd_fields() {
        const ODD_RESPONSE: &str = r#"{
            "mood": "CALM",
            "confidence": "0.42",
            "playlist": "oops",
            "probs": {"calm": "0.42", "glitch": null}
        }"#;
        let (base_url, server) = spawn_server(vec![("200 OK", ODD_RESPONSE)]);
        let client = AnalysisClient::new(ServiceConfig::new(base_url));

        let result = client.predict_text("feeling fine").expect("text request should succeed");
        assert_eq!(result.mood, "calm");
        assert!((result.confidence - 0.42).abs() < f64::EPSILON);
        assert!(result.playlist.is_empty(), "malformed playlist normalizes to empty");

        let probs = result.probs.expect("breakdown was present");
        assert_eq!(probs.len(), 1, "non-numeric entries are dropped");
        assert_eq!(probs[0].0, "calm");

        let seen = server.join().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].request_line.starts_with("POST /api/predict/text "));
        assert!(seen[0].body_contains(b"\"text\":\"feeling fine\""));
    }

    #[test]
    fn test_predict_images_rejects_empty_frame_list() {
        // No server: the check fires before any request.
        let client = AnalysisClient::new(ServiceConfig::new("http://127.0.0.1:9"));
        let err = client.predict_images(&[]).unwrap_err();
        assert!(err.to_string().contains("No frames"));
    }
}
