use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tavola_core::{
    FetchEvent, FetchObserver, Fetcher, RetryPolicy, TavolaError, TransientFailure, Transport,
    TransportResponse, Url,
};

/// Hands out canned results in order; panics are avoided by reporting
/// exhaustion as a transport error.
struct ScriptTransport {
    script: Mutex<VecDeque<Result<TransportResponse, TavolaError>>>,
    calls: AtomicU32,
}

impl ScriptTransport {
    fn new(script: Vec<Result<TransportResponse, TavolaError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for ScriptTransport {
    fn issue(&self, _target: &Url) -> Result<TransportResponse, TavolaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TavolaError::transport("script exhausted")))
    }
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl FetchObserver for RecordingObserver {
    fn on_event(&self, event: &FetchEvent<'_>) {
        let line = match event {
            FetchEvent::Attempt { attempt, .. } => format!("attempt:{attempt}"),
            FetchEvent::Classified { attempt, outcome } => {
                let tag = match outcome {
                    tavola_core::FetchOutcome::Success(_) => "success",
                    tavola_core::FetchOutcome::RateLimited { .. } => "rate-limited",
                    tavola_core::FetchOutcome::TemporarilyUnavailable => "unavailable",
                    tavola_core::FetchOutcome::MalformedRequest(_) => "malformed",
                    tavola_core::FetchOutcome::OtherFailure(_) => "other",
                };
                format!("classified:{attempt}:{tag}")
            }
            FetchEvent::BackingOff { attempt, delay } => {
                format!("backoff:{attempt}:{}ms", delay.as_millis())
            }
        };
        self.events.lock().unwrap().push(line);
    }
}

impl RecordingObserver {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

fn target() -> Url {
    Url::parse("https://data.example.com/api/v3/datasets/WIKI/AAPL/data.json").unwrap()
}

fn ok(body: &str) -> Result<TransportResponse, TavolaError> {
    Ok(TransportResponse::new(200, vec![], body.as_bytes().to_vec()))
}

fn status(code: u16) -> Result<TransportResponse, TavolaError> {
    Ok(TransportResponse::new(code, vec![], Vec::new()))
}

fn rate_limited(
    retry_after: Option<&str>,
    remaining: Option<&str>,
) -> Result<TransportResponse, TavolaError> {
    let mut headers = Vec::new();
    if let Some(v) = retry_after {
        headers.push(("retry-after".to_string(), v.to_string()));
    }
    if let Some(v) = remaining {
        headers.push(("x-ratelimit-remaining".to_string(), v.to_string()));
    }
    Ok(TransportResponse::new(429, headers, Vec::new()))
}

fn tiny_fixed(max_retries: u32) -> RetryPolicy {
    RetryPolicy::Fixed {
        delay: Duration::from_millis(1),
        max_retries,
    }
}

#[test]
fn quota_exhausted_fails_on_first_attempt() {
    let transport = ScriptTransport::new(vec![rate_limited(Some("30"), Some("0"))]);
    let policy = tiny_fixed(5);
    let observer = RecordingObserver::default();
    let mut decoded = 0u32;

    let err = Fetcher::new(&transport, &policy)
        .with_observer(&observer)
        .fetch(&target(), |_| {
            decoded += 1;
            Ok(())
        })
        .unwrap_err();

    assert!(matches!(err, TavolaError::QuotaExceeded { remaining: 0 }));
    assert_eq!(transport.calls(), 1);
    assert_eq!(decoded, 0);
    // No backoff was granted: the failure is terminal before the policy runs.
    assert!(observer.events().iter().all(|e| !e.starts_with("backoff")));
}

#[test]
fn negative_remaining_quota_also_fails_fast() {
    let transport = ScriptTransport::new(vec![rate_limited(None, Some("-3"))]);
    let policy = tiny_fixed(5);

    let err = Fetcher::new(&transport, &policy)
        .fetch(&target(), |body| Ok(body.len()))
        .unwrap_err();

    assert!(matches!(err, TavolaError::QuotaExceeded { remaining: -3 }));
    assert_eq!(transport.calls(), 1);
}

#[test]
fn missing_quota_information_stays_on_the_retry_path() {
    let transport = ScriptTransport::new(vec![rate_limited(Some("1"), None), ok("payload")]);
    let policy = tiny_fixed(1);

    let body = Fetcher::new(&transport, &policy)
        .fetch(&target(), |body| Ok(body.to_vec()))
        .unwrap();

    assert_eq!(body, b"payload");
    assert_eq!(transport.calls(), 2);
}

#[test]
fn unavailable_retries_until_success_and_decodes_once() {
    let k = 3u32;
    let mut script: Vec<_> = (0..k).map(|_| status(503)).collect();
    script.push(ok("done"));
    let transport = ScriptTransport::new(script);
    let policy = tiny_fixed(k);
    let observer = RecordingObserver::default();
    let decoded = AtomicU32::new(0);

    let out = Fetcher::new(&transport, &policy)
        .with_observer(&observer)
        .fetch(&target(), |body| {
            decoded.fetch_add(1, Ordering::SeqCst);
            Ok(String::from_utf8_lossy(body).into_owned())
        })
        .unwrap();

    assert_eq!(out, "done");
    assert_eq!(transport.calls(), k + 1);
    assert_eq!(decoded.load(Ordering::SeqCst), 1);

    let events = observer.events();
    let backoffs = events.iter().filter(|e| e.starts_with("backoff")).count();
    assert_eq!(backoffs as u32, k);
    assert_eq!(events.first().map(String::as_str), Some("attempt:0"));
    assert_eq!(
        events.last().map(String::as_str),
        Some(&*format!("classified:{k}:success"))
    );
}

#[test]
fn policy_give_up_wraps_last_transient_outcome() {
    let transport = ScriptTransport::new(vec![status(503), status(503), status(503)]);
    let policy = tiny_fixed(2);

    let err = Fetcher::new(&transport, &policy)
        .fetch(&target(), |_| Ok(()))
        .unwrap_err();

    match err {
        TavolaError::RetriesExhausted { attempts, last } => {
            assert_eq!(attempts, 3);
            assert_eq!(last, TransientFailure::TemporarilyUnavailable);
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(transport.calls(), 3);
}

#[test]
fn never_policy_treats_first_failure_as_terminal() {
    let transport = ScriptTransport::new(vec![rate_limited(Some("7"), Some("5"))]);
    let policy = RetryPolicy::Never;

    let err = Fetcher::new(&transport, &policy)
        .fetch(&target(), |_| Ok(()))
        .unwrap_err();

    match err {
        TavolaError::RetriesExhausted { attempts, last } => {
            assert_eq!(attempts, 1);
            assert_eq!(
                last,
                TransientFailure::RateLimited {
                    retry_after: Some(Duration::from_secs(7)),
                    remaining: Some(5),
                }
            );
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(transport.calls(), 1);
}

#[test]
fn malformed_request_is_never_retried() {
    let transport = ScriptTransport::new(vec![Ok(TransportResponse::new(
        422,
        vec![],
        b"unknown collapse value".to_vec(),
    ))]);
    let policy = tiny_fixed(5);

    let err = Fetcher::new(&transport, &policy)
        .fetch(&target(), |_| Ok(()))
        .unwrap_err();

    assert!(matches!(
        err,
        TavolaError::RequestRejected { message } if message == "unknown collapse value"
    ));
    assert_eq!(transport.calls(), 1);
}

#[test]
fn decode_failure_is_terminal() {
    let transport = ScriptTransport::new(vec![ok("not json"), ok("never reached")]);
    let policy = tiny_fixed(5);

    let err = Fetcher::new(&transport, &policy)
        .fetch::<(), _>(&target(), |_| Err(TavolaError::decode("bad payload")))
        .unwrap_err();

    assert!(matches!(err, TavolaError::Decode(_)));
    assert_eq!(transport.calls(), 1);
}

#[test]
fn unexpected_status_surfaces_as_transport_error() {
    let transport = ScriptTransport::new(vec![status(500)]);
    let policy = tiny_fixed(5);

    let err = Fetcher::new(&transport, &policy)
        .fetch(&target(), |_| Ok(()))
        .unwrap_err();

    assert!(matches!(err, TavolaError::Transport(msg) if msg.contains("500")));
    assert_eq!(transport.calls(), 1);
}

#[test]
fn io_failure_surfaces_as_transport_error_without_retry() {
    let transport =
        ScriptTransport::new(vec![Err(TavolaError::transport("connection refused"))]);
    let policy = tiny_fixed(5);

    let err = Fetcher::new(&transport, &policy)
        .fetch(&target(), |_| Ok(()))
        .unwrap_err();

    assert!(matches!(err, TavolaError::Transport(msg) if msg.contains("connection refused")));
    assert_eq!(transport.calls(), 1);
}

#[test]
fn events_follow_the_state_machine_order() {
    let transport = ScriptTransport::new(vec![status(503), ok("x")]);
    let policy = tiny_fixed(1);
    let observer = RecordingObserver::default();

    Fetcher::new(&transport, &policy)
        .with_observer(&observer)
        .fetch(&target(), |_| Ok(()))
        .unwrap();

    assert_eq!(
        observer.events(),
        vec![
            "attempt:0",
            "classified:0:unavailable",
            "backoff:0:1ms",
            "attempt:1",
            "classified:1:success",
        ]
    );
}

#[test]
fn sequence_policy_sleeps_the_listed_delays() {
    let transport = ScriptTransport::new(vec![status(503), status(503), ok("x")]);
    let policy = RetryPolicy::Sequence(vec![Duration::from_millis(1), Duration::from_millis(2)]);
    let observer = RecordingObserver::default();

    Fetcher::new(&transport, &policy)
        .with_observer(&observer)
        .fetch(&target(), |_| Ok(()))
        .unwrap();

    let backoffs: Vec<String> = observer
        .events()
        .into_iter()
        .filter(|e| e.starts_with("backoff"))
        .collect();
    assert_eq!(backoffs, vec!["backoff:0:1ms", "backoff:1:2ms"]);
}
