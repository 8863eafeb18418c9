use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::mpsc;
use voxbridge_core::{AppConfig, AudioFrame, EngineError};
use voxbridge_engine::{DecodingState, EngineRegistry, SpeechEngine};
use voxbridge_session::{shutdown_channel, Session, SessionError};
use voxbridge_sink::{MemorySink, SinkRegistry};

/// Plays back a fixed per-frame script so tests control exactly what the
/// recognizer reports for each frame.
enum Step {
    Partial(&'static str),
    Final(&'static str),
    Fail(&'static str),
}

struct ScriptedEngine {
    steps: VecDeque<Step>,
    current: Option<Step>,
}

impl ScriptedEngine {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            current: None,
        }
    }
}

impl SpeechEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn initialize(&mut self, _config: toml::Value) -> Result<(), EngineError> {
        Ok(())
    }

    fn accept_frame(&mut self, _frame: &AudioFrame) -> Result<DecodingState, EngineError> {
        let step = self.steps.pop_front().unwrap_or(Step::Partial(""));
        let state = match step {
            Step::Fail(msg) => {
                return Err(EngineError::ProcessingFailed(msg.to_string()));
            }
            Step::Partial(_) => DecodingState::Running,
            Step::Final(_) => DecodingState::Finalized,
        };
        self.current = Some(step);
        Ok(state)
    }

    fn partial_result(&mut self) -> Result<String, EngineError> {
        match &self.current {
            Some(Step::Partial(text)) => Ok(text.to_string()),
            _ => Ok(String::new()),
        }
    }

    fn final_result(&mut self) -> Result<String, EngineError> {
        match &self.current {
            Some(Step::Final(text)) => Ok(text.to_string()),
            _ => Ok(String::new()),
        }
    }

    fn shutdown(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

fn frame() -> AudioFrame {
    AudioFrame::new(vec![0i16; 4000], 16000)
}

fn scripted_session(
    steps: Vec<Step>,
) -> (
    Session,
    mpsc::Sender<AudioFrame>,
    MemorySink,
    voxbridge_session::ShutdownHandle,
) {
    let (handle, shutdown_rx) = shutdown_channel();
    let sink = MemorySink::new();
    let observer = sink.clone();
    let (tx, rx) = mpsc::channel(32);
    let session = Session::new(
        Box::new(ScriptedEngine::new(steps)),
        Box::new(sink),
        rx,
        shutdown_rx,
    );
    (session, tx, observer, handle)
}

#[tokio::test]
async fn test_partials_then_final_in_frame_order() {
    let (mut session, tx, observer, _handle) = scripted_session(vec![
        Step::Partial("turn"),
        Step::Partial("turn it down"),
        Step::Final("turn it down please"),
    ]);

    for _ in 0..3 {
        tx.send(frame()).await.unwrap();
    }
    drop(tx);

    session.run().await.unwrap();
    session.stop().await;

    assert_eq!(
        observer.lines(),
        vec![
            "READY",
            "Partial: turn",
            "Partial: turn it down",
            "Text: turn it down please",
            "TERMINATE",
        ],
    );
}

#[tokio::test]
async fn test_silent_frames_produce_no_events() {
    let (mut session, tx, observer, _handle) = scripted_session(vec![
        Step::Partial(""),
        Step::Partial("   \t"),
        Step::Final("  \n"),
        Step::Final("ok"),
    ]);

    for _ in 0..4 {
        tx.send(frame()).await.unwrap();
    }
    drop(tx);

    session.run().await.unwrap();
    session.stop().await;

    // The three empty/whitespace extractions are suppressed entirely.
    assert_eq!(observer.lines(), vec!["READY", "Text: ok", "TERMINATE"]);
}

#[tokio::test]
async fn test_event_text_is_trimmed() {
    let (mut session, tx, observer, _handle) =
        scripted_session(vec![Step::Partial("  hello "), Step::Final(" hello world\n")]);

    tx.send(frame()).await.unwrap();
    tx.send(frame()).await.unwrap();
    drop(tx);

    session.run().await.unwrap();
    session.stop().await;

    assert_eq!(
        observer.lines(),
        vec!["READY", "Partial: hello", "Text: hello world", "TERMINATE"],
    );
}

#[tokio::test]
async fn test_engine_failure_is_fatal_but_release_still_runs() {
    let (mut session, tx, observer, _handle) = scripted_session(vec![
        Step::Partial("fine so far"),
        Step::Fail("decoder rejected input"),
        Step::Partial("never reached"),
    ]);

    for _ in 0..3 {
        tx.send(frame()).await.unwrap();
    }
    drop(tx);

    let result = session.run().await;
    match result {
        Err(SessionError::Engine(e)) => {
            assert!(e.to_string().contains("decoder rejected input"));
        }
        other => panic!("expected engine error, got {other:?}"),
    }

    // Release still happens on the error path and TERMINATE is last.
    session.stop().await;
    let lines = observer.lines();
    assert_eq!(
        lines,
        vec!["READY", "Partial: fine so far", "TERMINATE"],
    );
}

#[tokio::test]
async fn test_cancellation_stops_reads_and_terminates_cleanly() {
    let (mut session, tx, observer, handle) =
        scripted_session(vec![Step::Partial("one"), Step::Partial("two")]);

    tx.send(frame()).await.unwrap();

    // Keep the channel open so the loop parks on the read, then cancel.
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.request();
    });

    tokio::time::timeout(Duration::from_secs(2), session.run())
        .await
        .expect("run did not observe cancellation")
        .unwrap();
    session.stop().await;
    drop(tx);

    let lines = observer.lines();
    assert_eq!(lines.first().unwrap(), "READY");
    assert_eq!(lines.last().unwrap(), "TERMINATE");
    // Only the frame consumed before cancellation produced an event.
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "Partial: one");
}

#[tokio::test]
async fn test_start_with_unknown_engine_fails_before_any_output() {
    let config = AppConfig::from_toml_str(
        r#"
[engine]
name = "missing-engine"

[sink]
name = "memory"
"#,
    )
    .unwrap();

    let engines = EngineRegistry::new();
    let sinks = SinkRegistry::new();
    let (_handle, shutdown_rx) = shutdown_channel();

    // Startup failure happens before the readiness marker could be emitted
    // and before any device is touched.
    let err = Session::start(&config, &engines, &sinks, shutdown_rx)
        .await
        .err()
        .expect("start must fail for an unknown engine");
    match err {
        SessionError::Engine(EngineError::EngineNotFound(name)) => {
            assert_eq!(name, "missing-engine");
        }
        other => panic!("expected EngineNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_terminate_follows_last_event_even_after_double_stop() {
    let (mut session, tx, observer, _handle) =
        scripted_session(vec![Step::Final("only utterance")]);

    tx.send(frame()).await.unwrap();
    drop(tx);

    session.run().await.unwrap();
    session.stop().await;
    session.stop().await;

    let lines = observer.lines();
    assert_eq!(
        lines,
        vec!["READY", "Text: only utterance", "TERMINATE"],
    );
}
