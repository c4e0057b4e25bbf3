//! End-to-end call flow over a synthetic audio stream
//!
//! Drives a real `CallSession` with scripted speech-to-text, text-to-speech,
//! and decision collaborators, plus the real capture pipeline, tool registry,
//! and in-memory store underneath.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use frontdesk_agent::CallSession;
use frontdesk_config::{BusinessProfile, Settings};
use frontdesk_core::{
    AgentDecision, AudioFrame, CallOutcome, DecisionError, DecisionModel, SpeechError,
    SpeechToText, SynthesizedAudio, TextToSpeech, ToolCallRequest, Transcript, Turn, TurnRole,
    Utterance,
};
use frontdesk_tools::{appointment_registry, AppointmentStore, FixedClock, InMemoryStore, ToolContext};

struct ScriptedStt {
    script: Mutex<VecDeque<String>>,
}

impl ScriptedStt {
    fn new(lines: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(lines.iter().map(|s| s.to_string()).collect()),
        })
    }
}

#[async_trait]
impl SpeechToText for ScriptedStt {
    async fn transcribe(&self, _utterance: &Utterance) -> Result<Transcript, SpeechError> {
        match self.script.lock().pop_front() {
            Some(line) => Ok(Transcript::new(line)),
            None => Ok(Transcript::new("")),
        }
    }

    fn model_name(&self) -> &str {
        "scripted-stt"
    }
}

struct ToneTts;

#[async_trait]
impl TextToSpeech for ToneTts {
    async fn synthesize(&self, _text: &str) -> Result<SynthesizedAudio, SpeechError> {
        Ok(SynthesizedAudio {
            samples: vec![0.1; 160],
            sample_rate: 16000,
        })
    }

    fn model_name(&self) -> &str {
        "tone-tts"
    }
}

struct ScriptedModel {
    script: Mutex<VecDeque<AgentDecision>>,
}

impl ScriptedModel {
    fn new(decisions: Vec<AgentDecision>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(decisions.into()),
        })
    }
}

#[async_trait]
impl DecisionModel for ScriptedModel {
    async fn decide(
        &self,
        _system_prompt: &str,
        _history: &[Turn],
    ) -> Result<AgentDecision, DecisionError> {
        self.script
            .lock()
            .pop_front()
            .ok_or_else(|| DecisionError::BackendUnavailable("script ended".to_string()))
    }
}

fn profile() -> Arc<BusinessProfile> {
    Arc::new(
        serde_yaml::from_str(
            r#"
name: Harbor Cuts
services:
  - name: Haircut
    duration_minutes: 30
staff:
  - name: Dana
hours:
  tuesday: { open: "09:00", close: "17:00" }
  wednesday: { open: "09:00", close: "17:00" }
"#,
        )
        .unwrap(),
    )
}

fn tool_call(name: &str, arguments: serde_json::Value) -> AgentDecision {
    AgentDecision {
        reply: None,
        tool_calls: vec![ToolCallRequest::new(name, arguments)],
        done: false,
    }
}

fn frame(energy: f32, sequence: u64) -> AudioFrame {
    AudioFrame::new(vec![energy; 1024], 16000, sequence)
}

/// Ambient frames for calibration, then two spoken utterances
fn feed_two_utterances(tx: mpsc::Sender<AudioFrame>) {
    tokio::spawn(async move {
        let mut sequence = 0;
        let mut send = |energy: f32, sequence: &mut u64| {
            let frame = frame(energy, *sequence);
            *sequence += 1;
            frame
        };
        // 2s ambient window for calibration
        for _ in 0..33 {
            if tx.send(send(0.004, &mut sequence)).await.is_err() {
                return;
            }
        }
        for _ in 0..2 {
            // ~1s of speech, then enough trailing silence to finalize
            for _ in 0..16 {
                if tx.send(send(0.05, &mut sequence)).await.is_err() {
                    return;
                }
            }
            for _ in 0..20 {
                if tx.send(send(0.004, &mut sequence)).await.is_err() {
                    return;
                }
            }
        }
    });
}

fn session(
    model: Arc<ScriptedModel>,
    stt: Arc<ScriptedStt>,
    store: Arc<InMemoryStore>,
    playback: mpsc::Sender<SynthesizedAudio>,
) -> CallSession {
    let profile = profile();
    // Tuesday morning
    let clock = Arc::new(FixedClock(
        NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap(),
    ));
    let context = ToolContext::new(store, profile.clone(), clock.clone());
    let registry = Arc::new(appointment_registry(context));

    CallSession::new(
        &Settings::default(),
        profile,
        clock,
        stt,
        Arc::new(ToneTts),
        model,
        registry,
        playback,
    )
}

#[tokio::test]
async fn test_booking_call_end_to_end() {
    let store = Arc::new(InMemoryStore::new());
    let stt = ScriptedStt::new(&[
        "Hi, I'd like a haircut tomorrow at ten",
        "That's everything, thank you",
    ]);
    let model = ScriptedModel::new(vec![
        tool_call(
            "check_availability",
            json!({ "service": "Haircut", "date": "tomorrow", "time": "10am" }),
        ),
        tool_call(
            "book_appointment",
            json!({
                "customer_name": "Sam Carter",
                "customer_phone": "555-123-4567",
                "service": "Haircut",
                "date": "tomorrow",
                "time": "10:00",
            }),
        ),
        AgentDecision::reply("You're all set for ten tomorrow morning, Sam."),
        AgentDecision::reply("Thanks for calling Harbor Cuts, goodbye!").with_done(true),
    ]);

    let (frame_tx, mut frame_rx) = mpsc::channel(256);
    let (playback_tx, mut playback_rx) = mpsc::channel(16);
    let session = session(model, stt, store.clone(), playback_tx);

    feed_two_utterances(frame_tx);
    let record = session.run(&mut frame_rx, &CancellationToken::new()).await;

    assert_eq!(record.outcome, CallOutcome::Booked);

    // The booking landed on tomorrow's date at the requested time
    let booked = store.scheduled_for("5551234567");
    assert_eq!(booked.len(), 1);
    assert_eq!(booked[0].date, NaiveDate::from_ymd_opt(2026, 9, 2).unwrap());
    assert_eq!(booked[0].start.format("%H:%M").to_string(), "10:00");
    assert_eq!(booked[0].service, "Haircut");

    // Greeting, two replies; every spoken line reached playback
    let mut spoken = 0;
    while playback_rx.try_recv().is_ok() {
        spoken += 1;
    }
    assert_eq!(spoken, 3);

    // Transcript interleaves caller, tool, and agent turns in order
    let roles: Vec<TurnRole> = record.transcript.iter().map(|t| t.role).collect();
    assert_eq!(
        roles,
        vec![
            TurnRole::Assistant, // greeting
            TurnRole::User,
            TurnRole::Tool, // check_availability
            TurnRole::Tool, // book_appointment
            TurnRole::Assistant,
            TurnRole::User,
            TurnRole::Assistant,
        ]
    );
}

#[tokio::test]
async fn test_misheard_turn_is_recorded_and_spoken() {
    let store = Arc::new(InMemoryStore::new());
    // First utterance transcribes to nothing; the caller tries again
    let stt = ScriptedStt::new(&["", "Never mind, thanks anyway"]);
    let model = ScriptedModel::new(vec![AgentDecision::reply(
        "No problem, have a good one!",
    )
    .with_done(true)]);

    let (frame_tx, mut frame_rx) = mpsc::channel(256);
    let (playback_tx, mut playback_rx) = mpsc::channel(16);
    let session = session(model, stt, store, playback_tx);

    feed_two_utterances(frame_tx);
    let record = session.run(&mut frame_rx, &CancellationToken::new()).await;

    // Greeting, the catch-that prompt, the final reply
    let mut spoken = 0;
    while playback_rx.try_recv().is_ok() {
        spoken += 1;
    }
    assert_eq!(spoken, 3);

    // The prompt the caller heard is in the transcript, before their retry
    let misheard = record
        .transcript
        .iter()
        .position(|t| t.role == TurnRole::Assistant && t.content.contains("didn't catch"))
        .unwrap();
    let retry = record
        .transcript
        .iter()
        .position(|t| t.role == TurnRole::User)
        .unwrap();
    assert!(misheard < retry);
}

#[tokio::test]
async fn test_silent_caller_is_abandoned() {
    let mut settings = Settings::default();
    settings.audio.speech_wait_timeout_sec = 0.2;

    let store = Arc::new(InMemoryStore::new());
    let profile = profile();
    let clock = Arc::new(FixedClock(
        NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap(),
    ));
    let context = ToolContext::new(store, profile.clone(), clock.clone());
    let registry = Arc::new(appointment_registry(context));

    let (playback_tx, mut playback_rx) = mpsc::channel(16);
    let session = CallSession::new(
        &settings,
        profile,
        clock,
        ScriptedStt::new(&[]),
        Arc::new(ToneTts),
        ScriptedModel::new(vec![]),
        registry,
        playback_tx,
    );

    let (frame_tx, mut frame_rx) = mpsc::channel(64);
    tokio::spawn(async move {
        // Ambient noise only; the caller never speaks
        let mut sequence = 0;
        loop {
            if frame_tx.send(frame(0.004, sequence)).await.is_err() {
                return;
            }
            sequence += 1;
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    });

    let record = session.run(&mut frame_rx, &CancellationToken::new()).await;
    assert_eq!(record.outcome, CallOutcome::Abandoned);

    // Greeting, one reprompt, then the closing line
    let mut spoken = 0;
    while playback_rx.try_recv().is_ok() {
        spoken += 1;
    }
    assert_eq!(spoken, 3);

    // The reprompt made it into the transcript
    assert!(record
        .transcript
        .iter()
        .any(|t| t.content.contains("still there")));
}

#[tokio::test]
async fn test_hangup_during_call_closes_record() {
    let store = Arc::new(InMemoryStore::new());
    let stt = ScriptedStt::new(&["Do you have anything on Friday?"]);
    let model = ScriptedModel::new(vec![AgentDecision::reply(
        "We're closed Fridays, but Saturday is open.",
    )]);

    let (frame_tx, mut frame_rx) = mpsc::channel(256);
    let (playback_tx, _playback_rx) = mpsc::channel(16);
    let session = session(model, stt, store, playback_tx);

    // One utterance, then the line goes dead
    tokio::spawn(async move {
        let mut sequence = 0;
        for _ in 0..33 {
            if frame_tx.send(frame(0.004, sequence)).await.is_err() {
                return;
            }
            sequence += 1;
        }
        for _ in 0..16 {
            if frame_tx.send(frame(0.05, sequence)).await.is_err() {
                return;
            }
            sequence += 1;
        }
        for _ in 0..20 {
            if frame_tx.send(frame(0.004, sequence)).await.is_err() {
                return;
            }
            sequence += 1;
        }
    });

    let record = session.run(&mut frame_rx, &CancellationToken::new()).await;
    assert_eq!(record.outcome, CallOutcome::Abandoned);
    assert!(record
        .transcript
        .iter()
        .any(|t| t.role == TurnRole::User && t.content.contains("Friday")));
}
