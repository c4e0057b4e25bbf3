//! Frontdesk entry point
//!
//! Wires the microphone and speakers to one call session: load settings
//! and the business profile, stand up the speech and dialog backends,
//! then run the call until the caller is done or Ctrl-C.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use frontdesk_agent::CallSession;
use frontdesk_config::{load_settings, BusinessProfile, Settings};
use frontdesk_pipeline::{OpenAiTts, WhisperStt};
use frontdesk_tools::{appointment_registry, Clock, InMemoryStore, ToolContext, ZoneClock};

mod audio;

use audio::{Microphone, Speaker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("FRONTDESK_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(error) => {
            // Tracing is not up yet
            eprintln!("failed to load config ({error}), using defaults");
            Settings::default()
        },
    };

    init_tracing();
    settings.validate()?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting frontdesk");

    let profile = Arc::new(BusinessProfile::load(&settings.business_config_path)?);
    info!(
        business = %profile.name,
        services = profile.services.len(),
        staff = profile.staff.len(),
        "business profile loaded"
    );

    let clock: Arc<dyn Clock> = match ZoneClock::for_zone(&settings.timezone) {
        Some(clock) => Arc::new(clock),
        None => {
            warn!(timezone = %settings.timezone, "unknown timezone, falling back to UTC");
            Arc::new(ZoneClock::utc())
        },
    };

    let store = Arc::new(InMemoryStore::new());
    let context = ToolContext::new(store, profile.clone(), clock.clone());
    let registry = Arc::new(appointment_registry(context));

    let stt = Arc::new(WhisperStt::new(&settings.models)?);
    let tts = Arc::new(OpenAiTts::new(&settings.models)?);
    let model = Arc::new(frontdesk_llm::OpenAiDecisionModel::new(&settings.models)?);
    info!(dialog_model = model.model_name(), "backends ready");

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            signal_cancel.cancel();
        }
    });

    let (frame_tx, mut frame_rx) = mpsc::channel(256);
    let (reply_tx, reply_rx) = mpsc::channel(16);

    let microphone = Microphone::new(&settings.audio)?;
    let speaker = Speaker::new(&settings.audio)?;
    let playback = speaker.run(reply_rx);

    let capture_cancel = cancel.clone();
    let capture = tokio::spawn(async move { microphone.run(frame_tx, capture_cancel).await });

    let session = CallSession::new(
        &settings,
        profile,
        clock,
        stt,
        tts,
        model,
        registry,
        reply_tx,
    );
    let record = session.run(&mut frame_rx, &cancel).await;

    println!();
    println!("Call {} ended: {}", record.id, record.outcome.as_str());
    for turn in &record.transcript {
        println!("  [{}] {}", turn.role, turn.content);
    }

    cancel.cancel();
    if let Ok(Err(error)) = capture.await {
        warn!(%error, "capture ended with error");
    }
    drop(session);
    if playback.join().is_err() {
        warn!("playback thread panicked");
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
