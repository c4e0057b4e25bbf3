//! Call session
//!
//! One `CallSession` owns a call end to end: greeting, ambient calibration,
//! then the capture/transcribe/decide/speak loop until the caller is done
//! or gone. Per-turn failures are recovered with a spoken apology; only a
//! dead audio stream or cancellation ends the call early.

use std::sync::Arc;

use tokio::sync::mpsc::{Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use frontdesk_config::{BusinessProfile, Settings};
use frontdesk_core::{
    AudioFrame, CallOutcome, CallRecord, DecisionModel, SpeechToText, SynthesizedAudio,
    TextToSpeech,
};
use frontdesk_llm::build_system_prompt;
use frontdesk_pipeline::{PipelineError, SpeechCapture};
use frontdesk_tools::{Clock, ToolRegistry};

use crate::orchestrator::Orchestrator;
use crate::state::ConversationState;

const REPROMPT_LINE: &str = "Are you still there?";
const MISHEARD_LINE: &str = "Sorry, I didn't catch that. Could you say it again?";
const TROUBLE_LINE: &str = "I'm sorry, I'm having trouble on my end. Could you repeat that?";

/// Consecutive decision failures tolerated before giving up on the call
const MAX_CONSECUTIVE_FAILURES: u32 = 2;

pub struct CallSession {
    capture: SpeechCapture,
    stt: Arc<dyn SpeechToText>,
    tts: Arc<dyn TextToSpeech>,
    orchestrator: Orchestrator,
    profile: Arc<BusinessProfile>,
    system_prompt: String,
    playback: Sender<SynthesizedAudio>,
}

impl CallSession {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settings: &Settings,
        profile: Arc<BusinessProfile>,
        clock: Arc<dyn Clock>,
        stt: Arc<dyn SpeechToText>,
        tts: Arc<dyn TextToSpeech>,
        model: Arc<dyn DecisionModel>,
        registry: Arc<ToolRegistry>,
        playback: Sender<SynthesizedAudio>,
    ) -> Self {
        let system_prompt = build_system_prompt(&profile, &registry.definitions(), clock.today());
        Self {
            capture: SpeechCapture::new(settings.audio.clone(), settings.vad.clone()),
            stt,
            tts,
            orchestrator: Orchestrator::new(model, registry, settings.agent.max_decision_rounds),
            profile,
            system_prompt,
            playback,
        }
    }

    /// Run the call to completion and return its record
    pub async fn run(
        &self,
        frames: &mut Receiver<AudioFrame>,
        cancel: &CancellationToken,
    ) -> CallRecord {
        let mut state = ConversationState::new();
        info!(call_id = %state.call_id(), "call started");

        let greeting = self.profile.greeting_line();
        state.push_assistant(&greeting);
        self.speak(&greeting).await;

        let calibration = match self.capture.calibrate(frames, cancel).await {
            Ok(profile) => profile,
            Err(error) => {
                warn!(%error, "calibration aborted");
                return self.hang_up(state);
            },
        };

        let mut silent_turns = 0u32;
        let mut failed_turns = 0u32;

        loop {
            let utterance = match self.capture.capture_utterance(frames, calibration, cancel).await
            {
                Ok(utterance) => utterance,
                Err(PipelineError::NoSpeechDetected { waited }) => {
                    silent_turns += 1;
                    if silent_turns >= 2 {
                        info!(waited_secs = waited.as_secs(), "caller went silent, ending call");
                        state.mark_abandoned();
                        state.push_assistant(&self.profile.personality.closing);
                        self.speak(&self.profile.personality.closing).await;
                        break;
                    }
                    state.push_assistant(REPROMPT_LINE);
                    self.speak(REPROMPT_LINE).await;
                    continue;
                },
                Err(error) => {
                    warn!(%error, "audio stream ended");
                    return self.hang_up(state);
                },
            };
            silent_turns = 0;

            let transcript = match self.stt.transcribe(&utterance).await {
                Ok(transcript) => transcript,
                Err(error) => {
                    warn!(%error, "transcription failed");
                    state.push_assistant(MISHEARD_LINE);
                    self.speak(MISHEARD_LINE).await;
                    continue;
                },
            };
            if transcript.is_empty() {
                state.push_assistant(MISHEARD_LINE);
                self.speak(MISHEARD_LINE).await;
                continue;
            }
            info!(text = %transcript.text, truncated = utterance.truncated, "caller turn");
            state.push_user(&transcript.text);

            match self.orchestrator.run_turn(&self.system_prompt, &mut state).await {
                Ok(reply) => {
                    failed_turns = 0;
                    self.speak(&reply.text).await;
                    if reply.done {
                        break;
                    }
                },
                Err(error) => {
                    warn!(%error, "turn failed");
                    failed_turns += 1;
                    if failed_turns >= MAX_CONSECUTIVE_FAILURES {
                        state.push_assistant(&self.profile.personality.closing);
                        self.speak(&self.profile.personality.closing).await;
                        break;
                    }
                    state.push_assistant(TROUBLE_LINE);
                    self.speak(TROUBLE_LINE).await;
                },
            }
        }

        let record = state.finish();
        info!(
            call_id = %record.id,
            outcome = record.outcome.as_str(),
            turns = record.transcript.len(),
            "call ended"
        );
        record
    }

    /// The caller disappeared mid-call; close out whatever we have
    fn hang_up(&self, mut state: ConversationState) -> CallRecord {
        if state.outcome() == CallOutcome::Inquiry {
            state.mark_abandoned();
        }
        let record = state.finish();
        info!(call_id = %record.id, outcome = record.outcome.as_str(), "call ended early");
        record
    }

    async fn speak(&self, text: &str) {
        match self.tts.synthesize(text).await {
            Ok(audio) => {
                if self.playback.send(audio).await.is_err() {
                    warn!("playback channel closed, reply not spoken");
                }
            },
            Err(error) => warn!(%error, "synthesis failed, reply not spoken"),
        }
    }
}
