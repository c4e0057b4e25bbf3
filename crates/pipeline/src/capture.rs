//! Async capture driver
//!
//! Pulls frames off the bounded channel fed by the audio producer and
//! drives the calibration and recording state machines. Cancellation is
//! checked at every frame boundary.

use std::time::Duration;

use tokio::sync::mpsc::Receiver;
use tokio::time::{timeout_at, Instant};
use tokio_util::sync::CancellationToken;

use frontdesk_config::{AudioConfig, VadConfig};
use frontdesk_core::{AudioFrame, Utterance};

use crate::error::PipelineError;
use crate::vad::{CalibrationProfile, Calibrator, CaptureProgress, UtteranceRecorder};

/// Drives VAD capture over a live frame stream
pub struct SpeechCapture {
    audio: AudioConfig,
    vad: VadConfig,
}

impl SpeechCapture {
    pub fn new(audio: AudioConfig, vad: VadConfig) -> Self {
        Self { audio, vad }
    }

    /// Measure the ambient window and freeze the call's thresholds
    pub async fn calibrate(
        &self,
        frames: &mut Receiver<AudioFrame>,
        cancel: &CancellationToken,
    ) -> Result<CalibrationProfile, PipelineError> {
        let mut calibrator = Calibrator::new(&self.vad);

        loop {
            let frame = next_frame(frames, cancel).await?;
            if let Some(ambient) = calibrator.push(&frame) {
                let profile = CalibrationProfile::from_ambient(ambient, &self.vad);
                tracing::info!(
                    ambient_energy = profile.ambient_energy,
                    start_threshold = profile.start_threshold,
                    stop_threshold = profile.stop_threshold,
                    "vad calibrated"
                );
                return Ok(profile);
            }
        }
    }

    /// Capture one utterance, waiting at most the configured window for
    /// speech to start
    pub async fn capture_utterance(
        &self,
        frames: &mut Receiver<AudioFrame>,
        profile: CalibrationProfile,
        cancel: &CancellationToken,
    ) -> Result<Utterance, PipelineError> {
        let mut recorder = UtteranceRecorder::new(profile, &self.audio);
        let wait = Duration::from_secs_f32(self.audio.speech_wait_timeout_sec);
        let wait_deadline = Instant::now() + wait;

        loop {
            // The wait deadline only applies before speech starts; once
            // recording, the hard cap inside the recorder bounds us.
            let frame = if recorder.is_waiting() {
                match timeout_at(wait_deadline, next_frame(frames, cancel)).await {
                    Ok(result) => result?,
                    Err(_) => return Err(PipelineError::NoSpeechDetected { waited: wait }),
                }
            } else {
                next_frame(frames, cancel).await?
            };

            match recorder.push(frame) {
                CaptureProgress::SpeechStarted => {
                    tracing::debug!("speech started");
                },
                CaptureProgress::Finalized(utterance) => {
                    tracing::debug!(
                        duration_ms = utterance.duration().as_millis() as u64,
                        truncated = utterance.truncated,
                        "utterance finalized"
                    );
                    return Ok(utterance);
                },
                CaptureProgress::Waiting | CaptureProgress::Recording => {},
            }
        }
    }
}

async fn next_frame(
    frames: &mut Receiver<AudioFrame>,
    cancel: &CancellationToken,
) -> Result<AudioFrame, PipelineError> {
    tokio::select! {
        _ = cancel.cancelled() => Err(PipelineError::Cancelled),
        frame = frames.recv() => frame.ok_or(PipelineError::AudioStreamClosed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn quick_audio() -> AudioConfig {
        let mut audio = AudioConfig::default();
        audio.speech_wait_timeout_sec = 0.2;
        audio
    }

    fn frame(energy: f32, seq: u64) -> AudioFrame {
        AudioFrame::new(vec![energy; 1024], 16000, seq)
    }

    #[tokio::test]
    async fn test_calibrate_consumes_ambient_window() {
        let capture = SpeechCapture::new(AudioConfig::default(), VadConfig::default());
        let (tx, mut rx) = mpsc::channel(64);
        let cancel = CancellationToken::new();

        tokio::spawn(async move {
            for seq in 0..40 {
                if tx.send(frame(0.004, seq)).await.is_err() {
                    break;
                }
            }
        });

        let profile = capture.calibrate(&mut rx, &cancel).await.unwrap();
        // 2x 0.004 is below the floor, so the floor wins
        assert_eq!(profile.start_threshold, 0.010);
    }

    #[tokio::test]
    async fn test_no_speech_times_out() {
        let capture = SpeechCapture::new(quick_audio(), VadConfig::default());
        let (tx, mut rx) = mpsc::channel(64);
        let cancel = CancellationToken::new();
        let profile = CalibrationProfile::from_ambient(0.01, &VadConfig::default());

        tokio::spawn(async move {
            let mut seq = 0;
            loop {
                if tx.send(frame(0.001, seq)).await.is_err() {
                    break;
                }
                seq += 1;
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        });

        let result = capture.capture_utterance(&mut rx, profile, &cancel).await;
        assert!(matches!(result, Err(PipelineError::NoSpeechDetected { .. })));
    }

    #[tokio::test]
    async fn test_capture_full_utterance() {
        let capture = SpeechCapture::new(quick_audio(), VadConfig::default());
        let (tx, mut rx) = mpsc::channel(512);
        let cancel = CancellationToken::new();
        let profile = CalibrationProfile::from_ambient(0.01, &VadConfig::default());

        tokio::spawn(async move {
            let mut seq = 0;
            // Speech for ~1s, then silence past the trailing window
            for _ in 0..16 {
                let _ = tx.send(frame(0.05, seq)).await;
                seq += 1;
            }
            for _ in 0..20 {
                let _ = tx.send(frame(0.001, seq)).await;
                seq += 1;
            }
        });

        let utterance = capture
            .capture_utterance(&mut rx, profile, &cancel)
            .await
            .unwrap();
        assert!(!utterance.truncated);
        assert!(utterance.duration() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_cancellation_stops_capture() {
        let capture = SpeechCapture::new(quick_audio(), VadConfig::default());
        let (_tx, mut rx) = mpsc::channel::<AudioFrame>(8);
        let cancel = CancellationToken::new();
        let profile = CalibrationProfile::from_ambient(0.01, &VadConfig::default());

        cancel.cancel();
        let result = capture.capture_utterance(&mut rx, profile, &cancel).await;
        assert!(matches!(result, Err(PipelineError::Cancelled)));
    }

    #[tokio::test]
    async fn test_closed_channel_reported() {
        let capture = SpeechCapture::new(quick_audio(), VadConfig::default());
        let (tx, mut rx) = mpsc::channel::<AudioFrame>(8);
        let cancel = CancellationToken::new();

        drop(tx);
        let result = capture.calibrate(&mut rx, &cancel).await;
        assert!(matches!(result, Err(PipelineError::AudioStreamClosed)));
    }
}
