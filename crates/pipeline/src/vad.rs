//! Energy-based voice activity detection
//!
//! Per-call flow: a short ambient window is averaged into a
//! [`CalibrationProfile`] whose thresholds stay frozen for the rest of the
//! call. The [`UtteranceRecorder`] then runs a two-state machine over
//! incoming frames: wait for energy to cross the start threshold, record
//! until enough trailing frames fall below the lower stop threshold or the
//! hard cap is hit. The gap between the two thresholds keeps mid-sentence
//! dips from chopping the utterance.

use std::collections::VecDeque;
use std::time::Duration;

use frontdesk_config::{AudioConfig, VadConfig};
use frontdesk_core::{AudioFrame, Utterance};

/// Seconds of audio kept before the triggering frame
const PRE_ROLL_SEC: f32 = 0.2;

/// Per-call VAD thresholds, frozen after calibration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationProfile {
    /// Mean frame energy of the ambient window
    pub ambient_energy: f32,
    /// Energy a frame must exceed to start a recording
    pub start_threshold: f32,
    /// Energy a frame must stay under to count as trailing silence
    pub stop_threshold: f32,
}

impl CalibrationProfile {
    /// Derive thresholds from a measured ambient energy
    pub fn from_ambient(ambient_energy: f32, vad: &VadConfig) -> Self {
        let start_threshold =
            (ambient_energy * vad.ambient_multiplier).clamp(vad.energy_floor, vad.energy_ceil);
        Self {
            ambient_energy,
            start_threshold,
            stop_threshold: start_threshold * vad.stop_threshold_ratio,
        }
    }
}

/// Accumulates the ambient window at call start
#[derive(Debug)]
pub struct Calibrator {
    target: Duration,
    accumulated: Duration,
    energy_sum: f64,
    frames: u64,
}

impl Calibrator {
    pub fn new(vad: &VadConfig) -> Self {
        Self {
            target: Duration::from_secs_f32(vad.calibration_duration_sec),
            accumulated: Duration::ZERO,
            energy_sum: 0.0,
            frames: 0,
        }
    }

    /// Feed one frame; returns the ambient energy once the window is full
    pub fn push(&mut self, frame: &AudioFrame) -> Option<f32> {
        self.energy_sum += frame.energy as f64;
        self.frames += 1;
        self.accumulated += frame.duration;

        if self.accumulated >= self.target {
            Some((self.energy_sum / self.frames as f64) as f32)
        } else {
            None
        }
    }
}

/// Capture state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum CaptureState {
    /// No speech yet; buffering pre-roll
    #[default]
    WaitingForSpeech,
    /// Speech started; accumulating samples
    Recording,
}

/// Recorder progress after one frame
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureProgress {
    /// Still waiting for the start threshold
    Waiting,
    /// This frame crossed the start threshold
    SpeechStarted,
    /// Recording continues
    Recording,
    /// Utterance finalized
    Finalized(Utterance),
}

/// Two-state utterance capture machine
#[derive(Debug)]
pub struct UtteranceRecorder {
    profile: CalibrationProfile,
    sample_rate: u32,
    silence_window: Duration,
    record_max: Duration,
    state: CaptureState,
    pre_roll: VecDeque<AudioFrame>,
    pre_roll_duration: Duration,
    samples: Vec<f32>,
    recorded: Duration,
    trailing_silence: Duration,
}

impl UtteranceRecorder {
    pub fn new(profile: CalibrationProfile, audio: &AudioConfig) -> Self {
        Self {
            profile,
            sample_rate: audio.sample_rate,
            silence_window: Duration::from_secs_f32(audio.silence_duration_sec),
            record_max: Duration::from_secs_f32(audio.record_max_seconds),
            state: CaptureState::default(),
            pre_roll: VecDeque::new(),
            pre_roll_duration: Duration::ZERO,
            samples: Vec::new(),
            recorded: Duration::ZERO,
            trailing_silence: Duration::ZERO,
        }
    }

    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    /// True until the start threshold has been crossed
    pub fn is_waiting(&self) -> bool {
        self.state == CaptureState::WaitingForSpeech
    }

    /// Feed one frame through the state machine
    pub fn push(&mut self, frame: AudioFrame) -> CaptureProgress {
        match self.state {
            CaptureState::WaitingForSpeech => {
                if frame.energy >= self.profile.start_threshold {
                    self.begin_recording(frame);
                    CaptureProgress::SpeechStarted
                } else {
                    self.buffer_pre_roll(frame);
                    CaptureProgress::Waiting
                }
            },
            CaptureState::Recording => {
                self.recorded += frame.duration;
                if frame.energy < self.profile.stop_threshold {
                    self.trailing_silence += frame.duration;
                } else {
                    self.trailing_silence = Duration::ZERO;
                }
                self.samples.extend(frame.samples.iter());

                if self.trailing_silence >= self.silence_window {
                    CaptureProgress::Finalized(self.finalize(false))
                } else if self.recorded >= self.record_max {
                    CaptureProgress::Finalized(self.finalize(true))
                } else {
                    CaptureProgress::Recording
                }
            },
        }
    }

    fn begin_recording(&mut self, frame: AudioFrame) {
        self.state = CaptureState::Recording;
        self.samples.clear();
        for buffered in self.pre_roll.drain(..) {
            self.samples.extend(buffered.samples.iter());
        }
        self.pre_roll_duration = Duration::ZERO;
        self.recorded = frame.duration;
        self.trailing_silence = Duration::ZERO;
        self.samples.extend(frame.samples.iter());
    }

    fn buffer_pre_roll(&mut self, frame: AudioFrame) {
        self.pre_roll_duration += frame.duration;
        self.pre_roll.push_back(frame);

        let limit = Duration::from_secs_f32(PRE_ROLL_SEC);
        while self.pre_roll_duration > limit {
            match self.pre_roll.pop_front() {
                Some(dropped) => self.pre_roll_duration -= dropped.duration,
                None => break,
            }
        }
    }

    fn finalize(&mut self, truncated: bool) -> Utterance {
        self.state = CaptureState::WaitingForSpeech;
        self.recorded = Duration::ZERO;
        self.trailing_silence = Duration::ZERO;
        Utterance {
            samples: std::mem::take(&mut self.samples),
            sample_rate: self.sample_rate,
            truncated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vad_config() -> VadConfig {
        VadConfig::default()
    }

    fn audio_config() -> AudioConfig {
        AudioConfig::default()
    }

    fn frame(energy: f32, samples: usize, seq: u64) -> AudioFrame {
        // Constant-amplitude frame so mean absolute energy equals `energy`
        AudioFrame::new(vec![energy; samples], 16000, seq)
    }

    #[test]
    fn test_threshold_clamping() {
        let vad = vad_config();

        // Quiet room: 2x ambient below the floor gets clamped up
        let quiet = CalibrationProfile::from_ambient(0.001, &vad);
        assert_eq!(quiet.start_threshold, vad.energy_floor);

        // Loud room: 2x ambient above the ceiling gets clamped down
        let loud = CalibrationProfile::from_ambient(0.5, &vad);
        assert_eq!(loud.start_threshold, vad.energy_ceil);

        // In-range ambient is scaled, not clamped
        let mid = CalibrationProfile::from_ambient(0.015, &vad);
        assert!((mid.start_threshold - 0.030).abs() < 1e-6);
        assert!((mid.stop_threshold - 0.030 * 0.70).abs() < 1e-6);
    }

    #[test]
    fn test_stop_threshold_is_below_start() {
        let profile = CalibrationProfile::from_ambient(0.02, &vad_config());
        assert!(profile.stop_threshold < profile.start_threshold);
    }

    #[test]
    fn test_calibrator_averages_ambient_window() {
        let mut calibrator = Calibrator::new(&vad_config());
        let frame_samples = 1024; // 64ms at 16kHz

        let mut result = None;
        let mut seq = 0;
        while result.is_none() {
            // Alternate two energies; mean should land between them
            let energy = if seq % 2 == 0 { 0.010 } else { 0.020 };
            result = calibrator.push(&frame(energy, frame_samples, seq));
            seq += 1;
        }

        let ambient = result.unwrap();
        assert!(ambient > 0.010 && ambient < 0.020);
        // 2s of 64ms frames
        assert!(seq >= 31);
    }

    #[test]
    fn test_recorder_waits_below_start_threshold() {
        let profile = CalibrationProfile::from_ambient(0.015, &vad_config());
        let mut recorder = UtteranceRecorder::new(profile, &audio_config());

        // Between stop and start threshold: must not trigger
        let progress = recorder.push(frame(0.025, 1024, 0));
        assert_eq!(progress, CaptureProgress::Waiting);
        assert!(recorder.is_waiting());
    }

    #[test]
    fn test_recorder_triggers_at_exact_start_threshold() {
        // 0.5 sums exactly over a power-of-two frame, so the frame energy
        // equals the threshold bit for bit
        let profile = CalibrationProfile {
            ambient_energy: 0.25,
            start_threshold: 0.5,
            stop_threshold: 0.35,
        };
        let mut recorder = UtteranceRecorder::new(profile, &audio_config());

        let progress = recorder.push(frame(0.5, 1024, 0));
        assert_eq!(progress, CaptureProgress::SpeechStarted);
        assert!(!recorder.is_waiting());
    }

    #[test]
    fn test_recorder_finalizes_on_trailing_silence() {
        let profile = CalibrationProfile::from_ambient(0.015, &vad_config());
        let audio = audio_config();
        let mut recorder = UtteranceRecorder::new(profile, &audio);
        let frame_samples = audio.frame_samples();

        let mut seq = 0;
        assert_eq!(
            recorder.push(frame(0.04, frame_samples, seq)),
            CaptureProgress::SpeechStarted
        );

        // Speech for ~0.5s
        for _ in 0..8 {
            seq += 1;
            assert_eq!(
                recorder.push(frame(0.04, frame_samples, seq)),
                CaptureProgress::Recording
            );
        }

        // Silence until the 1s window elapses
        let utterance = loop {
            seq += 1;
            match recorder.push(frame(0.001, frame_samples, seq)) {
                CaptureProgress::Recording => continue,
                CaptureProgress::Finalized(u) => break u,
                other => panic!("unexpected progress: {:?}", other),
            }
        };

        assert!(!utterance.truncated);
        // Speech plus the trailing silence window
        assert!(utterance.duration() >= Duration::from_millis(1500));
    }

    #[test]
    fn test_mid_utterance_dip_does_not_finalize() {
        let profile = CalibrationProfile::from_ambient(0.015, &vad_config());
        let audio = audio_config();
        let mut recorder = UtteranceRecorder::new(profile, &audio);
        let frame_samples = audio.frame_samples();

        recorder.push(frame(0.04, frame_samples, 0));

        // A 0.5s dip, shorter than the silence window
        for seq in 1..9 {
            assert_eq!(
                recorder.push(frame(0.001, frame_samples, seq)),
                CaptureProgress::Recording
            );
        }

        // Speech resumes; trailing silence counter must reset
        assert_eq!(
            recorder.push(frame(0.04, frame_samples, 9)),
            CaptureProgress::Recording
        );
        assert_eq!(recorder.trailing_silence, Duration::ZERO);
    }

    #[test]
    fn test_hard_cap_truncates() {
        let profile = CalibrationProfile::from_ambient(0.015, &vad_config());
        let audio = audio_config();
        let mut recorder = UtteranceRecorder::new(profile, &audio);
        let frame_samples = audio.frame_samples();

        recorder.push(frame(0.04, frame_samples, 0));

        // Continuous speech until the 15s cap
        let mut seq = 1;
        let utterance = loop {
            match recorder.push(frame(0.04, frame_samples, seq)) {
                CaptureProgress::Recording => seq += 1,
                CaptureProgress::Finalized(u) => break u,
                other => panic!("unexpected progress: {:?}", other),
            }
            assert!(seq < 300, "cap never hit");
        };

        assert!(utterance.truncated);
        assert!(utterance.duration() >= Duration::from_secs(15));
    }

    #[test]
    fn test_pre_roll_is_included_and_bounded() {
        let profile = CalibrationProfile::from_ambient(0.015, &vad_config());
        let audio = audio_config();
        let mut recorder = UtteranceRecorder::new(profile, &audio);
        let frame_samples = audio.frame_samples();

        // A long quiet lead-in; only the tail should be retained
        for seq in 0..20 {
            recorder.push(frame(0.001, frame_samples, seq));
        }
        recorder.push(frame(0.04, frame_samples, 20));

        let buffered = recorder.samples.len();
        let max_expected =
            frame_samples + (16000.0 * PRE_ROLL_SEC) as usize + frame_samples;
        assert!(buffered > frame_samples, "pre-roll missing");
        assert!(buffered <= max_expected, "pre-roll unbounded: {}", buffered);
    }
}
