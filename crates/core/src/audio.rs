//! Audio frame and utterance types

use std::sync::Arc;
use std::time::{Duration, Instant};

/// PCM16 normalization constant for decoding
const PCM16_NORMALIZE: f32 = 32768.0;
/// PCM16 scaling constant for encoding
const PCM16_SCALE: f32 = 32767.0;

/// A short chunk of mono audio pulled off the input stream.
///
/// Samples are f32 normalized to [-1.0, 1.0]. Energy is computed once at
/// construction so VAD never rescans the samples.
#[derive(Clone)]
pub struct AudioFrame {
    /// Raw audio samples (f32, normalized to [-1.0, 1.0])
    pub samples: Arc<[f32]>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Frame sequence number for ordering
    pub sequence: u64,
    /// Timestamp when the frame was captured
    pub timestamp: Instant,
    /// Duration of this frame
    pub duration: Duration,
    /// Mean absolute amplitude of the frame
    pub energy: f32,
}

impl std::fmt::Debug for AudioFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioFrame")
            .field("samples_len", &self.samples.len())
            .field("sample_rate", &self.sample_rate)
            .field("sequence", &self.sequence)
            .field("duration", &self.duration)
            .field("energy", &self.energy)
            .finish()
    }
}

impl AudioFrame {
    /// Create a new audio frame from f32 samples
    pub fn new(samples: Vec<f32>, sample_rate: u32, sequence: u64) -> Self {
        let duration = Duration::from_secs_f64(samples.len() as f64 / sample_rate as f64);
        let energy = Self::mean_energy(&samples);

        Self {
            samples: samples.into(),
            sample_rate,
            sequence,
            timestamp: Instant::now(),
            duration,
            energy,
        }
    }

    /// Mean absolute amplitude, the energy measure the VAD thresholds against
    fn mean_energy(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().map(|s| s.abs()).sum::<f32>() / samples.len() as f32
    }

    /// Convert from PCM16 bytes (little-endian)
    pub fn from_pcm16(bytes: &[u8], sample_rate: u32, sequence: u64) -> Self {
        let samples: Vec<f32> = bytes
            .chunks_exact(2)
            .map(|chunk| {
                let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
                sample as f32 / PCM16_NORMALIZE
            })
            .collect();

        Self::new(samples, sample_rate, sequence)
    }

    /// Convert to PCM16 bytes (little-endian)
    pub fn to_pcm16(&self) -> Vec<u8> {
        pcm16_bytes(&self.samples)
    }

    /// Get duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }
}

/// Encode f32 samples as PCM16 little-endian bytes
pub fn pcm16_bytes(samples: &[f32]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|&sample| {
            let clamped = sample.clamp(-1.0, 1.0);
            let pcm16 = (clamped * PCM16_SCALE) as i16;
            pcm16.to_le_bytes()
        })
        .collect()
}

/// One caller utterance, as finalized by the capture state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Recorded samples, pre-speech padding included
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// True when recording hit the hard cap before trailing silence
    pub truncated: bool,
}

impl Utterance {
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Encode as PCM16 little-endian bytes
    pub fn to_pcm16(&self) -> Vec<u8> {
        pcm16_bytes(&self.samples)
    }
}
