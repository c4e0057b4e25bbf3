//! Microphone capture and speaker playback via cpal
//!
//! Capture runs at the device's native rate, downmixes to mono, resamples
//! to the pipeline rate, and re-chunks into fixed-size analysis frames.
//! The audio callback never blocks; when the frame channel is full the
//! frame is dropped.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::StreamConfig;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use frontdesk_config::AudioConfig;
use frontdesk_core::{AudioFrame, SynthesizedAudio};

#[derive(Debug, Error)]
pub enum AudioIoError {
    #[error("audio device error: {0}")]
    Device(String),

    #[error("audio stream error: {0}")]
    Stream(String),
}

/// Microphone capture feeding the analysis frame channel
pub struct Microphone {
    device: cpal::Device,
    stream_config: StreamConfig,
    target_rate: u32,
    frame_samples: usize,
}

impl Microphone {
    pub fn new(config: &AudioConfig) -> Result<Self, AudioIoError> {
        let host = cpal::default_host();

        let device = if let Some(name) = &config.input_device {
            host.input_devices()
                .map_err(|e| AudioIoError::Device(format!("cannot enumerate devices: {e}")))?
                .find(|d| {
                    d.description()
                        .ok()
                        .map(|desc| desc.name() == name)
                        .unwrap_or(false)
                })
                .ok_or_else(|| AudioIoError::Device(format!("input device '{name}' not found")))?
        } else {
            host.default_input_device()
                .ok_or_else(|| AudioIoError::Device("no default input device".into()))?
        };

        let device_name = device
            .description()
            .map(|d| d.name().to_owned())
            .unwrap_or_else(|_| "<unknown>".into());

        let default_config = device
            .default_input_config()
            .map_err(|e| AudioIoError::Device(format!("no default input config: {e}")))?;
        let native_rate = default_config.sample_rate();
        let native_channels = default_config.channels();

        info!(
            device = %device_name,
            native_rate,
            native_channels,
            target_rate = config.sample_rate,
            "input device ready"
        );

        Ok(Self {
            device,
            stream_config: StreamConfig {
                channels: native_channels,
                sample_rate: native_rate,
                buffer_size: cpal::BufferSize::Default,
            },
            target_rate: config.sample_rate,
            frame_samples: config.frame_samples(),
        })
    }

    /// Run the capture stream until cancelled
    pub async fn run(
        &self,
        tx: Sender<AudioFrame>,
        cancel: CancellationToken,
    ) -> Result<(), AudioIoError> {
        // Conversion state lives on the audio thread
        let mut assembler = FrameAssembler::new(
            self.stream_config.channels,
            self.stream_config.sample_rate,
            self.target_rate,
            self.frame_samples,
        );

        let stream = self
            .device
            .build_input_stream(
                &self.stream_config,
                move |data: &[f32], _info: &cpal::InputCallbackInfo| {
                    assembler.push(data, |frame| {
                        if tx.try_send(frame).is_err() {
                            debug!("frame channel full, dropping frame");
                        }
                    });
                },
                move |err| {
                    error!("input stream error: {err}");
                },
                None,
            )
            .map_err(|e| AudioIoError::Stream(format!("failed to build input stream: {e}")))?;

        stream
            .play()
            .map_err(|e| AudioIoError::Stream(format!("failed to start input stream: {e}")))?;

        cancel.cancelled().await;
        drop(stream);
        info!("audio capture stopped");
        Ok(())
    }
}

/// Speaker playback for synthesized replies
pub struct Speaker {
    device: cpal::Device,
}

impl Speaker {
    pub fn new(config: &AudioConfig) -> Result<Self, AudioIoError> {
        let host = cpal::default_host();

        let device = if let Some(name) = &config.output_device {
            host.output_devices()
                .map_err(|e| AudioIoError::Device(format!("cannot enumerate devices: {e}")))?
                .find(|d| {
                    d.description()
                        .ok()
                        .map(|desc| desc.name() == name)
                        .unwrap_or(false)
                })
                .ok_or_else(|| AudioIoError::Device(format!("output device '{name}' not found")))?
        } else {
            host.default_output_device()
                .ok_or_else(|| AudioIoError::Device("no default output device".into()))?
        };

        let device_name = device
            .description()
            .map(|d| d.name().to_owned())
            .unwrap_or_else(|_| "<unknown>".into());
        info!(device = %device_name, "output device ready");

        Ok(Self { device })
    }

    /// Play one reply to completion; blocks the calling thread
    pub fn play(&self, audio: &SynthesizedAudio) -> Result<(), AudioIoError> {
        let stream_config = StreamConfig {
            channels: 1,
            sample_rate: audio.sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        let buffer = Arc::new(Mutex::new(PlaybackBuffer {
            samples: audio.samples.clone(),
            position: 0,
            finished: false,
        }));
        let callback_buffer = Arc::clone(&buffer);

        let stream = self
            .device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                    let mut buf = match callback_buffer.lock() {
                        Ok(buf) => buf,
                        Err(_) => return,
                    };
                    for sample in data.iter_mut() {
                        if buf.position < buf.samples.len() {
                            *sample = buf.samples[buf.position];
                            buf.position += 1;
                        } else {
                            *sample = 0.0;
                            buf.finished = true;
                        }
                    }
                },
                move |err| {
                    error!("output stream error: {err}");
                },
                None,
            )
            .map_err(|e| AudioIoError::Stream(format!("failed to build output stream: {e}")))?;

        stream
            .play()
            .map_err(|e| AudioIoError::Stream(format!("failed to start output stream: {e}")))?;

        loop {
            std::thread::sleep(std::time::Duration::from_millis(10));
            let buf = buffer
                .lock()
                .map_err(|e| AudioIoError::Stream(format!("playback buffer poisoned: {e}")))?;
            if buf.finished {
                break;
            }
        }

        drop(stream);
        Ok(())
    }

    /// Drain the playback channel on a dedicated thread, playing each
    /// reply to completion before the next
    pub fn run(self, mut replies: Receiver<SynthesizedAudio>) -> std::thread::JoinHandle<()> {
        std::thread::spawn(move || {
            while let Some(audio) = replies.blocking_recv() {
                if let Err(error) = self.play(&audio) {
                    warn!(%error, "playback failed");
                }
            }
            info!("playback stopped");
        })
    }
}

struct PlaybackBuffer {
    samples: Vec<f32>,
    position: usize,
    finished: bool,
}

/// Turns interleaved device buffers into fixed-size mono frames at the
/// pipeline rate, in a single pass per buffer.
///
/// The linear interpolator (adequate for speech, which carries no energy
/// near the downsampled Nyquist limit) keeps its fractional position and
/// last sample across buffers, so output timing does not depend on how
/// the device sizes its callbacks.
struct FrameAssembler {
    channels: usize,
    /// Source samples per output sample
    step: f64,
    /// Offset of the next output, in source samples past `previous`
    position: f64,
    previous: f32,
    pending: Vec<f32>,
    frame_samples: usize,
    sample_rate: u32,
    sequence: u64,
}

impl FrameAssembler {
    fn new(channels: u16, src_rate: u32, dst_rate: u32, frame_samples: usize) -> Self {
        Self {
            channels: channels as usize,
            step: src_rate as f64 / dst_rate as f64,
            // Start one sample in so the first output is the first sample
            position: 1.0,
            previous: 0.0,
            pending: Vec::with_capacity(frame_samples * 2),
            frame_samples,
            sample_rate: dst_rate,
            sequence: 0,
        }
    }

    /// Feed one device buffer, handing every completed frame to `emit`
    fn push(&mut self, data: &[f32], mut emit: impl FnMut(AudioFrame)) {
        for interleaved in data.chunks_exact(self.channels) {
            let sample = interleaved.iter().sum::<f32>() / self.channels as f32;

            while self.position < 1.0 {
                let frac = self.position as f32;
                self.pending.push(self.previous + (sample - self.previous) * frac);
                self.position += self.step;
            }
            self.position -= 1.0;
            self.previous = sample;

            while self.pending.len() >= self.frame_samples {
                let chunk: Vec<f32> = self.pending.drain(..self.frame_samples).collect();
                let frame = AudioFrame::new(chunk, self.sample_rate, self.sequence);
                self.sequence += 1;
                emit(frame);
            }
        }
    }
}
