use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_VOLUME: f32 = 0.35;

/// Result of asking the transport to start. `Blocked` is recoverable: the
/// caller retries on the next user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    Blocked,
}

pub trait MediaTransport {
    fn play(&mut self) -> PlayOutcome;
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn set_volume(&mut self, volume: f32);
    fn rewind(&mut self);
}

/// Transport used when no music is configured. Tracks state only.
pub struct SilentTransport {
    paused: bool,
    volume: f32,
}

impl SilentTransport {
    pub fn new() -> Self {
        Self {
            paused: true,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl MediaTransport for SilentTransport {
    fn play(&mut self) -> PlayOutcome {
        self.paused = false;
        PlayOutcome::Started
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn rewind(&mut self) {}
}

/// Decoded WAV data shared with the audio callback.
struct Track {
    samples: Vec<f32>,
    channels: usize,
    rate: u32,
    paused: AtomicBool,
    volume: AtomicU32,
    cursor: AtomicU64,
}

impl Track {
    fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1)
    }

    fn sample(&self, frame: usize, channel: usize) -> f32 {
        let channel = channel.min(self.channels - 1);
        self.samples
            .get(frame * self.channels + channel)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Loops a WAV file on the default output device.
pub struct WavTransport {
    track: Arc<Track>,
    stream: Option<cpal::Stream>,
}

impl WavTransport {
    pub fn open(path: &Path) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)
            .with_context(|| format!("Could not open music file {}", path.display()))?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let max = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max))
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        if samples.is_empty() || spec.channels == 0 {
            return Err(anyhow!("music file {} has no audio", path.display()));
        }

        info!(
            path = %path.display(),
            channels = spec.channels,
            rate = spec.sample_rate,
            "music loaded"
        );

        Ok(Self {
            track: Arc::new(Track {
                samples,
                channels: spec.channels as usize,
                rate: spec.sample_rate,
                paused: AtomicBool::new(true),
                volume: AtomicU32::new(DEFAULT_VOLUME.to_bits()),
                cursor: AtomicU64::new(0f64.to_bits()),
            }),
            stream: None,
        })
    }

    fn build_stream(&self) -> Result<cpal::Stream> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no audio output device"))?;
        let supported = device.default_output_config()?;
        let format = supported.sample_format();
        let config = supported.config();

        match format {
            cpal::SampleFormat::F32 => self.stream_for::<f32>(&device, &config),
            cpal::SampleFormat::I16 => self.stream_for::<i16>(&device, &config),
            cpal::SampleFormat::U16 => self.stream_for::<u16>(&device, &config),
            other => Err(anyhow!("unsupported sample format {other:?}")),
        }
    }

    fn stream_for<T>(&self, device: &cpal::Device, config: &cpal::StreamConfig) -> Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let track = Arc::clone(&self.track);
        let out_channels = config.channels as usize;
        let step = track.rate as f64 / config.sample_rate.0 as f64;
        let frames = track.frames() as f64;

        let stream = device.build_output_stream(
            config,
            move |out: &mut [T], _: &cpal::OutputCallbackInfo| {
                let paused = track.paused.load(Ordering::Relaxed);
                let volume = f32::from_bits(track.volume.load(Ordering::Relaxed));
                let mut pos = f64::from_bits(track.cursor.load(Ordering::Relaxed));

                for frame in out.chunks_mut(out_channels) {
                    for (channel, sample) in frame.iter_mut().enumerate() {
                        let value = if paused {
                            0.0
                        } else {
                            track.sample(pos as usize, channel) * volume
                        };
                        *sample = T::from_sample(value);
                    }
                    if !paused {
                        pos += step;
                        if pos >= frames {
                            pos -= frames;
                        }
                    }
                }

                track.cursor.store(pos.to_bits(), Ordering::Relaxed);
            },
            |err| warn!(error = %err, "audio stream error"),
            None,
        )?;
        Ok(stream)
    }
}

impl MediaTransport for WavTransport {
    fn play(&mut self) -> PlayOutcome {
        if self.stream.is_none() {
            match self.build_stream() {
                Ok(stream) => self.stream = Some(stream),
                Err(e) => {
                    warn!(error = %e, "music blocked");
                    return PlayOutcome::Blocked;
                }
            }
        }

        if let Some(stream) = &self.stream {
            if let Err(e) = stream.play() {
                warn!(error = %e, "music blocked");
                return PlayOutcome::Blocked;
            }
        }

        self.track.paused.store(false, Ordering::Relaxed);
        PlayOutcome::Started
    }

    fn pause(&mut self) {
        self.track.paused.store(true, Ordering::Relaxed);
        if let Some(stream) = &self.stream {
            if let Err(e) = stream.pause() {
                warn!(error = %e, "could not pause audio stream");
            }
        }
    }

    fn is_paused(&self) -> bool {
        self.track.paused.load(Ordering::Relaxed)
    }

    fn set_volume(&mut self, volume: f32) {
        self.track
            .volume
            .store(volume.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    fn rewind(&mut self) {
        self.track.cursor.store(0f64.to_bits(), Ordering::Relaxed);
    }
}

/// Transport whose play results are scripted, for tests.
#[cfg(test)]
#[derive(Default)]
pub struct ScriptedTransport {
    pub outcomes: std::collections::VecDeque<PlayOutcome>,
    pub play_calls: usize,
    pub pause_calls: usize,
    pub rewinds: usize,
    pub volume: f32,
    pub paused: bool,
}

#[cfg(test)]
impl MediaTransport for ScriptedTransport {
    fn play(&mut self) -> PlayOutcome {
        self.play_calls += 1;
        let outcome = self.outcomes.pop_front().unwrap_or(PlayOutcome::Started);
        self.paused = outcome == PlayOutcome::Blocked;
        outcome
    }

    fn pause(&mut self) {
        self.pause_calls += 1;
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn rewind(&mut self) {
        self.rewinds += 1;
    }
}
