//! WAV file recorder
//!
//! Records simulated frames as a 3-channel WAV: envelope level, then the
//! end-of-release and end-of-fall trigger outputs as 0/1.

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::envelope::Micros;
use crate::scenario::Frame;

/// Channels per frame: value, EOR, EOF
pub const CHANNELS: u16 = 3;

/// WAV file recorder
pub struct Recorder {
    writer: WavWriter<BufWriter<File>>,
    sample_rate: u32,
    frames_written: u64,
}

impl Recorder {
    /// Create a new recorder
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `sample_rate` - Frames per second
    pub fn new(path: &Path, sample_rate: u32) -> Result<Self> {
        let spec = WavSpec {
            channels: CHANNELS,
            sample_rate: sample_rate.max(1),
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer,
            sample_rate: spec.sample_rate,
            frames_written: 0,
        })
    }

    /// Create a recorder with one frame per control loop tick
    pub fn for_tick(path: &Path, tick_micros: Micros) -> Result<Self> {
        let rate = (1_000_000.0 / tick_micros.max(1) as f64).round() as u32;
        Self::new(path, rate)
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of frames written
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Get the duration recorded in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames_written as f64 / self.sample_rate as f64
    }

    /// Write a single frame
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let samples = [
            frame.value as f32,
            if frame.end_of_release { 1.0 } else { 0.0 },
            if frame.end_of_fall { 1.0 } else { 0.0 },
        ];
        for sample in samples {
            self.writer
                .write_sample(sample)
                .context("failed to write sample")?;
        }
        self.frames_written += 1;
        Ok(())
    }

    /// Finalize the WAV file
    ///
    /// This must be called to properly close the file and write the header.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV file")
    }
}
