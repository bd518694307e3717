//! 16-bit PCM WAV input and output, one 10 ms frame at a time.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{CliError, Result};

pub struct WavInput {
    reader: WavReader<BufReader<File>>,
    spec: WavSpec,
}

impl WavInput {
    /// Opens `path`, rejecting anything but 16-bit integer PCM.
    pub fn open(path: &Path) -> Result<Self> {
        let reader = WavReader::open(path)?;
        let spec = reader.spec();
        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(CliError::UnsupportedFormat {
                bits_per_sample: spec.bits_per_sample,
                sample_format: spec.sample_format,
            });
        }
        Ok(Self { reader, spec })
    }

    pub fn sample_rate(&self) -> u32 {
        self.spec.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.spec.channels
    }

    /// Frames per channel in the file.
    pub fn duration(&self) -> u32 {
        self.reader.duration()
    }

    /// Fills `frame` with the next interleaved samples.
    ///
    /// Returns `false` once fewer than `frame.len()` samples remain; the
    /// leftover partial frame is dropped.
    pub fn read_frame(&mut self, frame: &mut [i16]) -> Result<bool> {
        let mut samples = self.reader.samples::<i16>();
        for slot in frame.iter_mut() {
            match samples.next() {
                Some(sample) => *slot = sample?,
                None => return Ok(false),
            }
        }
        Ok(true)
    }
}

pub struct WavOutput {
    writer: WavWriter<BufWriter<File>>,
}

impl WavOutput {
    /// Creates a 16-bit PCM file at `path`, creating parent directories.
    pub fn create(path: &Path, sample_rate: u32, channels: u16) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        Ok(Self {
            writer: WavWriter::create(path, spec)?,
        })
    }

    pub fn write_frame(&mut self, frame: &[i16]) -> Result<()> {
        for &sample in frame {
            self.writer.write_sample(sample)?;
        }
        Ok(())
    }

    /// Patches the header lengths and flushes.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("band-split-{}-{name}.wav", std::process::id()))
    }

    #[test]
    fn frames_roundtrip_and_partial_frame_is_dropped() {
        let path = temp_path("roundtrip");
        let frame: Vec<i16> = (0..320).map(|i| (i * 97 - 15000) as i16).collect();

        let mut out = WavOutput::create(&path, 16000, 2).unwrap();
        out.write_frame(&frame).unwrap();
        out.write_frame(&frame[..100]).unwrap();
        out.finalize().unwrap();

        let mut input = WavInput::open(&path).unwrap();
        assert_eq!(input.sample_rate(), 16000);
        assert_eq!(input.channels(), 2);
        assert_eq!(input.duration(), 210);

        let mut read = vec![0i16; 320];
        assert!(input.read_frame(&mut read).unwrap());
        assert_eq!(read, frame);
        assert!(!input.read_frame(&mut read).unwrap());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn float_wav_is_rejected() {
        let path = temp_path("float");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0.25f32).unwrap();
        writer.finalize().unwrap();

        let err = WavInput::open(&path).err().unwrap();
        assert!(matches!(
            err,
            CliError::UnsupportedFormat {
                bits_per_sample: 32,
                sample_format: SampleFormat::Float
            }
        ));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_a_wav_error() {
        let err = WavInput::open(&temp_path("does-not-exist")).err().unwrap();
        assert!(matches!(err, CliError::Wav(_)));
    }
}
