use crate::error::DataError;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

#[derive(Debug, Default)]
pub struct WavIo;

impl WavIo {
    /// Read a WAV file as a single mono waveform.
    ///
    /// Multi-channel clips are mixed down by averaging the channels so every
    /// clip yields one amplitude sequence regardless of how it was recorded.
    pub fn read_mono(path: impl AsRef<Path>) -> Result<Vec<f32>, DataError> {
        let path = path.as_ref();
        let mut reader = WavReader::open(path).map_err(|source| DataError::UnreadableClip {
            path: path.to_path_buf(),
            source,
        })?;
        let spec = reader.spec();
        let channels = spec.channels as usize;
        let mut frames = Vec::with_capacity(reader.duration() as usize);

        let mut frame_sum = 0.0f32;
        let mut frame_fill = 0usize;
        let mut push = |value: f32| {
            frame_sum += value;
            frame_fill += 1;
            if frame_fill == channels {
                frames.push(frame_sum / channels as f32);
                frame_sum = 0.0;
                frame_fill = 0;
            }
        };

        match spec.sample_format {
            SampleFormat::Float => {
                for sample in reader.samples::<f32>() {
                    let value = sample.map_err(|source| DataError::UnreadableClip {
                        path: path.to_path_buf(),
                        source,
                    })?;
                    push(value);
                }
            }
            SampleFormat::Int => {
                let max = (1_i64 << (spec.bits_per_sample - 1)) as f32;
                for sample in reader.samples::<i32>() {
                    let value = sample.map_err(|source| DataError::UnreadableClip {
                        path: path.to_path_buf(),
                        source,
                    })?;
                    push(value as f32 / max);
                }
            }
        }

        Ok(frames)
    }

    /// Read a clip and zero-pad or truncate it to exactly `len` samples.
    pub fn read_fixed(path: impl AsRef<Path>, len: usize) -> Result<Vec<f32>, DataError> {
        let mut samples = Self::read_mono(path)?;
        samples.resize(len, 0.0);
        Ok(samples)
    }

    /// Number of samples per channel in a WAV file, without decoding it.
    pub fn sample_count(path: impl AsRef<Path>) -> Result<usize, DataError> {
        let path = path.as_ref();
        let reader = WavReader::open(path).map_err(|source| DataError::UnreadableClip {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(reader.duration() as usize)
    }

    /// Write a mono waveform as a 16-bit PCM WAV file.
    pub fn write_wav(
        path: impl AsRef<Path>,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<(), DataError> {
        let path = path.as_ref();
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let map_err = |source| DataError::UnreadableClip {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = WavWriter::create(path, spec).map_err(map_err)?;
        for &value in samples {
            let scaled = (value.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
            writer.write_sample(scaled).map_err(map_err)?;
        }
        writer.finalize().map_err(map_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::WavIo;
    use tempfile::tempdir;

    #[test]
    fn wav_roundtrip_preserves_length() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("clip.wav");
        WavIo::write_wav(&path, &[0.0, 0.5, -0.25, 0.1], 16000).expect("write wav");

        let decoded = WavIo::read_mono(&path).expect("read wav");
        assert_eq!(decoded.len(), 4);
        assert!((decoded[1] - 0.5).abs() < 1e-3);
        assert_eq!(WavIo::sample_count(&path).expect("sample count"), 4);
    }

    #[test]
    fn read_fixed_pads_short_clips() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("short.wav");
        WavIo::write_wav(&path, &[0.25, -0.25], 16000).expect("write wav");

        let padded = WavIo::read_fixed(&path, 6).expect("read fixed");
        assert_eq!(padded.len(), 6);
        assert_eq!(&padded[2..], &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn read_fixed_truncates_long_clips() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("long.wav");
        WavIo::write_wav(&path, &[0.1; 10], 16000).expect("write wav");

        let truncated = WavIo::read_fixed(&path, 3).expect("read fixed");
        assert_eq!(truncated.len(), 3);
    }

    #[test]
    fn missing_clip_is_a_data_error() {
        let err = WavIo::read_mono("does_not_exist.wav").unwrap_err();
        assert!(err.to_string().contains("does_not_exist.wav"));
    }
}
