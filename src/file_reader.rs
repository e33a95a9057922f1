use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unsupported or corrupt audio: {0}")]
    Format(#[from] SymphoniaError),
    #[error("no decodable audio track in {0}")]
    NoTrack(PathBuf),
    #[error("unknown channel layout in {0}")]
    NoChannels(PathBuf),
}

/// A whole file decoded to interleaved f32 samples.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub path: PathBuf,
    pub samples: Arc<[f32]>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    pub fn length_in_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// The picker only offers WAV files.
pub fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
}

pub fn read_audio(path: &Path) -> Result<DecodedAudio, ReadError> {
    let src = File::open(path).map_err(|source| ReadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();
    let probed = symphonia::default::get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;
    let mut format = probed.format;

    // first audio track with a known codec
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| ReadError::NoTrack(path.to_path_buf()))?;

    let dec_opts: DecoderOptions = Default::default();
    let mut decoder = symphonia::default::get_codecs().make(&track.codec_params, &dec_opts)?;
    let track_id = track.id;

    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    let mut all_samples = Vec::<f32>::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err)) if err.kind() == ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(err.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(audio_buf) => {
                if sample_buf.is_none() {
                    let spec = *audio_buf.spec();
                    sample_rate = spec.rate;
                    channels = spec.channels.count() as u16;
                    // capacity, not length
                    let duration = audio_buf.capacity() as u64;
                    sample_buf = Some(SampleBuffer::<f32>::new(duration, spec));
                }
                if let Some(buf) = &mut sample_buf {
                    buf.copy_interleaved_ref(audio_buf);
                    all_samples.extend_from_slice(buf.samples());
                }
            }
            Err(SymphoniaError::DecodeError(err)) => debug!("skipping bad packet: {err}"),
            Err(err) => return Err(err.into()),
        }
    }

    if channels == 0 {
        return Err(ReadError::NoChannels(path.to_path_buf()));
    }

    let decoded = DecodedAudio {
        path: path.to_path_buf(),
        samples: all_samples.into(),
        sample_rate,
        channels,
    };
    info!(
        path = %path.display(),
        sample_rate,
        channels,
        seconds = decoded.length_in_seconds(),
        "decoded file"
    );
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::TempDir;

    /// Writes a 16-bit sine WAV and returns its path.
    fn write_wav(
        dir: &TempDir,
        name: &str,
        seconds: f32,
        rate: u32,
        channels: u16,
    ) -> PathBuf {
        let path = dir.path().join(name);
        let spec = hound::WavSpec {
            channels,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        let frames = (seconds * rate as f32) as u32;
        for i in 0..frames {
            let t = i as f32 / rate as f32;
            let v = ((t * 440. * std::f32::consts::TAU).sin() * i16::MAX as f32 * 0.5) as i16;
            for _ in 0..channels {
                writer.write_sample(v).unwrap();
            }
        }
        writer.finalize().unwrap();
        path
    }

    #[test]
    fn reads_stereo_wav() {
        let dir = TempDir::new().unwrap();
        let path = write_wav(&dir, "tone.wav", 2.0, 8000, 2);
        let audio = read_audio(&path).unwrap();
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.frames(), 16000);
        assert_relative_eq!(audio.length_in_seconds(), 2.0);
        assert_eq!(audio.file_name(), "tone.wav");
        assert!(audio.samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn missing_file_fails_to_open() {
        let dir = TempDir::new().unwrap();
        let err = read_audio(&dir.path().join("nope.wav")).unwrap_err();
        assert!(matches!(err, ReadError::Open { .. }));
    }

    #[test]
    fn garbage_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("noise.wav");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"this is not a riff header at all").unwrap();
        assert!(read_audio(&path).is_err());
    }

    #[test]
    fn wav_extension_check_ignores_case() {
        assert!(is_wav(Path::new("/music/a.wav")));
        assert!(is_wav(Path::new("B.WAV")));
        assert!(!is_wav(Path::new("c.mp3")));
        assert!(!is_wav(Path::new("wav")));
    }
}
