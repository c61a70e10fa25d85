//! Real playback through rodio.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::backend::Backend;
use crate::error::{AudioError, AudioResult};

/// Extensions tried when a track identifier carries none.
const EXTENSIONS: [&str; 4] = ["ogg", "mp3", "wav", "flac"];

/// A [`Backend`] that plays assets from a directory through the default
/// output device.
///
/// Background tracks loop until stopped; cues play once and detach.
pub struct RodioBackend {
    // Dropping the stream kills all sinks, so it rides along unused.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    music: Option<Sink>,
    assets: PathBuf,
}

impl RodioBackend {
    /// Open the default output device, playing assets from `assets`.
    pub fn new(assets: impl Into<PathBuf>) -> AudioResult<Self> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AudioError::Unavailable(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            handle,
            music: None,
            assets: assets.into(),
        })
    }

    /// Resolve an opaque asset identifier to a file under the asset dir.
    fn resolve(&self, id: &str) -> AudioResult<PathBuf> {
        let direct = self.assets.join(id);
        if Path::new(id).extension().is_some() {
            if direct.is_file() {
                return Ok(direct);
            }
        } else {
            for ext in EXTENSIONS {
                let candidate = self.assets.join(format!("{id}.{ext}"));
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
        }
        Err(AudioError::AssetNotFound(id.to_string()))
    }

    fn decoder(&self, id: &str) -> AudioResult<Decoder<BufReader<File>>> {
        let path = self.resolve(id)?;
        let file = File::open(&path).map_err(|_| AudioError::AssetNotFound(id.to_string()))?;
        Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
            asset: id.to_string(),
            reason: e.to_string(),
        })
    }
}

impl Backend for RodioBackend {
    fn start(&mut self, track: &str) -> AudioResult<()> {
        let source = self.decoder(track)?.repeat_infinite();
        let sink =
            Sink::try_new(&self.handle).map_err(|e| AudioError::Unavailable(e.to_string()))?;
        sink.set_volume(0.0);
        sink.append(source);
        if let Some(old) = self.music.replace(sink) {
            old.stop();
        }
        Ok(())
    }

    fn start_cue(&mut self, cue: &str) -> AudioResult<()> {
        let source = self.decoder(cue)?;
        let sink =
            Sink::try_new(&self.handle).map_err(|e| AudioError::Unavailable(e.to_string()))?;
        sink.append(source);
        sink.detach();
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.music.take() {
            sink.stop();
        }
    }

    fn set_gain(&mut self, gain: f32) {
        if let Some(sink) = &self.music {
            sink.set_volume(gain);
        }
    }
}
