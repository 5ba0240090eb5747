//! Rodio audio provider
//!
//! Tracks are read into memory on preload and decoded again on every start,
//! so a stopped track can be restarted from the beginning.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::{AudioError, AudioHandle, AudioProvider};
use crate::scene::AudioEntry;

struct Track {
    url: String,
    data: Arc<[u8]>,
    volume: f32,
    sink: Option<Sink>,
}

/// Audio provider playing through the default output device
pub struct RodioAudio {
    /// Audio output stream (must be kept alive)
    _output_stream: OutputStream,
    stream_handle: OutputStreamHandle,
    tracks: HashMap<AudioHandle, Track>,
    next_id: u32,
}

impl RodioAudio {
    /// Open the default output device
    pub fn new() -> Result<Self, AudioError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::BackendInitFailed(format!("Failed to create audio output: {e}")))?;
        log::info!("Rodio audio backend initialized");
        Ok(Self {
            _output_stream: stream,
            stream_handle,
            tracks: HashMap::new(),
            next_id: 0,
        })
    }
}

impl AudioProvider for RodioAudio {
    fn preload(&mut self, entry: &AudioEntry, base_dir: &Path) -> Result<AudioHandle, AudioError> {
        let data = std::fs::read(base_dir.join(&entry.url)).map_err(|e| AudioError::LoadFailed {
            url: entry.url.clone(),
            reason: e.to_string(),
        })?;
        let handle = AudioHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.tracks.insert(
            handle,
            Track {
                url: entry.url.clone(),
                data: data.into(),
                volume: entry.volume.unwrap_or(1.0),
                sink: None,
            },
        );
        Ok(handle)
    }

    fn start(&mut self, handle: AudioHandle) -> Result<(), AudioError> {
        let track = self.tracks.get_mut(&handle).ok_or(AudioError::InvalidHandle)?;
        if let Some(sink) = track.sink.take() {
            sink.stop();
        }

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {e}")))?;
        let source = Decoder::new(Cursor::new(track.data.to_vec())).map_err(|e| {
            AudioError::LoadFailed {
                url: track.url.clone(),
                reason: e.to_string(),
            }
        })?;
        sink.set_volume(track.volume);
        sink.append(source.repeat_infinite());
        track.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self, handle: AudioHandle) -> Result<(), AudioError> {
        let track = self.tracks.get_mut(&handle).ok_or(AudioError::InvalidHandle)?;
        if let Some(sink) = track.sink.take() {
            sink.stop();
        }
        Ok(())
    }

    fn is_playing(&self, handle: AudioHandle) -> bool {
        self.tracks
            .get(&handle)
            .and_then(|track| track.sink.as_ref())
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }
}
