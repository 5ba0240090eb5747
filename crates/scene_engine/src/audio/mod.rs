//! Audio provider
//!
//! The scene only starts and stops looping background tracks declared in
//! `<audios>`. Decoding and mixing belong to the provider. [`SilentAudio`]
//! keeps track of what would be playing; the `rodio` feature adds a real
//! backend.

#[cfg(feature = "rodio")]
mod rodio_backend;

#[cfg(feature = "rodio")]
pub use rodio_backend::RodioAudio;

use std::path::Path;

use thiserror::Error;

use crate::scene::AudioEntry;

/// Audio errors
#[derive(Error, Debug)]
pub enum AudioError {
    /// No output device could be opened
    #[error("Audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    /// A track could not be read or decoded
    #[error("Failed to load audio '{url}': {reason}")]
    LoadFailed {
        /// Track location
        url: String,
        /// Underlying failure
        reason: String,
    },

    /// Playback could not start
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// The handle names no preloaded track
    #[error("Invalid audio handle")]
    InvalidHandle,
}

/// Preloaded track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioHandle(pub u32);

/// Plays preloaded looping tracks
pub trait AudioProvider {
    /// Load a track; `base_dir` is what relative urls are resolved against
    fn preload(&mut self, entry: &AudioEntry, base_dir: &Path) -> Result<AudioHandle, AudioError>;

    /// Start (or restart) looping playback
    fn start(&mut self, handle: AudioHandle) -> Result<(), AudioError>;

    /// Stop playback
    fn stop(&mut self, handle: AudioHandle) -> Result<(), AudioError>;

    /// Whether a track is playing
    fn is_playing(&self, handle: AudioHandle) -> bool;
}

/// Provider that plays nothing but remembers what would be playing
#[derive(Debug, Default)]
pub struct SilentAudio {
    tracks: Vec<(AudioEntry, bool)>,
}

impl SilentAudio {
    /// Provider with no tracks
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of preloaded tracks
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Number of tracks currently playing
    pub fn playing_count(&self) -> usize {
        self.tracks.iter().filter(|(_, playing)| *playing).count()
    }
}

impl AudioProvider for SilentAudio {
    fn preload(&mut self, entry: &AudioEntry, _base_dir: &Path) -> Result<AudioHandle, AudioError> {
        let handle = u32::try_from(self.tracks.len())
            .map(AudioHandle)
            .map_err(|e| AudioError::LoadFailed {
                url: entry.url.clone(),
                reason: e.to_string(),
            })?;
        self.tracks.push((entry.clone(), false));
        Ok(handle)
    }

    fn start(&mut self, handle: AudioHandle) -> Result<(), AudioError> {
        let track = self
            .tracks
            .get_mut(handle.0 as usize)
            .ok_or(AudioError::InvalidHandle)?;
        track.1 = true;
        Ok(())
    }

    fn stop(&mut self, handle: AudioHandle) -> Result<(), AudioError> {
        let track = self
            .tracks
            .get_mut(handle.0 as usize)
            .ok_or(AudioError::InvalidHandle)?;
        track.1 = false;
        Ok(())
    }

    fn is_playing(&self, handle: AudioHandle) -> bool {
        self.tracks
            .get(handle.0 as usize)
            .is_some_and(|(_, playing)| *playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str) -> AudioEntry {
        AudioEntry {
            url: url.to_string(),
            volume: Some(0.5),
        }
    }

    #[test]
    fn test_silent_audio_tracks_state() {
        let mut audio = SilentAudio::new();
        let a = audio.preload(&entry("theme.ogg"), Path::new("scenes")).unwrap();
        let b = audio.preload(&entry("rain.ogg"), Path::new("scenes")).unwrap();
        audio.start(a).unwrap();
        audio.start(b).unwrap();
        audio.stop(a).unwrap();

        assert_eq!(audio.track_count(), 2);
        assert!(!audio.is_playing(a));
        assert!(audio.is_playing(b));
        assert_eq!(audio.playing_count(), 1);
    }

    #[test]
    fn test_unknown_handle_is_an_error() {
        let mut audio = SilentAudio::new();
        assert!(matches!(audio.start(AudioHandle(7)), Err(AudioError::InvalidHandle)));
    }
}
