//! Audio capability: fire-and-forget sounds
//!
//! Ядро вызывает `play_sound` безусловно; ошибки бэкенда глотаются и
//! логируются, gameplay никогда их не видит.

use bevy::prelude::*;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKey {
    Hit,
    Ko,
    /// Special attack start (стоковый пак переиспользует hit sample)
    Special,
    Music,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// Нет устройства / сэмпл не загружен
    Unavailable(SoundKey),
    Backend(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(key) => write!(f, "sound {:?} unavailable", key),
            Self::Backend(reason) => write!(f, "audio backend error: {}", reason),
        }
    }
}

impl std::error::Error for AudioError {}

pub trait AudioSink {
    fn play(&mut self, key: SoundKey) -> Result<(), AudioError>;
}

/// Silent sink (headless runs, tests, missing audio device).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _key: SoundKey) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Records every request; useful for asserting on sound triggers.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub played: Vec<SoundKey>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, key: SoundKey) -> Result<(), AudioError> {
        self.played.push(key);
        Ok(())
    }
}

/// Fire-and-forget: недоступный сэмпл → debug, сломанный бэкенд → error.
pub fn play_sound(sink: &mut dyn AudioSink, key: SoundKey) {
    match sink.play(key) {
        Ok(()) => {}
        Err(err @ AudioError::Unavailable(_)) => {
            crate::logger::log(&format!("🔇 Sound skipped: {}", err));
        }
        Err(err @ AudioError::Backend(_)) => {
            crate::logger::log_error(&format!("🔇 Sound {:?} failed: {}", key, err));
        }
    }
}

/// Audio sink used by the Bevy host.
#[derive(Resource)]
pub struct AudioOutput(pub Box<dyn AudioSink + Send + Sync>);

impl Default for AudioOutput {
    fn default() -> Self {
        Self(Box::new(NullAudio))
    }
}

impl AudioOutput {
    pub fn sink_mut(&mut self) -> &mut dyn AudioSink {
        self.0.as_mut()
    }
}
