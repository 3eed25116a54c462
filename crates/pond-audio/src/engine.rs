//! Audio engine wrapping Kira's AudioManager
//!
//! Any failure during init (no device, unreadable file) leaves the engine
//! inactive for the rest of the session. Nothing here propagates errors to
//! the game loop.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use kira::sound::static_sound::StaticSoundData;
use kira::{AudioManager, AudioManagerSettings, DefaultBackend};
use pond_core::{PondError, Result};
use pond_runtime::AudioOutput;
use serde::Deserialize;

/// A named sound file, relative to the sound folder
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SoundDescriptor {
    pub name: String,
    pub file: String,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_volume() -> f32 {
    1.0
}

/// Wraps Kira's AudioManager with a cache of decoded sounds
pub struct GameAudio {
    manager: Option<AudioManager<DefaultBackend>>,
    sounds: HashMap<String, StaticSoundData>,
}

impl Default for GameAudio {
    fn default() -> Self {
        Self::inactive()
    }
}

impl GameAudio {
    /// An engine that never plays anything
    pub fn inactive() -> Self {
        Self {
            manager: None,
            sounds: HashMap::new(),
        }
    }

    /// Open the default output device and decode every sound in `sounds`.
    pub fn init(sounds: &[SoundDescriptor], folder: &Path) -> Self {
        log::info!("[audio] loading {} sounds from {}", sounds.len(), folder.display());

        match Self::try_init(sounds, folder) {
            Ok(audio) => audio,
            Err(e) => {
                log::error!("[audio] sounds could not be loaded, audio disabled: {e}");
                Self::inactive()
            }
        }
    }

    fn try_init(sounds: &[SoundDescriptor], folder: &Path) -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| PondError::AudioError(format!("no audio device: {e}")))?;

        let mut cache = HashMap::with_capacity(sounds.len());
        for sound in sounds {
            let path = sound_path(folder, &sound.file);
            let data = StaticSoundData::from_file(&path).map_err(|e| {
                PondError::AudioError(format!("failed to load '{}': {e}", path.display()))
            })?;
            let data = data.volume(amplitude_to_db(sound.volume));
            cache.insert(sound.name.clone(), data);
        }

        Ok(Self {
            manager: Some(manager),
            sounds: cache,
        })
    }

    pub fn has_sound(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }
}

impl AudioOutput for GameAudio {
    fn play(&mut self, name: &str) {
        let Some(manager) = &mut self.manager else {
            return;
        };
        let Some(data) = self.sounds.get(name) else {
            log::warn!("[audio] unknown sound '{name}'");
            return;
        };
        if let Err(e) = manager.play(data.clone()) {
            log::warn!("[audio] failed to play '{name}': {e}");
        }
    }

    fn is_active(&self) -> bool {
        self.manager.is_some()
    }
}

fn sound_path(folder: &Path, file: &str) -> PathBuf {
    if folder.as_os_str().is_empty() {
        PathBuf::from(file)
    } else {
        folder.join(file)
    }
}

/// Convert linear amplitude to decibels, floored at -60 dB (silence)
fn amplitude_to_db(amplitude: f32) -> kira::Decibels {
    if amplitude <= 0.0 {
        kira::Decibels(-60.0)
    } else {
        kira::Decibels((20.0 * amplitude.log10()).max(-60.0))
    }
}
