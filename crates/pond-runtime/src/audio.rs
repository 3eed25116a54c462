//! The seam between gameplay code and a sound backend

/// Plays named sounds. Implementations must never fail loudly: a backend that
/// could not start reports `is_active() == false` and ignores `play`.
pub trait AudioOutput {
    fn play(&mut self, name: &str);

    fn is_active(&self) -> bool;
}

/// Audio output that plays nothing, used when no device is wanted
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioOutput for SilentAudio {
    fn play(&mut self, _name: &str) {}

    fn is_active(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_audio_is_inactive() {
        let mut audio = SilentAudio;
        audio.play("munch");
        assert!(!audio.is_active());
    }
}
