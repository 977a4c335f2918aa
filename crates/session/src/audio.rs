use serde::{Deserialize, Serialize};

/// Feedback sounds the core asks the host to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    /// A step was completed.
    Success,
    /// Something was selected, grabbed or placed.
    Hit,
}

/// Plays cues. Implementations swallow their own failures.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

impl<F> AudioSink for F
where
    F: FnMut(AudioCue),
{
    fn play(&mut self, cue: AudioCue) {
        self(cue)
    }
}

/// Discards every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, cue: AudioCue) {
        tracing::trace!(?cue, "audio muted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_sinks() {
        let mut played = Vec::new();
        {
            let mut sink = |c: AudioCue| played.push(c);
            sink.play(AudioCue::Hit);
            sink.play(AudioCue::Success);
        }
        assert_eq!(played, [AudioCue::Hit, AudioCue::Success]);
    }
}
