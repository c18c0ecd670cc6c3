//! Voice I/O collaborator.
//!
//! [`VoiceIo`] is the interface the dialogue uses to talk to the user. It is
//! object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn VoiceIo>` and called from the blocking thread pool.
//!
//! [`ConsoleVoice`] is a terminal stand-in: prompts are printed and answers
//! are typed. [`ScriptedVoice`] (available under `#[cfg(test)]`) replays a
//! fixed list of answers and records what was spoken.

pub mod console;

pub use console::ConsoleVoice;

use thiserror::Error;

// ---------------------------------------------------------------------------
// VoiceError
// ---------------------------------------------------------------------------

/// Why a speak or listen call did not produce its result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    /// Nobody started talking before the listen timeout.
    #[error("no speech detected within timeout")]
    Timeout,

    /// Something was heard but could not be turned into text.
    #[error("speech was not recognised")]
    Unrecognized,

    /// The speech backend failed.
    #[error("voice service error: {0}")]
    Service(String),

    /// The input source is gone for good (e.g. stdin closed).
    #[error("voice input closed")]
    InputClosed,
}

// ---------------------------------------------------------------------------
// VoiceIo trait
// ---------------------------------------------------------------------------

/// Blocking speak/listen interface.
///
/// # Contract
///
/// - `speak` returns once playback has finished. Callers treat failures as
///   best-effort and only log them.
/// - `listen` returns a trimmed, lowercased transcript. Every error is an
///   absent answer from the dialogue's point of view.
pub trait VoiceIo: Send + Sync {
    fn speak(&self, text: &str) -> Result<(), VoiceError>;

    fn listen(&self) -> Result<String, VoiceError>;
}

// Compile-time assertion: Box<dyn VoiceIo> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn VoiceIo>) {}
};

// ---------------------------------------------------------------------------
// ScriptedVoice  (test-only)
// ---------------------------------------------------------------------------

/// A test double that replays pre-configured answers.
///
/// `None` entries behave like a listen timeout; once the script runs out
/// every listen returns [`VoiceError::InputClosed`].
#[cfg(test)]
pub struct ScriptedVoice {
    answers: std::sync::Mutex<std::collections::VecDeque<Option<String>>>,
    spoken: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl ScriptedVoice {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            answers: std::sync::Mutex::new(
                answers.into_iter().map(|a| a.map(Into::into)).collect(),
            ),
            spoken: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Every answer present; no timeouts.
    pub fn answering<S: Into<String>>(answers: impl IntoIterator<Item = S>) -> Self {
        Self::new(answers.into_iter().map(Some))
    }

    /// Everything spoken so far, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }
}

#[cfg(test)]
impl VoiceIo for ScriptedVoice {
    fn speak(&self, text: &str) -> Result<(), VoiceError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn listen(&self) -> Result<String, VoiceError> {
        match self.answers.lock().unwrap().pop_front() {
            Some(Some(text)) => Ok(text.trim().to_lowercase()),
            Some(None) => Err(VoiceError::Timeout),
            None => Err(VoiceError::InputClosed),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_voice_replays_in_order() {
        let voice = ScriptedVoice::new([Some("Mumbai"), None]);
        assert_eq!(voice.listen(), Ok("mumbai".to_string()));
        assert_eq!(voice.listen(), Err(VoiceError::Timeout));
        assert_eq!(voice.listen(), Err(VoiceError::InputClosed));
    }

    #[test]
    fn scripted_voice_records_speech() {
        let voice = ScriptedVoice::answering(Vec::<String>::new());
        voice.speak("hello").unwrap();
        voice.speak("again").unwrap();
        assert_eq!(voice.spoken(), vec!["hello", "again"]);
    }

    #[test]
    fn box_dyn_voice_compiles() {
        let voice: Box<dyn VoiceIo> = Box::new(ScriptedVoice::answering(["yes"]));
        assert_eq!(voice.listen().unwrap(), "yes");
    }

    #[test]
    fn voice_error_display() {
        assert!(VoiceError::Timeout.to_string().contains("timeout"));
        assert!(VoiceError::Service("offline".into())
            .to_string()
            .contains("offline"));
    }
}
