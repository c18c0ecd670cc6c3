//! Terminal voice backend.
//!
//! Prompts are printed as `Agent: …` and answers are typed lines. A
//! background thread owns stdin and forwards lines over a channel so that
//! [`ConsoleVoice::listen`] can give up after the configured timeout.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Mutex;
use std::time::Duration;

use crate::config::VoiceConfig;

use super::{VoiceError, VoiceIo};

const NOT_CAUGHT: &str = "Sorry, I didn't catch that. Could you please repeat?";

pub struct ConsoleVoice {
    lines: Mutex<Receiver<String>>,
    listen_timeout: Option<Duration>,
    echo_prompts: bool,
}

impl ConsoleVoice {
    /// Spawn the stdin reader thread and build the backend.
    pub fn from_config(config: &VoiceConfig) -> Self {
        let (tx, rx) = mpsc::channel();

        let spawned = std::thread::Builder::new()
            .name("console-voice".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    match line {
                        Ok(line) => {
                            if tx.send(line).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            log::warn!("voice: stdin read failed: {e}");
                            break;
                        }
                    }
                }
            });
        // Without a reader the sender is dropped and every listen reports
        // closed input.
        if let Err(e) = spawned {
            log::error!("voice: could not start console reader: {e}");
        }

        Self::with_receiver(rx, config)
    }

    fn with_receiver(lines: Receiver<String>, config: &VoiceConfig) -> Self {
        let listen_timeout =
            (config.listen_timeout_secs > 0).then(|| Duration::from_secs(config.listen_timeout_secs));
        Self {
            lines: Mutex::new(lines),
            listen_timeout,
            echo_prompts: config.echo_prompts,
        }
    }

    /// Print `prompt` and wait, without a timeout, for the next line.
    ///
    /// Used by the driver for out-of-dialogue actions such as "press Enter
    /// to start".
    pub fn read_line(&self, prompt: &str) -> Result<String, VoiceError> {
        print_flush(prompt);
        self.next_line(None)
    }

    fn next_line(&self, timeout: Option<Duration>) -> Result<String, VoiceError> {
        let rx = self
            .lines
            .lock()
            .map_err(|e| VoiceError::Service(format!("input lock poisoned: {e}")))?;
        match timeout {
            Some(t) => rx.recv_timeout(t).map_err(|e| match e {
                RecvTimeoutError::Timeout => VoiceError::Timeout,
                RecvTimeoutError::Disconnected => VoiceError::InputClosed,
            }),
            None => rx.recv().map_err(|_| VoiceError::InputClosed),
        }
    }
}

impl VoiceIo for ConsoleVoice {
    fn speak(&self, text: &str) -> Result<(), VoiceError> {
        log::debug!("voice: speak {text:?}");
        if !self.echo_prompts {
            return Ok(());
        }
        let mut out = std::io::stdout().lock();
        writeln!(out, "Agent: {text}")
            .and_then(|_| out.flush())
            .map_err(|e| VoiceError::Service(e.to_string()))
    }

    fn listen(&self) -> Result<String, VoiceError> {
        print_flush("Listening... > ");

        let line = match self.next_line(self.listen_timeout) {
            Ok(line) => line,
            Err(VoiceError::Timeout) => {
                println!();
                log::info!("voice: no speech detected within timeout");
                return Err(VoiceError::Timeout);
            }
            Err(e) => return Err(e),
        };

        let transcript = line.trim().to_lowercase();
        if transcript.is_empty() {
            log::info!("voice: empty answer");
            if let Err(e) = self.speak(NOT_CAUGHT) {
                log::warn!("voice: {e}");
            }
            return Err(VoiceError::Unrecognized);
        }

        log::debug!("voice: heard {transcript:?}");
        Ok(transcript)
    }
}

fn print_flush(text: &str) {
    let mut out = std::io::stdout().lock();
    let _ = write!(out, "{text}");
    let _ = out.flush();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
