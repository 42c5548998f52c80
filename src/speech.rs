use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Audio output port: speak a string, without waiting for playback to end
pub trait Speaker {
    fn speak(&self, text: &str) -> std::io::Result<()>;
}

/// Speaks through an external text-to-speech program, e.g. `espeak-ng -v cmn 你好`
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    program: String,
    voice: Option<String>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, voice: Option<String>) -> Self {
        Self {
            program: program.into(),
            voice,
        }
    }

    fn command(&self, text: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(voice) = &self.voice {
            cmd.arg("-v").arg(voice);
        }
        cmd.arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str) -> std::io::Result<()> {
        let mut child = self.command(text).spawn()?;
        debug!(program = %self.program, text, "speaking");
        // reap in the background so the UI never blocks on playback
        std::thread::spawn(move || {
            if let Err(e) = child.wait() {
                warn!(error = %e, "speech process failed");
            }
        });
        Ok(())
    }
}

/// Used when no speech program is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&self, _text: &str) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn speaker_for(program: Option<&str>, voice: Option<&str>) -> Box<dyn Speaker> {
    match program {
        Some(program) if !program.trim().is_empty() => {
            Box::new(CommandSpeaker::new(program, voice.map(String::from)))
        }
        _ => Box::new(SilentSpeaker),
    }
}
