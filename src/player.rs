//! Pronunciation audio playback
//!
//! Drives QuickTime Player through `osascript`, passing the AppleScript one
//! non-empty line per `-e` argument. Runs outside the JSON response
//! boundary: playback is triggered by the launcher's action, not while
//! items are being produced.

use std::path::Path;
use std::process::{Command, ExitStatus};

use thiserror::Error;

const QUICKTIME_SCRIPT: &str = r#"
on run argv
    set theFile to the first item of argv
    if theFile = "" then
        return
    end if
    set theFile to POSIX file theFile
    tell application "QuickTime Player"
        set theAudio to open file theFile
        tell theAudio
            set theDuration to duration
            play
        end tell
        delay theDuration + 1
        close theAudio
        quit
    end tell
end run
"#;

/// Errors from launching the external player
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("failed to launch osascript: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("osascript exited with {0}")]
    Failed(ExitStatus),
}

/// Plays `path` with QuickTime Player, blocking until playback finishes
pub fn play(path: &Path) -> Result<(), PlayerError> {
    let arg = path.display().to_string();
    let status = applescript_command(QUICKTIME_SCRIPT, &[&arg]).status()?;
    if !status.success() {
        return Err(PlayerError::Failed(status));
    }
    Ok(())
}

/// Rewrites a multi-line AppleScript as an `osascript` invocation
fn applescript_command(script: &str, args: &[&str]) -> Command {
    let mut command = Command::new("osascript");
    for line in script.lines().map(str::trim).filter(|line| !line.is_empty()) {
        command.arg("-e").arg(line);
    }
    command.args(args);
    command
}
