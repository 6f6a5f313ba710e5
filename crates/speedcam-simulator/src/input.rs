//! Operator command parsing for the terminal driver.

use crate::kinematics::InputFlags;

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the held controls; an empty line releases everything
    Hold(InputFlags),
    /// Teleport to raw, unvalidated coordinates
    Jump { lat: String, lon: String },
    /// Print the current snapshot
    Status,
    Quit,
}

/// Parse a line such as `wd`, `jump 23.5 121.0`, `status` or `quit`.
///
/// Returns `None` for lines that are not a command.
#[must_use]
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let mut words = line.split_whitespace();

    match words.next().map(str::to_ascii_lowercase).as_deref() {
        None => Some(Command::Hold(InputFlags::default())),
        Some("q" | "quit" | "exit") => Some(Command::Quit),
        Some("status" | "?") => Some(Command::Status),
        Some("jump" | "j" | "goto") => {
            let lat = words.next().unwrap_or_default().to_string();
            let lon = words.next().unwrap_or_default().to_string();
            Some(Command::Jump { lat, lon })
        }
        Some(keys) if keys.chars().all(|c| matches!(c, 'w' | 'a' | 's' | 'd')) => {
            Some(Command::Hold(InputFlags::from_keys(keys)))
        }
        Some(_) => None,
    }
}
