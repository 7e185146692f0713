//! Operator console commands
//!
//! Text arrives from the remote console; only the restart command has
//! meaning, everything else is echoed to the log.

/// Literal restart command
pub const RESTART_COMMAND: &str = "-restart";

/// A recognized console line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleCommand<'a> {
    /// Reboot the controller
    Restart,
    /// Opaque text, logged only
    Echo(&'a str),
}

impl<'a> ConsoleCommand<'a> {
    /// Classify a console line (trailing line endings are ignored)
    pub fn parse(text: &'a str) -> Self {
        let line = text.trim_end_matches(['\r', '\n']);
        if line == RESTART_COMMAND {
            ConsoleCommand::Restart
        } else {
            ConsoleCommand::Echo(line)
        }
    }
}
