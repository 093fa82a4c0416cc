//! Radar control commands
//!
//! Inbound control messages are plain text:
//!
//! ```text
//! POWER_ON | POWER_OFF | MANUAL_ON | MANUAL_OFF | SET:<int>
//! ```
//!
//! Anything else is ignored without feedback to the sender.

/// Prefix of the manual angle command
const SET_PREFIX: &str = "SET:";

/// Parsed control command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Start the patrol sweep from the lower bound
    PowerOn,
    /// Suspend automatic sweeping
    PowerOff,
    /// Suspend automatic advancement, accept `SET`
    ManualOn,
    /// Resume automatic advancement
    ManualOff,
    /// Move to an absolute angle (manual mode only, range checked on execution)
    SetAngle(i32),
}

impl Command {
    /// Parses a control message, `None` if it is not a known command
    pub fn parse(message: &str) -> Option<Self> {
        match message.trim() {
            "POWER_ON" => Some(Self::PowerOn),
            "POWER_OFF" => Some(Self::PowerOff),
            "MANUAL_ON" => Some(Self::ManualOn),
            "MANUAL_OFF" => Some(Self::ManualOff),
            other => other
                .strip_prefix(SET_PREFIX)
                .and_then(|angle| angle.trim().parse().ok())
                .map(Self::SetAngle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_commands() {
        assert_eq!(Command::parse("POWER_ON"), Some(Command::PowerOn));
        assert_eq!(Command::parse("POWER_OFF"), Some(Command::PowerOff));
        assert_eq!(Command::parse("MANUAL_ON"), Some(Command::ManualOn));
        assert_eq!(Command::parse("MANUAL_OFF"), Some(Command::ManualOff));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(Command::parse("  POWER_ON\r\n"), Some(Command::PowerOn));
        assert_eq!(Command::parse("\tSET:120 "), Some(Command::SetAngle(120)));
    }

    #[test]
    fn test_parse_set_keeps_out_of_range_values() {
        assert_eq!(Command::parse("SET:200"), Some(Command::SetAngle(200)));
        assert_eq!(Command::parse("SET:-5"), Some(Command::SetAngle(-5)));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("power_on"), None);
        assert_eq!(Command::parse("POWER_ON_NOW"), None);
        assert_eq!(Command::parse("SET:"), None);
        assert_eq!(Command::parse("SET:abc"), None);
        assert_eq!(Command::parse("SET:90deg"), None);
    }
}
