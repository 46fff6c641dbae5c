use std::str::FromStr;

use crate::{ParseError, Selection};

/// Most shells a single burst may schedule.
pub const MAX_BURST: usize = 200;

/// A discrete UI command, as sent by buttons and keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select(Selection),
    Launch,
    Burst(usize),
    TogglePause,
    ToggleShake,
    TogglePerformance,
    ToggleAudio,
    Celebrate,
}

impl Command {
    /// Maps a `KeyboardEvent.code` onto a command.
    pub fn from_key_code(code: &str, burst_size: usize) -> Option<Command> {
        let command = match code {
            "Space" => Command::Launch,
            "KeyB" => Command::Burst(burst_size),
            "KeyP" => Command::TogglePause,
            "KeyS" => Command::ToggleShake,
            "KeyQ" => Command::TogglePerformance,
            "KeyM" => Command::ToggleAudio,
            "KeyC" => Command::Celebrate,
            "Digit0" => Command::Select(Selection::Random),
            _ => {
                let digit = code.strip_prefix("Digit")?.parse::<usize>().ok()?;
                let pattern = crate::Pattern::ALL.get(digit.checked_sub(1)?)?;

                Command::Select(Selection::Pattern(*pattern))
            }
        };

        Some(command)
    }
}

impl FromStr for Command {
    type Err = ParseError;

    /// Parses the `data-command` form: `launch`, `burst:20`, `pause`, `shake`, `performance`, `audio`,
    /// `celebrate`, `select:ring`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, argument) = match s.trim().split_once(':') {
            Some((name, argument)) => (name, Some(argument)),
            None => (s.trim(), None),
        };

        match (name, argument) {
            ("launch", None) => Ok(Command::Launch),
            ("burst", argument) => argument
                .unwrap_or("20")
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|count| *count <= MAX_BURST)
                .map(Command::Burst)
                .ok_or_else(|| ParseError::BurstSize(s.to_string())),
            ("pause", None) => Ok(Command::TogglePause),
            ("shake", None) => Ok(Command::ToggleShake),
            ("performance", None) => Ok(Command::TogglePerformance),
            ("audio", None) => Ok(Command::ToggleAudio),
            ("celebrate", None) => Ok(Command::Celebrate),
            ("select", Some(selection)) => selection.parse().map(Command::Select),
            _ => Err(ParseError::UnknownCommand(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pattern;

    #[test]
    fn parses_data_commands() {
        assert_eq!("launch".parse(), Ok(Command::Launch));
        assert_eq!("burst:20".parse(), Ok(Command::Burst(20)));
        assert_eq!("burst".parse(), Ok(Command::Burst(20)));
        assert_eq!(
            "select:ring".parse(),
            Ok(Command::Select(Selection::Pattern(Pattern::Ring)))
        );
        assert_eq!(
            "select:random".parse(),
            Ok(Command::Select(Selection::Random))
        );
        assert_eq!(
            "burst:many".parse::<Command>(),
            Err(ParseError::BurstSize("burst:many".to_string()))
        );
        assert_eq!(
            "burst:1000000000".parse::<Command>(),
            Err(ParseError::BurstSize("burst:1000000000".to_string()))
        );
        assert_eq!("burst:200".parse(), Ok(Command::Burst(MAX_BURST)));
        assert_eq!(
            "explode".parse::<Command>(),
            Err(ParseError::UnknownCommand("explode".to_string()))
        );
    }

    #[test]
    fn maps_keys() {
        assert_eq!(Command::from_key_code("Space", 20), Some(Command::Launch));
        assert_eq!(Command::from_key_code("KeyB", 12), Some(Command::Burst(12)));
        assert_eq!(
            Command::from_key_code("Digit1", 20),
            Some(Command::Select(Selection::Pattern(Pattern::Peony)))
        );
        assert_eq!(
            Command::from_key_code("Digit6", 20),
            Some(Command::Select(Selection::Pattern(Pattern::Crossette)))
        );
        assert_eq!(Command::from_key_code("Digit7", 20), None);
        assert_eq!(Command::from_key_code("KeyZ", 20), None);
        assert_eq!(Command::from_key_code("Enter", 20), None);
    }
}
