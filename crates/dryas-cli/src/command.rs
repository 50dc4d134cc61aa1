//! Script command parsing.
//!
//! One command per line; blank lines and `#` comments are skipped.

use dryas_core::{HexCoord, Improvement};
use std::str::FromStr;
use thiserror::Error;

/// Number of log lines `log` prints when no count is given
pub const DEFAULT_LOG_LINES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' expects {expected}")]
    Usage {
        command: &'static str,
        expected: &'static str,
    },

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    #[error(transparent)]
    Improvement(#[from] dryas_core::board::UnknownImprovement),
}

/// A single script command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Claim a hex by coordinate
    Claim(HexCoord),
    /// Build on a hex by coordinate
    Build(HexCoord, Improvement),
    /// Click a world-space pixel; claims the hex under it if unowned
    Click { x: f64, y: f64 },
    /// End the active player's turn
    End,
    /// Print scores and resources
    Status,
    /// Print the most recent log lines
    Log(usize),
    /// Describe the terrain of a hex
    Terrain(HexCoord),
}

impl Command {
    /// Parse one script line; `Ok(None)` for blank lines and comments
    pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
        let line = match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        };
        if line.trim().is_empty() {
            return Ok(None);
        }
        line.parse().map(Some)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        let Some((&name, args)) = words.split_first() else {
            return Err(CommandError::Unknown(String::new()));
        };

        match (name.to_ascii_lowercase().as_str(), args) {
            ("claim", [col, row]) => Ok(Command::Claim(parse_coord(col, row)?)),
            ("claim", _) => Err(usage("claim", "COL ROW")),

            ("build", [col, row, kind]) => {
                Ok(Command::Build(parse_coord(col, row)?, kind.parse()?))
            }
            ("build", _) => Err(usage("build", "COL ROW KIND")),

            ("click", [x, y]) => Ok(Command::Click {
                x: parse_number(x)?,
                y: parse_number(y)?,
            }),
            ("click", _) => Err(usage("click", "X Y")),

            ("end", []) => Ok(Command::End),
            ("end", _) => Err(usage("end", "no arguments")),

            ("status", []) => Ok(Command::Status),
            ("status", _) => Err(usage("status", "no arguments")),

            ("log", []) => Ok(Command::Log(DEFAULT_LOG_LINES)),
            ("log", [count]) => Ok(Command::Log(parse_number(count)?)),
            ("log", _) => Err(usage("log", "an optional COUNT")),

            ("terrain", [col, row]) => Ok(Command::Terrain(parse_coord(col, row)?)),
            ("terrain", _) => Err(usage("terrain", "COL ROW")),

            _ => Err(CommandError::Unknown(name.to_string())),
        }
    }
}

fn usage(command: &'static str, expected: &'static str) -> CommandError {
    CommandError::Usage { command, expected }
}

fn parse_number<T: FromStr>(word: &str) -> Result<T, CommandError> {
    word.parse()
        .map_err(|_| CommandError::InvalidNumber(word.to_string()))
}

fn parse_coord(col: &str, row: &str) -> Result<HexCoord, CommandError> {
    Ok(HexCoord::new(parse_number(col)?, parse_number(row)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_commands() {
        assert_eq!("claim 3 -2".parse::<Command>(), Ok(Command::Claim(HexCoord::new(3, -2))));
        assert_eq!(
            "build 0 0 lumber_camp".parse::<Command>(),
            Ok(Command::Build(HexCoord::new(0, 0), Improvement::LumberCamp))
        );
        assert_eq!("CLICK 12.5 80".parse::<Command>(), Ok(Command::Click { x: 12.5, y: 80.0 }));
        assert_eq!("end".parse::<Command>(), Ok(Command::End));
        assert_eq!("status".parse::<Command>(), Ok(Command::Status));
        assert_eq!("log".parse::<Command>(), Ok(Command::Log(DEFAULT_LOG_LINES)));
        assert_eq!("log 12".parse::<Command>(), Ok(Command::Log(12)));
        assert_eq!("terrain 7 9".parse::<Command>(), Ok(Command::Terrain(HexCoord::new(7, 9))));
    }

    #[test]
    fn test_parse_line_skips_comments() {
        assert_eq!(Command::parse_line(""), Ok(None));
        assert_eq!(Command::parse_line("   # just a note"), Ok(None));
        assert_eq!(Command::parse_line("end # pass"), Ok(Some(Command::End)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "fly 1 2".parse::<Command>(),
            Err(CommandError::Unknown("fly".to_string()))
        );
        assert_eq!(
            "claim 1".parse::<Command>(),
            Err(CommandError::Usage {
                command: "claim",
                expected: "COL ROW"
            })
        );
        assert_eq!(
            "claim one 2".parse::<Command>(),
            Err(CommandError::InvalidNumber("one".to_string()))
        );
        assert!(matches!(
            "build 0 0 castle".parse::<Command>(),
            Err(CommandError::Improvement(_))
        ));
        assert!("log -1".parse::<Command>().is_err());
    }
}
