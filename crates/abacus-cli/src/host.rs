//! Input lines for `abacus run`.
//!
//! Plain lines are raw runtime messages. Lines starting with `!` are
//! actions the host page would normally take:
//!
//! ```text
//! !start            start the tutorial
//! !quit             quit the tutorial
//! !value 322        show a value on the rolls
//! !goals 544/1352   replace the goal list
//! !lock ten on      lock or unlock one roll
//! !attach !detach   connect or disconnect the runtime
//! !status           print the tutorial status
//! !wait 1500        pause input for some milliseconds
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use abacus_proto::Roll;
use std::str::FromStr;
use std::time::Duration;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Message(String),
    Action(HostAction),
    Skip,
}

impl InputLine {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(InputLine::Skip);
        }
        match line.strip_prefix('!') {
            Some(action) => action.parse().map(InputLine::Action),
            None => Ok(InputLine::Message(line.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    Start,
    Quit,
    Value(u16),
    Goals(String),
    Lock { roll: Roll, locked: bool },
    Attach,
    Detach,
    Status,
    Wait(Duration),
}

impl FromStr for HostAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        let action = match (name, args.as_slice()) {
            ("start", []) => HostAction::Start,
            ("quit", []) => HostAction::Quit,
            ("attach", []) => HostAction::Attach,
            ("detach", []) => HostAction::Detach,
            ("status", []) => HostAction::Status,
            ("value", [value]) => HostAction::Value(
                value
                    .parse()
                    .map_err(|_| format!("invalid value '{value}'"))?,
            ),
            ("goals", [list]) => HostAction::Goals((*list).to_string()),
            ("lock", [roll, state]) => HostAction::Lock {
                roll: roll.parse().map_err(|e| format!("{e}"))?,
                locked: parse_switch(state)?,
            },
            ("wait", [ms]) => HostAction::Wait(Duration::from_millis(
                ms.parse().map_err(|_| format!("invalid delay '{ms}'"))?,
            )),
            _ => return Err(format!("unknown action '!{s}'")),
        };
        Ok(action)
    }
}

fn parse_switch(state: &str) -> Result<bool, String> {
    match state {
        "on" | "1" | "true" => Ok(true),
        "off" | "0" | "false" => Ok(false),
        other => Err(format!("expected on/off, got '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_are_runtime_messages() {
        assert_eq!(
            InputLine::parse("  ValueChanged:0042 ").unwrap(),
            InputLine::Message("ValueChanged:0042".into())
        );
        assert_eq!(InputLine::parse("").unwrap(), InputLine::Skip);
        assert_eq!(InputLine::parse("# comment").unwrap(), InputLine::Skip);
    }

    #[test]
    fn test_host_actions() {
        assert_eq!(
            InputLine::parse("!start").unwrap(),
            InputLine::Action(HostAction::Start)
        );
        assert_eq!("value 322".parse(), Ok(HostAction::Value(322)));
        assert_eq!(
            "goals 544/1352".parse(),
            Ok(HostAction::Goals("544/1352".into()))
        );
        assert_eq!(
            "lock ten on".parse(),
            Ok(HostAction::Lock {
                roll: Roll::Ten,
                locked: true
            })
        );
        assert_eq!(
            "wait 250".parse(),
            Ok(HostAction::Wait(Duration::from_millis(250)))
        );
    }

    #[test]
    fn test_bad_actions_are_rejected() {
        assert!("value abc".parse::<HostAction>().is_err());
        assert!("lock ten maybe".parse::<HostAction>().is_err());
        assert!("lock bogus on".parse::<HostAction>().is_err());
        assert!("start now".parse::<HostAction>().is_err());
        assert!(InputLine::parse("!dance").is_err());
    }
}
