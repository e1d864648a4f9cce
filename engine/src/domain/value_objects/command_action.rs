//! CommandAction value object
//! Operator actions accepted by the control surface

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandAction {
    Start,
    Stop,
    Kill,
    Restart,
}

impl CommandAction {
    /// Parse an action name (case insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "START" => Some(CommandAction::Start),
            "STOP" => Some(CommandAction::Stop),
            "KILL" => Some(CommandAction::Kill),
            "RESTART" => Some(CommandAction::Restart),
            _ => None,
        }
    }
}

impl fmt::Display for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommandAction::Start => "START",
            CommandAction::Stop => "STOP",
            CommandAction::Kill => "KILL",
            CommandAction::Restart => "RESTART",
        };
        write!(f, "{}", s)
    }
}
