//! StartTrigger value object
//! Who asked for a start decides which guard applies

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartTrigger {
    /// Supervisor boot; honours `autostart`
    Auto,
    /// Operator command; resets the backoff counter, revives FATAL
    Manual,
    /// Monitor sweep; only BACKOFF or policy-eligible EXITED processes
    Monitor,
}

impl fmt::Display for StartTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartTrigger::Auto => write!(f, "auto"),
            StartTrigger::Manual => write!(f, "manual"),
            StartTrigger::Monitor => write!(f, "monitor"),
        }
    }
}
