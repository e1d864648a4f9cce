pub mod entities;
pub mod error;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{ProcessSnapshot, ProcessSpec, ProcessSpecBuilder, ProcessStatus};
pub use error::{DomainError, Result};
pub use value_objects::{CommandAction, ProcessState, RestartPolicy, StartTrigger};
