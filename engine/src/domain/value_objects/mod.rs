pub mod command_action;
pub mod process_state;
pub mod restart_policy;
pub mod start_trigger;

pub use command_action::CommandAction;
pub use process_state::ProcessState;
pub use restart_policy::RestartPolicy;
pub use start_trigger::StartTrigger;
