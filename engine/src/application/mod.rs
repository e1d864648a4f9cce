//! Application Layer
//! Process instances, the registry that owns them and the control API

pub mod control;
pub mod process_instance;
pub mod registry;

pub use control::ControlService;
pub use process_instance::ProcessInstance;
pub use registry::ProcessRegistry;
