pub mod process_spec;
pub mod process_status;

pub use process_spec::{ProcessSpec, ProcessSpecBuilder};
pub use process_status::{ProcessSnapshot, ProcessStatus};
