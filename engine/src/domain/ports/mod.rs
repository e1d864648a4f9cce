#[cfg(test)]
pub mod mock_executor;
pub mod process_executor;

#[cfg(test)]
pub use mock_executor::{MockBehavior, MockExecutor};
pub use process_executor::{
    ExitInfo, ProcessExecutor, ProcessExitHandle, Signal, SpawnConfig, SpawnResult,
};
