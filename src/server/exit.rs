//! Process termination after idle shutdown.

/// Ends the host process once the server has stopped.
pub trait ProcessExit: Send + Sync {
    fn exit(&self, code: i32);
}

/// Calls [`std::process::exit`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StdExit;

impl ProcessExit for StdExit {
    fn exit(&self, code: i32) {
        std::process::exit(code)
    }
}
