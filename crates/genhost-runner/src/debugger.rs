//! Detection of a debugger attached to the worker

/// Answers whether a debugger is attached to a process.
pub trait DebuggerProbe: Send + Sync {
    fn is_debugger_attached(&self, pid: u32) -> bool;
}

/// Probe backed by the operating system.
///
/// Linux reads `TracerPid` from `/proc/<pid>/status`, Windows asks
/// `CheckRemoteDebuggerPresent`. Other platforms always report `false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDebuggerProbe;

impl DebuggerProbe for SystemDebuggerProbe {
    fn is_debugger_attached(&self, pid: u32) -> bool {
        crate::platform::is_debugger_attached(pid)
    }
}

/// Probe with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedDebuggerProbe(pub bool);

impl DebuggerProbe for FixedDebuggerProbe {
    fn is_debugger_attached(&self, _pid: u32) -> bool {
        self.0
    }
}
