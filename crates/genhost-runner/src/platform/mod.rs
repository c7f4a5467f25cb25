use tokio::process::{Child, Command};

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

/// Put the worker in its own process group so the whole tree can be killed at once.
pub(crate) fn isolate(cmd: &mut Command) {
    #[cfg(unix)]
    {
        cmd.process_group(0);
    }

    #[cfg(not(unix))]
    {
        let _ = cmd;
    }
}

/// Forcibly terminate the worker and, where supported, its descendants.
///
/// Errors are swallowed: the process may already be gone.
pub(crate) fn terminate(child: &mut Child) {
    if let Some(pid) = child.id() {
        #[cfg(unix)]
        unix::kill_process_group(pid);

        #[cfg(windows)]
        windows::terminate_process(pid);
    }

    if let Err(e) = child.start_kill() {
        tracing::debug!(error = %e, "Worker already exited before kill");
    }
}

pub(crate) fn is_debugger_attached(pid: u32) -> bool {
    #[cfg(target_os = "linux")]
    {
        unix::is_traced(pid)
    }

    #[cfg(windows)]
    {
        windows::is_debugger_present(pid)
    }

    #[cfg(not(any(target_os = "linux", windows)))]
    {
        let _ = pid;
        false
    }
}
