use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;

pub(crate) fn kill_process_group(pid: u32) {
    let Ok(raw) = i32::try_from(pid) else {
        return;
    };

    // The worker leads its own group, so its pid is the group id.
    if let Err(e) = killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        tracing::debug!(pid, error = %e, "Failed to kill worker process group");
    }
}

/// A non-zero `TracerPid` in `/proc/<pid>/status` means a debugger is attached.
#[cfg(target_os = "linux")]
pub(crate) fn is_traced(pid: u32) -> bool {
    std::fs::read_to_string(format!("/proc/{pid}/status"))
        .ok()
        .and_then(|status| tracer_pid(&status))
        .is_some_and(|tracer| tracer != 0)
}

#[cfg(target_os = "linux")]
fn tracer_pid(status: &str) -> Option<u32> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("TracerPid:"))
        .and_then(|value| value.trim().parse().ok())
}
