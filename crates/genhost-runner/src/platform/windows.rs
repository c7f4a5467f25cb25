use windows::Win32::Foundation::CloseHandle;
use windows::Win32::System::Diagnostics::Debug::CheckRemoteDebuggerPresent;
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_TERMINATE, TerminateProcess,
};
use windows::core::BOOL;

pub(crate) fn terminate_process(pid: u32) {
    // SAFETY: the handle is checked before use and closed afterwards.
    unsafe {
        if let Ok(handle) = OpenProcess(PROCESS_TERMINATE, false, pid) {
            let _ = TerminateProcess(handle, 1);
            let _ = CloseHandle(handle);
        }
    }
}

pub(crate) fn is_debugger_present(pid: u32) -> bool {
    let mut present = BOOL(0);

    // SAFETY: the handle is checked before use and closed afterwards; `present` outlives
    // the call.
    unsafe {
        let Ok(handle) = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) else {
            return false;
        };
        let queried = CheckRemoteDebuggerPresent(handle, &mut present).is_ok();
        let _ = CloseHandle(handle);
        queried && present.as_bool()
    }
}
