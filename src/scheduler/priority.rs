//! Scheduling priority for the polling thread.

use std::io;

/// Sets the nice value of the calling thread.
///
/// On Linux the nice value is a per-thread attribute, so this affects only the
/// polling worker. Lowering it below the current value requires
/// `CAP_SYS_NICE`; raising it never does.
///
/// # Errors
///
/// Returns the OS error when the kernel refuses the change.
pub fn set_current_thread_nice(nice: i32) -> io::Result<()> {
    // SAFETY: gettid has no preconditions and cannot fail.
    let tid = unsafe { libc::syscall(libc::SYS_gettid) } as libc::id_t;

    // SAFETY: plain syscall on our own thread id, no memory is passed.
    let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS, tid, nice) };
    if rc == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raising_nice_is_always_allowed() {
        // Run in a separate thread so the test harness thread keeps its priority
        let result = std::thread::spawn(|| set_current_thread_nice(19))
            .join()
            .unwrap();
        assert!(result.is_ok(), "Raising nice failed: {:?}", result);
    }
}
