//! Caps the directory worker count by the process file descriptor limit (Unix).

/// Descriptors a directory worker may hold while listing: the directory handle plus
/// metadata lookups issued by the filesystem adapter.
pub const FDS_PER_WORKER: usize = 4;

/// Percent of the soft limit the worker pool may claim.
const FD_BUDGET_PERCENT: u64 = 80;

/// Soft `RLIMIT_NOFILE`, or `None` when unlimited or unavailable.
#[cfg(unix)]
pub fn max_open_fds() -> Option<u64> {
    let mut rlim = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: `rlim` is a valid, writable rlimit for the duration of the call.
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut rlim) } != 0 {
        return None;
    }
    let soft = rlim.rlim_cur as u64;
    (rlim.rlim_cur != libc::RLIM_INFINITY && soft <= i64::MAX as u64).then_some(soft)
}

#[cfg(not(unix))]
pub fn max_open_fds() -> Option<u64> {
    None
}

/// Worker cap for a given soft limit. Never below one.
pub fn workers_for_fd_limit(soft_limit: u64) -> usize {
    let budget = soft_limit.saturating_mul(FD_BUDGET_PERCENT) / 100;
    usize::try_from(budget / FDS_PER_WORKER as u64)
        .unwrap_or(usize::MAX)
        .max(1)
}

/// Worker cap for this process, `None` when no limit applies.
pub fn max_workers_by_fd_limit() -> Option<usize> {
    max_open_fds().map(workers_for_fd_limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workers_for_fd_limit() {
        assert_eq!(workers_for_fd_limit(1024), 204);
        assert_eq!(workers_for_fd_limit(256), 51);
        assert_eq!(workers_for_fd_limit(3), 1);
        assert_eq!(workers_for_fd_limit(0), 1);
    }

    #[test]
    fn test_fd_cap_is_positive_when_present() {
        if let Some(n) = max_workers_by_fd_limit() {
            assert!(n >= 1);
        }
    }
}
