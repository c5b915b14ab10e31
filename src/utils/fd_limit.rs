//! File descriptor limit detection for capping the hashing pool (Unix).

/// Each hashing worker holds one open file at a time.
pub const FDS_PER_WORKER: usize = 1;

/// Fraction of the process FD limit to use (leave room for the DB, stdio and the walk).
const FD_LIMIT_FRACTION: f64 = 0.8;

/// Returns the soft limit for max open file descriptors, or `None` if unavailable (e.g. Windows).
#[cfg(unix)]
pub fn max_open_fds() -> Option<u64> {
    use std::mem::MaybeUninit;
    let mut rlim = MaybeUninit::<libc::rlimit>::uninit();
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, rlim.as_mut_ptr()) } != 0 {
        return None;
    }
    let rlim = unsafe { rlim.assume_init() };
    let cur = rlim.rlim_cur;
    // RLIM_INFINITY is typically !0 or u64::MAX; treat as "no practical limit"
    if cur == libc::RLIM_INFINITY || cur > i64::MAX as u64 {
        return None;
    }
    Some(cur)
}

#[cfg(not(unix))]
pub fn max_open_fds() -> Option<u64> {
    None
}

/// Largest worker count that stays under ~80% of the FD limit, or `None` when there is no limit.
pub fn max_workers_by_fd_limit() -> Option<usize> {
    let limit = max_open_fds()?;
    let usable = (limit as f64 * FD_LIMIT_FRACTION) as usize;
    if usable < FDS_PER_WORKER {
        return Some(1);
    }
    Some(usable / FDS_PER_WORKER)
}

/// Clamp a requested worker count to `[1, fd cap]`.
pub fn cap_workers(requested: usize) -> usize {
    let requested = requested.max(1);
    match max_workers_by_fd_limit() {
        Some(cap) if cap < requested => {
            log::debug!("Capping workers {} -> {} (FD limit ~80%)", requested, cap);
            cap.max(1)
        }
        _ => requested,
    }
}
