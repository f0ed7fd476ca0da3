// Default size of the probe worker pool

use std::thread;

pub const MAX_DEFAULT_WORKERS: usize = 32;

/// `min(32, parallelism + 5)`
pub fn default_worker_count(available_parallelism: usize) -> usize {
    MAX_DEFAULT_WORKERS.min(available_parallelism.saturating_add(5))
}

/// Default worker count for this machine, computed once at startup.
pub fn host_default_worker_count() -> usize {
    let available = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    default_worker_count(available)
}
