//! Raise the open-file limit so many concurrent slow connections fit.

/// Soft and hard `RLIMIT_NOFILE` requested at startup.
pub const NOFILE_TARGET: u64 = 1_000_000;

/// Try to raise `RLIMIT_NOFILE` to [`NOFILE_TARGET`]; warn when the resulting
/// hard limit stays below it. Never fatal. Returns the (soft, hard) limits
/// in effect afterwards, when they could be read.
#[cfg(target_os = "linux")]
pub fn raise_nofile() -> Option<(u64, u64)> {
    use nix::sys::resource::{getrlimit, setrlimit, Resource};

    if let Err(e) = setrlimit(Resource::RLIMIT_NOFILE, NOFILE_TARGET, NOFILE_TARGET) {
        tracing::debug!(error = %e, "setrlimit(RLIMIT_NOFILE) failed");
    }
    match getrlimit(Resource::RLIMIT_NOFILE) {
        Ok((soft, hard)) => {
            if hard < NOFILE_TARGET {
                tracing::warn!(
                    soft,
                    hard,
                    "open file limit is below 1 mil, run this app as root or set the limit via ulimit"
                );
            }
            Some((soft, hard))
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "error getting rlimit, make sure it is big if you want to test concurrency using this tool"
            );
            None
        }
    }
}

#[cfg(not(target_os = "linux"))]
pub fn raise_nofile() -> Option<(u64, u64)> {
    None
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    #[test]
    fn reports_limits_without_failing() {
        let (soft, hard) = raise_nofile().unwrap_or_default();
        assert!(soft <= hard);
    }
}
