//! Process-wide `tracing` subscriber.
//!
//! Human-readable records on stderr with colored levels and call sites.
//! Under systemd the journal stamps each line itself, so the timestamp is
//! dropped there. Panics are logged at ERROR with their location and a
//! backtrace taken at the panic site.

use std::any::Any;
use std::backtrace::Backtrace;
use std::ffi::OsString;
use std::sync::Once;

use httpdummy_core::error::{HttpDummyError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` overrides the default `info`.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true);

    let res = if systemd_detected(|k| std::env::var_os(k)) {
        builder.without_time().try_init()
    } else {
        builder.try_init()
    };
    res.map_err(|e| HttpDummyError::Internal(format!("logger init failed: {e}")))?;
    install_panic_hook();
    Ok(())
}

/// Route panics through `tracing`. Only the first call installs the hook.
pub fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let backtrace = Backtrace::force_capture();
            let msg = panic_message(info.payload());
            let location = info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_default();
            tracing::error!(%location, %backtrace, "panicked: {msg}");
        }));
    });
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// True when started by systemd (`INVOCATION_ID` or `JOURNAL_STREAM` set).
pub fn systemd_detected(var: impl Fn(&str) -> Option<OsString>) -> bool {
    ["INVOCATION_ID", "JOURNAL_STREAM"]
        .into_iter()
        .any(|k| var(k).is_some_and(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journal_env_drops_timestamps() {
        assert!(!systemd_detected(|_| None));
        assert!(systemd_detected(|k| (k == "JOURNAL_STREAM").then(|| "8:123".into())));
        assert!(systemd_detected(|k| (k == "INVOCATION_ID").then(|| "abc".into())));
        assert!(!systemd_detected(|_| Some(OsString::new())));
    }
}
