//! Tracing setup for the genhost binaries

use std::any::Any;
use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Stream receiving log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Used by the worker: anything it writes to stderr fails the run.
    Stdout,
    Stderr,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `genhost=info,warn`, or `genhost=debug,info`
/// when `verbose` is set.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(
    verbose: bool,
    target: LogTarget,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("genhost=debug,info")
            } else {
                EnvFilter::try_new("genhost=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(verbose)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_ansi(false)
        .compact();

    match target {
        LogTarget::Stdout => tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.with_writer(std::io::stdout))
            .try_init()?,
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.with_writer(std::io::stderr))
            .try_init()?,
    }

    Ok(())
}

/// Report panics through `tracing` instead of the default hook.
///
/// The worker contains generator and task panics, so their reports must not reach
/// stderr, which the supervisor reads as a failed run. Installed once per process.
pub fn install_panic_hook() {
    static PANIC_HOOK_INIT: OnceLock<()> = OnceLock::new();
    PANIC_HOOK_INIT.get_or_init(|| {
        std::panic::set_hook(Box::new(|panic_info| {
            let location = panic_info
                .location()
                .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
                .unwrap_or_else(|| "<unknown>".to_string());
            let payload = panic_payload(panic_info.payload());
            tracing::error!(target: "genhost::panic", %location, %payload, "Panic");
        }));
    });
}

fn panic_payload(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_payload_text() {
        let static_str: Box<dyn Any + Send> = Box::new("static message");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        let other: Box<dyn Any + Send> = Box::new(7_u32);

        assert_eq!(panic_payload(static_str.as_ref()), "static message");
        assert_eq!(panic_payload(owned.as_ref()), "owned message");
        assert_eq!(panic_payload(other.as_ref()), "<non-string panic payload>");
    }
}
