//! Feature-gated tracing macros for the grounding pipeline.
//!
//! With the `tracing` feature the macros below are the `tracing` crate's own.
//! Without it they expand to nothing, so joins and fixpoint passes pay no
//! logging cost in release builds that leave the feature off.
//!
//! ```rust,ignore
//! use crate::trace::{debug, debug_span, trace};
//!
//! let _span = debug_span!("instantiate", action = %name).entered();
//! trace!(left = 3, right = 4, "hash_join");
//! debug!(pass = 2, added = 17, "fact layer pass");
//! ```

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, info, trace, warn, Span};

#[cfg(not(feature = "tracing"))]
mod noop {
    /// Stand-in for `tracing::Span`.
    pub struct Span;

    impl Span {
        pub fn none() -> Self {
            Span
        }

        pub fn entered(self) -> SpanGuard {
            SpanGuard
        }
    }

    pub struct SpanGuard;

    impl Drop for SpanGuard {
        fn drop(&mut self) {}
    }

    #[macro_export]
    macro_rules! trace {
        ($($tt:tt)*) => {};
    }

    #[macro_export]
    macro_rules! debug {
        ($($tt:tt)*) => {};
    }

    #[macro_export]
    macro_rules! info {
        ($($tt:tt)*) => {};
    }

    #[macro_export]
    macro_rules! warn {
        ($($tt:tt)*) => {};
    }

    #[macro_export]
    macro_rules! debug_span {
        ($($tt:tt)*) => {
            $crate::trace::Span::none()
        };
    }

    pub use crate::{debug, debug_span, info, trace, warn};
}

#[cfg(not(feature = "tracing"))]
pub use noop::*;

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "RELGROUND_LOG";

/// Install a stderr subscriber.
///
/// The filter comes from `RELGROUND_LOG`, then `RUST_LOG`, then `info`.
/// Calling this more than once is harmless.
#[cfg(feature = "tracing")]
pub fn init_subscriber() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(false),
        )
        .with(filter)
        .try_init()
        .ok();
}

#[cfg(not(feature = "tracing"))]
pub fn init_subscriber() {}

/// Install a flamegraph layer writing folded stacks to `path`.
///
/// The returned guard flushes the file when dropped.
#[cfg(feature = "tracing")]
pub fn init_flamegraph(
    path: &str,
) -> Result<impl Drop, tracing_flame::Error> {
    use tracing_flame::FlameLayer;
    use tracing_subscriber::{prelude::*, registry::Registry};

    let (flame_layer, guard) = FlameLayer::with_file(path)?;
    Registry::default().with(flame_layer).try_init().ok();
    Ok(guard)
}

#[cfg(not(feature = "tracing"))]
pub fn init_flamegraph(_path: &str) -> Result<impl Drop, std::convert::Infallible> {
    struct NoopGuard;
    impl Drop for NoopGuard {
        fn drop(&mut self) {}
    }
    Ok(NoopGuard)
}

#[cfg(test)]
#[path = "tests/trace.rs"]
mod tests;
