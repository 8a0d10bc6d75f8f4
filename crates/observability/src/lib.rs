//! Shared logging setup for hosts embedding the engine.

pub mod tracing;

/// Initialize process-wide logging.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
