//! Service context bundling the port trait objects.

use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;

/// Bundles the clock and filesystem ports into a single handle.
///
/// Commands construct one live context per invocation; tests build one from
/// a frozen clock and an in-memory filesystem.
pub struct ServiceContext {
    /// Clock for timestamps and the archive cutoff.
    pub clock: Box<dyn Clock>,
    /// Filesystem for all persistence.
    pub fs: Box<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a context with the real clock and disk.
    #[must_use]
    pub fn live() -> Self {
        use crate::adapters::live::clock::LiveClock;
        use crate::adapters::live::filesystem::LiveFileSystem;

        Self { clock: Box::new(LiveClock), fs: Box::new(LiveFileSystem) }
    }

    /// Creates a context from explicit port implementations.
    #[must_use]
    pub fn with(clock: Box<dyn Clock>, fs: Box<dyn FileSystem>) -> Self {
        Self { clock, fs }
    }
}
