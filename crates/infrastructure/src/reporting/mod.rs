//! Reporter implementations.

mod memory;
mod tracing_reporter;

pub use memory::MemoryReporter;
pub use tracing_reporter::TracingReporter;
