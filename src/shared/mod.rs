pub mod pagination;
pub mod shutdown;

pub use pagination::{pages_count, PageWindow};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
