pub mod logger;

pub use logger::{init_logger, install_panic_hook};
