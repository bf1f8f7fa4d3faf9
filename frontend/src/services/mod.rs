pub mod api;
pub mod logging;

pub use api::{ApiClient, RemoteStore};
pub use logging::init_logging;
