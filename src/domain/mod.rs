pub mod error;
pub mod host;
pub mod model;

pub use error::FetchError;
pub use host::HostSink;
pub use model::KeySettings;
