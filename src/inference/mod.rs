pub mod http_transport;
pub mod traits;

pub use http_transport::HttpTransport;
pub use traits::{InferenceCall, InferenceTransport};
