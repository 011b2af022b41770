// restsync-api: Thin async RESTCONF client (GET/PUT/PATCH/DELETE/POST)

pub mod client;
pub mod error;
pub mod response;
pub mod transport;

pub use client::{Credentials, RestconfClient};
pub use error::Error;
pub use response::ApiResponse;
pub use transport::{Method, TlsMode, Transport, TransportConfig};
