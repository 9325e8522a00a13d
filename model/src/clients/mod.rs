pub use cluster_clients::ClusterClientSet;
pub use error::{Error, Result};
pub use http_status_code::{HttpStatusCode, StatusCode};
pub use object_ops::{upsert, ObjectOps};

mod cluster_clients;
mod error;
mod http_status_code;
mod object_ops;
