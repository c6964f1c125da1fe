mod backend;

pub use backend::{ApiError, BackendClient};
