//! HTTP request surface.
//!
//! # Data Flow
//! ```text
//! caller
//!     → request.rs (RequestOptions: method, headers, body, deadline)
//!     → resilience::failover (one reqwest request per endpoint attempt)
//!     → reqwest::Response, or error.rs (FetchError)
//! ```

pub mod error;
pub mod request;

pub use error::{AttemptFailure, FetchError, FetchResult};
pub use request::RequestOptions;
