//! Upstream generation: wire types, the proxy transport and the retrying
//! request engine.

pub mod markdown;
pub mod reliable;
pub mod transport;
pub mod types;

pub use markdown::strip_markdown;
pub use reliable::{RequestEngine, RetryPolicy, Sleeper, TokioSleeper};
pub use transport::{GenerateTransport, ProxyClient};
pub use types::{GenerateRequest, GenerateResponse};
