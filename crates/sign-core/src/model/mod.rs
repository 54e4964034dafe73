//! Modelos del request saliente (descriptor, headers, sesión).

pub mod headers;
pub mod request;
pub mod session;

pub use headers::HeaderBag;
pub use request::{HttpMethod, OutboundRequest};
pub use session::SessionContext;
