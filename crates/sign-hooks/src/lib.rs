//! sign-hooks: pipeline de request/respuesta alrededor del firmador.
//!
//! - `interceptor`: hooks `prepare` / `dispatch` y registro de requests en vuelo.
//! - `timer`: guard de timeout con limpieza idempotente.
//! - `state`: máquina de estados por request.
//! - `event`: log append-only del ciclo de vida.
//! - `transport`: seam asíncrono hacia el cliente HTTP.
//! - `error`: forma normalizada de los errores.
pub mod error;
pub mod event;
pub mod interceptor;
pub mod state;
pub mod timer;
pub mod transport;

pub use error::{ErrorKind, HookError, TransportFailure};
pub use event::{EventLog, InMemoryEventLog, RequestEvent, RequestEventKind, DEFAULT_RETENTION};
pub use interceptor::{Interceptor, RequestHandle};
pub use state::RequestState;
pub use timer::TimeoutGuard;
pub use transport::{EchoTransport, SignedRequest, Transport, TransportResponse};
