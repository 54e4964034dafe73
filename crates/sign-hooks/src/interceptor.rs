//! Hooks de request/respuesta alrededor de un `Transport`.
//!
//! Rol en el flujo:
//! - `prepare` (hook de request): clasifica, firma con el `HeaderAssembler`,
//!   arranca el guard de timeout y registra el token de cancelación.
//! - `dispatch` (hook de respuesta): envía, espera respuesta / timeout /
//!   cancelación, limpia el guard y normaliza el resultado.
//! - `execute` encadena ambos.
//!
//! No hay reintentos: cada request sale como mucho una vez.

use dashmap::DashMap;
use log::{debug, info, warn};
use sign_core::constants::HEADER_REQUEST_ID;
use sign_core::{EndpointCategory, HeaderAssembler, OutboundRequest, SessionContext, SignerConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{ErrorKind, HookError};
use crate::event::{EventLog, InMemoryEventLog, RequestEventKind, DEFAULT_RETENTION};
use crate::state::RequestState;
use crate::timer::TimeoutGuard;
use crate::transport::{SignedRequest, Transport, TransportResponse};

type InFlight = Arc<DashMap<Uuid, CancellationToken>>;

#[derive(Clone)]
pub struct Interceptor {
    assembler: Arc<HeaderAssembler>,
    transport: Arc<dyn Transport>,
    events: Arc<dyn EventLog>,
    timeout: Duration,
    in_flight: InFlight,
}

impl Interceptor {
    /// Usa un `InMemoryEventLog` acotado a `DEFAULT_RETENTION` requests.
    pub fn new(assembler: HeaderAssembler, transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self { assembler: Arc::new(assembler),
               transport,
               events: Arc::new(InMemoryEventLog::bounded(DEFAULT_RETENTION)),
               timeout,
               in_flight: Arc::new(DashMap::new()) }
    }

    /// Toma el timeout de `SignerConfig`.
    pub fn from_config(config: &SignerConfig, assembler: HeaderAssembler, transport: Arc<dyn Transport>) -> Self {
        Self::new(assembler, transport, config.timeout)
    }

    pub fn with_event_log(mut self, events: Arc<dyn EventLog>) -> Self {
        self.events = events;
        self
    }

    pub fn events(&self) -> Arc<dyn EventLog> {
        self.events.clone()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Cancela un request en vuelo. `false` si el id no está registrado.
    pub fn cancel(&self, request_id: Uuid) -> bool {
        match self.in_flight.get(&request_id) {
            Some(token) => {
                token.cancel();
                info!("request {request_id} cancelled by caller");
                true
            }
            None => false,
        }
    }

    /// Hook de request: `Created -> Signed`.
    pub fn prepare(&self, request: OutboundRequest, session: &SessionContext) -> Result<RequestHandle, HookError> {
        let mut state = RequestState::Created;
        let category = request.category();
        debug!("classified {} as {}", request.url, category);

        let headers = self.assembler.assemble(&request, session, category)?;
        let id = headers.get(HEADER_REQUEST_ID)
                        .and_then(|raw| Uuid::parse_str(raw).ok())
                        .unwrap_or_else(Uuid::new_v4);

        let token = CancellationToken::new();
        let guard = TimeoutGuard::start(id, self.timeout, token.clone(), self.events.clone())?;
        self.in_flight.insert(id, token.clone());
        let registration = Registration { id,
                                          registry: self.in_flight.clone() };

        advance(id, &mut state, RequestState::Signed)?;
        self.events.append_kind(id, RequestEventKind::Signed { category });

        let signed = SignedRequest { id,
                                     category,
                                     method: request.method,
                                     url: request.url,
                                     payload: request.payload,
                                     headers };
        Ok(RequestHandle { id,
                           state,
                           request: signed,
                           token,
                           guard,
                           _registration: registration })
    }

    /// Hook de respuesta: envía y resuelve el estado final.
    pub async fn dispatch(&self, mut handle: RequestHandle) -> Result<TransportResponse, HookError> {
        let id = handle.id;
        if handle.token.is_cancelled() {
            return Err(self.abort(&mut handle));
        }

        advance(id, &mut handle.state, RequestState::Sent)?;
        self.events.append_kind(id, RequestEventKind::Sent);

        let outcome = tokio::select! {
            biased;
            _ = handle.token.cancelled() => None,
            result = self.transport.send(handle.request.clone(), handle.token.clone()) => Some(result),
        };
        handle.guard.clear();

        match outcome {
            Some(Ok(response)) if response.status >= 400 => {
                let err = HookError::new(ErrorKind::TransportError, format!("http status {}", response.status))
                    .with_request(id)
                    .with_status(response.status);
                Err(self.fail(&mut handle, err))
            }
            Some(Ok(response)) => {
                advance(id, &mut handle.state, RequestState::Completed)?;
                self.events.append_kind(id, RequestEventKind::Completed { status: response.status });
                debug!("request {id} completed with status {}", response.status);
                Ok(response)
            }
            Some(Err(failure)) => Err(self.fail(&mut handle, HookError::transport(id, failure))),
            None => Err(self.abort(&mut handle)),
        }
    }

    /// `prepare` + `dispatch`.
    pub async fn execute(&self, request: OutboundRequest, session: &SessionContext)
                         -> Result<TransportResponse, HookError> {
        let handle = self.prepare(request, session)?;
        self.dispatch(handle).await
    }

    // Token cancelado: por timeout si el guard disparó, si no por el caller.
    fn abort(&self, handle: &mut RequestHandle) -> HookError {
        let id = handle.id;
        let fired = handle.guard.fired();
        handle.guard.clear();
        if fired {
            warn!("request {id} timed out after {} ms", self.timeout.as_millis());
            self.fail(handle, HookError::timeout(id, self.timeout))
        } else {
            if advance(id, &mut handle.state, RequestState::Cancelled).is_ok() {
                self.events.append_kind(id, RequestEventKind::Cancelled);
            }
            HookError::cancelled(id)
        }
    }

    fn fail(&self, handle: &mut RequestHandle, err: HookError) -> HookError {
        let id = handle.id;
        warn!("request {id} failed: {err}");
        if advance(id, &mut handle.state, RequestState::Failed).is_ok() {
            self.events.append_kind(id, RequestEventKind::Failed { kind: err.kind });
        }
        err
    }
}

fn advance(id: Uuid, state: &mut RequestState, next: RequestState) -> Result<(), HookError> {
    if !state.can_transition(next) {
        return Err(HookError::invalid_transition(id, *state, next));
    }
    *state = next;
    Ok(())
}

/// Request firmado a la espera de `dispatch`.
///
/// Soltarlo sin despachar limpia el timer y lo quita del registro en vuelo.
pub struct RequestHandle {
    id: Uuid,
    state: RequestState,
    request: SignedRequest,
    token: CancellationToken,
    guard: TimeoutGuard,
    _registration: Registration,
}

impl RequestHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn category(&self) -> EndpointCategory {
        self.request.category
    }

    pub fn request(&self) -> &SignedRequest {
        &self.request
    }
}

struct Registration {
    id: Uuid,
    registry: InFlight,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::EchoTransport;
    use sign_core::{ChannelReference, HttpMethod, StaticLookups};

    fn interceptor() -> Interceptor {
        let lookups = Arc::new(StaticLookups::new().with_channel(ChannelReference::new("CH-1")));
        let assembler = HeaderAssembler::from_lookups(&SignerConfig::new("secret"), lookups);
        Interceptor::new(assembler, Arc::new(EchoTransport), Duration::from_secs(5))
    }

    fn session() -> SessionContext {
        SessionContext::new("uid-1", "CH-1").unwrap()
    }

    #[tokio::test]
    async fn prepare_signs_and_registers() {
        let icpt = interceptor();
        let handle = icpt.prepare(OutboundRequest::new(HttpMethod::Post, "/resume"), &session()).unwrap();
        assert_eq!(handle.state(), RequestState::Signed);
        assert_eq!(handle.category(), EndpointCategory::Resume);
        assert_eq!(handle.request().headers.get(HEADER_REQUEST_ID), Some(handle.id().to_string().as_str()));
        assert_eq!(icpt.in_flight(), 1);
        let id = handle.id();
        drop(handle);
        assert_eq!(icpt.in_flight(), 0);
        assert!(!icpt.cancel(id));
        let kinds: Vec<_> = icpt.events().list(id).into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds,
                   vec![RequestEventKind::Signed { category: EndpointCategory::Resume },
                        RequestEventKind::TimerCleared]);
    }

    #[tokio::test]
    async fn missing_context_never_registers() {
        let icpt = interceptor();
        let bad: SessionContext = serde_json::from_str(r#"{"sessionUid":" ","channelRefNo":"CH-1"}"#).unwrap();
        let err = icpt.prepare(OutboundRequest::new(HttpMethod::Post, "/resume"), &bad).err().unwrap();
        assert_eq!(err.kind, ErrorKind::MissingContext);
        assert_eq!(icpt.in_flight(), 0);
    }

    #[tokio::test]
    async fn cancelled_before_dispatch_is_not_sent() {
        let icpt = interceptor();
        let handle = icpt.prepare(OutboundRequest::new(HttpMethod::Post, "/apply"), &session()).unwrap();
        let id = handle.id();
        assert!(icpt.cancel(id));
        let err = icpt.dispatch(handle).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);
        let kinds: Vec<_> = icpt.events().list(id).into_iter().map(|e| e.kind).collect();
        assert!(!kinds.contains(&RequestEventKind::Sent));
        assert_eq!(kinds.last(), Some(&RequestEventKind::Cancelled));
    }

    #[tokio::test]
    async fn default_event_log_is_bounded() {
        let icpt = interceptor();
        let mut ids = Vec::new();
        for _ in 0..DEFAULT_RETENTION + 16 {
            let handle = icpt.prepare(OutboundRequest::new(HttpMethod::Post, "/resume"), &session()).unwrap();
            ids.push(handle.id());
            icpt.dispatch(handle).await.unwrap();
        }
        let events = icpt.events();
        assert!(events.list(ids[0]).is_empty());
        assert!(events.list(ids[15]).is_empty());
        assert_eq!(events.list(ids[16]).len(), 4);
        assert_eq!(ids.last().map(|id| events.list(*id).len()), Some(4));
    }
}
