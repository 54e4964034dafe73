//! Eventos del ciclo de vida de cada request.
//!
//! Log append-only: cada transición del pipeline agrega un `RequestEvent`.
//! Permite verificar, por ejemplo, que el timer se limpió exactamente una vez.
//!
//! `InMemoryEventLog::bounded` retiene sólo los últimos N requests; el
//! `Interceptor` lo usa por defecto con `DEFAULT_RETENTION`.
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sign_core::EndpointCategory;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

use crate::error::ErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestEventKind {
    /// Headers calculados para la categoría decidida.
    Signed { category: EndpointCategory },
    Sent,
    /// El guard de timeout se limpió (se emite una sola vez por request).
    TimerCleared,
    Completed { status: u16 },
    Failed { kind: ErrorKind },
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEvent {
    pub seq: u64, // orden de append dentro del request
    pub request_id: Uuid,
    pub kind: RequestEventKind,
    pub ts: DateTime<Utc>,
}

/// Almacenamiento de eventos append-only, compartido entre tareas.
pub trait EventLog: Send + Sync {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&self, request_id: Uuid, kind: RequestEventKind) -> RequestEvent;
    /// Lista eventos de un request (orden ascendente por seq).
    fn list(&self, request_id: Uuid) -> Vec<RequestEvent>;
}

/// Requests retenidos por el log por defecto del `Interceptor`.
pub const DEFAULT_RETENTION: usize = 1024;

#[derive(Default)]
pub struct InMemoryEventLog {
    inner: DashMap<Uuid, Vec<RequestEvent>>,
    /// `None`: sin límite.
    capacity: Option<usize>,
    /// Ids en orden de primer evento; el frente es el más antiguo.
    order: Mutex<VecDeque<Uuid>>,
}

impl InMemoryEventLog {
    /// Log sin límite (tests y herramientas de corta vida).
    pub fn new() -> Self {
        Self::default()
    }

    /// Retiene como mucho `max_requests` requests; al superar el límite se
    /// descartan completos los más antiguos.
    pub fn bounded(max_requests: usize) -> Self {
        Self { capacity: Some(max_requests.max(1)),
               ..Self::default() }
    }

    pub fn request_ids(&self) -> Vec<Uuid> {
        self.inner.iter().map(|entry| *entry.key()).collect()
    }

    /// Requests retenidos ahora mismo.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    // Se llama sin guard de DashMap tomado: orden de locks `order` -> shard.
    fn track(&self, request_id: Uuid) {
        let Some(capacity) = self.capacity else {
            return;
        };
        let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
        order.push_back(request_id);
        while order.len() > capacity {
            if let Some(oldest) = order.pop_front() {
                self.inner.remove(&oldest);
            }
        }
    }
}

impl EventLog for InMemoryEventLog {
    fn append_kind(&self, request_id: Uuid, kind: RequestEventKind) -> RequestEvent {
        let (ev, first) = {
            let mut events = self.inner.entry(request_id).or_default();
            let ev = RequestEvent { seq: events.len() as u64,
                                    request_id,
                                    kind,
                                    ts: Utc::now() };
            events.push(ev.clone());
            (ev, events.len() == 1)
        };
        if first {
            self.track(request_id);
        }
        ev
    }

    fn list(&self, request_id: Uuid) -> Vec<RequestEvent> {
        self.inner.get(&request_id).map(|events| events.value().clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_per_request() {
        let log = InMemoryEventLog::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        log.append_kind(a, RequestEventKind::Sent);
        log.append_kind(b, RequestEventKind::Sent);
        let ev = log.append_kind(a, RequestEventKind::TimerCleared);
        assert_eq!(ev.seq, 1);
        assert_eq!(log.list(a).len(), 2);
        assert_eq!(log.list(b)[0].seq, 0);
        assert!(log.list(Uuid::new_v4()).is_empty());
        assert_eq!(log.request_ids().len(), 2);
    }

    #[test]
    fn bounded_log_drops_oldest_requests() {
        let log = InMemoryEventLog::bounded(3);
        let ids: Vec<Uuid> = (0..10).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            log.append_kind(*id, RequestEventKind::Sent);
            log.append_kind(*id, RequestEventKind::TimerCleared);
            assert!(log.len() <= 3);
        }
        assert_eq!(log.len(), 3);
        assert!(log.list(ids[0]).is_empty());
        for id in &ids[7..] {
            assert_eq!(log.list(*id).len(), 2);
        }
    }

    #[test]
    fn unbounded_log_keeps_everything() {
        let log = InMemoryEventLog::new();
        for _ in 0..50 {
            log.append_kind(Uuid::new_v4(), RequestEventKind::Sent);
        }
        assert_eq!(log.len(), 50);
    }
}
