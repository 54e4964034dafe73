//! Guard de timeout por request.
//!
//! Al iniciarse lanza una tarea tokio que duerme el presupuesto del request y,
//! si llega a despertar, marca `fired` y cancela el token. `clear` aborta esa
//! tarea y registra `TimerCleared`; es idempotente y también se ejecuta en
//! `Drop`, así que cualquier salida del pipeline limpia el timer una vez.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{ErrorKind, HookError};
use crate::event::{EventLog, RequestEventKind};

pub struct TimeoutGuard {
    request_id: Uuid,
    fired: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
    cleared: bool,
    events: Arc<dyn EventLog>,
}

impl TimeoutGuard {
    /// Requiere un runtime tokio activo en el hilo actual.
    pub fn start(request_id: Uuid,
                 timeout: Duration,
                 token: CancellationToken,
                 events: Arc<dyn EventLog>)
                 -> Result<Self, HookError> {
        let runtime = Handle::try_current().map_err(|e| {
                                               HookError::new(ErrorKind::InvalidArgument, format!("no tokio runtime: {e}"))
                                                   .with_request(request_id)
                                           })?;
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let task = runtime.spawn(async move {
                              tokio::time::sleep(timeout).await;
                              flag.store(true, Ordering::SeqCst);
                              token.cancel();
                          });
        Ok(Self { request_id,
                  fired,
                  task: Some(task),
                  cleared: false,
                  events })
    }

    /// `true` si el timeout expiró antes de limpiar el guard.
    pub fn fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Devuelve `true` sólo la primera vez.
    pub fn clear(&mut self) -> bool {
        if self.cleared {
            return false;
        }
        self.cleared = true;
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.events.append_kind(self.request_id, RequestEventKind::TimerCleared);
        true
    }
}

impl Drop for TimeoutGuard {
    fn drop(&mut self) {
        self.clear();
    }
}
