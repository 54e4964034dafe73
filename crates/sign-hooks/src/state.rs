use serde::{Deserialize, Serialize};

/// Estado de un request dentro del pipeline.
///
/// Las transiciones válidas son:
/// - `Created` -> `Signed`
/// - `Signed` -> `Sent`
/// - `Signed` -> `Failed` | `Cancelled` (timeout o cancelación antes de enviar)
/// - `Sent` -> `Completed` | `Failed` | `Cancelled`
///
/// Los estados terminales no admiten más transiciones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestState {
    Created,
    Signed,
    Sent,
    Completed,
    Failed,
    Cancelled,
}

impl RequestState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    pub fn can_transition(self, next: RequestState) -> bool {
        use RequestState::*;
        matches!((self, next),
                 (Created, Signed)
                 | (Signed, Sent)
                 | (Signed, Failed)
                 | (Signed, Cancelled)
                 | (Sent, Completed)
                 | (Sent, Failed)
                 | (Sent, Cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::RequestState::*;

    #[test]
    fn happy_path_transitions() {
        assert!(Created.can_transition(Signed));
        assert!(Signed.can_transition(Sent));
        assert!(Sent.can_transition(Completed));
    }

    #[test]
    fn terminal_states_are_final() {
        for terminal in [Completed, Failed, Cancelled] {
            assert!(terminal.is_terminal());
            for next in [Created, Signed, Sent, Completed, Failed, Cancelled] {
                assert!(!terminal.can_transition(next));
            }
        }
    }

    #[test]
    fn skipping_signing_is_rejected() {
        assert!(!Created.can_transition(Sent));
        assert!(!Sent.can_transition(Signed));
    }
}
