use thiserror::Error;

use crate::light::LightKind;

/// Errors raised while assembling a fixed-capacity light set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LightSetError {
    #[error("too many {kind} lights: the light set holds at most {capacity}")]
    CapacityExceeded { kind: LightKind, capacity: usize },
}
