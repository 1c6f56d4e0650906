use crate::domain::AppError;
use crate::domain::workflow::{Effect, Event};

/// Performs one effect and reports what happened.
///
/// `Ok(None)` means the effect produces no event (logging, cleanup). An `Err`
/// ends the run in the error state.
pub trait EffectHandler {
    fn perform(&mut self, effect: Effect) -> Result<Option<Event>, AppError>;
}
