//! Drives the workflow: perform effects, feed the event back, repeat.

use crate::domain::workflow::{self, Effect, Event, State, Transition};
use crate::ports::EffectHandler;

/// Run the workflow to a terminal state.
///
/// Effects attached to the terminal transition (cleanup, messages) are still
/// performed. Handler failures end the run in `State::Error`.
pub fn drive<H: EffectHandler + ?Sized>(handler: &mut H) -> State {
    let mut step = workflow::start();
    loop {
        let Transition { state, effects } = step;
        let event = match perform_all(handler, effects) {
            Ok(event) => event,
            Err(message) => return State::error(message),
        };

        if state.is_terminal() {
            if let Some(event) = event {
                tracing::warn!(
                    state = state.name(),
                    event = event.name(),
                    "event after terminal state ignored"
                );
            }
            tracing::debug!(state = state.name(), "finished");
            return state;
        }

        let Some(event) = event else {
            return State::error(format!(
                "Workflow stalled in state '{}': no event was produced",
                state.name()
            ));
        };
        tracing::debug!(state = state.name(), event = event.name(), "transition");
        step = workflow::transition(state, event);
    }
}

/// Perform effects in order; at most one of them may produce an event.
fn perform_all<H: EffectHandler + ?Sized>(
    handler: &mut H,
    effects: Vec<Effect>,
) -> Result<Option<Event>, String> {
    let mut produced: Option<Event> = None;
    for effect in effects {
        let name = effect.name();
        let event = handler.perform(effect).map_err(|err| err.to_string())?;
        if let Some(event) = event {
            if let Some(previous) = &produced {
                return Err(format!(
                    "Effect '{}' produced '{}' after '{}' was already produced",
                    name,
                    event.name(),
                    previous.name()
                ));
            }
            produced = Some(event);
        }
    }
    Ok(produced)
}
