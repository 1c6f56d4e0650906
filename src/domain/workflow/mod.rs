//! Workflow state machine: states, events, effects and the pure transition function.

mod effect;
mod event;
mod state;
mod transition;


pub use effect::{Effect, Tone};
pub use event::{CommitAction, Event, PostCommitChoice};
pub use state::{PushThen, Staged, State};
pub use transition::{Transition, start, transition};
