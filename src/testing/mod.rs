mod env_guard;
mod fake_commands;
mod fake_generator;
mod scripted_terminal;

pub use env_guard::EnvVarGuard;
pub use fake_commands::FakeCommands;
pub use fake_generator::FakeGenerator;
pub use scripted_terminal::{Answer, ScriptedTerminal};
