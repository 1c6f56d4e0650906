mod dialoguer_terminal;
mod process_command;

pub use dialoguer_terminal::DialoguerTerminal;
pub use process_command::ProcessCommandRunner;
