//! `gitship config` subcommands.

use clap::Subcommand;

use crate::app::api;
use crate::domain::workflow::Tone;
use crate::domain::{AppError, ProviderKind};
use crate::ports::Terminal;
use crate::services::DialoguerTerminal;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print settings with API keys redacted
    Show,
    /// Change one setting, e.g. `merge_strategy rebase`
    Set {
        /// Setting name
        key: String,
        /// New value (empty clears optional settings)
        value: String,
    },
    /// Store an API key, read without echo
    SetKey {
        /// Provider the key belongs to (defaults to the configured provider)
        #[arg(long, value_name = "anthropic|openai")]
        provider: Option<String>,
    },
}

pub fn run_config(command: ConfigCommands) -> Result<(), AppError> {
    match command {
        ConfigCommands::Show => {
            let (path, rows) = api::config_show()?;
            println!("# {}", path.display());
            let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
            for (key, value) in rows {
                println!("{:width$}  {}", key, value, width = width);
            }
        }
        ConfigCommands::Set { key, value } => {
            let path = api::config_set(&key, &value)?;
            println!("✅ Set {} in {}", key, path.display());
        }
        ConfigCommands::SetKey { provider } => {
            let provider = provider.map(|p| p.parse::<ProviderKind>()).transpose()?;
            let terminal = DialoguerTerminal::new();
            match api::config_prompt_key(&terminal, provider)? {
                Some(provider) => println!("✅ Stored {} API key", provider.as_str()),
                None => terminal.say(Tone::Warning, "Cancelled; no key stored"),
            }
        }
    }
    Ok(())
}
