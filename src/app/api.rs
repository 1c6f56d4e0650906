//! Operations behind the CLI, wired to the real adapters.

use std::path::PathBuf;

use crate::domain::workflow::{State, Tone};
use crate::domain::{AppError, ProviderKind, RunMode, Settings};
use crate::ports::{Generator, Terminal};
use crate::services::{
    DialoguerTerminal, EffectExecutor, ExecutorOptions, FallbackGenerator, FileConfigStore,
    HttpCompletionClient, LlmGenerator, ManualGenerator, ProcessCommandRunner,
};

use super::drive;

/// How and where to run the ship workflow.
#[derive(Debug, Clone)]
pub struct ShipOptions {
    pub mode: RunMode,
    pub root: PathBuf,
}

/// Run the workflow with settings from the config store.
pub fn ship(options: &ShipOptions) -> Result<State, AppError> {
    let settings = FileConfigStore::locate()?.load()?;
    ship_with_settings(options, &settings)
}

pub fn ship_with_settings(options: &ShipOptions, settings: &Settings) -> Result<State, AppError> {
    if !options.root.is_dir() {
        return Err(AppError::config_error(format!(
            "Directory not found: {}",
            options.root.display()
        )));
    }
    tracing::debug!(mode = %options.mode.describe(), root = %options.root.display(), "ship");

    let runner = ProcessCommandRunner::new(options.root.clone());
    let terminal = DialoguerTerminal::new();
    let api_key = settings.resolve_api_key(std::env::var(settings.provider.api_key_env()).ok());
    let generator = build_generator(settings, options.mode, api_key, &terminal)?;
    let executor_options = ExecutorOptions {
        mode: options.mode,
        merge_strategy: settings.merge_strategy,
        delete_branch: settings.delete_branch,
    };

    let mut executor =
        EffectExecutor::new(&runner, options.root.clone(), &terminal, generator, executor_options);
    Ok(drive(&mut executor))
}

/// Generator for the run: the configured provider, backed by manual entry
/// when interactive. Autonomous runs cannot proceed without a provider key.
pub fn build_generator<'a, T: Terminal + ?Sized>(
    settings: &Settings,
    mode: RunMode,
    api_key: Option<String>,
    terminal: &'a T,
) -> Result<Box<dyn Generator + 'a>, AppError> {
    let llm = match api_key {
        Some(key) => Some(LlmGenerator::new(
            HttpCompletionClient::new(key, settings)?,
            settings.max_diff_chars,
        )?),
        None => None,
    };

    match (llm, mode.is_interactive()) {
        (Some(llm), true) => {
            Ok(Box::new(FallbackGenerator::new(llm, ManualGenerator::new(terminal))))
        }
        (Some(llm), false) => Ok(Box::new(llm)),
        (None, true) => {
            terminal.say(
                Tone::Warning,
                &format!(
                    "No {} API key configured; commit details will be entered by hand",
                    settings.provider.as_str()
                ),
            );
            Ok(Box::new(ManualGenerator::new(terminal)))
        }
        (None, false) => Err(AppError::config_error(format!(
            "No {} API key: set {} or run `gitship config set-key`",
            settings.provider.as_str(),
            settings.provider.api_key_env()
        ))),
    }
}

/// Config file location and its redacted settings.
pub fn config_show() -> Result<(PathBuf, Vec<(String, String)>), AppError> {
    let store = FileConfigStore::locate()?;
    let settings = store.load()?;
    Ok((store.path().to_path_buf(), settings.describe()))
}

/// Validate and persist one setting. Returns the config file path.
pub fn config_set(key: &str, value: &str) -> Result<PathBuf, AppError> {
    let store = FileConfigStore::locate()?;
    let mut settings = store.load()?;
    settings.set_field(key, value)?;
    store.save(&settings)?;
    Ok(store.path().to_path_buf())
}

/// Store an API key for `provider`, defaulting to the configured provider.
pub fn config_set_key(provider: Option<ProviderKind>, key: &str) -> Result<ProviderKind, AppError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::config_error("API key must not be empty"));
    }
    let store = FileConfigStore::locate()?;
    let mut settings = store.load()?;
    let provider = provider.unwrap_or(settings.provider);
    settings.set_api_key(provider, key.to_string());
    store.save(&settings)?;
    Ok(provider)
}

/// Read a key without echo and store it; `None` when the prompt was cancelled.
pub fn config_prompt_key<T: Terminal + ?Sized>(
    terminal: &T,
    provider: Option<ProviderKind>,
) -> Result<Option<ProviderKind>, AppError> {
    let Some(key) = terminal.password("API key")? else {
        return Ok(None);
    };
    config_set_key(provider, &key).map(Some)
}
