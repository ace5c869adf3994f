//! `xchain config`: show, locate or create the chain configuration.
//!
//! ```text
//! xchain config              # print chains.toml, or the built-in defaults
//! xchain config path         # print the file location
//! xchain config init [-f]    # write the built-in defaults
//! ```

use std::io::Write;

use xchain_core::config::ChainsConfig;
use xchain_core::config_loader::ConfigLoader;
use xchain_core::error::ConfigError;

use super::CommandError;
use crate::cli::args::ConfigAction;

/// The `xchain config` handler.
#[derive(Debug, Clone)]
pub struct ConfigCommand {
    /// Where the configuration lives.
    pub loader: ConfigLoader,
    /// What to do; `None` shows the configuration.
    pub action: Option<ConfigAction>,
}

impl ConfigCommand {
    /// Command for `loader`.
    #[must_use]
    pub const fn new(loader: ConfigLoader, action: Option<ConfigAction>) -> Self {
        Self { loader, action }
    }

    /// Run the action, writing to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::AlreadyInitialized`] when `init` would
    /// overwrite without `--force`, or a [`CommandError::Config`] if the file
    /// cannot be read or written.
    pub fn run(&self, out: &mut impl Write) -> Result<(), CommandError> {
        match &self.action {
            None => self.show(out),
            Some(ConfigAction::Path) => {
                writeln!(out, "{}", self.loader.config_path().display())?;
                Ok(())
            }
            Some(ConfigAction::Init { force }) => self.init(*force, out),
        }
    }

    fn show(&self, out: &mut impl Write) -> Result<(), CommandError> {
        if !self.loader.exists() {
            writeln!(
                out,
                "# {} not found; built-in defaults:",
                self.loader.config_path().display()
            )?;
            write!(out, "{}", ChainsConfig::default_toml())?;
            return Ok(());
        }
        let config = self.loader.load_required()?;
        let text = toml::to_string_pretty(&config)
            .map_err(|e| ConfigError::parse_failed(format!("failed to render configuration: {e}")))?;
        write!(out, "{text}")?;
        Ok(())
    }

    fn init(&self, force: bool, out: &mut impl Write) -> Result<(), CommandError> {
        let path = self.loader.config_path();
        if self.loader.exists() && !force {
            return Err(CommandError::AlreadyInitialized(path.display().to_string()));
        }
        self.loader.write_default()?;
        writeln!(out, "wrote {}", path.display())?;
        Ok(())
    }
}
