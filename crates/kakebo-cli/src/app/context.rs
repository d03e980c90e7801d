//! Application context for the Kakebo CLI.
//!
//! Bundles the parsed arguments with the loaded config so handlers do not
//! have to resolve paths themselves.

use std::path::{Path, PathBuf};

use kakebo_core::period::{Period, PeriodKind};
use kakebo_core::{Clock, Store, SystemClock};

use crate::cli::{Cli, PeriodArgs};
use crate::config::KakeboConfig;
use crate::errors::CliError;
use crate::helpers::resolve_period;

use super::resolver::{load_config, missing_store_message, resolve_config_path, resolve_store_path};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: KakeboConfig,
    config_path: PathBuf,
    store_path: PathBuf,
    clock: Box<dyn Clock>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> anyhow::Result<Self> {
        let config_path = resolve_config_path(cli)?;
        let config = load_config(&config_path)?;
        let store_path = resolve_store_path(cli, &config)?;
        Ok(Self {
            cli,
            config,
            config_path,
            store_path,
            clock: Box::new(SystemClock),
        })
    }

    /// Context for `init`, which replaces the config instead of reading it.
    ///
    /// The existing file is never parsed, so a malformed config can still be
    /// overwritten with `--force`.
    pub fn for_init(cli: &'a Cli) -> anyhow::Result<Self> {
        let config_path = resolve_config_path(cli)?;
        let config = KakeboConfig::default();
        let store_path = resolve_store_path(cli, &config)?;
        Ok(Self {
            cli,
            config,
            config_path,
            store_path,
            clock: Box::new(SystemClock),
        })
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn period_kind(&self) -> PeriodKind {
        self.config.store.period
    }

    /// Period named by the flags, or the current one.
    pub fn period(&self, args: &PeriodArgs) -> anyhow::Result<Period> {
        resolve_period(args, self.period_kind(), self.clock.as_ref())
    }

    /// Open (creating if needed) the configured store.
    pub fn open_store(&self) -> anyhow::Result<Store> {
        tracing::debug!(path = %self.store_path.display(), "opening store");
        Ok(Store::open_with(
            &self.store_path,
            self.config.store_options(),
        )?)
    }

    /// Open the store, failing if the file does not exist yet.
    pub fn open_existing_store(&self) -> anyhow::Result<Store> {
        if !self.store_path.exists() {
            return Err(CliError::not_found(
                missing_store_message(&self.store_path),
                "Run `kakebo init` or point --db at an existing store.",
            )
            .into());
        }
        self.open_store()
    }
}
