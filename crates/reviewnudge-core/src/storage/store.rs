//! Where the session persists configuration changes it makes itself
//! (currently only the enable toggle).

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::Result;

/// Persistence seam for configuration written back by a running session.
pub trait ConfigStore {
    /// Re-read the configuration (explicit reload).
    fn load(&self) -> Result<Config>;

    /// Persist the configuration.
    fn save(&self, config: &Config) -> Result<()>;
}

/// TOML file on disk.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default `~/.config/reviewnudge/config.toml`.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(Config::path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<Config> {
        Config::load_from(&self.path)
    }

    fn save(&self, config: &Config) -> Result<()> {
        config.save_to(&self.path)
    }
}

/// In-process store for hosts that keep configuration elsewhere.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    config: RefCell<Config>,
    saves: Cell<usize>,
}

impl MemoryConfigStore {
    pub fn new(config: Config) -> Self {
        Self {
            config: RefCell::new(config),
            saves: Cell::new(0),
        }
    }

    /// Last saved (or initial) configuration.
    pub fn current(&self) -> Config {
        self.config.borrow().clone()
    }

    /// Number of times `save` was called.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<Config> {
        Ok(self.current())
    }

    fn save(&self, config: &Config) -> Result<()> {
        *self.config.borrow_mut() = config.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
