//! Helpers for tests that touch process-wide environment variables.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that read or write environment variables.
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Points `XDG_CONFIG_HOME` at a fresh temp dir until dropped.
///
/// Hold [`lock_env`] for the lifetime of this guard.
pub struct ConfigHome {
    dir: tempfile::TempDir,
    previous: Option<String>,
}

impl ConfigHome {
    pub fn new() -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        let previous = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", dir.path()) };
        Self { dir, previous }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write raw contents to `habit/config.toml` under this home.
    pub fn write_config(&self, contents: &str) {
        let dir = self.dir.path().join("habit");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), contents).unwrap();
    }
}

impl Drop for ConfigHome {
    fn drop(&mut self) {
        match &self.previous {
            Some(x) => unsafe { std::env::set_var("XDG_CONFIG_HOME", x) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }
    }
}
