#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use budget_planner::{config::ConfigManager, core::Session, domain::ItemKey};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn config_manager() -> ConfigManager {
    ConfigManager::with_base_dir(temp_home()).expect("create config manager for temp dir")
}

/// A session switched to `template`.
pub fn session_on(template: &str) -> Session {
    let mut session = Session::new();
    session
        .select_template(template)
        .expect("template exists in the embedded catalog");
    session
}

/// Resolves `group`/`item` user input, panicking with context when either is missing.
pub fn item_ref(session: &Session, group: &str, item: &str) -> (String, ItemKey) {
    session
        .resolve_item(group, item)
        .unwrap_or_else(|err| panic!("{group}/{item}: {err}"))
}
