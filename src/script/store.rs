//! The script store — single source of truth for all known scripts.
//!
//! The store merges the fixed built-in set with user-created scripts
//! restored from durable storage, and persists the user subset back out.
//! Insertion order is preserved and duplicate ids are dropped on insert
//! (first write wins), so a restored user script can never take over a
//! built-in id.
//!
//! All mutation is single-writer: the store expects to live on the UI/event
//! thread and holds no interior locking.

use std::time::{SystemTime, UNIX_EPOCH};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};

use super::builtins::{self, DEFAULT_ICON};
use crate::config::Config;
use crate::error::ScriptError;
use crate::storage::{JsonFileStorage, KeyValueStorage};

/// Storage key for the persisted user-script collection.
pub(crate) const USER_SCRIPTS_KEY: &str = "user_scripts";

/// A named unit of executable script code bound to a keyboard key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    /// Unique id. Built-ins use fixed literals; user and installed scripts
    /// get a generated `<tag><timestamp>` id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Short display glyph.
    #[serde(default = "default_icon")]
    pub icon: String,

    /// Display description.
    #[serde(default)]
    pub description: String,

    /// Action-language source. Untrusted text.
    pub code: String,

    /// Whether this script originated from the user. Only user scripts
    /// are persisted.
    #[serde(default)]
    pub user_created: bool,

    /// Install channel, set by the installer ("web").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_from: Option<String>,

    /// RFC 3339 install timestamp, set by the installer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_date: Option<String>,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl Script {
    /// Construct a built-in script definition.
    pub(crate) fn builtin(
        id: &str,
        name: &str,
        icon: &str,
        description: &str,
        code: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            description: description.to_string(),
            code: code.to_string(),
            user_created: false,
            installed_from: None,
            install_date: None,
        }
    }
}

/// A script bound to a key on the keyboard's script row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyBinding {
    pub icon: String,
    pub script_id: String,
}

/// Generates `<tag><millis>` ids that stay unique under rapid
/// single-threaded creation: a timestamp value is never handed out twice.
#[derive(Debug, Default)]
struct IdGenerator {
    last_stamp: u64,
}

impl IdGenerator {
    fn next(&mut self, tag: &str) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let stamp = now.max(self.last_stamp + 1);
        self.last_stamp = stamp;
        format!("{tag}{stamp}")
    }
}

/// Owns the authoritative script collection and its persistence.
pub struct ScriptStore {
    scripts: Vec<Script>,
    storage: Box<dyn KeyValueStorage>,
    ids: IdGenerator,
}

impl ScriptStore {
    /// Create an empty, uninitialized store over the given storage backend.
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self {
            scripts: Vec::new(),
            storage,
            ids: IdGenerator::default(),
        }
    }

    /// Create a store backed by file storage at the configured directory.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Box::new(JsonFileStorage::new(config.storage_dir())))
    }

    /// Populate the store: built-ins first, then the restored user subset.
    ///
    /// Storage failures are logged and swallowed — `init` always leaves the
    /// store usable, with at least the built-in set.
    pub fn init(&mut self) {
        for script in builtins::default_scripts() {
            self.add(script);
        }
        self.restore();
        log::info!("script store initialized with {} scripts", self.scripts.len());
    }

    /// Insert a script if its id is not already present.
    ///
    /// Returns `false` on a duplicate id; the existing definition wins.
    pub fn add(&mut self, script: Script) -> bool {
        if self.scripts.iter().any(|s| s.id == script.id) {
            log::warn!("duplicate script id '{}' dropped", script.id);
            return false;
        }
        log::debug!("script added: {} ({})", script.name, script.id);
        self.scripts.push(script);
        true
    }

    /// Create, insert, and persist a user script. Returns the new script.
    pub fn create_user_script(&mut self, name: &str, code: &str, icon: Option<&str>) -> Script {
        let script = Script {
            id: self.ids.next("user_"),
            name: name.to_string(),
            icon: icon.unwrap_or(DEFAULT_ICON).to_string(),
            description: "User script".to_string(),
            code: code.to_string(),
            user_created: true,
            installed_from: None,
            install_date: None,
        };
        self.add(script.clone());
        self.persist();
        script
    }

    /// Remove a script by id and re-persist. Returns whether a removal
    /// occurred.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.scripts.len();
        self.scripts.retain(|s| s.id != id);
        let removed = self.scripts.len() != before;
        if removed {
            log::info!("script deleted: {id}");
            self.persist();
        }
        removed
    }

    /// Look up a script by id.
    pub fn get(&self, id: &str) -> Option<&Script> {
        self.scripts.iter().find(|s| s.id == id)
    }

    /// All scripts in insertion order.
    pub fn list(&self) -> impl Iterator<Item = &Script> {
        self.scripts.iter()
    }

    /// Number of scripts in the store.
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Whether the store holds no scripts.
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Fuzzy-match scripts by name and description for the script picker.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<&Script> {
        let query = query.trim();
        if query.is_empty() {
            return self.scripts.iter().take(max_results).collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut results: Vec<(i64, &Script)> = Vec::new();

        for script in &self.scripts {
            let name_score = matcher.fuzzy_match(&script.name, query);
            let desc_score = matcher.fuzzy_match(&script.description, query);
            let best = match (name_score, desc_score) {
                (Some(n), Some(d)) => Some(n.max(d)),
                (a, b) => a.or(b),
            };
            if let Some(score) = best {
                results.push((score, script));
            }
        }

        results.sort_by(|a, b| b.0.cmp(&a.0));
        results
            .into_iter()
            .take(max_results)
            .map(|(_, script)| script)
            .collect()
    }

    /// The first `slots` scripts as key bindings for the keyboard's
    /// script row.
    pub fn keyboard_row(&self, slots: usize) -> Vec<KeyBinding> {
        self.scripts
            .iter()
            .take(slots)
            .map(|script| KeyBinding {
                icon: script.icon.clone(),
                script_id: script.id.clone(),
            })
            .collect()
    }

    /// Serialize the user-created subset to storage.
    ///
    /// Failures are soft: logged as [`ScriptError::PersistenceFailure`] and
    /// otherwise ignored, so the in-memory state remains authoritative.
    pub fn persist(&mut self) {
        let user_scripts: Vec<&Script> =
            self.scripts.iter().filter(|s| s.user_created).collect();

        let json = match serde_json::to_string(&user_scripts) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("{}", ScriptError::PersistenceFailure(e.to_string()));
                return;
            }
        };

        if let Err(e) = self.storage.write(USER_SCRIPTS_KEY, &json) {
            log::warn!("{}", ScriptError::PersistenceFailure(e.to_string()));
        }
    }

    /// Merge the persisted user subset into the store.
    ///
    /// Missing or malformed data fails soft: the store keeps whatever it
    /// already holds (built-ins on startup) and the problem is logged.
    pub fn restore(&mut self) {
        let Some(raw) = self.storage.read(USER_SCRIPTS_KEY) else {
            log::info!("no persisted user scripts");
            return;
        };

        match serde_json::from_str::<Vec<Script>>(&raw) {
            Ok(scripts) => {
                let mut restored = 0;
                for script in scripts {
                    if self.add(script) {
                        restored += 1;
                    }
                }
                log::info!("restored {restored} user scripts");
            }
            Err(e) => {
                log::warn!(
                    "{}",
                    ScriptError::PersistenceFailure(format!("malformed user scripts: {e}"))
                );
            }
        }
    }

    /// Generate a fresh unique id with the given source tag.
    pub(crate) fn generate_id(&mut self, tag: &str) -> String {
        self.ids.next(tag)
    }
}
