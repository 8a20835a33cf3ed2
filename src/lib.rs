//! Scriptboard - script-extension core for a scriptable virtual keyboard.
//!
//! Scriptboard owns the script side of a virtual keyboard: a registry of
//! built-in and user-created scripts, a runner that executes them against
//! an injected text-input capability, and an installer that validates
//! externally supplied script payloads. Keyboard rendering, native text
//! injection, and the remote install channel live in the host shell and
//! talk to this crate through the traits in [`keyboard`] and [`storage`].
//!
//! # Architecture
//!
//! - [`config`] - Configuration loading and defaults
//! - [`keyboard`] - The text-input capability injected into scripts
//! - [`script`] - Store, runner, action language, and installer
//! - [`storage`] - Durable key-value persistence for user scripts
//!
//! # Example
//!
//! ```
//! use scriptboard::{NullKeyboard, MemoryStorage, Runner, ScriptStore};
//!
//! let mut store = ScriptStore::new(Box::new(MemoryStorage::default()));
//! store.init();
//!
//! let script = store.create_user_script("Greeting", "type Hello!", None);
//!
//! let mut keyboard = NullKeyboard;
//! let report = Runner::new()
//!     .execute(&store, &mut keyboard, &script.id)
//!     .expect("script exists");
//! assert!(report.success);
//! ```

pub mod config;
pub mod keyboard;
pub mod script;
pub mod storage;

mod error;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigError};
pub use error::{ScriptError, ScriptResult};
pub use keyboard::{Keyboard, NullKeyboard};
pub use script::{
    InstallPayload, InstallResponse, KeyBinding, RunReport, Runner, Script, ScriptStore,
};
pub use storage::{JsonFileStorage, KeyValueStorage, MemoryStorage};
