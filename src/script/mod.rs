//! Script extension system.
//!
//! This module is the extensibility core of the keyboard: small
//! user-authored scripts bound to keyboard keys, producing text on demand.
//!
//! # Architecture
//!
//! ```text
//! ScriptStore
//! ├── scripts: Vec<Script>            (built-ins + user, insertion order)
//! ├── storage: Box<dyn KeyValueStorage>
//! └── ids: IdGenerator                (tag + timestamp, collision-free)
//!
//! Runner
//! └── execute(store, keyboard, id)    (parse → dispatch, failures contained)
//!
//! installer
//! └── validate / install / export / uninstall  (external payload boundary)
//! ```
//!
//! Scripts are written in a small declarative action language (see
//! [`lang`]) interpreted by a fixed dispatcher; the only capabilities a
//! running script can touch are the injected [`crate::Keyboard`] surface
//! and the store itself.

pub(crate) mod builtins;
pub mod installer;
pub mod lang;
mod runner;
mod store;

pub use installer::{InstallPayload, InstallResponse, InstalledScript, ScriptExport, Warning};
pub use runner::{RunReport, Runner};
pub use store::{KeyBinding, Script, ScriptStore};
