//! Script installation and validation boundary.
//!
//! External payloads (the web install channel, script files) pass through
//! [`validate`] before they reach the store. Length limits are hard errors;
//! the risky-pattern screen is advisory only — it warns and never blocks,
//! since the action language cannot reach any of the flagged facilities
//! anyway. Nothing in this module panics past the install boundary: every
//! failure path comes back as a tagged result.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::builtins::DEFAULT_ICON;
use super::store::{Script, ScriptStore};
use crate::error::{ScriptError, ScriptResult};

/// Maximum display-name length accepted at installation.
pub const MAX_NAME_LEN: usize = 50;

/// Maximum code length accepted at installation.
pub const MAX_CODE_LEN: usize = 10_000;

/// Substrings that mark dynamic evaluation, timers, network access, or
/// dynamic imports in submitted code. Matched case-insensitively.
const RISKY_PATTERNS: &[&str] = &[
    "eval(",
    "function(",
    "settimeout(",
    "setinterval(",
    "xmlhttprequest",
    "fetch(",
    "import(",
    "require(",
];

/// An externally supplied script definition awaiting installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallPayload {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Advisory diagnostic emitted by [`validate`] for risky code patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub pattern: &'static str,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code contains potentially risky call '{}'", self.pattern)
    }
}

/// Install result shape handed back over the external channel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InstallResponse {
    fn installed(script_id: String) -> Self {
        Self {
            success: true,
            script_id: Some(script_id),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            script_id: None,
            error: Some(error.into()),
        }
    }
}

/// Script metadata listing without code, for the install UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledScript {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub user_created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_date: Option<String>,
}

/// Exported script definition with its envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptExport {
    pub name: String,
    pub icon: String,
    pub description: String,
    pub code: String,
    pub version: String,
    pub author: String,
    pub export_date: String,
}

/// Check an install payload against the name/code limits and the advisory
/// risky-pattern list.
///
/// Returns the warnings on success; limit violations are
/// [`ScriptError::InvalidScript`]. Warnings never block installation.
pub fn validate(payload: &InstallPayload) -> ScriptResult<Vec<Warning>> {
    if payload.name.trim().is_empty() {
        return Err(ScriptError::InvalidScript(
            "script name is required".to_string(),
        ));
    }
    if payload.name.chars().count() > MAX_NAME_LEN {
        return Err(ScriptError::InvalidScript("script name too long".to_string()));
    }
    if payload.code.trim().is_empty() {
        return Err(ScriptError::InvalidScript(
            "script code is required".to_string(),
        ));
    }
    if payload.code.chars().count() > MAX_CODE_LEN {
        return Err(ScriptError::InvalidScript("script code too long".to_string()));
    }

    let lowered = payload.code.to_lowercase();
    let warnings: Vec<Warning> = RISKY_PATTERNS
        .iter()
        .copied()
        .filter(|pattern| lowered.contains(pattern))
        .map(|pattern| Warning { pattern })
        .collect();

    for warning in &warnings {
        log::warn!("script '{}': {warning}", payload.name);
    }

    Ok(warnings)
}

/// Validate a payload and install it into the store.
pub fn install(store: &mut ScriptStore, payload: InstallPayload) -> InstallResponse {
    if let Err(e) = validate(&payload) {
        log::error!("script installation failed: {e}");
        return InstallResponse::failed(e.to_string());
    }

    let id = store.generate_id("web_");
    let script = Script {
        id: id.clone(),
        name: payload.name,
        icon: payload.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
        description: payload
            .description
            .unwrap_or_else(|| "Installed from the web interface".to_string()),
        code: payload.code,
        user_created: true,
        installed_from: Some("web".to_string()),
        install_date: Some(chrono::Utc::now().to_rfc3339()),
    };

    let name = script.name.clone();
    store.add(script);
    store.persist();
    log::info!("script '{name}' installed as {id}");

    InstallResponse::installed(id)
}

/// Parse a JSON script file and install its payload.
pub fn install_from_file(store: &mut ScriptStore, contents: &str) -> InstallResponse {
    match serde_json::from_str::<InstallPayload>(contents) {
        Ok(payload) => install(store, payload),
        Err(e) => {
            log::error!("failed to parse script file: {e}");
            InstallResponse::failed("invalid script file format")
        }
    }
}

/// List all scripts as install-UI metadata (no code).
pub fn installed_scripts(store: &ScriptStore) -> Vec<InstalledScript> {
    store
        .list()
        .map(|script| InstalledScript {
            id: script.id.clone(),
            name: script.name.clone(),
            icon: script.icon.clone(),
            description: script.description.clone(),
            user_created: script.user_created,
            installed_from: script.installed_from.clone(),
            install_date: script.install_date.clone(),
        })
        .collect()
}

/// Export a script definition by id.
pub fn export_one(store: &ScriptStore, id: &str) -> ScriptResult<ScriptExport> {
    let script = store
        .get(id)
        .ok_or_else(|| ScriptError::NotFound(id.to_string()))?;

    Ok(ScriptExport {
        name: script.name.clone(),
        icon: script.icon.clone(),
        description: script.description.clone(),
        code: script.code.clone(),
        version: "1.0.0".to_string(),
        author: "User".to_string(),
        export_date: chrono::Utc::now().to_rfc3339(),
    })
}

/// Remove an installed script through the store.
pub fn uninstall(store: &mut ScriptStore, id: &str) -> ScriptResult<()> {
    if store.delete(id) {
        log::info!("script uninstalled: {id}");
        Ok(())
    } else {
        Err(ScriptError::NotFound(id.to_string()))
    }
}

/// Bundled example payloads for the install UI.
pub fn example_scripts() -> Vec<InstallPayload> {
    vec![
        InstallPayload {
            name: "Current date".to_string(),
            icon: Some("📅".to_string()),
            description: Some("Insert today's date as DD.MM.YYYY".to_string()),
            code: "date %d.%m.%Y\nnotify \"Date inserted\"".to_string(),
        },
        InstallPayload {
            name: "Random number".to_string(),
            icon: Some("🎲".to_string()),
            description: Some("Insert a random number from 1 to 100".to_string()),
            code: "random 1 100".to_string(),
        },
        InstallPayload {
            name: "Lorem ipsum".to_string(),
            icon: Some("📝".to_string()),
            description: Some("Insert a Lorem Ipsum placeholder".to_string()),
            code: "type Lorem ipsum dolor sit amet, consectetur adipiscing elit, \
                   sed do eiusmod tempor incididunt ut labore et dolore magna aliqua."
                .to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn payload(name: &str, code: &str) -> InstallPayload {
        InstallPayload {
            name: name.to_string(),
            code: code.to_string(),
            icon: None,
            description: None,
        }
    }

    fn store() -> ScriptStore {
        let mut store = ScriptStore::new(Box::new(MemoryStorage::default()));
        store.init();
        store
    }

    #[test]
    fn test_validate_rejects_long_name() {
        let err = validate(&payload(&"A".repeat(51), "x")).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidScript(_)));
    }

    #[test]
    fn test_validate_rejects_long_code() {
        let err = validate(&payload("ok", &"A".repeat(10_001))).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidScript(_)));
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        assert!(validate(&payload("", "x")).is_err());
        assert!(validate(&payload("   ", "x")).is_err());
        assert!(validate(&payload("ok", "")).is_err());
    }

    #[test]
    fn test_validate_accepts_limits_exactly() {
        assert!(validate(&payload(&"A".repeat(50), &"x".repeat(10_000))).is_ok());
    }

    #[test]
    fn test_risky_patterns_warn_but_pass() {
        let warnings = validate(&payload("ok", "fetch('x')")).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].pattern, "fetch(");

        // Case-insensitive
        let warnings = validate(&payload("ok", "SETTIMEOUT(f, 10)")).unwrap();
        assert_eq!(warnings.len(), 1);

        // Clean code carries no warnings
        assert!(validate(&payload("ok", "type hi")).unwrap().is_empty());
    }

    #[test]
    fn test_install_creates_web_script() {
        let mut store = store();
        let response = install(&mut store, payload("Greeting", "type hi"));

        assert!(response.success);
        let id = response.script_id.expect("fresh id");
        assert!(id.starts_with("web_"));

        let script = store.get(&id).expect("installed script");
        assert!(script.user_created);
        assert_eq!(script.installed_from.as_deref(), Some("web"));
        assert!(script.install_date.is_some());
        assert_eq!(script.icon, DEFAULT_ICON);
    }

    #[test]
    fn test_install_failure_is_a_tagged_result() {
        let mut store = store();
        let len = store.len();

        let response = install(&mut store, payload("", "type hi"));
        assert!(!response.success);
        assert!(response.script_id.is_none());
        assert!(response.error.is_some());
        assert_eq!(store.len(), len);
    }

    #[test]
    fn test_install_from_file() {
        let mut store = store();

        let ok = install_from_file(
            &mut store,
            r#"{"name": "FromFile", "code": "enter", "icon": "🗂️"}"#,
        );
        assert!(ok.success);

        let bad = install_from_file(&mut store, "not json");
        assert!(!bad.success);
        assert_eq!(bad.error.as_deref(), Some("invalid script file format"));
    }

    #[test]
    fn test_installed_scripts_listing_has_no_code() {
        let mut store = store();
        install(&mut store, payload("Listed", "type hi"));

        let listing = installed_scripts(&store);
        assert_eq!(listing.len(), store.len());
        assert!(listing.iter().any(|s| s.name == "Listed" && s.user_created));
    }

    #[test]
    fn test_export_and_uninstall() {
        let mut store = store();
        let response = install(&mut store, payload("Exportable", "enter"));
        let id = response.script_id.expect("fresh id");

        let export = export_one(&store, &id).expect("export");
        assert_eq!(export.name, "Exportable");
        assert_eq!(export.code, "enter");
        assert_eq!(export.version, "1.0.0");

        uninstall(&mut store, &id).expect("uninstall");
        assert!(matches!(
            export_one(&store, &id),
            Err(ScriptError::NotFound(_))
        ));
        assert!(matches!(
            uninstall(&mut store, &id),
            Err(ScriptError::NotFound(_))
        ));
    }

    #[test]
    fn test_example_scripts_validate_cleanly() {
        for example in example_scripts() {
            let warnings = validate(&example).expect("example validates");
            assert!(warnings.is_empty(), "example '{}' warned", example.name);
        }
    }
}
