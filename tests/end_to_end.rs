//! End-to-end flow over the install boundary: install a script payload,
//! execute it, and observe the text-input capability.

use chrono::Local;
use scriptboard::script::installer;
use scriptboard::{InstallPayload, Keyboard, MemoryStorage, Runner, ScriptStore};

#[derive(Default)]
struct RecordingKeyboard {
    typed: Vec<String>,
    notifications: Vec<String>,
}

impl Keyboard for RecordingKeyboard {
    fn type_text(&mut self, text: &str) {
        self.typed.push(text.to_string());
    }

    fn send_backspace(&mut self) {}

    fn send_enter(&mut self) {}

    fn show_notification(&mut self, text: &str) {
        self.notifications.push(text.to_string());
    }
}

#[test]
fn install_execute_and_list() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut store = ScriptStore::new(Box::new(MemoryStorage::default()));
    store.init();
    let builtin_count = store.list().count();

    // Install over the web boundary
    let response = installer::install(
        &mut store,
        InstallPayload {
            name: "Date".to_string(),
            code: "date %d.%m.%Y".to_string(),
            icon: None,
            description: None,
        },
    );
    assert!(response.success, "install failed: {:?}", response.error);
    let id = response.script_id.expect("fresh script id");

    // Execute: the capability is invoked exactly once with today's date
    let mut keyboard = RecordingKeyboard::default();
    let report = Runner::new()
        .execute(&store, &mut keyboard, &id)
        .expect("script resolves");
    assert!(report.success);
    assert_eq!(keyboard.typed.len(), 1);
    assert_eq!(keyboard.typed[0], Local::now().format("%d.%m.%Y").to_string());
    assert!(keyboard.notifications.is_empty());

    // The listing includes the script as user-created
    let script = store.get(&id).expect("script listed");
    assert!(script.user_created);
    assert_eq!(store.list().count(), builtin_count + 1);
}

#[test]
fn example_scripts_install_and_run() {
    let mut store = ScriptStore::new(Box::new(MemoryStorage::default()));
    store.init();

    let runner = Runner::new();
    for example in installer::example_scripts() {
        let name = example.name.clone();
        let response = installer::install(&mut store, example);
        assert!(response.success, "example '{name}' failed to install");

        let id = response.script_id.expect("fresh script id");
        let mut keyboard = RecordingKeyboard::default();
        let report = runner
            .execute(&store, &mut keyboard, &id)
            .expect("script resolves");
        assert!(report.success, "example '{name}' failed: {:?}", report.error);
        assert!(!keyboard.typed.is_empty(), "example '{name}' typed nothing");
    }
}
