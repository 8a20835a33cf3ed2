//! Text-input capability consumed by running scripts.
//!
//! The keyboard host (the native IME bridge) implements [`Keyboard`]; the
//! runner injects it into script execution. Scripts see this surface and
//! nothing else — no filesystem, no network, no ambient environment.

/// The text-input capability granted to executing scripts.
///
/// All methods are fire-and-forget: the core never depends on delivery
/// succeeding. Notifications are transient and must not block the caller.
pub trait Keyboard {
    /// Type literal text into the focused input field.
    fn type_text(&mut self, text: &str);

    /// Send a single backspace key event.
    fn send_backspace(&mut self);

    /// Send an enter key event.
    fn send_enter(&mut self);

    /// Show a short auto-dismissing notification.
    fn show_notification(&mut self, text: &str);

    /// Start native voice input if the host resolved that capability at
    /// startup. Returns `false` when voice input is unavailable; the
    /// runner falls back to a notification.
    fn start_voice_input(&mut self) -> bool {
        false
    }
}

/// Keyboard backend for hosts without a native text-injection bridge.
///
/// Stands in for the unavailable capability variant: every call is a
/// logged no-op.
#[derive(Debug, Default)]
pub struct NullKeyboard;

impl Keyboard for NullKeyboard {
    fn type_text(&mut self, text: &str) {
        log::debug!("no keyboard bridge, dropped text ({} chars)", text.len());
    }

    fn send_backspace(&mut self) {
        log::debug!("no keyboard bridge, dropped backspace");
    }

    fn send_enter(&mut self) {
        log::debug!("no keyboard bridge, dropped enter");
    }

    fn show_notification(&mut self, text: &str) {
        log::info!("notification: {text}");
    }
}
