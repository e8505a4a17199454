use anyhow::Context;
use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use tracing::{debug, warn};

/// A registered global hotkey. Dropping it unregisters the combination.
///
/// The manager is bound to the thread that created it, so registration and
/// [`HotkeyRegistration::run`] must happen on the same thread.
pub(crate) struct HotkeyRegistration {
    manager: GlobalHotKeyManager,
    hotkey: HotKey,
    combo: String,
}

pub(crate) fn register(combo: &str) -> anyhow::Result<HotkeyRegistration> {
    let hotkey: HotKey = combo
        .parse()
        .with_context(|| format!("invalid hotkey `{combo}`"))?;
    let manager = GlobalHotKeyManager::new().context("global hotkey manager unavailable")?;
    manager
        .register(hotkey)
        .with_context(|| format!("failed to register hotkey `{combo}`"))?;
    debug!(hotkey = combo, id = hotkey.id(), "hotkey registered");

    Ok(HotkeyRegistration {
        manager,
        hotkey,
        combo: combo.to_owned(),
    })
}

impl HotkeyRegistration {
    /// Blocks the calling thread, invoking `on_toggle` once per press.
    pub(crate) fn run(&self, mut on_toggle: impl FnMut()) {
        let id = self.hotkey.id();

        #[cfg(target_os = "windows")]
        {
            use windows_sys::Win32::UI::WindowsAndMessaging::{
                DispatchMessageW, GetMessageW, TranslateMessage, MSG,
            };

            // The hotkey's hidden window only receives WM_HOTKEY while this
            // thread pumps messages.
            let mut msg: MSG = unsafe { std::mem::zeroed() };
            loop {
                let status = unsafe { GetMessageW(&mut msg, std::ptr::null_mut(), 0, 0) };
                if status <= 0 {
                    debug!(status, "message loop ended");
                    break;
                }
                unsafe {
                    TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
                while let Ok(event) = GlobalHotKeyEvent::receiver().try_recv() {
                    if is_toggle_press(&event, id) {
                        on_toggle();
                    }
                }
            }
        }

        #[cfg(not(target_os = "windows"))]
        while let Ok(event) = GlobalHotKeyEvent::receiver().recv() {
            if is_toggle_press(&event, id) {
                on_toggle();
            }
        }
    }
}

impl Drop for HotkeyRegistration {
    fn drop(&mut self) {
        if let Err(err) = self.manager.unregister(self.hotkey) {
            warn!(hotkey = %self.combo, error = %err, "failed to unregister hotkey");
        }
    }
}

fn is_toggle_press(event: &GlobalHotKeyEvent, id: u32) -> bool {
    event.id == id && event.state == HotKeyState::Pressed
}

#[cfg(test)]
mod tests {
    use global_hotkey::hotkey::{Code, Modifiers};

    use super::*;

    #[test]
    fn default_combination_parses() {
        let parsed: HotKey = "control+KeyF".parse().unwrap();
        assert_eq!(parsed, HotKey::new(Some(Modifiers::CONTROL), Code::KeyF));
    }

    #[test]
    fn only_presses_of_our_id_toggle() {
        let ours = HotKey::new(Some(Modifiers::CONTROL), Code::KeyF).id();
        let other = HotKey::new(Some(Modifiers::ALT), Code::Space).id();

        let press = GlobalHotKeyEvent {
            id: ours,
            state: HotKeyState::Pressed,
        };
        let release = GlobalHotKeyEvent {
            id: ours,
            state: HotKeyState::Released,
        };
        let foreign = GlobalHotKeyEvent {
            id: other,
            state: HotKeyState::Pressed,
        };

        assert!(is_toggle_press(&press, ours));
        assert!(!is_toggle_press(&release, ours));
        assert!(!is_toggle_press(&foreign, ours));
    }
}
