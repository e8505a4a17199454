use std::sync::Arc;

use hopd::WindowChrome;

/// Window styling for the current platform. Only Windows gets topmost
/// placement; elsewhere the surface is left as its process created it.
pub(crate) fn platform_chrome() -> Arc<dyn WindowChrome> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(TopMostChrome)
    }
    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(hopd::NoChrome)
    }
}

/// Pins the surface process's visible window above others and focuses it.
#[cfg(target_os = "windows")]
#[derive(Debug, Default)]
pub(crate) struct TopMostChrome;

#[cfg(target_os = "windows")]
impl WindowChrome for TopMostChrome {
    fn adjust(&self, owner_pid: u32) {
        match win::visible_window_of(owner_pid) {
            Some(hwnd) => {
                if win::raise_topmost(hwnd) {
                    tracing::debug!(owner_pid, "search window pinned topmost");
                } else {
                    tracing::warn!(owner_pid, "SetWindowPos failed for search window");
                }
            }
            None => tracing::debug!(owner_pid, "surface process has no visible window"),
        }
    }
}

#[cfg(target_os = "windows")]
mod win {
    use windows_sys::Win32::Foundation::{HWND, LPARAM};
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        BringWindowToTop, EnumWindows, GetWindowThreadProcessId, IsWindowVisible,
        SetForegroundWindow, SetWindowPos, HWND_TOPMOST, SWP_NOMOVE, SWP_NOSIZE, SWP_SHOWWINDOW,
    };

    struct WindowSearch {
        pid: u32,
        found: HWND,
    }

    unsafe extern "system" fn match_visible_window(hwnd: HWND, lparam: LPARAM) -> i32 {
        let search = &mut *(lparam as *mut WindowSearch);
        let mut pid = 0u32;
        GetWindowThreadProcessId(hwnd, &mut pid);
        if pid == search.pid && IsWindowVisible(hwnd) != 0 {
            search.found = hwnd;
            return 0;
        }
        1
    }

    pub(super) fn visible_window_of(pid: u32) -> Option<HWND> {
        let mut search = WindowSearch {
            pid,
            found: std::ptr::null_mut(),
        };
        unsafe {
            EnumWindows(
                Some(match_visible_window),
                &mut search as *mut WindowSearch as LPARAM,
            );
        }
        (!search.found.is_null()).then_some(search.found)
    }

    pub(super) fn raise_topmost(hwnd: HWND) -> bool {
        unsafe {
            let placed = SetWindowPos(
                hwnd,
                HWND_TOPMOST,
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_SHOWWINDOW,
            ) != 0;
            SetForegroundWindow(hwnd);
            BringWindowToTop(hwnd);
            placed
        }
    }
}
