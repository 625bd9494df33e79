//! Global low-level mouse hook (`WH_MOUSE_LL`).
//!
//! The hook callback runs on whichever thread installed the hook and pumps
//! messages; the OS penalises slow callbacks by dropping the hook, so the
//! callback does exactly three things: read the event, feed the debouncer,
//! enqueue. UIA queries and key synthesis live on the worker thread and are
//! never called from here.
//!
//! One monitor per process: the callback reaches its state through a
//! process-wide `OnceLock`, so the channel handed to the first
//! [`MouseMonitor::install`] call is the one the hook uses for the process
//! lifetime.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PostThreadMessageW, SetWindowsHookExW,
    TranslateMessage, UnhookWindowsHookEx, HC_ACTION, HHOOK, MSG, MSLLHOOKSTRUCT, WH_MOUSE_LL,
    WM_LBUTTONDOWN, WM_QUIT,
};

use crate::errors::UpclickError;
use crate::monitor::{enqueue, ClickDebouncer, ClickEvent, DoubleClick};

struct HookShared {
    debouncer: Mutex<ClickDebouncer>,
    tx: Sender<DoubleClick>,
    rx: Receiver<DoubleClick>,
}

static HOOK_SHARED: OnceLock<HookShared> = OnceLock::new();

unsafe extern "system" fn mouse_hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    // Nothing in here may unwind across the FFI boundary.
    let result = catch_unwind(AssertUnwindSafe(|| {
        if code == HC_ACTION as i32 && wparam.0 as u32 == WM_LBUTTONDOWN {
            if let Some(shared) = HOOK_SHARED.get() {
                let data = &*(lparam.0 as *const MSLLHOOKSTRUCT);
                let click = ClickEvent {
                    x: data.pt.x,
                    y: data.pt.y,
                    at: Instant::now(),
                };
                if let Some(double) = shared.debouncer.lock().register(click) {
                    enqueue(&shared.tx, &shared.rx, double);
                }
            }
        }
    }));
    if result.is_err() {
        log::error!("mouse hook callback panicked");
    }

    CallNextHookEx(None, code, wparam, lparam)
}

/// Installed hook handle; unhooks on drop.
///
/// The installing thread must pump messages (see [`MouseMonitor::pump`]) or
/// the hook never fires.
pub struct MouseMonitor {
    hook: HHOOK,
    thread_id: u32,
}

impl MouseMonitor {
    /// Install the hook on the current thread.
    pub fn install(
        threshold: Duration,
        tx: Sender<DoubleClick>,
        rx: Receiver<DoubleClick>,
    ) -> Result<Self, UpclickError> {
        let shared = HOOK_SHARED.get_or_init(|| HookShared {
            debouncer: Mutex::new(ClickDebouncer::new(threshold)),
            tx,
            rx,
        });
        // Reinstalling resets the debounce state but keeps the first channel.
        *shared.debouncer.lock() = ClickDebouncer::new(threshold);

        let hook = unsafe { SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), None, 0) }
            .map_err(|e| {
                UpclickError::HookError(format!("SetWindowsHookExW(WH_MOUSE_LL): {e}"))
            })?;
        let thread_id = unsafe { GetCurrentThreadId() };

        Ok(Self { hook, thread_id })
    }

    /// Id of the thread pumping for this hook; pass to [`post_quit`] from a
    /// signal handler to end the pump.
    pub fn thread_id(&self) -> u32 {
        self.thread_id
    }

    /// Pump messages on the installing thread until `WM_QUIT` arrives.
    pub fn pump(&self) {
        let mut msg = MSG::default();
        loop {
            let result = unsafe { GetMessageW(&mut msg, HWND(std::ptr::null_mut()), 0, 0) };
            if result.0 == -1 {
                log::error!("GetMessageW failed; stopping message pump");
                break;
            }
            if result.0 == 0 || msg.message == WM_QUIT {
                break;
            }
            unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }
}

impl Drop for MouseMonitor {
    fn drop(&mut self) {
        unsafe {
            let _ = UnhookWindowsHookEx(self.hook);
        }
    }
}

/// Ask the thread identified by `thread_id` to leave its message pump.
/// Safe to call from any thread, including a Ctrl+C handler.
pub fn post_quit(thread_id: u32) {
    unsafe {
        let _ = PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
    }
}
