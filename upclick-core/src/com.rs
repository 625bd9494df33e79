//! COM apartment RAII guard.
//!
//! The worker thread owns its own COM apartment for the lifetime of its
//! loop. [`ComGuard`] pairs `CoInitializeEx` with `CoUninitialize` so the
//! apartment is released even on an early return, and tracks whether a
//! balancing uninitialize is actually owed (it is not after
//! `RPC_E_CHANGED_MODE`).
//!
//! The `PhantomData<*const ()>` field makes the guard `!Send`/`!Sync`;
//! apartments are per-thread and the guard must never migrate.

use crate::errors::UpclickError;
use windows::Win32::System::Com::{CoInitializeEx, CoUninitialize, COINIT_MULTITHREADED};

/// Keep alive for as long as the thread uses COM.
#[must_use = "ComGuard must be kept alive for the duration of COM usage"]
pub struct ComGuard {
    should_uninit: bool,
    _not_send: std::marker::PhantomData<*const ()>,
}

impl ComGuard {
    /// Join (or create) the calling thread's MTA apartment.
    ///
    /// `S_OK` and `S_FALSE` both succeed and owe an uninitialize.
    /// `RPC_E_CHANGED_MODE` means the thread already runs an STA; COM stays
    /// usable, but no balancing call may be made.
    pub fn init() -> Result<Self, UpclickError> {
        let hr = unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) };

        match hr.0 as u32 {
            0x0 | 0x1 => Ok(Self {
                should_uninit: true,
                _not_send: std::marker::PhantomData,
            }),
            0x8001_0106 => {
                log::warn!(
                    "CoInitializeEx: thread already has an STA apartment, using it as-is"
                );
                Ok(Self {
                    should_uninit: false,
                    _not_send: std::marker::PhantomData,
                })
            }
            value => Err(UpclickError::ComError(format!(
                "CoInitializeEx failed: HRESULT 0x{value:08X}"
            ))),
        }
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if self.should_uninit {
            unsafe { CoUninitialize() };
        }
    }
}
