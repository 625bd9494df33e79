//! `upclick_core` -- core library for upclick.
//!
//! upclick watches the global mouse stream and, when a double-click lands on
//! empty space inside a File Explorer window, sends Alt+Up to navigate to the
//! parent folder. This crate holds all the logic; the `upclick-cli` crate is
//! the thin executable wrapper around it.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`errors`] | `UpclickError` enum via `thiserror` |
//! | [`config`] | Runtime settings and their defaults |
//! | [`monitor`] | Double-click debounce and the click event queue |
//! | [`classify`] | Content-vs-blank ancestry walk over a UI element trait |
//! | [`dispatch`] | Worker loop: verdicts and the navigation side effect |
//! | [`com`] | `ComGuard` RAII wrapper for COM apartment init (Windows) |
//! | [`hook`] | `WH_MOUSE_LL` subscription and message pump (Windows) |
//! | [`uia`] | Live UI Automation element source (Windows) |
//! | [`window`] | Owning-window and window-class resolution (Windows) |
//! | [`input`] | `SendInput` key chord synthesis (Windows) |
//!
//! The debounce, classification, and dispatch logic is host-independent and
//! unit-tested everywhere; the platform integration compiles on Windows only.

pub mod classify;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod monitor;

#[cfg(windows)]
pub mod com;
#[cfg(windows)]
pub mod hook;
#[cfg(windows)]
pub mod input;
#[cfg(windows)]
pub mod uia;
#[cfg(windows)]
pub mod window;
