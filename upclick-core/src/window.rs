//! Owning-window resolution for the scoping check.
//!
//! A hit-tested element rarely carries a window handle itself; the nearest
//! ancestor that does is found by walking the control tree, and its
//! top-level ancestor's class name is what the dispatcher compares against
//! the target class.

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Accessibility::{IUIAutomationElement, IUIAutomationTreeWalker};
use windows::Win32::UI::WindowsAndMessaging::{GetAncestor, GetClassNameW, GA_ROOT};

/// How far up to look for an ancestor with a native window handle. Explorer
/// hosts its views a handful of levels below the frame; anything deeper
/// means the element is not window-backed at all.
const MAX_HWND_PROBE: usize = 8;

/// Find the native window hosting `element`, if any.
pub fn owning_window(
    element: &IUIAutomationElement,
    walker: &IUIAutomationTreeWalker,
) -> Option<HWND> {
    let mut current = element.clone();
    for _ in 0..MAX_HWND_PROBE {
        if let Ok(hwnd) = unsafe { current.CurrentNativeWindowHandle() } {
            if !hwnd.0.is_null() {
                return Some(hwnd);
            }
        }
        current = unsafe { walker.GetParentElement(&current) }.ok()?;
    }
    None
}

/// Class name of the top-level window above `hwnd`.
pub fn top_level_class(hwnd: HWND) -> String {
    let root = unsafe { GetAncestor(hwnd, GA_ROOT) };
    let target = if root.0.is_null() { hwnd } else { root };
    read_class_name(target)
}

/// Read a window's class name (up to 256 chars).
fn read_class_name(hwnd: HWND) -> String {
    let mut buf = [0u16; 256];
    let len = unsafe { GetClassNameW(hwnd, &mut buf) };
    if len <= 0 {
        return String::new();
    }
    String::from_utf16_lossy(&buf[..len as usize])
}
