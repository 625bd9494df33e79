//! Key chord synthesis via Win32 `SendInput`.
//!
//! The only input this tool ever produces is the parent-navigation chord.
//! The chord is injected as one atomic batch: every key pressed in order,
//! then released in reverse, so no interleaved physical keystroke can split
//! the combination.

use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP,
    VIRTUAL_KEY,
};

use crate::dispatch::ParentNav;
use crate::errors::UpclickError;

/// Pre-computed size of `INPUT` for `SendInput` calls.
const INPUT_SIZE: i32 = std::mem::size_of::<INPUT>() as i32;

/// No real chord uses more keys than this.
const MAX_CHORD_KEYS: usize = 8;

fn key_input(vk: u16, key_up: bool) -> INPUT {
    let flags = if key_up {
        KEYEVENTF_KEYUP
    } else {
        KEYBD_EVENT_FLAGS(0)
    };

    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(vk),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

/// Send a key combination: press all keys in order, release in reverse, in
/// a single `SendInput` call.
///
/// Returns the number of events injected. 0 if `vk_codes` is empty or
/// longer than [`MAX_CHORD_KEYS`].
pub fn send_chord(vk_codes: &[u16]) -> u32 {
    if vk_codes.is_empty() || vk_codes.len() > MAX_CHORD_KEYS {
        return 0;
    }

    let mut inputs: Vec<INPUT> = Vec::with_capacity(vk_codes.len() * 2);
    for &vk in vk_codes {
        inputs.push(key_input(vk, false));
    }
    for &vk in vk_codes.iter().rev() {
        inputs.push(key_input(vk, true));
    }

    unsafe { SendInput(&inputs, INPUT_SIZE) }
}

/// [`ParentNav`] implementation that sends a configured chord.
pub struct KeySender {
    chord: Vec<u16>,
}

impl KeySender {
    pub fn new(chord: &[u16]) -> Self {
        Self {
            chord: chord.to_vec(),
        }
    }
}

impl ParentNav for KeySender {
    fn navigate_parent(&mut self) -> Result<(), UpclickError> {
        let expected = (self.chord.len() * 2) as u32;
        let injected = send_chord(&self.chord);
        if injected == expected {
            Ok(())
        } else {
            Err(UpclickError::InputError(format!(
                "SendInput injected {injected} of {expected} events"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chord_is_rejected() {
        assert_eq!(send_chord(&[]), 0);
    }

    #[test]
    fn test_oversized_chord_is_rejected() {
        let too_many = [0u16; 9];
        assert_eq!(send_chord(&too_many), 0);
    }
}
