// C-callable entry points for game engine hosts
//
// Booleans cross as u8 (1 = true). Returned strings are heap-allocated by
// this library and owned by the caller, who must release them with
// `audio_session_bridge_free_string`. Null input strings are treated as
// "no value": a null category/mode fails, a null option list means none.
//
// Symbols use the `audio_session_bridge_` prefix in snake case. Hosts that
// bound the older `AVAudioSessionBridge_*` names map them one to one:
// `AVAudioSessionBridge_GetCategory` is `audio_session_bridge_get_category`,
// `AVAudioSessionBridge_PrintAudioSessionInfo` is
// `audio_session_bridge_print_info`, and so on. There is no counterpart for
// `AVAudioSessionBridge_UnitySetAudioSessionActive`; strings returned here
// must go back through `audio_session_bridge_free_string`.

use std::borrow::Cow;
use std::ffi::{c_char, CStr, CString};

use tracing::error;

use crate::session::driver::PlatformDriver;
use crate::session::native::NativeAccessor;

fn accessor() -> NativeAccessor<PlatformDriver> {
    NativeAccessor::new(PlatformDriver::default())
}

fn into_c_string(text: String) -> *mut c_char {
    match CString::new(text) {
        Ok(c_string) => c_string.into_raw(),
        Err(e) => {
            error!("String with interior NUL cannot cross the C boundary: {}", e);
            std::ptr::null_mut()
        }
    }
}

/// Helper to borrow a C string; `None` for null
unsafe fn str_arg<'a>(ptr: *const c_char) -> Option<Cow<'a, str>> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy())
}

fn as_u8(flag: bool) -> u8 {
    u8::from(flag)
}

#[no_mangle]
pub extern "C" fn audio_session_bridge_get_category() -> *mut c_char {
    into_c_string(accessor().get_category())
}

#[no_mangle]
pub extern "C" fn audio_session_bridge_get_mode() -> *mut c_char {
    into_c_string(accessor().get_mode())
}

/// Raw platform option bits
#[no_mangle]
pub extern "C" fn audio_session_bridge_get_category_options() -> u32 {
    accessor().get_category_options()
}

#[no_mangle]
pub extern "C" fn audio_session_bridge_get_is_other_audio_playing() -> u8 {
    as_u8(accessor().get_other_audio_playing())
}

#[no_mangle]
pub extern "C" fn audio_session_bridge_get_secondary_audio_should_be_silenced_hint() -> u8 {
    as_u8(accessor().get_silence_hint())
}

#[no_mangle]
pub extern "C" fn audio_session_bridge_get_output_volume() -> f32 {
    accessor().get_output_volume()
}

/// # Safety
///
/// `category` and `options` must each be null or point to a NUL-terminated
/// string that stays valid for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn audio_session_bridge_set_category(
    category: *const c_char,
    options: *const c_char,
) -> u8 {
    let Some(category) = str_arg(category) else {
        return 0;
    };
    let options = str_arg(options).unwrap_or_default();
    as_u8(accessor().set_category(&category, &options))
}

/// # Safety
///
/// `mode` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn audio_session_bridge_set_mode(mode: *const c_char) -> u8 {
    let Some(mode) = str_arg(mode) else {
        return 0;
    };
    as_u8(accessor().set_mode(&mode))
}

/// `active` is 1 to activate; anything else deactivates.
///
/// # Safety
///
/// `options` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn audio_session_bridge_set_active(
    active: u8,
    options: *const c_char,
) -> u8 {
    let options = str_arg(options).unwrap_or_default();
    as_u8(accessor().set_active(active == 1, &options))
}

#[no_mangle]
pub extern "C" fn audio_session_bridge_print_info() {
    accessor().print_info();
}

/// JSON snapshot, or null if serialization failed
#[no_mangle]
pub extern "C" fn audio_session_bridge_get_audio_session_info(is_detail: u8) -> *mut c_char {
    match accessor().get_session_snapshot(is_detail == 1) {
        Some(json) => into_c_string(json),
        None => std::ptr::null_mut(),
    }
}

/// Releases a string returned by this library. Null is ignored.
///
/// # Safety
///
/// `ptr` must be null or a pointer previously returned by one of the
/// `audio_session_bridge_*` functions, not yet freed.
#[no_mangle]
pub unsafe extern "C" fn audio_session_bridge_free_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    drop(CString::from_raw(ptr));
}
