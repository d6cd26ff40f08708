//! FFI bindings for HabitLens
//!
//! C-compatible entry points for calling the analytics pipeline from other
//! languages. All functions take null-terminated C strings and return
//! allocated memory that must be freed by the caller using
//! `habitlens_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::assembler::DailyFeatureAssembler;
use crate::types::{AppSession, ModelOutput};
use crate::weekly::WeeklyAnalyzer;
use chrono::NaiveDate;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Assemble a daily feature vector from one day's sessions.
///
/// `date` is an ISO calendar date (`YYYY-MM-DD`); `sessions_json` is a JSON
/// array of app sessions. Returns the daily feature struct as JSON. No
/// previous-day context is available through this entry point, so the
/// stability block is neutral.
///
/// # Safety
/// - `date` and `sessions_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with
///   `habitlens_free_string`.
/// - Returns NULL on error; call `habitlens_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn habitlens_features_from_sessions(
    date: *const c_char,
    sessions_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let date_str = match cstr_to_string(date) {
        Some(s) => s,
        None => {
            set_last_error("Invalid date string pointer");
            return ptr::null_mut();
        }
    };

    let sessions_str = match cstr_to_string(sessions_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid sessions JSON string pointer");
            return ptr::null_mut();
        }
    };

    let parsed_date = match NaiveDate::parse_from_str(&date_str, "%Y-%m-%d") {
        Ok(d) => d,
        Err(e) => {
            set_last_error(&format!("Failed to parse date '{}': {}", date_str, e));
            return ptr::null_mut();
        }
    };

    let sessions: Vec<AppSession> = match serde_json::from_str(&sessions_str) {
        Ok(s) => s,
        Err(e) => {
            set_last_error(&format!("Failed to parse sessions JSON: {}", e));
            return ptr::null_mut();
        }
    };

    let assembled = DailyFeatureAssembler::assemble(parsed_date, &sessions, None, None);
    match serde_json::to_string(&assembled.features) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Summarize a week of model outputs.
///
/// `outputs_json` is a JSON array of per-day model outputs. Returns the
/// weekly summary as JSON; an empty array yields the sentinel summary.
///
/// # Safety
/// - `outputs_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with
///   `habitlens_free_string`.
/// - Returns NULL on error; call `habitlens_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn habitlens_weekly_summary(outputs_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let outputs_str = match cstr_to_string(outputs_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid outputs JSON string pointer");
            return ptr::null_mut();
        }
    };

    let outputs: Vec<ModelOutput> = match serde_json::from_str(&outputs_str) {
        Ok(o) => o,
        Err(e) => {
            set_last_error(&format!("Failed to parse model outputs JSON: {}", e));
            return ptr::null_mut();
        }
    };

    let summary = WeeklyAnalyzer::analyze(&outputs);
    match serde_json::to_string(&summary) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a string returned by HabitLens functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a HabitLens function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn habitlens_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next HabitLens call on this
///   thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn habitlens_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the HabitLens library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn habitlens_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn sample_sessions_json() -> CString {
        CString::new(
            r#"[
            {
                "app_name": "com.social.app",
                "start_time": "2024-03-01T09:00:00Z",
                "end_time": "2024-03-01T09:30:00Z"
            },
            {
                "app_name": "com.mail.app",
                "start_time": "2024-03-01T10:00:00Z",
                "end_time": "2024-03-01T10:15:00Z"
            }
        ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ffi_features_from_sessions() {
        let date = CString::new("2024-03-01").unwrap();
        let sessions = sample_sessions_json();

        unsafe {
            let result = habitlens_features_from_sessions(date.as_ptr(), sessions.as_ptr());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            assert!(result_str.contains("total_screen_time_minutes"));
            assert!(result_str.contains("habit_strength_index"));

            habitlens_free_string(result);
        }
    }

    #[test]
    fn test_ffi_weekly_summary() {
        let outputs = CString::new(
            r#"[
            {"habituality_score": 0.8, "distraction_score": 0.3, "stability_label": "Stable"},
            {"habituality_score": 0.7, "distraction_score": 0.4, "stability_label": "Stable"}
        ]"#,
        )
        .unwrap();

        unsafe {
            let result = habitlens_weekly_summary(outputs.as_ptr());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            assert!(result_str.contains("average_habituality"));

            habitlens_free_string(result);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        let date = CString::new("not-a-date").unwrap();
        let sessions = sample_sessions_json();

        unsafe {
            let result = habitlens_features_from_sessions(date.as_ptr(), sessions.as_ptr());
            assert!(result.is_null());

            let error = habitlens_last_error();
            assert!(!error.is_null());

            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(error_str.contains("not-a-date"));
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = habitlens_version();
            assert!(!version.is_null());

            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert!(!version_str.is_empty());
        }
    }
}
