//! Console logging macros
//!
//! On wasm32 the message goes to the browser console through `web_sys`.
//! On native targets the arguments are still type-checked but nothing is
//! printed, so unit tests never call into missing JS glue.
//!
//! Usage:
//! ```rust
//! use windtunnel_engine::{console_log, console_warn};
//!
//! let cells = 64 * 32;
//! console_log!("lattice reseeded: {} cells", cells);
//! console_warn!("inflow {} rejected", 0.5);
//! ```

/// Log an informational message
#[macro_export]
macro_rules! console_log {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::console::log_1(&format!($($arg)*).into());
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = format!($($arg)*);
        }
    }};
}

/// Log a warning (rejected edits, buffer reallocation)
#[macro_export]
macro_rules! console_warn {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::console::warn_1(&format!($($arg)*).into());
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = format!($($arg)*);
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn macros_are_silent_on_native() {
        let width = 8;
        console_log!("grid width {}", width);
        console_warn!("grid width {} too small", width);
    }
}
