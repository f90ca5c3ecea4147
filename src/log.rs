//! Console diagnostics with component prefixes.
//!
//! Messages land in the browser console on wasm32 (`[Session] evaluate ...`)
//! and on stderr in native test builds.

#[cfg(target_arch = "wasm32")]
pub fn debug(component: &str, message: &str) {
    web_sys::console::log_1(&format!("[{}] {}", component, message).into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn debug(component: &str, message: &str) {
    eprintln!("[{}] {}", component, message);
}

#[cfg(target_arch = "wasm32")]
pub fn error(component: &str, message: &str) {
    web_sys::console::error_1(&format!("[{}] {}", component, message).into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn error(component: &str, message: &str) {
    eprintln!("[{}] ERROR {}", component, message);
}
