//! Where configuration values come from.

use std::collections::HashMap;
use std::ffi::OsString;

/// A read-only view of named configuration values.
pub trait EnvSource {
    /// Look up a variable. `None` means the variable is not set at all.
    fn get(&self, key: &str) -> Option<OsString>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<OsString> {
        HashMap::get(self, key).map(OsString::from)
    }
}
