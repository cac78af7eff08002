//! Keyed configuration access port.
//!
//! Sectioned key/value access with per-type getters; missing or unparsable
//! values fall back to the supplied default (validation happens later, on
//! the assembled `EngineConfig`).

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
