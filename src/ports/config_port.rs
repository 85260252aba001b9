//! Configuration access port trait.
//!
//! Getters with a default never fail: a missing or unparseable value yields
//! the default, which validation then checks like any other value.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
