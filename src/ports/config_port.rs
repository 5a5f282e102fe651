//! Configuration access port trait.

/// Typed lookups into a sectioned key/value configuration.
///
/// `Ok(None)` means the key is absent; `Err` carries a parse failure.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_float(&self, section: &str, key: &str) -> Result<Option<f64>, String>;
    fn get_uint(&self, section: &str, key: &str) -> Result<Option<u64>, String>;
}
