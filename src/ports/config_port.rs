//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    /// `None` when the key is absent; `Some(Err)` carries the raw value when
    /// it is present but not an integer.
    fn get_int(&self, section: &str, key: &str) -> Option<Result<i64, String>>;
    fn get_bool(&self, section: &str, key: &str) -> Option<Result<bool, String>>;
}
