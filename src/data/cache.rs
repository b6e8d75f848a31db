/// Key/value store for LLM responses.
///
/// Implementations must not panic: a failed read is a miss and a failed
/// write is logged and dropped.
pub trait Cache {
    /// Returns the stored response for `key`, or `None` on a miss.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    ///
    /// Fire-and-forget: errors are reported through the log only.
    fn set(&self, key: &str, value: &str);
}
