use std::collections::HashMap;

use super::StoreError;

/// Raw key/value storage behind the `StateStore` actor.
///
/// Single-key operations only; there are no transactions across keys.
/// `compare_and_set` is the one atomic primitive: it writes `new` (or deletes
/// the key when `new` is `None`) only if the current value equals `expected`.
pub trait KvBackend: 'static {
    fn get(&mut self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
    fn compare_and_set(
        &mut self,
        key: &str,
        expected: Option<&str>,
        new: Option<String>,
    ) -> Result<bool, StoreError>;
}

/// Process-local backend. Lives as long as the `StateStore` actor owning it.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvBackend for MemoryBackend {
    fn get(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn compare_and_set(
        &mut self,
        key: &str,
        expected: Option<&str>,
        new: Option<String>,
    ) -> Result<bool, StoreError> {
        if self.entries.get(key).map(String::as_str) != expected {
            return Ok(false);
        }
        match new {
            Some(value) => {
                self.entries.insert(key.to_string(), value);
            }
            None => {
                self.entries.remove(key);
            }
        }
        Ok(true)
    }
}
