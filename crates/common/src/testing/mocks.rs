//! Mock implementations of common traits

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::storage::{MemorySessionStore, SessionStore, StorageError, StorageResult};

/// A call observed by [`MockSessionStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOperation {
    Get(String),
    Set(String, String),
    Remove(String),
}

/// Session store double backed by memory
///
/// Records every call and can be told to fail reads or writes for specific
/// keys. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockSessionStore {
    inner: MemorySessionStore,
    operations: Arc<Mutex<Vec<StoreOperation>>>,
    failing_writes: Arc<Mutex<HashSet<String>>>,
    fail_reads: Arc<AtomicBool>,
}

impl MockSessionStore {
    /// Empty mock with no injected failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock pre-populated with entries. Seeding is not recorded.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { inner: MemorySessionStore::with_entries(entries), ..Self::default() }
    }

    /// Make `set` and `remove` for `key` fail until [`Self::heal`] is called.
    pub fn fail_writes_to(&self, key: &str) {
        self.failing_writes.lock().insert(key.to_string());
    }

    /// Make every `get` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Clear all injected failures.
    pub fn heal(&self) {
        self.failing_writes.lock().clear();
        self.fail_reads.store(false, Ordering::SeqCst);
    }

    /// Current value without recording a `Get`.
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.inner.snapshot(key)
    }

    /// Every call received so far, in order.
    pub fn operations(&self) -> Vec<StoreOperation> {
        self.operations.lock().clone()
    }

    /// Number of recorded `Set`/`Remove` calls, failed ones included.
    pub fn write_count(&self) -> usize {
        self.operations.lock().iter().filter(|op| !matches!(op, StoreOperation::Get(_))).count()
    }

    /// Forget the recorded calls.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn record(&self, operation: StoreOperation) {
        self.operations.lock().push(operation);
    }

    fn check_write(&self, key: &str) -> StorageResult<()> {
        if self.failing_writes.lock().contains(key) {
            return Err(StorageError::Unavailable(format!("injected write failure for {}", key)));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.record(StoreOperation::Get(key.to_string()));
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("injected read failure for {}", key)));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.record(StoreOperation::Set(key.to_string(), value.to_string()));
        self.check_write(key)?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.record(StoreOperation::Remove(key.to_string()));
        self.check_write(key)?;
        self.inner.remove(key).await
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
