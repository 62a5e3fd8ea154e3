//! Request memoization.
//!
//! Each key owns a `tokio::sync::OnceCell`. Concurrent callers of the same key
//! await one in-flight initialization; a failed initialization leaves the cell
//! empty so the next caller retries. The map lock is released before awaiting.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;

pub struct Memo<T> {
    cells: Mutex<HashMap<String, Arc<OnceCell<Arc<T>>>>>,
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, running `init` if there is none.
    pub async fn get_or_try_init<F, Fut, E>(&self, key: &str, init: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cell = self.cells.lock().entry(key.to_string()).or_default().clone();
        let value = cell.get_or_try_init(|| async move { init().await.map(Arc::new) }).await?;
        Ok(Arc::clone(value))
    }

    /// Drop the entry for `key`.
    pub fn invalidate(&self, key: &str) {
        self.cells.lock().remove(key);
    }

    pub fn clear(&self) {
        self.cells.lock().clear();
    }

    /// Number of initialized entries.
    pub fn len(&self) -> usize {
        self.cells.lock().values().filter(|c| c.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn caches_success_only() {
        let memo: Memo<u32> = Memo::new();
        let calls = AtomicUsize::new(0);

        let r: Result<Arc<u32>, &str> = memo
            .get_or_try_init("k", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("boom")
            })
            .await;
        assert!(r.is_err());
        assert!(memo.is_empty());

        for _ in 0..3 {
            let v: Result<Arc<u32>, &str> = memo
                .get_or_try_init("k", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await;
            assert_eq!(*v.unwrap(), 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(memo.len(), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_new_value() {
        let memo: Memo<String> = Memo::new();
        let a = memo
            .get_or_try_init("k", || async { Ok::<_, ()>("a".to_string()) })
            .await
            .unwrap();
        memo.invalidate("k");
        let b = memo
            .get_or_try_init("k", || async { Ok::<_, ()>("a".to_string()) })
            .await
            .unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a, b);

        memo.clear();
        assert!(memo.is_empty());
    }
}
