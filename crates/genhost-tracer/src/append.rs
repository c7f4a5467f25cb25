use std::sync::{Mutex, MutexGuard, PoisonError};

/// Append-only accumulator shared between concurrent writers.
///
/// Writers only ever push; readers take a snapshot or drain. A panic in another
/// writer cannot leave a half-written entry behind, so a poisoned lock is recovered
/// rather than propagated.
#[derive(Debug)]
pub struct AppendLog<T> {
    items: Mutex<Vec<T>>,
}

impl<T> Default for AppendLog<T> {
    fn default() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }
}

impl<T> AppendLog<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, item: T) {
        self.lock().push(item);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Take every entry out, in insertion order.
    #[must_use]
    pub fn drain(&self) -> Vec<T> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> AppendLog<T> {
    /// Copy of the current entries, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_push_and_snapshot_preserve_order() {
        let log = AppendLog::new();
        log.push(1);
        log.push(2);
        log.push(3);

        assert_eq!(log.snapshot(), vec![1, 2, 3]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_drain_empties_the_log() {
        let log = AppendLog::new();
        log.push("a");

        assert_eq!(log.drain(), vec!["a"]);
        assert!(log.is_empty());
        assert!(log.drain().is_empty());
    }

    #[test]
    fn test_concurrent_writers() {
        let log = Arc::new(AppendLog::new());

        let handles: Vec<_> = (0..8)
            .map(|writer| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    for i in 0..250 {
                        log.push(writer * 1000 + i);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let mut items = log.snapshot();
        assert_eq!(items.len(), 2000);
        items.sort_unstable();
        items.dedup();
        assert_eq!(items.len(), 2000);
    }

    #[test]
    fn test_survives_poisoned_lock() {
        let log = Arc::new(AppendLog::new());
        log.push(1);

        let poisoner = Arc::clone(&log);
        let _ = thread::spawn(move || {
            let _guard = poisoner.lock();
            panic!("poison the lock");
        })
        .join();

        log.push(2);
        assert_eq!(log.snapshot(), vec![1, 2]);
    }
}
