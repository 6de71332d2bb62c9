use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Append-only list of zero-argument actions, run in insertion order.
#[derive(Default)]
pub struct CallbackList {
    callbacks: RwLock<Vec<Callback>>,
}

impl CallbackList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.callbacks.write().push(Arc::new(callback));
    }

    /// Move every callback of `other` to the end of this list, keeping their order.
    pub fn append(&self, other: CallbackList) {
        self.callbacks.write().extend(other.callbacks.into_inner());
    }

    /// Run every callback once, in order. Returns how many ran.
    pub fn run_all(&self) -> usize {
        // Run from a snapshot: callbacks may take other locks or append.
        let snapshot = self.callbacks.read().clone();
        for callback in &snapshot {
            callback();
        }
        snapshot.len()
    }

    pub fn len(&self) -> usize {
        self.callbacks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.read().is_empty()
    }
}

impl fmt::Debug for CallbackList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackList")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_runs_in_insertion_order() {
        let list = CallbackList::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..4 {
            let order = Arc::clone(&order);
            list.push(move || order.lock().push(i));
        }

        assert_eq!(list.run_all(), 4);
        assert_eq!(*order.lock(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_empty_list_runs_nothing() {
        let list = CallbackList::new();
        assert!(list.is_empty());
        assert_eq!(list.run_all(), 0);
    }

    #[test]
    fn test_callback_may_append_during_run() {
        let list = Arc::new(CallbackList::new());
        let inner = Arc::clone(&list);
        list.push(move || inner.push(|| {}));

        assert_eq!(list.run_all(), 1);
        assert_eq!(list.len(), 2);
    }
}
