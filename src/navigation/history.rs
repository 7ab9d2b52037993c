//! Browser-history boundary.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// The location stack the navigator keeps in sync with committed routes.
pub trait History: Send + Sync {
    /// The current location (`/path?query`).
    fn location(&self) -> String;

    /// Add a new entry and make it current, dropping any forward entries.
    fn push(&self, location: &str);

    /// Step back. Returns the new location, or `None` at the oldest entry.
    fn back(&self) -> Option<String>;

    /// Step forward. Returns the new location, or `None` at the newest entry.
    fn forward(&self) -> Option<String>;
}

/// In-memory history for headless use and tests.
#[derive(Debug)]
pub struct MemoryHistory {
    inner: Mutex<Entries>,
}

#[derive(Debug)]
struct Entries {
    stack: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Entries {
                stack: vec![initial.into()],
                index: 0,
            }),
        }
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.lock().stack.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        let entries = self.lock();
        entries.stack[entries.index].clone()
    }

    fn push(&self, location: &str) {
        let mut entries = self.lock();
        let keep = entries.index + 1;
        entries.stack.truncate(keep);
        entries.stack.push(location.to_string());
        entries.index = keep;
    }

    fn back(&self) -> Option<String> {
        let mut entries = self.lock();
        if entries.index == 0 {
            return None;
        }
        entries.index -= 1;
        Some(entries.stack[entries.index].clone())
    }

    fn forward(&self) -> Option<String> {
        let mut entries = self.lock();
        if entries.index + 1 >= entries.stack.len() {
            return None;
        }
        entries.index += 1;
        Some(entries.stack[entries.index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_back_forward() {
        let history = MemoryHistory::new("/");
        history.push("/events");
        history.push("/events/42");
        assert_eq!(history.location(), "/events/42");

        assert_eq!(history.back().as_deref(), Some("/events"));
        assert_eq!(history.back().as_deref(), Some("/"));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward().as_deref(), Some("/events"));
    }

    #[test]
    fn test_push_drops_forward_entries() {
        let history = MemoryHistory::new("/");
        history.push("/a");
        history.push("/b");
        history.back();
        history.push("/c");
        assert_eq!(history.entries(), vec!["/", "/a", "/c"]);
        assert_eq!(history.forward(), None);
    }
}
