//! Bookkeeping of the scroll contexts a client has opened.

use std::collections::VecDeque;

/// Most scroll ids kept for clearing at shutdown.
pub(crate) const MAX_OPEN_SCROLLS: usize = 512;

/// Scroll ids still worth clearing on close, oldest first.
///
/// A continued cursor replaces the id it was continued from. Past
/// `capacity` the oldest ids are forgotten; the store expires them on its
/// own once their TTL elapses.
#[derive(Debug)]
pub(crate) struct ScrollRegistry {
    ids: VecDeque<String>,
    capacity: usize,
}

impl Default for ScrollRegistry {
    fn default() -> Self {
        Self::with_capacity(MAX_OPEN_SCROLLS)
    }
}

impl ScrollRegistry {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record `opened`, dropping `replaced` when the page continued it.
    pub(crate) fn track(&mut self, opened: Option<&str>, replaced: Option<&str>) {
        if let Some(replaced) = replaced {
            self.ids.retain(|id| id != replaced);
        }
        let Some(opened) = opened else {
            return;
        };
        if self.ids.iter().any(|id| id == opened) {
            return;
        }

        self.ids.push_back(opened.to_string());
        while self.ids.len() > self.capacity {
            self.ids.pop_front();
        }
    }

    /// Take every tracked id, leaving the registry empty.
    pub(crate) fn drain(&mut self) -> Vec<String> {
        self.ids.drain(..).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }
}
