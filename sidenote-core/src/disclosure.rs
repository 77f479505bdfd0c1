//! Single-open-popover arbitration for annotation renderers.
//!
//! One arbiter is created per page (or session) and cloned into every
//! annotation on it. Clones share the open slot; arbiters created separately
//! never affect each other.

use std::cell::Cell;
use std::rc::Rc;

use crate::model::NodeId;

#[derive(Debug, Clone, Default)]
pub struct DisclosureArbiter {
    open: Rc<Cell<Option<NodeId>>>,
}

impl DisclosureArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `owner`, closing whatever was open. Returns the displaced owner.
    pub fn open(&self, owner: NodeId) -> Option<NodeId> {
        self.open.replace(Some(owner)).filter(|prev| *prev != owner)
    }

    /// Close `owner` if it is the one currently open
    pub fn close(&self, owner: NodeId) -> bool {
        if self.is_open(owner) {
            self.open.set(None);
            true
        } else {
            false
        }
    }

    /// Returns whether `owner` is open afterwards
    pub fn toggle(&self, owner: NodeId) -> bool {
        if self.close(owner) {
            false
        } else {
            self.open(owner);
            true
        }
    }

    pub fn current(&self) -> Option<NodeId> {
        self.open.get()
    }

    pub fn is_open(&self, owner: NodeId) -> bool {
        self.open.get() == Some(owner)
    }
}
