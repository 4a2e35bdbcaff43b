use alloc::string::String;
use alloc::vec::Vec;

/// An attribute change on a host element, as reported by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MutationRecord<E> {
    pub target: E,
    pub attribute_name: String,
}

/// Queues attribute mutations of a single spacer.
///
/// Records are only accepted while connected; disconnecting drops anything pending.
#[derive(Clone, Debug)]
pub struct SpacerMutationObserver<E> {
    target: E,
    connected: bool,
    records: Vec<MutationRecord<E>>,
}

impl<E: Copy + Eq> SpacerMutationObserver<E> {
    /// Creates an observer that is already watching `target`.
    pub fn new(target: E) -> Self {
        Self {
            target,
            connected: true,
            records: Vec::new(),
        }
    }

    pub fn target(&self) -> E {
        self.target
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn observe(&mut self) {
        self.connected = true;
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
        self.records.clear();
    }

    /// Queues `record` if it concerns the watched spacer. Returns `true` when queued.
    pub fn enqueue(&mut self, record: &MutationRecord<E>) -> bool {
        if !self.connected || record.target != self.target {
            return false;
        }
        self.records.push(record.clone());
        true
    }

    pub fn has_pending(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn take_records(&mut self) -> Vec<MutationRecord<E>> {
        core::mem::take(&mut self.records)
    }
}
