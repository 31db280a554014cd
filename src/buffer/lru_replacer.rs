use std::collections::HashMap;

use parking_lot::Mutex;

use crate::common::{FrameId, Timestamp};

/// Tracked state for the replacer, guarded by a single mutex.
struct LruState {
    /// Recency stamp for each evictable frame (larger = more recent)
    stamps: HashMap<FrameId, Timestamp>,
    /// Monotonically increasing logical clock
    clock: Timestamp,
}

/// LRU Replacement Policy
///
/// Tracks only frames that are currently evictable (pin count zero). The
/// frame whose stamp is smallest was marked accessible least recently and
/// is the next victim. Pinned frames are absent from the map entirely, so
/// they can never be chosen.
pub struct LruReplacer {
    state: Mutex<LruState>,
}

impl LruReplacer {
    /// Creates a new, empty LRU replacer.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LruState {
                stamps: HashMap::new(),
                clock: 0,
            }),
        }
    }

    /// Marks a frame as evictable, stamping it most-recently-used.
    /// Re-marking an already tracked frame promotes it.
    pub fn mark_accessible(&self, frame_id: FrameId) {
        let mut state = self.state.lock();
        let stamp = state.clock;
        state.clock += 1;
        state.stamps.insert(frame_id, stamp);
    }

    /// Marks a frame as pinned, removing it from eviction consideration.
    /// A frame the replacer is not tracking is left alone.
    pub fn mark_pinned(&self, frame_id: FrameId) {
        self.state.lock().stamps.remove(&frame_id);
    }

    /// Selects and removes the least recently used evictable frame.
    /// Returns None if no frame is evictable.
    pub fn select_victim(&self) -> Option<FrameId> {
        let mut state = self.state.lock();

        let victim = state
            .stamps
            .iter()
            .min_by_key(|(_, &stamp)| stamp)
            .map(|(&frame_id, _)| frame_id)?;

        state.stamps.remove(&victim);
        Some(victim)
    }

    /// Returns the number of evictable frames.
    pub fn size(&self) -> usize {
        self.state.lock().stamps.len()
    }
}

impl Default for LruReplacer {
    fn default() -> Self {
        Self::new()
    }
}
