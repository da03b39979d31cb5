// ── Time-ordered sensor alert sequence ──
//
// Events are kept ascending by `time_received`. Only the store writes
// through the handles and it never touches `time_received` after
// insertion, so the ordering holds for the lifetime of the queue.

use std::collections::VecDeque;

use crate::model::{InternalState, Lifecycle, SensorAlert, SensorId, Shared};

pub(crate) struct SensorAlertQueue {
    events: VecDeque<Shared<SensorAlert>>,
}

impl SensorAlertQueue {
    pub(crate) fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Store an event behind the last one received at or before it.
    ///
    /// Scans from the tail: events mostly arrive in order, so the common
    /// case stops at the first comparison. Equal timestamps keep arrival
    /// order.
    pub(crate) fn insert(&mut self, mut event: SensorAlert) -> Shared<SensorAlert> {
        event.set_internal_state(InternalState::Stored);
        let time = event.time_received;

        let idx = self
            .events
            .iter()
            .rposition(|stored| stored.read().time_received <= time)
            .map_or(0, |i| i + 1);

        let handle = Shared::new(event);
        self.events.insert(idx, handle.clone());
        handle
    }

    /// Drop every event received strictly before `timestamp`.
    ///
    /// Stops at the first event at or after `timestamp`; everything behind
    /// it is newer because the queue is sorted.
    pub(crate) fn remove_received_before(&mut self, timestamp: i64) -> usize {
        let mut removed = 0;
        while self
            .events
            .front()
            .is_some_and(|event| event.read().time_received < timestamp)
        {
            if let Some(event) = self.events.pop_front() {
                event.update(|event| event.set_internal_state(InternalState::Deleted));
                removed += 1;
            }
        }
        removed
    }

    /// Drop every event raised by `sensor_id`.
    pub(crate) fn remove_for_sensor(&mut self, sensor_id: SensorId) -> usize {
        let before = self.events.len();
        self.events.retain(|event| {
            if event.read().sensor_id == Some(sensor_id) {
                event.update(|event| event.set_internal_state(InternalState::Deleted));
                false
            } else {
                true
            }
        });
        before - self.events.len()
    }

    pub(crate) fn handles(&self) -> Vec<Shared<SensorAlert>> {
        self.events.iter().cloned().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }
}
