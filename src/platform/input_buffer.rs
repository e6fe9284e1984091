//=========================================================================
// Input Buffer
//
// Collects pointer events between two platform frames and splits them
// into two categories: discrete and continuous. Acts as a transient
// event aggregator between the winit callbacks and the core channel.
//
// Responsibilities:
// - Store incoming pointer events per frame
// - Deduplicate repeated discrete inputs (e.g. a doubled press)
// - Coalesce motion so only the latest sample per pointer survives
// - Hand both halves over via `drain()`
//
// Notes:
// The InputBuffer exists only for the current frame and is reset
// after being drained at the frame boundary.
//=========================================================================

//=== Internal Modules ====================================================
use crate::core::input::InputEvent;

//=== InputBuffer Struct ==================================================
//
// Represents the transient event store for one frame of input.
//
// Internally maintains:
// - `discrete`: ordered presses, releases and cancellations
// - `continuous`: last-known motion per pointer, in first-arrival order
//
pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    continuous: Vec<InputEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------
    //
    // Preallocates for a typical frame to avoid regrowth while pointers
    // are busy.
    //
    pub fn new() -> Self {
        const DISCRETE_BASE: usize = 32;
        const CONTINUOUS_BASE: usize = 8;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            continuous: Vec::with_capacity(CONTINUOUS_BASE),
        }
    }

    //--- Continuous Event Handling ---------------------------------------
    //
    // Inserts or replaces the motion sample of a pointer. Moves compare
    // equal per pointer id, so the newest coordinates overwrite the old
    // sample in place and the pointer keeps its slot.
    //
    pub fn push_continuous(&mut self, event: InputEvent) {
        match self.continuous.iter_mut().find(|e| **e == event) {
            Some(existing) => *existing = event,
            None => self.continuous.push(event),
        }
    }

    //--- Discrete Event Handling -----------------------------------------
    //
    // Appends a press/release. Identical consecutive events are dropped.
    //
    pub fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns (discrete, continuous) and clears the buffer, or `None` if
    // nothing arrived this frame.
    //
    pub fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }

        let discrete = std::mem::take(&mut self.discrete);
        let continuous = std::mem::take(&mut self.continuous);
        Some((discrete, continuous))
    }

    //--- Utilities --------------------------------------------------------
    #[cfg(test)]
    pub fn clear(&mut self) {
        self.discrete.clear();
        self.continuous.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.discrete.len() + self.continuous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.continuous.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{Pointer, PointerId};

    fn press(id: PointerId, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown(Pointer::new(id, x, y))
    }

    fn moved(id: PointerId, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(Pointer::new(id, x, y))
    }

    #[test]
    fn test_discrete_deduplication() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(press(PointerId::Mouse, 1.0, 1.0));
        buffer.push_discrete(press(PointerId::Mouse, 1.0, 1.0));
        buffer.push_discrete(press(PointerId::Touch(4), 1.0, 1.0));
        assert_eq!(buffer.discrete.len(), 2, "Duplicates should be ignored");
    }

    #[test]
    fn test_continuous_overwrite() {
        let mut buffer = InputBuffer::new();

        buffer.push_continuous(moved(PointerId::Mouse, 10.0, 10.0));
        buffer.push_continuous(moved(PointerId::Mouse, 20.0, 30.0));

        assert_eq!(
            buffer.continuous.len(),
            1,
            "Continuous buffer should keep only the latest event per pointer"
        );

        let event = buffer.continuous.iter().next().unwrap();
        let pointer = event.pointer().unwrap();
        assert_eq!((pointer.x, pointer.y), (20.0, 30.0));
    }

    #[test]
    fn test_continuous_keeps_one_sample_per_pointer() {
        let mut buffer = InputBuffer::new();

        buffer.push_continuous(moved(PointerId::Touch(1), 1.0, 1.0));
        buffer.push_continuous(moved(PointerId::Touch(2), 2.0, 2.0));
        buffer.push_continuous(moved(PointerId::Touch(1), 3.0, 3.0));

        assert_eq!(buffer.continuous.len(), 2);
    }

    #[test]
    fn test_continuous_drains_in_arrival_order() {
        let mut buffer = InputBuffer::new();

        for round in 0..50 {
            for id in 1..=4 {
                buffer.push_continuous(moved(PointerId::Touch(id), round as f32, 0.0));
            }
            buffer.push_continuous(moved(PointerId::Touch(2), round as f32, 9.0));

            let (_, continuous) = buffer.drain().unwrap();
            let ids: Vec<_> = continuous.iter().map(|e| e.pointer().unwrap().id).collect();
            assert_eq!(
                ids,
                vec![PointerId::Touch(1), PointerId::Touch(2), PointerId::Touch(3), PointerId::Touch(4)]
            );
            assert_eq!(continuous[1].pointer().unwrap().y, 9.0);
        }
    }

    #[test]
    fn test_drain_clears_buffer() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(press(PointerId::Mouse, 1.0, 1.0));
        buffer.push_continuous(moved(PointerId::Mouse, 5.0, 5.0));

        let (discrete, continuous) = buffer.drain().unwrap();
        assert_eq!(discrete.len(), 1);
        assert_eq!(continuous.len(), 1);
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_none());
    }

    #[test]
    fn test_clear_behavior() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(press(PointerId::Mouse, 1.0, 1.0));
        buffer.push_continuous(moved(PointerId::Mouse, 1.0, 2.0));
        assert_eq!(buffer.len(), 2);
        buffer.clear();
        assert!(buffer.is_empty());
    }

    //--- Memory Retention -------------------------------------------------
    //
    // `clear()` keeps the underlying storage for reuse across frames.
    //
    #[test]
    fn test_clear_does_not_deallocate() {
        let mut buffer = InputBuffer::new();

        for i in 0..64 {
            buffer.push_discrete(press(PointerId::Mouse, i as f32, 0.0));
        }
        for i in 0..16 {
            buffer.push_continuous(moved(PointerId::Touch(i), i as f32, i as f32));
        }

        let vec_cap_before = buffer.discrete.capacity();
        let motion_cap_before = buffer.continuous.capacity();

        buffer.clear();

        assert_eq!(buffer.discrete.len(), 0);
        assert_eq!(buffer.continuous.len(), 0);
        assert_eq!(buffer.discrete.capacity(), vec_cap_before);
        assert_eq!(buffer.continuous.capacity(), motion_cap_before);
    }
}
