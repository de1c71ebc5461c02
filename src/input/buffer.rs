//! Double-buffered device state
//!
//! Every device keeps two snapshots: the one polled this tick (`current`) and the
//! one polled the tick before (`previous`). Level queries (`down`, `up`) read a
//! single snapshot, edge queries (`pressed`, `released`) compare both.

/// A snapshot that can answer whether a control of type `C` is active
pub trait Controls<C: Copy> {
    /// Returns true if the control is held in this snapshot
    fn is_active(&self, control: C) -> bool;
}

/// Current and previous snapshot of a single device
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateBuffer<S> {
    current: S,
    previous: S,
}

impl<S: Default> StateBuffer<S> {
    /// Creates a buffer with both snapshots idle
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> StateBuffer<S> {
    /// Rotates the buffer: the current snapshot becomes the previous one
    pub fn advance(&mut self, next: S) {
        self.previous = std::mem::replace(&mut self.current, next);
    }

    /// Snapshot polled this tick
    pub fn current(&self) -> &S {
        &self.current
    }

    /// Snapshot polled the tick before
    pub fn previous(&self) -> &S {
        &self.previous
    }

    /// Applies `f` to both snapshots and returns `(current, previous)`
    pub(crate) fn pair<T>(&self, f: impl Fn(&S) -> T) -> (T, T) {
        (f(&self.current), f(&self.previous))
    }

    /// True if the control is held now
    pub fn down<C: Copy>(&self, control: C) -> bool
    where
        S: Controls<C>,
    {
        self.current.is_active(control)
    }

    /// True if every listed control is held now
    pub fn all_down<C: Copy>(&self, controls: &[C]) -> bool
    where
        S: Controls<C>,
    {
        controls.iter().all(|&c| self.down(c))
    }

    /// True if at least one listed control is held now
    pub fn any_down<C: Copy>(&self, controls: &[C]) -> bool
    where
        S: Controls<C>,
    {
        controls.iter().any(|&c| self.down(c))
    }

    /// True if the control is not held now
    pub fn up<C: Copy>(&self, control: C) -> bool
    where
        S: Controls<C>,
    {
        !self.current.is_active(control)
    }

    /// True if none of the listed controls is held now
    pub fn all_up<C: Copy>(&self, controls: &[C]) -> bool
    where
        S: Controls<C>,
    {
        controls.iter().all(|&c| self.up(c))
    }

    /// True if at least one listed control is not held now
    pub fn any_up<C: Copy>(&self, controls: &[C]) -> bool
    where
        S: Controls<C>,
    {
        controls.iter().any(|&c| self.up(c))
    }

    /// Rising edge: held now, not held on the previous tick
    pub fn pressed<C: Copy>(&self, control: C) -> bool
    where
        S: Controls<C>,
    {
        self.current.is_active(control) && !self.previous.is_active(control)
    }

    /// Chord: every listed control rose during this same tick
    ///
    /// Controls that were already held on the previous tick break the chord,
    /// even if all of them are held now.
    pub fn all_pressed<C: Copy>(&self, controls: &[C]) -> bool
    where
        S: Controls<C>,
    {
        controls.iter().all(|&c| self.pressed(c))
    }

    /// At least one listed control rose this tick, whatever the others do
    pub fn any_pressed<C: Copy>(&self, controls: &[C]) -> bool
    where
        S: Controls<C>,
    {
        controls.iter().any(|&c| self.pressed(c))
    }

    /// Falling edge: not held now, held on the previous tick
    pub fn released<C: Copy>(&self, control: C) -> bool
    where
        S: Controls<C>,
    {
        !self.current.is_active(control) && self.previous.is_active(control)
    }

    /// Every listed control fell during this same tick
    pub fn all_released<C: Copy>(&self, controls: &[C]) -> bool
    where
        S: Controls<C>,
    {
        controls.iter().all(|&c| self.released(c))
    }

    /// At least one listed control fell this tick
    pub fn any_released<C: Copy>(&self, controls: &[C]) -> bool
    where
        S: Controls<C>,
    {
        controls.iter().any(|&c| self.released(c))
    }

    /// True if the control was held on the previous tick
    pub fn was_down<C: Copy>(&self, control: C) -> bool
    where
        S: Controls<C>,
    {
        self.previous.is_active(control)
    }

    pub fn was_all_down<C: Copy>(&self, controls: &[C]) -> bool
    where
        S: Controls<C>,
    {
        controls.iter().all(|&c| self.was_down(c))
    }

    pub fn was_any_down<C: Copy>(&self, controls: &[C]) -> bool
    where
        S: Controls<C>,
    {
        controls.iter().any(|&c| self.was_down(c))
    }

    /// True if the control was not held on the previous tick
    pub fn was_up<C: Copy>(&self, control: C) -> bool
    where
        S: Controls<C>,
    {
        !self.previous.is_active(control)
    }

    pub fn was_all_up<C: Copy>(&self, controls: &[C]) -> bool
    where
        S: Controls<C>,
    {
        controls.iter().all(|&c| self.was_up(c))
    }

    pub fn was_any_up<C: Copy>(&self, controls: &[C]) -> bool
    where
        S: Controls<C>,
    {
        controls.iter().any(|&c| self.was_up(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two-control device: bit 0 is `0`, bit 1 is `1`
    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    struct Bits(u8);

    impl Controls<u8> for Bits {
        fn is_active(&self, control: u8) -> bool {
            self.0 & (1 << control) != 0
        }
    }

    fn buffer_after(states: &[u8]) -> StateBuffer<Bits> {
        let mut buffer = StateBuffer::new();
        for &s in states {
            buffer.advance(Bits(s));
        }
        buffer
    }

    #[test]
    fn test_initial_state_is_idle() {
        let buffer: StateBuffer<Bits> = StateBuffer::new();
        assert!(buffer.up(0));
        assert!(!buffer.down(0));
        assert!(!buffer.pressed(0));
        assert!(!buffer.released(0));
        assert!(buffer.was_up(0));
    }

    #[test]
    fn test_advance_rotates_snapshots() {
        let buffer = buffer_after(&[0b01, 0b10]);
        assert_eq!(*buffer.current(), Bits(0b10));
        assert_eq!(*buffer.previous(), Bits(0b01));
    }

    #[test]
    fn test_press_and_release_edges() {
        let mut buffer = buffer_after(&[0b01]);
        assert!(buffer.pressed(0));
        assert!(buffer.down(0));
        assert!(buffer.was_up(0));

        buffer.advance(Bits(0b01));
        assert!(!buffer.pressed(0));
        assert!(!buffer.released(0));

        buffer.advance(Bits(0));
        assert!(buffer.released(0));
        assert!(buffer.up(0));
        assert!(buffer.was_down(0));
    }

    #[test]
    fn test_chord_requires_same_tick() {
        // 0 held first, 1 joins later: both down, but never pressed together
        let buffer = buffer_after(&[0b01, 0b11]);
        assert!(buffer.all_down(&[0, 1]));
        assert!(!buffer.all_pressed(&[0, 1]));
        assert!(buffer.any_pressed(&[0, 1]));

        let buffer = buffer_after(&[0b11]);
        assert!(buffer.all_pressed(&[0, 1]));
    }

    #[test]
    fn test_all_released_requires_same_tick() {
        let buffer = buffer_after(&[0b11, 0b01, 0]);
        assert!(!buffer.all_released(&[0, 1]));
        assert!(buffer.any_released(&[0, 1]));

        let buffer = buffer_after(&[0b11, 0]);
        assert!(buffer.all_released(&[0, 1]));
    }

    #[test]
    fn test_empty_lists() {
        let buffer = buffer_after(&[0b11]);
        let none: &[u8] = &[];
        assert!(buffer.all_down(none));
        assert!(buffer.all_up(none));
        assert!(buffer.all_pressed(none));
        assert!(buffer.all_released(none));
        assert!(buffer.was_all_down(none));
        assert!(!buffer.any_down(none));
        assert!(!buffer.any_up(none));
        assert!(!buffer.any_pressed(none));
        assert!(!buffer.any_released(none));
        assert!(!buffer.was_any_up(none));
    }

    #[test]
    fn test_mixed_any_queries() {
        let buffer = buffer_after(&[0b01, 0b10]);
        assert!(buffer.any_up(&[0, 1]));
        assert!(buffer.any_down(&[0, 1]));
        assert!(!buffer.all_up(&[0, 1]));
        assert!(buffer.was_any_down(&[0, 1]));
        assert!(buffer.was_any_up(&[0, 1]));
        assert!(!buffer.was_all_up(&[0, 1]));
    }

    #[test]
    fn test_queries_are_idempotent() {
        let buffer = buffer_after(&[0b01]);
        assert_eq!(buffer.pressed(0), buffer.pressed(0));
        assert_eq!(buffer.released(1), buffer.released(1));
    }

    #[test]
    fn test_pair_reads_both_snapshots() {
        let buffer = buffer_after(&[3, 5]);
        assert_eq!(buffer.pair(|b| b.0), (5, 3));
    }
}
