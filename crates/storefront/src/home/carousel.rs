//! Promotional image slider state.

use std::time::Duration;

/// Interval between automatic slide advances.
pub const SLIDE_INTERVAL: Duration = Duration::from_millis(5000);

/// Current slide of a rotating banner.
///
/// The index is always valid for the current collection length and wraps in
/// both directions. An empty collection has no current slide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    current: usize,
}

impl Carousel {
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self { len, current: 0 }
    }

    /// Adopt a new collection length, resetting the index if it falls out of range.
    pub const fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.current >= len {
            self.current = 0;
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The current slide index, `None` when there are no slides.
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        if self.len == 0 {
            None
        } else {
            Some(self.current)
        }
    }

    /// Move to the next slide, wrapping from the last to the first.
    pub const fn advance(&mut self) {
        if self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
    }

    /// Move to the previous slide, wrapping from the first to the last.
    pub const fn retreat(&mut self) {
        if self.len > 0 {
            self.current = (self.current + self.len - 1) % self.len;
        }
    }

    /// Previous/next controls are only shown with more than one slide.
    #[must_use]
    pub const fn shows_controls(&self) -> bool {
        self.len > 1
    }

    /// Whether the slide timer should run.
    #[must_use]
    pub const fn autoplays(&self) -> bool {
        self.len > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advancing_len_times_returns_to_start() {
        for len in 1..=7 {
            for start in 0..len {
                let mut carousel = Carousel::new(len);
                for _ in 0..start {
                    carousel.advance();
                }
                assert_eq!(carousel.current(), Some(start));

                for _ in 0..len {
                    carousel.advance();
                }
                assert_eq!(carousel.current(), Some(start), "len={len} start={start}");
            }
        }
    }

    #[test]
    fn test_advance_and_retreat_are_inverse() {
        for len in 1..=7 {
            for start in 0..len {
                let mut carousel = Carousel::new(len);
                for _ in 0..start {
                    carousel.advance();
                }

                carousel.advance();
                carousel.retreat();
                assert_eq!(carousel.current(), Some(start));

                carousel.retreat();
                carousel.advance();
                assert_eq!(carousel.current(), Some(start));
            }
        }
    }

    #[test]
    fn test_retreat_wraps_to_last() {
        let mut carousel = Carousel::new(4);
        carousel.retreat();
        assert_eq!(carousel.current(), Some(3));
    }

    #[test]
    fn test_advance_wraps_to_first() {
        let mut carousel = Carousel::new(3);
        carousel.advance();
        carousel.advance();
        carousel.advance();
        assert_eq!(carousel.current(), Some(0));
    }

    #[test]
    fn test_controls_need_more_than_one_slide() {
        assert!(!Carousel::new(0).shows_controls());
        assert!(!Carousel::new(1).shows_controls());
        assert!(Carousel::new(2).shows_controls());
    }

    #[test]
    fn test_empty_carousel_has_no_slide_and_ignores_navigation() {
        let mut carousel = Carousel::new(0);
        carousel.advance();
        carousel.retreat();
        assert_eq!(carousel.current(), None);
        assert!(!carousel.autoplays());
    }

    #[test]
    fn test_shrinking_collection_resets_out_of_range_index() {
        let mut carousel = Carousel::new(5);
        carousel.retreat();
        assert_eq!(carousel.current(), Some(4));

        carousel.set_len(2);
        assert_eq!(carousel.current(), Some(0));

        carousel.advance();
        carousel.set_len(3);
        assert_eq!(carousel.current(), Some(1));
    }
}
