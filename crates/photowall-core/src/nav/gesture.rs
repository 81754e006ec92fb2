/// Default horizontal travel, in logical pixels, that counts as a swipe
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;

/// Recognized horizontal swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger moved left; show the next photo
    Next,
    /// Finger moved right; show the previous photo
    Prev,
}

/// Tracks one touch (or drag) gesture at a time
#[derive(Debug, Clone)]
pub struct SwipeDetector {
    threshold: f64,
    start_x: Option<f64>,
    last_x: Option<f64>,
}

impl SwipeDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start_x: None,
            last_x: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn start(&mut self, x: f64) {
        self.start_x = Some(x);
        self.last_x = None;
    }

    pub fn moved(&mut self, x: f64) {
        if self.start_x.is_some() {
            self.last_x = Some(x);
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.start_x.is_some()
    }

    /// Finish the gesture. A gesture without any move sample is a tap.
    pub fn end(&mut self) -> Option<Swipe> {
        let start = self.start_x.take()?;
        let end = self.last_x.take()?;
        let distance = start - end;

        if distance > self.threshold {
            Some(Swipe::Next)
        } else if distance < -self.threshold {
            Some(Swipe::Prev)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.start_x = None;
        self.last_x = None;
    }
}

impl Default for SwipeDetector {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gesture(start: f64, moves: &[f64]) -> Option<Swipe> {
        let mut detector = SwipeDetector::default();
        detector.start(start);
        for &x in moves {
            detector.moved(x);
        }
        detector.end()
    }

    #[test]
    fn test_threshold_is_exclusive() {
        assert_eq!(gesture(200.0, &[150.0]), None);
        assert_eq!(gesture(200.0, &[250.0]), None);
        assert_eq!(gesture(200.0, &[149.0]), Some(Swipe::Next));
        assert_eq!(gesture(200.0, &[251.0]), Some(Swipe::Prev));
    }

    #[test]
    fn test_last_sample_wins() {
        assert_eq!(gesture(200.0, &[100.0, 190.0]), None);
        assert_eq!(gesture(200.0, &[210.0, 120.0]), Some(Swipe::Next));
    }

    #[test]
    fn test_tap_is_not_a_swipe() {
        assert_eq!(gesture(200.0, &[]), None);
        assert_eq!(gesture(200.0, &[200.0]), None);
    }

    #[test]
    fn test_end_without_start() {
        let mut detector = SwipeDetector::new(10.0);
        detector.moved(0.0);
        assert_eq!(detector.end(), None);
        assert!(!detector.is_tracking());
    }

    #[test]
    fn test_gesture_state_resets() {
        let mut detector = SwipeDetector::default();
        detector.start(300.0);
        detector.moved(100.0);
        assert_eq!(detector.end(), Some(Swipe::Next));
        // a following tap must not reuse the old move sample
        detector.start(300.0);
        assert_eq!(detector.end(), None);
    }
}
