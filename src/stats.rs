use std::ops::Add;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    num_attempts: usize,
    num_accepts: usize,
    num_overlaps: usize,
    num_errors: usize, // non-finite deltas and engine errors
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&mut self) {
        self.num_attempts += 1;
    }

    pub fn record_accept(&mut self) {
        self.num_accepts += 1;
    }

    pub fn record_overlap(&mut self) {
        self.num_overlaps += 1;
    }

    pub fn record_error(&mut self) {
        self.num_errors += 1;
    }

    pub fn num_attempts(&self) -> usize {
        self.num_attempts
    }

    pub fn num_accepts(&self) -> usize {
        self.num_accepts
    }

    pub fn num_overlaps(&self) -> usize {
        self.num_overlaps
    }

    pub fn num_errors(&self) -> usize {
        self.num_errors
    }

    pub fn acceptance_ratio(&self) -> f64 {
        if self.num_attempts == 0 {
            return 0.0;
        }
        self.num_accepts as f64 / self.num_attempts as f64
    }
}

impl Add for RunStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            num_attempts: self.num_attempts + other.num_attempts,
            num_accepts: self.num_accepts + other.num_accepts,
            num_overlaps: self.num_overlaps + other.num_overlaps,
            num_errors: self.num_errors + other.num_errors,
        }
    }
}
