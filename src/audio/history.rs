use std::collections::VecDeque;

/// Fixed-capacity rolling window of the most recent band values.
///
/// Pushing beyond capacity evicts the oldest value, so the window always
/// holds at most `capacity` entries.
#[derive(Clone, Debug)]
pub struct SmoothingHistory {
    values: VecDeque<f32>,
    capacity: usize,
}

impl SmoothingHistory {
    /// A capacity of zero is raised to one (no smoothing).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Arithmetic mean of the current contents, 0.0 when empty.
    pub fn mean(&self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f32>() / self.values.len() as f32
    }

    /// Push `value` and return the mean including it.
    pub fn smooth(&mut self, value: f32) -> f32 {
        self.push(value);
        self.mean()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
