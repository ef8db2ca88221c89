use std::collections::VecDeque;

/// Fixed-capacity FIFO of per-tick values; pushing past capacity evicts the oldest.
#[derive(Clone, Debug)]
pub struct History {
    values: VecDeque<f32>,
    capacity: usize,
}

impl History {
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

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Arithmetic mean of every stored value, `None` when empty.
    pub fn mean(&self) -> Option<f32> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f32>() / self.values.len() as f32)
    }

    /// Up to `count` most recent values, oldest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = f32> + '_ {
        let skip = self.values.len().saturating_sub(count);
        self.values.iter().skip(skip).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.values.iter().copied()
    }
}

/// Mean and count of the strictly positive values in `values`.
pub fn positive_mean(values: impl Iterator<Item = f32>) -> (Option<f32>, usize) {
    let (sum, count) = values
        .filter(|v| *v > 0.0)
        .fold((0.0f32, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        (None, 0)
    } else {
        (Some(sum / count as f32), count)
    }
}
