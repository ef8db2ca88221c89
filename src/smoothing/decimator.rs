/// Fires on every `interval`-th tick (the `interval`-th, `2 * interval`-th, ...).
#[derive(Clone, Debug)]
pub struct Decimator {
    interval: u32,
    counter: u32,
}

impl Decimator {
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            counter: 0,
        }
    }

    /// Advance one tick and report whether this tick is due.
    pub fn tick(&mut self) -> bool {
        self.counter = (self.counter + 1) % self.interval;
        self.counter == 0
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_every_nth_tick() {
        let mut decimator = Decimator::new(5);
        let fired: Vec<usize> = (1..=20).filter(|_| decimator.tick()).collect();
        assert_eq!(fired, vec![5, 10, 15, 20]);
    }

    #[test]
    fn interval_one_fires_always() {
        let mut decimator = Decimator::new(1);
        assert!((0..10).all(|_| decimator.tick()));
    }

    #[test]
    fn reset_restarts_cadence() {
        let mut decimator = Decimator::new(3);
        decimator.tick();
        decimator.tick();
        decimator.reset();
        assert!(!decimator.tick());
        assert!(!decimator.tick());
        assert!(decimator.tick());
    }
}
