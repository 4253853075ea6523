use crate::definitions::timer;

/// Represents a timer inside of the chip
/// infrastruture, it will count down to
/// zero from what ever number given at 60Hz.
///
/// The timer has no notion of time itself, it is
/// counted down by the [`Clock`](Clock) of the chip.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    value: u8,
}

impl Timer {
    /// Will create a new timer with the given value.
    pub fn new(value: u8) -> Self {
        Self { value }
    }

    /// Will set the value from which the timer shall count down from.
    pub fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    /// Will get the value that the counter is currently at.
    pub fn get_value(&self) -> u8 {
        self.value
    }

    /// Counts down by one, but never below zero.
    pub fn decrement(&mut self) {
        self.value = self.value.saturating_sub(1);
    }
}

/// Converts cpu cycles into timer ticks.
///
/// Every cycle adds the timer frequency to an accumulator, once that reaches the cpu
/// frequency a timer tick is due. So as long as the host executes the cycles at the
/// configured cpu frequency the timers run at exactly 60Hz of real time, no matter how
/// the cycles are spread out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    cpu_hertz: u32,
    accumulator: u32,
}

impl Clock {
    /// Creates a clock for a cpu running at the given frequency, a frequency of zero is
    /// treated as one.
    pub fn new(cpu_hertz: u32) -> Self {
        Self {
            cpu_hertz: cpu_hertz.max(1),
            accumulator: 0,
        }
    }

    /// Registers a single cpu cycle and returns how many timer ticks are due.
    ///
    /// # Example
    /// ```rust
    /// # use chip::timer::Clock;
    /// let mut clock = Clock::new(180);
    /// let ticks: u32 = (0..9).map(|_| clock.cycle()).sum();
    /// assert_eq!(ticks, 3);
    /// ```
    pub fn cycle(&mut self) -> u32 {
        self.accumulator += timer::HERTZ;
        let ticks = self.accumulator / self.cpu_hertz;
        self.accumulator %= self.cpu_hertz;
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = 0;
    }

    pub fn cpu_hertz(&self) -> u32 {
        self.cpu_hertz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let mut delay = Timer::new(2);
        delay.decrement();
        assert_eq!(delay.get_value(), 1);
        delay.decrement();
        delay.decrement();
        assert_eq!(delay.get_value(), 0);

        delay.set_value(timer::HERTZ as u8);
        assert_eq!(delay.get_value(), 60);
    }

    #[test]
    fn test_clock_single_tick_per_interval() {
        let mut clock = Clock::new(600);
        for _ in 0..5 {
            let ticks: Vec<u32> = (0..10).map(|_| clock.cycle()).collect();
            assert_eq!(ticks.iter().sum::<u32>(), 1);
            assert_eq!(ticks[9], 1);
        }
    }

    #[test]
    fn test_clock_uneven_ratio() {
        // 500 / 60 is not a whole number, the ticks still have to add up
        let mut clock = Clock::new(500);
        let ticks: u32 = (0..500).map(|_| clock.cycle()).sum();
        assert_eq!(ticks, 60);
    }

    #[test]
    fn test_clock_slow_cpu() {
        let mut clock = Clock::new(30);
        assert_eq!(clock.cycle(), 2);
        let mut clock = Clock::new(0);
        assert_eq!(clock.cpu_hertz(), 1);
        assert_eq!(clock.cycle(), 60);
    }

    #[test]
    fn test_clock_reset() {
        let mut clock = Clock::new(600);
        for _ in 0..9 {
            assert_eq!(clock.cycle(), 0);
        }
        clock.reset();
        assert_eq!(clock.cycle(), 0);
    }
}
