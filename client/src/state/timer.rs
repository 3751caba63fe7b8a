//! Rest countdown between sets, ticked once per second alongside the draft's
//! elapsed clock.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestTimer {
    remaining_secs: Option<u64>,
}

impl RestTimer {
    /// Start (or restart) a countdown. Zero seconds leaves the timer idle.
    pub fn start(&mut self, secs: u64) {
        self.remaining_secs = (secs > 0).then_some(secs);
    }

    #[must_use]
    pub fn remaining(&self) -> Option<u64> {
        self.remaining_secs
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.remaining_secs.is_some()
    }

    /// Count down one second. Returns `true` exactly once, on the tick that
    /// reaches zero.
    pub fn tick(&mut self) -> bool {
        match self.remaining_secs {
            Some(1) => {
                self.remaining_secs = None;
                true
            }
            Some(n) => {
                self.remaining_secs = Some(n - 1);
                false
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.remaining_secs = None;
    }
}

#[cfg(test)]
#[path = "timer_test.rs"]
mod tests;
