//! Progress reporting for long-running loads.
//!
//! Sinks only observe; nothing they do can feed back into the computation.

use log::info;

/// Receives "step `done` of `total`" notifications
pub trait ProgressSink {
    fn report(&mut self, done: usize, total: usize);
}

/// Discards every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _done: usize, _total: usize) {}
}

/// Forwards at most one report per `every` steps to a closure.
/// The final step is always forwarded.
pub struct RateLimited<F: FnMut(usize, usize)> {
    every: usize,
    last: Option<usize>,
    callback: F,
}

impl<F: FnMut(usize, usize)> RateLimited<F> {
    pub fn new(every: usize, callback: F) -> Self {
        Self {
            every: every.max(1),
            last: None,
            callback,
        }
    }
}

impl<F: FnMut(usize, usize)> ProgressSink for RateLimited<F> {
    fn report(&mut self, done: usize, total: usize) {
        let due = match self.last {
            None => true,
            Some(last) => done.saturating_sub(last) >= self.every,
        };

        if due || done == total {
            if self.last == Some(done) {
                return;
            }
            self.last = Some(done);
            (self.callback)(done, total);
        }
    }
}

/// Rate-limited sink that writes to the `log` facade
pub struct LogProgress {
    inner: RateLimited<fn(usize, usize)>,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self {
            inner: RateLimited::new(every, log_step),
        }
    }
}

fn log_step(done: usize, total: usize) {
    let percent = if total > 0 {
        (done as f64 / total as f64) * 100.0
    } else {
        100.0
    };
    info!("Resolved node {} of {} ({:.1}%)", done, total, percent);
}

impl ProgressSink for LogProgress {
    fn report(&mut self, done: usize, total: usize) {
        self.inner.report(done, total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_forwards_every_n_and_last() {
        let mut seen = Vec::new();
        {
            let mut sink = RateLimited::new(3, |done, _| seen.push(done));
            for done in 1..=8 {
                sink.report(done, 8);
            }
        }

        assert_eq!(seen, vec![1, 4, 7, 8]);
    }

    #[test]
    fn test_rate_limited_does_not_repeat_final() {
        let mut seen = Vec::new();
        {
            let mut sink = RateLimited::new(1, |done, _| seen.push(done));
            sink.report(2, 2);
            sink.report(2, 2);
        }

        assert_eq!(seen, vec![2]);
    }
}
