use std::{future::Future, time::Duration};

/// Spaces out requests to a rate limited service.
pub trait Pacer {
    /// Resolves once the next request may be sent.
    fn wait(&self) -> impl Future<Output = ()> + Send;
}

/// Sleeps for a fixed duration between requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedDelay(Duration);

impl FixedDelay {
    /// Spacing the Covalent nginx rate limiter tolerates.
    pub const DEFAULT: Duration = Duration::from_millis(500);

    pub const fn new(delay: Duration) -> Self {
        Self(delay)
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl Pacer for FixedDelay {
    async fn wait(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    async fn wait(&self) {}
}

impl<T: Pacer + Sync> Pacer for &T {
    fn wait(&self) -> impl Future<Output = ()> + Send {
        (**self).wait()
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_sleeps() {
        let pacer = FixedDelay::default();
        let start = Instant::now();
        pacer.wait().await;
        pacer.wait().await;
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_does_not_sleep() {
        let start = Instant::now();
        FixedDelay::new(Duration::ZERO).wait().await;
        NoDelay.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
