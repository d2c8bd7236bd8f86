//! Waiting for navigation to land.
//!
//! The confirmer drives frames itself through [`FrameDriver`], so nothing
//! else mutates the stack while it observes.

use crate::error::PresentError;
use crate::navigation::view::{ViewInstance, ViewKind, ViewToken};
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

/// Something that can advance navigation by one frame and expose the
/// current view.
pub trait FrameDriver {
    fn tick(&mut self) -> Result<(), PresentError>;
    fn current_view(&self) -> Option<&ViewInstance>;
}

#[derive(Debug, Clone, Copy)]
pub struct ArrivalConfirmer {
    timeout: Duration,
    frame_interval: Duration,
}

impl ArrivalConfirmer {
    pub fn new(timeout: Duration, frame_interval: Duration) -> Self {
        Self {
            timeout,
            frame_interval: frame_interval.max(Duration::from_micros(1)),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Waits until a view of `expected` kind is current and was pushed after
    /// `previous`.
    ///
    /// Tokens only grow, so any instance already issued when `previous` was
    /// taken can never satisfy the wait, even if an exit exposes it again.
    pub async fn await_arrival<D: FrameDriver>(
        &self,
        driver: &mut D,
        expected: ViewKind,
        previous: Option<ViewToken>,
    ) -> Result<ViewInstance, PresentError> {
        let arrived = |d: &D| {
            d.current_view().is_some_and(|v| {
                v.kind() == expected && previous.is_none_or(|p| v.token > p)
            })
        };

        if !self.poll(driver, arrived).await? {
            log::warn!(
                "CONFIRM: No new {} after {:?} (baseline {:?})",
                expected,
                self.timeout,
                previous
            );
            return Err(PresentError::ArrivalTimeout {
                expected,
                waited: self.timeout,
            });
        }

        match driver.current_view() {
            Some(view) => {
                log::info!("CONFIRM: Arrived at {} {}", view.kind(), view.token);
                Ok(view.clone())
            }
            None => Err(PresentError::StackUnderflow),
        }
    }

    /// Waits until `predicate` holds for the driver.
    pub async fn wait_until<D, F>(
        &self,
        driver: &mut D,
        description: &str,
        predicate: F,
    ) -> Result<(), PresentError>
    where
        D: FrameDriver,
        F: FnMut(&D) -> bool,
    {
        if self.poll(driver, predicate).await? {
            log::debug!("CONFIRM: Condition met: {}", description);
            Ok(())
        } else {
            log::warn!("CONFIRM: Gave up waiting for {}", description);
            Err(PresentError::ConditionTimeout {
                description: description.to_string(),
                waited: self.timeout,
            })
        }
    }

    /// Checks `ready` once, then once after every frame until it holds or
    /// the budget runs out. Returns `false` on timeout.
    async fn poll<D, F>(&self, driver: &mut D, mut ready: F) -> Result<bool, PresentError>
    where
        D: FrameDriver,
        F: FnMut(&D) -> bool,
    {
        if ready(driver) {
            return Ok(true);
        }

        let mut interval = time::interval(self.frame_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let ticking = async {
            loop {
                interval.tick().await;
                driver.tick()?;
                if ready(driver) {
                    return Ok::<(), PresentError>(());
                }
            }
        };

        match time::timeout(self.timeout, ticking).await {
            Ok(result) => result.map(|()| true),
            Err(_) => Ok(false),
        }
    }
}
