use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;

/// Values that can be linearly interpolated by a tween.
pub trait Tweenable: Copy {
    /// Value at fraction `t` between `self` (t = 0) and `to` (t = 1).
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Tweenable for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

/// Identifier for a scheduled tween. Ids are never reused by a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TweenId(pub u64);

/// Everything needed to schedule one interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec<P> {
    pub from: P,
    pub to: P,
    pub duration: Duration,
    /// Time after scheduling before the tween starts.
    pub delay: Duration,
    pub easing: Easing,
}

impl<P> TweenSpec<P> {
    pub fn new(from: P, to: P, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            delay: Duration::ZERO,
            easing: Easing::Linear,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// Progress notifications produced by [`AnimationDriver::advance`].
///
/// These stand in for start/update/complete callbacks: the host hands them to
/// whoever owns the animated objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenEvent<P> {
    /// The delay elapsed; the tween is now running.
    Started { id: TweenId },
    /// New interpolated value for this frame.
    Updated { id: TweenId, value: P },
    /// The tween reached its target. No further events follow for this id.
    Completed { id: TweenId, value: P },
}

impl<P> TweenEvent<P> {
    pub fn id(&self) -> TweenId {
        match self {
            TweenEvent::Started { id }
            | TweenEvent::Updated { id, .. }
            | TweenEvent::Completed { id, .. } => *id,
        }
    }
}

/// Errors from scheduling a tween.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TweenError {
    #[error("invalid animation parameters: {reason}")]
    InvalidAnimationParameters { reason: &'static str },
}

/// Capability for running timed interpolations.
///
/// `advance` must be called once per frame by the host.
pub trait AnimationDriver<P: Tweenable> {
    /// Schedule a tween. Fails without side effects on invalid parameters.
    fn schedule(&mut self, spec: TweenSpec<P>) -> Result<TweenId, TweenError>;

    /// Move the clock forward by `dt` and return the events that fell due.
    fn advance(&mut self, dt: Duration) -> Vec<TweenEvent<P>>;

    /// Drop a tween before it completes. Returns false if it was not live.
    fn cancel(&mut self, id: TweenId) -> bool;

    /// Number of tweens scheduled and not yet completed.
    fn active_count(&self) -> usize;
}

#[derive(Debug, Clone)]
struct Tween<P> {
    id: TweenId,
    spec: TweenSpec<P>,
    starts_at: Duration,
    started: bool,
}

/// Default [`AnimationDriver`]: an ordered list of tweens on a virtual clock.
#[derive(Debug, Clone)]
pub struct TweenDriver<P> {
    clock: Duration,
    next_id: u64,
    tweens: Vec<Tween<P>>,
}

impl<P> Default for TweenDriver<P> {
    fn default() -> Self {
        Self {
            clock: Duration::ZERO,
            next_id: 0,
            tweens: Vec::new(),
        }
    }
}

impl<P: Tweenable> TweenDriver<P> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: Tweenable> AnimationDriver<P> for TweenDriver<P> {
    fn schedule(&mut self, spec: TweenSpec<P>) -> Result<TweenId, TweenError> {
        if spec.duration.is_zero() {
            return Err(TweenError::InvalidAnimationParameters {
                reason: "duration must be positive",
            });
        }

        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.push(Tween {
            id,
            starts_at: self.clock + spec.delay,
            spec,
            started: false,
        });
        Ok(id)
    }

    fn advance(&mut self, dt: Duration) -> Vec<TweenEvent<P>> {
        self.clock += dt;
        let now = self.clock;
        let mut events = Vec::new();

        self.tweens.retain_mut(|tween| {
            if now < tween.starts_at {
                return true;
            }
            if !tween.started {
                tween.started = true;
                events.push(TweenEvent::Started { id: tween.id });
            }

            let elapsed = (now - tween.starts_at).as_secs_f32();
            let progress = (elapsed / tween.spec.duration.as_secs_f32()).min(1.0);
            let value = tween
                .spec
                .from
                .lerp(tween.spec.to, tween.spec.easing.apply(progress));
            events.push(TweenEvent::Updated { id: tween.id, value });

            if progress >= 1.0 {
                events.push(TweenEvent::Completed {
                    id: tween.id,
                    value: tween.spec.to,
                });
                return false;
            }
            true
        });

        tracing::trace!(
            events = events.len(),
            live = self.tweens.len(),
            "tween driver advanced"
        );
        events
    }

    fn cancel(&mut self, id: TweenId) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|t| t.id != id);
        before != self.tweens.len()
    }

    fn active_count(&self) -> usize {
        self.tweens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut driver = TweenDriver::<f32>::new();
        let err = driver.schedule(TweenSpec::new(0.0, 1.0, Duration::ZERO));
        assert!(matches!(
            err,
            Err(TweenError::InvalidAnimationParameters { .. })
        ));
        assert_eq!(driver.active_count(), 0);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut driver = TweenDriver::<f32>::new();
        let a = driver.schedule(TweenSpec::new(0.0, 1.0, ms(100))).unwrap();
        let b = driver.schedule(TweenSpec::new(0.0, 1.0, ms(100))).unwrap();
        assert!(b > a);
    }

    #[test]
    fn lifecycle_start_update_complete() {
        let mut driver = TweenDriver::<f32>::new();
        let id = driver.schedule(TweenSpec::new(0.0, 10.0, ms(200))).unwrap();

        let events = driver.advance(ms(100));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], TweenEvent::Started { id });
        match events[1] {
            TweenEvent::Updated { value, .. } => assert!((value - 5.0).abs() < 1e-4),
            other => panic!("unexpected event {other:?}"),
        }

        let events = driver.advance(ms(100));
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], TweenEvent::Updated { .. }));
        assert_eq!(events[1], TweenEvent::Completed { id, value: 10.0 });
        assert_eq!(driver.active_count(), 0);

        assert!(driver.advance(ms(100)).is_empty());
    }

    #[test]
    fn delay_postpones_start() {
        let mut driver = TweenDriver::<f32>::new();
        let id = driver
            .schedule(TweenSpec::new(0.0, 1.0, ms(100)).with_delay(ms(50)))
            .unwrap();

        assert!(driver.advance(ms(40)).is_empty());
        let events = driver.advance(ms(20));
        assert_eq!(events[0], TweenEvent::Started { id });
        match events[1] {
            TweenEvent::Updated { value, .. } => assert!((value - 0.1).abs() < 1e-4),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn overshooting_frame_completes_at_target() {
        let mut driver = TweenDriver::<f32>::new();
        driver.schedule(TweenSpec::new(2.0, 4.0, ms(100))).unwrap();
        let events = driver.advance(ms(1000));
        assert_eq!(events.len(), 3);
        assert!(matches!(events[1], TweenEvent::Updated { value, .. } if value == 4.0));
        assert!(matches!(events[2], TweenEvent::Completed { value, .. } if value == 4.0));
    }

    #[test]
    fn same_frame_events_follow_schedule_order() {
        let mut driver = TweenDriver::<f32>::new();
        let first = driver.schedule(TweenSpec::new(0.0, 1.0, ms(10))).unwrap();
        let second = driver.schedule(TweenSpec::new(0.0, 1.0, ms(10))).unwrap();

        let completed: Vec<TweenId> = driver
            .advance(ms(10))
            .into_iter()
            .filter_map(|e| match e {
                TweenEvent::Completed { id, .. } => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(completed, vec![first, second]);
    }

    #[test]
    fn delay_counts_from_schedule_time() {
        let mut driver = TweenDriver::<f32>::new();
        driver.advance(ms(500));
        driver
            .schedule(TweenSpec::new(0.0, 1.0, ms(100)).with_delay(ms(50)))
            .unwrap();
        assert!(driver.advance(ms(49)).is_empty());
        assert!(!driver.advance(ms(1)).is_empty());
    }

    #[test]
    fn cancel_removes_live_tween() {
        let mut driver = TweenDriver::<f32>::new();
        let id = driver.schedule(TweenSpec::new(0.0, 1.0, ms(100))).unwrap();
        assert!(driver.cancel(id));
        assert!(!driver.cancel(id));
        assert!(driver.advance(ms(200)).is_empty());
    }

    #[test]
    fn easing_shapes_intermediate_values() {
        let mut driver = TweenDriver::<f32>::new();
        driver
            .schedule(TweenSpec::new(0.0, 1.0, ms(100)).with_easing(Easing::EaseIn))
            .unwrap();
        let events = driver.advance(ms(50));
        match events[1] {
            TweenEvent::Updated { value, .. } => assert!((value - 0.25).abs() < 1e-4),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
