use crate::prelude::{PlaybackError, PlaybackResult, TickId, TickSource, TimerHandle};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Holds at most one live timer handle.
#[derive(Default)]
pub struct TimerSlot {
    handle: Option<Box<dyn TimerHandle>>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self { handle: None }
    }

    pub fn live_id(&self) -> Option<TickId> {
        self.handle.as_ref().map(|handle| handle.id())
    }

    /// Arms a new timer. Refuses while another handle is still live.
    pub fn arm(
        &mut self,
        source: &mut dyn TickSource,
        cadence: Duration,
        id: TickId,
    ) -> PlaybackResult<TickId> {
        if let Some(live) = self.live_id() {
            return Err(PlaybackError::TimerAlreadyLive(live));
        }
        self.handle = Some(source.arm(cadence, id));
        Ok(id)
    }

    /// Cancels and releases the live handle, returning its id.
    pub fn cancel(&mut self) -> Option<TickId> {
        self.handle.take().map(|mut handle| {
            handle.cancel();
            handle.id()
        })
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Repeating timer backed by a tokio task that forwards tick ids over a
/// channel to the session owner.
pub struct TokioTickSource {
    runtime: Handle,
    sender: UnboundedSender<TickId>,
}

impl TokioTickSource {
    pub fn new(runtime: Handle, sender: UnboundedSender<TickId>) -> Self {
        Self { runtime, sender }
    }

    /// Binds to the runtime of the calling context.
    pub fn current(sender: UnboundedSender<TickId>) -> PlaybackResult<Self> {
        let runtime =
            Handle::try_current().map_err(|err| PlaybackError::NoRuntime(err.to_string()))?;
        Ok(Self::new(runtime, sender))
    }
}

impl TickSource for TokioTickSource {
    fn arm(&mut self, cadence: Duration, id: TickId) -> Box<dyn TimerHandle> {
        let sender = self.sender.clone();
        let task = self.runtime.spawn(async move {
            // First tick one full cadence after arming.
            let mut interval = time::interval_at(Instant::now() + cadence, cadence);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if sender.send(id).is_err() {
                    break;
                }
            }
        });
        Box::new(TokioTimer { id, task })
    }
}

struct TokioTimer {
    id: TickId,
    task: JoinHandle<()>,
}

impl TimerHandle for TokioTimer {
    fn id(&self) -> TickId {
        self.id
    }

    fn cancel(&mut self) {
        self.task.abort();
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Tick source for hosts that own their own clock (e.g. a GUI subscription).
/// The host watches `PlaybackController::live_timer` and delivers ticks
/// itself while a timer is armed.
#[derive(Debug, Default)]
pub struct ExternalTickSource;

impl TickSource for ExternalTickSource {
    fn arm(&mut self, _cadence: Duration, id: TickId) -> Box<dyn TimerHandle> {
        Box::new(ExternalTimer { id })
    }
}

struct ExternalTimer {
    id: TickId,
}

impl TimerHandle for ExternalTimer {
    fn id(&self) -> TickId {
        self.id
    }

    fn cancel(&mut self) {}
}


#[cfg(test)]
mod tests {
    use super::testing::ManualTickSource;
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn slot_refuses_second_live_handle() {
        let mut source = ManualTickSource::default();
        let mut slot = TimerSlot::new();
        let cadence = Duration::from_millis(100);

        assert_eq!(slot.arm(&mut source, cadence, TickId(1)), Ok(TickId(1)));
        assert_eq!(
            slot.arm(&mut source, cadence, TickId(2)),
            Err(PlaybackError::TimerAlreadyLive(TickId(1)))
        );
        assert_eq!(source.live(), 1);

        assert_eq!(slot.cancel(), Some(TickId(1)));
        assert_eq!(source.live(), 0);
        assert_eq!(slot.cancel(), None);
    }

    #[test]
    fn dropping_slot_releases_handle() {
        let mut source = ManualTickSource::default();
        let mut slot = TimerSlot::new();
        slot.arm(&mut source, Duration::from_millis(10), TickId(7)).unwrap();
        drop(slot);
        assert_eq!(source.live(), 0);
    }

    #[test]
    fn tokio_source_requires_runtime() {
        let (sender, _receiver) = mpsc::unbounded_channel();
        assert!(matches!(
            TokioTickSource::current(sender),
            Err(PlaybackError::NoRuntime(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_source_ticks_at_cadence_until_cancelled() {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut source = TokioTickSource::current(sender).unwrap();
        let mut slot = TimerSlot::new();
        let cadence = Duration::from_millis(100);
        slot.arm(&mut source, cadence, TickId(3)).unwrap();

        let started = Instant::now();
        assert_eq!(receiver.recv().await, Some(TickId(3)));
        assert!(started.elapsed() >= cadence);
        assert_eq!(receiver.recv().await, Some(TickId(3)));

        slot.cancel();
        let next = time::timeout(Duration::from_secs(1), receiver.recv()).await;
        assert!(next.is_err());
    }
}
