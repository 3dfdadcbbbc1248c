/// Backdrop timer: one periodic task per mounted page.
///
/// Every period the task advances its backdrop, samples the gradient and hands
/// a [`Frame`] to the render loop. The timer is a scoped resource: dropping a
/// [`BackdropTimer`] aborts the task, so no callback outlives its page.
///
/// Frames go through a bounded channel. When the render loop falls behind the
/// frame for that tick is dropped; the animation itself keeps advancing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

use crate::backdrop::Backdrop;
use crate::palette::GradientColors;
use crate::site::Page;

/// Capacity of the frame channel shared by all mounted pages.
pub const FRAME_QUEUE: usize = 16;

/// Create the channel every [`BackdropTimer`] sends into.
pub fn frame_channel() -> (mpsc::Sender<Frame>, mpsc::Receiver<Frame>) {
    mpsc::channel(FRAME_QUEUE)
}

/// One sampled background, produced once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub page: Page,
    /// Ticks since the page mounted, starting at 1.
    pub tick: u64,
    pub colors: GradientColors,
}

/// Handle to a running backdrop timer. Cancels the timer on drop.
#[derive(Debug)]
pub struct BackdropTimer {
    page: Page,
    task: JoinHandle<()>,
    ticks: Arc<AtomicU64>,
}

impl BackdropTimer {
    /// Spawn the periodic task. The first tick fires one `period` after start.
    pub fn start<B>(
        page: Page,
        mut backdrop: B,
        period: Duration,
        frames: mpsc::Sender<Frame>,
    ) -> Self
    where
        B: Backdrop + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);
        let first_tick = Instant::now() + period;

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(first_tick, period);
            // A stalled sink should not cause a burst of catch-up ticks
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if let Some(direction) = backdrop.tick() {
                    log::debug!("{page}: backdrop now {direction}");
                }
                let tick = counter.fetch_add(1, Ordering::Relaxed) + 1;
                let frame = Frame {
                    page,
                    tick,
                    colors: backdrop.current_colors(),
                };
                match frames.try_send(frame) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        log::trace!("{page}: render loop behind, skipped tick {tick}");
                    }
                    Err(TrySendError::Closed(_)) => {
                        log::debug!("{page}: frame receiver closed, stopping timer");
                        break;
                    }
                }
            }
        });

        log::debug!("{page}: backdrop timer started ({}ms period)", period.as_millis());
        Self { page, task, ticks }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// True once the task has stopped (receiver gone or cancelled).
    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for BackdropTimer {
    fn drop(&mut self) {
        self.task.abort();
        log::debug!("{}: backdrop timer cancelled after {} ticks", self.page, self.ticks());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backdrop::AnimatedBackdrop;
    use crate::config::BackdropConfig;
    use crate::palette::colors_for;
    use tokio::sync::mpsc::error::TryRecvError;
    use tokio::time::sleep;

    const PERIOD: Duration = Duration::from_millis(10);

    fn drain(rx: &mut mpsc::Receiver<Frame>) -> Vec<Frame> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(frame);
        }
        frames
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_on_cadence() {
        let (tx, mut rx) = frame_channel();
        let timer = BackdropTimer::start(Page::Info, AnimatedBackdrop::default(), PERIOD, tx);

        sleep(Duration::from_millis(55)).await;
        let frames = drain(&mut rx);
        assert_eq!(frames.len(), 5);
        assert_eq!(timer.ticks(), 5);
        assert_eq!(
            frames.iter().map(|f| f.tick).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        assert!(frames.iter().all(|f| f.page == Page::Info));
    }

    #[tokio::test(start_paused = true)]
    async fn frames_carry_advanced_colors() {
        let (tx, mut rx) = frame_channel();
        let _timer = BackdropTimer::start(Page::Home, AnimatedBackdrop::default(), PERIOD, tx);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.tick, 1);
        // One tick past the start value 51
        assert_eq!(first.colors, colors_for(52, &BackdropConfig::default()));
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_all_further_ticks() {
        let (tx, mut rx) = frame_channel();
        let timer = BackdropTimer::start(Page::Contact, AnimatedBackdrop::default(), PERIOD, tx);

        sleep(Duration::from_millis(35)).await;
        assert_eq!(drain(&mut rx).len(), 3);

        drop(timer);
        sleep(Duration::from_secs(1)).await;

        // Task gone, sender dropped with it: nothing queued, channel closed
        assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_receiver_is_gone() {
        let (tx, rx) = frame_channel();
        let timer = BackdropTimer::start(Page::Projects, AnimatedBackdrop::default(), PERIOD, tx);
        drop(rx);

        sleep(Duration::from_millis(25)).await;
        assert!(timer.is_finished());
        assert_eq!(timer.ticks(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_receiver_keeps_queue_bounded() {
        let (tx, mut rx) = frame_channel();
        let timer = BackdropTimer::start(Page::Info, AnimatedBackdrop::default(), PERIOD, tx);

        // Nobody reads for a minute
        sleep(Duration::from_millis(60_005)).await;
        assert_eq!(timer.ticks(), 6000);
        assert!(!timer.is_finished());

        let queued = drain(&mut rx);
        assert_eq!(queued.len(), FRAME_QUEUE);
        // Oldest frames are kept; later ticks were skipped
        assert_eq!(queued.first().map(|f| f.tick), Some(1));
        assert_eq!(queued.last().map(|f| f.tick), Some(FRAME_QUEUE as u64));

        // Once drained, frames flow again with the current tick
        let next = rx.recv().await.unwrap();
        assert_eq!(next.tick, 6001);
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_is_one_period_after_start() {
        let (tx, mut rx) = frame_channel();
        let started = Instant::now();
        let _timer = BackdropTimer::start(Page::Home, AnimatedBackdrop::default(), PERIOD, tx);
        // The task is first polled only after the clock has moved on
        tokio::time::advance(Duration::from_millis(4)).await;

        rx.recv().await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= PERIOD && elapsed < PERIOD + Duration::from_millis(2), "{elapsed:?}");
    }
}
