use crate::domain::ports::PresentationSurface;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const LOADING_MESSAGES: [&str; 5] = [
    "Initializing analysis...",
    "Processing cell measurements...",
    "Applying machine learning model...",
    "Calculating probabilities...",
    "Finalizing results...",
];

pub const PROGRESS_TICK: Duration = Duration::from_millis(40);
const PROGRESS_STEP: u32 = 2;
const TICKS_PER_MESSAGE: u32 = 10;

/// Progress and message shown after `tick` animation ticks.
pub fn animation_frame(tick: u32) -> (u8, &'static str) {
    let progress = tick.saturating_mul(PROGRESS_STEP).min(100) as u8;
    let index = ((tick / TICKS_PER_MESSAGE) as usize).min(LOADING_MESSAGES.len() - 1);
    (progress, LOADING_MESSAGES[index])
}

/// Drives the progress bar and loading text until both are complete.
/// The returned handle is owned by the controller and aborted on teardown.
pub fn spawn_loading_animation<S>(surface: Arc<S>) -> JoinHandle<()>
where
    S: PresentationSurface + ?Sized + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PROGRESS_TICK);
        ticker.tick().await;

        let (progress, message) = animation_frame(0);
        surface.update_loading(progress, message);

        let mut tick = 0;
        loop {
            ticker.tick().await;
            tick += 1;
            let (progress, message) = animation_frame(tick);
            surface.update_loading(progress, message);
            if progress >= 100 {
                break;
            }
        }
    })
}
