mod backdrop;
mod config;
mod oscillator;
mod palette;
mod sink;
mod site;
mod ticker;

use crate::config::{BackdropConfig, Config};
use crate::sink::{RenderSink, StyleSink};
use crate::site::Site;
use crate::ticker::frame_channel;

use tokio::time::sleep;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("folio-backdrop v{} starting...", env!("CARGO_PKG_VERSION"));

    let cfg = Config::load();
    let backdrop_cfg = BackdropConfig::default();

    let (frames_tx, mut frames_rx) = frame_channel();
    let mut site = Site::new(backdrop_cfg, frames_tx);
    for page in &cfg.pages {
        site.mount(*page);
    }
    if site.mounted_pages().is_empty() {
        log::warn!("No pages configured; nothing to animate");
        return;
    }

    let mut sink = StyleSink::new(
        std::io::stdout().lock(),
        cfg.render.mode,
        backdrop_cfg.transition,
        cfg.render.sample_every,
    );

    let deadline = cfg.run_for();
    let stop = async {
        match deadline {
            Some(d) => sleep(d).await,
            None => {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::error!("Failed to listen for Ctrl-C: {e}");
                    std::future::pending::<()>().await;
                }
            }
        }
    };
    tokio::pin!(stop);

    let mut write_errors = 0u32;
    loop {
        tokio::select! {
            _ = &mut stop => {
                log::info!("Shutting down");
                break;
            }
            frame = frames_rx.recv() => {
                let Some(frame) = frame else {
                    log::error!("Frame channel closed");
                    break;
                };
                match sink.paint(&frame) {
                    Ok(()) => write_errors = 0,
                    Err(e) => {
                        write_errors = write_errors.saturating_add(1);
                        if write_errors % 100 == 1 {
                            log::warn!("Render sink write failed ({write_errors} times): {e}");
                        }
                    }
                }
            }
        }
    }

    site.unmount_all();
}
