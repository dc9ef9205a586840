// Runs the purchase notification presenter on real timers and logs each
// notification until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use storefront::presenter::{Presenter, PresenterTiming, RandomSamples, TokioScheduler};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storefront::setup_logging();

    let scheduler = Arc::new(TokioScheduler::current().context("no tokio runtime")?);
    let presenter = Presenter::mount(
        Arc::clone(&scheduler),
        Arc::new(RandomSamples::default()),
        PresenterTiming::default(),
    );
    let mut feed = presenter.subscribe();

    loop {
        tokio::select! {
            changed = feed.changed() => {
                if changed.is_err() {
                    break;
                }
                match *feed.borrow_and_update() {
                    Some(record) => info!(record_id = record.id, "Notification: {record}"),
                    None => info!("Notification hidden"),
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl-C")?;
                info!("Shutting down presenter");
                break;
            }
        }
    }

    presenter.unmount();
    info!(active_timers = scheduler.active(), "Presenter unmounted");
    Ok(())
}
