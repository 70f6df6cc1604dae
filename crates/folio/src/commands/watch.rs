//! `folio watch`: keep widgets live until interrupted.

use std::sync::Arc;

use folio_core::{Page, RenderSink};
use tracing::{info, warn};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::sink::{FileSink, StdoutSink};

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = super::load(global)?;
    let widgets = super::widgets_config(&config, global)?;
    let hosts = super::select_hosts(&config, &args.hosts, global)?;

    let sink: Arc<dyn RenderSink> = match args.out {
        Some(dir) => Arc::new(FileSink::create(dir)?),
        None => Arc::new(StdoutSink),
    };
    let page = Page::from_config(&widgets, sink)?;

    let reports = page.init_all(&hosts).await;
    let failed = reports.iter().filter(|r| r.is_failure()).count();
    if failed > 0 {
        warn!(failed, total = reports.len(), "some widgets failed their first cycle");
    }
    info!(
        timers = page.weather().active_timers(),
        every_secs = widgets.refresh_interval.as_secs(),
        "watching; press Ctrl-C to stop"
    );

    let signal = tokio::signal::ctrl_c().await;
    page.shutdown().await;
    signal?;
    info!("stopped");
    Ok(())
}
