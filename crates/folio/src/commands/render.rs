//! `folio render`: one fetch cycle per host.

use std::io::Write;
use std::sync::Arc;

use folio_core::{MemorySink, Page, RenderSink};
use tracing::{debug, info, warn};

use crate::cli::{GlobalOpts, RenderArgs};
use crate::error::CliError;
use crate::sink::{FileSink, frame};

pub async fn handle(args: RenderArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = super::load(global)?;
    let widgets = super::widgets_config(&config, global)?;
    let hosts = super::select_hosts(&config, &args.hosts, global)?;

    let sink = Arc::new(MemorySink::new());
    let page = Page::from_config(&widgets, Arc::clone(&sink) as Arc<dyn RenderSink>)?;
    let reports = page.init_all(&hosts).await;
    // One-shot: refresh timers scheduled by the weather widget are not wanted.
    page.shutdown().await;

    for report in &reports {
        match &report.error {
            Some(reason) => {
                warn!(host = %report.host, kind = %report.kind, %reason, "widget failed");
            }
            None => {
                info!(host = %report.host, kind = %report.kind, state = report.state, "widget rendered");
            }
        }
    }

    let fragments = sink.snapshot();
    match args.out {
        Some(dir) => {
            let files = FileSink::create(dir)?;
            for (target, html) in &fragments {
                let path = files.write(target, html)?;
                debug!(region = %target, path = %path.display(), "fragment written");
            }
        }
        None => {
            let mut out = std::io::stdout().lock();
            for (target, html) in &fragments {
                writeln!(out, "{}\n{html}", frame(target))?;
            }
            out.flush()?;
        }
    }
    Ok(())
}
