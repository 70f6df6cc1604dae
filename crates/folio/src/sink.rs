//! Render sinks owned by the binary: files on disk and framed stdout.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use folio_core::{ContentRegion, RenderSink};
use tracing::{debug, warn};

/// File name holding the content of `target`: the region when the host
/// declares one, the host id otherwise.
pub fn file_name(target: &ContentRegion) -> String {
    let stem = target.region.as_deref().unwrap_or(target.host.as_str());
    let safe: String = stem
        .chars()
        .map(|c| if matches!(c, '/' | '\\') || c.is_control() { '_' } else { c })
        .collect();
    format!("{safe}.html")
}

/// Comment line announcing a fragment on stdout.
pub fn frame(target: &ContentRegion) -> String {
    format!("<!-- folio:{} -->", target.region.as_deref().unwrap_or(target.host.as_str()))
}

// ── FileSink ─────────────────────────────────────────────────────────

/// One `<region>.html` per region, replaced atomically on every render.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Create the output directory if needed.
    pub fn create(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, target: &ContentRegion) -> PathBuf {
        self.dir.join(file_name(target))
    }

    /// Replace the content of `target`, surfacing any IO failure.
    pub(crate) fn write(&self, target: &ContentRegion, html: &str) -> io::Result<PathBuf> {
        let path = self.path_for(target);
        let tmp = self.dir.join(format!(".{}.tmp", file_name(target)));
        write_then_rename(&tmp, &path, html)?;
        Ok(path)
    }
}

fn write_then_rename(tmp: &Path, path: &Path, html: &str) -> io::Result<()> {
    let written = fs::File::create(tmp).and_then(|mut file| {
        file.write_all(html.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()
    });
    let result = written.and_then(|()| fs::rename(tmp, path));
    if result.is_err() {
        // The write error is reported; cleanup is best effort.
        let _ = fs::remove_file(tmp);
    }
    result
}

impl RenderSink for FileSink {
    fn render(&self, target: &ContentRegion, html: &str) {
        match self.write(target, html) {
            Ok(path) => debug!(region = %target, path = %path.display(), "fragment written"),
            Err(e) => warn!(region = %target, error = %e, "failed to write fragment"),
        }
    }
}

// ── StdoutSink ───────────────────────────────────────────────────────

/// Streams every render to stdout, framed by a region comment.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl RenderSink for StdoutSink {
    fn render(&self, target: &ContentRegion, html: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{}\n{html}", frame(target)).and_then(|()| out.flush()) {
            warn!(region = %target, error = %e, "failed to write fragment");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use folio_core::HostId;

    use super::*;

    fn region(host: &str, region: Option<&str>) -> ContentRegion {
        ContentRegion {
            host: HostId::new(host),
            region: region.map(str::to_owned),
        }
    }

    #[test]
    fn file_name_prefers_region() {
        assert_eq!(file_name(&region("github-widget", None)), "github-widget.html");
        assert_eq!(
            file_name(&region("weather-widget", Some("weather-content"))),
            "weather-content.html"
        );
        assert_eq!(file_name(&region("../etc", None)), ".._etc.html");
    }

    #[test]
    fn file_sink_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::create(dir.path().join("site")).unwrap();
        let target = region("weather-widget", None);

        sink.render(&target, "<p>Loading weather…</p>");
        sink.render(&target, "<p>Rain</p>");

        let written = fs::read_to_string(sink.path_for(&target)).unwrap();
        assert_eq!(written, "<p>Rain</p>\n");
        let leftovers: Vec<_> = fs::read_dir(dir.path().join("site"))
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn failed_write_reports_error_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::create(dir.path()).unwrap();
        let target = region("github-widget", None);
        // A directory where the fragment should go makes the rename fail.
        fs::create_dir(sink.path_for(&target)).unwrap();

        let err = sink.write(&target, "<p>GitHub</p>").unwrap_err();
        assert_ne!(err.kind(), io::ErrorKind::NotFound);
        assert!(!dir.path().join(".github-widget.html.tmp").exists());
    }

    #[test]
    fn frame_names_the_region() {
        assert_eq!(
            frame(&region("weather-widget", Some("weather-content"))),
            "<!-- folio:weather-content -->"
        );
    }
}
