// ── Widget host contract ──
//
// A host is a pre-existing page container: a stable identifier, a bag of
// string attributes the widget reads its configuration from, and a content
// region it renders into. Controllers never read back what they render;
// every write to a region replaces it wholesale.

use std::collections::BTreeMap;
use std::fmt;

use dashmap::DashMap;

/// Stable identifier of a widget host (the element id on the page).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostId(String);

impl HostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HostId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for HostId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Where a widget writes its markup: the host itself, or a designated
/// sub-region of it (e.g. a `.weather-content` block under a static header).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentRegion {
    pub host: HostId,
    pub region: Option<String>,
}

impl fmt::Display for ContentRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}/{region}", self.host),
            None => write!(f, "{}", self.host),
        }
    }
}

/// Read-only view of a host: identifier, attributes, content region.
#[derive(Debug, Clone)]
pub struct HostDescriptor {
    id: HostId,
    attributes: BTreeMap<String, String>,
    region: Option<String>,
}

impl HostDescriptor {
    pub fn new(id: impl Into<HostId>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
            region: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Render into a named sub-region instead of the host itself.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn id(&self) -> &HostId {
        &self.id
    }

    /// Attribute value with surrounding whitespace removed. Absent and
    /// blank attributes both read as `None`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn content_region(&self) -> ContentRegion {
        ContentRegion {
            host: self.id.clone(),
            region: self.region.clone(),
        }
    }
}

// ── Render sinks ─────────────────────────────────────────────────────

/// Output side of the host contract.
///
/// `render` replaces the whole region with `html`. Implementations must not
/// fail the caller: a sink that cannot write logs and drops the fragment.
pub trait RenderSink: Send + Sync {
    fn render(&self, target: &ContentRegion, html: &str);
}

#[derive(Debug, Clone, Default)]
struct Rendered {
    html: String,
    writes: usize,
}

/// In-memory sink keeping the last fragment written to each region.
#[derive(Debug, Default)]
pub struct MemorySink {
    regions: DashMap<ContentRegion, Rendered>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current content of `target`, if anything was ever rendered.
    pub fn last(&self, target: &ContentRegion) -> Option<String> {
        self.regions.get(target).map(|r| r.html.clone())
    }

    /// How many times `target` has been written.
    pub fn writes(&self, target: &ContentRegion) -> usize {
        self.regions.get(target).map_or(0, |r| r.writes)
    }

    /// Current content of every region, ordered by region.
    pub fn snapshot(&self) -> Vec<(ContentRegion, String)> {
        let mut all: Vec<_> = self
            .regions
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().html.clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }
}

impl RenderSink for MemorySink {
    fn render(&self, target: &ContentRegion, html: &str) {
        let mut entry = self.regions.entry(target.clone()).or_default();
        entry.html = html.to_owned();
        entry.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_are_trimmed_and_blank_is_absent() {
        let host = HostDescriptor::new("github-widget")
            .with_attribute("github-user", "  ada  ")
            .with_attribute("empty", "   ");

        assert_eq!(host.attribute("github-user"), Some("ada"));
        assert_eq!(host.attribute("empty"), None);
        assert_eq!(host.attribute("missing"), None);
    }

    #[test]
    fn content_region_defaults_to_the_host() {
        let plain = HostDescriptor::new("github-widget");
        assert_eq!(plain.content_region().to_string(), "github-widget");

        let nested = HostDescriptor::new("weather-widget").with_region("weather-content");
        assert_eq!(
            nested.content_region().to_string(),
            "weather-widget/weather-content"
        );
    }

    #[test]
    fn memory_sink_replaces_wholesale() {
        let sink = MemorySink::new();
        let target = HostDescriptor::new("w").content_region();

        assert_eq!(sink.last(&target), None);
        sink.render(&target, "<p>first</p>");
        sink.render(&target, "<p>second</p>");

        assert_eq!(sink.last(&target).as_deref(), Some("<p>second</p>"));
        assert_eq!(sink.writes(&target), 2);
        assert_eq!(sink.snapshot().len(), 1);
    }
}
