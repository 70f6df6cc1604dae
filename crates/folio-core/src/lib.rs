// folio-core: Widget lifecycle between folio-api and the page bootstrap.

pub mod config;
pub mod error;
pub mod format;
pub mod host;
pub mod html;
pub mod page;
pub mod weather_code;
pub mod widgets;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::WidgetsConfig;
pub use error::CoreError;
pub use format::{NO_DATA, format_clock, format_number};
pub use host::{ContentRegion, HostDescriptor, HostId, MemorySink, RenderSink};
pub use html::escape_html;
pub use page::{Page, WidgetKind, WidgetReport};
pub use weather_code::{WeatherKind, WeatherMeta, classify};
pub use widgets::profile::{ProfileView, ProfileWidget};
pub use widgets::weather::{WeatherReport, WeatherSettings, WeatherWidget};
pub use widgets::WidgetState;
