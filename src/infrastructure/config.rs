use crate::application::live_view::LiveViewSettings;
use crate::application::render_surface::ValueRange;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ViewerConfig {
    pub listen: String,
    pub source: SourceSettings,
    pub view: ViewSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewSettings {
    pub refresh_interval_secs: u64,
    pub auto_update: bool,
    pub gutter_width_px: f64,
    pub y_range: [f64; 2],
    pub tracked_series: Vec<String>,
}

impl SourceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ViewSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn live_view_settings(&self) -> LiveViewSettings {
        LiveViewSettings {
            tracked_series: self.tracked_series.clone(),
            y_range: ValueRange::from(self.y_range),
            gutter_width_px: self.gutter_width_px,
            auto_update: self.auto_update,
        }
    }
}

pub fn load_viewer_config() -> anyhow::Result<ViewerConfig> {
    load_viewer_config_from("config/viewer")
}

/// Defaults, then the optional config file, then `POWER_VIEW__*` variables
/// (e.g. `POWER_VIEW__SOURCE__BASE_URL`).
pub fn load_viewer_config_from(path: &str) -> anyhow::Result<ViewerConfig> {
    let settings = config::Config::builder()
        .set_default("listen", "0.0.0.0:8080")?
        .set_default("source.base_url", "http://127.0.0.1:8000")?
        .set_default("source.timeout_secs", 10)?
        .set_default("view.refresh_interval_secs", 5)?
        .set_default("view.auto_update", true)?
        .set_default("view.gutter_width_px", 65.0)?
        .set_default("view.y_range", vec![-100.0, 1100.0])?
        .set_default("view.tracked_series", vec!["power", "by_minute", "solar", "load"])?
        .add_source(config::File::with_name(path).required(false))
        .add_source(config::Environment::with_prefix("POWER_VIEW").separator("__"))
        .build()?;

    let config: ViewerConfig = settings.try_deserialize()?;
    if !ValueRange::from(config.view.y_range).is_valid() {
        anyhow::bail!("view.y_range must be an increasing pair, got {:?}", config.view.y_range);
    }
    Ok(config)
}
