//! Renderer settings, loadable from TOML
//!
//! ```toml
//! page_size = "letter"
//! margin = 54.0
//! placeholder = "-"
//!
//! [diagram]
//! origin_x = 100.0
//! width = 400.0
//! height = 300.0
//!
//! [footer]
//! template = "{page} / {pages}"
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub page_size: PageSize,
    /// Margin on all four sides, in points
    #[serde(default = "default_margin")]
    pub margin: f32,
    /// Shown wherever a value is absent
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default)]
    pub diagram: DiagramConfig,
    #[serde(default)]
    pub footer: FooterConfig,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            margin: default_margin(),
            placeholder: default_placeholder(),
            diagram: DiagramConfig::default(),
            footer: FooterConfig::default(),
            metadata: DocumentMetadata::default(),
        }
    }
}

impl RenderConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read render config: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("Failed to parse render config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let (width, height) = self.page_size.dimensions();
        if self.margin < 0.0 || self.margin * 2.0 >= width.min(height) {
            anyhow::bail!("margin {} does not fit a {}x{} page", self.margin, width, height);
        }
        if self.diagram.width <= 0.0 || self.diagram.height <= 0.0 {
            anyhow::bail!("diagram dimensions must be positive");
        }
        if self.diagram.origin_x + self.diagram.width > width {
            anyhow::bail!("diagram does not fit the page width");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Width and height in points
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.0, 842.0),
            PageSize::Letter => (612.0, 792.0),
        }
    }
}

/// Fixed region the vehicle diagram is drawn into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramConfig {
    #[serde(default = "default_diagram_origin_x")]
    pub origin_x: f32,
    #[serde(default = "default_diagram_width")]
    pub width: f32,
    #[serde(default = "default_diagram_height")]
    pub height: f32,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            origin_x: default_diagram_origin_x(),
            width: default_diagram_width(),
            height: default_diagram_height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterConfig {
    /// `{page}` and `{pages}` are substituted
    #[serde(default = "default_footer_template")]
    pub template: String,
    #[serde(default = "default_footer_font_size")]
    pub font_size: f32,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            template: default_footer_template(),
            font_size: default_footer_font_size(),
        }
    }
}

impl FooterConfig {
    pub fn text(&self, page: usize, pages: usize) -> String {
        self.template
            .replace("{page}", &page.to_string())
            .replace("{pages}", &pages.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_author")]
    pub author: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: default_title(),
            author: default_author(),
        }
    }
}

fn default_margin() -> f32 {
    50.0
}

fn default_placeholder() -> String {
    "N/A".to_string()
}

fn default_diagram_origin_x() -> f32 {
    100.0
}

fn default_diagram_width() -> f32 {
    400.0
}

fn default_diagram_height() -> f32 {
    300.0
}

fn default_footer_template() -> String {
    "Page {page} of {pages}".to_string()
}

fn default_footer_font_size() -> f32 {
    10.0
}

fn default_title() -> String {
    "Incident Report".to_string()
}

fn default_author() -> String {
    "Digital Incident Report System".to_string()
}
