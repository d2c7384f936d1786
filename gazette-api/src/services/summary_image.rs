//! Countries summary image (`GET /countries/image`).
//!
//! Rendered after every successful refresh from the full registry and cached
//! on disk as a PNG.

use chrono::SecondsFormat;
use gazette_core::{CountryRecord, Timestamp};
use once_cell::sync::Lazy;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;
use usvg::{TreeParsing, TreeTextToPath};

use crate::config::SummaryConfig;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;
pub const TOP_COUNT: usize = 5;

const MARGIN: u32 = 50;
const NAME_MAX_CHARS: usize = 32;
const BAR_MAX_WIDTH: f64 = 600.0;

const BACKGROUND: &str = "#ffffff";
const INK: &str = "#111827";
const MUTED: &str = "#6b7280";
const BAR: &str = "#2563eb";
const RULE: &str = "#e5e7eb";

const FONT_FAMILY: &str = "DejaVu Sans";
static FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Font database for text-to-path conversion; holds only the bundled face.
static FONTS: Lazy<usvg::fontdb::Database> = Lazy::new(|| {
    let mut fonts = usvg::fontdb::Database::new();
    fonts.load_font_data(FONT_DATA.to_vec());
    fonts.set_sans_serif_family(FONT_FAMILY);
    fonts
});

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("failed to build summary image: {0}")]
    Svg(#[from] usvg::Error),

    #[error("failed to allocate the summary pixmap")]
    Pixmap,

    #[error("failed to encode summary image: {0}")]
    Encode(String),

    #[error("failed to access summary image: {0}")]
    Io(#[from] std::io::Error),

    #[error("summary rendering task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Figures shown on the image.
#[derive(Debug, Clone, PartialEq)]
pub struct CountriesSummary {
    pub total: usize,
    /// Up to [`TOP_COUNT`] `(name, estimated_gdp)` pairs, largest first
    pub top: Vec<(String, f64)>,
    pub last_refreshed_at: Timestamp,
}

impl CountriesSummary {
    /// Countries with a zero GDP estimate never rank. `fallback` is used as
    /// the refresh time when `records` is empty.
    pub fn from_records(records: &[CountryRecord], fallback: Timestamp) -> Self {
        let mut ranked: Vec<&CountryRecord> = records
            .iter()
            .filter(|record| record.estimated_gdp > 0.0)
            .collect();
        ranked.sort_by(|a, b| b.estimated_gdp.total_cmp(&a.estimated_gdp));

        Self {
            total: records.len(),
            top: ranked
                .into_iter()
                .take(TOP_COUNT)
                .map(|record| (record.name.clone(), record.estimated_gdp))
                .collect(),
            last_refreshed_at: records
                .iter()
                .map(|record| record.last_refreshed_at)
                .max()
                .unwrap_or(fallback),
        }
    }
}

/// `1234567.891` → `1,234,567.89`
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() <= NAME_MAX_CHARS {
        return name.to_string();
    }
    let mut short: String = name.chars().take(NAME_MAX_CHARS - 3).collect();
    short.push_str("...");
    short
}

/// Escape text for use inside an SVG element.
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn push_text(svg: &mut String, x: u32, y: u32, size: u32, fill: &str, text: &str) {
    let _ = writeln!(
        svg,
        r#"  <text x="{x}" y="{y}" font-size="{size}" fill="{fill}">{}</text>"#,
        escape_xml(text)
    );
}

fn push_rect(svg: &mut String, x: u32, y: u32, width: u32, height: u32, fill: &str) {
    let _ = writeln!(
        svg,
        r#"  <rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{fill}"/>"#
    );
}

/// Lay `summary` out as an SVG document.
pub fn summary_svg(summary: &CountriesSummary) -> String {
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="{FONT_FAMILY}">"#
    );
    push_rect(&mut svg, 0, 0, WIDTH, HEIGHT, BACKGROUND);

    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="70" font-size="32" text-anchor="middle" fill="{INK}">Countries Summary</text>"#,
        WIDTH / 2
    );
    push_rect(&mut svg, MARGIN, 90, WIDTH - 2 * MARGIN, 2, RULE);

    push_text(&mut svg, MARGIN, 130, 20, INK, &format!("Total countries: {}", summary.total));
    push_text(&mut svg, MARGIN, 170, 20, INK, "Top 5 countries by estimated GDP:");

    if summary.top.is_empty() {
        push_text(&mut svg, MARGIN + 20, 210, 18, MUTED, "No GDP estimates yet");
    }

    let largest = summary.top.first().map(|(_, gdp)| *gdp).unwrap_or(0.0);
    for (rank, (name, gdp)) in summary.top.iter().enumerate() {
        let y = 210 + rank as u32 * 55;
        let line = format!("{}. {} - {}", rank + 1, truncate_name(name), format_amount(*gdp));
        push_text(&mut svg, MARGIN + 20, y, 18, INK, &line);

        let ratio = if largest > 0.0 { gdp / largest } else { 0.0 };
        let bar_width = (BAR_MAX_WIDTH * ratio).round().max(1.0) as u32;
        push_rect(&mut svg, MARGIN + 20, y + 10, bar_width, 12, BAR);
    }

    push_text(
        &mut svg,
        MARGIN,
        HEIGHT - 50,
        16,
        MUTED,
        &format!(
            "Last refreshed: {}",
            summary
                .last_refreshed_at
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
    );
    svg.push_str("</svg>\n");
    svg
}

/// Render `summary` and encode it as PNG.
pub fn render_png(summary: &CountriesSummary) -> Result<Vec<u8>, SummaryError> {
    let options = usvg::Options {
        font_family: FONT_FAMILY.to_string(),
        ..usvg::Options::default()
    };
    let mut tree = usvg::Tree::from_str(&summary_svg(summary), &options)?;
    tree.convert_text(&FONTS);

    let mut pixmap = tiny_skia::Pixmap::new(WIDTH, HEIGHT).ok_or(SummaryError::Pixmap)?;
    resvg::Tree::from_usvg(&tree).render(tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| SummaryError::Encode(e.to_string()))
}

/// On-disk cache for the rendered summary.
#[derive(Debug, Clone)]
pub struct SummaryImage {
    path: PathBuf,
}

impl SummaryImage {
    pub fn new(config: &SummaryConfig) -> Self {
        Self {
            path: config.image_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render `summary` and replace the cached image.
    ///
    /// The PNG is written to a sibling temp file and renamed into place so
    /// readers never see a partial image.
    pub async fn write(&self, summary: CountriesSummary) -> Result<(), SummaryError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<(), SummaryError> {
            let bytes = render_png(&summary)?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let staging = path.with_extension("png.tmp");
            std::fs::write(&staging, &bytes)?;
            std::fs::rename(&staging, &path)?;
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "Summary image written");
            Ok(())
        })
        .await?
    }

    /// Cached PNG bytes, or `None` before the first successful refresh.
    pub async fn read(&self) -> Result<Option<Vec<u8>>, SummaryError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
