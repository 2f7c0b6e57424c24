//! Headless figure rendering for reports.
//!
//! Figures are drawn with `plotters` on its bitmap backend, so no display is
//! needed. Every figure is a grid of panels; the caller draws into the
//! panels and gets PNG bytes or their base64 encoding back, ready for an
//! `image/png` product item.
//!
//! Text is rendered with the bundled DejaVu Sans, registered under the
//! `sans-serif`, `serif` and `monospace` family names.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use once_cell::sync::Lazy;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{ErrorExt, Result, UtilsError};

pub use plotters;

/// Resolution used when figures are saved.
pub const DEFAULT_DPI: u32 = 150;
/// Fraction of a panel's size left blank between neighbouring panels.
pub const PANEL_SPACING: f64 = 0.3;

static FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Family names the bundled font answers to.
pub const FONT_FAMILIES: [&str; 3] = ["sans-serif", "serif", "monospace"];

static FONTS_REGISTERED: Lazy<bool> = Lazy::new(|| {
    FONT_FAMILIES
        .iter()
        .all(|family| register_font(family, FontStyle::Normal, FONT_BYTES).is_ok())
});

/// Make the bundled font available to plotters. Called before every
/// render; registration itself happens once.
pub fn ensure_fonts() -> Result<()> {
    if *FONTS_REGISTERED {
        Ok(())
    } else {
        Err(UtilsError::render("bundled font could not be loaded"))
    }
}

/// A drawable panel of a figure.
pub type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Result of a caller-supplied drawing routine.
pub type PanelResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Size and panel grid of a figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureLayout {
    pub nrows: usize,
    pub ncols: usize,
    /// Width and height in inches.
    pub size_in: (f64, f64),
    pub dpi: u32,
}

impl Default for FigureLayout {
    fn default() -> Self {
        Self::standard(1, 1)
    }
}

impl FigureLayout {
    /// The standard app figure: 10x6 in for a single panel, 12x8 in for a
    /// grid, at 150 dpi.
    pub fn standard(nrows: usize, ncols: usize) -> Self {
        let size_in = if nrows == 1 && ncols == 1 {
            (10.0, 6.0)
        } else {
            (12.0, 8.0)
        };
        Self {
            nrows,
            ncols,
            size_in,
            dpi: DEFAULT_DPI,
        }
    }

    pub fn with_size(mut self, width_in: f64, height_in: f64) -> Self {
        self.size_in = (width_in, height_in);
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn n_panels(&self) -> usize {
        self.nrows * self.ncols
    }

    /// Figure size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |inches: f64| (inches * f64::from(self.dpi)).round().max(1.0) as u32;
        (px(self.size_in.0), px(self.size_in.1))
    }

    fn validate(&self) -> Result<()> {
        if self.nrows == 0 || self.ncols == 0 {
            return Err(UtilsError::render(format!(
                "figure needs at least one panel, got {}x{}",
                self.nrows, self.ncols
            )));
        }
        if !(self.size_in.0 > 0.0 && self.size_in.1 > 0.0) || self.dpi == 0 {
            return Err(UtilsError::render(format!(
                "figure size must be positive, got {:?} in at {} dpi",
                self.size_in, self.dpi
            )));
        }
        Ok(())
    }
}

/// Encode bytes as standard, padded base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Render a figure to PNG bytes.
///
/// `draw` receives the panels in row-major order, already cleared to white
/// and inset by the panel spacing.
pub fn render_png<F>(layout: &FigureLayout, draw: F) -> Result<Vec<u8>>
where
    F: FnOnce(&[Panel<'_>]) -> PanelResult,
{
    let file = tempfile::Builder::new()
        .prefix("figure-")
        .suffix(".png")
        .tempfile()
        .to_storage_error("Failed to create temporary figure file")?;

    render_to_file(layout, file.path(), draw)?;
    fs::read(file.path()).to_storage_error("Failed to read rendered figure")
}

/// Render a figure and return its base64-encoded PNG.
pub fn save_plot_to_base64<F>(layout: &FigureLayout, draw: F) -> Result<String>
where
    F: FnOnce(&[Panel<'_>]) -> PanelResult,
{
    Ok(encode_base64(&render_png(layout, draw)?))
}

/// Render a figure to `path` (creating parent directories) and return its
/// base64-encoded PNG.
pub fn save_figure_with_base64<F>(
    layout: &FigureLayout,
    path: impl AsRef<Path>,
    draw: F,
) -> Result<String>
where
    F: FnOnce(&[Panel<'_>]) -> PanelResult,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .to_storage_error(format!("Failed to create directory {}", parent.display()))?;
    }

    render_to_file(layout, path, draw)?;
    let bytes = fs::read(path)
        .to_storage_error(format!("Failed to read rendered figure {}", path.display()))?;
    Ok(encode_base64(&bytes))
}

fn render_to_file<F>(layout: &FigureLayout, path: &Path, draw: F) -> Result<()>
where
    F: FnOnce(&[Panel<'_>]) -> PanelResult,
{
    layout.validate()?;
    ensure_fonts()?;
    let (width, height) = layout.pixel_size();
    debug!(path = %path.display(), width, height, panels = layout.n_panels(), "Rendering figure");

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).to_render_error("Failed to clear figure")?;

    let panel_w = f64::from(width) / layout.ncols as f64;
    let panel_h = f64::from(height) / layout.nrows as f64;
    let inset_x = (panel_w * PANEL_SPACING / 2.0).round() as u32;
    let inset_y = (panel_h * PANEL_SPACING / 2.0).round() as u32;

    let panels: Vec<Panel<'_>> = root
        .split_evenly((layout.nrows, layout.ncols))
        .into_iter()
        .map(|panel| panel.margin(inset_y, inset_y, inset_x, inset_x))
        .collect();

    draw(&panels).map_err(|e| UtilsError::render("Drawing routine failed").with_source(e))?;
    root.present().to_render_error(format!("Failed to write figure to {}", path.display()))?;
    Ok(())
}
