use crate::constants::{
    BASE_IMAGE_FILE, DEFAULT_SCALE, DEFAULT_SHIFT, LABEL_COLOR, LINE_COLOR, LINE_SIZE,
    MARKER_DEMAND_COLOR, MARKER_DEMAND_SIZE, MARKER_TRUCK_COLOR, MARKER_TRUCK_SIZE,
    SOLUTION_IMAGE_FILE,
};
use crate::error::Result;
use crate::solution::PlacementSolution;

use ab_glyph::{FontVec, PxScale};
use font_kit::{family_name::FamilyName, properties::Properties, source::SystemSource};
use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut},
    rect::Rect,
};
use std::path::{Path, PathBuf};

/// Map-to-pixel transform and label toggle
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub x_scale: f64,
    pub y_scale: f64,
    pub x_shift: f64,
    pub y_shift: f64,
    pub draw_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            x_scale: DEFAULT_SCALE,
            y_scale: DEFAULT_SCALE,
            x_shift: DEFAULT_SHIFT,
            y_shift: DEFAULT_SHIFT,
            draw_labels: true,
        }
    }
}

impl From<&crate::config::RenderConfig> for RenderOptions {
    fn from(config: &crate::config::RenderConfig) -> Self {
        Self {
            x_scale: config.x_scale,
            y_scale: config.y_scale,
            x_shift: config.x_shift,
            y_shift: config.y_shift,
            draw_labels: config.draw_labels,
        }
    }
}

/// Draws the solution over the base map of the data folder and writes the
/// annotated copy next to it. Returns the output path.
///
/// # Errors
/// Returns an error if the base image cannot be read or the output cannot
/// be written. A missing system font only disables labels.
pub fn render_solution(
    folder: &Path,
    solution: &PlacementSolution,
    opt: &RenderOptions,
) -> Result<PathBuf> {
    let base_path = folder.join(BASE_IMAGE_FILE);
    let out_path = folder.join(SOLUTION_IMAGE_FILE);

    let image = image::open(&base_path)?.to_rgb8();
    let mut renderer = Renderer::new(image, opt.draw_labels);

    for truck in &solution.trucks {
        let (x, y) = map_point(truck.x, truck.y, opt);
        for customer in &truck.customers {
            let (cx, cy) = map_point(customer.x, customer.y, opt);
            renderer.draw_line((cx, cy), (x, y), Rgb(LINE_COLOR));
            renderer.draw_square(cx, cy, MARKER_DEMAND_SIZE, Rgb(MARKER_DEMAND_COLOR));
        }
        renderer.draw_square(x, y, MARKER_TRUCK_SIZE, Rgb(MARKER_TRUCK_COLOR));
        renderer.draw_label(
            x + MARKER_TRUCK_SIZE as f32 + 2.0,
            y - MARKER_TRUCK_SIZE as f32,
            &truck.id.to_uppercase(),
        );
    }

    renderer.save(&out_path)?;
    log::info!("solution image written to {}", out_path.display());
    Ok(out_path)
}

fn map_point(x: f64, y: f64, opt: &RenderOptions) -> (f32, f32) {
    (
        (x * opt.x_scale + opt.x_shift) as f32,
        (y * opt.y_scale + opt.y_shift) as f32,
    )
}

/// Drawing context over the base image
struct Renderer {
    image: RgbImage,
    font: Option<FontVec>,
}

impl Renderer {
    fn new(image: RgbImage, draw_labels: bool) -> Self {
        let font = if draw_labels {
            let font = load_system_font();
            if font.is_none() {
                log::warn!("no usable system font found, truck labels disabled");
            }
            font
        } else {
            None
        };
        Self { image, font }
    }

    /// Filled square centered on (cx, cy) with the given half size
    fn draw_square(&mut self, cx: f32, cy: f32, half: i32, color: Rgb<u8>) {
        let rect = Rect::at(cx as i32 - half, cy as i32 - half)
            .of_size(2 * half as u32, 2 * half as u32);
        draw_filled_rect_mut(&mut self.image, rect, color);
    }

    /// Line segment, stroke width approximated with offset segments
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb<u8>) {
        let reach = LINE_SIZE / 2;
        for off in -reach..=reach {
            let o = off as f32;
            draw_line_segment_mut(
                &mut self.image,
                (from.0 + o, from.1),
                (to.0 + o, to.1),
                color,
            );
            draw_line_segment_mut(
                &mut self.image,
                (from.0, from.1 + o),
                (to.0, to.1 + o),
                color,
            );
        }
    }

    fn draw_label(&mut self, x: f32, y: f32, text: &str) {
        if let Some(font) = &self.font {
            draw_text_mut(
                &mut self.image,
                Rgb(LABEL_COLOR),
                x as i32,
                y as i32,
                PxScale::from(14.0),
                font,
                text,
            );
        }
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }
}

fn load_system_font() -> Option<FontVec> {
    let source = SystemSource::new();

    let font_families = vec![
        FamilyName::Title("Arial".to_string()),
        FamilyName::SansSerif,
        FamilyName::Title("Helvetica".to_string()),
        FamilyName::Title("DejaVu Sans".to_string()),
    ];

    for family in font_families {
        if let Ok(handle) = source.select_best_match(&[family], &Properties::new())
            && let Ok(font_kit_font) = handle.load()
            && let Some(font_bytes) = font_kit_font.copy_font_data()
            && let Ok(font) = FontVec::try_from_vec(font_bytes.to_vec())
        {
            return Some(font);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_point_applies_scale_and_shift() {
        let opt = RenderOptions {
            x_scale: 2.0,
            y_scale: 3.0,
            x_shift: 10.0,
            y_shift: -5.0,
            draw_labels: false,
        };
        let (x, y) = map_point(4.0, 2.0, &opt);
        assert_eq!(x, 18.0);
        assert_eq!(y, 1.0);
    }

    #[test]
    fn default_options_match_base_map_calibration() {
        let opt = RenderOptions::default();
        assert_eq!(opt.x_scale, 1.42);
        assert_eq!(opt.y_scale, opt.x_scale);
        assert_eq!(opt.x_shift, 0.0);
    }
}
