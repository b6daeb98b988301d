//! Synthetic training image generation
//!
//! Renders a serial number string into randomized raster images: jittered
//! dimensions, varied background/text colors, varied font face, size and
//! weight, offset placement, and occasional line noise. The variation exists
//! so downstream recognition is exercised against diverse inputs instead of
//! one canonical rendering.
//!
//! The random source is injectable: [`ImageSynthesizer::with_seed`] gives
//! fully reproducible output for tests.

use std::io;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use chrono::Local;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::SynthConfig;
use crate::error::{Error, Result};

const BACKGROUND_COLORS: [Rgb<u8>; 4] = [
    Rgb([255, 255, 255]), // white
    Rgb([211, 211, 211]), // light gray
    Rgb([245, 245, 245]), // white smoke
    Rgb([240, 248, 255]), // alice blue
];

const TEXT_COLORS: [Rgb<u8>; 4] = [
    Rgb([0, 0, 0]),   // black
    Rgb([0, 0, 139]), // dark blue
    Rgb([0, 100, 0]), // dark green
    Rgb([139, 0, 0]), // dark red
];

const NOISE_COLOR: Rgb<u8> = Rgb([211, 211, 211]);
const NOISE_STROKES: usize = 20;

/// Regular/bold font pairs found on common system paths, tried in order
const SYSTEM_FONT_CANDIDATES: [(&str, &str); 4] = [
    (
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    ),
    (
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    ),
    ("C:\\Windows\\Fonts\\arial.ttf", "C:\\Windows\\Fonts\\arialbd.ttf"),
];

/// Fonts available to the synthesizer
struct FontSet {
    regular: Vec<FontVec>,
    bold: Vec<FontVec>,
}

impl FontSet {
    /// Load fonts from explicit paths, or fall back to system candidates.
    fn load(font_paths: &[PathBuf]) -> Result<Self> {
        if !font_paths.is_empty() {
            let mut regular = Vec::new();
            for path in font_paths {
                regular.push(read_font(path)?);
            }
            return Ok(Self {
                regular,
                bold: Vec::new(),
            });
        }

        let mut regular = Vec::new();
        let mut bold = Vec::new();
        for (regular_path, bold_path) in SYSTEM_FONT_CANDIDATES {
            if let Ok(font) = read_font(Path::new(regular_path)) {
                debug!(path = regular_path, "loaded system font");
                regular.push(font);
                if let Ok(font) = read_font(Path::new(bold_path)) {
                    bold.push(font);
                }
            }
        }

        if regular.is_empty() {
            return Err(Error::storage(
                "fonts",
                io::Error::new(io::ErrorKind::NotFound, "no usable font found"),
            ));
        }
        Ok(Self { regular, bold })
    }

    fn pick(&self, index: usize, bold: bool) -> &FontVec {
        if bold && !self.bold.is_empty() {
            &self.bold[index % self.bold.len()]
        } else {
            &self.regular[index % self.regular.len()]
        }
    }
}

fn read_font(path: &Path) -> Result<FontVec> {
    let data = std::fs::read(path).map_err(|e| Error::storage(path, e))?;
    FontVec::try_from_vec(data).map_err(|_| {
        Error::storage(
            path,
            io::Error::new(io::ErrorKind::InvalidData, "failed to parse font file"),
        )
    })
}

/// Sampled rendering parameters for one image
#[derive(Debug, Clone, PartialEq)]
struct RenderParams {
    width: u32,
    height: u32,
    background: Rgb<u8>,
    font_index: usize,
    font_size: f32,
    bold: bool,
    text_color: Rgb<u8>,
    text_x: i32,
    text_y: i32,
    noise: Vec<(f32, f32, f32, f32)>,
}

/// Produces randomized raster images of a text string
pub struct ImageSynthesizer {
    config: SynthConfig,
    fonts: FontSet,
    rng: StdRng,
}

impl ImageSynthesizer {
    /// Create a synthesizer drawing parameters from an entropy-seeded source
    pub fn new(config: SynthConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a synthesizer with a fixed seed for reproducible output
    pub fn with_seed(config: SynthConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SynthConfig, rng: StdRng) -> Result<Self> {
        let fonts = FontSet::load(&config.font_paths)?;
        Ok(Self { config, fonts, rng })
    }

    /// Folder the synthesizer writes into
    pub fn output_folder(&self) -> &Path {
        &self.config.output_folder
    }

    /// Render `count` randomized images of `text` into the output folder.
    ///
    /// Files are named `{text}_{YYYYMMDD_HHMMSS}_{index:03}.png`; the batch
    /// index keeps names unique when several images land in the same second.
    pub fn generate(&mut self, text: &str, count: usize) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.config.output_folder)
            .map_err(|e| Error::storage(&self.config.output_folder, e))?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let mut written = Vec::with_capacity(count);

        for index in 0..count {
            let params = self.sample_params();
            let image = render(text, &params, &self.fonts);

            let file_name = format!("{text}_{timestamp}_{index:03}.png");
            let path = self.config.output_folder.join(file_name);
            image.save(&path).map_err(|e| {
                Error::storage(&path, io::Error::new(io::ErrorKind::Other, e))
            })?;
            written.push(path);
        }

        info!(text, count, folder = %self.config.output_folder.display(), "generated images");
        Ok(written)
    }

    /// Draw one set of rendering parameters from the random source.
    ///
    /// Sampling order is fixed; for a given seed the parameter sequence is
    /// fully deterministic.
    fn sample_params(&mut self) -> RenderParams {
        let cfg = &self.config;
        let wj = cfg.width_jitter as i32;
        let hj = cfg.height_jitter as i32;

        let dw = if wj > 0 { self.rng.gen_range(-wj..wj) } else { 0 };
        let dh = if hj > 0 { self.rng.gen_range(-hj..hj) } else { 0 };
        let width = (cfg.base_width as i32 + dw).max(1) as u32;
        let height = (cfg.base_height as i32 + dh).max(1) as u32;

        let background = BACKGROUND_COLORS[self.rng.gen_range(0..BACKGROUND_COLORS.len())];
        let font_index = self.rng.gen_range(0..self.fonts.regular.len());
        let font_size = cfg.base_font_size + self.rng.gen_range(-4..8) as f32;
        let bold = self.rng.gen_range(0..3) == 0;
        let text_color = TEXT_COLORS[self.rng.gen_range(0..TEXT_COLORS.len())];

        let text_x = 10 + self.rng.gen_range(0..20);
        let text_y = (height as i32 / 2 - font_size as i32 / 2 + self.rng.gen_range(-10..10))
            .max(0);

        let noise = if self.rng.gen_range(0..3) == 0 {
            (0..NOISE_STROKES)
                .map(|_| {
                    (
                        self.rng.gen_range(0..width) as f32,
                        self.rng.gen_range(0..height) as f32,
                        self.rng.gen_range(0..width) as f32,
                        self.rng.gen_range(0..height) as f32,
                    )
                })
                .collect()
        } else {
            Vec::new()
        };

        RenderParams {
            width,
            height,
            background,
            font_index,
            font_size,
            bold,
            text_color,
            text_x,
            text_y,
            noise,
        }
    }
}

/// Render the text string verbatim with the sampled parameters
fn render(text: &str, params: &RenderParams, fonts: &FontSet) -> RgbImage {
    let mut image = RgbImage::from_pixel(params.width, params.height, params.background);

    let font = fonts.pick(params.font_index, params.bold);
    let scale = PxScale::from(params.font_size);
    draw_text_mut(
        &mut image,
        params.text_color,
        params.text_x,
        params.text_y,
        scale,
        font,
        text,
    );

    for &(x0, y0, x1, y1) in &params.noise {
        draw_line_segment_mut(&mut image, (x0, y0), (x1, y1), NOISE_COLOR);
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn config(dir: &Path) -> SynthConfig {
        SynthConfig {
            output_folder: dir.join("generated_images"),
            ..SynthConfig::default()
        }
    }

    /// Builds a synthesizer, or None when the machine has no usable font
    fn synthesizer(dir: &Path, seed: u64) -> Option<ImageSynthesizer> {
        ImageSynthesizer::with_seed(config(dir), seed).ok()
    }

    #[test]
    fn test_seeded_params_are_deterministic() {
        let dir = TempDir::new().unwrap();
        let Some(mut a) = synthesizer(dir.path(), 42) else {
            return;
        };
        let mut b = synthesizer(dir.path(), 42).unwrap();

        for _ in 0..10 {
            assert_eq!(a.sample_params(), b.sample_params());
        }
    }

    #[test]
    fn test_params_stay_in_expected_bounds() {
        let dir = TempDir::new().unwrap();
        let Some(mut synth) = synthesizer(dir.path(), 7) else {
            return;
        };

        for _ in 0..50 {
            let params = synth.sample_params();
            assert!(params.width >= 350 && params.width < 450);
            assert!(params.height >= 80 && params.height < 120);
            assert!(params.font_size >= 14.0 && params.font_size < 26.0);
            assert!(params.text_x >= 10 && params.text_x < 30);
            assert!(params.noise.is_empty() || params.noise.len() == NOISE_STROKES);
        }
    }

    #[test]
    fn test_generate_writes_count_distinct_files() {
        let dir = TempDir::new().unwrap();
        let Some(mut synth) = synthesizer(dir.path(), 1) else {
            return;
        };

        let written = synth.generate("SN001", 10).unwrap();
        assert_eq!(written.len(), 10);

        let names: HashSet<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names.len(), 10, "filenames must be unique within a batch");

        for path in &written {
            assert!(path.exists());
            let name = path.file_name().unwrap().to_string_lossy();
            assert!(name.starts_with("SN001_"));
            assert!(name.ends_with(".png"));
            // images must be decodable PNGs
            image::open(path).unwrap();
        }
    }

    #[test]
    fn test_generate_creates_output_folder() {
        let dir = TempDir::new().unwrap();
        let Some(mut synth) = synthesizer(dir.path(), 3) else {
            return;
        };

        assert!(!synth.output_folder().exists());
        synth.generate("AB-12", 1).unwrap();
        assert!(synth.output_folder().exists());
    }
}
