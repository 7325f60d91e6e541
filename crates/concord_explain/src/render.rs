//! Heatmap rendering and overlay composition.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::cam::SaliencyMap;
use crate::error::{ExplainError, Result};

/// Perceptual color map applied to the normalized saliency values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Colormap {
    /// Classic blue->cyan->yellow->red ramp.
    Jet,
    /// Plain intensity ramp.
    Grayscale,
}

impl Colormap {
    /// Map a normalized value in `[0, 1]` to a color.
    #[must_use]
    pub fn apply(&self, value: f32) -> Rgb<u8> {
        let v = value.clamp(0.0, 1.0);
        match self {
            Self::Jet => {
                let r = (1.5 - (4.0 * v - 3.0).abs()).clamp(0.0, 1.0);
                let g = (1.5 - (4.0 * v - 2.0).abs()).clamp(0.0, 1.0);
                let b = (1.5 - (4.0 * v - 1.0).abs()).clamp(0.0, 1.0);
                Rgb([to_u8(r), to_u8(g), to_u8(b)])
            }
            Self::Grayscale => {
                let level = to_u8(v);
                Rgb([level, level, level])
            }
        }
    }
}

/// Configuration for saliency overlay rendering.
///
/// These are presentation parameters, not correctness-critical: the defaults
/// match the model's 224x224 input resolution and a 60% original / 40%
/// heatmap blend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaliencyConfig {
    /// Output resolution (square), matching the model input.
    pub resolution: u32,
    /// Color map for the heatmap.
    pub colormap: Colormap,
    /// Blend weight of the original image.
    pub image_weight: f32,
    /// Blend weight of the heatmap.
    pub heatmap_weight: f32,
}

impl Default for SaliencyConfig {
    fn default() -> Self {
        Self {
            resolution: 224,
            colormap: Colormap::Jet,
            image_weight: 0.6,
            heatmap_weight: 0.4,
        }
    }
}

impl SaliencyConfig {
    /// Set the output resolution.
    #[must_use]
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the color map.
    #[must_use]
    pub fn with_colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }

    /// Set the blend weights (original, heatmap).
    #[must_use]
    pub fn with_weights(mut self, image_weight: f32, heatmap_weight: f32) -> Self {
        self.image_weight = image_weight;
        self.heatmap_weight = heatmap_weight;
        self
    }
}

/// Render the saliency map as a standalone pseudo-color heatmap.
///
/// The map is resized to the configured resolution, normalized to `[0, 1]`,
/// and colormapped pixel by pixel.
#[must_use]
pub fn render_heatmap(map: &SaliencyMap, config: &SaliencyConfig) -> RgbImage {
    let res = config.resolution;
    let cam = map.resized(res as usize, res as usize).normalized();

    let mut heatmap = RgbImage::new(res, res);
    for (x, y, pixel) in heatmap.enumerate_pixels_mut() {
        *pixel = config.colormap.apply(cam.values()[[y as usize, x as usize]]);
    }

    heatmap
}

/// Render the saliency map as a color heatmap blended over the source image.
///
/// The map is resized to the configured resolution, normalized to `[0, 1]`,
/// colormapped, and alpha-blended with the resized original.
#[must_use]
pub fn render_overlay(
    map: &SaliencyMap,
    original: &DynamicImage,
    config: &SaliencyConfig,
) -> RgbImage {
    let heat = render_heatmap(map, config);
    let res = config.resolution;

    let base = original
        .resize_exact(res, res, FilterType::Triangle)
        .to_rgb8();

    let mut overlay = RgbImage::new(res, res);
    for (x, y, pixel) in overlay.enumerate_pixels_mut() {
        let heat = heat.get_pixel(x, y);
        let src = base.get_pixel(x, y);

        let mut blended = [0u8; 3];
        for c in 0..3 {
            let value = config.image_weight * src[c] as f32
                + config.heatmap_weight * heat[c] as f32;
            blended[c] = value.round().clamp(0.0, 255.0) as u8;
        }
        *pixel = Rgb(blended);
    }

    overlay
}

/// Write the overlay as a derived artifact next to the source image.
///
/// The artifact is named `<stem>_gradcam.jpg`. Returns the path written.
pub fn save_overlay(overlay: &RgbImage, source_path: &Path) -> Result<PathBuf> {
    let stem = source_path
        .file_stem()
        .ok_or_else(|| ExplainError::Unavailable("source path has no file stem".to_string()))?;

    let mut name = stem.to_os_string();
    name.push("_gradcam.jpg");
    let output_path = source_path.with_file_name(name);

    overlay.save(&output_path)?;
    Ok(output_path)
}

fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_jet_endpoints() {
        // Low values are blue-dominant, high values red-dominant.
        let cold = Colormap::Jet.apply(0.0);
        assert!(cold[2] > cold[0] && cold[2] > cold[1]);

        let hot = Colormap::Jet.apply(1.0);
        assert!(hot[0] > hot[1] && hot[0] > hot[2]);

        let mid = Colormap::Jet.apply(0.5);
        assert_eq!(mid[1], 255);
    }

    #[test]
    fn test_grayscale_ramp() {
        assert_eq!(Colormap::Grayscale.apply(0.0), Rgb([0, 0, 0]));
        assert_eq!(Colormap::Grayscale.apply(1.0), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_default_config() {
        let config = SaliencyConfig::default();
        assert_eq!(config.resolution, 224);
        assert_eq!(config.colormap, Colormap::Jet);
        assert_eq!(config.image_weight, 0.6);
        assert_eq!(config.heatmap_weight, 0.4);
    }

    #[test]
    fn test_config_builders() {
        let config = SaliencyConfig::default()
            .with_resolution(112)
            .with_colormap(Colormap::Grayscale)
            .with_weights(0.5, 0.5);

        assert_eq!(config.resolution, 112);
        assert_eq!(config.colormap, Colormap::Grayscale);
        assert_eq!(config.image_weight, 0.5);
    }

    #[test]
    fn test_heatmap_dimensions_and_colors() {
        let mut values = Array2::zeros((2, 2));
        values[[0, 0]] = 1.0;
        let map = SaliencyMap::new(values);
        let config = SaliencyConfig::default().with_resolution(2);

        let heatmap = render_heatmap(&map, &config);
        assert_eq!(heatmap.dimensions(), (2, 2));
        assert_eq!(*heatmap.get_pixel(0, 0), Colormap::Jet.apply(1.0));
        assert_eq!(*heatmap.get_pixel(1, 1), Colormap::Jet.apply(0.0));
    }

    #[test]
    fn test_overlay_dimensions_and_blend() {
        let map = SaliencyMap::new(Array2::zeros((7, 7)));
        let original = DynamicImage::new_rgb8(64, 64);
        let config = SaliencyConfig::default().with_resolution(32);

        let overlay = render_overlay(&map, &original, &config);
        assert_eq!(overlay.dimensions(), (32, 32));

        // Black image + all-zero map: only the heatmap's cold color shows,
        // scaled by the heatmap weight.
        let expected = Colormap::Jet.apply(0.0);
        let pixel = overlay.get_pixel(0, 0);
        for c in 0..3 {
            let want = (0.4 * expected[c] as f32).round() as u8;
            assert_eq!(pixel[c], want);
        }
    }

    #[test]
    fn test_save_overlay_artifact_name() {
        let dir = std::env::temp_dir().join("concord_explain_artifact_test");
        std::fs::create_dir_all(&dir).unwrap();
        let source = dir.join("case01.png");

        let overlay = RgbImage::new(8, 8);
        let written = save_overlay(&overlay, &source).unwrap();

        assert_eq!(written.file_name().unwrap(), "case01_gradcam.jpg");
        assert!(written.exists());
        std::fs::remove_file(written).unwrap();
    }
}
