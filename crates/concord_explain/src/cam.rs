//! Class activation map computation.

use ndarray::{Array2, Array3, Axis};

use crate::error::{ExplainError, Result};

/// A single-channel saliency map over the image plane.
///
/// Values are raw class-activation scores until [`normalized`](Self::normalized)
/// is applied, after which they lie in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct SaliencyMap {
    values: Array2<f32>,
}

impl SaliencyMap {
    /// Wrap an existing map.
    #[must_use]
    pub fn new(values: Array2<f32>) -> Self {
        Self { values }
    }

    /// The underlying values.
    #[must_use]
    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }

    /// Map dimensions as (height, width).
    #[must_use]
    pub fn dims(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// The maximum value in the map.
    #[must_use]
    pub fn max_value(&self) -> f32 {
        self.values.iter().copied().fold(0.0f32, f32::max)
    }

    /// Resize the map with bilinear interpolation.
    ///
    /// Sample positions use half-pixel centers, matching the interpolation
    /// used for the source image so the two stay registered.
    #[must_use]
    pub fn resized(&self, height: usize, width: usize) -> Self {
        Self {
            values: resize_bilinear(&self.values, height, width),
        }
    }

    /// Normalize by the map's maximum value.
    ///
    /// If the maximum is exactly zero the map is returned unchanged - an
    /// all-zero map stays all-zero rather than dividing by zero.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let max = self.max_value();
        if max == 0.0 {
            return self.clone();
        }
        Self {
            values: self.values.mapv(|v| v / max),
        }
    }
}

/// Compute a Grad-CAM saliency map from captured tensors.
///
/// # Arguments
///
/// * `activations` - Activations of the last convolutional stage (C, H, W)
/// * `gradients` - Gradients of the class score w.r.t. those activations,
///   same shape
///
/// # Returns
///
/// The (H, W) class activation map: each channel's activation weighted by
/// the spatial mean of its gradient, summed across channels, with negative
/// contributions clamped to zero. Only positive evidence for the predicted
/// class is visualized.
pub fn grad_cam(activations: &Array3<f32>, gradients: &Array3<f32>) -> Result<SaliencyMap> {
    let act_dim = activations.dim();
    let grad_dim = gradients.dim();

    if act_dim != grad_dim {
        return Err(ExplainError::ShapeMismatch {
            activations: [act_dim.0, act_dim.1, act_dim.2],
            gradients: [grad_dim.0, grad_dim.1, grad_dim.2],
        });
    }

    let (channels, height, width) = act_dim;
    if channels == 0 || height == 0 || width == 0 {
        return Err(ExplainError::Unavailable(
            "activation capture is empty".to_string(),
        ));
    }

    let mut cam = Array2::<f32>::zeros((height, width));
    for ch in 0..channels {
        let grad_ch = gradients.index_axis(Axis(0), ch);
        let act_ch = activations.index_axis(Axis(0), ch);

        // Per-channel importance: global average pool of the gradient.
        let weight = grad_ch.sum() / (height * width) as f32;

        for y in 0..height {
            for x in 0..width {
                cam[[y, x]] += weight * act_ch[[y, x]];
            }
        }
    }

    cam.mapv_inplace(|v| v.max(0.0));

    Ok(SaliencyMap::new(cam))
}

/// Bilinear resize with half-pixel sample centers.
fn resize_bilinear(src: &Array2<f32>, out_height: usize, out_width: usize) -> Array2<f32> {
    let (in_height, in_width) = src.dim();
    if in_height == 0 || in_width == 0 || out_height == 0 || out_width == 0 {
        return Array2::zeros((out_height, out_width));
    }
    if in_height == out_height && in_width == out_width {
        return src.clone();
    }

    let scale_y = in_height as f32 / out_height as f32;
    let scale_x = in_width as f32 / out_width as f32;

    let mut out = Array2::zeros((out_height, out_width));
    for y in 0..out_height {
        let fy = ((y as f32 + 0.5) * scale_y - 0.5).max(0.0);
        let y0 = (fy.floor() as usize).min(in_height - 1);
        let y1 = (y0 + 1).min(in_height - 1);
        let wy = fy - y0 as f32;

        for x in 0..out_width {
            let fx = ((x as f32 + 0.5) * scale_x - 0.5).max(0.0);
            let x0 = (fx.floor() as usize).min(in_width - 1);
            let x1 = (x0 + 1).min(in_width - 1);
            let wx = fx - x0 as f32;

            let top = src[[y0, x0]] * (1.0 - wx) + src[[y0, x1]] * wx;
            let bottom = src[[y1, x0]] * (1.0 - wx) + src[[y1, x1]] * wx;
            out[[y, x]] = top * (1.0 - wy) + bottom * wy;
        }
    }

    out
}
