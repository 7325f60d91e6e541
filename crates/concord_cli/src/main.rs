//! concord CLI for report diagnosis, agreement checks, and saliency overlays.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ndarray::Array3;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use concord_agreement::{analyze_discrepancies, check_agreement};
use concord_core::{ClassProbabilities, Classification, ImageLabel};
use concord_explain::{grad_cam, render_overlay, Colormap, SaliencyConfig};
use concord_pipeline::assemble_image_finding;
use concord_text::{diagnose, extract_impression};

#[derive(Parser)]
#[command(name = "concord")]
#[command(author, version)]
#[command(about = "Doctor-AI diagnostic agreement - compare a classifier verdict against a radiology report")]
#[command(long_about = "concord: agreement scoring between an image classifier and a radiology report.

EXAMPLES:
  # Diagnose a report with the text rule engine
  concord diagnose --report case01.txt

  # Check agreement against a stated classifier verdict
  concord agree --report case01.txt --label PNEUMONIA --confidence 92.3

  # Render a Grad-CAM overlay from captured tensors
  concord saliency --activations acts.npy --gradients grads.npy \\
      --image case01.png --output case01_gradcam.jpg")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the text rule engine over a report file
    Diagnose {
        /// Path to the report text file
        #[arg(long, value_name = "FILE")]
        report: PathBuf,

        /// Print the extracted impression/conclusion section instead of the
        /// full diagnosis
        #[arg(long)]
        impression: bool,
    },
    /// Check agreement between a report and a stated classifier verdict
    Agree {
        /// Path to the report text file
        #[arg(long, value_name = "FILE")]
        report: PathBuf,

        /// Classifier label: NORMAL or PNEUMONIA
        #[arg(long, value_name = "LABEL")]
        label: String,

        /// Classifier confidence as a percentage
        #[arg(long, value_name = "PCT")]
        confidence: f64,
    },
    /// Render a Grad-CAM overlay from captured tensors
    Saliency {
        /// Activations of the last conv stage, .npy with shape (C, H, W)
        #[arg(long, value_name = "FILE")]
        activations: PathBuf,

        /// Gradients at the same stage, .npy with shape (C, H, W)
        #[arg(long, value_name = "FILE")]
        gradients: PathBuf,

        /// Source image to overlay
        #[arg(long, value_name = "FILE")]
        image: PathBuf,

        /// Output path for the overlay
        #[arg(long, value_name = "FILE")]
        output: PathBuf,

        /// Output resolution (square)
        #[arg(long, default_value = "224", value_name = "PX")]
        resolution: u32,

        /// Blend weight of the original image
        #[arg(long, default_value = "0.6", value_name = "W")]
        image_weight: f32,

        /// Blend weight of the heatmap
        #[arg(long, default_value = "0.4", value_name = "W")]
        heatmap_weight: f32,

        /// Color map: jet or grayscale
        #[arg(long, default_value = "jet", value_name = "NAME")]
        colormap: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();

    match cli.command {
        Commands::Diagnose { report, impression } => handle_diagnose(&report, impression),
        Commands::Agree {
            report,
            label,
            confidence,
        } => handle_agree(&report, &label, confidence),
        Commands::Saliency {
            activations,
            gradients,
            image,
            output,
            resolution,
            image_weight,
            heatmap_weight,
            colormap,
        } => handle_saliency(
            &activations,
            &gradients,
            &image,
            &output,
            resolution,
            image_weight,
            heatmap_weight,
            &colormap,
        ),
    }
}

fn handle_diagnose(report_path: &Path, impression: bool) -> Result<()> {
    let report = read_report(report_path)?;

    if impression {
        match extract_impression(&report) {
            Some(text) => println!("{text}"),
            None => println!("(no impression section found)"),
        }
        return Ok(());
    }

    let finding = diagnose(&report);
    println!("{}", serde_json::to_string_pretty(&finding)?);
    Ok(())
}

fn handle_agree(report_path: &Path, label: &str, confidence: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&confidence) {
        bail!("Confidence must be a percentage in [0, 100], got {confidence}");
    }

    let label = parse_label(label)?;
    let report = read_report(report_path)?;

    let pneumonia = match label {
        ImageLabel::Pneumonia => confidence / 100.0,
        ImageLabel::Normal => 1.0 - confidence / 100.0,
    };
    let classification = Classification {
        label,
        confidence: confidence / 100.0,
        class_index: match label {
            ImageLabel::Normal => 0,
            ImageLabel::Pneumonia => 1,
        },
    };
    let probabilities = ClassProbabilities {
        normal: 1.0 - pneumonia,
        pneumonia,
    };

    let image_result = assemble_image_finding(&classification, &probabilities);
    let text_result = diagnose(&report);
    let agreement = check_agreement(&image_result, &text_result);
    let discrepancies = analyze_discrepancies(&image_result, &text_result, &report);

    let mut output = serde_json::to_value(&agreement)?;
    if let Some(map) = output.as_object_mut() {
        map.insert("image_analysis".to_string(), serde_json::to_value(&image_result)?);
        map.insert("text_analysis".to_string(), serde_json::to_value(&text_result)?);
        map.insert("discrepancies".to_string(), serde_json::to_value(&discrepancies)?);
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_saliency(
    activations_path: &Path,
    gradients_path: &Path,
    image_path: &Path,
    output_path: &Path,
    resolution: u32,
    image_weight: f32,
    heatmap_weight: f32,
    colormap: &str,
) -> Result<()> {
    let colormap = parse_colormap(colormap)?;

    let activations = read_tensor(activations_path)?;
    let gradients = read_tensor(gradients_path)?;
    tracing::info!(
        "Loaded capture: activations {:?}, gradients {:?}",
        activations.dim(),
        gradients.dim()
    );

    let original = image::open(image_path)
        .with_context(|| format!("Failed to open image {}", image_path.display()))?;

    let map = grad_cam(&activations, &gradients).context("Grad-CAM computation failed")?;

    let config = SaliencyConfig::default()
        .with_resolution(resolution)
        .with_colormap(colormap)
        .with_weights(image_weight, heatmap_weight);

    let overlay = render_overlay(&map, &original, &config);
    overlay
        .save(output_path)
        .with_context(|| format!("Failed to write overlay to {}", output_path.display()))?;

    println!("Saved overlay to {}", output_path.display());
    Ok(())
}

/// Read a report file, rejecting empty input up front.
fn read_report(path: &Path) -> Result<String> {
    let report = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report {}", path.display()))?;

    if report.trim().is_empty() {
        bail!("Report {} is empty", path.display());
    }

    Ok(report)
}

/// Parse a classifier label from the command line.
fn parse_label(label: &str) -> Result<ImageLabel> {
    match label.to_uppercase().as_str() {
        "NORMAL" => Ok(ImageLabel::Normal),
        "PNEUMONIA" => Ok(ImageLabel::Pneumonia),
        other => bail!("Unknown label: '{other}'. Supported: NORMAL, PNEUMONIA"),
    }
}

/// Parse a colormap name from the command line.
fn parse_colormap(name: &str) -> Result<Colormap> {
    match name.to_lowercase().as_str() {
        "jet" => Ok(Colormap::Jet),
        "grayscale" | "gray" => Ok(Colormap::Grayscale),
        other => bail!("Unknown colormap: '{other}'. Supported: jet, grayscale"),
    }
}

/// Read a (C, H, W) tensor from a NumPy .npy file.
fn read_tensor(path: &Path) -> Result<Array3<f32>> {
    use ndarray_npy::ReadNpyExt;

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open tensor file {}", path.display()))?;
    let reader = std::io::BufReader::new(file);

    // Try reading as f32 first, falling back to f64
    match Array3::<f32>::read_npy(reader) {
        Ok(arr) => Ok(arr),
        Err(e) => {
            let file = std::fs::File::open(path)?;
            let reader = std::io::BufReader::new(file);
            let arr_f64 = Array3::<f64>::read_npy(reader)
                .map_err(|_| anyhow::anyhow!("Failed to read npy file {}: {e}", path.display()))?;
            Ok(arr_f64.mapv(|x| x as f32))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label("pneumonia").unwrap(), ImageLabel::Pneumonia);
        assert_eq!(parse_label("NORMAL").unwrap(), ImageLabel::Normal);
        assert!(parse_label("FRACTURE").is_err());
    }

    #[test]
    fn test_parse_colormap() {
        assert_eq!(parse_colormap("JET").unwrap(), Colormap::Jet);
        assert_eq!(parse_colormap("gray").unwrap(), Colormap::Grayscale);
        assert!(parse_colormap("viridis").is_err());
    }
}
