use clap::{Args, Parser, Subcommand};
use flexi_logger::Logger;
use rust_circles::config::{LabelingMethod, LogKernel, RadiusRange};
use rust_circles::tools::{binary_stats, grayscale_stats, load_color, save_color};
use rust_circles::utils::grayscale::color_to_gray;
use rust_circles::{Detector, DetectorConfig, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "circletool", version, about = "RustCircles CLI tools")]
struct Cli {
    /// Log level or flexi_logger spec, `RUST_LOG` takes precedence
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect circles and write the annotated image
    Detect {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[command(flatten)]
        tuning: Tuning,
    },
    /// Print grayscale stats, threshold and segment counts for an image
    Stats {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        tuning: Tuning,
    },
}

#[derive(Args)]
struct Tuning {
    /// Scale applied to the Otsu threshold
    #[arg(long)]
    threshold_multiplier: Option<f32>,
    /// Minimum pixels per segment
    #[arg(long)]
    points_limit: Option<usize>,
    /// Max absolute aspect distortion per segment
    #[arg(long)]
    max_distortion: Option<f32>,
    /// First radius tested
    #[arg(long)]
    radius_min: Option<u32>,
    /// One past the last radius tested
    #[arg(long)]
    radius_max: Option<u32>,
    /// Derive the radius range from each segment's width
    #[arg(long, conflicts_with_all = ["radius_min", "radius_max"])]
    adaptive_radius: bool,
    /// Voting workers per batch
    #[arg(long)]
    workers: Option<usize>,
    /// Use the 3x3 Laplacian instead of the 5x5 LoG
    #[arg(long)]
    small_kernel: bool,
    /// Use union-find labeling instead of sweeps
    #[arg(long)]
    union_find: bool,
}

impl Tuning {
    fn config(&self) -> DetectorConfig {
        let mut config = DetectorConfig::from_env();
        if let Some(m) = self.threshold_multiplier {
            config = config.with_threshold_multiplier(m);
        }
        if let Some(limit) = self.points_limit {
            config.limits.points_limit = limit;
        }
        if let Some(d) = self.max_distortion {
            config.limits.max_distortion = d;
        }
        if self.adaptive_radius {
            config = config.with_radius_range(RadiusRange::FromSegment {
                margin: 10,
                floor: 3,
            });
        } else if let RadiusRange::Fixed { min, max } = config.voting.radius_range {
            config = config.with_radius_range(RadiusRange::Fixed {
                min: self.radius_min.unwrap_or(min),
                max: self.radius_max.unwrap_or(max),
            });
        }
        if let Some(workers) = self.workers {
            config = config.with_max_workers(workers);
        }
        if self.small_kernel {
            config = config.with_kernel(LogKernel::Small3);
        }
        if self.union_find {
            config = config.with_labeling(LabelingMethod::UnionFind);
        }
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _logger = match Logger::try_with_env_or_str(&cli.log_level).and_then(|l| l.start()) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Logger initialization failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match &cli.command {
        Command::Detect {
            input,
            output,
            tuning,
        } => detect_cmd(input, output, tuning.config()),
        Command::Stats { input, tuning } => stats_cmd(input, tuning.config()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn detect_cmd(input: &Path, output: &Path, config: DetectorConfig) -> Result<()> {
    let mut image = load_color(input)?;
    let report = Detector::with_config(config).annotate(&mut image)?;
    save_color(&image, output)?;

    let tel = &report.telemetry;
    println!("Image: {} ({}x{})", input.display(), image.width(), image.height());
    println!(
        "Preprocess: {:.2} ms",
        tel.preprocess.as_secs_f64() * 1000.0
    );
    println!(
        "Circle search: {:.2} ms",
        tel.circle_search.as_secs_f64() * 1000.0
    );
    println!("Found {} circles", report.circles.len());
    for (i, c) in report.circles.iter().enumerate() {
        println!(
            "  Circle {}: center=({}, {}), radius={}, votes={}",
            i, c.center.x, c.center.y, c.radius, c.votes
        );
    }
    println!("Wrote {}", output.display());
    Ok(())
}

fn stats_cmd(input: &Path, config: DetectorConfig) -> Result<()> {
    let image = load_color(input)?;
    let gray = color_to_gray(&image);
    let stats = grayscale_stats(&gray);
    let report = Detector::with_config(config).detect_gray(&gray)?;
    let tel = &report.telemetry;
    let outline = binary_stats(&report.outlines);

    println!("Image: {} ({}x{})", input.display(), gray.width(), gray.height());
    println!(
        "Gray: min={} max={} avg={}",
        stats.min, stats.max, stats.avg
    );
    println!("Otsu threshold (edges): {}", tel.threshold);
    println!("Components: {}", tel.components);
    println!("Segments kept: {}", tel.segments_kept);
    for s in &report.segments {
        println!(
            "  Segment {}: min=({}, {}) max=({}, {}) points={} distortion={:.2}",
            s.label(),
            s.min().x,
            s.min().y,
            s.max().x,
            s.max().y,
            s.count(),
            s.distortion()
        );
    }
    println!(
        "Circles: {} ({} outline pixels, {:.4} of image)",
        report.circles.len(),
        outline.foreground_pixels,
        outline.foreground_ratio
    );
    Ok(())
}
