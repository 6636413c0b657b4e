use log::info;
use surface_classifier::config::classify::{self, ClassifyToolConfig, OutputFormat};
use surface_classifier::diagnostics::SurfaceReport;
use surface_classifier::image::io::{load_depth_image, save_grayscale_f32, write_json_file};
use surface_classifier::image::ImageF32;
use surface_classifier::{GridPointBuffer, PipelineOutput, SurfaceDetector};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "classify_depth".to_string());
    let config = classify::parse_cli(&program)?;

    let depth = load_depth_image(&config.input, config.depth_scale)?;
    let grid = GridPointBuffer::from_depth(&depth, &config.intrinsics);
    info!(
        "loaded {} ({}x{}, {} valid points)",
        config.input.display(),
        grid.width(),
        grid.height(),
        grid.valid_count()
    );

    let mut detector = SurfaceDetector::new(config.params.clone());
    let output = detector.process(&grid).map_err(|e| e.to_string())?;
    info!("{}", output.trace.summary_line());
    let report = output.report();

    let format = config.output.format;
    if format.includes_text() {
        print_text_summary(&report);
    }
    if format.includes_json() {
        if let Some(path) = &config.output.json_out {
            write_json_file(path, &report)?;
            println!("JSON report written to {}", path.display());
        } else {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            if format == OutputFormat::Both {
                println!("\nJSON report:\n{json}");
            } else {
                println!("{json}");
            }
        }
    }

    if let Some(dir) = &config.output.debug_dir {
        save_debug_artifacts(dir, &config, &depth, &output)?;
        eprintln!("Debug artifacts written to {}", dir.display());
    }
    Ok(())
}

fn print_text_summary(report: &SurfaceReport) {
    let trace = &report.trace;
    println!("Surface classification summary");
    println!(
        "  input: {}x{} ({} valid points)",
        trace.input.width, trace.input.height, trace.input.valid_points
    );
    println!("  edge pixels: {}", trace.edges.summary.edge_pixels);
    let labels = &report.final_labels;
    println!(
        "  labels: clustered={} edge={} invalid={} skipped={}",
        labels.clustered, labels.edge, labels.invalid, labels.skipped
    );
    println!("  clusters: {}", report.clusters.len());
    if let Some(refine) = &trace.refine {
        println!(
            "  merges: {} ({} -> {} clusters)",
            refine.summary.merges.len(),
            refine.summary.clusters_before,
            refine.summary.clusters_after
        );
    }
    for cluster in &report.clusters {
        println!(
            "    {:>5} {:<9} px={:<6} border={:<5} H={:+.3} |H|={:.3}",
            cluster.id.to_string(),
            cluster.surface.as_str(),
            cluster.pixel_count,
            cluster.border_pixels,
            cluster.mean_curvature,
            cluster.mean_abs_curvature
        );
    }
    println!("  timings:");
    for stage in &trace.timings.stages {
        println!("    {:<13} {:>9.3} ms", stage.label, stage.elapsed_ms);
    }
    println!("    {:<13} {:>9.3} ms", "total", trace.timings.total_ms);
}

fn save_debug_artifacts(
    dir: &Path,
    config: &ClassifyToolConfig,
    depth: &ImageF32,
    output: &PipelineOutput,
) -> Result<(), String> {
    let max_depth = config
        .params
        .normals
        .max_depth
        .or_else(|| depth.max_value())
        .unwrap_or(1.0);
    save_grayscale_f32(depth, max_depth, &dir.join("depth.png"))?;
    save_grayscale_f32(&output.edges.strength, 1.0, &dir.join("edges.png"))?;
    if let Some(border) = &output.border {
        save_grayscale_f32(&border.to_image(), 1.0, &dir.join("border.png"))?;
    }
    write_json_file(&dir.join("trace.json"), &output.trace)
}
