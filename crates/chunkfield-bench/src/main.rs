use std::path::{Path, PathBuf};
use std::process;

use chunkfield_bench::report;
use chunkfield_bench::runner::WalkRunner;
use chunkfield_bench::scenes;
use chunkfield_core::config::{self, StreamConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut tick_count = 2000u32;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => config_path = Some(PathBuf::from(value_of(&args, &mut i))),
            "--baseline" => baseline_path = Some(PathBuf::from(value_of(&args, &mut i))),
            "--output" => output_path = Some(PathBuf::from(value_of(&args, &mut i))),
            "--regression-threshold" => {
                let value = value_of(&args, &mut i);
                regression_threshold = parse_or_exit(value, "--regression-threshold");
            }
            "--ticks" => tick_count = parse_or_exit(value_of(&args, &mut i), "--ticks"),
            "--help" | "-h" => {
                eprintln!("Usage: walk-runner [OPTIONS]");
                eprintln!("  --config <path>                RON stream config (cell size, speed)");
                eprintln!("  --baseline <path>              Load baseline JSON for comparison");
                eprintln!(
                    "  --output <path>                Save current results as JSON baseline"
                );
                eprintln!(
                    "  --regression-threshold <pct>   Churn regression threshold percentage (default: 10)"
                );
                eprintln!("  --ticks <n>                    Ticks per scene (default: 2000)");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let base_config = match config_path {
        Some(ref path) => load_config(path),
        None => StreamConfig::default(),
    };

    let runner = WalkRunner::new(base_config.clone(), tick_count);
    let mut results = Vec::new();
    for scene in &scenes::standard_scenes(base_config.cell_size) {
        match runner.run_scene(scene) {
            Ok(result) => results.push(result),
            Err(e) => {
                eprintln!("ERROR: scene '{}': {}", scene.name, e);
                process::exit(1);
            }
        }
    }

    println!("\n## Walk Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            label: format!("walk-{}", std::process::id()),
            results: results.clone(),
        };
        if let Err(e) = report::save_baseline(path, &baseline) {
            eprintln!("ERROR: failed to save baseline to {}: {}", path.display(), e);
            process::exit(1);
        }
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Walk run complete.");
}

/// Consume the value following the flag at `args[*i]`.
fn value_of<'a>(args: &'a [String], i: &mut usize) -> &'a str {
    *i += 1;
    match args.get(*i) {
        Some(v) => v,
        None => {
            eprintln!("Missing value for {}", args[*i - 1]);
            process::exit(1);
        }
    }
}

fn parse_or_exit<T: std::str::FromStr>(value: &str, flag: &str) -> T {
    match value.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Invalid {} value: {}", flag, value);
            process::exit(1);
        }
    }
}

fn load_config(path: &Path) -> StreamConfig {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path.display(), e);
            process::exit(1);
        }
    };
    match config::load_config_from_str(&source) {
        Ok(c) => {
            log::info!("Loaded config from {}", path.display());
            c
        }
        Err(e) => {
            eprintln!("Invalid config {}: {}", path.display(), e);
            process::exit(1);
        }
    }
}
