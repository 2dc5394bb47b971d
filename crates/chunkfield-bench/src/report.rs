use std::path::Path;

use crate::runner::WalkResult;

/// A complete baseline containing results from all scenes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub label: String,
    pub results: Vec<WalkResult>,
}

/// A scene whose behavior got worse than the baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum Regression {
    /// Create + destroy actions grew by more than the threshold (percent).
    Churn { scene: String, pct: f64 },
    /// The walk no longer ends with the resident set equal to the required set.
    Unsettled { scene: String },
}

/// Load a baseline from a JSON file. Returns None if the file doesn't exist.
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save a baseline to a JSON file.
pub fn save_baseline(path: &Path, baseline: &Baseline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Compare current results against a baseline.
/// Timings are informational only; churn and settling are deterministic.
pub fn compare(
    current: &[WalkResult],
    baseline: &Baseline,
    threshold_pct: f64,
) -> Vec<Regression> {
    let mut regressions = Vec::new();

    for result in current {
        let Some(base) = baseline
            .results
            .iter()
            .find(|b| b.scene_name == result.scene_name)
        else {
            continue;
        };

        if base.settled && !result.settled {
            regressions.push(Regression::Unsettled {
                scene: result.scene_name.clone(),
            });
        }

        let base_churn = base.churn() as f64;
        if base_churn > 0.0 {
            let pct_change = (result.churn() as f64 - base_churn) / base_churn * 100.0;
            if pct_change > threshold_pct {
                regressions.push(Regression::Churn {
                    scene: result.scene_name.clone(),
                    pct: pct_change,
                });
            }
        }
    }

    regressions
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[WalkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Ticks | Reconciles | Created | Destroyed | Cancelled | Loaded | Max Loaded | Max Pending | Settled | Mean (us) | P95 (us) |\n");
    out.push_str("|-------|-------|------------|---------|-----------|-----------|--------|------------|-------------|---------|-----------|----------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {:.2} | {:.2} |\n",
            r.scene_name,
            r.tick_count,
            r.reconciles,
            r.chunks_created,
            r.chunks_destroyed,
            r.cancelled,
            r.final_loaded,
            r.max_loaded,
            r.max_pending,
            if r.settled { "yes" } else { "no" },
            r.timings.mean_us,
            r.timings.p95_us,
        ));
    }

    out
}

/// Format a comparison report showing regressions.
pub fn format_comparison(regressions: &[Regression], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!(
            "All scenes within {:.0}% churn threshold. No regressions detected.\n",
            threshold_pct
        );
    }

    let mut out = String::new();
    out.push_str(&format!(
        "REGRESSIONS DETECTED (>{:.0}% threshold):\n",
        threshold_pct
    ));
    for regression in regressions {
        match regression {
            Regression::Churn { scene, pct } => {
                out.push_str(&format!("  - {}: churn +{:.1}%\n", scene, pct));
            }
            Regression::Unsettled { scene } => {
                out.push_str(&format!("  - {}: no longer settles\n", scene));
            }
        }
    }
    out
}
