use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use habit_core::orchestrator::INVALID_SELECTION;
use habit_core::{
    Generation, GenerationConfig, ModelGateway, PlanSource, Variant, export_pdf, generate,
    pick_version,
};

/// Options for `habit generate`.
#[derive(Debug, Default)]
pub struct GenerateOptions {
    /// 1-based variant to show (and export), or all three.
    pub pick: Option<usize>,
    /// Export the picked variant to this PDF path.
    pub export: Option<PathBuf>,
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Machine-readable result of a generation run.
#[derive(Debug, Serialize)]
pub struct GenerationReport {
    /// The cleaned goal, absent when rejected.
    pub goal: Option<String>,
    /// Rejection message, when the goal was rejected.
    pub rejected: Option<String>,
    /// Always three entries, in v1/v2/v3 order.
    pub versions: Vec<VersionReport>,
}

#[derive(Debug, Serialize)]
pub struct VersionReport {
    pub variant: Variant,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PlanSource>,
}

impl From<&Generation> for GenerationReport {
    fn from(generation: &Generation) -> Self {
        let texts = generation.rendered();
        match generation {
            Generation::Rejected(reason) => Self {
                goal: None,
                rejected: Some(reason.to_string()),
                versions: Variant::ALL
                    .into_iter()
                    .zip(texts)
                    .map(|(variant, text)| VersionReport {
                        variant,
                        text,
                        source: None,
                    })
                    .collect(),
            },
            Generation::Plans { goal, plans } => Self {
                goal: Some(goal.as_str().to_string()),
                rejected: None,
                versions: plans
                    .iter()
                    .zip(texts)
                    .map(|(vp, text)| VersionReport {
                        variant: vp.variant,
                        text,
                        source: Some(vp.source.clone()),
                    })
                    .collect(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Execute `habit generate`: print the variants and optionally export one.
pub async fn run_generate(
    model: &dyn ModelGateway,
    config: &GenerationConfig,
    goal: &str,
    options: &GenerateOptions,
    out: &mut dyn Write,
) -> Result<()> {
    let generation = generate(Some(goal), model, config).await;

    if options.json {
        let report = GenerationReport::from(&generation);
        serde_json::to_writer_pretty(&mut *out, &report).context("failed to write JSON report")?;
        writeln!(out)?;
        if let Generation::Rejected(_) = generation {
            return Ok(());
        }
    } else if let Generation::Rejected(reason) = &generation {
        bail!("{reason}");
    }

    let versions = generation.rendered();

    let Some(pick) = options.pick else {
        if !options.json {
            for (variant, text) in Variant::ALL.iter().zip(&versions) {
                writeln!(out, "=== {variant} ({}) ===", variant.profile().tone)?;
                writeln!(out, "{text}")?;
                writeln!(out)?;
            }
        }
        return Ok(());
    };

    // 0 wraps to usize::MAX and reads as out of range.
    let picked = pick_version(&versions, pick.wrapping_sub(1));
    if picked == INVALID_SELECTION {
        bail!("{INVALID_SELECTION}: choose 1, 2 or 3 (got {pick})");
    }
    if !options.json {
        writeln!(out, "{picked}")?;
    }

    if let Some(path) = &options.export {
        let written = export_pdf(picked, Some(path))
            .with_context(|| format!("failed to export plan to {}", path.display()))?;
        if !options.json {
            writeln!(out)?;
            writeln!(out, "Exported to {}", written.display())?;
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use habit_core::OfflineModel;
    use habit_test_utils::{ScriptedModel, WELL_FORMED_COMPLETION};

    async fn run(goal: &str, options: GenerateOptions) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = run_generate(
            &OfflineModel,
            &GenerationConfig::default(),
            goal,
            &options,
            &mut out,
        )
        .await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn prints_all_three_variants() {
        let (result, out) = run("read more books", GenerateOptions::default()).await;
        result.unwrap();
        assert!(out.contains("=== v1 (simple) ==="));
        assert!(out.contains("=== v2 (alternative) ==="));
        assert!(out.contains("=== v3 (creative) ==="));
        assert!(out.contains("Habit: Read 30 pages every day"));
        assert_eq!(out.matches("Success criteria: ").count(), 3);
    }

    #[tokio::test]
    async fn pick_prints_only_that_variant() {
        let (result, out) = run(
            "read more books",
            GenerateOptions {
                pick: Some(2),
                ..Default::default()
            },
        )
        .await;
        result.unwrap();
        assert!(out.starts_with("Habit: Listen to audiobooks during daily commute\n"));
        assert!(!out.contains("==="));
    }

    #[tokio::test]
    async fn out_of_range_pick_is_invalid_selection() {
        for pick in [0, 4] {
            let (result, _) = run(
                "read more books",
                GenerateOptions {
                    pick: Some(pick),
                    ..Default::default()
                },
            )
            .await;
            let msg = result.unwrap_err().to_string();
            assert!(msg.starts_with("Invalid selection"), "pick {pick}: {msg}");
        }
    }

    #[tokio::test]
    async fn rejected_goal_is_an_error_in_text_mode() {
        let (result, out) = run("weight", GenerateOptions::default()).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Please add a few more words so I understand your goal."
        );
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn json_report_carries_rejection() {
        let (result, out) = run(
            "",
            GenerateOptions {
                json: true,
                ..Default::default()
            },
        )
        .await;
        result.unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["rejected"], "Please enter a goal.");
        assert!(json["goal"].is_null());
        assert_eq!(json["versions"].as_array().unwrap().len(), 3);
        assert_eq!(json["versions"][2]["text"], "Please enter a goal.");
    }

    #[tokio::test]
    async fn json_report_carries_sources() {
        let model = ScriptedModel::new([
            Ok(WELL_FORMED_COMPLETION.to_string()),
            Ok("Habit: Walk\nWhy: air".to_string()),
            Ok(String::new()),
        ]);
        let mut out = Vec::new();
        run_generate(
            &model,
            &GenerationConfig::default(),
            "lose some weight",
            &GenerateOptions {
                json: true,
                ..Default::default()
            },
            &mut out,
        )
        .await
        .unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["goal"], "lose some weight");
        assert_eq!(json["versions"][0]["variant"], "v1");
        assert_eq!(json["versions"][0]["source"]["kind"], "model");
        assert_eq!(json["versions"][1]["source"]["kind"], "repaired");
        assert_eq!(
            json["versions"][1]["source"]["filled"],
            serde_json::json!(["measure", "schedule", "start_date", "success_criteria"])
        );
        assert_eq!(json["versions"][2]["source"]["kind"], "fallback");
    }

    #[tokio::test]
    async fn pick_with_export_writes_pdf() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("plan.pdf");
        let (result, out) = run(
            "sleep better at night",
            GenerateOptions {
                pick: Some(3),
                export: Some(path.clone()),
                json: false,
            },
        )
        .await;
        result.unwrap();
        assert!(out.contains(&format!("Exported to {}", path.display())));
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF-"));
    }
}
