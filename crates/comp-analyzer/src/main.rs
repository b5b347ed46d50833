// Composition analyzer entry point.
//
// Startup sequence:
// 1. Load config (seeding config/ from defaults/ when needed)
// 2. Initialize tracing (log to file, stdout carries the report)
// 3. Read the match sheet named on the command line
// 4. Run one analysis, relaying service failures to stderr
// 5. Print the outcome

use std::path::PathBuf;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use comp_analyzer::analysis::reconcile::RemoteReply;
use comp_analyzer::analysis::Analysis;
use comp_analyzer::app::{AnalysisEvent, AnalysisOutcome, AnalyzeRequest, Orchestrator};
use comp_analyzer::config::{self, LoggingConfig};
use comp_analyzer::remote::client::RemoteClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;
    info!("Composition analyzer starting up");

    let client = RemoteClient::from_config(&config);
    if client.is_configured() {
        info!("Analysis endpoint: {}", config.remote.endpoint);
    } else {
        info!("No analysis endpoint configured");
    }

    // 3. Read the match sheet
    let sheet_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: comp-analyzer <match.toml>")?;
    let sheet = config::load_match_sheet(&sheet_path)
        .with_context(|| format!("failed to read match sheet {}", sheet_path.display()))?;

    // 4. Run the analysis
    let (event_tx, mut event_rx) = mpsc::channel::<AnalysisEvent>(32);
    let orchestrator = Orchestrator::new(client).with_events(event_tx);

    let relay = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if let AnalysisEvent::RemoteFailed { message } = event {
                eprintln!("Analysis service unavailable ({message}); showing local analysis.");
            }
        }
    });

    let request = AnalyzeRequest {
        mode: sheet.mode,
        blue: sheet.blue,
        red: sheet.red,
        player: sheet.player,
    };
    let result = orchestrator.analyze(request).await;

    // Dropping the orchestrator closes the event channel so the relay drains and exits.
    drop(orchestrator);
    let _ = relay.await;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Analysis failed: {}", e);
            return Err(anyhow::Error::new(e).context("analysis failed"));
        }
    };

    // 5. Print the outcome
    print!("{}", render(&outcome));
    info!("Composition analyzer finished");
    Ok(())
}

/// Plain-text report for an outcome, headed by where it came from.
fn render(outcome: &AnalysisOutcome) -> String {
    let mut out = String::new();
    match outcome {
        AnalysisOutcome::Remote(reply) => {
            out.push_str("== Remote analysis ==\n\n");
            match reply {
                RemoteReply::Narrative(text) | RemoteReply::Opaque(text) => {
                    out.push_str(text);
                    out.push('\n');
                }
                RemoteReply::Structured(analysis) => render_analysis(&mut out, analysis),
            }
        }
        AnalysisOutcome::LocalFallback(analysis) => {
            out.push_str("== Local analysis (blue side) ==\n\n");
            render_analysis(&mut out, analysis);
        }
    }
    out
}

fn render_analysis(out: &mut String, analysis: &Analysis) {
    out.push_str(&format!("Composition: {}\n\n", analysis.archetype));
    out.push_str("Strengths:\n");
    for s in &analysis.strengths {
        out.push_str(&format!("  - {s}\n"));
    }
    out.push_str("\nWeaknesses:\n");
    for w in &analysis.weaknesses {
        out.push_str(&format!("  - {w}\n"));
    }
    out.push_str(&format!("\nStrategy: {}\n", analysis.strategy));
    out.push_str(&format!("Win condition: {}\n", analysis.win_condition));
}

/// Initialize tracing to log to a file so stdout only carries the report.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join(&logging.log_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("comp-analyzer.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use comp_analyzer::analysis::heuristic;

    #[test]
    fn local_report_names_its_source() {
        let analysis = heuristic::classify_names(&["Malphite", "Ornn", "Azir", "Jinx", "Leona"][..]);
        let text = render(&AnalysisOutcome::LocalFallback(analysis));
        assert!(text.starts_with("== Local analysis (blue side) =="));
        assert!(text.contains("Composition: tank-centric composition"));
        assert!(text.contains("  - strong frontline"));
        assert!(text.contains("Win condition: "));
    }

    #[test]
    fn narrative_is_printed_verbatim() {
        let outcome = AnalysisOutcome::Remote(RemoteReply::Narrative("# Blue wins".into()));
        assert_eq!(render(&outcome), "== Remote analysis ==\n\n# Blue wins\n");
    }
}
