//! Implementation of the Assessor CLI commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use super::EvaluateArgs;
use crate::audit::AuditRecord;
use crate::cache::CacheStats;
use crate::chain::EvaluatorChain;
use crate::strategies::{EvaluationStrategy, StrategyKind};
use crate::types::config::{Config, DEFAULT_CONFIG_FILE};
use crate::types::{EvaluationResult, Submission};
use crate::{AssessorError, AssessorResult};

/// Writes a default configuration in the specified directory.
pub async fn init(path: Option<PathBuf>) -> AssessorResult<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));

    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        tracing::info!("Directory created: {}", target_dir.display());
    }

    let config_path = target_dir.join(DEFAULT_CONFIG_FILE);

    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
        return Ok(());
    }

    Config::default_config().save(&config_path)?;

    println!("Assessor initialized successfully!");
    println!("Configuration created at: {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Pick a strategy: assessor strategies");
    println!("  2. Evaluate a document: assessor evaluate --file paper.txt --repeat 2");

    Ok(())
}

/// Lists the built-in strategies.
pub fn strategies() {
    println!("Available strategies:\n");
    for kind in StrategyKind::ALL {
        println!(
            "  {:<12} {} (~{} ms)",
            kind.to_string(),
            kind.description(),
            kind.default_latency().as_millis()
        );
    }
}

/// Shows the version.
pub fn version() {
    println!("assessor {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Cached submission evaluation strategies");
}

/// Report printed by `evaluate --json`.
#[derive(Debug, Serialize)]
struct EvaluationReport {
    strategy: String,
    chain: String,
    submission_id: String,
    fingerprint: String,
    results: Vec<EvaluationResult>,
    cache: Option<CacheStats>,
    audit: Vec<AuditRecord>,
}

/// Applies command line overrides on top of the loaded configuration.
fn effective_config(args: &EvaluateArgs, config: &Config) -> AssessorResult<Config> {
    let mut config = config.clone();
    if let Some(kind) = args.strategy {
        config.strategy.kind = kind;
    }
    if let Some(ttl) = args.ttl {
        config.cache.ttl_secs = ttl;
    }
    if let Some(latency_ms) = args.latency_ms {
        config.strategy.latency_ms = Some(latency_ms);
    }
    config.validate()?;
    Ok(config)
}

fn load_submission(args: &EvaluateArgs) -> AssessorResult<Submission> {
    let (content, default_title) = match (&args.file, &args.content) {
        (Some(file), _) => (std::fs::read_to_string(file)?, file_title(file)),
        (None, Some(content)) => (content.clone(), "Untitled".to_string()),
        (None, None) => {
            return Err(AssessorError::other(
                "nothing to evaluate: pass --file or --content",
            ))
        }
    };

    let title = args.title.clone().unwrap_or(default_title);
    Ok(match &args.id {
        Some(id) => Submission::new(id.clone(), title, content, args.author.clone()),
        None => Submission::anonymous(title, content, args.author.clone()),
    })
}

fn file_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_string())
}

fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Evaluates a document through the configured chain.
pub async fn evaluate(args: &EvaluateArgs, config: &Config) -> AssessorResult<()> {
    let config = effective_config(args, config)?;
    let submission = load_submission(args)?;
    let chain = EvaluatorChain::from_config(&config)?;

    tracing::debug!(
        submission_id = submission.submission_id(),
        chain = %chain.describe(),
        "Evaluating {}",
        submission
    );

    let mut results = Vec::new();
    for round in 1..=args.repeat {
        let bar = (!args.json).then(|| {
            spinner(format!(
                "[{}/{}] {} on '{}'",
                round,
                args.repeat,
                chain.name(),
                submission.title()
            ))
        });

        let result = chain.evaluate(&submission).await;

        if let Some(bar) = bar {
            bar.finish_and_clear();
            println!("[{}/{}] {}", round, args.repeat, result);
        }
        results.push(result);
    }

    let cache = chain.cache_stats().await;
    let audit = chain.audit_log().await;

    if args.json {
        let report = EvaluationReport {
            strategy: chain.name().to_string(),
            chain: chain.describe(),
            submission_id: submission.submission_id().to_string(),
            fingerprint: submission.fingerprint(),
            results,
            cache,
            audit,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(50));
    println!("Strategy: {}", chain.name());
    println!("Chain:    {}", chain.describe());

    if let Some(stats) = cache {
        println!("\nCache:");
        println!("  Hits:      {}", stats.hits);
        println!("  Misses:    {}", stats.misses);
        println!("  Hit rate:  {:.1}%", stats.hit_rate_percent);
        println!("  Entries:   {}", stats.size);
        println!("  TTL:       {}s", stats.ttl_secs);
    }

    if !audit.is_empty() {
        println!("\nAudit log:");
        for record in &audit {
            println!(
                "  {} {:<30} score={:>6.2} {:>9.1}ms{}",
                record.timestamp.format("%H:%M:%S"),
                record.title,
                record.score,
                record.duration_ms,
                if record.cached { " [CACHED]" } else { "" }
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args() -> EvaluateArgs {
        EvaluateArgs {
            file: None,
            content: Some("Abstract: short. Results: fine.".to_string()),
            title: None,
            id: Some("S1".to_string()),
            author: "tester".to_string(),
            strategy: None,
            repeat: 1,
            ttl: None,
            latency_ms: None,
            json: false,
        }
    }

    #[test]
    fn test_effective_config_overrides() {
        let mut a = args();
        a.strategy = Some(StrategyKind::RuleBased);
        a.ttl = Some(30);
        a.latency_ms = Some(0);

        let config = effective_config(&a, &Config::default_config()).unwrap();
        assert_eq!(config.strategy.kind, StrategyKind::RuleBased);
        assert_eq!(config.cache.ttl_secs, 30);
        assert_eq!(config.strategy.latency_ms, Some(0));
    }

    #[test]
    fn test_effective_config_rejects_negative_ttl() {
        let mut a = args();
        a.ttl = Some(-10);
        assert!(effective_config(&a, &Config::default_config()).is_err());
    }

    #[test]
    fn test_load_submission_from_content() {
        let submission = load_submission(&args()).unwrap();
        assert_eq!(submission.submission_id(), "S1");
        assert_eq!(submission.title(), "Untitled");
        assert_eq!(submission.author(), "tester");
    }

    #[test]
    fn test_load_submission_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quantum_paper.txt");
        std::fs::write(&path, "Quantum content.").unwrap();

        let mut a = args();
        a.content = None;
        a.file = Some(path);

        let submission = load_submission(&a).unwrap();
        assert_eq!(submission.title(), "quantum_paper");
        assert_eq!(submission.content(), "Quantum content.");
    }

    #[test]
    fn test_load_submission_needs_input() {
        let mut a = args();
        a.content = None;
        assert!(load_submission(&a).is_err());
    }

    #[tokio::test]
    async fn test_init_writes_config() {
        let dir = TempDir::new().unwrap();
        init(Some(dir.path().to_path_buf())).await.unwrap();

        let config = Config::load(dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default_config());
    }
}
