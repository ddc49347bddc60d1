use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use restyler::config::ToolConfig;
use restyler::discover::discover_files;
use restyler::infer::{apply_suggestions, infer_all, Dimension, RuleSuggestion, ValueSet};
use restyler::normalize::normalize_all;
use restyler::parse::SourceLang;
use restyler::pool;
use restyler::profile::StyleProfile;
use restyler::safety::WorkspaceGuard;
use restyler::signals::{extract, AggregateSignals};
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "restyler")]
#[command(about = "Learns a codebase's style conventions and replays them", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Learn a style profile from a repository
    Learn {
        /// Repository root to scan
        #[arg(short, long, default_value = ".")]
        repo: PathBuf,

        /// Where to write the learned profile
        #[arg(short, long, default_value = "style-profile.json")]
        out: PathBuf,

        /// Explicit config file (otherwise <repo>/restyler.toml, then defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// JSON file of external rule suggestions to fold in
        #[arg(long)]
        augment: Option<PathBuf>,
    },

    /// Apply a profile's auto-fix-safe rules to a repository
    Apply {
        /// Repository root to rewrite
        #[arg(short, long, default_value = ".")]
        repo: PathBuf,

        /// Profile to apply
        #[arg(short, long, default_value = "style-profile.json")]
        profile: PathBuf,

        /// Prior snapshot of the repository, consulted for layout decisions
        #[arg(long)]
        reference_dir: Option<PathBuf>,

        /// Dry run - show what would be rewritten without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },

    /// Show the rules in a learned profile
    Show {
        /// Profile to display
        #[arg(short, long, default_value = "style-profile.json")]
        profile: PathBuf,
    },

    /// Explain one style dimension and its current rule
    Explain {
        /// Dimension name, e.g. quote-style
        dimension: String,

        /// Profile to read the current rule from
        #[arg(short, long, default_value = "style-profile.json")]
        profile: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Learn {
            repo,
            out,
            config,
            augment,
        } => cmd_learn(repo, out, config, augment),

        Commands::Apply {
            repo,
            profile,
            reference_dir,
            dry_run,
            diff,
        } => cmd_apply(repo, profile, reference_dir, dry_run, diff),

        Commands::Show { profile } => cmd_show(profile),

        Commands::Explain { dimension, profile } => cmd_explain(dimension, profile),
    }
}

/// Resolve tool configuration: explicit flag, then <repo>/restyler.toml,
/// then built-in defaults.
fn resolve_config(repo: &Path, explicit: Option<PathBuf>) -> Result<ToolConfig> {
    if let Some(path) = explicit {
        return Ok(restyler::config::load_from_path(&path)?);
    }
    let repo_config = repo.join("restyler.toml");
    if repo_config.exists() {
        return Ok(restyler::config::load_from_path(&repo_config)?);
    }
    Ok(ToolConfig::default())
}

/// Helper: Show unified diff between original and rewritten content
fn display_diff(file: &Path, original: &str, rewritten: &str) {
    println!("\n{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (restyled)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, rewritten);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

fn cmd_learn(
    repo: PathBuf,
    out: PathBuf,
    config: Option<PathBuf>,
    augment: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(&repo, config)?;
    let thresholds = config.thresholds();

    let files = discover_files(&repo, &config.scan);
    if files.is_empty() {
        anyhow::bail!(
            "No JavaScript/TypeScript sources found under {}",
            repo.display()
        );
    }

    println!(
        "Scanning {} files under {}...",
        files.len(),
        repo.display()
    );

    let mut aggregate = AggregateSignals::new();
    let mut skipped = 0;

    for path in &files {
        let Some(lang) = SourceLang::from_path(path) else {
            continue;
        };
        let Ok(source) = fs::read_to_string(path) else {
            skipped += 1;
            continue;
        };
        match pool::with_parser(lang, |parser| {
            parser.parse_with_source(&source).map(|parsed| extract(&parsed))
        }) {
            Ok(Ok(signals)) => aggregate.merge(&signals),
            _ => {
                eprintln!(
                    "{}",
                    format!("Warning: could not parse {}", path.display()).yellow()
                );
                skipped += 1;
            }
        }
    }

    info!(files = aggregate.files, skipped, "extraction finished");

    let mut profile = infer_all(&aggregate, &thresholds);

    if let Some(augment_path) = augment {
        let raw = fs::read_to_string(&augment_path)?;
        let suggestions: Vec<RuleSuggestion> = serde_json::from_str(&raw)?;
        let replaced = apply_suggestions(&mut profile, &suggestions, &thresholds);
        println!(
            "{} {} rule(s) externally augmented",
            "⊕".cyan(),
            replaced
        );
    }

    profile.save(&out)?;

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} files analyzed", format!("{}", aggregate.files).green());
    if skipped > 0 {
        println!("  {} files skipped", format!("{}", skipped).yellow());
    }
    println!(
        "  {} rules enforced, {} undetermined",
        format!("{}", profile.enforced_count()).green(),
        format!("{}", profile.rules.len() - profile.enforced_count()).yellow()
    );
    println!("  Profile written to {}", out.display());

    Ok(())
}

fn cmd_apply(
    repo: PathBuf,
    profile_path: PathBuf,
    reference_dir: Option<PathBuf>,
    dry_run: bool,
    show_diff: bool,
) -> Result<()> {
    let profile = StyleProfile::load(&profile_path)?;
    let config = resolve_config(&repo, None)?;
    let guard = WorkspaceGuard::new(&repo, &config.scan)?;

    let files = discover_files(&repo, &config.scan);

    println!("Profile: {}", profile_path.display());
    println!("Repository: {}", repo.display());
    if dry_run {
        println!("{}", "[DRY RUN - no files will be modified]".cyan());
    }
    println!();

    let mut rewritten_count = 0;
    let mut unchanged = 0;
    let mut failed = 0;

    for path in &files {
        let Some(lang) = SourceLang::from_path(path) else {
            continue;
        };
        let Ok(original) = fs::read_to_string(path) else {
            failed += 1;
            continue;
        };

        let reference = reference_dir.as_ref().and_then(|dir| {
            let relative = path.strip_prefix(&repo).ok()?;
            fs::read_to_string(dir.join(relative)).ok()
        });

        let rewritten = normalize_all(&original, reference.as_deref(), &profile, lang);
        if rewritten == original {
            unchanged += 1;
            continue;
        }

        if show_diff {
            display_diff(path, &original, &rewritten);
        }

        if dry_run {
            println!("{} Would rewrite {}", "⊙".yellow(), path.display());
            rewritten_count += 1;
            continue;
        }

        match guard.validate_path(path) {
            Ok(canonical) => {
                match restyler::edit::write_if_changed(&canonical, &original, &rewritten) {
                    Ok(_) => {
                        println!("{} Rewrote {}", "✓".green(), path.display());
                        rewritten_count += 1;
                    }
                    Err(e) => {
                        eprintln!("{} {}: {}", "✗".red(), path.display(), e);
                        failed += 1;
                    }
                }
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), path.display(), e);
                failed += 1;
            }
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!(
        "  {} {}",
        format!("{}", rewritten_count).green(),
        if dry_run { "would be rewritten" } else { "rewritten" }
    );
    println!("  {} unchanged", format!("{}", unchanged).dimmed());
    println!("  {} failed", format!("{}", failed).red());

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_show(profile_path: PathBuf) -> Result<()> {
    let profile = StyleProfile::load(&profile_path)?;

    println!("{}", "Style Profile".bold());
    println!(
        "Learned from {} files by {} {}",
        profile.meta.files, profile.meta.tool, profile.meta.version
    );
    println!();

    for (name, rule) in &profile.rules {
        let value = rule
            .value
            .as_ref()
            .map(|v| match v {
                restyler::infer::RuleValue::Keyword(k) => k.clone(),
                restyler::infer::RuleValue::Number(n) => n.to_string(),
            })
            .unwrap_or_else(|| "-".to_string());

        if rule.is_enforced() {
            let fix = if rule.auto_fix_safe { " [auto-fix]" } else { "" };
            println!(
                "{} {:<28} {:<12} confidence {:.2}, evidence {}{}",
                "✓".green(),
                name,
                value.bold(),
                rule.confidence,
                rule.evidence_count,
                fix.dimmed()
            );
        } else {
            println!(
                "{} {:<28} {:<12} confidence {:.2}, evidence {}",
                "⊙".yellow(),
                name,
                "undetermined".dimmed(),
                rule.confidence,
                rule.evidence_count
            );
        }
    }

    Ok(())
}

fn cmd_explain(dimension: String, profile_path: PathBuf) -> Result<()> {
    let Some(dim) = Dimension::from_name(&dimension) else {
        eprintln!("{} Unknown dimension '{}'", "✗".red(), dimension);
        if let Some(suggestion) = closest_dimension(&dimension) {
            eprintln!("  Did you mean '{}'?", suggestion.bold());
        }
        std::process::exit(1);
    };

    println!("{}", dim.name().bold());
    println!("  {}", dim.description());
    match dim.valid_values() {
        ValueSet::Keywords(keywords) => println!("  Values: {}", keywords.join(" | ")),
        ValueSet::PositiveNumber => println!("  Values: positive integer"),
    }

    if let Ok(profile) = StyleProfile::load(&profile_path) {
        if let Some(rule) = profile.rule(dim) {
            if rule.is_enforced() {
                println!(
                    "  Current: {} (confidence {:.2}, evidence {})",
                    profile
                        .enforced_keyword(dim)
                        .map(|s| s.to_string())
                        .or_else(|| profile.enforced_number(dim).map(|n| n.to_string()))
                        .unwrap_or_default()
                        .green(),
                    rule.confidence,
                    rule.evidence_count
                );
            } else {
                println!("  Current: {}", "undetermined".yellow());
            }
        }
    }

    Ok(())
}

/// Closest dimension name by Jaro-Winkler similarity, for typo hints.
fn closest_dimension(input: &str) -> Option<&'static str> {
    Dimension::all()
        .iter()
        .map(|d| (d.name(), strsim::jaro_winkler(input, d.name())))
        .filter(|(_, score)| *score > 0.7)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(name, _)| name)
}
