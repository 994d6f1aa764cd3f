use a11y_patcher::applicator::{check_file, discover_html_files, fix_file, FileOutcome, FileReport};
use a11y_patcher::patcher::Patcher;
use a11y_patcher::safety::SiteGuard;
use a11y_patcher::watch::{watch_site, WatchOptions, DEFAULT_DEBOUNCE_MS};
use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "a11y-patcher")]
#[command(about = "Accessibility patching for HTML documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the rule set to HTML files
    Fix {
        /// Specific files to fix (otherwise every HTML file under the site root)
        paths: Vec<PathBuf>,

        /// Path to the site root (auto-detected if not specified)
        #[arg(short, long)]
        site: Option<PathBuf>,

        /// Dry run - show what would be changed without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,

        /// Emit reports as JSON instead of the human summary
        #[arg(long)]
        json: bool,
    },

    /// Check compliance without modifying files
    Check {
        /// Specific files to check (otherwise every HTML file under the site root)
        paths: Vec<PathBuf>,

        /// Path to the site root (auto-detected if not specified)
        #[arg(short, long)]
        site: Option<PathBuf>,

        /// Emit reports as JSON instead of the human summary
        #[arg(long)]
        json: bool,
    },

    /// Fix the whole site, then keep re-fixing files as they change
    Watch {
        /// Path to the site root (auto-detected if not specified)
        #[arg(short, long)]
        site: Option<PathBuf>,

        /// Debounce window for change batches, in milliseconds
        #[arg(long, default_value_t = DEFAULT_DEBOUNCE_MS)]
        debounce_ms: u64,
    },

    /// List the fixed rule set in execution order
    Rules,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fix {
            paths,
            site,
            dry_run,
            diff,
            json,
        } => cmd_fix(paths, site, dry_run, diff, json),

        Commands::Check { paths, site, json } => cmd_check(paths, site, json),

        Commands::Watch { site, debounce_ms } => cmd_watch(site, debounce_ms),

        Commands::Rules => cmd_rules(),
    }
}

/// Resolve the site root.
///
/// Priority order:
/// 1. Explicit --site flag
/// 2. A11Y_SITE_ROOT environment variable
/// 3. Current directory
fn resolve_site(cli_site: Option<PathBuf>) -> Result<PathBuf> {
    // 1. Explicit flag (highest priority)
    if let Some(path) = cli_site {
        return Ok(path.canonicalize()?);
    }

    // 2. Environment variable
    if let Ok(env_path) = env::var("A11Y_SITE_ROOT") {
        let path = PathBuf::from(&env_path);
        if path.exists() {
            return Ok(path.canonicalize()?);
        }
        eprintln!(
            "{}",
            format!(
                "Warning: A11Y_SITE_ROOT is set but path doesn't exist: {}",
                env_path
            )
            .yellow()
        );
    }

    // 3. Current directory
    Ok(env::current_dir()?)
}

/// Helper: the files to process - explicit paths, or discovery under the root.
fn resolve_targets(site: &Path, paths: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    if !paths.is_empty() {
        return Ok(paths);
    }

    let files = discover_html_files(site);
    if files.is_empty() {
        anyhow::bail!(
            "{}\n{}\n  {}\n  {}",
            format!("No HTML files found under {}", site.display()).red(),
            "Try one of:".bold(),
            "1. cd into your site directory: cd /path/to/site && a11y-patcher fix",
            "2. Specify explicitly: a11y-patcher fix --site /path/to/site"
        );
    }
    Ok(files)
}

/// Helper: Show unified diff between original and patched content
fn display_diff(file: &Path, original: &str, patched: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, patched);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

fn print_report(outcome: &FileOutcome, dry_run: bool, show_diff: bool) {
    match &outcome.report {
        FileReport::Patched { file, fixes, rules } => {
            if dry_run {
                println!(
                    "{} {}: Would patch ({} fixes)",
                    "✓".green(),
                    file.display(),
                    fixes
                );
            } else {
                println!(
                    "{} {}: Patched ({} fixes)",
                    "✓".green(),
                    file.display(),
                    fixes
                );
            }
            for rule in rules.iter().filter(|r| r.patched > 0) {
                println!("    {} {} element(s)", rule.rule.dimmed(), rule.patched);
            }
            if show_diff {
                if let Some((original, patched)) = &outcome.buffers {
                    display_diff(file, original, patched);
                }
            }
        }
        FileReport::AlreadyCompliant { file } => {
            println!("{} {}: Already compliant", "⊙".yellow(), file.display());
        }
        FileReport::Failed { file, reason } => {
            eprintln!("{} {}: Failed - {}", "✗".red(), file.display(), reason);
        }
    }
}

fn print_summary(patched: usize, compliant: usize, failed: usize, dry_run: bool) {
    println!();
    println!("{}", "Summary:".bold());
    if dry_run {
        println!("  {} would be patched", format!("{}", patched).green());
    } else {
        println!("  {} patched", format!("{}", patched).green());
    }
    println!(
        "  {} already compliant",
        format!("{}", compliant).yellow()
    );
    println!("  {} failed", format!("{}", failed).red());
}

fn cmd_fix(
    paths: Vec<PathBuf>,
    site: Option<PathBuf>,
    dry_run: bool,
    show_diff: bool,
    json: bool,
) -> Result<()> {
    let site = resolve_site(site)?;
    let guard = SiteGuard::new(&site)?;
    let patcher = Patcher::new();
    let targets = resolve_targets(&site, paths)?;

    if !json {
        println!("Site: {}", site.display());
        if dry_run {
            println!("{}", "[DRY RUN - no files will be modified]".cyan());
        }
        println!();
    }

    let mut patched = 0;
    let mut compliant = 0;
    let mut failed = 0;
    let mut reports = Vec::new();

    for target in targets {
        let outcome = fix_file(&patcher, &guard, &target, dry_run);
        match &outcome.report {
            FileReport::Patched { .. } => patched += 1,
            FileReport::AlreadyCompliant { .. } => compliant += 1,
            FileReport::Failed { .. } => failed += 1,
        }
        if json {
            reports.push(outcome.report);
        } else {
            print_report(&outcome, dry_run, show_diff);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_summary(patched, compliant, failed, dry_run);
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_check(paths: Vec<PathBuf>, site: Option<PathBuf>, json: bool) -> Result<()> {
    let site = resolve_site(site)?;
    let guard = SiteGuard::new(&site)?;
    let patcher = Patcher::new();
    let targets = resolve_targets(&site, paths)?;

    if !json {
        println!("{}", "Compliance Report".bold());
        println!("Site: {}", site.display());
        println!();
    }

    let mut needs_patching = 0;
    let mut compliant = 0;
    let mut failed = 0;
    let mut reports = Vec::new();

    for target in targets {
        let outcome = check_file(&patcher, &guard, &target);
        match &outcome.report {
            FileReport::Patched { file, fixes, .. } => {
                needs_patching += 1;
                if !json {
                    println!(
                        "{} {}: {} fix(es) needed",
                        "⊙".yellow(),
                        file.display(),
                        fixes
                    );
                }
            }
            FileReport::AlreadyCompliant { file } => {
                compliant += 1;
                if !json {
                    println!("{} {}: Compliant", "✓".green(), file.display());
                }
            }
            FileReport::Failed { file, reason } => {
                failed += 1;
                if !json {
                    eprintln!("{} {}: Failed - {}", "✗".red(), file.display(), reason);
                }
            }
        }
        if json {
            reports.push(outcome.report);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!();
        println!("{}", "Summary:".bold());
        println!("  {} compliant", format!("{}", compliant).green());
        println!(
            "  {} need patching",
            format!("{}", needs_patching).yellow()
        );
        println!("  {} failed", format!("{}", failed).red());
    }

    if needs_patching > 0 || failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_watch(site: Option<PathBuf>, debounce_ms: u64) -> Result<()> {
    let site = resolve_site(site)?;
    let guard = SiteGuard::new(&site)?;
    let patcher = Patcher::new();
    let options = WatchOptions {
        debounce: Duration::from_millis(debounce_ms),
    };

    println!("Watching {} (Ctrl-C to stop)", site.display());
    println!();

    watch_site(&patcher, &guard, &options, |report| match report {
        FileReport::Patched { .. } => println!("{} {}", "✓".green(), report),
        FileReport::AlreadyCompliant { .. } => {}
        FileReport::Failed { .. } => eprintln!("{} {}", "✗".red(), report),
    })?;

    Ok(())
}

fn cmd_rules() -> Result<()> {
    let patcher = Patcher::new();

    println!("{}", "Rule set (execution order):".bold());
    for (position, rule) in patcher.rules().iter().enumerate() {
        println!(
            "  {}. {} - {}",
            position + 1,
            rule.name().bold(),
            rule.description()
        );
    }

    Ok(())
}
