use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};

use weft_core::{OutputFormat, Severity, WeftConfig};

#[derive(Parser)]
#[command(
    name = "weft",
    version,
    about = "Asset reference mapper for static sites",
    long_about = "Weft maps every cross-file reference in a static site — stylesheet links,\n\
                   script tags, images, fonts, CSS imports, module imports — resolves each one\n\
                   against the tree, and reports what is dangling, duplicated, or at risk.\n\n\
                   Examples:\n  \
                     weft scan --root .               Analyze the current directory\n  \
                     weft scan --format json          Emit the structured data document\n  \
                     weft scan --report-dir reports   Write the JSON + HTML report pair\n  \
                     weft scan --fail-on error        CI gate: exit 1 on missing files\n  \
                     weft init                        Create a default configuration"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .weft.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable tables and summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown\n  \
                         html      Standalone HTML document for manual review"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a site tree and report on every asset reference
    #[command(long_about = "Scan a site tree and report on every asset reference.\n\n\
        Walks the tree, extracts stylesheet links, script tags, image tags, font\n\
        preloads, CSS @imports, and JS module imports, resolves each against the\n\
        tree, and reports dangling references, bundle status, design-token usage,\n\
        and recommendations.\n\n\
        Examples:\n  weft scan --root public\n  weft scan --format json > report.json\n  weft scan --fail-on error")]
    Scan {
        /// Site root to analyze (default: current directory)
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Write the rendered output to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Write the sibling report pair (weft-report.json + weft-report.html)
        /// into this directory
        #[arg(long)]
        report_dir: Option<PathBuf>,

        /// Exit with non-zero code if any recommendation meets this severity
        #[arg(
            long,
            long_help = "Exit with non-zero code if any recommendation meets this severity.\n\n\
                Severity ranking: critical > error > warning > optimization.\n\
                Useful in CI pipelines, e.g. --fail-on error to block merges on\n\
                missing files."
        )]
        fail_on: Option<Severity>,
    },
    /// Create a default .weft.toml configuration file
    #[command(long_about = "Create a default .weft.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .weft.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!(
            "\x1b[1m\x1b[36m\u{25c8}\x1b[0m \x1b[1mweft\x1b[0m v{version} — asset reference mapper for static sites\n"
        );

        println!("Quick start:");
        println!("  \x1b[36mweft init\x1b[0m                  Create a .weft.toml config file");
        println!("  \x1b[36mweft scan --root .\x1b[0m         Map every reference in the tree");
        println!("  \x1b[36mweft scan --format json\x1b[0m    Emit the structured report\n");

        println!("All commands:");
        println!("  \x1b[32mscan\x1b[0m   Walk the tree, resolve every reference, report the dangling ones");
        println!("  \x1b[32minit\x1b[0m   Create default configuration\n");
    } else {
        println!("weft v{version} — asset reference mapper for static sites\n");

        println!("Quick start:");
        println!("  weft init                  Create a .weft.toml config file");
        println!("  weft scan --root .         Map every reference in the tree");
        println!("  weft scan --format json    Emit the structured report\n");

        println!("All commands:");
        println!("  scan   Walk the tree, resolve every reference, report the dangling ones");
        println!("  init   Create default configuration\n");
    }

    println!("Run 'weft <command> --help' for details.");
}

const DEFAULT_CONFIG: &str = r#"# Weft configuration
# See: https://github.com/weft-tools/weft

[scan]
# Glob patterns to skip, in addition to hidden and VCS directories.
# exclude = ["node_modules/**", "vendor/**"]

[bundles]
# The stylesheet entry point the build concatenates from.
# css_entry = "css/main.css"
# Expected bundle artifacts; a site with none of these is flagged critical.
# paths = ["dist/styles.css", "dist/styles.min.css"]

[design_system]
# tokens_file = "css/design-system/tokens.css"
# theme_file = "design-system/linear-theme.json"
# patterns_file = "css/design-system/highlighter-patterns.css"
# pattern_prefix = "highlight-"

[report]
# max_common_issues = 10
# image_size_threshold_kb = 500
"#;

fn render(report: &weft_report::Report, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => format!("{report}"),
        OutputFormat::Json => report.to_json().into_diagnostic()?,
        OutputFormat::Markdown => report.to_markdown(),
        OutputFormat::Html => report.to_html(),
    })
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => WeftConfig::from_file(path)
            .into_diagnostic()
            .wrap_err(format!("reading {}", path.display()))?,
        None => {
            let default_path = std::path::Path::new(".weft.toml");
            if default_path.exists() {
                WeftConfig::from_file(default_path)
                    .into_diagnostic()
                    .wrap_err("reading .weft.toml")?
            } else {
                WeftConfig::default()
            }
        }
    };

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    match cli.command {
        None => {
            print_welcome(use_color);
            Ok(())
        }
        Some(Command::Scan {
            ref root,
            ref out,
            ref report_dir,
            fail_on,
        }) => {
            let is_tty = std::io::stderr().is_terminal();
            let spinner = if is_tty {
                let pb = indicatif::ProgressBar::new_spinner();
                pb.set_style(
                    indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                        .unwrap(),
                );
                pb.set_message(format!("Scanning {}...", root.display()));
                pb.enable_steady_tick(std::time::Duration::from_millis(120));
                Some(pb)
            } else {
                None
            };

            let report = weft_report::run_scan(root, &config)
                .into_diagnostic()
                .inspect_err(|_e| {
                    if let Some(pb) = &spinner {
                        pb.finish_with_message("Failed");
                    }
                })
                .wrap_err(format!("scanning {}", root.display()))?;

            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }

            if cli.verbose {
                eprintln!("--- Scan Stats ---");
                eprintln!(
                    "Pages: {} | CSS imports: {} | JS modules: {}",
                    report.summary.html.total_pages,
                    report.summary.css.total_imports,
                    report.summary.js.total_modules,
                );
                eprintln!(
                    "Missing: {} css, {} js, {} page references",
                    report.summary.css.missing_files,
                    report.summary.js.missing_files,
                    report.summary.html.missing_references,
                );
                if !report.warnings.is_empty() {
                    eprintln!("Warnings:");
                    for warning in &report.warnings {
                        eprintln!("  {warning}");
                    }
                }
                eprintln!("------------------");
            }

            let rendered = render(&report, cli.format)?;
            match out {
                Some(path) => {
                    std::fs::write(path, &rendered)
                        .into_diagnostic()
                        .wrap_err(format!("writing {}", path.display()))?;
                    eprintln!("Wrote {}", path.display());
                }
                None => print!("{rendered}"),
            }

            if let Some(dir) = report_dir {
                std::fs::create_dir_all(dir)
                    .into_diagnostic()
                    .wrap_err(format!("creating {}", dir.display()))?;
                let json_path = dir.join("weft-report.json");
                let html_path = dir.join("weft-report.html");
                std::fs::write(&json_path, report.to_json().into_diagnostic()?)
                    .into_diagnostic()
                    .wrap_err(format!("writing {}", json_path.display()))?;
                std::fs::write(&html_path, report.to_html())
                    .into_diagnostic()
                    .wrap_err(format!("writing {}", html_path.display()))?;
                eprintln!("Wrote {} and {}", json_path.display(), html_path.display());
            }

            if let Some(threshold) = fail_on {
                let has_findings = report
                    .recommendations
                    .iter()
                    .any(|r| r.severity.meets_threshold(threshold));
                if has_findings {
                    std::process::exit(1);
                }
            }

            Ok(())
        }
        Some(Command::Init) => {
            let path = std::path::Path::new(".weft.toml");
            if path.exists() {
                miette::bail!(".weft.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .weft.toml with default configuration");
            Ok(())
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "weft", &mut std::io::stdout());
            Ok(())
        }
    }
}
