use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use gamedb_catalog::progress::{console_name_from_filename, render_report};
use gamedb_catalog::{
    run_event_loop, CatalogController, CatalogEvent, CatalogOptions, EventBinder, EventOutcome,
    ExportFormat, GameDatabase, KeyPress, ProgressTracker, SortKey, StaticDocument,
};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gamedb")]
#[command(about = "Game catalog search, export and database progress", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter, sort and export a catalog once
    Browse {
        /// A catalog HTML page, or one or more <console>_games.json files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Search text (title, developer, publisher)
        #[arg(short, long, default_value = "")]
        query: String,

        /// Category, or "all"
        #[arg(short, long, default_value = "all")]
        category: String,

        /// title, developer, publisher, year-asc, year-desc or none
        #[arg(short, long, default_value = "none")]
        sort: String,

        /// Export the visible games (json or csv)
        #[arg(short, long)]
        export: Option<String>,

        /// Directory exports are written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Drive a catalog with commands read from stdin
    Interactive {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory exports are written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Completion report of the console databases
    Progress {
        /// Directory holding dead_consoles.json and *_games.json
        #[arg(short, long, env = "GAMEDB_DATA_DIR", default_value = ".")]
        data_dir: PathBuf,

        /// Print progress entries as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
}

enum Command {
    Event(CatalogEvent),
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gamedb=info,gamedb_catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let options = CatalogOptions::from_env();

    match cli.command {
        Commands::Browse {
            inputs,
            query,
            category,
            sort,
            export,
            out_dir,
        } => {
            let sort: SortKey = sort.parse()?;
            let export = export.map(|f| f.parse::<ExportFormat>()).transpose()?;

            let document = load_document(&inputs, &options)?;
            let mut catalog = CatalogController::with_options(document, options);
            catalog.load();
            catalog.set_query(&query);
            catalog.set_category(&category);
            catalog.sort(sort);

            print_displayed(&catalog, usize::MAX);
            println!("\n📊 {}", catalog.results_counter());

            if let Some(format) = export {
                catalog.export(format);
                write_downloads(catalog.document_mut(), &out_dir)?;
            }
        }

        Commands::Interactive { inputs, out_dir } => {
            let document = load_document(&inputs, &options)?;
            let mut catalog = CatalogController::with_options(document, options);
            catalog.load();

            println!("🎮 {} games loaded", catalog.items().len());
            println!("   Categories: {}", catalog.categories().join(", "));
            println!("   Commands: /search <text>, /category <name|all>, /sort <key>, /export [json|csv], /key <ctrl+k|ctrl+e>, /quit");

            let (tx, rx) = mpsc::channel(32);
            let reader = tokio::spawn(async move {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    match parse_command(&line) {
                        Some(Command::Event(event)) => {
                            if tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Some(Command::Quit) => break,
                        None => eprintln!("⚠️ Unknown command: {}", line.trim()),
                    }
                }
            });

            let binder = run_event_loop(EventBinder::new(catalog), rx, |binder, outcome| match outcome {
                EventOutcome::Filtered(counter) => {
                    println!("📊 {}", counter);
                    print_displayed(binder.controller(), 10);
                }
                EventOutcome::Sorted(key) => {
                    println!("↕️  Sorted by {}", key);
                    print_displayed(binder.controller(), 10);
                }
                EventOutcome::Exported(Some(file)) => println!("📦 Prepared {}", file.file_name),
                EventOutcome::Exported(None) => println!("❌ Export failed"),
                EventOutcome::SearchFocused(true) => println!("🔍 Search focused"),
                EventOutcome::SearchFocused(false) => println!("🔍 No search box on this page"),
                EventOutcome::Animated(_) | EventOutcome::Ignored => {}
            })
            .await;

            reader.await?;
            let mut catalog = binder.into_controller();
            write_downloads(catalog.document_mut(), &out_dir)?;
        }

        Commands::Progress { data_dir, json } => {
            let tracker = ProgressTracker::load(&data_dir)
                .with_context(|| format!("reading {}", data_dir.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&tracker.calculate_progress())?);
            } else {
                print!("{}", render_report(&tracker, &chrono::Local::now()));
                println!("🚀 Keep up the great work building this open source gaming database!");
            }
        }
    }

    Ok(())
}

/// One HTML page, or any number of console databases merged into one page
fn load_document(inputs: &[PathBuf], options: &CatalogOptions) -> anyhow::Result<StaticDocument> {
    let is_html = |p: &PathBuf| {
        matches!(
            p.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref(),
            Some("html" | "htm")
        )
    };

    if inputs.iter().any(is_html) {
        if inputs.len() != 1 {
            bail!("an HTML page must be the only input");
        }
        let html = std::fs::read_to_string(&inputs[0])
            .with_context(|| format!("reading {}", inputs[0].display()))?;
        return Ok(StaticDocument::parse_html(&html, &options.selectors));
    }

    let mut document = StaticDocument::new();
    for path in inputs {
        let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let db = GameDatabase::from_json(&json).with_context(|| format!("parsing {}", path.display()))?;
        let category = category_for(path);
        tracing::info!("🗃️  {} games from {} ({})", db.games.len(), path.display(), category);
        document.append_game_database(&db, &category);
    }
    Ok(document)
}

/// `neo_geo_games.json` → `neo geo`; other names use the file stem
fn category_for(path: &Path) -> String {
    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    console_name_from_filename(filename)
        .unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string()
        })
        .to_lowercase()
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Command::Event(CatalogEvent::SearchInput(line.to_string())));
    };

    let (name, arg) = rest.split_once(' ').unwrap_or((rest, ""));
    let arg = arg.trim();

    let event = match name {
        "quit" | "q" => return Some(Command::Quit),
        "search" => CatalogEvent::SearchInput(arg.to_string()),
        "category" => CatalogEvent::CategorySelected(arg.to_string()),
        "sort" => CatalogEvent::SortSelected(arg.to_string()),
        "export" => match arg.parse::<ExportFormat>() {
            Ok(format) => CatalogEvent::ExportRequested(format),
            Err(e) => {
                eprintln!("⚠️ {}", e);
                return None;
            }
        },
        "key" => CatalogEvent::KeyDown(parse_key(arg)?),
        _ => return None,
    };

    Some(Command::Event(event))
}

/// `ctrl+k`, `cmd+e`, `k`
fn parse_key(input: &str) -> Option<KeyPress> {
    let mut parts: Vec<&str> = input.split('+').map(str::trim).collect();
    let key = parts.pop().filter(|k| !k.is_empty())?;

    let mut press = KeyPress::new(key);
    for modifier in parts {
        match modifier.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => press.ctrl = true,
            "cmd" | "meta" => press.meta = true,
            "shift" => press.shift = true,
            "alt" | "option" => press.alt = true,
            _ => return None,
        }
    }
    Some(press)
}

fn print_displayed(catalog: &CatalogController<StaticDocument>, limit: usize) {
    let by_element: std::collections::HashMap<_, _> =
        catalog.items().iter().map(|item| (item.element, item)).collect();

    let displayed = catalog.document().displayed();
    for id in displayed.iter().take(limit) {
        if let Some(item) = by_element.get(id) {
            let record = item.record();
            println!(
                "   {} | {} | {} | {} | {}",
                record.title,
                record.developer,
                record.publisher,
                record.category,
                record.display_release_date()
            );
        }
    }
    if displayed.len() > limit {
        println!("   … {} more", displayed.len() - limit);
    }
}

fn write_downloads(document: &mut StaticDocument, out_dir: &Path) -> anyhow::Result<()> {
    for file in document.take_downloads() {
        std::fs::create_dir_all(out_dir)?;
        let path = out_dir.join(&file.file_name);
        std::fs::write(&path, &file.contents).with_context(|| format!("writing {}", path.display()))?;
        println!("✅ Wrote {}", path.display());
    }
    Ok(())
}
