//! # picmenu CLI
//!
//! Command-line interface for rendering picture menus.
//!
//! ## Usage
//!
//! ```bash
//! # List the visible catalog entries with their indices
//! picmenu list
//!
//! # Render the overview
//! picmenu render --png overview.png
//!
//! # Render an entry by index or (fuzzy) name
//! picmenu render weather --png weather.png
//!
//! # Render one sub-item of an entry
//! picmenu render weather today --png today.png
//!
//! # Answer a chat-style request
//! picmenu query "/menu weather 2" --png reply.png
//!
//! # Render every visible entry into a directory
//! picmenu render-all --out menus/
//!
//! # Serve menus over HTTP
//! picmenu serve --listen 0.0.0.0:8080
//! ```

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use picmenu::{
    MenuError, MenuReply, MenuService,
    catalog::{CatalogEntry, LoadReport},
    config::{DEFAULT_CONFIG_PATH, MenuConfig},
    server::{self, ServerConfig},
};

/// picmenu - Picture menu renderer for chat bots
#[derive(Parser, Debug)]
#[command(name = "picmenu")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (missing file means defaults)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory of per-entry JSON records
    #[arg(long, global = true, value_name = "DIR")]
    menus: Option<PathBuf>,

    /// JSON file holding an array of records
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Directory of template style files
    #[arg(long, global = true, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// TrueType/OpenType font (defaults to the built-in bitmap face)
    #[arg(long, global = true, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List visible catalog entries
    List,

    /// Render the overview, an entry, or one of its sub-items
    Render {
        /// Entry index or name (omit for the overview)
        entry: Option<String>,

        /// Sub-item index or name
        item: Option<String>,

        /// Output PNG file
        #[arg(long, value_name = "FILE", default_value = "menu.png")]
        png: PathBuf,
    },

    /// Answer a chat message such as "/menu weather today"
    Query {
        /// Message text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Output PNG file
        #[arg(long, value_name = "FILE", default_value = "menu.png")]
        png: PathBuf,
    },

    /// Render every visible entry into a directory
    RenderAll {
        /// Output directory
        #[arg(long, value_name = "DIR", default_value = "menus")]
        out: PathBuf,
    },

    /// List registered templates
    Templates,

    /// Serve menus over HTTP
    Serve {
        /// Address to listen on (overrides the config)
        #[arg(long)]
        listen: Option<String>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), MenuError> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(|e| MenuError::Config(e.to_string()))?;

    let config = effective_config(&cli)?;
    let (menu, report) = MenuService::from_config(&config)?;
    log_report(&report);

    match cli.command {
        Commands::List => {
            let catalog = menu.snapshot();
            if catalog.visible_len() == 0 {
                println!("No visible entries.");
            }
            for (i, entry) in catalog.visible().enumerate() {
                let functions = match entry.sub_items() {
                    Some(items) => format!("{} functions", items.len()),
                    None => "no functions".to_string(),
                };
                println!("{:>3}. {} - {} ({})", i + 1, entry.name(), entry.description(), functions);
            }
            Ok(())
        }

        Commands::Render { entry, item, png } => {
            let reply = match (entry.as_deref(), item.as_deref()) {
                (None, _) => MenuReply::Image(menu.overview()?),
                (Some(entry), None) => menu.entry_menu(entry)?,
                (Some(entry), Some(item)) => menu.sub_item_menu(entry, item)?,
            };
            write_reply(reply, &png)
        }

        Commands::Query { text, png } => {
            let text = text.join(" ");
            let Some(reply) = menu.answer_text(&text) else {
                println!("Not a menu request: {:?}", text);
                return Ok(());
            };
            write_reply(reply?, &png)
        }

        Commands::RenderAll { out } => {
            std::fs::create_dir_all(&out)?;
            let catalog = menu.snapshot();
            let entries: Vec<(usize, &CatalogEntry)> = catalog.visible().enumerate().collect();

            entries
                .par_iter()
                .map(|(i, entry)| -> Result<(), MenuError> {
                    let path = out.join(format!("{:02}_{}.png", i + 1, file_stem(entry.name())));
                    menu.render_entry(entry)?.save_png(&path)?;
                    info!(entry = entry.name(), path = %path.display(), "rendered");
                    Ok(())
                })
                .collect::<Result<Vec<()>, MenuError>>()?;

            println!("Rendered {} entries to {}", entries.len(), out.display());
            Ok(())
        }

        Commands::Templates => {
            println!("Available templates:");
            for name in menu.templates().names() {
                println!("  {}", name);
            }
            Ok(())
        }

        Commands::Serve { listen } => {
            let server_config = ServerConfig {
                listen_addr: listen.unwrap_or(config.listen_addr),
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(server_config, menu))
        }
    }
}

/// Config file values with command-line overrides applied.
fn effective_config(cli: &Cli) -> Result<MenuConfig, MenuError> {
    let mut config = MenuConfig::load_or_default(&cli.config)?;
    if let Some(dir) = &cli.menus {
        config.menus_dir = dir.clone();
    }
    if let Some(file) = &cli.catalog {
        config.catalog_file = Some(file.clone());
    }
    if let Some(dir) = &cli.templates {
        config.templates_dir = dir.clone();
    }
    if let Some(font) = &cli.font {
        config.font = Some(font.clone());
    }
    Ok(config)
}

fn log_report(report: &LoadReport) {
    info!(loaded = report.loaded, errors = report.errors.len(), "catalog loaded");
    for error in &report.errors {
        warn!("{}", error);
    }
}

fn write_reply(reply: MenuReply, path: &Path) -> Result<(), MenuError> {
    match reply {
        MenuReply::Image(image) => {
            image.save_png(path)?;
            println!("Saved {}x{} menu to {}", image.width(), image.height(), path.display());
        }
        MenuReply::Failure(failure) => println!("{}", failure),
    }
    Ok(())
}

/// Entry name made safe for use as a file name.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
