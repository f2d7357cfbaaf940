//! # Labelkit CLI
//!
//! Command-line interface for rendering labels and label sheets.
//!
//! ## Usage
//!
//! ```bash
//! # Show how many labels fit on a preset or config file
//! labelkit layout --config a4
//!
//! # Render one label
//! labelkit label --text "POSTCARD" --tracking TRACK-A4-001 -o dist/label.png
//!
//! # Render a full sheet with numbered QR codes
//! labelkit sheet --config b5 --text "POSTCARD" --qr-prefix TRACK-B5 -o dist/sheet.png
//!
//! # Render a label and a sheet for every preset
//! labelkit demo --out-dir dist
//!
//! # Empty the output directory
//! labelkit clean --out-dir dist
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use labelkit::{
    LabelConfig, LabelError, SheetCompositor, output,
    tracking::SeededIds,
};

/// Labelkit - Postcard and parcel label renderer
#[derive(Parser, Debug)]
#[command(name = "labelkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log per-label detail
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the sheet grid for a configuration
    Layout {
        /// Preset name (a4, b5, small) or path to a JSON config
        #[arg(long, default_value = "a4")]
        config: String,
    },

    /// Render a single label
    Label {
        #[arg(long, default_value = "a4")]
        config: String,

        /// Title text
        #[arg(long)]
        text: String,

        /// Tracking number (random when omitted)
        #[arg(long)]
        tracking: Option<String>,

        /// QR payload (defaults to the tracking number)
        #[arg(long)]
        qr: Option<String>,

        /// Output PNG path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Render a full sheet of labels
    Sheet {
        #[arg(long, default_value = "a4")]
        config: String,

        #[arg(long)]
        text: String,

        /// QR payload shared by every label
        #[arg(long)]
        qr: Option<String>,

        /// Number QR payloads as PREFIX-1, PREFIX-2, ...
        #[arg(long, value_name = "PREFIX")]
        qr_prefix: Option<String>,

        /// Seed for tracking numbers, for reproducible sheets
        #[arg(long)]
        seed: Option<u64>,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Render a single label and a sheet for every built-in preset
    Demo {
        #[arg(long, default_value = "dist")]
        out_dir: PathBuf,

        #[arg(long, default_value = "POSTCARD")]
        text: String,
    },

    /// Remove everything in the output directory
    Clean {
        #[arg(long, default_value = "dist")]
        out_dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "labelkit=debug"
    } else {
        "labelkit=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), LabelError> {
    match command {
        Commands::Layout { config } => {
            let config = LabelConfig::resolve(&config)?;
            print_layout(&config);
        }

        Commands::Label {
            config,
            text,
            tracking,
            qr,
            output: path,
        } => {
            let config = LabelConfig::resolve(&config)?;
            let mut sheets = SheetCompositor::new(config)?;
            let tracking = tracking.unwrap_or_else(|| sheets.next_tracking_id());
            let payload = qr.unwrap_or_else(|| tracking.clone());

            let label = sheets
                .composer()
                .compose_label(&text, Some(&payload), Some(&tracking));
            for degradation in &label.degradations {
                println!("warning: {}", degradation);
            }
            output::save_png(&label.image, &path)?;
            println!("Saved label {} to {}", tracking, path.display());
        }

        Commands::Sheet {
            config,
            text,
            qr,
            qr_prefix,
            seed,
            output: path,
        } => {
            let config = LabelConfig::resolve(&config)?;
            let tracking = config.tracking.clone();
            let mut sheets = SheetCompositor::new(config)?;
            if let Some(seed) = seed {
                sheets = sheets.with_id_source(SeededIds::from_config(&tracking, seed));
            }

            let sheet = sheets.generate_sheet(None, &text, qr.as_deref(), qr_prefix.as_deref());
            output::save_png(&sheet.image, &path)?;
            println!(
                "Saved {} labels ({} x {}) to {}",
                sheet.label_count(),
                sheet.layout.cols,
                sheet.layout.rows,
                path.display()
            );
        }

        Commands::Demo { out_dir, text } => {
            for name in LabelConfig::preset_names() {
                let config = LabelConfig::resolve(name)?;
                println!("=== {} ===", name.to_uppercase());
                print_layout(&config);
                demo_preset(name, config, &text, &out_dir)?;
            }
            println!("\nAll labels and sheets written to {}", out_dir.display());
        }

        Commands::Clean { out_dir } => {
            let removed = output::clean_dir(&out_dir)?;
            println!("Removed {} entries from {}", removed, out_dir.display());
        }
    }

    Ok(())
}

/// Print paper and label sizes and the grid capacity.
fn print_layout(config: &LabelConfig) {
    let layout = labelkit::SheetLayout::calculate(config);
    let unit = config.unit.as_str();
    println!(
        "Paper: {}{unit} x {}{unit}",
        config.paper.width, config.paper.height
    );
    println!(
        "Label: {}{unit} x {}{unit}",
        config.label.width, config.label.height
    );
    println!(
        "Labels per sheet: {} cols x {} rows = {}",
        layout.cols,
        layout.rows,
        layout.capacity()
    );
}

/// Write `<name>_single_label.png` and `<name>_sheet.png`.
fn demo_preset(
    name: &str,
    config: LabelConfig,
    text: &str,
    out_dir: &Path,
) -> Result<(), LabelError> {
    let qr_prefix = format!("TRACK-{}", name.to_uppercase());
    let mut sheets = SheetCompositor::new(config)?;

    let tracking = format!("{}-001", qr_prefix);
    let label = sheets
        .composer()
        .compose_label(text, Some(&tracking), Some(&tracking));
    output::save_png(&label.image, out_dir.join(format!("{}_single_label.png", name)))?;

    let sheet = sheets.generate_sheet(None, text, None, Some(&qr_prefix));
    output::save_png(&sheet.image, out_dir.join(format!("{}_sheet.png", name)))?;
    Ok(())
}
