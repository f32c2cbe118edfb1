//! Label scanning CLI.
//!
//! Usage:
//!     labelscan scan "Contains milk and peanut oil" --profile milk,peanut
//!     labelscan scan --file label.txt --format json
//!     labelscan barcode 8901234567890 --profile milk
//!     labelscan tables

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use labelscan_model::{display_name, ScanReport, UserAllergyProfile};
use labelscan_store::{MemoryStore, ReferenceStore};

#[derive(Parser)]
#[command(name = "labelscan")]
#[command(about = "Analyze ingredient text for allergens and harmful additives")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON reference-data document (defaults to built-in tables)
    #[arg(long)]
    data: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan raw ingredient text (OCR output or otherwise)
    Scan {
        /// Ingredient text to scan
        text: Option<String>,

        /// Read ingredient text from a file instead
        #[arg(short, long, conflicts_with = "text")]
        file: Option<String>,

        /// User allergy profile, comma-separated allergen keys
        #[arg(short, long)]
        profile: Option<String>,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Look up a barcode in the demo product table and scan its ingredients
    Barcode {
        /// Product barcode
        code: String,

        /// User allergy profile, comma-separated allergen keys
        #[arg(short, long)]
        profile: Option<String>,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Dump the loaded reference tables
    Tables,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("labelscan=debug".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let store = match &cli.data {
        Some(path) => MemoryStore::from_path(path)?,
        None => MemoryStore::builtin(),
    };
    tracing::debug!(store = store.name(), "Reference store ready");

    match cli.command {
        Commands::Scan {
            text,
            file,
            profile,
            format,
        } => {
            let text = match (text, file) {
                (Some(t), _) => t,
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => bail!("Provide ingredient text or --file"),
            };
            let report = run_scan(&store, &text, &parse_profile(profile))?;
            print_report(&report, &format)?;
        }
        Commands::Barcode {
            code,
            profile,
            format,
        } => {
            run_barcode(&store, &code, &parse_profile(profile), &format)?;
        }
        Commands::Tables => {
            println!("{}", serde_json::to_string_pretty(store.data())?);
        }
    }

    Ok(())
}

fn parse_profile(profile: Option<String>) -> UserAllergyProfile {
    profile
        .map(|s| {
            s.split(',')
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Run the full pipeline: detect, score, infer, assemble.
///
/// The three scan passes are independent; the assembler only needs their
/// outputs plus the profile. Reference-store failures propagate rather than
/// degrading to an empty (falsely clean) report.
fn run_scan(
    store: &impl ReferenceStore,
    text: &str,
    profile: &UserAllergyProfile,
) -> Result<ScanReport> {
    let allergen_rules = store.allergen_rules()?;
    let harmful_rules = store.harmful_ingredients()?;
    let predictive_rules = store.predictive_rules()?;

    let detections = labelscan_detect::detect(text, &allergen_rules);
    let health = labelscan_health::score(text, &harmful_rules);
    let predictive = labelscan_predict::infer(text, &predictive_rules);

    // Fetch alternatives for the detected allergens up front so a store
    // failure surfaces here, not inside the pure assembler.
    let mut alternatives = std::collections::BTreeMap::new();
    for detection in &detections {
        if !alternatives.contains_key(&detection.allergen) {
            let alts = store.safe_alternatives(&detection.allergen)?;
            alternatives.insert(detection.allergen.clone(), alts);
        }
    }

    Ok(labelscan_report::assemble(
        profile,
        detections,
        health,
        predictive,
        |key| alternatives.get(key).cloned().unwrap_or_default(),
    ))
}

/// Demo barcode lookup: an alternate source of ingredient text feeding the
/// same pipeline. A real deployment would query a product database here.
fn demo_product(barcode: &str) -> Option<(&'static str, &'static str)> {
    match barcode {
        "8901234567890" => Some(("Chocolate Bar", "Milk, Sugar, Cocoa, Peanut oil")),
        "8909876543210" => Some(("Oat Milk", "Water, Oats, Salt")),
        "8901111111111" => Some(("Plain Water", "")),
        _ => None,
    }
}

fn run_barcode(
    store: &impl ReferenceStore,
    code: &str,
    profile: &UserAllergyProfile,
    format: &str,
) -> Result<()> {
    let Some((name, ingredients)) = demo_product(code) else {
        bail!("Product not found for barcode {code}");
    };

    if ingredients.trim().is_empty() {
        println!("No ingredients available for {name}; scan the label instead.");
        return Ok(());
    }

    println!("Product: {name}");
    println!("Ingredients: {ingredients}");
    println!("---");

    let report = run_scan(store, ingredients, profile)?;
    print_report(&report, format)
}

fn print_report(report: &ScanReport, format: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if report.detections.is_empty() {
        println!("Detections: none");
    } else {
        println!("Detections:");
        for (i, d) in report.detections.iter().enumerate() {
            println!(
                "{}. {} ({}) - matched \"{}\"",
                i + 1,
                display_name(&d.allergen),
                d.severity.label(),
                d.matched
            );
        }
    }

    println!("\n{}", report.summary.message());

    println!(
        "\nHealth Score: {}/100{}",
        report.health.score,
        if report.health.found.is_empty() {
            String::new()
        } else {
            format!(
                " (deductions: {})",
                report
                    .health
                    .found
                    .iter()
                    .map(|f| format!("{} -{}", f.ingredient, f.weight))
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        }
    );

    let with_alternatives: Vec<_> = report
        .safe_alternatives
        .iter()
        .filter(|(_, alts)| !alts.is_empty())
        .collect();
    if !with_alternatives.is_empty() {
        println!("\nSafe alternatives:");
        for (allergen, alts) in with_alternatives {
            println!("  {}: {}", display_name(allergen), alts.join(", "));
        }
    }

    if !report.predictive_allergens.is_empty() {
        println!(
            "\nOften associated with these foods: {}",
            report
                .predictive_allergens
                .iter()
                .map(|k| display_name(k))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(())
}
