// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::env;
use std::path::Path;

use perfume_catalog::{
    derive, insert_products, load_csv, load_with_fallback, logging, provider_from_config,
    setup_database, verify_count, Config, FilterState, SortKey,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = Config::load().context("Failed to load configuration")?;

    match args.get(1).map(String::as_str) {
        Some("import") => {
            logging::init_stderr(&config);
            let csv_path = args.get(2).context("Usage: perfume-catalog import <file.csv>")?;
            run_import(&config, Path::new(csv_path))?;
        }
        Some("list") => {
            logging::init_stderr(&config);
            let sort = args.get(2).map(String::as_str).unwrap_or("nombrePerfume");
            run_list(&config, sort)?;
        }
        _ => {
            // UI mode (default)
            run_ui_mode(&config)?;
        }
    }

    Ok(())
}

fn run_import(config: &Config, csv_path: &Path) -> Result<()> {
    println!("Importing perfumes: CSV → SQLite");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load CSV
    let batch = load_csv(csv_path)
        .with_context(|| format!("Failed to read {}", csv_path.display()))?;
    println!("✓ Loaded {} perfumes ({} rejected)", batch.products.len(), batch.rejected);

    // 2. Setup database
    let conn = Connection::open(&config.db_path)
        .with_context(|| format!("Failed to open {}", config.db_path.display()))?;
    setup_database(&conn)?;
    println!("✓ Database initialized with WAL mode");

    // 3. Insert
    let (inserted, duplicates) = insert_products(&conn, &batch.products)?;
    println!("✓ Inserted: {} perfumes", inserted);
    println!("✓ Skipped duplicates: {}", duplicates);

    // 4. Verify count
    let count = verify_count(&conn)?;
    println!("✓ Database contains {} perfumes", count);

    Ok(())
}

/// Non-interactive listing: the default filters with the given sort key.
fn run_list(config: &Config, sort: &str) -> Result<()> {
    let sort_key: SortKey = sort.parse()?;
    let provider = provider_from_config(config);
    let (products, report) = load_with_fallback(provider.as_ref(), config.fallback);

    if let Some(err) = &report.error {
        eprintln!("⚠ {} unavailable ({}), showing fallback", report.provider, err);
    }

    let view = derive(&products, &FilterState::default(), sort_key);
    println!("{}", perfume_catalog::grid::count_label(view.len()));
    for p in &view {
        println!(
            "{:<24} {:<20} {:>6} {:>8}  {}",
            p.name,
            p.brand,
            p.presentation,
            perfume_catalog::grid::format_price(p.price),
            p.perfume_type.label()
        );
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    use perfume_catalog::{Catalog, RecordStore};
    use std::sync::mpsc;
    use std::thread;

    // Printed before the UI owns the terminal
    if let Err(e) = logging::init_file(config) {
        eprintln!(
            "⚠ Logging disabled: cannot open {} ({})",
            config.log_file.display(),
            e
        );
    }

    // The one load runs on a worker; the UI starts empty in the loading state
    let (tx, rx) = mpsc::channel();
    let provider = provider_from_config(config);
    let fallback = config.fallback;
    thread::spawn(move || {
        let result = load_with_fallback(provider.as_ref(), fallback);
        let _ = tx.send(result);
    });

    let mut app = ui::App::new(Catalog::new(RecordStore::loading()), Some(rx));
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin catalog-server --features server");
    std::process::exit(1);
}
