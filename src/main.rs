use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};

use nexus::app::App;
use nexus::catalog::Catalog;
use nexus::config::Config;
use nexus::state::TerminalAppearance;
use nexus::storage::{Database, DatabaseError};
use nexus::ui;

/// Prefix shared by every preference key nexus writes.
const PREF_PREFIX: &str = "nexus.";

/// Get the config directory path (~/.config/nexus/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("nexus"))
}

/// Create the config directory if needed and restrict it to the current user.
fn prepare_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o700);
        if let Err(e) = std::fs::set_permissions(config_dir, perms) {
            tracing::warn!(
                path = %config_dir.display(),
                error = %e,
                "Failed to set config directory permissions to 0700"
            );
        }
    }
    Ok(())
}

/// Copy `src` over `dst` through a temp file and rename, so `dst` is never
/// left half-written.
fn atomic_copy(src: &Path, dst: &Path) -> Result<()> {
    // Unpredictable temp name; create_new refuses to follow a planted symlink
    let suffix = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let temp_path = dst.with_extension(format!("tmp.{:016x}", suffix));

    let content = std::fs::read(src)
        .with_context(|| format!("Failed to read '{}'", src.display()))?;

    let mut temp_file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .with_context(|| format!("Failed to create temporary file '{}'", temp_path.display()))?;

    let written = temp_file
        .write_all(&content)
        .and_then(|()| temp_file.sync_all());
    drop(temp_file);
    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e).with_context(|| {
            format!("Failed to write '{}': disk may be full", temp_path.display())
        });
    }

    #[cfg(windows)]
    if dst.exists() {
        if let Err(e) = std::fs::remove_file(dst) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e).with_context(|| format!("Failed to replace '{}'", dst.display()));
        }
    }

    if let Err(e) = std::fs::rename(&temp_path, dst) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e).with_context(|| {
            format!(
                "Failed to rename '{}' to '{}'",
                temp_path.display(),
                dst.display()
            )
        });
    }
    Ok(())
}

/// Validate a catalog file and install it as `catalog.toml`, keeping a
/// timestamped backup of the previous one.
fn import_catalog(import_file: &Path, config_dir: &Path) -> Result<PathBuf> {
    let source = import_file
        .canonicalize()
        .with_context(|| format!("Failed to resolve import file: {}", import_file.display()))?;
    if !std::fs::metadata(&source)?.is_file() {
        anyhow::bail!("Import path must be a regular file");
    }

    let content = std::fs::read_to_string(&source)
        .with_context(|| format!("Failed to read import file: {}", source.display()))?;
    let catalog = Catalog::from_toml_str(&content)
        .with_context(|| format!("'{}' is not a valid catalog", source.display()))?;
    if catalog.is_empty() {
        anyhow::bail!("Catalog '{}' has no categories", source.display());
    }

    let target = config_dir.join("catalog.toml");
    if target.exists() {
        let backup_name = format!("catalog.toml.backup.{}", Utc::now().format("%Y%m%d_%H%M%S"));
        let backup_path = config_dir.join(backup_name);
        atomic_copy(&target, &backup_path).with_context(|| {
            format!(
                "Failed to create backup at '{}'. Original file is unchanged.",
                backup_path.display()
            )
        })?;
        println!("Backed up existing catalog to: {}", backup_path.display());
    }

    atomic_copy(&source, &target)
        .with_context(|| format!("Failed to import catalog '{}'", source.display()))?;
    println!(
        "Imported {} links in {} categories to: {}",
        catalog.item_count(),
        catalog.categories().len(),
        target.display()
    );
    Ok(target)
}

async fn open_database(db_path: &Path) -> Result<Database> {
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    match Database::open(db_path_str).await {
        Ok(db) => Ok(db),
        Err(DatabaseError::InstanceLocked) => {
            eprintln!("Error: {}", DatabaseError::InstanceLocked);
            std::process::exit(1);
        }
        Err(e) => Err(e).context("Failed to open preferences database"),
    }
}

#[derive(Parser, Debug)]
#[command(name = "nexus", about = "Terminal link directory with favorites and themes")]
struct Args {
    /// Validate a TOML catalog and copy it to the config directory
    #[arg(long, value_name = "FILE")]
    import_catalog: Option<PathBuf>,

    /// Forget favorites and the theme choice, then exit
    #[arg(long)]
    reset_prefs: bool,

    /// Print stored preferences, then exit
    #[arg(long)]
    show_prefs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stderr keeps log output out of the TUI's stdout stream
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    prepare_config_dir(&config_dir)?;

    let config_path = config_dir.join("config.toml");
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;

    if let Some(import_file) = &args.import_catalog {
        let target = import_catalog(import_file, &config_dir)?;
        if let Some(custom) = config.catalog.as_ref().filter(|p| **p != target) {
            println!(
                "Note: config.toml points `catalog` at {}, which takes precedence.",
                custom.display()
            );
        }
    }

    let db = open_database(&config_dir.join("nexus.db")).await?;

    if args.reset_prefs {
        let removed = db
            .delete_preferences_by_prefix(PREF_PREFIX)
            .await
            .context("Failed to reset preferences")?;
        tracing::info!(removed, "Preferences reset");
        println!("Preferences reset ({} entries removed).", removed);
        return Ok(());
    }

    if args.show_prefs {
        let prefs = db
            .get_preferences_by_prefix(PREF_PREFIX)
            .await
            .context("Failed to read preferences")?;
        if prefs.is_empty() {
            println!("No stored preferences.");
        }
        for pref in prefs {
            println!("{} = {}  (updated {})", pref.key, pref.value, pref.updated_at);
        }
        return Ok(());
    }

    let catalog_path = config
        .catalog
        .clone()
        .unwrap_or_else(|| config_dir.join("catalog.toml"));
    let catalog = Catalog::load(&catalog_path)
        .with_context(|| format!("Failed to load catalog '{}'", catalog_path.display()))?;
    if catalog.is_empty() {
        tracing::warn!(path = %catalog_path.display(), "Catalog has no categories");
    }

    let host = TerminalAppearance::detect(&config.theme);
    let mut app = App::new(db, catalog, &config, &host).await;

    ui::run(&mut app).await?;

    println!("Goodbye!");
    Ok(())
}
