use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use databridge_form::FormRegistry;
use databridge_import::{FailureScope, ImportConfig, ImportReport, Importer};
use databridge_store::{DocId, DocumentStore, FsDocumentStore};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli.config)?;
    match cli.command {
        Command::Import(args) => cmd_import(config, args, cli.format),
        Command::Show(args) => cmd_show(config, args, cli.format),
        Command::Config(args) => cmd_config(config, args, cli.format),
    }
}

/// The configuration file is optional; without one every key is defaulted.
fn load_config(path: &Path) -> anyhow::Result<ImportConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no configuration file; using defaults");
        return Ok(ImportConfig::default());
    }
    ImportConfig::load(path).with_context(|| format!("failed to load {}", path.display()))
}

fn apply_roots(config: &mut ImportConfig, roots: RootArgs) {
    if let Some(data) = roots.data {
        config.data_root = data;
    }
    if let Some(store) = roots.store {
        config.store_root = store;
    }
    if let Some(forms) = roots.forms {
        config.forms_root = forms;
    }
}

fn cmd_import(mut config: ImportConfig, args: ImportArgs, format: OutputFormat) -> anyhow::Result<()> {
    apply_roots(&mut config, args.roots);
    config.dry_run |= args.dry_run;
    config.extensions.extend(args.extensions);

    let importer = Importer::from_config(config).context("failed to prepare import")?;
    let report = importer.run();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report, importer.config().dry_run),
    }
    Ok(())
}

fn print_report(report: &ImportReport, dry_run: bool) {
    let mark = if report.is_clean() { "✓".green().bold() } else { "!".yellow().bold() };
    let mode = if dry_run { " (dry run)" } else { "" };
    println!("{} Import finished{}", mark, mode.cyan());
    println!("  Created:   {}", report.created.to_string().green());
    println!("  Updated:   {}", report.updated.to_string().yellow());
    println!("  Unchanged: {}", report.unchanged.to_string().dimmed());
    println!("  Skipped:   {}", report.skipped);
    if report.failed > 0 {
        println!("  Failed:    {}", report.failed.to_string().red().bold());
    }
    for failure in &report.failures {
        let scope = match failure.scope {
            FailureScope::Object => "object",
            FailureScope::Directory => "directory",
        };
        println!(
            "  {} {} {}: {}",
            "✗".red(),
            scope,
            failure.path.display().to_string().bold(),
            failure.message.dimmed()
        );
    }
}

fn cmd_show(mut config: ImportConfig, args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    apply_roots(&mut config, args.roots);
    let id: DocId = args
        .id
        .parse()
        .with_context(|| format!("invalid document id {:?}", args.id))?;

    let forms = FormRegistry::load_dir(&config.forms_root)
        .with_context(|| format!("failed to load forms from {}", config.forms_root.display()))?;
    let store = FsDocumentStore::open_dir(&config.store_root, Arc::new(forms))?;
    let Some(doc) = store.open(id)? else {
        bail!("no document {} in {}", id, config.store_root.display());
    };

    let xml = doc.to_xml()?;
    match format {
        OutputFormat::Text => println!("{xml}"),
        OutputFormat::Json => {
            let value = serde_json::json!({
                "id": id,
                "path": store.locate(id),
                "form": doc.form_ref(),
                "xml": xml,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

fn cmd_config(mut config: ImportConfig, args: ConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    apply_roots(&mut config, args.roots);
    match format {
        OutputFormat::Text => print!("{}", config.to_toml()?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}
