use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use serde::Serialize;

use folio_store::{AuditReport, BoundCollection, Store, StoreOptions};
use folio_vfs::PhysicalFileSystem;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let Cli {
        command,
        root,
        format,
        ..
    } = cli;
    let root = match root {
        Some(root) => root,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let store = open_store(&root).await?;

    match command {
        Command::Collections(_) => cmd_collections(&store, format).await,
        Command::List(args) => cmd_list(&store, args, format).await,
        Command::Show(args) => cmd_show(&store, args, format).await,
        Command::Audit(_) => cmd_audit(&store, format).await,
    }
}

async fn open_store(root: &Path) -> anyhow::Result<Arc<Store>> {
    let root: PathBuf = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };
    let directory = PhysicalFileSystem::open(&root)
        .with_context(|| format!("invalid database root {}", root.display()))?;
    let options = StoreOptions::load(&directory)
        .await
        .with_context(|| format!("cannot read {}", folio_store::CONFIG_FILE_NAME))?;
    let registry = folio_model::registry(&options)?;
    let store = Store::open(directory, registry, options)
        .await
        .with_context(|| format!("cannot open database at {}", root.display()))?;
    Ok(store)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn find_collection<'a>(store: &'a Store, name: &str) -> anyhow::Result<&'a Arc<dyn BoundCollection>> {
    match store.collection_named(name) {
        Some(collection) => Ok(collection),
        None => bail!("no collection named '{name}'"),
    }
}

#[derive(Debug, Serialize)]
struct CollectionSummary {
    name: String,
    structure: String,
    document_type: String,
    documents: usize,
}

#[derive(Debug, Serialize)]
struct CollectionsReport {
    collections: Vec<CollectionSummary>,
    failures: Vec<String>,
}

async fn collections_report(store: &Store) -> anyhow::Result<CollectionsReport> {
    let mut collections = Vec::new();
    for collection in store.collections() {
        collections.push(CollectionSummary {
            name: collection.name().to_string(),
            structure: collection.structure().to_string(),
            document_type: collection.type_name().to_string(),
            documents: collection.ids().await?.len(),
        });
    }
    let failures = store.diagnostics().iter().map(|e| e.to_string()).collect();
    Ok(CollectionsReport {
        collections,
        failures,
    })
}

async fn cmd_collections(store: &Store, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let report = collections_report(store).await?;
    if format == OutputFormat::Json {
        print_json(&report)?;
        return Ok(ExitCode::SUCCESS);
    }
    if report.collections.is_empty() {
        println!("No collections.");
    }
    for c in &report.collections {
        println!(
            "{} {:<14} {:<10} {:<10} {} documents",
            "✓".green().bold(),
            c.name.bold(),
            c.structure.cyan(),
            c.document_type,
            c.documents
        );
    }
    for failure in &report.failures {
        println!("{} {}", "✗".red().bold(), failure);
    }
    Ok(ExitCode::SUCCESS)
}

async fn cmd_list(store: &Store, args: ListArgs, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let collection = find_collection(store, &args.collection)?;
    let mut ids = collection.ids().await?;
    ids.sort();
    match format {
        OutputFormat::Json => print_json(&ids)?,
        OutputFormat::Text => {
            for id in &ids {
                println!("{id}");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn cmd_show(store: &Store, args: ShowArgs, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let collection = find_collection(store, &args.collection)?;
    let Some(data) = collection.read_raw(&args.id).await? else {
        bail!("{}/{} not found", args.collection, args.id);
    };
    match format {
        OutputFormat::Json => {
            let document: serde_json::Value = serde_json::from_slice(&data)
                .with_context(|| format!("{}/{} is not valid JSON", args.collection, args.id))?;
            print_json(&serde_json::json!({
                "collection": args.collection,
                "id": args.id,
                "document": document,
            }))?;
        }
        OutputFormat::Text => print!("{}", String::from_utf8_lossy(&data)),
    }
    Ok(ExitCode::SUCCESS)
}

async fn audit_reports(store: &Store) -> anyhow::Result<Vec<AuditReport>> {
    let mut reports = Vec::new();
    for collection in store.collections() {
        reports.push(collection.audit().await?);
    }
    Ok(reports)
}

async fn cmd_audit(store: &Store, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let reports = audit_reports(store).await?;
    let clean = reports.iter().all(AuditReport::is_clean);

    if format == OutputFormat::Json {
        print_json(&reports)?;
    } else {
        for report in &reports {
            let mark = if report.is_clean() {
                "✓".green().bold()
            } else {
                "✗".red().bold()
            };
            println!(
                "{} {}: {} readable, {} unreadable",
                mark,
                report.collection.bold(),
                report.readable.len(),
                report.unreadable.len()
            );
            for failure in &report.unreadable {
                println!("    {} {}", failure.id.yellow(), failure.reason.dimmed());
            }
        }
        for failure in store.diagnostics() {
            println!("{} {}", "!".yellow().bold(), failure);
        }
    }

    Ok(if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
