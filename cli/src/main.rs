use crate::cli::{Args, Command, InputArgs};
use anyhow::{bail, Context};
use clap::Parser;
use rdf_lpg::delete::Deleter;
use rdf_lpg::import::Importer;
use rdf_lpg::io::{self as rdf_io, RdfFormat, RdfParser};
use rdf_lpg::mapping::MappingPolicy;
use rdf_lpg::preview::Previewer;
use rdf_lpg::storage::memory::{MemGraphSnapshot, MemGraphStore};
use serde_json::{json, Value};
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, stdin, stdout, Read, Write};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let matches = Args::parse();
    install_tracing_subscriber();
    match matches.command {
        Command::Import { input } => {
            let policy = load_policy(input.config.as_deref())?;
            let store = MemGraphStore::new();
            let summary = Importer::new(&store, policy)
                .import_from_reader(input_parser(&input)?, input_reader(&input)?)
                .await
                .context("The import failed")?;
            write_json(&json!({
                "summary": summary,
                "graph": graph_json(&store.snapshot().await),
            }))
        }
        Command::Delete { input, against } => {
            let policy = load_policy(input.config.as_deref())?;
            let store = MemGraphStore::new();
            for file in &against {
                info!("Importing {}", file.display());
                Importer::new(&store, policy.clone())
                    .import_from_reader(rdf_format_from_path(file)?, File::open(file)?)
                    .await
                    .with_context(|| format!("The import of {} failed", file.display()))?;
            }
            let summary = Deleter::new(&store, policy)
                .delete_from_reader(input_parser(&input)?, input_reader(&input)?)
                .await
                .context("The deletion failed")?;
            write_json(&json!({
                "summary": summary,
                "graph": graph_json(&store.snapshot().await),
            }))
        }
        Command::Preview { input } => {
            let policy = load_policy(input.config.as_deref())?;
            let graph = Previewer::new(policy)
                .preview_from_reader(input_parser(&input)?, input_reader(&input)?)
                .await
                .context("The preview failed")?;
            write_json(&serde_json::to_value(graph)?)
        }
    }
}

fn install_tracing_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_policy(config: Option<&Path>) -> anyhow::Result<MappingPolicy> {
    let Some(config) = config else {
        return Ok(MappingPolicy::default());
    };
    let file = File::open(config)
        .with_context(|| format!("Not able to open the configuration {}", config.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("The configuration {} is invalid", config.display()))
}

fn input_parser(input: &InputArgs) -> anyhow::Result<RdfParser> {
    let format = if let Some(format) = &input.format {
        rdf_format_from_name(format)?
    } else if let Some(file) = &input.file {
        rdf_format_from_path(file)?
    } else {
        bail!("The --format option must be set when reading from stdin")
    };
    Ok(rdf_io::parser(format, input.base.as_deref())?)
}

fn input_reader(input: &InputArgs) -> anyhow::Result<Box<dyn Read>> {
    Ok(match &input.file {
        Some(file) => Box::new(
            File::open(file).with_context(|| format!("Not able to open {}", file.display()))?,
        ),
        None => Box::new(stdin().lock()),
    })
}

/// Renders the nodes (ordered by identifier) and the relationships of a graph.
fn graph_json(snapshot: &MemGraphSnapshot) -> Value {
    let mut nodes = snapshot.nodes();
    nodes.sort_by(|a, b| a.uri().cmp(&b.uri()));
    let nodes = nodes
        .into_iter()
        .map(|node| {
            json!({
                "labels": node.labels,
                "properties": node.properties,
            })
        })
        .collect::<Vec<_>>();
    let relationships = snapshot
        .relationship_triples()
        .into_iter()
        .map(|(start, rel_type, end)| json!({ "start": start, "type": rel_type, "end": end }))
        .collect::<Vec<_>>();
    json!({ "nodes": nodes, "relationships": relationships })
}

fn write_json(value: &Value) -> anyhow::Result<()> {
    let mut stdout = stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(stdout.flush()?)
}

fn format_from_path<T>(
    path: &Path,
    from_extension: impl FnOnce(&str) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    if let Some(ext) = path.extension().and_then(OsStr::to_str) {
        from_extension(ext).map_err(|e| {
            e.context(format!(
                "Not able to guess the file format from file name extension '{ext}'"
            ))
        })
    } else {
        bail!(
            "The path {} has no extension to guess a file format from",
            path.display()
        )
    }
}

fn rdf_format_from_path(path: &Path) -> anyhow::Result<RdfFormat> {
    format_from_path(path, |ext| {
        RdfFormat::from_extension(ext)
            .with_context(|| format!("The file extension '{ext}' is unknown"))
    })
}

fn rdf_format_from_name(name: &str) -> anyhow::Result<RdfFormat> {
    if let Some(t) = RdfFormat::from_extension(name) {
        return Ok(t);
    }
    if let Some(t) = RdfFormat::from_media_type(name) {
        return Ok(t);
    }
    bail!("The file format '{name}' is unknown")
}
