//! SSD CLI - Command-line tool for SSD scene description files.
//!
//! This is the main entry point for the `ssd` command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use ssd::format::file::{ensure_extension, SceneFormat, SSD_EXTENSION};
use ssd::format::{DecodeOptions, DEFAULT_MAX_DEPTH};
use ssd::prelude::*;

/// SSD - scene description file tool
#[derive(Parser)]
#[command(name = "ssd")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the node tree of a scene file
    Inspect {
        /// Input scene file (.ssd, .ssda or .ssd_json)
        #[arg(short, long)]
        input: PathBuf,

        /// Deepest nesting accepted while decoding
        #[arg(long, env = "SSD_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Show attribute values
        #[arg(long)]
        values: bool,
    },

    /// Check that scene files decode, validate and re-encode to identical bytes
    Verify {
        /// A scene file or a directory to search
        #[arg(short, long)]
        path: PathBuf,

        /// Filter pattern for file names (glob-style)
        #[arg(short, long)]
        filter: Option<String>,

        /// Deepest nesting accepted while decoding
        #[arg(long, env = "SSD_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },

    /// Convert between the binary, XML and JSON forms
    Convert {
        /// Input scene file
        #[arg(short, long)]
        input: PathBuf,

        /// Output scene file; `.ssd` is appended when there is no extension
        #[arg(short, long)]
        output: PathBuf,

        /// Container version to write
        #[arg(long)]
        format_version: Option<u8>,
    },

    /// Write a small demonstration scene
    Sample {
        /// Output scene file
        #[arg(short, long, env = "OUTPUT_FILE")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Inspect {
            input,
            max_depth,
            values,
        } => {
            cmd_inspect(&input, max_depth, values)?;
        }
        Commands::Verify {
            path,
            filter,
            max_depth,
        } => {
            cmd_verify(&path, filter.as_deref(), max_depth)?;
        }
        Commands::Convert {
            input,
            output,
            format_version,
        } => {
            cmd_convert(&input, &output, format_version)?;
        }
        Commands::Sample { output } => {
            cmd_sample(&output)?;
        }
    }

    Ok(())
}

fn read_scene(path: &Path, max_depth: usize) -> Result<Document> {
    let format = SceneFormat::from_path(path)?;
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    format
        .decode_with(&data, &DecodeOptions { max_depth })
        .with_context(|| format!("Failed to decode {}", path.display()))
}

fn cmd_inspect(input: &Path, max_depth: usize, values: bool) -> Result<()> {
    let start = Instant::now();
    let document = read_scene(input, max_depth)?;

    println!(
        "{}: version {}, {} top-level nodes, {} nodes total (decoded in {:?})",
        input.display(),
        document.version,
        document.nodes.len(),
        document.node_count(),
        start.elapsed()
    );

    for node in &document.nodes {
        print_node(node, 0, values);
    }

    if let Err(e) = document.validate() {
        warn!("{}", e);
        println!("\nWarning: {}", e);
    }

    Ok(())
}

fn print_node(node: &Node, depth: usize, values: bool) {
    let indent = "  ".repeat(depth);
    println!("{}[{}] {}", indent, node.id, node.name);

    for attribute in &node.attributes {
        let data_type = attribute.data_type();
        if values {
            println!(
                "{}  .{}: {}[{}] = {}",
                indent,
                attribute.name,
                data_type,
                attribute.element_count(),
                preview(&attribute.value)
            );
        } else {
            println!(
                "{}  .{}: {}[{}]",
                indent,
                attribute.name,
                data_type,
                attribute.element_count()
            );
        }

        if let Some(embedded) = attribute.value.as_nodes() {
            for node in embedded {
                print_node(node, depth + 2, values);
            }
        }
    }

    for child in &node.children {
        print_node(child, depth + 1, values);
    }
}

/// Short rendering of a value, eliding long arrays.
fn preview(value: &Value) -> String {
    const LIMIT: usize = 8;

    fn list<T: std::fmt::Debug>(values: &[T]) -> String {
        let shown: Vec<String> = values.iter().take(LIMIT).map(|v| format!("{:?}", v)).collect();
        if values.len() > LIMIT {
            format!("[{}, ... ({} more)]", shown.join(", "), values.len() - LIMIT)
        } else {
            format!("[{}]", shown.join(", "))
        }
    }

    match value {
        Value::Byte(v) => list(v),
        Value::UInt(v) => list(v),
        Value::Int(v) => list(v),
        Value::Int16(v) => list(v),
        Value::UInt16(v) => list(v),
        Value::Float(v) => list(v),
        Value::Uid(v) => list(&v.iter().map(|r| Uid::to_raw(*r)).collect::<Vec<_>>()),
        Value::Char(v) => list(v),
        Value::SerializedClass(v) => format!("{} embedded nodes", v.len()),
    }
}

fn cmd_verify(path: &Path, filter: Option<&str>, max_depth: usize) -> Result<()> {
    let pattern = filter
        .map(glob::Pattern::new)
        .transpose()
        .context("Invalid filter pattern")?;

    let files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(SSD_EXTENSION))
        .filter(|p| {
            pattern.as_ref().map_or(true, |pattern| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, |name| pattern.matches(name))
            })
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No .{} files found under {}", SSD_EXTENSION, path.display());
    }

    println!("Verifying {} files...", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let nodes = AtomicUsize::new(0);
    let options = DecodeOptions { max_depth };

    let failures: Vec<(PathBuf, anyhow::Error)> = files
        .par_iter()
        .filter_map(|file| {
            let result = verify_file(file, &options);
            pb.inc(1);
            match result {
                Ok(count) => {
                    nodes.fetch_add(count, Ordering::Relaxed);
                    None
                }
                Err(e) => Some((file.clone(), e)),
            }
        })
        .collect();

    pb.finish_with_message("Done");

    for (file, error) in &failures {
        eprintln!("FAIL {}: {:#}", file.display(), error);
    }

    println!(
        "Verified {} files ({} nodes) in {:?}: {} passed, {} failed",
        files.len(),
        nodes.load(Ordering::Relaxed),
        start.elapsed(),
        files.len() - failures.len(),
        failures.len()
    );

    if !failures.is_empty() {
        anyhow::bail!("{} files failed verification", failures.len());
    }

    Ok(())
}

/// Decode, validate and re-encode one file; returns its node count.
fn verify_file(path: &Path, options: &DecodeOptions) -> Result<usize> {
    let data = fs::read(path).context("Failed to read file")?;
    let document = Document::parse_with(&data, options).context("Failed to decode")?;
    document.validate().context("Invalid references")?;

    let encoded = document.to_bytes().context("Failed to re-encode")?;
    if encoded != data {
        let offset = encoded
            .iter()
            .zip(&data)
            .position(|(a, b)| a != b)
            .unwrap_or(encoded.len().min(data.len()));
        anyhow::bail!("Re-encoded bytes differ at offset {}", offset);
    }

    debug!(path = %path.display(), nodes = document.node_count(), "verified");
    Ok(document.node_count())
}

fn cmd_convert(input: &Path, output: &Path, format_version: Option<u8>) -> Result<()> {
    let output = if output.extension().is_none() {
        ensure_extension(output)
    } else {
        output.to_path_buf()
    };

    println!("Converting: {} -> {}", input.display(), output.display());

    let mut document = read_file(input).with_context(|| format!("Failed to read {}", input.display()))?;
    if let Some(version) = format_version {
        document.version = FormatVersion::from_u8(version)?;
    }

    write_file(&output, &document).with_context(|| format!("Failed to write {}", output.display()))?;
    info!(nodes = document.node_count(), version = %document.version, "converted");

    println!("Conversion complete");

    Ok(())
}

fn cmd_sample(output: &Path) -> Result<()> {
    let document = sample_scene().context("Failed to build sample scene")?;
    write_file(output, &document).with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Wrote {} nodes to {}", document.node_count(), output.display());

    Ok(())
}

/// A lit, textured quad with its mesh, material and shader.
fn sample_scene() -> ssd::Result<Document> {
    let mut scene = SceneBuilder::new();

    let mesh = Mesh::new("quad")
        .with_positions(vec![
            -0.5, -0.5, 0.0, 0.5, -0.5, 0.0, 0.5, 0.5, 0.0, -0.5, 0.5, 0.0,
        ])
        .with_normals([0.0, 0.0, 1.0].repeat(4))
        .with_tex_coords(vec![
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
        ])
        .with_indices(vec![0, 1, 2, 0, 2, 3])
        .build(&mut scene)?;
    let material = Material::new("orange", [1.0, 0.5, 0.0]).build(&mut scene)?;

    let mut quad = Object::new(1, "quad");
    quad.renderer = Some(Renderer::new(mesh.id).with_material(material.id));
    let quad = quad.build(&mut scene)?;

    let mut lamp = Object::new(2, "lamp");
    lamp.transform.parent = Some(quad.id);
    lamp.transform.position = [0.0, 2.0, 1.0];
    lamp.light = Some(Light {
        intensity: 4.0,
        ..Light::default()
    });
    let lamp = lamp.build(&mut scene)?;

    let shader = Shader::glsl().build(&mut scene)?;
    scene.add(quad).add(lamp).add(mesh).add(material).add(shader);

    Ok(scene.finish())
}
