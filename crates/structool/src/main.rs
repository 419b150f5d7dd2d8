use anyhow::{Context, Result};
use blockmodel::{MaterialCache, ModelStore, Resolver};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "structool")]
#[command(about = "Convert voxel structure files to GLB scene containers", long_about = None)]
struct Cli {
    /// Input structure file
    input: PathBuf,

    /// Output .glb path
    output: PathBuf,

    /// Asset store root holding models/ and textures/
    #[arg(short, long, default_value = "assets")]
    assets: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    convert(&cli)
}

fn convert(cli: &Cli) -> Result<()> {
    let bytes =
        fs::read(&cli.input).with_context(|| format!("reading {}", cli.input.display()))?;
    let tree = nbt::decode(&bytes).context("decoding structure tag tree")?;
    let (dims, grid, palette) =
        scene::decode_structure(&tree).context("validating structure")?;
    info!(
        width = dims.width,
        height = dims.height,
        depth = dims.depth,
        palette = palette.len(),
        "structure decoded"
    );

    // Cache and resolver live for exactly one conversion
    let resolver = Resolver::new(ModelStore::new(&cli.assets));
    let cache = MaterialCache::new();
    let graph = scene::assemble(&dims, &grid, &palette, &cache, &resolver);
    let stats = resolver.stats();
    info!(
        placed = graph.stats.placed,
        skipped = graph.stats.skipped,
        blocks = cache.len(),
        model_misses = stats.model_misses(),
        texture_misses = stats.texture_misses(),
        "scene graph assembled"
    );

    let glb = scene::serialize_glb(&graph).context("encoding scene container")?;

    // Nothing is persisted unless the whole container encoded successfully
    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(&cli.output, &glb)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    info!(path = %cli.output.display(), bytes = glb.len(), "scene container written");

    Ok(())
}
