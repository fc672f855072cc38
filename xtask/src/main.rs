//! Workspace task runner. Invoke as `cargo xtask <command>`.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

/// Demo character used by `fetch-assets`. Rigged, one animation clip.
const CHARACTER_URL: &str = "https://raw.githubusercontent.com/KhronosGroup/glTF-Sample-Assets/main/Models/CesiumMan/glTF-Binary/CesiumMan.glb";

/// Backdrop image used by `fetch-assets`. Seeded so repeat fetches match.
const BACKDROP_URL: &str = "https://picsum.photos/seed/vitrine/1920/1080";

#[derive(Parser)]
#[command(name = "xtask", about = "Build tasks for the vitrine workspace")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the demo character and backdrop into assets/.
    FetchAssets {
        /// Overwrite files that already exist.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::FetchAssets { force } => fetch_assets(force),
    }
}

fn fetch_assets(force: bool) -> Result<()> {
    let assets = workspace_root()?.join("assets");
    fs::create_dir_all(&assets)
        .with_context(|| format!("creating {}", assets.display()))?;

    fetch_one(CHARACTER_URL, &assets.join("character.glb"), force)?;
    fetch_one(BACKDROP_URL, &assets.join("backdrop.jpg"), force)?;
    Ok(())
}

fn fetch_one(url: &str, dest: &Path, force: bool) -> Result<()> {
    if dest.exists() && !force {
        println!("{} already present, skipping (use --force to refetch)", dest.display());
        return Ok(());
    }

    println!("fetching {url}");
    let response = ureq::get(url)
        .call()
        .with_context(|| format!("requesting {url}"))?;
    let mut bytes = Vec::new();
    response
        .into_body()
        .into_reader()
        .read_to_end(&mut bytes)
        .with_context(|| format!("reading body of {url}"))?;
    if bytes.is_empty() {
        bail!("{url} returned an empty body");
    }

    fs::write(dest, &bytes).with_context(|| format!("writing {}", dest.display()))?;
    println!("wrote {} ({} bytes)", dest.display(), bytes.len());
    Ok(())
}

/// The workspace root is one level above the xtask crate.
fn workspace_root() -> Result<PathBuf> {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .map(Path::to_path_buf)
        .context("xtask crate has no parent directory")
}
