//! Squeezit CLI: compress or convert local images through a running server.
//!
//! Set SQUEEZIT_API_URL (default http://localhost:3000) or pass --api-url.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use squeezit_cli::{describe, init_tracing, load_image};
use squeezit_client::download::{save_archive, save_file};
use squeezit_client::{Action, ApiClient, UploadSession};
use squeezit_core::Format;

#[derive(Parser, Debug)]
#[command(name = "squeezit", about = "Compress or convert images")]
struct Args {
    /// Base URL of the Squeezit server
    #[arg(long, env = "SQUEEZIT_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Source format; files of any other format are skipped
    #[arg(long = "from", default_value = "jpeg")]
    source: Format,

    /// Target format
    #[arg(long = "to", default_value = "webp")]
    target: Format,

    /// Output directory
    #[arg(long, short, default_value = ".")]
    out: PathBuf,

    /// Also write every converted file into squeezit-images.zip
    #[arg(long)]
    zip: bool,

    /// Images to upload
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let client = ApiClient::new(args.api_url).context("Failed to create API client")?;

    let mut session = UploadSession::new(client);
    session.dispatch(Action::SelectSource(args.source));
    session.dispatch(Action::SelectTarget(args.target));

    let mut images = Vec::with_capacity(args.files.len());
    for path in &args.files {
        images.push(load_image(path).await?);
    }

    if !session.upload(images).await {
        anyhow::bail!("Nothing was converted (no {} files, or the upload failed)", args.source);
    }

    tokio::fs::create_dir_all(&args.out)
        .await
        .with_context(|| format!("Failed to create {}", args.out.display()))?;

    for file in &session.state().files {
        println!("{}", describe(file));
        save_file(&args.out, file).await?;
    }

    if args.zip && session.can_download_all() {
        if let Some(archive) = session.archive()? {
            let path = save_archive(&args.out, &archive).await?;
            tracing::info!(path = %path.display(), "Wrote archive");
        }
    }

    Ok(())
}
