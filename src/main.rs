use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use validate_client::{Cli, ConsoleSurface, FormController, HttpApi};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(cli: &Cli) {
    let default = if cli.verbose {
        "validate_client=debug"
    } else if cli.quiet {
        "validate_client=error"
    } else {
        "validate_client=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    if let Err(e) = cli.validate() {
        bail!(e);
    }

    let config = cli.client_config();
    let api = HttpApi::new(config.clone())?;
    let surface = Arc::new(ConsoleSurface::new(cli.quiet));
    let mut controller = FormController::new(api, Arc::clone(&surface), &config);

    controller
        .init()
        .await
        .context("could not reach the validation service")?;

    if cli.reset_log {
        controller.reset_log().await.context("log reset failed")?;
    }

    submit_document(&cli, &mut controller, &surface).await?;

    if let Some(dir) = &cli.download_log {
        match controller.download_log().await? {
            Some(download) => {
                let path = dir.join(&download.filename);
                tokio::fs::write(&path, &download.bytes)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                if !cli.quiet {
                    println!("log saved to {}", path.display());
                }
            }
            None => tracing::warn!("no log bundle available to download"),
        }
    }

    Ok(())
}

/// Walk the selection hierarchy as far as the arguments go. When a level is
/// missing, list what the server offers for it and stop; with a complete
/// selection and a document, submit and follow the validation run.
async fn submit_document(
    cli: &Cli,
    controller: &mut FormController<HttpApi, ConsoleSurface>,
    surface: &ConsoleSurface,
) -> Result<()> {
    let Some(standard) = cli.standard.clone() else {
        print_options("standards", &surface.standard_options(), cli.quiet);
        return Ok(());
    };
    controller.select_standard(Some(standard.clone())).await;
    let versions = surface.version_options();
    if versions.is_empty() {
        bail!("no versions available for standard {standard}");
    }

    let Some(version) = cli.standard_version.clone() else {
        print_options(&format!("versions of {standard}"), &versions, cli.quiet);
        return Ok(());
    };
    controller.select_version(Some(version.clone())).await;
    let encodings = surface.encoding_options();
    if encodings.is_empty() {
        bail!("no encodings available for {standard} {version}");
    }

    let Some(encoding) = cli.encoding.clone() else {
        print_options(
            &format!("encodings of {standard} {version}"),
            &encodings,
            cli.quiet,
        );
        print_options(
            &format!("message types of {standard} {version}"),
            &surface.message_type_options(),
            cli.quiet,
        );
        return Ok(());
    };
    controller.select_encoding(Some(encoding));
    controller.select_message_type(Some(cli.message_type.clone()));

    if let Some(path) = &cli.file {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        controller.pick_file(name, bytes).await?;
    } else if let Some(text) = &cli.text {
        controller.set_text(text);
        controller.validate().await?;
    }

    Ok(())
}

fn print_options(label: &str, options: &[String], quiet: bool) {
    if quiet {
        return;
    }
    println!("available {label}:");
    for option in options {
        println!("  {option}");
    }
}
