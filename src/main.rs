mod args;
mod emit;
mod encode;
mod mime;
mod table;
mod templates;
mod utils;
mod walk;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use args::Args;
use emit::{write_outputs, Outputs};
use encode::{encode_file, identifier};
use utils::{render, Ctx};

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .format_timestamp(None)
        .format_target(false)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            log::error!("Conversion failed!");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut ctx = Ctx::new(args.input.clone(), args.output.clone(), !args.no_gzip)?;

    convert_files(&mut ctx)?;
    let outputs = write_outputs(&ctx).context("failed to write output files")?;

    print_summary(&ctx, &outputs);
    Ok(())
}

fn convert_files(ctx: &mut Ctx) -> Result<()> {
    for found in walk::files(&ctx.src)? {
        let found = match found {
            Ok(found) => found,
            Err(err) => {
                ctx.skip(err.context("Skipping unreadable entry"));
                continue;
            }
        };

        let encoded = match encode_file(&found.path, ctx.gzip) {
            Ok(encoded) => encoded,
            Err(err) => {
                ctx.skip(err.context(format!("Skipping {}", found.rel.display())));
                continue;
            }
        };

        let asset = ctx.table.push(identifier(&found.rel), &found.rel, encoded);
        let encoded = &asset.encoded;
        if encoded.compressed {
            log::info!(
                "Converted: {} -> {} ({} -> {} bytes, ratio: {:.2}x)",
                asset.rel.display(),
                asset.id,
                encoded.original_size,
                encoded.size(),
                encoded.ratio()
            );
        } else {
            log::info!(
                "Converted: {} -> {} ({} bytes, not compressed)",
                asset.rel.display(),
                asset.id,
                encoded.original_size
            );
        }
        log::debug!("{} served as {}", asset.rel.display(), asset.content_type);
    }
    Ok(())
}

fn print_summary(ctx: &Ctx, outputs: &Outputs) {
    let totals = &ctx.table.totals;
    log::info!(
        "Successfully generated {} and {}",
        outputs.header.display(),
        outputs.source.display()
    );
    log::info!(
        "Total files converted: {} ({} table entries)",
        totals.files,
        ctx.table.entries.len()
    );
    if ctx.skipped > 0 {
        log::warn!("Files skipped: {}", ctx.skipped);
    }
    log::info!("Total original size: {} bytes", totals.original);
    log::info!("Total embedded size: {} bytes", totals.embedded);
    if let (Some(ratio), Some(saved)) = (totals.ratio(), totals.saved_percent()) {
        log::info!("Overall compression ratio: {ratio:.2}x");
        log::info!(
            "Space saved: {} bytes ({saved:.1}%)",
            totals.original - totals.embedded
        );
    }

    log::info!(
        "Compile {} and #include \"{}\" in your HTTP server code.",
        outputs.source.display(),
        outputs
            .header
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default()
    );
    if ctx.gzip {
        log::info!("Compressed files are gzip streams; serve them with `Content-Encoding: gzip`.");
    }
}
