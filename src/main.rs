use clap::Parser;
use rayon::ThreadPoolBuilder;
use serde_json::Value;
use std::path::Path;
use vrc_archiver::cli::{Args, Commands, MetaCommands};
use vrc_archiver::error::{ArchiverError, Result};
use vrc_archiver::{
    archive_folder, archive_monthly_folders, convert_image, export_images, list_monthly_folders,
    logger, read_metadata, utils, write_metadata, ArchiveFormat, ArchiveRunResult,
    EmbeddedMetadata, JsonIndexResolver, TargetFormat, TranscodeOptions,
};

fn main() {
    let args = Args::parse();
    logger::set_quiet_mode(args.quiet);
    logger::set_verbose_mode(args.verbose);

    if let Err(e) = run(args.command) {
        print_failure(&e.to_string());
        std::process::exit(1);
    }
}

/// Run-fatal errors from any subcommand surface as the same structured
/// `{"success": false, ...}` JSON instead of a Debug-printed `Err`.
fn print_failure(error: &str) {
    let failure = serde_json::json!({ "success": false, "error": error });
    println!(
        "{}",
        serde_json::to_string_pretty(&failure).unwrap_or_default()
    );
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Archive {
            source,
            output,
            format,
            threads,
        } => {
            setup_thread_pool(threads);
            let format: ArchiveFormat = format.parse()?;
            run_archive(&source, &output, format);
        }
        Commands::ArchiveMonthly {
            base,
            output,
            format,
            include_current,
            threads,
        } => {
            setup_thread_pool(threads);
            let format: ArchiveFormat = format.parse()?;
            let results = archive_monthly_folders(&base, &output, format, include_current);
            println!("{}", serde_json::to_string_pretty(&results)?);
            let failed = results
                .iter()
                .filter(|r| matches!(r, ArchiveRunResult::Failed(_)))
                .count();
            if failed > 0 {
                vrc_archiver::warn!("{} folder(s) failed to archive", failed);
            }
        }
        Commands::Folders {
            base,
            include_current,
        } => {
            let folders = list_monthly_folders(&base, include_current);
            println!("{}", serde_json::to_string_pretty(&folders)?);
        }
        Commands::Export {
            output,
            index,
            ids,
            format,
        } => {
            let format: ArchiveFormat = format.parse()?;
            let resolver = JsonIndexResolver::from_file(&index)?;
            let report = export_images(&resolver, &ids, &output, format)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Convert {
            input,
            output,
            format,
            quality,
            lossless,
        } => {
            let format = target_format(&output, format.as_deref())?;
            let options = TranscodeOptions::new(quality, lossless)?;
            let conversion = convert_image(&input, &output, format, &options)?;
            vrc_archiver::info!(
                "📈 {} -> {} ({} -> {})",
                input.display(),
                conversion.output_path.display(),
                utils::format_file_size(conversion.original_size),
                utils::format_file_size(conversion.output_size)
            );
        }
        Commands::Meta { command } => run_meta(command)?,
    }

    Ok(())
}

fn setup_thread_pool(threads: Option<usize>) {
    if let Some(num_threads) = threads {
        ThreadPoolBuilder::new()
            .num_threads(num_threads.max(1).min(num_cpus::get()))
            .build_global()
            .unwrap_or_else(|e| {
                vrc_archiver::warn!("Failed to set thread pool size: {}", e);
            });
    }
}

/// Archive one folder with an indicatif progress bar wired into the batch
/// runner's callback, printing the structured run result as JSON.
fn run_archive(source: &Path, output: &Path, format: ArchiveFormat) {
    let pb = utils::create_file_progress_bar(0);
    let result = archive_folder(
        source,
        output,
        format,
        Some(|seen: usize, total: usize, name: &str| {
            if pb.length() != Some(total as u64) {
                pb.set_length(total as u64);
            }
            pb.set_position(seen as u64);
            pb.set_message(name.to_string());
        }),
    );
    pb.finish_and_clear();

    match result {
        Ok(report) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).unwrap_or_default()
            );
        }
        Err(e) => {
            let failure = ArchiveRunResult::from_error(source, &e);
            println!(
                "{}",
                serde_json::to_string_pretty(&failure).unwrap_or_default()
            );
            std::process::exit(1);
        }
    }
}

fn run_meta(command: MetaCommands) -> Result<()> {
    match command {
        MetaCommands::Read { file } => {
            let metadata = read_metadata(&file);
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        MetaCommands::Write {
            file,
            world_id,
            world_name,
            friends,
        } => {
            let mut metadata: EmbeddedMetadata = read_metadata(&file);
            if let Some(world_id) = world_id {
                metadata.insert("vrc_world_id".to_string(), Value::String(world_id));
            }
            if let Some(world_name) = world_name {
                metadata.insert("vrc_world_name".to_string(), Value::String(world_name));
            }
            if !friends.is_empty() {
                metadata.insert(
                    "vrc_friends".to_string(),
                    Value::Array(friends.into_iter().map(Value::String).collect()),
                );
            }
            if write_metadata(&file, &metadata) {
                vrc_archiver::info!("✅ Metadata written to {}", file.display());
            } else {
                print_failure(&format!("failed to write metadata to {}", file.display()));
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn target_format(output: &Path, format: Option<&str>) -> Result<TargetFormat> {
    match format {
        Some(fmt) => fmt.parse(),
        None => output
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ArchiverError::UnsupportedImageFormat(
                    "output path has no extension and no --format was given".to_string(),
                )
            })?
            .parse(),
    }
}
