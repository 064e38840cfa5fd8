//! Download one class of images into a train/val folder layout.

use std::path::PathBuf;

use imgcurate::config;
use imgcurate::download::{self, DownloadOptions, UrlListSearch};
use imgcurate::logging;

struct Options {
    query: String,
    urls_file: PathBuf,
    download: DownloadOptions,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let settings = config::load_or_default().map_err(|err| err.to_string())?;
    let Some(options) = parse_args(
        std::env::args().skip(1).collect(),
        settings.download.to_options(),
    )?
    else {
        return Ok(());
    };
    if let Err(err) = logging::init() {
        tracing::warn!("File logging disabled: {err}");
    }

    let search = UrlListSearch::from_file(&options.urls_file).map_err(|err| err.to_string())?;
    let report = download::download_class_images(&search, &options.query, &options.download)
        .map_err(|err| err.to_string())?;
    println!(
        "Downloaded {} of {} images for class '{}' ({} skipped)",
        report.downloaded, report.requested, report.class_name, report.skipped
    );
    println!("  train: {}", report.train_dir.display());
    println!("  val:   {}", report.val_dir.display());
    Ok(())
}

fn parse_args(args: Vec<String>, defaults: DownloadOptions) -> Result<Option<Options>, String> {
    let mut download = defaults;
    let mut query = None;
    let mut urls_file = None;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--query" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--query requires a value".to_string())?;
                query = Some(value.to_string());
            }
            "--urls" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--urls requires a value".to_string())?;
                urls_file = Some(PathBuf::from(value));
            }
            "--out" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--out requires a value".to_string())?;
                download.output_dir = PathBuf::from(value);
            }
            "--max" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--max requires a value".to_string())?;
                download.max_results = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --max value: {value}"))?;
            }
            "--split" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--split requires a value".to_string())?;
                download.split = value
                    .parse::<f64>()
                    .map_err(|_| format!("Invalid --split value: {value}"))?;
            }
            "--seed" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--seed requires a value".to_string())?;
                download.seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid --seed value: {value}"))?,
                );
            }
            unknown => {
                return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
            }
        }
        idx += 1;
    }

    let query = query.ok_or_else(|| "--query is required".to_string())?;
    let urls_file = urls_file.ok_or_else(|| "--urls is required".to_string())?;
    Ok(Some(Options {
        query,
        urls_file,
        download,
    }))
}

fn help_text() -> String {
    [
        "imgcurate-download",
        "",
        "Fetches search result URLs once each and files them under train/ and val/.",
        "",
        "Usage:",
        "  imgcurate-download --query <class> --urls <file> [options]",
        "",
        "Options:",
        "  --query <text>   Class query; its lowercase form names the class folder (required).",
        "  --urls <file>    Search results, one URL per line (required).",
        "  --out <dir>      Output root (default from config.toml, else images).",
        "  --max <usize>    Maximum results to use (default: 5).",
        "  --split <f64>    Fraction assigned to train/ (default: 0.8).",
        "  --seed <u64>     Seed for the result shuffle.",
    ]
    .join("\n")
}
