//! Remove corrupted and duplicate `.jpg` files from a directory tree.

use std::path::PathBuf;

use imgcurate::{logging, sanitize};

struct Options {
    dir: PathBuf,
    corrupted_only: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = logging::init() {
        tracing::warn!("File logging disabled: {err}");
    }

    if options.corrupted_only {
        let report =
            sanitize::remove_corrupted_images(&options.dir).map_err(|err| err.to_string())?;
        println!(
            "Scanned {} files, removed {} corrupted",
            report.scanned, report.removed
        );
        print_failures(&report.delete_failures);
        return Ok(());
    }

    let report = sanitize::remove_duplicate_images(&options.dir).map_err(|err| err.to_string())?;
    println!(
        "Removed {} corrupted and {} duplicate images from {}",
        report.corrupted.removed,
        report.duplicates,
        options.dir.display()
    );
    if report.unreadable > 0 {
        println!("{} files could not be hashed and were kept", report.unreadable);
    }
    print_failures(&report.corrupted.delete_failures);
    print_failures(&report.delete_failures);
    Ok(())
}

fn print_failures(paths: &[PathBuf]) {
    for path in paths {
        println!("  could not delete: {}", path.display());
    }
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut dir = None;
    let mut corrupted_only = false;
    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--corrupted-only" => corrupted_only = true,
            flag if flag.starts_with('-') => {
                return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
            }
            path => {
                if dir.replace(PathBuf::from(path)).is_some() {
                    return Err("Only one directory may be given".to_string());
                }
            }
        }
    }
    let dir = dir.ok_or_else(|| format!("A directory is required\n\n{}", help_text()))?;
    Ok(Some(Options {
        dir,
        corrupted_only,
    }))
}

fn help_text() -> String {
    [
        "imgcurate-sanitize",
        "",
        "Deletes .jpg files that fail to decode, then byte-identical duplicates.",
        "",
        "Usage:",
        "  imgcurate-sanitize <dir> [--corrupted-only]",
        "",
        "Options:",
        "  --corrupted-only  Skip the duplicate pass.",
    ]
    .join("\n")
}
