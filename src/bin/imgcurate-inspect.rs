//! Summarize a directory-per-class dataset and draw a random preview.

use std::collections::BTreeMap;
use std::path::PathBuf;

use imgcurate::config;
use imgcurate::dataset::{ImageFolderDataset, preview_random};
use imgcurate::logging;
use serde_json::json;

struct Options {
    root: PathBuf,
    preview: usize,
    seed: Option<u64>,
    json: bool,
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
        settings.preview.count,
        settings.preview.seed,
    )?
    else {
        return Ok(());
    };
    if let Err(err) = logging::init() {
        tracing::warn!("File logging disabled: {err}");
    }

    let dataset = ImageFolderDataset::new(&options.root).map_err(|err| err.to_string())?;
    let mut counts: BTreeMap<&str, usize> = dataset
        .class_names()
        .iter()
        .map(|name| (name.as_str(), 0))
        .collect();
    for entry in dataset.samples() {
        if let Some(name) = dataset.class_map().class_name(entry.label) {
            *counts.entry(name).or_default() += 1;
        }
    }
    let preview =
        preview_random(&dataset, options.preview, options.seed).map_err(|err| err.to_string())?;

    if options.json {
        let classes: Vec<_> = dataset
            .class_map()
            .iter()
            .map(|(name, label)| json!({ "name": name, "label": label, "count": counts[name] }))
            .collect();
        let items: Vec<_> = preview
            .iter()
            .map(|item| {
                json!({
                    "index": item.index,
                    "class": item.class_name,
                    "label": item.label,
                    "width": item.original_size.0,
                    "height": item.original_size.1,
                    "path": dataset.samples()[item.index].path.display().to_string(),
                })
            })
            .collect();
        let summary = json!({
            "root": options.root.display().to_string(),
            "samples": dataset.samples().len(),
            "classes": classes,
            "preview": items,
        });
        let text = serde_json::to_string_pretty(&summary).map_err(|err| err.to_string())?;
        println!("{text}");
        return Ok(());
    }

    println!(
        "{} images across {} classes in {}",
        dataset.samples().len(),
        dataset.class_map().len(),
        options.root.display()
    );
    for (name, label) in dataset.class_map().iter() {
        println!("  {label:>3}  {name}: {}", counts[name]);
    }
    if !preview.is_empty() {
        println!("Preview:");
        for (position, item) in preview.iter().enumerate() {
            println!(
                "  {}. #{} {} ({}x{}) {}",
                position + 1,
                item.index,
                item.class_name,
                item.original_size.0,
                item.original_size.1,
                dataset.samples()[item.index].path.display()
            );
        }
    }
    Ok(())
}

fn parse_args(
    args: Vec<String>,
    default_preview: usize,
    default_seed: Option<u64>,
) -> Result<Option<Options>, String> {
    let mut root = None;
    let mut preview = default_preview;
    let mut seed = default_seed;
    let mut json = false;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--preview" => {
                idx += 1;
                let value =
                    args.get(idx).ok_or_else(|| "--preview requires a value".to_string())?;
                preview = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --preview value: {value}"))?;
            }
            "--seed" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--seed requires a value".to_string())?;
                seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid --seed value: {value}"))?,
                );
            }
            "--json" => json = true,
            flag if flag.starts_with('-') => {
                return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
            }
            path => {
                if root.replace(PathBuf::from(path)).is_some() {
                    return Err("Only one dataset root may be given".to_string());
                }
            }
        }
        idx += 1;
    }

    let root = root.ok_or_else(|| format!("A dataset root is required\n\n{}", help_text()))?;
    Ok(Some(Options {
        root,
        preview,
        seed,
        json,
    }))
}

fn help_text() -> String {
    [
        "imgcurate-inspect",
        "",
        "Prints the class-to-label map, per-class counts and a random preview.",
        "",
        "Usage:",
        "  imgcurate-inspect <root> [options]",
        "",
        "Options:",
        "  --preview <usize>  Images to draw, at most 15 (default from config.toml, else 3).",
        "  --seed <u64>       Seed for a reproducible preview.",
        "  --json             Print a JSON summary instead of text.",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn defaults_apply_when_flags_are_absent() {
        let options = parse_args(args(&["data/train"]), 3, Some(1)).unwrap().unwrap();
        assert_eq!(options.root, PathBuf::from("data/train"));
        assert_eq!(options.preview, 3);
        assert_eq!(options.seed, Some(1));
        assert!(!options.json);
    }

    #[test]
    fn flags_override_defaults() {
        let options = parse_args(
            args(&["--preview", "8", "--seed", "11", "--json", "root"]),
            3,
            None,
        )
        .unwrap()
        .unwrap();
        assert_eq!(options.preview, 8);
        assert_eq!(options.seed, Some(11));
        assert!(options.json);
        assert!(parse_args(args(&["--preview", "x", "root"]), 3, None).is_err());
    }
}
