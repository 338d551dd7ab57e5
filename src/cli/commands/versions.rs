//! Versions command - list versions and their contents

use crate::cli::args::{OutputFormat, VersionsArgs};
use crate::config::Config;
use crate::error::FabulaResult;
use crate::store::{Manifest, ManifestStore};
use crate::ui::{self, UiContext};
use console::style;
use tracing::warn;

/// Execute the versions command
pub async fn execute(args: VersionsArgs, config: &Config) -> FabulaResult<()> {
    let store = ManifestStore::new(config.paths.versions_dir());
    let numbers = store.list_versions().await?;

    let mut manifests = Vec::with_capacity(numbers.len());
    for number in numbers {
        match store.read(number).await {
            Ok(Some(manifest)) => manifests.push(manifest),
            Ok(None) => {}
            Err(e) => warn!("Skipping version {number:02}: {e}"),
        }
    }

    if manifests.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect().with_plain(config.ui.plain);
                ui::step_info(&ctx, "No versions found");
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&manifests),
        OutputFormat::Json => print_json(&manifests)?,
        OutputFormat::Plain => print_plain(&manifests),
    }

    Ok(())
}

fn print_table(manifests: &[Manifest]) {
    println!(
        "{:<9} {:<17} {:<12} {:<30} {}",
        style("VERSION").bold(),
        style("CREATED").bold(),
        style("STYLE").bold(),
        style("MESSAGE").bold(),
        style("CONTENTS").bold()
    );
    println!("{}", "-".repeat(80));

    for manifest in manifests {
        let created = manifest.created.format("%Y-%m-%d %H:%M").to_string();
        println!(
            "{:<9} {:<17} {:<12} {:<30} {}",
            format!("{:02}", manifest.version),
            created,
            manifest.style,
            truncate(&manifest.message, 30),
            style(contents(manifest)).dim(),
        );
    }

    println!();
    println!("{} version(s)", manifests.len());
}

fn print_json(manifests: &[Manifest]) -> FabulaResult<()> {
    let json = serde_json::to_string_pretty(manifests)?;
    println!("{}", json);
    Ok(())
}

fn print_plain(manifests: &[Manifest]) {
    for manifest in manifests {
        println!("{:02}", manifest.version);
    }
}

fn contents(manifest: &Manifest) -> String {
    let images = manifest.images.len();
    let books = manifest.books.len();
    match (images, books) {
        (0, 0) => "empty".to_string(),
        (_, 0) => format!("{images} img"),
        (0, _) => format!("{books} pdf"),
        (_, _) => format!("{images} img, {books} pdf"),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(2)).collect();
    out.push_str("..");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn manifest(images: usize, books: usize) -> Manifest {
        let mut image_map = BTreeMap::new();
        for i in 0..images {
            image_map.insert(
                format!("p{:02}-mia", i + 1),
                crate::store::ImageEntry {
                    file: format!("p{:02}-mia-aaaaa.jpg", i + 1),
                    prompt_hash: "aaaaa".into(),
                    source_version: None,
                },
            );
        }
        Manifest {
            version: 1,
            created: Utc::now(),
            commit: "unknown".into(),
            message: "test".into(),
            style: "ink".into(),
            images: image_map,
            books: (0..books).map(|i| format!("mia-01-ink-{i}.pdf")).collect(),
            source_versions: None,
        }
    }

    #[test]
    fn contents_empty() {
        assert_eq!(contents(&manifest(0, 0)), "empty");
    }

    #[test]
    fn contents_images_only() {
        assert_eq!(contents(&manifest(12, 0)), "12 img");
    }

    #[test]
    fn contents_books_only() {
        assert_eq!(contents(&manifest(0, 1)), "1 pdf");
    }

    #[test]
    fn contents_both() {
        assert_eq!(contents(&manifest(3, 2)), "3 img, 2 pdf");
    }

    #[test]
    fn truncate_short_text_unchanged() {
        assert_eq!(truncate("short", 30), "short");
    }

    #[test]
    fn truncate_long_text_capped() {
        let long = "a".repeat(40);
        let out = truncate(&long, 30);
        assert_eq!(out.len(), 30);
        assert!(out.ends_with(".."));
    }
}
