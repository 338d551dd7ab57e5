//! Content base validation
//!
//! Everything the generate/book commands assume about the content base is
//! checked here and reported as findings instead of hard failures, so one
//! broken file never hides the rest. Errors fail the `check` command;
//! warnings do not.

use crate::config::schema::PathsConfig;
use crate::content::catalog::{Character, Location, Story, Style};
use crate::content::page::{parse_stem, PageSpec};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One validation result
#[derive(Debug, Clone)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Error => write!(f, "error: {}", self.message),
            Severity::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// All findings from one validation pass
#[derive(Debug, Default)]
pub struct Report {
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn errors(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    pub fn warnings(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }
}

/// Validate the whole content base
pub fn run(paths: &PathsConfig) -> Report {
    let mut report = Report::default();

    if !paths.content.is_dir() {
        report.findings.push(Finding::error(format!(
            "content directory not found: {}",
            paths.content.display()
        )));
        return report;
    }

    let styles = check_styles(paths, &mut report);
    check_story(paths, &mut report);
    let characters = check_characters(paths, &mut report);
    let locations = check_locations(paths, &mut report);
    let objects = check_pages(paths, &characters, &locations, &mut report);
    check_refs(paths, &styles, &characters, &locations, &objects, &mut report);

    report
}

fn check_styles(paths: &PathsConfig, report: &mut Report) -> BTreeSet<String> {
    let path = paths.styles_path();
    if !path.is_file() {
        report.findings.push(Finding::warning(
            "styles.yaml not found; generation needs at least one style",
        ));
        return BTreeSet::new();
    }

    match read_yaml::<BTreeMap<String, Style>>(&path) {
        Ok(styles) => {
            if styles.is_empty() {
                report
                    .findings
                    .push(Finding::warning("styles.yaml defines no styles"));
            }
            styles.into_keys().collect()
        }
        Err(reason) => {
            report
                .findings
                .push(Finding::error(format!("styles.yaml: {reason}")));
            BTreeSet::new()
        }
    }
}

fn check_story(paths: &PathsConfig, report: &mut Report) {
    let path = paths.story_path();
    if !path.is_file() {
        report.findings.push(Finding::warning(
            "story.yaml not found; prompts will carry no story setting",
        ));
        return;
    }
    if let Err(reason) = read_yaml::<Story>(&path) {
        report
            .findings
            .push(Finding::error(format!("story.yaml: {reason}")));
    }
}

fn check_characters(paths: &PathsConfig, report: &mut Report) -> BTreeSet<String> {
    let ids = scan_id_dir::<Character>(
        &paths.characters_dir(),
        "characters",
        report,
        |id, character, report| {
            if character.name.is_none() {
                report.findings.push(Finding::error(format!(
                    "characters/{id}.yaml: missing required field 'name'"
                )));
            }
            if character.age.is_none() {
                report.findings.push(Finding::error(format!(
                    "characters/{id}.yaml: missing required field 'age'"
                )));
            }
        },
    );

    if ids.is_empty() {
        report
            .findings
            .push(Finding::error("no characters defined under characters/"));
    }
    ids
}

fn check_locations(paths: &PathsConfig, report: &mut Report) -> BTreeSet<String> {
    scan_id_dir::<Location>(
        &paths.locations_dir(),
        "locations",
        report,
        |id, location, report| {
            if location.display_name.is_none() {
                report.findings.push(Finding::error(format!(
                    "locations/{id}.yaml: missing required field 'display_name'"
                )));
            }
        },
    )
}

/// Scan pages; returns the set of object ids referenced anywhere
fn check_pages(
    paths: &PathsConfig,
    characters: &BTreeSet<String>,
    locations: &BTreeSet<String>,
    report: &mut Report,
) -> BTreeSet<String> {
    let dir = paths.pages_dir();
    let mut objects = BTreeSet::new();

    if !dir.is_dir() {
        report
            .findings
            .push(Finding::error("pages directory not found"));
        return objects;
    }

    let mut seen_numbers: BTreeMap<u32, String> = BTreeMap::new();
    let mut found_any = false;

    for name in yaml_names(&dir) {
        found_any = true;
        let stem = name.trim_end_matches(".yaml");

        let Some((number, filename_characters)) = parse_stem(stem) else {
            report.findings.push(Finding::error(format!(
                "pages/{name}: file name must match p{{NN}}-{{characters}}.yaml"
            )));
            continue;
        };

        if number_width(stem) != 2 {
            report.findings.push(Finding::warning(format!(
                "pages/{name}: page numbers are zero-padded to two digits"
            )));
        }

        if let Some(other) = seen_numbers.insert(number, stem.to_string()) {
            report.findings.push(Finding::warning(format!(
                "pages/{name}: page number {number} is also used by {other}.yaml"
            )));
        }

        let spec = match read_yaml::<PageSpec>(&dir.join(&name)) {
            Ok(spec) => spec,
            Err(reason) => {
                report
                    .findings
                    .push(Finding::error(format!("pages/{name}: {reason}")));
                continue;
            }
        };

        if spec.visual.is_empty() {
            report.findings.push(Finding::error(format!(
                "pages/{name}: missing 'visual' scene description"
            )));
        }
        if spec.text.trim().is_empty() {
            report
                .findings
                .push(Finding::warning(format!("pages/{name}: has no story text")));
        }

        match &spec.location {
            Some(location) if !locations.contains(location) => {
                report.findings.push(Finding::error(format!(
                    "pages/{name}: unknown location '{location}'"
                )));
            }
            Some(_) => {}
            None => {
                report
                    .findings
                    .push(Finding::warning(format!("pages/{name}: no location set")));
            }
        }

        let effective = if spec.characters.is_empty() {
            filename_characters.clone()
        } else {
            spec.characters.clone()
        };
        for character in &effective {
            if !characters.contains(character) {
                report.findings.push(Finding::error(format!(
                    "pages/{name}: unknown character '{character}'"
                )));
            }
        }
        if !spec.characters.is_empty() && spec.characters != filename_characters {
            report.findings.push(Finding::warning(format!(
                "pages/{name}: 'characters' does not match the file name segments"
            )));
        }

        objects.extend(spec.objects.iter().cloned());
    }

    if !found_any {
        report
            .findings
            .push(Finding::warning("pages directory has no page files"));
    }

    objects
}

fn check_refs(
    paths: &PathsConfig,
    styles: &BTreeSet<String>,
    characters: &BTreeSet<String>,
    locations: &BTreeSet<String>,
    objects: &BTreeSet<String>,
    report: &mut Report,
) {
    let refs = paths.refs_dir();
    let groups: [(&str, &BTreeSet<String>); 4] = [
        ("styles", styles),
        ("characters", characters),
        ("locations", locations),
        ("objects", objects),
    ];

    for (group, ids) in groups {
        let dir = refs.join(group);
        let names = if dir.is_dir() { jpg_names(&dir) } else { vec![] };

        for name in &names {
            if !valid_ref_name(name) {
                report.findings.push(Finding::warning(format!(
                    "ref/{group}/{name}: reference images are named {{id}}-{{NN}}.jpg"
                )));
            }
        }

        // Objects are optional props; only named ones need references
        for id in ids {
            let prefix = format!("{id}-");
            if !names.iter().any(|n| n.starts_with(&prefix)) {
                report.findings.push(Finding::warning(format!(
                    "ref/{group}: no reference images for '{id}'"
                )));
            }
        }
    }
}

/// Width of the digit run in a page stem like `p03-mia`
fn number_width(stem: &str) -> usize {
    stem[1..].bytes().take_while(|b| b.is_ascii_digit()).count()
}

/// `{id}.yaml` ids: lowercase letter, then lowercase/digits/underscores
fn valid_id(id: &str) -> bool {
    let mut bytes = id.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_lowercase() => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Reference images: `{id}-{NN}.jpg` with a two-digit suffix
fn valid_ref_name(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".jpg") else {
        return false;
    };
    let Some((base, digits)) = stem.rsplit_once('-') else {
        return false;
    };
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let mut bytes = base.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_lowercase() => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_yaml::from_str(&content).map_err(|e| e.to_string())
}

fn yaml_names(dir: &Path) -> Vec<String> {
    names_with_extension(dir, "yaml")
}

fn jpg_names(dir: &Path) -> Vec<String> {
    names_with_extension(dir, "jpg")
}

fn names_with_extension(dir: &Path, extension: &str) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return vec![];
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .filter_map(|path| path.file_name()?.to_str().map(String::from))
        .collect();
    names.sort();
    names
}

fn scan_id_dir<T: serde::de::DeserializeOwned>(
    dir: &Path,
    group: &str,
    report: &mut Report,
    mut check_one: impl FnMut(&str, &T, &mut Report),
) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();
    if !dir.is_dir() {
        return ids;
    }

    for name in yaml_names(dir) {
        let id = name.trim_end_matches(".yaml").to_string();
        if !valid_id(&id) {
            report.findings.push(Finding::warning(format!(
                "{group}/{name}: ids are lowercase letters, digits and underscores"
            )));
        }

        match read_yaml::<T>(&dir.join(&name)) {
            Ok(value) => {
                check_one(&id, &value, report);
                ids.insert(id);
            }
            Err(reason) => {
                report
                    .findings
                    .push(Finding::error(format!("{group}/{name}: {reason}")));
            }
        }
    }

    ids
}
