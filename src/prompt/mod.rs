//! Prompt assembly
//!
//! A page's prompt is deterministic: the same content base, page and style
//! always compose the same text, because the text feeds the fingerprint that
//! decides whether a cached artifact can be reused. Section order is fixed;
//! empty sections are dropped entirely.

pub mod refs;

pub use refs::{RefImage, MAX_TOTAL_IMAGES};

use crate::content::{Catalog, Page, Style};
use crate::error::FabulaResult;
use std::fmt::Write;
use std::path::Path;

/// Prompt text plus the labeled reference images to interleave before it
#[derive(Debug, Clone)]
pub struct PromptBundle {
    pub text: String,
    pub refs: Vec<RefImage>,
}

/// Build the full generation prompt for one page
pub fn build(
    page: &Page,
    catalog: &Catalog,
    style_id: &str,
    refs_dir: &Path,
) -> FabulaResult<PromptBundle> {
    let style = catalog.style(style_id)?;
    Ok(PromptBundle {
        text: compose(page, catalog, style, catalog.artist(style_id)),
        refs: refs::collect(page, catalog, style_id, refs_dir)?,
    })
}

fn compose(page: &Page, catalog: &Catalog, style: &Style, artist: &str) -> String {
    let mut prompt = format!(
        "Create an illustration for a children's storybook page in {artist}'s illustration style.\n\
         \n\
         VISUAL STYLE ({artist}):\n"
    );
    push_bullets(&mut prompt, &style.prompts);

    if !catalog.story.setting.is_empty() {
        prompt.push_str("\nSTORY SETTING:\n");
        push_bullets(&mut prompt, &catalog.story.setting);
    }

    let mut character_sections = String::new();
    for id in &page.spec.characters {
        let Some(character) = catalog.characters.get(id) else {
            continue;
        };
        if character.visual.is_empty() {
            continue;
        }
        let _ = write!(character_sections, "\n{}:\n", catalog.character_name(id));
        push_bullets(&mut character_sections, &character.visual);
    }
    if !character_sections.is_empty() {
        prompt.push_str("\nCHARACTER VISUAL DETAILS:\n");
        prompt.push_str(&character_sections);
    }

    if let Some(id) = &page.spec.location {
        if let Some(location) = catalog.locations.get(id) {
            if !location.visual.is_empty() {
                let _ = write!(prompt, "\nLocation ({}):\n", catalog.location_name(id));
                push_bullets(&mut prompt, &location.visual);
            }
        }
    }

    let _ = write!(prompt, "\nPAGE-SPECIFIC SCENE:\n{}\n", page.spec.visual.block());

    let text = page.spec.text.trim();
    if !text.is_empty() {
        let _ = write!(
            prompt,
            "\nTEXT TO DISPLAY IN THE IMAGE:\n\
             The following text must be included in the illustration with appropriate storybook typography and placement:\n\
             \n\
             \"{text}\"\n\
             \n\
             Please display this text exactly as written in a clear, readable storybook font that fits {artist}'s illustration style.\n"
        );
    }

    let _ = write!(
        prompt,
        "\nPlease create a single illustration that captures this moment in {artist}'s illustration style, \
         using the reference images provided to ensure character and location consistency. \
         Include lots of fun little details as shown in the reference images.\n"
    );

    prompt
}

fn push_bullets(prompt: &mut String, items: &[String]) {
    for item in items {
        let _ = writeln!(prompt, "  - {item}");
    }
}
