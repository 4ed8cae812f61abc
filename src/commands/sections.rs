use crate::breakpoints::{file_number, BreakpointError};
use crate::cli::SplitConfig;
use crate::commands::split::output_file_name;
use crate::pdf::PdfDocument;
use crate::sections::{find_sections, strategy, Section};
use anyhow::Result;
use serde::Serialize;

/// One detected section, numbered the way its output file would be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedSection {
    pub number: u32,
    pub file_name: String,
    pub page: u32,
    pub title: String,
    pub depth: u32,
}

pub fn run(config: &SplitConfig) -> Result<()> {
    let doc = PdfDocument::open(&config.input_path)?;
    let sections = detect(&doc, config)?;
    let listed = number_sections(&sections, config.start_number, &config.prefix)?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    for line in format_listing(&listed) {
        println!("{}", line);
    }

    Ok(())
}

pub fn detect(doc: &PdfDocument, config: &SplitConfig) -> Result<Vec<Section>> {
    let outline = doc.outline()?;
    let chosen = strategy(config.section_level, config.section_title.clone());
    Ok(find_sections(&outline, chosen.as_ref()))
}

pub fn number_sections(
    sections: &[Section],
    start_number: u32,
    prefix: &str,
) -> Result<Vec<ListedSection>, BreakpointError> {
    sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let number = file_number(start_number, i, sections.len())?;
            Ok(ListedSection {
                number,
                file_name: output_file_name(prefix, number),
                page: section.page,
                title: section.title.clone(),
                depth: section.depth,
            })
        })
        .collect()
}

pub fn format_listing(listed: &[ListedSection]) -> Vec<String> {
    if listed.is_empty() {
        return vec!["No sections found.".to_string()];
    }

    listed
        .iter()
        .map(|section| {
            let indent = "  ".repeat(section.depth as usize);
            format!(
                "{}{}: p. {}  {}",
                indent, section.file_name, section.page, section.title
            )
        })
        .collect()
}
