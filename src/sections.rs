//! Deciding which outline entries start a section.

use crate::breakpoints::BreakpointError;
use crate::pdf::outline::OutlineEntry;
use clap::ValueEnum;
use regex::Regex;
use serde::Serialize;

/// A detected section start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    /// 1-based page number
    pub page: u32,
    /// Nesting level of the bookmark, 0 for top-level
    pub depth: u32,
}

/// Trait for choosing section starts from an outline.
///
/// Implementations return entries in outline order and must only yield
/// destination entries.
pub trait SectionStrategy {
    fn select<'a>(&self, outline: &'a [OutlineEntry]) -> Vec<&'a OutlineEntry>;
}

/// Top-level bookmarks that jump to a page. Grouping labels and everything
/// nested below the first level are ignored.
pub struct TopLevel;

impl SectionStrategy for TopLevel {
    fn select<'a>(&self, outline: &'a [OutlineEntry]) -> Vec<&'a OutlineEntry> {
        outline.iter().filter(|e| e.is_destination()).collect()
    }
}

/// Every bookmark with a page destination, at any depth, in pre-order.
pub struct AllLevels;

impl SectionStrategy for AllLevels {
    fn select<'a>(&self, outline: &'a [OutlineEntry]) -> Vec<&'a OutlineEntry> {
        let mut selected = Vec::new();
        collect_destinations(outline, &mut selected);
        selected
    }
}

fn collect_destinations<'a>(entries: &'a [OutlineEntry], out: &mut Vec<&'a OutlineEntry>) {
    for entry in entries {
        if entry.is_destination() {
            out.push(entry);
        }
        collect_destinations(&entry.children, out);
    }
}

/// Narrows another strategy to entries whose title matches a pattern.
pub struct TitleMatch {
    pub pattern: Regex,
    pub inner: Box<dyn SectionStrategy>,
}

impl SectionStrategy for TitleMatch {
    fn select<'a>(&self, outline: &'a [OutlineEntry]) -> Vec<&'a OutlineEntry> {
        self.inner
            .select(outline)
            .into_iter()
            .filter(|e| self.pattern.is_match(&e.title))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SectionLevel {
    /// Top-level bookmarks only
    #[default]
    TopLevel,
    /// Bookmarks at every depth
    All,
}

/// Build the strategy selected on the command line.
pub fn strategy(level: SectionLevel, title: Option<Regex>) -> Box<dyn SectionStrategy> {
    let base: Box<dyn SectionStrategy> = match level {
        SectionLevel::TopLevel => Box::new(TopLevel),
        SectionLevel::All => Box::new(AllLevels),
    };

    match title {
        Some(pattern) => Box::new(TitleMatch {
            pattern,
            inner: base,
        }),
        None => base,
    }
}

/// Section starts in outline order. Page numbers are neither sorted nor
/// deduplicated.
pub fn find_sections(outline: &[OutlineEntry], strategy: &dyn SectionStrategy) -> Vec<Section> {
    strategy
        .select(outline)
        .into_iter()
        .filter_map(|entry| {
            let page = entry.page_index?.checked_add(1)?;
            Some(Section {
                title: entry.title.clone(),
                page,
                depth: entry.depth,
            })
        })
        .collect()
}

/// Breakpoints taken from detected sections.
pub fn section_breakpoints(sections: &[Section]) -> Result<Vec<u32>, BreakpointError> {
    if sections.is_empty() {
        return Err(BreakpointError::NoSections);
    }
    Ok(sections.iter().map(|s| s.page).collect())
}
