use crate::breakpoints::{file_number, BreakpointError, Breakpoints, Span};
use crate::cli::SplitConfig;
use crate::pdf::PdfDocument;
use crate::sections::section_breakpoints;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    pub number: u32,
    pub file_name: String,
    pub span: Span,
}

#[derive(Debug, Serialize)]
pub struct SplitPlan {
    pub input: String,
    pub page_count: u32,
    pub breakpoints: Vec<u32>,
    pub files: Vec<PlannedFile>,
}

impl SplitPlan {
    pub fn new(
        input: &str,
        breakpoints: &Breakpoints,
        start_number: u32,
        prefix: &str,
    ) -> Result<Self, BreakpointError> {
        let spans = breakpoints.spans();
        let count = spans.len();
        let files = spans
            .into_iter()
            .enumerate()
            .map(|(i, span)| {
                let number = file_number(start_number, i, count)?;
                Ok(PlannedFile {
                    number,
                    file_name: output_file_name(prefix, number),
                    span,
                })
            })
            .collect::<Result<Vec<_>, BreakpointError>>()?;

        Ok(SplitPlan {
            input: input.to_string(),
            page_count: breakpoints.page_count(),
            breakpoints: breakpoints.as_slice().to_vec(),
            files,
        })
    }
}

pub fn output_file_name(prefix: &str, number: u32) -> String {
    format!("{}{}.pdf", prefix, number)
}

pub fn run(config: &SplitConfig) -> Result<()> {
    let doc = PdfDocument::open(&config.input_path)?;
    let plan = plan(&doc, config)?;

    if config.dry_run {
        print_plan(&plan, config.json)?;
        return Ok(());
    }

    let written = write_files(&doc, &plan, &config.output_dir)?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&written)?);
    } else {
        println!(
            "Split {} pages into {} file(s) in {}",
            plan.page_count,
            written.len(),
            config.output_dir.display()
        );
    }

    Ok(())
}

/// Work out every output file. Nothing is written here, so any invalid
/// breakpoint is reported before the output directory is touched.
pub fn plan(doc: &PdfDocument, config: &SplitConfig) -> Result<SplitPlan> {
    let page_count = doc.page_count();

    let points = match &config.indices {
        Some(indices) => {
            log::info!("using breakpoints given on the command line");
            indices.clone()
        }
        None => {
            let sections = super::sections::detect(doc, config)?;
            log::info!("detected {} section(s) from the outline", sections.len());
            for section in &sections {
                log::debug!("section {:?} starts on page {}", section.title, section.page);
            }
            section_breakpoints(&sections)
                .with_context(|| format!("Cannot split {} automatically", doc.path))?
        }
    };

    let breakpoints = Breakpoints::validate(&points, page_count)
        .with_context(|| format!("Invalid breakpoints for {}", doc.path))?;

    if let Some(skipped) = breakpoints.leading_pages() {
        log::warn!(
            "pages {}-{} come before the first breakpoint and are not in any output file",
            skipped.start,
            skipped.last()
        );
    }

    SplitPlan::new(
        &doc.path,
        &breakpoints,
        config.start_number,
        &config.prefix,
    )
    .with_context(|| format!("Invalid --start-question-number for {}", doc.path))
}

/// Build, serialize and write one file per planned span, in order.
pub fn write_files(doc: &PdfDocument, plan: &SplitPlan, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let mut written = Vec::with_capacity(plan.files.len());
    for file in &plan.files {
        let mut new_doc = doc.extract_span(file.span)?;
        let bytes = PdfDocument::to_bytes(&mut new_doc)?;

        let output_path = output_dir.join(&file.file_name);
        std::fs::write(&output_path, bytes)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        log::info!(
            "wrote {} (pages {}-{})",
            output_path.display(),
            file.span.start,
            file.span.last()
        );
        written.push(output_path);
    }

    Ok(written)
}

fn print_plan(plan: &SplitPlan, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(plan)?);
        return Ok(());
    }

    println!("File: {}", plan.input);
    println!("Pages: {}", plan.page_count);
    for file in &plan.files {
        let pages = if file.span.len() == 1 {
            format!("page {}", file.span.start)
        } else {
            format!("pages {}-{}", file.span.start, file.span.last())
        };
        println!("{}: {} ({} page(s))", file.file_name, pages, file.span.len());
    }

    Ok(())
}
