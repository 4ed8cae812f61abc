use crate::breakpoints::parse_indices;
use crate::sections::SectionLevel;
use anyhow::{Context, Result};
use clap::Parser;
use regex::Regex;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pdfsplit")]
#[command(about = "Split a PDF into one file per question, at given pages or at its bookmarks")]
#[command(version)]
pub struct Cli {
    /// PDF file to split
    pub path: PathBuf,

    /// Pages where each output file starts, e.g. "1,5,7,10". Taken from the
    /// document outline when omitted
    #[arg(short, long)]
    pub indices: Option<String>,

    /// Number of the first output file
    #[arg(short, long, default_value = "1")]
    pub start_question_number: u32,

    /// Output directory, created if missing
    #[arg(short, long, default_value = "split_output")]
    pub output_dir: PathBuf,

    /// Output file name prefix
    #[arg(long, default_value = "Q")]
    pub prefix: String,

    /// Which bookmarks count as sections when detecting them
    #[arg(long, value_enum, default_value_t = SectionLevel::TopLevel)]
    pub sections: SectionLevel,

    /// Only use bookmarks whose title matches this regular expression
    #[arg(long)]
    pub section_title: Option<String>,

    /// Print the detected sections and exit
    #[arg(long)]
    pub list_sections: bool,

    /// Print what would be written without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Everything a split run needs, resolved from the command line.
#[derive(Debug)]
pub struct SplitConfig {
    pub input_path: PathBuf,
    /// Explicit breakpoints; `None` means detect them from the outline
    pub indices: Option<Vec<u32>>,
    pub start_number: u32,
    pub output_dir: PathBuf,
    pub prefix: String,
    pub section_level: SectionLevel,
    pub section_title: Option<Regex>,
    pub dry_run: bool,
    pub json: bool,
}

impl Cli {
    pub fn into_config(self) -> Result<SplitConfig> {
        let indices = self
            .indices
            .as_deref()
            .map(parse_indices)
            .transpose()
            .context("Invalid --indices")?;

        let section_title = self
            .section_title
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("Invalid --section-title pattern")?;

        Ok(SplitConfig {
            input_path: self.path,
            indices,
            start_number: self.start_question_number,
            output_dir: self.output_dir,
            prefix: self.prefix,
            section_level: self.sections,
            section_title,
            dry_run: self.dry_run,
            json: self.json,
        })
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}
