//! lanidrac CLI - OCR block graph rendering and extraction checking tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use lanidrac::extract::{score, ExtractOptions};
use lanidrac::schema::field_types;
use lanidrac::{
    parse_response, render, resolve_blocks, CanonicalSchema, JsonFormat, Lanidrac,
    LayoutThresholds, ParsedPage, RenderOptions,
};

#[derive(Parser)]
#[command(name = "lanidrac")]
#[command(author = "lanidrac")]
#[command(version)]
#[command(about = "Render OCR block graphs to Markdown and check extracted JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render provider responses (one per page) to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Provider response JSON files, in page order
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Prefix each page with a page header
        #[arg(long, env = "LANIDRAC_PAGE_HEADERS")]
        page_headers: bool,

        /// Share of form fields found in free text that hides the form block
        #[arg(long, env = "LANIDRAC_FORM_OVERLAP", default_value = "0.6")]
        form_overlap: f64,

        /// Print rendering statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Convert a provider response to resolved-entity JSON
    Json {
        /// Provider response JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Validate extracted data against a schema and score it
    Validate {
        /// Schema JSON file (shorthand or JSON-Schema)
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Extracted data JSON file
        #[arg(value_name = "DATA")]
        data: PathBuf,

        /// Provider response used as OCR evidence
        #[arg(short, long, value_name = "FILE")]
        evidence: Option<PathBuf>,
    },

    /// List the field paths and types of a schema
    Fields {
        /// Schema JSON file (shorthand or JSON-Schema)
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,
    },

    /// Show entity counts of provider responses
    Info {
        /// Provider response JSON files, in page order
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Markdown {
            inputs,
            output,
            page_headers,
            form_overlap,
            stats,
        }) => cmd_markdown(&inputs, output.as_deref(), page_headers, form_overlap, stats),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact),
        Some(Commands::Validate {
            schema,
            data,
            evidence,
        }) => cmd_validate(&schema, &data, evidence.as_deref()),
        Some(Commands::Fields { schema }) => cmd_fields(&schema),
        Some(Commands::Info { inputs }) => cmd_info(&inputs),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: lanidrac <COMMAND> [ARGS]".yellow());
            println!("       lanidrac --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn read_pages(inputs: &[PathBuf]) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut pages = Vec::with_capacity(inputs.len());
    for input in inputs {
        pb.set_message(input.display().to_string());
        pages.push(fs::read_to_string(input)?);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(pages)
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_markdown(
    inputs: &[PathBuf],
    output: Option<&Path>,
    page_headers: bool,
    form_overlap: f64,
    stats: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pages = read_pages(inputs)?;

    let options = RenderOptions::new()
        .with_page_headers(page_headers)
        .with_thresholds(LayoutThresholds::default().with_form_overlap_ratio(form_overlap));

    let result = Lanidrac::new()
        .with_render_options(options)
        .parse_pages(&pages)?
        .to_markdown_with_stats();

    write_or_print(output, &result.content)?;

    if stats {
        let s = &result.stats;
        eprintln!("{}", "Rendering Statistics".cyan().bold());
        eprintln!("{}", "─".repeat(40).dimmed());
        eprintln!("{}: {}", "Pages".bold(), s.page_count);
        eprintln!("{}: {}", "Tables".bold(), s.table_count);
        eprintln!("{}: {}", "Form fields".bold(), s.form_field_count);
        eprintln!("{}: {}", "Suppressed forms".bold(), s.suppressed_form_count);
        eprintln!("{}: {}", "Checkboxes".bold(), s.checkbox_count);
        eprintln!("{}: {}", "Headings".bold(), s.heading_count);
        eprintln!("{}: {}", "Paragraphs".bold(), s.paragraph_count);
        eprintln!("{}: {}", "Words".bold(), s.word_count);
    }

    Ok(())
}

fn cmd_json(input: &Path, output: Option<&Path>, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    let response = parse_response(&fs::read_to_string(input)?)?;
    let page = resolve_blocks(&response.blocks);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::to_json(&page, format)?;
    write_or_print(output, &json)
}

fn load_schema(path: &Path) -> Result<CanonicalSchema, Box<dyn std::error::Error>> {
    Ok(CanonicalSchema::from_json_str(&fs::read_to_string(path)?)?)
}

fn cmd_validate(
    schema: &Path,
    data: &Path,
    evidence: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema = load_schema(schema)?;
    let data: serde_json::Value = serde_json::from_str(&fs::read_to_string(data)?)?;

    let evidence: Option<ParsedPage> = match evidence {
        Some(path) => {
            let response = parse_response(&fs::read_to_string(path)?)?;
            Some(resolve_blocks(&response.blocks))
        }
        None => None,
    };

    let stats = lanidrac::validate(&data, &schema);
    let confidence = score(&stats, evidence.as_ref(), &ExtractOptions::default());

    println!("{}", "Validation".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Total fields".bold(), stats.total_fields);
    println!("{}: {}", "Valid".bold(), stats.valid_fields.to_string().green());
    println!("{}: {}", "Invalid".bold(), stats.invalid_fields.to_string().red());
    println!("{}: {}", "Missing".bold(), stats.missing_fields.to_string().yellow());
    println!("{}: {}", "Extra".bold(), stats.extra_fields.to_string().yellow());
    println!("{}: {:.3}", "Confidence".bold(), confidence);

    if !stats.findings.is_empty() {
        println!();
        println!("{}", "Findings".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for finding in &stats.findings {
            println!("  {} {}", "•".dimmed(), finding);
        }
    }

    Ok(())
}

fn cmd_fields(schema: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let schema = load_schema(schema)?;

    for (path, ty) in field_types(&schema) {
        let path = if path.is_empty() { "(root)".to_string() } else { path };
        println!("{} {}", path.bold(), ty.dimmed());
    }

    Ok(())
}

fn cmd_info(inputs: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let pages = read_pages(inputs)?;
    let result = Lanidrac::new().parse_pages(&pages)?;
    let summary = result.summary();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for input in inputs {
        println!("{}: {}", "File".bold(), input.display());
    }
    println!("{}: {}", "Pages".bold(), summary.total_pages);

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = result.full_text();
    println!("{}: {}", "Tables".bold(), summary.total_tables);
    println!("{}: {}", "Form fields".bold(), summary.total_forms);
    println!("{}: {}", "Checkboxes".bold(), summary.total_checkboxes);
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), summary.total_text_length);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "lanidrac".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("OCR block graph to Markdown and schema-checked JSON");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{"Blocks": [
        {"Id": "l1", "BlockType": "LINE", "Text": "Receipt",
         "Geometry": {"BoundingBox": {"Left": 0.1, "Top": 0.05, "Width": 0.2, "Height": 0.02}}}
    ]}"#;

    #[test]
    fn test_markdown_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.json");
        let output = dir.path().join("page.md");
        fs::write(&input, PAGE).unwrap();

        cmd_markdown(&[input], Some(&output), false, 0.6, false).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "# Receipt");
    }

    #[test]
    fn test_load_schema_rejects_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        fs::write(&path, "{\"total\": ").unwrap();

        assert!(load_schema(&path).is_err());
    }
}
