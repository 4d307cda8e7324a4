//! Highlight Phrases in a PDF
//!
//! Highlights every exact occurrence of the given phrases and writes the
//! annotated PDF plus a JSON file describing each match.
//!
//! Usage:
//!   cargo run --release --bin highlight_pdf -- report.pdf --phrases "net revenue, costs"
//!   cargo run --release --bin highlight_pdf -- report.pdf --phrases "a; b" --delimiter ";" \
//!       --colors "green;pink" --output out/report.pdf --metadata out/report.json
//!
//! Options:
//!   --phrases <list>     Phrases to highlight (required)
//!   --colors <list>      Color names or #RRGGBB values, cycled over the phrases
//!   --delimiter <c>      Separator for both lists (default ',')
//!   --single             Treat the phrase list as one phrase
//!   --output <pdf>       Annotated PDF (default output/highlighted_output.pdf)
//!   --metadata <json>    Match metadata (default highlighted_metadata.json)
//!   --opacity <f>        Highlight opacity 0..1 (default 0.4)
//!   --author <name>      Annotation author
//!   --verbose, -v        Debug logging

use pdf_highlighter::api::{highlight_file, OutputPaths};
use pdf_highlighter::config::HighlightConfig;
use pdf_highlighter::search::split_phrases;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

struct CliArgs {
    input: PathBuf,
    phrases: String,
    colors: Option<String>,
    delimiter: char,
    single: bool,
    outputs: OutputPaths,
    opacity: Option<f32>,
    author: Option<String>,
    verbose: bool,
}

impl CliArgs {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut input = None;
        let mut phrases = None;
        let mut colors = None;
        let mut delimiter = ',';
        let mut single = false;
        let mut outputs = OutputPaths::default();
        let mut opacity = None;
        let mut author = None;
        let mut verbose = false;

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].clone();
            let mut value = |name: &str| {
                i += 1;
                args.get(i)
                    .cloned()
                    .ok_or_else(|| format!("{} needs a value", name))
            };
            match flag.as_str() {
                "--phrases" => phrases = Some(value("--phrases")?),
                "--colors" => colors = Some(value("--colors")?),
                "--delimiter" => {
                    let d = value("--delimiter")?;
                    let mut chars = d.chars();
                    delimiter = match (chars.next(), chars.next()) {
                        (Some(c), None) => c,
                        _ => return Err(format!("--delimiter must be one character, got '{}'", d)),
                    };
                },
                "--single" => single = true,
                "--output" => outputs.document = PathBuf::from(value("--output")?),
                "--metadata" => outputs.metadata = PathBuf::from(value("--metadata")?),
                "--opacity" => {
                    let v = value("--opacity")?;
                    opacity = Some(v.parse::<f32>().map_err(|_| format!("invalid opacity '{}'", v))?);
                },
                "--author" => author = Some(value("--author")?),
                "--verbose" | "-v" => verbose = true,
                other if other.starts_with('-') => return Err(format!("unknown option {}", other)),
                other => {
                    if input.is_some() {
                        return Err(format!("unexpected argument {}", other));
                    }
                    input = Some(PathBuf::from(other));
                },
            }
            i += 1;
        }

        Ok(Self {
            input: input.ok_or("missing input PDF")?,
            phrases: phrases.ok_or("missing --phrases")?,
            colors,
            delimiter,
            single,
            outputs,
            opacity,
            author,
            verbose,
        })
    }

    fn config(&self) -> HighlightConfig {
        let mut config = HighlightConfig::new()
            .with_color_delimiter(self.delimiter)
            .with_phrase_delimiter(if self.single { None } else { Some(self.delimiter) });
        if let Some(ref colors) = self.colors {
            config = config.with_color_list(colors);
        }
        if let Some(opacity) = self.opacity {
            config = config.with_opacity(opacity);
        }
        if let Some(ref author) = self.author {
            config = config.with_author(author.as_str());
        }
        config
    }
}

fn main() -> ExitCode {
    let args = match CliArgs::from_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Usage: highlight_pdf <input.pdf> --phrases <list> [--colors <list>] [--delimiter <c>|--single] [--output <pdf>] [--metadata <json>] [--opacity <f>] [--author <name>] [--verbose]");
            return ExitCode::from(2);
        },
    };

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = args.config();
    let phrases = split_phrases(&args.phrases, config.phrase_delimiter);

    let start = Instant::now();
    match highlight_file(&args.input, &phrases, &config, &args.outputs) {
        Ok(run) => {
            println!("Highlighted PDF: {}", args.outputs.document.display());
            println!("Metadata:        {}", args.outputs.metadata.display());
            println!(
                "{} records, {} annotations, {} skipped phrases, {} skipped pages in {:.2?}",
                run.records.len(),
                run.annotation_count,
                run.skipped_phrases.len(),
                run.skipped_pages.len(),
                start.elapsed()
            );
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
