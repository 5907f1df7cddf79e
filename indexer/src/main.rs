use anyhow::{Context, Result};
use boolsearch_core::ingest::read_corpus;
use boolsearch_core::{DocId, FrequencyRanker, FrequencyReport, InvertedIndex, QueryEngine, TermFrequency};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build an in-memory inverted index and run Boolean queries or frequency reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a file of postfix Boolean queries, one per line
    Query {
        /// Corpus path (file or directory)
        #[arg(long)]
        input: PathBuf,
        /// File with one postfix query per line
        #[arg(long)]
        queries: PathBuf,
        /// Write results here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// How to print each matching document
        #[arg(long, value_enum, default_value_t = HitFormat::Numbers)]
        format: HitFormat,
    },
    /// Report the most and least frequent terms by document frequency
    Frequency {
        /// Corpus path (file or directory)
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 10)]
        top: usize,
        #[arg(long, default_value_t = 10)]
        bottom: usize,
        /// Emit the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print every term with its postings, in term order
    Dump {
        /// Corpus path (file or directory)
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum HitFormat {
    /// 1-based document numbers
    Numbers,
    /// External document ids
    Names,
    /// `number (external id)`
    Annotated,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Query { input, queries, output, format } => {
            let index = build_index(&input)?;
            let text = fs::read_to_string(&queries)
                .with_context(|| format!("reading queries from {}", queries.display()))?;
            let mut out = open_output(output.as_deref())?;
            run_queries(&index, &text, format, &mut out)?;
            out.flush()?;
        }
        Commands::Frequency { input, top, bottom, json, output } => {
            let index = build_index(&input)?;
            let report = FrequencyRanker::new(&index).report(top, bottom);
            let mut out = open_output(output.as_deref())?;
            if json {
                serde_json::to_writer_pretty(&mut out, &report)?;
                writeln!(out)?;
            } else {
                write_frequency_report(&report, &mut out)?;
            }
            out.flush()?;
        }
        Commands::Dump { input, output } => {
            let index = build_index(&input)?;
            let mut out = open_output(output.as_deref())?;
            dump_index(&index, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn build_index(input: &Path) -> Result<InvertedIndex> {
    let docs = read_corpus(input)?;
    Ok(InvertedIndex::from_documents(docs)?)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => {
            let f = File::create(p).with_context(|| format!("creating {}", p.display()))?;
            Box::new(BufWriter::new(f))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

/// One output line per query line. A malformed query yields an empty line so
/// output lines stay aligned with input lines.
fn run_queries(index: &InvertedIndex, queries: &str, format: HitFormat, out: &mut impl Write) -> Result<()> {
    let engine = QueryEngine::new(index);
    let results = engine.search_batch(queries.lines());
    let failed = results.iter().filter(|r| r.is_err()).count();
    for result in results {
        let hits = result.unwrap_or_default();
        writeln!(out, "{}", format_hits(index, &hits, format)?)?;
    }
    tracing::info!(queries = queries.lines().count(), failed, "queries evaluated");
    Ok(())
}

fn format_hits(index: &InvertedIndex, hits: &[DocId], format: HitFormat) -> Result<String> {
    let mut parts = Vec::with_capacity(hits.len());
    for &doc_id in hits {
        let part = match format {
            HitFormat::Numbers => (doc_id + 1).to_string(),
            HitFormat::Names => index.external_id(doc_id)?.to_string(),
            HitFormat::Annotated => format!("{} ({})", doc_id + 1, index.external_id(doc_id)?),
        };
        parts.push(part);
    }
    Ok(parts.join(" "))
}

fn write_frequency_report(report: &FrequencyReport, out: &mut impl Write) -> Result<()> {
    write_section(out, &format!("The Top {} Frequent Tokens are:", report.top.len()), &report.top)?;
    writeln!(out)?;
    write_section(out, &format!("The Bottom {} Frequent Tokens are:", report.bottom.len()), &report.bottom)?;
    Ok(())
}

fn write_section(out: &mut impl Write, heading: &str, rows: &[TermFrequency]) -> Result<()> {
    writeln!(out, "{heading}")?;
    for row in rows {
        writeln!(out, "Token: '{}', Number of Occurrences: {}", row.term, row.document_frequency)?;
    }
    Ok(())
}

fn dump_index(index: &InvertedIndex, out: &mut impl Write) -> Result<()> {
    for (term, postings) in index.terms() {
        let mut entries = Vec::with_capacity(postings.len());
        for &doc_id in postings {
            entries.push(format!("{} ({})", doc_id + 1, index.external_id(doc_id)?));
        }
        writeln!(out, "{term} -> {}", entries.join("-> "))?;
    }
    Ok(())
}
