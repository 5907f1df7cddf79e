//! Reference document source: turns TREC SGML or JSON corpora into
//! [`Document`]s for [`InvertedIndex::from_documents`](crate::InvertedIndex::from_documents).

use crate::tokenizer::tokenize;
use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

lazy_static! {
    static ref DOC_RE: Regex = Regex::new(r"(?s)<DOC>(.*?)</DOC>").expect("valid regex");
    static ref DOCNO_RE: Regex = Regex::new(r"(?s)<DOCNO>(.*?)</DOCNO>").expect("valid regex");
    static ref TEXT_RE: Regex = Regex::new(r"(?s)<TEXT>(.*?)</TEXT>").expect("valid regex");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub external_id: String,
    pub text: String,
}

impl Document {
    pub fn new(external_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { external_id: external_id.into(), text: text.into() }
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ { tokenize(&self.text) }
}

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: String,
    #[serde(alias = "text")]
    body: String,
}

impl From<InputDoc> for Document {
    fn from(doc: InputDoc) -> Self { Document { external_id: doc.id, text: doc.body } }
}

/// Extract every `<DOC>` block. The DOCNO is trimmed; all `<TEXT>` sections
/// of a block are joined, so a block with several sections indexes the union
/// of their terms. Blocks without a DOCNO are skipped.
pub fn parse_trec(content: &str) -> Vec<Document> {
    let mut docs = Vec::new();
    for block in DOC_RE.captures_iter(content) {
        let body = &block[1];
        let Some(docno) = DOCNO_RE.captures(body) else {
            tracing::warn!("skipping <DOC> block without <DOCNO>");
            continue;
        };
        let text = TEXT_RE
            .captures_iter(body)
            .map(|c| c.get(1).map_or("", |m| m.as_str()))
            .collect::<Vec<_>>()
            .join("\n");
        docs.push(Document::new(docno[1].trim(), text));
    }
    docs
}

/// One JSON record per line; blank lines are ignored.
pub fn parse_jsonl(content: &str) -> Result<Vec<Document>> {
    let mut docs = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(line)
            .with_context(|| format!("invalid record on line {}", lineno + 1))?;
        docs.push(doc.into());
    }
    Ok(docs)
}

/// A JSON array of records, or a single record.
pub fn parse_json(content: &str) -> Result<Vec<Document>> {
    let json: serde_json::Value = serde_json::from_str(content)?;
    let docs = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(|v| serde_json::from_value::<InputDoc>(v).map(Document::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value::<InputDoc>(json)?.into()],
        _ => bail!("expected a JSON object or array of objects"),
    };
    Ok(docs)
}

/// Read a corpus file, or every file under a directory in file-name order so
/// that document ids come out the same on every run.
pub fn read_corpus(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.with_context(|| format!("walking {}", path.display()))?;
            let hidden = entry.file_name().to_str().is_some_and(|n| n.starts_with('.'));
            if entry.file_type().is_file() && !hidden {
                files.push(entry.into_path());
            }
        }
    } else if path.is_file() {
        files.push(path.to_path_buf());
    } else {
        bail!("corpus path {} does not exist", path.display());
    }

    let mut docs = Vec::new();
    for file in &files {
        let parsed = read_file(file)?;
        if parsed.is_empty() {
            tracing::warn!(file = %file.display(), "no documents found");
        }
        docs.extend(parsed);
    }
    tracing::info!(files = files.len(), num_docs = docs.len(), "read corpus");
    Ok(docs)
}

fn read_file(file: &Path) -> Result<Vec<Document>> {
    let content = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let docs = match file.extension().and_then(|s| s.to_str()) {
        Some("jsonl") => parse_jsonl(&content),
        Some("json") => parse_json(&content),
        _ => Ok(parse_trec(&content)),
    };
    docs.with_context(|| format!("parsing {}", file.display()))
}
