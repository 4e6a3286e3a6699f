use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use shinglefp::{Document, FieldsConfig, IndexBuild, MatchStrategy, ShinglefpConfig};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    version,
    about = "Word-shingle fingerprints and near-duplicate detection for JSON-lines records"
)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Write logs to stderr as JSON
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args)]
struct InputArgs {
    /// JSON-lines input file; stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long)]
    shingle_size: Option<usize>,
    /// Fingerprint documents on all cores
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print every document's shingle set as JSON lines
    Index {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print near-duplicate pairs as JSON lines, most similar first
    Dedup {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        threshold: Option<f64>,
        /// Score all pairs instead of LSH candidates
        #[arg(long, default_value_t = false)]
        exhaustive: bool,
    },
}

/// Record id as found in the input: integers stay numeric, anything else is
/// compared as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => RecordId::Number(i),
                None => RecordId::Text(n.to_string()),
            }),
            Value::String(s) if !s.is_empty() => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct IndexLine<'a> {
    id: &'a RecordId,
    shingles: Vec<u32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = match &cli.config {
        Some(path) => ShinglefpConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ShinglefpConfig::default(),
    };

    match cli.cmd {
        Cmd::Index { input } => {
            apply_input_overrides(&mut config, &input);
            config.validate()?;
            let build = build_index(&config, &input)?;
            write_index(&build)?;
        }
        Cmd::Dedup {
            input,
            threshold,
            exhaustive,
        } => {
            apply_input_overrides(&mut config, &input);
            if let Some(threshold) = threshold {
                config.matcher.threshold = threshold;
            }
            if exhaustive {
                config.matcher.strategy = MatchStrategy::Exhaustive;
            }
            config.validate()?;

            let build = build_index(&config, &input)?;
            let pairs = build.index.find_duplicates(&config.match_config())?;
            info!(pairs = pairs.len(), "dedup_complete");

            let mut out = BufWriter::new(io::stdout().lock());
            for pair in &pairs {
                serde_json::to_writer(&mut out, pair)?;
                out.write_all(b"\n")?;
            }
            out.flush()?;
        }
    }
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn apply_input_overrides(config: &mut ShinglefpConfig, input: &InputArgs) {
    if let Some(k) = input.shingle_size {
        config.shingle.shingle_size = k;
    }
    if input.parallel {
        config.shingle.use_parallel = true;
    }
}

fn build_index(config: &ShinglefpConfig, input: &InputArgs) -> Result<IndexBuild<RecordId>> {
    let reader: Box<dyn BufRead> = match &input.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin().lock())),
    };
    let docs = read_records(reader, &config.fields)?;
    let build = config.index_builder()?.build(docs);
    if !build.report.failures.is_empty() {
        warn!(failed = build.report.failed(), "some records were not fingerprinted");
    }
    Ok(build)
}

/// Parse JSON-lines records. Malformed lines and records without a usable id
/// are skipped with a warning; a missing or null text field is passed on as
/// absent text.
fn read_records<R: BufRead>(reader: R, fields: &FieldsConfig) -> Result<Vec<Document<RecordId>>> {
    let mut docs = Vec::new();
    for (idx, line) in reader.split(b'\n').enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("reading line {line_no}"))?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let record: Value = match serde_json::from_slice(&line) {
            Ok(record) => record,
            Err(err) => {
                warn!(line = line_no, error = %err, "skipping malformed record");
                continue;
            }
        };
        let Some(id) = record
            .get(fields.id_field.as_str())
            .and_then(RecordId::from_json)
        else {
            warn!(line = line_no, field = %fields.id_field, "skipping record without id");
            continue;
        };
        let text = match record.get(fields.text_field.as_str()) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        docs.push(Document::from((id, text)));
    }
    Ok(docs)
}

fn write_index(build: &IndexBuild<RecordId>) -> Result<()> {
    let mut entries: Vec<_> = build.index.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut out = BufWriter::new(io::stdout().lock());
    for (id, set) in entries {
        let line = IndexLine {
            id,
            shingles: set.to_sorted_vec(),
        };
        serde_json::to_writer(&mut out, &line)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
