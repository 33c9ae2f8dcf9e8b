use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use fault_terms::request::{ErrorSummary, parse_request};
use fault_terms::{CloudSummary, PipelineConfig, TermPipeline, Vocabulary, vocabulary};

#[derive(Parser)]
#[command(name = "fault-terms")]
#[command(about = "Extract fault-term frequencies from ticket export requests")]
struct Args {
    /// Request JSON files (reads stdin when omitted)
    requests: Vec<PathBuf>,

    /// Vocabulary JSON replacing the built-in term lists
    #[arg(long)]
    vocabulary: Option<PathBuf>,

    /// Number of terms in each response
    #[arg(long, default_value_t = 20)]
    top: usize,

    /// Disable HMM discovery of out-of-dictionary words
    #[arg(long)]
    no_hmm: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every request succeeded.
fn run(args: Args) -> Result<bool> {
    let vocab = match &args.vocabulary {
        Some(path) => Arc::new(
            Vocabulary::load(path)
                .with_context(|| format!("loading vocabulary {}", path.display()))?,
        ),
        None => vocabulary::global(),
    };
    let config = PipelineConfig::default()
        .with_top_n(args.top)
        .with_hmm(!args.no_hmm);
    let pipeline = TermPipeline::new(vocab, config);

    if args.requests.is_empty() {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .context("reading request from stdin")?;
        let result = parse_request(&body).and_then(|records| pipeline.summarize(&records));
        let (doc, ok) = render(result)?;
        println!("{}", doc);
        return Ok(ok);
    }

    let mut docs = Vec::with_capacity(args.requests.len());
    let mut all_ok = true;
    for (path, result) in args
        .requests
        .iter()
        .zip(pipeline.summarize_files(&args.requests))
    {
        if let Err(e) = &result {
            error!(path = %path.display(), "request failed: {}", e);
        }
        let (doc, ok) = render(result)?;
        all_ok &= ok;
        docs.push(doc);
    }
    if docs.len() == 1 {
        println!("{}", docs[0]);
    } else {
        println!("{}", serde_json::to_string_pretty(&docs)?);
    }
    Ok(all_ok)
}

fn render(result: fault_terms::Result<CloudSummary>) -> Result<(serde_json::Value, bool)> {
    Ok(match result {
        Ok(summary) => (serde_json::to_value(summary)?, true),
        Err(e) => (serde_json::to_value(ErrorSummary::new(&e))?, false),
    })
}
