// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use notegrid::arrangement::AtomicSlicable;
use notegrid::{Corpus, Piece, PieceFilter, Settings, YamlScoreParser};
use tracing::Level;

fn print_usage() {
    println!("notegrid - Quantized note timelines for sequence models");
    println!();
    println!("Usage: notegrid [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  show <SCORE>                 Load a score and print the piece");
    println!("  corpus <OUT> <SCORE>...      Load scores into a corpus snapshot");
    println!();
    println!("Options:");
    println!("  --config <FILE>              Settings file (.yaml or .toml)");
    println!("  --atomic                     Only admit pieces that slice atomically");
    println!("  -v, --verbose                Debug logging");
    println!("  -h, --help                   Show this help message");
}

struct Args {
    config: Option<PathBuf>,
    verbose: bool,
    atomic: bool,
    command: Vec<String>,
}

fn parse_args() -> Result<Option<Args>> {
    let mut args = Args {
        config: None,
        verbose: false,
        atomic: false,
        command: Vec::new(),
    };
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                args.config = Some(PathBuf::from(path));
            }
            "-v" | "--verbose" => args.verbose = true,
            "--atomic" => args.atomic = true,
            "-h" | "--help" => return Ok(None),
            _ => args.command.push(arg),
        }
    }
    Ok(Some(args))
}

fn show(path: &Path, settings: &Settings) -> Result<()> {
    let options = settings.corpus.load_options()?;
    let piece = Piece::load(&YamlScoreParser, path, &options, settings)
        .with_context(|| format!("Failed to load {:?}", path))?;
    println!("{}", piece);
    println!(
        "{} bars, {} events, {} beats",
        piece.num_bars(),
        piece.count_events(),
        piece.length_in_beats()
    );
    Ok(())
}

fn build_corpus(out: &Path, scores: &[String], atomic: bool, settings: &Settings) -> Result<()> {
    let atomic_filter = AtomicSlicable::new(settings.slice_resolution);
    let filters: Vec<&dyn PieceFilter> = if atomic {
        vec![&atomic_filter as &dyn PieceFilter]
    } else {
        Vec::new()
    };
    let corpus = Corpus::load(scores, &YamlScoreParser, &filters, settings)
        .context("Failed to load corpus")?;
    for rejection in corpus.rejections() {
        println!("rejected: {} ({})", rejection.path.display(), rejection.reason);
    }
    for skipped in corpus.skipped() {
        println!("skipped: {} ({})", skipped.path.display(), skipped.reason);
    }
    corpus
        .save(out)
        .with_context(|| format!("Failed to save corpus to {:?}", out))?;
    println!(
        "Saved {} pieces to {} ({} rejected)",
        corpus.size(),
        out.display(),
        corpus.num_rejected()
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = match parse_args()? {
        Some(args) => args,
        None => {
            print_usage();
            return Ok(());
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match args.command.first().map(String::as_str) {
        Some("show") => {
            let path = args
                .command
                .get(1)
                .ok_or_else(|| anyhow!("show requires a score path"))?;
            show(Path::new(path), &settings)?;
        }
        Some("corpus") => {
            if args.command.len() < 3 {
                eprintln!("Error: corpus requires an output path and at least one score");
                print_usage();
                std::process::exit(1);
            }
            build_corpus(
                Path::new(&args.command[1]),
                &args.command[2..],
                args.atomic,
                &settings,
            )?;
        }
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
        None => {
            println!("notegrid - Quantized note timelines for sequence models");
            println!("Run with --help for usage information");
        }
    }

    Ok(())
}
