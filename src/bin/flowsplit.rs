

use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};
use flowsplit::core::services::chunking::ChunkingService;
use flowsplit::{
    safe_truncate_ellipsis, BoundaryKind, ChunkedDocument, ChunkingStrategy, MeasureKind,
    SplitterConfig,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SAMPLE_CHARS: usize = 300;

#[derive(Default)]
struct Args {
    input: Option<PathBuf>,
    config: Option<PathBuf>,
    max_size: Option<usize>,
    overlap: Option<usize>,
    measure: Option<MeasureKind>,
    boundary: Option<BoundaryKind>,
    strategy: Option<ChunkingStrategy>,
    model: Option<String>,
    scenarios: bool,
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("warn").add_directive("flowsplit=info".parse().expect("valid directive"))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let Some(args) = parse_args(env::args().skip(1).collect())? else {
        print_help();
        return Ok(());
    };

    let input = args.input.clone().context("missing input file")?;
    let text = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    println!("Original Text Length: {} characters", text.len());
    println!("--------------------------------------------------");

    if args.scenarios {
        run_scenarios(&text)?;
        return Ok(());
    }

    let config = build_config(&args)?;
    let service = ChunkingService::new(config)?;
    let doc = service.chunk_document(&input.display().to_string(), &text)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print_summary(service.splitter_name(), &doc);
    }

    Ok(())
}

fn parse_args(raw: Vec<String>) -> anyhow::Result<Option<Args>> {
    let mut args = Args::default();
    let mut iter = raw.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--scenarios" => args.scenarios = true,
            "--json" => args.json = true,
            "--config" | "-c" => args.config = Some(PathBuf::from(value(&mut iter, &arg)?)),
            "--max-size" | "-m" => args.max_size = Some(value(&mut iter, &arg)?.parse()?),
            "--overlap" | "-o" => args.overlap = Some(value(&mut iter, &arg)?.parse()?),
            "--measure" => args.measure = Some(MeasureKind::from_str(&value(&mut iter, &arg)?)?),
            "--boundary" => args.boundary = Some(BoundaryKind::from_str(&value(&mut iter, &arg)?)?),
            "--strategy" => {
                args.strategy = Some(ChunkingStrategy::from_str(&value(&mut iter, &arg)?)?)
            }
            "--model" => args.model = Some(value(&mut iter, &arg)?),
            other if other.starts_with('-') => bail!("unknown flag: {other}"),
            other => args.input = Some(PathBuf::from(other)),
        }
    }

    if args.input.is_none() {
        return Ok(None);
    }
    Ok(Some(args))
}

fn value(iter: &mut impl Iterator<Item = String>, flag: &str) -> anyhow::Result<String> {
    iter.next().with_context(|| format!("{flag} expects a value"))
}

fn build_config(args: &Args) -> anyhow::Result<SplitterConfig> {
    let mut config = SplitterConfig::load(args.config.as_deref())?;

    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
        if strategy == ChunkingStrategy::Paragraph {
            config.measure = MeasureKind::Bytes;
        }
    }
    if let Some(max_size) = args.max_size {
        config.max_size = max_size;
    }
    if let Some(overlap) = args.overlap {
        config.overlap_size = overlap;
    }
    if let Some(measure) = args.measure {
        config.measure = measure;
    }
    if let Some(boundary) = args.boundary {
        config.boundary = boundary;
    }
    if let Some(model) = &args.model {
        config.tokenizer_model = model.clone();
    }

    config.validate()?;
    Ok(config)
}

fn run_scenarios(text: &str) -> anyhow::Result<()> {
    let scenarios = [
        (
            "Scenario 1: Default Splitter (whitespace measure, regex boundary)",
            SplitterConfig::default(),
        ),
        (
            "Scenario 2: Tiktoken measure (gpt-3.5-turbo)",
            SplitterConfig {
                measure: MeasureKind::Tiktoken,
                ..SplitterConfig::sentence(200, 20)
            },
        ),
        (
            "Scenario 3: Rule-based sentence boundary (embedded English data)",
            SplitterConfig {
                boundary: BoundaryKind::RuleBased,
                ..SplitterConfig::sentence(200, 20)
            },
        ),
        (
            "Scenario 4: Paragraph chunker (1024 bytes)",
            SplitterConfig::paragraph(1024),
        ),
    ];

    for (title, config) in scenarios {
        println!("{title}");
        match ChunkingService::new(config) {
            Ok(service) => {
                let doc = service.chunk_document("input", text)?;
                print_summary(service.splitter_name(), &doc);
                for (i, chunk) in doc.texts().iter().take(2).enumerate() {
                    println!("Chunk {}:\n{}\n---", i + 1, safe_truncate_ellipsis(chunk, SAMPLE_CHARS));
                }
            }
            Err(e) => println!("Failed to init splitter: {e}"),
        }
        println!("--------------------------------------------------");
    }

    Ok(())
}

fn print_summary(splitter: &str, doc: &ChunkedDocument) {
    println!(
        "{}: generated {} chunks: {:?}",
        splitter,
        doc.stats.chunk_count,
        doc.chunk_lengths()
    );
    println!(
        "   sizes {}..={} ({:.2} ms)",
        doc.stats.min_size, doc.stats.max_size, doc.stats.duration_ms
    );
}

fn print_help() {
    println!("flowsplit - split a text file into size-bounded chunks");
    println!();
    println!("USAGE:");
    println!("    flowsplit <FILE> [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>      Config file (toml/json/yaml); FLOWSPLIT_* env vars override");
    println!("    -m, --max-size <N>       Maximum chunk size in measure units");
    println!("    -o, --overlap <N>        Overlap between consecutive chunks");
    println!("        --measure <KIND>     whitespace | tiktoken | bytes");
    println!("        --boundary <KIND>    regex | rule_based");
    println!("        --strategy <KIND>    sentence | paragraph");
    println!("        --model <NAME>       Tokenizer model for the tiktoken measure");
    println!("        --scenarios          Compare the built-in splitter scenarios");
    println!("        --json               Print chunks as JSON");
    println!("    -h, --help               Show this help");
}
