use anyhow::Context;
use clap::Parser;
use featx::{serializer, Interaction, LineConfig, LineVisitor};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Render interaction logs as learning engine examples
#[derive(Parser, Debug)]
#[command(name = "featx")]
#[command(about = "Render JSON-lines interaction logs as text examples", long_about = None)]
struct Args {
    /// JSON-lines input, `-` for stdin
    #[arg(short, long, default_value = "-")]
    input: PathBuf,

    /// Output file, `-` for stdout
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Drop namespaces without features
    #[arg(long)]
    skip_empty_namespaces: bool,

    /// Keep numeric features whose value is zero
    #[arg(long)]
    keep_zero_values: bool,

    /// Print the compiled namespace layout and exit
    #[arg(long)]
    layout: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // examples go to stdout
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let compiled = serializer::<Interaction, LineVisitor>().context("failed to build the interaction serializer")?;

    if args.layout {
        for namespace in compiled.layout() {
            println!("{}", namespace);
        }
        return Ok(());
    }

    let reader: Box<dyn BufRead> = if is_stdio(&args.input) {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&args.input).with_context(|| format!("failed to open {:?}", args.input))?;
        Box::new(BufReader::new(file))
    };

    let mut writer: Box<dyn Write> = if is_stdio(&args.output) {
        Box::new(BufWriter::new(io::stdout().lock()))
    } else {
        let file = File::create(&args.output).with_context(|| format!("failed to create {:?}", args.output))?;
        Box::new(BufWriter::new(file))
    };

    let mut visitor = LineVisitor::new(LineConfig {
        skip_empty_namespaces: args.skip_empty_namespaces,
        keep_zero_values: args.keep_zero_values,
    });

    info!("featx v{}", env!("CARGO_PKG_VERSION"));
    debug!(input = ?args.input, output = ?args.output, "rendering interactions");

    let mut examples = 0usize;
    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.with_context(|| format!("failed to read line {}", number))?;
        if line.trim().is_empty() {
            continue;
        }

        let interaction: Interaction =
            serde_json::from_str(&line).with_context(|| format!("invalid interaction on line {}", number))?;
        writeln!(writer, "{}", compiled.serialize(&interaction, &mut visitor))?;
        examples += 1;
    }

    writer.flush()?;
    info!(examples = examples, "done");
    Ok(())
}
