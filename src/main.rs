use clap::{Parser, Subcommand};
use formula_calc::context::Context;
use formula_calc::resolver::split_list;
use formula_calc::Evaluator;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Evaluate label-based formulas from the command line.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON file with evaluation settings (delimiters, script, scale)
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Labels in the formula are the keys of a JSON object.
    Values {
        /// Formula, e.g. "(本月利息支出-上月利息支出)/上月利息支出*100"
        formula: String,
        /// JSON object of label -> value
        values: String,
    },
    /// Labels are mapped to field names, which are read from a JSON record.
    Record {
        formula: String,
        /// JSON object of field name -> value
        record: String,
        /// Comma-delimited field names, e.g. "interestExpense,laborCost"
        #[arg(long)]
        names: String,
        /// Comma-delimited field titles, e.g. "利息支出,劳务费"
        #[arg(long)]
        titles: String,
    },
}

fn parse_object(json: &str) -> Result<serde_json::Map<String, Value>, String> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(m)) => Ok(m),
        Ok(_) => Err("expected a JSON object".into()),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}

fn load_context(path: Option<&std::path::Path>) -> Result<Context, String> {
    let Some(path) = path else {
        return Ok(Context::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    Context::from_json(&text).map_err(|e| format!("{}: {e}", path.display()))
}

fn run(args: Args) -> Result<String, String> {
    let ctx = load_context(args.config.as_deref())?;
    let ev = Evaluator::with_context(ctx).map_err(|e| e.to_string())?;
    let out = match args.command {
        Command::Values { formula, values } => {
            let values = parse_object(&values)?;
            ev.eval_values(&formula, values.iter())
        }
        Command::Record { formula, record, names, titles } => {
            let record = parse_object(&record)?;
            let (names, titles) = (split_list(&names), split_list(&titles));
            ev.eval_record(titles.as_slice(), names.as_slice(), &formula, &record)
        }
    };
    out.map(|d| d.to_string()).map_err(|e| e.to_string())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments.
    let args = Args::parse();

    match run(args) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
