mod inspect;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inspect::StructReport;
use qbr::{OperationType, TagKeys};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "qbr-cli")]
#[command(about = "Inspect the field descriptors qbr derives from annotated structs")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the column mapping and ignore lists of every tagged struct
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
struct InspectArgs {
    /// Rust source files to inspect
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Only show columns that take part in this operation (e.g. insert)
    #[arg(long)]
    op: Option<String>,

    /// Fail on unknown operations in ignore_on and on duplicate columns
    #[arg(long)]
    strict: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Attribute holding the column name
    #[arg(long, default_value = "db")]
    column_tag: String,

    /// Attribute holding the directives
    #[arg(long, default_value = "qbr")]
    directive_tag: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Inspect(args) => run_inspect(args),
    }
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let keys = TagKeys {
        column: args.column_tag,
        directive: args.directive_tag,
    };
    let op = args.op.as_deref().map(OperationType::new);

    let mut reports = Vec::new();
    for path in &args.files {
        let source =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let structs = inspect::parse_source(&source, &keys)
            .with_context(|| format!("Failed to inspect {:?}", path))?;

        tracing::debug!(file = ?path, structs = structs.len(), "parsed");

        for info in structs {
            let schema = info.schema(&keys);
            if args.strict {
                schema
                    .validate_known()
                    .with_context(|| format!("{} in {:?}", info.name, path))?;
            }
            reports.push(StructReport {
                file: path.display().to_string(),
                name: info.name,
                schema,
            });
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&reports).context("Failed to serialize report")?;
        println!("{}", json);
        return Ok(());
    }

    if reports.is_empty() {
        println!("No tagged structs found");
        return Ok(());
    }

    for report in &reports {
        print!("{}", render_table(report, op.as_ref()));
    }

    Ok(())
}

/// 以表格形式输出一个结构体的字段映射
fn render_table(report: &StructReport, op: Option<&OperationType>) -> String {
    let mut out = format!("{} ({})\n", report.name, report.file);

    let rows: Vec<_> = report
        .schema
        .iter()
        .filter(|f| op.map_or(true, |op| !f.descriptor.is_ignored(op)))
        .collect();

    if rows.is_empty() {
        out.push_str("  (no columns)\n");
        return out;
    }

    let width = rows.iter().map(|f| f.name.len()).max().unwrap_or(0);
    for field in rows {
        let ignore_on: Vec<&str> = field
            .descriptor
            .ignore_on()
            .iter()
            .map(OperationType::as_str)
            .collect();
        let ignore_on = if ignore_on.is_empty() {
            "-".to_string()
        } else {
            ignore_on.join(",")
        };
        out.push_str(&format!(
            "  {:width$}  -> {}  ignore_on: {}\n",
            field.name,
            field.descriptor.column(),
            ignore_on,
            width = width
        ));
    }
    out
}
