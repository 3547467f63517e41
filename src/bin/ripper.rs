use ripper_core::csv_source::{CsvSource, DatasetSource};
use ripper_core::{codec, report, RipperConfig, RipperLearner, TracingLog};
use std::io::{self, IsTerminal};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

fn run() -> Result<(), String> {
    let mut args = std::env::args().skip(1);
    let subcommand = args.next().ok_or_else(|| format!("error: missing subcommand\n\n{}", help_text()))?;

    match subcommand.as_str() {
        "-h" | "--help" => {
            println!("{}", help_text());
            Ok(())
        }
        "-V" | "--version" => {
            println!("ripper {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "train" => run_train(args),
        "predict" => run_predict(args),
        "test" => run_test(args),
        other => Err(format!("error: unknown subcommand '{other}'\n\n{}", help_text())),
    }
}

struct CommonArgs {
    data: String,
    class_column: String,
    model: String,
    color: bool,
}

fn parse_common(args: &mut impl Iterator<Item = String>) -> Result<CommonArgs, String> {
    let mut data = None;
    let mut class_column = None;
    let mut model = None;
    let mut color = io::stdout().is_terminal();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data" => data = Some(args.next().ok_or("error: --data expects a value")?),
            "--class" => class_column = Some(args.next().ok_or("error: --class expects a value")?),
            "--model" => model = Some(args.next().ok_or("error: --model expects a value")?),
            "--color" => color = true,
            "--no-color" => color = false,
            _ if arg.starts_with("--data=") => data = Some(arg.trim_start_matches("--data=").to_string()),
            _ if arg.starts_with("--class=") => class_column = Some(arg.trim_start_matches("--class=").to_string()),
            _ if arg.starts_with("--model=") => model = Some(arg.trim_start_matches("--model=").to_string()),
            other => return Err(format!("error: unknown option '{other}'")),
        }
    }

    Ok(CommonArgs {
        data: data.ok_or("error: --data is required")?,
        class_column: class_column.ok_or("error: --class is required")?,
        model: model.ok_or("error: --model is required")?,
        color,
    })
}

fn run_train(mut args: impl Iterator<Item = String>) -> Result<(), String> {
    let common = parse_common(&mut args)?;
    let mut config = RipperConfig::default();
    let mut args2 = args;
    while let Some(arg) = args2.next() {
        match arg.as_str() {
            "--seed" => config.seed = parse_value(&mut args2, "--seed")?,
            "--folds" => config.folds = parse_value(&mut args2, "--folds")?,
            "--min-no" => config.min_no = parse_value(&mut args2, "--min-no")?,
            "--optimization-runs" => config.optimization_runs = parse_value(&mut args2, "--optimization-runs")?,
            "--no-pruning" => config.use_pruning = false,
            other => return Err(format!("error: unknown option '{other}'")),
        }
    }

    let source = CsvSource::new(&common.data, &common.class_column);
    let data = source.load().map_err(|e| e.to_string())?;

    let learner = RipperLearner::new(config);
    let model = learner.train_with_log(data, &TracingLog).map_err(|e| e.to_string())?;

    std::fs::write(&common.model, codec::encode(&model)).map_err(|e| e.to_string())?;
    report::print_model(&model, common.color);
    Ok(())
}

fn run_predict(mut args: impl Iterator<Item = String>) -> Result<(), String> {
    let common = parse_common(&mut args)?;
    let text = std::fs::read_to_string(&common.model).map_err(|e| e.to_string())?;
    let model = codec::decode(&text).map_err(|e| e.to_string())?;

    let source = CsvSource::new(&common.data, &common.class_column);
    let data = source.load().map_err(|e| e.to_string())?;

    let predictions = model.predict(&data).map_err(|e| e.to_string())?;
    for class in predictions {
        let label = model.schema[0].domain().and_then(|d| d.get(class)).cloned().unwrap_or_else(|| class.to_string());
        println!("{label}");
    }
    Ok(())
}

fn run_test(mut args: impl Iterator<Item = String>) -> Result<(), String> {
    let common = parse_common(&mut args)?;
    let text = std::fs::read_to_string(&common.model).map_err(|e| e.to_string())?;
    let model = codec::decode(&text).map_err(|e| e.to_string())?;

    let source = CsvSource::new(&common.data, &common.class_column);
    let data = source.load().map_err(|e| e.to_string())?;

    let measures = model.test(&data).map_err(|e| e.to_string())?;
    let domain = model.schema[0].domain().map(|d| d.to_vec()).unwrap_or_default();
    report::print_measures(&domain, &measures, common.color);
    Ok(())
}

fn parse_value<T: std::str::FromStr>(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<T, String> {
    let value = args.next().ok_or_else(|| format!("error: {flag} expects a value"))?;
    value.parse().map_err(|_| format!("error: invalid value for {flag}"))
}

fn help_text() -> String {
    format!(
        "ripper {version}

RIPPER rule-learning CLI.

Usage:
  ripper train --data <csv> --class <column> --model <out-path> [OPTIONS]
  ripper test --data <csv> --class <column> --model <path>
  ripper predict --data <csv> --class <column> --model <path>

Common options:
  --data <path>               Path to a CSV file with a header row.
  --class <column>            Name of the class column in the CSV header.
  --model <path>              Where to write (train) or read (test/predict) the model.
  --color / --no-color        Force or disable ANSI color output.

Train-only options:
  --seed <n>                  RNG seed (default 1).
  --folds <n>                 Grow/prune fold count (default 3).
  --min-no <f>                 Minimum coverage to accept an antecedent (default 2.0).
  --optimization-runs <n>      Revise/replace passes over the ruleset (default 2).
  --no-pruning                 Skip reduced-error pruning of grown rules.

  -h, --help                  Show this help message.
  -V, --version               Print version information.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
