mod report;

use dicemath::{Options, evaluate_verbose_with};
use std::io::{self, IsTerminal, Read};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let mut failed = false;
    for input in &config.inputs {
        let run = evaluate_verbose_with(input, &config.options);
        failed |= run.evaluation.error;
        report::print_evaluation(input, &run, config.color, config.details);
    }

    if failed {
        std::process::exit(1);
    }
}

struct CliConfig {
    inputs: Vec<String>,
    options: Options,
    color: bool,
    details: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut options = Options::default();
    let mut color = io::stdout().is_terminal();
    let mut details = false;
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("dicemath {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "-v" | "--verbose" => options.verbose = true,
            "--details" => details = true,
            "--color" => color = true,
            "--no-color" => color = false,
            "--max-rolls" => {
                let value = args.next().ok_or_else(|| "error: --max-rolls expects a value".to_string())?;
                options.max_rolls = parse_limit("--max-rolls", &value)?;
            }
            "--max-verbose-dice" => {
                let value = args.next().ok_or_else(|| "error: --max-verbose-dice expects a value".to_string())?;
                options.max_verbose_dice = parse_limit("--max-verbose-dice", &value)?;
            }
            "--max-verbose-chars" => {
                let value = args.next().ok_or_else(|| "error: --max-verbose-chars expects a value".to_string())?;
                options.max_verbose_chars = parse_limit("--max-verbose-chars", &value)?;
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--max-rolls=") => {
                options.max_rolls = parse_limit("--max-rolls", arg.trim_start_matches("--max-rolls="))?;
            }
            _ if arg.starts_with("--max-verbose-dice=") => {
                options.max_verbose_dice =
                    parse_limit("--max-verbose-dice", arg.trim_start_matches("--max-verbose-dice="))?;
            }
            _ if arg.starts_with("--max-verbose-chars=") => {
                options.max_verbose_chars =
                    parse_limit("--max-verbose-chars", arg.trim_start_matches("--max-verbose-chars="))?;
            }
            _ if arg.starts_with("--input=") => {
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(arg.trim_start_matches("--input=").to_string());
            }
            _ if is_option_like(&arg) => {
                return Err(format!("error: unknown option '{arg}' (use -- before an expression like -e)"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let inputs = match input {
        Some(value) => vec![value],
        None => read_stdin_lines()?,
    };

    if inputs.iter().all(|i| i.trim().is_empty()) {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { inputs, options, color, details })
}

/// `--name` and single-letter `-x` are options. Anything else starting with
/// `-` (`-5+3`, `-pi`, `-sqrt(4)`) is an expression.
fn is_option_like(arg: &str) -> bool {
    if arg.starts_with("--") {
        return true;
    }
    let mut chars = arg.chars();
    chars.next() == Some('-') && chars.next().is_some_and(|c| c.is_ascii_alphabetic()) && chars.next().is_none()
}

/// Each non-empty stdin line is a separate expression.
fn read_stdin_lines() -> Result<Vec<String>, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer.lines().filter(|l| !l.trim().is_empty()).map(str::to_string).collect())
}

fn parse_limit<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value.parse().map_err(|_| format!("error: invalid {flag} '{value}' (expected a non-negative integer)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "dicemath {version}

Evaluates a mathematical expression.

Basic arithmetic operators are: + - / * ^. Remainder: %, Factorial: !
The random operator 'd' rolls dice: 1d20 rolls a twenty-sided die, 4d6 adds
up the rolls of four six-sided dice. Use uppercase 'D' to record the
individual rolls.
Functions: sqrt(a), cbrt(a), abs(a), floor(a), ceil(a), ln(a), sin(a),
cos(a), tan(a), arcsin(a), arccos(a), arctan(a), log(b, a), max(a, b, ...),
min(a, b, ...).
Constants: pi, tau, e, phi, c, G, k, epsilon, mu0, electron.

Usage:
  dicemath [OPTIONS] [--] <expression...>
  dicemath [OPTIONS] --input <expression>
  <lines> | dicemath [OPTIONS]

Options:
  -i, --input <expr>           Expression to evaluate. If omitted, reads the
                               remaining args, or one expression per stdin line.
  -v, --verbose                Always show the reduction trace.
  --details                    Show tiers, counters and timing per evaluation.
  --max-rolls <n>              Largest allowed dice count. Default: {max_rolls}
  --max-verbose-dice <n>       Verbose rolls listed before '...'. Default: {max_dice}
  --max-verbose-chars <n>      Characters of rolls listed per roll. Default: {max_chars}
  --color                      Force ANSI color output.
  --no-color                   Disable ANSI color output.
  -h, --help                   Show this help message.
  -V, --version                Print version information.

An expression may start with '-' (dicemath -pi/2). A negated single-letter
constant looks like a flag, so put '--' first: dicemath -- -e.

Environment:
  RUST_LOG=dicemath=trace      Log every reduction step to stderr.

Exit codes:
  0  Every expression evaluated.
  1  At least one expression failed to evaluate.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        max_rolls = Options::default().max_rolls,
        max_dice = Options::default().max_verbose_dice,
        max_chars = Options::default().max_verbose_chars,
    )
}
