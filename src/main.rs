mod report;

use ldml_collation::{Collation, LineBreak, Options, icu_rules_with, parse_collation_xml, preferred_rules_with};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "LDML_COLLATION_LOG";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let input = match read_input(config.path.as_deref()) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&config, &input) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Preferred,
    Icu,
    Report,
}

struct CliConfig {
    path: Option<String>,
    collation_type: Option<String>,
    options: Options,
    mode: Mode,
    color: bool,
}

fn run(config: &CliConfig, input: &str) -> Result<(), ldml_collation::CollationError> {
    let element = parse_collation_xml(input, config.collation_type.as_deref())?;
    let collation = Collation::from_element(&element)?;

    match config.mode {
        Mode::Preferred => println!("{}", preferred_rules_with(&collation, &config.options)?.text),
        Mode::Icu => println!("{}", icu_rules_with(&collation, &config.options)?),
        Mode::Report => {
            let source = config.path.as_deref().unwrap_or("<stdin>");
            report::print_report(source, &collation, &config.options, config.color)?;
        }
    }
    Ok(())
}

fn parse_args() -> Result<CliConfig, String> {
    let mut path: Option<String> = None;
    let mut collation_type: Option<String> = None;
    let mut options = Options::default();
    let mut mode = Mode::Preferred;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("ldml-collation {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--crlf" => options.line_break = LineBreak::CrLf,
            "--icu" => mode = Mode::Icu,
            "--report" => mode = Mode::Report,
            "--type" | "-t" => {
                let value = args.next().ok_or_else(|| "error: --type expects a value".to_string())?;
                collation_type = Some(value);
            }
            _ if arg.starts_with("--type=") => {
                collation_type = Some(arg.trim_start_matches("--type=").to_string());
            }
            "-" => set_path(&mut path, arg)?,
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => set_path(&mut path, arg)?,
        }
    }

    Ok(CliConfig { path: path.filter(|p| p != "-"), collation_type, options, mode, color })
}

fn set_path(path: &mut Option<String>, value: String) -> Result<(), String> {
    if path.is_some() {
        return Err("error: input provided multiple times".to_string());
    }
    *path = Some(value);
    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String, String> {
    let input = match path {
        Some(path) => std::fs::read_to_string(path).map_err(|err| format!("error: failed to read {path}: {err}"))?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
            buffer
        }
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }
    Ok(input)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "ldml-collation {version}

Compile an LDML <collation> element into ICU collation rules.

Usage:
  ldml-collation [OPTIONS] [FILE]

Reads the LDML document from FILE, or from stdin when FILE is omitted or '-'.
Prints the simple-rules form when the tailoring allows it, ICU rules otherwise.

Options:
  -t, --type <name>          Use the <collation> with this type attribute.
                             Default: the first <collation> in the document.
  --icu                      Always print full ICU rules.
  --report                   Print both rule forms and a short tree summary.
  --crlf                     Separate lines with CRLF instead of LF.
  --color                    Force ANSI color output (with --report).
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}=<filter>  Log filter (tracing EnvFilter syntax), e.g. debug.

Exit codes:
  0  Success.
  1  Invalid collation data.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV
    )
}
