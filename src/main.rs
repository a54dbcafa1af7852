use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use wflow::{
    error::{Error, ParseError, RuntimeError},
    parse_program,
    simulation::{Simulation, SimulationConfig},
};

/// Exit status for malformed command lines.
const EXIT_USAGE: u8 = 64;
/// Exit status for programs with lexical or syntax errors.
const EXIT_DATA: u8 = 65;
/// Exit status for programs aborted by a runtime error.
const EXIT_SOFTWARE: u8 = 70;
/// Exit status for unreadable script files.
const EXIT_IO: u8 = 74;

/// wflow simulates rivers, dams and flow transfers over a number of days.
///
/// Without a script an interactive prompt is started, simulating every line
/// on its own.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print the parsed statements before simulating.
    #[arg(long)]
    print_ast: bool,

    /// The script to run.
    script: Option<PathBuf>,

    /// `RAINFALL`, or `DAYS RAINFALL`. Defaults to 1 day with 1.0 mm.
    #[arg(allow_negative_numbers = true, value_name = "NUMBERS")]
    numbers: Vec<String>,
}

fn main() -> ExitCode {
    install_tracing();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::from(EXIT_USAGE);
        },
        Err(e) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        },
    };

    let config = match resolve_config(&args.numbers) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("Usage: wflow [--print-ast] [script] [days] [rainfall]");
            return ExitCode::from(EXIT_USAGE);
        },
    };

    match args.script {
        Some(path) => run_file(&path, &config, args.print_ast),
        None => run_prompt(args.print_ast),
    }
}

/// Logs go to stderr so they never mix with simulation output.
fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr))
                                          .with(filter)
                                          .try_init();
}

/// Turns the trailing numbers into a configuration.
///
/// One number is the rainfall; two are the day count and the rainfall.
fn resolve_config(numbers: &[String]) -> Result<SimulationConfig, String> {
    let defaults = SimulationConfig::default();
    let (days, rainfall) = match numbers {
        [] => (defaults.days, defaults.rainfall),
        [rainfall] => (defaults.days, parse_rainfall(rainfall)?),
        [days, rainfall] => (parse_days(days)?, parse_rainfall(rainfall)?),
        _ => return Err("Too many arguments.".to_string()),
    };
    SimulationConfig::new(days, rainfall)
}

fn parse_days(text: &str) -> Result<u32, String> {
    text.parse()
        .map_err(|_| format!("Days must be a positive integer, found '{text}'."))
}

fn parse_rainfall(text: &str) -> Result<f64, String> {
    text.parse()
        .map_err(|_| format!("Rainfall must be a number, found '{text}'."))
}

fn run_file(path: &Path, config: &SimulationConfig, print_ast: bool) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read the script '{}': {e}", path.display());
            return ExitCode::from(EXIT_IO);
        },
    };

    let stdout = io::stdout();
    match run(&source, config, print_ast, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Parse(errors)) => {
            report_parse_errors(&errors);
            ExitCode::from(EXIT_DATA)
        },
        Err(Error::Runtime(error)) => {
            eprintln!("{error}");
            ExitCode::from(EXIT_SOFTWARE)
        },
    }
}

fn run_prompt(print_ast: bool) -> ExitCode {
    let stdout = io::stdout();
    match repl(io::stdin().lock(), &mut stdout.lock(), print_ast) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to read from the prompt: {e}");
            ExitCode::from(EXIT_IO)
        },
    }
}

/// Reads and simulates one line at a time until end of input.
///
/// Every line gets a fresh simulation; errors are reported and the session
/// goes on. A line that is not valid UTF-8 is reported and skipped.
///
/// # Errors
/// Any other failure to read `input` or to write the prompt.
fn repl(mut input: impl BufRead, out: &mut dyn Write, print_ast: bool) -> io::Result<()> {
    let config = SimulationConfig::default();
    let mut line = String::new();

    loop {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => return writeln!(out),
            Ok(_) => {},
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                eprintln!("Skipping unreadable line: {e}");
                continue;
            },
            Err(e) => return Err(e),
        }

        match run(line.trim_end_matches(['\n', '\r']), &config, print_ast, out) {
            Ok(()) => {},
            Err(Error::Parse(errors)) => report_parse_errors(&errors),
            Err(Error::Runtime(error)) => eprintln!("{error}"),
        }
    }
}

fn run(source: &str,
       config: &SimulationConfig,
       print_ast: bool,
       out: &mut dyn Write)
       -> Result<(), Error> {
    let program = parse_program(source)?;

    if print_ast {
        for statement in &program {
            writeln!(out, "{statement}").map_err(|e| RuntimeError::io(&e, statement.line_number()))?;
        }
    }

    Simulation::new(*config).run(&program, out)?;
    Ok(())
}

fn report_parse_errors(errors: &[ParseError]) {
    for error in errors {
        eprintln!("{error}");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn numbers(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn config_from_numbers() {
        assert_eq!(resolve_config(&[]).unwrap(), SimulationConfig::default());

        let one = resolve_config(&numbers(&["12.5"])).unwrap();
        assert_eq!((one.days, one.rainfall), (1, 12.5));

        let two = resolve_config(&numbers(&["3", "12.5"])).unwrap();
        assert_eq!((two.days, two.rainfall), (3, 12.5));
    }

    #[test]
    fn bad_numbers_are_usage_errors() {
        assert_eq!(resolve_config(&numbers(&["1", "2", "3"])).unwrap_err(), "Too many arguments.");
        assert!(resolve_config(&numbers(&["0", "1.0"])).is_err());
        assert!(resolve_config(&numbers(&["-2", "1.0"])).is_err());
        assert!(resolve_config(&numbers(&["1.5", "1.0"])).is_err());
        assert!(resolve_config(&numbers(&["-1.0"])).is_err());
        assert!(resolve_config(&numbers(&["lots"])).is_err());
    }

    #[test]
    fn repl_skips_unreadable_lines() {
        let input: &[u8] = b"print 1\n\xff\nprint 2\n";
        let mut out = Vec::new();

        repl(input, &mut out, false).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("> ").count(), 4);
        assert!(out.contains("===\n1\nNo river flows computed."));
        assert!(out.contains("===\n2\nNo river flows computed."));
    }

    #[test]
    fn repl_keeps_going_after_errors() {
        let input: &[u8] = b"print z\nprint (\nprint 3";
        let mut out = Vec::new();

        repl(input, &mut out, false).unwrap();

        assert!(String::from_utf8(out).unwrap().contains("===\n3\n"));
    }

    #[test]
    fn print_ast_write_failure_is_reported() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let result = run("print 1", &SimulationConfig::default(), true, &mut Broken);

        assert!(matches!(result, Err(Error::Runtime(RuntimeError::Io { line: 1, .. }))));
    }
}
