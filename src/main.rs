use clap::Parser;
use std::{
    fs::read_to_string,
    io::{stdin, stdout, BufRead, IsTerminal, Write},
    path::PathBuf,
    process::ExitCode,
    thread,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use treeforth::{
    CodeManagement, ErrorKind, ForthMachine, Interpreter, InterpreterStack, MachineConfig,
    ScriptError,
    lang::statements::{validate, StatementParser},
    runtime::built_ins::base_words::machine_words::radix_from_name,
};

/// The path used for locations of code typed into the repl.
const REPL_PATH: &str = "<repl>";

/// Host stack reserved for every level of `--max-depth`.
const STACK_PER_CALL: usize = 16 * 1024;

/// Environment variable consulted for the log filter when `--log-level` isn't given.
const LOG_ENV: &str = "TREEFORTH_LOG";

/// Run Forth scripts, or start an interactive session.
#[derive(Parser, Debug)]
#[command(name = "treeforth", version)]
#[command(about = "A small Forth interpreter that runs straight from the token stream")]
struct Args {
    /// Script to run.  Without one an interactive session is started.
    script: Option<PathBuf>,

    /// Starting radix, either a name like HEX or a number from 2 to 36
    #[arg(short, long, default_value = "DECIMAL", value_parser = parse_radix)]
    base: u32,

    /// Maximum nesting depth of user defined word calls
    #[arg(long, default_value_t = MachineConfig::default().max_call_depth)]
    max_depth: usize,

    /// Log filter, for example warn or treeforth=debug
    #[arg(long)]
    log_level: Option<String>,
}

/// Accept either a named radix or a plain number in range.
fn parse_radix(text: &str) -> Result<u32, String> {
    if let Some(radix) = radix_from_name(text) {
        return Ok(radix);
    }

    match text.parse::<u32>() {
        Ok(radix) if (2..=36).contains(&radix) => Ok(radix),
        _ => Err(format!("{} is not a radix name or a number from 2 to 36", text)),
    }
}

/// Install the log subscriber.  Logs go to stderr so they never mix with script output.
fn init_logging(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_env(LOG_ENV).ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Is the error a request to end the session rather than a failure?
fn is_exit(error: &ScriptError) -> bool {
    error.kind() == ErrorKind::ExitRequested
}

/// Is the error only because the submission isn't finished yet?  The repl keeps reading lines for
/// these.
fn is_incomplete(error: &ScriptError) -> bool {
    matches!(
        error.kind(),
        ErrorKind::MissingTerminator | ErrorKind::UnterminatedComment | ErrorKind::UnterminatedString
    )
}

/// Run a whole script, printing the output of each statement as it completes.
fn run_script(machine: &mut ForthMachine, path: &PathBuf) -> treeforth::Result<()> {
    let source = read_to_string(path)?;
    let path = path.to_string_lossy();

    info!(script = %path, "Running script.");

    for statement in StatementParser::new(&path, &source) {
        let output = machine.execute_statement(statement?)?;

        print!("{}", output);
    }

    stdout().flush()?;

    Ok(())
}

/// Print the definition of every word, in definition order.
fn print_ops(machine: &ForthMachine) {
    for word in machine.dictionary().list() {
        println!("{}", word);
    }
}

/// Run a complete submission one statement at a time, reporting each result.  The first failure
/// ends the submission.  Returns false once the session has been ended by `QUIT` or `BYE`.
fn run_submission(
    machine: &mut ForthMachine,
    submission: &str,
    out: &mut dyn Write,
) -> treeforth::Result<bool> {
    for statement in StatementParser::new(REPL_PATH, submission) {
        let result = statement.and_then(|statement| machine.execute_statement(statement));

        match result {
            Ok(output) => writeln!(out, "{} ok", output)?,
            Err(error) if is_exit(&error) => return Ok(false),
            Err(error) => {
                // Lex and parse errors never reach the machine, so clear here as well.
                machine.clear_stack();
                writeln!(out, "{} ?", error)?;
                break;
            }
        }
    }

    Ok(true)
}

/// Read lines until a complete submission has been entered, then run it statement by statement.
/// Returns once the input runs out or the session is ended by `QUIT` or `BYE`.
fn repl(machine: &mut ForthMachine) -> treeforth::Result<()> {
    let interactive = stdin().is_terminal();
    let mut buffer = String::new();

    let prompt = |continuing: bool| -> treeforth::Result<()> {
        if interactive {
            print!("{}", if continuing { ".. " } else { "> " });
            stdout().flush()?;
        }

        Ok(())
    };

    prompt(false)?;

    for line in stdin().lock().lines() {
        let line = line?;

        if buffer.is_empty() && line.trim() == "ops" {
            print_ops(machine);
            prompt(false)?;
            continue;
        }

        buffer.push_str(&line);
        buffer.push('\n');

        if let Err(error) = validate(REPL_PATH, &buffer) {
            if is_incomplete(&error) {
                debug!("Submission incomplete, reading more.");
                prompt(true)?;
                continue;
            }
        }

        let submission = std::mem::take(&mut buffer);

        if !run_submission(machine, &submission, &mut stdout())? {
            return Ok(());
        }

        prompt(false)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.log_level.as_deref());

    let config = MachineConfig {
        radix: args.base,
        max_call_depth: args.max_depth,
        ..MachineConfig::default()
    };

    // The machine recurses on the host stack, so give it a thread sized for the depth limit.
    let stack_size = config.max_call_depth.saturating_add(64).saturating_mul(STACK_PER_CALL);
    let script = args.script.clone();

    let session = thread::Builder::new()
        .name("treeforth".to_string())
        .stack_size(stack_size)
        .spawn(move || {
            let mut machine = ForthMachine::with_config(config);

            match &script {
                Some(path) => run_script(&mut machine, path),
                None => repl(&mut machine),
            }
        });

    let result = match session {
        Ok(handle) => match handle.join() {
            Ok(result) => result,
            Err(_) => {
                eprintln!("Error: the interpreter thread panicked.");
                return ExitCode::FAILURE;
            }
        },
        Err(error) => Err(error.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) if is_exit(&error) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        }
    }
}
