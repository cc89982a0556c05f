use bridgeschema::commands::{combine, parse};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bridgeschema", version, about)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Combine module spec files into one schema JSON file
    Combine(combine::CombineArgs),
    /// Print the schema and diagnostics for one spec file
    Parse(parse::ParseArgs),
}

fn handle_schema_flag() -> bool {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) != Some("--schema") {
        return false;
    }
    let response = serde_json::json!({
        "config_path": bridgeschema::config::CONFIG_FILE_NAME,
        "format": "toml",
        "schema": schemars::schema_for!(bridgeschema::BridgeschemaConfig)
    });
    match serde_json::to_string_pretty(&response) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("error: {}", e),
    }
    true
}

/// Reset SIGPIPE to default behavior so piping to `head` etc. doesn't panic.
#[cfg(unix)]
fn reset_sigpipe() {
    // SAFETY: only changes the signal disposition of SIGPIPE back to the default.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}

fn init_logging(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    reset_sigpipe();

    if handle_schema_flag() {
        return;
    }

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match cli.command {
        Command::Combine(args) => combine::run(args),
        Command::Parse(args) => parse::run(args),
    };
    std::process::exit(code);
}
