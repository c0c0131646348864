use clap::{Parser, Subcommand};
use stella::project::{
    build::{compile_file, default_output, run_go, transpile_package, write_output, GoAction},
    scaffold::new_package,
    CliError,
};
use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};
use tracing_subscriber::{filter::EnvFilter, fmt};

const DEFAULT_TAB_SIZE: usize = 2;

#[derive(Parser)]
#[command(name = "stella", version, about = "Transpiles Stella source files to Go")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transpile a single .stella file to Go
    Tp {
        file: PathBuf,
        /// Output path, or `-` for stdout (defaults to <file>.go)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_TAB_SIZE)]
        tab_size: usize,
    },
    /// Check a .stella file without writing output
    Check { file: PathBuf },
    /// Create a new Stella package
    New { name: String },
    /// Transpile a package and run `go build`
    Build {
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Overrides `build.tab_size` from stella.toml
        #[arg(long)]
        tab_size: Option<usize>,
    },
    /// Transpile a package and run `go run`
    Run {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn execute(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Tp {
            file,
            output,
            tab_size,
        } => {
            let code = compile_file(&file, tab_size)?;
            match output {
                Some(path) if path.as_os_str() == "-" => io::stdout()
                    .write_all(code.as_bytes())
                    .map_err(|err| CliError::io(path, err)),
                Some(path) => write_output(&path, &code),
                None => write_output(&default_output(&file), &code),
            }
        }
        Commands::Check { file } => {
            compile_file(&file, DEFAULT_TAB_SIZE)?;
            eprintln!("{}: ok", file.display());
            Ok(())
        }
        Commands::New { name } => {
            let root = new_package(&PathBuf::from("."), &name)?;
            eprintln!("Created package `{name}` at {}", root.display());
            Ok(())
        }
        Commands::Build { dir, tab_size } => {
            let out_dir = transpile_package(&dir, tab_size)?;
            run_go(&out_dir, GoAction::Build)
        }
        Commands::Run { dir } => {
            let out_dir = transpile_package(&dir, None)?;
            run_go(&out_dir, GoAction::Run)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        // Already rendered as a diagnostic.
        Err(CliError::Compile { .. }) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
