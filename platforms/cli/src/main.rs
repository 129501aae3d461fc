use clap::Parser;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use turpass::{
    encode, ProfileLoader, ProfileManager, TransitionTable, TuringMachine, TuringMachineError,
    DEFAULT_PROFILE,
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// The password to validate. Read from the first line of stdin when omitted.
    /// Passwords that look like a flag can be passed after `--`.
    #[clap(allow_hyphen_values = true)]
    password: Option<String>,

    /// Print each step of the execution
    #[clap(short, long)]
    trace: bool,

    /// Print the execution as JSON
    #[clap(short, long, conflicts_with = "trace")]
    json: bool,

    /// Name of the alphabet profile to use
    #[clap(short, long, default_value = DEFAULT_PROFILE, conflicts_with = "profile_file")]
    profile: String,

    /// Load the alphabet profile from a file
    #[clap(long, value_name = "PATH")]
    profile_file: Option<PathBuf>,

    /// Register every `.profile` file in a directory before resolving `--profile`
    #[clap(long, value_name = "DIR")]
    profile_dir: Option<PathBuf>,

    /// Maximum number of steps before the run is rejected
    #[clap(short = 'm', long, value_name = "N")]
    max_steps: Option<usize>,

    /// Print the generated rule table and exit
    #[clap(long)]
    dump_table: bool,

    /// List the available profiles and exit
    #[clap(long)]
    list_profiles: bool,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<ExitCode, TuringMachineError> {
    if let Some(dir) = &cli.profile_dir {
        let registered = ProfileManager::load_directory(dir)?;
        tracing::info!(count = registered, dir = %dir.display(), "registered profiles");
    }

    if cli.list_profiles {
        for index in 0..ProfileManager::get_profile_count() {
            let info = ProfileManager::get_profile_info(index)?;
            println!(
                "{:<12} blank {:?}, {} symbols, {} rules",
                info.name, info.blank, info.symbol_count, info.rule_count
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    let table = load_table(cli)?;

    if cli.dump_table {
        print!("{}", encode(&table));
        return Ok(ExitCode::SUCCESS);
    }

    let password = match &cli.password {
        Some(password) => password.clone(),
        None => read_password()?,
    };

    let mut machine = TuringMachine::new(&table, &password);
    if let Some(limit) = cli.max_steps {
        machine = machine.with_step_limit(limit);
    }
    let execution = machine.execute();

    if cli.json {
        let json = serde_json::to_string_pretty(&execution)
            .map_err(|e| TuringMachineError::ValidationError(e.to_string()))?;
        println!("{json}");
    } else {
        if cli.trace {
            for entry in &execution.trace {
                println!("{entry}");
            }
            println!();
        }

        match execution.rejection() {
            None => println!("ACCEPTED"),
            Some(rejection) => println!("REJECTED ({rejection})"),
        }
    }

    Ok(if execution.accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn load_table(cli: &Cli) -> Result<Arc<TransitionTable>, TuringMachineError> {
    match &cli.profile_file {
        Some(path) => {
            let alphabet = ProfileLoader::load_profile(path)?;
            Ok(Arc::new(turpass::build(&alphabet)?))
        }
        None => ProfileManager::table(&cli.profile),
    }
}

fn read_password() -> Result<String, TuringMachineError> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| TuringMachineError::FileError(format!("Failed to read stdin: {e}")))?;

    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}
