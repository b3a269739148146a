//! gradle-init CLI - Resolve and validate template variables for Gradle scaffolding.

use clap::Parser;
use gradle_init::cli::{Cli, Commands, ConfigCommands, TemplatesCommands};
use gradle_init::commands::{self, ContextArgs, Output};
use gradle_init::config::{AppPaths, EnvVars};
use std::io;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    init_logging();

    let cli = Cli::parse();
    let human = cli.human_readable;

    let paths = match cli.home {
        Some(dir) => AppPaths::new(dir),
        None => match AppPaths::from_env() {
            Ok(paths) => paths,
            Err(e) => fail(&e, human),
        },
    };

    if let Err(e) = run_command(cli.command, &paths, human) {
        fail(&e, human);
    }
}

/// Report an error on stderr and exit non-zero.
fn fail(e: &gradle_init::Error, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
    process::exit(1);
}

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` overrides the level.
fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "gradle_init=warn".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn run_command(command: Commands, paths: &AppPaths, human: bool) -> Result<(), gradle_init::Error> {
    match command {
        Commands::Context {
            template,
            project_name,
            flags,
            config,
            interactive,
        } => {
            let args = ContextArgs {
                template,
                project_name,
                flags,
                config,
            };
            let env = EnvVars::from_process();
            let result = if interactive {
                let stdin = io::stdin();
                commands::context_interactive(
                    paths,
                    &args,
                    env,
                    &mut stdin.lock(),
                    &mut io::stderr(),
                )?
            } else {
                commands::context(paths, &args, env)?
            };
            output(&result, human);
        }
        Commands::Compile { template, force } => {
            let result = commands::compile(paths, &template, force)?;
            output(&result, human);
        }
        Commands::Templates { command } => match command {
            TemplatesCommands::List => {
                let result = commands::templates_list(paths)?;
                output(&result, human);
            }
            TemplatesCommands::Info { template } => {
                let result = commands::templates_info(paths, &template)?;
                output(&result, human);
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let result = commands::config_show(paths)?;
                output(&result, human);
            }
            ConfigCommands::Init { force } => {
                let result = commands::config_init(paths, force)?;
                output(&result, human);
            }
        },
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
