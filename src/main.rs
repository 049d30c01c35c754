use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{generate, templates, validate, GlobalArgs};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "pipewright")]
#[command(version = VERSION)]
#[command(about = "Generate CI pipeline definitions from project configuration")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose and write the pipeline definition (default)
    Generate(generate::GenerateArgs),
    /// Load and validate the project configuration
    Validate(validate::ValidateArgs),
    /// List template fragments available to the composer
    Templates(templates::TemplatesArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    // A bare `pipewright` invocation generates with the fixed default
    // locations.
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Generate(generate::GenerateArgs::default()));

    let (json_result, exit_code) = commands::run_json(command, &global);

    if output::print_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
