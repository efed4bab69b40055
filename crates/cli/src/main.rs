use std::process::ExitCode;

fn main() -> ExitCode {
    planora_cli::run()
}
