use recres_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Log file first; stderr if the state dir is not writable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    let code = match CliCommand::run_from_args().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("recres error: {:#}", err);
            cli::exit_code(&err)
        }
    };
    // Exit without dropping the runtime: abandoned probes must not hold the process.
    std::process::exit(code);
}
