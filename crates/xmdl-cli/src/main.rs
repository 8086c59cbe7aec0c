use xmdl_core::logging;

mod cli;

#[tokio::main]
async fn main() {
    // Log to the state-dir file when possible; stderr otherwise.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = cli::run_from_args().await {
        eprintln!("xmdl error: {:#}", err);
        std::process::exit(1);
    }
}
