use clap::Parser;
use tradeledger::cli::{Cli, init_logging, run};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    run(cli)
}
