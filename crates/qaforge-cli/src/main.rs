//! QAForge CLI - Generate instruction-tuning QA pairs from plain-text documents.

use clap::Parser;
use qaforge_cli::{logging, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match qaforge_cli::run(cli).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
