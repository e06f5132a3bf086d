// catswords-cli binary

use catswords::exchange::{exit_code, CatswordsCli, execute_command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catswords=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    let cli = CatswordsCli::parse_args();

    // One request at a time, nothing runs in the background
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = runtime.block_on(execute_command(cli)) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}
