use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    quotedesk_cli::run().await
}
