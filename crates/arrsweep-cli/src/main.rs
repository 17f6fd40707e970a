#![forbid(unsafe_code)]

//! Binary entrypoint for the `arrsweep` CLI.

#[tokio::main(flavor = "current_thread")]
async fn main() {
    std::process::exit(arrsweep_cli::run().await);
}
