// SPDX-License-Identifier: MIT
//
// quire — command-line surface for the Quire document toolbox.
//
// Entry point. Initialises logging, parses arguments, and dispatches to the
// command modules. Errors are printed via Display and map to a non-zero
// exit code.

mod cli;
mod commands;
mod shared;

use clap::Parser;

use cli::{Cli, Commands};
use quire_core::error::Result;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = dispatch(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Merge { inputs, output } => commands::merge::run(&inputs, &output),
        Commands::Split { input, out_dir } => commands::split::run(&input, &out_dir),
        Commands::Organize {
            input,
            output,
            delete,
            rotate,
            order,
        } => commands::organize::run(
            &input,
            &output,
            delete.as_deref(),
            &rotate,
            order.as_deref(),
        ),
        Commands::Watermark {
            input,
            output,
            text,
            font_size,
            opacity,
            angle,
        } => commands::transform::watermark(&input, &output, &text, font_size, opacity, angle),
        Commands::Protect {
            input,
            output,
            password,
        } => commands::transform::protect(&input, &output, &password),
        Commands::Unlock {
            input,
            output,
            password,
        } => commands::transform::unlock(&input, &output, &password),
        Commands::Flatten { input, output } => commands::transform::flatten(&input, &output),
        Commands::Img2pdf {
            inputs,
            output,
            title,
        } => commands::img2pdf::run(&inputs, &output, &title),
        Commands::Convert {
            input,
            output,
            to,
            endpoint,
        } => commands::convert_cmd::run(&input, &output, endpoint, to).await,
        Commands::Metadata {
            input,
            output,
            title,
            author,
            subject,
            keywords,
        } => commands::metadata_cmd::run(
            &input,
            output.as_deref(),
            title,
            author,
            subject,
            keywords,
        ),
        #[cfg(feature = "ocr")]
        Commands::Ocr { inputs, model_dir } => {
            commands::ocr_cmd::run(&inputs, model_dir.as_deref())
        }
    }
}
