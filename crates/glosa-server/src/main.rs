//! Glosa Server CLI
//!
//! Starts the HTTP server that extracts study concepts from uploaded documents.

use glosa_server::{config::ServerConfig, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("No config file specified, using defaults");
        eprintln!("Usage: glosa-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default()
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Glosa Server - Concept extraction from PDF, DOCX and TXT uploads");
    println!();
    println!("USAGE:");
    println!("    glosa-server [--config <path-to-config.toml>]");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    glosa-server --config config/glosa.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain (all optional):");
    println!("    - bind_address / bind_port: listener (default 127.0.0.1:5000)");
    println!("    - allowed_origin: CORS origin (default http://localhost:3000)");
    println!("    - max_upload_bytes: upload limit (default 20 MiB)");
    println!("    - [backend]: endpoint, model, api_key, timeout_secs, enabled");
    println!("    - [extractor]: chunking, retry and fallback tuning");
    println!();
    println!("ENVIRONMENT:");
    println!("    OPENAI_API_KEY     Bearer key when backend.api_key is unset");
    println!("    RUST_LOG           Log filter (default: info)");
    println!();
}
