//! supplier-selection service and CLI
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP service (reads SELECTION_BIND_ADDR / SELECTION_SNAPSHOT)
//! supplier-selection serve
//!
//! # Run one selection offline against a snapshot
//! supplier-selection select --input market.json --requirement REQ-0001
//!
//! # Force auto-assignment and print JSON
//! supplier-selection select --input market.json --requirement REQ-0001 --mode auto_assign --format json
//!
//! # Generate a random marketplace snapshot
//! supplier-selection generate --suppliers 30 --requirements 10
//! ```

use std::fs;
use std::process;
use std::sync::Arc;
use supplier_selection::config::ServiceConfig;
use supplier_selection::core::requirement::RequirementId;
use supplier_selection::selection::engine::{SelectionEngine, SelectionOutcome};
use supplier_selection::selection::policy::SelectionMode;
use supplier_selection::service::create_app;
use supplier_selection::simulation::marketplace::{generate_marketplace, MarketplaceConfig};
use supplier_selection::store::{InMemoryMarketplace, MarketplaceSnapshot, Stores};

fn print_usage() {
    eprintln!(
        r#"supplier-selection — supplier ranking and selection for procurement requirements

USAGE:
    supplier-selection <COMMAND> [OPTIONS]

COMMANDS:
    serve       Run the HTTP selection service
    select      Run one selection against a marketplace snapshot
    generate    Generate a random marketplace snapshot (for testing)
    help        Show this message

OPTIONS (select):
    --input <FILE>          Path to JSON marketplace snapshot
    --requirement <ID>      Requirement to select a supplier for
    --mode <MODE>           auto_assign, or omit for bidding
    --format <FORMAT>       Output format: text (default) or json

OPTIONS (generate):
    --suppliers <N>         Number of suppliers (default: 20)
    --requirements <N>      Number of requirements (default: 10)
    --categories <LIST>     Comma-separated categories (default: steel,cement)
    --output <FILE>         Write to file instead of stdout

ENVIRONMENT (serve):
    SELECTION_BIND_ADDR     Listen address (default: 0.0.0.0:8080)
    SELECTION_SNAPSHOT      Snapshot used to seed the in-memory stores
    RUST_LOG                Log filter (default: info)"#
    );
}

fn load_snapshot(path: &str) -> MarketplaceSnapshot {
    MarketplaceSnapshot::load(path).unwrap_or_else(|e| {
        eprintln!("Error loading snapshot '{}': {}", path, e);
        process::exit(1);
    })
}

fn next_value(args: &[String], i: usize, flag: &str, what: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{} requires {}", flag, what);
        process::exit(1);
    })
}

fn print_outcome_text(outcome: &SelectionOutcome) {
    let result = &outcome.result;
    let selected = &result.selected_supplier;
    println!("=== Selection Result ===");
    println!("Requirement:     {}", result.requirement_id);
    println!("Requested mode:  {}", result.requested_mode);
    println!("Executed mode:   {} ({})", result.mode, result.tier);
    println!("Selected:        {}", selected.supplier_id);
    if let Some(bid_id) = &selected.bid_id {
        println!("Bid:             {}", bid_id);
    }
    println!("Material cost:   {}", selected.material_cost.round_dp(2));
    println!("Logistics cost:  {}", selected.logistics_cost.round_dp(2));
    println!("Landed cost:     {}", selected.total_landed_cost.round_dp(2));
    println!(
        "Delivery prob:   {:.1}%",
        selected.delivery_success_probability * 100.0
    );
    println!("Quality risk:    {:.1}%", selected.quality_risk_score * 100.0);
    println!("Score:           {:.4}", selected.composite_score);
    if let Some(reason) = &result.fallback_reason {
        println!("Fallback:        {}", reason);
    }

    println!("\n--- Reasoning ---");
    for line in &selected.reasoning {
        println!("  {}", line);
    }

    if !result.runner_ups.is_empty() {
        println!("\n--- Runner-ups ---");
        for (i, r) in result.runner_ups.iter().enumerate() {
            println!(
                "  {}. {:<12} landed {:>14}  score {:.4}",
                i + 1,
                r.supplier_id,
                r.total_landed_cost.round_dp(2),
                r.composite_score
            );
        }
    }

    println!("\n--- Buyer quote ---");
    println!("  {}", outcome.quote.supplier_label);
    println!("  Price:    {}", outcome.quote.final_price.round_dp(2));
    println!("  Delivery: {} days", outcome.quote.estimated_delivery_days);
    println!("  Ref:      {}", outcome.quote.selection_id);
}

async fn cmd_select(args: &[String]) {
    let mut input_path = None;
    let mut requirement = None;
    let mut mode: Option<String> = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(next_value(args, i, "--input", "a file path"));
            }
            "--requirement" => {
                i += 1;
                requirement = Some(next_value(args, i, "--requirement", "a requirement id"));
            }
            "--mode" => {
                i += 1;
                mode = Some(next_value(args, i, "--mode", "a selection mode"));
            }
            "--format" => {
                i += 1;
                format = next_value(args, i, "--format", "'text' or 'json'");
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });
    let requirement_id = RequirementId::new(requirement.unwrap_or_default());

    let market = Arc::new(InMemoryMarketplace::from_snapshot(load_snapshot(&path)));
    let engine = SelectionEngine::new(Stores::in_memory(market));
    let mode = SelectionMode::from_request(mode.as_deref());

    let outcome = engine
        .select(&requirement_id, mode)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Selection failed: {}", e);
            process::exit(1);
        });

    if format == "json" {
        let output = serde_json::json!({
            "result": outcome.result,
            "quote": outcome.quote,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error encoding result: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_outcome_text(&outcome);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = MarketplaceConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--suppliers" => {
                i += 1;
                config.supplier_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--suppliers requires a number");
                        process::exit(1);
                    });
            }
            "--requirements" => {
                i += 1;
                config.requirement_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--requirements requires a number");
                        process::exit(1);
                    });
            }
            "--categories" => {
                i += 1;
                config.categories = next_value(args, i, "--categories", "a comma-separated list")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            "--output" => {
                i += 1;
                output_path = Some(next_value(args, i, "--output", "a file path"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let snapshot = generate_marketplace(&config);
    let json = snapshot.to_json_pretty().unwrap_or_else(|e| {
        eprintln!("Error encoding snapshot: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} requirements, {} bids across {} suppliers → {}",
            snapshot.requirements.len(),
            snapshot.bids.len(),
            config.supplier_count,
            path
        );
    } else {
        println!("{}", json);
    }
}

async fn cmd_serve() {
    let config = ServiceConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    });

    let market = match &config.snapshot_path {
        Some(path) => {
            let snapshot = MarketplaceSnapshot::load(path).unwrap_or_else(|e| {
                eprintln!("Error loading snapshot '{}': {}", path.display(), e);
                process::exit(1);
            });
            log::info!(
                "seeded stores from {} ({} requirements, {} bids)",
                path.display(),
                snapshot.requirements.len(),
                snapshot.bids.len()
            );
            InMemoryMarketplace::from_snapshot(snapshot)
        }
        None => {
            log::warn!("SELECTION_SNAPSHOT not set; starting with empty stores");
            InMemoryMarketplace::new()
        }
    };

    let engine = SelectionEngine::new(Stores::in_memory(Arc::new(market)));
    let app = create_app(engine);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error binding {}: {}", config.bind_addr, e);
            process::exit(1);
        });
    log::info!("supplier selection service listening on {}", config.bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("server error: {}", e);
        process::exit(1);
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "serve" => cmd_serve().await,
        "select" => cmd_select(rest).await,
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
