//! Headless auction house for scripted testing.
//!
//! Logging goes to stderr; stdout is reserved for the IPC protocol.
//!
//! On startup, emits a `Ready` JSON line to stdout.
//! Then reads `Command` JSON lines from stdin and writes `Response` lines.
//! The config file is taken from `AUCTION_CONFIG` when set.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use auction_house::format::{format_currency, friendly_number};
use auction_house::{
    create_bundle, spawn_expiry_sweeper, unpack, AuctionConfig, AuctionError, AuctionResult, Item,
    ListingRegistry, ListingValidator, SellRequest, SystemTimeProvider, ThreadRng,
};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ── IPC types ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ReadyEvent {
    event: &'static str,
    sell_limit: usize,
}

#[derive(Deserialize)]
#[serde(tag = "cmd")]
enum Command {
    Sell {
        seller: String,
        item: Item,
        category: String,
        base_price: String,
        #[serde(default)]
        starting_bid: Option<String>,
        #[serde(default)]
        bid_increment: Option<String>,
        #[serde(default)]
        duration_tiers: Vec<String>,
    },
    Bid {
        listing_id: String,
        bidder: String,
        amount: f64,
    },
    Buy {
        listing_id: String,
        buyer: String,
    },
    Settle {
        listing_id: String,
    },
    Cancel {
        listing_id: String,
    },
    Expired {
        seller: String,
    },
    Transactions {
        player: String,
    },
    Pack {
        base: Item,
        items: Vec<Item>,
    },
    Unpack {
        item: Item,
    },
    Friendly {
        value: f64,
    },
    Shutdown,
}

#[derive(Serialize)]
#[serde(tag = "status")]
enum Response {
    Ok { data: Option<serde_json::Value> },
    Err { message: String },
}

type Registry = ListingRegistry<SystemTimeProvider>;
type Validator = ListingValidator<SystemTimeProvider, ThreadRng>;

// ── Helpers ──────────────────────────────────────────────────────────

fn init_logging_stderr() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();
}

fn emit_json(value: &impl Serialize) -> anyhow::Result<()> {
    let line = serde_json::to_string(value).context("response serialization failed")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}").context("stdout write failed")?;
    stdout.flush().context("stdout flush failed")?;
    Ok(())
}

fn respond<T: Serialize, E: std::fmt::Display>(result: Result<T, E>) -> anyhow::Result<Response> {
    Ok(match result {
        Ok(value) => Response::Ok {
            data: Some(serde_json::to_value(value)?),
        },
        Err(e) => Response::Err {
            message: e.to_string(),
        },
    })
}

fn handle(
    command: Command,
    config: &AuctionConfig,
    registry: &Registry,
    validator: &Validator,
) -> anyhow::Result<Response> {
    match command {
        Command::Sell {
            seller,
            item,
            category,
            base_price,
            starting_bid,
            bid_increment,
            duration_tiers,
        } => {
            let request = SellRequest {
                seller,
                item_payload: item.to_cbor()?,
                category,
                base_price,
                starting_bid,
                bid_increment,
                duration_tiers,
            };
            let created = validator.validate(&request, registry).and_then(|listing| {
                let expires_at = listing.expires_at;
                registry
                    .add(listing)
                    .map(|id| serde_json::json!({ "listing_id": id, "expires_at": expires_at }))
            });
            respond(created)
        }

        Command::Bid {
            listing_id,
            bidder,
            amount,
        } => respond(
            registry
                .record_bid(&listing_id, &bidder, amount)
                .map(|l| serde_json::json!({ "current_price": l.current_price })),
        ),

        Command::Buy { listing_id, buyer } => respond(
            registry
                .mark_sold(&listing_id, &buyer)
                .map(|l| serde_json::json!({ "status": l.status })),
        ),

        Command::Settle { listing_id } => respond(registry.settle_bid(&listing_id).map(|l| {
            serde_json::json!({
                "status": l.status,
                "winner": l.current_owner_id,
                "final_price": l.current_price,
            })
        })),

        Command::Cancel { listing_id } => respond(
            registry
                .cancel(&listing_id)
                .map(|l| serde_json::json!({ "status": l.status })),
        ),

        Command::Expired { seller } => {
            let listings = registry
                .expired_for(&seller)
                .into_iter()
                .map(|l| -> AuctionResult<serde_json::Value> {
                    Ok(serde_json::json!({
                        "listing_id": l.id,
                        "status": l.status,
                        "expired_at": config.format_date(l.expires_at)?,
                    }))
                })
                .collect::<AuctionResult<Vec<_>>>();
            respond(listings)
        }

        Command::Transactions { player } => {
            let history = registry
                .transactions_for(&player)
                .into_iter()
                .map(|t| -> AuctionResult<serde_json::Value> {
                    let sold_on = config.format_date(t.sold_at)?;
                    let mut entry = serde_json::to_value(&t)
                        .map_err(|e| AuctionError::Serialization(e.to_string()))?;
                    entry["sold_on"] = serde_json::Value::String(sold_on);
                    Ok(entry)
                })
                .collect::<AuctionResult<Vec<_>>>();
            respond(history)
        }

        Command::Pack { base, items } => respond(create_bundle(
            &base,
            &items,
            &config.bundle,
            &ThreadRng::new(),
        )),

        Command::Unpack { item } => respond(unpack(&item)),

        Command::Friendly { value } => respond::<_, anyhow::Error>(Ok(serde_json::json!({
            "friendly": friendly_number(value),
            "currency": format_currency(value, config.use_alternate_currency_format),
        }))),

        Command::Shutdown => Ok(Response::Ok { data: None }),
    }
}

// ── Main ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging_stderr();

    let config = AuctionConfig::from_env().context("failed to load auction config")?;
    info!("auction-headless starting (sell_limit={})", config.sell_limit);

    let registry = Arc::new(ListingRegistry::from_config(&config));
    let validator = ListingValidator::new(config.clone(), SystemTimeProvider::new(), ThreadRng)
        .context("invalid listing policy")?;
    let shutdown = CancellationToken::new();
    let sweeper = spawn_expiry_sweeper(
        registry.clone(),
        Duration::from_secs(config.sweep_interval_secs),
        shutdown.clone(),
    );

    emit_json(&ReadyEvent {
        event: "Ready",
        sell_limit: config.sell_limit,
    })?;
    info!("Ready event emitted");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => {
                info!("stdin closed, shutting down");
                break;
            }
            Err(e) => {
                error!("stdin read error: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command: Command = match serde_json::from_str(&line) {
            Ok(c) => c,
            Err(e) => {
                emit_json(&Response::Err {
                    message: format!("Invalid command JSON: {e}"),
                })?;
                continue;
            }
        };

        let stop = matches!(command, Command::Shutdown);
        let response = handle(command, &config, &registry, &validator)?;
        emit_json(&response)?;
        if stop {
            info!("Shutdown command received");
            break;
        }
    }

    shutdown.cancel();
    sweeper.await.context("expiry sweeper panicked")?;
    info!("Shutdown complete");
    Ok(())
}
