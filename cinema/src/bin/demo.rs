//! Cinema seat map demo.
//!
//! Generates the seat map for a catalog session, clicks a few seats,
//! confirms the selection and pays through the simulated gateway.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin demo -- [pix|credit|debit] [SEAT...]
//! ```
//!
//! Venue shape, selection rules and gateway timing come from `CINEMA_*`
//! variables (see `cinema::config`); a `.env` file is honoured.
//!
//! ```bash
//! CINEMA_SEED=7 CINEMA_PIX_APPROVAL_RATE=1 cargo run --bin demo -- pix J05 J06 J07
//! ```

use anyhow::{bail, Context};
use cinema::{
    generate_seat_map, Catalog, CardDetails, CheckoutPhase, Config, LogNotifier, PaymentMethod,
    SeatMap, SeatMapAction, SeatMapEnvironment, SeatMapReducer, SeatMapState, SeatStatus, Section,
    SimulatedGateway,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use seatmap_core::environment::SystemClock;
use seatmap_runtime::Store;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_SEATS: [&str; 3] = ["J05", "J06", "J07"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinema=debug,seatmap_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let mut args = std::env::args().skip(1);
    let method = payment_method(args.next().as_deref().unwrap_or("pix"))?;
    let mut seats: Vec<String> = args.collect();
    if seats.is_empty() {
        seats = DEFAULT_SEATS.iter().map(ToString::to_string).collect();
    }

    let catalog = Catalog::demo();
    let session = catalog
        .session(config.session_id)
        .with_context(|| format!("Session {} is not in the catalog", config.session_id))?;
    let movie = catalog
        .movie(session.movie_id)
        .with_context(|| format!("Movie {} is not in the catalog", session.movie_id))?;

    info!(
        "=== {} | {} {} | {} | {} per seat ===",
        movie.title, session.room, session.format, session.starts_at, session.price
    );

    let mut rng = config
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let seat_map = generate_seat_map(&config.layout, &mut rng).context("Failed to generate seat map")?;

    let env = SeatMapEnvironment::new(
        Arc::new(SystemClock),
        Arc::new(LogNotifier),
        Arc::new(SimulatedGateway::new(config.payment)),
    );
    let store = Store::new(
        SeatMapState::for_session(session, seat_map).with_policy(config.policy),
        SeatMapReducer::new(),
        env,
    );

    for seat_id in seats {
        store.send(SeatMapAction::ClickSeat { seat_id }).await?;
    }
    store.send(SeatMapAction::ConfirmSelection).await?;

    let (map, checkout) = store.state(|s| (s.seats.clone(), s.checkout.clone())).await;
    println!("{}", render(&map));

    let CheckoutPhase::AwaitingPayment(request) = checkout else {
        info!("Nothing to pay for");
        store.shutdown(Duration::from_secs(1)).await?;
        return Ok(());
    };
    let seat_list: Vec<&str> = request.selected_seat_ids.iter().map(|id| id.as_str()).collect();
    info!(seats = %seat_list.join(", "), total = %request.total_price, "Selection confirmed");

    let timeout = config.payment.card_latency + config.payment.pix_latency + Duration::from_secs(5);
    let outcome = store
        .send_and_wait_for(
            SeatMapAction::SubmitPayment { method },
            SeatMapAction::is_payment_outcome,
            timeout,
        )
        .await
        .context("Payment did not complete")?;

    match outcome {
        SeatMapAction::PaymentSucceeded { receipt } => {
            info!(transaction_id = %receipt.transaction_id, amount = %receipt.amount, "Booked");
            if let Some((count, each)) = receipt.installments {
                info!("Paid in {count}x of {each}");
            }
        },
        SeatMapAction::PaymentFailed { error } => info!(%error, "Payment refused"),
        _ => {},
    }

    store.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}

fn payment_method(name: &str) -> anyhow::Result<PaymentMethod> {
    let card = || CardDetails {
        number: "4111 1111 1111 1111".to_string(),
        holder: "Maria Silva".to_string(),
        expiry: "12/29".to_string(),
        cvv: "123".to_string(),
    };
    Ok(match name {
        "pix" => PaymentMethod::Pix,
        "credit" => PaymentMethod::Credit {
            card: card(),
            installments: 2,
        },
        "debit" => PaymentMethod::Debit { card: card() },
        other => bail!("Unknown payment method {other:?}, expected pix, credit or debit"),
    })
}

/// One line per row, aisle seats set apart
fn render(map: &SeatMap) -> String {
    let mut out = String::new();
    for row in map.rows() {
        out.push(row.letter);
        out.push(' ');
        let mut previous: Option<Section> = None;
        for seat in row.seats {
            if previous.is_some_and(|section| section != seat.section) {
                out.push_str("  ");
            }
            previous = Some(seat.section);
            out.push(match (seat.status, seat.section) {
                (SeatStatus::Occupied, _) => 'x',
                (SeatStatus::Selected, _) => '#',
                (SeatStatus::Vip, _) => 'V',
                (SeatStatus::Premium, _) => 'P',
                (SeatStatus::Available, Section::Main) => '.',
                (SeatStatus::Available, _) => 'o',
            });
        }
        out.push('\n');
    }
    out.push_str("o available  x occupied  # selected  V vip  P premium  . aisle");
    out
}
