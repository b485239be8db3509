use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_views::{
    config::AppConfig,
    state::AppState,
    views::{CartController, OrderHistoryView, PaymentSuccessView},
};

#[derive(Debug, Parser)]
#[command(name = "storefront-views", about = "Cart, order history and payment views")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the cart and its summary.
    Cart,
    /// Add one to a cart line.
    Increase { line_id: String },
    /// Take one off a cart line (never below 1).
    Decrease { line_id: String },
    /// Remove a cart line.
    Remove { line_id: String },
    /// Create a checkout session and print the payment page to open.
    Checkout,
    /// Show the order history.
    Orders,
    /// Verify a payment from the success page location.
    Success { location: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,storefront_views=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let state = AppState::new(config)?;

    // View operations log their own failures; the CLI prints whatever the view holds.
    match cli.command {
        Command::Cart => {
            let cart = CartController::new(state);
            let _ = cart.load().await;
            print!("{}", cart.render());
        }
        Command::Increase { line_id } => {
            let cart = CartController::new(state);
            let _ = cart.load().await;
            let _ = cart.increase_quantity(&line_id).await;
            print!("{}", cart.render());
        }
        Command::Decrease { line_id } => {
            let cart = CartController::new(state);
            let _ = cart.load().await;
            let _ = cart.decrease_quantity(&line_id).await;
            print!("{}", cart.render());
        }
        Command::Remove { line_id } => {
            let cart = CartController::new(state.clone());
            let _ = cart.load().await;
            let _ = cart.delete_line(&line_id).await;
            print!("{}", cart.render());
            println!("Cart items: {}", state.cart_count.current());
        }
        Command::Checkout => {
            let cart = CartController::new(state);
            let _ = cart.load().await;
            if let Ok(redirect) = cart.initiate_checkout().await {
                println!("Continue to payment: {}", redirect.url);
            }
        }
        Command::Orders => {
            let mut orders = OrderHistoryView::new(&state);
            orders.mount().await;
            print!("{}", orders.render());
        }
        Command::Success { location } => {
            let mut success = PaymentSuccessView::new(&state, &location);
            success.mount().await;
            print!("{}", success.render());
        }
    }

    Ok(())
}
