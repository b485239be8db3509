use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc, Mutex, PoisonError, RwLock,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{
    dto::payment::CheckoutSession,
    error::{AppError, AppResult},
    models::{CartSnapshot, CartTotals, compute_totals},
    money::display_usd,
    state::AppState,
};

pub const LOADING_PLACEHOLDERS: usize = 4;

type LineLock = Arc<tokio::sync::Mutex<()>>;

/// Client-side cart state for one page visit.
///
/// The snapshot is only ever replaced wholesale by a successful fetch.
/// Mutations on the same line are queued behind that line's lock, so each one
/// reads the quantity left by the previous re-sync.
#[derive(Debug, Clone)]
pub struct CartController {
    state: AppState,
    snapshot: Arc<RwLock<CartSnapshot>>,
    loading: Arc<AtomicBool>,
    line_locks: Arc<Mutex<HashMap<String, LineLock>>>,
}

impl CartController {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            snapshot: Arc::default(),
            loading: Arc::default(),
            line_locks: Arc::default(),
        }
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn totals(&self) -> CartTotals {
        compute_totals(&self.snapshot())
    }

    /// Mount: fetch the cart with the loading flag raised.
    pub async fn load(&self) -> AppResult<()> {
        self.loading.store(true, Ordering::SeqCst);
        let result = self.fetch_cart().await;
        self.loading.store(false, Ordering::SeqCst);
        result
    }

    pub async fn fetch_cart(&self) -> AppResult<()> {
        match self.state.api.read_cart().await {
            Ok(snapshot) => {
                tracing::debug!(lines = snapshot.len(), "cart fetched");
                self.replace_snapshot(snapshot);
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "error fetching cart data");
                Err(err)
            }
        }
    }

    pub async fn increase_quantity(&self, line_id: &str) -> AppResult<()> {
        self.quantity_of(line_id)?;
        let lock = self.line_lock(line_id);
        let _queued = lock.lock().await;

        let quantity = match self.quantity_of(line_id) {
            Ok(quantity) => quantity,
            Err(err) => {
                self.release_line_lock(line_id, &lock);
                return Err(err);
            }
        };
        self.update_quantity(line_id, quantity.saturating_add(1), "error increasing quantity")
            .await
    }

    /// Lowers the quantity by one. A line at quantity 1 is left alone; only
    /// deletion takes a line to zero.
    pub async fn decrease_quantity(&self, line_id: &str) -> AppResult<()> {
        self.quantity_of(line_id)?;
        let lock = self.line_lock(line_id);
        let _queued = lock.lock().await;

        let quantity = match self.quantity_of(line_id) {
            Ok(quantity) => quantity,
            Err(err) => {
                self.release_line_lock(line_id, &lock);
                return Err(err);
            }
        };
        if quantity < 2 {
            tracing::debug!(line_id, quantity, "decrease skipped");
            return Ok(());
        }
        self.update_quantity(line_id, quantity - 1, "error decreasing quantity")
            .await
    }

    pub async fn delete_line(&self, line_id: &str) -> AppResult<()> {
        let lock = self.line_lock(line_id);
        let _queued = lock.lock().await;

        if let Err(err) = self.state.api.delete_cart_line(line_id).await {
            tracing::error!(error = %err, line_id, "error deleting cart product");
            return Err(err);
        }

        let resynced = self.fetch_cart().await;
        self.state.cart_count.refresh().await;
        if resynced.is_ok() {
            self.release_line_lock(line_id, &lock);
        }
        resynced
    }

    /// Creates a checkout session for the current snapshot and returns where
    /// the browser should be sent. Nothing local changes either way.
    pub async fn initiate_checkout(&self) -> AppResult<CheckoutRedirect> {
        if !self.state.config.payment_provider_ready() {
            tracing::error!("payment provider initialization failed");
            return Err(AppError::PaymentProviderUnavailable);
        }

        let snapshot = self.snapshot();
        match self.state.api.create_checkout_session(&snapshot).await {
            Ok(session) => {
                let redirect = CheckoutRedirect::new(&self.state.config.checkout_url, session);
                tracing::info!(session_id = %redirect.session_id, "checkout session created");
                Ok(redirect)
            }
            Err(err) => {
                tracing::error!(error = %err, "error processing payment");
                Err(err)
            }
        }
    }

    pub fn render(&self) -> CartRender {
        let snapshot = self.snapshot();
        if self.is_loading() {
            return CartRender::Loading {
                placeholders: LOADING_PLACEHOLDERS,
                summary_placeholder: !snapshot.is_empty(),
            };
        }

        if snapshot.is_empty() {
            return CartRender::Empty;
        }

        let rows = snapshot
            .lines()
            .iter()
            .map(|line| {
                let product = line.product.clone().unwrap_or_default();
                CartRow {
                    line_id: line.id.clone(),
                    image: product.first_image().map(str::to_string),
                    name: product.name().to_string(),
                    category: product.category().to_string(),
                    unit_price: display_usd(line.unit_price()),
                    line_total: display_usd(line.line_total()),
                    quantity: line.quantity,
                }
            })
            .collect();

        let totals = compute_totals(&snapshot);
        CartRender::Lines {
            rows,
            summary: CartSummary {
                quantity: totals.quantity,
                total_price: display_usd(totals.price),
            },
        }
    }

    async fn update_quantity(&self, line_id: &str, quantity: u32, context: &str) -> AppResult<()> {
        if let Err(err) = self.state.api.update_cart_line(line_id, quantity).await {
            tracing::error!(error = %err, line_id, quantity, "{context}");
            return Err(err);
        }
        self.fetch_cart().await
    }

    fn quantity_of(&self, line_id: &str) -> AppResult<u32> {
        let snapshot = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        match snapshot.line(line_id) {
            Some(line) => Ok(line.quantity),
            None => {
                tracing::warn!(line_id, "cart line not in snapshot");
                Err(AppError::UnknownLine(line_id.to_string()))
            }
        }
    }

    fn line_lock(&self, line_id: &str) -> LineLock {
        self.line_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(line_id.to_string())
            .or_default()
            .clone()
    }

    /// Drops the map entry for `line_id` unless another task is still queued on it.
    fn release_line_lock(&self, line_id: &str, lock: &LineLock) {
        let mut locks = self.line_locks.lock().unwrap_or_else(PoisonError::into_inner);
        let idle = locks
            .get(line_id)
            .is_some_and(|held| Arc::ptr_eq(held, lock) && Arc::strong_count(lock) == 2);
        if idle {
            locks.remove(line_id);
        }
    }

    fn replace_snapshot(&self, snapshot: CartSnapshot) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }
}

/// Externally hosted checkout page for a created session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirect {
    pub session_id: String,
    pub url: String,
}

impl CheckoutRedirect {
    pub fn new(checkout_url: &str, session: CheckoutSession) -> Self {
        let url = session
            .url
            .unwrap_or_else(|| format!("{checkout_url}{}", session.id));
        Self {
            session_id: session.id,
            url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRow {
    pub line_id: String,
    pub image: Option<String>,
    pub name: String,
    pub category: String,
    pub unit_price: String,
    pub line_total: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub quantity: u64,
    pub total_price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartRender {
    Loading {
        placeholders: usize,
        summary_placeholder: bool,
    },
    Empty,
    Lines { rows: Vec<CartRow>, summary: CartSummary },
}

impl fmt::Display for CartRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartRender::Loading {
                placeholders,
                summary_placeholder,
            } => {
                for _ in 0..*placeholders {
                    writeln!(f, "[ loading ]")?;
                }
                if *summary_placeholder {
                    writeln!(f, "[ loading summary ]")?;
                }
                Ok(())
            }
            CartRender::Empty => writeln!(f, "No Data"),
            CartRender::Lines { rows, summary } => {
                for row in rows {
                    writeln!(f, "{} ({})", row.name, row.line_id)?;
                    writeln!(f, "  {}", row.category)?;
                    writeln!(f, "  image: {}", row.image.as_deref().unwrap_or("-"))?;
                    writeln!(
                        f,
                        "  {} x {} = {}",
                        row.unit_price, row.quantity, row.line_total
                    )?;
                }
                writeln!(f, "Summary")?;
                writeln!(f, "  Quantity    {}", summary.quantity)?;
                writeln!(f, "  Total Price {}", summary.total_price)?;
                writeln!(f, "  [Payment]")
            }
        }
    }
}
