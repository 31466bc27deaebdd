use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use orderflow::application::service::OrderService;
use orderflow::config::{PAYPAL_SANDBOX_URL, PayPalConfig};
use orderflow::domain::cart::{Cart, CartItem};
use orderflow::domain::money::Money;
use orderflow::domain::payment::PaymentApproval;
use orderflow::domain::ports::PaymentGatewayBox;
use orderflow::domain::user::{Session, ShippingAddress, UserId, UserProfile};
use orderflow::error::OrderError;
use orderflow::infrastructure::in_memory::InMemoryStore;
use orderflow::infrastructure::paypal::PayPalClient;
use orderflow::infrastructure::sandbox::SandboxGateway;
use orderflow::interfaces::actions;
use orderflow::interfaces::csv::cart_reader::CartReader;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GatewayKind {
    Sandbox,
    Paypal,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Cart lines CSV file (productId,name,slug,image,price,qty)
    cart: PathBuf,

    /// Shopper profile JSON file (name, email, address, paymentMethod)
    #[arg(long)]
    profile: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    #[arg(long, default_value = "0")]
    shipping_price: Decimal,

    #[arg(long, default_value = "0")]
    tax_price: Decimal,

    /// Payment processor to use
    #[arg(long, value_enum, default_value_t = GatewayKind::Sandbox)]
    gateway: GatewayKind,

    /// Payer reported by the sandbox processor
    #[arg(long, default_value = "sandbox-buyer@example.com")]
    payer_email: String,

    #[arg(long, env = "PAYPAL_CLIENT_ID", hide_env_values = true)]
    paypal_client_id: Option<String>,

    #[arg(long, env = "PAYPAL_APP_SECRET", hide_env_values = true)]
    paypal_app_secret: Option<String>,

    #[arg(long, env = "PAYPAL_API_URL", default_value = PAYPAL_SANDBOX_URL)]
    paypal_api_url: String,

    #[arg(long, env = "PAYPAL_TIMEOUT_SECS", default_value_t = 30)]
    paypal_timeout_secs: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileInput {
    name: String,
    email: String,
    #[serde(default)]
    address: Option<ShippingAddress>,
    #[serde(default)]
    payment_method: Option<String>,
}

fn gateway(cli: &Cli) -> Result<PaymentGatewayBox> {
    match cli.gateway {
        GatewayKind::Sandbox => Ok(Box::new(
            SandboxGateway::new().with_payer_email(cli.payer_email.clone()),
        )),
        GatewayKind::Paypal => {
            let (Some(client_id), Some(secret)) = (&cli.paypal_client_id, &cli.paypal_app_secret)
            else {
                return Err(OrderError::ConfigError(
                    "PAYPAL_CLIENT_ID and PAYPAL_APP_SECRET are required for --gateway paypal"
                        .to_string(),
                ))
                .into_diagnostic();
            };
            let config = PayPalConfig::new(client_id.clone(), secret.clone())
                .with_api_url(cli.paypal_api_url.clone())
                .with_timeout(Duration::from_secs(cli.paypal_timeout_secs));
            Ok(Box::new(PayPalClient::new(config).into_diagnostic()?))
        }
    }
}

fn read_cart_items(path: &Path) -> Result<Vec<CartItem>> {
    let file = File::open(path).into_diagnostic()?;
    let mut items = Vec::new();
    for item in CartReader::new(file).items() {
        match item {
            Ok(item) => items.push(item),
            Err(e) => warn!(error = %e, "Error reading cart line"),
        }
    }
    Ok(items)
}

fn print_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value).into_diagnostic()?;
    writeln!(out).into_diagnostic()
}

#[cfg(feature = "storage-rocksdb")]
fn rocksdb_service(
    db_path: &Path,
    profile: &UserProfile,
    cart: &Cart,
    gateway: PaymentGatewayBox,
) -> Result<OrderService> {
    use orderflow::infrastructure::rocksdb::RocksDBStore;

    let store = RocksDBStore::open(db_path).into_diagnostic()?;
    store.add_user(profile).into_diagnostic()?;
    for item in &cart.items {
        store.add_product(&item.product_id).into_diagnostic()?;
    }
    store.put_cart(cart).into_diagnostic()?;

    Ok(OrderService::new(
        Box::new(store.clone()),
        Box::new(store.clone()),
        Box::new(store),
        gateway,
    ))
}

async fn in_memory_service(
    profile: &UserProfile,
    cart: &Cart,
    gateway: PaymentGatewayBox,
) -> OrderService {
    let store = InMemoryStore::new();
    store.add_user(profile.clone()).await;
    for item in &cart.items {
        store.add_product(item.product_id.clone()).await;
    }
    store.put_cart(cart.clone()).await;

    OrderService::new(
        Box::new(store.clone()),
        Box::new(store.clone()),
        Box::new(store),
        gateway,
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let input: ProfileInput =
        serde_json::from_reader(File::open(&cli.profile).into_diagnostic()?).into_diagnostic()?;
    let profile = UserProfile {
        id: UserId::new(),
        name: input.name,
        email: input.email,
        address: input.address,
        payment_method: input.payment_method,
    };
    let cart = Cart::priced(
        profile.id,
        read_cart_items(&cli.cart)?,
        Money::new(cli.shipping_price),
        Money::new(cli.tax_price),
    );
    let gateway = gateway(&cli)?;

    let service = match &cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => rocksdb_service(db_path, &profile, &cart, gateway)?,
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            warn!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            in_memory_service(&profile, &cart, gateway).await
        }
        None => in_memory_service(&profile, &cart, gateway).await,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let session = Session::for_user(profile.id);

    let created = actions::create_order(&service, Some(&session)).await;
    print_json(&mut out, &created)?;
    let Some(order_id) = created.data else {
        return Ok(());
    };

    let intent = actions::create_paypal_order(&service, order_id).await;
    print_json(&mut out, &intent)?;
    let Some(intent_id) = intent.data else {
        return Ok(());
    };

    let approved =
        actions::approve_paypal_order(&service, order_id, &PaymentApproval::new(intent_id)).await;
    print_json(&mut out, &approved)?;

    if let Some(details) = service.get_order_by_id(order_id).await.into_diagnostic()? {
        print_json(&mut out, &details)?;
    }

    Ok(())
}
