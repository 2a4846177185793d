use clap::Parser;
use manara::db::Db;
use manara::AppState;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// SQLite database URL.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://manara.db?mode=rwc")]
    database_url: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:1414")]
    address: String,

    /// Mark session cookies as Secure (enable behind HTTPS).
    #[arg(long, env = "SECURE_COOKIES", default_value_t = false)]
    secure_cookies: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,axum=debug,manara=debug".to_owned());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let db = Db::new(&args.database_url).await?;
    let routes = manara::router(AppState {
        db,
        secure_cookies: args.secure_cookies,
    });

    let address = args.address.parse::<std::net::SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!("listening on {address}");
    axum::serve(listener, routes).await?;

    Ok(())
}
