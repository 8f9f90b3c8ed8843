use clap::Parser;
use domain_cart::domain::ports::ConfigProvider;
use domain_cart::utils::error::ErrorSeverity;
use domain_cart::utils::{logger, validation::Validate};
use domain_cart::{CartError, CartManager, CartSession, CliConfig};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(config.logging.verbose);
    } else {
        logger::init_cli_logger(config.logging.verbose);
    }

    tracing::info!("Starting domain-cart");
    tracing::debug!("Resolved config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(e);
    }

    let (oracle, clipboard) = match (config.build_oracle(), config.build_clipboard()) {
        (Ok(oracle), Ok(clipboard)) => (oracle, clipboard),
        (Err(e), _) | (_, Err(e)) => exit_with(e),
    };

    tracing::info!(
        "✅ Cart ready: {} domains required, {} oracle",
        config.required_count(),
        oracle.name()
    );

    let cart = CartManager::new(config.required_count());
    let mut session = CartSession::new(cart, oracle, clipboard, config.lookup_timeout());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    if let Err(e) = session.run(stdin, &mut stdout).await {
        exit_with(e);
    }

    tracing::info!("👋 Session ended with {} domains in cart", session.cart().len());
    Ok(())
}

fn exit_with(e: CartError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
