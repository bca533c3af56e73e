use clap::Parser;
use print_pricing::domain::model::PricedOrder;
use print_pricing::domain::ports::ConfigProvider;
use print_pricing::utils::error::{ErrorSeverity, PricingError};
use print_pricing::utils::money::format_rupiah;
use print_pricing::utils::{logger, validation::Validate};
use print_pricing::{
    CatalogService, CheckoutEngine, CliConfig, FileOrderStore, JsonCatalogStore, LocalStorage,
    PricingConfig, PricingEngine,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliConfig::parse();

    // 先讀配置，日誌等級可能來自 [monitoring]
    let mut config = match &args.config {
        Some(path) => match PricingConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => PricingConfig::default(),
    };

    // 初始化日誌
    logger::init_cli_logger(args.verbose, config.log_level());

    tracing::info!("Starting print-pricing CLI");
    if let Some(path) = &args.config {
        tracing::info!("📁 Loaded configuration from: {}", path);
    }
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    config.apply_overrides(args.data_dir.as_deref(), args.catalog.as_deref());

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let spec = match args.specification() {
        Ok(spec) => spec,
        Err(e) => exit_with(e),
    };

    let storage = LocalStorage::new(config.data_dir());
    let catalog_store = JsonCatalogStore::new(storage.clone(), config.catalog_path());
    let order_store = match FileOrderStore::from_config_formats(storage, config.output_formats()) {
        Ok(store) => store,
        Err(e) => exit_with(e),
    };
    let engine = CheckoutEngine::new(
        CatalogService::new(catalog_store, config.seed_defaults()),
        order_store,
        PricingEngine::new(config.addon_bindings()),
    )
    .with_catalog_audit(config.monitoring_enabled());

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - the order will not be stored");
        match engine.quote(&spec).await {
            Ok(order) => print_order(&order),
            Err(e) => exit_with(e),
        }
        return Ok(());
    }

    match engine.checkout(spec).await {
        Ok(receipt) => {
            println!("✅ Order {} created", receipt.order_id);
            print_order(&receipt.order);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn print_order(order: &PricedOrder) {
    for line in &order.lines {
        println!(
            "  {:<10} {:<30} {:>6} x {:>12} = {:>14}",
            line.axis.as_str(),
            line.name,
            line.quantity,
            format_rupiah(line.unit_price),
            format_rupiah(line.line_total)
        );
    }
    for miss in &order.soft_misses {
        println!("  ⚠️  no add-on for {} mode '{}', charged at zero", miss.axis.as_str(), miss.mode);
    }
    println!("  Total: {}", format_rupiah(order.grand_total));
}

fn exit_with(e: PricingError) -> ! {
    tracing::error!(
        "❌ Pricing failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

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
