use clap::{Parser, Subcommand};
use print_pricing::core::audit::FindingLevel;
use print_pricing::core::catalog::validate_price;
use print_pricing::domain::model::ComponentId;
use print_pricing::domain::ports::ConfigProvider;
use print_pricing::utils::money::format_rupiah;
use print_pricing::utils::{logger, validation::Validate};
use print_pricing::{audit_catalog, CatalogService, JsonCatalogStore, LocalStorage, PricingConfig};

#[derive(Parser)]
#[command(name = "catalog-admin")]
#[command(about = "Inspect and maintain the print-shop price catalog")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Override the data directory from the config file
    #[arg(long)]
    data_dir: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every component, grouped in catalog order
    List,
    /// Report missing or ambiguous add-ons and other catalog problems
    Audit,
    /// Price statistics over the whole catalog
    Summary,
    /// Write the default price list if the catalog is empty
    Seed,
    /// Change the price of one component
    SetPrice {
        #[arg(long)]
        id: u64,
        #[arg(long, allow_hyphen_values = true)]
        price: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PricingConfig::from_file(path)?,
        None => PricingConfig::default(),
    };

    // 初始化日誌
    logger::init_cli_logger(args.verbose, config.log_level());

    config.apply_overrides(args.data_dir.as_deref(), None);
    config.validate()?;

    let store = JsonCatalogStore::new(LocalStorage::new(config.data_dir()), config.catalog_path());
    // 管理工具不自動寫入預設價目，只有 seed 指令會
    let service = CatalogService::new(store, false);

    match args.command {
        Command::List => {
            let catalog = service.snapshot().await?;
            for c in catalog.components() {
                println!(
                    "{:>4}  {:<12} {:<32} {:>12}",
                    c.id,
                    c.display_category,
                    c.name,
                    format_rupiah(c.unit_price)
                );
            }
        }
        Command::Audit => {
            let catalog = service.snapshot().await?;
            let report = audit_catalog(&catalog, &config.addon_bindings());

            if report.findings.is_empty() {
                println!("✅ Catalog looks good ({} components)", catalog.len());
            }
            for finding in &report.findings {
                let icon = match finding.level {
                    FindingLevel::Info => "ℹ️ ",
                    FindingLevel::Warning => "⚠️ ",
                    FindingLevel::Error => "❌",
                };
                println!("{} {}", icon, finding.message);
            }
            if !report.is_healthy() {
                std::process::exit(1);
            }
        }
        Command::Summary => {
            let summary = service.snapshot().await?.summary()?;
            println!("Components: {}", summary.count);
            println!("Total:      {}", format_rupiah(summary.total));
            println!("Average:    {}", format_rupiah(summary.average));
            if let (Some(min), Some(max)) = (summary.min, summary.max) {
                println!("Cheapest:   {}", format_rupiah(min));
                println!("Priciest:   {}", format_rupiah(max));
            }
        }
        Command::Seed => {
            if service.seed().await? {
                println!("✅ Default price list written to {}", service.store().path());
            } else {
                println!("Catalog already has entries, nothing seeded");
            }
        }
        Command::SetPrice { id, price } => {
            let catalog = service.update_price(ComponentId(id), price).await?;
            match catalog.find_by_id(ComponentId(id)) {
                Ok(component) => println!(
                    "✅ {} is now {}",
                    component.name,
                    format_rupiah(component.unit_price)
                ),
                // inactive rows are stored but not part of the snapshot
                Err(_) => println!(
                    "✅ Inactive component {} is now {}",
                    id,
                    format_rupiah(validate_price(ComponentId(id), price)?)
                ),
            }
        }
    }

    Ok(())
}
