pub mod toml_config;

pub use toml_config::PricingConfig;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use crate::domain::model::{ColorMode, ComponentId, OrderSpecification, SizeMode};
    use crate::utils::error::Result;
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "print-pricing")]
    #[command(about = "Quote and place print-shop orders against the price catalog")]
    pub struct CliConfig {
        /// Path to TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Paper component id
        #[arg(long)]
        pub paper: u64,

        /// Finishing component id (omit for no finishing)
        #[arg(long)]
        pub finishing: Option<u64>,

        /// Paper size: a4, f4 or a3
        #[arg(long, default_value = "a4")]
        pub size: SizeMode,

        /// Color mode: monochrome or full_color
        #[arg(long, default_value = "monochrome")]
        pub color: ColorMode,

        /// Pages per document
        #[arg(long, allow_hyphen_values = true)]
        pub pages: i64,

        /// Number of copies
        #[arg(long, default_value = "1", allow_hyphen_values = true)]
        pub copies: i64,

        /// Override the data directory from the config file
        #[arg(long)]
        pub data_dir: Option<String>,

        /// Override the catalog file from the config file
        #[arg(long)]
        pub catalog: Option<String>,

        /// Quote only, do not store the order
        #[arg(long)]
        pub dry_run: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        pub fn specification(&self) -> Result<OrderSpecification> {
            let mut spec = OrderSpecification::new(ComponentId(self.paper), self.pages, self.copies)?
                .with_size(self.size)
                .with_color(self.color);
            if let Some(finishing) = self.finishing {
                spec = spec.with_finishing(ComponentId(finishing));
            }
            Ok(spec)
        }
    }

}
