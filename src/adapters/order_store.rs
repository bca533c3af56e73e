use crate::domain::model::OrderReceipt;
use crate::domain::ports::{OrderStore, Storage};
use crate::utils::error::{PricingError, Result};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFormat {
    Json,
    Csv,
}

impl OrderFormat {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "json" => Ok(OrderFormat::Json),
            "csv" => Ok(OrderFormat::Csv),
            other => Err(PricingError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: json, csv".to_string(),
            }),
        }
    }
}

/// Writes each order under `orders/<order_id>.<ext>`.
pub struct FileOrderStore<S: Storage> {
    storage: S,
    formats: Vec<OrderFormat>,
}

impl<S: Storage> FileOrderStore<S> {
    pub fn new(storage: S, formats: Vec<OrderFormat>) -> Self {
        Self { storage, formats }
    }

    pub fn from_config_formats(storage: S, formats: &[String]) -> Result<Self> {
        let formats = formats
            .iter()
            .map(|f| OrderFormat::parse(f))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(storage, formats))
    }

    fn render_csv(receipt: &OrderReceipt) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "order_id",
            "component_id",
            "axis",
            "name",
            "quantity",
            "unit_price",
            "line_total",
        ])?;

        for line in &receipt.order.lines {
            writer.write_record([
                receipt.order_id.clone(),
                line.component_id.to_string(),
                line.axis.as_str().to_string(),
                line.name.clone(),
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.line_total.to_string(),
            ])?;
        }

        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| PricingError::IoError(e.into_error()))
    }
}

#[async_trait]
impl<S: Storage> OrderStore for FileOrderStore<S> {
    async fn save_order(&self, receipt: &OrderReceipt) -> Result<String> {
        // render everything first so a failure leaves no partial order behind
        let mut files = Vec::with_capacity(self.formats.len());
        for format in &self.formats {
            match format {
                OrderFormat::Json => files.push((
                    format!("orders/{}.json", receipt.order_id),
                    serde_json::to_vec_pretty(receipt)?,
                )),
                OrderFormat::Csv => files.push((
                    format!("orders/{}.csv", receipt.order_id),
                    Self::render_csv(receipt)?,
                )),
            }
        }

        for (path, _) in &files {
            if self.storage.exists(path).await {
                return Err(PricingError::OrderAlreadyExists {
                    order_id: receipt.order_id.clone(),
                    path: path.clone(),
                });
            }
        }

        for (index, (path, data)) in files.iter().enumerate() {
            tracing::debug!("Writing {} ({} bytes)", path, data.len());
            if let Err(e) = self.storage.write_file(path, data).await {
                self.rollback(&files[..index]).await;
                return Err(e);
            }
        }

        Ok(files
            .first()
            .map(|(path, _)| path.clone())
            .unwrap_or_default())
    }
}

impl<S: Storage> FileOrderStore<S> {
    // 寫入失敗時刪除已寫出的檔案
    async fn rollback(&self, written: &[(String, Vec<u8>)]) {
        for (path, _) in written {
            if let Err(e) = self.storage.remove_file(path).await {
                tracing::error!("Could not remove partial order file {}: {}", path, e);
            }
        }
    }
}
