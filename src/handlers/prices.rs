//! E-commerce price monitoring forwarding
//!
//! Only the Shopee monitor is wired downstream.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{Handler, input_str_or};
use crate::backend::BackendClient;
use crate::session::Session;
use crate::{Error, Result};

pub struct PriceHandler {
    backend: Arc<BackendClient>,
}

impl PriceHandler {
    #[must_use]
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Handler for PriceHandler {
    async fn handle(&self, input: &Value, _session: &Session) -> Result<Value> {
        let platform = input_str_or(input, "platform", "shopee");
        if platform != "shopee" {
            return Err(Error::BadInput(format!(
                "price platform not supported: {platform}"
            )));
        }

        self.backend.monitored_products().await
    }
}
