//! Capability registry
//!
//! Capabilities are registered once at startup and looked up on every
//! dispatch. The only field that changes afterwards is the `enabled` flag,
//! flipped through [`CapabilityRegistry::set_enabled`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::RwLock;

/// Category of functionality a capability provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityCategory {
    TextProcessing,
    VoiceRecognition,
    ImageAnalysis,
    DataAnalysis,
    Automation,
    Messaging,
}

/// Built-in handler a capability dispatches to
///
/// A kind with no entry in the dispatcher's handler table falls back to the
/// default echo handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    VietnameseNlp,
    ContentGeneration,
    PriceMonitoring,
    VoiceCommand,
    MultiMessaging,
    BusinessAnalytics,
}

/// A registered capability descriptor
#[derive(Debug, Clone, Serialize)]
pub struct Capability {
    /// Stable unique identifier, chosen at registration time
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Functional category
    pub category: CapabilityCategory,

    /// Whether dispatch to this capability is currently allowed
    pub enabled: bool,

    /// Open platform-specific configuration map
    pub config: Value,

    /// Which built-in handler serves this capability
    #[serde(skip)]
    pub kind: CapabilityKind,
}

/// Registry of capabilities, preserving insertion order for listings
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    capabilities: HashMap<String, Capability>,
    order: Vec<String>,
}

impl CapabilityRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a capability keyed by its id
    ///
    /// Last write wins; overwriting keeps the original position in listings.
    pub async fn register(&self, capability: Capability) {
        let mut inner = self.inner.write().await;
        if !inner.capabilities.contains_key(&capability.id) {
            inner.order.push(capability.id.clone());
        }
        inner.capabilities.insert(capability.id.clone(), capability);
    }

    /// Get a capability by id
    pub async fn get(&self, id: &str) -> Option<Capability> {
        self.inner.read().await.capabilities.get(id).cloned()
    }

    /// List all capabilities in insertion order
    pub async fn list(&self) -> Vec<Capability> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.capabilities.get(id).cloned())
            .collect()
    }

    /// List all capability ids in insertion order
    pub async fn ids(&self) -> Vec<String> {
        self.inner.read().await.order.clone()
    }

    /// Flip the enabled flag on a capability
    ///
    /// Returns false if the id is unknown.
    pub async fn set_enabled(&self, id: &str, enabled: bool) -> bool {
        let mut inner = self.inner.write().await;
        match inner.capabilities.get_mut(id) {
            Some(capability) => {
                capability.enabled = enabled;
                tracing::info!(capability_id = %id, enabled, "capability toggled");
                true
            }
            None => false,
        }
    }

    /// Number of registered capabilities
    pub async fn len(&self) -> usize {
        self.inner.read().await.capabilities.len()
    }

    /// Whether the registry is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.capabilities.is_empty()
    }
}

/// The built-in capability set registered at startup
#[must_use]
pub fn builtin_capabilities() -> Vec<Capability> {
    vec![
        Capability {
            id: "vietnamese_nlp".to_string(),
            name: "Vietnamese Natural Language Processing".to_string(),
            category: CapabilityCategory::TextProcessing,
            enabled: true,
            config: json!({"language": "vi", "model": "custom"}),
            kind: CapabilityKind::VietnameseNlp,
        },
        Capability {
            id: "content_generation".to_string(),
            name: "Content Generation".to_string(),
            category: CapabilityCategory::TextProcessing,
            enabled: true,
            config: json!({"platforms": ["tiktok", "youtube", "facebook"]}),
            kind: CapabilityKind::ContentGeneration,
        },
        Capability {
            id: "price_monitoring".to_string(),
            name: "E-commerce Price Monitoring".to_string(),
            category: CapabilityCategory::DataAnalysis,
            enabled: true,
            config: json!({"platforms": ["shopee", "tiki", "lazada"]}),
            kind: CapabilityKind::PriceMonitoring,
        },
        Capability {
            id: "voice_command".to_string(),
            name: "Voice Command Processing".to_string(),
            category: CapabilityCategory::VoiceRecognition,
            enabled: true,
            config: json!({"languages": ["vi", "en"], "confidence_threshold": 0.8}),
            kind: CapabilityKind::VoiceCommand,
        },
        Capability {
            id: "multi_messaging".to_string(),
            name: "Multi-Platform Messaging".to_string(),
            category: CapabilityCategory::Messaging,
            enabled: true,
            config: json!({"platforms": ["email", "sms", "telegram", "zalo"]}),
            kind: CapabilityKind::MultiMessaging,
        },
        Capability {
            id: "business_analytics".to_string(),
            name: "Business Intelligence Analytics".to_string(),
            category: CapabilityCategory::DataAnalysis,
            enabled: true,
            config: json!({"sources": ["shopee", "social_media", "news", "weather"]}),
            kind: CapabilityKind::BusinessAnalytics,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str) -> Capability {
        Capability {
            id: id.to_string(),
            name: "Sample".to_string(),
            category: CapabilityCategory::Automation,
            enabled: true,
            config: json!({}),
            kind: CapabilityKind::VietnameseNlp,
        }
    }

    #[tokio::test]
    async fn register_and_get() {
        let registry = CapabilityRegistry::new();
        registry.register(sample("a")).await;

        let capability = registry.get("a").await.unwrap();
        assert_eq!(capability.id, "a");
        assert!(capability.enabled);
        assert!(registry.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn overwrite_keeps_order() {
        let registry = CapabilityRegistry::new();
        registry.register(sample("a")).await;
        registry.register(sample("b")).await;

        let mut replacement = sample("a");
        replacement.name = "Replaced".to_string();
        registry.register(replacement).await;

        assert_eq!(registry.len().await, 2);
        let listed = registry.list().await;
        assert_eq!(listed[0].id, "a");
        assert_eq!(listed[0].name, "Replaced");
        assert_eq!(listed[1].id, "b");
    }

    #[tokio::test]
    async fn set_enabled() {
        let registry = CapabilityRegistry::new();
        registry.register(sample("a")).await;

        assert!(registry.set_enabled("a", false).await);
        assert!(!registry.get("a").await.unwrap().enabled);
        assert!(!registry.set_enabled("missing", false).await);
    }

    #[tokio::test]
    async fn builtins_are_listed_in_registration_order() {
        let registry = CapabilityRegistry::new();
        for capability in builtin_capabilities() {
            registry.register(capability).await;
        }

        let ids = registry.ids().await;
        assert_eq!(
            ids,
            vec![
                "vietnamese_nlp",
                "content_generation",
                "price_monitoring",
                "voice_command",
                "multi_messaging",
                "business_analytics",
            ]
        );
    }
}
