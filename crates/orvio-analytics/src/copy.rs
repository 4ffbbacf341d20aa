//! Ad copy and audience suggestion generation.
//!
//! Text generation is a capability this crate consumes, not implements:
//! [`TextGenerator`] takes a structured prompt and returns structured
//! JSON. This module owns the prompt construction and the shape of the
//! expected output; the provider behind the trait lives elsewhere.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A structured prompt for the text-generation capability.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationPrompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Errors surfaced by the generation capability or output parsing.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation failed: {0}")]
    Failed(String),

    #[error("malformed generation output: {0}")]
    Malformed(String),
}

/// The text-generation capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a JSON document for the prompt.
    async fn generate_json(&self, prompt: &GenerationPrompt) -> Result<Value, GenerationError>;
}

// ── Ad copy ───────────────────────────────────────────────────────────────

/// Product and targeting context the ad copy prompt is built from.
#[derive(Debug, Clone)]
pub struct AdCopyContext {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub compare_at_price: Option<f64>,
    pub product_type: Option<String>,
    pub total_orders: i64,
    pub score: Option<f64>,
    pub tone: String,
    pub platform: String,
    pub target_audience: Option<String>,
    pub include_emoji: bool,
}

/// One alternative headline/text pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdCopyVariation {
    pub headline: String,
    pub primary_text: String,
}

/// Generated ad copy.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdCopy {
    pub headline: String,
    pub primary_text: String,
    pub description: String,
    pub call_to_action: String,
    #[serde(default)]
    pub variations: Vec<AdCopyVariation>,
}

/// Build the ad copy prompt for a product.
pub fn ad_copy_prompt(ctx: &AdCopyContext) -> GenerationPrompt {
    let mut user = format!(
        "Generate compelling ad copy for the following product.\n\n\
         Product: {}\n\
         Description: {}\n\
         Price: ${:.2}\n",
        ctx.title,
        ctx.description.as_deref().unwrap_or("No description"),
        ctx.price,
    );
    if let Some(compare_at) = ctx.compare_at_price {
        user.push_str(&format!("Compare at: ${compare_at:.2}\n"));
    }
    user.push_str(&format!(
        "Category: {}\n\
         Total orders: {}\n\
         Performance score: {}/10\n\n\
         Requirements:\n\
         - Tone: {}\n\
         - Platform: {}\n\
         - Target audience: {}\n\
         - Include emoji: {}\n\n\
         Return JSON with keys headline (max 40 chars), primaryText, \
         description (max 30 chars), callToAction (SHOP_NOW | LEARN_MORE | SIGN_UP) \
         and a variations array of {{headline, primaryText}} pairs.",
        ctx.product_type.as_deref().unwrap_or("General"),
        ctx.total_orders,
        ctx.score.unwrap_or(0.0),
        ctx.tone,
        ctx.platform,
        ctx.target_audience.as_deref().unwrap_or("General shoppers"),
        ctx.include_emoji,
    ));

    GenerationPrompt {
        system: "You are an expert Meta Ads copywriter. Return only valid JSON.".to_string(),
        user,
        temperature: 0.8,
        max_tokens: 500,
    }
}

/// Generate ad copy for a product through the capability.
pub async fn generate_ad_copy(
    generator: &dyn TextGenerator,
    ctx: &AdCopyContext,
) -> Result<AdCopy, GenerationError> {
    let prompt = ad_copy_prompt(ctx);
    let value = generator.generate_json(&prompt).await?;
    serde_json::from_value(value).map_err(|e| GenerationError::Malformed(e.to_string()))
}

// ── Audience suggestions ──────────────────────────────────────────────────

/// Aggregated store facts the audience prompt is built from.
#[derive(Debug, Clone)]
pub struct AudienceContext {
    /// `title ($price, category)` lines for the best products.
    pub top_products: Vec<String>,
    pub average_order_value: f64,
    pub total_customers: i64,
    pub repeat_customers: i64,
    pub product_categories: Vec<String>,
}

/// One suggested audience segment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceSuggestion {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub audience_type: String,
    pub estimated_size: i64,
    pub confidence: f64,
}

/// Build the audience suggestion prompt for a store.
pub fn audience_prompt(ctx: &AudienceContext) -> GenerationPrompt {
    let repeat_pct = if ctx.total_customers > 0 {
        ctx.repeat_customers as f64 / ctx.total_customers as f64 * 100.0
    } else {
        0.0
    };

    let user = format!(
        "Analyze this store data and suggest 3-5 ads audience segments.\n\n\
         Store data:\n\
         - Top products: {}\n\
         - Average order value: ${:.2}\n\
         - Total customers: {}\n\
         - Repeat customers: {} ({repeat_pct:.1}%)\n\
         - Product categories: {}\n\n\
         Return a JSON array of {{name, description, type (CUSTOM | LOOKALIKE | SAVED), \
         estimatedSize, confidence}} objects.",
        ctx.top_products.join("; "),
        ctx.average_order_value,
        ctx.total_customers,
        ctx.repeat_customers,
        ctx.product_categories.join(", "),
    );

    GenerationPrompt {
        system: "You are an ads audience strategist. Return only a valid JSON array.".to_string(),
        user,
        temperature: 0.7,
        max_tokens: 1000,
    }
}

/// Generate audience suggestions through the capability. Accepts either a
/// bare array or an `{"audiences": [...]}` wrapper.
pub async fn generate_audiences(
    generator: &dyn TextGenerator,
    ctx: &AudienceContext,
) -> Result<Vec<AudienceSuggestion>, GenerationError> {
    let prompt = audience_prompt(ctx);
    let value = generator.generate_json(&prompt).await?;

    let array = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map
            .remove("audiences")
            .ok_or_else(|| GenerationError::Malformed("missing audiences array".to_string()))?,
        other => {
            return Err(GenerationError::Malformed(format!(
                "expected array, got {other}"
            )))
        }
    };

    serde_json::from_value(array).map_err(|e| GenerationError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct CannedGenerator(Value);

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate_json(&self, _prompt: &GenerationPrompt) -> Result<Value, GenerationError> {
            Ok(self.0.clone())
        }
    }

    fn sample_context() -> AdCopyContext {
        AdCopyContext {
            title: "Trail Mug".to_string(),
            description: Some("Enamel mug for camping".to_string()),
            price: 24.99,
            compare_at_price: Some(34.99),
            product_type: Some("Outdoor".to_string()),
            total_orders: 42,
            score: Some(7.5),
            tone: "playful".to_string(),
            platform: "meta_feed".to_string(),
            target_audience: None,
            include_emoji: true,
        }
    }

    #[test]
    fn test_ad_copy_prompt_carries_product_facts() {
        let prompt = ad_copy_prompt(&sample_context());
        assert!(prompt.user.contains("Trail Mug"));
        assert!(prompt.user.contains("$24.99"));
        assert!(prompt.user.contains("Compare at: $34.99"));
        assert!(prompt.user.contains("Tone: playful"));
        assert!(prompt.user.contains("General shoppers"));
        assert!(prompt.system.contains("valid JSON"));
    }

    #[tokio::test]
    async fn test_generate_ad_copy_parses_output() {
        let generator = CannedGenerator(json!({
            "headline": "Camp in style",
            "primaryText": "The enamel mug built for the trail.",
            "description": "Free shipping",
            "callToAction": "SHOP_NOW",
            "variations": [
                {"headline": "Trail ready", "primaryText": "Your new favorite mug."}
            ]
        }));

        let copy = generate_ad_copy(&generator, &sample_context()).await.unwrap();
        assert_eq!(copy.headline, "Camp in style");
        assert_eq!(copy.call_to_action, "SHOP_NOW");
        assert_eq!(copy.variations.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_ad_copy_is_rejected() {
        let generator = CannedGenerator(json!({"headline": "only a headline"}));
        let err = generate_ad_copy(&generator, &sample_context())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_audiences_accept_wrapped_and_bare_arrays() {
        let suggestion = json!({
            "name": "Repeat buyers",
            "description": "Customers with more than one order",
            "type": "CUSTOM",
            "estimatedSize": 50000,
            "confidence": 0.85
        });
        let ctx = AudienceContext {
            top_products: vec!["Trail Mug ($24.99, Outdoor)".to_string()],
            average_order_value: 51.20,
            total_customers: 900,
            repeat_customers: 200,
            product_categories: vec!["Outdoor".to_string()],
        };

        let bare = CannedGenerator(json!([suggestion]));
        assert_eq!(generate_audiences(&bare, &ctx).await.unwrap().len(), 1);

        let wrapped = CannedGenerator(json!({ "audiences": [suggestion] }));
        let parsed = generate_audiences(&wrapped, &ctx).await.unwrap();
        assert_eq!(parsed[0].audience_type, "CUSTOM");
    }
}
