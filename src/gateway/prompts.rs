//! Prompt builders for discovery and outreach drafting.

use serde_json::{json, Value};

use crate::config::PersonaConfig;
use crate::model::{DraftField, Prospect, SearchFilters};

/// Discovery tuning carried into the prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscoverySettings {
    /// Number of businesses to ask for.
    pub prospect_count: u8,
    /// Minimum review count for a business to qualify.
    pub min_review_count: u32,
    /// Sampling temperature for discovery calls.
    pub temperature: f32,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            prospect_count: 10,
            min_review_count: 10,
            temperature: 0.3,
        }
    }
}

/// Criteria used when the caller supplies no pain points.
const GENERIC_CRITERIA: &str =
    "unanswered calls, long waits, poor customer service or trouble booking appointments";

/// Build the discovery prompt.
///
/// The service is asked for a bare JSON array; the example object documents
/// the expected shape field by field.
pub fn discovery_prompt(
    filters: &SearchFilters,
    persona: &PersonaConfig,
    settings: &DiscoverySettings,
) -> String {
    let criteria = if filters.pain_points.is_empty() {
        GENERIC_CRITERIA.to_owned()
    } else {
        filters
            .pain_points
            .iter()
            .map(|p| format!("\"{p}\""))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let example = json!([{
        "name": "Business name",
        "category": filters.industry,
        "city": filters.location,
        "address": "Full street address",
        "phone": "Phone number",
        "email": "Email if published",
        "ownerName": "Owner name",
        "managerName": "Manager name",
        "rating": 2.5,
        "userRatingCount": 40,
        "websiteUri": "https://...",
        "googleMapsUri": "https://maps.google.com/...",
        "sentimentAnalysis": {
            "score": 92,
            "summary": "Critical summary of the customers' pain",
            "painPoints": ["Calls go unanswered", "Poor service"],
            "estimatedMonthlyLoss": 3500
        }
    }]);
    let example = serde_json::to_string_pretty(&example).unwrap_or_default();

    format!(
        "Act as a Senior Sales Auditor for {agency}.\n\
         Your mission is to find {count} real \"{industry}\" businesses in \"{location}\" that are \
         LOSING MONEY because of poor customer service visible in their map reviews.\n\n\
         SELECTION CRITERIA: businesses with more than {min_reviews} reviews where customers \
         mention {criteria}.\n\n\
         FOR EACH BUSINESS YOU MUST ESTIMATE:\n\
         - score: 0-100, how likely the business is to buy a fix (higher = more likely).\n\
         - estimatedMonthlyLoss: a conservative USD estimate of revenue lost each month to \
         unanswered calls or missed appointments (e.g. 1500, 5000, 10000).\n\n\
         Write summaries and pain points in {language}.\n\
         Respond ONLY with a JSON array in exactly this format:\n{example}",
        agency = persona.agency,
        count = settings.prospect_count,
        industry = filters.industry,
        location = filters.location,
        min_reviews = settings.min_review_count,
        criteria = criteria,
        language = persona.language,
        example = example,
    )
}

/// System instruction that puts the service in the sender's shoes.
pub fn outreach_system(persona: &PersonaConfig) -> String {
    format!(
        "You are {name}, {title} of {agency}. Write everything in {language}.",
        name = persona.sender_name,
        title = persona.sender_title,
        agency = persona.agency,
        language = persona.language,
    )
}

/// Build the outreach prompt for one prospect, signed as the persona.
pub fn outreach_prompt(prospect: &Prospect, persona: &PersonaConfig) -> String {
    let loss = format_usd(prospect.sentiment_analysis.estimated_monthly_loss);
    let offices = persona.offices.join(" | ");

    format!(
        "Write an \"impossible to ignore\" business proposal for {business} addressed to {contact}.\n\n\
         KEY FACT: our audit estimates they are losing ${loss} USD per month because of failures \
         in their customer service.\n\
         SOLUTION: {offer}.\n\n\
         Sign off with:\n\
         \"I am ready to help you recover that revenue.\n\n\
         Sincerely,\n\
         {name}\n\
         {title}, {agency}\n\
         {offices}\"\n\n\
         JSON FORMAT:\n\
         {{\n  \
         \"subject\": \"Magnetic subject line mentioning the financial loss\",\n  \
         \"body\": \"Persuasive, professional email body\",\n  \
         \"whatsappMessage\": \"Direct WhatsApp message with a call to action\",\n  \
         \"smsMessage\": \"Ultra-short SMS reminder\"\n\
         }}",
        name = persona.sender_name,
        title = persona.sender_title,
        agency = persona.agency,
        business = prospect.name,
        contact = prospect.contact_label(),
        loss = loss,
        offer = persona.offer,
        offices = offices,
    )
}

/// Required-fields schema for the outreach draft.
pub fn outreach_schema() -> Value {
    let properties: serde_json::Map<String, Value> = DraftField::ALL
        .iter()
        .map(|field| (field.as_str().to_owned(), json!({"type": "string"})))
        .collect();
    let required: Vec<&str> = DraftField::ALL.iter().map(|f| f.as_str()).collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Whole-dollar rendering with thousands separators (`3500.4` -> `3,500`).
pub fn format_usd(amount: f64) -> String {
    let rounded = format!("{:.0}", amount.max(0.0));
    let mut out = String::with_capacity(rounded.len().saturating_add(rounded.len() / 3));
    let len = rounded.len();
    for (i, ch) in rounded.chars().enumerate() {
        let remaining = len.saturating_sub(i);
        if i > 0 && remaining % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
