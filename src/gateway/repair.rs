//! Parse-and-repair boundary for free-text service output.
//!
//! Everything the generation service returns passes through here before the
//! rest of the crate sees it. Discovery output is repaired leniently (bad
//! entries dropped, missing fields defaulted); draft output is checked
//! strictly.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::model::{
    DraftField, OutreachDraft, Prospect, SearchFilters, SentimentAnalysis, MAX_RATING, MAX_SCORE,
};

/// Address shown when the service omits one.
pub const UNKNOWN_ADDRESS: &str = "Address not available";

/// Remove markdown code-fence markers and surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_owned()
}

/// Parse text into JSON. When the model wrapped the payload in prose, each
/// `open` bracket is tried in turn and the first value `accept` admits wins;
/// trailing prose after that value is ignored.
fn parse_lenient(text: &str, open: char, accept: impl Fn(&Value) -> bool) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }
    text.match_indices(open).find_map(|(start, _)| {
        let tail = text.get(start..)?;
        let value = serde_json::Deserializer::from_str(tail)
            .into_iter::<Value>()
            .next()?
            .ok()?;
        accept(&value).then_some(value)
    })
}

fn is_prospect_array(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.is_empty() || items.iter().any(Value::is_object))
}

/// Turn a raw discovery response into prospects.
///
/// Unparseable or non-array output yields an empty list; entries that are
/// not objects or have no name are dropped.
pub fn parse_prospects(raw: &str, filters: &SearchFilters) -> Vec<Prospect> {
    let text = strip_code_fences(raw);
    let entries = match parse_lenient(&text, '[', is_prospect_array) {
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            warn!(kind = json_kind(&other), "discovery response is not a JSON array");
            return Vec::new();
        }
        None => {
            warn!(len = raw.len(), "discovery response is not valid JSON");
            return Vec::new();
        }
    };

    let total = entries.len();
    let prospects: Vec<Prospect> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(map) => materialize_prospect(&map, filters),
            other => {
                debug!(kind = json_kind(&other), "dropping non-object discovery entry");
                None
            }
        })
        .collect();

    if prospects.len() < total {
        warn!(
            kept = prospects.len(),
            dropped = total.saturating_sub(prospects.len()),
            "discarded malformed discovery entries"
        );
    }
    prospects
}

/// Build a prospect from one raw discovery object.
///
/// The local id, `new` status and absent draft always override whatever
/// the service put in the object.
pub fn materialize_prospect(raw: &Map<String, Value>, filters: &SearchFilters) -> Option<Prospect> {
    let name = text_field(raw, "name")?;
    let category = text_field(raw, "category").unwrap_or_else(|| filters.industry.clone());
    let city = text_field(raw, "city").unwrap_or_else(|| filters.location.clone());
    let address = text_field(raw, "address").unwrap_or_else(|| UNKNOWN_ADDRESS.to_owned());

    let mut prospect = Prospect::new(name, category, city, address);
    prospect.phone = text_field(raw, "phone");
    prospect.email = text_field(raw, "email");
    prospect.owner_name = text_field(raw, "ownerName");
    prospect.manager_name = text_field(raw, "managerName");
    prospect.website_uri = text_field(raw, "websiteUri");
    prospect.google_maps_uri = text_field(raw, "googleMapsUri");
    prospect.rating = number_field(raw, "rating").map(|r| r.clamp(0.0, MAX_RATING));
    prospect.user_rating_count = number_field(raw, "userRatingCount")
        .filter(|n| *n >= 0.0)
        .map(round_to_u64);
    prospect.sentiment_analysis = match raw.get("sentimentAnalysis") {
        Some(Value::Object(sentiment)) => materialize_sentiment(sentiment),
        _ => SentimentAnalysis::default(),
    };
    Some(prospect)
}

fn materialize_sentiment(raw: &Map<String, Value>) -> SentimentAnalysis {
    let score = number_field(raw, "score")
        .map(|s| s.clamp(0.0, f64::from(MAX_SCORE)))
        .map(round_to_u8)
        .unwrap_or(0);
    let pain_points = match raw.get("painPoints") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(value_as_text)
            .collect::<Vec<_>>(),
        Some(Value::String(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    };
    let loss = number_field(raw, "estimatedMonthlyLoss")
        .filter(|l| *l >= 0.0)
        .unwrap_or(0.0);

    SentimentAnalysis {
        score,
        summary: text_field(raw, "summary").unwrap_or_default(),
        pain_points,
        estimated_monthly_loss: loss,
    }
}

/// Strictly parse a draft response.
///
/// # Errors
///
/// Returns a human-readable reason when the text is not a JSON object or any
/// of the four fields is missing, not a string, or blank.
pub fn parse_draft(raw: &str) -> Result<OutreachDraft, String> {
    let text = strip_code_fences(raw);
    let value = parse_lenient(&text, '{', Value::is_object)
        .ok_or_else(|| format!("response is not valid JSON ({} bytes)", raw.len()))?;
    let map = match value {
        Value::Object(map) => map,
        other => return Err(format!("expected a JSON object, got {}", json_kind(&other))),
    };

    let mut missing = Vec::new();
    let mut field = |f: DraftField| match map.get(f.as_str()) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => {
            missing.push(f.as_str());
            String::new()
        }
    };
    let draft = OutreachDraft {
        subject: field(DraftField::Subject),
        body: field(DraftField::Body),
        whatsapp_message: field(DraftField::WhatsappMessage),
        sms_message: field(DraftField::SmsMessage),
    };

    if missing.is_empty() {
        Ok(draft)
    } else {
        Err(format!("missing or empty fields: {}", missing.join(", ")))
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_field(raw: &Map<String, Value>, key: &str) -> Option<String> {
    raw.get(key).and_then(value_as_text)
}

/// Numbers, or strings such as `"$3,500"`, `"$3.500 USD"` or `"4,5"`.
fn number_field(raw: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match raw.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_localized_number(s),
        _ => None,
    }?;
    value.is_finite().then_some(value)
}

/// Read the single number in `text`, accepting either `.` or `,` as the
/// decimal or grouping separator.
///
/// A separator followed by exactly three digits after a short integer part
/// groups thousands; a lone separator otherwise marks decimals. Text holding
/// more than one number, or grouping that does not come in threes, is
/// ambiguous and yields `None`.
fn parse_localized_number(text: &str) -> Option<f64> {
    let mut tokens = text
        .split(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | ',' | '-')))
        .filter(|t| t.chars().any(|c| c.is_ascii_digit()));
    let token = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }

    let (negative, unsigned) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    if unsigned.contains('-') {
        return None;
    }

    let normalized = match (unsigned.contains('.'), unsigned.contains(',')) {
        (false, false) => unsigned.to_owned(),
        (true, false) => normalize_single(unsigned, '.')?,
        (false, true) => normalize_single(unsigned, ',')?,
        (true, true) => {
            let (decimal, group) = if unsigned.rfind('.') > unsigned.rfind(',') {
                ('.', ',')
            } else {
                (',', '.')
            };
            let (integer, fraction) = unsigned.rsplit_once(decimal)?;
            if integer.contains(decimal) || fraction.contains(group) {
                return None;
            }
            format!("{}.{fraction}", ungroup(integer, group)?)
        }
    };

    let value = normalized.parse::<f64>().ok()?;
    Some(if negative { -value } else { value })
}

/// One kind of separator: repeated means grouping, single is decided by the
/// digits around it.
fn normalize_single(text: &str, separator: char) -> Option<String> {
    if text.matches(separator).count() > 1 {
        return ungroup(text, separator);
    }
    let (integer, fraction) = text.split_once(separator)?;
    let groups_thousands = fraction.len() == 3
        && (1..=3).contains(&integer.len())
        && !integer.starts_with('0');
    if groups_thousands {
        Some(format!("{integer}{fraction}"))
    } else {
        Some(format!("{integer}.{fraction}"))
    }
}

fn ungroup(text: &str, separator: char) -> Option<String> {
    let mut groups = text.split(separator);
    let head = groups.next()?;
    if !(1..=3).contains(&head.len()) {
        return None;
    }
    let mut digits = head.to_owned();
    for group in groups {
        if group.len() != 3 {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}

// Inputs are clamped / checked non-negative and finite by the callers.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_u8(value: f64) -> u8 {
    value.round() as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_u64(value: f64) -> u64 {
    value.round() as u64
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
