//! Outreach links and campaign statistics.
//!
//! Building a link never changes a prospect's contact status; contact is
//! recorded explicitly through the board.

use std::fmt::Write as _;

use crate::model::{ContactStatus, Prospect};

/// Aggregates shown above the campaign list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CampaignStats {
    /// Prospects in the list.
    pub total: usize,
    /// Sum of estimated monthly losses, USD.
    pub total_estimated_loss: f64,
    /// Prospects whose score marks them as hot.
    pub hot_leads: usize,
    /// Prospects carrying a draft.
    pub drafted: usize,
    /// Prospects already contacted.
    pub contacted: usize,
}

impl CampaignStats {
    /// Compute statistics over a list.
    pub fn from_prospects(prospects: &[Prospect]) -> Self {
        prospects.iter().fold(Self::default(), |mut stats, p| {
            stats.total = stats.total.saturating_add(1);
            stats.total_estimated_loss += p.sentiment_analysis.estimated_monthly_loss;
            if p.is_hot() {
                stats.hot_leads = stats.hot_leads.saturating_add(1);
            }
            if p.has_draft() {
                stats.drafted = stats.drafted.saturating_add(1);
            }
            if p.contact_status() == ContactStatus::Contacted {
                stats.contacted = stats.contacted.saturating_add(1);
            }
            stats
        })
    }
}

/// Percent-encode everything except the URI-component unreserved set.
pub fn encode_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&byte) {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

/// `https://wa.me/<digits>?text=<whatsapp message>`.
///
/// `None` without a draft, or when the phone has no digits.
pub fn whatsapp_link(prospect: &Prospect) -> Option<String> {
    let draft = prospect.draft()?;
    let digits: String = prospect
        .phone
        .as_deref()?
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return None;
    }
    Some(format!(
        "https://wa.me/{digits}?text={}",
        encode_component(&draft.whatsapp_message)
    ))
}

/// `mailto:<email>?subject=..&body=..`.
///
/// `None` without a draft or an email address.
pub fn mailto_link(prospect: &Prospect) -> Option<String> {
    let draft = prospect.draft()?;
    let email = prospect.email.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
    Some(format!(
        "mailto:{email}?subject={}&body={}",
        encode_component(&draft.subject),
        encode_component(&draft.body)
    ))
}
