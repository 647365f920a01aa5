//! Prospect and outreach record model.
//!
//! Pure data definitions plus the shape predicates and safe defaults the
//! rest of the crate relies on. The contact status is kept private so the
//! `drafted <=> draft present` invariant can only change through
//! [`Prospect::attach_draft`] and [`Prospect::mark_contacted`].

use std::fmt;

use serde::Serialize;

pub mod filters;

pub use filters::{default_pain_points, SearchFilters};

/// Label used when a prospect has neither an owner nor a manager name.
pub const FALLBACK_CONTACT_LABEL: &str = "Management";

/// Sentiment scores strictly above this value mark a hot lead.
pub const HOT_LEAD_THRESHOLD: u8 = 80;

/// Maximum sentiment score.
pub const MAX_SCORE: u8 = 100;

/// Maximum map rating.
pub const MAX_RATING: f64 = 5.0;

/// Errors raised by record mutations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ModelError {
    /// The operation needs an attached outreach draft.
    #[error("prospect {0} has no outreach draft")]
    NotDrafted(ProspectId),
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Opaque, locally assigned prospect identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProspectId(String);

impl ProspectId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(format!("lead-{}", uuid::Uuid::new_v4()))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProspectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Contact status
// ---------------------------------------------------------------------------

/// Where a prospect sits in the outreach pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    /// Discovered, no draft yet.
    #[default]
    New,
    /// An outreach draft is attached.
    Drafted,
    /// Marked as contacted by the operator.
    Contacted,
}

impl ContactStatus {
    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Drafted => "drafted",
            Self::Contacted => "contacted",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Outreach draft
// ---------------------------------------------------------------------------

/// AI-written outreach copy for one prospect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachDraft {
    /// Email subject line.
    pub subject: String,
    /// Email body.
    pub body: String,
    /// WhatsApp pitch.
    pub whatsapp_message: String,
    /// Short SMS reminder.
    pub sms_message: String,
}

/// One of the four text fields of an [`OutreachDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    /// `subject`
    Subject,
    /// `body`
    Body,
    /// `whatsappMessage`
    WhatsappMessage,
    /// `smsMessage`
    SmsMessage,
}

impl DraftField {
    /// All fields in wire order.
    pub const ALL: [DraftField; 4] = [
        Self::Subject,
        Self::Body,
        Self::WhatsappMessage,
        Self::SmsMessage,
    ];

    /// camelCase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Body => "body",
            Self::WhatsappMessage => "whatsappMessage",
            Self::SmsMessage => "smsMessage",
        }
    }

    /// Parse a wire name (also accepts snake_case).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "subject" => Some(Self::Subject),
            "body" => Some(Self::Body),
            "whatsappMessage" | "whatsapp_message" | "whatsapp" => Some(Self::WhatsappMessage),
            "smsMessage" | "sms_message" | "sms" => Some(Self::SmsMessage),
            _ => None,
        }
    }
}

impl OutreachDraft {
    /// Borrow a field by name.
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Subject => &self.subject,
            DraftField::Body => &self.body,
            DraftField::WhatsappMessage => &self.whatsapp_message,
            DraftField::SmsMessage => &self.sms_message,
        }
    }

    /// Replace a field's text.
    pub fn set(&mut self, field: DraftField, value: String) {
        match field {
            DraftField::Subject => self.subject = value,
            DraftField::Body => self.body = value,
            DraftField::WhatsappMessage => self.whatsapp_message = value,
            DraftField::SmsMessage => self.sms_message = value,
        }
    }

    /// Fields that are empty or whitespace-only.
    pub fn blank_fields(&self) -> Vec<DraftField> {
        DraftField::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    /// True when all four text fields carry content.
    pub fn is_complete(&self) -> bool {
        self.blank_fields().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

/// Review-derived analysis of a business's customer service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentAnalysis {
    /// Conversion likelihood, 0..=100.
    pub score: u8,
    /// Short description of the service failure.
    pub summary: String,
    /// Short tags, display order preserved.
    pub pain_points: Vec<String>,
    /// Estimated monthly revenue lost, in USD.
    pub estimated_monthly_loss: f64,
}

impl Default for SentimentAnalysis {
    fn default() -> Self {
        Self {
            score: 0,
            summary: String::new(),
            pain_points: Vec::new(),
            estimated_monthly_loss: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Prospect
// ---------------------------------------------------------------------------

/// A discovered business with its analysis and optional outreach draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prospect {
    id: ProspectId,
    /// Business name.
    pub name: String,
    /// Industry / category.
    pub category: String,
    /// City (or free-form location).
    pub city: String,
    /// Street address.
    pub address: String,
    /// Phone number as published.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Owner's name.
    pub owner_name: Option<String>,
    /// Manager's name.
    pub manager_name: Option<String>,
    /// Business website.
    pub website_uri: Option<String>,
    /// Map listing link.
    pub google_maps_uri: Option<String>,
    /// Average rating, 0..=5.
    pub rating: Option<f64>,
    /// Number of ratings.
    pub user_rating_count: Option<u64>,
    /// Customer-service analysis.
    pub sentiment_analysis: SentimentAnalysis,
    contact_status: ContactStatus,
    personalized_draft: Option<OutreachDraft>,
}

impl Prospect {
    /// Create a fresh prospect with a new identifier and `new` status.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        city: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: ProspectId::generate(),
            name: name.into(),
            category: category.into(),
            city: city.into(),
            address: address.into(),
            phone: None,
            email: None,
            owner_name: None,
            manager_name: None,
            website_uri: None,
            google_maps_uri: None,
            rating: None,
            user_rating_count: None,
            sentiment_analysis: SentimentAnalysis::default(),
            contact_status: ContactStatus::New,
            personalized_draft: None,
        }
    }

    /// Immutable identifier.
    pub fn id(&self) -> &ProspectId {
        &self.id
    }

    /// Current pipeline status.
    pub fn contact_status(&self) -> ContactStatus {
        self.contact_status
    }

    /// Attached outreach draft, if any.
    pub fn draft(&self) -> Option<&OutreachDraft> {
        self.personalized_draft.as_ref()
    }

    /// True once a draft is attached.
    pub fn has_draft(&self) -> bool {
        self.personalized_draft.is_some()
    }

    /// Person to address: owner, then manager, then a generic label.
    pub fn contact_label(&self) -> &str {
        self.owner_name
            .as_deref()
            .or(self.manager_name.as_deref())
            .unwrap_or(FALLBACK_CONTACT_LABEL)
    }

    /// Whether the sentiment score marks this as a hot lead.
    pub fn is_hot(&self) -> bool {
        self.sentiment_analysis.score > HOT_LEAD_THRESHOLD
    }

    /// Attach a draft and move to `drafted`.
    ///
    /// A prospect already marked `contacted` keeps that status.
    pub fn attach_draft(&mut self, draft: OutreachDraft) {
        self.personalized_draft = Some(draft);
        if self.contact_status != ContactStatus::Contacted {
            self.contact_status = ContactStatus::Drafted;
        }
    }

    /// Record that the operator reached out.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotDrafted`] if no draft is attached.
    pub fn mark_contacted(&mut self) -> Result<(), ModelError> {
        if self.personalized_draft.is_none() {
            return Err(ModelError::NotDrafted(self.id.clone()));
        }
        self.contact_status = ContactStatus::Contacted;
        Ok(())
    }

    /// Edit one field of the attached draft.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotDrafted`] if no draft is attached.
    pub fn update_draft_field(&mut self, field: DraftField, value: String) -> Result<(), ModelError> {
        match self.personalized_draft.as_mut() {
            Some(draft) => {
                draft.set(field, value);
                Ok(())
            }
            None => Err(ModelError::NotDrafted(self.id.clone())),
        }
    }

    /// True when the status agrees with draft presence.
    pub fn status_is_consistent(&self) -> bool {
        match self.contact_status {
            ContactStatus::New => self.personalized_draft.is_none(),
            ContactStatus::Drafted | ContactStatus::Contacted => {
                self.personalized_draft.is_some()
            }
        }
    }

    /// Shape check used by tests and debug assertions.
    pub fn is_well_formed(&self) -> bool {
        let required = [&self.name, &self.category, &self.city, &self.address];
        let loss = self.sentiment_analysis.estimated_monthly_loss;
        required.iter().all(|s| !s.trim().is_empty())
            && self.sentiment_analysis.score <= MAX_SCORE
            && self
                .rating
                .map_or(true, |r| r.is_finite() && (0.0..=MAX_RATING).contains(&r))
            && loss.is_finite()
            && loss >= 0.0
            && self.status_is_consistent()
    }
}
