//! # Validation Module
//!
//! Per-operation request validation for the portal.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Type checks, enum membership, required struct fields              │
//! │  └── Bad payloads never become request structs                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Emptiness, length bounds, format checks                          │
//! │  └── Collects EVERY violation into {field, message} pairs             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storage guards (atrium-db)                                   │
//! │  └── PRIMARY KEY uniqueness, existence checks                         │
//! │                                                                         │
//! │  A validation failure rejects the operation before any storage call.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use atrium_core::types::{NewTicket, TicketPriority};
//! use atrium_core::validation::validate_new_ticket;
//!
//! let req = NewTicket {
//!     subject: "Printer on fire".into(),
//!     description: None,
//!     priority: TicketPriority::High,
//!     client_id: None,
//!     app_id: None,
//! };
//! validate_new_ticket(&req).unwrap();
//! ```

use crate::error::{FieldError, ValidationError};
use crate::types::*;

/// Result type for validation operations.
pub type ValidationResult = Result<(), ValidationError>;

// =============================================================================
// Field Limits
// =============================================================================

/// Maximum length for short text fields (subjects, names, titles).
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum length for free-form text fields (descriptions, reply bodies).
pub const MAX_TEXT_LEN: usize = 5_000;

/// Maximum length for article content.
pub const MAX_CONTENT_LEN: usize = 50_000;

/// Username bounds.
pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 50;

/// Maximum length for a QR code value.
pub const MAX_CODE_LEN: usize = 128;

// =============================================================================
// Check Collector
// =============================================================================

/// Accumulates field violations so a caller sees every problem at once
/// instead of fixing them one request at a time.
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    pub fn new() -> Self {
        Checks::default()
    }

    /// Requires a non-empty (after trim) string value.
    pub fn require(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors
                .push(FieldError::new(field, format!("{field} is required")));
        }
        self
    }

    /// Enforces a maximum character length.
    pub fn max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.errors.push(FieldError::new(
                field,
                format!("{field} must be at most {max} characters"),
            ));
        }
        self
    }

    /// Enforces a minimum character length (empty handled by `require`).
    pub fn min_len(&mut self, field: &str, value: &str, min: usize) -> &mut Self {
        let len = value.trim().chars().count();
        if len > 0 && len < min {
            self.errors.push(FieldError::new(
                field,
                format!("{field} must be at least {min} characters"),
            ));
        }
        self
    }

    /// Length bound applied only when the optional value is present.
    pub fn optional_max_len(
        &mut self,
        field: &str,
        value: Option<&str>,
        max: usize,
    ) -> &mut Self {
        if let Some(v) = value {
            self.max_len(field, v, max);
        }
        self
    }

    /// Minimal shape check for email addresses.
    ///
    /// Deliverability is the mail server's problem; this only rejects values
    /// that cannot possibly be addresses.
    pub fn email_shape(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            let v = v.trim();
            if !v.is_empty() && (!v.contains('@') || v.starts_with('@') || v.ends_with('@')) {
                self.errors.push(FieldError::new(
                    field,
                    format!("{field} has invalid format"),
                ));
            }
        }
        self
    }

    /// Requires a non-negative integer.
    pub fn non_negative(&mut self, field: &str, value: i64) -> &mut Self {
        if value < 0 {
            self.errors.push(FieldError::new(
                field,
                format!("{field} must not be negative"),
            ));
        }
        self
    }

    /// Pushes an arbitrary violation.
    pub fn reject(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError::new(field, message));
        self
    }

    /// Finishes the check run.
    pub fn finish(self) -> ValidationResult {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.errors))
        }
    }
}

/// Validates a username: 3-50 chars, alphanumeric plus `._-`.
fn check_username(checks: &mut Checks, value: &str) {
    checks
        .require("username", value)
        .min_len("username", value, MIN_USERNAME_LEN)
        .max_len("username", value, MAX_USERNAME_LEN);

    let v = value.trim();
    if !v.is_empty()
        && !v
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
    {
        checks.reject(
            "username",
            "username must contain only letters, numbers, and ._-",
        );
    }
}

/// Validates an ISO 4217 currency code: exactly three ASCII uppercase letters.
fn check_currency(checks: &mut Checks, value: &str) {
    if value.len() != 3 || !value.chars().all(|c| c.is_ascii_uppercase()) {
        checks.reject("currency", "currency must be a 3-letter ISO 4217 code");
    }
}

// =============================================================================
// Ticket Operations
// =============================================================================

pub fn validate_new_ticket(req: &NewTicket) -> ValidationResult {
    let mut checks = Checks::new();
    checks
        .require("subject", &req.subject)
        .max_len("subject", &req.subject, MAX_TITLE_LEN)
        .optional_max_len("description", req.description.as_deref(), MAX_TEXT_LEN);
    checks.finish()
}

pub fn validate_ticket_update(req: &TicketUpdate) -> ValidationResult {
    let mut checks = Checks::new();
    if let Some(subject) = &req.subject {
        checks
            .require("subject", subject)
            .max_len("subject", subject, MAX_TITLE_LEN);
    }
    checks.optional_max_len("description", req.description.as_deref(), MAX_TEXT_LEN);
    checks.finish()
}

pub fn validate_new_ticket_reply(req: &NewTicketReply) -> ValidationResult {
    let mut checks = Checks::new();
    checks
        .require("author", &req.author)
        .max_len("author", &req.author, MAX_TITLE_LEN)
        .require("body", &req.body)
        .max_len("body", &req.body, MAX_TEXT_LEN);
    checks.finish()
}

// =============================================================================
// Client Operations
// =============================================================================

pub fn validate_new_client(req: &NewClient) -> ValidationResult {
    let mut checks = Checks::new();
    checks
        .require("companyName", &req.company_name)
        .max_len("companyName", &req.company_name, MAX_TITLE_LEN)
        .optional_max_len("contactName", req.contact_name.as_deref(), MAX_TITLE_LEN)
        .email_shape("email", req.email.as_deref());
    checks.finish()
}

pub fn validate_client_update(req: &ClientUpdate) -> ValidationResult {
    let mut checks = Checks::new();
    if let Some(name) = &req.company_name {
        checks
            .require("companyName", name)
            .max_len("companyName", name, MAX_TITLE_LEN);
    }
    checks
        .optional_max_len("contactName", req.contact_name.as_deref(), MAX_TITLE_LEN)
        .email_shape("email", req.email.as_deref())
        .optional_max_len("qrCode", req.qr_code.as_deref(), MAX_CODE_LEN);
    checks.finish()
}

// =============================================================================
// App Operations
// =============================================================================

pub fn validate_new_app(req: &NewApp) -> ValidationResult {
    let mut checks = Checks::new();
    checks
        .require("name", &req.name)
        .max_len("name", &req.name, MAX_TITLE_LEN)
        .optional_max_len("description", req.description.as_deref(), MAX_TEXT_LEN);
    checks.finish()
}

pub fn validate_app_update(req: &AppUpdate) -> ValidationResult {
    let mut checks = Checks::new();
    if let Some(name) = &req.name {
        checks.require("name", name).max_len("name", name, MAX_TITLE_LEN);
    }
    checks.optional_max_len("description", req.description.as_deref(), MAX_TEXT_LEN);
    checks.finish()
}

// =============================================================================
// Feature Request Operations
// =============================================================================

pub fn validate_new_feature_request(req: &NewFeatureRequest) -> ValidationResult {
    let mut checks = Checks::new();
    checks
        .require("title", &req.title)
        .max_len("title", &req.title, MAX_TITLE_LEN)
        .optional_max_len("description", req.description.as_deref(), MAX_TEXT_LEN);
    checks.finish()
}

pub fn validate_feature_request_update(req: &FeatureRequestUpdate) -> ValidationResult {
    let mut checks = Checks::new();
    if let Some(title) = &req.title {
        checks
            .require("title", title)
            .max_len("title", title, MAX_TITLE_LEN);
    }
    checks.optional_max_len("description", req.description.as_deref(), MAX_TEXT_LEN);
    if let Some(votes) = req.votes {
        checks.non_negative("votes", votes);
    }
    checks.finish()
}

// =============================================================================
// Knowledge Base Operations
// =============================================================================

pub fn validate_new_kb_article(req: &NewKbArticle) -> ValidationResult {
    let mut checks = Checks::new();
    checks
        .require("title", &req.title)
        .max_len("title", &req.title, MAX_TITLE_LEN)
        .require("content", &req.content)
        .max_len("content", &req.content, MAX_CONTENT_LEN)
        .optional_max_len("category", req.category.as_deref(), MAX_TITLE_LEN);
    checks.finish()
}

pub fn validate_kb_article_update(req: &KbArticleUpdate) -> ValidationResult {
    let mut checks = Checks::new();
    if let Some(title) = &req.title {
        checks
            .require("title", title)
            .max_len("title", title, MAX_TITLE_LEN);
    }
    if let Some(content) = &req.content {
        checks
            .require("content", content)
            .max_len("content", content, MAX_CONTENT_LEN);
    }
    checks.optional_max_len("category", req.category.as_deref(), MAX_TITLE_LEN);
    checks.finish()
}

// =============================================================================
// User Operations
// =============================================================================

pub fn validate_new_user(req: &NewUser) -> ValidationResult {
    let mut checks = Checks::new();
    check_username(&mut checks, &req.username);
    checks
        .email_shape("email", req.email.as_deref())
        .require("passwordHash", &req.password_hash);
    checks.finish()
}

pub fn validate_new_admin_user(req: &NewAdminUser) -> ValidationResult {
    let mut checks = Checks::new();
    check_username(&mut checks, &req.username);
    checks
        .email_shape("email", req.email.as_deref())
        .require("passwordHash", &req.password_hash);
    checks.finish()
}

pub fn validate_user_update(req: &UserUpdate) -> ValidationResult {
    let mut checks = Checks::new();
    checks.email_shape("email", req.email.as_deref());
    checks.finish()
}

pub fn validate_admin_user_update(req: &AdminUserUpdate) -> ValidationResult {
    let mut checks = Checks::new();
    checks.email_shape("email", req.email.as_deref());
    checks.finish()
}

/// Login request checks (shape only - credential verification happens against
/// the stored argon2 hash, never here).
pub fn validate_login(username: &str, password: &str) -> ValidationResult {
    let mut checks = Checks::new();
    checks.require("username", username).require("password", password);
    checks.finish()
}

// =============================================================================
// Content Operations
// =============================================================================

pub fn validate_new_recent_update(req: &NewRecentUpdate) -> ValidationResult {
    let mut checks = Checks::new();
    checks
        .require("title", &req.title)
        .max_len("title", &req.title, MAX_TITLE_LEN)
        .optional_max_len("summary", req.summary.as_deref(), MAX_TEXT_LEN);
    checks.finish()
}

pub fn validate_recent_update_update(req: &RecentUpdateUpdate) -> ValidationResult {
    let mut checks = Checks::new();
    if let Some(title) = &req.title {
        checks
            .require("title", title)
            .max_len("title", title, MAX_TITLE_LEN);
    }
    checks.optional_max_len("summary", req.summary.as_deref(), MAX_TEXT_LEN);
    checks.finish()
}

pub fn validate_new_popular_topic(req: &NewPopularTopic) -> ValidationResult {
    let mut checks = Checks::new();
    checks
        .require("title", &req.title)
        .max_len("title", &req.title, MAX_TITLE_LEN);
    checks.finish()
}

pub fn validate_popular_topic_update(req: &PopularTopicUpdate) -> ValidationResult {
    let mut checks = Checks::new();
    if let Some(title) = &req.title {
        checks
            .require("title", title)
            .max_len("title", title, MAX_TITLE_LEN);
    }
    if let Some(views) = req.views {
        checks.non_negative("views", views);
    }
    checks.finish()
}

// =============================================================================
// Invoice Operations
// =============================================================================

pub fn validate_new_invoice(req: &NewInvoice) -> ValidationResult {
    let mut checks = Checks::new();
    checks
        .require("clientId", &req.client_id)
        .non_negative("amountCents", req.amount_cents);
    check_currency(&mut checks, &req.currency);
    checks.finish()
}

pub fn validate_invoice_update(req: &InvoiceUpdate) -> ValidationResult {
    let mut checks = Checks::new();
    if let Some(cents) = req.amount_cents {
        checks.non_negative("amountCents", cents);
    }
    if let Some(currency) = &req.currency {
        check_currency(&mut checks, currency);
    }
    checks.finish()
}

// =============================================================================
// QR Code Operations
// =============================================================================

pub fn validate_new_qr_code(req: &NewQrCode) -> ValidationResult {
    let mut checks = Checks::new();
    checks
        .require("code", &req.code)
        .max_len("code", &req.code, MAX_CODE_LEN)
        .require("clientId", &req.client_id);
    checks.finish()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn new_ticket(subject: &str) -> NewTicket {
        NewTicket {
            subject: subject.into(),
            description: None,
            priority: TicketPriority::Medium,
            client_id: None,
            app_id: None,
        }
    }

    #[test]
    fn test_new_ticket_requires_subject() {
        assert!(validate_new_ticket(&new_ticket("Broken export")).is_ok());

        let err = validate_new_ticket(&new_ticket("   ")).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].field, "subject");
    }

    #[test]
    fn test_new_ticket_subject_length_bound() {
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        let err = validate_new_ticket(&new_ticket(&long)).unwrap_err();
        assert!(err.errors[0].message.contains("at most"));
    }

    #[test]
    fn test_checks_collect_all_violations() {
        let req = NewClient {
            company_name: "".into(),
            contact_name: None,
            email: Some("not-an-email".into()),
            subscribed_apps: vec![],
        };
        let err = validate_new_client(&req).unwrap_err();
        let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["companyName", "email"]);
    }

    #[test]
    fn test_update_with_all_none_passes() {
        assert!(validate_ticket_update(&TicketUpdate::default()).is_ok());
        assert!(validate_client_update(&ClientUpdate::default()).is_ok());
    }

    #[test]
    fn test_username_grammar() {
        let mut req = NewUser {
            username: "jane.doe".into(),
            email: None,
            client_id: None,
            password_hash: "$argon2id$stub".into(),
        };
        assert!(validate_new_user(&req).is_ok());

        req.username = "j".into();
        assert!(validate_new_user(&req).is_err());

        req.username = "jane doe".into();
        assert!(validate_new_user(&req).is_err());
    }

    #[test]
    fn test_content_edits_keep_title_bounds() {
        let long = "x".repeat(MAX_TITLE_LEN + 1);

        let err = validate_recent_update_update(&RecentUpdateUpdate {
            title: Some(long.clone()),
            summary: None,
        })
        .unwrap_err();
        assert_eq!(err.errors[0].field, "title");

        let err = validate_popular_topic_update(&PopularTopicUpdate {
            title: Some("   ".into()),
            article_id: None,
            views: Some(-3),
        })
        .unwrap_err();
        let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "views"]);
    }

    #[test]
    fn test_user_update_checks_email_shape() {
        let err = validate_user_update(&UserUpdate {
            email: Some("not-an-email".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.errors[0].field, "email");

        assert!(validate_admin_user_update(&AdminUserUpdate {
            email: Some("ops@example.com".into()),
            ..Default::default()
        })
        .is_ok());
    }

    #[test]
    fn test_invoice_currency_and_amount() {
        let mut req = NewInvoice {
            client_id: "c1".into(),
            amount_cents: 12_500,
            currency: "USD".into(),
            due_date: None,
        };
        assert!(validate_new_invoice(&req).is_ok());

        req.currency = "usd".into();
        assert!(validate_new_invoice(&req).is_err());

        req.currency = "USD".into();
        req.amount_cents = -1;
        assert!(validate_new_invoice(&req).is_err());
    }

    #[test]
    fn test_login_shape() {
        assert!(validate_login("admin", "hunter2").is_ok());
        let err = validate_login("", "").unwrap_err();
        assert_eq!(err.errors.len(), 2);
    }
}
