//! PR status notifications rendered for email delivery.
//!
//! Rendering is pure and uses the shared formatters, so amounts, dates and
//! links in every email match what the portal shows. Delivery goes through
//! the `sendPRNotification` callable function.

use std::sync::Arc;

use notify_format::{DateInput, format_amount, format_date, generate_link};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::domain::DomainError;
use crate::domain::ports::{CallableFunction, CallableFunctionError};

/// Name of the callable backend operation delivering notifications.
pub const SEND_PR_NOTIFICATION: &str = "sendPRNotification";

/// Facts about a procurement request that a notification reports.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrNotification {
    /// Document identifier used for the deep link.
    pub pr_id: String,
    /// Human-facing PR number.
    pub pr_number: String,
    pub description: String,
    pub requestor_name: String,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub required_date: DateInput,
    /// Status the PR moved to, e.g. `PENDING_APPROVAL`.
    pub status: String,
    pub notes: Option<String>,
}

/// Rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl PrNotification {
    /// Production deep link for this PR.
    pub fn link(&self) -> String {
        generate_link(&self.pr_id)
    }

    /// Render subject, plain-text body, and HTML body.
    pub fn render(&self) -> NotificationEmail {
        let link = self.link();
        let rows = self.detail_rows();

        let mut text = format!("PR {} is now {}.\n\n", self.pr_number, self.status);
        for (label, value) in &rows {
            text.push_str(&format!("{label}: {value}\n"));
        }
        text.push_str(&format!("\nView the request: {link}\n"));

        let mut html = format!(
            "<p>PR <strong>{}</strong> is now <strong>{}</strong>.</p>\n<table>\n",
            escape_html(&self.pr_number),
            escape_html(&self.status)
        );
        for (label, value) in &rows {
            html.push_str(&format!(
                "  <tr><th align=\"left\">{label}</th><td>{}</td></tr>\n",
                escape_html(value)
            ));
        }
        html.push_str(&format!(
            "</table>\n<p><a href=\"{href}\">View the request</a></p>\n",
            href = escape_html(&link)
        ));

        NotificationEmail {
            subject: format!("PR {}: {}", self.pr_number, self.status),
            text,
            html,
        }
    }

    fn detail_rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("Description", self.description.clone()),
            ("Requestor", self.requestor_name.clone()),
            (
                "Amount",
                format_amount(self.amount, self.currency.as_deref()),
            ),
            ("Required date", format_date(self.required_date.clone())),
        ];
        if let Some(notes) = self.notes.as_deref().filter(|notes| !notes.trim().is_empty()) {
            rows.push(("Notes", notes.to_owned()));
        }
        rows
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for character in raw.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationPayload<'a> {
    to: &'a [String],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
    pr_id: &'a str,
}

/// Delivers rendered PR notifications.
#[derive(Clone)]
pub struct NotificationService<C> {
    functions: Arc<C>,
}

impl<C> NotificationService<C>
where
    C: CallableFunction,
{
    /// Create a service invoking functions through `functions`.
    pub fn new(functions: Arc<C>) -> Self {
        Self { functions }
    }

    /// Render `notification` and send it to `recipients`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] with `InvalidRequest` when `recipients` is
    /// empty, `Unauthorized` when the function rejects the caller's token,
    /// `Unavailable` when it cannot be reached or fails otherwise, and
    /// `InternalError` when its response cannot be decoded.
    pub async fn send(
        &self,
        recipients: &[String],
        notification: &PrNotification,
    ) -> Result<Value, DomainError> {
        if recipients.iter().all(|recipient| recipient.trim().is_empty()) {
            return Err(DomainError::invalid_request(
                "notification requires at least one recipient",
            ));
        }

        let email = notification.render();
        let payload = serde_json::to_value(NotificationPayload {
            to: recipients,
            subject: &email.subject,
            text: &email.text,
            html: &email.html,
            pr_id: &notification.pr_id,
        })
        .map_err(|err| DomainError::internal(format!("encode notification payload: {err}")))?;

        let result = self
            .functions
            .call(SEND_PR_NOTIFICATION, payload)
            .await
            .map_err(|err| {
                error!(error = %err, pr_id = %notification.pr_id, "PR notification failed");
                map_callable_error(err)
            })?;
        info!(
            pr_id = %notification.pr_id,
            recipients = recipients.len(),
            "PR notification sent"
        );
        Ok(result)
    }
}

fn map_callable_error(err: CallableFunctionError) -> DomainError {
    match &err {
        CallableFunctionError::Decode { .. } => DomainError::internal(err.to_string()),
        CallableFunctionError::Remote { status, .. } if is_auth_failure(status) => {
            DomainError::unauthorized(err.to_string())
        }
        CallableFunctionError::Transport { .. } | CallableFunctionError::Remote { .. } => {
            DomainError::unavailable(err.to_string())
        }
    }
}

/// Callable statuses, or raw HTTP codes, meaning the caller's token was
/// missing or rejected.
fn is_auth_failure(status: &str) -> bool {
    matches!(
        status,
        "UNAUTHENTICATED" | "PERMISSION_DENIED" | "401" | "403"
    )
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockCallableFunction;
    use mockall::predicate::{always, eq};
    use notify_format::{NOT_SPECIFIED, PRODUCTION_BASE_URL};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn notification() -> PrNotification {
        PrNotification {
            pr_id: "abc123".to_owned(),
            pr_number: "PR-0042".to_owned(),
            description: "Solar panels <5kW>".to_owned(),
            requestor_name: "Jane Doe".to_owned(),
            amount: Some(1234.5),
            currency: Some("USD".to_owned()),
            required_date: DateInput::from("2024-01-05"),
            status: "PENDING_APPROVAL".to_owned(),
            notes: None,
        }
    }

    #[rstest]
    fn renders_subject_and_plain_text(notification: PrNotification) {
        let email = notification.render();
        assert_eq!(email.subject, "PR PR-0042: PENDING_APPROVAL");
        assert_eq!(
            email.text,
            format!(
                "PR PR-0042 is now PENDING_APPROVAL.\n\n\
                 Description: Solar panels <5kW>\n\
                 Requestor: Jane Doe\n\
                 Amount: $1,234.50\n\
                 Required date: January 5, 2024\n\
                 \nView the request: {PRODUCTION_BASE_URL}/pr/abc123\n"
            )
        );
    }

    #[rstest]
    fn html_escapes_user_values(notification: PrNotification) {
        let email = notification.render();
        assert!(email.html.contains("Solar panels &lt;5kW&gt;"));
        assert!(!email.html.contains("<5kW>"));
        assert!(email.html.contains(&format!("href=\"{PRODUCTION_BASE_URL}/pr/abc123\"")));
    }

    #[rstest]
    fn missing_values_render_sentinels_and_notes_are_optional(mut notification: PrNotification) {
        notification.amount = Some(0.0);
        notification.required_date = DateInput::Missing;
        notification.notes = Some("Urgent & fragile".to_owned());

        let email = notification.render();
        assert!(email.text.contains(&format!("Amount: {NOT_SPECIFIED}\n")));
        assert!(email.text.contains(&format!("Required date: {NOT_SPECIFIED}\n")));
        assert!(email.text.contains("Notes: Urgent & fragile\n"));
        assert!(email.html.contains("Urgent &amp; fragile"));
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_empty_recipient_lists(notification: PrNotification) {
        let mut functions = MockCallableFunction::new();
        functions.expect_call().never();
        let service = NotificationService::new(Arc::new(functions));

        let err = service
            .send(&[" ".to_owned()], &notification)
            .await
            .expect_err("blank recipients must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn sends_rendered_payload(notification: PrNotification) {
        let expected = notification.render();
        let mut functions = MockCallableFunction::new();
        functions
            .expect_call()
            .with(eq(SEND_PR_NOTIFICATION), always())
            .times(1)
            .returning(move |_, payload| {
                assert_eq!(payload["to"], json!(["approver@b.com"]));
                assert_eq!(payload["subject"], json!(expected.subject));
                assert_eq!(payload["html"], json!(expected.html));
                assert_eq!(payload["prId"], json!("abc123"));
                Ok(json!({"delivered": 1}))
            });
        let service = NotificationService::new(Arc::new(functions));

        let result = service
            .send(&["approver@b.com".to_owned()], &notification)
            .await
            .expect("send succeeds");
        assert_eq!(result, json!({"delivered": 1}));
    }

    #[rstest]
    #[case(CallableFunctionError::transport("reset"), ErrorCode::Unavailable)]
    #[case(CallableFunctionError::remote("INTERNAL", "boom"), ErrorCode::Unavailable)]
    #[case(CallableFunctionError::remote("UNAUTHENTICATED", "no token"), ErrorCode::Unauthorized)]
    #[case(CallableFunctionError::remote("403", "forbidden"), ErrorCode::Unauthorized)]
    #[case(CallableFunctionError::decode("bad json"), ErrorCode::InternalError)]
    fn callable_errors_map_to_domain_codes(
        #[case] err: CallableFunctionError,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(map_callable_error(err).code(), expected);
    }
}
