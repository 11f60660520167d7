//! # audithub-notify
//!
//! Outbound notification transports. Each channel exposes a trait so the
//! service layer can be tested against mock senders, plus a concrete
//! implementation speaking SMTP (email) or HTTP (Slack, webhooks).

pub mod email;
pub mod slack;
pub mod webhook;

pub use email::{EmailSender, SmtpEmailSender};
pub use slack::{SlackSender, SlackWebhookSender};
pub use webhook::{HttpWebhookSender, WebhookSender};
