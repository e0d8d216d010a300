//! Operator notifications
//!
//! Every terminating path of a run that reaches the remote endpoint sends
//! one of two fixed messages. Delivery is fire-and-forget: a notice that
//! cannot be sent is logged and the run carries on.

use std::future::Future;

use tracing::{error, info};

use crate::constants::email;
use crate::errors::NotifyResult;

pub mod smtp;

pub use smtp::SmtpNotifier;

/// Message sent to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The run completed
    Success,
    /// The run (or its cleanup) failed with the given error text
    Failure { message: String },
}

impl Notice {
    pub fn failure(message: impl Into<String>) -> Self {
        Notice::Failure {
            message: message.into(),
        }
    }

    pub fn subject(&self) -> String {
        format!("{} Daily Extract", email::HEADER)
    }

    pub fn body(&self) -> String {
        match self {
            Notice::Success => {
                format!("{} successfully extracted from the SFTP Server.", email::HEADER)
            }
            Notice::Failure { message } => format!(
                "{} failed to extract to the SFTP Server.\nError Message: {}",
                email::HEADER,
                message
            ),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Notice::Success => "success",
            Notice::Failure { .. } => "failure",
        }
    }
}

/// Delivers notices to the operator
pub trait Notifier: Send + Sync {
    fn deliver(&self, notice: &Notice) -> impl Future<Output = NotifyResult<()>> + Send;
}

/// Send the success notice, logging any delivery error
pub async fn notify_success<N: Notifier>(notifier: &N) {
    send(notifier, Notice::Success).await;
}

/// Send a failure notice carrying `message`, logging any delivery error
pub async fn notify_failure<N: Notifier>(notifier: &N, message: impl Into<String>) {
    send(notifier, Notice::failure(message)).await;
}

async fn send<N: Notifier>(notifier: &N, notice: Notice) {
    match notifier.deliver(&notice).await {
        Ok(()) => info!("Sent {} notification", notice.kind()),
        Err(e) => error!("Failed to send {} notification: {}", notice.kind(), e),
    }
}
