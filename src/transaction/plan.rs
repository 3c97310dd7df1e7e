//! Description of a single transaction attempt.

use crate::errors::WalletError;
use crate::provider::Receipt;

pub const DEFAULT_KIND: &str = "transaction";
pub const DEFAULT_PENDING_MESSAGE: &str = "Processing transaction...";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Transaction completed successfully!";

type SuccessHook = Box<dyn FnOnce(&Receipt) + Send>;
type ErrorHook = Box<dyn FnOnce(&WalletError) + Send>;

/// What to submit and how to report it.
///
/// `build` receives the signing context and returns the submitted
/// transaction; it may wait on the user approving in their wallet.
pub struct TransactionPlan<F> {
    pub(crate) kind: String,
    pub(crate) pending_message: String,
    pub(crate) success_message: String,
    pub(crate) build: F,
    pub(crate) on_success: Option<SuccessHook>,
    pub(crate) on_error: Option<ErrorHook>,
}

impl<F> TransactionPlan<F> {
    pub fn new(build: F) -> Self {
        Self {
            kind: DEFAULT_KIND.to_string(),
            pending_message: DEFAULT_PENDING_MESSAGE.to_string(),
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            build,
            on_success: None,
            on_error: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_pending_message(mut self, message: impl Into<String>) -> Self {
        self.pending_message = message.into();
        self
    }

    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = message.into();
        self
    }

    /// Called with the receipt after the Success state is written.
    pub fn on_success(mut self, hook: impl FnOnce(&Receipt) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(hook));
        self
    }

    /// Called with the classified error after the Failure state is written.
    pub fn on_error(mut self, hook: impl FnOnce(&WalletError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn pending_message(&self) -> &str {
        &self.pending_message
    }

    pub fn success_message(&self) -> &str {
        &self.success_message
    }
}
