use anyhow::Result;

/// Asks the user a yes/no question before something gets overwritten or deleted.
///
/// `context` explains what is about to happen and may be empty. A negative answer is a normal
/// outcome, errors are reserved for failures to ask at all.
#[cfg_attr(test, mockall::automock)]
pub trait Confirm {
    fn confirm(&mut self, context: &str, question: &str) -> Result<bool>;
}
