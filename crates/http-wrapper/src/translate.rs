//! Per-call response translation hooks

use crate::error::BoxError;
use crate::response::ResponseHead;

/// Caller-supplied classification of a response.
///
/// Runs on the response head before the body is read and before the default
/// success/failure decision. Returning `Err` fails the call with
/// [`HttpError::Translated`](crate::HttpError::Translated) carrying that error.
pub trait ResponseTranslator: Send + Sync {
    /// Inspect the response head
    fn translate(&self, head: &ResponseHead) -> Result<(), BoxError>;
}

impl<F> ResponseTranslator for F
where
    F: Fn(&ResponseHead) -> Result<(), BoxError> + Send + Sync,
{
    fn translate(&self, head: &ResponseHead) -> Result<(), BoxError> {
        self(head)
    }
}
