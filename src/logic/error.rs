use crate::store::StoreError;

/// Outcome of a survey operation that did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("Invalid filter parameter '{0}'; accepted parameters are surveyRef, shortName and longName")]
    InvalidFilterKey(String),
    #[error("No filter parameters provided")]
    NoFilterProvided,
    #[error("No fields provided to update")]
    NoFieldsToUpdate,
    #[error("Survey '{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SurveyError {
    /// True for errors caused by the request rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFilterKey(_) | Self::NoFilterProvided | Self::NoFieldsToUpdate
        )
    }
}
