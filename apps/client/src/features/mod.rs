//! Feature components: form state plus one outbound call each.
//!
//! A component's `submit` validates the form, issues a single service call and
//! records the outcome in its [`CallState`]. Validation failures never reach
//! the network. Transport failures have already been notified by the
//! interceptor, so components only record them inline.

use crate::errors::{ApiError, FeatureError, ValidationError};

pub mod ats_analyzer;
pub mod history;
pub mod image_generation;
pub mod resume_generator;

pub use ats_analyzer::AtsAnalyzer;
pub use history::BoundedHistory;
pub use image_generation::{GeneratedImage, ImageGeneration};
pub use resume_generator::ResumeGenerator;

/// Loading flag, inline error and last result of a component.
#[derive(Debug, Clone, PartialEq)]
pub struct CallState<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<T>,
}

impl<T> Default for CallState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            result: None,
        }
    }
}

impl<T> CallState<T> {
    /// Starts a call once `check` passes; a failed check is recorded inline.
    ///
    /// `loading` stays set while the returned [`InFlight`] is alive, and is
    /// cleared when it is settled or dropped (e.g. a cancelled `submit`).
    pub fn start(
        &mut self,
        check: Result<(), ValidationError>,
    ) -> Result<InFlight<'_, T>, FeatureError> {
        if self.loading {
            return Err(FeatureError::Busy);
        }
        if let Err(err) = check {
            let err = FeatureError::from(err);
            self.fail(&err);
            return Err(err);
        }
        self.loading = true;
        self.error = None;
        Ok(InFlight { state: self })
    }

    /// Records `err` inline. A previous result is kept.
    pub fn fail(&mut self, err: &FeatureError) {
        self.loading = false;
        self.error = Some(err.to_string());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A call started by [`CallState::start`] that has not been settled yet.
pub struct InFlight<'a, T> {
    state: &'a mut CallState<T>,
}

impl<T: Clone> InFlight<'_, T> {
    /// Records the outcome of the call.
    pub fn settle(self, outcome: Result<T, ApiError>) -> Result<T, FeatureError> {
        match outcome {
            Ok(value) => {
                self.state.error = None;
                self.state.result = Some(value.clone());
                Ok(value)
            }
            Err(err) => {
                let err = FeatureError::from(err);
                self.state.fail(&err);
                Err(err)
            }
        }
    }
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        self.state.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorClass;

    #[test]
    fn test_start_while_loading_is_busy() {
        let mut state = CallState::<u32> {
            loading: true,
            ..CallState::default()
        };
        assert!(matches!(state.start(Ok(())), Err(FeatureError::Busy)));
        assert!(state.loading);
    }

    #[test]
    fn test_loading_lasts_until_settled() {
        let mut state = CallState::default();
        let call = state.start(Ok(())).unwrap();
        assert!(call.state.loading);
        assert_eq!(call.settle(Ok(7)), Ok(7));

        assert!(!state.loading);
        assert_eq!(state.result, Some(7));
    }

    #[test]
    fn test_dropping_unsettled_call_clears_loading() {
        let mut state = CallState::<u32>::default();
        drop(state.start(Ok(())).unwrap());

        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.start(Ok(())).is_ok());
    }

    #[test]
    fn test_failed_check_is_inline_and_not_loading() {
        let mut state = CallState::<u32>::default();
        let err = state
            .start(Err(ValidationError::MissingField("prompt")))
            .err()
            .unwrap();

        assert!(matches!(err, FeatureError::Validation(_)));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("prompt is required"));
    }

    #[test]
    fn test_api_failure_keeps_previous_result() {
        let mut state = CallState::default();
        state.start(Ok(())).unwrap().settle(Ok("first")).unwrap();
        let outcome = state.start(Ok(())).unwrap().settle(Err(ApiError {
            class: ErrorClass::Server,
            status: 500,
            message: "Resume generation failed".to_string(),
        }));

        assert!(outcome.is_err());
        assert!(!state.loading);
        assert_eq!(state.result, Some("first"));
        assert_eq!(state.error.as_deref(), Some("Resume generation failed"));
    }
}
