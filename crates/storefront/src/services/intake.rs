//! Enquiry intake service.
//!
//! Runs the code-then-submit flow from [`leadbook_core::intake`] against the
//! record store. The caller owns the visitor's [`IntakeStage`] and stores
//! whatever stage this service hands back.

use std::time::Duration;

use chrono::Utc;
use leadbook_core::{IntakeStage, Lead, LeadSubmission, SubmitDecision, ValidationErrors};
use leadbook_store::RecordStore;

/// Result of submitting the enquiry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Field errors; the stage is unchanged.
    Invalid(ValidationErrors),
    /// No code had been sent to the submitted address, so one was sent now.
    CodeSent(IntakeStage),
    /// The entered code was wrong; the stage is unchanged.
    WrongCode,
    /// The lead was saved and the stage is back to [`IntakeStage::Idle`].
    Booked(Lead),
}

/// Enquiry intake service.
#[derive(Debug, Clone)]
pub struct LeadIntake {
    store: RecordStore,
    otp_delay: Duration,
}

impl LeadIntake {
    /// Create a new intake service.
    #[must_use]
    pub const fn new(store: RecordStore, otp_delay: Duration) -> Self {
        Self { store, otp_delay }
    }

    /// "Send" a verification code to `email`.
    ///
    /// Nothing is delivered; the call waits the configured delay and returns
    /// the stage to store for the visitor.
    ///
    /// # Errors
    ///
    /// Returns an `email` field error if the address is blank. No delay is
    /// applied in that case.
    pub async fn send_code(&self, email: &str) -> Result<IntakeStage, ValidationErrors> {
        let stage = IntakeStage::request_code(email)?;
        tokio::time::sleep(self.otp_delay).await;
        tracing::info!(email = %email.trim(), "Verification code sent (simulated)");
        Ok(stage)
    }

    /// Submit the enquiry form from `stage`.
    pub async fn submit(
        &self,
        stage: &IntakeStage,
        submission: &LeadSubmission,
        code: &str,
        student_confirmed: bool,
    ) -> SubmitOutcome {
        match stage.submit(submission, code, student_confirmed) {
            SubmitDecision::Invalid(errors) => {
                tracing::debug!(errors = %errors, "Enquiry rejected by validation");
                SubmitOutcome::Invalid(errors)
            }
            SubmitDecision::RequestCode { email } => match self.send_code(&email).await {
                Ok(stage) => SubmitOutcome::CodeSent(stage),
                Err(errors) => SubmitOutcome::Invalid(errors),
            },
            SubmitDecision::WrongCode => {
                tracing::info!(email = %submission.email.trim(), "Enquiry rejected: wrong code");
                SubmitOutcome::WrongCode
            }
            SubmitDecision::Accept(validated) => {
                let lead = self.store.append_new_lead(validated, Utc::now());
                tracing::info!(lead_id = %lead.id, "Enquiry booked");
                SubmitOutcome::Booked(lead)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use leadbook_core::intake::INVALID_OTP_MESSAGE;
    use leadbook_core::validation::fields;
    use leadbook_core::{DEMO_OTP, LeadStatus};

    use super::*;

    fn intake() -> LeadIntake {
        LeadIntake::new(RecordStore::in_memory(), Duration::ZERO)
    }

    fn asha() -> LeadSubmission {
        LeadSubmission {
            name: "Asha Rao".to_string(),
            email: "asha@x.com".to_string(),
            phone: "9876543210".to_string(),
            curriculum: "CBSE".to_string(),
            grade: "5".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_code_requires_email() {
        let errors = intake().send_code("").await.unwrap_err();
        assert!(errors.first(fields::EMAIL).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_code_waits_for_delay() {
        let intake = LeadIntake::new(RecordStore::in_memory(), Duration::from_millis(500));
        let started = tokio::time::Instant::now();
        let stage = intake.send_code("asha@x.com").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
        assert!(stage.code_sent_to("asha@x.com"));
    }

    #[tokio::test]
    async fn test_full_flow_books_one_lead() {
        let intake = intake();

        let outcome = intake.submit(&IntakeStage::Idle, &asha(), "", true).await;
        let SubmitOutcome::CodeSent(stage) = outcome else {
            panic!("expected code to be sent, got {outcome:?}");
        };
        assert!(intake.store.list_leads().is_empty());

        let outcome = intake.submit(&stage, &asha(), DEMO_OTP, true).await;
        let SubmitOutcome::Booked(lead) = outcome else {
            panic!("expected booking, got {outcome:?}");
        };
        assert_eq!(lead.status, LeadStatus::Enquired);
        assert_eq!(intake.store.list_leads(), vec![lead]);
    }

    #[tokio::test]
    async fn test_wrong_code_saves_nothing() {
        let intake = intake();
        let stage = intake.send_code("asha@x.com").await.unwrap();
        let outcome = intake.submit(&stage, &asha(), "654321", true).await;
        assert_eq!(outcome, SubmitOutcome::WrongCode);
        assert!(intake.store.list_leads().is_empty());
        assert!(INVALID_OTP_MESSAGE.contains(DEMO_OTP));
    }

    #[tokio::test]
    async fn test_invalid_phone_saves_nothing() {
        let intake = intake();
        let stage = intake.send_code("asha@x.com").await.unwrap();
        let mut input = asha();
        input.phone = "98765".to_string();

        let outcome = intake.submit(&stage, &input, DEMO_OTP, true).await;
        assert!(matches!(outcome, SubmitOutcome::Invalid(e) if e.first(fields::PHONE) == Some("Phone must be 10 digits")));
        assert!(intake.store.list_leads().is_empty());
    }

    #[tokio::test]
    async fn test_bookings_get_distinct_ids() {
        let intake = intake();
        let stage = intake.send_code("asha@x.com").await.unwrap();
        for _ in 0..3 {
            let outcome = intake.submit(&stage, &asha(), DEMO_OTP, true).await;
            assert!(matches!(outcome, SubmitOutcome::Booked(_)));
        }
        let mut ids: Vec<_> = intake.store.list_leads().into_iter().map(|l| l.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_simultaneous_bookings_get_distinct_ids() {
        let intake = intake();
        let stage = intake.send_code("asha@x.com").await.unwrap();

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let intake = intake.clone();
                let stage = stage.clone();
                tokio::spawn(async move { intake.submit(&stage, &asha(), DEMO_OTP, true).await })
            })
            .collect();
        for task in tasks {
            assert!(matches!(task.await.unwrap(), SubmitOutcome::Booked(_)));
        }

        let mut ids: Vec<_> = intake
            .store
            .list_leads()
            .into_iter()
            .map(|l| l.id.as_str().to_owned())
            .collect();
        assert_eq!(ids.len(), 16);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }
}
