//! Enquiry submission from the command line.
//!
//! The CLI keeps no state between runs, so the code step works like this:
//! without `--otp` the code is "sent" and the command asks to be re-run;
//! with `--otp` the code is checked against a code sent to `--email` in the
//! same run.

use std::io::Write;
use std::time::Duration;

use clap::Args;

use leadbook_core::{DEMO_OTP, IntakeStage, LeadSubmission};
use leadbook_store::RecordStore;
use leadbook_storefront::services::{LeadIntake, SubmitOutcome};

use crate::error::CliError;

/// `leadbook submit` arguments.
#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Student name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    /// 10-digit mobile number
    #[arg(long)]
    pub phone: String,

    /// CBSE, ICSE, IB, IGCSE or "State Board"
    #[arg(long)]
    pub curriculum: String,

    /// 1 to 12
    #[arg(long)]
    pub grade: String,

    /// Verification code
    #[arg(long)]
    pub otp: Option<String>,

    /// The enquiry is not for a student enrollment (rejected)
    #[arg(long)]
    pub not_student: bool,
}

impl SubmitArgs {
    fn submission(&self) -> LeadSubmission {
        LeadSubmission {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            curriculum: self.curriculum.clone(),
            grade: self.grade.clone(),
        }
    }
}

/// Run the enquiry flow once.
///
/// # Errors
///
/// Returns `CliError::Invalid` for field errors and `CliError::WrongCode`
/// for a code other than the demo code.
pub async fn submit(
    store: &RecordStore,
    args: SubmitArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let intake = LeadIntake::new(store.clone(), Duration::ZERO);
    let stage = match args.otp {
        Some(_) => IntakeStage::request_code(&args.email).unwrap_or_default(),
        None => IntakeStage::Idle,
    };

    let outcome = intake
        .submit(
            &stage,
            &args.submission(),
            args.otp.as_deref().unwrap_or_default(),
            !args.not_student,
        )
        .await;

    match outcome {
        SubmitOutcome::Invalid(errors) => Err(CliError::Invalid(errors)),
        SubmitOutcome::WrongCode => Err(CliError::WrongCode),
        SubmitOutcome::CodeSent(stage) => {
            let email = match &stage {
                IntakeStage::CodeSent { email } => email.as_str(),
                IntakeStage::Idle => args.email.trim(),
            };
            writeln!(out, "OTP sent to {email}.")?;
            writeln!(out, "Re-run with --otp {DEMO_OTP} to confirm (demo code).")?;
            Ok(())
        }
        SubmitOutcome::Booked(lead) => {
            writeln!(out, "Your free trial class has been booked successfully!")?;
            writeln!(out, "  Lead {} ({}, {})", lead.id, lead.name, lead.status)?;
            Ok(())
        }
    }
}
