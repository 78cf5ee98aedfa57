//! Landing page and enquiry form handlers.
//!
//! The form is a plain HTML form. Each POST re-renders the page with the
//! visitor's entered values, field errors and the code step, and a booking
//! redirects back to the landing page.
//!
//! The intake stage travels with the form: once a code is "sent" the page
//! carries the address in a hidden `code_sent_to` field. The stage holds no
//! secret, so nothing is kept on the server between requests.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use leadbook_core::intake::INVALID_OTP_MESSAGE;
use leadbook_core::validation::fields;
use leadbook_core::{CURRICULUMS, GRADES, IntakeStage, LeadSubmission, ValidationErrors};

use crate::error::add_breadcrumb;
use crate::filters;
use crate::services::SubmitOutcome;
use crate::state::AppState;

/// Shown after a code is "sent".
pub const CODE_SENT_MESSAGE: &str =
    "OTP sent! Check your email for the verification code (Demo: 123456)";

/// Shown on the landing page after a booking.
pub const BOOKED_MESSAGE: &str = "Your free trial class has been booked successfully!";

// =============================================================================
// Form input
// =============================================================================

/// Enquiry form fields as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnquiryForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub curriculum: String,
    pub grade: String,
    pub otp: String,
    /// Present (as `"on"`) when the checkbox is ticked.
    pub student_confirm: Option<String>,
    /// Newsletter opt-in. Shown back to the visitor, never stored.
    pub newsletter: Option<String>,
    /// Address a code was already sent to, echoed from the hidden field.
    pub code_sent_to: String,
}

impl EnquiryForm {
    fn submission(&self) -> LeadSubmission {
        LeadSubmission {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            curriculum: self.curriculum.clone(),
            grade: self.grade.clone(),
        }
    }

    const fn student_confirmed(&self) -> bool {
        self.student_confirm.is_some()
    }

    /// The stage the page was rendered at.
    fn stage(&self) -> IntakeStage {
        IntakeStage::request_code(&self.code_sent_to).unwrap_or_default()
    }
}

/// Landing page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub booked: Option<String>,
}

// =============================================================================
// Template
// =============================================================================

/// An `<option>` in a select input.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: String,
    pub selected: bool,
}

/// Field errors shown beside their inputs.
#[derive(Debug, Clone, Default)]
pub struct FormErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub curriculum: Option<String>,
    pub grade: Option<String>,
    pub otp: Option<String>,
    pub student_confirm: Option<String>,
}

impl From<&ValidationErrors> for FormErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let get = |field: &str| errors.first(field).map(str::to_owned);
        Self {
            name: get(fields::NAME),
            email: get(fields::EMAIL),
            phone: get(fields::PHONE),
            curriculum: get(fields::CURRICULUM),
            grade: get(fields::GRADE),
            otp: get(fields::OTP),
            student_confirm: get(fields::STUDENT_CONFIRM),
        }
    }
}

/// A banner message above the form.
#[derive(Debug, Clone)]
pub struct Notice {
    /// CSS modifier: `success` or `info`.
    pub kind: &'static str,
    pub message: String,
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub otp: String,
    pub student_confirmed: bool,
    pub newsletter: bool,
    pub curriculum_options: Vec<SelectOption>,
    pub grade_options: Vec<SelectOption>,
    pub errors: FormErrors,
    /// Address the code was sent to, once the code step is reached.
    pub code_sent_to: Option<String>,
    pub notice: Option<Notice>,
}

impl HomeTemplate {
    /// An empty form.
    fn blank() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            otp: String::new(),
            student_confirmed: true,
            newsletter: false,
            curriculum_options: options(&CURRICULUMS, "", |c| c.to_string()),
            grade_options: options(&GRADES, "", |g| format!("Grade {g}")),
            errors: FormErrors::default(),
            code_sent_to: None,
            notice: None,
        }
    }

    /// The form re-filled with what the visitor posted.
    fn refill(form: &EnquiryForm, stage: &IntakeStage) -> Self {
        let code_sent_to = match stage {
            IntakeStage::CodeSent { email } => Some(email.clone()),
            IntakeStage::Idle => None,
        };
        Self {
            name: form.name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            otp: form.otp.clone(),
            student_confirmed: form.student_confirmed(),
            newsletter: form.newsletter.is_some(),
            curriculum_options: options(&CURRICULUMS, form.curriculum.trim(), |c| c.to_string()),
            grade_options: options(&GRADES, form.grade.trim(), |g| format!("Grade {g}")),
            errors: FormErrors::default(),
            code_sent_to,
            notice: None,
        }
    }

    fn with_errors(mut self, errors: &ValidationErrors) -> Self {
        self.errors = FormErrors::from(errors);
        self
    }

    fn with_notice(mut self, kind: &'static str, message: &str) -> Self {
        self.notice = Some(Notice {
            kind,
            message: message.to_string(),
        });
        self
    }
}

fn options(
    values: &'static [&'static str],
    selected: &str,
    label: impl Fn(&str) -> String,
) -> Vec<SelectOption> {
    values
        .iter()
        .map(|&value| SelectOption {
            value,
            label: label(value),
            selected: value == selected,
        })
        .collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// Landing page.
///
/// GET /
#[instrument(skip(query))]
pub async fn home(Query(query): Query<HomeQuery>) -> HomeTemplate {
    let page = HomeTemplate::blank();
    if query.booked.is_some() {
        page.with_notice("success", BOOKED_MESSAGE)
    } else {
        page
    }
}

/// "Send" the verification code to the entered email.
///
/// POST /enquiry/send-code
#[instrument(skip(state, form), fields(email = %form.email.trim()))]
pub async fn send_code(State(state): State<AppState>, Form(form): Form<EnquiryForm>) -> Response {
    match state.intake().send_code(&form.email).await {
        Ok(stage) => {
            add_breadcrumb("enquiry", "Verification code sent", &[]);
            HomeTemplate::refill(&form, &stage)
                .with_notice("info", CODE_SENT_MESSAGE)
                .into_response()
        }
        Err(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            HomeTemplate::refill(&form, &form.stage()).with_errors(&errors),
        )
            .into_response(),
    }
}

/// Submit the enquiry.
///
/// POST /enquiry
///
/// Without a code sent to the entered address this runs the send step
/// instead. With the right code the lead is saved and the visitor is
/// redirected to the landing page.
#[instrument(skip(state, form), fields(email = %form.email.trim()))]
pub async fn submit(State(state): State<AppState>, Form(form): Form<EnquiryForm>) -> Response {
    let stage = form.stage();
    let outcome = state
        .intake()
        .submit(
            &stage,
            &form.submission(),
            &form.otp,
            form.student_confirmed(),
        )
        .await;

    match outcome {
        SubmitOutcome::Invalid(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            HomeTemplate::refill(&form, &stage).with_errors(&errors),
        )
            .into_response(),
        SubmitOutcome::CodeSent(stage) => HomeTemplate::refill(&form, &stage)
            .with_notice("info", CODE_SENT_MESSAGE)
            .into_response(),
        SubmitOutcome::WrongCode => {
            let errors = ValidationErrors::single(fields::OTP, INVALID_OTP_MESSAGE);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                HomeTemplate::refill(&form, &stage).with_errors(&errors),
            )
                .into_response()
        }
        SubmitOutcome::Booked(lead) => {
            add_breadcrumb("enquiry", "Enquiry booked", &[("lead_id", lead.id.as_str())]);
            Redirect::to("/?booked=1").into_response()
        }
    }
}
