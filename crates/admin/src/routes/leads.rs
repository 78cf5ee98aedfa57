//! Lead console route handlers.
//!
//! The table is plain HTML. The row named by `?edit=` renders as inputs
//! bound to a single form outside the table, so editing works without
//! scripts. The search term travels in `q` and survives every redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use leadbook_core::validation::fields;
use leadbook_core::{CURRICULUMS, GRADES, Lead, LeadEdit, LeadId, LeadStatus, ValidationErrors};

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::Flash;
use crate::services::{LeadConsole, LeadEditError};
use crate::state::AppState;

pub const UPDATED_MESSAGE: &str = "Lead updated successfully";
pub const DELETED_MESSAGE: &str = "Lead deleted successfully";
pub const NOT_FOUND_MESSAGE: &str = "Lead not found";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete lead";

/// Build the leads router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/leads", get(list))
        .route("/leads/{id}", axum::routing::post(update))
        .route("/leads/{id}/delete", get(confirm_delete).post(delete))
}

// =============================================================================
// Request types
// =============================================================================

/// `/leads` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LeadsQuery {
    /// Free-text filter.
    pub q: String,
    /// ID of the row in edit mode.
    pub edit: Option<String>,
}

/// Inline edit form. The `q` field carries the filter back.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EditForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub curriculum: Option<String>,
    pub grade: Option<String>,
    pub status: Option<String>,
    pub q: String,
}

impl EditForm {
    fn edit(&self) -> LeadEdit {
        LeadEdit {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            curriculum: self.curriculum.clone(),
            grade: self.grade.clone(),
            status: self.status.clone(),
        }
    }
}

/// Filter carried by the delete confirmation form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilterForm {
    pub q: String,
}

// =============================================================================
// View types
// =============================================================================

/// An `<option>` in a select input.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

fn options<'a>(
    values: impl IntoIterator<Item = &'a str>,
    selected: &str,
    label: impl Fn(&str) -> String,
) -> Vec<SelectOption> {
    values
        .into_iter()
        .map(|value| SelectOption {
            value: value.to_string(),
            label: label(value),
            selected: value == selected,
        })
        .collect()
}

/// A read-only table row.
#[derive(Debug, Clone)]
pub struct LeadRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub curriculum: String,
    pub grade: String,
    pub status: &'static str,
    pub created: String,
    /// Rendered as the edit row.
    pub editing: bool,
}

impl From<&Lead> for LeadRow {
    fn from(lead: &Lead) -> Self {
        Self {
            id: lead.id.to_string(),
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            curriculum: lead.curriculum.clone(),
            grade: lead.grade.clone(),
            status: lead.status.label(),
            created: lead.created_at.format("%d %b %Y, %H:%M").to_string(),
            editing: false,
        }
    }
}

/// Field errors for the row being edited.
#[derive(Debug, Clone, Default)]
pub struct EditErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub curriculum: Option<String>,
    pub grade: Option<String>,
    pub status: Option<String>,
}

impl From<&ValidationErrors> for EditErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let get = |field: &str| errors.first(field).map(str::to_owned);
        Self {
            name: get(fields::NAME),
            email: get(fields::EMAIL),
            phone: get(fields::PHONE),
            curriculum: get(fields::CURRICULUM),
            grade: get(fields::GRADE),
            status: get(fields::STATUS),
        }
    }
}

/// The row in edit mode.
#[derive(Debug, Clone)]
pub struct EditRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub curriculum_options: Vec<SelectOption>,
    pub grade_options: Vec<SelectOption>,
    pub status_options: Vec<SelectOption>,
    pub errors: EditErrors,
}

impl EditRow {
    fn for_lead(lead: &Lead) -> Self {
        Self {
            id: lead.id.to_string(),
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            curriculum_options: curriculum_options(&lead.curriculum),
            grade_options: grade_options(&lead.grade),
            status_options: status_options(lead.status.label()),
            errors: EditErrors::default(),
        }
    }

    /// The row refilled with a rejected submission.
    fn refill(lead: &Lead, form: &EditForm, errors: &ValidationErrors) -> Self {
        let pick = |posted: &Option<String>, stored: &str| {
            posted.clone().unwrap_or_else(|| stored.to_string())
        };
        Self {
            id: lead.id.to_string(),
            name: pick(&form.name, &lead.name),
            email: pick(&form.email, &lead.email),
            phone: pick(&form.phone, &lead.phone),
            curriculum_options: curriculum_options(&pick(&form.curriculum, &lead.curriculum)),
            grade_options: grade_options(&pick(&form.grade, &lead.grade)),
            status_options: status_options(&pick(&form.status, lead.status.label())),
            errors: EditErrors::from(errors),
        }
    }
}

fn curriculum_options(selected: &str) -> Vec<SelectOption> {
    options(CURRICULUMS, selected.trim(), str::to_string)
}

fn grade_options(selected: &str) -> Vec<SelectOption> {
    options(GRADES, selected.trim(), |g| format!("Grade {g}"))
}

fn status_options(selected: &str) -> Vec<SelectOption> {
    options(
        LeadStatus::ALL.iter().map(|s| s.label()),
        selected.trim(),
        str::to_string,
    )
}

/// Lead table template.
#[derive(Template, WebTemplate)]
#[template(path = "leads/index.html")]
pub struct LeadsTemplate {
    pub admin_username: String,
    pub q: String,
    /// `q`, percent-encoded for links.
    pub q_param: String,
    pub rows: Vec<LeadRow>,
    pub editing: Option<EditRow>,
    pub flash: Option<Flash>,
}

impl LeadsTemplate {
    fn new(admin_username: &str, q: &str, leads: &[Lead]) -> Self {
        Self {
            admin_username: admin_username.to_string(),
            q: q.to_string(),
            q_param: urlencoding::encode(q).into_owned(),
            rows: leads.iter().map(LeadRow::from).collect(),
            editing: None,
            flash: None,
        }
    }

    /// Put one row into edit mode.
    fn edit(&mut self, row: EditRow) {
        for lead in &mut self.rows {
            lead.editing = lead.id == row.id;
        }
        self.editing = Some(row);
    }
}

/// Delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "leads/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub admin_username: String,
    pub lead: LeadRow,
    pub q: String,
    pub q_param: String,
}

/// `/leads`, keeping the filter when there is one.
fn leads_location(q: &str) -> String {
    if q.trim().is_empty() {
        "/leads".to_string()
    } else {
        format!("/leads?q={}", urlencoding::encode(q))
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /
async fn index() -> Redirect {
    Redirect::to("/leads")
}

/// Lead table.
///
/// GET /leads?q=&edit=
#[instrument(skip(state, session, admin), fields(q = %query.q))]
async fn list(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LeadsQuery>,
) -> Result<LeadsTemplate> {
    let console = LeadConsole::new(state.store());
    let leads = console.list(&query.q);

    let mut page = LeadsTemplate::new(&admin.username, &query.q, &leads);
    page.flash = Flash::take(&session).await?;
    if let Some(lead) = query
        .edit
        .as_deref()
        .and_then(|id| leads.iter().find(|lead| lead.id.as_str() == id))
    {
        page.edit(EditRow::for_lead(lead));
    }

    Ok(page)
}

/// Save an inline edit.
///
/// POST /leads/{id}
#[instrument(skip(state, session, admin, form), fields(admin = %admin.username))]
async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<EditForm>,
) -> Result<Response> {
    let id = LeadId::new(id);
    let console = LeadConsole::new(state.store());

    match console.update(&id, form.edit()) {
        Ok(_) => {
            Flash::success(UPDATED_MESSAGE).push(&session).await?;
            Ok(Redirect::to(&leads_location(&form.q)).into_response())
        }
        Err(LeadEditError::NotFound) => {
            Flash::error(NOT_FOUND_MESSAGE).push(&session).await?;
            Ok(Redirect::to(&leads_location(&form.q)).into_response())
        }
        Err(LeadEditError::Validation(errors)) => {
            let leads = console.list(&form.q);
            let Some(lead) = console.find(&id) else {
                Flash::error(NOT_FOUND_MESSAGE).push(&session).await?;
                return Ok(Redirect::to(&leads_location(&form.q)).into_response());
            };
            let mut page = LeadsTemplate::new(&admin.username, &form.q, &leads);
            // Keep the row visible even if the filter no longer matches it
            if !leads.iter().any(|l| l.id == lead.id) {
                page.rows.push(LeadRow::from(&lead));
            }
            page.edit(EditRow::refill(&lead, &form, &errors));
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

/// Delete confirmation page.
///
/// GET /leads/{id}/delete
async fn confirm_delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Query(query): Query<LeadsQuery>,
) -> Result<Response> {
    let Some(lead) = LeadConsole::new(state.store()).find(&LeadId::new(id)) else {
        Flash::error(NOT_FOUND_MESSAGE).push(&session).await?;
        return Ok(Redirect::to(&leads_location(&query.q)).into_response());
    };

    Ok(ConfirmDeleteTemplate {
        admin_username: admin.username,
        lead: LeadRow::from(&lead),
        q_param: urlencoding::encode(&query.q).into_owned(),
        q: query.q,
    }
    .into_response())
}

/// Delete a lead.
///
/// POST /leads/{id}/delete
#[instrument(skip(state, session, admin, form), fields(admin = %admin.username))]
async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<FilterForm>,
) -> Result<Redirect> {
    let flash = if LeadConsole::new(state.store()).delete(&LeadId::new(id)) {
        Flash::success(DELETED_MESSAGE)
    } else {
        Flash::error(DELETE_FAILED_MESSAGE)
    };
    flash.push(&session).await?;
    Ok(Redirect::to(&leads_location(&form.q)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use leadbook_core::LeadSubmission;

    use super::*;

    fn asha() -> Lead {
        let input = LeadSubmission {
            name: "Asha Rao".to_string(),
            email: "asha@x.com".to_string(),
            phone: "9876543210".to_string(),
            curriculum: "CBSE".to_string(),
            grade: "5".to_string(),
        }
        .validate()
        .unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();
        Lead::new(LeadId::from_millis(now.timestamp_millis()), input, now)
    }

    #[test]
    fn test_leads_location_encodes_filter() {
        assert_eq!(leads_location(""), "/leads");
        assert_eq!(leads_location("  "), "/leads");
        assert_eq!(leads_location("asha rao"), "/leads?q=asha%20rao");
    }

    #[test]
    fn test_row_formats_created_at() {
        let row = LeadRow::from(&asha());
        assert_eq!(row.created, "01 Mar 2024, 10:30");
        assert_eq!(row.status, "Enquired");
    }

    #[test]
    fn test_edit_row_selects_current_values() {
        let row = EditRow::for_lead(&asha());
        let selected: Vec<_> = row
            .curriculum_options
            .iter()
            .chain(&row.grade_options)
            .chain(&row.status_options)
            .filter(|o| o.selected)
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(selected, ["CBSE", "5", "Enquired"]);
        assert_eq!(row.status_options.len(), 6);
    }

    #[test]
    fn test_refill_keeps_posted_values() {
        let form = EditForm {
            phone: Some("12345".to_string()),
            status: Some("Demo Assign".to_string()),
            ..EditForm::default()
        };
        let errors = ValidationErrors::single(fields::PHONE, "Phone must be 10 digits");
        let row = EditRow::refill(&asha(), &form, &errors);
        assert_eq!(row.phone, "12345");
        assert_eq!(row.name, "Asha Rao");
        assert_eq!(row.errors.phone.as_deref(), Some("Phone must be 10 digits"));
        assert!(row.status_options.iter().any(|o| o.selected && o.value == "Demo Assign"));
    }

    #[test]
    fn test_table_renders_rows_and_total() {
        let leads = vec![asha()];
        let html = LeadsTemplate::new("admin", "", &leads).render().unwrap();
        assert!(html.contains("Asha Rao"));
        assert!(html.contains("Total leads: <strong>1</strong>"));
        assert!(html.contains("name=\"q\""));
    }

    #[test]
    fn test_empty_table() {
        let html = LeadsTemplate::new("admin", "zzz", &[]).render().unwrap();
        assert!(html.contains("No leads found"));
        assert!(html.contains("value=\"zzz\""));
    }

    #[test]
    fn test_edit_mode_renders_inputs() {
        let lead = asha();
        let mut page = LeadsTemplate::new("admin", "", std::slice::from_ref(&lead));
        page.edit(EditRow::for_lead(&lead));
        assert!(page.rows[0].editing);
        let html = page.render().unwrap();
        assert!(html.contains("form=\"edit-lead\""));
        assert!(html.contains(&format!("action=\"/leads/{}\"", lead.id)));
        assert!(html.contains("Demo Assign"));
    }
}
