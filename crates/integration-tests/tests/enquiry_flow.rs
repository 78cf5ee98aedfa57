//! Visitor journey through the storefront enquiry form.
//!
//! Run with: `cargo test -p leadbook-integration-tests --test enquiry_flow`

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use leadbook_core::LeadStatus;
use leadbook_core::intake::INVALID_OTP_MESSAGE;
use leadbook_integration_tests::{TestContext, code_sent_to, enquiry_form};
use leadbook_store::{RecordStore, StoreConfig};
use reqwest::StatusCode;

#[tokio::test]
async fn test_booking_saves_lead_and_returns_to_landing_page() {
    let ctx = TestContext::new().await;
    let visitor = TestContext::browser();
    let form = enquiry_form("Asha Rao", "asha@x.com");

    // First submit only reaches the code step
    let resp = visitor
        .post(ctx.storefront("/enquiry"))
        .form(&form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Code sent to asha@x.com"));
    assert!(body.contains("name=\"otp\""));
    assert!(ctx.store.list_leads().is_empty());
    let sent_to = code_sent_to(&body).unwrap();
    assert_eq!(sent_to, "asha@x.com");

    let mut with_code = form.clone();
    with_code.push(("otp", "123456"));
    with_code.push(("code_sent_to", &sent_to));
    let resp = visitor
        .post(ctx.storefront("/enquiry"))
        .form(&with_code)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/");
    assert_eq!(resp.url().query(), Some("booked=1"));
    let body = resp.text().await.unwrap();
    assert!(body.contains("booked successfully"));

    let leads = ctx.store.list_leads();
    assert_eq!(leads.len(), 1);
    let lead = &leads[0];
    assert_eq!(lead.name, "Asha Rao");
    assert_eq!(lead.email, "asha@x.com");
    assert_eq!(lead.phone, "9876543210");
    assert_eq!(lead.curriculum, "CBSE");
    assert_eq!(lead.grade, "5");
    assert_eq!(lead.status, LeadStatus::Enquired);

    // The code step is consumed by the booking
    let body = visitor
        .get(ctx.storefront("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains("name=\"otp\""));
}

#[tokio::test]
async fn test_booking_is_written_to_the_data_file() {
    let ctx = TestContext::new().await;
    let visitor = TestContext::browser();
    let mut form = enquiry_form("Asha Rao", "asha@x.com");

    let page = visitor
        .post(ctx.storefront("/enquiry/send-code"))
        .form(&form)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let sent_to = code_sent_to(&page).unwrap();
    form.push(("otp", "123456"));
    form.push(("code_sent_to", &sent_to));
    visitor
        .post(ctx.storefront("/enquiry"))
        .form(&form)
        .send()
        .await
        .unwrap();

    let reopened = RecordStore::open(Some(&ctx.data_path), &StoreConfig::default()).unwrap();
    let leads = reopened.list_leads();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].name, "Asha Rao");
}

#[tokio::test]
async fn test_wrong_code_keeps_the_form() {
    let ctx = TestContext::new().await;
    let visitor = TestContext::browser();
    let mut form = enquiry_form("Asha Rao", "asha@x.com");

    let page = visitor
        .post(ctx.storefront("/enquiry/send-code"))
        .form(&form)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let sent_to = code_sent_to(&page).unwrap();

    form.push(("otp", "000000"));
    form.push(("code_sent_to", &sent_to));
    let resp = visitor
        .post(ctx.storefront("/enquiry"))
        .form(&form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains(INVALID_OTP_MESSAGE));
    assert!(body.contains("value=\"Asha Rao\""));
    assert_eq!(code_sent_to(&body).as_deref(), Some("asha@x.com"));
    assert!(ctx.store.list_leads().is_empty());
}

#[tokio::test]
async fn test_changing_email_after_send_restarts_code_step() {
    let ctx = TestContext::new().await;
    let visitor = TestContext::browser();

    visitor
        .post(ctx.storefront("/enquiry/send-code"))
        .form(&enquiry_form("Asha Rao", "asha@x.com"))
        .send()
        .await
        .unwrap();

    let mut form = enquiry_form("Asha Rao", "rao@x.com");
    form.push(("otp", "123456"));
    form.push(("code_sent_to", "asha@x.com"));
    let resp = visitor
        .post(ctx.storefront("/enquiry"))
        .form(&form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Code sent to rao@x.com"));
    assert_eq!(code_sent_to(&body).as_deref(), Some("rao@x.com"));
    assert!(ctx.store.list_leads().is_empty());
}

#[tokio::test]
async fn test_invalid_fields_are_reported() {
    let ctx = TestContext::new().await;
    let visitor = TestContext::browser();

    let resp = visitor
        .post(ctx.storefront("/enquiry"))
        .form(&[
            ("name", "Asha Rao"),
            ("email", "asha@x.com"),
            ("phone", "12345"),
            ("curriculum", "CBSE"),
            ("grade", "5"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("field-error"));
    assert!(ctx.store.list_leads().is_empty());
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;
    let client = TestContext::browser();

    for url in [
        ctx.storefront("/health"),
        ctx.storefront("/health/ready"),
        ctx.admin("/health"),
        ctx.admin("/health/ready"),
    ] {
        let resp = client.get(&url).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{url}");
    }
}
