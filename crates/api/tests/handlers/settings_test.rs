use axum::http::StatusCode;
use chrono::NaiveTime;
use pretty_assertions::assert_eq;
use salonbook_core::models::{
    business_hours::{BusinessHours, WeeklyHours},
    settings::SalonSettings,
};
use serde_json::json;

use crate::test_utils::{TestContext, admin_header};

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn late_opening() -> WeeklyHours {
    WeeklyHours {
        monday: BusinessHours::closed(),
        tuesday: BusinessHours::open(time(12, 0), time(20, 0)),
        ..WeeklyHours::default()
    }
}

#[tokio::test]
async fn test_get_settings_defaults() {
    let server = TestContext::new().with_default_settings().server();

    let response = server.get("/api/settings").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<SalonSettings>(), SalonSettings::default());
}

#[tokio::test]
async fn test_get_settings_is_public_and_wire_format_is_stable() {
    let server = TestContext::new().with_default_settings().server();

    let body = server.get("/api/settings").await.json::<serde_json::Value>();

    assert_eq!(body["booking_buffer_minutes"], json!(0));
    assert_eq!(
        body["business_hours"]["monday"],
        json!({ "start": "09:00", "end": "18:00", "closed": false })
    );
    assert_eq!(body["business_hours"]["sunday"]["closed"], json!(true));
}

#[tokio::test]
async fn test_update_business_hours() {
    let server = TestContext::new().with_settings_table().server();
    let (name, value) = admin_header();

    let response = server
        .put("/api/settings/business-hours")
        .add_header(name, value)
        .json(&late_opening())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let settings = response.json::<SalonSettings>();
    assert_eq!(settings.business_hours, late_opening());
    assert_eq!(settings.booking_buffer_minutes, 0);
}

#[tokio::test]
async fn test_update_business_hours_rejects_inverted_day() {
    let mut ctx = TestContext::new();
    ctx.settings_repo.expect_upsert_setting().never();
    let server = ctx.server();
    let (name, value) = admin_header();

    let hours = WeeklyHours {
        wednesday: BusinessHours::open(time(18, 0), time(9, 0)),
        ..WeeklyHours::default()
    };
    let response = server
        .put("/api/settings/business-hours")
        .add_header(name, value)
        .json(&hours)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<serde_json::Value>();
    assert!(body["error"].as_str().unwrap().contains("Wed"));
}

#[tokio::test]
async fn test_update_booking_buffer() {
    let server = TestContext::new().with_settings_table().server();
    let (name, value) = admin_header();

    let response = server
        .put("/api/settings/booking-buffer")
        .add_header(name, value)
        .json(&json!({ "minutes": 20 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<SalonSettings>().booking_buffer_minutes, 20);
}

#[tokio::test]
async fn test_update_booking_buffer_rejects_out_of_range() {
    let mut ctx = TestContext::new();
    ctx.settings_repo.expect_upsert_setting().never();
    let server = ctx.server();

    for minutes in [-5, 241] {
        let (name, value) = admin_header();
        let response = server
            .put("/api/settings/booking-buffer")
            .add_header(name, value)
            .json(&json!({ "minutes": minutes }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_settings_updates_require_admin_key() {
    let mut ctx = TestContext::new();
    ctx.settings_repo.expect_upsert_setting().never();
    let server = ctx.server();

    let hours = server
        .put("/api/settings/business-hours")
        .json(&late_opening())
        .await;
    assert_eq!(hours.status_code(), StatusCode::UNAUTHORIZED);

    let buffer = server
        .put("/api/settings/booking-buffer")
        .json(&json!({ "minutes": 10 }))
        .await;
    assert_eq!(buffer.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_invalidates_cached_settings() {
    let server = TestContext::new().with_settings_table().server();

    // Warm the cache with the defaults
    let before = server.get("/api/settings").await.json::<SalonSettings>();
    assert_eq!(before.booking_buffer_minutes, 0);

    let (name, value) = admin_header();
    server
        .put("/api/settings/booking-buffer")
        .add_header(name, value)
        .json(&json!({ "minutes": 45 }))
        .await
        .assert_status_ok();

    let after = server.get("/api/settings").await.json::<SalonSettings>();
    assert_eq!(after.booking_buffer_minutes, 45);
    assert_eq!(after.business_hours, WeeklyHours::default());
}
