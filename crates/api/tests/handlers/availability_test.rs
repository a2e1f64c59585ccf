use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use axum_test::TestResponse;
use chrono::{DateTime, Utc};
use salonbook_core::models::{
    settings::SettingKey,
    slot::{AvailabilityResponse, BusyInterval},
};
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{
    MONDAY, MockCalendar, SUNDAY, TestContext, at, booking_row, date, setting_row,
};

fn availability_of(response: &TestResponse, start: DateTime<Utc>) -> bool {
    let body = response.json::<AvailabilityResponse>();
    body.slots
        .iter()
        .find(|slot| slot.start == start)
        .map(|slot| slot.available)
        .unwrap_or_else(|| panic!("no slot starts at {}", start))
}

#[tokio::test]
async fn test_open_day_without_bookings_is_fully_available() {
    let mut ctx = TestContext::new().with_default_settings();
    ctx.booking_repo
        .expect_list_active_between()
        .withf(|start, end, worker_id| {
            *start == at(MONDAY, 9, 0) && *end == at(MONDAY, 18, 0) && worker_id.is_none()
        })
        .times(1)
        .returning(|_, _, _| Ok(Vec::new()));
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2030-01-07")
        .add_query_param("duration_minutes", 60)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<AvailabilityResponse>();
    assert_eq!(body.date, date(MONDAY));
    assert_eq!(body.duration_minutes, 60);
    assert_eq!(body.slots.len(), 17);
    assert!(body.slots.iter().all(|slot| slot.available));
    assert_eq!(body.slots[0].start, at(MONDAY, 9, 0));
    assert_eq!(body.slots[16].start, at(MONDAY, 17, 0));
    assert_eq!(body.slots[16].end, at(MONDAY, 18, 0));
}

#[tokio::test]
async fn test_booked_time_blocks_overlapping_slots() {
    let mut ctx = TestContext::new().with_default_settings();
    ctx.booking_repo
        .expect_list_active_between()
        .returning(|_, _, _| Ok(vec![booking_row(at(MONDAY, 10, 0), at(MONDAY, 11, 0))]));
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2030-01-07")
        .add_query_param("duration_minutes", 60)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(availability_of(&response, at(MONDAY, 9, 0)));
    assert!(!availability_of(&response, at(MONDAY, 9, 30)));
    assert!(!availability_of(&response, at(MONDAY, 10, 0)));
    assert!(!availability_of(&response, at(MONDAY, 10, 30)));
    assert!(availability_of(&response, at(MONDAY, 11, 0)));
}

#[tokio::test]
async fn test_closed_day_has_no_slots() {
    // No booking expectations: a closed day must not query bookings
    let ctx = TestContext::new().with_default_settings();
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2030-01-13")
        .add_query_param("duration_minutes", 30)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<AvailabilityResponse>();
    assert_eq!(body.date, date(SUNDAY));
    assert!(body.slots.is_empty());
}

#[tokio::test]
async fn test_service_longer_than_day_has_no_slots() {
    let mut ctx = TestContext::new().with_default_settings();
    ctx.booking_repo
        .expect_list_active_between()
        .returning(|_, _, _| Ok(Vec::new()));
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2030-01-07")
        .add_query_param("duration_minutes", 600)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.json::<AvailabilityResponse>().slots.is_empty());
}

#[tokio::test]
async fn test_invalid_duration_is_rejected() {
    let server = TestContext::new().server();

    for duration in [0, -30, 1441] {
        let response = server
            .get("/api/availability")
            .add_query_param("date", "2030-01-07")
            .add_query_param("duration_minutes", duration)
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_malformed_query_is_rejected() {
    let server = TestContext::new().server();

    let missing_date = server
        .get("/api/availability")
        .add_query_param("duration_minutes", 60)
        .await;
    assert_eq!(missing_date.status_code(), StatusCode::BAD_REQUEST);

    let bad_date = server
        .get("/api/availability")
        .add_query_param("date", "07.01.2030")
        .add_query_param("duration_minutes", 60)
        .await;
    assert_eq!(bad_date.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_worker_filter_is_passed_to_store() {
    let worker_id = Uuid::new_v4();
    let mut ctx = TestContext::new().with_default_settings();
    ctx.booking_repo
        .expect_list_active_between()
        .withf(move |_, _, worker| *worker == Some(worker_id))
        .times(1)
        .returning(|_, _, _| Ok(Vec::new()));
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2030-01-07")
        .add_query_param("duration_minutes", 60)
        .add_query_param("worker_id", worker_id.to_string())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_buffer_is_ignored_without_calendar() {
    let mut ctx = TestContext::new().with_settings(vec![setting_row(
        SettingKey::BookingBufferMinutes,
        json!(15),
    )]);
    ctx.booking_repo
        .expect_list_active_between()
        .withf(|start, end, _| *start == at(MONDAY, 9, 0) && *end == at(MONDAY, 18, 0))
        .returning(|_, _, _| Ok(vec![booking_row(at(MONDAY, 12, 0), at(MONDAY, 13, 0))]));
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2030-01-07")
        .add_query_param("duration_minutes", 60)
        .await;

    assert!(availability_of(&response, at(MONDAY, 11, 0)));
    assert!(!availability_of(&response, at(MONDAY, 12, 0)));
    assert!(availability_of(&response, at(MONDAY, 13, 0)));
}

#[tokio::test]
async fn test_calendar_busy_time_is_padded_by_buffer() {
    let mut calendar = MockCalendar::new();
    calendar
        .expect_busy_intervals()
        .withf(|start, end| *start == at(MONDAY, 8, 45) && *end == at(MONDAY, 18, 15))
        .times(1)
        .returning(|_, _| Ok(vec![BusyInterval::new(at(MONDAY, 12, 0), at(MONDAY, 13, 0))]));

    let mut ctx = TestContext::new()
        .with_settings(vec![setting_row(SettingKey::BookingBufferMinutes, json!(15))])
        .with_calendar(calendar);
    ctx.booking_repo
        .expect_list_active_between()
        .withf(|start, end, _| *start == at(MONDAY, 8, 45) && *end == at(MONDAY, 18, 15))
        .times(1)
        .returning(|_, _, _| Ok(Vec::new()));
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2030-01-07")
        .add_query_param("duration_minutes", 60)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(availability_of(&response, at(MONDAY, 10, 30)));
    assert!(!availability_of(&response, at(MONDAY, 11, 0)));
    assert!(!availability_of(&response, at(MONDAY, 13, 0)));
    assert!(availability_of(&response, at(MONDAY, 13, 30)));
}

#[tokio::test]
async fn test_bookings_and_calendar_both_block_slots() {
    let mut calendar = MockCalendar::new();
    calendar
        .expect_busy_intervals()
        .returning(|_, _| Ok(vec![BusyInterval::new(at(MONDAY, 15, 0), at(MONDAY, 16, 0))]));

    let mut ctx = TestContext::new()
        .with_default_settings()
        .with_calendar(calendar);
    ctx.booking_repo
        .expect_list_active_between()
        .returning(|_, _, _| Ok(vec![booking_row(at(MONDAY, 9, 0), at(MONDAY, 10, 0))]));
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2030-01-07")
        .add_query_param("duration_minutes", 60)
        .await;

    assert!(!availability_of(&response, at(MONDAY, 9, 0)));
    assert!(availability_of(&response, at(MONDAY, 10, 0)));
    assert!(!availability_of(&response, at(MONDAY, 15, 0)));
    assert!(availability_of(&response, at(MONDAY, 16, 0)));
}

#[test_log::test(tokio::test)]
async fn test_calendar_failure_degrades_to_bookings_only() {
    let mut calendar = MockCalendar::new();
    calendar
        .expect_busy_intervals()
        .returning(|_, _| Err(eyre::eyre!("calendar unreachable")));

    let mut ctx = TestContext::new()
        .with_default_settings()
        .with_calendar(calendar);
    ctx.booking_repo
        .expect_list_active_between()
        .returning(|_, _, _| Ok(vec![booking_row(at(MONDAY, 10, 0), at(MONDAY, 11, 0))]));
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2030-01-07")
        .add_query_param("duration_minutes", 60)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(availability_of(&response, at(MONDAY, 9, 0)));
    assert!(!availability_of(&response, at(MONDAY, 10, 0)));
    assert!(availability_of(&response, at(MONDAY, 11, 0)));
}

#[tokio::test]
async fn test_store_failure_is_server_error() {
    let mut ctx = TestContext::new().with_default_settings();
    ctx.booking_repo
        .expect_list_active_between()
        .returning(|_, _, _| Err(eyre::eyre!("connection reset")));
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2030-01-07")
        .add_query_param("duration_minutes", 60)
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_settings_are_loaded_once_across_requests() {
    let mut ctx = TestContext::new();
    ctx.settings_repo
        .expect_load_settings()
        .times(1)
        .returning(|| Ok(Vec::new()));
    ctx.booking_repo
        .expect_list_active_between()
        .times(2)
        .returning(|_, _, _| Ok(Vec::new()));
    let server = ctx.server();

    for _ in 0..2 {
        let response = server
            .get("/api/availability")
            .add_query_param("date", "2030-01-07")
            .add_query_param("duration_minutes", 45)
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_cancelled_booking_does_not_block() {
    let mut ctx = TestContext::new().with_default_settings();
    ctx.booking_repo.expect_list_active_between().returning(|_, _, _| {
        let mut cancelled = booking_row(at(MONDAY, 10, 0), at(MONDAY, 11, 0));
        cancelled.status = "cancelled".to_string();
        Ok(vec![cancelled])
    });
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2030-01-07")
        .add_query_param("duration_minutes", 60)
        .await;

    assert!(availability_of(&response, at(MONDAY, 10, 0)));
}

#[tokio::test]
async fn test_oversized_stored_buffer_is_ignored() {
    let mut calendar = MockCalendar::new();
    calendar
        .expect_busy_intervals()
        .withf(|start, end| *start == at(MONDAY, 9, 0) && *end == at(MONDAY, 18, 0))
        .returning(|_, _| Ok(Vec::new()));

    let mut ctx = TestContext::new()
        .with_settings(vec![setting_row(
            SettingKey::BookingBufferMinutes,
            json!(100_000_000_000_000i64),
        )])
        .with_calendar(calendar);
    ctx.booking_repo
        .expect_list_active_between()
        .withf(|start, end, _| *start == at(MONDAY, 9, 0) && *end == at(MONDAY, 18, 0))
        .returning(|_, _, _| Ok(Vec::new()));
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2030-01-07")
        .add_query_param("duration_minutes", 60)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(availability_of(&response, at(MONDAY, 9, 0)));
}
