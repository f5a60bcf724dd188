//! Integration tests for the materialized daily statistics table.
//!
//! The central property: the materialized row is always identical to what
//! the aggregator computes from raw ticket rows.

use chrono::Utc;
use sqlx::PgPool;

use qline_core::stats::DailyStat;
use qline_core::ticket::TicketStatus;
use qline_core::types::DbId;
use qline_db::models::officer::CreateOfficer;
use qline_db::models::ticket::CreateTicket;
use qline_db::repositories::{DailyStatRepo, OfficerRepo, TicketRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_officer(prefix: &str) -> CreateOfficer {
    CreateOfficer {
        name: "Officer".to_string(),
        prefix: prefix.to_string(),
        counter_type: "general".to_string(),
        online: Some(true),
    }
}

fn walk_in() -> CreateTicket {
    CreateTicket {
        officer_id: None,
        counter_type: None,
        full_name: None,
        college: None,
        organization: None,
        email: None,
    }
}

async fn seed_officer(pool: &PgPool, prefix: &str) -> DbId {
    OfficerRepo::create(pool, &new_officer(prefix)).await.unwrap().id
}

/// Seed a day's worth of outcomes: 2 waiting (1 prioritized), 2 served,
/// 1 no-show, 1 cancelled.
async fn seed_day(pool: &PgPool, officer_id: DbId) {
    for _ in 0..2 {
        TicketRepo::create(pool, officer_id, &walk_in()).await.unwrap();
    }
    let prioritized = TicketRepo::list_waiting(pool, officer_id).await.unwrap()[1].id;
    TicketRepo::set_prioritized(pool, prioritized).await.unwrap().unwrap();

    for status in [
        TicketStatus::Served,
        TicketStatus::Served,
        TicketStatus::NoShow,
        TicketStatus::Cancelled,
    ] {
        let ticket = TicketRepo::create(pool, officer_id, &walk_in()).await.unwrap();
        TicketRepo::transition(pool, ticket.id, status).await.unwrap().unwrap();
    }
}

// ---------------------------------------------------------------------------
// Refresh and fetch
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_materializes_the_aggregate(pool: PgPool) {
    let officer = seed_officer(&pool, "B").await;
    seed_day(&pool, officer).await;
    let today = Utc::now().date_naive();

    let refreshed = DailyStatRepo::refresh(&pool, officer, today).await.unwrap();

    assert_eq!(refreshed.total_count, 6);
    assert_eq!(refreshed.waiting_count, 2);
    assert_eq!(refreshed.served_count, 2);
    assert_eq!(refreshed.no_show_count, 1);
    assert_eq!(refreshed.cancelled_count, 1);
    assert_eq!(refreshed.prioritized_count, 1);

    let fetched = DailyStatRepo::fetch(&pool, today, Some(officer)).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(DailyStat::from(fetched[0].clone()), refreshed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn materialized_row_matches_recomputation_from_raw_rows(pool: PgPool) {
    let officer = seed_officer(&pool, "B").await;
    seed_day(&pool, officer).await;
    let today = Utc::now().date_naive();

    let materialized = DailyStatRepo::refresh(&pool, officer, today).await.unwrap();

    let tickets = TicketRepo::list_for_officer_on_date(&pool, officer, today)
        .await
        .unwrap();
    let recomputed = DailyStatRepo::compute(officer, today, &tickets).unwrap();

    assert_eq!(materialized, recomputed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn per_status_counts_sum_to_total(pool: PgPool) {
    let officer = seed_officer(&pool, "B").await;
    seed_day(&pool, officer).await;
    let today = Utc::now().date_naive();

    let stat = DailyStatRepo::refresh(&pool, officer, today).await.unwrap();
    assert_eq!(
        stat.total_count,
        stat.waiting_count
            + stat.served_count
            + stat.no_show_count
            + stat.transferred_count
            + stat.cancelled_count
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn transfer_counts_once_on_each_side(pool: PgPool) {
    let source = seed_officer(&pool, "A").await;
    let target = seed_officer(&pool, "B").await;
    let ticket = TicketRepo::create(&pool, source, &walk_in()).await.unwrap();
    let today = Utc::now().date_naive();

    TicketRepo::transfer(&pool, ticket.id, target).await.unwrap().unwrap();

    let source_stat = DailyStatRepo::refresh(&pool, source, today).await.unwrap();
    let target_stat = DailyStatRepo::refresh(&pool, target, today).await.unwrap();

    assert_eq!(source_stat.transferred_count, 1);
    assert_eq!(source_stat.waiting_count, 0);
    assert_eq!(target_stat.waiting_count, 1);
    assert_eq!(target_stat.total_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_of_an_empty_day_stores_a_zero_row(pool: PgPool) {
    let officer = seed_officer(&pool, "B").await;
    let today = Utc::now().date_naive();

    let stat = DailyStatRepo::refresh(&pool, officer, today).await.unwrap();
    assert_eq!(stat, DailyStat::empty(officer, today));

    let fetched = DailyStatRepo::fetch(&pool, today, None).await.unwrap();
    assert_eq!(fetched.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fetch_filters_by_officer(pool: PgPool) {
    let a = seed_officer(&pool, "A").await;
    let b = seed_officer(&pool, "B").await;
    let today = Utc::now().date_naive();
    DailyStatRepo::refresh(&pool, a, today).await.unwrap();
    DailyStatRepo::refresh(&pool, b, today).await.unwrap();

    let all = DailyStatRepo::fetch(&pool, today, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let only_a = DailyStatRepo::fetch(&pool, today, Some(a)).await.unwrap();
    assert_eq!(only_a.len(), 1);
    assert_eq!(only_a[0].officer_id, a);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn served_durations_feed_both_averages(pool: PgPool) {
    let officer = seed_officer(&pool, "B").await;
    let ticket = TicketRepo::create(&pool, officer, &walk_in()).await.unwrap();
    TicketRepo::transition(&pool, ticket.id, TicketStatus::Served)
        .await
        .unwrap()
        .unwrap();

    // Stretch the service duration to a known value.
    sqlx::query("UPDATE tickets SET updated_at = created_at + INTERVAL '90 seconds' WHERE id = $1")
        .bind(ticket.id)
        .execute(&pool)
        .await
        .unwrap();

    let today = Utc::now().date_naive();
    let stat = DailyStatRepo::refresh(&pool, officer, today).await.unwrap();
    assert_eq!(stat.avg_waiting_secs, 90);
    assert_eq!(stat.avg_consultation_secs, 90);
}
