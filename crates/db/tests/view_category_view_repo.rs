//! Integration tests for `ViewCategoryViewRepo` (view memberships).
//!
//! Verifies that:
//! - A view has at most one membership row, overwritten on re-categorization
//! - Hidden flag and sort order carry over when a view changes category
//! - Reordering and visibility toggles never interfere with each other
//! - Board listings only include live categories
//! - Tombstoning a category leaves its membership rows in place

use sqlx::PgPool;
use viewcat_core::view_category::UNCATEGORIZED_CATEGORY_ID;
use viewcat_db::models::view_category::ViewCategory;
use viewcat_db::models::view_category_view::ViewCategoryView;
use viewcat_db::repositories::{ViewCategoryRepo, ViewCategoryViewRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_category(pool: &PgPool, id: &str, board_id: &str) -> ViewCategory {
    let input = ViewCategory {
        id: id.to_string(),
        name: format!("Category {id}"),
        user_id: "u1".to_string(),
        board_id: board_id.to_string(),
        create_at: 1,
        update_at: 1,
        delete_at: 0,
        collapsed: false,
        sort_order: 0,
        category_type: "custom".to_string(),
    };
    ViewCategoryRepo::create(pool, &input).await.unwrap()
}

async fn membership_count(pool: &PgPool, view_id: &str) -> i64 {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM view_category_views WHERE view_id = $1")
            .bind(view_id)
            .fetch_one(pool)
            .await
            .unwrap();
    count
}

fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn view_ids(rows: &[ViewCategoryView]) -> Vec<String> {
    rows.iter().map(|r| r.view_id.clone()).collect()
}

// ---------------------------------------------------------------------------
// Test: upsert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_creates_default_membership(pool: PgPool) {
    seed_category(&pool, "cat1", "b1").await;

    let rows = ViewCategoryViewRepo::upsert(&pool, "cat1", &ids(&["V1"]))
        .await
        .unwrap();

    assert_eq!(
        rows,
        vec![ViewCategoryView {
            view_id: "V1".to_string(),
            category_id: "cat1".to_string(),
            hidden: false,
            sort_order: 0,
        }]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_same_category_twice_is_idempotent(pool: PgPool) {
    seed_category(&pool, "cat1", "b1").await;

    ViewCategoryViewRepo::upsert(&pool, "cat1", &ids(&["V1"]))
        .await
        .unwrap();
    ViewCategoryViewRepo::upsert(&pool, "cat1", &ids(&["V1"]))
        .await
        .unwrap();

    assert_eq!(membership_count(&pool, "V1").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_moves_view_and_keeps_preferences(pool: PgPool) {
    seed_category(&pool, "cat1", "b1").await;
    seed_category(&pool, "cat2", "b1").await;

    ViewCategoryViewRepo::upsert(&pool, "cat1", &ids(&["V1", "V2"]))
        .await
        .unwrap();
    ViewCategoryViewRepo::reorder(&pool, "cat1", &ids(&["V2", "V1"]))
        .await
        .unwrap();
    ViewCategoryViewRepo::set_visibility(&pool, "cat1", "V1", false)
        .await
        .unwrap();

    let moved = ViewCategoryViewRepo::upsert(&pool, "cat2", &ids(&["V1"]))
        .await
        .unwrap();

    assert_eq!(membership_count(&pool, "V1").await, 1);
    assert_eq!(moved[0].category_id, "cat2");
    assert!(moved[0].hidden, "hidden flag carries over");
    assert_eq!(moved[0].sort_order, 10, "sort order carries over");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_to_sentinel_uncategorizes(pool: PgPool) {
    seed_category(&pool, "cat1", "b1").await;
    ViewCategoryViewRepo::upsert(&pool, "cat1", &ids(&["V1"]))
        .await
        .unwrap();

    ViewCategoryViewRepo::upsert(&pool, UNCATEGORIZED_CATEGORY_ID, &ids(&["V1"]))
        .await
        .unwrap();

    let row = ViewCategoryViewRepo::find_by_view(&pool, "V1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.category_id, UNCATEGORIZED_CATEGORY_ID);
    assert!(ViewCategoryViewRepo::list_for_category(&pool, "cat1")
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Test: reorder within category
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_round_trip(pool: PgPool) {
    seed_category(&pool, "cat1", "b1").await;
    ViewCategoryViewRepo::upsert(&pool, "cat1", &ids(&["V1", "V2", "V3"]))
        .await
        .unwrap();

    let order = ViewCategoryViewRepo::reorder(&pool, "cat1", &ids(&["V3", "V1", "V2"]))
        .await
        .unwrap();
    assert_eq!(order, ids(&["V3", "V1", "V2"]));

    let listed = ViewCategoryViewRepo::list_for_category(&pool, "cat1")
        .await
        .unwrap();
    assert_eq!(view_ids(&listed), ids(&["V3", "V1", "V2"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_length_mismatch_keeps_order(pool: PgPool) {
    seed_category(&pool, "cat1", "b1").await;
    ViewCategoryViewRepo::upsert(&pool, "cat1", &ids(&["V1", "V2"]))
        .await
        .unwrap();
    ViewCategoryViewRepo::reorder(&pool, "cat1", &ids(&["V2", "V1"]))
        .await
        .unwrap();

    let order = ViewCategoryViewRepo::reorder(&pool, "cat1", &ids(&["V1"]))
        .await
        .unwrap();

    assert_eq!(order, ids(&["V2", "V1"]));
    let listed = ViewCategoryViewRepo::list_for_category(&pool, "cat1")
        .await
        .unwrap();
    assert_eq!(view_ids(&listed), ids(&["V2", "V1"]));
}

// ---------------------------------------------------------------------------
// Test: visibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_visibility_toggle_keeps_sort_order(pool: PgPool) {
    seed_category(&pool, "cat1", "b1").await;
    ViewCategoryViewRepo::upsert(&pool, "cat1", &ids(&["V1", "V2"]))
        .await
        .unwrap();
    ViewCategoryViewRepo::reorder(&pool, "cat1", &ids(&["V2", "V1"]))
        .await
        .unwrap();

    assert!(ViewCategoryViewRepo::set_visibility(&pool, "cat1", "V1", false)
        .await
        .unwrap());

    let row = ViewCategoryViewRepo::find_by_view(&pool, "V1")
        .await
        .unwrap()
        .unwrap();
    assert!(row.hidden);
    assert_eq!(row.sort_order, 10);

    // And reordering keeps the hidden flag.
    ViewCategoryViewRepo::reorder(&pool, "cat1", &ids(&["V1", "V2"]))
        .await
        .unwrap();
    let row = ViewCategoryViewRepo::find_by_view(&pool, "V1")
        .await
        .unwrap()
        .unwrap();
    assert!(row.hidden);
    assert_eq!(row.sort_order, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_visibility_without_membership_is_noop(pool: PgPool) {
    seed_category(&pool, "cat1", "b1").await;
    seed_category(&pool, "cat2", "b1").await;
    ViewCategoryViewRepo::upsert(&pool, "cat2", &ids(&["V1"]))
        .await
        .unwrap();

    let changed = ViewCategoryViewRepo::set_visibility(&pool, "cat1", "V1", false)
        .await
        .unwrap();
    assert!(!changed);

    let row = ViewCategoryViewRepo::find_by_view(&pool, "V1")
        .await
        .unwrap()
        .unwrap();
    assert!(!row.hidden);
}

// ---------------------------------------------------------------------------
// Test: board listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_with_views_groups_and_orders(pool: PgPool) {
    seed_category(&pool, "cat1", "b1").await;
    seed_category(&pool, "cat2", "b1").await;
    seed_category(&pool, "other", "b2").await;

    ViewCategoryViewRepo::upsert(&pool, "cat1", &ids(&["V1", "V2"]))
        .await
        .unwrap();
    ViewCategoryViewRepo::upsert(&pool, "cat2", &ids(&["V3"]))
        .await
        .unwrap();
    ViewCategoryViewRepo::upsert(&pool, "other", &ids(&["V9"]))
        .await
        .unwrap();
    ViewCategoryViewRepo::reorder(&pool, "cat1", &ids(&["V2", "V1"]))
        .await
        .unwrap();

    let listed = ViewCategoryViewRepo::list_with_views(&pool, "b1").await.unwrap();

    let categories: Vec<&str> = listed.iter().map(|c| c.category.id.as_str()).collect();
    assert_eq!(categories, vec!["cat2", "cat1"]);
    assert_eq!(view_ids(&listed[0].views), ids(&["V3"]));
    assert_eq!(view_ids(&listed[1].views), ids(&["V2", "V1"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_with_views_excludes_tombstoned(pool: PgPool) {
    seed_category(&pool, "cat1", "b1").await;
    seed_category(&pool, "cat2", "b1").await;
    ViewCategoryRepo::soft_delete(&pool, "cat1", "u1", "b1", 7)
        .await
        .unwrap();

    let listed = ViewCategoryViewRepo::list_with_views(&pool, "b1").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].category.id, "cat2");
    assert!(listed[0].views.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_with_views_empty_board(pool: PgPool) {
    let listed = ViewCategoryViewRepo::list_with_views(&pool, "nothing").await.unwrap();
    assert!(listed.is_empty());
}

// ---------------------------------------------------------------------------
// Test: deleting a category leaves memberships dangling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_leaves_memberships_in_place(pool: PgPool) {
    seed_category(&pool, "cat1", "b1").await;
    ViewCategoryViewRepo::upsert(&pool, "cat1", &ids(&["V1"]))
        .await
        .unwrap();

    ViewCategoryRepo::soft_delete(&pool, "cat1", "u1", "b1", 3)
        .await
        .unwrap();

    let row = ViewCategoryViewRepo::find_by_view(&pool, "V1")
        .await
        .unwrap()
        .expect("membership survives the tombstone");
    assert_eq!(row.category_id, "cat1");
}
