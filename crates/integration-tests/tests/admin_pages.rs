//! Back-office pages: license inventory, QR cards and the course shelf.

#![allow(clippy::unwrap_used)]

use atribot_integration_tests::TestSite;
use axum::http::StatusCode;

async fn signed_in_site() -> TestSite {
    let mut site = TestSite::new();
    site.activate("AB12-CD34-EF56-GH05").await;
    site
}

#[tokio::test]
async fn test_admin_dashboard_counts() {
    let mut site = signed_in_site().await;
    let page = site.get("/admin").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("License Keys"));
    assert!(page.body.contains("<p class=\"stat-value\">5</p>"));
    assert!(page.body.contains("<p class=\"stat-value\">7</p>"));
}

#[tokio::test]
async fn test_license_list_filters() {
    let mut site = signed_in_site().await;

    let all = site.get("/admin/license").await;
    assert!(all.body.contains("Showing 5 of 5 keys"));

    let used = site.get("/admin/license?status=used").await;
    assert!(used.body.contains("Showing 2 of 5 keys"));
    assert!(used.body.contains("user123"));

    let searched = site.get("/admin/license?q=xy98").await;
    assert!(searched.body.contains("XY98-ZW76-VU54-TS32"));
    assert!(searched.body.contains("Showing 1 of 5 keys"));

    let none = site.get("/admin/license?level=LEVEL_1&status=unused").await;
    assert!(none.body.contains("No license keys match these filters."));
}

#[tokio::test]
async fn test_csv_export() {
    let mut site = signed_in_site().await;
    let csv = site.get("/admin/license/export.csv?status=unused").await;

    assert_eq!(csv.status, StatusCode::OK);
    assert!(csv.header("content-type").unwrap().starts_with("text/csv"));
    assert_eq!(
        csv.header("content-disposition"),
        Some("attachment; filename=\"atribot-license-keys.csv\"")
    );

    let lines: Vec<&str> = csv.body.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines.first(), Some(&"Key,Level,Status,Assigned To,Created At"));
    assert_eq!(
        lines.get(1),
        Some(&"AB12-CD34-EF56-GH02,Gear Builder,Available,,2024-01-16")
    );
    assert!(!csv.body.ends_with('\n'));
}

#[tokio::test]
async fn test_generate_keys() {
    let mut site = signed_in_site().await;

    let done = site
        .post_form(
            "/admin/license/generate",
            &[("level", "LEVEL_2"), ("count", "3")],
        )
        .await;
    assert_eq!(done.status, StatusCode::SEE_OTHER);
    assert_eq!(done.location(), Some("/admin/license?notice=generated"));

    let list = site.get("/admin/license?notice=generated").await;
    assert!(list.body.contains("License keys generated."));
    assert!(list.body.contains("Showing 8 of 8 keys"));

    let csv = site.get("/admin/license/export.csv?level=LEVEL_2").await;
    assert_eq!(csv.body.lines().count(), 5);
}

#[tokio::test]
async fn test_generate_rejects_bad_batch() {
    let mut site = signed_in_site().await;

    for count in ["0", "101", "ten"] {
        let done = site
            .post_form(
                "/admin/license/generate",
                &[("level", "LEVEL_1"), ("count", count)],
            )
            .await;
        assert_eq!(
            done.location(),
            Some("/admin/license?error=batch_size"),
            "{count}"
        );
    }

    let list = site.get("/admin/license?error=batch_size").await;
    assert!(list.body.contains("between 1 and 100"));
    assert!(list.body.contains("Showing 5 of 5 keys"));
}

#[tokio::test]
async fn test_generate_stops_at_inventory_cap() {
    let mut site = signed_in_site().await;
    let batch = [("level", "LEVEL_1"), ("count", "100")];

    for _ in 0..9 {
        let done = site.post_form("/admin/license/generate", &batch).await;
        assert_eq!(done.location(), Some("/admin/license?notice=generated"));
    }

    let refused = site.post_form("/admin/license/generate", &batch).await;
    assert_eq!(refused.location(), Some("/admin/license?error=full"));

    let list = site.get("/admin/license?error=full").await;
    assert!(list.body.contains("The inventory is full."));
    assert!(list.body.contains("of 905 keys"));
}

#[tokio::test]
async fn test_qr_card() {
    let mut site = signed_in_site().await;

    let card = site
        .get("/admin/license/00000000-0000-0000-0000-000000000001/qr")
        .await;
    assert_eq!(card.status, StatusCode::OK);
    assert!(
        card.body
            .contains("https://www.atribot.in/kit_activation?key=AB12-CD34-EF56-GH01")
    );
    assert!(card.body.contains("Level 1: Starter Bot"));
    assert!(card.body.contains("<svg"));
    assert!(card.body.contains("</svg>"));
    assert!(!card.body.contains("&lt;svg"));

    let unknown = site
        .get("/admin/license/00000000-0000-0000-0000-000000000999/qr")
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let garbage = site.get("/admin/license/not-a-uuid/qr").await;
    assert_eq!(garbage.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_course_as_draft() {
    let mut site = signed_in_site().await;

    let done = site
        .post_form(
            "/admin/courses",
            &[
                ("title", "Robot Dance  Party"),
                ("description", "Make your robot move to music."),
                ("level", "LEVEL_2"),
            ],
        )
        .await;
    assert_eq!(done.location(), Some("/admin/courses?notice=created"));

    let shelf = site.get("/admin/courses").await;
    assert!(shelf.body.contains("/courses/robot-dance-party"));
    assert!(shelf.body.contains("7 published of 8"));
    assert!(shelf.body.contains("0 lessons"));
    assert!(shelf.body.contains("0 hours"));

    // The shelf does not change the learner catalog.
    let learner = site.get("/courses/robot-dance-party").await;
    assert_eq!(learner.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_course_needs_title() {
    let mut site = signed_in_site().await;

    let done = site
        .post_form("/admin/courses", &[("title", "   "), ("level", "LEVEL_1")])
        .await;
    assert_eq!(done.location(), Some("/admin/courses?error=missing_title"));

    let shelf = site.get("/admin/courses?error=missing_title").await;
    assert!(shelf.body.contains("Please enter a course title."));
    assert!(shelf.body.contains("7 published of 7"));
}

#[tokio::test]
async fn test_update_toggle_and_delete_course() {
    let mut site = signed_in_site().await;

    let updated = site
        .post_form(
            "/admin/courses/1",
            &[
                ("title", "Hello Robot Deluxe"),
                ("description", "Now with more LEDs."),
                ("level", "LEVEL_1"),
            ],
        )
        .await;
    assert_eq!(updated.location(), Some("/admin/courses?notice=updated"));

    let toggled = site.post_form("/admin/courses/1/publish", &[]).await;
    assert_eq!(toggled.location(), Some("/admin/courses?notice=unpublished"));

    let shelf = site.get("/admin/courses").await;
    assert!(shelf.body.contains("Hello Robot Deluxe"));
    // Slug kept on rename.
    assert!(shelf.body.contains("/courses/hello-robot<"));
    assert!(shelf.body.contains("6 published of 7"));

    let republished = site.post_form("/admin/courses/1/publish", &[]).await;
    assert_eq!(
        republished.location(),
        Some("/admin/courses?notice=published")
    );

    let deleted = site.post_form("/admin/courses/2/delete", &[]).await;
    assert_eq!(deleted.location(), Some("/admin/courses?notice=deleted"));
    let shelf = site.get("/admin/courses").await;
    assert!(!shelf.body.contains("blinky-lights-and-buzzers"));
    assert!(shelf.body.contains("6 published of 6"));

    let missing = site.post_form("/admin/courses/999/delete", &[]).await;
    assert_eq!(missing.location(), Some("/admin/courses?error=not_found"));
}

#[tokio::test]
async fn test_course_shelf_filters() {
    let mut site = signed_in_site().await;

    let level_five = site.get("/admin/courses?level=LEVEL_5").await;
    assert!(level_five.body.contains("robot-challenge-arena"));
    assert!(!level_five.body.contains("hello-robot"));

    let search = site.get("/admin/courses?q=gears").await;
    assert!(search.body.contains("gear-up"));
    assert!(!search.body.contains("sensing-the-world"));
}
