//! In-memory back-office stores.
//!
//! Both stores are seeded at startup and live only as long as the process:
//! a restart resets them. Newly created rows are placed first, so the admin
//! tables show the latest work at the top.

use atribot_core::catalog::{Course, CourseQuery, sample_courses, slugify};
use atribot_core::inventory::{
    InventoryError, InventoryFilter, LicenseRecord, check_capacity, export_csv,
    generate_records, sample_inventory,
};
use atribot_core::{CourseId, LevelId, PublishState};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Thumbnail used for courses created in the back office.
pub const PLACEHOLDER_THUMBNAIL: &str = "/static/images/placeholder.svg";

/// Duration shown for a course with no lessons yet.
const EMPTY_DURATION: &str = "0 hours";

// =============================================================================
// License Keys
// =============================================================================

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InventoryStats {
    pub total: usize,
    pub used: usize,
    pub available: usize,
}

/// License keys known to the back office.
#[derive(Debug)]
pub struct KeyInventory {
    records: RwLock<Vec<LicenseRecord>>,
}

impl KeyInventory {
    #[must_use]
    pub fn new(records: Vec<LicenseRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Inventory holding the five sample records.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(sample_inventory())
    }

    /// Records matching `filter`, newest first.
    pub async fn list(&self, filter: &InventoryFilter) -> Vec<LicenseRecord> {
        let records = self.records.read().await;
        filter.apply(&records).into_iter().cloned().collect()
    }

    pub async fn find(&self, id: Uuid) -> Option<LicenseRecord> {
        let records = self.records.read().await;
        records.iter().find(|r| r.id == id).cloned()
    }

    /// Generate `count` new keys at `level` and put them at the top.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::BatchSize`] unless `1 <= count <= 100`, and
    /// [`InventoryError::Full`] if the batch would take the inventory past
    /// [`MAX_INVENTORY`](atribot_core::inventory::MAX_INVENTORY).
    pub async fn generate(
        &self,
        level: LevelId,
        count: u32,
        today: NaiveDate,
    ) -> Result<Vec<LicenseRecord>, InventoryError> {
        let mut records = self.records.write().await;
        let batch = generate_records(level, count, today, &mut rand::rng())?;
        check_capacity(records.len(), batch.len())?;

        records.splice(0..0, batch.iter().cloned());
        tracing::info!(level = %level, count, total = records.len(), "License keys generated");
        Ok(batch)
    }

    /// CSV of the records matching `filter`.
    pub async fn export(&self, filter: &InventoryFilter) -> String {
        let records = self.records.read().await;
        export_csv(filter.apply(&records))
    }

    pub async fn stats(&self) -> InventoryStats {
        let records = self.records.read().await;
        let used = records.iter().filter(|r| r.used).count();
        InventoryStats {
            total: records.len(),
            used,
            available: records.len() - used,
        }
    }
}

impl Default for KeyInventory {
    fn default() -> Self {
        Self::seeded()
    }
}

// =============================================================================
// Courses
// =============================================================================

/// Errors from editing the course shelf.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShelfError {
    #[error("Please enter a course title.")]
    MissingTitle,
    #[error("Course {0} not found")]
    NotFound(CourseId),
}

/// Editable course fields.
#[derive(Debug, Clone)]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub level: LevelId,
}

/// A course as the back office sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShelfCourse {
    pub course: Course,
    pub state: PublishState,
}

impl ShelfCourse {
    #[must_use]
    pub const fn is_published(&self) -> bool {
        self.state.is_published()
    }
}

#[derive(Debug)]
struct ShelfInner {
    courses: Vec<ShelfCourse>,
    next_id: u32,
}

/// Courses managed in the back office.
///
/// Edits here do not change the learner catalog.
#[derive(Debug)]
pub struct CourseShelf {
    inner: RwLock<ShelfInner>,
}

impl CourseShelf {
    #[must_use]
    pub fn new(courses: Vec<ShelfCourse>) -> Self {
        let next_id = courses
            .iter()
            .map(|c| c.course.id.get())
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        Self {
            inner: RwLock::new(ShelfInner { courses, next_id }),
        }
    }

    /// Shelf holding the sample catalog, all published.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(
            sample_courses()
                .iter()
                .cloned()
                .map(|course| ShelfCourse {
                    course,
                    state: PublishState::Published,
                })
                .collect(),
        )
    }

    /// Courses matching `query`, in shelf order.
    pub async fn list(&self, query: &CourseQuery) -> Vec<ShelfCourse> {
        let inner = self.inner.read().await;
        inner
            .courses
            .iter()
            .filter(|c| query.matches(&c.course))
            .cloned()
            .collect()
    }

    pub async fn total(&self) -> usize {
        self.inner.read().await.courses.len()
    }

    pub async fn published_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.courses.iter().filter(|c| c.is_published()).count()
    }

    /// Add a draft course with no lessons.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::MissingTitle`] if the title is blank.
    pub async fn create(&self, draft: CourseDraft) -> Result<ShelfCourse, ShelfError> {
        let title = required_title(&draft.title)?;

        let mut inner = self.inner.write().await;
        let id = CourseId::new(inner.next_id);
        inner.next_id = inner.next_id.saturating_add(1);

        let created = ShelfCourse {
            course: Course {
                id,
                slug: slugify(&title),
                title,
                description: draft.description.trim().to_string(),
                level: draft.level,
                thumbnail: PLACEHOLDER_THUMBNAIL.to_string(),
                lessons_count: 0,
                duration: EMPTY_DURATION.to_string(),
            },
            state: PublishState::Draft,
        };
        inner.courses.insert(0, created.clone());
        tracing::info!(course_id = %id, slug = %created.course.slug, "Course created");
        Ok(created)
    }

    /// Replace title, description and level. The slug is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError`] if the title is blank or the course is unknown.
    pub async fn update(&self, id: CourseId, draft: CourseDraft) -> Result<ShelfCourse, ShelfError> {
        let title = required_title(&draft.title)?;

        let mut inner = self.inner.write().await;
        let entry = inner
            .courses
            .iter_mut()
            .find(|c| c.course.id == id)
            .ok_or(ShelfError::NotFound(id))?;

        entry.course.title = title;
        entry.course.description = draft.description.trim().to_string();
        entry.course.level = draft.level;
        tracing::info!(course_id = %id, "Course updated");
        Ok(entry.clone())
    }

    /// Flip between draft and published.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::NotFound`] if the course is unknown.
    pub async fn toggle_publish(&self, id: CourseId) -> Result<PublishState, ShelfError> {
        let mut inner = self.inner.write().await;
        let entry = inner
            .courses
            .iter_mut()
            .find(|c| c.course.id == id)
            .ok_or(ShelfError::NotFound(id))?;

        entry.state = entry.state.toggled();
        tracing::info!(course_id = %id, state = ?entry.state, "Course publish state toggled");
        Ok(entry.state)
    }

    /// # Errors
    ///
    /// Returns [`ShelfError::NotFound`] if the course is unknown.
    pub async fn delete(&self, id: CourseId) -> Result<(), ShelfError> {
        let mut inner = self.inner.write().await;
        let before = inner.courses.len();
        inner.courses.retain(|c| c.course.id != id);
        if inner.courses.len() == before {
            return Err(ShelfError::NotFound(id));
        }
        tracing::info!(course_id = %id, "Course deleted");
        Ok(())
    }
}

impl Default for CourseShelf {
    fn default() -> Self {
        Self::seeded()
    }
}

fn required_title(title: &str) -> Result<String, ShelfError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ShelfError::MissingTitle);
    }
    Ok(title.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use atribot_core::KeyStatus;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn draft(title: &str) -> CourseDraft {
        CourseDraft {
            title: title.to_string(),
            description: "Build a line follower".to_string(),
            level: LevelId::Level2,
        }
    }

    #[tokio::test]
    async fn test_inventory_stats() {
        let inventory = KeyInventory::seeded();
        assert_eq!(
            inventory.stats().await,
            InventoryStats {
                total: 5,
                used: 2,
                available: 3
            }
        );
    }

    #[tokio::test]
    async fn test_generate_puts_new_keys_first() {
        let inventory = KeyInventory::seeded();
        let batch = inventory.generate(LevelId::Level3, 2, today()).await.unwrap();

        let all = inventory.list(&InventoryFilter::default()).await;
        assert_eq!(all.len(), 7);
        assert_eq!(all[0].id, batch[0].id);
        assert_eq!(all[1].id, batch[1].id);
        assert!(all[..2].iter().all(|r| r.level == LevelId::Level3 && !r.used));
    }

    #[tokio::test]
    async fn test_generate_rejects_oversized_batch() {
        let inventory = KeyInventory::seeded();
        assert_eq!(
            inventory.generate(LevelId::Level1, 101, today()).await,
            Err(InventoryError::BatchSize(101))
        );
        assert_eq!(inventory.stats().await.total, 5);
    }

    #[tokio::test]
    async fn test_generate_refuses_batches_past_the_cap() {
        let inventory = KeyInventory::seeded();
        for _ in 0..9 {
            inventory.generate(LevelId::Level1, 100, today()).await.unwrap();
        }
        assert_eq!(inventory.stats().await.total, 905);

        assert_eq!(
            inventory.generate(LevelId::Level1, 100, today()).await,
            Err(InventoryError::Full)
        );
        assert_eq!(inventory.stats().await.total, 905);

        inventory.generate(LevelId::Level1, 95, today()).await.unwrap();
        assert_eq!(
            inventory.generate(LevelId::Level1, 1, today()).await,
            Err(InventoryError::Full)
        );
        assert_eq!(inventory.stats().await.total, 1_000);
    }

    #[tokio::test]
    async fn test_export_respects_filter() {
        let inventory = KeyInventory::seeded();
        let filter = InventoryFilter {
            status: Some(KeyStatus::Used),
            ..InventoryFilter::default()
        };
        let csv = inventory.export(&filter).await;
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.contains("MN43-OP21-QR09-ST87,Circuit Master,Used,user456,2024-01-18"));
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let inventory = KeyInventory::seeded();
        let record = inventory.find(Uuid::from_u128(3)).await.unwrap();
        assert_eq!(record.key, "XY98-ZW76-VU54-TS32");
        assert!(inventory.find(Uuid::nil()).await.is_none());
    }

    #[tokio::test]
    async fn test_create_course_is_draft_at_top() {
        let shelf = CourseShelf::seeded();
        let seeded = shelf.total().await;

        let created = shelf.create(draft("  Line  Following Bots ")).await.unwrap();

        assert_eq!(created.course.slug, "line-following-bots");
        assert_eq!(created.course.title, "Line  Following Bots");
        assert_eq!(created.course.lessons_count, 0);
        assert_eq!(created.course.duration, "0 hours");
        assert_eq!(created.state, PublishState::Draft);

        let listed = shelf.list(&CourseQuery::default()).await;
        assert_eq!(listed.len(), seeded + 1);
        assert_eq!(listed[0], created);
        assert!(created.course.id.get() > 7);
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let shelf = CourseShelf::seeded();
        assert_eq!(shelf.create(draft("   ")).await, Err(ShelfError::MissingTitle));
    }

    #[tokio::test]
    async fn test_update_keeps_slug() {
        let shelf = CourseShelf::seeded();
        let id = CourseId::new(1);
        let updated = shelf.update(id, draft("Hello Robot 2")).await.unwrap();
        assert_eq!(updated.course.title, "Hello Robot 2");
        assert_eq!(updated.course.slug, "hello-robot");
        assert_eq!(updated.course.level, LevelId::Level2);
    }

    #[tokio::test]
    async fn test_toggle_and_delete() {
        let shelf = CourseShelf::seeded();
        let id = CourseId::new(2);
        let published = shelf.published_count().await;

        assert_eq!(shelf.toggle_publish(id).await, Ok(PublishState::Draft));
        assert_eq!(shelf.published_count().await, published - 1);
        assert_eq!(shelf.toggle_publish(id).await, Ok(PublishState::Published));

        shelf.delete(id).await.unwrap();
        assert_eq!(shelf.delete(id).await, Err(ShelfError::NotFound(id)));
        assert_eq!(
            shelf.toggle_publish(id).await,
            Err(ShelfError::NotFound(id))
        );
    }
}
