//! Profile Store — the boundary to learner persistence.
//!
//! The generation layer only ever reads snapshots. The single write path is
//! recording a progress value, done by the progress handler before it asks
//! for feedback.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{UserProfile, UserProfileRow};

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError>;

    /// Sets `progress[course_id] = progress` (last write wins) and returns the
    /// updated snapshot, or `None` if the user does not exist.
    async fn record_progress(
        &self,
        user_id: Uuid,
        course_id: &str,
        progress: Value,
    ) -> Result<Option<UserProfile>, AppError>;
}

/// PostgreSQL-backed store over the `user_profiles` table.
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError> {
        let row = sqlx::query_as::<_, UserProfileRow>(
            r#"
            SELECT id, language, skills, job_preferences, progress
            FROM user_profiles
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserProfile::from))
    }

    async fn record_progress(
        &self,
        user_id: Uuid,
        course_id: &str,
        progress: Value,
    ) -> Result<Option<UserProfile>, AppError> {
        let row = sqlx::query_as::<_, UserProfileRow>(
            r#"
            UPDATE user_profiles
            SET progress = jsonb_set(COALESCE(progress, '{}'::jsonb), ARRAY[$2], $3, true),
                updated_at = now()
            WHERE id = $1
            RETURNING id, language, skills, job_preferences, progress
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .bind(&progress)
        .fetch_optional(&self.pool)
        .await?;

        if row.is_some() {
            info!("Recorded progress for user {user_id} on course {course_id}");
        }

        Ok(row.map(UserProfile::from))
    }
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;

    use tokio::sync::RwLock;

    use super::*;

    /// Map-backed store for handler tests.
    #[derive(Default)]
    pub struct InMemoryProfileStore {
        profiles: RwLock<HashMap<Uuid, UserProfile>>,
    }

    impl InMemoryProfileStore {
        pub fn with_profiles(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
            Self {
                profiles: RwLock::new(profiles.into_iter().map(|p| (p.id, p)).collect()),
            }
        }
    }

    #[async_trait]
    impl ProfileStore for InMemoryProfileStore {
        async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError> {
            Ok(self.profiles.read().await.get(&user_id).cloned())
        }

        async fn record_progress(
            &self,
            user_id: Uuid,
            course_id: &str,
            progress: Value,
        ) -> Result<Option<UserProfile>, AppError> {
            let mut profiles = self.profiles.write().await;
            Ok(profiles.get_mut(&user_id).map(|profile| {
                profile.progress.insert(course_id.to_string(), progress);
                profile.clone()
            }))
        }
    }

    #[tokio::test]
    async fn test_record_progress_overwrites_course_entry() {
        let id = Uuid::new_v4();
        let store = InMemoryProfileStore::with_profiles([UserProfile::new(id)]);

        store
            .record_progress(id, "course-1", serde_json::json!(20))
            .await
            .unwrap();
        let updated = store
            .record_progress(id, "course-1", serde_json::json!(80))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.progress.len(), 1);
        assert_eq!(updated.progress["course-1"], serde_json::json!(80));
    }

    #[tokio::test]
    async fn test_unknown_user_is_none() {
        let store = InMemoryProfileStore::default();
        assert!(store.get_profile(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store
            .record_progress(Uuid::new_v4(), "c", serde_json::json!(1))
            .await
            .unwrap()
            .is_none());
    }
}
