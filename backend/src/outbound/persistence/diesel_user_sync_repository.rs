//! PostgreSQL-backed `UserSyncRepository` implementation using Diesel ORM.
//!
//! Creates upsert on `clerk_id` so a redelivered `user.created` converges on
//! the same row. Updates and deletes of unknown ids surface as `NotFound`.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserSyncRepository, UserSyncRepositoryError};
use crate::domain::{ExternalUserId, NewUserProjection, UserProfileUpdate, UserRecord};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserProfileChangeset, UserReplaceChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserSyncRepository`] port.
#[derive(Clone)]
pub struct DieselUserSyncRepository {
    pool: DbPool,
}

impl DieselUserSyncRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserSyncRepositoryError {
    map_basic_pool_error(error, UserSyncRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserSyncRepositoryError {
    map_basic_diesel_error(
        error,
        UserSyncRepositoryError::query,
        UserSyncRepositoryError::connection,
    )
}

fn row_to_record(row: UserRow) -> Result<UserRecord, UserSyncRepositoryError> {
    let external_id = ExternalUserId::new(row.clerk_id).map_err(|err| {
        UserSyncRepositoryError::query(format!("stored user {} is invalid: {err}", row.id))
    })?;
    Ok(UserRecord {
        internal_id: row.id,
        external_id,
        email: row.email,
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
        photo_url: row.photo,
    })
}

fn found_or_not_found(
    row: Option<UserRow>,
    external_id: &ExternalUserId,
) -> Result<UserRecord, UserSyncRepositoryError> {
    row.map_or_else(
        || Err(UserSyncRepositoryError::not_found(external_id.as_str())),
        row_to_record,
    )
}

#[async_trait]
impl UserSyncRepository for DieselUserSyncRepository {
    async fn create(
        &self,
        user: &NewUserProjection,
    ) -> Result<Option<UserRecord>, UserSyncRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            clerk_id: user.external_id.as_str(),
            email: user.email.as_str(),
            username: user.username.as_str(),
            first_name: user.first_name.as_str(),
            last_name: user.last_name.as_str(),
            photo: user.photo_url.as_str(),
        };
        let replace = UserReplaceChangeset {
            email: row.email,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            photo: row.photo,
            updated_at: Utc::now(),
        };

        let stored: Option<UserRow> = diesel::insert_into(users::table)
            .values(&row)
            .on_conflict(users::clerk_id)
            .do_update()
            .set(&replace)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        debug!(external_id = %user.external_id, stored = stored.is_some(), "user upserted");
        stored.map(row_to_record).transpose()
    }

    async fn update(
        &self,
        external_id: &ExternalUserId,
        update: &UserProfileUpdate,
    ) -> Result<UserRecord, UserSyncRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = UserProfileChangeset {
            username: update.username.as_str(),
            first_name: update.first_name.as_str(),
            last_name: update.last_name.as_str(),
            photo: update.photo_url.as_str(),
            updated_at: Utc::now(),
        };

        let row: Option<UserRow> =
            diesel::update(users::table.filter(users::clerk_id.eq(external_id.as_str())))
                .set(&changeset)
                .returning(UserRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        found_or_not_found(row, external_id)
    }

    async fn delete(
        &self,
        external_id: &ExternalUserId,
    ) -> Result<UserRecord, UserSyncRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> =
            diesel::delete(users::table.filter(users::clerk_id.eq(external_id.as_str())))
                .returning(UserRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        found_or_not_found(row, external_id)
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for row conversion and error mapping; database
    //! behaviour needs a live PostgreSQL instance.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(clerk_id: &str) -> UserRow {
        UserRow {
            id: Uuid::nil(),
            clerk_id: clerk_id.to_owned(),
            email: "a@b.com".to_owned(),
            username: "ada".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            photo: "https://img/ada.png".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    fn row_converts_to_record() {
        let record = row_to_record(row("u1")).expect("valid row");
        assert_eq!(record.internal_id, Uuid::nil());
        assert_eq!(record.external_id.as_str(), "u1");
        assert_eq!(record.photo_url, "https://img/ada.png");
    }

    #[rstest]
    fn row_with_blank_clerk_id_is_query_error() {
        let err = row_to_record(row(" ")).expect_err("blank id rejected");
        assert!(matches!(err, UserSyncRepositoryError::Query { .. }));
    }

    #[rstest]
    fn missing_row_maps_to_not_found() {
        let id = ExternalUserId::new("ghost").expect("valid id");
        let err = found_or_not_found(None, &id).expect_err("missing row");
        assert_eq!(err, UserSyncRepositoryError::not_found("ghost"));
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, UserSyncRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn diesel_not_found_maps_to_query() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, UserSyncRepositoryError::Query { .. }));
    }
}
