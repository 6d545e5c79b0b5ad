//! Port abstraction for the user mirror table and its errors.
use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{ExternalUserId, NewUserProjection, UserProfileUpdate, UserRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user sync repository adapters.
    pub enum UserSyncRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user sync repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user sync repository query failed: {message}",
        /// No row matches the external identifier.
        NotFound { external_id: String } => "no user found for external id {external_id}",
    }
}

/// Create/update/delete operations driven by provider events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserSyncRepository: Send + Sync {
    /// Insert a user mirrored from the provider.
    ///
    /// `None` means the adapter stored nothing it can identify; callers must
    /// not write metadata back in that case.
    async fn create(
        &self,
        user: &NewUserProjection,
    ) -> Result<Option<UserRecord>, UserSyncRepositoryError>;

    /// Overwrite the display fields of an existing user.
    async fn update(
        &self,
        external_id: &ExternalUserId,
        update: &UserProfileUpdate,
    ) -> Result<UserRecord, UserSyncRepositoryError>;

    /// Remove an existing user.
    async fn delete(
        &self,
        external_id: &ExternalUserId,
    ) -> Result<UserRecord, UserSyncRepositoryError>;
}

/// Non-persistent repository used when no database is configured.
///
/// Every call succeeds and echoes a record with a freshly generated internal id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserSyncRepository;

impl FixtureUserSyncRepository {
    fn record(external_id: &ExternalUserId, update: &UserProfileUpdate, email: &str) -> UserRecord {
        UserRecord {
            internal_id: Uuid::new_v4(),
            external_id: external_id.clone(),
            email: email.to_owned(),
            username: update.username.clone(),
            first_name: update.first_name.clone(),
            last_name: update.last_name.clone(),
            photo_url: update.photo_url.clone(),
        }
    }
}

#[async_trait]
impl UserSyncRepository for FixtureUserSyncRepository {
    async fn create(
        &self,
        user: &NewUserProjection,
    ) -> Result<Option<UserRecord>, UserSyncRepositoryError> {
        debug!(external_id = %user.external_id, "fixture repository accepted create");
        let profile = UserProfileUpdate {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            photo_url: user.photo_url.clone(),
        };
        Ok(Some(Self::record(&user.external_id, &profile, &user.email)))
    }

    async fn update(
        &self,
        external_id: &ExternalUserId,
        update: &UserProfileUpdate,
    ) -> Result<UserRecord, UserSyncRepositoryError> {
        debug!(%external_id, "fixture repository accepted update");
        Ok(Self::record(external_id, update, ""))
    }

    async fn delete(
        &self,
        external_id: &ExternalUserId,
    ) -> Result<UserRecord, UserSyncRepositoryError> {
        debug!(%external_id, "fixture repository accepted delete");
        let blank = UserProfileUpdate {
            first_name: String::new(),
            last_name: String::new(),
            username: String::new(),
            photo_url: String::new(),
        };
        Ok(Self::record(external_id, &blank, ""))
    }
}
