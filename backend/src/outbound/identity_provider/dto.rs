//! Wire shapes for the provider's user metadata endpoint.

use serde::Serialize;
use uuid::Uuid;

/// Body of `PATCH /users/{id}/metadata`.
#[derive(Debug, Serialize)]
pub(super) struct MetadataPatchDto {
    pub public_metadata: PublicMetadataDto,
}

#[derive(Debug, Serialize)]
pub(super) struct PublicMetadataDto {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

impl MetadataPatchDto {
    pub(super) const fn for_internal_id(user_id: Uuid) -> Self {
        Self {
            public_metadata: PublicMetadataDto { user_id },
        }
    }
}
