//! Role repository for directory operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::roles;

/// Role repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    db: DatabaseConnection,
}

impl RoleRepository {
    /// Creates a new role repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a role by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<roles::Model>, DbErr> {
        roles::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds all roles matching the given IDs.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<roles::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        roles::Entity::find()
            .filter(roles::Column::Id.is_in(ids))
            .all(&self.db)
            .await
    }

    /// Lists all roles in a tenant, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_in_tenant(&self, tenant_id: Uuid) -> Result<Vec<roles::Model>, DbErr> {
        roles::Entity::find()
            .filter(roles::Column::TenantId.eq(tenant_id))
            .order_by_asc(roles::Column::Name)
            .all(&self.db)
            .await
    }

    /// Checks if a role name is already taken within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn name_exists(&self, tenant_id: Uuid, name: &str) -> Result<bool, DbErr> {
        let count = roles::Entity::find()
            .filter(roles::Column::TenantId.eq(tenant_id))
            .filter(roles::Column::Name.eq(name))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, tenant_id: Uuid, name: &str) -> Result<roles::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let role = roles::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        role.insert(&self.db).await
    }

    /// Renames a role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn rename(&self, id: Uuid, name: &str) -> Result<Option<roles::Model>, DbErr> {
        let Some(role) = roles::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active = role.into_active_model();
        active.name = Set(name.to_string());
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map(Some)
    }

    /// Deletes a role. User links are removed by cascade.
    ///
    /// Idempotent: deleting a nonexistent role returns `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = roles::Entity::delete_by_id(id).exec(&self.db).await?;

        Ok(result.rows_affected > 0)
    }
}
