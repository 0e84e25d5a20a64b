//! User repository for directory operations.

use gatehouse_core::auth::Credential;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{user_roles, users};

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a user by username across all tenants.
    ///
    /// Used for login when no tenant has been resolved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Finds a user by username within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username_in_tenant(
        &self,
        tenant_id: Uuid,
        username: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::TenantId.eq(tenant_id))
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Lists all users in a tenant, ordered by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_in_tenant(&self, tenant_id: Uuid) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::TenantId.eq(tenant_id))
            .order_by_asc(users::Column::Username)
            .all(&self.db)
            .await
    }

    /// Checks if a username is already taken within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn username_exists(&self, tenant_id: Uuid, username: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::TenantId.eq(tenant_id))
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Checks if an email is already registered within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, tenant_id: Uuid, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::TenantId.eq(tenant_id))
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new user with the given credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        tenant_id: Uuid,
        username: &str,
        email: &str,
        credential: &Credential,
    ) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(credential.hash.clone()),
            password_salt: Set(credential.salt.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Updates username and/or email. Provided fields are whole-field
    /// replacements; absent fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_profile(
        &self,
        id: Uuid,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<users::Model>, DbErr> {
        let Some(user) = users::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active = user.into_active_model();
        if let Some(username) = username {
            active.username = Set(username.to_string());
        }
        if let Some(email) = email {
            active.email = Set(email.to_string());
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map(Some)
    }

    /// Replaces the stored credential wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn set_password(
        &self,
        id: Uuid,
        credential: &Credential,
    ) -> Result<Option<users::Model>, DbErr> {
        let Some(user) = users::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active = user.into_active_model();
        active.password_hash = Set(credential.hash.clone());
        active.password_salt = Set(credential.salt.clone());
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map(Some)
    }

    /// Deletes a user. Role links are removed by cascade.
    ///
    /// Idempotent: deleting a nonexistent user returns `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = users::Entity::delete_by_id(id).exec(&self.db).await?;

        Ok(result.rows_affected > 0)
    }

    /// Lists the role IDs granted to a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn role_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        user_roles::Entity::find()
            .filter(user_roles::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map(|links| links.into_iter().map(|link| link.role_id).collect())
    }

    /// Grants a role to a user. Granting an already-held role is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn add_role(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        role_id: Uuid,
    ) -> Result<(), DbErr> {
        let existing = user_roles::Entity::find_by_id((user_id, role_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        let link = user_roles::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
            tenant_id: Set(tenant_id),
            created_at: Set(chrono::Utc::now().into()),
        };
        link.insert(&self.db).await?;

        Ok(())
    }

    /// Revokes a role from a user.
    ///
    /// Returns `false` if the user did not hold the role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn remove_role(&self, user_id: Uuid, role_id: Uuid) -> Result<bool, DbErr> {
        let result = user_roles::Entity::delete_by_id((user_id, role_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
