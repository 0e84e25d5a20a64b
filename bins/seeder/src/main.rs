//! Database seeder for Gatehouse development and testing.
//!
//! Seeds the default tenant's Admin/User roles and an administrator
//! account for local development.
//!
//! Usage: cargo run --bin seeder

use uuid::Uuid;

use gatehouse_core::auth::hash_password;
use gatehouse_db::{RoleRepository, UserRepository};

/// Default tenant ID (consistent for all seeds)
const DEFAULT_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";

const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "Admin123!";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = gatehouse_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let tenant_id = Uuid::parse_str(DEFAULT_TENANT_ID).unwrap();
    let role_repo = RoleRepository::new(db.clone());
    let user_repo = UserRepository::new(db.clone());

    println!("Seeding roles...");
    let admin_role_id = seed_role(&role_repo, tenant_id, "Admin").await;
    seed_role(&role_repo, tenant_id, "User").await;

    println!("Seeding admin user...");
    seed_admin_user(&user_repo, tenant_id, admin_role_id).await;

    println!("Seeding complete!");
}

/// Creates the role if it does not exist yet, returning its ID.
async fn seed_role(repo: &RoleRepository, tenant_id: Uuid, name: &str) -> Uuid {
    let existing = repo
        .list_in_tenant(tenant_id)
        .await
        .expect("Failed to list roles")
        .into_iter()
        .find(|r| r.name == name);

    match existing {
        Some(role) => {
            println!("  Role '{name}' already exists");
            role.id
        }
        None => {
            let role = repo
                .create(tenant_id, name)
                .await
                .expect("Failed to create role");
            println!("  Created role '{name}'");
            role.id
        }
    }
}

/// Creates the admin user with the Admin role if it does not exist yet.
async fn seed_admin_user(repo: &UserRepository, tenant_id: Uuid, admin_role_id: Uuid) {
    let existing = repo
        .find_by_username_in_tenant(tenant_id, ADMIN_USERNAME)
        .await
        .expect("Failed to look up admin user");

    if existing.is_some() {
        println!("  Admin user already exists");
        return;
    }

    let credential = hash_password(ADMIN_PASSWORD).expect("Failed to hash admin password");
    let user = repo
        .create(
            tenant_id,
            ADMIN_USERNAME,
            "admin@gatehouse.local",
            &credential,
        )
        .await
        .expect("Failed to create admin user");

    repo.add_role(tenant_id, user.id, admin_role_id)
        .await
        .expect("Failed to grant Admin role");

    println!("  Created admin user with Admin role");
}
