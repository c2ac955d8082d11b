use anyhow::{anyhow, bail, Context, Result};
use gymdesk_api_types::{normalize_email, AdminRole, CreateAdminRequest};
use gymdesk_config::GymdeskConfig;
use gymdesk_interfaces::{AdminRepository, NewAdmin};
use gymdesk_storage::seaorm::repositories::SeaOrmAdminRepository;
use validator::Validate;

use super::connect;
use crate::report;

pub async fn handle_create(
    config: &GymdeskConfig,
    email: String,
    name: String,
    password: Option<String>,
    super_admin: bool,
) -> Result<()> {
    let password = password
        .ok_or_else(|| anyhow!("A password is required: pass --password or set GYMDESK_ADMIN_PASSWORD"))?;
    let role = if super_admin {
        AdminRole::SuperAdmin
    } else {
        AdminRole::Admin
    };

    let request = CreateAdminRequest {
        email: normalize_email(&email),
        name: name.trim().to_string(),
        password,
        role: Some(role),
    };
    if let Err(errors) = request.validate() {
        bail!("Invalid admin details: {}", errors);
    }

    let db = connect(config).await?;
    db.migrate().await.context("Schema migration failed")?;
    let admins = SeaOrmAdminRepository::new(db);

    if admins.find_credentials(&request.email).await?.is_some() {
        bail!("An admin with email {} already exists", request.email);
    }

    let cost = config.auth.bcrypt_cost;
    let plain = request.password;
    let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
        .await?
        .context("Failed to hash password")?;

    let admin = admins
        .create(NewAdmin {
            email: request.email,
            name: request.name,
            password_hash,
            role,
        })
        .await?;

    report::success(format!("Created {} {} (id {})", admin.role, admin.email, admin.id));
    Ok(())
}
