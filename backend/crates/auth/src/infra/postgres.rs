//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    activation_token::ActivationToken, role::Role, user::User,
};
use crate::domain::repository::{
    ActivationTokenRepository, RoleRepository, UserRepository,
};
use crate::domain::value_object::{
    activation_code::ActivationCode, email::Email, user_id::UserId,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotently seed a role row
    ///
    /// Run at startup, before the server accepts traffic. Registration
    /// fails hard if the canonical role is missing.
    pub async fn ensure_role(&self, name: &str) -> AuthResult<()> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO roles (id, name, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            tracing::info!(role = name, "Seeded role");
        }

        Ok(())
    }

    /// Load the roles granted to a user
    async fn roles_for_user(&self, user_id: &Uuid) -> AuthResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT r.id, r.name, r.created_at
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RoleRow::into_role).collect())
    }

    async fn load_user(&self, row: UserRow) -> AuthResult<User> {
        let roles = self.roles_for_user(&row.user_id).await?;
        row.into_user(roles)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                firstname,
                lastname,
                email,
                password_hash,
                enabled,
                locked,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.enabled)
        .bind(user.locked)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await;

        if let Err(e) = result {
            // Cross-request duplicate registrations race past the
            // find_by_email check and land here
            if is_unique_violation(&e) {
                return Err(AuthError::DuplicateEmail);
            }
            return Err(e.into());
        }

        for role in &user.roles {
            sqlx::query(
                "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)",
            )
            .bind(user.user_id.as_uuid())
            .bind(role.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                firstname,
                lastname,
                email,
                password_hash,
                enabled,
                locked,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.load_user(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                firstname,
                lastname,
                email,
                password_hash,
                enabled,
                locked,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.load_user(row).await?)),
            None => Ok(None),
        }
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                firstname = $2,
                lastname = $3,
                password_hash = $4,
                enabled = $5,
                locked = $6,
                updated_at = $7
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(user.password_hash.as_phc_string())
        .bind(user.enabled)
        .bind(user.locked)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Activation Token Repository Implementation
// ============================================================================

impl ActivationTokenRepository for PgAuthRepository {
    async fn create(&self, token: &ActivationToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO activation_tokens (
                id,
                activation_code,
                user_id,
                created_at,
                expires_at,
                validated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(token.id)
        .bind(token.code.as_str())
        .bind(token.user_id.as_uuid())
        .bind(token.created_at)
        .bind(token.expires_at)
        .bind(token.validated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_code(&self, code: &str) -> AuthResult<Option<ActivationToken>> {
        let row = sqlx::query_as::<_, ActivationTokenRow>(
            r#"
            SELECT
                id,
                activation_code,
                user_id,
                created_at,
                expires_at,
                validated_at
            FROM activation_tokens
            WHERE activation_code = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ActivationTokenRow::into_token))
    }

    async fn update(&self, token: &ActivationToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE activation_tokens SET
                validated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(token.id)
        .bind(token.validated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Role Repository Implementation
// ============================================================================

impl RoleRepository for PgAuthRepository {
    async fn find_by_name(&self, name: &str) -> AuthResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT id, name, created_at FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RoleRow::into_role))
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    firstname: String,
    lastname: String,
    email: String,
    password_hash: String,
    enabled: bool,
    locked: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, roles: Vec<Role>) -> AuthResult<User> {
        let password_hash = UserPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            firstname: self.firstname,
            lastname: self.lastname,
            email: Email::from_db(self.email),
            password_hash,
            enabled: self.enabled,
            locked: self.locked,
            roles,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ActivationTokenRow {
    id: Uuid,
    activation_code: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    validated_at: Option<DateTime<Utc>>,
}

impl ActivationTokenRow {
    fn into_token(self) -> ActivationToken {
        ActivationToken {
            id: self.id,
            code: ActivationCode::from_db(self.activation_code),
            user_id: UserId::from_uuid(self.user_id),
            created_at: self.created_at,
            expires_at: self.expires_at,
            validated_at: self.validated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl RoleRow {
    fn into_role(self) -> Role {
        Role {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
        }
    }
}
