//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{SessionId, UserId};
use kernel::principal::Principal;
use kernel::role::UserRole;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{Credential, Session, User};
use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{Email, Phone, UserPassword, Username};
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
}

const USER_COLUMNS: &str = r#"
    user_id,
    username,
    username_canonical,
    email,
    phone,
    role,
    last_login_at,
    created_at,
    updated_at
"#;

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn register(&self, user: &User, credential: &Credential) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                username,
                username_canonical,
                email,
                phone,
                role,
                last_login_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.username.as_str())
        .bind(user.username.canonical())
        .bind(user.email.as_str())
        .bind(user.phone.as_ref().map(Phone::as_str))
        .bind(user.role.code())
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(AuthError::from_unique_violation)?;

        sqlx::query(
            r#"
            INSERT INTO user_credentials (
                user_id,
                password_hash,
                failed_attempts,
                last_failed_at,
                locked_until,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(credential.user_id.as_uuid())
        .bind(credential.password.as_phc_string())
        .bind(credential.failed_attempts as i16)
        .bind(credential.last_failed_at)
        .bind(credential.locked_until)
        .bind(credential.created_at)
        .bind(credential.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username_canonical = $1"
        ))
        .bind(username.canonical())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn exists_by_username(&self, username: &Username) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username_canonical = $1)",
        )
        .bind(username.canonical())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update_user(&self, user: &User) -> AuthResult<()> {
        update_user_row(&mut *self.pool.acquire().await?, user).await
    }

    async fn admin_exists(&self) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE role = 'admin')")
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn record_login(
        &self,
        user: &User,
        credential: &Credential,
        session: &Session,
    ) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        update_user_row(&mut tx, user).await?;
        update_credential_row(&mut tx, credential).await?;
        insert_session_row(&mut tx, session).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn save_profile(
        &self,
        user: &User,
        credential: Option<&Credential>,
        keep_session: SessionId,
    ) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        update_user_row(&mut tx, user).await?;

        if let Some(credential) = credential {
            update_credential_row(&mut tx, credential).await?;

            let revoked = sqlx::query(
                "DELETE FROM user_sessions WHERE user_id = $1 AND session_id <> $2",
            )
            .bind(user.user_id.as_uuid())
            .bind(keep_session.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

            tracing::info!(
                user_id = %user.user_id,
                sessions_revoked = revoked,
                "Revoked other sessions after password change"
            );
        }

        tx.commit().await?;
        Ok(())
    }
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgAuthRepository {
    async fn find_credential(&self, user_id: &UserId) -> AuthResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                user_id,
                password_hash,
                failed_attempts,
                last_failed_at,
                locked_until,
                created_at,
                updated_at
            FROM user_credentials
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialRow::into_credential).transpose()
    }

    async fn update_credential(&self, credential: &Credential) -> AuthResult<()> {
        update_credential_row(&mut *self.pool.acquire().await?, credential).await
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn create_session(&self, session: &Session) -> AuthResult<()> {
        insert_session_row(&mut *self.pool.acquire().await?, session).await
    }

    async fn find_principal(
        &self,
        session_id: &SessionId,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Principal>> {
        let row = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT
                s.session_id,
                s.user_id,
                u.role
            FROM user_sessions s
            JOIN users u ON u.user_id = s.user_id
            WHERE s.session_id = $1
              AND s.expires_at > $2
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PrincipalRow::into_principal).transpose()
    }

    async fn delete_session(&self, session_id: &SessionId) -> AuthResult<()> {
        sqlx::query("DELETE FROM user_sessions WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired_sessions(&self) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM user_sessions WHERE expires_at <= $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Shared statements
// ============================================================================

async fn update_user_row(conn: &mut sqlx::PgConnection, user: &User) -> AuthResult<()> {
    sqlx::query(
        r#"
        UPDATE users SET
            email = $2,
            phone = $3,
            role = $4,
            last_login_at = $5,
            updated_at = $6
        WHERE user_id = $1
        "#,
    )
    .bind(user.user_id.as_uuid())
    .bind(user.email.as_str())
    .bind(user.phone.as_ref().map(Phone::as_str))
    .bind(user.role.code())
    .bind(user.last_login_at)
    .bind(user.updated_at)
    .execute(conn)
    .await
    .map_err(AuthError::from_unique_violation)?;

    Ok(())
}

async fn update_credential_row(
    conn: &mut sqlx::PgConnection,
    credential: &Credential,
) -> AuthResult<()> {
    sqlx::query(
        r#"
        UPDATE user_credentials SET
            password_hash = $2,
            failed_attempts = $3,
            last_failed_at = $4,
            locked_until = $5,
            updated_at = $6
        WHERE user_id = $1
        "#,
    )
    .bind(credential.user_id.as_uuid())
    .bind(credential.password.as_phc_string())
    .bind(credential.failed_attempts as i16)
    .bind(credential.last_failed_at)
    .bind(credential.locked_until)
    .bind(credential.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

async fn insert_session_row(conn: &mut sqlx::PgConnection, session: &Session) -> AuthResult<()> {
    sqlx::query(
        r#"
        INSERT INTO user_sessions (
            session_id,
            user_id,
            client_ip,
            user_agent,
            expires_at,
            created_at
        ) VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(session.session_id.as_uuid())
    .bind(session.user_id.as_uuid())
    .bind(session.client_ip.as_deref())
    .bind(session.user_agent.as_deref())
    .bind(session.expires_at)
    .bind(session.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    username: String,
    username_canonical: String,
    email: String,
    phone: Option<String>,
    role: String,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            username: Username::from_stored(self.username, self.username_canonical),
            email: Email::from_stored(self.email),
            phone: self.phone.map(Phone::from_stored),
            role: parse_role(&self.role)?,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    user_id: Uuid,
    password_hash: String,
    failed_attempts: i16,
    last_failed_at: Option<DateTime<Utc>>,
    locked_until: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> AuthResult<Credential> {
        Ok(Credential {
            user_id: UserId::from_uuid(self.user_id),
            password: UserPassword::from_phc_string(self.password_hash)?,
            failed_attempts: self.failed_attempts.max(0) as u16,
            last_failed_at: self.last_failed_at,
            locked_until: self.locked_until,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PrincipalRow {
    session_id: Uuid,
    user_id: Uuid,
    role: String,
}

impl PrincipalRow {
    fn into_principal(self) -> AuthResult<Principal> {
        Ok(Principal::new(
            UserId::from_uuid(self.user_id),
            SessionId::from_uuid(self.session_id),
            parse_role(&self.role)?,
        ))
    }
}

fn parse_role(code: &str) -> AuthResult<UserRole> {
    UserRole::from_code(code).ok_or_else(|| AuthError::Internal(format!("Unknown role: {code}")))
}
