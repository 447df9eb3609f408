use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::{NewUser, ProfileChanges, User};

impl User {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Find a user by email, banned accounts included.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(db)
            .await
    }

    pub async fn create(db: &PgPool, new: &NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, location, profile_photo,
                               is_public, availability, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.location)
        .bind(&new.profile_photo)
        .bind(new.is_public)
        .bind(&new.availability)
        .bind(new.role)
        .fetch_one(db)
        .await
    }

    /// Non-admin users, newest first. With `listed_only` only public, active
    /// members are returned.
    pub async fn list(db: &PgPool, listed_only: bool) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT *
              FROM users
             WHERE role <> 'admin'
               AND ($1 = FALSE OR (is_public AND is_active))
             ORDER BY created_at DESC
            "#,
        )
        .bind(listed_only)
        .fetch_all(db)
        .await
    }

    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET name = COALESCE($2, name),
                   location = COALESCE($3, location),
                   profile_photo = COALESCE($4, profile_photo),
                   is_public = COALESCE($5, is_public),
                   availability = COALESCE($6, availability),
                   updated_at = NOW()
             WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.location)
        .bind(&changes.profile_photo)
        .bind(changes.is_public)
        .bind(&changes.availability)
        .fetch_optional(db)
        .await
    }

    /// Ban (`false`) or unban (`true`) a member account. Admin rows are never
    /// touched.
    pub async fn set_active(
        db: &PgPool,
        id: Uuid,
        active: bool,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET is_active = $2, updated_at = NOW()
             WHERE id = $1 AND role = 'user'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(active)
        .fetch_optional(db)
        .await
    }

    /// Row lock serializing aggregate recomputation for one user.
    pub async fn lock_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn find_by_id_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn set_rating_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        rating: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET rating = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(rating)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub async fn increment_total_swaps_tx(
        tx: &mut Transaction<'_, Postgres>,
        ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET total_swaps = total_swaps + 1, updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
