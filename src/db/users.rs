// src/db/users.rs
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use crate::domain::models::{Role, User};
use crate::errors::ServerError;

const USER_COLUMNS: &str = "id, email, first_name, last_name, phone, role, sex, dob, address, \
                            profile_image, must_change_password, created_at";

#[derive(Debug, Clone)]
pub struct NewUser {
    /// Already normalized by the caller.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: Role,
    pub sex: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub must_change_password: bool,
}

/// Fields a user may change on their own profile. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub sex: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub profile_image: Option<String>,
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        phone: row.get(4)?,
        role: row.get(5)?,
        sex: row.get(6)?,
        dob: row.get(7)?,
        address: row.get(8)?,
        profile_image: row.get(9)?,
        must_change_password: row.get(10)?,
        created_at: row.get(11)?,
    })
}

/// A duplicate email surfaces as `Conflict`, the same way the auth service
/// rejects a second sign-up.
pub fn insert_user(
    conn: &Connection,
    user: &NewUser,
    password_hash: &str,
    now: i64,
) -> Result<i64, ServerError> {
    let res = conn.execute(
        r#"
        insert into users (
            email, first_name, last_name, phone, role, sex, dob, address,
            password_hash, must_change_password, created_at
        ) values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            user.email,
            user.first_name,
            user.last_name,
            user.phone,
            user.role,
            user.sex,
            user.dob,
            user.address,
            password_hash,
            user.must_change_password,
            now,
        ],
    );

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(ServerError::Conflict("email already registered".into()))
        }
        Err(e) => Err(ServerError::DbError(format!("insert user failed: {e}"))),
    }
}

pub fn find_user(conn: &Connection, id: i64) -> Result<Option<User>, ServerError> {
    conn.query_row(
        &format!("select {USER_COLUMNS} from users where id = ?"),
        params![id],
        user_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select user failed: {e}")))
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, ServerError> {
    conn.query_row(
        &format!("select {USER_COLUMNS} from users where email = ?"),
        params![email],
        user_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select user by email failed: {e}")))
}

/// User plus stored hash, for login.
pub fn find_credentials(
    conn: &Connection,
    email: &str,
) -> Result<Option<(User, String)>, ServerError> {
    conn.query_row(
        &format!("select {USER_COLUMNS}, password_hash from users where email = ?"),
        params![email],
        |row| Ok((user_from_row(row)?, row.get(12)?)),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select credentials failed: {e}")))
}

pub fn password_hash(conn: &Connection, user_id: i64) -> Result<String, ServerError> {
    conn.query_row(
        "select password_hash from users where id = ?",
        params![user_id],
        |r| r.get(0),
    )
    .optional()?
    .ok_or(ServerError::NotFound)
}

pub fn set_password(
    conn: &Connection,
    user_id: i64,
    password_hash: &str,
    must_change: bool,
) -> Result<(), ServerError> {
    conn.execute(
        "update users set password_hash = ?, must_change_password = ? where id = ?",
        params![password_hash, must_change, user_id],
    )?;
    Ok(())
}

pub fn touch_login(conn: &Connection, user_id: i64, now: i64) -> Result<(), ServerError> {
    conn.execute(
        "update users set last_login_at = ? where id = ?",
        params![now, user_id],
    )?;
    Ok(())
}

pub fn update_profile(
    conn: &Connection,
    user_id: i64,
    update: &ProfileUpdate,
) -> Result<(), ServerError> {
    conn.execute(
        r#"
        update users set
            first_name    = coalesce(?1, first_name),
            last_name     = coalesce(?2, last_name),
            phone         = coalesce(?3, phone),
            sex           = coalesce(?4, sex),
            dob           = coalesce(?5, dob),
            address       = coalesce(?6, address),
            profile_image = coalesce(?7, profile_image)
        where id = ?8
        "#,
        params![
            update.first_name,
            update.last_name,
            update.phone,
            update.sex,
            update.dob,
            update.address,
            update.profile_image,
            user_id,
        ],
    )?;
    Ok(())
}

/// Cascades to sessions, tenant row, payments, requests and messages.
pub fn delete_user(conn: &Connection, user_id: i64) -> Result<bool, ServerError> {
    let n = conn.execute("delete from users where id = ?", params![user_id])?;
    Ok(n == 1)
}
