// SPDX-License-Identifier: Apache-2.0

use crate::error::is_unique_violation;
use crate::rows::{timestamp, user_id};
use crate::StoreError;
use dormchef_model::{format_timestamp, now_utc, Timestamp, User, UserId};
use rusqlite::{params, Connection, OptionalExtension};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image: Option<String>,
}

/// A user together with the stored password hash, for login only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

const USER_COLUMNS: &str = "id, name, email, image, created_at, password_hash";

type RawUser = (String, Option<String>, String, Option<String>, String, String);

fn decode(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn into_credentials(raw: RawUser) -> Result<UserCredentials, StoreError> {
    let (id, name, email, image, created_at, password_hash) = raw;
    Ok(UserCredentials {
        user: User {
            id: user_id(&id)?,
            name,
            email,
            image,
            created_at: timestamp(&created_at)?,
        },
        password_hash,
    })
}

pub fn create_user(conn: &Connection, new: &NewUser) -> Result<User, StoreError> {
    create_user_at(conn, new, now_utc())
}

pub(crate) fn create_user_at(
    conn: &Connection,
    new: &NewUser,
    created_at: Timestamp,
) -> Result<User, StoreError> {
    let id = UserId::generate();
    conn.execute(
        "INSERT INTO users (id, name, email, password_hash, image, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id.as_str(),
            new.name,
            new.email,
            new.password_hash,
            new.image,
            format_timestamp(&created_at)
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            StoreError::Conflict("Email already registered".to_string())
        } else {
            StoreError::Sqlite(e)
        }
    })?;
    Ok(User {
        id,
        name: Some(new.name.clone()),
        email: new.email.clone(),
        image: new.image.clone(),
        created_at,
    })
}

pub fn find_user_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<UserCredentials>, StoreError> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
        params![email],
        decode,
    )
    .optional()?
    .map(into_credentials)
    .transpose()
}

pub fn find_user(conn: &Connection, id: &UserId) -> Result<Option<User>, StoreError> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![id.as_str()],
        decode,
    )
    .optional()?
    .map(|raw| into_credentials(raw).map(|c| c.user))
    .transpose()
}
