use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::path::Path;
use tracing::info;

use crate::shared::{Chat, ContactList};

pub async fn init_db(data_dir: &str) -> Result<SqlitePool, sqlx::Error> {
    let db_path = Path::new(data_dir).join("chat.db");
    let db_url = format!("sqlite:{}", db_path.display());

    // Create database if it doesn't exist
    if !Sqlite::database_exists(&db_url).await.unwrap_or(false) {
        info!("Creating database at {}", db_url);
        Sqlite::create_database(&db_url).await?;
    }

    let pool = SqlitePool::connect(&db_url).await?;

    create_tables(&pool).await?;

    info!("Database initialized successfully");
    Ok(pool)
}

async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY NOT NULL,
            password_hash TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            from_user TEXT NOT NULL,
            to_user TEXT NOT NULL,
            message TEXT NOT NULL,
            timestamp INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            owner TEXT NOT NULL,
            contact TEXT NOT NULL,
            last_activity INTEGER NOT NULL,
            PRIMARY KEY (owner, contact)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_chats_pair ON chats(from_user, to_user, timestamp);
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_contacts_activity ON contacts(owner, last_activity);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database tables created/verified successfully");
    Ok(())
}

/// Stores a new user. `password_hash` comes from `auth::hash_password`.
pub async fn register_new_user(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn is_user_exist(pool: &SqlitePool, username: &str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

pub async fn is_user_authentic(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<bool, sqlx::Error> {
    let stored: Option<String> =
        sqlx::query_scalar("SELECT password_hash FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

    Ok(match stored {
        Some(hash) => crate::auth::verify_password(password, &hash),
        None => false,
    })
}

/// Adds `contact` to `username`'s contact list, or bumps its last activity.
pub async fn update_contact_list<'e, E>(
    executor: E,
    username: &str,
    contact: &str,
    timestamp: i64,
) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO contacts (owner, contact, last_activity) VALUES (?, ?, ?)
        ON CONFLICT(owner, contact) DO UPDATE SET last_activity = excluded.last_activity
        "#,
    )
    .bind(username)
    .bind(contact)
    .bind(timestamp)
    .execute(executor)
    .await?;

    Ok(())
}

#[derive(Debug)]
pub struct NewChat {
    pub from: String,
    pub to: String,
    pub message: String,
    pub timestamp: i64,
}

pub fn chat_key(id: i64) -> String {
    format!("chat#{}", id)
}

pub async fn create_chat(pool: &SqlitePool, chat: NewChat) -> Result<String, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO chats (from_user, to_user, message, timestamp) VALUES (?, ?, ?, ?)",
    )
    .bind(&chat.from)
    .bind(&chat.to)
    .bind(&chat.message)
    .bind(chat.timestamp)
    .execute(&mut *tx)
    .await?;

    // Both participants see each other as a contact
    update_contact_list(&mut *tx, &chat.from, &chat.to, chat.timestamp).await?;
    update_contact_list(&mut *tx, &chat.to, &chat.from, chat.timestamp).await?;

    tx.commit().await?;

    let key = chat_key(result.last_insert_rowid());
    info!("Chat {} stored from {} to {}", key, chat.from, chat.to);
    Ok(key)
}

/// Parses a history bound. `inf`/`+inf` means now, `-inf` means the epoch.
/// Otherwise the leading integer is used and any trailing text is ignored.
pub fn parse_timestamp(ts: &str, now: i64) -> Option<i64> {
    match ts.trim() {
        "+inf" | "inf" => Some(now),
        "-inf" => Some(0),
        other => {
            let digits_start = usize::from(other.starts_with(['+', '-']));
            let digits_end = other[digits_start..]
                .find(|c: char| !c.is_ascii_digit())
                .map_or(other.len(), |i| digits_start + i);
            if digits_end == digits_start {
                return None;
            }
            other[..digits_end].parse::<i64>().ok()
        }
    }
}

pub async fn fetch_chat_between(
    pool: &SqlitePool,
    username1: &str,
    username2: &str,
    from_ts: &str,
    to_ts: &str,
) -> Result<Vec<Chat>, sqlx::Error> {
    let now = chrono::Utc::now().timestamp();
    let from = parse_timestamp(from_ts, now).unwrap_or(0);
    let to = parse_timestamp(to_ts, now).unwrap_or(now);

    let chats = sqlx::query_as::<_, Chat>(
        r#"
        SELECT 'chat#' || id AS id, from_user AS "from", to_user AS "to", message, timestamp
        FROM chats
        WHERE ((from_user = ? AND to_user = ?) OR (from_user = ? AND to_user = ?))
          AND timestamp >= ?
          AND timestamp <= ?
        ORDER BY timestamp DESC, id DESC
        "#,
    )
    .bind(username1)
    .bind(username2)
    .bind(username2)
    .bind(username1)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(chats)
}

/// Contacts of `username`, most recent activity first.
pub async fn fetch_contact_list(
    pool: &SqlitePool,
    username: &str,
) -> Result<Vec<ContactList>, sqlx::Error> {
    let contacts = sqlx::query_as::<_, ContactList>(
        r#"
        SELECT contact AS username, last_activity
        FROM contacts
        WHERE owner = ?
        ORDER BY last_activity DESC, contact ASC
        "#,
    )
    .bind(username)
    .fetch_all(pool)
    .await?;

    Ok(contacts)
}
