use std::fmt;
use std::path::Path;

use chrono::{DateTime, Local, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::controller::CompletedTest;
use crate::error::StoreError;
use crate::session::TestDuration;
use crate::stats::TestStats;

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 50;

/// Opaque identity results are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserToken(String);

impl UserToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// `$USER`, falling back to "anonymous".
    pub fn from_env() -> Self {
        std::env::var("USER")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .map(Self)
            .unwrap_or_else(|| Self("anonymous".to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the best-per-duration leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user: String,
    pub wpm: u32,
    pub accuracy: u32,
    pub date: DateTime<Local>,
}

/// A persisted test.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResult {
    pub duration: TestDuration,
    pub stats: TestStats,
    pub date: DateTime<Local>,
}

/// SQLite-backed store for finished tests and the leaderboard.
#[derive(Debug)]
pub struct ResultsDb {
    conn: Connection,
}

impl ResultsDb {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS typing_tests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_token TEXT NOT NULL,
                duration INTEGER NOT NULL,
                wpm INTEGER NOT NULL,
                raw_wpm INTEGER NOT NULL,
                accuracy INTEGER NOT NULL,
                errors INTEGER NOT NULL,
                consistency INTEGER NOT NULL,
                correct_chars INTEGER NOT NULL,
                incorrect_chars INTEGER NOT NULL,
                total_chars INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_typing_tests_user ON typing_tests(user_token);

            CREATE TABLE IF NOT EXISTS leaderboard_entries (
                user_token TEXT NOT NULL,
                duration INTEGER NOT NULL,
                wpm INTEGER NOT NULL,
                accuracy INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (user_token, duration)
            );
            "#,
        )?;

        Ok(Self { conn })
    }

    /// Records a finished test. Returns true when it set a new personal best.
    pub fn save_result(&mut self, user: &UserToken, test: &CompletedTest) -> Result<bool, StoreError> {
        self.save_result_at(user, test, Local::now())
    }

    pub fn save_result_at(
        &mut self,
        user: &UserToken,
        test: &CompletedTest,
        at: DateTime<Local>,
    ) -> Result<bool, StoreError> {
        let stats = &test.stats;
        let duration = test.duration.secs();
        // UTC so the text column sorts chronologically across offset changes
        let created_at = at.with_timezone(&Utc).to_rfc3339();

        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO typing_tests
            (user_token, duration, wpm, raw_wpm, accuracy, errors, consistency,
             correct_chars, incorrect_chars, total_chars, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                user.as_str(),
                duration,
                stats.wpm,
                stats.raw_wpm,
                stats.accuracy,
                stats.errors,
                stats.consistency,
                stats.correct_chars,
                stats.incorrect_chars,
                stats.total_chars,
                created_at,
            ],
        )?;

        let previous: Option<u32> = tx
            .query_row(
                "SELECT wpm FROM leaderboard_entries WHERE user_token = ?1 AND duration = ?2",
                params![user.as_str(), duration],
                |row| row.get(0),
            )
            .optional()?;

        let new_best = previous.map_or(true, |best| stats.wpm > best);
        if new_best {
            tx.execute(
                r#"
                INSERT INTO leaderboard_entries (user_token, duration, wpm, accuracy, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(user_token, duration) DO UPDATE SET
                    wpm = excluded.wpm,
                    accuracy = excluded.accuracy,
                    created_at = excluded.created_at
                "#,
                params![user.as_str(), duration, stats.wpm, stats.accuracy, created_at],
            )?;
        }

        tx.commit()?;
        Ok(new_best)
    }

    /// Best results for `duration`, fastest first.
    pub fn leaderboard(
        &self,
        duration: TestDuration,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT user_token, wpm, accuracy, created_at
            FROM leaderboard_entries
            WHERE duration = ?1
            ORDER BY wpm DESC, created_at ASC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![duration.secs(), limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, u32>(2)?,
                parse_date(row, 3)?,
            ))
        })?;

        let mut entries = Vec::new();
        for (idx, row) in rows.enumerate() {
            let (user, wpm, accuracy, date) = row?;
            entries.push(LeaderboardEntry {
                rank: idx + 1,
                user,
                wpm,
                accuracy,
                date,
            });
        }

        Ok(entries)
    }

    pub fn personal_best(
        &self,
        user: &UserToken,
        duration: TestDuration,
    ) -> Result<Option<u32>, StoreError> {
        let best = self
            .conn
            .query_row(
                "SELECT wpm FROM leaderboard_entries WHERE user_token = ?1 AND duration = ?2",
                params![user.as_str(), duration.secs()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(best)
    }

    /// Most recent tests for `user`, newest first.
    pub fn recent_results(
        &self,
        user: &UserToken,
        limit: usize,
    ) -> Result<Vec<StoredResult>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT duration, wpm, raw_wpm, accuracy, errors, consistency,
                   correct_chars, incorrect_chars, total_chars, created_at
            FROM typing_tests
            WHERE user_token = ?1
            ORDER BY id DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![user.as_str(), limit as i64], |row| {
            let secs: u32 = row.get(0)?;
            let duration = TestDuration::try_from(secs).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Integer, Box::new(e))
            })?;

            Ok(StoredResult {
                duration,
                stats: TestStats {
                    wpm: row.get(1)?,
                    raw_wpm: row.get(2)?,
                    accuracy: row.get(3)?,
                    errors: row.get(4)?,
                    consistency: row.get(5)?,
                    correct_chars: row.get(6)?,
                    incorrect_chars: row.get(7)?,
                    total_chars: row.get(8)?,
                },
                date: parse_date(row, 9)?,
            })
        })?;

        let mut results = Vec::new();
        for result in rows {
            results.push(result?);
        }

        Ok(results)
    }
}

fn parse_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Local>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|d| d.with_timezone(&Local))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))
}
