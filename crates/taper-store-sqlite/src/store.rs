//! [`SqliteStore`], the SQLite implementation of [`CommunityStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, types::Value};
use uuid::Uuid;

use taper_core::{
  entry::{JournalEntry, NewEntry},
  forum::{NewReply, NewThread, Reply, Thread},
  profile::Profile,
  store::CommunityStore,
  vote::{VoteDirection, VoteKind, VoteRecord, VoteTarget},
};

use crate::{
  Error, Result,
  encode::{
    ENTRY_COLUMNS, REPLY_COLUMNS, RawEntry, RawProfile, RawReply, RawThread, RawVote,
    THREAD_COLUMNS, encode_date, encode_dt, encode_symptoms, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Aggregate columns ───────────────────────────────────────────────────────

/// `(table, aggregate column, key column)` holding the denormalised count for
/// each vote kind.
fn aggregate_column(kind: VoteKind) -> (&'static str, &'static str, &'static str) {
  match kind {
    VoteKind::Thread => ("threads", "vote_score", "thread_id"),
    VoteKind::Reply => ("replies", "vote_score", "reply_id"),
    VoteKind::Helpful => ("replies", "helpful_count", "reply_id"),
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A TaperCommunity store backed by a single SQLite file.
///
/// Clones share the same reference-counted connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, used by the tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Entries matching `filter`, newest date first. `filter` binds `params`
  /// positionally; a `limit` of `-1` means no limit.
  async fn select_entries(
    &self,
    filter: &'static str,
    params: Vec<Value>,
    limit: i64,
  ) -> Result<Vec<JournalEntry>> {
    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {ENTRY_COLUMNS} FROM journal_entries
           WHERE {filter}
           ORDER BY entry_date DESC, created_at DESC
           LIMIT {limit}"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }
}

// ─── CommunityStore impl ─────────────────────────────────────────────────────

impl CommunityStore for SqliteStore {
  type Error = Error;

  // ── Journal entries ───────────────────────────────────────────────────────

  async fn add_entry(&self, owner_id: Uuid, input: NewEntry) -> Result<JournalEntry> {
    input.validate()?;

    let entry = JournalEntry {
      entry_id:     Uuid::new_v4(),
      owner_id,
      date:         input.date,
      drug:         input.drug,
      dose_numeric: input.dose_numeric,
      mood_score:   input.mood_score,
      symptoms:     input.symptoms,
      notes:        input.notes,
      is_public:    input.is_public,
      created_at:   Utc::now(),
    };

    let id_str       = encode_uuid(entry.entry_id);
    let owner_str    = encode_uuid(owner_id);
    let date_str     = encode_date(entry.date);
    let drug         = entry.drug.clone();
    let dose         = entry.dose_numeric;
    let mood         = entry.mood_score.map(i64::from);
    let symptoms_str = encode_symptoms(&entry.symptoms)?;
    let notes        = entry.notes.clone();
    let is_public    = entry.is_public;
    let at_str       = encode_dt(entry.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO journal_entries (
             entry_id, owner_id, entry_date, drug, dose_numeric,
             mood_score, symptoms, notes, is_public, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str, owner_str, date_str, drug, dose, mood, symptoms_str, notes, is_public,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn get_entry(&self, entry_id: Uuid) -> Result<Option<JournalEntry>> {
    let id_str = encode_uuid(entry_id);

    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ENTRY_COLUMNS} FROM journal_entries WHERE entry_id = ?1"),
              rusqlite::params![id_str],
              RawEntry::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEntry::into_entry).transpose()
  }

  async fn update_entry(&self, entry_id: Uuid, input: NewEntry) -> Result<Option<JournalEntry>> {
    input.validate()?;

    let id_str       = encode_uuid(entry_id);
    let date_str     = encode_date(input.date);
    let mood         = input.mood_score.map(i64::from);
    let symptoms_str = encode_symptoms(&input.symptoms)?;

    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE journal_entries
           SET entry_date = ?2, drug = ?3, dose_numeric = ?4, mood_score = ?5,
               symptoms = ?6, notes = ?7, is_public = ?8
           WHERE entry_id = ?1",
          rusqlite::params![
            id_str,
            date_str,
            input.drug,
            input.dose_numeric,
            mood,
            symptoms_str,
            input.notes,
            input.is_public,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(
          conn
            .query_row(
              &format!("SELECT {ENTRY_COLUMNS} FROM journal_entries WHERE entry_id = ?1"),
              rusqlite::params![id_str],
              RawEntry::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEntry::into_entry).transpose()
  }

  async fn delete_entry(&self, entry_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(entry_id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM journal_entries WHERE entry_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  async fn list_entries(&self, owner_id: Uuid) -> Result<Vec<JournalEntry>> {
    self
      .select_entries("owner_id = ?1", vec![Value::Text(encode_uuid(owner_id))], -1)
      .await
  }

  async fn list_public_entries(&self, limit: usize) -> Result<Vec<JournalEntry>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    self.select_entries("is_public = 1", Vec::new(), limit).await
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, display_name, drug, taper_stage FROM profiles WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawProfile {
                  user_id:      row.get(0)?,
                  display_name: row.get(1)?,
                  drug:         row.get(2)?,
                  taper_stage:  row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn put_profile(&self, profile: Profile) -> Result<Profile> {
    let id_str    = encode_uuid(profile.user_id);
    let name      = profile.display_name.clone();
    let drug      = profile.drug.clone();
    let stage_str = profile.taper_stage.as_ref().to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (user_id, display_name, drug, taper_stage)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (user_id) DO UPDATE SET
             display_name = excluded.display_name,
             drug         = excluded.drug,
             taper_stage  = excluded.taper_stage",
          rusqlite::params![id_str, name, drug, stage_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(profile)
  }

  // ── Forum ─────────────────────────────────────────────────────────────────

  async fn create_thread(&self, input: NewThread) -> Result<Thread> {
    let thread = Thread {
      thread_id:  Uuid::new_v4(),
      author_id:  input.author_id,
      title:      input.title,
      body:       input.body,
      vote_score: 0,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(thread.thread_id);
    let author_str = encode_uuid(thread.author_id);
    let title      = thread.title.clone();
    let body       = thread.body.clone();
    let at_str     = encode_dt(thread.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO threads (thread_id, author_id, title, body, vote_score, created_at)
           VALUES (?1, ?2, ?3, ?4, 0, ?5)",
          rusqlite::params![id_str, author_str, title, body, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(thread)
  }

  async fn get_thread(&self, thread_id: Uuid) -> Result<Option<Thread>> {
    let id_str = encode_uuid(thread_id);

    let raw: Option<RawThread> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {THREAD_COLUMNS} FROM threads WHERE thread_id = ?1"),
              rusqlite::params![id_str],
              RawThread::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawThread::into_thread).transpose()
  }

  async fn list_threads(&self) -> Result<Vec<Thread>> {
    let raws: Vec<RawThread> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {THREAD_COLUMNS} FROM threads ORDER BY created_at DESC"))?;
        let rows = stmt
          .query_map([], RawThread::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawThread::into_thread).collect()
  }

  async fn create_reply(&self, input: NewReply) -> Result<Reply> {
    let reply = Reply {
      reply_id:      Uuid::new_v4(),
      thread_id:     input.thread_id,
      author_id:     input.author_id,
      body:          input.body,
      vote_score:    0,
      helpful_count: 0,
      created_at:    Utc::now(),
    };

    let id_str     = encode_uuid(reply.reply_id);
    let thread_str = encode_uuid(reply.thread_id);
    let author_str = encode_uuid(reply.author_id);
    let body       = reply.body.clone();
    let at_str     = encode_dt(reply.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO replies (
             reply_id, thread_id, author_id, body, vote_score, helpful_count, created_at
           ) VALUES (?1, ?2, ?3, ?4, 0, 0, ?5)",
          rusqlite::params![id_str, thread_str, author_str, body, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(reply)
  }

  async fn get_reply(&self, reply_id: Uuid) -> Result<Option<Reply>> {
    let id_str = encode_uuid(reply_id);

    let raw: Option<RawReply> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {REPLY_COLUMNS} FROM replies WHERE reply_id = ?1"),
              rusqlite::params![id_str],
              RawReply::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawReply::into_reply).transpose()
  }

  async fn list_replies(&self, thread_id: Uuid) -> Result<Vec<Reply>> {
    let id_str = encode_uuid(thread_id);

    let raws: Vec<RawReply> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REPLY_COLUMNS} FROM replies WHERE thread_id = ?1 ORDER BY created_at ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawReply::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReply::into_reply).collect()
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn find_vote(&self, voter_id: Uuid, target: VoteTarget) -> Result<Option<VoteRecord>> {
    let voter_str  = encode_uuid(voter_id);
    let target_str = encode_uuid(target.target_id);
    let kind_str   = target.kind.as_ref().to_owned();

    let raw: Option<RawVote> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT voter_id, target_id, kind, direction, created_at FROM votes
               WHERE voter_id = ?1 AND target_id = ?2 AND kind = ?3",
              rusqlite::params![voter_str, target_str, kind_str],
              |row| {
                Ok(RawVote {
                  voter_id:   row.get(0)?,
                  target_id:  row.get(1)?,
                  kind:       row.get(2)?,
                  direction:  row.get(3)?,
                  created_at: row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawVote::into_record).transpose()
  }

  async fn insert_vote(
    &self,
    voter_id: Uuid,
    target: VoteTarget,
    direction: Option<VoteDirection>,
  ) -> Result<VoteRecord> {
    let record = VoteRecord { voter_id, target, direction, created_at: Utc::now() };

    let voter_str     = encode_uuid(voter_id);
    let target_str    = encode_uuid(target.target_id);
    let kind_str      = target.kind.as_ref().to_owned();
    let direction_str = direction.map(|d| d.as_ref().to_owned());
    let at_str        = encode_dt(record.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO votes (voter_id, target_id, kind, direction, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![voter_str, target_str, kind_str, direction_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn update_vote(
    &self,
    voter_id: Uuid,
    target: VoteTarget,
    direction: VoteDirection,
  ) -> Result<()> {
    let voter_str     = encode_uuid(voter_id);
    let target_str    = encode_uuid(target.target_id);
    let kind_str      = target.kind.as_ref().to_owned();
    let direction_str = direction.as_ref().to_owned();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE votes SET direction = ?4
           WHERE voter_id = ?1 AND target_id = ?2 AND kind = ?3",
          rusqlite::params![voter_str, target_str, kind_str, direction_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::VoteNotFound { voter_id, target_id: target.target_id });
    }
    Ok(())
  }

  /// Deleting a record that is already gone is not an error.
  async fn delete_vote(&self, voter_id: Uuid, target: VoteTarget) -> Result<()> {
    let voter_str  = encode_uuid(voter_id);
    let target_str = encode_uuid(target.target_id);
    let kind_str   = target.kind.as_ref().to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM votes WHERE voter_id = ?1 AND target_id = ?2 AND kind = ?3",
          rusqlite::params![voter_str, target_str, kind_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn count_votes(&self, target: VoteTarget) -> Result<i64> {
    let target_str = encode_uuid(target.target_id);
    let kind_str   = target.kind.as_ref().to_owned();

    let count = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM votes WHERE target_id = ?1 AND kind = ?2",
          rusqlite::params![target_str, kind_str],
          |row| row.get::<_, i64>(0),
        )?)
      })
      .await?;

    Ok(count)
  }

  async fn write_aggregate(&self, target: VoteTarget, count: i64) -> Result<()> {
    let (table, column, key) = aggregate_column(target.kind);
    let target_str = encode_uuid(target.target_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("UPDATE {table} SET {column} = ?2 WHERE {key} = ?1"),
          rusqlite::params![target_str, count],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::TargetNotFound(target.target_id));
    }
    Ok(())
  }

  async fn read_aggregate(&self, target: VoteTarget) -> Result<Option<i64>> {
    let (table, column, key) = aggregate_column(target.kind);
    let target_str = encode_uuid(target.target_id);

    let value = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {column} FROM {table} WHERE {key} = ?1"),
              rusqlite::params![target_str],
              |row| row.get::<_, i64>(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(value)
  }
}
