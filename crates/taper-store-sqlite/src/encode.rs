//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates are `YYYY-MM-DD`, symptom
//! lists are compact JSON arrays, and UUIDs are hyphenated lowercase strings.
//! Enums use their `strum` string forms.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use taper_core::{
  entry::JournalEntry,
  forum::{Reply, Thread},
  profile::{Profile, TaperStage},
  vote::{VoteDirection, VoteKind, VoteRecord, VoteTarget},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Dates ────────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ────────────────────────────────────────────────────────────────────

fn decode_enum<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  T::from_str(s).map_err(|_| Error::UnknownValue { column, value: s.to_owned() })
}

pub fn decode_stage(s: &str) -> Result<TaperStage> { decode_enum("taper_stage", s) }

pub fn decode_kind(s: &str) -> Result<VoteKind> { decode_enum("kind", s) }

pub fn decode_direction(s: &str) -> Result<VoteDirection> { decode_enum("direction", s) }

// ─── Symptoms ────────────────────────────────────────────────────────────────

pub fn encode_symptoms(symptoms: &[String]) -> Result<String> {
  Ok(serde_json::to_string(symptoms)?)
}

pub fn decode_symptoms(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

pub const ENTRY_COLUMNS: &str = "entry_id, owner_id, entry_date, drug, dose_numeric, \
                                 mood_score, symptoms, notes, is_public, created_at";

/// Raw values read directly from a `journal_entries` row.
pub struct RawEntry {
  pub entry_id:     String,
  pub owner_id:     String,
  pub entry_date:   String,
  pub drug:         Option<String>,
  pub dose_numeric: Option<f64>,
  pub mood_score:   Option<i64>,
  pub symptoms:     String,
  pub notes:        Option<String>,
  pub is_public:    bool,
  pub created_at:   String,
}

impl RawEntry {
  /// Map a row selected with [`ENTRY_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      entry_id:     row.get(0)?,
      owner_id:     row.get(1)?,
      entry_date:   row.get(2)?,
      drug:         row.get(3)?,
      dose_numeric: row.get(4)?,
      mood_score:   row.get(5)?,
      symptoms:     row.get(6)?,
      notes:        row.get(7)?,
      is_public:    row.get(8)?,
      created_at:   row.get(9)?,
    })
  }

  pub fn into_entry(self) -> Result<JournalEntry> {
    // Out-of-range stored moods are treated as absent rather than failing the
    // whole journal read.
    let mood_score = self.mood_score.and_then(|m| u8::try_from(m).ok());
    Ok(JournalEntry {
      entry_id: decode_uuid(&self.entry_id)?,
      owner_id: decode_uuid(&self.owner_id)?,
      date: decode_date(&self.entry_date)?,
      drug: self.drug,
      dose_numeric: self.dose_numeric,
      mood_score,
      symptoms: decode_symptoms(&self.symptoms)?,
      notes: self.notes,
      is_public: self.is_public,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub user_id:      String,
  pub display_name: Option<String>,
  pub drug:         Option<String>,
  pub taper_stage:  String,
}

impl RawProfile {
  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      user_id:      decode_uuid(&self.user_id)?,
      display_name: self.display_name,
      drug:         self.drug,
      taper_stage:  decode_stage(&self.taper_stage)?,
    })
  }
}

pub const THREAD_COLUMNS: &str = "thread_id, author_id, title, body, vote_score, created_at";

/// Raw values read directly from a `threads` row.
pub struct RawThread {
  pub thread_id:  String,
  pub author_id:  String,
  pub title:      String,
  pub body:       String,
  pub vote_score: i64,
  pub created_at: String,
}

impl RawThread {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      thread_id:  row.get(0)?,
      author_id:  row.get(1)?,
      title:      row.get(2)?,
      body:       row.get(3)?,
      vote_score: row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_thread(self) -> Result<Thread> {
    Ok(Thread {
      thread_id:  decode_uuid(&self.thread_id)?,
      author_id:  decode_uuid(&self.author_id)?,
      title:      self.title,
      body:       self.body,
      vote_score: self.vote_score,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const REPLY_COLUMNS: &str =
  "reply_id, thread_id, author_id, body, vote_score, helpful_count, created_at";

/// Raw values read directly from a `replies` row.
pub struct RawReply {
  pub reply_id:      String,
  pub thread_id:     String,
  pub author_id:     String,
  pub body:          String,
  pub vote_score:    i64,
  pub helpful_count: i64,
  pub created_at:    String,
}

impl RawReply {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      reply_id:      row.get(0)?,
      thread_id:     row.get(1)?,
      author_id:     row.get(2)?,
      body:          row.get(3)?,
      vote_score:    row.get(4)?,
      helpful_count: row.get(5)?,
      created_at:    row.get(6)?,
    })
  }

  pub fn into_reply(self) -> Result<Reply> {
    Ok(Reply {
      reply_id:      decode_uuid(&self.reply_id)?,
      thread_id:     decode_uuid(&self.thread_id)?,
      author_id:     decode_uuid(&self.author_id)?,
      body:          self.body,
      vote_score:    self.vote_score,
      helpful_count: self.helpful_count,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `votes` row.
pub struct RawVote {
  pub voter_id:   String,
  pub target_id:  String,
  pub kind:       String,
  pub direction:  Option<String>,
  pub created_at: String,
}

impl RawVote {
  pub fn into_record(self) -> Result<VoteRecord> {
    Ok(VoteRecord {
      voter_id:   decode_uuid(&self.voter_id)?,
      target:     VoteTarget {
        target_id: decode_uuid(&self.target_id)?,
        kind:      decode_kind(&self.kind)?,
      },
      direction:  self.direction.as_deref().map(decode_direction).transpose()?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
