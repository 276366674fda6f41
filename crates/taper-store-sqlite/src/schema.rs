//! SQL schema for the TaperCommunity SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS journal_entries (
    entry_id      TEXT PRIMARY KEY,
    owner_id      TEXT NOT NULL,
    entry_date    TEXT NOT NULL,   -- YYYY-MM-DD
    drug          TEXT,
    dose_numeric  REAL,            -- mg; NULL when not recorded
    mood_score    INTEGER,         -- 1..10; NULL when not recorded
    symptoms      TEXT NOT NULL DEFAULT '[]',  -- JSON array, entry order
    notes         TEXT,
    is_public     INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS profiles (
    user_id       TEXT PRIMARY KEY,
    display_name  TEXT,
    drug          TEXT,
    taper_stage   TEXT NOT NULL DEFAULT 'researching'
);

CREATE TABLE IF NOT EXISTS threads (
    thread_id     TEXT PRIMARY KEY,
    author_id     TEXT NOT NULL,
    title         TEXT NOT NULL,
    body          TEXT NOT NULL,
    vote_score    INTEGER NOT NULL DEFAULT 0,  -- rewritten from a recount
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS replies (
    reply_id      TEXT PRIMARY KEY,
    thread_id     TEXT NOT NULL REFERENCES threads(thread_id) ON DELETE CASCADE,
    author_id     TEXT NOT NULL,
    body          TEXT NOT NULL,
    vote_score    INTEGER NOT NULL DEFAULT 0,
    helpful_count INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL
);

-- One row per (voter, target, kind). Direction is updated in place.
CREATE TABLE IF NOT EXISTS votes (
    voter_id      TEXT NOT NULL,
    target_id     TEXT NOT NULL,
    kind          TEXT NOT NULL,   -- 'thread' | 'reply' | 'helpful'
    direction     TEXT,            -- 'up' | 'down'; NULL for helpful
    created_at    TEXT NOT NULL,
    PRIMARY KEY (voter_id, target_id, kind),
    CHECK ((kind = 'helpful') = (direction IS NULL))
);

CREATE INDEX IF NOT EXISTS entries_owner_idx  ON journal_entries(owner_id, entry_date);
CREATE INDEX IF NOT EXISTS entries_public_idx ON journal_entries(is_public, entry_date);
CREATE INDEX IF NOT EXISTS replies_thread_idx ON replies(thread_id);
CREATE INDEX IF NOT EXISTS votes_target_idx   ON votes(target_id, kind);

PRAGMA user_version = 1;
";
