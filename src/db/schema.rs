pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     TEXT NOT NULL,
    name        TEXT NOT NULL,
    kind        TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
    icon        TEXT NOT NULL DEFAULT 'Circle',
    color       TEXT NOT NULL DEFAULT '#6b7280',
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS incomes (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id       TEXT NOT NULL,
    description   TEXT NOT NULL,
    amount        TEXT NOT NULL,
    category_id   INTEGER REFERENCES categories(id) ON DELETE SET NULL,
    date          TEXT NOT NULL,
    is_recurring  BOOLEAN NOT NULL DEFAULT 0,
    frequency     TEXT,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS expenses (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id         TEXT NOT NULL,
    description     TEXT NOT NULL,
    amount          TEXT NOT NULL,
    category_id     INTEGER REFERENCES categories(id) ON DELETE SET NULL,
    date            TEXT NOT NULL,
    is_fixed        BOOLEAN NOT NULL DEFAULT 0,
    payment_method  TEXT NOT NULL DEFAULT 'cash',
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS alerts (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id           TEXT NOT NULL,
    name              TEXT NOT NULL,
    amount            TEXT NOT NULL,
    due_day           INTEGER NOT NULL CHECK (due_day BETWEEN 1 AND 31),
    category_id       INTEGER REFERENCES categories(id) ON DELETE SET NULL,
    is_active         BOOLEAN NOT NULL DEFAULT 1,
    last_notified_at  TEXT,
    created_at        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_categories_user ON categories(user_id);
CREATE INDEX IF NOT EXISTS idx_incomes_user_date ON incomes(user_id, date);
CREATE INDEX IF NOT EXISTS idx_incomes_category ON incomes(category_id);
CREATE INDEX IF NOT EXISTS idx_expenses_user_date ON expenses(user_id, date);
CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category_id);
CREATE INDEX IF NOT EXISTS idx_alerts_user ON alerts(user_id);
CREATE INDEX IF NOT EXISTS idx_alerts_category ON alerts(category_id);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
