mod schema;

use anyhow::Context;
use chrono::NaiveDate;
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::error::{FinanceError, Result};
use crate::models::*;
use crate::session::UserId;

/// Row selection for the list operations. Fields that do not apply to a
/// collection are ignored (`kind` only narrows categories, the date range
/// only narrows incomes and expenses, `active_only` only narrows alerts).
#[derive(Debug, Clone, Default)]
pub(crate) struct Filter {
    pub(crate) from: Option<NaiveDate>,
    pub(crate) to: Option<NaiveDate>,
    pub(crate) category_id: Option<i64>,
    pub(crate) kind: Option<CategoryKind>,
    pub(crate) active_only: bool,
}

impl Filter {
    pub(crate) fn all() -> Self {
        Self::default()
    }

    pub(crate) fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    pub(crate) fn of_kind(kind: CategoryKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub(crate) fn active() -> Self {
        Self {
            active_only: true,
            ..Self::default()
        }
    }
}

type Params = Vec<Box<dyn ToSql>>;

fn push_condition(sql: &mut String, params: &mut Params, condition: &str, value: Box<dyn ToSql>) {
    sql.push_str(&format!(" AND {condition} ?{}", params.len() + 1));
    params.push(value);
}

fn param_refs(params: &Params) -> Vec<&dyn ToSql> {
    params.iter().map(|p| p.as_ref()).collect()
}

/// `SET` clause under construction for a partial update.
#[derive(Default)]
struct Assignments {
    columns: Vec<String>,
    params: Params,
}

impl Assignments {
    fn set(&mut self, column: &str, value: Box<dyn ToSql>) {
        self.columns
            .push(format!("{column} = ?{}", self.params.len() + 1));
        self.params.push(value);
    }

    fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

const CATEGORY_COLUMNS: &str = "c.id, c.name, c.kind, c.icon, c.color, c.created_at";

fn conversion_error(idx: usize, raw: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        format!("unexpected value '{raw}'").into(),
    )
}

fn category_row(row: &Row, offset: usize) -> rusqlite::Result<Category> {
    let kind_str: String = row.get(offset + 2)?;
    let icon_str: String = row.get(offset + 3)?;
    let icon = Icon::parse(&icon_str).unwrap_or_else(|| {
        log::warn!("Unknown icon '{icon_str}', falling back to {}", Icon::default());
        Icon::default()
    });
    Ok(Category {
        id: Some(row.get(offset)?),
        name: row.get(offset + 1)?,
        kind: CategoryKind::parse(&kind_str)
            .ok_or_else(|| conversion_error(offset + 2, &kind_str))?,
        icon,
        color: row.get(offset + 4)?,
        created_at: row.get(offset + 5)?,
    })
}

fn joined_category(row: &Row, offset: usize) -> rusqlite::Result<Option<Category>> {
    let id: Option<i64> = row.get(offset)?;
    match id {
        Some(_) => Ok(Some(category_row(row, offset)?)),
        None => Ok(None),
    }
}

fn decimal_column(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw).map_err(|_| conversion_error(idx, &raw))
}

fn income_row(row: &Row) -> rusqlite::Result<Income> {
    let frequency: Option<String> = row.get(6)?;
    Ok(Income {
        id: Some(row.get(0)?),
        description: row.get(1)?,
        amount: decimal_column(row, 2)?,
        category_id: row.get(3)?,
        date: row.get(4)?,
        is_recurring: row.get(5)?,
        frequency: frequency.as_deref().and_then(Frequency::parse),
        created_at: row.get(7)?,
        category: joined_category(row, 8)?,
    })
}

fn expense_row(row: &Row) -> rusqlite::Result<Expense> {
    let method: String = row.get(6)?;
    Ok(Expense {
        id: Some(row.get(0)?),
        description: row.get(1)?,
        amount: decimal_column(row, 2)?,
        category_id: row.get(3)?,
        date: row.get(4)?,
        is_fixed: row.get(5)?,
        payment_method: PaymentMethod::parse(&method)
            .ok_or_else(|| conversion_error(6, &method))?,
        created_at: row.get(7)?,
        category: joined_category(row, 8)?,
    })
}

fn alert_row(row: &Row) -> rusqlite::Result<Alert> {
    Ok(Alert {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        amount: decimal_column(row, 2)?,
        due_day: row.get(3)?,
        category_id: row.get(4)?,
        is_active: row.get(5)?,
        last_notified_at: row.get(6)?,
        created_at: row.get(7)?,
        category: joined_category(row, 8)?,
    })
}

fn non_negative(what: &str, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(FinanceError::Invalid(format!(
            "{what} amount must not be negative (got {amount})"
        )));
    }
    Ok(())
}

fn non_blank(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FinanceError::Invalid(format!("{what} is empty")));
    }
    Ok(())
}

/// The authoritative record store. Every row carries the owning user and
/// every query is scoped by it; removing a category clears the reference
/// on incomes, expenses and alerts through `ON DELETE SET NULL`.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> anyhow::Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    /// A category reference must point at one of the user's own categories.
    fn ensure_category(&self, user: &UserId, category_id: Option<i64>) -> Result<()> {
        let Some(id) = category_id else {
            return Ok(());
        };
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1 AND user_id = ?2)",
            params![id, user.as_str()],
            |row| row.get(0),
        )?;
        if exists {
            Ok(())
        } else {
            Err(FinanceError::NotFound {
                collection: Collection::Categories,
                id,
            })
        }
    }

    fn ensure_exists(&self, collection: Collection, user: &UserId, id: i64) -> Result<()> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1 AND user_id = ?2)",
            collection.table()
        );
        let exists: bool = self
            .conn
            .query_row(&sql, params![id, user.as_str()], |row| row.get(0))?;
        if exists {
            Ok(())
        } else {
            Err(FinanceError::NotFound { collection, id })
        }
    }

    fn apply_update(
        &self,
        collection: Collection,
        user: &UserId,
        id: i64,
        mut assignments: Assignments,
    ) -> Result<()> {
        if assignments.is_empty() {
            return self.ensure_exists(collection, user, id);
        }
        let n = assignments.params.len();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{} AND user_id = ?{}",
            collection.table(),
            assignments.columns.join(", "),
            n + 1,
            n + 2
        );
        assignments.params.push(Box::new(id));
        assignments.params.push(Box::new(user.as_str().to_string()));
        let changed = self
            .conn
            .execute(&sql, param_refs(&assignments.params).as_slice())?;
        if changed == 0 {
            return Err(FinanceError::NotFound { collection, id });
        }
        log::debug!("Updated {collection} {id} ({} fields)", n);
        Ok(())
    }

    /// Removes one row owned by `user`. Deleting a category never fails
    /// because of rows that reference it.
    pub(crate) fn delete(&self, collection: Collection, user: &UserId, id: i64) -> Result<()> {
        let sql = format!(
            "DELETE FROM {} WHERE id = ?1 AND user_id = ?2",
            collection.table()
        );
        let changed = self.conn.execute(&sql, params![id, user.as_str()])?;
        if changed == 0 {
            return Err(FinanceError::NotFound { collection, id });
        }
        log::debug!("Deleted {collection} {id}");
        Ok(())
    }

    // ── Categories ────────────────────────────────────────────

    fn query_categories(
        &self,
        user: &UserId,
        filter: &Filter,
        id: Option<i64>,
    ) -> Result<Vec<Category>> {
        let mut sql =
            format!("SELECT {CATEGORY_COLUMNS} FROM categories c WHERE c.user_id = ?1");
        let mut param_values: Params = vec![Box::new(user.as_str().to_string())];
        if let Some(id) = id {
            push_condition(&mut sql, &mut param_values, "c.id =", Box::new(id));
        }
        if let Some(kind) = filter.kind {
            push_condition(&mut sql, &mut param_values, "c.kind =", Box::new(kind.as_str()));
        }
        sql.push_str(" ORDER BY c.name COLLATE NOCASE, c.id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs(&param_values).as_slice(), |row| {
            category_row(row, 0)
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn list_categories(&self, user: &UserId, filter: &Filter) -> Result<Vec<Category>> {
        self.query_categories(user, filter, None)
    }

    pub(crate) fn get_category(&self, user: &UserId, id: i64) -> Result<Option<Category>> {
        Ok(self
            .query_categories(user, &Filter::all(), Some(id))?
            .into_iter()
            .next())
    }

    pub(crate) fn insert_category(&self, user: &UserId, cat: &Category) -> Result<Category> {
        cat.validate()?;
        self.conn.execute(
            "INSERT INTO categories (user_id, name, kind, icon, color, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.as_str(),
                cat.name.trim(),
                cat.kind.as_str(),
                cat.icon.as_str(),
                cat.color,
                cat.created_at,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        log::debug!("Inserted category {id} '{}'", cat.name);
        self.get_category(user, id)?.ok_or(FinanceError::NotFound {
            collection: Collection::Categories,
            id,
        })
    }

    pub(crate) fn update_category(
        &self,
        user: &UserId,
        id: i64,
        patch: &CategoryPatch,
    ) -> Result<()> {
        let mut set = Assignments::default();
        if let Some(name) = &patch.name {
            non_blank("category name", name)?;
            set.set("name", Box::new(name.trim().to_string()));
        }
        if let Some(kind) = patch.kind {
            set.set("kind", Box::new(kind.as_str()));
        }
        if let Some(icon) = patch.icon {
            set.set("icon", Box::new(icon.as_str()));
        }
        if let Some(color) = &patch.color {
            if !is_valid_color(color) {
                return Err(FinanceError::Invalid(format!(
                    "invalid color '{color}', expected #rrggbb"
                )));
            }
            set.set("color", Box::new(color.clone()));
        }
        self.apply_update(Collection::Categories, user, id, set)
    }

    // ── Incomes ───────────────────────────────────────────────

    fn query_incomes(&self, user: &UserId, filter: &Filter, id: Option<i64>) -> Result<Vec<Income>> {
        let mut sql = format!(
            "SELECT i.id, i.description, i.amount, i.category_id, i.date, i.is_recurring,
                    i.frequency, i.created_at, {CATEGORY_COLUMNS}
             FROM incomes i LEFT JOIN categories c ON c.id = i.category_id
             WHERE i.user_id = ?1"
        );
        let mut param_values: Params = vec![Box::new(user.as_str().to_string())];
        if let Some(id) = id {
            push_condition(&mut sql, &mut param_values, "i.id =", Box::new(id));
        }
        if let Some(from) = filter.from {
            push_condition(&mut sql, &mut param_values, "i.date >=", Box::new(from));
        }
        if let Some(to) = filter.to {
            push_condition(&mut sql, &mut param_values, "i.date <=", Box::new(to));
        }
        if let Some(cid) = filter.category_id {
            push_condition(&mut sql, &mut param_values, "i.category_id =", Box::new(cid));
        }
        sql.push_str(" ORDER BY i.date DESC, i.id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs(&param_values).as_slice(), income_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn list_incomes(&self, user: &UserId, filter: &Filter) -> Result<Vec<Income>> {
        self.query_incomes(user, filter, None)
    }

    pub(crate) fn get_income(&self, user: &UserId, id: i64) -> Result<Option<Income>> {
        Ok(self
            .query_incomes(user, &Filter::all(), Some(id))?
            .into_iter()
            .next())
    }

    pub(crate) fn insert_income(&self, user: &UserId, income: &Income) -> Result<Income> {
        income.validate()?;
        self.ensure_category(user, income.category_id)?;
        self.conn.execute(
            "INSERT INTO incomes (user_id, description, amount, category_id, date, is_recurring, frequency, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user.as_str(),
                income.description,
                income.amount.to_string(),
                income.category_id,
                income.date,
                income.is_recurring,
                income.frequency.map(|f| f.as_str()),
                income.created_at,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        log::debug!("Inserted income {id} ({})", income.amount);
        self.get_income(user, id)?.ok_or(FinanceError::NotFound {
            collection: Collection::Incomes,
            id,
        })
    }

    pub(crate) fn update_income(&self, user: &UserId, id: i64, patch: &IncomePatch) -> Result<()> {
        let mut set = Assignments::default();
        if let Some(description) = &patch.description {
            set.set("description", Box::new(description.clone()));
        }
        if let Some(amount) = patch.amount {
            non_negative("income", amount)?;
            set.set("amount", Box::new(amount.to_string()));
        }
        if let Some(category_id) = patch.category_id {
            self.ensure_category(user, category_id)?;
            set.set("category_id", Box::new(category_id));
        }
        if let Some(date) = patch.date {
            set.set("date", Box::new(date));
        }
        if let Some(is_recurring) = patch.is_recurring {
            set.set("is_recurring", Box::new(is_recurring));
        }
        if let Some(frequency) = patch.frequency {
            set.set("frequency", Box::new(frequency.map(|f| f.as_str())));
        }
        self.apply_update(Collection::Incomes, user, id, set)
    }

    // ── Expenses ──────────────────────────────────────────────

    fn query_expenses(
        &self,
        user: &UserId,
        filter: &Filter,
        id: Option<i64>,
    ) -> Result<Vec<Expense>> {
        let mut sql = format!(
            "SELECT e.id, e.description, e.amount, e.category_id, e.date, e.is_fixed,
                    e.payment_method, e.created_at, {CATEGORY_COLUMNS}
             FROM expenses e LEFT JOIN categories c ON c.id = e.category_id
             WHERE e.user_id = ?1"
        );
        let mut param_values: Params = vec![Box::new(user.as_str().to_string())];
        if let Some(id) = id {
            push_condition(&mut sql, &mut param_values, "e.id =", Box::new(id));
        }
        if let Some(from) = filter.from {
            push_condition(&mut sql, &mut param_values, "e.date >=", Box::new(from));
        }
        if let Some(to) = filter.to {
            push_condition(&mut sql, &mut param_values, "e.date <=", Box::new(to));
        }
        if let Some(cid) = filter.category_id {
            push_condition(&mut sql, &mut param_values, "e.category_id =", Box::new(cid));
        }
        sql.push_str(" ORDER BY e.date DESC, e.id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs(&param_values).as_slice(), expense_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn list_expenses(&self, user: &UserId, filter: &Filter) -> Result<Vec<Expense>> {
        self.query_expenses(user, filter, None)
    }

    pub(crate) fn get_expense(&self, user: &UserId, id: i64) -> Result<Option<Expense>> {
        Ok(self
            .query_expenses(user, &Filter::all(), Some(id))?
            .into_iter()
            .next())
    }

    pub(crate) fn insert_expense(&self, user: &UserId, expense: &Expense) -> Result<Expense> {
        expense.validate()?;
        self.ensure_category(user, expense.category_id)?;
        self.conn.execute(
            "INSERT INTO expenses (user_id, description, amount, category_id, date, is_fixed, payment_method, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user.as_str(),
                expense.description,
                expense.amount.to_string(),
                expense.category_id,
                expense.date,
                expense.is_fixed,
                expense.payment_method.as_str(),
                expense.created_at,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        log::debug!("Inserted expense {id} ({})", expense.amount);
        self.get_expense(user, id)?.ok_or(FinanceError::NotFound {
            collection: Collection::Expenses,
            id,
        })
    }

    pub(crate) fn update_expense(&self, user: &UserId, id: i64, patch: &ExpensePatch) -> Result<()> {
        let mut set = Assignments::default();
        if let Some(description) = &patch.description {
            set.set("description", Box::new(description.clone()));
        }
        if let Some(amount) = patch.amount {
            non_negative("expense", amount)?;
            set.set("amount", Box::new(amount.to_string()));
        }
        if let Some(category_id) = patch.category_id {
            self.ensure_category(user, category_id)?;
            set.set("category_id", Box::new(category_id));
        }
        if let Some(date) = patch.date {
            set.set("date", Box::new(date));
        }
        if let Some(is_fixed) = patch.is_fixed {
            set.set("is_fixed", Box::new(is_fixed));
        }
        if let Some(method) = patch.payment_method {
            set.set("payment_method", Box::new(method.as_str()));
        }
        self.apply_update(Collection::Expenses, user, id, set)
    }

    // ── Alerts ────────────────────────────────────────────────

    fn query_alerts(&self, user: &UserId, filter: &Filter, id: Option<i64>) -> Result<Vec<Alert>> {
        let mut sql = format!(
            "SELECT a.id, a.name, a.amount, a.due_day, a.category_id, a.is_active,
                    a.last_notified_at, a.created_at, {CATEGORY_COLUMNS}
             FROM alerts a LEFT JOIN categories c ON c.id = a.category_id
             WHERE a.user_id = ?1"
        );
        let mut param_values: Params = vec![Box::new(user.as_str().to_string())];
        if let Some(id) = id {
            push_condition(&mut sql, &mut param_values, "a.id =", Box::new(id));
        }
        if let Some(cid) = filter.category_id {
            push_condition(&mut sql, &mut param_values, "a.category_id =", Box::new(cid));
        }
        if filter.active_only {
            sql.push_str(" AND a.is_active = 1");
        }
        sql.push_str(" ORDER BY a.due_day, a.id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs(&param_values).as_slice(), alert_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn list_alerts(&self, user: &UserId, filter: &Filter) -> Result<Vec<Alert>> {
        self.query_alerts(user, filter, None)
    }

    pub(crate) fn get_alert(&self, user: &UserId, id: i64) -> Result<Option<Alert>> {
        Ok(self
            .query_alerts(user, &Filter::all(), Some(id))?
            .into_iter()
            .next())
    }

    pub(crate) fn insert_alert(&self, user: &UserId, alert: &Alert) -> Result<Alert> {
        alert.validate()?;
        self.ensure_category(user, alert.category_id)?;
        self.conn.execute(
            "INSERT INTO alerts (user_id, name, amount, due_day, category_id, is_active, last_notified_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user.as_str(),
                alert.name,
                alert.amount.to_string(),
                alert.due_day,
                alert.category_id,
                alert.is_active,
                alert.last_notified_at,
                alert.created_at,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        log::debug!("Inserted alert {id} '{}' (day {})", alert.name, alert.due_day);
        self.get_alert(user, id)?.ok_or(FinanceError::NotFound {
            collection: Collection::Alerts,
            id,
        })
    }

    pub(crate) fn update_alert(&self, user: &UserId, id: i64, patch: &AlertPatch) -> Result<()> {
        let mut set = Assignments::default();
        if let Some(name) = &patch.name {
            non_blank("alert name", name)?;
            set.set("name", Box::new(name.clone()));
        }
        if let Some(amount) = patch.amount {
            non_negative("alert", amount)?;
            set.set("amount", Box::new(amount.to_string()));
        }
        if let Some(due_day) = patch.due_day {
            validate_due_day(due_day)?;
            set.set("due_day", Box::new(due_day));
        }
        if let Some(category_id) = patch.category_id {
            self.ensure_category(user, category_id)?;
            set.set("category_id", Box::new(category_id));
        }
        if let Some(is_active) = patch.is_active {
            set.set("is_active", Box::new(is_active));
        }
        if let Some(notified) = &patch.last_notified_at {
            set.set("last_notified_at", Box::new(notified.clone()));
        }
        self.apply_update(Collection::Alerts, user, id, set)
    }
}
