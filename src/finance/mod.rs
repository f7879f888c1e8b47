//! Session-scoped cache of the four collections.
//!
//! Every mutation goes to the store first and is followed by a re-fetch
//! of the collection it touched, so the cache always mirrors what the
//! store returned last.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::alerts::{self, Proximity};
use crate::db::{Database, Filter};
use crate::error::{FinanceError, Result};
use crate::models::*;
use crate::report::{MonthRange, MonthlyReport};
use crate::session::{Session, UserId};

/// Upper bound on identical records submitted by one quick entry.
pub(crate) const MAX_QUICK_TIMES: u32 = 10;

/// A quick expense: one category, one amount, submitted `times` times.
#[derive(Debug, Clone)]
pub(crate) struct QuickEntry {
    pub(crate) category_id: i64,
    pub(crate) amount: Decimal,
    pub(crate) times: u32,
    pub(crate) payment_method: PaymentMethod,
    /// Falls back to the category name when blank.
    pub(crate) description: Option<String>,
    pub(crate) date: NaiveDate,
}

#[derive(Debug, Default)]
pub(crate) struct Finance {
    session: Session,
    pub(crate) categories: Vec<Category>,
    pub(crate) incomes: Vec<Income>,
    pub(crate) expenses: Vec<Expense>,
    pub(crate) alerts: Vec<Alert>,
    loading: bool,
}

fn logged<T>(action: &str, result: Result<T>) -> Result<T> {
    result.inspect_err(|e| log::error!("Failed to {action}: {e}"))
}

impl Finance {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.loading
    }

    fn user(&self) -> Result<UserId> {
        self.session.require_user().cloned()
    }

    /// Reloads all four collections. Without a signed-in user the cache is
    /// simply emptied.
    pub(crate) fn refresh(&mut self, db: &Database) -> Result<()> {
        let Some(user) = self.session.user().cloned() else {
            self.categories.clear();
            self.incomes.clear();
            self.expenses.clear();
            self.alerts.clear();
            return Ok(());
        };

        self.loading = true;
        let result = self.fetch_all(db, &user);
        self.loading = false;
        logged("refresh data", result)?;
        log::debug!(
            "Loaded {} categories, {} incomes, {} expenses, {} alerts",
            self.categories.len(),
            self.incomes.len(),
            self.expenses.len(),
            self.alerts.len()
        );
        Ok(())
    }

    fn fetch_all(&mut self, db: &Database, user: &UserId) -> Result<()> {
        self.categories = db.list_categories(user, &Filter::all())?;
        self.incomes = db.list_incomes(user, &Filter::all())?;
        self.expenses = db.list_expenses(user, &Filter::all())?;
        self.alerts = db.list_alerts(user, &Filter::all())?;
        Ok(())
    }

    fn refetch(&mut self, db: &Database, collection: Collection) -> Result<()> {
        let user = self.user()?;
        let filter = Filter::all();
        let result = match collection {
            Collection::Categories => db
                .list_categories(&user, &filter)
                .map(|rows| self.categories = rows),
            Collection::Incomes => db.list_incomes(&user, &filter).map(|rows| self.incomes = rows),
            Collection::Expenses => db
                .list_expenses(&user, &filter)
                .map(|rows| self.expenses = rows),
            Collection::Alerts => db.list_alerts(&user, &filter).map(|rows| self.alerts = rows),
        };
        logged(&format!("reload {}", collection.table()), result)
    }

    /// Runs `op` for the signed-in user, then re-fetches `collection`
    /// whether or not `op` succeeded.
    fn mutate<T>(
        &mut self,
        db: &Database,
        collection: Collection,
        action: &str,
        op: impl FnOnce(&UserId) -> Result<T>,
    ) -> Result<T> {
        let user = self.user()?;
        let result = logged(action, op(&user));
        self.refetch_after(db, collection, result)
    }

    /// Re-fetches `collection` after a write. A failed write wins over a
    /// failed reload; the reload error is already logged.
    fn refetch_after<T>(&mut self, db: &Database, collection: Collection, result: Result<T>) -> Result<T> {
        let reloaded = self.refetch(db, collection);
        let value = result?;
        reloaded?;
        Ok(value)
    }

    /// Runs a read straight against the store, bypassing the cache.
    fn query<T>(&self, action: &str, op: impl FnOnce(&UserId) -> Result<T>) -> Result<T> {
        let user = self.user()?;
        logged(action, op(&user))
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn add_category(&mut self, db: &Database, category: &Category) -> Result<Category> {
        self.mutate(db, Collection::Categories, "add category", |user| {
            db.insert_category(user, category)
        })
    }

    pub(crate) fn update_category(
        &mut self,
        db: &Database,
        id: i64,
        patch: &CategoryPatch,
    ) -> Result<()> {
        let user = self.user()?;
        let result = logged("update category", db.update_category(&user, id, patch));
        // Joined category rows on the other collections are stale too.
        self.refresh(db)?;
        result
    }

    /// Removes a category. Rows that referenced it stay, without a
    /// category, so every collection is reloaded.
    pub(crate) fn delete_category(&mut self, db: &Database, id: i64) -> Result<()> {
        let user = self.user()?;
        let result = logged(
            "delete category",
            db.delete(Collection::Categories, &user, id),
        );
        self.refresh(db)?;
        result
    }


    // ── Incomes ───────────────────────────────────────────────

    pub(crate) fn add_income(&mut self, db: &Database, income: &Income) -> Result<Income> {
        self.mutate(db, Collection::Incomes, "add income", |user| {
            db.insert_income(user, income)
        })
    }

    pub(crate) fn update_income(&mut self, db: &Database, id: i64, patch: &IncomePatch) -> Result<()> {
        self.mutate(db, Collection::Incomes, "update income", |user| {
            db.update_income(user, id, patch)
        })
    }

    pub(crate) fn delete_income(&mut self, db: &Database, id: i64) -> Result<()> {
        self.mutate(db, Collection::Incomes, "delete income", |user| {
            db.delete(Collection::Incomes, user, id)
        })
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn add_expense(&mut self, db: &Database, expense: &Expense) -> Result<Expense> {
        self.mutate(db, Collection::Expenses, "add expense", |user| {
            db.insert_expense(user, expense)
        })
    }

    pub(crate) fn update_expense(
        &mut self,
        db: &Database,
        id: i64,
        patch: &ExpensePatch,
    ) -> Result<()> {
        self.mutate(db, Collection::Expenses, "update expense", |user| {
            db.update_expense(user, id, patch)
        })
    }

    pub(crate) fn delete_expense(&mut self, db: &Database, id: i64) -> Result<()> {
        self.mutate(db, Collection::Expenses, "delete expense", |user| {
            db.delete(Collection::Expenses, user, id)
        })
    }

    /// Flips the fixed flag of a cached expense. Returns the new value.
    pub(crate) fn toggle_fixed(&mut self, db: &Database, id: i64) -> Result<bool> {
        let current = self
            .expenses
            .iter()
            .find(|e| e.id == Some(id))
            .map(|e| e.is_fixed)
            .ok_or(FinanceError::NotFound {
                collection: Collection::Expenses,
                id,
            })?;
        self.update_expense(db, id, &ExpensePatch::fixed(!current))?;
        Ok(!current)
    }

    /// Submits `entry.times` identical expenses (clamped to
    /// `1..=MAX_QUICK_TIMES`). Each is inserted on its own: earlier
    /// successes stay stored when a later one fails, and the first error
    /// is returned after the expenses are reloaded.
    pub(crate) fn quick_add_expense(&mut self, db: &Database, entry: &QuickEntry) -> Result<usize> {
        let user = self.user()?;
        let description = match entry.description.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => Category::find_by_id(&self.categories, entry.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
        };
        let mut expense = Expense::new(description, entry.amount, entry.date);
        expense.category_id = Some(entry.category_id);
        expense.payment_method = entry.payment_method;

        let times = entry.times.clamp(1, MAX_QUICK_TIMES);
        let mut inserted = 0;
        let mut first_error = None;
        for _ in 0..times {
            match logged("add quick expense", db.insert_expense(&user, &expense)) {
                Ok(_) => inserted += 1,
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        let result = match first_error {
            Some(e) => Err(e),
            None => Ok(inserted),
        };
        self.refetch_after(db, Collection::Expenses, result)
    }

    // ── Alerts ────────────────────────────────────────────────

    pub(crate) fn add_alert(&mut self, db: &Database, alert: &Alert) -> Result<Alert> {
        self.mutate(db, Collection::Alerts, "add alert", |user| {
            db.insert_alert(user, alert)
        })
    }

    pub(crate) fn update_alert(&mut self, db: &Database, id: i64, patch: &AlertPatch) -> Result<()> {
        self.mutate(db, Collection::Alerts, "update alert", |user| {
            db.update_alert(user, id, patch)
        })
    }

    pub(crate) fn delete_alert(&mut self, db: &Database, id: i64) -> Result<()> {
        self.mutate(db, Collection::Alerts, "delete alert", |user| {
            db.delete(Collection::Alerts, user, id)
        })
    }

    /// Pauses or resumes a cached alert. Returns the new active state.
    pub(crate) fn toggle_alert(&mut self, db: &Database, id: i64) -> Result<bool> {
        let current = self
            .alerts
            .iter()
            .find(|a| a.id == Some(id))
            .map(|a| a.is_active)
            .ok_or(FinanceError::NotFound {
                collection: Collection::Alerts,
                id,
            })?;
        self.update_alert(db, id, &AlertPatch::active(!current))?;
        Ok(!current)
    }

    pub(crate) fn mark_alert_notified(&mut self, db: &Database, id: i64) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        self.update_alert(db, id, &AlertPatch::notified_at(now))
    }

    /// Creates a monthly alert mirroring a cached expense.
    pub(crate) fn create_alert_from_expense(&mut self, db: &Database, expense_id: i64) -> Result<Alert> {
        let alert = self
            .expenses
            .iter()
            .find(|e| e.id == Some(expense_id))
            .map(alerts::alert_for_expense)
            .ok_or(FinanceError::NotFound {
                collection: Collection::Expenses,
                id: expense_id,
            })?;
        self.add_alert(db, &alert)
    }

    /// Fixed expenses in the month of `today` that no alert covers yet.
    pub(crate) fn suggest_alerts(&self, today: NaiveDate) -> Vec<&Expense> {
        alerts::fixed_without_alert(&self.expenses, &self.alerts, &MonthRange::containing(today))
    }

    pub(crate) fn upcoming_alerts(&self, today: NaiveDate, window: u32) -> Vec<Proximity<'_>> {
        alerts::upcoming(&self.alerts, today.day(), window)
    }

    // ── Filtered store reads ──────────────────────────────────

    pub(crate) fn categories_of_kind(&self, db: &Database, kind: CategoryKind) -> Result<Vec<Category>> {
        self.query("list categories", |user| {
            db.list_categories(user, &Filter::of_kind(kind))
        })
    }

    pub(crate) fn active_alerts(&self, db: &Database) -> Result<Vec<Alert>> {
        self.query("list active alerts", |user| {
            db.list_alerts(user, &Filter::active())
        })
    }

    /// Incomes and expenses dated within `month`, newest first.
    pub(crate) fn month_movements(
        &self,
        db: &Database,
        month: &MonthRange,
    ) -> Result<(Vec<Income>, Vec<Expense>)> {
        let filter = Filter::between(month.start, month.end);
        let incomes = self.query("list incomes", |user| db.list_incomes(user, &filter))?;
        let expenses = self.query("list expenses", |user| db.list_expenses(user, &filter))?;
        Ok((incomes, expenses))
    }

    // ── Derived ───────────────────────────────────────────────

    pub(crate) fn report(&self, month: MonthRange) -> MonthlyReport<'_> {
        MonthlyReport::build(&self.incomes, &self.expenses, month)
    }
}
