use anyhow::Result;
use chrono::{Local, NaiveDate};

use crate::db::Database;
use crate::finance::Finance;
use crate::prefs::Prefs;
use crate::report::MonthRange;
use crate::session::Session;
use crate::ui::util::clamp_index;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Alerts,
    Reports,
    Categories,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Alerts, Self::Reports, Self::Categories]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Alerts => write!(f, "Alerts"),
            Self::Reports => write!(f, "Reports"),
            Self::Categories => write!(f, "Categories"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteAlert { id: i64, name: String },
    DeleteCategory { id: i64, name: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) show_welcome: bool,
    pub(crate) month: MonthRange,
    pub(crate) today: NaiveDate,

    pub(crate) finance: Finance,
    pub(crate) prefs: Prefs,

    // Alerts
    pub(crate) alert_index: usize,
    pub(crate) alert_scroll: usize,

    // Categories
    pub(crate) category_index: usize,
    pub(crate) category_scroll: usize,

    // Reports
    pub(crate) report_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(session: Session, prefs: Prefs) -> Self {
        let today = Local::now().date_naive();
        let show_welcome = session
            .user()
            .is_some_and(|user| !prefs.has_seen_welcome(user));

        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            show_welcome,
            month: MonthRange::containing(today),
            today,

            finance: Finance::new(session),
            prefs,

            alert_index: 0,
            alert_scroll: 0,

            category_index: 0,
            category_scroll: 0,

            report_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.today = Local::now().date_naive();
        self.finance.refresh(db)?;
        self.clamp_cursors();
        Ok(())
    }

    pub(crate) fn clamp_cursors(&mut self) {
        clamp_index(
            &mut self.alert_index,
            &mut self.alert_scroll,
            self.finance.alerts.len(),
        );
        clamp_index(
            &mut self.category_index,
            &mut self.category_scroll,
            self.finance.categories.len(),
        );
    }

    pub(crate) fn dismiss_welcome(&mut self) {
        if let Some(user) = self.finance.session().user() {
            self.prefs.mark_welcome_seen(user);
        }
        self.show_welcome = false;
    }

    pub(crate) fn set_month(&mut self, month: MonthRange) {
        self.month = month;
        self.report_scroll = 0;
        self.set_status(format!("Month: {}", month.title()));
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
