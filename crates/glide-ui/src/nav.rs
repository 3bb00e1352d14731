//! Sign-in state and app switching for a navigation bar.
//!
//! Nothing here talks to an auth service. The host passes the current [`Session`] into every
//! render and event call and acts on the returned [`NavAction`]s.
use crate::data::initials;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::render;
use crate::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Widget;

pub const DEFAULT_ACCOUNTS_URL: &str = "http://localhost:3001";

/// Where the accounts app lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountsConfig {
    pub base_url: String,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ACCOUNTS_URL.to_string(),
        }
    }
}

impl AccountsConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn join(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }

    pub fn login_url(&self) -> String {
        self.join("login")
    }

    pub fn manage_url(&self) -> String {
        self.join("manage")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct User {
    pub name: Option<String>,
    pub email: String,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
        }
    }

    /// Name initials, else the first two characters of the email, uppercased.
    pub fn initials(&self) -> String {
        match self.name.as_deref().map(initials).filter(|i| !i.is_empty()) {
            Some(i) => i,
            None => self.email.chars().take(2).flat_map(char::to_uppercase).collect(),
        }
    }
}

/// An app the signed-in user may switch to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppItem {
    pub name: String,
    pub href: String,
    pub icon: Option<String>,
    pub disabled: bool,
}

impl AppItem {
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
            ..Self::default()
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Auth state supplied by the host.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub loading: bool,
    /// Apps the user has access to.
    pub apps: Vec<AppItem>,
    pub apps_loading: bool,
}

impl Session {
    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn apps(mut self, apps: Vec<AppItem>) -> Self {
        self.apps = apps;
        self
    }

    /// Apps to offer: none until a user is present and access has loaded.
    pub fn accessible_apps(&self) -> &[AppItem] {
        if self.user.is_none() || self.apps_loading {
            return &[];
        }
        &self.apps
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavAction {
    None,
    Redraw,
    Navigate(String),
    /// The host should sign the user out, then call [`AuthNavControls::sign_out_finished`].
    SignOutRequested,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Control {
    SignIn,
    Apps,
    Account,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Menu {
    Apps { cursor: usize },
    Account { cursor: usize },
}

const ACCOUNT_ENTRIES: [&str; 2] = ["My account", "Sign out"];

pub struct AuthNavControls {
    config: AccountsConfig,
    /// Signing out of a protected page sends the user to the login page.
    requires_auth: bool,
    signing_out: bool,
    focus: usize,
    menu: Option<Menu>,
    controls: Vec<(Rect, Control)>,
    menu_rows: Vec<(Rect, usize)>,
}

impl AuthNavControls {
    pub fn new(config: AccountsConfig) -> Self {
        Self {
            config,
            requires_auth: false,
            signing_out: false,
            focus: 0,
            menu: None,
            controls: Vec::new(),
            menu_rows: Vec::new(),
        }
    }

    pub fn requires_auth(mut self, requires_auth: bool) -> Self {
        self.requires_auth = requires_auth;
        self
    }

    pub fn config(&self) -> &AccountsConfig {
        &self.config
    }

    pub fn is_signing_out(&self) -> bool {
        self.signing_out
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu.is_some()
    }

    /// Completes a sign out started by [`NavAction::SignOutRequested`].
    pub fn sign_out_finished(&mut self) -> NavAction {
        if self.requires_auth {
            return NavAction::Navigate(self.config.login_url());
        }
        self.signing_out = false;
        NavAction::Redraw
    }

    fn visible_controls(session: &Session) -> Vec<Control> {
        if session.user.is_none() {
            return vec![Control::SignIn];
        }
        let mut controls = Vec::new();
        if !session.accessible_apps().is_empty() {
            controls.push(Control::Apps);
        }
        controls.push(Control::Account);
        controls
    }

    /// Width the controls need on one row.
    pub fn width(&self, session: &Session) -> u16 {
        self.labels(session)
            .iter()
            .map(|(label, _)| render::display_width(label) as u16 + 1)
            .sum::<u16>()
            .saturating_sub(1)
    }

    fn labels(&self, session: &Session) -> Vec<(String, Option<Control>)> {
        if session.loading {
            return vec![("( … )".to_string(), None)];
        }
        if self.signing_out {
            return vec![("[Signing out...]".to_string(), None)];
        }
        Self::visible_controls(session)
            .into_iter()
            .map(|c| {
                let label = match c {
                    Control::SignIn => "[Sign In]".to_string(),
                    Control::Apps => "[Apps ▾]".to_string(),
                    Control::Account => {
                        let initials =
                            session.user.as_ref().map(User::initials).unwrap_or_default();
                        format!(" {initials} ")
                    }
                };
                (label, Some(c))
            })
            .collect()
    }

    fn activate(&mut self, control: Control, session: &Session) -> NavAction {
        match control {
            Control::SignIn => NavAction::Navigate(self.config.login_url()),
            Control::Apps => {
                let first = session
                    .accessible_apps()
                    .iter()
                    .position(|a| !a.disabled)
                    .unwrap_or(0);
                self.menu = Some(Menu::Apps { cursor: first });
                NavAction::Redraw
            }
            Control::Account => {
                self.menu = Some(Menu::Account { cursor: 0 });
                NavAction::Redraw
            }
        }
    }

    fn choose(&mut self, menu: Menu, session: &Session) -> NavAction {
        match menu {
            Menu::Apps { cursor } => match session.accessible_apps().get(cursor) {
                Some(app) if !app.disabled => {
                    self.menu = None;
                    NavAction::Navigate(app.href.clone())
                }
                _ => NavAction::None,
            },
            Menu::Account { cursor: 0 } => {
                self.menu = None;
                NavAction::Navigate(self.config.manage_url())
            }
            Menu::Account { .. } => {
                self.menu = None;
                self.signing_out = true;
                tracing::debug!("sign out requested");
                NavAction::SignOutRequested
            }
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent, session: &Session) -> NavAction {
        if session.loading || self.signing_out {
            return NavAction::None;
        }
        if session.user.is_none() {
            self.menu = None;
        }
        if let Some(menu) = self.menu {
            return self.handle_menu(menu, event, session);
        }
        let controls = Self::visible_controls(session);
        self.focus = self.focus.min(controls.len().saturating_sub(1));
        match event {
            InputEvent::Key(key) => match key.code {
                KeyCode::Left | KeyCode::BackTab => {
                    self.focus = self.focus.saturating_sub(1);
                    NavAction::Redraw
                }
                KeyCode::Right | KeyCode::Tab => {
                    self.focus = (self.focus + 1).min(controls.len().saturating_sub(1));
                    NavAction::Redraw
                }
                _ if key.is_activate() => match controls.get(self.focus) {
                    Some(&c) => self.activate(c, session),
                    None => NavAction::None,
                },
                _ => NavAction::None,
            },
            InputEvent::Mouse(m) if m.is_click() => {
                let hit = self
                    .controls
                    .iter()
                    .position(|(r, _)| r.contains((m.x, m.y).into()));
                match hit {
                    Some(i) => {
                        let control = self.controls[i].1;
                        self.focus = controls.iter().position(|c| *c == control).unwrap_or(0);
                        self.activate(control, session)
                    }
                    None => NavAction::None,
                }
            }
            _ => NavAction::None,
        }
    }

    fn handle_menu(&mut self, menu: Menu, event: &InputEvent, session: &Session) -> NavAction {
        let len = match menu {
            Menu::Apps { .. } => session.accessible_apps().len(),
            Menu::Account { .. } => ACCOUNT_ENTRIES.len(),
        };
        if len == 0 {
            self.menu = None;
            return NavAction::Redraw;
        }
        let cursor = match menu {
            Menu::Apps { cursor } | Menu::Account { cursor } => cursor.min(len - 1),
        };
        let with_cursor = |cursor| match menu {
            Menu::Apps { .. } => Menu::Apps { cursor },
            Menu::Account { .. } => Menu::Account { cursor },
        };
        match event {
            InputEvent::Key(key) => match key.code {
                KeyCode::Esc => {
                    self.menu = None;
                    NavAction::Redraw
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.menu = Some(with_cursor(cursor.checked_sub(1).unwrap_or(len - 1)));
                    NavAction::Redraw
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.menu = Some(with_cursor((cursor + 1) % len));
                    NavAction::Redraw
                }
                _ if key.is_activate() => self.choose(with_cursor(cursor), session),
                _ => NavAction::None,
            },
            InputEvent::Mouse(m) if m.is_click() => {
                let hit = self
                    .menu_rows
                    .iter()
                    .find(|(r, _)| r.contains((m.x, m.y).into()))
                    .map(|(_, i)| *i);
                match hit {
                    Some(i) => self.choose(with_cursor(i), session),
                    None => {
                        self.menu = None;
                        NavAction::Redraw
                    }
                }
            }
            _ => NavAction::None,
        }
    }

    /// Paints the controls right-aligned on the first row of `area`, and any open menu below.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme, session: &Session) {
        self.controls.clear();
        self.menu_rows.clear();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let labels = self.labels(session);
        let total = self.width(session).min(area.width);
        let mut x = area.right() - total;
        let mut index = 0;
        for (label, control) in labels {
            let style = match control {
                None => theme.text_muted.add_modifier(Modifier::DIM),
                Some(Control::Account) => {
                    theme.accent.add_modifier(Modifier::REVERSED | Modifier::BOLD)
                }
                Some(_) => theme.text_primary,
            };
            let focused = control.is_some() && index == self.focus && self.menu.is_none();
            let style = if focused { style.patch(theme.focus) } else { style };
            let w = render::render_str_clipped(x, area.y, area.right() - x, buf, &label, style);
            if let Some(c) = control {
                self.controls.push((Rect::new(x, area.y, w, 1), c));
                index += 1;
            }
            x = (x + w + 1).min(area.right());
        }

        match self.menu {
            Some(Menu::Apps { cursor }) => {
                let entries: Vec<(String, bool)> = session
                    .accessible_apps()
                    .iter()
                    .map(|a| {
                        let label = match &a.icon {
                            Some(icon) => format!("{icon} {}", a.name),
                            None => a.name.clone(),
                        };
                        (label, a.disabled)
                    })
                    .collect();
                self.render_menu(area, buf, theme, &[], &entries, cursor);
            }
            Some(Menu::Account { cursor }) => {
                let user = session.user.as_ref();
                let mut header = Vec::new();
                if let Some(name) = user.and_then(|u| u.name.clone()) {
                    header.push(name);
                }
                if let Some(email) = user.map(|u| u.email.clone()) {
                    header.push(email);
                }
                let entries: Vec<(String, bool)> =
                    ACCOUNT_ENTRIES.iter().map(|e| (e.to_string(), false)).collect();
                self.render_menu(area, buf, theme, &header, &entries, cursor);
            }
            None => {}
        }
    }

    fn render_menu(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        theme: &Theme,
        header: &[String],
        entries: &[(String, bool)],
        cursor: usize,
    ) {
        let header_h = if header.is_empty() { 0 } else { header.len() as u16 + 1 };
        let w = header
            .iter()
            .chain(entries.iter().map(|(l, _)| l))
            .map(|l| render::display_width(l) as u16)
            .max()
            .unwrap_or(0)
            .saturating_add(4)
            .min(area.width);
        let h = (header_h + entries.len() as u16 + 2).min(area.height.saturating_sub(1));
        if h < 3 {
            return;
        }
        let popup = Rect::new(area.right() - w, area.y + 1, w, h);
        Clear.render(popup, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut y = inner.y;
        for (i, line) in header.iter().enumerate() {
            if y >= inner.bottom() {
                return;
            }
            let style = if i == 0 {
                theme.text_primary.add_modifier(Modifier::BOLD)
            } else {
                theme.text_muted
            };
            let width = inner.width.saturating_sub(1);
            render::render_str_clipped(inner.x + 1, y, width, buf, line, style);
            y += 1;
        }
        if header_h > 0 && y < inner.bottom() {
            let rule = "─".repeat(inner.width as usize);
            render::render_str_clipped(inner.x, y, inner.width, buf, &rule, theme.border);
            y += 1;
        }
        for (i, (label, disabled)) in entries.iter().enumerate() {
            if y >= inner.bottom() {
                break;
            }
            let row = Rect::new(inner.x, y, inner.width, 1);
            let mut style = if *disabled {
                theme.text_muted.add_modifier(Modifier::DIM)
            } else if header_h > 0 && i == ACCOUNT_ENTRIES.len() - 1 {
                theme.danger
            } else {
                theme.text_primary
            };
            if i == cursor {
                buf.set_style(row, theme.focus);
                style = style.patch(theme.focus);
            }
            let width = inner.width.saturating_sub(1);
            render::render_str_clipped(inner.x + 1, y, width, buf, label, style);
            self.menu_rows.push((row, i));
            y += 1;
        }
    }
}
