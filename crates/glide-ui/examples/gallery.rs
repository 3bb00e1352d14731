use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use glide_ui::big_number::BigNumberCollection;
use glide_ui::big_number::BigNumberCollectionProps;
use glide_ui::big_number::BigNumberItem;
use glide_ui::card::CardCollection;
use glide_ui::card::CardCollectionProps;
use glide_ui::card::CardItem;
use glide_ui::card::CardOptions;
use glide_ui::crossterm_input::input_event_from_crossterm;
use glide_ui::data::DynamicRow;
use glide_ui::data::Value;
use glide_ui::datagrid::ColumnDefinition;
use glide_ui::datagrid::ColumnType;
use glide_ui::datagrid::DataGrid;
use glide_ui::datagrid::DataGridAction;
use glide_ui::datagrid::DataGridOptions;
use glide_ui::fields::FieldItemData;
use glide_ui::fields::FieldOption;
use glide_ui::fields::FieldType;
use glide_ui::fields::Fields;
use glide_ui::fields::FieldsAction;
use glide_ui::fields::FieldsOptions;
use glide_ui::input::InputEvent;
use glide_ui::input::KeyCode;
use glide_ui::item::ItemAction;
use glide_ui::list::ListAction;
use glide_ui::list::ListCollection;
use glide_ui::list::ListCollectionProps;
use glide_ui::list::ListItem;
use glide_ui::list::MenuEntry;
use glide_ui::nav::AccountsConfig;
use glide_ui::nav::AppItem;
use glide_ui::nav::AuthNavControls;
use glide_ui::nav::NavAction;
use glide_ui::nav::Session;
use glide_ui::nav::User;
use glide_ui::table::TableAction;
use glide_ui::table::TableCollection;
use glide_ui::table::TableCollectionOptions;
use glide_ui::table::TableColumn;
use glide_ui::tabs::TabItem;
use glide_ui::tabs::TabsAction;
use glide_ui::tabs::TabsContainer;
use glide_ui::tabs::TabsOptions;
use glide_ui::theme::Theme;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Span;
use std::io;
use std::time::Duration;

#[derive(Clone, Debug)]
struct Invoice {
    id: u64,
    customer: String,
    status: String,
    amount: f64,
}

struct Gallery {
    tabs: TabsContainer,
    cards: CardCollection,
    list: ListCollection,
    numbers: BigNumberCollection,
    table: TableCollection<Invoice>,
    grid: DataGrid<DynamicRow>,
    fields: Fields,
    nav: AuthNavControls,
    session: Session,
    status: String,
}

fn main() -> io::Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::default();
    let mut gallery = Gallery::new();

    let res = run(&mut terminal, &theme, &mut gallery);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    theme: &Theme,
    gallery: &mut Gallery,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            gallery.render(area, f.buffer_mut(), theme);
        })?;

        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Some(ev) = input_event_from_crossterm(crossterm::event::read()?) else {
            continue;
        };
        if let InputEvent::Key(key) = &ev
            && (key.code == KeyCode::Char('q') || key.code == KeyCode::Esc)
            && !gallery.is_editing()
        {
            return Ok(());
        }
        gallery.handle_event(&ev);
    }
}

impl Gallery {
    fn new() -> Self {
        let tabs = TabsContainer::new(
            [
                ("cards", "Cards"),
                ("list", "List"),
                ("numbers", "Big numbers"),
                ("table", "Table"),
                ("grid", "Data grid"),
                ("fields", "Fields"),
                ("nav", "Nav"),
            ]
            .into_iter()
            .map(|(id, label)| TabItem::new(id, label))
            .collect(),
            TabsOptions {
                draggable: true,
                ..Default::default()
            },
        );

        let cards = CardCollection::new(
            vec![
                CardItem::new("Ship faster")
                    .description("Deploy to production in minutes.")
                    .meta("Guide")
                    .href("/guides/ship"),
                CardItem::new("Scale")
                    .description("Capacity grows with your traffic.")
                    .meta("Feature"),
                CardItem::new("Observe")
                    .description("Logs and traces in one place.")
                    .meta("Feature"),
            ],
            CardCollectionProps {
                card: CardOptions {
                    clickable: true,
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        let list = ListCollection::new(
            vec![
                ListItem::new("Quarterly report")
                    .description("Revenue and churn for Q3")
                    .meta("2 days ago")
                    .href("/reports/q3")
                    .action(MenuEntry::new("Rename"))
                    .action(MenuEntry::new("Archive")),
                ListItem::new("Onboarding checklist")
                    .description("Steps for new teammates")
                    .meta("1 week ago")
                    .on_click(),
                ListItem::new("Incident notes").meta("Yesterday"),
            ],
            ListCollectionProps::default(),
        );

        let numbers = BigNumberCollection::new(
            vec![
                BigNumberItem::new("12,480").label("Active users").prefix("~"),
                BigNumberItem::new(98).label("Uptime").suffix("%"),
                BigNumberItem::new("4.2k").label("Revenue").prefix("$"),
                BigNumberItem::new(17).label("Open incidents"),
            ],
            BigNumberCollectionProps::default(),
        );

        let invoices = vec![
            invoice(1, "Ada Lovelace", "paid", 1250.0),
            invoice(2, "Grace Hopper", "pending", 980.5),
            invoice(3, "Alan Turing", "overdue", 310.0),
            invoice(4, "Edsger Dijkstra", "paid", 4020.0),
            invoice(5, "Barbara Liskov", "pending", 75.25),
        ];
        let table = TableCollection::new(
            invoices,
            vec![
                TableColumn::select(),
                TableColumn::avatar("avatar", "", |r: &Invoice| r.customer.as_str().into()),
                TableColumn::sortable("customer", "Customer", |r: &Invoice| {
                    r.customer.as_str().into()
                }),
                TableColumn::badge(
                    "status",
                    "Status",
                    |r: &Invoice| r.status.as_str().into(),
                    None,
                ),
                TableColumn::currency("amount", "Amount", None, |r: &Invoice| r.amount.into())
                    .sort(true),
            ],
            TableCollectionOptions {
                enable_sorting: true,
                enable_filtering: true,
                enable_pagination: true,
                enable_row_selection: true,
                page_size: 4,
                ..Default::default()
            },
        )
        .with_row_id(|r, _| glide_ui::selection::RowId(r.id));

        let grid = DataGrid::from_definitions(
            vec![
                DynamicRow::new()
                    .with("name", "John Doe")
                    .with("age", 34)
                    .with("role", "admin"),
                DynamicRow::new()
                    .with("name", "Jane Smith")
                    .with("age", 28)
                    .with("role", "editor"),
                DynamicRow::new()
                    .with("name", "Sam Lee")
                    .with("age", Value::Null)
                    .with("role", "viewer"),
            ],
            &[
                ColumnDefinition::new("name", "Name", ColumnType::Text).editable(true),
                ColumnDefinition::new("age", "Age", ColumnType::Number)
                    .editable(true)
                    .width(6),
                ColumnDefinition::new("role", "Role", ColumnType::Select)
                    .editable(true)
                    .options(["admin", "editor", "viewer"]),
            ],
            DataGridOptions {
                enable_row_selection: true,
                enable_add_row: true,
                enable_delete_row: true,
                enable_search: true,
                enable_sorting: true,
                ..Default::default()
            },
        );

        let fields = Fields::new(
            vec![
                FieldItemData::new("name", "Name")
                    .value("Ada Lovelace")
                    .required(true),
                FieldItemData::new("email", "Email")
                    .field_type(FieldType::Email)
                    .placeholder("you@example.com"),
                FieldItemData::new("seats", "Seats")
                    .field_type(FieldType::Number)
                    .value(5)
                    .description("Billed monthly"),
                FieldItemData::new("plan", "Plan")
                    .field_type(FieldType::Select)
                    .options(vec![
                        FieldOption::new("Starter", "starter"),
                        FieldOption::new("Team", "team"),
                        FieldOption::new("Enterprise", "enterprise"),
                    ]),
            ],
            FieldsOptions {
                enable_reordering: true,
                enable_add_remove: true,
                ..Default::default()
            },
        );

        let session = Session::signed_in(User::new("Ada Lovelace", "ada@example.com")).apps(vec![
            AppItem::new("Billing", "/apps/billing"),
            AppItem::new("Analytics", "/apps/analytics"),
        ]);

        Self {
            tabs,
            cards,
            list,
            numbers,
            table,
            grid,
            fields,
            nav: AuthNavControls::new(AccountsConfig::default()),
            session,
            status: "[ / ] switch tabs · q quits".to_string(),
        }
    }

    fn is_editing(&self) -> bool {
        self.fields.is_editing() || self.grid.is_editing()
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.height < 3 {
            return;
        }
        let nav_area = Rect::new(area.x, area.y, area.width, 1);
        let status_area = Rect::new(area.x, area.bottom() - 1, area.width, 1);
        let body = Rect::new(area.x, area.y + 1, area.width, area.height - 2);

        buf.set_span(
            nav_area.x,
            nav_area.y,
            &Span::styled("glide-ui gallery", theme.accent),
            nav_area.width,
        );

        let Some(panel) = self.tabs.render(body, buf, theme) else {
            self.nav.render(nav_area, buf, theme, &self.session);
            return;
        };
        match self.tabs.active() {
            Some("cards") => self.cards.render(panel, buf, theme),
            Some("list") => self.list.render(panel, buf, theme),
            Some("numbers") => self.numbers.render(panel, buf, theme),
            Some("table") => self.table.render(panel, buf, theme),
            Some("grid") => self.grid.render(panel, buf, theme),
            Some("fields") => self.fields.render(panel, buf, theme),
            Some("nav") => buf.set_span(
                panel.x,
                panel.y,
                &Span::styled("Tab and Enter drive the controls on the top row.", theme.text_muted),
                panel.width,
            ),
            _ => {}
        }
        // Drawn last so its menu overlays the panel.
        self.nav.render(nav_area, buf, theme, &self.session);

        buf.set_span(
            status_area.x,
            status_area.y,
            &Span::styled(self.status.as_str(), theme.text_muted),
            status_area.width,
        );
    }

    fn handle_event(&mut self, ev: &InputEvent) {
        if let InputEvent::Key(key) = ev
            && !self.is_editing()
        {
            let step = match key.code {
                KeyCode::Char('[') => Some(-1),
                KeyCode::Char(']') => Some(1),
                _ => None,
            };
            if let Some(step) = step {
                self.step_tab(step);
                return;
            }
        }

        if matches!(ev, InputEvent::Mouse(_)) {
            match self.tabs.handle_event(ev) {
                TabsAction::None => {}
                action => {
                    self.report_tabs(action);
                    return;
                }
            }
        }

        let status = match self.tabs.active() {
            Some("cards") => describe_item(self.cards.handle_event(ev)),
            Some("list") => match self.list.handle_event(ev) {
                ListAction::MenuAction { index, entry } => {
                    Some(format!("menu entry {entry} on item {index}"))
                }
                ListAction::Navigate { href, .. } => Some(format!("navigate to {href}")),
                ListAction::Clicked { index, .. } => Some(format!("clicked item {index}")),
                ListAction::None | ListAction::Redraw => None,
            },
            Some("numbers") => describe_item(self.numbers.handle_event(ev)),
            Some("table") => match self.table.handle_event(ev) {
                TableAction::RowClicked(i) => Some(format!("row {i} clicked")),
                TableAction::SelectionChanged => Some(format!(
                    "{} selected",
                    self.table.selected_rows().len()
                )),
                TableAction::SortChanged => Some("sorted".to_string()),
                _ => None,
            },
            Some("grid") => match self.grid.handle_event(ev) {
                DataGridAction::RowsChanged => {
                    Some(format!("{} rows", self.grid.rows().len()))
                }
                DataGridAction::CopyRequested(text) => {
                    Some(format!("copy {} bytes", text.len()))
                }
                _ => None,
            },
            Some("fields") => match self.fields.handle_event(ev) {
                FieldsAction::FieldChanged { id, value } => Some(format!("{id} = {value}")),
                FieldsAction::Added(id) => Some(format!("added {id}")),
                FieldsAction::Removed(id) => Some(format!("removed {id}")),
                FieldsAction::Reordered(ids) => Some(ids.join(", ")),
                FieldsAction::None | FieldsAction::Redraw => None,
            },
            _ => None,
        };
        if let Some(status) = status {
            self.status = status;
            return;
        }

        match self.nav.handle_event(ev, &self.session) {
            NavAction::Navigate(href) => self.status = format!("navigate to {href}"),
            NavAction::SignOutRequested => {
                self.session = Session::default();
                self.status = match self.nav.sign_out_finished() {
                    NavAction::Navigate(href) => format!("signed out, navigate to {href}"),
                    _ => "signed out".to_string(),
                };
            }
            NavAction::None | NavAction::Redraw => {}
        }
    }

    fn step_tab(&mut self, step: isize) {
        let ids: Vec<String> = self
            .tabs
            .visible_tabs()
            .iter()
            .map(|t| t.id.clone())
            .collect();
        if ids.is_empty() {
            return;
        }
        let current = self
            .tabs
            .active()
            .and_then(|id| ids.iter().position(|t| t == id))
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(ids.len() as isize) as usize;
        let action = self.tabs.select(&ids[next]);
        self.report_tabs(action);
    }

    fn report_tabs(&mut self, action: TabsAction) {
        match action {
            TabsAction::ValueChange(id) => self.status = format!("tab {id}"),
            TabsAction::Reordered(ids) => self.status = ids.join(" | "),
            TabsAction::None | TabsAction::Redraw => {}
        }
    }
}

fn describe_item(action: ItemAction) -> Option<String> {
    match action {
        ItemAction::Navigate { href, .. } => Some(format!("navigate to {href}")),
        ItemAction::Clicked { index, targets } => {
            Some(format!("clicked {index} ({} handlers)", targets.len()))
        }
        ItemAction::None | ItemAction::Redraw => None,
    }
}

fn invoice(id: u64, customer: &str, status: &str, amount: f64) -> Invoice {
    Invoice {
        id,
        customer: customer.to_string(),
        status: status.to_string(),
        amount,
    }
}
