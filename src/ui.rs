use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use perfume_catalog::{
    Catalog, Facet, Fallback, GridView, LoadOrigin, LoadReport, PriceRange, Product, SortKey,
    PRICE_STEP,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Filters,
    Results,
}

impl Focus {
    pub fn toggle(&self) -> Self {
        match self {
            Focus::Filters => Focus::Results,
            Focus::Results => Focus::Filters,
        }
    }
}

/// One selectable line in the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelItem {
    Option {
        facet: Facet,
        value: &'static str,
        label: &'static str,
    },
    PriceLower,
    PriceUpper,
}

pub fn panel_items() -> Vec<PanelItem> {
    let mut items: Vec<PanelItem> = Facet::ALL
        .iter()
        .flat_map(|facet| {
            facet.options().iter().map(move |&(value, label)| PanelItem::Option {
                facet: *facet,
                value,
                label,
            })
        })
        .collect();
    items.push(PanelItem::PriceLower);
    items.push(PanelItem::PriceUpper);
    items
}

pub struct App {
    pub catalog: Catalog,
    pub state: TableState,
    pub panel_state: ListState,
    pub panel_items: Vec<PanelItem>,
    pub focus: Focus,
    pub show_detail: bool,
    load_rx: Option<Receiver<(Vec<Product>, LoadReport)>>,
}

impl App {
    pub fn new(catalog: Catalog, load_rx: Option<Receiver<(Vec<Product>, LoadReport)>>) -> Self {
        let mut panel_state = ListState::default();
        panel_state.select(Some(0));

        let mut app = Self {
            catalog,
            state: TableState::default(),
            panel_state,
            panel_items: panel_items(),
            focus: Focus::Filters,
            show_detail: false,
            load_rx,
        };
        app.reset_selection();
        app
    }

    /// Picks up the background load result if it has arrived.
    pub fn poll_load(&mut self) {
        let Some(rx) = &self.load_rx else {
            return;
        };

        match rx.try_recv() {
            Ok((products, report)) => {
                self.catalog.finish_load(products, report);
                self.load_rx = None;
                self.reset_selection();
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                // Worker died without sending; stop waiting rather than spin forever
                tracing::error!("catalog loader exited without a result");
                self.catalog.finish_load(
                    Vec::new(),
                    LoadReport {
                        provider: "worker".to_string(),
                        origin: LoadOrigin::Fallback(Fallback::Empty),
                        count: 0,
                        rejected: 0,
                        error: Some("loader disconnected".to_string()),
                    },
                );
                self.load_rx = None;
                self.reset_selection();
            }
        }
    }

    pub fn results(&self) -> &[Product] {
        &self.catalog.view().products
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.state.selected().and_then(|i| self.results().get(i))
    }

    pub fn selected_panel_item(&self) -> Option<PanelItem> {
        self.panel_state
            .selected()
            .and_then(|i| self.panel_items.get(i).copied())
    }

    fn reset_selection(&mut self) {
        if self.results().is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    /// Status line for the finished load, and whether it came from the fallback.
    pub fn load_status(&self) -> Option<(String, bool)> {
        self.catalog
            .store()
            .last_load()
            .map(|report| (report.summary(), report.is_fallback()))
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    // ========================================================================
    // FILTER PANEL
    // ========================================================================

    /// Space/Enter on the panel: toggles a checkbox. Price rows ignore it.
    pub fn activate_panel_item(&mut self) {
        if let Some(PanelItem::Option { facet, value, .. }) = self.selected_panel_item() {
            if let Err(e) = self.catalog.toggle_facet(facet, value) {
                tracing::warn!(error = %e, "ignoring facet toggle");
            }
            self.reset_selection();
        }
    }

    /// Left/Right on a price row moves that bound by one slider step.
    pub fn nudge_price(&mut self, steps: f64) {
        let range = self.catalog.filters().price_range();
        let next: PriceRange = match self.selected_panel_item() {
            Some(PanelItem::PriceLower) => range.with_lower_nudged(steps * PRICE_STEP),
            Some(PanelItem::PriceUpper) => range.with_upper_nudged(steps * PRICE_STEP),
            _ => return,
        };

        if next != range {
            self.catalog.set_price_range(next);
            self.reset_selection();
        }
    }

    pub fn clear_filters(&mut self) {
        self.catalog.clear_filters();
        self.reset_selection();
    }

    // ========================================================================
    // SORT CONTROL
    // ========================================================================

    pub fn next_sort(&mut self) {
        let key = self.catalog.sort_key().next();
        self.set_sort(key);
    }

    pub fn previous_sort(&mut self) {
        let key = self.catalog.sort_key().previous();
        self.set_sort(key);
    }

    fn set_sort(&mut self, key: SortKey) {
        self.catalog.set_sort_key(key);
        self.reset_selection();
    }

    // ========================================================================
    // NAVIGATION
    // ========================================================================

    pub fn next(&mut self) {
        match self.focus {
            Focus::Filters => {
                let len = self.panel_items.len();
                let i = self.panel_state.selected().map(|i| (i + 1) % len).unwrap_or(0);
                self.panel_state.select(Some(i));
            }
            Focus::Results => {
                let len = self.results().len();
                if len == 0 {
                    return;
                }
                let i = match self.state.selected() {
                    Some(i) if i >= len - 1 => 0,
                    Some(i) => i + 1,
                    None => 0,
                };
                self.state.select(Some(i));
            }
        }
    }

    pub fn previous(&mut self) {
        match self.focus {
            Focus::Filters => {
                let len = self.panel_items.len();
                let i = match self.panel_state.selected() {
                    Some(0) | None => len - 1,
                    Some(i) => i - 1,
                };
                self.panel_state.select(Some(i));
            }
            Focus::Results => {
                let len = self.results().len();
                if len == 0 {
                    return;
                }
                let i = match self.state.selected() {
                    Some(0) | None => len - 1,
                    Some(i) => i - 1,
                };
                self.state.select(Some(i));
            }
        }
    }

    pub fn page_down(&mut self) {
        let len = self.results().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + 10).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.results().is_empty() {
            return;
        }
        let i = self.state.selected().map(|i| i.saturating_sub(10)).unwrap_or(0);
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "UI loop failed");
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.poll_load();
        terminal.draw(|f| ui(f, app))?;

        // Poll so a finished background load shows up without a keypress
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab | KeyCode::BackTab => app.focus = app.focus.toggle(),
                KeyCode::Char('c') => app.clear_filters(),
                KeyCode::Char('s') => app.next_sort(),
                KeyCode::Char('S') => app.previous_sort(),
                KeyCode::Enter | KeyCode::Char(' ') => match app.focus {
                    Focus::Filters => app.activate_panel_item(),
                    Focus::Results => app.toggle_detail(),
                },
                KeyCode::Left | KeyCode::Char('h') => {
                    let steps = if key.modifiers.contains(KeyModifiers::SHIFT) {
                        -5.0
                    } else {
                        -1.0
                    };
                    app.nudge_price(steps);
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    let steps = if key.modifiers.contains(KeyModifiers::SHIFT) {
                        5.0
                    } else {
                        1.0
                    };
                    app.nudge_price(steps);
                }
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home if !app.results().is_empty() => app.state.select(Some(0)),
                KeyCode::End if !app.results().is_empty() => {
                    app.state.select(Some(app.results().len() - 1));
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title, count, sort
            Constraint::Min(0),    // Filters + results
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(0)])
        .split(chunks[1]);

    render_filter_panel(f, body[0], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(body[1]);

        render_grid(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_grid(f, body[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn focus_border(app: &App, focus: Focus) -> Style {
    if app.focus == focus {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let view = app.catalog.view();

    let count = if view.loading {
        "cargando...".to_string()
    } else {
        view.count_label()
    };

    let spans = vec![
        Span::styled(
            "Catálogo de Perfumes",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(count, Style::default().fg(Color::White)),
        Span::raw("  |  "),
        Span::styled("⇅ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.catalog.sort_key().label(),
            Style::default().fg(Color::Green),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    f.render_widget(header, area);
}

fn render_filter_panel(f: &mut Frame, area: Rect, app: &mut App) {
    let filters = app.catalog.filters().clone();
    let range = filters.price_range();

    let mut last_facet: Option<Facet> = None;
    let items: Vec<ListItem> = app
        .panel_items
        .iter()
        .map(|item| match item {
            PanelItem::Option { facet, value, label } => {
                let mut lines = Vec::new();
                if last_facet != Some(*facet) {
                    lines.push(Line::from(Span::styled(
                        facet.title().to_uppercase(),
                        Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
                    )));
                    last_facet = Some(*facet);
                }

                let checked = filters.is_selected(*facet, value);
                let mark = if checked { "[x] " } else { "[ ] " };
                let style = if checked {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                lines.push(Line::from(vec![Span::styled(mark, style), Span::raw(*label)]));
                ListItem::new(lines)
            }
            PanelItem::PriceLower => ListItem::new(vec![
                Line::from(Span::styled(
                    "RANGO DE PRECIOS",
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("Mín ◂ ${:.0} ▸", range.lower())),
            ]),
            PanelItem::PriceUpper => {
                ListItem::new(Line::from(format!("Máx ◂ ${:.0} ▸", range.upper())))
            }
        })
        .collect();

    let title = if filters.has_active_filters() {
        format!(" Filtros ({}) ", filters.active_value_count())
    } else {
        " Filtros ".to_string()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_border(app, Focus::Filters))
                .title(title),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(list, area, &mut app.panel_state);
}

fn render_grid(f: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(app, Focus::Results))
        .title(" Perfumes ");

    let cards = match app.catalog.view().grid() {
        GridView::Loading => {
            let loading = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Cargando perfumes...",
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )),
            ])
            .alignment(Alignment::Center)
            .block(block);
            f.render_widget(loading, area);
            return;
        }
        GridView::Empty(empty) => {
            let message = Paragraph::new(vec![
                Line::from(""),
                Line::from(""),
                Line::from(empty.icon),
                Line::from(""),
                Line::from(Span::styled(
                    empty.headline,
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(empty.guidance, Style::default().fg(Color::DarkGray))),
            ])
            .alignment(Alignment::Center)
            .block(block);
            f.render_widget(message, area);
            return;
        }
        GridView::Cards(cards) => cards,
    };

    let header_cells = ["Perfume", "Marca", "Tamaño", "Precio", "Tipo"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = cards.into_iter().map(|card| {
        let color = match card.type_label.as_str() {
            "Árabe" => Color::Magenta,
            "Nicho" => Color::Cyan,
            _ => Color::White,
        };

        Row::new(vec![
            Cell::from(truncate(&card.name, 26)),
            Cell::from(truncate(&card.brand, 20)),
            Cell::from(card.presentation),
            Cell::from(card.price_label).style(Style::default().fg(Color::Green)),
            Cell::from(card.type_label).style(Style::default().fg(color)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(28),
            Constraint::Length(22),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(11),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.results().len();

    let mut status_spans = vec![Span::styled(
        format!(" {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    // Clear-all is only offered while something is filtered
    if app.catalog.view().has_active_filters {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Limpiar"));
    }

    if let Some((summary, fallback)) = app.load_status() {
        let color = if fallback {
            Color::Red
        } else {
            Color::DarkGray
        };
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(summary, Style::default().fg(color)));
    }

    let hints = [
        ("Tab", " Panel"),
        ("Espacio", " Marcar"),
        ("◂/▸", " Precio"),
        ("s", " Ordenar"),
        ("↑/↓", " Nav"),
    ];
    for (key, text) in hints {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(text));
    }
    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Salir"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Detalle ");

    let product = match app.selected_product() {
        Some(p) => p,
        None => {
            f.render_widget(Paragraph::new("Ningún perfume seleccionado").block(block), area);
            return;
        }
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("  {}: ", name), label), Span::raw(value)])
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", product.name),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}", product.brand),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        field("Precio", perfume_catalog::grid::format_price(product.price)),
        field("Presentación", product.presentation.clone()),
        field("Tipo", product.perfume_type.label().to_string()),
        field("Ocasión", product.occasion.clone()),
        field("Clima", product.climate.clone()),
        field("Hora", product.time_of_day.clone()),
        field("Género", product.gender.clone()),
        field("Agregado", product.added_date.clone()),
        Line::from(""),
        field("Imagen", product.image_src().to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "  Enter para cerrar",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    f.render_widget(Paragraph::new(content).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfume_catalog::{sample_products, RecordStore};

    fn app() -> App {
        App::new(Catalog::new(RecordStore::with_products(sample_products())), None)
    }

    fn select_panel(app: &mut App, wanted: PanelItem) {
        let idx = app.panel_items.iter().position(|i| *i == wanted).unwrap();
        app.panel_state.select(Some(idx));
    }

    #[test]
    fn test_panel_lists_every_option_and_price_rows() {
        let items = panel_items();
        let options: usize = Facet::ALL.iter().map(|f| f.options().len()).sum();
        assert_eq!(items.len(), options + 2);
        assert_eq!(items[items.len() - 1], PanelItem::PriceUpper);
    }

    #[test]
    fn test_activate_toggles_checkbox() {
        let mut app = app();
        select_panel(
            &mut app,
            PanelItem::Option {
                facet: Facet::Type,
                value: "nicho",
                label: "Nicho",
            },
        );

        app.activate_panel_item();
        assert_eq!(app.results().len(), 2);
        assert!(app.catalog.view().has_active_filters);

        app.activate_panel_item();
        assert_eq!(app.results().len(), 8);
    }

    #[test]
    fn test_price_nudging() {
        let mut app = app();
        select_panel(&mut app, PanelItem::PriceUpper);

        app.nudge_price(-30.0);
        assert_eq!(app.catalog.filters().price_range().upper(), 200.0);
        assert!(app.results().iter().all(|p| p.price <= 200.0));

        select_panel(&mut app, PanelItem::PriceLower);
        app.nudge_price(-1.0);
        assert_eq!(app.catalog.filters().price_range().lower(), 0.0);
    }

    #[test]
    fn test_sort_cycles_and_resets_selection() {
        let mut app = app();
        app.focus = Focus::Results;
        app.next();
        app.next();
        assert_eq!(app.state.selected(), Some(2));

        app.next_sort();
        assert_eq!(app.catalog.sort_key(), SortKey::PriceAsc);
        assert_eq!(app.state.selected(), Some(0));
        assert_eq!(app.selected_product().unwrap().name, "Citrus Breeze");
    }

    #[test]
    fn test_empty_results_clear_selection() {
        let mut app = app();
        select_panel(&mut app, PanelItem::PriceLower);
        app.nudge_price(50.0);
        assert!(app.results().is_empty());
        assert_eq!(app.state.selected(), None);
        assert!(app.catalog.view().grid().is_empty_state());

        app.clear_filters();
        assert_eq!(app.results().len(), 8);
    }

    #[test]
    fn test_background_load_is_picked_up() {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut app = App::new(Catalog::new(RecordStore::loading()), Some(rx));
        assert_eq!(app.catalog.view().grid(), GridView::Loading);

        app.poll_load();
        assert!(app.catalog.is_loading());

        let (products, report) = perfume_catalog::load_with_fallback(
            &perfume_catalog::FixtureProvider,
            perfume_catalog::Fallback::Empty,
        );
        tx.send((products, report)).unwrap();
        app.poll_load();

        assert!(!app.catalog.is_loading());
        assert_eq!(app.results().len(), 8);
        assert_eq!(app.state.selected(), Some(0));
        assert_eq!(app.load_status(), Some(("fixture".to_string(), false)));
    }

    #[test]
    fn test_failed_source_is_reported_in_status() {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut app = App::new(Catalog::new(RecordStore::loading()), Some(rx));
        assert_eq!(app.load_status(), None);

        let dir = tempfile::tempdir().unwrap();
        let provider = perfume_catalog::CsvProvider {
            path: dir.path().join("missing.csv"),
        };
        tx.send(perfume_catalog::load_with_fallback(
            &provider,
            perfume_catalog::Fallback::Fixture,
        ))
        .unwrap();
        app.poll_load();

        assert_eq!(app.results().len(), 8);
        assert_eq!(
            app.load_status(),
            Some(("fixture (csv falló)".to_string(), true))
        );
    }

    #[test]
    fn test_dropped_loader_still_finishes_loading() {
        let (tx, rx) = std::sync::mpsc::channel::<(Vec<Product>, LoadReport)>();
        let mut app = App::new(Catalog::new(RecordStore::loading()), Some(rx));
        drop(tx);

        app.poll_load();
        assert!(!app.catalog.is_loading());
        assert!(app.catalog.view().grid().is_empty_state());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("Élégance Paris", 20), "Élégance Paris");
        assert_eq!(truncate("Élégance Paris", 8), "Éléga...");
    }
}
