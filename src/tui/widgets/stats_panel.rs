use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Widget};

use crate::api::StatsSnapshot;
use crate::stats::{month_name, StatsQuery};

/// Totals plus the per-month table for the current filter.
pub struct StatsPanelWidget<'a> {
    snapshot: &'a StatsSnapshot,
    query: StatsQuery,
    loading: bool,
}

impl<'a> StatsPanelWidget<'a> {
    pub fn new(snapshot: &'a StatsSnapshot, query: StatsQuery) -> Self {
        Self {
            snapshot,
            query,
            loading: false,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }
}

impl Widget for StatsPanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.loading {
            format!(" Statistics: {} (loading...) ", self.query.describe())
        } else {
            format!(" Statistics: {} ", self.query.describe())
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).split(inner);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let totals = vec![
            Line::from(vec![
                Span::raw("  Total pomodoros: "),
                Span::styled(self.snapshot.total_pomodoros.to_string(), bold.fg(Color::Cyan)),
            ]),
            Line::from(vec![
                Span::raw("  Total sessions:  "),
                Span::styled(self.snapshot.total_sessions.to_string(), bold.fg(Color::Cyan)),
            ]),
        ];
        Paragraph::new(totals).render(rows[0], buf);

        if self.snapshot.monthly_breakdown.is_empty() {
            Paragraph::new("  No monthly data available.")
                .style(Style::default().fg(Color::DarkGray))
                .render(rows[1], buf);
            return;
        }

        let table_rows: Vec<Row> = self
            .snapshot
            .monthly_breakdown
            .iter()
            .map(|m| {
                Row::new(vec![
                    format!("  {}", month_name(m.month)),
                    m.total.to_string(),
                ])
            })
            .collect();

        Table::new(table_rows, [Constraint::Length(14), Constraint::Length(10)])
            .header(Row::new(vec!["  Month", "Pomodoros"]).style(bold))
            .render(rows[1], buf);
    }
}
