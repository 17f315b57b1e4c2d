use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const STATUS_HEIGHT: u16 = 1;
pub const LOG_PANE_HEIGHT: u16 = 10;
/// Below this width the detail pane goes under the list instead of beside it.
pub const SIDE_BY_SIDE_MIN_WIDTH: u16 = 90;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub list: Rect,
    pub detail: Rect,
    pub logs: Option<Rect>,
    pub status: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let tab_height = if full_screen { 0 } else { TAB_BAR_HEIGHT };
        let log_height = if show_logs { LOG_PANE_HEIGHT } else { 0 };

        let [tab, main, logs, status] = Layout::vertical([
            Constraint::Length(tab_height),
            Constraint::Fill(1),
            Constraint::Length(log_height),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .areas(area);

        let [list, detail] = Self::split_main(main);

        LayoutAreas {
            tab_bar: if full_screen { [Rect::ZERO, Rect::ZERO] } else { Self::split_tab_bar(tab) },
            list,
            detail,
            logs: show_logs.then_some(logs),
            status,
        }
    }

    fn split_main(area: Rect) -> [Rect; 2] {
        if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area)
        } else {
            Layout::vertical([Constraint::Fill(1), Constraint::Percentage(40)]).areas(area)
        }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_terminal_puts_detail_beside_list() {
        let areas = LayoutAreas::from_rect(Rect::new(0, 0, 120, 40), false, false);
        assert_eq!(areas.list.y, areas.detail.y);
        assert!(areas.detail.x > areas.list.x);
        assert_eq!(areas.status.y, 39);
        assert!(areas.logs.is_none());
    }

    #[test]
    fn narrow_terminal_stacks_detail_below_list() {
        let areas = LayoutAreas::from_rect(Rect::new(0, 0, 60, 40), false, true);
        assert_eq!(areas.list.x, areas.detail.x);
        assert!(areas.detail.y > areas.list.y);
        assert_eq!(areas.logs.map(|r| r.height), Some(LOG_PANE_HEIGHT));
    }

    #[test]
    fn full_screen_hides_tab_bar() {
        let areas = LayoutAreas::from_rect(Rect::new(0, 0, 120, 40), true, false);
        assert_eq!(areas.tab_bar, [Rect::ZERO, Rect::ZERO]);
        assert_eq!(areas.list.y, 0);
    }
}
