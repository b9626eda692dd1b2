use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub list_area: Rect,
    pub counters_area: Rect,
    pub status_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Main area: List (70%) | Counters (30%)
/// - Bottom bar: status line (1 row)
pub fn create_layout(area: Rect) -> MainLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status line
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70), // List pane
            Constraint::Percentage(30), // Counters pane
        ])
        .split(rows[1]);

    MainLayout {
        keybindings_area: rows[0],
        list_area: columns[0],
        counters_area: columns[1],
        status_area: rows[2],
    }
}

/// Create centered modal area
pub fn create_modal_area(area: Rect) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(8),
            Constraint::Percentage(30),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = create_layout(area);

        assert_eq!(layout.keybindings_area.height, 1);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.list_area.height, 38);
        assert_eq!(layout.list_area.width, 70);
        assert_eq!(layout.counters_area.width, 30);
        assert_eq!(layout.status_area.y, 39);
    }

    #[test]
    fn test_create_modal_area() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = create_modal_area(area);

        assert!(modal.width < area.width);
        assert_eq!(modal.height, 8);
    }
}
