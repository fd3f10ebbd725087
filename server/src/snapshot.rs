use wumpus_core::{Cell, GameEngine, Position};
use wumpus_protocol::{CellView, GameSnapshot};

/// Detached wire copy of the engine's current state.
///
/// Whether a cell shows the target is decided here against the target's
/// current position, so a target that moved away is never revealed.
pub fn snapshot(engine: &GameEngine) -> GameSnapshot {
    let target = engine.target();
    let grid = engine
        .board()
        .cells_as_rows()
        .iter()
        .map(|row| row.iter().map(|cell| cell_view(cell, target)).collect())
        .collect();

    GameSnapshot {
        grid,
        moves: engine.click_count(),
        found: engine.is_found(),
        distance: engine.last_click().map(|last| last.dist),
    }
}

fn cell_view(cell: &Cell, target: Position) -> CellView {
    let show_wumpus = cell.is_clicked() && cell.position() == target;
    let value = match cell.value() {
        Some(value) if cell.is_clicked() && !show_wumpus => value.to_string(),
        _ => String::new(),
    };

    CellView {
        value,
        color: cell.color().to_string(),
        show_wumpus,
    }
}
