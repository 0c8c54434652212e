use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::{Coord, Coord2};

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PointerButtons: u8 {
        const PRIMARY   = 1;
        const SECONDARY = 1 << 1;
    }
}

/// Raw pointer event as delivered by the windowing layer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerEvent {
    Moved { x: f32, y: f32 },
    ButtonDown(PointerButtons),
    ButtonUp(PointerButtons),
    /// Pointer left the window.
    Left,
}

/// Abstract gameplay intent resolved from pointer input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Reveal(Coord2),
    ToggleMark(Coord2),
}

/// Where the grid sits on screen. An explicit value handed to the mapper and
/// the renderer; there is no process-wide pointer or scale state.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridMetrics {
    pub origin_x: i32,
    pub origin_y: i32,
    pub border: i32,
    pub cell_size: i32,
    pub scale: f32,
    pub columns: Coord,
    pub rows: Coord,
}

impl GridMetrics {
    /// Resolves a screen position to a board cell, or `None` when the pointer
    /// is outside the grid.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<Coord2> {
        let grid_x = (x / self.scale).floor() as i32 - self.origin_x - self.border;
        let grid_y = (y / self.scale).floor() as i32 - self.origin_y - self.border;

        if grid_x < 0 || grid_y < 0 {
            return None;
        }

        let column = grid_x / self.cell_size;
        let row = grid_y / self.cell_size;

        if column >= i32::from(self.columns) || row >= i32::from(self.rows) {
            return None;
        }

        Some((column as Coord, row as Coord))
    }
}

/// Translates pointer position and button transitions into board intents.
///
/// Reveal fires on primary-button *release* so a click produces exactly one
/// reveal even when the pointer drags across cells while held. Mark toggles on
/// secondary-button press.
#[derive(Clone, Debug, PartialEq)]
pub struct InputMapper {
    metrics: GridMetrics,
    position: (f32, f32),
    held: PointerButtons,
    pressed_cell: Option<Coord2>,
}

impl InputMapper {
    pub fn new(metrics: GridMetrics) -> Self {
        Self {
            metrics,
            position: (0.0, 0.0),
            held: PointerButtons::empty(),
            pressed_cell: None,
        }
    }

    /// Replaces the grid geometry, e.g. after a new game with other dimensions.
    pub fn set_metrics(&mut self, metrics: GridMetrics) {
        self.metrics = metrics;
        self.pressed_cell = None;
    }

    pub fn metrics(&self) -> GridMetrics {
        self.metrics
    }

    /// The cell the primary button is currently held down over, for the
    /// renderer's pressed look. Purely observational.
    pub fn pressed_cell(&self) -> Option<Coord2> {
        self.pressed_cell
    }

    pub fn handle(&mut self, event: PointerEvent) -> Option<Intent> {
        match event {
            PointerEvent::Moved { x, y } => {
                self.position = (x, y);
                if self.held.contains(PointerButtons::PRIMARY) {
                    self.pressed_cell = self.cell_under_pointer();
                }
                None
            }
            PointerEvent::ButtonDown(buttons) => {
                self.held |= buttons;
                if buttons.contains(PointerButtons::SECONDARY) {
                    return self.cell_under_pointer().map(Intent::ToggleMark);
                }
                if buttons.contains(PointerButtons::PRIMARY) {
                    self.pressed_cell = self.cell_under_pointer();
                }
                None
            }
            PointerEvent::ButtonUp(buttons) => {
                self.held &= !buttons;
                if buttons.contains(PointerButtons::PRIMARY) {
                    self.pressed_cell = None;
                    return self.cell_under_pointer().map(Intent::Reveal);
                }
                None
            }
            PointerEvent::Left => {
                self.held = PointerButtons::empty();
                self.pressed_cell = None;
                None
            }
        }
    }

    fn cell_under_pointer(&self) -> Option<Coord2> {
        self.metrics.cell_at(self.position.0, self.position.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> GridMetrics {
        GridMetrics {
            origin_x: 6,
            origin_y: 49,
            border: 3,
            cell_size: 16,
            scale: 1.0,
            columns: 9,
            rows: 9,
        }
    }

    fn mapper() -> InputMapper {
        InputMapper::new(metrics())
    }

    fn pointer_over(cell: Coord2) -> (f32, f32) {
        let m = metrics();
        (
            (m.origin_x + m.border + cell.0 as i32 * m.cell_size + 4) as f32,
            (m.origin_y + m.border + cell.1 as i32 * m.cell_size + 4) as f32,
        )
    }

    #[test]
    fn resolves_cell_from_screen_position() {
        let (x, y) = pointer_over((2, 5));
        assert_eq!(metrics().cell_at(x, y), Some((2, 5)));
    }

    #[test]
    fn pointer_left_of_grid_is_no_cell() {
        assert_eq!(metrics().cell_at(0.0, 100.0), None);
        assert_eq!(metrics().cell_at(100.0, 0.0), None);
    }

    #[test]
    fn pointer_past_grid_is_no_cell() {
        let m = metrics();
        let past_x = (m.origin_x + m.border + 9 * m.cell_size) as f32;
        assert_eq!(m.cell_at(past_x, 60.0), None);
    }

    #[test]
    fn scale_divides_pointer_position() {
        let mut m = metrics();
        m.scale = 2.0;
        let (x, y) = pointer_over((1, 1));
        assert_eq!(m.cell_at(x * 2.0, y * 2.0), Some((1, 1)));
    }

    #[test]
    fn reveal_fires_on_release_not_press() {
        let mut mapper = mapper();
        let (x, y) = pointer_over((3, 3));

        assert_eq!(mapper.handle(PointerEvent::Moved { x, y }), None);
        assert_eq!(
            mapper.handle(PointerEvent::ButtonDown(PointerButtons::PRIMARY)),
            None
        );
        assert_eq!(mapper.pressed_cell(), Some((3, 3)));

        assert_eq!(
            mapper.handle(PointerEvent::ButtonUp(PointerButtons::PRIMARY)),
            Some(Intent::Reveal((3, 3)))
        );
        assert_eq!(mapper.pressed_cell(), None);
    }

    #[test]
    fn drag_reveals_the_cell_under_the_release() {
        let mut mapper = mapper();
        let (x, y) = pointer_over((0, 0));
        mapper.handle(PointerEvent::Moved { x, y });
        mapper.handle(PointerEvent::ButtonDown(PointerButtons::PRIMARY));

        let (x, y) = pointer_over((4, 2));
        mapper.handle(PointerEvent::Moved { x, y });
        assert_eq!(mapper.pressed_cell(), Some((4, 2)));

        assert_eq!(
            mapper.handle(PointerEvent::ButtonUp(PointerButtons::PRIMARY)),
            Some(Intent::Reveal((4, 2)))
        );
    }

    #[test]
    fn secondary_press_toggles_mark_immediately() {
        let mut mapper = mapper();
        let (x, y) = pointer_over((7, 1));
        mapper.handle(PointerEvent::Moved { x, y });

        assert_eq!(
            mapper.handle(PointerEvent::ButtonDown(PointerButtons::SECONDARY)),
            Some(Intent::ToggleMark((7, 1)))
        );
        assert_eq!(
            mapper.handle(PointerEvent::ButtonUp(PointerButtons::SECONDARY)),
            None
        );
    }

    #[test]
    fn release_outside_the_grid_emits_nothing() {
        let mut mapper = mapper();
        let (x, y) = pointer_over((0, 0));
        mapper.handle(PointerEvent::Moved { x, y });
        mapper.handle(PointerEvent::ButtonDown(PointerButtons::PRIMARY));

        mapper.handle(PointerEvent::Moved { x: 0.0, y: 0.0 });
        assert_eq!(
            mapper.handle(PointerEvent::ButtonUp(PointerButtons::PRIMARY)),
            None
        );
    }

    #[test]
    fn leaving_the_window_clears_pressed_state() {
        let mut mapper = mapper();
        let (x, y) = pointer_over((2, 2));
        mapper.handle(PointerEvent::Moved { x, y });
        mapper.handle(PointerEvent::ButtonDown(PointerButtons::PRIMARY));
        assert_eq!(mapper.pressed_cell(), Some((2, 2)));

        assert_eq!(mapper.handle(PointerEvent::Left), None);
        assert_eq!(mapper.pressed_cell(), None);
    }
}
