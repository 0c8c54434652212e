use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions within a round:
/// - NewGame -> Running
/// - NewGame -> Victory / Defeat (first click ends the game)
/// - Running -> Victory / Defeat
///
/// A fresh `new_game` call resets to NewGame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Board generated, timer not yet started.
    NewGame,
    /// First reveal has occurred, timer active.
    Running,
    /// All non-mine cells revealed.
    Victory,
    /// A mine was revealed.
    Defeat,
}

impl GameState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NewGame)
    }

    /// The board is frozen; all input is ignored.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::NewGame
    }
}

/// Monotonic, saturating second counter. The only thing the timer worker ever
/// touches, so it cannot race with board mutation on the input thread.
fn advance_clock(clock: &AtomicU32) {
    let _ = clock.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |secs| {
        (secs < MAX_ELAPSED_SECS).then_some(secs + 1)
    });
}

/// One Minesweeper round: the board plus the state machine driving it.
pub struct Game {
    board: Board,
    revealed_count: CellCount,
    flag_count: CellCount,
    state: GameState,
    triggered_mine: Option<Coord2>,
    elapsed: Arc<AtomicU32>,
    timer: GameTimer,
}

impl Game {
    /// New round with entropy-seeded mine placement.
    pub fn new(config: GameConfig) -> Self {
        Self::from_board(RandomBoardGenerator::from_entropy().generate(config))
    }

    /// New round with a reproducible board. Seed injection point for tests.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::from_board(RandomBoardGenerator::new(seed).generate(config))
    }

    pub fn from_board(board: Board) -> Self {
        let elapsed = Arc::new(AtomicU32::new(0));
        let clock = Arc::clone(&elapsed);
        let timer = GameTimer::new(Duration::from_secs(1), move || advance_clock(&clock));

        Self {
            board,
            revealed_count: 0,
            flag_count: 0,
            state: GameState::NewGame,
            triggered_mine: None,
            elapsed,
            timer,
        }
    }

    /// Discards the round and starts over: timer joined, counters zeroed, board
    /// regenerated, state back to NewGame.
    pub fn new_game(&mut self, config: GameConfig) {
        self.new_game_with_board(RandomBoardGenerator::from_entropy().generate(config));
    }

    pub fn new_game_with_board(&mut self, board: Board) {
        self.timer.stop();
        self.board = board;
        self.revealed_count = 0;
        self.flag_count = 0;
        self.state = GameState::NewGame;
        self.triggered_mine = None;
        self.elapsed.store(0, Ordering::SeqCst);
        log::debug!("new game: {:?} with {} mines", self.board.size(), self.board.mine_count());
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn cell_at(&self, coords: Coord2) -> &Cell {
        self.board.cell(coords)
    }

    /// Mines not yet flagged. Flag placement is blocked at zero, so this never
    /// goes negative.
    pub fn flags_remaining(&self) -> CellCount {
        self.board.mine_count() - self.flag_count
    }

    /// Seconds since the first reveal, saturating at [`MAX_ELAPSED_SECS`].
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed.load(Ordering::SeqCst)
    }

    /// The mine that ended the round, if it ended in defeat.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Reveals the cell under `coords`.
    ///
    /// A mine ends the round immediately; anything else runs the flood fill,
    /// which opens the connected zero-count region plus its numbered border.
    /// Out-of-grid coordinates and finished games are silent no-ops.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        use RevealOutcome::*;

        if self.state.is_finished() || !self.board.in_bounds(coords) {
            return NoChange;
        }

        if self.board.cell(coords).has_mine() {
            self.board.cell_mut(coords).state = CellState::Revealed;
            self.triggered_mine = Some(coords);
            self.finish(false);
            return HitMine;
        }

        let revealed_before = self.revealed_count;
        self.flood_reveal(coords);
        if self.revealed_count == revealed_before {
            return NoChange;
        }

        self.mark_started();
        if self.revealed_count == self.board.safe_cell_count() {
            self.finish(true);
            Won
        } else {
            Revealed
        }
    }

    /// Cycles a cell's annotation: Hidden -> Flagged -> Questioned -> Hidden.
    ///
    /// Flagging consumes one of the remaining flags and is blocked at zero;
    /// moving on to the question mark returns the flag. Revealed cells and
    /// finished games are silent no-ops.
    pub fn toggle_mark(&mut self, coords: Coord2) -> MarkOutcome {
        use MarkOutcome::*;

        if self.state.is_finished() || !self.board.in_bounds(coords) {
            return NoChange;
        }

        match self.board.cell(coords).state() {
            CellState::Hidden => {
                if self.flags_remaining() == 0 {
                    return NoChange;
                }
                self.board.cell_mut(coords).state = CellState::Flagged;
                self.flag_count += 1;
                Changed
            }
            CellState::Flagged => {
                self.board.cell_mut(coords).state = CellState::Questioned;
                self.flag_count -= 1;
                Changed
            }
            CellState::Questioned => {
                self.board.cell_mut(coords).state = CellState::Hidden;
                Changed
            }
            CellState::Revealed => NoChange,
        }
    }

    /// Breadth-first flood fill. Mines and already-revealed cells stop the
    /// fill; marked cells are revealed (a flag is returned to the pool); only
    /// zero-count cells propagate, and only through their cardinal neighbors.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut visited: HashSet<Coord2> = HashSet::new();
        let mut queue = VecDeque::from([start]);

        while let Some(coords) = queue.pop_front() {
            if !visited.insert(coords) {
                continue;
            }

            let cell = self.board.cell(coords);
            if cell.has_mine() || cell.is_revealed() {
                continue;
            }

            if cell.state() == CellState::Flagged {
                self.flag_count -= 1;
            }
            let adjacent_mines = cell.adjacent_mines();
            self.board.cell_mut(coords).state = CellState::Revealed;
            self.revealed_count += 1;
            log::trace!("revealed {:?}, adjacent mines: {}", coords, adjacent_mines);

            if adjacent_mines == 0 {
                queue.extend(
                    self.board
                        .iter_cardinal(coords)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn mark_started(&mut self) {
        if self.state.is_initial() {
            self.state = GameState::Running;
            self.timer.start();
            log::debug!("round started");
        }
    }

    fn finish(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.timer.stop();
        self.state = if won {
            GameState::Victory
        } else {
            GameState::Defeat
        };
        log::debug!("round over: {:?} after {}s", self.state, self.elapsed_secs());
    }

    /// Diagnostic: flips every mine cell to revealed, bypassing the state
    /// machine's bookkeeping.
    pub fn show_mines(&mut self) {
        self.bulk_reveal(|cell| cell.has_mine());
    }

    /// Diagnostic: flips every numbered non-mine cell to revealed.
    pub fn show_counts(&mut self) {
        self.bulk_reveal(|cell| !cell.has_mine() && cell.adjacent_mines() > 0);
    }

    /// Diagnostic: flips the whole board to revealed.
    pub fn reveal_all(&mut self) {
        self.bulk_reveal(|_| true);
    }

    fn bulk_reveal(&mut self, select: impl Fn(&Cell) -> bool) {
        let (columns, rows) = self.board.size();
        for y in 0..rows {
            for x in 0..columns {
                if select(self.board.cell((x, y))) {
                    self.board.cell_mut((x, y)).state = CellState::Revealed;
                }
            }
        }
    }

    #[cfg(test)]
    fn timer_running(&self) -> bool {
        self.timer.is_running()
    }
}
