use std::io::{stdout, Write};
use std::process;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode},
    execute, queue,
    style::Print,
    terminal::{self, ClearType},
};

use npuzzle::{solve, Board, Position, Strategy};

const MIN_SIZE: usize = 3;
const MAX_SIZE: usize = 5;
const MAX_SHUFFLE_MOVES: usize = 1000;
const ANIMATION_STEP: Duration = Duration::from_millis(80);

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> crossterm::Result<()> {
    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;
    let result = event_loop(&mut out);
    execute!(out, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

struct App {
    size: usize,
    board: Board,
    shuffle_moves: usize,
    total_moves: usize,
    status: String,
}

impl App {
    fn new(size: usize) -> App {
        App {
            size,
            board: Board::solved(size),
            shuffle_moves: 100,
            total_moves: 0,
            status: String::from("shuffle with s, then try the solvers"),
        }
    }

    /// Slides the tile at empty+delta into the empty cell. Out-of-range
    /// and illegal targets are absorbed, like any other click.
    fn slide(&mut self, drow: isize, dcol: isize) {
        let empty = match self.board.empty_position() {
            Some(empty) => empty,
            None => return,
        };
        let row = empty.row as isize + drow;
        let col = empty.col as isize + dcol;
        if row < 0 || col < 0 {
            return;
        }
        let next = self.board.apply_move(Position::new(row as usize, col as usize));
        if next != self.board {
            self.board = next;
            self.total_moves += 1;
        }
    }

    fn shuffle(&mut self) {
        self.board = self.board.shuffled(self.shuffle_moves);
        self.total_moves = 0;
        self.status = format!("shuffled with {} moves", self.shuffle_moves);
    }

    fn reset(&mut self) {
        self.board = Board::solved(self.size);
        self.total_moves = 0;
        self.status = String::from("board reset");
    }

    fn resize(&mut self, delta: isize) {
        let size = (self.size as isize + delta).clamp(MIN_SIZE as isize, MAX_SIZE as isize);
        if size as usize != self.size {
            self.size = size as usize;
            self.reset();
        }
    }

    fn adjust_shuffle_moves(&mut self, delta: isize) {
        let moves = (self.shuffle_moves as isize + delta).clamp(0, MAX_SHUFFLE_MOVES as isize);
        self.shuffle_moves = moves as usize;
        self.status = format!("shuffle strength set to {} moves", self.shuffle_moves);
    }
}

fn event_loop(out: &mut impl Write) -> crossterm::Result<()> {
    let mut app = App::new(MIN_SIZE);
    loop {
        draw(out, &app)?;
        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                // Arrows name the direction the tile travels, so the
                // clicked tile sits on the opposite side of the empty.
                KeyCode::Up => app.slide(1, 0),
                KeyCode::Down => app.slide(-1, 0),
                KeyCode::Left => app.slide(0, 1),
                KeyCode::Right => app.slide(0, -1),
                KeyCode::Char('s') => app.shuffle(),
                KeyCode::Char('r') => app.reset(),
                KeyCode::Char('+') | KeyCode::Char('=') => app.resize(1),
                KeyCode::Char('-') => app.resize(-1),
                KeyCode::Char('[') => app.adjust_shuffle_moves(-50),
                KeyCode::Char(']') => app.adjust_shuffle_moves(50),
                KeyCode::Char('1') => animate_solver(out, &mut app, Strategy::OneLayer)?,
                KeyCode::Char('2') => animate_solver(out, &mut app, Strategy::TwoLayer)?,
                KeyCode::Char('3') => animate_solver(out, &mut app, Strategy::MeanGrandchild)?,
                _ => {}
            }
        }
    }
}

fn animate_solver(
    out: &mut impl Write,
    app: &mut App,
    strategy: Strategy,
) -> crossterm::Result<()> {
    app.status = format!("solving ({strategy})...");
    draw(out, app)?;

    match solve(&app.board, strategy) {
        Ok(moves) => {
            let count = moves.len();
            for tile in moves {
                app.board = app.board.apply_move(tile);
                app.total_moves += 1;
                draw(out, app)?;
                if event::poll(ANIMATION_STEP)? {
                    // Any key aborts the playback.
                    event::read()?;
                    app.status = String::from("playback stopped");
                    return Ok(());
                }
            }
            app.status = format!("{strategy} solved it in {count} moves");
        }
        Err(err) => {
            app.status = format!("{strategy} gave up: {err}");
        }
    }
    Ok(())
}

fn draw(out: &mut impl Write, app: &App) -> crossterm::Result<()> {
    queue!(out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    queue!(
        out,
        Print(format!(
            "  {}-puzzle ({size}x{size})\r\n\r\n",
            app.size * app.size - 1,
            size = app.size
        ))
    )?;

    for row in app.board.rows() {
        let line: String = row
            .iter()
            .map(|&value| {
                if value == 0 {
                    String::from("   .")
                } else {
                    format!("{value:4}")
                }
            })
            .collect();
        queue!(out, Print(format!(" {line}\r\n")))?;
    }

    queue!(
        out,
        Print(format!(
            "\r\n  moves: {}   shuffle strength: {}   solved: {}\r\n",
            app.total_moves,
            app.shuffle_moves,
            if app.board.is_solved() { "yes" } else { "no" }
        ))
    )?;
    queue!(out, Print(format!("  {}\r\n", app.status)))?;
    queue!(
        out,
        Print(
            "\r\n  arrows slide tiles   s shuffle   r reset   +/- board size\r\n  \
             [/] shuffle strength   1/2/3 auto-solve   q quit\r\n"
        )
    )?;
    out.flush()?;
    Ok(())
}
