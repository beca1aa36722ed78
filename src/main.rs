//! Terminal blockfall runner (default binary).
//!
//! Input comes from crossterm; the board is redrawn after every change and
//! gravity is driven by a [`FallTimer`] that follows the board's fall interval.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use log::info;

use blockfall::cli::{Args, Settings};
use blockfall::core::{Board, PieceSource, TickOutcome};
use blockfall::input::{command_for_key, should_quit};
use blockfall::term::{BoardView, TerminalRenderer};
use blockfall::timer::FallTimer;

fn main() -> Result<()> {
    // Logs go to stderr and are off unless RUST_LOG is set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let args = Args::parse();
    let settings = Settings::from_args(&args)?;
    let mut board = settings.build_board()?;
    info!(
        "starting {}x{} board, seed {}",
        settings.board.width, settings.board.height, settings.seed
    );

    std::panic::set_hook(Box::new(|panic_info| {
        // Raw mode would swallow the message; restore the terminal first.
        let _ = TerminalRenderer::new().exit();
        eprint!("{panic_info}\n\n");
    }));

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut board);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run<S: PieceSource>(term: &mut TerminalRenderer, board: &mut Board<S>) -> Result<()> {
    let view = BoardView::default();
    let mut timer = FallTimer::new(Instant::now(), board.fall_interval());
    let mut dirty = true;

    loop {
        if dirty {
            term.draw(&view.render(board))?;
            dirty = false;
        }

        if board.is_ended() {
            // Hold the end-of-game frame until the player quits.
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press && should_quit(key) => {
                    return Ok(());
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
            continue;
        }

        let now = Instant::now();
        if timer.is_due(now) {
            if let TickOutcome::GameOver = board.tick() {
                info!("game over after {} locks", board.locks());
            }
            timer.reschedule(now, board.fall_interval());
            dirty = true;
            continue;
        }

        if event::poll(timer.time_until(now))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(command) = command_for_key(key) {
                        dirty |= board.apply(command);
                    }
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
    }
}
