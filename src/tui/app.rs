//! The interactive refresh loop.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::Print;
use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
};
use crossterm::{execute, queue};
use tracing::debug;

use crate::collector::StatusSource;
use crate::error::Error;
use crate::sort::SortState;
use crate::view::{crop, render_status};

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};

/// Full-screen auto-refreshing dashboard.
///
/// Owns the terminal output and the sort cursor; keys mutate the cursor and
/// trigger an immediate extra cycle. A cycle failure is drawn in place of
/// the table and the loop carries on to the next tick.
pub struct App {
    source: Box<dyn StatusSource>,
    sort: SortState,
    show_all_iops: bool,
    /// Uncropped text currently on screen; re-cropped on resize without a
    /// refetch.
    frame: Option<String>,
}

/// What one drained batch of events asks the loop to do.
#[derive(Debug, PartialEq, Eq)]
enum BatchAction {
    Quit,
    /// Run one refresh cycle, no matter how many ticks or sort changes the
    /// batch contained.
    Refresh,
    /// Re-crop the cached frame only.
    Redraw,
    Nothing,
}

/// Folds a batch of events into a single action. Ticks and sort-key
/// changes both want a cycle; one cycle serves them all. A quit key wins
/// immediately, so it is never stuck behind a backlog.
fn collapse_batch(sort: &mut SortState, batch: impl IntoIterator<Item = Event>) -> BatchAction {
    let mut refresh = false;
    let mut redraw = false;
    for event in batch {
        match event {
            Event::Tick => refresh = true,
            Event::Resize(..) => redraw = true,
            Event::Key(key) => match handle_key(sort, key) {
                KeyAction::Quit => return BatchAction::Quit,
                KeyAction::Refresh => refresh = true,
                KeyAction::None => {}
            },
        }
    }
    if refresh {
        BatchAction::Refresh
    } else if redraw {
        BatchAction::Redraw
    } else {
        BatchAction::Nothing
    }
}

impl App {
    pub fn new(source: Box<dyn StatusSource>, show_all_iops: bool) -> Self {
        Self {
            source,
            sort: SortState::new(),
            show_all_iops,
            frame: None,
        }
    }

    /// Runs the dashboard until the user quits.
    pub fn run(mut self, tick_rate: Duration) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide, SetTitle("fdbtop"))?;

        let result = self.event_loop(&mut stdout, tick_rate);

        // Restore the terminal even when the loop failed.
        let restored = disable_raw_mode()
            .and_then(|_| execute!(stdout, LeaveAlternateScreen, Show));
        result.and(restored)
    }

    fn event_loop(&mut self, out: &mut impl Write, tick_rate: Duration) -> io::Result<()> {
        let events = EventHandler::new(tick_rate);

        // First frame before the first tick.
        self.refresh(out)?;

        loop {
            let Ok(first) = events.next() else {
                break;
            };
            // A fetch can outlast the interval; drain whatever queued up
            // behind it so the backlog collapses into one cycle instead of
            // replaying tick by tick.
            let batch = std::iter::once(first).chain(std::iter::from_fn(|| events.try_next()));
            match collapse_batch(&mut self.sort, batch) {
                BatchAction::Quit => break,
                BatchAction::Refresh => self.refresh(out)?,
                BatchAction::Redraw => self.redraw(out)?,
                BatchAction::Nothing => {}
            }
        }
        Ok(())
    }

    /// One full cycle: fetch, parse, project, sort, render, display.
    fn refresh(&mut self, out: &mut impl Write) -> io::Result<()> {
        match self.cycle() {
            Ok(table) => self.frame = Some(table),
            Err(err) => {
                debug!("refresh cycle failed: {}", err);
                self.frame = Some(error_frame(&err));
            }
        }
        self.redraw(out)
    }

    fn cycle(&self) -> Result<String, Error> {
        let raw = self.source.fetch()?;
        render_status(&raw, self.sort.active(), self.show_all_iops)
    }

    /// Crops the current frame to the live terminal size and writes it.
    /// The crop pads every line and the full height, so each draw fully
    /// overwrites the previous one.
    fn redraw(&self, out: &mut impl Write) -> io::Result<()> {
        let Some(frame) = &self.frame else {
            return Ok(());
        };
        let (width, height) = terminal::size()?;
        let cropped = crop(frame, width as usize, height as usize);
        for (i, line) in cropped.lines().enumerate() {
            queue!(out, MoveTo(0, i as u16), Print(line))?;
        }
        out.flush()
    }
}

/// Error text shown in place of the table: the message plus whatever the
/// failed fetch managed to capture.
fn error_frame(err: &Error) -> String {
    match err.partial_output() {
        Some(output) => format!("{}\n\n{}", err, output),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::StatusSource;
    use crate::error::Error;

    struct FixedSource(Result<String, Error>);

    impl StatusSource for FixedSource {
        fn fetch(&self) -> Result<String, Error> {
            self.0.clone()
        }
    }

    const STATUS: &str = r#"{
        "cluster": {
            "processes": {
                "a": {"address": "10.0.0.1:4000", "cpu": {"usage_cores": 0.5}},
                "b": {"address": "10.0.0.1:4001", "cpu": {"usage_cores": 0.2}}
            }
        }
    }"#;

    #[test]
    fn cycle_renders_the_fetched_snapshot() {
        let app = App::new(Box::new(FixedSource(Ok(STATUS.to_string()))), false);
        let table = app.cycle().unwrap();
        assert!(table.lines().next().unwrap().starts_with("<host>"));
        assert!(table.contains("10.0.0.1"));
    }

    fn key(c: char) -> Event {
        Event::Key(crossterm::event::KeyEvent {
            code: crossterm::event::KeyCode::Char(c),
            modifiers: crossterm::event::KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        })
    }

    #[test]
    fn sort_key_changes_the_next_cycle() {
        let mut app = App::new(Box::new(FixedSource(Ok(STATUS.to_string()))), false);
        let action = collapse_batch(&mut app.sort, vec![key('>')]);
        assert_eq!(action, BatchAction::Refresh);
        let table = app.cycle().unwrap();
        assert!(table.lines().next().unwrap().contains("<port>"));
    }

    #[test]
    fn backlogged_ticks_collapse_into_one_refresh() {
        // Ticks that queued up behind a slow fetch must fold into a single
        // cycle, not replay one fetch per tick.
        let mut sort = SortState::new();
        let batch = vec![Event::Tick, Event::Tick, Event::Tick, Event::Tick, Event::Tick];
        assert_eq!(collapse_batch(&mut sort, batch), BatchAction::Refresh);
    }

    #[test]
    fn quit_is_not_stuck_behind_a_backlog() {
        let mut sort = SortState::new();
        let batch = vec![Event::Tick, key('>'), key('q'), Event::Tick];
        assert_eq!(collapse_batch(&mut sort, batch), BatchAction::Quit);
        // The sort change before the quit still happened, exactly once.
        assert_eq!(sort.index(), 1);
    }

    #[test]
    fn sort_changes_in_a_batch_fold_into_one_refresh() {
        let mut sort = SortState::new();
        let batch = vec![key('>'), key('>')];
        assert_eq!(collapse_batch(&mut sort, batch), BatchAction::Refresh);
        assert_eq!(sort.index(), 2);
    }

    #[test]
    fn resize_alone_only_redraws() {
        let mut sort = SortState::new();
        assert_eq!(
            collapse_batch(&mut sort, vec![Event::Resize(80, 24)]),
            BatchAction::Redraw
        );
        assert_eq!(
            collapse_batch(&mut sort, vec![Event::Resize(80, 24), Event::Tick]),
            BatchAction::Refresh
        );
    }

    #[test]
    fn fetch_failure_becomes_an_error_frame() {
        let app = App::new(
            Box::new(FixedSource(Err(Error::FetchFailure {
                message: "fdbcli exited with 1".to_string(),
                output: "unable to connect".to_string(),
            }))),
            false,
        );
        let err = app.cycle().unwrap_err();
        let frame = error_frame(&err);
        assert!(frame.contains("fdbcli exited with 1"));
        assert!(frame.contains("unable to connect"));
    }

    #[test]
    fn malformed_snapshot_keeps_only_the_message() {
        let err = Error::MalformedSnapshot("expected value at line 1".to_string());
        let frame = error_frame(&err);
        assert!(frame.contains("malformed status json"));
    }
}
