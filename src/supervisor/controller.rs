//! Interactive control loop.
//!
//! A dedicated thread reads one key event at a time in raw mode and forwards
//! commands; the async side selects over commands, the unit's completion, and
//! interrupt signals. The terminal is a scoped resource: raw mode and the
//! alternate screen are restored on every exit path via the guard's `Drop`.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::debug;

use super::RenderUnit;
use crate::model::RunConfig;

/// Commands the operator can issue while a pass is on screen.
#[derive(Debug, Clone, Copy)]
enum ControlCommand {
    /// Tear the unit down and start a fresh one with the same arguments.
    Restart,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SupervisorState {
    Idle,
    Rendering,
    Terminating,
    Stopped,
}

fn transition(state: &mut SupervisorState, next: SupervisorState) {
    debug!(from = ?state, to = ?next, "supervisor transition");
    *state = next;
}

/// Raw mode + alternate screen, held for the lifetime of the supervisor and
/// restored on drop, including unwinds.
struct TerminalModeGuard;

impl TerminalModeGuard {
    fn acquire() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen).ok();
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Read one key event at a time, forwarding `q`/`r`/Ctrl-C as commands. The
/// short poll window is only there so a stop request is noticed; between
/// events the thread sits in the blocking read.
fn spawn_key_reader(
    cmd_tx: UnboundedSender<ControlCommand>,
    stop: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            match event::poll(Duration::from_millis(200)) {
                Ok(true) => {
                    let Ok(Event::Key(key)) = event::read() else {
                        continue;
                    };
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match (key.modifiers, key.code) {
                        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                            let _ = cmd_tx.send(ControlCommand::Quit);
                            break;
                        }
                        (_, KeyCode::Char('r')) => {
                            let _ = cmd_tx.send(ControlCommand::Restart);
                        }
                        _ => {}
                    }
                }
                Ok(false) => {}
                Err(_) => break,
            }
        }
    })
}

/// Run the supervisor until quit, interrupt, or unit self-exit.
pub async fn run_supervisor(cfg: RunConfig) -> Result<()> {
    let guard = TerminalModeGuard::acquire()?;

    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<ControlCommand>();
    let stop = Arc::new(AtomicBool::new(false));
    let reader = spawn_key_reader(cmd_tx, stop.clone());

    let mut state = SupervisorState::Idle;
    let mut unit = RenderUnit::spawn(cfg.clone());
    transition(&mut state, SupervisorState::Rendering);

    let res = loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(ControlCommand::Restart) => {
                    transition(&mut state, SupervisorState::Terminating);
                    unit.terminate().await;
                    transition(&mut state, SupervisorState::Idle);
                    // Same arguments, fresh resolution: edited decks are
                    // picked up on purpose.
                    unit = RenderUnit::spawn(cfg.clone());
                    transition(&mut state, SupervisorState::Rendering);
                }
                Some(ControlCommand::Quit) | None => {
                    transition(&mut state, SupervisorState::Terminating);
                    if !unit.is_finished() {
                        unit.terminate().await;
                    }
                    break Ok(());
                }
            },
            done = unit.done() => {
                // Self-exit: the pass failed or ran to completion. Either way
                // the loop ends instead of hanging on further reads.
                break done;
            }
            _ = tokio::signal::ctrl_c() => {
                transition(&mut state, SupervisorState::Terminating);
                if !unit.is_finished() {
                    unit.terminate().await;
                }
                break Ok(());
            }
        }
    };

    transition(&mut state, SupervisorState::Stopped);
    stop.store(true, Ordering::Relaxed);
    let _ = tokio::task::spawn_blocking(move || reader.join()).await;

    drop(guard);
    res
}
