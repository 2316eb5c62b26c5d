//! Terminal front end
//!
//! Terminal input is read on a dedicated thread and merged with settled
//! generation requests in one async loop, so the screen stays live while a
//! reply is pending.

mod markdown;
mod render;
mod theme;

use crate::runtime::ChatRuntime;
use crate::state_machine::Mood;
use crate::store::KeyValueStore;
use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::io;
use tokio::sync::mpsc;

/// Whether the loop should keep running after an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

enum Input {
    Terminal(TermEvent),
    Reply(crate::state_machine::Event),
}

/// Run the UI until the user quits
pub async fn run<S: KeyValueStore>(runtime: &mut ChatRuntime<S>) -> io::Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, runtime).await;
    ratatui::restore();
    result
}

async fn event_loop<S: KeyValueStore>(
    terminal: &mut DefaultTerminal,
    runtime: &mut ChatRuntime<S>,
) -> io::Result<()> {
    let (term_tx, mut term_rx) = mpsc::channel(64);
    spawn_terminal_reader(term_tx);

    loop {
        terminal.draw(|frame| render::draw(frame, runtime.session()))?;

        let input = tokio::select! {
            event = term_rx.recv() => match event {
                Some(event) => Input::Terminal(event),
                None => break,
            },
            Some(event) = runtime.recv_event() => Input::Reply(event),
        };

        match input {
            Input::Terminal(event) => {
                if handle_terminal_event(runtime, event) == Flow::Quit {
                    break;
                }
            }
            Input::Reply(event) => runtime.handle_event(event),
        }
    }

    if runtime.session().is_awaiting_reply() {
        tracing::info!("Quit with a reply still pending");
    }
    Ok(())
}

/// Blocking reader; exits when the loop drops its receiver
fn spawn_terminal_reader(tx: mpsc::Sender<TermEvent>) {
    std::thread::spawn(move || loop {
        match crossterm::event::read() {
            Ok(event) => {
                if tx.blocking_send(event).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Terminal read failed");
                break;
            }
        }
    });
}

fn handle_terminal_event<S: KeyValueStore>(runtime: &mut ChatRuntime<S>, event: TermEvent) -> Flow {
    match event {
        TermEvent::Key(key) => handle_key(runtime, key),
        TermEvent::Paste(text) => {
            runtime.session_mut().draft_mut().push_str(&text);
            Flow::Continue
        }
        _ => Flow::Continue,
    }
}

fn handle_key<S: KeyValueStore>(runtime: &mut ChatRuntime<S>, key: KeyEvent) -> Flow {
    if key.kind != KeyEventKind::Press {
        return Flow::Continue;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => return Flow::Quit,
        KeyCode::Char('c') if ctrl => return Flow::Quit,
        KeyCode::Tab => {
            let tab = runtime.session().tab().next();
            runtime.session_mut().set_tab(tab);
        }
        KeyCode::BackTab => {
            let tab = runtime.session().tab().prev();
            runtime.session_mut().set_tab(tab);
        }
        KeyCode::F(n @ 1..=4) => {
            runtime.session_mut().set_mood(Mood::ALL[usize::from(n - 1)]);
        }
        KeyCode::Enter => {
            if let Err(e) = runtime.submit_draft() {
                if !e.is_empty_input() {
                    tracing::debug!(error = %e, "Input not accepted");
                }
            }
        }
        KeyCode::Backspace => {
            runtime.session_mut().draft_mut().pop();
        }
        KeyCode::Char(c) if !ctrl => runtime.session_mut().draft_mut().push(c),
        _ => {}
    }
    Flow::Continue
}
