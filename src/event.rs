use crossterm::event::{Event, EventStream, KeyEvent};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::geometry::Direction;
use crate::layout::{DisplayMode, PaneId};

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    /// The session owning `pane_id` ended; delivered on the same channel
    /// as keypresses so layout mutations stay totally ordered.
    PaneExited { pane_id: PaneId },
}

/// One structural operation requested of a workspace's layout, as produced
/// by the input layer. Each maps onto exactly one manager call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutRequest {
    Insert,
    Remove(PaneId),
    Navigate(Direction),
    Resize(PaneId, f64),
    SetMode(DisplayMode),
    Equalize,
    Swap(PaneId, PaneId),
    CycleActive { forward: bool },
}

pub fn start_event_loop(event_tx: mpsc::UnboundedSender<AppEvent>) {
    // Crossterm event reader
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            match reader.next().await {
                Some(Ok(event)) => {
                    let app_event = match event {
                        Event::Key(key) => AppEvent::Key(key),
                        Event::Resize(w, h) => AppEvent::Resize(w, h),
                        _ => continue,
                    };
                    if tx.send(app_event).is_err() {
                        break;
                    }
                }
                Some(Err(_)) => break,
                None => break,
            }
        }
    });

    // Redraw tick
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(100));
        loop {
            interval.tick().await;
            if event_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });
}
