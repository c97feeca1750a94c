use iced::futures::{channel::mpsc, SinkExt, Stream, StreamExt};
use iced::stream;
use rdev::{listen, EventType, Key};

use crate::global_constants::LOG_TAG_KEYBOARD;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalKeyboardEvent {
    EscapePressed,
}

/// System-wide key listener, so Escape cancels a region selection even when
/// no overlay has keyboard focus.
pub struct GlobalKeyboardListener;

impl GlobalKeyboardListener {
    pub fn create_event_stream() -> impl Stream<Item = GlobalKeyboardEvent> {
        stream::channel(
            1,
            |mut output_channel: mpsc::Sender<GlobalKeyboardEvent>| async move {
                let (keyboard_sender, mut keyboard_receiver) = mpsc::channel(1);

                Self::spawn_keyboard_listener_thread(keyboard_sender);

                loop {
                    let keyboard_event = keyboard_receiver.select_next_some().await;
                    if let Some(global_event) = translate_event(&keyboard_event.event_type) {
                        let _ = output_channel.send(global_event).await;
                    }
                }
            },
        )
    }

    fn spawn_keyboard_listener_thread(mut keyboard_sender: mpsc::Sender<rdev::Event>) {
        std::thread::spawn(move || {
            log::info!(
                "{} Starting global keyboard listener thread",
                LOG_TAG_KEYBOARD
            );
            if let Err(e) = listen(move |event| {
                let _ = keyboard_sender.try_send(event);
            }) {
                log::error!(
                    "{} Failed to start keyboard listener: {:?}. Escape only works inside overlays.",
                    LOG_TAG_KEYBOARD,
                    e
                );
            }
        });
    }
}

fn translate_event(event_type: &EventType) -> Option<GlobalKeyboardEvent> {
    match event_type {
        EventType::KeyPress(Key::Escape) => {
            log::debug!("{} Escape pressed", LOG_TAG_KEYBOARD);
            Some(GlobalKeyboardEvent::EscapePressed)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_press_is_translated() {
        assert_eq!(
            translate_event(&EventType::KeyPress(Key::Escape)),
            Some(GlobalKeyboardEvent::EscapePressed)
        );
    }

    #[test]
    fn test_other_events_are_ignored() {
        assert_eq!(translate_event(&EventType::KeyRelease(Key::Escape)), None);
        assert_eq!(translate_event(&EventType::KeyPress(Key::Space)), None);
    }
}
