//! Input state handed to screen objects
//!
//! The scene dispatches this state; see [`Scene::process_keyboard`] and
//! [`Scene::dispatch_mouse`].
//!
//! [`Scene::process_keyboard`]: crate::scene::Scene::process_keyboard
//! [`Scene::dispatch_mouse`]: crate::scene::Scene::dispatch_mouse

pub mod keyboard;
pub mod mouse;

pub use keyboard::{Keyboard, KeyCode};
pub use mouse::{MouseButton, MouseState};
