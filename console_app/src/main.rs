//! Console demo application
//!
//! Builds a small window with a title bar and a text cursor, moves it around,
//! runs a few frames and feeds it some input. Everything the scene does is
//! reported through the log.
//!
//! Usage: `console_demo [config.toml|config.ron]`

use glyph_engine::foundation::logging;
use glyph_engine::prelude::*;

/// Frames to run when the configuration does not set a limit
const DEFAULT_FRAMES: u64 = 3;

/// Counts frames and reports how many times it was drawn
struct FrameCounter {
    updates: u64,
    draws: u64,
}

impl Component for FrameCounter {
    fn capabilities(&self) -> Capabilities {
        Capabilities::UPDATE | Capabilities::DRAW
    }

    fn update(&mut self, _host: &NodeContext, _delta_time: f32) {
        self.updates += 1;
    }

    fn draw(&mut self, host: &NodeContext, _delta_time: f32) {
        self.draws += 1;
        log::debug!(
            "Window drawn at ({}, {}), draw #{}",
            host.absolute_position.x,
            host.absolute_position.y,
            self.draws
        );
    }
}

/// Blinking text cursor that also accepts typed characters
struct TextCursor {
    cell: Cell,
    blink_timer: f32,
    typed: String,
}

impl TextCursor {
    const BLINK_SECONDS: f32 = 0.5;

    fn new() -> Self {
        Self {
            cell: Cell::new(Color::WHITE, Color::BLACK, u32::from(b'_'), Mirror::None),
            blink_timer: 0.0,
            typed: String::new(),
        }
    }
}

impl Component for TextCursor {
    fn capabilities(&self) -> Capabilities {
        Capabilities::UPDATE | Capabilities::DRAW | Capabilities::KEYBOARD
    }

    fn sort_order(&self) -> i32 {
        10
    }

    fn update(&mut self, _host: &NodeContext, delta_time: f32) {
        self.blink_timer += delta_time;
        if self.blink_timer >= Self::BLINK_SECONDS {
            self.blink_timer = 0.0;
            let visible = self.cell.is_visible();
            self.cell.set_visible(!visible);
        }
    }

    fn draw(&mut self, host: &NodeContext, _delta_time: f32) {
        if self.cell.is_dirty() {
            log::trace!(
                "Cursor cell at ({}, {}) visible={}",
                host.absolute_position.x,
                host.absolute_position.y,
                self.cell.is_visible()
            );
            self.cell.set_dirty(false);
        }
    }

    fn process_keyboard(&mut self, _host: &NodeContext, keyboard: &Keyboard) -> bool {
        let mut handled = false;
        for key in keyboard.keys_down() {
            if let Some(character) = key_to_char(key) {
                self.typed.push(character);
                handled = true;
            }
        }
        handled
    }
}

/// Close button hit area on the title bar
struct CloseBox {
    area: Rect,
    clicks: u32,
}

impl Component for CloseBox {
    fn capabilities(&self) -> Capabilities {
        Capabilities::MOUSE
    }

    fn process_mouse(&mut self, host: &NodeContext, mouse: &MouseState) -> bool {
        let area = self.area.translated(host.absolute_position);
        if mouse.is_over(&area) && mouse.is_button_pressed(MouseButton::Left) {
            self.clicks += 1;
            return true;
        }
        false
    }
}

/// Marker component with no capabilities
struct Tag(&'static str);

impl Component for Tag {
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }
}

fn key_to_char(key: KeyCode) -> Option<char> {
    match key {
        KeyCode::H => Some('h'),
        KeyCode::I => Some('i'),
        KeyCode::Space => Some(' '),
        _ => None,
    }
}

fn load_config() -> Result<ApplicationConfig, Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => ApplicationConfig::load_from_file(&path)?,
        None => ApplicationConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_filter(&config.log_filter);
    log::info!("Starting console demo ({:?} positioning)", config.scene.positioning);

    let mut scene = Scene::with_config(config.scene.clone())?;
    let desktop = scene.create_node();
    let window = scene.create_node_at(Point::new(4, 2));
    let title_bar = scene.create_node();
    let text_box = scene.create_node_at(Point::new(1, 2));
    scene.add_child(desktop, window)?;
    scene.add_child(window, title_bar)?;
    scene.add_child(window, text_box)?;

    scene.subscribe(window, EventType::PositionChanged, |sender: &ScreenObject, event: &ScreenObjectEvent| {
        if let ScreenObjectEvent::PositionChanged(change) = event {
            log::info!(
                "Window moved from ({}, {}) to ({}, {}); now at absolute ({}, {})",
                change.old.x,
                change.old.y,
                change.new.x,
                change.new.y,
                sender.absolute_position().x,
                sender.absolute_position().y
            );
        }
    })?;

    scene.add_component(window, FrameCounter { updates: 0, draws: 0 })?;
    scene.add_component(window, Tag("window"))?;
    scene.add_component(title_bar, CloseBox { area: Rect::new(Point::new(20, 0), 1, 1), clicks: 0 })?;
    scene.add_component(text_box, TextCursor::new())?;

    if let Some(node) = scene.node_mut(title_bar) {
        node.set_use_mouse(true);
    }
    if let Some(node) = scene.node_mut(text_box) {
        node.set_use_keyboard(true);
    }
    scene.set_focused(Some(text_box))?;

    scene.set_position(window, Point::new(8, 3))?;
    log::info!(
        "Text box absolute position: {:?}",
        scene.absolute_position(text_box)?
    );

    // A window cannot be parented under its own text box
    if let Err(err) = scene.set_parent(window, Some(text_box)) {
        log::warn!("Rejected: {err}");
    }

    let frames = if config.frame_limit == 0 { DEFAULT_FRAMES } else { config.frame_limit };
    let mut timer = Timer::new();
    let mut keyboard = Keyboard::new();
    let mut mouse = MouseState::new();

    for frame in 0..frames {
        let delta_time = timer.tick();

        match frame {
            0 => keyboard.update_key(KeyCode::H, true),
            1 => {
                keyboard.update_key(KeyCode::H, false);
                keyboard.update_key(KeyCode::I, true);
            }
            _ => keyboard.update_key(KeyCode::I, false),
        }
        mouse.update_position(Point::new(28, 3));
        mouse.update_button(MouseButton::Left, frame == 1);

        scene.update(desktop, delta_time)?;
        if scene.dispatch_keyboard(&keyboard) {
            log::debug!("Frame {frame}: keyboard handled by focused node");
        }
        if let Some(hit) = scene.dispatch_mouse(desktop, &mouse)? {
            log::info!("Frame {frame}: mouse handled by {hit:?}");
        }
        scene.draw(desktop, delta_time)?;

        keyboard.reset_frame_flags();
        mouse.reset_frame_flags();
    }

    let window_node = scene.get(window)?;
    if let Some(counter) = window_node.components().component::<FrameCounter>() {
        log::info!("Window ran {} update(s) and {} draw(s)", counter.updates, counter.draws);
    }
    for (_, tag) in window_node.components().components_of::<Tag>() {
        log::debug!("Window tagged {:?}", tag.0);
    }
    if let Some(cursor) = scene.get(text_box)?.components().component::<TextCursor>() {
        log::info!("Typed {:?}", cursor.typed);
        let record = CellSerialized::from(&cursor.cell);
        log::debug!("Cursor cell record: {record:?}");
    }
    if let Some(close) = scene.get(title_bar)?.components().component::<CloseBox>() {
        log::info!("Close box clicked {} time(s)", close.clicks);
    }

    let destroyed = scene.destroy(window)?;
    log::info!("Destroyed {} node(s); {} left in scene", destroyed.len(), scene.len());
    Ok(())
}
