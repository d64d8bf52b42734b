use std::path::{Path, PathBuf};

use anyhow::Result;
use raylib::core::text::measure_text;
use raylib::prelude::*;

use crate::blink::Blink;
use crate::constants::*;
use crate::controller::Controller;
use crate::display::{self, DisplayTest};
use crate::error::ShowError;
use crate::layout::{preview_size, ThumbnailStrip};
use crate::loader::PdfiumLoader;
use crate::notice::{Level, Notice};
use crate::surface::process::OutputProcess;
use crate::texture_loader::{draw_fitted, load_page_texture};

type Show = Controller<OutputProcess, PdfiumLoader>;

pub struct Options {
    pub program: PathBuf,
    pub display: usize,
    pub scale: f32,
    pub blink: f32,
    pub pdf: Option<PathBuf>,
    pub cover: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Clone)]
enum Action {
    OpenDialog,
    Open(PathBuf),
    CoverDialog,
    SetCover(PathBuf),
    ToggleCover,
    ToggleStop,
    Next,
    Prev,
    GoTo(usize),
    CycleDisplay,
    TestOutput,
    Close,
}

/// Screen regions of the operator window for a given window size.
struct Panel {
    open: Rectangle,
    output_label: Vector2,
    display: Rectangle,
    test: Rectangle,
    stop: Rectangle,
    set_cover: Rectangle,
    show_cover: Rectangle,
    cover_thumb: Rectangle,
    current: Rectangle,
    next: Rectangle,
    prev_button: Rectangle,
    next_button: Rectangle,
    strip: Rectangle,
}

impl Panel {
    fn new(sw: f32, sh: f32) -> Self {
        let row = |y: f32, x: f32, w: f32| Rectangle::new(x, y, w, BUTTON_HEIGHT);

        let top = MARGIN;
        let open = row(top, MARGIN, 160.0);
        let output_label = Vector2::new(open.x + open.width + MARGIN * 2.0, top + (BUTTON_HEIGHT - BUTTON_FONT as f32) * 0.5);
        let display = row(top, output_label.x + 90.0, 160.0);
        let test = row(top, display.x + display.width + MARGIN, 170.0);
        let stop = row(top, test.x + test.width + MARGIN, 210.0);

        let second = top + BUTTON_HEIGHT + MARGIN;
        let set_cover = row(second, MARGIN, 160.0);
        let show_cover = row(second, set_cover.x + set_cover.width + MARGIN, 170.0);
        let cover_thumb = row(second, show_cover.x + show_cover.width + MARGIN, BUTTON_HEIGHT * 16.0 / 9.0);

        // Two previews side by side, centred
        let (pw, ph) = preview_size((sw - MARGIN * 3.0) / 2.0);
        let preview_y = second + BUTTON_HEIGHT + 35.0 + LABEL_FONT as f32 + MARGIN;
        let left = (sw - pw * 2.0 - MARGIN) * 0.5;
        let current = Rectangle::new(left, preview_y, pw, ph);
        let next = Rectangle::new(left + pw + MARGIN, preview_y, pw, ph);

        let controls_y = preview_y + ph + MARGIN;
        let half = (sw - MARGIN * 3.0) / 2.0;
        let prev_button = row(controls_y, MARGIN, half);
        let next_button = row(controls_y, MARGIN * 2.0 + half, half);

        let strip_y = controls_y + BUTTON_HEIGHT + MARGIN;
        let strip_h = (sh - strip_y - MARGIN).max(THUMB_HEIGHT + THUMB_LABEL_HEIGHT + THUMB_GAP);
        let strip = Rectangle::new(MARGIN, strip_y, sw - MARGIN * 2.0, strip_h);

        Self {
            open,
            output_label,
            display,
            test,
            stop,
            set_cover,
            show_cover,
            cover_thumb,
            current,
            next,
            prev_button,
            next_button,
            strip,
        }
    }

    fn button_at(&self, point: Vector2) -> Option<Action> {
        [
            (self.open, Action::OpenDialog),
            (self.display, Action::CycleDisplay),
            (self.test, Action::TestOutput),
            (self.stop, Action::ToggleStop),
            (self.set_cover, Action::CoverDialog),
            (self.show_cover, Action::ToggleCover),
            (self.prev_button, Action::Prev),
            (self.next_button, Action::Next),
        ]
        .into_iter()
        .find(|(rect, _)| rect.check_collision_point_rec(point))
        .map(|(_, action)| action)
    }
}

/// GPU copies of one page, shrunk to the sizes they are drawn at.
struct PageTextures {
    preview: Option<Texture2D>,
    thumb: Option<Texture2D>,
}

struct Operator {
    program: PathBuf,
    monitors: usize,
    pages: Vec<PageTextures>,
    cover: Option<Texture2D>,
    // Controller versions the textures above were built from
    deck_version: u64,
    cover_version: u64,
    strip: ThumbnailStrip,
    stop_blink: Blink,
    cover_blink: Blink,
    notice: Option<Notice>,
    display_test: DisplayTest,
}

pub fn run(options: Options) -> Result<()> {
    let (mut rl, thread) = raylib::init()
        .size(OPERATOR_WIDTH, OPERATOR_HEIGHT)
        .title("PDF Slideshow - Operator")
        .resizable()
        .vsync()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);
    // Escape is handled below, the cover must be able to veto it
    rl.set_exit_key(None);
    rl.maximize_window();

    let monitors = display::monitor_count();
    let selected = if options.display < monitors {
        options.display
    } else {
        tracing::warn!("Display {} not connected, using display 1", options.display + 1);
        0
    };
    tracing::info!("{} display(s) connected, output on display {}", monitors, selected + 1);

    let mut show = Controller::new(
        OutputProcess::new(options.program.clone()),
        PdfiumLoader::new(options.scale),
        selected,
    );
    let mut operator = Operator {
        program: options.program,
        monitors,
        pages: Vec::new(),
        cover: None,
        deck_version: show.deck_version(),
        cover_version: show.cover_version(),
        strip: ThumbnailStrip::new(),
        stop_blink: Blink::new(options.blink),
        cover_blink: Blink::new(options.blink),
        notice: None,
        display_test: DisplayTest::default(),
    };

    // Command line files behave like the dialogs
    if let Some(cover) = options.cover {
        operator.apply(Action::SetCover(cover), &mut show, &mut rl, &thread);
    }
    if let Some(pdf) = options.pdf {
        operator.apply(Action::Open(pdf), &mut show, &mut rl, &thread);
    }

    'main: while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        let panel = Panel::new(rl.get_screen_width() as f32, rl.get_screen_height() as f32);
        operator.strip.area = panel.strip;

        for action in operator.input(&mut rl, &panel, &show) {
            if operator.apply(action, &mut show, &mut rl, &thread) {
                break 'main;
            }
        }

        operator.display_test.reap();
        operator.draw(&mut rl, &thread, &panel, &show, dt);
    }

    show.close();
    Ok(())
}

impl Operator {
    fn input(&mut self, rl: &mut RaylibHandle, panel: &Panel, show: &Show) -> Vec<Action> {
        let mut actions = Vec::new();
        let mouse = rl.get_mouse_position();
        let len = show.deck().len();

        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            if let Some(action) = panel.button_at(mouse) {
                actions.push(action);
            } else if let Some(index) = self.strip.hit(mouse, len) {
                actions.push(Action::GoTo(index));
            }
        }

        let wheel = rl.get_mouse_wheel_move();
        if wheel != 0.0 && panel.strip.check_collision_point_rec(mouse) {
            self.strip.scroll_by(-wheel * (THUMB_WIDTH + THUMB_GAP) * 0.5, len);
        }

        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) || rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            actions.push(Action::Next);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
            actions.push(Action::Prev);
        }
        let ctrl = rl.is_key_down(KeyboardKey::KEY_LEFT_CONTROL) || rl.is_key_down(KeyboardKey::KEY_RIGHT_CONTROL);
        if ctrl && rl.is_key_pressed(KeyboardKey::KEY_O) {
            actions.push(Action::OpenDialog);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_ESCAPE) {
            actions.push(Action::Close);
        }

        if rl.is_file_dropped() {
            let dropped = rl.load_dropped_files();
            for path in dropped.paths() {
                if let Some(action) = dropped_action(Path::new(path)) {
                    actions.push(action);
                }
            }
        }

        actions
    }

    /// Returns true when the operator should exit.
    fn apply(&mut self, action: Action, show: &mut Show, rl: &mut RaylibHandle, thread: &RaylibThread) -> bool {
        let navigates = matches!(action, Action::Open(_) | Action::Next | Action::Prev | Action::GoTo(_));
        let result = match action {
            Action::OpenDialog => {
                let picked = rfd::FileDialog::new()
                    .set_title("Open PDF")
                    .add_filter("PDF Files", &["pdf"])
                    .pick_file();
                return picked.is_some_and(|path| self.apply(Action::Open(path), show, rl, thread));
            }
            Action::CoverDialog => {
                let picked = rfd::FileDialog::new()
                    .set_title("Set Cover Image")
                    .add_filter("Images", &["png", "jpg", "jpeg"])
                    .pick_file();
                return picked.is_some_and(|path| self.apply(Action::SetCover(path), show, rl, thread));
            }
            Action::Open(path) => show.open_document(&path).map(|_| ()),
            Action::SetCover(path) => show.set_cover(&path).map(|_| {
                self.notice = Some(Notice::new(Level::Info, "Cover Set", "Cover image set successfully."));
            }),
            Action::ToggleCover => show.toggle_cover().map(|_| ()),
            Action::ToggleStop => show.toggle_stop().map(|_| ()),
            Action::Next => show.next(),
            Action::Prev => show.prev(),
            Action::GoTo(index) => show.go_to(index),
            Action::CycleDisplay => {
                self.monitors = display::monitor_count();
                show.rebind_display((show.display() + 1) % self.monitors);
                Ok(())
            }
            Action::TestOutput => {
                self.monitors = display::monitor_count();
                self.display_test.start(&self.program, self.monitors);
                Ok(())
            }
            Action::Close => {
                // The cover locks the presentation open
                return show.can_close();
            }
        };

        // A failed output push still leaves a new deck or cover behind
        self.sync_textures(show, rl, thread);
        if let Err(e) = result {
            self.report(&e);
        }
        if navigates {
            self.strip.reveal(show.state().current(), show.deck().len());
        }
        false
    }

    fn sync_textures(&mut self, show: &Show, rl: &mut RaylibHandle, thread: &RaylibThread) {
        if self.deck_version != show.deck_version() {
            self.deck_version = show.deck_version();
            self.pages = show
                .deck()
                .iter()
                .map(|page| PageTextures {
                    preview: texture_or_log(load_page_texture(rl, thread, page, PREVIEW_WIDTH, PREVIEW_HEIGHT)),
                    thumb: texture_or_log(load_page_texture(rl, thread, page, THUMB_TEXTURE_WIDTH, THUMB_TEXTURE_HEIGHT)),
                })
                .collect();
            self.strip.scroll = 0.0;
        }
        if self.cover_version != show.cover_version() {
            self.cover_version = show.cover_version();
            self.cover = show.cover().and_then(|page| {
                texture_or_log(load_page_texture(rl, thread, page, THUMB_TEXTURE_WIDTH, THUMB_TEXTURE_HEIGHT))
            });
        }
    }

    fn report(&mut self, error: &ShowError) {
        match error {
            ShowError::NoCover => tracing::warn!("{}", error),
            _ => tracing::error!("{}", error),
        }
        self.notice = Some(Notice::from_error(error));
    }

    fn draw(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, panel: &Panel, show: &Show, dt: f32) {
        let state = show.state();
        let stop_lit = self.stop_blink.tick(dt, state.is_stopped());
        let cover_lit = self.cover_blink.tick(dt, state.is_cover_shown());
        if let Some(notice) = self.notice.as_mut() {
            if !notice.tick(dt) {
                self.notice = None;
            }
        }

        let mut d = rl.begin_drawing(thread);
        d.clear_background(BACKGROUND);

        // --- Controls ---
        draw_button(&mut d, panel.open, "Open PDF", false);
        d.draw_text("Output:", panel.output_label.x as i32, panel.output_label.y as i32, BUTTON_FONT, Color::WHITE);
        draw_button(&mut d, panel.display, &format!("Display {} >", show.display() + 1), false);
        draw_button(&mut d, panel.test, "Test Output", false);
        draw_button(&mut d, panel.stop, "Stop Slideshow", stop_lit);
        draw_button(&mut d, panel.set_cover, "Set Cover", false);
        draw_button(&mut d, panel.show_cover, "Show Cover", cover_lit);
        if let Some(cover) = &self.cover {
            draw_fitted(&mut d, cover, panel.cover_thumb);
        }

        // --- Previews ---
        let previews = show.previews();
        for (title, rect, index) in [("Current Page", panel.current, previews.current), ("Next Page", panel.next, previews.next)] {
            let title_width = measure_text(title, LABEL_FONT);
            let title_y = rect.y - LABEL_FONT as f32 - MARGIN;
            d.draw_text(title, (rect.x + (rect.width - title_width as f32) * 0.5) as i32, title_y as i32, LABEL_FONT, Color::WHITE);
            d.draw_rectangle_rec(rect, PREVIEW_BACKGROUND);
            if let Some(texture) = index.and_then(|i| self.pages.get(i)).and_then(|t| t.preview.as_ref()) {
                draw_fitted(&mut d, texture, rect);
            }
            d.draw_rectangle_lines_ex(rect, 2.0, Color::WHITE);
        }

        draw_button(&mut d, panel.prev_button, "Prev <", false);
        draw_button(&mut d, panel.next_button, "Next >", false);

        // --- Thumbnail strip ---
        d.draw_rectangle_rec(panel.strip, STRIP_BACKGROUND);
        {
            let area = panel.strip;
            let mut s = d.begin_scissor_mode(area.x as i32, area.y as i32, area.width as i32, area.height as i32);
            for (i, textures) in self.pages.iter().enumerate() {
                let cell = self.strip.cell(i);
                if cell.x + cell.width < area.x || cell.x > area.x + area.width {
                    continue;
                }
                let thumb = Rectangle::new(cell.x, cell.y, THUMB_WIDTH, THUMB_HEIGHT);
                if let Some(texture) = &textures.thumb {
                    draw_fitted(&mut s, texture, thumb);
                }
                if previews.current == Some(i) {
                    s.draw_rectangle_lines_ex(thumb, 3.0, BUTTON_COLOR);
                }
                let number = (i + 1).to_string();
                let number_width = measure_text(&number, LABEL_FONT);
                s.draw_text(
                    &number,
                    (cell.x + (cell.width - number_width as f32) * 0.5) as i32,
                    (thumb.y + thumb.height + 4.0) as i32,
                    LABEL_FONT,
                    Color::WHITE,
                );
            }
        }

        if let Some(notice) = &self.notice {
            draw_notice(&mut d, notice);
        }
    }
}

fn dropped_action(path: &Path) -> Option<Action> {
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_lowercase();
    match extension.as_str() {
        "pdf" => Some(Action::Open(path.to_path_buf())),
        "png" | "jpg" | "jpeg" => Some(Action::SetCover(path.to_path_buf())),
        _ => {
            tracing::debug!("Ignoring dropped file {}", path.display());
            None
        }
    }
}

fn texture_or_log(texture: std::result::Result<Texture2D, String>) -> Option<Texture2D> {
    texture.map_err(|e| tracing::error!("{}", e)).ok()
}

fn draw_button(d: &mut RaylibDrawHandle, rect: Rectangle, label: &str, lit: bool) {
    let (fill, ink) = if lit { (Color::RED, Color::WHITE) } else { (BUTTON_COLOR, Color::BLACK) };
    d.draw_rectangle_rounded(rect, 0.3, 8, fill);
    let width = measure_text(label, BUTTON_FONT);
    d.draw_text(
        label,
        (rect.x + (rect.width - width as f32) * 0.5) as i32,
        (rect.y + (rect.height - BUTTON_FONT as f32) * 0.5) as i32,
        BUTTON_FONT,
        ink,
    );
}

fn draw_notice(d: &mut RaylibDrawHandle, notice: &Notice) {
    let fill = match notice.level {
        Level::Info => Color::DARKGREEN,
        Level::Warning => Color::ORANGE,
        Level::Error => Color::MAROON,
    };
    let text = format!("{}: {}", notice.title, notice.text);
    let width = measure_text(&text, LABEL_FONT) as f32 + MARGIN * 4.0;
    let x = d.get_screen_width() as f32 - width - MARGIN;
    let rect = Rectangle::new(x, MARGIN, width, BUTTON_HEIGHT);
    d.draw_rectangle_rounded(rect, 0.3, 8, fill);
    d.draw_text(&text, (x + MARGIN * 2.0) as i32, (rect.y + (rect.height - LABEL_FONT as f32) * 0.5) as i32, LABEL_FONT, Color::WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_files_are_routed_by_extension() {
        assert_eq!(dropped_action(Path::new("/talks/deck.PDF")), Some(Action::Open("/talks/deck.PDF".into())));
        assert_eq!(dropped_action(Path::new("cover.jpeg")), Some(Action::SetCover("cover.jpeg".into())));
        assert_eq!(dropped_action(Path::new("notes.txt")), None);
        assert_eq!(dropped_action(Path::new("Makefile")), None);
    }

    #[test]
    fn panel_regions_do_not_overlap() {
        let panel = Panel::new(1920.0, 1080.0);
        assert!(panel.current.x + panel.current.width <= panel.next.x);
        assert!(panel.current.y + panel.current.height <= panel.prev_button.y);
        assert!(panel.prev_button.y + panel.prev_button.height <= panel.strip.y);
        assert!(panel.strip.height >= THUMB_HEIGHT + THUMB_LABEL_HEIGHT);
        assert_eq!(panel.current.width, PREVIEW_WIDTH);
    }

    #[test]
    fn buttons_are_hit_tested() {
        let panel = Panel::new(1920.0, 1080.0);
        let centre = |r: Rectangle| Vector2::new(r.x + r.width * 0.5, r.y + r.height * 0.5);
        assert_eq!(panel.button_at(centre(panel.stop)), Some(Action::ToggleStop));
        assert_eq!(panel.button_at(centre(panel.show_cover)), Some(Action::ToggleCover));
        assert_eq!(panel.button_at(centre(panel.next_button)), Some(Action::Next));
        assert_eq!(panel.button_at(centre(panel.current)), None);
    }
}
