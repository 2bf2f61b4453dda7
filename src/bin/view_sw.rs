use anyhow::Context;
use clap::Parser;
use glam::DVec2;
use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use voxdoom::{
    Settings,
    editor::{EDITOR_DIMS, Editor, Tool},
    engine::FrameRenderer,
    renderer::{DrawCall, RendererExt, Software, overlay},
    sim::{Buttons, Enemies, InputSnapshot, MainMenuItem, Mode, PauseItem, Player},
    world::Grid,
};

/// Software-rendered grid raycaster with a built-in block editor.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, default_value_t = 1280)]
    width: usize,
    #[arg(long, default_value_t = 720)]
    height: usize,
    /// Horizontal field of view in degrees.
    #[arg(long)]
    fov: Option<f64>,
    /// DDA step budget per ray.
    #[arg(long, default_value_t = 800)]
    max_steps: u32,
    /// Enemies scattered around the room.
    #[arg(long, default_value_t = 3)]
    enemies: usize,
    /// Open straight into the editor.
    #[arg(long)]
    editor: bool,
    /// Debug logging (overridden by RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

const BINDINGS: &[(Key, Buttons)] = &[
    (Key::W, Buttons::FORWARD),
    (Key::S, Buttons::BACK),
    (Key::A, Buttons::LEFT),
    (Key::D, Buttons::RIGHT),
    (Key::Space, Buttons::UP),
    (Key::E, Buttons::UP),
    (Key::LeftShift, Buttons::DOWN),
    (Key::Q, Buttons::DOWN),
    (Key::LeftCtrl, Buttons::RUN),
    (Key::Escape, Buttons::PAUSE),
    (Key::Enter, Buttons::CONFIRM),
    (Key::Up, Buttons::MENU_UP),
    (Key::Down, Buttons::MENU_DOWN),
    (Key::G, Buttons::CYCLE_GRID),
    (Key::H, Buttons::TOGGLE_GRID),
    (Key::T, Buttons::TOGGLE_TOOLTIPS),
    (Key::R, Buttons::TOGGLE_RASTER),
    (Key::Key1, Buttons::TOOL_1),
    (Key::Key2, Buttons::TOOL_2),
    (Key::Key3, Buttons::TOOL_3),
    (Key::Key4, Buttons::TOOL_4),
    (Key::Key5, Buttons::TOOL_5),
];

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn poll(win: &Window, prev: &InputSnapshot) -> InputSnapshot {
    let mut held = BINDINGS
        .iter()
        .filter(|(k, _)| win.is_key_down(*k))
        .fold(Buttons::empty(), |acc, (_, b)| acc | *b);
    if win.get_mouse_down(MouseButton::Left) {
        held |= Buttons::PRIMARY;
    }
    if win.get_mouse_down(MouseButton::Right) {
        held |= Buttons::LOOK;
    }
    if win.get_mouse_down(MouseButton::Middle) {
        held |= Buttons::SECONDARY;
    }
    let mouse = win
        .get_mouse_pos(MouseMode::Clamp)
        .map_or(prev.mouse_pos, |(x, y)| DVec2::new(x as f64, y as f64));
    let wheel = win.get_scroll_wheel().map_or(0.0, |(_, y)| y as f64);
    prev.advance(held, mouse, wheel)
}

fn spawn_enemies(n: usize, grid: &Grid, settings: &Settings) -> Enemies {
    let mut enemies = Enemies::new();
    let (w, _, d) = grid.dims();
    // spread along the room's diagonal, clear of the spawn tile
    for i in 0..n {
        let t = (i + 1) as f64 / (n + 1) as f64;
        let pos = DVec2::new(
            2.5 + t * (w as f64 - 5.0),
            2.5 + (1.0 - t) * (d as f64 - 5.0),
        ) * settings.tile_size;
        enemies.spawn(pos, i as f64, settings.tile_size * 0.8);
    }
    enemies
}

fn title(mode: Mode, editor: &Editor) -> String {
    match mode {
        Mode::MainMenu { selected } => format!("voxdoom | {}", selected.label()),
        Mode::Paused { selected } => format!("voxdoom | paused | {}", selected.label()),
        Mode::Playing => "voxdoom".to_string(),
        Mode::Quit => "voxdoom | bye".to_string(),
        Mode::Editor => {
            let tool = editor.tool().info();
            let mut s = format!("voxdoom editor | {} | snap {}", tool.label, editor.grid_size());
            if let Some(c) = editor.placement() {
                s += &format!(" | at {} {} {}", c.x, c.y, c.z);
            }
            if editor.show_tooltips {
                s += &format!(" | {}", tool.tooltip);
            }
            s
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let defaults = Settings::default();
    let settings = Settings {
        width: args.width,
        height: args.height,
        fov: args.fov.map_or(defaults.fov, f64::to_radians),
        max_steps: args.max_steps,
        ..defaults
    }
    .validate()
    .context("bad settings")?;

    let (gw, gh, gd) = EDITOR_DIMS;
    let mut grid = Grid::walled_room(gw, gh, gd)?;
    let enemies = spawn_enemies(args.enemies, &grid, &settings);
    let mut player = Player::spawn(&settings);
    let mut editor = Editor::new(&grid, &settings);
    let mut frame = FrameRenderer::new(&settings);
    let screen = *frame.screen();
    let mut renderer = Software::default();

    let mut mode = if args.editor { Mode::Editor } else { Mode::default() };
    let mut win = Window::new(
        &title(mode, &editor),
        settings.width,
        settings.height,
        WindowOptions::default(),
    )?;
    win.set_target_fps(settings.fps as usize);
    info!(
        w = settings.width,
        h = settings.height,
        rays = frame.num_rays(),
        "window open"
    );

    let mut input = InputSnapshot::default();
    let mut calls: Vec<DrawCall> = Vec::with_capacity(frame.num_rays() + 16);
    let mut shown_title = String::new();

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();
    let mut last_frame = Instant::now();

    while win.is_open() && mode != Mode::Quit {
        let t0 = Instant::now();
        let dt = (t0 - last_frame).as_secs_f64();
        last_frame = t0;

        // grid edits from the previous frame land before anything reads it
        editor.apply_pending(&mut grid)?;

        input = poll(&win, &input);
        let next = mode.next(&input);
        if mode.starts_new_game(next) {
            player = Player::spawn(&settings);
        }
        if next != mode {
            info!(from = ?mode, to = ?next, "mode");
        }
        mode = next;

        calls.clear();
        match mode {
            Mode::MainMenu { selected } => {
                overlay::menu_background(&screen, &mut calls);
                let i = MainMenuItem::ALL.iter().position(|&m| m == selected);
                overlay::menu(&screen, MainMenuItem::ALL.len(), i.unwrap_or(0), &mut calls);
            }
            Mode::Playing | Mode::Paused { .. } => {
                if mode == Mode::Playing {
                    player.update(dt, &input, &grid, &settings);
                }
                let cam = player.camera(settings.fov);
                let sprites = enemies.visible_sprites(&cam, &frame.projector);
                calls.extend_from_slice(frame.draw_calls(&cam, &grid, sprites));
                if let Mode::Paused { selected } = mode {
                    let i = PauseItem::ALL.iter().position(|&p| p == selected);
                    overlay::menu(&screen, PauseItem::ALL.len(), i.unwrap_or(0), &mut calls);
                }
            }
            Mode::Editor => {
                editor.update(dt, &input, &grid, &screen);
                if editor.raster_view {
                    let cam = editor.camera.column_camera();
                    calls.extend_from_slice(frame.draw_calls(&cam, &grid, std::iter::empty()));
                } else {
                    calls.push(DrawCall::Backdrop {
                        horizon: screen.half_h,
                    });
                }
                editor.overlay(&grid, &screen, &mut calls);
                overlay::tool_strip(Tool::ALL.len(), editor.tool() as usize, &mut calls);
            }
            Mode::Quit => break,
        }

        let t = title(mode, &editor);
        if t != shown_title {
            win.set_title(&t);
            shown_title = t;
        }

        let mut submitted = Ok(());
        renderer.draw_frame(screen.w, screen.h, &calls, |fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            submitted = win.update_with_buffer(fb, w, h);
        });
        submitted?;

        // ─────────── report every ~3 s ────────────────────
        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            info!("avg render: {avg_ms:.2} ms ({:.1} FPS)", 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
