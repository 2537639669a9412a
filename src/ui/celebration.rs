use crate::app::App;
use crate::models::WishUi;
use crate::scene::driver::Surface;
use crate::scene::geometry::{self, Cake, Lissajous, Point, CAKE_MIN_ALPHA};
use crate::scene::SceneFrame;
use crate::ui::utils::{blend, hex_to_rgb, render_footer, render_header};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Line,
    widgets::canvas::{Canvas, Circle, Context, Line as Segment, Points},
    widgets::Paragraph,
    Frame,
};

/// Rows used around the canvas: header, prompt, actions and footer.
const CHROME_ROWS: u16 = 6;

/// Canvas size in cells for a terminal of the given size.
pub fn canvas_viewport(width: u16, height: u16) -> (u16, u16) {
    (width, height.saturating_sub(CHROME_ROWS))
}

/// (scale multiplier, phase offset, alpha) for the three curves.
const CURVES: [(f64, f64, f64); 3] = [(1.0, 0.0, 0.9), (0.86, 1.2, 0.75), (1.12, -0.8, 0.6)];

pub fn draw(f: &mut Frame, app: &App) {
    render_header(f, app);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_scene(f, app, chunks[1]);
    draw_prompt(f, app, chunks[2]);
    draw_actions(f, app, chunks[3]);

    render_footer(f, app, "m: music | q: quit");
}

struct Palette {
    bg: Color,
    grid: Color,
    curves: [Color; 3],
    plate: Color,
    icing: Color,
    candle: Color,
    flame: Color,
    sparkle: Color,
}

impl Palette {
    fn from_app(app: &App) -> Self {
        let bg = hex_to_rgb(&app.theme.bg);
        let main = hex_to_rgb(&app.theme.main);
        let accent = hex_to_rgb(&app.theme.accent);
        let text = hex_to_rgb(&app.theme.text);
        Self {
            bg,
            grid: hex_to_rgb(&app.theme.sub_alt),
            curves: [
                blend(main, bg, CURVES[0].2),
                blend(accent, bg, CURVES[1].2),
                blend(text, bg, CURVES[2].2),
            ],
            plate: main,
            icing: accent,
            candle: main,
            flame: text,
            sparkle: text,
        }
    }
}

fn draw_scene(f: &mut Frame, app: &App, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let surface = match app.animator.surface() {
        s if s.width > 0 && s.height > 0 => s,
        _ => Surface::from_cells(area.width, area.height),
    };
    let frame = app.scene.latest().unwrap_or(SceneFrame {
        time_s: 0.0,
        morph: 0.0,
    });
    let palette = Palette::from_app(app);

    let w = surface.width as f64;
    let h = surface.height as f64;

    let canvas = Canvas::default()
        .background_color(palette.bg)
        .marker(Marker::Braille)
        .x_bounds([0.0, w])
        .y_bounds([0.0, h])
        .paint(|ctx| paint(ctx, w, h, frame, &palette));

    f.render_widget(canvas, area);
}

fn paint(ctx: &mut Context, w: f64, h: f64, frame: SceneFrame, palette: &Palette) {
    let center = Point { x: w / 2.0, y: h / 2.0 };
    let scale = w.min(h) * 0.28;
    // geometry is y-down, the canvas is y-up
    let flip = |p: Point| (p.x, h - p.y);

    let grid = (scale / 6.0).round().max(28.0);
    let mut x = center.x % grid;
    while x < w {
        ctx.draw(&Segment::new(x, 0.0, x, h, palette.grid));
        x += grid;
    }
    let mut y = center.y % grid;
    while y < h {
        ctx.draw(&Segment::new(0.0, h - y, w, h - y, palette.grid));
        y += grid;
    }
    ctx.draw(&Circle {
        x: center.x,
        y: h - center.y,
        radius: scale * 1.4,
        color: palette.grid,
    });
    ctx.layer();

    let figure = Lissajous::at(frame.time_s);
    for ((mul, offset, _), color) in CURVES.iter().zip(palette.curves) {
        let pts: Vec<Point> = geometry::curve(&figure, *offset, frame.morph)
            .into_iter()
            .map(|p| Point {
                x: center.x + p.x * scale * mul,
                y: center.y + p.y * scale * mul,
            })
            .collect();
        polyline(ctx, &pts, h, color);
    }
    ctx.layer();

    let alpha = geometry::cake_alpha(frame.morph);
    if alpha > CAKE_MIN_ALPHA {
        let cake = Cake::layout(center, scale);
        let fade = |c: Color, a: f64| blend(c, palette.bg, a * alpha);

        let plate = geometry::ellipse(cake.plate_center, cake.plate_radii, 90);
        polyline(ctx, &plate, h, fade(palette.plate, 0.5));

        for tier in [cake.lower, cake.upper] {
            rect(ctx, tier, h, fade(palette.icing, 0.5));
        }
        polyline(ctx, &cake.scallops(scale), h, fade(palette.flame, 0.55));

        for (i, candle) in cake.candles.iter().enumerate() {
            rect(ctx, *candle, h, fade(palette.candle, 0.7));
            if let Some(flame) = cake.flame(i, frame.time_s, scale) {
                polyline(ctx, &flame.outline(scale), h, fade(palette.flame, flame.brightness));
            }
        }
        ctx.layer();
    }

    let coords: Vec<(f64, f64)> = geometry::sparkles(&figure, frame.time_s, frame.morph)
        .into_iter()
        .map(|p| {
            flip(Point {
                x: center.x + p.x * scale,
                y: center.y + p.y * scale,
            })
        })
        .collect();
    ctx.draw(&Points {
        coords: &coords,
        color: blend(palette.sparkle, palette.bg, 0.75),
    });
}

fn polyline(ctx: &mut Context, pts: &[Point], h: f64, color: Color) {
    for pair in pts.windows(2) {
        ctx.draw(&Segment::new(pair[0].x, h - pair[0].y, pair[1].x, h - pair[1].y, color));
    }
}

fn rect(ctx: &mut Context, r: geometry::Rect, h: f64, color: Color) {
    let corners = [
        Point { x: r.x, y: r.y },
        Point { x: r.x + r.w, y: r.y },
        Point { x: r.x + r.w, y: r.y + r.h },
        Point { x: r.x, y: r.y + r.h },
        Point { x: r.x, y: r.y },
    ];
    polyline(ctx, &corners, h, color);
}

fn draw_prompt(f: &mut Frame, app: &App, area: Rect) {
    let Some(prompt) = app.view.prompt.as_deref() else {
        return;
    };
    let style = Style::default()
        .fg(hex_to_rgb(&app.theme.text))
        .add_modifier(Modifier::BOLD);
    let lines: Vec<Line> = prompt.lines().map(|l| Line::styled(l.to_string(), style)).collect();

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_actions(f: &mut Frame, app: &App, area: Rect) {
    let hint = match app.view.wish_ui {
        WishUi::Hidden => return,
        WishUi::Wish => "enter: make the wish",
        WishUi::Outro => "r: replay | o: read the letter",
    };

    f.render_widget(
        Paragraph::new(hint)
            .style(Style::default().fg(hex_to_rgb(&app.theme.accent)))
            .alignment(Alignment::Center),
        area,
    );
}
