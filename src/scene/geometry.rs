//! Pure geometry for the birthday scene. Everything is a function of time in
//! seconds and the heart morph progress, so any frame can be reproduced.

use std::f64::consts::TAU;

pub const CURVE_STEPS: usize = 720;
pub const SPARKLE_COUNT: usize = 10;
pub const CANDLE_COUNT: usize = 5;
/// Below this opacity the cake is not drawn at all.
pub const CAKE_MIN_ALPHA: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point {
            x: self.x * (1.0 - t) + other.x * t,
            y: self.y * (1.0 - t) + other.y * t,
        }
    }
}

/// Classic heart curve normalised to roughly [-1, 1], y pointing down.
pub fn heart_point(p: f64) -> Point {
    let x = p.sin().powi(3);
    let y = -(13.0 * p.cos() - 5.0 * (2.0 * p).cos() - 2.0 * (3.0 * p).cos() - (4.0 * p).cos()) / 17.0;
    Point { x, y }
}

/// Slowly drifting Lissajous figure.
#[derive(Debug, Clone, Copy)]
pub struct Lissajous {
    a: f64,
    b: f64,
    delta: f64,
}

impl Lissajous {
    pub fn at(time_s: f64) -> Self {
        Self {
            a: 3.0 + 0.6 * (time_s * 0.6).sin(),
            b: 2.0 + 0.4 * (time_s * 0.55).cos(),
            delta: time_s * 0.7,
        }
    }

    pub fn point(&self, p: f64, offset: f64) -> Point {
        Point {
            x: (self.a * p + self.delta + offset).sin(),
            y: (self.b * p + offset * 0.5).sin(),
        }
    }

    pub fn morphed(&self, p: f64, offset: f64, progress: f64) -> Point {
        self.point(p, offset).lerp(heart_point(p), progress)
    }
}

/// One closed curve in unit coordinates.
pub fn curve(figure: &Lissajous, offset: f64, progress: f64) -> Vec<Point> {
    (0..=CURVE_STEPS)
        .map(|i| {
            let p = i as f64 / CURVE_STEPS as f64 * TAU;
            figure.morphed(p, offset, progress)
        })
        .collect()
}

pub fn sparkles(figure: &Lissajous, time_s: f64, progress: f64) -> Vec<Point> {
    (0..SPARKLE_COUNT)
        .map(|i| {
            let i = i as f64;
            figure.morphed(time_s * 0.6 + i * 0.6, i * 0.25, progress)
        })
        .collect()
}

pub fn cake_alpha(progress: f64) -> f64 {
    1.0 - progress
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flame {
    pub base: Point,
    pub height: f64,
    pub sway: f64,
    pub brightness: f64,
}

impl Flame {
    /// Teardrop outline: two cubic curves meeting at the swaying tip.
    pub fn outline(&self, scale: f64) -> Vec<Point> {
        const SAMPLES: usize = 10;
        let b = self.base;
        let tip = Point {
            x: b.x + self.sway,
            y: b.y - self.height,
        };
        let left = [
            b,
            Point { x: b.x - scale * 0.04, y: b.y - self.height * 0.4 },
            Point { x: b.x - scale * 0.01 + self.sway, y: tip.y },
            tip,
        ];
        let right = [
            tip,
            Point { x: b.x + scale * 0.01 + self.sway, y: tip.y },
            Point { x: b.x + scale * 0.04, y: b.y - self.height * 0.4 },
            b,
        ];

        let mut points: Vec<Point> = (0..=SAMPLES).map(|k| cubic(&left, k as f64 / SAMPLES as f64)).collect();
        points.extend((1..=SAMPLES).map(|k| cubic(&right, k as f64 / SAMPLES as f64)));
        points
    }
}

fn cubic(c: &[Point; 4], t: f64) -> Point {
    let u = 1.0 - t;
    let (w0, w1, w2, w3) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    Point {
        x: w0 * c[0].x + w1 * c[1].x + w2 * c[2].x + w3 * c[3].x,
        y: w0 * c[0].y + w1 * c[1].y + w2 * c[2].y + w3 * c[3].y,
    }
}

/// Cake layout in surface pixels (y down), scaled around the centre.
#[derive(Debug, Clone)]
pub struct Cake {
    pub plate_center: Point,
    pub plate_radii: (f64, f64),
    pub lower: Rect,
    pub upper: Rect,
    pub candles: Vec<Rect>,
}

impl Cake {
    pub fn layout(center: Point, scale: f64) -> Self {
        let plate_y = center.y + scale * 0.55;

        let lower_w = scale * 1.6;
        let lower_h = scale * 0.45;
        let lower = Rect {
            x: center.x - lower_w / 2.0,
            y: plate_y - lower_h,
            w: lower_w,
            h: lower_h,
        };

        let upper_w = scale * 1.1;
        let upper_h = scale * 0.35;
        let upper = Rect {
            x: center.x - upper_w / 2.0,
            y: lower.y - upper_h + scale * 0.02,
            w: upper_w,
            h: upper_h,
        };

        let candle_w = scale * 0.035;
        let candle_h = scale * 0.15;
        let spacing = upper_w / (CANDLE_COUNT as f64 + 1.0);
        let candles = (1..=CANDLE_COUNT)
            .map(|i| {
                let cx = upper.x + spacing * i as f64;
                Rect {
                    x: cx - candle_w / 2.0,
                    y: upper.y - candle_h,
                    w: candle_w,
                    h: candle_h,
                }
            })
            .collect();

        Self {
            plate_center: Point { x: center.x, y: plate_y },
            plate_radii: (scale * 1.1, scale * 0.12),
            lower,
            upper,
            candles,
        }
    }

    /// Scalloped icing along the upper tier, as a polyline.
    pub fn scallops(&self, scale: f64) -> Vec<Point> {
        const SCALLOPS: usize = 7;
        const SAMPLES: usize = 8;
        let size = self.upper.w / SCALLOPS as f64;
        let base_y = self.upper.y + self.upper.h * 0.25;
        let dip = scale * 0.05;

        let mut points = Vec::with_capacity(SCALLOPS * SAMPLES + 1);
        points.push(Point { x: self.upper.x, y: base_y });
        for s in 0..SCALLOPS {
            let x0 = self.upper.x + s as f64 * size;
            for k in 1..=SAMPLES {
                let t = k as f64 / SAMPLES as f64;
                // quadratic bezier with the control point half way down
                let y = base_y + 2.0 * t * (1.0 - t) * dip;
                points.push(Point { x: x0 + t * size, y });
            }
        }
        points
    }

    pub fn flame(&self, candle: usize, time_s: f64, scale: f64) -> Option<Flame> {
        let rect = self.candles.get(candle)?;
        let f_time = time_s * 2.0 + (candle as f64 + 1.0) * 1.5;
        Some(Flame {
            base: Point {
                x: rect.x + rect.w / 2.0,
                y: rect.y - scale * 0.01,
            },
            height: scale * 0.08 + (f_time * 3.0).cos() * scale * 0.015,
            sway: (f_time * 5.0).sin() * scale * 0.01,
            brightness: 0.4 + (f_time * 4.0).sin() * 0.2,
        })
    }
}

pub fn ellipse(center: Point, radii: (f64, f64), steps: usize) -> Vec<Point> {
    (0..=steps)
        .map(|i| {
            let a = i as f64 / steps as f64 * TAU;
            Point {
                x: center.x + radii.0 * a.cos(),
                y: center.y + radii.1 * a.sin(),
            }
        })
        .collect()
}
