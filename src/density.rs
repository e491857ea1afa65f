use std::f64::consts::PI;

use rand::Rng;
use serde::Serialize;

use crate::head_to_head::HeadToHead;

pub const CURVE_POINTS: usize = 100;
const VARIANCE_FALLBACK: f64 = 0.1;
const VARIANCE_FLOOR: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CurveKind {
    WinA,
    WinB,
    Draw,
}

#[derive(Debug, Clone, Serialize)]
pub struct DensityCurve {
    pub kind: CurveKind,
    pub mu: f64,
    pub sigma: f64,
    pub points: Vec<(f64, f64)>,
}

impl DensityCurve {
    pub fn new(kind: CurveKind, mu: f64, n: usize) -> Self {
        let sigma = sigma_for(mu, n);
        let points = linspace(0.0, 1.0, CURVE_POINTS)
            .into_iter()
            .map(|x| (x, normal_pdf(x, mu, sigma)))
            .collect();
        Self {
            kind,
            mu,
            sigma,
            points,
        }
    }

    pub fn peak(&self) -> f64 {
        self.points.iter().map(|&(_, y)| y).fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DensityPlot {
    pub matches: usize,
    pub curves: Vec<DensityCurve>,
    pub marker: f64,
}

impl DensityPlot {
    // The draw curve is centred on the smoothed draw probability, the win
    // curves on the raw win rates.
    pub fn from_head_to_head<R: Rng>(h2h: &HeadToHead, rng: &mut R) -> Self {
        let n = h2h.matches;
        let curves = vec![
            DensityCurve::new(CurveKind::WinA, h2h.win_rate_a(), n),
            DensityCurve::new(CurveKind::WinB, h2h.win_rate_b(), n),
            DensityCurve::new(CurveKind::Draw, h2h.proba_draw, n),
        ];
        Self {
            matches: n,
            curves,
            marker: reference_marker(rng),
        }
    }

    pub fn curve(&self, kind: CurveKind) -> Option<&DensityCurve> {
        self.curves.iter().find(|c| c.kind == kind)
    }

    pub fn y_max(&self) -> f64 {
        self.curves
            .iter()
            .map(DensityCurve::peak)
            .fold(0.0, f64::max)
    }
}

pub fn variance_for(mu: f64, n: usize) -> f64 {
    if n == 0 {
        return VARIANCE_FALLBACK;
    }
    mu * (1.0 - mu) / n as f64
}

pub fn sigma_for(mu: f64, n: usize) -> f64 {
    variance_for(mu, n).max(VARIANCE_FLOOR).sqrt()
}

pub fn normal_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma;
    (-0.5 * z * z).exp() / (sigma * (2.0 * PI).sqrt())
}

pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

pub fn reference_marker<R: Rng>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..1.0)
}
