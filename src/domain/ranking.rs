//! Multi-factor ranking of screened equities.
//!
//! Each metric is min-max normalized to [0, 1] in the direction that makes
//! 1 the best value. A missing value, or a metric with no spread across the
//! table, scores a neutral 0.5. The composite score is a weighted sum and the
//! rank is the 1-based position after a stable descending sort, so equal
//! scores keep their input order and ranks never repeat.

use tracing::debug;

use crate::domain::equity::EquityRecord;
use crate::domain::error::ScreenerError;

/// Normalized value used for missing inputs and degenerate ranges.
pub const NEUTRAL: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Roe,
    Dy,
    Pe,
    Pb,
    NetDebtEbitda,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Roe,
        Metric::Dy,
        Metric::Pe,
        Metric::Pb,
        Metric::NetDebtEbitda,
    ];

    pub fn direction(self) -> Direction {
        match self {
            Metric::Roe | Metric::Dy => Direction::HigherIsBetter,
            Metric::Pe | Metric::Pb | Metric::NetDebtEbitda => Direction::LowerIsBetter,
        }
    }

    pub fn value(self, record: &EquityRecord) -> Option<f64> {
        match self {
            Metric::Roe => record.roe,
            Metric::Dy => record.dy,
            Metric::Pe => record.pe,
            Metric::Pb => record.pb,
            Metric::NetDebtEbitda => record.net_debt_ebitda,
        }
    }
}

/// Composite score weights. P/E and P/B share the `valuation` weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingWeights {
    pub roe: f64,
    pub dy: f64,
    pub valuation: f64,
    pub leverage: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            roe: 0.30,
            dy: 0.30,
            valuation: 0.25,
            leverage: 0.15,
        }
    }
}

impl RankingWeights {
    /// Build a custom weighting, rescaled so the four weights sum to 1.
    pub fn new(roe: f64, dy: f64, valuation: f64, leverage: f64) -> Result<Self, ScreenerError> {
        let parts = [
            ("weight_roe", roe),
            ("weight_dy", dy),
            ("weight_valuation", valuation),
            ("weight_leverage", leverage),
        ];
        for (name, w) in parts {
            if !w.is_finite() || w < 0.0 {
                return Err(ScreenerError::InvalidParameter {
                    name: name.to_string(),
                    reason: "ranking weights must be finite and non-negative".to_string(),
                });
            }
        }
        let total = roe + dy + valuation + leverage;
        if total <= 0.0 {
            return Err(ScreenerError::InvalidParameter {
                name: "ranking weights".to_string(),
                reason: "at least one weight must be positive".to_string(),
            });
        }
        let mut scaled = [roe / total, dy / total, valuation / total, leverage / total];
        // The last positive weight takes up the remainder so the four sum to
        // exactly 1.0 without any weight dipping below zero.
        if let Some(last) = scaled.iter().rposition(|w| *w > 0.0) {
            let rest: f64 = scaled
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != last)
                .map(|(_, w)| w)
                .sum();
            scaled[last] = 1.0 - rest;
        }
        let [roe, dy, valuation, leverage] = scaled;
        Ok(Self {
            roe,
            dy,
            valuation,
            leverage,
        })
    }

    pub fn sum(&self) -> f64 {
        self.roe + self.dy + self.valuation + self.leverage
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingRow {
    pub ticker: String,
    pub roe: Option<f64>,
    pub dy: Option<f64>,
    pub pe: Option<f64>,
    pub pb: Option<f64>,
    pub net_debt_ebitda: Option<f64>,
    pub norm_roe: f64,
    pub norm_dy: f64,
    pub norm_pe: f64,
    pub norm_pb: f64,
    pub norm_net_debt_ebitda: f64,
    pub score: f64,
    pub rank: usize,
}

/// Min-max normalize a column, direction-aware, with the neutral fallback.
pub fn min_max_normalize(values: &[Option<f64>], direction: Direction) -> Vec<f64> {
    let present = values.iter().flatten().copied().filter(|v| v.is_finite());
    let bounds = present.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    });

    // Work on halves so `max - min` stays finite for bounds near f64::MAX.
    let Some((min, max)) = bounds
        .map(|(lo, hi)| (lo / 2.0, hi / 2.0))
        .filter(|(lo, hi)| hi > lo)
    else {
        return vec![NEUTRAL; values.len()];
    };
    let span = max - min;

    values
        .iter()
        .map(|v| match v {
            Some(x) if x.is_finite() => match direction {
                Direction::HigherIsBetter => (x / 2.0 - min) / span,
                Direction::LowerIsBetter => (max - x / 2.0) / span,
            },
            _ => NEUTRAL,
        })
        .collect()
}

pub fn rank(records: &[EquityRecord]) -> Vec<RankingRow> {
    rank_with(records, &RankingWeights::default())
}

pub fn rank_with(records: &[EquityRecord], weights: &RankingWeights) -> Vec<RankingRow> {
    let normalized: Vec<Vec<f64>> = Metric::ALL
        .iter()
        .map(|m| {
            let column: Vec<Option<f64>> = records.iter().map(|r| m.value(r)).collect();
            min_max_normalize(&column, m.direction())
        })
        .collect();
    let [n_roe, n_dy, n_pe, n_pb, n_lev] = [
        &normalized[0],
        &normalized[1],
        &normalized[2],
        &normalized[3],
        &normalized[4],
    ];

    let mut rows: Vec<RankingRow> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let score = weights.roe * n_roe[i]
                + weights.dy * n_dy[i]
                + weights.valuation * (n_pe[i] + n_pb[i]) / 2.0
                + weights.leverage * n_lev[i];
            RankingRow {
                ticker: r.ticker.clone(),
                roe: r.roe,
                dy: r.dy,
                pe: r.pe,
                pb: r.pb,
                net_debt_ebitda: r.net_debt_ebitda,
                norm_roe: n_roe[i],
                norm_dy: n_dy[i],
                norm_pe: n_pe[i],
                norm_pb: n_pb[i],
                norm_net_debt_ebitda: n_lev[i],
                score,
                rank: 0,
            }
        })
        .collect();

    // sort_by is stable: ties keep input order
    rows.sort_by(|a, b| b.score.total_cmp(&a.score));
    for (pos, row) in rows.iter_mut().enumerate() {
        row.rank = pos + 1;
    }
    debug!(rows = rows.len(), "ranking complete");
    rows
}
