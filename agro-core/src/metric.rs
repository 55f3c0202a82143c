//! The metric catalog: every tracked climate metric, its column identifier
//! and its display label.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

/// A tracked climate metric.
///
/// Serialized by its column identifier (e.g. `Sum_T_active`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    /// Growing-degree sum of effective temperatures above 10 °C.
    #[serde(rename = "Sum_T_active")]
    SumTActive,
    /// Sum of temperatures on days above 0 °C.
    #[serde(rename = "Sum_T_eff_0")]
    SumTEff0,
    /// Sum of temperatures on days above 10 °C.
    #[serde(rename = "Sum_T_eff_10")]
    SumTEff10,
    /// Cumulative precipitation.
    #[serde(rename = "Sum_Precipitation")]
    SumPrecipitation,
    /// Daily precipitation.
    #[serde(rename = "precipitation")]
    Precipitation,
    #[serde(rename = "min")]
    Min,
    #[serde(rename = "max")]
    Max,
    #[serde(rename = "mean")]
    Mean,
}

impl Metric {
    pub const COUNT: usize = 8;

    /// Catalog order, as offered in metric pickers.
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::SumTActive,
        Metric::SumTEff0,
        Metric::SumTEff10,
        Metric::SumPrecipitation,
        Metric::Precipitation,
        Metric::Min,
        Metric::Max,
        Metric::Mean,
    ];

    /// Column identifier in the input data.
    pub fn id(self) -> &'static str {
        match self {
            Metric::SumTActive => "Sum_T_active",
            Metric::SumTEff0 => "Sum_T_eff_0",
            Metric::SumTEff10 => "Sum_T_eff_10",
            Metric::SumPrecipitation => "Sum_Precipitation",
            Metric::Precipitation => "precipitation",
            Metric::Min => "min",
            Metric::Max => "max",
            Metric::Mean => "mean",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Metric::SumTActive => "GDD (effective T>10)",
            Metric::SumTEff0 => "Sum T (T>0)",
            Metric::SumTEff10 => "Sum T (T>10)",
            Metric::SumPrecipitation => "Accumulated precipitation",
            Metric::Precipitation => "Daily precipitation",
            Metric::Min => "Min temperature",
            Metric::Max => "Max temperature",
            Metric::Mean => "Mean temperature",
        }
    }

    pub fn from_id(id: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.id() == id)
    }

    pub fn from_label(label: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.label() == label)
    }

    /// Identifier of the cross-year norm column, e.g. `Avg_mean`.
    pub fn norm_id(self) -> String {
        format!("Avg_{}", self.id())
    }

    /// Display label of the cross-year norm column.
    pub fn norm_label(self) -> String {
        format!("Avg. {}", self.label())
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Metric values of one row. `None` is a missing cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricValues([Option<f64>; Metric::COUNT]);

impl MetricValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.0[metric.index()]
    }

    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        self.0[metric.index()] = value;
    }

    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, Some(value));
        self
    }

    /// (metric, value) pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, Option<f64>)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

impl Serialize for MetricValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Metric::COUNT))?;
        for (metric, value) in self.iter() {
            map.serialize_entry(metric.id(), &value)?;
        }
        map.end()
    }
}

/// Set of metrics, used for "which columns exist in this dataset".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricSet(u16);

impl MetricSet {
    pub fn empty() -> Self {
        MetricSet(0)
    }

    pub fn all() -> Self {
        Metric::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, metric: Metric) {
        self.0 |= 1 << metric.index();
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.0 & (1 << metric.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = Metric> + '_ {
        Metric::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<Metric> for MetricSet {
    fn from_iter<I: IntoIterator<Item = Metric>>(iter: I) -> Self {
        let mut set = MetricSet::empty();
        for metric in iter {
            set.insert(metric);
        }
        set
    }
}

impl Serialize for MetricSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for metric in self.iter() {
            seq.serialize_element(metric.id())?;
        }
        seq.end()
    }
}
