//! Grounding counters for profiling.
//!
//! With the `tracing` feature, [`GroundingMetrics`] keeps relaxed atomic
//! counters updated by instantiation, joins and the fact-layer fixpoint.
//! Without it every method is an empty inline function and `report()` is all
//! zeros.
//!
//! ```rust,ignore
//! let grounder = Grounder::new(&task)?;
//! let layers = run_fact_layers(&grounder, task.initial_state(), task.goal(), &config)?;
//! println!("{}", grounder.metrics().report());
//! ```

#[cfg(feature = "tracing")]
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "tracing")]
#[derive(Debug)]
pub struct GroundingMetrics {
    /// Calls into the lifted instantiation pipeline
    pub instantiations: AtomicU64,
    /// Calls answered by the statically-inapplicable flag
    pub static_short_circuits: AtomicU64,
    /// Calls ended by an empty fluent selection
    pub fluent_short_circuits: AtomicU64,
    /// Pairwise joins performed
    pub joins: AtomicU64,
    /// Joins with no shared variable
    pub cross_products: AtomicU64,
    /// Rows produced by joins, after deduplication
    pub tuples_emitted: AtomicU64,
    /// Rows removed by equality filters
    pub tuples_filtered: AtomicU64,
    /// Largest intermediate table seen
    pub max_table_size: AtomicU64,
    pub fact_layer_passes: AtomicU64,
    pub facts_added: AtomicU64,
}

#[cfg(feature = "tracing")]
impl GroundingMetrics {
    pub fn new() -> Self {
        Self {
            instantiations: AtomicU64::new(0),
            static_short_circuits: AtomicU64::new(0),
            fluent_short_circuits: AtomicU64::new(0),
            joins: AtomicU64::new(0),
            cross_products: AtomicU64::new(0),
            tuples_emitted: AtomicU64::new(0),
            tuples_filtered: AtomicU64::new(0),
            max_table_size: AtomicU64::new(0),
            fact_layer_passes: AtomicU64::new(0),
            facts_added: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_instantiation(&self) {
        self.instantiations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_static_short_circuit(&self) {
        self.static_short_circuits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_fluent_short_circuit(&self) {
        self.fluent_short_circuits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one join and the size of its output.
    #[inline]
    pub fn record_join(&self, cross_product: bool, output: usize) {
        self.joins.fetch_add(1, Ordering::Relaxed);
        if cross_product {
            self.cross_products.fetch_add(1, Ordering::Relaxed);
        }
        self.tuples_emitted.fetch_add(output as u64, Ordering::Relaxed);
        self.update_max_table_size(output as u64);
    }

    #[inline]
    pub fn record_filtered(&self, removed: usize) {
        self.tuples_filtered.fetch_add(removed as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_pass(&self, facts_added: usize) {
        self.fact_layer_passes.fetch_add(1, Ordering::Relaxed);
        self.facts_added.fetch_add(facts_added as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn update_max_table_size(&self, size: u64) {
        let mut current = self.max_table_size.load(Ordering::Relaxed);
        while size > current {
            match self.max_table_size.compare_exchange_weak(
                current,
                size,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(c) => current = c,
            }
        }
    }

    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            instantiations: self.instantiations.load(Ordering::Relaxed),
            static_short_circuits: self.static_short_circuits.load(Ordering::Relaxed),
            fluent_short_circuits: self.fluent_short_circuits.load(Ordering::Relaxed),
            joins: self.joins.load(Ordering::Relaxed),
            cross_products: self.cross_products.load(Ordering::Relaxed),
            tuples_emitted: self.tuples_emitted.load(Ordering::Relaxed),
            tuples_filtered: self.tuples_filtered.load(Ordering::Relaxed),
            max_table_size: self.max_table_size.load(Ordering::Relaxed),
            fact_layer_passes: self.fact_layer_passes.load(Ordering::Relaxed),
            facts_added: self.facts_added.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.instantiations,
            &self.static_short_circuits,
            &self.fluent_short_circuits,
            &self.joins,
            &self.cross_products,
            &self.tuples_emitted,
            &self.tuples_filtered,
            &self.max_table_size,
            &self.fact_layer_passes,
            &self.facts_added,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

#[cfg(feature = "tracing")]
impl Default for GroundingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsReport {
    pub instantiations: u64,
    pub static_short_circuits: u64,
    pub fluent_short_circuits: u64,
    pub joins: u64,
    pub cross_products: u64,
    pub tuples_emitted: u64,
    pub tuples_filtered: u64,
    pub max_table_size: u64,
    pub fact_layer_passes: u64,
    pub facts_added: u64,
}

impl MetricsReport {
    /// Fraction of instantiations that ended before any join.
    pub fn short_circuit_rate(&self) -> f64 {
        if self.instantiations == 0 {
            0.0
        } else {
            (self.static_short_circuits + self.fluent_short_circuits) as f64
                / self.instantiations as f64
        }
    }

    pub fn avg_join_output(&self) -> f64 {
        if self.joins == 0 {
            0.0
        } else {
            self.tuples_emitted as f64 / self.joins as f64
        }
    }
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Grounding Metrics ===")?;
        writeln!(
            f,
            "Instantiations:     {} ({} static / {} fluent short-circuits, {:.1}%)",
            self.instantiations,
            self.static_short_circuits,
            self.fluent_short_circuits,
            self.short_circuit_rate() * 100.0
        )?;
        writeln!(
            f,
            "Joins:              {} ({} cross products, {:.1} rows avg)",
            self.joins,
            self.cross_products,
            self.avg_join_output()
        )?;
        writeln!(
            f,
            "Rows:               {} emitted, {} filtered, max table {}",
            self.tuples_emitted, self.tuples_filtered, self.max_table_size
        )?;
        writeln!(
            f,
            "Fact layers:        {} passes, {} facts added",
            self.fact_layer_passes, self.facts_added
        )?;
        Ok(())
    }
}

#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct GroundingMetrics;

#[cfg(not(feature = "tracing"))]
impl GroundingMetrics {
    #[inline]
    pub fn new() -> Self {
        GroundingMetrics
    }
    #[inline]
    pub fn record_instantiation(&self) {}
    #[inline]
    pub fn record_static_short_circuit(&self) {}
    #[inline]
    pub fn record_fluent_short_circuit(&self) {}
    #[inline]
    pub fn record_join(&self, _cross_product: bool, _output: usize) {}
    #[inline]
    pub fn record_filtered(&self, _removed: usize) {}
    #[inline]
    pub fn record_pass(&self, _facts_added: usize) {}
    #[inline]
    pub fn update_max_table_size(&self, _size: u64) {}
    #[inline]
    pub fn report(&self) -> MetricsReport {
        MetricsReport::default()
    }
    #[inline]
    pub fn reset(&self) {}
}

#[cfg(not(feature = "tracing"))]
impl Default for GroundingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/metrics.rs"]
mod tests;
