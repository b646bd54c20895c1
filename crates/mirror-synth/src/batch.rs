//! Parallel synthesis of independent top-level types.
//!
//! Cancellation is cooperative and only observed between units: a unit
//! that has started always runs to completion, so no caller ever sees a
//! partially synthesized tree.

use mirror_model::{TypeDescriptor, TypeModel};
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::directive::InclusionDirective;
use crate::error::SynthError;
use crate::output::SynthesizedType;
use crate::synth::Synthesizer;

#[derive(Debug, Clone)]
pub struct BatchUnit<'a> {
    pub model: &'a TypeDescriptor,
    pub directive: InclusionDirective,
}

impl<'a> BatchUnit<'a> {
    pub fn new(model: &'a TypeDescriptor, directive: InclusionDirective) -> Self {
        Self { model, directive }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnitOutcome {
    Completed(SynthesizedType),
    Failed(SynthError),
    /// The token was cancelled before the unit started.
    Cancelled,
}

impl UnitOutcome {
    pub fn completed(&self) -> Option<&SynthesizedType> {
        match self {
            UnitOutcome::Completed(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, UnitOutcome::Cancelled)
    }
}

impl<'m, M: TypeModel + ?Sized> Synthesizer<'m, M> {
    /// A batch unit for `model` with the directive its annotations give it.
    pub fn batch_unit<'a>(&self, model: &'a TypeDescriptor) -> BatchUnit<'a> {
        BatchUnit::new(model, self.directive_for(model))
    }

    fn run_unit(&self, unit: &BatchUnit<'_>, token: &CancellationToken) -> UnitOutcome {
        if token.is_cancelled() {
            return UnitOutcome::Cancelled;
        }
        match self.synthesize(unit.model, &unit.directive) {
            Ok(ty) => UnitOutcome::Completed(ty),
            Err(err) => {
                tracing::warn!(target: "mirror.synth", model = %unit.model.name, error = %err, "unit failed");
                UnitOutcome::Failed(err)
            }
        }
    }
}

/// Synthesizes `units` on the global rayon pool. Outcomes are in input order.
pub fn synthesize_batch<M>(
    synth: &Synthesizer<'_, M>,
    units: &[BatchUnit<'_>],
    token: &CancellationToken,
) -> Vec<UnitOutcome>
where
    M: TypeModel + Sync + ?Sized,
{
    let outcomes: Vec<UnitOutcome> = units
        .par_iter()
        .map(|unit| synth.run_unit(unit, token))
        .collect();
    log_summary(&outcomes);
    outcomes
}

/// Like [`synthesize_batch`], on a dedicated pool of `threads` workers.
///
/// If the pool cannot be created, the thread count is halved until it can;
/// with no worker at all the units run inline on the calling thread.
pub fn synthesize_batch_with_threads<M>(
    synth: &Synthesizer<'_, M>,
    units: &[BatchUnit<'_>],
    token: &CancellationToken,
    threads: usize,
) -> Vec<UnitOutcome>
where
    M: TypeModel + Sync + ?Sized,
{
    let mut threads = threads.max(1);
    loop {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("mirror-synth-{idx}"))
            .build()
        {
            Ok(pool) => return pool.install(|| synthesize_batch(synth, units, token)),
            Err(_) if threads > 1 => threads = (threads / 2).max(1),
            Err(err) => {
                tracing::warn!(target: "mirror.synth", error = %err, "no worker threads; running inline");
                let outcomes: Vec<UnitOutcome> =
                    units.iter().map(|unit| synth.run_unit(unit, token)).collect();
                log_summary(&outcomes);
                return outcomes;
            }
        }
    }
}

fn log_summary(outcomes: &[UnitOutcome]) {
    let completed = outcomes.iter().filter(|o| o.completed().is_some()).count();
    let cancelled = outcomes.iter().filter(|o| o.is_cancelled()).count();
    tracing::debug!(
        target: "mirror.synth",
        units = outcomes.len(),
        completed,
        cancelled,
        failed = outcomes.len() - completed - cancelled,
        "batch finished"
    );
}
