//! Constraint policy: how a (leg, country) pair is treated.

use crate::domain::Classification;

use super::Flag;

/// Outcome of applying the policy to a leg or one of its countries.
///
/// Ordered from mildest to strongest, so the verdict for a whole leg is the
/// maximum over its countries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verdict {
    Admit,
    Penalize,
    Eliminate,
}

/// The policy table.
///
/// `class` is the (leg, country) classification, `flag` the request flag
/// for that classification, and `avoided` whether the country is in the
/// request's avoid list. A classification under `Flag::Ignore` falls back to
/// the plain rule.
pub fn decide(class: Option<Classification>, flag: Flag, avoided: bool) -> Verdict {
    match (class, flag, avoided) {
        (Some(_), Flag::Strict, _) => Verdict::Eliminate,
        (Some(_), Flag::Avoid, _) => Verdict::Penalize,
        (Some(_), Flag::Ignore, true) | (None, _, true) => Verdict::Eliminate,
        (Some(_), Flag::Ignore, false) | (None, _, false) => Verdict::Admit,
    }
}
