//! Determinism utilities: stable ordering for parties.
//!
//! This module is **I/O-free**. It provides:
//! - A stable total order for core tokens (`StableOrd`)
//! - `PartyOrder`: the canonical party-column order of an input table, used as
//!   the tie-break order everywhere downstream

use core::cmp::Ordering;

use crate::ids::PartyId;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/* -------------------------------------------------------------------------- */
/*                               Stable Ordering                              */
/* -------------------------------------------------------------------------- */

/// Provide a **total**, stable order for values that must sort canonically.
pub trait StableOrd {
    fn stable_cmp(&self, other: &Self) -> Ordering;
}

impl StableOrd for PartyId {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

/* -------------------------------------------------------------------------- */
/*                               Canonical order                              */
/* -------------------------------------------------------------------------- */

/// Canonical party order: the position of each party column in the input header.
///
/// Parties not present in the order sort after every known party, then by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartyOrder {
    parties: Vec<PartyId>,
    index: BTreeMap<PartyId, usize>,
}

impl PartyOrder {
    /// Build from column order. Repeated ids keep their first position.
    pub fn new<I: IntoIterator<Item = PartyId>>(parties: I) -> Self {
        let mut out = PartyOrder::default();
        for p in parties {
            out.push(p);
        }
        out
    }

    /// Append a party if it is not already known.
    pub fn push(&mut self, party: PartyId) {
        if !self.index.contains_key(&party) {
            self.index.insert(party.clone(), self.parties.len());
            self.parties.push(party);
        }
    }

    #[inline]
    pub fn position(&self, party: &PartyId) -> Option<usize> {
        self.index.get(party).copied()
    }

    #[inline]
    pub fn parties(&self) -> &[PartyId] {
        &self.parties
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parties.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }

    /// Compare two parties by canonical position (unknown last, then by name).
    pub fn cmp(&self, a: &PartyId, b: &PartyId) -> Ordering {
        match (self.position(a), self.position(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.stable_cmp(b),
        }
    }

    /// Sort parties **in place** into canonical order.
    pub fn sort(&self, xs: &mut [PartyId]) {
        xs.sort_by(|a, b| self.cmp(a, b));
    }
}

/* ---------------------------------- Tests --------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn pid(s: &str) -> PartyId { s.parse().unwrap() }

    #[test]
    fn column_order_wins_over_name_order() {
        let order = PartyOrder::new(vec![pid("Zeta"), pid("Alpha"), pid("Mid")]);
        assert_eq!(order.cmp(&pid("Zeta"), &pid("Alpha")), Ordering::Less);
        let mut xs = vec![pid("Mid"), pid("Alpha"), pid("Zeta")];
        order.sort(&mut xs);
        let got: Vec<&str> = xs.iter().map(|p| p.as_str()).collect();
        assert_eq!(got, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn unknown_parties_sort_last_by_name() {
        let order = PartyOrder::new(vec![pid("B")]);
        let mut xs = vec![pid("Y"), pid("X"), pid("B")];
        order.sort(&mut xs);
        let got: Vec<&str> = xs.iter().map(|p| p.as_str()).collect();
        assert_eq!(got, vec!["B", "X", "Y"]);
    }

    #[test]
    fn duplicates_keep_first_position() {
        let order = PartyOrder::new(vec![pid("A"), pid("B"), pid("A")]);
        assert_eq!(order.len(), 2);
        assert_eq!(order.position(&pid("A")), Some(0));
        assert_eq!(order.position(&pid("B")), Some(1));
    }
}
