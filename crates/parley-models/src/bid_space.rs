use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{Bid, Domain};

/// The full cross product of a domain's issue values.
///
/// Bids are indexed in mixed radix with the last issue varying fastest, so
/// `get(0)` assigns every issue its first value.
#[derive(Debug, Clone)]
pub struct AllBids<'a> {
    domain: &'a Domain,
}

impl<'a> AllBids<'a> {
    pub fn new(domain: &'a Domain) -> Self {
        Self { domain }
    }

    /// Number of distinct bids, or `None` if it does not fit in a `u64`.
    pub fn size(&self) -> Option<u64> {
        self.domain
            .issues
            .iter()
            .try_fold(1u64, |acc, issue| acc.checked_mul(issue.values.len() as u64))
    }

    /// Decode the bid at `index`, or `None` when out of range.
    pub fn get(&self, index: u64) -> Option<Bid> {
        if index >= self.size()? {
            return None;
        }

        let mut remainder = index;
        let mut assignment = Vec::with_capacity(self.domain.issues.len());
        for issue in self.domain.issues.iter().rev() {
            let radix = issue.values.len() as u64;
            let value = &issue.values[(remainder % radix) as usize];
            remainder /= radix;
            assignment.push((issue.name.clone(), value.clone()));
        }

        Some(assignment.into_iter().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = Bid> + '_ {
        let size = self.size().unwrap_or(u64::MAX);
        (0..size).map_while(move |index| self.get(index))
    }

    /// Draw one bid uniformly at random.
    ///
    /// Each issue value is drawn independently, which is uniform over the
    /// cross product and works for spaces too large to index.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Bid {
        self.domain
            .issues
            .iter()
            .filter_map(|issue| {
                issue
                    .values
                    .choose(rng)
                    .map(|value| (issue.name.clone(), value.clone()))
            })
            .collect()
    }
}
