//! Created / destroyed / enhanced / depleted classification.

use std::collections::BTreeMap;

use nf_core::Real;

/// Knobs for [`classify`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifyOptions {
    /// Both sides must exceed this value before a ratio is taken.
    pub floor: Real,
    /// Entries with `|log10(B/A)| <= tolerance` count as unchanged.
    /// `None` keeps every ratio, including exact ties.
    pub log_tolerance: Option<Real>,
    /// Keep only the N largest changes in the ranked view.
    pub top: Option<usize>,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            floor: 0.0,
            log_tolerance: None,
            top: None,
        }
    }
}

/// One outer-joined entry; a side missing from its input reads as 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined<K> {
    pub key: K,
    pub a: Real,
    pub b: Real,
}

/// A both-present entry with its ratio `B/A`.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioChange<K> {
    pub key: K,
    pub a: Real,
    pub b: Real,
    pub ratio: Real,
    pub log_ratio: Real,
}

impl<K> RatioChange<K> {
    pub fn is_enhanced(&self) -> bool {
        self.log_ratio > 0.0
    }

    pub fn is_depleted(&self) -> bool {
        self.log_ratio < 0.0
    }
}

/// How the ratio-based part of a comparison came out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Significance {
    /// At least one entry survived the tolerance.
    Ranked { count: usize },
    /// Ratio candidates existed but all of them were within tolerance.
    NoSignificantChange { tolerance: Real },
    /// No entry was above the floor on both sides.
    NoOverlap,
}

/// Result of comparing data set A against data set B.
///
/// Every joined entry with a positive value on at least one side lands in
/// exactly one of `created`, `destroyed`, `below_floor`, `unchanged` or
/// `ranked`.
#[derive(Debug, Clone)]
pub struct Comparison<K> {
    /// A = 0, B > 0; sorted by B descending.
    pub created: Vec<Joined<K>>,
    /// A > 0, B = 0; sorted by A descending.
    pub destroyed: Vec<Joined<K>>,
    /// Present on both sides but not above the floor on both.
    pub below_floor: Vec<Joined<K>>,
    /// Present on both sides, within the log tolerance.
    pub unchanged: Vec<RatioChange<K>>,
    /// Present on both sides, outside tolerance; sorted by |log_ratio| descending.
    pub ranked: Vec<RatioChange<K>>,
    options: ClassifyOptions,
}

impl<K> Comparison<K> {
    /// The ranked view truncated to the configured top-N.
    pub fn top(&self) -> &[RatioChange<K>] {
        let n = self.options.top.unwrap_or(self.ranked.len());
        &self.ranked[..n.min(self.ranked.len())]
    }

    pub fn enhanced(&self) -> impl Iterator<Item = &RatioChange<K>> {
        self.top().iter().filter(|c| c.is_enhanced())
    }

    pub fn depleted(&self) -> impl Iterator<Item = &RatioChange<K>> {
        self.top().iter().filter(|c| c.is_depleted())
    }

    pub fn significance(&self) -> Significance {
        if !self.ranked.is_empty() {
            Significance::Ranked {
                count: self.ranked.len(),
            }
        } else if !self.unchanged.is_empty() {
            Significance::NoSignificantChange {
                tolerance: self.options.log_tolerance.unwrap_or(0.0),
            }
        } else {
            Significance::NoOverlap
        }
    }
}

/// Outer-join `a` and `b` on key and classify every entry.
///
/// Repeated keys within one input are summed. Created/destroyed use an exact
/// zero test and ignore both the floor and the tolerance. Entries that are
/// zero on both sides are not reported anywhere.
pub fn classify<K, A, B>(a: A, b: B, options: &ClassifyOptions) -> Comparison<K>
where
    K: Ord + Clone,
    A: IntoIterator<Item = (K, Real)>,
    B: IntoIterator<Item = (K, Real)>,
{
    let mut joined: BTreeMap<K, (Real, Real)> = BTreeMap::new();
    for (key, value) in a {
        joined.entry(key).or_insert((0.0, 0.0)).0 += value;
    }
    for (key, value) in b {
        joined.entry(key).or_insert((0.0, 0.0)).1 += value;
    }

    let mut created = Vec::new();
    let mut destroyed = Vec::new();
    let mut below_floor = Vec::new();
    let mut unchanged = Vec::new();
    let mut ranked = Vec::new();

    for (key, (a, b)) in joined {
        if a == 0.0 && b > 0.0 {
            created.push(Joined { key, a, b });
        } else if a > 0.0 && b == 0.0 {
            destroyed.push(Joined { key, a, b });
        } else if a > 0.0 && b > 0.0 {
            if a <= options.floor || b <= options.floor {
                below_floor.push(Joined { key, a, b });
                continue;
            }
            let ratio = b / a;
            let change = RatioChange {
                key,
                a,
                b,
                ratio,
                log_ratio: ratio.log10(),
            };
            match options.log_tolerance {
                Some(tol) if change.log_ratio.abs() <= tol => unchanged.push(change),
                _ => ranked.push(change),
            }
        }
    }

    // BTreeMap iteration already orders by key, so a stable sort keeps
    // ties in key order.
    created.sort_by(|x, y| y.b.total_cmp(&x.b));
    destroyed.sort_by(|x, y| y.a.total_cmp(&x.a));
    ranked.sort_by(|x, y| y.log_ratio.abs().total_cmp(&x.log_ratio.abs()));

    Comparison {
        created,
        destroyed,
        below_floor,
        unchanged,
        ranked,
        options: *options,
    }
}
