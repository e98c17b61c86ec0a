//! Selection among labelled alternative shapes.

use crate::AttrShape;
use std::collections::BTreeSet;

/// Outcome of [`ShapeSelector::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<L> {
    /// None of the selector's names are present; the element carries its
    /// value as inline content.
    Inline,
    /// Exactly one alternative matches.
    Matched(L),
    /// Some named attributes are present but no alternative accepts them.
    NoMatch { present: Vec<String> },
    /// More than one alternative accepts the present attributes.
    Ambiguous { present: Vec<String>, candidates: Vec<L> },
}

impl<L> Selection<L> {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Selection::NoMatch { .. } | Selection::Ambiguous { .. })
    }

    /// The offending attribute names for an invalid selection.
    pub fn offending(&self) -> &[String] {
        match self {
            Selection::NoMatch { present } | Selection::Ambiguous { present, .. } => present,
            _ => &[],
        }
    }
}

/// A set of labelled shapes over a common attribute domain.
#[derive(Debug, Clone)]
pub struct ShapeSelector<L> {
    alternatives: Vec<(L, AttrShape)>,
    domain: BTreeSet<String>,
}

impl<L: Clone> ShapeSelector<L> {
    pub fn new() -> Self {
        Self {
            alternatives: Vec::new(),
            domain: BTreeSet::new(),
        }
    }

    /// Add a labelled alternative.
    pub fn alternative(mut self, label: L, shape: AttrShape) -> Self {
        self.domain
            .extend(shape.names().into_iter().map(str::to_string));
        self.alternatives.push((label, shape));
        self
    }

    /// The union of all names mentioned by the alternatives.
    pub fn domain(&self) -> impl Iterator<Item = &str> {
        self.domain.iter().map(String::as_str)
    }

    /// Pick the alternative the present attributes select.
    ///
    /// Names outside the domain are ignored, so unrelated attributes
    /// (extension attributes, `expressionLanguage`) never disturb the choice.
    pub fn select<I, S>(&self, present: I) -> Selection<L>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = present.into_iter().collect();
        let projected: BTreeSet<&str> = names
            .iter()
            .map(|s| s.as_ref())
            .filter(|n| self.domain.contains(*n))
            .collect();

        if projected.is_empty() {
            return Selection::Inline;
        }

        let mut candidates: Vec<L> = self
            .alternatives
            .iter()
            .filter(|(_, shape)| shape.matches_set(&projected))
            .map(|(label, _)| label.clone())
            .collect();

        let present: Vec<String> = projected.iter().map(|n| n.to_string()).collect();
        match candidates.len() {
            0 => Selection::NoMatch { present },
            1 => match candidates.pop() {
                Some(label) => Selection::Matched(label),
                None => Selection::NoMatch { present },
            },
            _ => Selection::Ambiguous {
                present,
                candidates,
            },
        }
    }
}

impl<L: Clone> Default for ShapeSelector<L> {
    fn default() -> Self {
        Self::new()
    }
}
