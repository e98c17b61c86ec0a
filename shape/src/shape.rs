//! Shape predicates over a set of attribute names.

use std::collections::BTreeSet;
use std::fmt;

/// A predicate over the names of the attributes present on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrShape {
    /// Every required name present, nothing outside required and optional.
    Exact {
        required: BTreeSet<String>,
        optional: BTreeSet<String>,
    },
    And(Box<AttrShape>, Box<AttrShape>),
    Or(Box<AttrShape>, Box<AttrShape>),
}

impl AttrShape {
    /// A shape requiring exactly these names.
    pub fn required(names: &[&str]) -> Self {
        AttrShape::Exact {
            required: names.iter().map(|n| n.to_string()).collect(),
            optional: BTreeSet::new(),
        }
    }

    /// A shape with no required names. Matches the empty set.
    pub fn none() -> Self {
        Self::required(&[])
    }

    /// Also allow these names. On a composite shape both sides are widened.
    pub fn optional(self, names: &[&str]) -> Self {
        match self {
            AttrShape::Exact {
                required,
                mut optional,
            } => {
                optional.extend(names.iter().map(|n| n.to_string()));
                AttrShape::Exact { required, optional }
            }
            AttrShape::And(a, b) => {
                AttrShape::And(Box::new(a.optional(names)), Box::new(b.optional(names)))
            }
            AttrShape::Or(a, b) => {
                AttrShape::Or(Box::new(a.optional(names)), Box::new(b.optional(names)))
            }
        }
    }

    pub fn and(self, other: AttrShape) -> Self {
        AttrShape::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: AttrShape) -> Self {
        AttrShape::Or(Box::new(self), Box::new(other))
    }

    /// Test the shape against the names of the present attributes.
    pub fn matches<I, S>(&self, present: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = present.into_iter().collect();
        let set: BTreeSet<&str> = names.iter().map(|s| s.as_ref()).collect();
        self.matches_set(&set)
    }

    pub(crate) fn matches_set(&self, present: &BTreeSet<&str>) -> bool {
        match self {
            AttrShape::Exact { required, optional } => {
                required.iter().all(|r| present.contains(r.as_str()))
                    && present
                        .iter()
                        .all(|p| required.contains(*p) || optional.contains(*p))
            }
            AttrShape::And(a, b) => a.matches_set(present) && b.matches_set(present),
            AttrShape::Or(a, b) => a.matches_set(present) || b.matches_set(present),
        }
    }

    /// Every name this shape mentions, required or optional.
    pub fn names(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_names(&mut out);
        out
    }

    fn collect_names<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            AttrShape::Exact { required, optional } => {
                out.extend(required.iter().map(String::as_str));
                out.extend(optional.iter().map(String::as_str));
            }
            AttrShape::And(a, b) | AttrShape::Or(a, b) => {
                a.collect_names(out);
                b.collect_names(out);
            }
        }
    }
}

impl fmt::Display for AttrShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrShape::Exact { required, optional } => {
                let req: Vec<&str> = required.iter().map(String::as_str).collect();
                write!(f, "{}", req.join("+"))?;
                if !optional.is_empty() {
                    let opt: Vec<&str> = optional.iter().map(String::as_str).collect();
                    write!(f, "[{}]", opt.join(","))?;
                }
                Ok(())
            }
            AttrShape::And(a, b) => write!(f, "({} & {})", a, b),
            AttrShape::Or(a, b) => write!(f, "({} | {})", a, b),
        }
    }
}
