//! Factor spaces, scopes, and canonical enumeration of partial assignments.
//!
//! A state (or action) is described by independent variables called factors;
//! a [`FactorSpace`] lists their cardinalities. A [`Tag`] is the scope of a
//! table or function: the strictly increasing set of variable ids it depends
//! on. All dense storage in this crate is laid out in one canonical order,
//! the mixed-radix encoding where the *first* variable of a tag is the least
//! significant digit. [`DomainIterator`] walks every joint assignment of a
//! tag in exactly that order, and [`linear_index_full`] /
//! [`linear_index_partial`] compute the matching index directly. The three
//! must never disagree: table row selection, action-table selection, and
//! output-buffer layout all share this convention.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Cardinalities of the variables describing a state or action space.
///
/// Entry `i` is the number of values variable `i` can take. Immutable once
/// built. Deserialization runs the same validation as [`FactorSpace::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>")]
pub struct FactorSpace(Vec<usize>);

impl TryFrom<Vec<usize>> for FactorSpace {
    type Error = Error;

    fn try_from(cardinalities: Vec<usize>) -> Result<Self> {
        Self::new(cardinalities)
    }
}

impl FactorSpace {
    /// Create a factor space from per-variable cardinalities.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySpace`] if no variables are given, or
    /// [`Error::ZeroCardinality`] if any variable has no possible values.
    pub fn new(cardinalities: Vec<usize>) -> Result<Self> {
        if cardinalities.is_empty() {
            return Err(Error::EmptySpace);
        }
        if let Some(variable) = cardinalities.iter().position(|&c| c == 0) {
            return Err(Error::ZeroCardinality { variable });
        }
        Ok(Self(cardinalities))
    }

    /// Number of variables in the space.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the space has no variables (never holds for a validated space).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cardinality of one variable.
    ///
    /// # Panics
    ///
    /// Panics if `variable` is out of range.
    pub fn cardinality(&self, variable: usize) -> usize {
        self.0[variable]
    }

    /// All cardinalities, in variable order.
    pub fn cardinalities(&self) -> &[usize] {
        &self.0
    }

    /// Size of the full joint domain: the product of all cardinalities.
    pub fn joint_size(&self) -> usize {
        self.0.iter().product()
    }

    /// Size of the joint domain restricted to `tag`.
    ///
    /// The product over an empty tag is 1: the empty scope has exactly one
    /// (empty) assignment.
    pub fn domain_size(&self, tag: &Tag) -> usize {
        tag.iter().map(|v| self.0[v]).product()
    }
}

/// The scope of a table or function: a strictly increasing set of variable ids.
///
/// Deserialization runs the same validation as [`Tag::new`], so an unsorted
/// or duplicated scope cannot enter through a document either.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>")]
pub struct Tag(Vec<usize>);

impl TryFrom<Vec<usize>> for Tag {
    type Error = Error;

    fn try_from(ids: Vec<usize>) -> Result<Self> {
        Self::new(ids)
    }
}

impl Tag {
    /// Create a tag from variable ids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsortedTag`] unless the ids are strictly increasing.
    pub fn new(ids: Vec<usize>) -> Result<Self> {
        for position in 1..ids.len() {
            if ids[position] <= ids[position - 1] {
                return Err(Error::UnsortedTag { ids, position });
            }
        }
        Ok(Self(ids))
    }

    /// The empty scope.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// The variable ids, in increasing order.
    pub fn ids(&self) -> &[usize] {
        &self.0
    }

    /// Number of variables in the scope.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty scope.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the variable ids.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Whether `variable` belongs to this scope.
    pub fn contains(&self, variable: usize) -> bool {
        self.position(variable).is_some()
    }

    /// Position of `variable` within the tag, if present.
    pub fn position(&self, variable: usize) -> Option<usize> {
        self.0.binary_search(&variable).ok()
    }

    /// Sorted, duplicate-free union of two scopes.
    pub fn merge(&self, other: &Tag) -> Tag {
        let mut merged = Vec::with_capacity(self.0.len() + other.0.len());
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                std::cmp::Ordering::Less => {
                    merged.push(self.0[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    merged.push(other.0[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    merged.push(self.0[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&self.0[i..]);
        merged.extend_from_slice(&other.0[j..]);
        Tag(merged)
    }
}

/// An assignment of values to the variables of one scope.
///
/// `values[k]` is the value of `tag.ids()[k]`. Deserialization runs the
/// same validation as [`PartialAssignment::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPartialAssignment")]
pub struct PartialAssignment {
    tag: Tag,
    values: Vec<usize>,
}

/// Unvalidated mirror of [`PartialAssignment`], used only as a
/// deserialization intermediate.
#[derive(Deserialize)]
struct RawPartialAssignment {
    tag: Tag,
    values: Vec<usize>,
}

impl TryFrom<RawPartialAssignment> for PartialAssignment {
    type Error = Error;

    fn try_from(raw: RawPartialAssignment) -> Result<Self> {
        Self::new(raw.tag, raw.values)
    }
}

impl PartialAssignment {
    /// Pair a tag with aligned values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssignmentLength`] if the lengths differ.
    pub fn new(tag: Tag, values: Vec<usize>) -> Result<Self> {
        if tag.len() != values.len() {
            return Err(Error::AssignmentLength {
                tag: tag.len(),
                values: values.len(),
            });
        }
        Ok(Self { tag, values })
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn values(&self) -> &[usize] {
        &self.values
    }

    /// Borrowed view, the form all queries take.
    pub fn as_ref(&self) -> PartialAssignmentRef<'_> {
        PartialAssignmentRef {
            tag: &self.tag,
            values: &self.values,
        }
    }
}

/// A cheap borrowed view of a scoped assignment.
///
/// This is what probability queries and [`DomainIterator`] hand around;
/// nothing is copied.
#[derive(Debug, Clone, Copy)]
pub struct PartialAssignmentRef<'a> {
    pub tag: &'a Tag,
    pub values: &'a [usize],
}

impl PartialAssignmentRef<'_> {
    /// The value assigned to `variable`, if the scope covers it.
    pub fn value_of(&self, variable: usize) -> Option<usize> {
        self.tag.position(variable).map(|k| self.values[k])
    }
}

/// Mixed-radix linear index of a full assignment projected onto `tag`.
///
/// The first variable of the tag is the least significant digit; this is the
/// same order [`DomainIterator`] enumerates in, so the index of the k-th
/// assignment it yields is k.
///
/// # Panics
///
/// Panics if `tag` names a variable beyond `full`'s length.
pub fn linear_index_full(space: &FactorSpace, tag: &Tag, full: &[usize]) -> usize {
    let mut index = 0;
    for v in tag.ids().iter().rev() {
        index = index * space.cardinality(*v) + full[*v];
    }
    index
}

/// Mixed-radix linear index of `tag`'s assignment, read out of a covering
/// scoped assignment.
///
/// # Panics
///
/// Panics if `covering` does not assign a value to every variable of `tag`.
/// Missing a required variable is a caller programming error; failing here
/// is what keeps a bad query from silently producing a wrong probability.
pub fn linear_index_partial(
    space: &FactorSpace,
    tag: &Tag,
    covering: PartialAssignmentRef<'_>,
) -> usize {
    let mut index = 0;
    for v in tag.ids().iter().rev() {
        let value = covering.value_of(*v).unwrap_or_else(|| {
            panic!("partial assignment does not cover required variable {v}")
        });
        index = index * space.cardinality(*v) + value;
    }
    index
}

/// Restartable cursor over every joint assignment of a tag, in canonical
/// (least-significant-first) order.
///
/// This is an explicit cursor rather than an [`Iterator`] because
/// back-projection drives one cursor from inside the loop of another and
/// resets the inner one per outer step; hidden iterator state would get in
/// the way. The empty tag yields exactly one (empty) assignment.
#[derive(Debug, Clone)]
pub struct DomainIterator {
    tag: Tag,
    cardinalities: Vec<usize>,
    values: Vec<usize>,
    valid: bool,
}

impl DomainIterator {
    /// Start a cursor at the all-zeros assignment of `tag`.
    pub fn new(space: &FactorSpace, tag: &Tag) -> Self {
        let cardinalities = tag.iter().map(|v| space.cardinality(v)).collect::<Vec<_>>();
        let values = vec![0; cardinalities.len()];
        Self {
            tag: tag.clone(),
            cardinalities,
            values,
            valid: true,
        }
    }

    /// Whether the cursor currently points at an assignment.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The assignment the cursor points at.
    ///
    /// Only meaningful while [`is_valid`](Self::is_valid) holds.
    pub fn current(&self) -> PartialAssignmentRef<'_> {
        PartialAssignmentRef {
            tag: &self.tag,
            values: &self.values,
        }
    }

    /// Step to the next assignment, invalidating the cursor after the last.
    pub fn advance(&mut self) {
        for k in 0..self.values.len() {
            self.values[k] += 1;
            if self.values[k] < self.cardinalities[k] {
                return;
            }
            self.values[k] = 0;
        }
        // Every digit wrapped (or the tag is empty): domain exhausted.
        self.valid = false;
    }

    /// Rewind to the first assignment.
    pub fn reset(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0);
        self.valid = true;
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> FactorSpace {
        FactorSpace::new(vec![2, 3, 2]).expect("valid space")
    }

    #[test]
    fn space_rejects_zero_cardinality() {
        let err = FactorSpace::new(vec![2, 0, 3]).unwrap_err();
        assert!(matches!(err, Error::ZeroCardinality { variable: 1 }));
    }

    #[test]
    fn space_rejects_empty() {
        assert!(matches!(FactorSpace::new(vec![]), Err(Error::EmptySpace)));
    }

    #[test]
    fn tag_rejects_duplicates_and_disorder() {
        assert!(Tag::new(vec![0, 0]).is_err());
        assert!(Tag::new(vec![2, 1]).is_err());
        assert!(Tag::new(vec![0, 2, 5]).is_ok());
    }

    #[test]
    fn merge_is_sorted_union() {
        let a = Tag::new(vec![0, 2, 3]).unwrap();
        let b = Tag::new(vec![1, 2, 4]).unwrap();
        assert_eq!(a.merge(&b).ids(), &[0, 1, 2, 3, 4]);
        assert_eq!(Tag::empty().merge(&a), a);
    }

    #[test]
    fn domain_size_of_empty_tag_is_one() {
        assert_eq!(space().domain_size(&Tag::empty()), 1);
    }

    #[test]
    fn iterator_order_matches_linear_index() {
        let space = space();
        let tag = Tag::new(vec![0, 1]).unwrap();
        let mut cursor = DomainIterator::new(&space, &tag);
        let mut seen = Vec::new();
        while cursor.is_valid() {
            let current = cursor.current();
            // The k-th enumerated assignment must land at linear index k.
            let index = linear_index_partial(&space, &tag, current);
            assert_eq!(index, seen.len(), "enumeration order must be canonical");
            seen.push(current.values.to_vec());
            cursor.advance();
        }
        assert_eq!(seen.len(), space.domain_size(&tag));
        // First variable advances fastest.
        assert_eq!(seen[0], vec![0, 0]);
        assert_eq!(seen[1], vec![1, 0]);
        assert_eq!(seen[2], vec![0, 1]);
    }

    #[test]
    fn iterator_resets_to_first() {
        let space = space();
        let tag = Tag::new(vec![2]).unwrap();
        let mut cursor = DomainIterator::new(&space, &tag);
        cursor.advance();
        cursor.advance();
        assert!(!cursor.is_valid(), "cardinality-2 domain has two entries");
        cursor.reset();
        assert!(cursor.is_valid());
        assert_eq!(cursor.current().values, &[0]);
    }

    #[test]
    fn empty_tag_yields_single_assignment() {
        let space = space();
        let mut cursor = DomainIterator::new(&space, &Tag::empty());
        assert!(cursor.is_valid());
        assert!(cursor.current().values.is_empty());
        cursor.advance();
        assert!(!cursor.is_valid());
    }

    #[test]
    fn linear_index_full_projects_onto_tag() {
        let space = space();
        let tag = Tag::new(vec![0, 2]).unwrap();
        // Variable 0 is least significant: index = s[0] + 2 * s[2].
        assert_eq!(linear_index_full(&space, &tag, &[1, 2, 1]), 3);
        assert_eq!(linear_index_full(&space, &Tag::empty(), &[1, 2, 1]), 0);
    }

    #[test]
    #[should_panic(expected = "does not cover required variable")]
    fn partial_index_panics_on_missing_variable() {
        let space = space();
        let tag = Tag::new(vec![1]).unwrap();
        let covering_tag = Tag::new(vec![0]).unwrap();
        let covering = PartialAssignment::new(covering_tag, vec![1]).unwrap();
        linear_index_partial(&space, &tag, covering.as_ref());
    }
}
