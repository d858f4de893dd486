// Multiset integration suite.
//
// Fixtures: `abc` holds 'a'..='z' once each (26 elements), `numbers` holds
// every n in 1..=9 exactly n times (45 elements), `empty` is the canonical
// unmodifiable empty multiset. The core invariants exercised:
// - Counting: len() is the sum of multiplicities; absent means 0.
// - Atomic refusal: a refused mutation leaves the multiset unchanged.
// - Algebra: merge/union/intersect/minus return new multisets and never
//   touch their operands.
// - Equality and hashing ignore the backing map and its order.
use multibag::{multiset, BackingMap, Multiset, MultisetError};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

fn abc() -> Multiset<char> {
    ('a'..='z').collect()
}

fn numbers() -> Multiset<u32> {
    Multiset::from_distinct(1..=9, |n| *n as usize)
}

fn h<X: Hash>(x: &X) -> u64 {
    let mut s = DefaultHasher::new();
    x.hash(&mut s);
    s.finish()
}

// Test: fixture sizes and emptiness.
#[test]
fn sizes() {
    assert_eq!(Multiset::<char>::empty().len(), 0);
    assert!(Multiset::<char>::empty().is_empty());
    assert_eq!(abc().len(), 26);
    assert_eq!(numbers().len(), 45);
    assert_eq!(numbers().distinct_len(), 9);
    for n in 1..=9 {
        assert_eq!(numbers().multiplicity(&n), n as usize);
    }
    assert_eq!(abc().multiplicity(&'ö'), 0);
}

// Test: insert/remove/set scenario.
// Verifies: three inserts give multiplicity 3; remove takes one; setting 0
// drops the element.
#[test]
fn insert_remove_set_scenario() {
    let mut ms = Multiset::new();
    for _ in 0..3 {
        ms.insert('a').unwrap();
    }
    assert_eq!(ms.multiplicity(&'a'), 3);
    assert_eq!(ms.len(), 3);
    assert!(ms.remove(&'a').unwrap());
    assert_eq!(ms.multiplicity(&'a'), 2);
    assert_eq!(ms.set_multiplicity('a', 0), Ok(2));
    assert!(!ms.contains(&'a'));
    assert!(ms.is_empty());
}

// Test: a negative delta on an absent element.
// Verifies: NotRemovable, nothing changes.
#[test]
fn removing_absent_element_by_delta_fails() {
    let mut ms = abc();
    let err = ms.add('ö', -1).map(|_| ()).unwrap_err();
    assert_eq!(
        err,
        MultisetError::NotRemovable {
            requested: 1,
            present: 0
        }
    );
    assert_eq!(ms, abc());
}

#[test]
fn insert_and_set_multiplicity_report_counts() {
    let mut ms = abc();
    assert_eq!(ms.insert('ä'), Ok(1));
    assert_eq!(ms.insert('x'), Ok(2));
    assert_eq!(ms.set_multiplicity('x', 20), Ok(2));
    assert_eq!(ms.set_multiplicity('x', 1), Ok(20));
    assert_eq!(ms.len(), 27);

    let mut m: Multiset<i32> = Multiset::new();
    m.add(42, 42).unwrap();
    assert_eq!(m.multiplicity(&42), 42);
    m.add(42, -41).unwrap();
    assert_eq!(m.multiplicity(&42), 1);
    m.add(8, 0).unwrap();
    assert_eq!(m.multiplicity(&8), 0);
    assert_eq!(m.len(), 1);
}

// Test: poll drains every instance and then reports emptiness.
#[test]
fn poll_until_empty() {
    let mut ms = numbers();
    let mut drained: Multiset<u32> = Multiset::new();
    while ms.poll_with(|n| drained.insert(n).map(|_| ()).unwrap()).unwrap() {}
    assert!(ms.is_empty());
    assert_eq!(drained, numbers());
    assert_eq!(ms.poll(), Err(MultisetError::Empty));
}

#[test]
fn set_multiplicities_and_retain() {
    let mut ms = abc();
    ms.set_multiplicities(|c, _| *c as usize - 'a' as usize)
        .unwrap();
    assert!(!ms.contains(&'a'));
    assert_eq!(ms.multiplicity(&'c'), 2);

    let mut nums = numbers();
    assert!(nums.set_multiplicities(|_, m| m / 5).unwrap());
    assert_eq!(nums.len(), 5);
    assert!(!nums.contains(&4));

    let mut nums = numbers();
    assert!(nums.retain(|n, _| *n % 2 == 0).unwrap());
    assert_eq!(nums.len(), 2 + 4 + 6 + 8);
}

#[test]
fn remove_all_and_retain_all() {
    let mut letters = abc();
    assert!(!letters.remove_all(&multiset!['1', '2']).unwrap());
    let copy = abc();
    assert!(letters.remove_all(&copy).unwrap());
    assert!(letters.is_empty());

    let mut nums = numbers();
    assert!(nums.remove_all_of(&[2, 3, 5, 7]).unwrap());
    assert_eq!(nums.len(), 1 + 4 + 6 + 8 + 9);

    let mut nums = numbers();
    assert!(nums.retain_all(&multiset![2, 8]).unwrap());
    assert_eq!(nums.len(), 2 + 8);
    let mut letters = abc();
    let same = abc();
    assert!(!letters.retain_all(&same).unwrap());
    assert_eq!(letters.len(), 26);
}

#[test]
fn add_all_adds_multiplicities() {
    let mut nums = numbers();
    let again = numbers();
    assert!(nums.add_all(&again).unwrap());
    for n in 1..=9 {
        assert_eq!(nums.multiplicity(&n), 2 * n as usize);
    }
    let mut letters = abc();
    letters.extend("abcdefgh".chars());
    assert_eq!(letters.len(), 34);
    assert!(!letters.add_all(&Multiset::new()).unwrap());
}

// Test: merge with min.
#[test]
fn merge_with_min() {
    let a: Multiset<i32> = multiset![1, 1, 2, 2, 3, 3];
    let b: Multiset<i32> = multiset![1, 2, 2, 3];
    let m = a.merge(&b, usize::min);
    assert_eq!(m, multiset![1, 2, 2, 3]);
    assert_eq!(m.multiplicity(&2), 2);
    assert_eq!(&a & &b, m);
    // operands untouched
    assert_eq!(a.len(), 6);
    assert_eq!(b.len(), 4);
}

// Test: minus drops every element the other operand holds.
#[test]
fn minus_drops_present_elements() {
    let a: Multiset<i32> = multiset![1, 2, 2, 3, 3, 3, 4, 5, 5, 6, 6, 6];
    let b: Multiset<i32> = multiset![1, 1, 1, 2, 2, 3];
    let expected: Multiset<i32> = multiset![4, 5, 5, 6, 6, 6];
    assert_eq!(a.minus(&b), expected);
    assert_eq!(&a - &b, expected);
    assert_eq!(a.minus(&Multiset::new()), a);
}

#[test]
fn subtract_decrements_and_clamps() {
    let a: Multiset<i32> = multiset![1, 2, 2, 3, 3, 3];
    let b: Multiset<i32> = multiset![1, 1, 3];
    assert_eq!(a.subtract(&b), multiset![2, 2, 3, 3]);
}

#[test]
fn union_and_intersect_identities() {
    for ms in [numbers(), multiset![7u32], Multiset::new()] {
        assert_eq!(ms.intersect(&ms), ms);
        assert_eq!(ms.union(&ms).len(), 2 * ms.len());
        assert_eq!((&ms | &ms).len(), 2 * ms.len());
        assert!(ms.is_submultiset_of(&ms));
        assert!(Multiset::<u32>::empty().is_submultiset_of(&ms));
    }
    assert!(!numbers().is_submultiset_of(&multiset![1u32]));
    assert!(multiset![9u32, 9].is_submultiset_of(&numbers()));
    assert!(!multiset![1u32, 1].is_submultiset_of(&numbers()));
}

#[test]
fn union_as_widens_element_type() {
    let small: Multiset<u8> = multiset![1, 2, 2];
    let wide: Multiset<u16> = multiset![2, 300];
    let both: Multiset<u32> = small.union_as(&wide);
    assert_eq!(both.multiplicity(&2), 3);
    assert_eq!(both.multiplicity(&300), 1);
    assert_eq!(both.len(), 5);
    let common: Multiset<u32> = small.merge_as(&wide, usize::min);
    assert_eq!(common, multiset![2u32]);
}

// Test: equality and hashing follow contents only.
#[test]
fn equality_and_hash() {
    for ms in [numbers(), Multiset::new(), multiset![5]] {
        assert_eq!(ms, ms.clone());
        assert_eq!(h(&ms), h(&ms.clone()));
    }
    assert_eq!(h(&Multiset::<char>::empty()), h(&Multiset::<char>::new()));
    assert_ne!(h(&abc()), h(&('a'..='y').collect::<Multiset<char>>()));
    assert_ne!(numbers(), Multiset::new());

    let ordered: BTreeMap<u32, usize> = numbers().into_iter().collect();
    let ordered = Multiset::wrap(ordered).unwrap();
    assert_eq!(ordered, numbers());
    assert_eq!(h(&ordered), h(&numbers()));
}

#[test]
fn wrap_adopts_map_and_validates() {
    let mut map = BTreeMap::new();
    map.insert("x", 2usize);
    map.insert("y", 3usize);
    let mut ms = Multiset::wrap(map).unwrap();
    assert_eq!(ms.len(), 5);
    ms.insert("x").unwrap();
    assert_eq!(ms.backing().get("x"), Some(&3));

    let bad = Multiset::wrap_with(|| BTreeMap::from([("x", 1usize), ("z", 0)]));
    assert_eq!(
        bad.map(|_| ()),
        Err(MultisetError::InvalidMultiplicity { multiplicity: 0 })
    );

    let collected =
        Multiset::collect_into("hello".chars(), BTreeMap::<char, usize>::new).unwrap();
    assert_eq!(collected.to_string(), "[e, h, l, l, o]");
}

// Test: formatting helpers.
#[test]
fn formatting_and_conversions() {
    assert_eq!(Multiset::<u8>::empty().to_string(), "[]");
    let ordered = Multiset::wrap(BTreeMap::from([('b', 2usize), ('a', 1)])).unwrap();
    assert_eq!(ordered.to_string(), "[a, b, b]");
    assert_eq!(
        ordered.join_entries(|e, m| format!("{e}x{m}"), "; ", "{", "}"),
        "{ax1; bx2}"
    );
    assert_eq!(ordered.to_vec(), vec!['a', 'b', 'b']);
    assert_eq!(
        ordered.to_sorted_vec(|a, b| b.1.cmp(&a.1)),
        vec!['b', 'b', 'a']
    );
    let set = ordered.to_set();
    assert_eq!(set.len(), 2);
    assert!(set.contains(&'b'));

    let mut seen = Vec::new();
    ordered.for_each_entry(|e, m| seen.push((*e, m)));
    assert_eq!(seen, vec![('a', 1), ('b', 2)]);
    assert!(ordered.contains_all(&['a', 'b']));
    assert!(!ordered.contains_all(&['a', 'c']));
    assert_eq!(format!("{ordered:?}"), "{'a': 1, 'b': 2}");
}

// Test: a backing map with a restricted domain.
// Assumes: `accepts` is false outside 'a'..='z'.
// Verifies: reads on foreign elements report absence without a lookup;
// inserting one is refused without side effects.
#[test]
fn unsupported_elements_read_as_absent() {
    let mut ms = Multiset::wrap(Letters::default()).unwrap();
    ms.insert('q').unwrap();
    ms.insert('q').unwrap();
    assert_eq!(ms.multiplicity(&'Q'), 0);
    assert!(!ms.contains(&'7'));
    assert_eq!(ms.remove(&'Q'), Ok(false));
    assert_eq!(ms.remove_element(&'Q'), Ok(0));
    assert_eq!(ms.insert('Q'), Err(MultisetError::Rejected));
    assert_eq!(ms.len(), 2);
    assert_eq!(ms.to_string(), "[q, q]");
}

/// One counter per lowercase ASCII letter; nothing else has a slot.
struct Letters {
    slots: Vec<(char, usize)>,
}

impl Default for Letters {
    fn default() -> Self {
        Letters {
            slots: ('a'..='z').map(|c| (c, 0)).collect(),
        }
    }
}

impl Letters {
    fn slot(c: &char) -> usize {
        assert!(c.is_ascii_lowercase(), "no slot for {c:?}");
        (*c as u8 - b'a') as usize
    }
}

struct LetterIter<'a>(std::slice::Iter<'a, (char, usize)>);

impl<'a> Iterator for LetterIter<'a> {
    type Item = (&'a char, usize);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.by_ref().find(|(_, m)| *m > 0).map(|(c, m)| (c, *m))
    }
}

impl BackingMap<char> for Letters {
    type Iter<'a> = LetterIter<'a>;

    fn len(&self) -> usize {
        self.slots.iter().filter(|(_, m)| *m > 0).count()
    }

    fn get(&self, element: &char) -> Option<usize> {
        match self.slots[Self::slot(element)].1 {
            0 => None,
            m => Some(m),
        }
    }

    fn insert(&mut self, element: char, multiplicity: usize) -> multibag::Result<Option<usize>> {
        if !element.is_ascii_lowercase() {
            return Err(MultisetError::Rejected);
        }
        let old = std::mem::replace(&mut self.slots[Self::slot(&element)].1, multiplicity);
        Ok((old > 0).then_some(old))
    }

    fn update(&mut self, element: &char, multiplicity: usize) -> multibag::Result<Option<usize>> {
        let slot = &mut self.slots[Self::slot(element)].1;
        if *slot == 0 {
            return Ok(None);
        }
        Ok(Some(std::mem::replace(slot, multiplicity)))
    }

    fn remove(&mut self, element: &char) -> multibag::Result<Option<usize>> {
        let old = std::mem::take(&mut self.slots[Self::slot(element)].1);
        Ok((old > 0).then_some(old))
    }

    fn clear(&mut self) -> multibag::Result<()> {
        self.slots.iter_mut().for_each(|(_, m)| *m = 0);
        Ok(())
    }

    fn iter(&self) -> Self::Iter<'_> {
        LetterIter(self.slots.iter())
    }

    fn retain<F>(&mut self, mut f: F) -> multibag::Result<()>
    where
        F: FnMut(&char, &mut usize) -> bool,
    {
        for (c, m) in self.slots.iter_mut().filter(|(_, m)| *m > 0) {
            if !f(c, &mut *m) {
                *m = 0;
            }
        }
        Ok(())
    }

    fn accepts(&self, element: &char) -> bool {
        element.is_ascii_lowercase()
    }
}
