#![cfg(test)]

// Property tests for Multiset kept inside the crate, next to the debug
// assertions on the cached total they exercise.

use crate::error::MultisetError;
use crate::multiset::Multiset;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

// Pool-indexed operations: indices shrink to earlier elements, op lists
// shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize),
    Add(usize, isize),
    Set(usize, usize),
    SetIf(usize, usize, usize),
    Remove(usize),
    RemoveElement(usize),
    Poll,
    Scale(usize),
    RetainEven,
    Cursor(usize),
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-e]{1,2}", 1..=6).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            4 => idx.clone().prop_map(OpI::Insert),
            3 => (idx.clone(), -4isize..5).prop_map(|(i, d)| OpI::Add(i, d)),
            2 => (idx.clone(), 0usize..4).prop_map(|(i, m)| OpI::Set(i, m)),
            1 => (idx.clone(), 0usize..3, 0usize..3).prop_map(|(i, e, m)| OpI::SetIf(i, e, m)),
            3 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::RemoveElement),
            1 => Just(OpI::Poll),
            1 => (0usize..3).prop_map(OpI::Scale),
            1 => Just(OpI::RetainEven),
            1 => (0usize..6).prop_map(OpI::Cursor),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn model_len(model: &HashMap<String, usize>) -> usize {
    model.values().sum()
}

// Property: State-machine equivalence against a std HashMap of counts.
// Invariants exercised across random operation sequences:
// - `len` equals the sum of the map view's values after every op.
// - No zero multiplicity is ever stored.
// - A refused `add` leaves both multiset and model untouched.
// - Cursor removal takes exactly one instance of the element last yielded.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: Multiset<String> = Multiset::new();
        let mut model: HashMap<String, usize> = HashMap::new();

        for op in ops {
            match op {
                OpI::Insert(i) => {
                    let e = pool[i].clone();
                    let m = sut.insert(e.clone()).unwrap();
                    let slot = model.entry(e).or_insert(0);
                    *slot += 1;
                    prop_assert_eq!(m, *slot);
                }
                OpI::Add(i, d) => {
                    let e = pool[i].clone();
                    let present = model.get(&e).copied().unwrap_or(0);
                    let res = sut.add(e.clone(), d).map(|_| ());
                    if d < 0 && d.unsigned_abs() > present {
                        prop_assert_eq!(res, Err(MultisetError::NotRemovable {
                            requested: d.unsigned_abs(),
                            present,
                        }));
                    } else {
                        prop_assert!(res.is_ok());
                        let new = (present as isize + d) as usize;
                        if new == 0 { model.remove(&e); } else { model.insert(e, new); }
                    }
                }
                OpI::Set(i, m) => {
                    let e = pool[i].clone();
                    let old = sut.set_multiplicity(e.clone(), m).unwrap();
                    let prev = if m == 0 { model.remove(&e) } else { model.insert(e, m) };
                    prop_assert_eq!(old, prev.unwrap_or(0));
                }
                OpI::SetIf(i, expected, m) => {
                    let e = pool[i].clone();
                    let present = model.get(&e).copied().unwrap_or(0);
                    let applied = sut.set_multiplicity_if(e.clone(), expected, m).unwrap();
                    prop_assert_eq!(applied, present == expected);
                    if applied {
                        if m == 0 { model.remove(&e); } else { model.insert(e, m); }
                    }
                }
                OpI::Remove(i) => {
                    let e = &pool[i];
                    let removed = sut.remove(e).unwrap();
                    prop_assert_eq!(removed, model.contains_key(e));
                    if let Some(m) = model.get_mut(e) {
                        *m -= 1;
                        if *m == 0 { model.remove(e); }
                    }
                }
                OpI::RemoveElement(i) => {
                    let e = &pool[i];
                    let old = sut.remove_element(e).unwrap();
                    prop_assert_eq!(old, model.remove(e).unwrap_or(0));
                }
                OpI::Poll => {
                    match sut.poll() {
                        Ok(e) => {
                            let m = model.get_mut(&e);
                            prop_assert!(m.is_some(), "polled element must be present");
                            if let Some(m) = m {
                                *m -= 1;
                                if *m == 0 { model.remove(&e); }
                            }
                        }
                        Err(err) => {
                            prop_assert_eq!(err, MultisetError::Empty);
                            prop_assert!(model.is_empty());
                        }
                    }
                }
                OpI::Scale(k) => {
                    let changed = sut.set_multiplicities(|_, m| m * k).unwrap();
                    let before = model.clone();
                    model.retain(|_, m| { *m *= k; *m != 0 });
                    prop_assert_eq!(changed, before != model);
                }
                OpI::RetainEven => {
                    sut.retain(|_, m| m % 2 == 0).unwrap();
                    model.retain(|_, m| *m % 2 == 0);
                }
                OpI::Cursor(skip) => {
                    let mut cursor = sut.cursor();
                    let mut taken = None;
                    for _ in 0..=skip {
                        taken = cursor.next().cloned();
                    }
                    if let Some(e) = taken {
                        cursor.remove().unwrap();
                        let m = model.get_mut(&e).unwrap();
                        *m -= 1;
                        if *m == 0 { model.remove(&e); }
                    }
                }
                OpI::Clear => {
                    sut.clear().unwrap();
                    model.clear();
                }
            }

            prop_assert_eq!(sut.len(), model_len(&model));
            prop_assert_eq!(sut.len(), sut.as_map().values().sum::<usize>());
            prop_assert_eq!(sut.distinct_len(), model.len());
            prop_assert!(sut.entries().all(|(_, m)| m > 0));
            for (e, m) in &model {
                prop_assert_eq!(sut.multiplicity(e), *m);
            }
            for e in &pool {
                prop_assert_eq!(sut.contains(e), sut.multiplicity(e) > 0);
            }
        }
    }
}

// Property: an ordered backing map walks elements in key order, each
// repeated by its multiplicity, and agrees with the hashed one on equality
// and on every algebra result.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_backings_agree(
        a in proptest::collection::btree_map(0u8..8, 1usize..4, 0..6),
        b in proptest::collection::btree_map(0u8..8, 1usize..4, 0..6),
    ) {
        let ordered_a: Multiset<u8, BTreeMap<u8, usize>> = Multiset::wrap(a.clone()).unwrap();
        let hashed_a: Multiset<u8> = a.iter().map(|(e, m)| (*e, *m)).collect();
        let hashed_b: Multiset<u8> = b.iter().map(|(e, m)| (*e, *m)).collect();

        let expected: Vec<u8> = a
            .iter()
            .flat_map(|(e, m)| std::iter::repeat(*e).take(*m))
            .collect();
        prop_assert_eq!(ordered_a.iter().copied().collect::<Vec<_>>(), expected);
        prop_assert_eq!(&ordered_a, &hashed_a);
        prop_assert_eq!(ordered_a.union(&hashed_b), hashed_a.union(&hashed_b));
        prop_assert_eq!(ordered_a.intersect(&hashed_b), hashed_a.intersect(&hashed_b));
        prop_assert_eq!(ordered_a.minus(&hashed_b), hashed_a.minus(&hashed_b));
    }
}
