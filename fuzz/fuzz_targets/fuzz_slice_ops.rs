#![no_main]

use arbitrary::Arbitrary;
use atomslice::{SliceState, SliceStore, Store, StoreOptions};
use libfuzzer_sys::fuzz_target;

const KEYS: [&str; 5] = ["a", "b", "c", "d", "e"];

#[derive(Arbitrary, Debug)]
enum SliceOp {
    Set { key: u8, value: i16 },
    SetMany(Vec<(u8, i16)>),
    Reset(Option<Vec<u8>>),
}

fn key(k: u8) -> &'static str {
    KEYS[usize::from(k) % KEYS.len()]
}

fuzz_target!(|input: (Vec<(u8, i16)>, Vec<SliceOp>)| {
    let (seed, ops) = input;
    let initial: SliceState<i16> = seed.into_iter().map(|(k, v)| (key(k).to_owned(), v)).collect();
    let store = SliceStore::new(&initial, StoreOptions::new().store(Store::new()));
    let mut model = initial.clone();

    for op in ops.into_iter().take(256) {
        match op {
            SliceOp::Set { key: k, value } => {
                store.set_state_by_key(key(k), value);
                model.insert(key(k).to_owned(), value);
            }
            SliceOp::SetMany(pairs) => {
                let partial: SliceState<i16> = pairs.into_iter().map(|(k, v)| (key(k).to_owned(), v)).collect();
                for (k, v) in &partial {
                    model.insert(k.clone(), *v);
                }
                store.set_state(partial);
            }
            SliceOp::Reset(keys) => {
                let keys: Option<Vec<&str>> = keys.map(|ks| ks.into_iter().map(key).collect());
                let reset_all = match &keys {
                    None => true,
                    Some(ks) => {
                        ks.is_empty()
                            || (!initial.is_empty() && initial.keys().all(|k| ks.contains(&k.as_str())))
                    }
                };
                if reset_all {
                    model = initial.clone();
                } else {
                    for k in keys.iter().flatten() {
                        match initial.get(*k) {
                            Some(v) => {
                                model.insert((*k).to_owned(), *v);
                            }
                            None => {
                                model.shift_remove(*k);
                            }
                        }
                    }
                }
                store.reset_state(keys.as_deref());
            }
        }

        let state = store.get_state(None);
        for k in KEYS {
            assert_eq!(state.get(k), model.get(k), "key {k}");
            assert_eq!(store.get_state_by_key(k), model.get(k).copied());
        }
    }
});
