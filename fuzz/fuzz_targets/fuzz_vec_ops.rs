#![no_main]

use arbitrary::Arbitrary;
use atomslice::{Store, StoreOptions, VecStore};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum VecOp {
    SetItem { index: u8, value: i32 },
    Replace(Vec<i32>),
    Reset,
}

fuzz_target!(|input: (Vec<i32>, Vec<VecOp>)| {
    let (initial, ops) = input;
    let store = VecStore::new(&initial, StoreOptions::new().store(Store::new()));
    let mut model = initial.clone();

    for op in ops.into_iter().take(256) {
        match op {
            VecOp::SetItem { index, value } => {
                let index = usize::from(index);
                store.set_item(index, value);
                if let Some(slot) = model.get_mut(index) {
                    *slot = value;
                }
            }
            VecOp::Replace(seq) => {
                model = seq.clone();
                store.set_state(seq);
            }
            VecOp::Reset => {
                store.reset_state();
                model = initial.clone();
            }
        }

        assert_eq!(store.get_state(), model);
        for index in 0..model.len() + 2 {
            assert_eq!(store.get_item(index), model.get(index).copied());
        }
    }
});
