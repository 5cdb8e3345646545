#![no_main]

extern crate libfuzzer_sys;
extern crate trial_grid;

use libfuzzer_sys::fuzz_target;
use trial_grid::store::codec;
use trial_grid::trial::{ResultRow, TrialSpec};

fuzz_target!(|input: (Vec<ResultRow>, Vec<(TrialSpec, u8)>)| {
    let (rows, played) = input;
    let rows: Vec<ResultRow> = rows
        .into_iter()
        .chain(played.iter().map(|(spec, score)| ResultRow::from_spec(spec, *score)))
        .collect();

    // Every row the store accepts must read back unchanged
    let storable: Vec<ResultRow> = rows
        .into_iter()
        .filter(|row| codec::check_row(row).is_ok())
        .collect();
    let decoded = codec::decode(&codec::encode(&storable)).expect("storable rows decode");
    assert_eq!(storable, decoded);
});
