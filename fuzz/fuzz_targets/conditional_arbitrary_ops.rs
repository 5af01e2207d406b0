#![no_main]

use freqkit::prelude::*;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary set/increment sequences on ConditionalDistribution
//
// Marginal counts and the overall sum are rechecked from the conditional
// distributions after every operation.
fuzz_target!(|data: &[u8]| {
    let mut cfd = ConditionalDistribution::new();

    for chunk in data.chunks_exact(4) {
        let event = i32::from(chunk[1] % 16);
        let cond = i32::from(chunk[2] % 8);
        let amount = i32::from(chunk[3]);

        match chunk[0] % 4 {
            0 => cfd.increment(event, cond).unwrap(),
            1 => cfd.increment_by(event, cond, amount).unwrap(),
            2 => {
                cfd.set(event, cond, amount).unwrap();
                assert_eq!(cfd.get(event, cond), amount);
            }
            3 => cfd.clear(),
            _ => unreachable!(),
        }

        cfd.check().unwrap();
    }
});
