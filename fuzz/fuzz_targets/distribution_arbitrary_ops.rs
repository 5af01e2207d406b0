#![no_main]

use freqkit::prelude::*;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on IntDistribution
//
// Keys are drawn from a small range so that collisions, backward-shift
// removal and decrement-to-zero happen often. Invariants are validated
// after every operation.
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let mut dist = IntDistribution::new();

    let mut idx = 0;
    while idx + 2 < data.len() {
        let op = data[idx] % 9;
        let key = i32::from(data[idx + 1] as i8);
        let amount = i32::from(data[idx + 2]);

        let before = dist.sum_of_frequencies();
        match op {
            0 => {
                // Increment
                let ok = dist.increment(key).is_ok();
                assert!(ok);
                assert_eq!(dist.sum_of_frequencies(), before + 1);
            }
            1 => {
                // Increment by
                dist.increment_by(key, amount).unwrap();
                assert_eq!(dist.sum_of_frequencies(), before + i64::from(amount));
            }
            2 => {
                // Decrement; failure must leave the sum unchanged
                let present = dist.get(&key);
                match dist.decrement(&key) {
                    Ok(()) => assert_eq!(dist.sum_of_frequencies(), before - 1),
                    Err(_) => {
                        assert!(present == 0);
                        assert_eq!(dist.sum_of_frequencies(), before);
                    }
                }
            }
            3 => {
                // Decrement by
                let present = dist.get(&key);
                let result = dist.decrement_by(&key, amount);
                if result.is_ok() {
                    assert_eq!(dist.get(&key), present - amount);
                    if present == amount {
                        assert!(!dist.contains(&key));
                    }
                } else {
                    assert_eq!(dist.sum_of_frequencies(), before);
                }
            }
            4 => {
                // Set
                let previous = dist.set(key, amount).unwrap();
                assert!(dist.contains(&key));
                assert_eq!(
                    dist.sum_of_frequencies(),
                    before - i64::from(previous) + i64::from(amount)
                );
            }
            5 => {
                // Remove
                let removed = dist.remove(&key);
                assert!(!dist.contains(&key));
                assert_eq!(dist.sum_of_frequencies(), before - i64::from(removed));
            }
            6 => {
                // Limited frequency export is a prefix of the full export
                let full = dist.frequency_sorted_events().unwrap();
                let n = usize::from(data[idx + 2]);
                match dist.frequency_sorted_events_limited(n) {
                    Ok(limited) => assert_eq!(limited.as_slice(), &full[..n]),
                    Err(_) => assert!(n > full.len()),
                }
            }
            7 => {
                // Key-sorted export is strictly ascending
                let sorted = dist.sorted_events().unwrap();
                assert!(sorted.windows(2).all(|w| w[0].key < w[1].key));
            }
            8 => {
                // Clear
                dist.clear();
                assert!(dist.is_empty());
            }
            _ => unreachable!(),
        }

        // Validate invariants after each operation
        dist.check_invariants().unwrap();

        idx += 3;
    }
});
