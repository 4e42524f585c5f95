use std::cmp::Ordering;

use crate::process::ProcessSample;

/// Orders samples by CPU usage, highest first.
///
/// The sort is stable: samples with equal `cpu_percent` keep their
/// enumeration order. NaN compares equal to everything.
pub fn rank(samples: &mut [ProcessSample]) {
    samples.sort_by(|a, b| {
        b.cpu_percent
            .partial_cmp(&a.cpu_percent)
            .unwrap_or(Ordering::Equal)
    });
}
