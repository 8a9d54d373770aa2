/// Calculate the minimum distance between two points on a circular modulo space.
pub fn mod_dist(x: f64, y: f64, modulo: f64) -> f64 {
    let diff1 = (x - y).rem_euclid(modulo);
    let diff2 = (y - x).rem_euclid(modulo);
    diff1.min(diff2)
}

/// Generate `num` evenly spaced values over the closed interval [start, end].
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            (0..num).map(|i| start + i as f64 * step).collect()
        }
    }
}
